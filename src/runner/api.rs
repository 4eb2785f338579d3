//! The `Oloo` handle: the one object a host application holds to build chains and make base
//! calls. Every method body receives it as its first argument.

use std::cell::{Ref, RefCell, RefMut};

use crate::runner::call_state::CallState;
use crate::runner::chain::{self, FoldedNodeCache};
use crate::runner::config::OlooConfig;
use crate::runner::diagnostics::{TracingSink, WarningSink};
use crate::runner::dispatch;
use crate::runner::ds::error::OlooError;
use crate::runner::ds::execution_context::{ExecutionContext, ExecutionContextStack};
use crate::runner::ds::function_object::FunctionRef;
use crate::runner::ds::object::NodeRef;
use crate::runner::ds::object_property::PropertyKey;
use crate::runner::ds::operations::object::{self, chain_of};
use crate::runner::ds::value::Value;

pub struct Oloo {
    config: OlooConfig,
    call_state: RefCell<CallState>,
    ctx_stack: RefCell<ExecutionContextStack>,
    folded_nodes: RefCell<FoldedNodeCache>,
    warning_sink: Box<dyn WarningSink>,
}

impl Oloo {
    /// A handle configured from the environment, see [`OlooConfig::from_env`]. With
    /// `OLOO_ENV` unset, debug tags are on.
    pub fn new() -> Self {
        Self::with_config(OlooConfig::from_env())
    }

    pub fn with_config(config: OlooConfig) -> Self {
        Oloo {
            config,
            call_state: RefCell::new(CallState::new()),
            ctx_stack: RefCell::new(ExecutionContextStack::new()),
            folded_nodes: RefCell::new(FoldedNodeCache::new()),
            warning_sink: Box::new(TracingSink),
        }
    }

    pub fn config(&self) -> &OlooConfig {
        &self.config
    }

    /// Replaces the sink that receives non-fatal warnings such as malformed debug tags. The
    /// default sink logs through `tracing`.
    pub fn set_warning_sink(&mut self, sink: Box<dyn WarningSink>) {
        self.warning_sink = sink;
    }

    pub(crate) fn warn(&self, warning: &OlooError) {
        self.warning_sink.warn(warning);
    }

    pub fn create(&self, prototype: Option<NodeRef>) -> NodeRef {
        chain::create(prototype)
    }

    pub fn link(&self, base: &NodeRef, extension: &NodeRef) -> NodeRef {
        chain::link(self, base, extension)
    }

    pub fn link_folded(&self, base: &NodeRef, extension: &NodeRef) -> NodeRef {
        chain::link_folded(self, base, extension)
    }

    pub fn create_folded(&self, extension: &NodeRef) -> NodeRef {
        chain::create_folded(self, extension)
    }

    pub fn invoke(
        &self,
        instance: &NodeRef,
        method: &str,
        args: Vec<Value>,
    ) -> Result<Value, OlooError> {
        dispatch::invoke(self, instance, method, args)
    }

    pub fn call_base(
        &self,
        instance: &NodeRef,
        method: &str,
        args: Vec<Value>,
    ) -> Result<Value, OlooError> {
        dispatch::call_base(self, instance, method, args)
    }

    pub fn call_base_fn(
        &self,
        instance: &NodeRef,
        function: &FunctionRef,
        args: Vec<Value>,
    ) -> Result<Value, OlooError> {
        dispatch::call_base_fn(self, instance, function, args)
    }

    pub fn call_base_inferred(
        &self,
        instance: &NodeRef,
        args: Vec<Value>,
    ) -> Result<Value, OlooError> {
        dispatch::call_base_inferred(self, instance, args)
    }

    pub fn get(&self, node: &NodeRef, property: &str) -> Result<Value, OlooError> {
        object::get(self, node, &PropertyKey::from(property), node)
    }

    pub fn set(&self, node: &NodeRef, property: &str, value: Value) -> Result<bool, OlooError> {
        object::set(self, node, PropertyKey::from(property), value, node)
    }

    /// One line per chain level: `node`, then each delegate, with link boundaries and debug
    /// tags marked.
    ///
    /// ```text
    /// [object Object] {name}
    /// -> [object Dog] (link) {bark, displayName}
    /// -> [object Animal] (link) {displayName, speak}
    /// ```
    pub fn describe(&self, node: &NodeRef) -> String {
        chain_of(node)
            .iter()
            .enumerate()
            .map(|(i, level)| {
                let level = level.borrow();
                let keys = level
                    .own_property_keys()
                    .iter()
                    .map(|k| k.to_string())
                    .collect::<Vec<String>>()
                    .join(", ");
                format!(
                    "{}{}{} {{{}}}",
                    if i == 0 { "" } else { "-> " },
                    level,
                    if level.is_chain_root() { " (link)" } else { "" },
                    keys
                )
            })
            .collect::<Vec<String>>()
            .join("\n")
    }

    /// Number of (receiver, method) pairs with a base call in flight.
    pub fn pending_base_calls(&self) -> usize {
        self.call_state.borrow().len()
    }

    /// Method currently running, if any call made through this handle is in progress.
    pub fn running_method(&self) -> Option<String> {
        self.running_execution_ctx().map(|c| c.method)
    }

    pub(crate) fn call_state(&self) -> Ref<'_, CallState> {
        self.call_state.borrow()
    }

    pub(crate) fn call_state_mut(&self) -> RefMut<'_, CallState> {
        self.call_state.borrow_mut()
    }

    pub(crate) fn folded_nodes(&self) -> Ref<'_, FoldedNodeCache> {
        self.folded_nodes.borrow()
    }

    pub(crate) fn folded_nodes_mut(&self) -> RefMut<'_, FoldedNodeCache> {
        self.folded_nodes.borrow_mut()
    }

    pub(crate) fn running_execution_ctx(&self) -> Option<ExecutionContext> {
        self.ctx_stack.borrow().get_running_execution_ctx().cloned()
    }

    pub(crate) fn push_execution_ctx(&self, ctx: ExecutionContext) {
        self.ctx_stack.borrow_mut().push_execution_ctx(ctx);
    }

    pub(crate) fn pop_execution_ctx(&self) {
        self.ctx_stack.borrow_mut().pop_running_execution_ctx();
    }
}

impl Default for Oloo {
    fn default() -> Self {
        Self::new()
    }
}

/// Expands `base!(ctx, this, method(a, b))` into
/// `ctx.call_base(this, "method", vec![Value::from(a), Value::from(b)])`, so the method name
/// never has to be spelled as a string.
#[macro_export]
macro_rules! base {
    ($ctx:expr, $this:expr, $method:ident ( $($arg:expr),* $(,)? )) => {
        $ctx.call_base(
            $this,
            stringify!($method),
            vec![$($crate::runner::ds::value::Value::from($arg)),*],
        )
    };
}
