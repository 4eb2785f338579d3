//! Method invocation and base calls.
//!
//! A base call runs the next implementation of a method further up the receiver's delegate
//! chain while keeping the receiver itself as `this`. Nothing in the graph says which level
//! is currently running, so the resolver reconstructs it:
//!
//! * On the first base call for a (receiver, method) pair the running level is whatever an
//!   ordinary lookup from the receiver lands on, i.e. the nearest owner of the method. The
//!   search for the base implementation starts one level above it.
//! * While that call is in flight, [`CallState`](crate::runner::call_state::CallState)
//!   remembers the level it entered. A nested base call for the same pair, made from inside
//!   that level's body, resumes one level above the remembered one.
//! * When a base call returns, the entry it displaced is put back. The outermost call
//!   therefore leaves no entry behind, and a later independent call starts from the top.
//!   Restoring on every level, rather than leaving cleanup to the outermost call only, means
//!   a body that makes two base calls reaches the same ancestor both times.
//! * An ordinary [`invoke`] of the same method on the same receiver starts a new sequence:
//!   the entry is set aside for the length of that call and put back afterwards.
//!
//! Base calls for one receiver must nest strictly; a base call deferred and run after its
//! enclosing call has returned starts over as a first call.

use tracing::trace;
use uuid::Uuid;

use crate::runner::api::Oloo;
use crate::runner::ds::error::OlooError;
use crate::runner::ds::execution_context::ExecutionContext;
use crate::runner::ds::function_object::FunctionRef;
use crate::runner::ds::object::NodeRef;
use crate::runner::ds::object_property::{PropertyDescriptor, PropertyKey};
use crate::runner::ds::operations::object::{
    find_owner, get, get_own_property, get_prototype_of,
};
use crate::runner::ds::value::Value;

/// Calls `method` on `instance` the ordinary way: nearest implementation, `instance` as
/// receiver. The call is recorded as the running execution context.
pub fn invoke(
    ctx: &Oloo,
    instance: &NodeRef,
    method: &str,
    args: Vec<Value>,
) -> Result<Value, OlooError> {
    let key = PropertyKey::from(method);
    let function = match get(ctx, instance, &key, instance)? {
        Value::Function(f) => f,
        _ => return Err(OlooError::NotCallable(method.to_string())),
    };
    let _suspended = SuspendedResolution::enter(ctx, instance.borrow().id(), method);
    let _frame = ContextFrame::enter(ctx, instance, method);
    function.call(ctx, instance, args)
}

/// Calls the next implementation of `method` above the one currently running for
/// `instance`, with `instance` as receiver.
pub fn call_base(
    ctx: &Oloo,
    instance: &NodeRef,
    method: &str,
    args: Vec<Value>,
) -> Result<Value, OlooError> {
    let root = instance.borrow().id();
    let key = PropertyKey::from(method);
    let resumed = ctx.call_state().last_resolved(root, method);

    let start = match &resumed {
        Some(last) => get_prototype_of(last),
        None => find_owner(Some(instance.clone()), &key).and_then(|running| get_prototype_of(&running)),
    };
    let owner = match find_owner(start, &key) {
        Some(owner) => owner,
        None => {
            return Err(OlooError::ChainExhausted {
                instance: describe_instance(instance),
                method: method.to_string(),
            })
        }
    };
    trace!(
        root = %root,
        method,
        owner = %owner.borrow().id(),
        nested = resumed.is_some(),
        "resolved base call"
    );

    let function = method_of(ctx, &owner, &key, instance, method)?;
    let _resolution = ResolutionFrame::enter(ctx, root, method, owner);
    let _frame = ContextFrame::enter(ctx, instance, method);
    function.call(ctx, instance, args)
}

/// [`call_base`] naming the method by one of its function objects. A `bound ` prefix on the
/// function name is ignored.
pub fn call_base_fn(
    ctx: &Oloo,
    instance: &NodeRef,
    function: &FunctionRef,
    args: Vec<Value>,
) -> Result<Value, OlooError> {
    let name = function.name().trim_start_matches("bound ").trim();
    if name.is_empty() {
        return Err(OlooError::UnresolvableCallerName);
    }
    call_base(ctx, instance, name, args)
}

/// [`call_base`] for the method currently running on `instance`, taken from the execution
/// context stack. Fails when nothing is running or the running method belongs to another
/// receiver.
pub fn call_base_inferred(
    ctx: &Oloo,
    instance: &NodeRef,
    args: Vec<Value>,
) -> Result<Value, OlooError> {
    let receiver = instance.borrow().id();
    let method = ctx
        .running_execution_ctx()
        .filter(|running| running.receiver == receiver)
        .map(|running| running.method)
        .ok_or(OlooError::UnresolvableCallerName)?;
    call_base(ctx, instance, &method, args)
}

/// The nearest debug tag on `node`'s chain, or the generic object label.
pub fn describe_instance(node: &NodeRef) -> String {
    let mut p = Some(node.clone());
    while let Some(some_p) = p {
        {
            let n = some_p.borrow();
            if let Some(tag) = n.debug_tag() {
                if n.is_chain_root() {
                    return tag.to_string();
                }
            }
        }
        p = get_prototype_of(&some_p);
    }
    node.borrow().to_string()
}

fn method_of(
    ctx: &Oloo,
    owner: &NodeRef,
    key: &PropertyKey,
    instance: &NodeRef,
    method: &str,
) -> Result<FunctionRef, OlooError> {
    let value = match get_own_property(owner, key) {
        Some(PropertyDescriptor::Data { value, .. }) => value,
        Some(PropertyDescriptor::Accessor { get: Some(getter), .. }) => {
            getter.call(ctx, instance, Vec::new())?
        }
        _ => Value::Undefined,
    };
    match value {
        Value::Function(f) => Ok(f),
        _ => Err(OlooError::NotCallable(method.to_string())),
    }
}

/// Holds the CallState entry for one base call and restores the displaced entry on exit,
/// whether the call returned or failed.
struct ResolutionFrame<'a> {
    ctx: &'a Oloo,
    root: Uuid,
    method: &'a str,
    previous: Option<NodeRef>,
}

impl<'a> ResolutionFrame<'a> {
    fn enter(ctx: &'a Oloo, root: Uuid, method: &'a str, owner: NodeRef) -> Self {
        let previous = ctx.call_state_mut().record(root, method, owner);
        ResolutionFrame {
            ctx,
            root,
            method,
            previous,
        }
    }
}

impl Drop for ResolutionFrame<'_> {
    fn drop(&mut self) {
        self.ctx
            .call_state_mut()
            .restore(self.root, self.method, self.previous.take());
    }
}

/// Hides an in-flight resolution from a fresh call of the same method.
struct SuspendedResolution<'a> {
    ctx: &'a Oloo,
    root: Uuid,
    method: &'a str,
    suspended: Option<NodeRef>,
}

impl<'a> SuspendedResolution<'a> {
    fn enter(ctx: &'a Oloo, root: Uuid, method: &'a str) -> Self {
        let suspended = ctx.call_state_mut().suspend(root, method);
        SuspendedResolution {
            ctx,
            root,
            method,
            suspended,
        }
    }
}

impl Drop for SuspendedResolution<'_> {
    fn drop(&mut self) {
        self.ctx
            .call_state_mut()
            .restore(self.root, self.method, self.suspended.take());
    }
}

struct ContextFrame<'a> {
    ctx: &'a Oloo,
}

impl<'a> ContextFrame<'a> {
    fn enter(ctx: &'a Oloo, instance: &NodeRef, method: &str) -> Self {
        ctx.push_execution_ctx(ExecutionContext {
            method: method.to_string(),
            receiver: instance.borrow().id(),
        });
        ContextFrame { ctx }
    }
}

impl Drop for ContextFrame<'_> {
    fn drop(&mut self) {
        self.ctx.pop_execution_ctx();
    }
}
