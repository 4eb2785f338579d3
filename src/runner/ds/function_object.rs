use std::fmt;
use std::rc::Rc;

use crate::runner::api::Oloo;
use crate::runner::ds::error::OlooError;
use crate::runner::ds::object::NodeRef;
use crate::runner::ds::value::Value;

/// Signature of every callable stored in the graph. The receiver is always the node the
/// call was made on, never the node that owns the function.
pub type NativeFn = dyn Fn(&Oloo, &NodeRef, Vec<Value>) -> Result<Value, OlooError>;

pub type FunctionRef = Rc<FunctionObject>;

pub struct FunctionObject {
    name: String,
    body: Box<NativeFn>,
}
impl FunctionObject {
    pub fn new<F>(name: &str, body: F) -> FunctionRef
    where
        F: Fn(&Oloo, &NodeRef, Vec<Value>) -> Result<Value, OlooError> + 'static,
    {
        Rc::new(FunctionObject {
            name: name.to_string(),
            body: Box::new(body),
        })
    }

    /// Wraps a zero-argument closure as an accessor getter.
    pub fn getter<F>(name: &str, body: F) -> FunctionRef
    where
        F: Fn(&Oloo, &NodeRef) -> Result<Value, OlooError> + 'static,
    {
        FunctionObject::new(name, move |ctx, this, _args| body(ctx, this))
    }

    /// Wraps a one-argument closure as an accessor setter. A missing argument arrives as
    /// `Value::Undefined`.
    pub fn setter<F>(name: &str, body: F) -> FunctionRef
    where
        F: Fn(&Oloo, &NodeRef, Value) -> Result<(), OlooError> + 'static,
    {
        FunctionObject::new(name, move |ctx, this, args| {
            let value = args.into_iter().next().unwrap_or(Value::Undefined);
            body(ctx, this, value)?;
            Ok(Value::Undefined)
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn call(&self, ctx: &Oloo, this: &NodeRef, args: Vec<Value>) -> Result<Value, OlooError> {
        (self.body)(ctx, this, args)
    }
}
impl fmt::Debug for FunctionObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FunctionObject({})", self.name)
    }
}
