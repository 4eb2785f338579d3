#![allow(dead_code)]

extern crate oloo;

use std::cell::RefCell;
use std::rc::Rc;

use oloo::runner::api::Oloo;
use oloo::runner::ds::error::OlooError;
use oloo::runner::ds::function_object::{FunctionObject, FunctionRef};
use oloo::runner::ds::object::NodeRef;
use oloo::runner::ds::object_property::{PropertyDescriptor, DISPLAY_NAME_PROP};
use oloo::runner::ds::value::Value;

/// Shared call log the method bodies append to.
pub type CallLog = Rc<RefCell<Vec<String>>>;

pub fn new_log() -> CallLog {
    Rc::new(RefCell::new(Vec::new()))
}

pub fn entries(log: &CallLog) -> Vec<String> {
    log.borrow().clone()
}

/// A standalone extension object holding the given methods.
pub fn extension(ctx: &Oloo, methods: Vec<(&str, FunctionRef)>) -> NodeRef {
    let ext = ctx.create(None);
    for (name, f) in methods {
        define_value(&ext, name, Value::Function(f));
    }
    ext
}

pub fn define_value(node: &NodeRef, name: &str, value: Value) {
    node.borrow_mut()
        .define_own_property(name.into(), PropertyDescriptor::data(value));
}

pub fn define_accessor(node: &NodeRef, name: &str, get: Option<FunctionRef>, set: Option<FunctionRef>) {
    node.borrow_mut()
        .define_own_property(name.into(), PropertyDescriptor::accessor(get, set));
}

pub fn tag(node: &NodeRef, display_name: &str) {
    node.borrow_mut().define_own_property(
        DISPLAY_NAME_PROP.clone(),
        PropertyDescriptor::data(Value::from(display_name)),
    );
}

/// A method that returns `label`.
pub fn constant(label: &'static str) -> FunctionRef {
    FunctionObject::new("m", move |_, _, _| Ok(Value::from(label)))
}

/// A method named `method` that logs `label`, makes a base call and returns
/// `label>` followed by whatever the base call produced. A failed base call is logged and
/// turned into `label` alone.
pub fn overriding(method: &'static str, label: &'static str, log: &CallLog) -> FunctionRef {
    let log = log.clone();
    FunctionObject::new(method, move |ctx, this, args| {
        log.borrow_mut().push(label.to_string());
        match ctx.call_base(this, method, args) {
            Ok(v) => Ok(Value::from(format!("{}>{}", label, v))),
            Err(OlooError::ChainExhausted { .. }) => {
                log.borrow_mut().push(format!("{}:exhausted", label));
                Ok(Value::from(label))
            }
            Err(e) => Err(e),
        }
    })
}
