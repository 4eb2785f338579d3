use std::fmt;
use std::fmt::{Display, Formatter};
use std::rc::Rc;

use crate::runner::ds::function_object::FunctionRef;
use crate::runner::ds::object::NodeRef;
use crate::runner::ds::symbol::SymbolData;

#[derive(Clone)]
pub enum Value {
    Undefined,
    Null,
    Boolean(bool),
    Number(f64),
    String(String),
    Symbol(SymbolData),
    Object(NodeRef),
    Function(FunctionRef),
}
impl Value {
    /// `false` for `undefined`, `null`, `false`, `0`, `NaN` and the empty string.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Undefined | Value::Null => false,
            Value::Boolean(b) => *b,
            Value::Number(n) => *n != 0.0 && !n.is_nan(),
            Value::String(s) => !s.is_empty(),
            Value::Symbol(_) | Value::Object(_) | Value::Function(_) => true,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

}
impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}
impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}
impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}
impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}
impl From<FunctionRef> for Value {
    fn from(f: FunctionRef) -> Self {
        Value::Function(f)
    }
}
impl From<NodeRef> for Value {
    fn from(o: NodeRef) -> Self {
        Value::Object(o)
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Value::Undefined => write!(f, "undefined"),
            Value::Null => write!(f, "null"),
            Value::Boolean(b) => write!(f, "{}", b),
            Value::Number(n) => write!(f, "{}", n),
            Value::String(s) => write!(f, "{}", s),
            Value::Symbol(s) => write!(f, "{}", s),
            Value::Object(o) => write!(f, "{}", o.borrow()),
            Value::Function(func) => write!(f, "function {}() {{ [native code] }}", func.name()),
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Value::Undefined => write!(f, "Value::Undefined"),
            Value::Null => write!(f, "Value::Null"),
            Value::Boolean(b) => write!(f, "Value::Boolean({})", b),
            Value::Number(n) => write!(f, "Value::Number({})", n),
            Value::String(s) => write!(f, "Value::String({:?})", s),
            Value::Symbol(s) => write!(f, "Value::Symbol({})", s),
            Value::Object(o) => write!(f, "Value::Object({})", o.borrow()),
            Value::Function(func) => write!(f, "Value::Function({})", func.name()),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Undefined, Value::Undefined) => true,
            (Value::Null, Value::Null) => true,
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Symbol(a), Value::Symbol(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => Rc::ptr_eq(a, b),
            (Value::Function(a), Value::Function(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}
