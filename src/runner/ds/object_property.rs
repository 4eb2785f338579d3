use std::fmt;
use std::rc::Rc;

use crate::runner::ds::function_object::FunctionRef;
use crate::runner::ds::symbol::SymbolData;
use crate::runner::ds::value::Value;

lazy_static! {
    pub static ref DISPLAY_NAME_PROP: PropertyKey = PropertyKey::Str("displayName".to_string());
    pub static ref CONSTRUCTOR_PROP: PropertyKey = PropertyKey::Str("constructor".to_string());
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum PropertyKey {
    Str(String),
    Sym(SymbolData),
}
impl From<&str> for PropertyKey {
    fn from(s: &str) -> Self {
        PropertyKey::Str(s.to_string())
    }
}
impl From<String> for PropertyKey {
    fn from(s: String) -> Self {
        PropertyKey::Str(s)
    }
}
impl From<SymbolData> for PropertyKey {
    fn from(s: SymbolData) -> Self {
        PropertyKey::Sym(s)
    }
}
impl fmt::Display for PropertyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyKey::Str(s) => write!(f, "{}", s),
            PropertyKey::Sym(s) => write!(f, "{}", s),
        }
    }
}

#[derive(Clone, Debug)]
pub enum PropertyDescriptor {
    Data {
        value: Value,
        writable: bool,
        enumerable: bool,
        configurable: bool,
    },
    Accessor {
        get: Option<FunctionRef>,
        set: Option<FunctionRef>,
        enumerable: bool,
        configurable: bool,
    },
}
impl PropertyDescriptor {
    /// Plain writable, enumerable, configurable data property.
    pub fn data(value: Value) -> Self {
        PropertyDescriptor::Data {
            value,
            writable: true,
            enumerable: true,
            configurable: true,
        }
    }

    pub fn read_only(value: Value) -> Self {
        PropertyDescriptor::Data {
            value,
            writable: false,
            enumerable: true,
            configurable: true,
        }
    }

    pub fn accessor(get: Option<FunctionRef>, set: Option<FunctionRef>) -> Self {
        PropertyDescriptor::Accessor {
            get,
            set,
            enumerable: true,
            configurable: true,
        }
    }

    pub fn is_enumerable(&self) -> bool {
        match self {
            PropertyDescriptor::Data { enumerable, .. } => *enumerable,
            PropertyDescriptor::Accessor { enumerable, .. } => *enumerable,
        }
    }

    pub fn is_configurable(&self) -> bool {
        match self {
            PropertyDescriptor::Data { configurable, .. } => *configurable,
            PropertyDescriptor::Accessor { configurable, .. } => *configurable,
        }
    }

    pub fn is_data_descriptor(&self) -> bool {
        match self {
            PropertyDescriptor::Data { .. } => true,
            PropertyDescriptor::Accessor { .. } => false,
        }
    }

    pub fn is_accessor_descriptor(&self) -> bool {
        !self.is_data_descriptor()
    }

    pub fn value(&self) -> Option<&Value> {
        match self {
            PropertyDescriptor::Data { value, .. } => Some(value),
            PropertyDescriptor::Accessor { .. } => None,
        }
    }
}
impl PartialEq for PropertyDescriptor {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (
                PropertyDescriptor::Data {
                    value,
                    writable,
                    enumerable,
                    configurable,
                },
                PropertyDescriptor::Data {
                    value: other_value,
                    writable: other_writable,
                    enumerable: other_enumerable,
                    configurable: other_configurable,
                },
            ) => {
                value == other_value
                    && writable == other_writable
                    && enumerable == other_enumerable
                    && configurable == other_configurable
            }
            (
                PropertyDescriptor::Accessor {
                    get,
                    set,
                    enumerable,
                    configurable,
                },
                PropertyDescriptor::Accessor {
                    get: other_get,
                    set: other_set,
                    enumerable: other_enumerable,
                    configurable: other_configurable,
                },
            ) => {
                same_function(get, other_get)
                    && same_function(set, other_set)
                    && enumerable == other_enumerable
                    && configurable == other_configurable
            }
            _ => false,
        }
    }
}

fn same_function(a: &Option<FunctionRef>, b: &Option<FunctionRef>) -> bool {
    match (a, b) {
        (None, None) => true,
        (Some(a), Some(b)) => Rc::ptr_eq(a, b),
        _ => false,
    }
}
