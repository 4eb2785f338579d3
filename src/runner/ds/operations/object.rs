use std::rc::Rc;

use crate::runner::api::Oloo;
use crate::runner::ds::error::OlooError;
use crate::runner::ds::object::{Node, NodeRef};
use crate::runner::ds::object_property::{PropertyDescriptor, PropertyKey};
use crate::runner::ds::value::Value;

pub fn create_node(prototype: Option<NodeRef>) -> NodeRef {
    Node::with_prototype(prototype).into_ref()
}

pub fn same_node(a: &NodeRef, b: &NodeRef) -> bool {
    Rc::ptr_eq(a, b)
}

pub fn get_prototype_of(node: &NodeRef) -> Option<NodeRef> {
    node.borrow().get_prototype_of()
}

/// Points `node` at `prototype`. Refuses (returns `false`) when `node` is reachable from
/// `prototype`, since that would close a loop.
pub fn set_prototype_of(node: &NodeRef, prototype: Option<NodeRef>) -> bool {
    if let Some(new_value) = &prototype {
        if is_in_chain(Some(new_value.clone()), node) {
            return false;
        }
    }
    node.borrow_mut().replace_prototype(prototype);
    true
}

/// Whether `target` is `start` or one of its ancestors.
pub fn is_in_chain(start: Option<NodeRef>, target: &NodeRef) -> bool {
    let mut p = start;
    while let Some(some_p) = p {
        if same_node(&some_p, target) {
            return true;
        }
        p = get_prototype_of(&some_p);
    }
    false
}

/// The node itself followed by every ancestor, nearest first.
pub fn chain_of(node: &NodeRef) -> Vec<NodeRef> {
    let mut chain = vec![];
    let mut p = Some(node.clone());
    while let Some(some_p) = p {
        p = get_prototype_of(&some_p);
        chain.push(some_p);
    }
    chain
}

/// Nearest node, starting at `start` inclusive, that owns `property` directly.
pub fn find_owner(start: Option<NodeRef>, property: &PropertyKey) -> Option<NodeRef> {
    let mut p = start;
    while let Some(some_p) = p {
        if some_p.borrow().has_own_property(property) {
            return Some(some_p);
        }
        p = get_prototype_of(&some_p);
    }
    None
}

pub fn get_own_property(node: &NodeRef, property: &PropertyKey) -> Option<PropertyDescriptor> {
    node.borrow().get_own_property(property).cloned()
}

/// Property read through the delegate chain. Getters run against `receiver`.
pub fn get(
    ctx: &Oloo,
    node: &NodeRef,
    property: &PropertyKey,
    receiver: &NodeRef,
) -> Result<Value, OlooError> {
    let descriptor = match find_owner(Some(node.clone()), property) {
        None => return Ok(Value::Undefined),
        Some(owner) => get_own_property(&owner, property),
    };
    match descriptor {
        None => Ok(Value::Undefined),
        Some(PropertyDescriptor::Data { value, .. }) => Ok(value),
        Some(PropertyDescriptor::Accessor { get, .. }) => match get {
            None => Ok(Value::Undefined),
            Some(getter) => getter.call(ctx, receiver, Vec::new()),
        },
    }
}

/// Property write through the delegate chain. A setter anywhere on the chain runs against
/// `receiver`; a writable data property anywhere results in an own property on `receiver`.
pub fn set(
    ctx: &Oloo,
    node: &NodeRef,
    property: PropertyKey,
    value: Value,
    receiver: &NodeRef,
) -> Result<bool, OlooError> {
    let owner = match find_owner(Some(node.clone()), &property) {
        None => {
            return Ok(receiver
                .borrow_mut()
                .define_own_property(property, PropertyDescriptor::data(value)));
        }
        Some(owner) => owner,
    };
    match get_own_property(&owner, &property) {
        None => Ok(false),
        Some(PropertyDescriptor::Accessor { set, .. }) => match set {
            None => Ok(false),
            Some(setter) => {
                setter.call(ctx, receiver, vec![value])?;
                Ok(true)
            }
        },
        Some(PropertyDescriptor::Data {
            writable,
            enumerable,
            configurable,
            ..
        }) => {
            if !writable {
                return Ok(false);
            }
            let descriptor = if same_node(&owner, receiver) {
                PropertyDescriptor::Data {
                    value,
                    writable,
                    enumerable,
                    configurable,
                }
            } else {
                PropertyDescriptor::data(value)
            };
            Ok(receiver.borrow_mut().define_own_property(property, descriptor))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::ds::function_object::FunctionObject;

    #[test]
    fn test_set_prototype_of_refuses_cycles() {
        let a = create_node(None);
        let b = create_node(Some(a.clone()));
        assert!(!set_prototype_of(&a, Some(b.clone())));
        assert!(!set_prototype_of(&a, Some(a.clone())));
        assert!(get_prototype_of(&a).is_none());
    }

    #[test]
    fn test_find_owner_is_inclusive_of_start() {
        let top = create_node(None);
        top.borrow_mut()
            .define_own_property("m".into(), PropertyDescriptor::data(Value::Null));
        let leaf = create_node(Some(top.clone()));
        let owner = find_owner(Some(leaf.clone()), &"m".into()).unwrap();
        assert!(same_node(&owner, &top));
        let owner = find_owner(Some(top.clone()), &"m".into()).unwrap();
        assert!(same_node(&owner, &top));
        assert!(find_owner(Some(leaf), &"missing".into()).is_none());
    }

    #[test]
    fn test_chain_of_lists_nearest_first() {
        let top = create_node(None);
        let mid = create_node(Some(top.clone()));
        let leaf = create_node(Some(mid.clone()));
        let chain = chain_of(&leaf);
        assert_eq!(chain.len(), 3);
        assert!(same_node(&chain[1], &mid));
        assert!(same_node(&chain[2], &top));
    }

    #[test]
    fn test_inherited_write_creates_own_property_on_receiver() {
        let ctx = Oloo::new();
        let proto = create_node(None);
        proto
            .borrow_mut()
            .define_own_property("count".into(), PropertyDescriptor::data(Value::Number(0.0)));
        let leaf = create_node(Some(proto.clone()));
        assert!(set(&ctx, &leaf, "count".into(), Value::Number(5.0), &leaf).unwrap());
        assert_eq!(get(&ctx, &leaf, &"count".into(), &leaf).unwrap(), Value::Number(5.0));
        assert_eq!(get(&ctx, &proto, &"count".into(), &proto).unwrap(), Value::Number(0.0));
    }

    #[test]
    fn test_read_only_inherited_property_refuses_write() {
        let ctx = Oloo::new();
        let proto = create_node(None);
        proto
            .borrow_mut()
            .define_own_property("id".into(), PropertyDescriptor::read_only(Value::Number(1.0)));
        let leaf = create_node(Some(proto));
        assert!(!set(&ctx, &leaf, "id".into(), Value::Number(2.0), &leaf).unwrap());
        assert!(!leaf.borrow().has_own_property(&"id".into()));
    }

    #[test]
    fn test_write_to_own_non_configurable_writable_property() {
        let ctx = Oloo::new();
        let node = create_node(None);
        node.borrow_mut().define_own_property(
            "x".into(),
            PropertyDescriptor::Data {
                value: Value::Number(1.0),
                writable: true,
                enumerable: true,
                configurable: false,
            },
        );
        assert!(set(&ctx, &node, "x".into(), Value::Number(2.0), &node).unwrap());
        assert_eq!(get(&ctx, &node, &"x".into(), &node).unwrap(), Value::Number(2.0));
        assert!(!node.borrow().get_own_property(&"x".into()).unwrap().is_configurable());
    }

    #[test]
    fn test_accessor_runs_against_receiver() {
        let ctx = Oloo::new();
        let proto = create_node(None);
        let get_fn = FunctionObject::getter("name", |ctx, this| {
            get(ctx, this, &"_name".into(), this)
        });
        let set_fn = FunctionObject::setter("name", |ctx, this, value| {
            set(ctx, this, "_name".into(), value, this)?;
            Ok(())
        });
        proto.borrow_mut().define_own_property(
            "name".into(),
            PropertyDescriptor::accessor(Some(get_fn), Some(set_fn)),
        );
        let leaf = create_node(Some(proto.clone()));
        assert!(set(&ctx, &leaf, "name".into(), "leaf".into(), &leaf).unwrap());
        assert_eq!(get(&ctx, &leaf, &"name".into(), &leaf).unwrap(), Value::from("leaf"));
        assert!(leaf.borrow().has_own_property(&"_name".into()));
        assert!(!proto.borrow().has_own_property(&"_name".into()));
    }
}
