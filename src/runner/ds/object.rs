use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use uuid::Uuid;

use crate::runner::ds::object_property::{PropertyDescriptor, PropertyKey};

pub type NodeRef = Rc<RefCell<Node>>;

/// One object in the delegate graph: its own properties plus a single delegate link.
pub struct Node {
    id: Uuid,
    properties: HashMap<PropertyKey, PropertyDescriptor>,
    prototype: Option<NodeRef>,
    chain_root: bool,
    debug_tag: Option<String>,
}
impl Node {
    pub fn new() -> Self {
        Node {
            id: Uuid::new_v4(),
            properties: HashMap::new(),
            prototype: None,
            chain_root: false,
            debug_tag: None,
        }
    }

    pub fn with_prototype(prototype: Option<NodeRef>) -> Self {
        Node {
            prototype,
            ..Node::new()
        }
    }

    pub fn into_ref(self) -> NodeRef {
        Rc::new(RefCell::new(self))
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn get_prototype_of(&self) -> Option<NodeRef> {
        self.prototype.clone()
    }

    /// Raw delegate assignment. Only the chain builder, whose inserted levels are always
    /// fresh nodes, uses it directly; everything else goes through the cycle-refusing
    /// `operations::object::set_prototype_of`.
    pub(crate) fn replace_prototype(&mut self, prototype: Option<NodeRef>) {
        self.prototype = prototype;
    }

    /// True when this node was inserted by the chain builder at a link boundary.
    pub fn is_chain_root(&self) -> bool {
        self.chain_root
    }

    pub(crate) fn mark_chain_root(&mut self) {
        self.chain_root = true;
    }

    pub fn debug_tag(&self) -> Option<&str> {
        self.debug_tag.as_deref()
    }

    pub(crate) fn set_debug_tag(&mut self, tag: String) {
        self.debug_tag = Some(tag);
    }

    pub fn get_own_property(&self, property: &PropertyKey) -> Option<&PropertyDescriptor> {
        self.properties.get(property)
    }

    pub fn has_own_property(&self, property: &PropertyKey) -> bool {
        self.properties.contains_key(property)
    }

    /// Defines or replaces an own property. A non-configurable property only accepts a new
    /// value (and losing `writable`) while it is still writable.
    pub fn define_own_property(
        &mut self,
        property: PropertyKey,
        descriptor: PropertyDescriptor,
    ) -> bool {
        if let Some(current) = self.properties.get(&property) {
            if !is_compatible_redefinition(current, &descriptor) {
                return false;
            }
        }
        self.properties.insert(property, descriptor);
        true
    }

    pub fn delete(&mut self, property: &PropertyKey) -> bool {
        match self.properties.get(property) {
            None => true,
            Some(pd) => {
                if pd.is_configurable() {
                    self.properties.remove(property);
                    true
                } else {
                    false
                }
            }
        }
    }

    /// String keys in sorted order, followed by symbol keys.
    pub fn own_property_keys(&self) -> Vec<PropertyKey> {
        let mut str_keys = vec![];
        let mut sym_keys = vec![];
        for key in self.properties.keys() {
            match key {
                PropertyKey::Str(s) => str_keys.push(s.to_string()),
                PropertyKey::Sym(s) => sym_keys.push(s.clone()),
            }
        }
        str_keys.sort();
        sym_keys.sort_by(|a, b| a.description().cmp(b.description()));

        let mut result = Vec::with_capacity(str_keys.len() + sym_keys.len());
        result.extend(str_keys.into_iter().map(PropertyKey::Str));
        result.extend(sym_keys.into_iter().map(PropertyKey::Sym));
        result
    }

    pub fn own_properties(&self) -> impl Iterator<Item = (&PropertyKey, &PropertyDescriptor)> {
        self.properties.iter()
    }

}

fn is_compatible_redefinition(current: &PropertyDescriptor, new: &PropertyDescriptor) -> bool {
    if current.is_configurable() || current == new {
        return true;
    }
    match (current, new) {
        (
            PropertyDescriptor::Data {
                writable: true,
                enumerable,
                ..
            },
            PropertyDescriptor::Data {
                enumerable: new_enumerable,
                configurable: false,
                ..
            },
        ) => enumerable == new_enumerable,
        _ => false,
    }
}

impl Default for Node {
    fn default() -> Self {
        Node::new()
    }
}
impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.debug_tag {
            Some(tag) => write!(f, "[object {}]", tag),
            None => write!(f, "[object Object]"),
        }
    }
}
impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("id", &self.id)
            .field("keys", &self.own_property_keys())
            .field("chain_root", &self.chain_root)
            .field("debug_tag", &self.debug_tag)
            .field("has_prototype", &self.prototype.is_some())
            .finish()
    }
}
