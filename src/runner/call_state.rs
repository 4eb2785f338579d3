//! Progress of in-flight base calls.
//!
//! For every receiver with a base call in progress, and for every method name being resolved
//! on it, remembers the node whose implementation was most recently entered. An entry lives
//! exactly as long as the outermost base call for its (receiver, method) pair.

use std::collections::HashMap;

use uuid::Uuid;

use crate::runner::ds::object::NodeRef;

#[derive(Default)]
pub struct CallState {
    entries: HashMap<Uuid, HashMap<String, NodeRef>>,
}

impl CallState {
    pub fn new() -> Self {
        CallState::default()
    }

    pub fn last_resolved(&self, root: Uuid, method: &str) -> Option<NodeRef> {
        self.entries.get(&root)?.get(method).cloned()
    }

    /// Records `node` as the level now running for (`root`, `method`) and hands back the level
    /// it displaced.
    pub fn record(&mut self, root: Uuid, method: &str, node: NodeRef) -> Option<NodeRef> {
        self.entries
            .entry(root)
            .or_insert_with(HashMap::new)
            .insert(method.to_string(), node)
    }

    /// Puts back what [`CallState::record`] or [`CallState::suspend`] displaced. `None`
    /// deletes the entry.
    pub fn restore(&mut self, root: Uuid, method: &str, previous: Option<NodeRef>) {
        match previous {
            Some(node) => {
                self.record(root, method, node);
            }
            None => {
                self.suspend(root, method);
            }
        }
    }

    /// Takes the entry for (`root`, `method`) out, dropping the receiver's map once empty.
    pub fn suspend(&mut self, root: Uuid, method: &str) -> Option<NodeRef> {
        let methods = self.entries.get_mut(&root)?;
        let node = methods.remove(method);
        if methods.is_empty() {
            self.entries.remove(&root);
        }
        node
    }

    pub fn contains(&self, root: Uuid, method: &str) -> bool {
        self.entries
            .get(&root)
            .map_or(false, |methods| methods.contains_key(method))
    }

    /// Number of live (receiver, method) entries.
    pub fn len(&self) -> usize {
        self.entries.values().map(|methods| methods.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
