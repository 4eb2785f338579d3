//! Chain construction: splicing an extension object into a base object's delegate chain.
//!
//! After `link(base, ext)` the chain read from `base` is
//!
//! ```text
//! base -> copy of ext -> copies of ext's own ancestors -> base's previous delegate -> ...
//! ```
//!
//! Every inserted level is a separate node, so accessors keep working and base calls can
//! still step from one level to the next. `base` keeps its identity and its own properties.
//! The extension object is never modified.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::{Rc, Weak};

use tracing::{debug, trace};
use uuid::Uuid;

use crate::runner::api::Oloo;
use crate::runner::debug_tag::extract_debug_tag;
use crate::runner::ds::object::{Node, NodeRef};
use crate::runner::ds::object_property::PropertyDescriptor;
use crate::runner::ds::operations::object::{
    create_node, get_prototype_of, is_in_chain,
};

/// Shared nodes produced by [`link_folded`], keyed by the extension and by the delegate the
/// shared node continues into. Entries are weak: a shared node no chain refers to anymore is
/// rebuilt on next use.
#[derive(Default)]
pub struct FoldedNodeCache {
    nodes: HashMap<(Uuid, Option<Uuid>), Weak<RefCell<Node>>>,
}

impl FoldedNodeCache {
    pub fn new() -> Self {
        FoldedNodeCache::default()
    }

    fn get(&self, key: &(Uuid, Option<Uuid>)) -> Option<NodeRef> {
        self.nodes.get(key).and_then(|weak| weak.upgrade())
    }

    fn insert(&mut self, key: (Uuid, Option<Uuid>), node: &NodeRef) {
        self.nodes.retain(|_, weak| weak.strong_count() > 0);
        self.nodes.insert(key, Rc::downgrade(node));
    }

    /// Number of shared nodes still alive.
    pub fn live_count(&self) -> usize {
        self.nodes
            .values()
            .filter(|weak| weak.strong_count() > 0)
            .count()
    }
}

/// New node whose delegate is exactly `prototype`.
pub fn create(prototype: Option<NodeRef>) -> NodeRef {
    create_node(prototype)
}

/// Inserts a copy of `extension` (and of its own ancestors) directly above `base`.
/// Returns `base`.
pub fn link(ctx: &Oloo, base: &NodeRef, extension: &NodeRef) -> NodeRef {
    let old_proto = get_prototype_of(base);

    let inserted = copy_level(extension, |_| true);
    {
        let mut node = inserted.borrow_mut();
        node.mark_chain_root();
        if let Some(tag) = debug_tag_for(ctx, extension) {
            node.set_debug_tag(tag);
        }
    }

    let tail = splice_ancestors(get_prototype_of(extension), old_proto);
    inserted.borrow_mut().replace_prototype(tail);
    base.borrow_mut().replace_prototype(Some(inserted.clone()));

    debug!(
        base = %base.borrow().id(),
        inserted = %inserted.borrow().id(),
        "linked extension"
    );
    base.clone()
}

/// Like [`link`], but plain data and function properties of `extension` land on a node
/// shared by every instance linked to the same `extension` over the same previous delegate.
/// Accessors are copied onto a per-instance node between `base` and the shared node, which
/// is only created when `extension` has accessors.
///
/// The shared node is visible to every instance that delegates through it: mutating it from
/// one instance changes all of them.
pub fn link_folded(ctx: &Oloo, base: &NodeRef, extension: &NodeRef) -> NodeRef {
    let old_proto = get_prototype_of(base);
    let key = (
        extension.borrow().id(),
        old_proto.as_ref().map(|p| p.borrow().id()),
    );
    let tag = debug_tag_for(ctx, extension);

    let cached = ctx.folded_nodes().get(&key);
    let shared = match cached {
        Some(shared) => {
            trace!(extension = %key.0, "reusing folded node");
            shared
        }
        None => {
            let shared = copy_level(extension, |d| d.is_enumerable() && d.is_data_descriptor());
            {
                let mut node = shared.borrow_mut();
                node.mark_chain_root();
                if let Some(tag) = &tag {
                    node.set_debug_tag(tag.clone());
                }
            }
            let tail = splice_ancestors(get_prototype_of(extension), old_proto);
            shared.borrow_mut().replace_prototype(tail);
            ctx.folded_nodes_mut().insert(key, &shared);
            shared
        }
    };

    let has_accessors = extension
        .borrow()
        .own_properties()
        .any(|(_, d)| d.is_enumerable() && d.is_accessor_descriptor());
    let nearest = if has_accessors {
        let accessors = copy_level(extension, |d| {
            d.is_enumerable() && d.is_accessor_descriptor()
        });
        {
            let mut node = accessors.borrow_mut();
            node.mark_chain_root();
            node.replace_prototype(Some(shared));
            if let Some(tag) = tag {
                node.set_debug_tag(tag);
            }
        }
        accessors
    } else {
        shared
    };
    base.borrow_mut().replace_prototype(Some(nearest));

    debug!(base = %base.borrow().id(), has_accessors, "linked folded extension");
    base.clone()
}

/// A fresh object with `extension` folded in.
pub fn create_folded(ctx: &Oloo, extension: &NodeRef) -> NodeRef {
    link_folded(ctx, &create(None), extension)
}

/// A new node holding the descriptors of `source` selected by `keep`. Link-boundary markers
/// and tags travel with the copy.
fn copy_level<F>(source: &NodeRef, keep: F) -> NodeRef
where
    F: Fn(&PropertyDescriptor) -> bool,
{
    let source = source.borrow();
    let mut copy = Node::new();
    for (key, descriptor) in source.own_properties() {
        if keep(descriptor) {
            copy.define_own_property(key.clone(), descriptor.clone());
        }
    }
    if source.is_chain_root() {
        copy.mark_chain_root();
    }
    if let Some(tag) = source.debug_tag() {
        copy.set_debug_tag(tag.to_string());
    }
    copy.into_ref()
}

/// Copies the ancestors starting at `ancestor` one level at a time, ending in `old_proto`.
/// Copying stops at the first ancestor already on `old_proto`'s chain so a shared ancestor
/// is not duplicated.
fn splice_ancestors(ancestor: Option<NodeRef>, old_proto: Option<NodeRef>) -> Option<NodeRef> {
    let mut levels = vec![];
    let mut p = ancestor;
    while let Some(some_p) = p {
        if let Some(old) = &old_proto {
            if is_in_chain(Some(old.clone()), &some_p) {
                break;
            }
        }
        p = get_prototype_of(&some_p);
        levels.push(some_p);
    }

    let mut tail = old_proto;
    for level in levels.iter().rev() {
        let copy = copy_level(level, |_| true);
        copy.borrow_mut().replace_prototype(tail);
        tail = Some(copy);
    }
    tail
}

fn debug_tag_for(ctx: &Oloo, extension: &NodeRef) -> Option<String> {
    if !ctx.config().debug_tags {
        return None;
    }
    let found = extract_debug_tag(&extension.borrow());
    match found? {
        Ok(tag) => Some(tag),
        Err(warning) => {
            ctx.warn(&warning);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::ds::object_property::DISPLAY_NAME_PROP;
    use crate::runner::ds::operations::object::{chain_of, same_node};
    use crate::runner::ds::value::Value;

    fn with_props(props: &[(&str, Value)]) -> NodeRef {
        let node = create(None);
        for (k, v) in props {
            node.borrow_mut()
                .define_own_property((*k).into(), PropertyDescriptor::data(v.clone()));
        }
        node
    }

    #[test]
    fn test_create_sets_delegate() {
        let p = create(None);
        let a = create(Some(p.clone()));
        assert!(same_node(&get_prototype_of(&a).unwrap(), &p));
        assert!(get_prototype_of(&create(None)).is_none());
    }

    #[test]
    fn test_link_inserts_marked_copy_and_keeps_extension_untouched() {
        let ctx = Oloo::new();
        let old = create(None);
        let base = create(Some(old.clone()));
        let ext = with_props(&[("x", Value::Number(1.0))]);

        let returned = link(&ctx, &base, &ext);
        assert!(same_node(&returned, &base));

        let chain = chain_of(&base);
        assert_eq!(chain.len(), 3);
        assert!(!same_node(&chain[1], &ext));
        assert!(chain[1].borrow().is_chain_root());
        assert!(chain[1].borrow().has_own_property(&"x".into()));
        assert!(same_node(&chain[2], &old));
        assert!(get_prototype_of(&ext).is_none());
    }

    #[test]
    fn test_link_splices_extension_ancestors_as_separate_levels() {
        let ctx = Oloo::new();
        let grand = with_props(&[("g", Value::Null)]);
        let ext = create(Some(grand.clone()));
        ext.borrow_mut()
            .define_own_property("e".into(), PropertyDescriptor::data(Value::Null));
        let old = with_props(&[("o", Value::Null)]);
        let base = create(Some(old.clone()));

        link(&ctx, &base, &ext);
        let chain = chain_of(&base);
        assert_eq!(chain.len(), 4);
        assert!(chain[1].borrow().has_own_property(&"e".into()));
        assert!(chain[2].borrow().has_own_property(&"g".into()));
        assert!(!same_node(&chain[2], &grand));
        assert!(same_node(&chain[3], &old));
        // the original ancestor still ends its own chain
        assert!(get_prototype_of(&grand).is_none());
    }

    #[test]
    fn test_shared_ancestor_is_not_duplicated() {
        let ctx = Oloo::new();
        let shared = with_props(&[("s", Value::Null)]);
        let ext = create(Some(shared.clone()));
        let base = create(Some(shared.clone()));

        link(&ctx, &base, &ext);
        let chain = chain_of(&base);
        assert_eq!(chain.len(), 3);
        assert!(same_node(&chain[2], &shared));
    }

    #[test]
    fn test_link_attaches_debug_tag() {
        let ctx = Oloo::new();
        let ext = with_props(&[("greet", Value::Null)]);
        ext.borrow_mut().define_own_property(
            DISPLAY_NAME_PROP.clone(),
            PropertyDescriptor::data(Value::from("Greeter")),
        );
        let base = link(&ctx, &create(None), &ext);
        let inserted = get_prototype_of(&base).unwrap();
        assert_eq!(inserted.borrow().debug_tag(), Some("Greeter"));
    }

    #[test]
    fn test_folded_cache_releases_dead_nodes() {
        let ctx = Oloo::new();
        let ext = with_props(&[("m", Value::Null)]);
        {
            let _a = create_folded(&ctx, &ext);
            assert_eq!(ctx.folded_nodes().live_count(), 1);
        }
        assert_eq!(ctx.folded_nodes().live_count(), 0);
        let _b = create_folded(&ctx, &ext);
        assert_eq!(ctx.folded_nodes().live_count(), 1);
    }
}
