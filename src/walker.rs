//! Depth-first, pre-order traversal over the host scene graph.
//!
//! A node that is invisible, locked or removed is skipped together with its
//! whole subtree. Containers recurse into their children in order; text
//! leaves are handed to the visitor. Traversal uses an explicit stack so
//! deep trees cannot exhaust the call stack.

use crate::scene::{Document, NodeKind};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WalkOptions {
    /// Also skip text nodes whose direct parent is a component instance.
    pub exclude_instance_children: bool,
}

/// Eligibility filter applied at every node before visiting or recursing.
pub fn is_eligible<D: Document>(doc: &D, id: D::NodeId, options: WalkOptions) -> bool {
    if !doc.is_visible(id) || doc.is_locked(id) || doc.is_removed(id) {
        return false;
    }
    if options.exclude_instance_children
        && doc.kind(id) == NodeKind::Text
        && doc
            .parent(id)
            .is_some_and(|parent| doc.is_component_instance(parent))
    {
        return false;
    }
    true
}

/// Permissive check used to enable the UI's start control: is there any text
/// node among `roots` or their descendants, ignoring visibility, lock and
/// removal state? The rewrite pass itself applies the strict filter.
pub fn selection_has_text<D: Document>(doc: &D, roots: &[D::NodeId]) -> bool {
    let mut stack: Vec<D::NodeId> = roots.to_vec();
    while let Some(id) = stack.pop() {
        match doc.kind(id) {
            NodeKind::Text => return true,
            NodeKind::Container => stack.extend(doc.children(id)),
            NodeKind::Other => {}
        }
    }
    false
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TreeWalker {
    options: WalkOptions,
}

impl TreeWalker {
    pub fn new(options: WalkOptions) -> Self {
        Self { options }
    }

    /// Eligible text nodes under `roots`, in visiting order.
    pub fn text_nodes<D: Document>(&self, doc: &D, roots: &[D::NodeId]) -> Vec<D::NodeId> {
        let mut found = Vec::new();
        let mut stack: Vec<D::NodeId> = roots.iter().rev().copied().collect();
        while let Some(id) = self.next_text(doc, &mut stack) {
            found.push(id);
        }
        found
    }

    /// Visit every eligible text node under `roots`, awaiting each visit
    /// before moving on. The first error stops the traversal.
    pub async fn traverse<D, E, F>(
        &self,
        doc: &mut D,
        roots: &[D::NodeId],
        mut visit: F,
    ) -> Result<(), E>
    where
        D: Document,
        F: AsyncFnMut(&mut D, D::NodeId) -> Result<(), E>,
    {
        let mut stack: Vec<D::NodeId> = roots.iter().rev().copied().collect();
        while let Some(id) = self.next_text(&*doc, &mut stack) {
            visit(&mut *doc, id).await?;
        }
        Ok(())
    }

    /// Pop nodes until the next eligible text node, expanding containers.
    fn next_text<D: Document>(&self, doc: &D, stack: &mut Vec<D::NodeId>) -> Option<D::NodeId> {
        while let Some(id) = stack.pop() {
            if !is_eligible(doc, id, self.options) {
                continue;
            }
            match doc.kind(id) {
                NodeKind::Text => return Some(id),
                NodeKind::Container => stack.extend(doc.children(id).into_iter().rev()),
                NodeKind::Other => {}
            }
        }
        None
    }
}
