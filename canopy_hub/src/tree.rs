// Copyright 2026 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Arena-backed namespace tree.
//!
//! Nodes live in a slab `Vec`; slot 0 is the root, which always exists and
//! never holds registrations. Nodes are only ever removed wholesale by
//! [`Tree::reset`], which bumps the epoch so that previously issued ids go
//! stale instead of aliasing fresh nodes.

use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::vec::Vec;

use crate::types::{Callback, Phase};

/// Handle to a node: slot index plus the epoch it was issued in.
///
/// An id is live while its epoch matches the tree's. [`Tree::reset`] bumps
/// the epoch, invalidating every id issued before it.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) struct NodeId(u32, u32);

impl NodeId {
    const fn new(slot: u32, epoch: u32) -> Self {
        Self(slot, epoch)
    }

    const fn idx(self) -> usize {
        self.0 as usize
    }
}

/// One stored registration.
pub(crate) struct Registration<T> {
    pub(crate) callback: Callback<T>,
    pub(crate) phase: Phase,
    pub(crate) is_one: bool,
}

/// Per-node callback list and dispatch state.
pub(crate) struct Stack<T> {
    callbacks: Vec<Registration<T>>,
    pub(crate) disabled: bool,
    pub(crate) triggers: u64,
}

impl<T> Stack<T> {
    fn new() -> Self {
        Self {
            callbacks: Vec::new(),
            disabled: false,
            triggers: 0,
        }
    }

    /// Insert at the chosen end. Dispatch walks back-to-front, so appended
    /// entries fire before older ones and prepended entries fire last.
    pub(crate) fn add(&mut self, registration: Registration<T>, prepend: bool) {
        if prepend {
            self.callbacks.insert(0, registration);
        } else {
            self.callbacks.push(registration);
        }
    }

    /// True if an entry with this callback identity and exact phase tag is
    /// already stored.
    pub(crate) fn contains(&self, callback: &Callback<T>, phase: Phase) -> bool {
        self.callbacks
            .iter()
            .any(|entry| entry.phase == phase && entry.callback == *callback)
    }

    /// Walk entries tagged `phase` back-to-front, handing each match to
    /// `visit`. With `consume`, one-shot matches are spliced out at their
    /// index as they are visited; entries not yet visited keep their slots.
    pub(crate) fn select(
        &mut self,
        phase: Phase,
        consume: bool,
        mut visit: impl FnMut(&Callback<T>),
    ) {
        let mut i = self.callbacks.len();
        while i > 0 {
            i -= 1;
            if self.callbacks[i].phase != phase {
                continue;
            }
            let is_one = self.callbacks[i].is_one;
            visit(&self.callbacks[i].callback);
            if consume && is_one {
                self.callbacks.remove(i);
            }
        }
    }

    /// Remove entries matching the `off` filter, back-to-front, returning
    /// how many matched. Phase matching is exact; an `is_one` of `None`
    /// matches either flag; a missing callback matches any entry. Without
    /// `mutate`, matches are only counted.
    pub(crate) fn remove_matching(
        &mut self,
        callback: Option<&Callback<T>>,
        phase: Phase,
        is_one: Option<bool>,
        mutate: bool,
    ) -> usize {
        let mut removed = 0;
        let mut i = self.callbacks.len();
        while i > 0 {
            i -= 1;
            let entry = &self.callbacks[i];
            let matches = entry.phase == phase
                && callback.is_none_or(|cb| entry.callback == *cb)
                && is_one.is_none_or(|one| entry.is_one == one);
            if matches {
                removed += 1;
                if mutate {
                    self.callbacks.remove(i);
                }
            }
        }
        removed
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.callbacks.len()
    }
}

struct Node<T> {
    parent: Option<NodeId>,
    children: BTreeMap<String, NodeId>,
    stack: Stack<T>,
}

impl<T> Node<T> {
    fn new(parent: Option<NodeId>) -> Self {
        Self {
            parent,
            children: BTreeMap::new(),
            stack: Stack::new(),
        }
    }
}

/// The namespace tree.
pub(crate) struct Tree<T> {
    nodes: Vec<Node<T>>,
    epoch: u32,
}

impl<T> Tree<T> {
    pub(crate) fn new() -> Self {
        let mut tree = Self {
            nodes: Vec::new(),
            epoch: 0,
        };
        tree.nodes.push(Node::new(None));
        tree
    }

    /// The root id for the current epoch.
    pub(crate) fn root(&self) -> NodeId {
        NodeId::new(0, self.epoch)
    }

    /// Drop every node except a fresh, enabled root. Ids issued before the
    /// call go stale through the epoch bump.
    pub(crate) fn reset(&mut self) {
        self.nodes.clear();
        self.nodes.push(Node::new(None));
        self.epoch = self.epoch.saturating_add(1);
    }

    /// Returns true if `id` was issued in the current epoch.
    pub(crate) fn is_alive(&self, id: NodeId) -> bool {
        id.1 == self.epoch && id.idx() < self.nodes.len()
    }

    /// Follow `name` segment by segment from the root. The empty name
    /// resolves to the root itself; a missing segment resolves to `None`.
    /// Never creates nodes.
    pub(crate) fn resolve(&self, name: &str) -> Option<NodeId> {
        let mut id = self.root();
        if name.is_empty() {
            return Some(id);
        }
        for segment in name.split('.') {
            id = self.child(id, segment)?;
        }
        Some(id)
    }

    /// Like [`Tree::resolve`], but creates missing segments along the way.
    pub(crate) fn ensure(&mut self, name: &str) -> NodeId {
        let mut id = self.root();
        if name.is_empty() {
            return id;
        }
        for segment in name.split('.') {
            id = match self.child(id, segment) {
                Some(child) => child,
                None => self.insert_child(id, segment),
            };
        }
        id
    }

    fn insert_child(&mut self, parent: NodeId, segment: &str) -> NodeId {
        #[allow(
            clippy::cast_possible_truncation,
            reason = "an arena of more than u32::MAX nodes is out of scope"
        )]
        let slot = self.nodes.len() as u32;
        let id = NodeId::new(slot, self.epoch);
        self.nodes.push(Node::new(Some(parent)));
        self.node_mut(parent).children.insert(String::from(segment), id);
        id
    }

    /// The named child of `id`, if present.
    pub(crate) fn child(&self, id: NodeId, segment: &str) -> Option<NodeId> {
        self.node(id).children.get(segment).copied()
    }

    /// Children of `id` with their segment names, in segment order.
    pub(crate) fn children(&self, id: NodeId) -> Vec<(String, NodeId)> {
        self.node(id)
            .children
            .iter()
            .map(|(segment, child)| (segment.clone(), *child))
            .collect()
    }

    /// The parent of `id`; `None` only for the root.
    pub(crate) fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).parent
    }

    /// The stack of a live node; panics if `id` is stale.
    pub(crate) fn stack(&self, id: NodeId) -> &Stack<T> {
        &self.node(id).stack
    }

    /// Mutable stack of a live node; panics if `id` is stale.
    pub(crate) fn stack_mut(&mut self, id: NodeId) -> &mut Stack<T> {
        &mut self.node_mut(id).stack
    }

    /// Count a completed trigger against the node, if `id` is still live.
    /// Stale ids (the tree was reset mid-dispatch) are ignored.
    pub(crate) fn note_trigger(&mut self, id: NodeId) {
        if self.is_alive(id) {
            let stack = self.stack_mut(id);
            stack.triggers = stack.triggers.saturating_add(1);
        }
    }

    /// Number of nodes, root included.
    pub(crate) fn node_count(&self) -> usize {
        self.nodes.len()
    }

    fn node(&self, id: NodeId) -> &Node<T> {
        debug_assert!(self.is_alive(id), "stale NodeId");
        &self.nodes[id.idx()]
    }

    fn node_mut(&mut self, id: NodeId) -> &mut Node<T> {
        debug_assert!(self.is_alive(id), "stale NodeId");
        &mut self.nodes[id.idx()]
    }
}
