// Copyright 2026 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The hub: registration, three-pass dispatch, gating, counting, and the
//! simulation view.

use alloc::format;
use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;
use core::cell::{Cell, RefCell};
use core::fmt;

use crate::tree::{NodeId, Registration, Tree};
use crate::types::{
    Callback, Context, HubOptions, OffOptions, OnOptions, Phase, TraverseOptions, TriggerOptions,
};

/// How the dispatch core treats its work: perform it, or only report what
/// it would have been.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum DispatchMode {
    Live,
    Simulate,
}

/// One callback invocation scheduled by the planner.
struct PlannedCall<T> {
    callback: Callback<T>,
    phase: Phase,
    event: String,
}

/// An isolated, synchronous publish/subscribe hub over a dot-segmented
/// namespace tree.
///
/// Callbacks register against names like `a.b.c` and fire when a name is
/// triggered. A trigger runs up to three passes: capture (ancestors,
/// root→target), target (the named node, optionally descending through its
/// subtree), and bubble (ancestors, target→root). Entries tagged
/// [`Phase::Capture`] or [`Phase::Bubble`] fire only in their pass on
/// ancestor nodes; untagged ([`Phase::Target`]) entries fire only at
/// dispatched nodes.
///
/// All methods take `&self`: state sits behind interior mutability so that
/// callbacks may call back into the hub mid-dispatch. Instances are fully
/// independent of each other and neither `Send` nor `Sync`.
///
/// ```
/// use canopy_hub::{Callback, EventHub, OnOptions, TriggerOptions};
///
/// let hub: EventHub<u32> = EventHub::new();
/// let seen = Callback::new(|data: Option<&u32>, context| {
///     assert_eq!(data.copied(), Some(7));
///     assert_eq!(context.event, "sensor.door");
/// });
/// hub.on("sensor.door", &seen, OnOptions::default());
/// assert_eq!(hub.trigger("sensor.door", Some(&7), TriggerOptions::default()), 1);
/// ```
pub struct EventHub<T = ()> {
    tree: RefCell<Tree<T>>,
    allow_multiple: Cell<bool>,
    name_index: Cell<u64>,
}

impl<T> Default for EventHub<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for EventHub<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventHub")
            .field("nodes", &self.tree.borrow().node_count())
            .field("allow_multiple", &self.allow_multiple.get())
            .finish_non_exhaustive()
    }
}

impl<T> EventHub<T> {
    /// Creates a hub with default options.
    pub fn new() -> Self {
        Self::with_options(HubOptions::default())
    }

    /// Creates a hub with explicit options.
    pub fn with_options(options: HubOptions) -> Self {
        Self {
            tree: RefCell::new(Tree::new()),
            allow_multiple: Cell::new(options.allow_multiple),
            name_index: Cell::new(0),
        }
    }

    /// Registers `callback` under `name`, creating intermediate nodes as
    /// needed. Returns `true` iff at least one entry was stored.
    ///
    /// An empty name is invalid input: it logs a warning and stores
    /// nothing. When `allow_multiple` is off, an entry with the same
    /// callback identity and the same phase tag already stored at the node
    /// rejects the registration; a [`Phase::Both`] request is rejected
    /// whole if either of its two halves would collide.
    pub fn on(&self, name: &str, callback: &Callback<T>, options: OnOptions) -> bool {
        self.add(name, callback, options, DispatchMode::Live)
    }

    /// Registers a one-shot: the stored entry is removed right after it
    /// first fires. Otherwise identical to [`EventHub::on`].
    pub fn one(&self, name: &str, callback: &Callback<T>, options: OnOptions) -> bool {
        self.add(
            name,
            callback,
            OnOptions {
                is_one: true,
                ..options
            },
            DispatchMode::Live,
        )
    }

    /// Removes entries at `name` matching the filter, returning how many
    /// were removed. A missing path removes nothing.
    ///
    /// Matching is strict: the stored phase tag must equal `options.phase`
    /// exactly (so the default `Target` never touches capture- or
    /// bubble-tagged entries), `options.is_one` of `Some` must equal the
    /// stored flag, and a given `callback` must be the identical handle.
    /// With `traverse`, every descendant node is filtered too, disabled or
    /// not.
    pub fn off(&self, name: &str, callback: Option<&Callback<T>>, options: OffOptions) -> usize {
        self.remove(name, callback, options, DispatchMode::Live)
    }

    /// Fires callbacks for `name` and returns how many ran.
    ///
    /// The passes selected by `options.phase` run in capture, target,
    /// bubble order; within one node entries fire back-to-front
    /// (most-recently-added first, prepended last). Afterwards the target
    /// node's trigger counter increments by one, whether or not anything
    /// fired. A missing or disabled target is a complete no-op returning 0.
    /// The empty name targets the root, which holds no registrations and
    /// no counter but descends over the whole tree when `traverse` is set.
    ///
    /// The invocation list is planned before anything runs: one-shots are
    /// consumed and the visit order fixed up front. A callback reentering
    /// the hub sees the tree after those plan-time effects, and removals it
    /// performs do not retract invocations already planned for this call.
    pub fn trigger(&self, name: &str, data: Option<&T>, options: TriggerOptions) -> usize {
        self.dispatch(name, data, options, DispatchMode::Live)
    }

    /// Clears the disabled flag on `name` and, with `traverse`, on its
    /// whole subtree. Missing names are ignored. Chainable.
    pub fn enable(&self, name: &str, options: TraverseOptions) -> &Self {
        self.set_disabled(name, false, options);
        self
    }

    /// Sets the disabled flag on `name` and, with `traverse`, on its whole
    /// subtree. Missing names are ignored. Chainable.
    ///
    /// A disabled node cannot be triggered, contributes no capture or
    /// bubble callbacks when visited as an ancestor, and is skipped
    /// subtree and all by trigger traversal.
    pub fn disable(&self, name: &str, options: TraverseOptions) -> &Self {
        self.set_disabled(name, true, options);
        self
    }

    /// True if `name` exists and is disabled.
    pub fn is_disabled(&self, name: &str) -> bool {
        let tree = self.tree.borrow();
        match tree.resolve(name) {
            Some(id) => tree.stack(id).disabled,
            None => false,
        }
    }

    /// Number of trigger calls that targeted exactly `name`. With
    /// `traverse`, sums over the whole subtree, disabled nodes included.
    /// Missing names count 0, as does the root (the empty name).
    pub fn triggers_for(&self, name: &str, options: TraverseOptions) -> u64 {
        let tree = self.tree.borrow();
        let Some(target) = tree.resolve(name) else {
            return 0;
        };
        let mut total = tree.stack(target).triggers;
        if options.traverse {
            let mut pending = tree.children(target);
            while let Some((_, id)) = pending.pop() {
                total += tree.stack(id).triggers;
                pending.extend(tree.children(id));
            }
        }
        total
    }

    /// Toggles whether one callback may be stored twice at a node with the
    /// same phase tag. Chainable.
    pub fn set_allow_multiple(&self, state: bool) -> &Self {
        self.allow_multiple.set(state);
        self
    }

    /// Hands out `"--eh--0"`, `"--eh--1"`, and so on. Names are unique
    /// within this hub instance and never reused, [`EventHub::reset`]
    /// included.
    pub fn generate_unique_event_name(&self) -> String {
        let index = self.name_index.get();
        self.name_index.set(index + 1);
        format!("--eh--{index}")
    }

    /// Discards every node, registration, disabled flag, and trigger
    /// count, leaving a single empty, enabled root. The duplicate policy
    /// and the unique-name counter survive. Chainable.
    pub fn reset(&self) -> &Self {
        self.tree.borrow_mut().reset();
        self
    }

    /// The simulation view: same-named `on`/`one`/`off`/`trigger` that
    /// validate and count without touching the hub.
    pub fn fake(&self) -> Fake<'_, T> {
        Fake { hub: self }
    }

    fn add(
        &self,
        name: &str,
        callback: &Callback<T>,
        options: OnOptions,
        mode: DispatchMode,
    ) -> bool {
        if name.is_empty() {
            log::warn!("cannot register callback: empty event name");
            return false;
        }
        let mut tree = self.tree.borrow_mut();
        // Both expands into a capture-tagged and a bubble-tagged entry;
        // the duplicate check runs per stored half before either is added.
        let mut phases = match options.phase {
            Phase::Both => vec![Phase::Capture, Phase::Bubble],
            phase => vec![phase],
        };
        if !self.allow_multiple.get() {
            if let Some(node) = tree.resolve(name) {
                let stack = tree.stack(node);
                if phases.iter().any(|&phase| stack.contains(callback, phase)) {
                    return false;
                }
            }
        }
        if mode == DispatchMode::Simulate {
            return true;
        }
        let node = tree.ensure(name);
        let stack = tree.stack_mut(node);
        // The pair stays adjacent at the chosen end with the capture half
        // first: appended as [.., capture, bubble], prepended as
        // [capture, bubble, ..].
        if options.prepend {
            phases.reverse();
        }
        for phase in phases {
            stack.add(
                Registration {
                    callback: callback.clone(),
                    phase,
                    is_one: options.is_one,
                },
                options.prepend,
            );
        }
        true
    }

    fn remove(
        &self,
        name: &str,
        callback: Option<&Callback<T>>,
        options: OffOptions,
        mode: DispatchMode,
    ) -> usize {
        let mut tree = self.tree.borrow_mut();
        let Some(target) = tree.resolve(name) else {
            return 0;
        };
        let mutate = mode == DispatchMode::Live;
        let mut removed =
            tree.stack_mut(target)
                .remove_matching(callback, options.phase, options.is_one, mutate);
        if options.traverse {
            let mut pending = tree.children(target);
            while let Some((_, id)) = pending.pop() {
                removed +=
                    tree.stack_mut(id)
                        .remove_matching(callback, options.phase, options.is_one, mutate);
                pending.extend(tree.children(id));
            }
        }
        removed
    }

    fn dispatch(
        &self,
        name: &str,
        data: Option<&T>,
        options: TriggerOptions,
        mode: DispatchMode,
    ) -> usize {
        let live = mode == DispatchMode::Live;
        let mut counted = None;
        let plan = {
            let mut tree = self.tree.borrow_mut();
            let Some(target) = tree.resolve(name) else {
                return 0;
            };
            if tree.stack(target).disabled {
                return 0;
            }
            let mut plan: Vec<PlannedCall<T>> = Vec::new();
            let parts: Vec<&str> = if name.is_empty() {
                Vec::new()
            } else {
                name.split('.').collect()
            };

            // Capture: ancestors from just below the root down to the
            // target's parent, visited at their growing prefix paths.
            if matches!(options.phase, Phase::Both | Phase::Capture) && parts.len() > 1 {
                let mut id = tree.root();
                let mut path = String::new();
                for &segment in &parts[..parts.len() - 1] {
                    let Some(child) = tree.child(id, segment) else {
                        break;
                    };
                    id = child;
                    if !path.is_empty() {
                        path.push('.');
                    }
                    path.push_str(segment);
                    Self::plan_node(&mut tree, id, Phase::Capture, &path, live, &mut plan);
                }
            }

            // Target pass, then optional pre-order descent. A disabled
            // child is skipped along with its whole subtree.
            Self::plan_node(&mut tree, target, Phase::Target, name, live, &mut plan);
            if options.traverse {
                let mut pending: Vec<(NodeId, String)> = Vec::new();
                Self::queue_children(&tree, target, name, &mut pending);
                while let Some((id, path)) = pending.pop() {
                    if tree.stack(id).disabled {
                        continue;
                    }
                    Self::plan_node(&mut tree, id, Phase::Target, &path, live, &mut plan);
                    Self::queue_children(&tree, id, &path, &mut pending);
                }
            }

            // Bubble: the target's parent up to, excluding, the root,
            // visited at their shrinking prefix paths.
            if matches!(options.phase, Phase::Both | Phase::Bubble) && parts.len() > 1 {
                let root = tree.root();
                let mut upto = parts.len() - 1;
                let mut cursor = tree.parent(target);
                while let Some(id) = cursor {
                    if id == root {
                        break;
                    }
                    let path = parts[..upto].join(".");
                    Self::plan_node(&mut tree, id, Phase::Bubble, &path, live, &mut plan);
                    upto -= 1;
                    cursor = tree.parent(id);
                }
            }

            // The trigger lands on the target whether or not anything
            // fired. The root has no name and is never counted.
            if target != tree.root() {
                counted = Some(target);
            }
            plan
        };

        let fired = plan.len();
        if live {
            // No borrow is held here. Callbacks may freely reenter the
            // hub; the plan itself is fixed.
            for call in &plan {
                call.callback.call(
                    data,
                    Context {
                        phase: call.phase,
                        event: &call.event,
                        trigger: name,
                    },
                );
            }
            if let Some(id) = counted {
                self.tree.borrow_mut().note_trigger(id);
            }
        }
        fired
    }

    fn plan_node(
        tree: &mut Tree<T>,
        id: NodeId,
        phase: Phase,
        path: &str,
        consume: bool,
        plan: &mut Vec<PlannedCall<T>>,
    ) {
        if tree.stack(id).disabled {
            return;
        }
        tree.stack_mut(id).select(phase, consume, |callback| {
            plan.push(PlannedCall {
                callback: callback.clone(),
                phase,
                event: String::from(path),
            });
        });
    }

    /// Queue `id`'s children for a pre-order walk driven by popping off
    /// the back, so the reversal keeps segment order.
    fn queue_children(
        tree: &Tree<T>,
        id: NodeId,
        path: &str,
        pending: &mut Vec<(NodeId, String)>,
    ) {
        for (segment, child) in tree.children(id).into_iter().rev() {
            let child_path = if path.is_empty() {
                segment
            } else {
                format!("{path}.{segment}")
            };
            pending.push((child, child_path));
        }
    }

    fn set_disabled(&self, name: &str, disabled: bool, options: TraverseOptions) {
        let mut tree = self.tree.borrow_mut();
        let Some(target) = tree.resolve(name) else {
            return;
        };
        tree.stack_mut(target).disabled = disabled;
        if options.traverse {
            let mut pending = tree.children(target);
            while let Some((_, id)) = pending.pop() {
                tree.stack_mut(id).disabled = disabled;
                pending.extend(tree.children(id));
            }
        }
    }
}

/// Dry-run view of a hub, from [`EventHub::fake`].
///
/// Every operation returns what its live counterpart would have, while the
/// hub is guaranteed untouched: no nodes are created, no entries stored or
/// removed, no one-shots consumed, no trigger counted, and no callback
/// invoked.
pub struct Fake<'a, T> {
    hub: &'a EventHub<T>,
}

impl<T> Fake<'_, T> {
    /// What [`EventHub::on`] would return, storing nothing.
    pub fn on(&self, name: &str, callback: &Callback<T>, options: OnOptions) -> bool {
        self.hub.add(name, callback, options, DispatchMode::Simulate)
    }

    /// What [`EventHub::one`] would return, storing nothing.
    pub fn one(&self, name: &str, callback: &Callback<T>, options: OnOptions) -> bool {
        self.hub.add(
            name,
            callback,
            OnOptions {
                is_one: true,
                ..options
            },
            DispatchMode::Simulate,
        )
    }

    /// How many entries [`EventHub::off`] would remove, removing none.
    pub fn off(&self, name: &str, callback: Option<&Callback<T>>, options: OffOptions) -> usize {
        self.hub.remove(name, callback, options, DispatchMode::Simulate)
    }

    /// How many callbacks [`EventHub::trigger`] would invoke, invoking
    /// none and consuming nothing.
    pub fn trigger(&self, name: &str, options: TriggerOptions) -> usize {
        self.hub.dispatch(name, None, options, DispatchMode::Simulate)
    }
}

impl<T> fmt::Debug for Fake<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Fake").field("hub", &self.hub).finish()
    }
}
