// Copyright 2026 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public value types: phases, callback handles, dispatch context, options.

use alloc::rc::Rc;
use core::fmt;

/// Propagation phase of a dispatch visit, and the phase selector accepted by
/// registration, removal, and trigger options.
///
/// Stored entries are tagged `Capture`, `Target`, or `Bubble`. A registration
/// requested with `Both` is expanded into two physical entries, one tagged
/// [`Phase::Capture`] and one tagged [`Phase::Bubble`]; `Both` itself is
/// never stored and never appears in a [`Context`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Fires on ancestor nodes while descending from the root towards the
    /// target.
    Capture,
    /// Fires at the dispatched node itself (and at descendants when a
    /// trigger traverses).
    Target,
    /// Fires on ancestor nodes while ascending from the target back towards
    /// the root.
    Bubble,
    /// On registration: store a capture entry and a bubble entry. On
    /// trigger: run every pass unfiltered.
    Both,
}

/// Passed to every callback alongside the payload.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Context<'a> {
    /// Phase of this visit. Never [`Phase::Both`].
    pub phase: Phase,
    /// Dot-path of the node being visited: grows during capture, shrinks
    /// during bubble, and names each descendant's own path during traversal.
    pub event: &'a str,
    /// The name the trigger was called with, constant for the whole call.
    pub trigger: &'a str,
}

/// Shared, identity-comparable handle to a registered callback.
///
/// Two handles compare equal iff one is a clone of the other; a fresh
/// [`Callback::new`] over an identical closure is a distinct handle. Keep a
/// clone around to remove the registration selectively later.
pub struct Callback<T = ()>(Rc<dyn Fn(Option<&T>, Context<'_>)>);

impl<T> Callback<T> {
    /// Wraps a closure in a shareable handle.
    pub fn new(callback: impl Fn(Option<&T>, Context<'_>) + 'static) -> Self {
        Self(Rc::new(callback))
    }

    pub(crate) fn call(&self, data: Option<&T>, context: Context<'_>) {
        (self.0)(data, context);
    }
}

impl<T> Clone for Callback<T> {
    fn clone(&self) -> Self {
        Self(Rc::clone(&self.0))
    }
}

impl<T> PartialEq for Callback<T> {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl<T> Eq for Callback<T> {}

impl<T> fmt::Debug for Callback<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Callback({:p})", Rc::as_ptr(&self.0))
    }
}

/// Construction options for [`EventHub`](crate::EventHub).
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct HubOptions {
    /// Whether one callback may be stored more than once at a node with the
    /// same phase tag. Defaults to `true`.
    pub allow_multiple: bool,
}

impl Default for HubOptions {
    fn default() -> Self {
        Self {
            allow_multiple: true,
        }
    }
}

/// Options accepted by [`on`](crate::EventHub::on) and
/// [`one`](crate::EventHub::one).
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct OnOptions {
    /// Phase tag to store; `Both` stores a capture and a bubble entry.
    pub phase: Phase,
    /// Insert before existing entries instead of after them. Dispatch walks
    /// a node's entries back-to-front, so prepended entries fire last.
    pub prepend: bool,
    /// Remove the entry right after it first fires. Forced on by `one`.
    pub is_one: bool,
}

impl Default for OnOptions {
    fn default() -> Self {
        Self {
            phase: Phase::Target,
            prepend: false,
            is_one: false,
        }
    }
}

/// Options accepted by [`off`](crate::EventHub::off).
///
/// Matching is strict: an entry is removed only when its stored tag equals
/// `phase` exactly. The default `Target` matches plain registrations only,
/// never capture- or bubble-tagged ones, and `Both` matches nothing because
/// `Both` is never stored.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct OffOptions {
    /// Phase tag the stored entry must carry.
    pub phase: Phase,
    /// When set, the stored one-shot flag must match; `None` matches either.
    pub is_one: Option<bool>,
    /// Also remove matches from every descendant node.
    pub traverse: bool,
}

impl Default for OffOptions {
    fn default() -> Self {
        Self {
            phase: Phase::Target,
            is_one: None,
            traverse: false,
        }
    }
}

/// Options accepted by [`trigger`](crate::EventHub::trigger).
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct TriggerOptions {
    /// Which passes run. `Both`, the default, runs capture, target, and
    /// bubble. `Capture` runs capture plus target, `Bubble` runs bubble
    /// plus target, and `Target` runs the target pass alone. The target
    /// pass always fires target-tagged entries only.
    pub phase: Phase,
    /// After the target pass, repeat it at every descendant node in
    /// pre-order, skipping disabled subtrees.
    pub traverse: bool,
}

impl Default for TriggerOptions {
    fn default() -> Self {
        Self {
            phase: Phase::Both,
            traverse: false,
        }
    }
}

/// Options for operations that can cascade into descendant nodes:
/// [`enable`](crate::EventHub::enable), [`disable`](crate::EventHub::disable),
/// and [`triggers_for`](crate::EventHub::triggers_for).
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct TraverseOptions {
    /// Apply to every descendant of the resolved node as well.
    pub traverse: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn callback_equality_is_identity() {
        let a: Callback<i32> = Callback::new(|_, _| {});
        let b = a.clone();
        let c: Callback<i32> = Callback::new(|_, _| {});
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_ne!(b, c);
    }

    #[test]
    fn option_defaults() {
        assert!(HubOptions::default().allow_multiple);
        let on = OnOptions::default();
        assert_eq!(on.phase, Phase::Target);
        assert!(!on.prepend);
        assert!(!on.is_one);
        let off = OffOptions::default();
        assert_eq!(off.phase, Phase::Target);
        assert_eq!(off.is_one, None);
        assert!(!off.traverse);
        let trigger = TriggerOptions::default();
        assert_eq!(trigger.phase, Phase::Both);
        assert!(!trigger.traverse);
        assert!(!TraverseOptions::default().traverse);
    }
}
