// Copyright 2026 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=canopy_hub --heading-base-level=0

//! Canopy Hub: an in-process, namespaced publish/subscribe hub.
//!
//! Event names form a tree of dot-separated segments (`app.menu.item`),
//! and a dispatch moves through that tree the way DOM events move through
//! elements: a capture pass from the root down, a target pass at the named
//! node, and a bubble pass back up. Everything is synchronous; triggering
//! an event runs the matching callbacks inline and returns how many fired.
//!
//! - Register with [`EventHub::on`] or the self-removing [`EventHub::one`],
//!   optionally tagged for the capture or bubble pass.
//! - Dispatch with [`EventHub::trigger`], optionally descending through a
//!   whole subtree.
//! - Inspect without committing via [`EventHub::fake`], which validates
//!   and counts but never mutates the hub or runs a callback.
//!
//! # Example
//!
//! ```rust
//! use canopy_hub::{Callback, EventHub, OnOptions, Phase, TriggerOptions};
//!
//! let hub: EventHub = EventHub::new();
//!
//! // Watch every dispatch under `ui` on the way back up.
//! hub.on(
//!     "ui",
//!     &Callback::new(|_, context| println!("bubbled through {}", context.event)),
//!     OnOptions {
//!         phase: Phase::Bubble,
//!         ..OnOptions::default()
//!     },
//! );
//! hub.on(
//!     "ui.button",
//!     &Callback::new(|_, _| println!("clicked")),
//!     OnOptions::default(),
//! );
//!
//! // Fires the entry at `ui.button`, then the bubble entry at `ui`.
//! assert_eq!(hub.trigger("ui.button", None, TriggerOptions::default()), 2);
//! ```
//!
//! # Dispatch order
//!
//! A trigger of `a.b.c` visits `a` and `a.b` in the capture pass (firing
//! their capture-tagged entries), then `a.b.c` itself (firing untagged
//! entries), then `a.b` and `a` in the bubble pass (firing bubble-tagged
//! entries). Within one node, entries fire most-recently-added first;
//! entries registered with `prepend` fire last. Registering for
//! [`Phase::Both`] stores a capture-tagged and a bubble-tagged entry, so
//! one callback can see a dispatch pass by in both directions.
//!
//! # Simulation
//!
//! Every mutating operation has a dry-run twin behind [`EventHub::fake`]
//! that reports what would happen. A faked trigger does not consume
//! one-shots and does not advance trigger counters:
//!
//! ```rust
//! use canopy_hub::{Callback, EventHub, OnOptions, TriggerOptions};
//!
//! let hub: EventHub = EventHub::new();
//! hub.one("net.retry", &Callback::new(|_, _| {}), OnOptions::default());
//!
//! assert_eq!(hub.fake().trigger("net.retry", TriggerOptions::default()), 1);
//! assert_eq!(hub.fake().trigger("net.retry", TriggerOptions::default()), 1);
//!
//! // The live dispatch consumes the one-shot.
//! assert_eq!(hub.trigger("net.retry", None, TriggerOptions::default()), 1);
//! assert_eq!(hub.trigger("net.retry", None, TriggerOptions::default()), 0);
//! ```
//!
//! This crate is `no_std` and uses `alloc`. Hubs are single-threaded;
//! callbacks may freely call back into the hub that invoked them.

#![no_std]

extern crate alloc;

pub mod hub;
pub mod types;

mod tree;

pub use hub::{EventHub, Fake};
pub use types::{
    Callback, Context, HubOptions, OffOptions, OnOptions, Phase, TraverseOptions, TriggerOptions,
};

#[cfg(test)]
mod tests {
    use alloc::format;
    use alloc::rc::Rc;
    use alloc::string::String;
    use alloc::vec::Vec;
    use core::cell::RefCell;

    use super::*;

    #[test]
    fn register_dispatch_and_remove_end_to_end() {
        let log: Rc<RefCell<Vec<String>>> = Rc::new(RefCell::new(Vec::new()));
        let tag = |name: &str| {
            let log = Rc::clone(&log);
            let name = String::from(name);
            Callback::new(move |_, context: Context<'_>| {
                log.borrow_mut().push(format!("{name}@{}", context.event));
            })
        };

        let hub: EventHub = EventHub::new();
        let up = tag("up");
        hub.on(
            "app",
            &up,
            OnOptions {
                phase: Phase::Bubble,
                ..OnOptions::default()
            },
        );
        hub.on("app.menu", &tag("menu"), OnOptions::default());
        hub.on("app.menu.item", &tag("item"), OnOptions::default());

        assert_eq!(hub.trigger("app.menu", None, TriggerOptions::default()), 2);
        assert_eq!(*log.borrow(), ["menu@app.menu", "up@app"]);
        log.borrow_mut().clear();

        let descend = TriggerOptions {
            traverse: true,
            ..TriggerOptions::default()
        };
        assert_eq!(hub.trigger("app.menu", None, descend), 3);
        assert_eq!(
            *log.borrow(),
            ["menu@app.menu", "item@app.menu.item", "up@app"]
        );

        assert_eq!(
            hub.off(
                "app",
                Some(&up),
                OffOptions {
                    phase: Phase::Bubble,
                    ..OffOptions::default()
                }
            ),
            1
        );
        assert_eq!(hub.trigger("app.menu", None, TriggerOptions::default()), 1);
    }

    #[test]
    fn simulation_never_touches_the_hub() {
        let hub: EventHub = EventHub::new();
        hub.one("job.done", &Callback::new(|_, _| {}), OnOptions::default());

        assert_eq!(hub.fake().trigger("job.done", TriggerOptions::default()), 1);
        assert_eq!(hub.fake().off("job.done", None, OffOptions::default()), 1);
        assert_eq!(hub.triggers_for("job.done", TraverseOptions::default()), 0);

        assert_eq!(hub.trigger("job.done", None, TriggerOptions::default()), 1);
        assert_eq!(hub.trigger("job.done", None, TriggerOptions::default()), 0);
        assert_eq!(hub.triggers_for("job.done", TraverseOptions::default()), 2);
    }
}
