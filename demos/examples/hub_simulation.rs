// Copyright 2026 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Previewing a dispatch without running it.
//!
//! The simulation view counts what a trigger would do while leaving the
//! hub untouched, so a caller can decide whether firing is worthwhile.
//!
//! Run:
//! - `cargo run -p canopy_demos --example hub_simulation`

use canopy_hub::{Callback, EventHub, OnOptions, TraverseOptions, TriggerOptions};

fn main() {
    let hub: EventHub = EventHub::new();
    let descend = TriggerOptions {
        traverse: true,
        ..TriggerOptions::default()
    };

    for name in ["sensors.door", "sensors.window", "sensors.window.latch"] {
        hub.on(
            name,
            &Callback::new(|_, context| println!("  ping from {}", context.event)),
            OnOptions::default(),
        );
    }

    println!("== Preview ==");
    let would_fire = hub.fake().trigger("sensors", descend);
    println!("a traversing trigger would reach {would_fire} callbacks");
    println!(
        "sensors has been triggered {} times",
        hub.triggers_for("sensors", TraverseOptions::default())
    );

    println!("== Live ==");
    let fired = hub.trigger("sensors", None, descend);
    println!("fired {fired} callbacks");

    println!("== Window disabled ==");
    hub.disable("sensors.window", TraverseOptions::default());
    let fired = hub.trigger("sensors", None, descend);
    println!("fired {fired} callbacks");

    println!(
        "subtree trigger count: {}",
        hub.triggers_for("sensors", TraverseOptions { traverse: true })
    );
}
