// Copyright 2026 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Hub basics.
//!
//! Registering, triggering with a payload, one-shots, and removal.
//!
//! Run:
//! - `cargo run -p canopy_demos --example hub_basics`

use canopy_hub::{Callback, EventHub, OffOptions, OnOptions, TraverseOptions, TriggerOptions};

fn main() {
    let hub: EventHub<String> = EventHub::new();

    let greet = Callback::new(|data: Option<&String>, context| {
        println!("  {} heard {:?}", context.event, data);
    });
    hub.on("door.front", &greet, OnOptions::default());
    hub.one(
        "door.front",
        &Callback::new(|_, _| println!("  (one-shot) first visitor!")),
        OnOptions::default(),
    );

    println!("== First trigger ==");
    let fired = hub.trigger(
        "door.front",
        Some(&String::from("knock knock")),
        TriggerOptions::default(),
    );
    println!("fired {fired}");

    println!("== Second trigger (one-shot is gone) ==");
    let fired = hub.trigger(
        "door.front",
        Some(&String::from("knock again")),
        TriggerOptions::default(),
    );
    println!("fired {fired}");

    println!("== After off ==");
    let removed = hub.off("door.front", Some(&greet), OffOptions::default());
    println!("removed {removed}");
    let fired = hub.trigger("door.front", None, TriggerOptions::default());
    println!("fired {fired}");
    println!(
        "door.front was triggered {} times",
        hub.triggers_for("door.front", TraverseOptions::default())
    );
}
