// Copyright 2026 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The three dispatch passes.
//!
//! Registers a watcher on every node of a small chain for both tagged
//! phases and prints the order in which one trigger visits them.
//!
//! Run:
//! - `cargo run -p canopy_demos --example hub_phases`

use canopy_hub::{Callback, EventHub, OnOptions, Phase, TriggerOptions};

fn main() {
    let hub: EventHub = EventHub::new();

    for name in ["app", "app.menu", "app.menu.item"] {
        hub.on(
            name,
            &Callback::new(|_, context| {
                println!(
                    "  {:?}  event={}  trigger={}",
                    context.phase, context.event, context.trigger
                );
            }),
            OnOptions {
                phase: Phase::Both,
                ..OnOptions::default()
            },
        );
        hub.on(
            name,
            &Callback::new(|_, context| {
                println!("  {:?}  event={}", context.phase, context.event);
            }),
            OnOptions::default(),
        );
    }

    println!("== Dispatch (capture → target → bubble) ==");
    let fired = hub.trigger("app.menu.item", None, TriggerOptions::default());
    println!("fired {fired} callbacks");

    println!("== Same trigger, bubble side only ==");
    let fired = hub.trigger(
        "app.menu.item",
        None,
        TriggerOptions {
            phase: Phase::Bubble,
            ..TriggerOptions::default()
        },
    );
    println!("fired {fired} callbacks");
}
