//! Door
//!
//! This example drives a door between open, ajar and closed.
//!
//! Key concepts:
//! - Guards over the context (the door's openness)
//! - Middleware wrapping a transition
//! - Callbacks observing state entries
//! - Schema export and checkpoint/restore
//!
//! Run with: cargo run --example door

use serde::{Deserialize, Serialize};
use switchyard::builder::StateMachineBuilder;
use switchyard::checkpoint::JsonCodec;
use switchyard::core::Transition;
use switchyard::state_enum;

state_enum! {
    enum DoorState {
        Open,
        Ajar,
        Close,
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct Door {
    openness: u8,
}

fn main() {
    println!("=== Door Example ===\n");

    let mut door = StateMachineBuilder::new()
        .transition(
            Transition::new("preOpen", DoorState::Close, DoorState::Ajar)
                .action(|d: &mut Door| d.openness = 1),
        )
        .transition(
            Transition::new("preClose", DoorState::Open, DoorState::Ajar)
                .action(|d: &mut Door| d.openness = 99),
        )
        .transition(
            Transition::new("open", DoorState::Ajar, DoorState::Open)
                .when(|d: &Door| d.openness >= 99)
                .action(|d: &mut Door| d.openness = 100),
        )
        .transition(
            Transition::new("close", DoorState::Ajar, DoorState::Close)
                .when(|d: &Door| d.openness <= 1)
                .action(|d: &mut Door| d.openness = 0),
        )
        .transition(
            Transition::new("ajarMinus", DoorState::Ajar, DoorState::Ajar)
                .when(|d: &Door| (2..=99).contains(&d.openness))
                .action(|d: &mut Door| d.openness -= 10.min(d.openness - 1)),
        )
        .middleware("close", |door, next| {
            println!("  middleware: closing at openness {}", door.openness);
            next.proceed(door)
        })
        .on_any_state(|state, door| {
            println!("  entered {:?} (openness {})", state, door.openness);
            Ok(())
        })
        .initial(DoorState::Open)
        .context(Door { openness: 100 })
        .context_codec(JsonCodec)
        .build()
        .unwrap();

    println!("Schema: {}\n", door.to_json_schema().unwrap());

    println!("Closing the door:");
    door.transition("preClose").unwrap();
    while door.transition("ajarMinus").is_ok() {}
    door.transition("close").unwrap();
    println!("Final state: {:?}\n", door.state());

    let dump = door.to_json().unwrap();
    println!("Checkpoint: {}", dump);

    match door.transition("open") {
        Ok(()) => println!("Opened"),
        Err(e) => println!("Cannot open: {}", e),
    }

    door.transition("preOpen").unwrap();
    door.from_json(&dump, DoorState::from_name).unwrap();
    println!("Restored to {:?}", door.state());

    // only "preOpen" leaves Close
    if door.auto_transition() {
        println!("Auto transition moved the door to {:?}", door.state());
    }

    println!("\n=== Example Complete ===");
}
