//! Traffic Light State Machine
//!
//! This example runs several lights off one shared instruction set inside
//! a host update loop.
//!
//! Key concepts:
//! - One instruction set, many independent machines
//! - Machines act once per host tick
//! - Host events transit hosted machines from outside
//! - Checkpoint and restore of a machine
//!
//! Run with: cargo run --example traffic_light

use aid_fsm::builder::InstructionSetBuilder;
use aid_fsm::checkpoint::Checkpoint;
use aid_fsm::{state_enum, BehaviorHost, StateMachine};
use std::sync::Arc;

state_enum! {
    enum TrafficLight {
        Red,
        Yellow,
        Green,
    }
}

fn next(light: TrafficLight) -> TrafficLight {
    match light {
        TrafficLight::Red => TrafficLight::Green,
        TrafficLight::Green => TrafficLight::Yellow,
        TrafficLight::Yellow => TrafficLight::Red,
    }
}

/// Ticks spent in each state before switching.
const PHASE: u32 = 2;

fn main() {
    println!("=== Traffic Light State Machine ===\n");

    // Every state counts ticks and switches after PHASE of them.
    let instructions = InstructionSetBuilder::<TrafficLight, u32>::new()
        .act_default(|m| {
            *m.context_mut() += 1;
            if *m.context() >= PHASE {
                if let Some(&current) = m.state_current() {
                    let _ = m.transit(next(current));
                }
            }
        })
        .transit_default(|m| *m.context_mut() = 0)
        .shared();

    let mut host = BehaviorHost::new();
    let main_street =
        host.attach(StateMachine::with_context(Arc::clone(&instructions), TrafficLight::Red, 0));
    let side_street =
        host.attach(StateMachine::with_context(Arc::clone(&instructions), TrafficLight::Green, 0));

    for _ in 0..3 {
        let updated = host.update();
        println!("tick {}: updated {} lights", host.tick(), updated);
    }

    // A pedestrian presses the button on the side street.
    if let Some(light) = host.get_mut(side_street) {
        let dispatch = light.transit(TrafficLight::Red);
        println!("\nPedestrian request: {:?}", dispatch.kind());
        light.set_active(false);
    }

    for _ in 0..3 {
        let updated = host.update();
        println!("tick {}: updated {} lights", host.tick(), updated);
    }

    for (_, light) in host.iter() {
        println!("Light: {:?}, active: {}", light.state_current(), light.is_active());
    }

    let Some(light) = host.detach(main_street) else {
        return;
    };
    let json = light.checkpoint().to_json().unwrap();
    println!("\nCheckpoint: {json}");

    let mut resumed = StateMachine::with_context(instructions, TrafficLight::Red, 0);
    resumed.restore(Checkpoint::from_json(&json).unwrap()).unwrap();
    println!("Resumed light: {:?}", resumed.state_current());
    println!("Path so far: {:?}", resumed.history().get_path());

    println!("\n=== Example Complete ===");
}
