//! Basic State Machine
//!
//! This example drives a small enemy through its states.
//!
//! Key concepts:
//! - Actions per state, transitions per state pair
//! - Default handlers for everything not registered
//! - A failing hook falls back to the default and the transition still commits
//!
//! Run with: cargo run --example basic_state_machine

use aid_fsm::builder::{InstructionSetBuilder, StateMachineBuilder};
use aid_fsm::{state_enum, Dispatch, HookError};

state_enum! {
    enum Enemy {
        Idle,
        Chase,
        Attack,
        Dead,
    }
    final: [Dead]
}

#[derive(Debug)]
struct Stats {
    distance: i32,
    hits: u32,
}

fn main() {
    println!("=== Basic State Machine Example ===\n");

    let instructions = InstructionSetBuilder::<Enemy, Stats>::new()
        .action(Enemy::Chase, |m| {
            m.context_mut().distance -= 1;
            Ok(())
        })
        .action(Enemy::Attack, |m| {
            m.context_mut().hits += 1;
            Ok(())
        })
        .transition(Enemy::Idle, Enemy::Chase, |m| {
            println!("  Idle -> {:?}: player spotted", m.state_next());
            Ok(())
        })
        .transition(Enemy::Chase, Enemy::Attack, |m| {
            if m.context().distance > 0 {
                return Err(HookError::msg("player out of reach"));
            }
            println!("  Chase -> Attack: in reach");
            Ok(())
        })
        .transit_default(|m| {
            println!(
                "  {:?} -> {:?}: default transition",
                m.state_current(),
                m.state_next()
            );
        })
        .shared();

    let mut enemy = StateMachineBuilder::with_context(Stats {
        distance: 3,
        hits: 0,
    })
    .instructions(instructions)
    .initial(Enemy::Idle)
    .build()
    .unwrap();

    println!("Initial state: {:?}", enemy.state_current());

    println!("  idle act: {:?}", enemy.act().kind());
    println!("  spotted: {:?}", enemy.transit(Enemy::Chase).kind());
    println!("  chase act: {:?}", enemy.act().kind());

    let dispatch = enemy.transit(Enemy::Attack);
    if let Some(error) = dispatch.error() {
        println!("  fell back after: {error}");
    }

    for _ in 0..3 {
        if let Dispatch::Faulted(error) = enemy.act() {
            println!("  attack failed: {error}");
        }
    }
    println!("  killed: {:?}", enemy.transit(Enemy::Dead).kind());

    println!("\nFinal state: {:?}", enemy.state_current());
    println!("Is in final state: {}", enemy.is_final());
    println!("Stats: {:?}", enemy.context());
    println!("Transitions that fell back: {}", enemy.history().fallback_count());

    println!("\n=== Example Complete ===");
}
