//! Traffic Light State Machine
//!
//! This example drives a cyclic machine with events, then walks its
//! history back and forth.
//!
//! Key concepts:
//! - Inline configuration with `fsm_config!`
//! - Event-driven transitions and rejected events
//! - Undo, redo and how a forward move discards redo entries
//!
//! Run with: RUST_LOG=debug cargo run --example traffic_light

use tracing_subscriber::EnvFilter;
use waypoint_fsm::{fsm_config, FsmError, StateMachine};

fn main() -> Result<(), FsmError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("=== Traffic Light State Machine ===\n");

    let config = fsm_config! {
        initial: red,
        states: {
            red => { timer: green, fault: blinking },
            green => { timer: yellow, fault: blinking },
            yellow => { timer: red, fault: blinking },
            blinking => { repair: red },
        }
    }?;
    let mut machine = StateMachine::new(config)?;
    println!("Initial state: {}", machine.state()?);

    for _ in 0..4 {
        machine.trigger("timer")?;
        println!("  timer  -> {}", machine.state()?);
    }

    if let Err(error) = machine.trigger("repair") {
        println!("  repair rejected: {error}");
    }

    let reachable: Vec<String> = machine
        .states(Some("fault"))
        .iter()
        .map(|s| s.to_string())
        .collect();
    println!("\nStates that can fault: {}", reachable.join(", "));

    println!("\nWalking back:");
    while machine.undo() {
        println!("  undo   -> {}", machine.state()?);
    }

    machine.redo();
    machine.redo();
    println!("  redo x2 -> {}", machine.state()?);

    machine.trigger("fault")?;
    println!("  fault  -> {} (redo available: {})", machine.state()?, machine.can_redo());

    println!(
        "\nJournal holds {} transitions",
        machine.history().transitions().len()
    );

    println!("\n=== Example Complete ===");
    Ok(())
}
