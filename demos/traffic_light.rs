//! Traffic Light Polling Loop
//!
//! This example drives a table-driven machine from a host loop, one `fire`
//! per tick.
//!
//! Key concepts:
//! - Host object carrying the data guards read and actions write
//! - Guards that hold once enough ticks have passed
//! - Actions that run after the state change
//! - A pedestrian button that shortens the green phase
//!
//! Run with: cargo run --example traffic_light

use polled_fsm::{transition_table, FireOutcome, Fsm, OwnedFsm, StateId};

const RED: StateId = 0;
const GREEN: StateId = 1;
const YELLOW: StateId = 2;

#[derive(Debug, Default)]
struct Intersection {
    ticks_in_state: u32,
    button_pressed: bool,
    cycles: u32,
}

fn name(state: StateId) -> &'static str {
    match state {
        RED => "Red",
        GREEN => "Green",
        YELLOW => "Yellow",
        _ => "Unknown",
    }
}

// Guards
fn red_elapsed(fsm: &Fsm<'_, Intersection>) -> bool {
    fsm.context().ticks_in_state >= 4
}

fn green_elapsed(fsm: &Fsm<'_, Intersection>) -> bool {
    let host = fsm.context();
    host.ticks_in_state >= 6 || (host.button_pressed && host.ticks_in_state >= 2)
}

fn yellow_elapsed(fsm: &Fsm<'_, Intersection>) -> bool {
    fsm.context().ticks_in_state >= 2
}

// Actions
fn restart_timer(fsm: &mut Fsm<'_, Intersection>) {
    fsm.context_mut().ticks_in_state = 0;
}

fn clear_button(fsm: &mut Fsm<'_, Intersection>) {
    let host = fsm.context_mut();
    host.ticks_in_state = 0;
    host.button_pressed = false;
}

fn count_cycle(fsm: &mut Fsm<'_, Intersection>) {
    let host = fsm.context_mut();
    host.ticks_in_state = 0;
    host.cycles += 1;
}

fn main() {
    println!("=== Traffic Light Polling Loop ===\n");

    let table = transition_table! {
        RED => GREEN, when red_elapsed, then restart_timer;
        GREEN => YELLOW, when green_elapsed, then clear_button;
        YELLOW => RED, when yellow_elapsed, then count_cycle;
    };

    let mut light = OwnedFsm::new(&table, Intersection::default())
        .expect("table is valid and the heap grants memory");

    println!("Initial state: {}\n", name(light.state()));

    for tick in 1..=24 {
        if tick == 15 {
            println!("  tick {tick:2}: pedestrian presses the button");
            light.context_mut().button_pressed = true;
        }

        match light.fire().expect("machine is bound") {
            FireOutcome::Transitioned { from, to, .. } => {
                println!("  tick {tick:2}: {} -> {}", name(from), name(to));
            }
            FireOutcome::Blocked { .. } => light.context_mut().ticks_in_state += 1,
            FireOutcome::NoTransitions { state } => {
                println!("  tick {tick:2}: no way out of {}", name(state));
                break;
            }
        }
    }

    println!("\nCompleted cycles: {}", light.context().cycles);
    println!("Final state: {}", name(light.state()));

    light.destroy();

    println!("\n=== Example Complete ===");
}
