//! Instance Pool
//!
//! This example builds engine-owned machines in a fixed pool instead of on
//! the global heap, using the integer-signal API.
//!
//! Key concepts:
//! - Sentinel-terminated tables imported with `from_terminated`
//! - A pool that refuses once every slot is taken
//! - Slots coming back when an instance is destroyed
//! - Signals: 1 transitioned, 0 guards rejected, -1 nothing to do
//!
//! Run with: cargo run --example instance_pool

use polled_fsm::alloc::PoolAllocator;
use polled_fsm::legacy::{fsm_destroy, fsm_fire, fsm_get_state, fsm_new_in, fsm_set_state};
use polled_fsm::{Fsm, Transition, TransitionTable};

#[derive(Debug, Default)]
struct Door {
    unlocked: bool,
}

fn main() {
    println!("=== Instance Pool ===\n");

    // closed(0) <-> open(1); opening needs the door unlocked.
    let table: TransitionTable<Door> = TransitionTable::from_terminated(vec![
        Transition::new(0, 1).when(|fsm: &Fsm<'_, Door>| fsm.context().unlocked),
        Transition::new(1, 0),
        Transition::sentinel(),
    ]);

    let pool = PoolAllocator::with_slots(2, 64);
    println!("Pool: {} slots of {} bytes", pool.capacity(), pool.slot_size());

    let mut front = fsm_new_in(Some(&table), &pool).expect("first slot is free");
    let back = fsm_new_in(Some(&table), &pool).expect("second slot is free");
    println!("Constructed two doors, {} slots in use", pool.in_use());

    match fsm_new_in(Some(&table), &pool) {
        Some(_) => println!("Unexpected: a third door fit"),
        None => println!("Third door refused: pool exhausted"),
    }

    println!("\nFiring the front door:");
    println!("  locked   -> signal {}", fsm_fire(Some(&mut *front)));
    front.context_mut().unlocked = true;
    println!("  unlocked -> signal {}", fsm_fire(Some(&mut *front)));
    println!("  state is now {}", fsm_get_state(&front));

    fsm_set_state(&mut front, 7);
    println!("  forced to state 7 -> signal {}", fsm_fire(Some(&mut *front)));

    fsm_destroy(front);
    println!("\nDestroyed the front door, {} slot(s) in use", pool.in_use());

    let spare = fsm_new_in(Some(&table), &pool).expect("slot was returned");
    println!("Built a spare door in the freed slot, {} slots in use", pool.in_use());

    fsm_destroy(spare);
    fsm_destroy(back);
    println!("All doors destroyed, {} slots in use", pool.in_use());

    println!("\n=== Example Complete ===");
}
