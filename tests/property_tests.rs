//! Property-based tests for the firing engine.
//!
//! These tests use proptest to verify properties hold across
//! many randomly generated tables and states.

use polled_fsm::{
    FireOutcome, Fsm, FsmError, StateId, Transition, TransitionTable, MAX_TRANSITIONS,
};
use proptest::prelude::*;

/// Guard decisions travel through the host context so every generated row
/// can be switched independently.
#[derive(Default)]
struct Host {
    open: Vec<bool>,
    fired_actions: Vec<usize>,
}

#[derive(Clone, Debug)]
struct Row {
    origin: StateId,
    destination: StateId,
    guarded: bool,
}

prop_compose! {
    fn arbitrary_row()(origin in 0..6i32, destination in 0..6i32, guarded in any::<bool>()) -> Row {
        Row { origin, destination, guarded }
    }
}

fn build_table(rows: &[Row]) -> TransitionTable<Host> {
    rows.iter()
        .enumerate()
        .map(|(index, row)| {
            let transition = Transition::new(row.origin, row.destination)
                .then(move |fsm: &mut Fsm<'_, Host>| fsm.context_mut().fired_actions.push(index));
            if row.guarded {
                transition.when(move |fsm: &Fsm<'_, Host>| fsm.context().open[index])
            } else {
                transition
            }
        })
        .collect()
}

/// Reference answer: index of the first row that should fire.
fn expected_winner(rows: &[Row], open: &[bool], state: StateId) -> Option<usize> {
    rows.iter()
        .enumerate()
        .find(|(index, row)| row.origin == state && (!row.guarded || open[*index]))
        .map(|(index, _)| index)
}

proptest! {
    #[test]
    fn initial_state_is_first_origin(rows in prop::collection::vec(arbitrary_row(), 1..20)) {
        let table = build_table(&rows);
        let fsm = Fsm::bind(&table, Host::default()).unwrap();

        prop_assert_eq!(fsm.state(), rows[0].origin);
    }

    #[test]
    fn fire_matches_reference_scan(
        rows in prop::collection::vec(arbitrary_row(), 1..20),
        open in prop::collection::vec(any::<bool>(), 20),
        state in 0..8i32,
    ) {
        let table = build_table(&rows);
        let mut fsm = Fsm::bind(&table, Host { open: open.clone(), fired_actions: Vec::new() }).unwrap();
        fsm.set_state(state);

        let outcome = fsm.fire().unwrap();
        let candidates = rows.iter().filter(|row| row.origin == state).count();

        match expected_winner(&rows, &open, state) {
            Some(index) => {
                prop_assert_eq!(
                    outcome,
                    FireOutcome::Transitioned { from: state, to: rows[index].destination, index }
                );
                prop_assert_eq!(fsm.state(), rows[index].destination);
                prop_assert_eq!(&fsm.context().fired_actions, &vec![index]);
            }
            None if candidates == 0 => {
                prop_assert_eq!(outcome, FireOutcome::NoTransitions { state });
                prop_assert_eq!(fsm.state(), state);
                prop_assert!(fsm.context().fired_actions.is_empty());
            }
            None => {
                prop_assert_eq!(outcome, FireOutcome::Blocked { state, candidates });
                prop_assert_eq!(fsm.state(), state);
                prop_assert!(fsm.context().fired_actions.is_empty());
            }
        }
    }

    #[test]
    fn state_changes_only_on_transition(
        rows in prop::collection::vec(arbitrary_row(), 1..20),
        open in prop::collection::vec(any::<bool>(), 20),
        ticks in 1..30usize,
    ) {
        let table = build_table(&rows);
        let mut fsm = Fsm::bind(&table, Host { open, fired_actions: Vec::new() }).unwrap();

        for _ in 0..ticks {
            let before = fsm.state();
            let outcome = fsm.fire().unwrap();

            prop_assert!(matches!(outcome.code(), -1..=1));
            if outcome.transitioned() {
                prop_assert_eq!(outcome.code(), 1);
            } else {
                prop_assert_eq!(fsm.state(), before);
            }
        }
    }

    #[test]
    fn set_state_round_trips(state in any::<i32>()) {
        let table: TransitionTable<()> = TransitionTable::new().with(Transition::new(0, 1));
        let mut fsm = Fsm::bind(&table, ()).unwrap();

        fsm.set_state(state);

        prop_assert_eq!(fsm.state(), state);
    }

    #[test]
    fn capacity_is_enforced(len in 1..(2 * MAX_TRANSITIONS)) {
        let table: TransitionTable<()> = (0..len)
            .map(|i| Transition::new(i as StateId, 0))
            .collect();
        let mut fsm = Fsm::default();

        let result = fsm.init(&table);

        if len <= MAX_TRANSITIONS {
            prop_assert_eq!(result, Ok(len));
        } else {
            prop_assert_eq!(result, Err(FsmError::CapacityExceeded { count: len, max: MAX_TRANSITIONS }));
            prop_assert!(!fsm.is_bound());
        }
    }

    #[test]
    fn shared_table_instances_stay_independent(
        rows in prop::collection::vec(arbitrary_row(), 1..20),
        ticks in 1..10usize,
    ) {
        let table = build_table(&rows);
        let mut driven = Fsm::bind(&table, Host { open: vec![true; 20], fired_actions: Vec::new() }).unwrap();
        let idle = Fsm::bind(&table, Host { open: vec![true; 20], fired_actions: Vec::new() }).unwrap();

        for _ in 0..ticks {
            driven.fire().unwrap();
        }

        prop_assert_eq!(idle.state(), rows[0].origin);
        prop_assert!(idle.context().fired_actions.is_empty());
    }
}
