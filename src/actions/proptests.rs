//! Property-based tests for action id mapping
//!
//! - ids are unique and total over the move set
//! - `resolve(id_of(m))` is `m` for every move
//! - ids are reproducible for the same list order
//! - a second `set_moves` invalidates every id of the first one

use super::*;
use crate::engine::fixtures::TestMove;
use proptest::prelude::*;
use std::collections::HashSet;

fn arb_kind() -> impl Strategy<Value = &'static str> {
    prop_oneof![
        Just("BUILD_SETTLEMENT"),
        Just("BUILD_ROAD"),
        Just("END_TURN"),
        Just("MOVE_ROBBER"),
        Just("MARITIME_TRADE"),
    ]
}

fn arb_value() -> impl Strategy<Value = Option<MoveValue>> {
    prop_oneof![
        Just(None),
        (0i64..20).prop_map(|n| Some(MoveValue::Int(n))),
        "[a-z]{1,5}".prop_map(|s| Some(MoveValue::Text(s))),
        (0i64..10, 0i64..10)
            .prop_map(|(a, b)| Some(MoveValue::Tuple(vec![MoveValue::Int(a), MoveValue::Int(b)]))),
    ]
}

fn arb_move() -> impl Strategy<Value = TestMove> {
    (arb_kind(), arb_value()).prop_map(|(kind, value)| TestMove::new(kind, value))
}

fn arb_moves() -> impl Strategy<Value = Vec<TestMove>> {
    proptest::collection::vec(arb_move(), 0..40)
}

fn arb_style() -> impl Strategy<Value = IdStyle> {
    prop_oneof![Just(IdStyle::Descriptive), Just(IdStyle::Indexed)]
}

proptest! {
    #[test]
    fn prop_ids_unique_and_total(moves in arb_moves(), style in arb_style()) {
        let count = moves.len();
        let mut mapper = ActionMapper::new(style);
        mapper.set_moves(moves);

        let ids: HashSet<&String> = mapper.list_ids().iter().collect();
        prop_assert_eq!(ids.len(), count);
        prop_assert_eq!(mapper.len(), count);
    }

    #[test]
    fn prop_resolve_inverts_id_of(moves in arb_moves(), style in arb_style()) {
        let mut mapper = ActionMapper::new(style);
        mapper.set_moves(moves);

        for mv in mapper.moves() {
            let id = mapper.id_of(mv);
            prop_assert!(id.is_some());
            let resolved = mapper.resolve(id.unwrap());
            prop_assert!(resolved.is_some_and(|r| std::ptr::eq(r, mv)));
        }
    }

    #[test]
    fn prop_ids_reproducible(moves in arb_moves()) {
        let mut first = ActionMapper::new(IdStyle::Descriptive);
        first.set_moves(moves.clone());
        let mut second = ActionMapper::new(IdStyle::Descriptive);
        second.set_moves(moves);

        prop_assert_eq!(first.list_ids(), second.list_ids());
    }

    #[test]
    fn prop_reset_invalidates_old_ids(
        first_moves in arb_moves(),
        second_moves in arb_moves(),
    ) {
        let mut mapper = ActionMapper::new(IdStyle::Descriptive);
        mapper.set_moves(first_moves);
        let old_ids = mapper.list_ids().to_vec();

        mapper.set_moves(second_moves);

        for id in old_ids {
            // An id may be regenerated for the new list; it must then point
            // into the new list, never at a move from the old one.
            if let Some(mv) = mapper.resolve(&id) {
                prop_assert!(mapper.moves().iter().any(|m| std::ptr::eq(m, mv)));
            }
        }
    }

    #[test]
    fn prop_ids_are_lowercase_tokens(moves in arb_moves()) {
        let mut mapper = ActionMapper::new(IdStyle::Descriptive);
        mapper.set_moves(moves);

        for id in mapper.list_ids() {
            prop_assert!(!id.is_empty());
            prop_assert!(id.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' || c == '-'));
        }
    }
}

#[test]
fn test_reset_with_disjoint_lists_invalidates_all() {
    let mut mapper = ActionMapper::new(IdStyle::Descriptive);
    mapper.set_moves(vec![
        TestMove::at("BUILD_ROAD", 1),
        TestMove::bare("END_TURN"),
    ]);
    let old_ids = mapper.list_ids().to_vec();

    mapper.set_moves(vec![TestMove::at("BUILD_CITY", 9)]);

    for id in old_ids {
        assert!(mapper.resolve(&id).is_none());
    }
}
