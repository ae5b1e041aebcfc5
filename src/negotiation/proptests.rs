//! Property-based tests for the negotiation loop
//!
//! Whatever the agent does, within any round budget:
//! - the decision yields one of the supplied moves
//! - at most `max_rounds` rounds are started
//! - the dispatcher ends idle
//! - `fell_back` is false exactly when a selection was accepted

use super::testing::{text_response, tool_response, MockLlmClient};
use super::*;
use crate::actions::ActionMapper;
use crate::engine::fixtures::{TableState, TestMove};
use crate::llm::LlmError;
use crate::tools::{GET_STATE, GET_VALID_ACTIONS};
use proptest::prelude::*;
use serde_json::json;

/// One scripted agent turn
#[derive(Debug, Clone)]
enum AgentTurn {
    Text,
    Explore,
    SelectValid(usize),
    SelectInvalid,
    Unknown,
    TransportError,
}

fn arb_turn() -> impl Strategy<Value = AgentTurn> {
    prop_oneof![
        Just(AgentTurn::Text),
        Just(AgentTurn::Explore),
        (0usize..16).prop_map(AgentTurn::SelectValid),
        Just(AgentTurn::SelectInvalid),
        Just(AgentTurn::Unknown),
        Just(AgentTurn::TransportError),
    ]
}

fn arb_moves() -> impl Strategy<Value = Vec<TestMove>> {
    proptest::collection::vec(
        prop_oneof![
            (0i64..6).prop_map(|n| TestMove::at("BUILD_ROAD", n)),
            (0i64..6).prop_map(|n| TestMove::at("MOVE_ROBBER", n)),
            Just(TestMove::bare("END_TURN")),
        ],
        1..8,
    )
}

fn script(llm: &MockLlmClient, turns: &[AgentTurn], ids: &[String]) {
    for turn in turns {
        match turn {
            AgentTurn::Text => llm.queue_response(text_response("thinking")),
            AgentTurn::Explore => llm.queue_response(tool_response(&[
                (GET_STATE, json!({"include_board": true})),
                (GET_VALID_ACTIONS, json!({})),
            ])),
            AgentTurn::SelectValid(i) => llm.queue_response(tool_response(&[(
                SELECT_ACTION,
                json!({"action_id": ids[i % ids.len()]}),
            )])),
            AgentTurn::SelectInvalid => llm.queue_response(tool_response(&[(
                SELECT_ACTION,
                json!({"action_id": "not_a_move"}),
            )])),
            AgentTurn::Unknown => llm.queue_response(tool_response(&[("resign", json!({}))])),
            AgentTurn::TransportError => llm.queue_error(LlmError::server_error("503")),
        }
    }
}

fn ids_for(moves: &[TestMove]) -> Vec<String> {
    let mut mapper = ActionMapper::new(IdStyle::Descriptive);
    mapper.set_moves(moves.to_vec());
    mapper.list_ids().to_vec()
}

fn run(
    moves: Vec<TestMove>,
    turns: &[AgentTurn],
    max_rounds: usize,
) -> (DecisionOutcome<TestMove>, usize, bool) {
    let llm = Arc::new(MockLlmClient::new("mock"));
    script(&llm, turns, &ids_for(&moves));

    let mut negotiator = Negotiator::new(
        llm.clone() as Arc<dyn LlmService>,
        Pricing::new(0.001, 0.002),
        NegotiationConfig {
            max_rounds,
            retry: RetryPolicy::no_delay(2),
            fallback_seed: Some(1),
            ..Default::default()
        },
    );

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
        .unwrap();
    let outcome = runtime
        .block_on(negotiator.run_decision("RED", Arc::new(TableState::default()), moves, "s"))
        .unwrap();

    let requests = llm.recorded_requests().len();
    (outcome, requests, negotiator.dispatcher().is_active())
}

proptest! {
    #[test]
    fn prop_decision_always_yields_supplied_move(
        moves in arb_moves(),
        turns in proptest::collection::vec(arb_turn(), 0..12),
        max_rounds in 1usize..6,
    ) {
        let (outcome, _, _) = run(moves.clone(), &turns, max_rounds);
        prop_assert!(moves.contains(&outcome.chosen_move));
    }

    #[test]
    fn prop_round_budget_bounds_work(
        moves in arb_moves(),
        turns in proptest::collection::vec(arb_turn(), 0..12),
        max_rounds in 1usize..6,
    ) {
        let (outcome, requests, _) = run(moves, &turns, max_rounds);

        prop_assert!(outcome.rounds <= max_rounds);
        prop_assert!(outcome.usage.requests as usize <= outcome.rounds);
        // Two attempts per round at most
        prop_assert!(requests <= 2 * outcome.rounds);
    }

    #[test]
    fn prop_dispatcher_ends_idle(
        moves in arb_moves(),
        turns in proptest::collection::vec(arb_turn(), 0..12),
    ) {
        let (_, _, active) = run(moves, &turns, 4);
        prop_assert!(!active);
    }

    #[test]
    fn prop_fell_back_iff_not_selected(
        moves in arb_moves(),
        turns in proptest::collection::vec(arb_turn(), 0..12),
        max_rounds in 1usize..6,
    ) {
        let (outcome, _, _) = run(moves, &turns, max_rounds);
        prop_assert_eq!(outcome.fell_back, outcome.stop_reason != StopReason::Selected);
    }

    #[test]
    fn prop_first_valid_selection_wins(
        moves in arb_moves(),
        pick in 0usize..16,
        explore_rounds in 0usize..3,
    ) {
        let mut turns = vec![AgentTurn::Explore; explore_rounds];
        turns.push(AgentTurn::SelectValid(pick));
        turns.push(AgentTurn::SelectValid(pick + 1));
        let ids = ids_for(&moves);

        let (outcome, _, _) = run(moves, &turns, 10);

        prop_assert!(!outcome.fell_back);
        prop_assert_eq!(&outcome.action_id, &ids[pick % ids.len()]);
        prop_assert_eq!(outcome.rounds, explore_rounds + 1);
    }
}
