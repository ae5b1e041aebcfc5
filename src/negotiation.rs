//! Negotiation loop
//!
//! Drives one decision end to end: the agent explores the tools for a
//! bounded number of rounds, and whatever happens the decision yields
//! exactly one legal move. A transport that stays down, an agent that stops
//! calling tools, or a budget that runs out all end in a uniformly random
//! pick from the supplied moves, reported as a fallback.

mod conversation;
mod retry;
mod usage;

#[cfg(test)]
mod proptests;
#[cfg(test)]
pub(crate) mod testing;

pub use conversation::{Conversation, OPENING_PROMPT};
pub use retry::{send_with_retry, RetryPolicy, DEFAULT_MAX_ATTEMPTS};
pub use usage::UsageRecord;

use crate::actions::IdStyle;
use crate::engine::{GameState, LegalMove, PlayerId};
use crate::llm::{ContentBlock, LlmService, Pricing};
use crate::tools::{ToolDispatcher, SELECT_ACTION};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Arc;
use thiserror::Error;

pub const DEFAULT_MAX_ROUNDS: usize = 10;
pub const DEFAULT_MAX_TOKENS: u32 = 4000;
pub const DEFAULT_TEMPERATURE: f32 = 0.7;

#[derive(Debug, Clone)]
pub struct NegotiationConfig {
    /// Reasoning requests allowed per decision
    pub max_rounds: usize,
    pub max_tokens: u32,
    pub temperature: f32,
    pub retry: RetryPolicy,
    /// Seed for the fallback picker; entropy when unset
    pub fallback_seed: Option<u64>,
    pub id_style: IdStyle,
}

impl Default for NegotiationConfig {
    fn default() -> Self {
        Self {
            max_rounds: DEFAULT_MAX_ROUNDS,
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
            retry: RetryPolicy::default(),
            fallback_seed: None,
            id_style: IdStyle::default(),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum NegotiationError {
    /// Nothing to choose from; the engine must not ask for a decision
    #[error("no legal moves supplied for {0}")]
    NoLegalMoves(PlayerId),
}

/// Why the round loop ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StopReason {
    /// `select_action` was accepted
    Selected,
    /// A response carried no tool calls
    AgentDeclined,
    /// Every round was used without an accepted selection
    BudgetExhausted,
    /// The reasoning request failed after retries, or failed permanently
    TransportFailed { message: String },
}

/// Result of one decision
#[derive(Debug, Clone)]
pub struct DecisionOutcome<M> {
    pub chosen_move: M,
    /// Id the move had during this decision
    pub action_id: String,
    pub usage: UsageRecord,
    pub fell_back: bool,
    pub stop_reason: StopReason,
    /// Rounds started, including one whose request failed
    pub rounds: usize,
    /// Last text the agent produced, if any
    pub final_text: String,
}

/// Decision owner for one game.
///
/// Owns its dispatcher, so two games never share action ids or selections;
/// build one negotiator per game and never share it.
pub struct Negotiator<M: LegalMove> {
    llm: Arc<dyn LlmService>,
    pricing: Pricing,
    dispatcher: ToolDispatcher<M>,
    config: NegotiationConfig,
    rng: StdRng,
}

impl<M: LegalMove> Negotiator<M> {
    pub fn new(llm: Arc<dyn LlmService>, pricing: Pricing, config: NegotiationConfig) -> Self {
        let rng = match config.fallback_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            llm,
            pricing,
            dispatcher: ToolDispatcher::new(config.id_style),
            config,
            rng,
        }
    }

    pub fn model_id(&self) -> &str {
        self.llm.model_id()
    }

    pub fn config(&self) -> &NegotiationConfig {
        &self.config
    }

    pub fn dispatcher(&self) -> &ToolDispatcher<M> {
        &self.dispatcher
    }

    /// Negotiate one move for `player`.
    ///
    /// Always returns one of `legal_moves`; errors only when the list is
    /// empty. The dispatcher is back to idle when this returns, and also if
    /// the returned future is dropped midway.
    pub async fn run_decision(
        &mut self,
        player: &str,
        state: Arc<dyn GameState>,
        legal_moves: Vec<M>,
        system_prompt: &str,
    ) -> Result<DecisionOutcome<M>, NegotiationError> {
        if legal_moves.is_empty() {
            return Err(NegotiationError::NoLegalMoves(player.to_string()));
        }

        let Self {
            llm,
            pricing,
            dispatcher,
            config,
            rng,
        } = self;

        let mut decision = dispatcher.begin(player, state, legal_moves);
        let tools = decision.definitions();
        let mut conversation = Conversation::new(system_prompt);
        let mut usage = UsageRecord::default();
        let mut stop_reason = StopReason::BudgetExhausted;
        let mut final_text = String::new();
        let mut rounds = 0;

        while rounds < config.max_rounds {
            rounds += 1;
            tracing::debug!(player, round = rounds, max_rounds = config.max_rounds, "Negotiation round");

            let request = conversation.request(&tools, config.max_tokens, config.temperature);
            let response = match send_with_retry(&**llm, &request, &config.retry).await {
                Ok(response) => response,
                Err(e) => {
                    stop_reason = StopReason::TransportFailed { message: e.message };
                    break;
                }
            };
            usage.record(&response.usage, pricing);

            let text = response.text();
            if !text.is_empty() {
                final_text = text;
            }

            let tool_uses = response.tool_uses();
            if tool_uses.is_empty() {
                tracing::warn!(
                    player,
                    round = rounds,
                    end_turn = response.end_turn,
                    "Agent ended turn without selecting an action"
                );
                stop_reason = StopReason::AgentDeclined;
                break;
            }
            conversation.push_assistant(response.content);

            let mut results = Vec::with_capacity(tool_uses.len());
            let mut accepted = false;
            for tool_use in &tool_uses {
                let output = decision.handle_tool_call(&tool_use.name, &tool_use.input);
                results.push(ContentBlock::tool_result(
                    tool_use.id.clone(),
                    output.content(),
                    !output.success,
                ));
                // Trailing calls in the same batch are not executed
                if tool_use.name == SELECT_ACTION && output.success {
                    accepted = true;
                    break;
                }
            }
            conversation.push_tool_results(results);

            if accepted {
                stop_reason = StopReason::Selected;
                break;
            }
        }

        if stop_reason == StopReason::BudgetExhausted {
            tracing::warn!(player, rounds, "Round budget exhausted without a selection");
        }

        let (index, fell_back) = match decision.selection() {
            Some(mv) => {
                let index = decision
                    .actions()
                    .moves()
                    .iter()
                    .position(|candidate| std::ptr::eq(candidate, mv))
                    .unwrap_or_default();
                (index, false)
            }
            None => (rng.gen_range(0..decision.actions().len()), true),
        };
        let chosen_move = decision.actions().moves()[index].clone();
        let action_id = decision.actions().list_ids()[index].clone();

        if fell_back {
            tracing::warn!(
                player,
                action_id = %action_id,
                reason = ?stop_reason,
                "Falling back to random legal move"
            );
        } else {
            tracing::info!(
                player,
                action_id = %action_id,
                rounds,
                cost_usd = usage.cost_usd,
                "Decision negotiated"
            );
        }

        Ok(DecisionOutcome {
            chosen_move,
            action_id,
            usage,
            fell_back,
            stop_reason,
            rounds,
            final_text,
        })
    }
}
