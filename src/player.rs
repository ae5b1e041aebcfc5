//! Decision owners seated at a game

use crate::engine::{GameState, LegalMove, PlayerId};
use crate::negotiation::{NegotiationError, Negotiator, UsageRecord};
use crate::system_prompt::{build_system_prompt, GameBrief};
use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use std::collections::VecDeque;
use std::marker::PhantomData;
use std::sync::Arc;

/// Moves remembered per player
pub const RECENT_MOVES_KEPT: usize = 5;

/// A move chosen by a player, with what it cost
#[derive(Debug, Clone)]
pub struct Decision<M> {
    pub chosen_move: M,
    pub usage: UsageRecord,
    pub fell_back: bool,
}

/// Per-game statistics of one seat
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerStats {
    pub player: PlayerId,
    /// Model id, or `random`
    pub agent: String,
    pub total_cost: f64,
    pub total_tokens: u64,
    pub move_count: u32,
    pub fallback_count: u32,
    pub avg_cost_per_move: f64,
}

/// A participant that turns a legal-move list into one move
#[async_trait]
pub trait Player<M: LegalMove>: Send {
    /// Seat this player occupies
    fn color(&self) -> &str;

    fn agent(&self) -> &str;

    async fn decide(
        &mut self,
        state: Arc<dyn GameState>,
        legal_moves: Vec<M>,
    ) -> Result<Decision<M>, NegotiationError>;

    fn stats(&self) -> PlayerStats;

    /// Clear per-game statistics
    fn reset(&mut self);
}

#[derive(Debug, Default)]
struct Tally {
    usage: UsageRecord,
    moves: u32,
    fallbacks: u32,
}

impl Tally {
    fn add(&mut self, usage: UsageRecord, fell_back: bool) {
        self.usage += usage;
        self.moves += 1;
        if fell_back {
            self.fallbacks += 1;
        }
    }

    fn stats(&self, player: &str, agent: &str) -> PlayerStats {
        let avg_cost_per_move = if self.moves > 0 {
            self.usage.cost_usd / f64::from(self.moves)
        } else {
            0.0
        };
        PlayerStats {
            player: player.to_string(),
            agent: agent.to_string(),
            total_cost: self.usage.cost_usd,
            total_tokens: self.usage.total_tokens(),
            move_count: self.moves,
            fallback_count: self.fallbacks,
            avg_cost_per_move,
        }
    }
}

/// Player driven by a reasoning agent through the negotiation loop
pub struct LlmPlayer<M: LegalMove> {
    color: PlayerId,
    agent: String,
    negotiator: Negotiator<M>,
    brief: GameBrief,
    recent_moves: VecDeque<String>,
    tally: Tally,
}

impl<M: LegalMove> LlmPlayer<M> {
    pub fn new(color: impl Into<PlayerId>, negotiator: Negotiator<M>, brief: GameBrief) -> Self {
        Self {
            color: color.into(),
            agent: negotiator.model_id().to_string(),
            negotiator,
            brief,
            recent_moves: VecDeque::with_capacity(RECENT_MOVES_KEPT),
            tally: Tally::default(),
        }
    }

    pub fn recent_moves(&self) -> impl Iterator<Item = &String> {
        self.recent_moves.iter()
    }

    fn remember(&mut self, description: String) {
        if self.recent_moves.len() == RECENT_MOVES_KEPT {
            self.recent_moves.pop_front();
        }
        self.recent_moves.push_back(description);
    }
}

#[async_trait]
impl<M: LegalMove> Player<M> for LlmPlayer<M> {
    fn color(&self) -> &str {
        &self.color
    }

    fn agent(&self) -> &str {
        &self.agent
    }

    async fn decide(
        &mut self,
        state: Arc<dyn GameState>,
        legal_moves: Vec<M>,
    ) -> Result<Decision<M>, NegotiationError> {
        let recent: Vec<String> = self.recent_moves.iter().cloned().collect();
        let prompt = build_system_prompt(&self.color, &self.brief, &recent);

        let outcome = self
            .negotiator
            .run_decision(&self.color, state, legal_moves, &prompt)
            .await?;

        self.tally.add(outcome.usage, outcome.fell_back);
        self.remember(outcome.chosen_move.describe());

        Ok(Decision {
            chosen_move: outcome.chosen_move,
            usage: outcome.usage,
            fell_back: outcome.fell_back,
        })
    }

    fn stats(&self) -> PlayerStats {
        self.tally.stats(&self.color, &self.agent)
    }

    fn reset(&mut self) {
        self.tally = Tally::default();
        self.recent_moves.clear();
    }
}

/// Zero-cost baseline: uniform random legal move
pub struct RandomPlayer<M> {
    color: PlayerId,
    rng: StdRng,
    tally: Tally,
    _moves: PhantomData<fn() -> M>,
}

impl<M: LegalMove> RandomPlayer<M> {
    pub fn new(color: impl Into<PlayerId>, seed: Option<u64>) -> Self {
        Self {
            color: color.into(),
            rng: seed.map_or_else(StdRng::from_entropy, StdRng::seed_from_u64),
            tally: Tally::default(),
            _moves: PhantomData,
        }
    }
}

#[async_trait]
impl<M: LegalMove> Player<M> for RandomPlayer<M> {
    fn color(&self) -> &str {
        &self.color
    }

    fn agent(&self) -> &str {
        "random"
    }

    async fn decide(
        &mut self,
        _state: Arc<dyn GameState>,
        mut legal_moves: Vec<M>,
    ) -> Result<Decision<M>, NegotiationError> {
        if legal_moves.is_empty() {
            return Err(NegotiationError::NoLegalMoves(self.color.clone()));
        }
        let index = self.rng.gen_range(0..legal_moves.len());
        self.tally.add(UsageRecord::default(), false);

        Ok(Decision {
            chosen_move: legal_moves.swap_remove(index),
            usage: UsageRecord::default(),
            fell_back: false,
        })
    }

    fn stats(&self) -> PlayerStats {
        self.tally.stats(&self.color, "random")
    }

    fn reset(&mut self) {
        self.tally = Tally::default();
    }
}
