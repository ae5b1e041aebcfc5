//! Game runner
//!
//! Plays complete games by looping decisions against a [`GameEngine`], and
//! runs tournaments of independent games concurrently. Every game gets its
//! own engine and players (and with them its own dispatchers), built fresh
//! by the tournament factory.

use crate::engine::{GameEngine, GameError, GameState, PlayerId};
use crate::negotiation::NegotiationError;
use crate::player::{Player, PlayerStats};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use thiserror::Error;
use tokio::task::JoinSet;

pub const DEFAULT_MAX_TURNS: u64 = 200;
pub const DEFAULT_MAX_DECISIONS: usize = 5000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunnerConfig {
    /// Game ends as a draw once the engine reaches this turn
    pub max_turns: u64,
    /// Hard stop on decisions, for engines whose turns can stall
    pub max_decisions: usize,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            max_turns: DEFAULT_MAX_TURNS,
            max_decisions: DEFAULT_MAX_DECISIONS,
        }
    }
}

#[derive(Debug, Error)]
pub enum RunnerError {
    #[error(transparent)]
    Game(#[from] GameError),
    #[error(transparent)]
    Negotiation(#[from] NegotiationError),
    #[error("game setup failed: {0}")]
    Setup(String),
    #[error("game task failed: {0}")]
    Task(String),
}

/// Result of one finished game
#[derive(Debug, Clone, Serialize)]
pub struct GameRecord {
    pub game_id: String,
    /// `None` for a draw at the turn limit
    pub winner: Option<PlayerId>,
    pub scores: BTreeMap<PlayerId, u32>,
    pub turns: u64,
    pub decisions: usize,
    pub player_stats: Vec<PlayerStats>,
    pub total_cost: f64,
    pub total_tokens: u64,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl GameRecord {
    pub fn duration_secs(&self) -> f64 {
        (self.finished_at - self.started_at)
            .to_std()
            .map_or(0.0, |d| d.as_secs_f64())
    }
}

pub type Seats<M> = Vec<Box<dyn Player<M>>>;

/// Play one game to a win or to the turn limit
pub async fn run_game<E: GameEngine>(
    engine: &mut E,
    players: &mut Seats<E::Move>,
    config: RunnerConfig,
) -> Result<GameRecord, RunnerError> {
    let started_at = Utc::now();
    let game_id = engine.state().game_id();
    for player in players.iter_mut() {
        player.reset();
    }
    tracing::info!(game_id = %game_id, players = players.len(), "Game started");

    let mut decisions = 0;
    while engine.winner().is_none()
        && engine.turn_number() < config.max_turns
        && decisions < config.max_decisions
    {
        let current = engine.current_player();
        let player = players
            .iter_mut()
            .find(|p| p.color() == current)
            .ok_or_else(|| GameError::UnknownSeat(current.clone()))?;

        let moves = engine.legal_moves(&current);
        if moves.is_empty() {
            return Err(GameError::NoLegalMoves(current).into());
        }

        let state: Arc<dyn GameState> = engine.state();
        let decision = player.decide(state, moves).await?;
        engine.execute(&decision.chosen_move)?;
        decisions += 1;
    }

    let state = engine.state();
    let scores = state
        .players()
        .into_iter()
        .map(|p| {
            let score = engine.score(&p);
            (p, score)
        })
        .collect();
    let player_stats: Vec<PlayerStats> = players.iter().map(|p| p.stats()).collect();

    let record = GameRecord {
        game_id,
        winner: engine.winner(),
        scores,
        turns: engine.turn_number(),
        decisions,
        total_cost: player_stats.iter().map(|s| s.total_cost).sum(),
        total_tokens: player_stats.iter().map(|s| s.total_tokens).sum(),
        player_stats,
        started_at,
        finished_at: Utc::now(),
    };

    match &record.winner {
        Some(winner) => tracing::info!(
            game_id = %record.game_id,
            winner = %winner,
            turns = record.turns,
            duration_secs = record.duration_secs(),
            cost_usd = record.total_cost,
            "Game finished"
        ),
        None => tracing::warn!(
            game_id = %record.game_id,
            turns = record.turns,
            decisions = record.decisions,
            duration_secs = record.duration_secs(),
            "Game ended without a winner"
        ),
    }
    Ok(record)
}

/// Everything one tournament game needs, built fresh per game
pub struct GameSetup<E: GameEngine> {
    pub engine: E,
    pub players: Seats<E::Move>,
    pub config: RunnerConfig,
}

#[derive(Debug, Default, Serialize)]
pub struct TournamentSummary {
    pub records: Vec<GameRecord>,
    pub failures: Vec<String>,
    /// Wins by agent name
    pub wins: BTreeMap<String, usize>,
    pub draws: usize,
    pub total_cost: f64,
    pub total_tokens: u64,
}

impl TournamentSummary {
    fn add(&mut self, record: GameRecord) {
        let winner_agent = record.winner.as_ref().and_then(|w| {
            record
                .player_stats
                .iter()
                .find(|s| &s.player == w)
                .map(|s| s.agent.clone())
        });
        match winner_agent {
            Some(agent) => *self.wins.entry(agent).or_default() += 1,
            None => self.draws += 1,
        }
        self.total_cost += record.total_cost;
        self.total_tokens += record.total_tokens;
        self.records.push(record);
    }
}

/// Run `games` independent games concurrently.
///
/// A game that fails is reported in `failures` and does not stop the others.
pub async fn run_tournament<E, F>(games: usize, factory: F) -> TournamentSummary
where
    E: GameEngine + 'static,
    F: Fn(usize) -> Result<GameSetup<E>, RunnerError>,
{
    let mut summary = TournamentSummary::default();
    let mut set = JoinSet::new();

    for index in 0..games {
        let setup = match factory(index) {
            Ok(setup) => setup,
            Err(e) => {
                tracing::error!(game = index, error = %e, "Game setup failed");
                summary.failures.push(format!("game {index}: {e}"));
                continue;
            }
        };
        set.spawn(async move {
            let GameSetup {
                mut engine,
                mut players,
                config,
            } = setup;
            run_game(&mut engine, &mut players, config).await
        });
    }

    while let Some(joined) = set.join_next().await {
        match joined.map_err(|e| RunnerError::Task(e.to_string())) {
            Ok(Ok(record)) => summary.add(record),
            Ok(Err(e)) | Err(e) => {
                tracing::error!(error = %e, "Game failed");
                summary.failures.push(e.to_string());
            }
        }
    }

    tracing::info!(
        games = summary.records.len(),
        failures = summary.failures.len(),
        draws = summary.draws,
        cost_usd = summary.total_cost,
        tokens = summary.total_tokens,
        "Tournament finished"
    );
    summary
}
