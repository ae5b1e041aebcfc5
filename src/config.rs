//! Arena configuration from environment variables

use crate::negotiation::{NegotiationConfig, RetryPolicy, DEFAULT_MAX_ROUNDS};
use crate::runner::{RunnerConfig, DEFAULT_MAX_TURNS};
use std::str::FromStr;

/// Seat token for the random baseline
pub const RANDOM_AGENT: &str = "random";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArenaConfig {
    pub games: usize,
    pub max_turns: u64,
    pub max_rounds: usize,
    /// Attempts per agent request, first attempt included
    pub max_retries: u32,
    pub target_points: u32,
    /// Seeds boards, dice and fallback picks for reproducible runs
    pub seed: Option<u64>,
    /// One agent per seat: a model id or `random`. Empty means the default
    /// model against the random baseline.
    pub players: Vec<String>,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            games: 1,
            max_turns: DEFAULT_MAX_TURNS,
            max_rounds: DEFAULT_MAX_ROUNDS,
            max_retries: 3,
            target_points: 10,
            seed: None,
            players: Vec::new(),
        }
    }
}

fn parsed<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    let raw = lookup(key)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!(key, value = %raw, "Ignoring unparseable setting");
            None
        }
    }
}

impl ArenaConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            games: parsed(&lookup, "ARENA_GAMES").unwrap_or(defaults.games),
            max_turns: parsed(&lookup, "ARENA_MAX_TURNS").unwrap_or(defaults.max_turns),
            max_rounds: parsed(&lookup, "ARENA_MAX_ROUNDS")
                .filter(|&n| n > 0)
                .unwrap_or(defaults.max_rounds),
            max_retries: parsed(&lookup, "ARENA_MAX_RETRIES")
                .filter(|&n| n > 0)
                .unwrap_or(defaults.max_retries),
            target_points: parsed(&lookup, "ARENA_TARGET_POINTS").unwrap_or(defaults.target_points),
            seed: parsed(&lookup, "ARENA_SEED"),
            players: lookup("ARENA_PLAYERS")
                .map(|raw| {
                    raw.split(',')
                        .map(str::trim)
                        .filter(|s| !s.is_empty())
                        .map(ToString::to_string)
                        .collect()
                })
                .unwrap_or_default(),
        }
    }

    /// Negotiation settings for one seat in game `game`
    pub fn negotiation(&self, game: usize, seat: usize) -> NegotiationConfig {
        NegotiationConfig {
            max_rounds: self.max_rounds,
            retry: RetryPolicy {
                max_attempts: self.max_retries,
                ..Default::default()
            },
            fallback_seed: self.seat_seed(game, seat),
            ..Default::default()
        }
    }

    pub fn runner(&self) -> RunnerConfig {
        RunnerConfig {
            max_turns: self.max_turns,
            ..Default::default()
        }
    }

    /// Distinct per-game, per-seat seed derived from the arena seed
    pub fn seat_seed(&self, game: usize, seat: usize) -> Option<u64> {
        self.seed.map(|seed| {
            seed.wrapping_add((game as u64) << 8)
                .wrapping_add(seat as u64 + 1)
        })
    }

    pub fn game_seed(&self, game: usize) -> Option<u64> {
        self.seed.map(|seed| seed.wrapping_add((game as u64) << 8))
    }
}
