//! Game engine seam
//!
//! The engine owns the rules, legal-move generation, turn order and win
//! conditions. Everything in this crate sees the game only through the
//! traits below: moves are opaque values that are valid for one decision,
//! and state is read through a narrow, read-only accessor trait.

#[cfg(test)]
pub(crate) mod fixtures;

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Seat identity of a participant (a colour such as `RED`)
pub type PlayerId = String;

/// Discriminating payload a move carries (board position, resource kind, ...)
#[derive(Debug, Clone, PartialEq)]
pub enum MoveValue {
    Int(i64),
    Float(f64),
    Text(String),
    Tuple(Vec<MoveValue>),
}

impl fmt::Display for MoveValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoveValue::Int(n) => write!(f, "{n}"),
            MoveValue::Float(x) => write!(f, "{x}"),
            MoveValue::Text(s) => f.write_str(s),
            MoveValue::Tuple(parts) => {
                f.write_str("(")?;
                for (i, part) in parts.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{part}")?;
                }
                f.write_str(")")
            }
        }
    }
}

/// A candidate action generated by the engine for exactly one decision.
///
/// Moves are compared by identity (the slot they occupy in the list the
/// engine handed over), never structurally: two moves may describe the same
/// thing and still be distinct choices.
pub trait LegalMove: Clone + Send + Sync + 'static {
    /// Move type token, possibly enum-qualified (`ActionType.BUILD_ROAD`)
    fn action_type(&self) -> String;

    /// Discriminating value, if the move carries one
    fn value(&self) -> Option<MoveValue>;

    /// Seat performing the move, if the engine records it on the move
    fn actor(&self) -> Option<PlayerId> {
        None
    }

    /// Human-readable description shown to the agent
    fn describe(&self) -> String;
}

/// Private holdings of one seat. Only ever shown to that seat.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Holdings {
    pub resources: BTreeMap<String, u32>,
    pub development_cards: BTreeMap<String, u32>,
    /// Victory points held in hand and not yet revealed
    pub hidden_victory_points: u32,
}

/// Publicly visible standing of one seat
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Standing {
    pub public_victory_points: u32,
    /// Pieces on the board, by kind
    pub built: BTreeMap<String, u32>,
    /// Pieces still in supply, by kind
    pub available: BTreeMap<String, u32>,
    /// Awards currently held (`longest_road`, `largest_army`)
    pub badges: Vec<String>,
    pub knights_played: u32,
    pub longest_road_length: u32,
}

/// A piece placed at a board location
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placement {
    pub location: String,
    pub owner: PlayerId,
}

/// Full board topology. Expensive to build on large boards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BoardLayout {
    pub settlements: Vec<Placement>,
    pub cities: Vec<Placement>,
    pub roads: Vec<Placement>,
    pub robber_tile: Option<String>,
}

/// Read-only access to the engine's game state.
///
/// Optional sections return `None` when this engine build cannot provide
/// them; callers must treat that as "omit", not as a failure.
pub trait GameState: Send + Sync {
    fn game_id(&self) -> String;

    fn turn_number(&self) -> u64;

    /// Seats in turn order
    fn players(&self) -> Vec<PlayerId>;

    fn holdings(&self, player: &str) -> Holdings;

    fn standing(&self, player: &str) -> Standing;

    fn development_cards_remaining(&self) -> Option<u32> {
        None
    }

    fn board(&self) -> Option<BoardLayout> {
        None
    }

    /// Most recent actions, oldest first, at most `limit` entries
    fn recent_actions(&self, _limit: usize) -> Option<Vec<String>> {
        None
    }
}

/// Errors reported by an engine while a game is being played
#[derive(Debug, Error)]
pub enum GameError {
    #[error("illegal move for {player}: {description}")]
    IllegalMove {
        player: PlayerId,
        description: String,
    },
    #[error("no legal moves available for {0}")]
    NoLegalMoves(PlayerId),
    #[error("no player seated as {0}")]
    UnknownSeat(PlayerId),
    #[error("engine error: {0}")]
    Engine(String),
}

/// A playable game: the collaborator the runner drives
pub trait GameEngine: Send {
    type Move: LegalMove;
    type State: GameState + 'static;

    /// Snapshot handle of the current state, shared with the decision owner
    fn state(&self) -> Arc<Self::State>;

    fn current_player(&self) -> PlayerId;

    fn turn_number(&self) -> u64;

    fn legal_moves(&self, player: &str) -> Vec<Self::Move>;

    fn execute(&mut self, mv: &Self::Move) -> Result<(), GameError>;

    fn winner(&self) -> Option<PlayerId>;

    /// Actual victory points of a seat, used for final scores
    fn score(&self, player: &str) -> u32;
}
