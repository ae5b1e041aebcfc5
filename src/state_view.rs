//! Player-scoped state snapshots
//!
//! Turns engine state into the JSON view one seat is entitled to see. The
//! viewer gets its own holdings in full; every other seat is reduced to
//! public aggregates (card counts, never card identities).
//!
//! The default view is cheap because it is built on every decision, often
//! several times. Board topology and history are opt-in, and any section
//! the engine can't provide is left out of the view instead of failing it.

use crate::engine::{GameState, Placement, PlayerId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// Bumped whenever a field is removed or changes meaning
pub const VIEW_SCHEMA_VERSION: u32 = 1;

/// Entries of `recent_actions` included when history is requested
pub const HISTORY_LIMIT: usize = 10;

/// Optional sections of a snapshot. Doubles as the `get_state` tool input.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewOptions {
    #[serde(default)]
    pub include_board: bool,
    #[serde(default)]
    pub include_history: bool,
}

impl ViewOptions {
    pub fn full() -> Self {
        Self {
            include_board: true,
            include_history: true,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ViewError {
    #[error("{0} is not seated in this game")]
    UnknownViewer(PlayerId),
}

/// What one seat sees of the game
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PlayerView {
    pub schema_version: u32,
    pub game_id: String,
    pub turn_number: u64,
    pub you: PlayerId,
    pub your_state: OwnState,
    pub opponents: Vec<OpponentState>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub development_cards_remaining: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub board: Option<BoardView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recent_actions: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct OwnState {
    pub resources: BTreeMap<String, u32>,
    pub total_resources: u32,
    pub development_cards: BTreeMap<String, u32>,
    pub total_development_cards: u32,
    /// Includes hidden victory points
    pub victory_points: u32,
    pub public_victory_points: u32,
    pub buildings: Buildings,
    pub badges: Vec<String>,
    pub knights_played: u32,
    pub longest_road_length: u32,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct OpponentState {
    pub player: PlayerId,
    pub victory_points: u32,
    pub resource_count: u32,
    pub development_card_count: u32,
    pub buildings: BTreeMap<String, u32>,
    pub badges: Vec<String>,
    pub knights_played: u32,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Buildings {
    pub built: BTreeMap<String, u32>,
    pub available: BTreeMap<String, u32>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct BoardView {
    pub settlements: Vec<PlacementView>,
    pub cities: Vec<PlacementView>,
    pub roads: Vec<PlacementView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub robber_tile: Option<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PlacementView {
    pub location: String,
    pub owner: PlayerId,
}

impl From<&Placement> for PlacementView {
    fn from(p: &Placement) -> Self {
        Self {
            location: p.location.clone(),
            owner: p.owner.clone(),
        }
    }
}

/// Build the view of `state` as seen by `viewer`. Never mutates `state`.
pub fn snapshot(
    state: &dyn GameState,
    viewer: &str,
    options: ViewOptions,
) -> Result<PlayerView, ViewError> {
    let players = state.players();
    if !players.iter().any(|p| p == viewer) {
        return Err(ViewError::UnknownViewer(viewer.to_string()));
    }

    let opponents = players
        .iter()
        .filter(|p| p.as_str() != viewer)
        .map(|p| opponent_state(state, p))
        .collect();

    let board = if options.include_board {
        let board = state.board();
        if board.is_none() {
            tracing::debug!("Board section unavailable, omitting");
        }
        board.map(|b| BoardView {
            settlements: b.settlements.iter().map(PlacementView::from).collect(),
            cities: b.cities.iter().map(PlacementView::from).collect(),
            roads: b.roads.iter().map(PlacementView::from).collect(),
            robber_tile: b.robber_tile,
        })
    } else {
        None
    };

    let recent_actions = if options.include_history {
        state.recent_actions(HISTORY_LIMIT)
    } else {
        None
    };

    Ok(PlayerView {
        schema_version: VIEW_SCHEMA_VERSION,
        game_id: state.game_id(),
        turn_number: state.turn_number(),
        you: viewer.to_string(),
        your_state: own_state(state, viewer),
        opponents,
        development_cards_remaining: state.development_cards_remaining(),
        board,
        recent_actions,
    })
}

fn own_state(state: &dyn GameState, viewer: &str) -> OwnState {
    let holdings = state.holdings(viewer);
    let standing = state.standing(viewer);

    OwnState {
        total_resources: holdings.resources.values().sum(),
        total_development_cards: holdings.development_cards.values().sum(),
        victory_points: standing.public_victory_points + holdings.hidden_victory_points,
        public_victory_points: standing.public_victory_points,
        resources: holdings.resources,
        development_cards: holdings.development_cards,
        buildings: Buildings {
            built: standing.built,
            available: standing.available,
        },
        badges: standing.badges,
        knights_played: standing.knights_played,
        longest_road_length: standing.longest_road_length,
    }
}

fn opponent_state(state: &dyn GameState, player: &str) -> OpponentState {
    let holdings = state.holdings(player);
    let standing = state.standing(player);

    OpponentState {
        player: player.to_string(),
        victory_points: standing.public_victory_points,
        resource_count: holdings.resources.values().sum(),
        development_card_count: holdings.development_cards.values().sum(),
        buildings: standing.built,
        badges: standing.badges,
        knights_played: standing.knights_played,
    }
}
