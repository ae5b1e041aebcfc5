//! Minimal engine values for unit tests

use super::{BoardLayout, GameState, Holdings, LegalMove, MoveValue, Placement, PlayerId, Standing};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq)]
pub struct TestMove {
    pub kind: &'static str,
    pub value: Option<MoveValue>,
    pub actor: Option<PlayerId>,
}

impl TestMove {
    pub fn new(kind: &'static str, value: Option<MoveValue>) -> Self {
        Self {
            kind,
            value,
            actor: Some("RED".to_string()),
        }
    }

    pub fn at(kind: &'static str, position: i64) -> Self {
        Self::new(kind, Some(MoveValue::Int(position)))
    }

    pub fn bare(kind: &'static str) -> Self {
        Self::new(kind, None)
    }
}

impl LegalMove for TestMove {
    fn action_type(&self) -> String {
        format!("ActionType.{}", self.kind)
    }

    fn value(&self) -> Option<MoveValue> {
        self.value.clone()
    }

    fn actor(&self) -> Option<PlayerId> {
        self.actor.clone()
    }

    fn describe(&self) -> String {
        match &self.value {
            Some(value) => format!("{} {value}", self.kind),
            None => self.kind.to_string(),
        }
    }
}

/// Two-seat table with fixed holdings. Optional sections are switchable so
/// omit-on-missing behaviour can be exercised.
#[derive(Debug, Clone)]
pub struct TableState {
    pub with_board: bool,
    pub with_history: bool,
    pub with_deck: bool,
}

impl Default for TableState {
    fn default() -> Self {
        Self {
            with_board: true,
            with_history: true,
            with_deck: true,
        }
    }
}

impl TableState {
    pub fn bare() -> Self {
        Self {
            with_board: false,
            with_history: false,
            with_deck: false,
        }
    }
}

fn counts(pairs: &[(&str, u32)]) -> BTreeMap<String, u32> {
    pairs.iter().map(|(k, v)| ((*k).to_string(), *v)).collect()
}

impl GameState for TableState {
    fn game_id(&self) -> String {
        "table-1".to_string()
    }

    fn turn_number(&self) -> u64 {
        7
    }

    fn players(&self) -> Vec<PlayerId> {
        vec!["RED".to_string(), "BLUE".to_string()]
    }

    fn holdings(&self, player: &str) -> Holdings {
        match player {
            "RED" => Holdings {
                resources: counts(&[("wood", 2), ("brick", 1), ("ore", 3)]),
                development_cards: counts(&[("knight", 1), ("victory_point", 1)]),
                hidden_victory_points: 1,
            },
            _ => Holdings {
                resources: counts(&[("sheep", 4), ("wheat", 2)]),
                development_cards: counts(&[("knight", 2)]),
                hidden_victory_points: 0,
            },
        }
    }

    fn standing(&self, player: &str) -> Standing {
        let settlements = if player == "RED" { 2 } else { 3 };
        Standing {
            public_victory_points: settlements,
            built: counts(&[("settlement", settlements), ("road", 4)]),
            available: counts(&[("settlement", 5 - settlements), ("road", 11)]),
            badges: Vec::new(),
            knights_played: 0,
            longest_road_length: 4,
        }
    }

    fn development_cards_remaining(&self) -> Option<u32> {
        self.with_deck.then_some(12)
    }

    fn board(&self) -> Option<BoardLayout> {
        self.with_board.then(|| BoardLayout {
            settlements: vec![Placement {
                location: "4".to_string(),
                owner: "RED".to_string(),
            }],
            cities: Vec::new(),
            roads: vec![Placement {
                location: "(4, 5)".to_string(),
                owner: "RED".to_string(),
            }],
            robber_tile: Some("2".to_string()),
        })
    }

    fn recent_actions(&self, limit: usize) -> Option<Vec<String>> {
        self.with_history.then(|| {
            let all = ["RED: ROLL", "RED: END_TURN", "BLUE: ROLL"];
            all.iter()
                .rev()
                .take(limit)
                .rev()
                .map(ToString::to_string)
                .collect()
        })
    }
}
