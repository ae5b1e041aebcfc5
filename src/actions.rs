//! Action identity mapping
//!
//! Gives every legal move of one decision a short, readable id
//! (`build_settlement_42`, `end_turn`) and maps both ways between ids and
//! moves. A mapping is scoped to one decision: `set_moves` discards the
//! previous mapping entirely, so an id handed out on an earlier turn can
//! never resolve against a freshly generated move list.

#[cfg(test)]
mod proptests;

use crate::engine::{LegalMove, MoveValue};
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::HashMap;

/// How ids are generated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IdStyle {
    /// Type token plus discriminator, e.g. `build_road_3_4`
    #[default]
    Descriptive,
    /// Positional, e.g. `action_0`
    Indexed,
}

/// One entry of the `get_valid_actions` listing
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ActionListing {
    pub action_id: String,
    pub description: String,
    pub action_type: String,
    pub details: Map<String, Value>,
}

/// Bidirectional id <-> move mapping for the current decision
#[derive(Debug)]
pub struct ActionMapper<M> {
    style: IdStyle,
    moves: Vec<M>,
    /// Parallel to `moves`
    ids: Vec<String>,
    by_id: HashMap<String, usize>,
}

impl<M: LegalMove> ActionMapper<M> {
    pub fn new(style: IdStyle) -> Self {
        Self {
            style,
            moves: Vec::new(),
            ids: Vec::new(),
            by_id: HashMap::new(),
        }
    }

    /// Replace the whole mapping with ids for `moves`.
    ///
    /// Ids are a pure function of the list order: the same list in the same
    /// order always yields the same ids.
    pub fn set_moves(&mut self, moves: Vec<M>) {
        self.clear();

        for (index, mv) in moves.iter().enumerate() {
            let id = match self.style {
                IdStyle::Descriptive => self.unique_id(descriptive_candidate(mv), index),
                IdStyle::Indexed => format!("action_{index}"),
            };
            self.by_id.insert(id.clone(), index);
            self.ids.push(id);
        }
        self.moves = moves;

        tracing::debug!(count = self.moves.len(), "Mapped legal moves");
    }

    /// Drop the mapping; every previously issued id stops resolving
    pub fn clear(&mut self) {
        self.moves.clear();
        self.ids.clear();
        self.by_id.clear();
    }

    pub fn resolve(&self, id: &str) -> Option<&M> {
        self.by_id.get(id).map(|&index| &self.moves[index])
    }

    /// Id of a move held by this mapper.
    ///
    /// Identity is the slot the move occupies, compared by address, so only
    /// references obtained from this mapper (`moves()`, `resolve()`) match.
    /// Structurally equal copies do not.
    pub fn id_of(&self, mv: &M) -> Option<&str> {
        self.moves
            .iter()
            .position(|candidate| std::ptr::eq(candidate, mv))
            .map(|index| self.ids[index].as_str())
    }

    pub fn contains(&self, id: &str) -> bool {
        self.by_id.contains_key(id)
    }

    /// Ids in move order
    pub fn list_ids(&self) -> &[String] {
        &self.ids
    }

    pub fn moves(&self) -> &[M] {
        &self.moves
    }

    pub fn len(&self) -> usize {
        self.moves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    /// Listing of every mapped move, in move order
    pub fn listings(&self) -> Vec<ActionListing> {
        self.ids
            .iter()
            .zip(&self.moves)
            .map(|(id, mv)| ActionListing {
                action_id: id.clone(),
                description: mv.describe(),
                action_type: type_name(&mv.action_type()).to_string(),
                details: details(mv),
            })
            .collect()
    }

    /// Append `_<index>` until the id is free. Repeats so that a suffixed id
    /// can't clash with a natural id generated earlier in the list.
    fn unique_id(&self, candidate: String, index: usize) -> String {
        let mut id = candidate;
        while self.by_id.contains_key(&id) {
            id = format!("{id}_{index}");
        }
        id
    }
}

impl<M: LegalMove> Default for ActionMapper<M> {
    fn default() -> Self {
        Self::new(IdStyle::default())
    }
}

fn descriptive_candidate<M: LegalMove>(mv: &M) -> String {
    let mut parts = vec![type_token(&mv.action_type())];
    if let Some(value) = mv.value() {
        value_parts(&value, &mut parts);
    }
    parts.retain(|p| !p.is_empty());
    if parts.is_empty() {
        return "action".to_string();
    }
    parts.join("_")
}

/// Last segment of an enum-qualified name (`ActionType.END_TURN` -> `END_TURN`)
fn type_name(raw: &str) -> &str {
    raw.rsplit(&['.', ':'][..]).next().unwrap_or(raw)
}

/// Normalised type token: snake case, lowercase, alphanumerics and `_` only
fn type_token(raw: &str) -> String {
    let name = type_name(raw);
    let mut token = String::with_capacity(name.len() + 4);
    let mut prev_lower = false;
    for ch in name.chars() {
        if ch.is_ascii_alphanumeric() {
            if ch.is_ascii_uppercase() && prev_lower {
                token.push('_');
            }
            prev_lower = ch.is_ascii_lowercase() || ch.is_ascii_digit();
            token.push(ch.to_ascii_lowercase());
        } else {
            prev_lower = false;
            token.push('_');
        }
    }
    collapse_underscores(&token)
}

fn text_token(raw: &str) -> String {
    let lowered: String = raw
        .chars()
        .map(|ch| {
            if ch.is_ascii_alphanumeric() || ch == '-' {
                ch.to_ascii_lowercase()
            } else {
                '_'
            }
        })
        .collect();
    collapse_underscores(&lowered)
}

fn collapse_underscores(s: &str) -> String {
    s.split('_')
        .filter(|segment| !segment.is_empty())
        .collect::<Vec<_>>()
        .join("_")
}

#[allow(clippy::cast_possible_truncation)] // Float discriminators are truncated
fn value_parts(value: &MoveValue, parts: &mut Vec<String>) {
    match value {
        MoveValue::Int(n) => parts.push(n.to_string()),
        MoveValue::Float(x) => parts.push((*x as i64).to_string()),
        MoveValue::Text(s) => parts.push(text_token(s)),
        MoveValue::Tuple(items) => {
            for item in items {
                value_parts(item, parts);
            }
        }
    }
}

fn details<M: LegalMove>(mv: &M) -> Map<String, Value> {
    let mut details = Map::new();
    if let Some(actor) = mv.actor() {
        details.insert("actor".to_string(), Value::String(actor));
    }
    if let Some(value) = mv.value() {
        details.insert("value".to_string(), Value::String(value.to_string()));
    }
    details
}
