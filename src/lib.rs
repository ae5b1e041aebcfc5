//! Tool Arena - board-game move selection through LLM tool use
//!
//! An agent never sees engine objects. Each decision hands it three tools
//! over a player-scoped view of the game: read the state, list the legal
//! actions under short readable ids, and select one id. The negotiation loop
//! bounds the exchange and always comes back with exactly one legal move.

#![allow(clippy::must_use_candidate, clippy::missing_errors_doc, clippy::module_name_repetitions)]

pub mod actions;
pub mod config;
pub mod engine;
pub mod llm;
pub mod negotiation;
pub mod outpost;
pub mod player;
pub mod runner;
pub mod state_view;
pub mod system_prompt;
pub mod tools;
