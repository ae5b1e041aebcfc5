//! `get_state` - player-scoped snapshot of the game

use super::{Tool, ToolContext, ToolOutput, GET_STATE};
use crate::engine::LegalMove;
use crate::state_view::{snapshot, ViewOptions};
use serde_json::{json, Value};

pub struct GetStateTool;

impl<M: LegalMove> Tool<M> for GetStateTool {
    fn name(&self) -> &'static str {
        GET_STATE
    }

    fn description(&self) -> String {
        "Get the current game state from your point of view. Returns your resources, development cards, buildings and victory points, plus public information about each opponent. Use this to understand the situation before choosing an action.".to_string()
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "include_board": {
                    "type": "boolean",
                    "description": "Include board placements (settlements, cities, roads, robber). Expensive; only request it for spatial decisions.",
                    "default": false
                },
                "include_history": {
                    "type": "boolean",
                    "description": "Include the most recent game actions for context.",
                    "default": false
                }
            }
        })
    }

    fn run(&self, input: &Value, ctx: &mut ToolContext<'_, M>) -> ToolOutput {
        let options = if input.is_null() {
            ViewOptions::default()
        } else {
            match serde_json::from_value::<ViewOptions>(input.clone()) {
                Ok(options) => options,
                Err(e) => return ToolOutput::message(format!("Invalid input: {e}")),
            }
        };

        match snapshot(ctx.state, ctx.player, options) {
            Ok(view) => match serde_json::to_value(view) {
                Ok(value) => ToolOutput::success(value),
                Err(e) => ToolOutput::message(format!("Failed to get game state: {e}")),
            },
            Err(e) => {
                tracing::error!(player = ctx.player, error = %e, "Failed to build state snapshot");
                ToolOutput::message(format!("Failed to get game state: {e}"))
            }
        }
    }
}
