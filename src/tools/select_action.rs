//! `select_action` - record the agent's choice
//!
//! Selecting never executes anything. The decision owner reads the pending
//! selection back once negotiation ends and hands the move to the engine.

use super::{Tool, ToolContext, ToolOutput, SELECT_ACTION};
use crate::engine::LegalMove;
use serde_json::{json, Value};

const EXAMPLE_ID: &str = "end_turn";

pub struct SelectActionTool;

impl<M: LegalMove> Tool<M> for SelectActionTool {
    fn name(&self) -> &'static str {
        SELECT_ACTION
    }

    fn description(&self) -> String {
        "Select the action to take by its action_id. This records your choice but does NOT execute it; the game engine executes it after you finish. The id must come from get_valid_actions for the current decision. This is the final step of your turn.".to_string()
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "action_id": {
                    "type": "string",
                    "description": "The action_id of the action to take, as returned by get_valid_actions."
                }
            },
            "required": ["action_id"]
        })
    }

    fn run(&self, input: &Value, ctx: &mut ToolContext<'_, M>) -> ToolOutput {
        let action_id = match input.get("action_id").and_then(Value::as_str) {
            Some(id) if !id.is_empty() => id,
            _ => {
                let example = ctx.actions.list_ids().first().map_or(EXAMPLE_ID, String::as_str);
                return ToolOutput::error(json!({
                    "error": "action_id is required",
                    "example": { "action_id": example },
                }));
            }
        };

        let Some(mv) = ctx.actions.resolve(action_id) else {
            tracing::warn!(player = ctx.player, action_id, "Invalid action selected");
            return ToolOutput::error(json!({
                "error": format!("Invalid action_id: {action_id}"),
                "valid_action_ids": ctx.actions.list_ids(),
            }));
        };
        let description = mv.describe();

        ctx.select(action_id);
        tracing::info!(player = ctx.player, action_id, "Action selected");

        ToolOutput::success(json!({
            "success": true,
            "action_id": action_id,
            "action_description": description,
            "message": "Action selected successfully. The game engine will execute it.",
        }))
    }
}
