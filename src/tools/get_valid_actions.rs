//! `get_valid_actions` - the legal moves of this decision with their ids

use super::{Tool, ToolContext, ToolOutput, GET_VALID_ACTIONS};
use crate::engine::LegalMove;
use serde_json::{json, Value};

pub struct GetValidActionsTool;

impl<M: LegalMove> Tool<M> for GetValidActionsTool {
    fn name(&self) -> &'static str {
        GET_VALID_ACTIONS
    }

    fn description(&self) -> String {
        "Get every action you can take right now. Each entry has a unique action_id, a description, its type and any relevant details. Call this before selecting an action; ids are only valid for the current decision.".to_string()
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {}
        })
    }

    fn run(&self, _input: &Value, ctx: &mut ToolContext<'_, M>) -> ToolOutput {
        let listings = ctx.actions.listings();
        ToolOutput::success(json!({
            "num_actions": listings.len(),
            "actions": listings,
        }))
    }
}
