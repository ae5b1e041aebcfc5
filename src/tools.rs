//! Decision tools exposed to the reasoning agent
//!
//! Tools are stateless: everything a call needs arrives through a
//! `ToolContext` built by the dispatcher from the active decision. The
//! dispatcher is the only owner of mutable protocol state (the mapping and
//! the pending selection) and has exactly two states. Idle answers every
//! call with a structured error. Active serves the three tools against one
//! player's one decision.

mod get_state;
mod get_valid_actions;
mod select_action;

pub use get_state::GetStateTool;
pub use get_valid_actions::GetValidActionsTool;
pub use select_action::SelectActionTool;

use crate::actions::{ActionMapper, IdStyle};
use crate::engine::{GameState, LegalMove, PlayerId};
use crate::llm::ToolDefinition;
use serde::Serialize;
use serde_json::{json, Value};
use std::ops::{Deref, DerefMut};
use std::sync::Arc;

pub const GET_STATE: &str = "get_state";
pub const GET_VALID_ACTIONS: &str = "get_valid_actions";
pub const SELECT_ACTION: &str = "select_action";

/// Result from tool execution. Always a JSON object; errors carry an
/// `error` string.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolOutput {
    pub success: bool,
    pub output: Value,
}

impl ToolOutput {
    pub fn success(output: Value) -> Self {
        Self {
            success: true,
            output,
        }
    }

    pub fn error(output: Value) -> Self {
        Self {
            success: false,
            output,
        }
    }

    /// Error object with only a message
    pub fn message(error: impl Into<String>) -> Self {
        Self::error(json!({ "error": error.into() }))
    }

    /// Text sent back to the agent as the tool result
    pub fn content(&self) -> String {
        serde_json::to_string_pretty(&self.output).unwrap_or_else(|_| self.output.to_string())
    }
}

/// All context needed for one tool invocation
pub struct ToolContext<'a, M> {
    pub player: &'a str,
    pub state: &'a dyn GameState,
    pub actions: &'a ActionMapper<M>,
    selection: &'a mut Option<String>,
}

impl<M> ToolContext<'_, M> {
    /// Record `action_id` as the pending selection. Callers validate first.
    pub fn select(&mut self, action_id: &str) {
        *self.selection = Some(action_id.to_string());
    }
}

/// Trait for tools the agent can call during a decision
pub trait Tool<M: LegalMove>: Send + Sync {
    fn name(&self) -> &'static str;

    /// Tool description for LLM
    fn description(&self) -> String;

    /// JSON schema for tool input
    fn input_schema(&self) -> Value;

    fn run(&self, input: &Value, ctx: &mut ToolContext<'_, M>) -> ToolOutput;
}

/// Transient state for one player's one decision
pub struct DecisionContext {
    pub player: PlayerId,
    pub state: Arc<dyn GameState>,
    pub selected: Option<String>,
}

/// Serves tool calls for one decision at a time.
///
/// One dispatcher per game: it is `Send` but deliberately not shareable, and
/// every mutating method takes `&mut self`.
pub struct ToolDispatcher<M: LegalMove> {
    tools: Vec<Box<dyn Tool<M>>>,
    actions: ActionMapper<M>,
    context: Option<DecisionContext>,
}

impl<M: LegalMove> ToolDispatcher<M> {
    pub fn new(style: IdStyle) -> Self {
        Self {
            tools: vec![
                Box::new(GetStateTool),
                Box::new(GetValidActionsTool),
                Box::new(SelectActionTool),
            ],
            actions: ActionMapper::new(style),
            context: None,
        }
    }

    /// Idle -> Active. Always a hard reset: any earlier mapping and selection
    /// are discarded, whether or not the previous decision cleared them.
    pub fn set_context(&mut self, player: &str, state: Arc<dyn GameState>, moves: Vec<M>) {
        if self.context.is_some() {
            tracing::warn!(player, "Previous decision context was not cleared");
        }
        self.actions.set_moves(moves);
        self.context = Some(DecisionContext {
            player: player.to_string(),
            state,
            selected: None,
        });
        tracing::debug!(player, actions = self.actions.len(), "Decision context set");
    }

    /// Active -> Idle. Every id handed out for the decision stops resolving.
    pub fn clear_context(&mut self) {
        self.context = None;
        self.actions.clear();
        tracing::debug!("Decision context cleared");
    }

    /// Start a decision whose context is cleared when the guard drops,
    /// including on early return, panic, or a dropped future.
    pub fn begin(
        &mut self,
        player: &str,
        state: Arc<dyn GameState>,
        moves: Vec<M>,
    ) -> DecisionGuard<'_, M> {
        self.set_context(player, state, moves);
        DecisionGuard { dispatcher: self }
    }

    pub fn is_active(&self) -> bool {
        self.context.is_some()
    }

    pub fn context(&self) -> Option<&DecisionContext> {
        self.context.as_ref()
    }

    /// Execute one tool call. Never panics across the tool boundary; every
    /// failure is a JSON error the agent can read.
    pub fn handle_tool_call(&mut self, name: &str, input: &Value) -> ToolOutput {
        tracing::debug!(tool = name, %input, "Tool called");

        // No decision in progress, so no id is valid
        let Some(context) = self.context.as_mut() else {
            return ToolOutput::error(json!({
                "error": "No game context set. Server not initialized for this decision.",
                "valid_action_ids": [],
            }));
        };

        let Some(tool) = self.tools.iter().find(|t| t.name() == name) else {
            return ToolOutput::error(json!({
                "error": format!("Unknown tool: {name}"),
                "available_tools": self.tools.iter().map(|t| t.name()).collect::<Vec<_>>(),
            }));
        };

        let mut ctx = ToolContext {
            player: &context.player,
            state: context.state.as_ref(),
            actions: &self.actions,
            selection: &mut context.selected,
        };
        tool.run(input, &mut ctx)
    }

    /// Pending selection resolved back to its move
    pub fn selection(&self) -> Option<&M> {
        self.selected_id().and_then(|id| self.actions.resolve(id))
    }

    pub fn selected_id(&self) -> Option<&str> {
        self.context.as_ref()?.selected.as_deref()
    }

    /// Schemas for every tool, in a fixed order
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.tools
            .iter()
            .map(|t| ToolDefinition {
                name: t.name().to_string(),
                description: t.description(),
                input_schema: t.input_schema(),
            })
            .collect()
    }

    pub fn actions(&self) -> &ActionMapper<M> {
        &self.actions
    }
}

impl<M: LegalMove> Default for ToolDispatcher<M> {
    fn default() -> Self {
        Self::new(IdStyle::default())
    }
}

/// Active decision on a dispatcher. Clears the context on drop.
pub struct DecisionGuard<'a, M: LegalMove> {
    dispatcher: &'a mut ToolDispatcher<M>,
}

impl<M: LegalMove> Deref for DecisionGuard<'_, M> {
    type Target = ToolDispatcher<M>;

    fn deref(&self) -> &Self::Target {
        self.dispatcher
    }
}

impl<M: LegalMove> DerefMut for DecisionGuard<'_, M> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.dispatcher
    }
}

impl<M: LegalMove> Drop for DecisionGuard<'_, M> {
    fn drop(&mut self) {
        self.dispatcher.clear_context();
    }
}
