//! Conversation accumulated over one decision

use crate::llm::{ContentBlock, LlmMessage, LlmRequest, SystemContent, ToolDefinition};

/// Neutral opening turn; the system prompt carries everything specific
pub const OPENING_PROMPT: &str = "Make your move in the game.";

/// Messages exchanged with the agent for one decision. Discarded when the
/// decision ends.
#[derive(Debug, Clone)]
pub struct Conversation {
    system: String,
    messages: Vec<LlmMessage>,
}

impl Conversation {
    pub fn new(system_prompt: impl Into<String>) -> Self {
        Self {
            system: system_prompt.into(),
            messages: vec![LlmMessage::user(vec![ContentBlock::text(OPENING_PROMPT)])],
        }
    }

    /// Agent turn, kept verbatim so its tool calls pair with their results
    pub fn push_assistant(&mut self, content: Vec<ContentBlock>) {
        self.messages.push(LlmMessage::assistant(content));
    }

    pub fn push_tool_results(&mut self, results: Vec<ContentBlock>) {
        if !results.is_empty() {
            self.messages.push(LlmMessage::user(results));
        }
    }

    pub fn request(&self, tools: &[ToolDefinition], max_tokens: u32, temperature: f32) -> LlmRequest {
        LlmRequest {
            system: vec![SystemContent::new(self.system.clone())],
            messages: self.messages.clone(),
            tools: tools.to_vec(),
            max_tokens: Some(max_tokens),
            temperature: Some(temperature),
        }
    }

    pub fn messages(&self) -> &[LlmMessage] {
        &self.messages
    }
}
