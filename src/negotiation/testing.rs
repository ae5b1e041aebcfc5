//! Mock reasoning agents for testing
//!
//! These mocks drive the negotiation loop without real I/O.

use crate::llm::{ContentBlock, LlmError, LlmErrorKind, LlmRequest, LlmResponse, LlmService, Usage};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

/// Usage attached to every canned response
pub const MOCK_USAGE: Usage = Usage {
    input_tokens: 100,
    output_tokens: 20,
};

/// Response with text only (the agent declines to call tools)
pub fn text_response(text: &str) -> LlmResponse {
    LlmResponse {
        content: vec![ContentBlock::text(text)],
        end_turn: true,
        usage: MOCK_USAGE,
    }
}

/// Response calling `calls` in order; ids are `call_<n>`
pub fn tool_response(calls: &[(&str, Value)]) -> LlmResponse {
    LlmResponse {
        content: calls
            .iter()
            .enumerate()
            .map(|(i, (name, input))| ContentBlock::tool_use(format!("call_{i}"), *name, input.clone()))
            .collect(),
        end_turn: false,
        usage: MOCK_USAGE,
    }
}

/// Mock LLM client that returns queued responses
pub struct MockLlmClient {
    responses: Mutex<VecDeque<Result<LlmResponse, LlmError>>>,
    model_id: String,
    /// Record of all requests made
    pub requests: Mutex<Vec<LlmRequest>>,
}

impl MockLlmClient {
    pub fn new(model_id: impl Into<String>) -> Self {
        Self {
            responses: Mutex::new(VecDeque::new()),
            model_id: model_id.into(),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Queue a successful response
    pub fn queue_response(&self, response: LlmResponse) {
        self.responses.lock().unwrap().push_back(Ok(response));
    }

    /// Queue an error response
    pub fn queue_error(&self, error: LlmError) {
        self.responses.lock().unwrap().push_back(Err(error));
    }

    /// Get recorded requests
    pub fn recorded_requests(&self) -> Vec<LlmRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl LlmService for MockLlmClient {
    async fn complete(&self, request: &LlmRequest) -> Result<LlmResponse, LlmError> {
        self.requests.lock().unwrap().push(request.clone());
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(LlmError::network("No mock response queued")))
    }

    fn model_id(&self) -> &str {
        &self.model_id
    }
}

/// Client whose every request fails with the same error kind
pub struct FailingLlmClient {
    kind: LlmErrorKind,
    calls: AtomicU32,
}

impl FailingLlmClient {
    pub fn new(kind: LlmErrorKind) -> Self {
        Self {
            kind,
            calls: AtomicU32::new(0),
        }
    }

    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LlmService for FailingLlmClient {
    async fn complete(&self, _request: &LlmRequest) -> Result<LlmResponse, LlmError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(LlmError::new(self.kind, "upstream unavailable"))
    }

    fn model_id(&self) -> &str {
        "failing"
    }
}
