//! Mock implementations for testing
//!
//! These mocks enable session testing without real I/O.

use super::traits::{LlmClient, ToolExecutor};
use crate::llm::{ContentBlock, LlmError, LlmRequest, LlmResponse, ToolDefinition, Usage};
use crate::tools::ToolOutput;
use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::{HashSet, VecDeque};
use std::sync::Mutex;

// ============================================================================
// Response builders
// ============================================================================

/// A plain text model reply
pub fn text_response(text: &str) -> LlmResponse {
    LlmResponse {
        content: vec![ContentBlock::text(text)],
        usage: Usage::default(),
    }
}

/// A model reply that calls `job_search`
pub fn search_response(tool_use_id: &str, query: &str) -> LlmResponse {
    LlmResponse {
        content: vec![ContentBlock::tool_use(
            tool_use_id,
            "job_search",
            json!({ "query": query }),
        )],
        usage: Usage::default(),
    }
}

// ============================================================================
// Mock LLM Client
// ============================================================================

/// Mock LLM client that returns queued responses
pub struct MockLlmClient {
    responses: Mutex<VecDeque<Result<LlmResponse, LlmError>>>,
    /// Record of all requests made
    requests: Mutex<Vec<LlmRequest>>,
}

impl MockLlmClient {
    pub fn new() -> Self {
        Self {
            responses: Mutex::new(VecDeque::new()),
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

impl Default for MockLlmClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LlmClient for MockLlmClient {
    async fn complete(&self, request: &LlmRequest) -> Result<LlmResponse, LlmError> {
        self.requests.lock().unwrap().push(request.clone());
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(LlmError::network("No mock response queued")))
    }
}

// ============================================================================
// Mock Tool Executor
// ============================================================================

/// Mock tool executor returning queued outputs in order
pub struct MockToolExecutor {
    names: HashSet<String>,
    definitions: Vec<ToolDefinition>,
    outputs: Mutex<VecDeque<ToolOutput>>,
    /// Record of tool executions
    executions: Mutex<Vec<(String, Value)>>,
}

impl MockToolExecutor {
    pub fn new() -> Self {
        Self {
            names: HashSet::new(),
            definitions: Vec::new(),
            outputs: Mutex::new(VecDeque::new()),
            executions: Mutex::new(Vec::new()),
        }
    }

    /// Register a tool name
    pub fn with_tool(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        self.definitions.push(ToolDefinition {
            name: name.clone(),
            description: format!("Mock {name}"),
            input_schema: json!({ "type": "object", "properties": {} }),
        });
        self.names.insert(name);
        self
    }

    /// Queue the output of the next execution
    pub fn queue_output(&self, output: ToolOutput) {
        self.outputs.lock().unwrap().push_back(output);
    }

    /// Get recorded executions
    pub fn recorded_executions(&self) -> Vec<(String, Value)> {
        self.executions.lock().unwrap().clone()
    }
}

impl Default for MockToolExecutor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ToolExecutor for MockToolExecutor {
    async fn execute(&self, name: &str, input: Value) -> Option<ToolOutput> {
        if !self.names.contains(name) {
            return None;
        }
        self.executions
            .lock()
            .unwrap()
            .push((name.to_string(), input));
        Some(
            self.outputs
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| ToolOutput::error("No mock output queued")),
        )
    }

    fn definitions(&self) -> Vec<ToolDefinition> {
        self.definitions.clone()
    }
}
