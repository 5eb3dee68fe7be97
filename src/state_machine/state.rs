//! Dispatcher state types

use serde::{Deserialize, Serialize};
use serde_json::Value;

// ============================================================================
// Tool Input Types
// ============================================================================

/// Input for the `job_search` tool
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobSearchInput {
    pub query: String,
}

/// Strongly typed tool input
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "_tool", rename_all = "snake_case")]
pub enum ToolInput {
    JobSearch(JobSearchInput),
    /// Fallback for unknown tools or parsing failures
    Unknown { name: String, input: Value },
}

impl ToolInput {
    /// Get the tool name
    pub fn tool_name(&self) -> &str {
        match self {
            ToolInput::JobSearch(_) => "job_search",
            ToolInput::Unknown { name, .. } => name,
        }
    }

    /// Convert to JSON Value for tool execution
    pub fn to_value(&self) -> Value {
        match self {
            ToolInput::JobSearch(input) => serde_json::to_value(input).unwrap_or(Value::Null),
            ToolInput::Unknown { input, .. } => input.clone(),
        }
    }

    /// Parse from tool name and JSON value
    pub fn from_name_and_value(name: &str, value: Value) -> Self {
        match name {
            "job_search" => serde_json::from_value(value.clone()).map_or_else(
                |_| ToolInput::Unknown {
                    name: name.to_string(),
                    input: value,
                },
                ToolInput::JobSearch,
            ),
            _ => ToolInput::Unknown {
                name: name.to_string(),
                input: value,
            },
        }
    }
}

// ============================================================================
// Tool Call - A tool invocation with ID and typed input
// ============================================================================

/// A tool call from the LLM with typed input
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    pub id: String,
    pub input: ToolInput,
}

impl ToolCall {
    pub fn new(id: impl Into<String>, input: ToolInput) -> Self {
        Self {
            id: id.into(),
            input,
        }
    }

    /// Convenience constructor for a search request
    #[cfg(test)]
    pub fn job_search(id: impl Into<String>, query: impl Into<String>) -> Self {
        Self::new(
            id,
            ToolInput::JobSearch(JobSearchInput {
                query: query.into(),
            }),
        )
    }

    /// Get the tool name
    pub fn name(&self) -> &str {
        self.input.tool_name()
    }
}

// ============================================================================
// Dispatcher State
// ============================================================================

/// Where the turn dispatcher currently stands
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ConvState {
    /// No search started yet
    #[default]
    Idle,

    /// Model request due or in flight
    AwaitingModel,

    /// Executing the tool calls of the last model response, one at a time
    AwaitingToolResult {
        /// The tool currently running
        current_tool: ToolCall,
        /// Tools still to run after the current one completes
        remaining_tools: Vec<ToolCall>,
    },

    /// Paused after a search; the user approves or rejects `posting`
    AwaitingFeedback { posting: String },

    /// Cover letter request in flight
    DraftingLetter,

    /// Cover letter produced. Terminal until reset.
    Done { cover_letter: String },

    /// A model or tool call failed. Terminal until reset.
    Failed { message: String },
}

impl ConvState {
    /// Check if this is a terminal state (only reset leaves it)
    pub fn is_terminal(&self) -> bool {
        matches!(self, ConvState::Done { .. } | ConvState::Failed { .. })
    }

    /// Check if a turn is in progress
    pub fn is_working(&self) -> bool {
        matches!(
            self,
            ConvState::AwaitingModel
                | ConvState::AwaitingToolResult { .. }
                | ConvState::DraftingLetter
        )
    }

    /// Short name used in logs and API responses
    pub fn name(&self) -> &'static str {
        match self {
            ConvState::Idle => "idle",
            ConvState::AwaitingModel => "awaiting_model",
            ConvState::AwaitingToolResult { .. } => "awaiting_tool_result",
            ConvState::AwaitingFeedback { .. } => "awaiting_feedback",
            ConvState::DraftingLetter => "drafting_letter",
            ConvState::Done { .. } => "done",
            ConvState::Failed { .. } => "failed",
        }
    }
}
