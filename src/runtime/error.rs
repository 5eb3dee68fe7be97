//! Errors surfaced by a turn

use crate::llm::LlmError;
use crate::state_machine::TransitionError;
use thiserror::Error;

/// Why a turn did not reach its pause point
#[derive(Debug, Clone, Error)]
pub enum AgentError {
    #[error("Model request failed: {0}")]
    Llm(#[from] LlmError),
    #[error("Tool {tool} failed: {message}")]
    Tool { tool: String, message: String },
    #[error("Model requested unknown tool: {0}")]
    UnknownTool(String),
    #[error(transparent)]
    Transition(#[from] TransitionError),
}
