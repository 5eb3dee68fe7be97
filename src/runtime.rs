//! Runtime for executing search sessions
//!
//! Owns the side of the dispatcher that talks to the outside world: model
//! calls, tool execution and cover letter drafting.

mod error;
mod executor;
pub mod traits;

#[cfg(test)]
pub mod testing;

pub use error::AgentError;
pub use executor::Session;
pub use traits::*;

use crate::state_machine::ConvState;
use serde::Serialize;
use std::sync::Arc;

/// Session type served over HTTP. Production wires in `ServiceLlmClient`
/// and `ToolRegistryExecutor`; tests wire in the mocks.
pub type SharedSession = Session<Arc<dyn LlmClient>, Arc<dyn ToolExecutor>>;

/// Where a turn paused
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "text", rename_all = "snake_case")]
pub enum TurnOutcome {
    /// A posting is on display; waiting for approve or reject
    JobPosting(String),
    /// The cover letter is finished
    CoverLetter(String),
}

/// Read-only view of a session for the web surface
#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    pub session_id: String,
    pub state: ConvState,
    pub user_query: String,
    pub current_posting: Option<String>,
    pub cover_letter: Option<String>,
    pub error: Option<String>,
    pub is_cover_letter_created: bool,
    pub message_count: usize,
}
