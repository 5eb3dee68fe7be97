//! Events that drive the dispatcher

use crate::state_machine::state::ToolCall;
use serde::{Deserialize, Serialize};

/// Events that trigger state transitions
#[derive(Debug, Clone)]
pub enum Event {
    // User events
    /// Form submit: the job request plus the user's background
    UserQuery { text: String },
    /// Approve/reject button on the current posting
    UserFeedback { feedback: Feedback },

    // Model events
    ModelResponse {
        text: String,
        /// Tool calls extracted from the response content
        tool_calls: Vec<ToolCall>,
    },
    LetterDrafted { text: String },

    // Tool events
    ToolComplete { tool_use_id: String, output: String },

    /// A model or tool call failed; the turn is aborted
    TurnFailed { message: String },
}

/// The user's verdict on a posting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Feedback {
    Approve,
    Reject,
}

impl Feedback {
    pub fn from_approved(approved: bool) -> Self {
        if approved {
            Feedback::Approve
        } else {
            Feedback::Reject
        }
    }
}
