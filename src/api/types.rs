//! API request and response types

use crate::runtime::{SessionSnapshot, TurnOutcome};
use serde::{Deserialize, Serialize};

/// Form submit: the job request together with the user's background
#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    pub text: String,
}

/// Approve or reject the posting on display
#[derive(Debug, Deserialize)]
pub struct FeedbackRequest {
    pub approved: bool,
}

/// Result of a turn plus the session it left behind
#[derive(Debug, Serialize)]
pub struct TurnResponse {
    pub outcome: TurnOutcome,
    pub session: SessionSnapshot,
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}
