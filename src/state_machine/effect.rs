//! Effects produced by state transitions

use crate::conversation::Message;
use crate::state_machine::state::ToolCall;

/// Effects to be executed after state transition
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Remember the original query for this search
    RecordQuery { text: String },

    /// Append a message to the conversation
    AppendMessage { message: Message },

    /// Make a model request with the search tool available
    RequestModel,

    /// Execute a tool
    ExecuteTool { tool: ToolCall },

    /// Ask the model for a cover letter
    DraftLetter {
        job_details: String,
        background: String,
    },

    /// Set `is_cover_letter_created`
    MarkLetterCreated,
}

impl Effect {
    pub fn append(message: Message) -> Self {
        Effect::AppendMessage { message }
    }

    pub fn execute_tool(tool: ToolCall) -> Self {
        Effect::ExecuteTool { tool }
    }

    #[cfg(test)]
    pub fn is_tool_execution(&self) -> bool {
        matches!(self, Effect::ExecuteTool { .. })
    }

    #[cfg(test)]
    pub fn is_letter_draft(&self) -> bool {
        matches!(self, Effect::DraftLetter { .. })
    }
}
