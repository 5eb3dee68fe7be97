//! Prompt text for the search dialogue
//!
//! The system prompt steers the model through the approve/reject loop: search
//! on a job request, search again on rejection, and answer without a tool call
//! on approval so the dispatcher hands off to the cover letter drafter.

use crate::state_machine::Feedback;

const SEARCH_PROMPT: &str = r"You help the user find a job and nothing else.

When the latest user message is a job request, call the job_search tool with a concise search query built from the role, field and location the user asked for. Do not ask follow-up questions.

When the latest user message is feedback on a posting:
- If the user rejects it, call job_search again. Vary the query so a different posting comes back; never ask the user for clarification.
- If the user approves it, do not call any tool. Reply with one short sentence confirming the choice; a cover letter will be drafted automatically.";

/// Build the system prompt for a search session
pub fn build_system_prompt() -> String {
    SEARCH_PROMPT.to_string()
}

/// User message recorded when the user approves or rejects a posting.
///
/// A rejection restates the original request so the model does not simply
/// rerun the identical search.
pub fn feedback_message(feedback: Feedback, user_query: &str) -> String {
    match feedback {
        Feedback::Approve => "Yes, I like this job.".to_string(),
        Feedback::Reject => format!(
            "No, show me another job. It must be a different posting from the ones already shown, still matching my original request: '''{user_query}'''"
        ),
    }
}
