//! Pure state transition function
//!
//! Given the dispatcher state, the conversation and one event, produce the
//! next state and the effects the runtime must carry out. No I/O happens here.

use super::{ConvState, Effect, Event};
use crate::conversation::{Conversation, Message};
use crate::system_prompt::{build_system_prompt, feedback_message};
use thiserror::Error;

/// Result of a state transition
#[derive(Debug)]
pub struct TransitionResult {
    pub new_state: ConvState,
    pub effects: Vec<Effect>,
}

impl TransitionResult {
    pub fn new(state: ConvState) -> Self {
        Self {
            new_state: state,
            effects: vec![],
        }
    }

    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }
}

/// Errors that can occur during transition
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransitionError {
    #[error("Search request is empty")]
    EmptyQuery,
    #[error("Agent is busy, wait for the current turn to finish")]
    AgentBusy,
    #[error("A search is already in progress; reset to start a new one")]
    SearchInProgress,
    #[error("No job posting is waiting for feedback")]
    NoPostingToReview,
    #[error("Session has finished; reset to start a new search")]
    SessionFinished,
    #[error("Invalid transition: {0}")]
    InvalidTransition(String),
}

/// Pure transition function
pub fn transition(
    state: &ConvState,
    conversation: &Conversation,
    event: Event,
) -> Result<TransitionResult, TransitionError> {
    match (state, event) {
        // ============================================================
        // User Actions
        // ============================================================

        (ConvState::Idle, Event::UserQuery { text }) => {
            if text.trim().is_empty() {
                return Err(TransitionError::EmptyQuery);
            }
            Ok(TransitionResult::new(ConvState::AwaitingModel)
                .with_effect(Effect::RecordQuery { text: text.clone() })
                .with_effect(Effect::append(Message::system(build_system_prompt())))
                .with_effect(Effect::append(Message::user(text)))
                .with_effect(Effect::RequestModel))
        }

        (ConvState::AwaitingFeedback { .. }, Event::UserFeedback { feedback }) => {
            let text = feedback_message(feedback, conversation.user_query());
            Ok(TransitionResult::new(ConvState::AwaitingModel)
                .with_effect(Effect::append(Message::user(text)))
                .with_effect(Effect::RequestModel))
        }

        (ConvState::AwaitingFeedback { .. }, Event::UserQuery { .. }) => {
            Err(TransitionError::SearchInProgress)
        }

        (ConvState::Idle, Event::UserFeedback { .. }) => Err(TransitionError::NoPostingToReview),

        (state, Event::UserQuery { .. } | Event::UserFeedback { .. }) if state.is_working() => {
            Err(TransitionError::AgentBusy)
        }

        (state, Event::UserQuery { .. } | Event::UserFeedback { .. }) if state.is_terminal() => {
            Err(TransitionError::SessionFinished)
        }

        // ============================================================
        // Model Response Dispatch
        // ============================================================

        // Flag already set: stop, whatever the model asked for
        (ConvState::AwaitingModel | ConvState::Done { .. }, Event::ModelResponse { .. })
            if conversation.is_cover_letter_created() =>
        {
            let cover_letter = match state {
                ConvState::Done { cover_letter } => cover_letter.clone(),
                _ => conversation
                    .latest_assistant_text()
                    .unwrap_or_default()
                    .to_string(),
            };
            Ok(TransitionResult::new(ConvState::Done { cover_letter }))
        }

        (ConvState::AwaitingModel, Event::ModelResponse { text, tool_calls })
            if !tool_calls.is_empty() =>
        {
            let mut queue = tool_calls.clone().into_iter();
            let Some(first) = queue.next() else {
                return Err(TransitionError::InvalidTransition(
                    "tool call list emptied unexpectedly".to_string(),
                ));
            };
            Ok(TransitionResult::new(ConvState::AwaitingToolResult {
                current_tool: first.clone(),
                remaining_tools: queue.collect(),
            })
            .with_effect(Effect::append(Message::assistant(text, tool_calls)))
            .with_effect(Effect::execute_tool(first)))
        }

        (ConvState::AwaitingModel, Event::ModelResponse { text, .. }) => {
            let job_details = match conversation.last_tool_result() {
                Some(result) => result.to_string(),
                None if !text.trim().is_empty() => text.clone(),
                None => conversation.job_details(),
            };
            let background = conversation
                .first_user_message()
                .unwrap_or_default()
                .to_string();
            Ok(TransitionResult::new(ConvState::DraftingLetter)
                .with_effect(Effect::append(Message::assistant(text, vec![])))
                .with_effect(Effect::DraftLetter {
                    job_details,
                    background,
                }))
        }

        // ============================================================
        // Tool Execution
        // ============================================================

        (
            ConvState::AwaitingToolResult {
                current_tool,
                remaining_tools,
            },
            Event::ToolComplete {
                tool_use_id,
                output,
            },
        ) if tool_use_id == current_tool.id => {
            let result_message = Message::tool(tool_use_id, output.clone());
            match remaining_tools.split_first() {
                Some((next, rest)) => Ok(TransitionResult::new(ConvState::AwaitingToolResult {
                    current_tool: next.clone(),
                    remaining_tools: rest.to_vec(),
                })
                .with_effect(Effect::append(result_message))
                .with_effect(Effect::execute_tool(next.clone()))),
                None => Ok(TransitionResult::new(ConvState::AwaitingFeedback {
                    posting: output,
                })
                .with_effect(Effect::append(result_message))),
            }
        }

        // ============================================================
        // Cover Letter
        // ============================================================

        (ConvState::DraftingLetter, Event::LetterDrafted { text }) => {
            Ok(TransitionResult::new(ConvState::Done {
                cover_letter: text.clone(),
            })
            .with_effect(Effect::MarkLetterCreated)
            .with_effect(Effect::append(Message::assistant(text, vec![]))))
        }

        // ============================================================
        // Failures
        // ============================================================

        (state, Event::TurnFailed { message }) if state.is_working() => {
            Ok(TransitionResult::new(ConvState::Failed { message }))
        }

        // Done is absorbing: late model or tool events change nothing
        (ConvState::Done { cover_letter }, _) => Ok(TransitionResult::new(ConvState::Done {
            cover_letter: cover_letter.clone(),
        })),

        // ============================================================
        // Invalid Transitions
        // ============================================================

        (state, event) => Err(TransitionError::InvalidTransition(format!(
            "No transition from {} with event {event:?}",
            state.name()
        ))),
    }
}

/// The tool calls a transition asks the runtime to run
#[cfg(test)]
pub fn dispatched_tools(effects: &[Effect]) -> Vec<&super::ToolCall> {
    effects
        .iter()
        .filter_map(|e| match e {
            Effect::ExecuteTool { tool } => Some(tool),
            _ => None,
        })
        .collect()
}
