//! Session executor
//!
//! Runs one user action through the dispatcher: apply the transition,
//! perform the effects, feed the events they produce back in, and stop at the
//! next pause point.

use super::error::AgentError;
use super::traits::{LlmClient, ToolExecutor};
use super::{SessionSnapshot, TurnOutcome};
use crate::conversation::Conversation;
use crate::cover_letter::draft_cover_letter;
use crate::state_machine::{
    transition, ConvState, Effect, Event, Feedback, ToolCall, ToolInput, TransitionError,
    TransitionResult,
};
use std::collections::VecDeque;

/// A single job search session: dispatcher state plus conversation
pub struct Session<L, T>
where
    L: LlmClient,
    T: ToolExecutor,
{
    id: String,
    state: ConvState,
    conversation: Conversation,
    llm_client: L,
    tool_executor: T,
}

impl<L, T> Session<L, T>
where
    L: LlmClient,
    T: ToolExecutor,
{
    pub fn new(llm_client: L, tool_executor: T) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            state: ConvState::Idle,
            conversation: Conversation::new(),
            llm_client,
            tool_executor,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn state(&self) -> &ConvState {
        &self.state
    }

    #[cfg(test)]
    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    /// Start a search from the user's request and background
    pub async fn submit_query(&mut self, text: &str) -> Result<TurnOutcome, AgentError> {
        tracing::info!(session_id = %self.id, "Job request submitted");
        self.run_turn(Event::UserQuery {
            text: text.to_string(),
        })
        .await
    }

    /// Approve or reject the posting on display
    pub async fn give_feedback(&mut self, feedback: Feedback) -> Result<TurnOutcome, AgentError> {
        tracing::info!(session_id = %self.id, ?feedback, "Feedback received");
        self.run_turn(Event::UserFeedback { feedback }).await
    }

    /// Discard the conversation and start over with a fresh session id
    pub fn reset(&mut self) {
        tracing::info!(old_session_id = %self.id, "Session reset");
        self.id = uuid::Uuid::new_v4().to_string();
        self.state = ConvState::Idle;
        self.conversation = Conversation::new();
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let cover_letter = match &self.state {
            ConvState::Done { cover_letter } => Some(cover_letter.clone()),
            _ => None,
        };
        let error = match &self.state {
            ConvState::Failed { message } => Some(message.clone()),
            _ => None,
        };
        SessionSnapshot {
            session_id: self.id.clone(),
            state: self.state.clone(),
            user_query: self.conversation.user_query().to_string(),
            current_posting: self.conversation.last_tool_result().map(str::to_string),
            cover_letter,
            error,
            is_cover_letter_created: self.conversation.is_cover_letter_created(),
            message_count: self.conversation.messages().len(),
        }
    }

    async fn run_turn(&mut self, event: Event) -> Result<TurnOutcome, AgentError> {
        // Rejected user actions leave the session untouched
        let result = transition(&self.state, &self.conversation, event)?;
        let mut pending: VecDeque<Effect> = self.apply(result).into();

        while let Some(effect) = pending.pop_front() {
            let next = match self.execute_effect(effect).await {
                Ok(next) => next,
                Err(e) => return Err(self.fail(e)),
            };
            if let Some(event) = next {
                match transition(&self.state, &self.conversation, event) {
                    Ok(result) => pending.extend(self.apply(result)),
                    Err(e) => return Err(self.fail(e.into())),
                }
            }
        }

        self.outcome()
    }

    fn apply(&mut self, result: TransitionResult) -> Vec<Effect> {
        tracing::debug!(
            session_id = %self.id,
            from = self.state.name(),
            to = result.new_state.name(),
            effects = result.effects.len(),
            "State transition"
        );
        self.state = result.new_state;
        result.effects
    }

    /// Abort the turn: move to `Failed` and hand the error back
    fn fail(&mut self, error: AgentError) -> AgentError {
        tracing::error!(
            session_id = %self.id,
            state = self.state.name(),
            error = %error,
            "Turn failed"
        );
        let event = Event::TurnFailed {
            message: error.to_string(),
        };
        match transition(&self.state, &self.conversation, event) {
            Ok(result) => {
                self.apply(result);
            }
            Err(_) => {
                self.state = ConvState::Failed {
                    message: error.to_string(),
                };
            }
        }
        error
    }

    fn outcome(&self) -> Result<TurnOutcome, AgentError> {
        match &self.state {
            ConvState::AwaitingFeedback { posting } => Ok(TurnOutcome::JobPosting(posting.clone())),
            ConvState::Done { cover_letter } => Ok(TurnOutcome::CoverLetter(cover_letter.clone())),
            other => Err(TransitionError::InvalidTransition(format!(
                "turn stopped in non-pause state {}",
                other.name()
            ))
            .into()),
        }
    }

    async fn execute_effect(&mut self, effect: Effect) -> Result<Option<Event>, AgentError> {
        match effect {
            Effect::RecordQuery { text } => {
                self.conversation.set_user_query(text);
                Ok(None)
            }

            Effect::AppendMessage { message } => {
                self.conversation.push(message);
                Ok(None)
            }

            Effect::MarkLetterCreated => {
                self.conversation.mark_cover_letter_created();
                Ok(None)
            }

            Effect::RequestModel => {
                let request = self
                    .conversation
                    .to_llm_request(self.tool_executor.definitions());
                let response = self.llm_client.complete(&request).await?;
                let tool_calls = response
                    .tool_uses()
                    .into_iter()
                    .map(|(id, name, input)| {
                        ToolCall::new(id, ToolInput::from_name_and_value(name, input.clone()))
                    })
                    .collect();
                Ok(Some(Event::ModelResponse {
                    text: response.text(),
                    tool_calls,
                }))
            }

            Effect::ExecuteTool { tool } => {
                let name = tool.name().to_string();
                tracing::info!(tool = %name, id = %tool.id, "Executing tool");
                let output = self
                    .tool_executor
                    .execute(&name, tool.input.to_value())
                    .await
                    .ok_or_else(|| AgentError::UnknownTool(name.clone()))?;
                if !output.success {
                    return Err(AgentError::Tool {
                        tool: name,
                        message: output.output,
                    });
                }
                Ok(Some(Event::ToolComplete {
                    tool_use_id: tool.id,
                    output: output.output,
                }))
            }

            Effect::DraftLetter {
                job_details,
                background,
            } => {
                let today = chrono::Local::now().date_naive();
                let text =
                    draft_cover_letter(&self.llm_client, &job_details, &background, today).await?;
                Ok(Some(Event::LetterDrafted { text }))
            }
        }
    }
}
