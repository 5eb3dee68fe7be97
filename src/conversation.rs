//! In-memory conversation thread
//!
//! Holds the message history, the cover letter flag and the original query.
//! Messages are append-only; the whole conversation is dropped on reset.

use crate::llm::{
    ContentBlock, LlmMessage, LlmRequest, MessageRole, SystemContent, ToolDefinition,
};
use crate::state_machine::state::ToolCall;

/// Message author
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    System,
    User,
    Assistant,
    Tool,
}

/// One entry in the conversation
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub role: Role,
    pub content: String,
    /// Tool calls requested by an assistant message
    pub tool_calls: Vec<ToolCall>,
    /// Call this tool message answers
    pub tool_call_id: Option<String>,
}

impl Message {
    fn plain(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            tool_calls: Vec::new(),
            tool_call_id: None,
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::plain(Role::System, content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::plain(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>, tool_calls: Vec<ToolCall>) -> Self {
        Self {
            tool_calls,
            ..Self::plain(Role::Assistant, content)
        }
    }

    pub fn tool(tool_call_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            tool_call_id: Some(tool_call_id.into()),
            ..Self::plain(Role::Tool, content)
        }
    }

    fn to_content_blocks(&self) -> Vec<ContentBlock> {
        let mut blocks = Vec::new();
        match self.role {
            Role::Tool => {
                blocks.push(ContentBlock::tool_result(
                    self.tool_call_id.clone().unwrap_or_default(),
                    self.content.clone(),
                ));
            }
            Role::System | Role::User | Role::Assistant => {
                if !self.content.trim().is_empty() {
                    blocks.push(ContentBlock::text(self.content.clone()));
                }
                blocks.extend(self.tool_calls.iter().map(|call| {
                    ContentBlock::tool_use(call.id.clone(), call.name(), call.input.to_value())
                }));
            }
        }
        blocks
    }
}

/// Conversation state for one search session
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Conversation {
    messages: Vec<Message>,
    is_cover_letter_created: bool,
    user_query: String,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    pub fn is_cover_letter_created(&self) -> bool {
        self.is_cover_letter_created
    }

    pub fn mark_cover_letter_created(&mut self) {
        self.is_cover_letter_created = true;
    }

    pub fn user_query(&self) -> &str {
        &self.user_query
    }

    pub fn set_user_query(&mut self, query: impl Into<String>) {
        self.user_query = query.into();
    }

    /// Text of the most recent tool result, i.e. the posting on display
    pub fn last_tool_result(&self) -> Option<&str> {
        self.messages
            .iter()
            .rev()
            .find(|m| m.role == Role::Tool)
            .map(|m| m.content.as_str())
    }

    /// The first user-authored message. It carries the user's background.
    pub fn first_user_message(&self) -> Option<&str> {
        self.messages
            .iter()
            .find(|m| m.role == Role::User)
            .map(|m| m.content.as_str())
    }

    /// Text of the most recent assistant message with any text at all
    pub fn latest_assistant_text(&self) -> Option<&str> {
        self.messages
            .iter()
            .rev()
            .filter(|m| m.role == Role::Assistant)
            .map(|m| m.content.as_str())
            .find(|text| !text.trim().is_empty())
    }

    /// Job details handed to the drafter: the last search result, or the
    /// model's own answer if it never searched.
    pub fn job_details(&self) -> String {
        self.last_tool_result()
            .or_else(|| self.latest_assistant_text())
            .unwrap_or_default()
            .to_string()
    }

    /// Build a model request from the whole thread.
    ///
    /// System messages become system blocks. Tool results ride in user
    /// messages, and consecutive messages with the same wire role are merged
    /// so the request alternates user/assistant.
    pub fn to_llm_request(&self, tools: Vec<ToolDefinition>) -> LlmRequest {
        let system = self
            .messages
            .iter()
            .filter(|m| m.role == Role::System)
            .map(|m| SystemContent::new(m.content.clone()))
            .collect();

        let mut messages: Vec<LlmMessage> = Vec::new();
        for message in self.messages.iter().filter(|m| m.role != Role::System) {
            let role = match message.role {
                Role::Assistant => MessageRole::Assistant,
                _ => MessageRole::User,
            };
            let blocks = message.to_content_blocks();
            if blocks.is_empty() {
                continue;
            }
            match messages.last_mut() {
                Some(last) if last.role == role => last.content.extend(blocks),
                _ => messages.push(LlmMessage {
                    role,
                    content: blocks,
                }),
            }
        }

        LlmRequest {
            system,
            messages,
            tools,
            max_tokens: None,
        }
    }
}
