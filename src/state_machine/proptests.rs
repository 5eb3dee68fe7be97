//! Property-based tests for the dispatcher
//!
//! These tests verify the dispatch rules hold across arbitrary model
//! behavior and user action sequences.

use super::state::*;
use super::transition::*;
use super::*;
use crate::conversation::{Conversation, Message};
use proptest::prelude::*;
use std::collections::VecDeque;

// ============================================================================
// Arbitrary Generators
// ============================================================================

fn arb_tool_call() -> impl Strategy<Value = ToolCall> {
    ("[a-z0-9]{8}", "[a-z ]{1,20}")
        .prop_map(|(id, query)| ToolCall::job_search(format!("toolu_{id}"), query))
}

fn arb_tool_calls(min: usize) -> impl Strategy<Value = Vec<ToolCall>> {
    proptest::collection::vec(arb_tool_call(), min..4)
}

fn arb_text() -> impl Strategy<Value = String> {
    "[a-zA-Z .,]{0,40}"
}

fn arb_feedback() -> impl Strategy<Value = Feedback> {
    any::<bool>().prop_map(Feedback::from_approved)
}

fn arb_event() -> impl Strategy<Value = Event> {
    prop_oneof![
        "[a-z ,0-9]{0,30}".prop_map(|text| Event::UserQuery { text }),
        arb_feedback().prop_map(|feedback| Event::UserFeedback { feedback }),
        (arb_text(), arb_tool_calls(0))
            .prop_map(|(text, tool_calls)| Event::ModelResponse { text, tool_calls }),
        ("toolu_[a-z0-9]{8}", arb_text()).prop_map(|(tool_use_id, output)| {
            Event::ToolComplete {
                tool_use_id,
                output,
            }
        }),
        arb_text().prop_map(|text| Event::LetterDrafted { text }),
        arb_text().prop_map(|message| Event::TurnFailed { message }),
    ]
}

/// A conversation that has already searched once
fn searched_conversation(flag: bool) -> Conversation {
    let mut conv = Conversation::new();
    conv.set_user_query("backend job, 5 years of Go");
    conv.push(Message::user("backend job, 5 years of Go"));
    conv.push(Message::assistant(
        "",
        vec![ToolCall::job_search("toolu_first", "backend go")],
    ));
    conv.push(Message::tool("toolu_first", "Job Title: Go Engineer"));
    if flag {
        conv.push(Message::assistant("Dear Hiring Manager", vec![]));
        conv.mark_cover_letter_created();
    }
    conv
}

// ============================================================================
// Scripted session driver
// ============================================================================

/// One user action followed by the model's behavior for that turn
#[derive(Debug, Clone)]
struct ScriptedTurn {
    action: Event,
    /// Model responses consumed in order each time the runtime requests one
    model_replies: Vec<(String, Vec<ToolCall>)>,
}

fn arb_scripted_turn() -> impl Strategy<Value = ScriptedTurn> {
    (
        prop_oneof![
            arb_feedback().prop_map(|feedback| Event::UserFeedback { feedback }),
            "[a-z ]{1,20}".prop_map(|text| Event::UserQuery { text }),
        ],
        proptest::collection::vec((arb_text(), arb_tool_calls(0)), 1..3),
    )
        .prop_map(|(action, model_replies)| ScriptedTurn {
            action,
            model_replies,
        })
}

/// Applies effects the way the runtime does, without any I/O
struct Driver {
    state: ConvState,
    conversation: Conversation,
    replies: VecDeque<(String, Vec<ToolCall>)>,
    /// Every effect executed, tagged with whether the flag was set beforehand
    log: Vec<(bool, Effect)>,
}

impl Driver {
    fn new() -> Self {
        Self {
            state: ConvState::Idle,
            conversation: Conversation::new(),
            replies: VecDeque::new(),
            log: Vec::new(),
        }
    }

    fn run_turn(&mut self, turn: ScriptedTurn) {
        self.replies = turn.model_replies.into();
        let mut pending = vec![turn.action];
        while let Some(event) = pending.pop() {
            let Ok(result) = transition(&self.state, &self.conversation, event) else {
                return;
            };
            self.state = result.new_state;
            for effect in result.effects {
                self.log
                    .push((self.conversation.is_cover_letter_created(), effect.clone()));
                match effect {
                    Effect::RecordQuery { text } => self.conversation.set_user_query(text),
                    Effect::AppendMessage { message } => self.conversation.push(message),
                    Effect::MarkLetterCreated => self.conversation.mark_cover_letter_created(),
                    Effect::RequestModel => match self.replies.pop_front() {
                        Some((text, tool_calls)) => {
                            pending.push(Event::ModelResponse { text, tool_calls });
                        }
                        None => pending.push(Event::TurnFailed {
                            message: "no reply scripted".to_string(),
                        }),
                    },
                    Effect::ExecuteTool { tool } => pending.push(Event::ToolComplete {
                        tool_use_id: tool.id.clone(),
                        output: format!("listing for {}", tool.name()),
                    }),
                    Effect::DraftLetter { .. } => pending.push(Event::LetterDrafted {
                        text: "Dear Hiring Manager".to_string(),
                    }),
                }
            }
        }
    }
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    /// A response without tool calls, flag unset, always leads to drafting
    #[test]
    fn prop_plain_response_drafts_letter(text in arb_text(), flag_searched in any::<bool>()) {
        let conv = if flag_searched { searched_conversation(false) } else { Conversation::new() };
        let result = transition(
            &ConvState::AwaitingModel,
            &conv,
            Event::ModelResponse { text, tool_calls: vec![] },
        ).unwrap();

        prop_assert_eq!(result.new_state, ConvState::DraftingLetter);
        prop_assert!(result.effects.iter().any(Effect::is_letter_draft));
        prop_assert!(!result.effects.iter().any(Effect::is_tool_execution));
    }

    /// A response with tool calls, flag unset, always runs the first tool and never drafts
    #[test]
    fn prop_tool_response_runs_tool(text in arb_text(), calls in arb_tool_calls(1)) {
        let result = transition(
            &ConvState::AwaitingModel,
            &searched_conversation(false),
            Event::ModelResponse { text, tool_calls: calls.clone() },
        ).unwrap();

        let dispatched = dispatched_tools(&result.effects);
        prop_assert_eq!(dispatched, vec![&calls[0]]);
        prop_assert!(!result.effects.iter().any(Effect::is_letter_draft));
        let is_awaiting_tool = matches!(
            result.new_state,
            ConvState::AwaitingToolResult { .. }
        );
        prop_assert!(is_awaiting_tool);
    }

    /// With the flag set, no event moves the session or dispatches a tool
    #[test]
    fn prop_flag_set_never_dispatches(events in proptest::collection::vec(arb_event(), 1..10)) {
        let conv = searched_conversation(true);
        let mut state = ConvState::AwaitingModel;
        for event in events {
            if let Ok(result) = transition(&state, &conv, event) {
                prop_assert!(!result.effects.iter().any(Effect::is_tool_execution));
                prop_assert!(!result.effects.iter().any(Effect::is_letter_draft));
                state = result.new_state;
            }
        }
    }

    /// Across whole sessions, nothing is dispatched after the letter exists
    #[test]
    fn prop_no_tool_calls_after_letter(
        first_query in "[a-z ]{1,20}",
        first_replies in proptest::collection::vec((arb_text(), arb_tool_calls(0)), 1..3),
        turns in proptest::collection::vec(arb_scripted_turn(), 0..6),
    ) {
        let mut driver = Driver::new();
        driver.run_turn(ScriptedTurn {
            action: Event::UserQuery { text: first_query },
            model_replies: first_replies,
        });
        for turn in turns {
            driver.run_turn(turn);
        }

        for (flag_was_set, effect) in &driver.log {
            if *flag_was_set {
                prop_assert!(!effect.is_tool_execution());
                prop_assert!(!effect.is_letter_draft());
                prop_assert!(!matches!(effect, Effect::RequestModel));
            }
        }
        if driver.conversation.is_cover_letter_created() {
            let is_done = matches!(driver.state, ConvState::Done { .. });
            prop_assert!(is_done);
        }
    }

    /// Rejecting a posting always leads back to the model, never to drafting
    #[test]
    fn prop_rejection_never_drafts(posting in arb_text()) {
        let result = transition(
            &ConvState::AwaitingFeedback { posting },
            &searched_conversation(false),
            Event::UserFeedback { feedback: Feedback::Reject },
        ).unwrap();

        prop_assert_eq!(result.new_state, ConvState::AwaitingModel);
        prop_assert!(result.effects.contains(&Effect::RequestModel));
        prop_assert!(!result.effects.iter().any(Effect::is_letter_draft));
    }

    /// Transition is deterministic
    #[test]
    fn prop_transition_is_pure(event in arb_event(), flag in any::<bool>()) {
        let conv = searched_conversation(flag);
        let a = transition(&ConvState::AwaitingModel, &conv, event.clone());
        let b = transition(&ConvState::AwaitingModel, &conv, event);
        match (a, b) {
            (Ok(a), Ok(b)) => {
                prop_assert_eq!(a.new_state, b.new_state);
                prop_assert_eq!(a.effects, b.effects);
            }
            (Err(a), Err(b)) => prop_assert_eq!(a, b),
            _ => prop_assert!(false, "transition gave different outcomes"),
        }
    }
}
