//! Turn dispatcher state machine
//!
//! Elm-style: a pure `transition` from (state, conversation, event) to a new
//! state plus effects. The runtime performs the effects and feeds the
//! resulting events back in until the turn reaches a pause point.

mod effect;
pub mod event;
pub mod state;
pub(crate) mod transition;

#[cfg(test)]
mod proptests;

pub use effect::Effect;
pub use event::{Event, Feedback};
pub use state::{ConvState, ToolCall, ToolInput};
pub use transition::{transition, TransitionError, TransitionResult};
