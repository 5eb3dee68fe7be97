//! HTTP API for the job search assistant

mod assets;
mod handlers;
mod types;

pub use handlers::create_router;

use crate::runtime::SharedSession;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// The one session this process serves. Held for the whole of a turn.
    pub session: Arc<Mutex<SharedSession>>,
}

impl AppState {
    pub fn new(session: SharedSession) -> Self {
        Self {
            session: Arc::new(Mutex::new(session)),
        }
    }
}
