mod progress;
mod service;
mod store;
mod workflow;

// Public API of the session subsystem.
pub use crate::error::SessionError;
pub use progress::SessionProgress;
pub use service::{QuizSession, SessionOrigin, SessionQuestion};
pub use store::{SESSION_STATE_KEY, SessionStore, decode, encode};
pub use workflow::QuizSessionService;
