#![forbid(unsafe_code)]

pub mod catalog_service;
pub mod error;
pub mod sessions;

pub use sessions as session;

pub use catalog_service::CatalogService;
pub use error::{CatalogServiceError, SessionError};

pub use sessions::{
    QuizSession, QuizSessionService, SESSION_STATE_KEY, SessionOrigin, SessionProgress,
    SessionQuestion, SessionStore,
};
