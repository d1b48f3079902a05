use std::sync::Arc;

use rand::SeedableRng;
use rand::rngs::StdRng;
use services::QuizSessionService;

pub trait UiApp: Send + Sync {
    fn quiz(&self) -> Arc<QuizSessionService>;

    /// Window and page title.
    fn title(&self) -> String {
        "Quiz".to_string()
    }

    /// Fixed seed for question shuffling. `None` draws from the OS.
    fn shuffle_seed(&self) -> Option<u64> {
        None
    }
}

#[derive(Clone)]
pub struct AppContext {
    quiz: Arc<QuizSessionService>,
    title: String,
    shuffle_seed: Option<u64>,
}

impl AppContext {
    #[must_use]
    pub fn new(app: &Arc<dyn UiApp>) -> Self {
        Self {
            quiz: app.quiz(),
            title: app.title(),
            shuffle_seed: app.shuffle_seed(),
        }
    }

    #[must_use]
    pub fn quiz(&self) -> Arc<QuizSessionService> {
        Arc::clone(&self.quiz)
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// RNG used when a fresh question order has to be drawn.
    #[must_use]
    pub fn session_rng(&self) -> StdRng {
        match self.shuffle_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        }
    }
}

// This context is provided by the application composition root (e.g. `crates/app`).

/// Build an `AppContext` from a UI-facing app implementation.
#[must_use]
pub fn build_app_context(app: &Arc<dyn UiApp>) -> AppContext {
    AppContext::new(app)
}
