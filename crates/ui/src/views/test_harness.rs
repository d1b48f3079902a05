use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use dioxus::core::NoOpMutations;
use dioxus::prelude::*;
use services::{CatalogService, QuizSessionService, SessionStore};
use storage::repository::{InMemoryRepository, KeyValueStore, StorageError};

use super::quiz::QuizTestHandles;
use crate::context::{UiApp, build_app_context};
use crate::views::{QuizIntent, QuizView};

/// Question 1 expects ①, question 2 expects ③.
pub const CATALOG: &str = r#"[
    { "id": 1, "question": "Which layer routes packets?", "options": ["L3","L2","L4","L7"],
      "answer": 0, "explanation": "Routing happens at <b>L3</b>." },
    { "id": 2, "question": "Which port does HTTPS use?", "options": ["21","80","443","25"],
      "answer": 2, "explanation": "443 is the default." }
]"#;

pub const SHUFFLE_SEED: u64 = 7;

struct TestApp {
    quiz: Arc<QuizSessionService>,
}

impl UiApp for TestApp {
    fn quiz(&self) -> Arc<QuizSessionService> {
        Arc::clone(&self.quiz)
    }

    fn title(&self) -> String {
        "Network Quiz".to_string()
    }

    fn shuffle_seed(&self) -> Option<u64> {
        Some(SHUFFLE_SEED)
    }
}

#[derive(Props, Clone)]
struct ViewHarnessProps {
    app: Arc<TestApp>,
    handles: QuizTestHandles,
}

impl PartialEq for ViewHarnessProps {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

#[component]
fn QuizHarness(props: ViewHarnessProps) -> Element {
    let app: Arc<dyn UiApp> = props.app.clone();
    use_context_provider(|| build_app_context(&app));
    use_context_provider(|| props.handles.clone());
    rsx! { QuizView {} }
}

pub struct ViewHarness {
    pub dom: VirtualDom,
    pub repo: InMemoryRepository,
    pub handles: QuizTestHandles,
}

impl ViewHarness {
    pub fn rebuild(&mut self) {
        self.dom.rebuild_in_place();
        drive_dom(&mut self.dom);
    }

    pub async fn drive_async(&mut self) {
        let _ = tokio::time::timeout(
            std::time::Duration::from_millis(50),
            self.dom.wait_for_work(),
        )
        .await;
        self.dom.render_immediate(&mut NoOpMutations);
        self.dom.process_events();
    }

    /// Rebuild and let the session load.
    pub async fn start(&mut self) {
        self.rebuild();
        self.drive_async().await;
        self.drive_async().await;
    }

    pub async fn dispatch(&mut self, intent: QuizIntent) {
        self.dispatch_now(intent);
        self.drive_async().await;
        self.drive_async().await;
    }

    /// Run the intent handler and re-render without waiting on spawned tasks.
    pub fn dispatch_now(&mut self, intent: QuizIntent) {
        let dispatch = self.handles.dispatch();
        self.dom.in_runtime(|| dispatch.call(intent));
        drive_dom(&mut self.dom);
    }

    pub fn render(&self) -> String {
        dioxus_ssr::render(&self.dom)
    }
}

pub fn drive_dom(dom: &mut VirtualDom) {
    dom.process_events();
    dom.render_immediate(&mut NoOpMutations);
    dom.process_events();
}

/// Store whose writes land in `inner` only after a delay.
pub struct SlowWrites {
    pub inner: InMemoryRepository,
    pub delay: Duration,
}

#[async_trait]
impl KeyValueStore for SlowWrites {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.inner.get(key).await
    }

    async fn put(&self, key: &str, value: &str) -> Result<(), StorageError> {
        tokio::time::sleep(self.delay).await;
        self.inner.put(key, value).await
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.inner.remove(key).await
    }
}

/// Mount the quiz page over `repo`, which may already hold a persisted session.
pub fn setup_view_harness(repo: InMemoryRepository) -> ViewHarness {
    let kv: Arc<dyn KeyValueStore> = Arc::new(repo.clone());
    setup_view_harness_with_store(repo, kv)
}

/// Mount the quiz page over `kv`; `repo` is the backing store tests inspect.
pub fn setup_view_harness_with_store(
    repo: InMemoryRepository,
    kv: Arc<dyn KeyValueStore>,
) -> ViewHarness {
    let catalog = CatalogService::from_json_str(CATALOG).expect("test catalog");
    let quiz = Arc::new(QuizSessionService::new(catalog, SessionStore::new(kv)));
    let handles = QuizTestHandles::default();

    let dom = VirtualDom::new_with_props(
        QuizHarness,
        ViewHarnessProps {
            app: Arc::new(TestApp { quiz }),
            handles: handles.clone(),
        },
    );

    ViewHarness { dom, repo, handles }
}
