use std::sync::Arc;
use std::time::Duration;

use dioxus::prelude::*;
use quiz_core::model::QuestionId;
use services::SESSION_STATE_KEY;
use services::sessions::decode;
use storage::repository::{InMemoryRepository, KeyValueStore};

use super::QuizIntent;
use super::test_harness::{SlowWrites, setup_view_harness, setup_view_harness_with_store};

async fn persisted(repo: &InMemoryRepository, blob: &str) {
    repo.put(SESSION_STATE_KEY, blob).await.expect("seed state");
}

async fn stored_answers(repo: &InMemoryRepository) -> Vec<(u64, usize)> {
    let blob = repo
        .get(SESSION_STATE_KEY)
        .await
        .expect("read state")
        .expect("state persisted");
    decode(&blob)
        .expect("valid state")
        .answers
        .into_iter()
        .map(|(id, index)| (id.value(), index))
        .collect()
}

#[tokio::test(flavor = "current_thread")]
async fn quiz_view_smoke_renders_fresh_session() {
    let mut harness = setup_view_harness(InMemoryRepository::new());
    harness.start().await;

    let html = harness.render();
    assert!(html.contains("Network Quiz"), "missing title in {html}");
    assert!(html.contains("Which layer routes packets?"), "missing question in {html}");
    assert!(html.contains("Which port does HTTPS use?"), "missing question in {html}");
    assert!(html.contains("①") && html.contains("④"), "missing numerals in {html}");
    assert!(html.contains("0 / 2 문항 응답"), "missing progress in {html}");
    assert!(html.contains("채점하기"), "missing submit in {html}");
    assert!(!html.contains("graded"), "unexpected grading in {html}");
    assert!(!html.contains("해설:"), "explanation shown early in {html}");

    assert!(stored_answers(&harness.repo).await.is_empty());
}

#[tokio::test(flavor = "current_thread")]
async fn quiz_view_smoke_restores_order_and_answers() {
    let repo = InMemoryRepository::new();
    persisted(&repo, r#"{"questionsOrder":[2,1],"answers":{"2":1}}"#).await;
    let mut harness = setup_view_harness(repo);
    harness.start().await;

    let html = harness.render();
    let second = html.find(r#"data-id="2""#).expect("question 2 rendered");
    let first = html.find(r#"data-id="1""#).expect("question 1 rendered");
    assert!(second < first, "persisted order not kept in {html}");

    assert!(
        html.contains("question-item graded incorrect"),
        "missing graded card in {html}"
    );
    assert!(html.contains("option-item wrong-choice"), "missing wrong choice in {html}");
    assert!(html.contains("option-item correct-answer"), "missing answer in {html}");
    assert!(html.contains("443 is the default."), "missing explanation in {html}");
    assert!(html.contains("1 / 2 문항 응답"), "missing progress in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn quiz_view_smoke_selection_grades_and_persists() {
    let repo = InMemoryRepository::new();
    persisted(&repo, r#"{"questionsOrder":[1,2],"answers":{}}"#).await;
    let mut harness = setup_view_harness(repo);
    harness.start().await;

    harness
        .dispatch(QuizIntent::Select {
            id: QuestionId::new(1),
            index: 0,
        })
        .await;

    let html = harness.render();
    assert!(
        html.contains("question-item graded correct"),
        "missing correct card in {html}"
    );
    assert!(html.contains("<b>L3</b>"), "explanation not rendered as html in {html}");
    assert_eq!(stored_answers(&harness.repo).await, vec![(1, 0)]);

    // The first answer is final.
    harness
        .dispatch(QuizIntent::Select {
            id: QuestionId::new(1),
            index: 3,
        })
        .await;
    assert_eq!(stored_answers(&harness.repo).await, vec![(1, 0)]);
    let vm = harness.handles.vm();
    let answer = harness.dom.in_runtime(|| {
        vm.peek()
            .as_ref()
            .and_then(|vm| vm.session().answer_for(QuestionId::new(1)))
    });
    assert_eq!(answer, Some(0));
}

#[tokio::test(flavor = "current_thread")]
async fn quiz_view_smoke_score_reveals_every_question() {
    let repo = InMemoryRepository::new();
    persisted(&repo, r#"{"questionsOrder":[1,2],"answers":{"1":0}}"#).await;
    let mut harness = setup_view_harness(repo);
    harness.start().await;

    harness.dispatch(QuizIntent::ShowScore).await;

    let html = harness.render();
    assert!(html.contains("점수: 50점 (1 / 2)"), "missing score in {html}");
    assert!(!html.contains("채점하기"), "submit still shown in {html}");
    assert!(
        html.contains("question-item graded correct")
            && html.contains("question-item graded incorrect"),
        "not every card graded in {html}"
    );
    assert!(html.contains("443 is the default."), "missing explanation in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn quiz_view_smoke_reset_requires_confirmation() {
    let repo = InMemoryRepository::new();
    persisted(&repo, r#"{"questionsOrder":[2,1],"answers":{"1":0,"2":2}}"#).await;
    let mut harness = setup_view_harness(repo);
    harness.start().await;

    harness.dispatch(QuizIntent::RequestReset).await;
    let html = harness.render();
    assert!(html.contains("reset-confirm"), "missing dialog in {html}");

    harness.dispatch(QuizIntent::CancelReset).await;
    let html = harness.render();
    assert!(!html.contains("reset-confirm"), "dialog still open in {html}");
    assert_eq!(stored_answers(&harness.repo).await.len(), 2);

    harness.dispatch(QuizIntent::RequestReset).await;
    harness.dispatch(QuizIntent::ConfirmReset).await;

    let html = harness.render();
    assert!(!html.contains("reset-confirm"), "dialog still open in {html}");
    assert!(!html.contains("graded"), "answers survived reset in {html}");
    assert!(html.contains("0 / 2 문항 응답"), "missing progress in {html}");
    assert!(stored_answers(&harness.repo).await.is_empty());
}

#[tokio::test(flavor = "current_thread")]
async fn quiz_view_smoke_page_stays_mounted_while_answers_save() {
    let repo = InMemoryRepository::new();
    persisted(&repo, r#"{"questionsOrder":[1,2],"answers":{}}"#).await;
    let slow = Arc::new(SlowWrites {
        inner: repo.clone(),
        delay: Duration::from_millis(200),
    });
    let mut harness = setup_view_harness_with_store(repo, slow);
    harness.start().await;

    harness.dispatch_now(QuizIntent::Select {
        id: QuestionId::new(1),
        index: 0,
    });
    // Let the save start; the slow write keeps it in flight.
    harness.drive_async().await;

    let html = harness.render();
    assert!(html.contains("questions-container"), "form unmounted mid-save: {html}");
    assert!(!html.contains("불러오는 중"), "loading shown mid-save: {html}");
    assert!(
        html.contains("question-item graded correct"),
        "answer not graded mid-save: {html}"
    );

    // A second question answered while the first write is still running.
    harness.dispatch_now(QuizIntent::Select {
        id: QuestionId::new(2),
        index: 2,
    });
    let html = harness.render();
    assert!(html.contains("2 / 2 문항 응답"), "second answer dropped: {html}");

    tokio::time::sleep(Duration::from_millis(300)).await;
    for _ in 0..4 {
        harness.drive_async().await;
    }
    assert_eq!(stored_answers(&harness.repo).await, vec![(1, 0), (2, 2)]);
}
