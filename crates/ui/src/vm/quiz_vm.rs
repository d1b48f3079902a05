use quiz_core::ScoreResult;
use quiz_core::model::{AnswerOutcome, QuestionId, QuestionImage};
use rand::Rng;
use services::{QuizSession, QuizSessionService, SessionProgress, SessionQuestion};

use crate::views::ViewError;
use crate::vm::sanitize_html;

const CIRCLED_NUMERALS: [&str; 4] = ["①", "②", "③", "④"];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CardStatus {
    Pending,
    Correct,
    Incorrect,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OptionMarker {
    None,
    CorrectAnswer,
    WrongChoice,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OptionVm {
    pub index: usize,
    pub numeral: &'static str,
    pub text_html: String,
    pub selected: bool,
    pub marker: OptionMarker,
}

impl OptionVm {
    #[must_use]
    pub fn class(&self) -> &'static str {
        match self.marker {
            OptionMarker::None => "option-item",
            OptionMarker::CorrectAnswer => "option-item correct-answer",
            OptionMarker::WrongChoice => "option-item wrong-choice",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OverlayVm {
    pub style: String,
    pub text: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImageVm {
    pub src: String,
    /// Inline style for the `<img>`; only set when the image is cropped.
    pub img_style: Option<String>,
    pub overlays: Vec<OverlayVm>,
    pub masks: Vec<String>,
    pub wrapped: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuestionCardVm {
    pub id: QuestionId,
    pub number_label: String,
    pub question_html: String,
    pub image: Option<ImageVm>,
    pub options: Vec<OptionVm>,
    pub status: CardStatus,
    /// Inputs are disabled once the question is graded.
    pub locked: bool,
    /// Present only once the question is graded.
    pub explanation_html: Option<String>,
}

impl QuestionCardVm {
    #[must_use]
    pub fn class(&self) -> &'static str {
        match self.status {
            CardStatus::Pending => "question-item",
            CardStatus::Correct => "question-item graded correct",
            CardStatus::Incorrect => "question-item graded incorrect",
        }
    }
}

/// Presentation state for one quiz attempt.
#[derive(Clone, Debug)]
pub struct QuizVm {
    session: QuizSession,
    reveal_all: bool,
}

impl QuizVm {
    #[must_use]
    pub fn new(session: QuizSession) -> Self {
        Self {
            session,
            reveal_all: false,
        }
    }

    #[must_use]
    pub fn session(&self) -> &QuizSession {
        &self.session
    }

    /// Cards in session order.
    #[must_use]
    pub fn cards(&self) -> Vec<QuestionCardVm> {
        self.session
            .questions()
            .map(|item| map_card(&item, self.reveal_all))
            .collect()
    }

    #[must_use]
    pub fn is_revealed(&self) -> bool {
        self.reveal_all
    }

    /// Grade every question on screen, answered or not.
    pub fn reveal_all(&mut self) {
        self.reveal_all = true;
    }

    #[must_use]
    pub fn is_locked(&self, id: QuestionId) -> bool {
        self.reveal_all || self.session.is_answered(id)
    }

    #[must_use]
    pub fn score(&self) -> ScoreResult {
        self.session.score()
    }

    #[must_use]
    pub fn score_label(&self) -> String {
        self.score().label()
    }

    #[must_use]
    pub fn progress(&self) -> SessionProgress {
        self.session.progress()
    }

    #[must_use]
    pub fn progress_label(&self) -> String {
        let progress = self.progress();
        format!("{} / {} 문항 응답", progress.answered, progress.total)
    }

    /// Record and grade a choice in memory.
    ///
    /// The caller persists the updated session; the VM stays in place while
    /// that write is in flight.
    ///
    /// # Errors
    ///
    /// Returns `ViewError::Rejected` if the question is locked or the choice is
    /// invalid; the session is unchanged in that case.
    pub fn select(&mut self, id: QuestionId, index: usize) -> Result<AnswerOutcome, ViewError> {
        if self.reveal_all {
            return Err(ViewError::Rejected);
        }
        self.session
            .record_answer(id, index)
            .map_err(|_| ViewError::Rejected)
    }
}

/// Restore or create the persisted session and wrap it for display.
pub async fn start_quiz<R: Rng + ?Sized>(quiz: &QuizSessionService, rng: &mut R) -> QuizVm {
    QuizVm::new(quiz.initialize(rng).await)
}

fn map_card(item: &SessionQuestion<'_>, reveal_all: bool) -> QuestionCardVm {
    let question = item.question;
    let graded = item.is_answered() || reveal_all;
    let correct_index = question.answer();

    let status = match (graded, item.is_correct()) {
        (false, _) => CardStatus::Pending,
        (true, Some(true)) => CardStatus::Correct,
        (true, _) => CardStatus::Incorrect,
    };

    let options = question
        .options()
        .iter()
        .enumerate()
        .map(|(index, text)| {
            let selected = item.selected == Some(index);
            let marker = if !graded {
                OptionMarker::None
            } else if index == correct_index {
                OptionMarker::CorrectAnswer
            } else if selected {
                OptionMarker::WrongChoice
            } else {
                OptionMarker::None
            };
            OptionVm {
                index,
                numeral: CIRCLED_NUMERALS.get(index).copied().unwrap_or("·"),
                text_html: sanitize_html(text),
                selected,
                marker,
            }
        })
        .collect();

    QuestionCardVm {
        id: question.id(),
        number_label: format!("{}.", question.id()),
        question_html: sanitize_html(question.text()),
        image: question.image().map(map_image),
        options,
        status,
        locked: graded,
        explanation_html: graded.then(|| sanitize_html(question.explanation())),
    }
}

fn map_image(image: &QuestionImage) -> ImageVm {
    let img_style = image.crop.map(|crop| {
        format!(
            "clip-path: inset({top}px 0 0 {left}px); margin-top: -{top}px; display: block;",
            top = crop.top,
            left = crop.left
        )
    });

    ImageVm {
        src: image.uri.to_src(),
        img_style,
        overlays: image
            .overlays
            .iter()
            .map(|overlay| OverlayVm {
                style: format!("top: {}; left: {};", overlay.top, overlay.left),
                text: overlay.text.clone(),
            })
            .collect(),
        masks: image
            .masks
            .iter()
            .map(|mask| {
                format!(
                    "top: {}; left: {}; width: {}; height: {};",
                    mask.top, mask.left, mask.width, mask.height
                )
            })
            .collect(),
        wrapped: image.needs_wrapper(),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use quiz_core::model::Catalog;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use services::{CatalogService, SessionStore};
    use storage::repository::InMemoryRepository;

    use super::*;

    const CATALOG: &str = r#"[
        { "id": 1, "question": "First <b>bold</b>?", "options": ["a","b","c","d"], "answer": 0,
          "explanation": "because a" },
        { "id": 2, "question": "Second?", "options": ["a","b","c","d"], "answer": 2,
          "image": "images/q2.png", "cropTop": 30, "cropLeft": 12,
          "overlays": [{ "top": "4px", "left": "8px", "text": "(가)" }],
          "masks": [{ "top": "0", "left": "0", "width": "10px", "height": "6px" }] }
    ]"#;

    fn catalog() -> Arc<Catalog> {
        CatalogService::from_json_str(CATALOG).unwrap()
    }

    fn service() -> QuizSessionService {
        QuizSessionService::new(
            catalog(),
            SessionStore::new(Arc::new(InMemoryRepository::new())),
        )
    }

    fn card(vm: &QuizVm, id: u64) -> QuestionCardVm {
        vm.cards()
            .into_iter()
            .find(|card| card.id == QuestionId::new(id))
            .unwrap()
    }

    #[tokio::test]
    async fn pending_cards_hide_grading() {
        let quiz = service();
        let vm = start_quiz(&quiz, &mut StdRng::seed_from_u64(1)).await;

        let first = card(&vm, 1);
        assert_eq!(first.class(), "question-item");
        assert!(!first.locked);
        assert!(first.explanation_html.is_none());
        assert_eq!(first.number_label, "1.");
        assert_eq!(first.question_html, "First <b>bold</b>?");
        let numerals: Vec<_> = first.options.iter().map(|o| o.numeral).collect();
        assert_eq!(numerals, ["①", "②", "③", "④"]);
        assert!(first.options.iter().all(|o| o.class() == "option-item"));
    }

    #[tokio::test]
    async fn wrong_answer_marks_choice_and_correct_option() {
        let quiz = service();
        let mut vm = start_quiz(&quiz, &mut StdRng::seed_from_u64(1)).await;

        let outcome = vm.select(QuestionId::new(2), 1).unwrap();
        assert!(!outcome.is_correct);

        let second = card(&vm, 2);
        assert_eq!(second.class(), "question-item graded incorrect");
        assert!(second.locked);
        assert_eq!(second.options[1].marker, OptionMarker::WrongChoice);
        assert!(second.options[1].selected);
        assert_eq!(second.options[2].class(), "option-item correct-answer");
        assert_eq!(second.explanation_html.as_deref(), Some(""));

        assert!(vm.is_locked(QuestionId::new(2)));
        assert_eq!(vm.select(QuestionId::new(2), 2), Err(ViewError::Rejected));
        assert_eq!(vm.progress_label(), "1 / 2 문항 응답");
        assert_eq!(vm.select(QuestionId::new(1), 4), Err(ViewError::Rejected));
    }

    #[tokio::test]
    async fn reveal_all_grades_unanswered_questions() {
        let quiz = service();
        let mut vm = start_quiz(&quiz, &mut StdRng::seed_from_u64(1)).await;
        vm.select(QuestionId::new(1), 0).unwrap();

        vm.reveal_all();

        let first = card(&vm, 1);
        assert_eq!(first.class(), "question-item graded correct");
        assert_eq!(first.explanation_html.as_deref(), Some("because a"));

        let second = card(&vm, 2);
        assert_eq!(second.class(), "question-item graded incorrect");
        assert!(second.locked);
        assert_eq!(second.options[2].marker, OptionMarker::CorrectAnswer);
        assert!(second.options.iter().all(|o| !o.selected));

        assert_eq!(vm.score_label(), "점수: 50점 (1 / 2)");
        assert!(vm.select(QuestionId::new(2), 2).is_err());
    }

    #[tokio::test]
    async fn selection_is_persisted_by_saving_the_session() {
        let repo = InMemoryRepository::new();
        let quiz = QuizSessionService::new(catalog(), SessionStore::new(Arc::new(repo.clone())));
        let mut vm = start_quiz(&quiz, &mut StdRng::seed_from_u64(1)).await;

        vm.select(QuestionId::new(1), 0).unwrap();
        quiz.save(vm.session()).await;

        let restored = start_quiz(&quiz, &mut StdRng::seed_from_u64(2)).await;
        assert_eq!(restored.session().answer_for(QuestionId::new(1)), Some(0));
        assert_eq!(restored.session().state(), vm.session().state());
    }

    #[tokio::test]
    async fn image_annotations_are_mapped() {
        let quiz = service();
        let vm = start_quiz(&quiz, &mut StdRng::seed_from_u64(1)).await;

        let image = card(&vm, 2).image.unwrap();
        assert_eq!(image.src, "images/q2.png");
        assert_eq!(
            image.img_style.as_deref(),
            Some("clip-path: inset(30px 0 0 12px); margin-top: -30px; display: block;")
        );
        assert!(image.wrapped);
        assert_eq!(image.overlays[0].style, "top: 4px; left: 8px;");
        assert_eq!(image.overlays[0].text, "(가)");
        assert_eq!(image.masks[0], "top: 0; left: 0; width: 10px; height: 6px;");
        assert!(card(&vm, 1).image.is_none());
    }
}
