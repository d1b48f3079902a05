use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::ids::QuestionId;
use crate::model::media::{Crop, Mask, MediaUri, MediaValidationError, Overlay, QuestionImage};

/// Every question offers exactly this many choices.
pub const OPTION_COUNT: usize = 4;

//
// ─── QUESTION ERRORS ───────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("question text cannot be empty")]
    BlankQuestion,

    #[error("expected 4 options, found {found}")]
    OptionCount { found: usize },

    #[error("answer index {answer} is out of range")]
    AnswerOutOfRange { answer: usize },

    #[error(transparent)]
    Media(#[from] MediaValidationError),
}

//
// ─── CATALOG RECORD ────────────────────────────────────────────────────────────
//

/// Wire shape of a catalog entry, as authored in the catalog JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionRecord {
    pub id: u64,
    pub question: String,
    pub options: Vec<String>,
    pub answer: usize,
    #[serde(default)]
    pub explanation: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crop_top: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crop_left: Option<u32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub overlays: Vec<Overlay>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub masks: Vec<Mask>,
}

impl QuestionRecord {
    /// Validate the record into a domain `Question`.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` if the text is blank, the option count is wrong,
    /// the answer index is out of range, or the image reference is unusable.
    pub fn validate(self) -> Result<Question, QuestionError> {
        let image = self
            .image
            .map(|raw| {
                MediaUri::parse(raw).map(|uri| QuestionImage {
                    uri,
                    crop: Crop::from_offsets(self.crop_top, self.crop_left),
                    overlays: self.overlays,
                    masks: self.masks,
                })
            })
            .transpose()?;

        Question::new(
            QuestionId::new(self.id),
            self.question,
            self.options,
            self.answer,
            self.explanation,
            image,
        )
    }
}

//
// ─── QUESTION ──────────────────────────────────────────────────────────────────
//

/// Immutable multiple-choice question supplied by the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    id: QuestionId,
    text: String,
    options: [String; OPTION_COUNT],
    answer: usize,
    explanation: String,
    image: Option<QuestionImage>,
}

impl Question {
    /// # Errors
    ///
    /// Returns `QuestionError` if invariants are violated.
    pub fn new(
        id: QuestionId,
        text: impl Into<String>,
        options: Vec<String>,
        answer: usize,
        explanation: impl Into<String>,
        image: Option<QuestionImage>,
    ) -> Result<Self, QuestionError> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(QuestionError::BlankQuestion);
        }

        let found = options.len();
        let options: [String; OPTION_COUNT] = options
            .try_into()
            .map_err(|_| QuestionError::OptionCount { found })?;

        if answer >= OPTION_COUNT {
            return Err(QuestionError::AnswerOutOfRange { answer });
        }

        Ok(Self {
            id,
            text,
            options,
            answer,
            explanation: explanation.into(),
            image,
        })
    }

    #[must_use]
    pub fn id(&self) -> QuestionId {
        self.id
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn options(&self) -> &[String] {
        &self.options
    }

    /// Index of the correct option.
    #[must_use]
    pub fn answer(&self) -> usize {
        self.answer
    }

    #[must_use]
    pub fn explanation(&self) -> &str {
        &self.explanation
    }

    #[must_use]
    pub fn image(&self) -> Option<&QuestionImage> {
        self.image.as_ref()
    }

    #[must_use]
    pub fn is_valid_option(&self, index: usize) -> bool {
        index < self.options.len()
    }

    #[must_use]
    pub fn is_correct(&self, index: usize) -> bool {
        index == self.answer
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
