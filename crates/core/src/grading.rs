//! Aggregate grading over a catalog and a set of recorded answers.

use std::collections::BTreeMap;

use crate::model::{Catalog, QuestionId};

/// Aggregate score for a session.
///
/// `total` is always the catalog size; unanswered questions count as incorrect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreResult {
    pub correct: u32,
    pub total: u32,
    pub percent: u32,
}

impl ScoreResult {
    #[must_use]
    pub fn new(correct: u32, total: u32) -> Self {
        Self {
            correct,
            total,
            percent: rounded_percent(correct, total),
        }
    }

    /// Summary line shown under the quiz, e.g. `점수: 50점 (1 / 2)`.
    #[must_use]
    pub fn label(&self) -> String {
        format!("점수: {}점 ({} / {})", self.percent, self.correct, self.total)
    }
}

/// `round(100 * correct / total)`, rounding halves up; zero when `total` is zero.
#[must_use]
pub fn rounded_percent(correct: u32, total: u32) -> u32 {
    if total == 0 {
        return 0;
    }
    let correct = u64::from(correct);
    let total = u64::from(total);
    let percent = (200 * correct + total) / (2 * total);
    u32::try_from(percent).unwrap_or(u32::MAX)
}

/// Score the recorded answers against the full catalog.
///
/// Iterates the catalog rather than any session order, so ordering never affects the result.
#[must_use]
pub fn compute_score(catalog: &Catalog, answers: &BTreeMap<QuestionId, usize>) -> ScoreResult {
    let correct = catalog
        .questions()
        .iter()
        .filter(|question| {
            answers
                .get(&question.id())
                .is_some_and(|&selected| question.is_correct(selected))
        })
        .count();

    let correct = u32::try_from(correct).unwrap_or(u32::MAX);
    let total = u32::try_from(catalog.len()).unwrap_or(u32::MAX);
    ScoreResult::new(correct, total)
}
