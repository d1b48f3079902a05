#![forbid(unsafe_code)]

pub mod grading;
pub mod model;

pub use grading::{ScoreResult, compute_score};
