mod catalog;
mod ids;
pub mod media;
mod question;
mod session;

pub use catalog::{Catalog, CatalogError};
pub use ids::{ParseIdError, QuestionId};
pub use media::{Crop, Mask, MediaUri, MediaValidationError, Overlay, QuestionImage};
pub use question::{OPTION_COUNT, Question, QuestionError, QuestionRecord};
pub use session::{AnswerError, AnswerOutcome, RestoreError, SessionSnapshot, SessionState};
