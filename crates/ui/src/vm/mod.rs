mod markup;
mod quiz_vm;

pub use markup::sanitize_html;
pub use quiz_vm::{
    CardStatus, ImageVm, OptionMarker, OptionVm, OverlayVm, QuestionCardVm, QuizVm, start_quiz,
};
