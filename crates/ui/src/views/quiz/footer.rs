use dioxus::prelude::*;

use super::view::QuizIntent;

#[component]
pub(super) fn QuizFooter(
    progress_label: String,
    #[props(!optional)] score_label: Option<String>,
    on_intent: EventHandler<QuizIntent>,
) -> Element {
    rsx! {
        div { class: "quiz-footer",
            p { class: "quiz-progress", "{progress_label}" }

            match score_label {
                Some(label) => rsx! {
                    div { id: "score-display", class: "score", "{label}" }
                },
                None => rsx! {
                    button {
                        id: "submit-btn",
                        r#type: "button",
                        onclick: move |_| on_intent.call(QuizIntent::ShowScore),
                        "채점하기"
                    }
                },
            }

            button {
                id: "reset-btn",
                r#type: "button",
                class: "secondary",
                onclick: move |_| on_intent.call(QuizIntent::RequestReset),
                "처음부터 다시 풀기"
            }
        }
    }
}

/// Resetting discards every recorded answer, so it needs an explicit confirmation.
#[component]
pub(super) fn ResetDialog(on_intent: EventHandler<QuizIntent>) -> Element {
    rsx! {
        div { class: "modal-backdrop",
            div { class: "modal", "role": "dialog", "aria-modal": "true",
                p { "지금까지의 답안을 모두 지우고 새로 시작할까요?" }
                div { class: "modal-actions",
                    button {
                        id: "reset-confirm",
                        r#type: "button",
                        class: "danger",
                        onclick: move |_| on_intent.call(QuizIntent::ConfirmReset),
                        "다시 시작"
                    }
                    button {
                        id: "reset-cancel",
                        r#type: "button",
                        onclick: move |_| on_intent.call(QuizIntent::CancelReset),
                        "취소"
                    }
                }
            }
        }
    }
}
