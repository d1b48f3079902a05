use dioxus::prelude::*;

use quiz_core::model::QuestionId;

use crate::vm::{ImageVm, QuestionCardVm};

#[component]
pub(super) fn QuestionCard(
    card: QuestionCardVm,
    on_select: EventHandler<(QuestionId, usize)>,
) -> Element {
    let id = card.id;
    let locked = card.locked;

    rsx! {
        div { class: "{card.class()}", "data-id": "{id}",
            div { class: "question-text",
                span { class: "question-number", "{card.number_label}" }
                span { dangerous_inner_html: "{card.question_html}" }
            }

            if let Some(image) = card.image.clone() {
                QuestionImageView { image }
            }

            div { class: "options-list",
                for option in card.options.clone() {
                    label { key: "{option.index}", class: "{option.class()}",
                        input {
                            r#type: "radio",
                            name: "q_{id}",
                            value: "{option.index}",
                            checked: option.selected,
                            disabled: locked,
                            onchange: move |_| on_select.call((id, option.index)),
                        }
                        span { class: "circle-num", "{option.numeral}" }
                        span { class: "option-text", dangerous_inner_html: "{option.text_html}" }
                    }
                }
            }

            if let Some(explanation) = card.explanation_html.clone() {
                div { class: "explanation",
                    strong { "해설:" }
                    " "
                    span { dangerous_inner_html: "{explanation}" }
                }
            }
        }
    }
}

#[component]
fn QuestionImageView(image: ImageVm) -> Element {
    let style = image.img_style.clone().unwrap_or_default();

    if !image.wrapped {
        return rsx! {
            img { class: "question-image", src: "{image.src}", alt: "Question Image", style: "{style}" }
        };
    }

    rsx! {
        div { class: "image-wrapper",
            img { class: "question-image", src: "{image.src}", alt: "Question Image", style: "{style}" }
            for overlay in image.overlays.clone() {
                div { class: "image-overlay-label", style: "{overlay.style}", "{overlay.text}" }
            }
            for mask in image.masks.clone() {
                div { class: "image-mask", style: "{mask}" }
            }
        }
    }
}
