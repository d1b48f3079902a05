use dioxus::prelude::*;

use quiz_core::model::QuestionId;

use super::card::QuestionCard;
use super::footer::{QuizFooter, ResetDialog};
use crate::context::AppContext;
use crate::views::{ViewError, ViewState, view_state_from_resource};
use crate::vm::{QuizVm, start_quiz};

#[cfg(test)]
use std::cell::RefCell;
#[cfg(test)]
use std::rc::Rc;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QuizIntent {
    Select { id: QuestionId, index: usize },
    ShowScore,
    RequestReset,
    CancelReset,
    ConfirmReset,
}

#[component]
pub fn QuizView() -> Element {
    let ctx = use_context::<AppContext>();
    let quiz = ctx.quiz();

    let vm = use_signal(|| None::<QuizVm>);
    let mut confirm_reset = use_signal(|| false);
    let mut error = use_signal(|| None::<ViewError>);

    let resource = {
        let ctx = ctx.clone();
        use_resource(move || {
            let ctx = ctx.clone();
            let mut vm = vm;
            async move {
                let quiz = ctx.quiz();
                let mut rng = ctx.session_rng();
                let started = start_quiz(&quiz, &mut rng).await;
                vm.set(Some(started));
                Ok::<_, ViewError>(())
            }
        })
    };
    let state = view_state_from_resource(&resource);

    let dispatch_intent = {
        let ctx = ctx.clone();
        use_callback(move |intent: QuizIntent| {
            let mut vm = vm;
            match intent {
                QuizIntent::Select { id, index } => {
                    let locked = vm
                        .peek()
                        .as_ref()
                        .is_none_or(|current| current.is_locked(id));
                    if locked {
                        return;
                    }

                    // Grade in place so the page stays mounted while the write runs.
                    let recorded = vm.write().as_mut().map(|current| {
                        current
                            .select(id, index)
                            .map(|_| current.session().clone())
                    });
                    match recorded {
                        Some(Ok(session)) => {
                            error.set(None);
                            let quiz = quiz.clone();
                            spawn(async move {
                                quiz.save(&session).await;
                            });
                        }
                        Some(Err(err)) => error.set(Some(err)),
                        None => {}
                    }
                }
                QuizIntent::ShowScore => {
                    if let Some(current) = vm.write().as_mut() {
                        current.reveal_all();
                    }
                }
                QuizIntent::RequestReset => confirm_reset.set(true),
                QuizIntent::CancelReset => confirm_reset.set(false),
                QuizIntent::ConfirmReset => {
                    let ctx = ctx.clone();
                    spawn(async move {
                        let quiz = ctx.quiz();
                        let mut rng = ctx.session_rng();
                        let session = quiz.restart(&mut rng).await;
                        vm.set(Some(QuizVm::new(session)));
                        error.set(None);
                        confirm_reset.set(false);
                    });
                }
            }
        })
    };

    #[cfg(test)]
    {
        let mut registered = use_signal(|| false);
        if !registered() {
            registered.set(true);
            if let Some(handles) = try_consume_context::<QuizTestHandles>() {
                handles.register(dispatch_intent, vm);
            }
        }
    }

    let title = ctx.title().to_string();
    let snapshot = vm.read().as_ref().map(|current| {
        (
            current.cards(),
            current.progress_label(),
            current.is_revealed().then(|| current.score_label()),
        )
    });

    rsx! {
        div { class: "page quiz",
            h1 { class: "quiz-title", "{title}" }

            if let Some(err) = error() {
                p { class: "error", "{err.message()}" }
            }

            match (state, snapshot) {
                (ViewState::Error(err), _) => rsx! {
                    p { "{err.message()}" }
                },
                (_, Some((cards, progress_label, score_label))) => rsx! {
                    form { id: "exam-form",
                        onsubmit: move |evt: FormEvent| evt.prevent_default(),
                        div { id: "questions-container",
                            for card in cards {
                                QuestionCard {
                                    key: "{card.id}",
                                    card: card.clone(),
                                    on_select: move |(id, index): (QuestionId, usize)| {
                                        dispatch_intent.call(QuizIntent::Select { id, index });
                                    },
                                }
                            }
                        }
                    }
                    QuizFooter {
                        progress_label,
                        score_label,
                        on_intent: dispatch_intent,
                    }
                },
                (ViewState::Idle, None) => rsx! {
                    p { "문제를 불러오지 못했습니다." }
                },
                (_, None) => rsx! {
                    p { "불러오는 중..." }
                },
            }

            if confirm_reset() {
                ResetDialog { on_intent: dispatch_intent }
            }
        }
    }
}

#[cfg(test)]
#[derive(Clone, Default)]
pub(crate) struct QuizTestHandles {
    dispatch: Rc<RefCell<Option<Callback<QuizIntent>>>>,
    vm: Rc<RefCell<Option<Signal<Option<QuizVm>>>>>,
}

#[cfg(test)]
impl QuizTestHandles {
    pub(crate) fn register(&self, dispatch: Callback<QuizIntent>, vm: Signal<Option<QuizVm>>) {
        *self.dispatch.borrow_mut() = Some(dispatch);
        *self.vm.borrow_mut() = Some(vm);
    }

    pub(crate) fn dispatch(&self) -> Callback<QuizIntent> {
        (*self.dispatch.borrow()).expect("quiz dispatch registered")
    }

    pub(crate) fn vm(&self) -> Signal<Option<QuizVm>> {
        (*self.vm.borrow()).expect("quiz vm registered")
    }
}
