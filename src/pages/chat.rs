//! Chat page - questions and answers about the active document

use gloo_timers::future::TimeoutFuture;
use leptos::prelude::*;
use leptos::task::spawn_local;
use web_sys::{ScrollBehavior, ScrollIntoViewOptions};

use crate::actions;
use crate::api::ApiClient;
use crate::components::{ChatBubble, ChatInput, ReplyPending};
use crate::session::View;
use crate::state::AppState;
use crate::types::ChatMessage;

pub const SUGGESTED_QUESTIONS: &[&str] = &[
    "What are my main obligations under this agreement?",
    "How can this contract be terminated?",
    "Are there any penalties or fees I should know about?",
    "What happens if either party breaches the contract?",
];

/// Starter questions, offered only while the conversation is empty.
pub fn suggested_questions(history: &[ChatMessage]) -> &'static [&'static str] {
    if history.is_empty() {
        SUGGESTED_QUESTIONS
    } else {
        &[]
    }
}

#[component]
pub fn ChatPage() -> impl IntoView {
    let state = expect_context::<AppState>();

    let document_name =
        state.with_store_untracked(|s| s.session().map(|session| session.document_name.clone()));

    match document_name {
        Some(name) => view! { <Conversation document_name=name /> }.into_any(),
        None => view! {
            <div class="flex-1 flex flex-col items-center justify-center gap-4 py-24">
                <p class="text-slate-400">"Upload a document before asking questions about it."</p>
                <button
                    on:click=move |_| state.set_view(View::Upload)
                    class="px-6 py-3 bg-amber-600 hover:bg-amber-700 rounded-lg font-medium"
                >
                    "Upload a document"
                </button>
            </div>
        }.into_any(),
    }
}

#[component]
fn Conversation(document_name: String) -> impl IntoView {
    let state = expect_context::<AppState>();
    let client = expect_context::<ApiClient>();

    let input = RwSignal::new(String::new());
    let error = RwSignal::new(Option::<String>::None);
    let messages_end_ref = NodeRef::<leptos::html::Div>::new();

    // Wait a tick so the new messages are in the DOM before scrolling
    let scroll_to_bottom = move || {
        spawn_local(async move {
            TimeoutFuture::new(0).await;
            if let Some(el) = messages_end_ref.get_untracked() {
                let options = ScrollIntoViewOptions::new();
                options.set_behavior(ScrollBehavior::Smooth);
                el.scroll_into_view_with_scroll_into_view_options(&options);
            }
        });
    };

    let do_send = move |content: String| {
        if content.trim().is_empty() || state.is_sending() {
            return;
        }
        error.set(None);
        let client = client.clone();
        spawn_local(async move {
            scroll_to_bottom();
            match actions::send_message(&client, &state, &content).await {
                Ok(_) => {}
                Err(e) => {
                    error.set(Some(e.to_string()));
                    // Give the unsent text back if nothing new was typed
                    if input.get_untracked().is_empty() {
                        input.set(content);
                    }
                }
            }
            scroll_to_bottom();
        });
    };

    let send_from_input = do_send.clone();
    let submit = move || {
        let content = input.get_untracked();
        input.set(String::new());
        send_from_input(content);
    };

    let history = move || state.with_store(|s| s.history().to_vec());
    let is_sending = Signal::derive(move || state.is_sending());

    view! {
        <div class="flex-1 flex flex-col max-w-4xl w-full mx-auto">
            <div class="h-14 px-4 flex items-center justify-between border-b border-slate-700">
                <div class="min-w-0">
                    <p class="text-xs text-slate-500">"Chatting about"</p>
                    <p class="font-medium text-sm truncate">{document_name}</p>
                </div>
                <div class="flex items-center gap-3">
                    <button
                        on:click=move |_| state.set_view(View::Analysis)
                        class="px-3 py-1.5 rounded-lg bg-slate-700 hover:bg-slate-600 text-sm"
                    >
                        "Back to analysis"
                    </button>
                    <button
                        on:click=move |_| {
                            error.set(None);
                            state.clear_history();
                        }
                        disabled=move || is_sending.get()
                        class="px-3 py-1.5 rounded-lg bg-slate-700 hover:bg-red-700 text-sm disabled:opacity-50"
                    >
                        "Clear"
                    </button>
                </div>
            </div>

            <div class="flex-1 overflow-y-auto px-4 py-6 space-y-6">
                {
                    let do_send = do_send.clone();
                    move || {
                        let questions = state.with_store(|s| suggested_questions(s.history()));
                        (!questions.is_empty()).then(|| {
                            let do_send = do_send.clone();
                            view! { <EmptyState questions=questions on_prompt=do_send /> }
                        })
                    }
                }

                {move || history().into_iter().map(|message| view! {
                    <ChatBubble message=message />
                }).collect::<Vec<_>>()}

                <Show when=move || is_sending.get()>
                    <ReplyPending />
                </Show>

                <div node_ref=messages_end_ref></div>
            </div>

            {move || error.get().map(|msg| view! {
                <div class="mx-4 mb-2 p-3 rounded-lg bg-red-500/10 border border-red-500/40 text-sm text-red-300">
                    {msg}
                </div>
            })}

            <ChatInput
                value=input
                on_submit=submit
                disabled=is_sending
                placeholder="Ask a question about this document... (Shift+Enter for new line)"
            />
        </div>
    }
}

/// Empty conversation with starter questions
#[component]
fn EmptyState<F>(questions: &'static [&'static str], on_prompt: F) -> impl IntoView
where
    F: Fn(String) + Clone + 'static,
{
    view! {
        <div class="flex flex-col items-center text-center gap-6 py-12">
            <div class="text-5xl">"⚖"</div>
            <div>
                <h2 class="text-2xl font-semibold">"Ask anything about this document"</h2>
                <p class="text-sm text-slate-400 mt-1">
                    "Answers are based on the uploaded text. They are not legal advice."
                </p>
            </div>
            <div class="w-full max-w-2xl grid sm:grid-cols-2 gap-3">
                {questions.iter().map(|question| {
                    let question = *question;
                    let on_prompt = on_prompt.clone();
                    view! {
                        <button
                            on:click=move |_| on_prompt(question.to_string())
                            class="p-4 text-left text-sm rounded-xl bg-slate-800/60 border border-slate-700 hover:border-amber-500/60"
                        >
                            {question}
                        </button>
                    }
                }).collect::<Vec<_>>()}
            </div>
        </div>
    }
}
