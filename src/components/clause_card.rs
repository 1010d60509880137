//! Expandable clause with a lazily fetched explanation

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::actions;
use crate::api::ApiClient;
use crate::components::{Progress, Task};
use crate::fetch::FetchState;
use crate::markdown;
use crate::state::AppState;
use crate::types::{Clause, ClauseExplanation};

const PREVIEW_CHARS: usize = 160;

/// First `max_chars` characters of `text`, with an ellipsis when cut.
pub fn excerpt(text: &str, max_chars: usize) -> String {
    let text = text.trim();
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}…", text[..idx].trim_end()),
        None => text.to_string(),
    }
}

#[component]
pub fn ClauseCard(clause: Clause) -> impl IntoView {
    let state = expect_context::<AppState>();
    let client = expect_context::<ApiClient>();
    let expanded = RwSignal::new(false);

    let clause_id = clause.id.clone();
    let toggle = move |_| {
        let opening = !expanded.get_untracked();
        expanded.set(opening);
        if opening {
            let client = client.clone();
            let clause_id = clause_id.clone();
            spawn_local(async move {
                // Failures leave the placeholder; re-expanding retries.
                let _ = actions::explain_clause(&client, &state, &clause_id).await;
            });
        }
    };

    let key = clause.id.clone();
    let explanation = move || state.with_store(|s| s.explanations().state(&key).cloned());
    let preview = excerpt(&clause.text, PREVIEW_CHARS);
    let full_text = clause.text.clone();

    view! {
        <div class="bg-slate-800/60 border border-slate-700 rounded-xl overflow-hidden">
            <button
                on:click=toggle
                class="w-full text-left px-5 py-4 flex items-start justify-between gap-4 hover:bg-slate-800 transition-colors"
            >
                <div class="min-w-0">
                    <div class="flex items-center gap-2 mb-1">
                        <h4 class="font-semibold text-slate-100">{clause.title.clone()}</h4>
                        <span class="px-2 py-0.5 rounded bg-slate-700 text-xs text-slate-300 capitalize">
                            {clause.type_label()}
                        </span>
                    </div>
                    <p class="text-xs text-slate-500">{clause.page_span()}</p>
                    <Show when=move || !expanded.get()>
                        <p class="mt-2 text-sm text-slate-400">{preview.clone()}</p>
                    </Show>
                </div>
                <span class=move || format!(
                    "text-slate-400 transition-transform {}",
                    if expanded.get() { "rotate-180" } else { "" }
                )>"▾"</span>
            </button>

            <Show when=move || expanded.get()>
                <div class="px-5 pb-5 space-y-4">
                    <blockquote class="text-sm text-slate-300 whitespace-pre-wrap border-l-2 border-slate-600 pl-3">
                        {full_text.clone()}
                    </blockquote>
                    {
                        let explanation = explanation.clone();
                        move || match explanation() {
                            Some(FetchState::Pending) => view! { <Progress task=Task::Explanation /> }.into_any(),
                            Some(FetchState::Ready(explanation)) => view! {
                                <ExplanationView explanation=explanation />
                            }.into_any(),
                            _ => view! {
                                <p class="text-sm text-slate-500 italic">
                                    "No explanation loaded. Collapse and expand the clause to try again."
                                </p>
                            }.into_any(),
                        }
                    }
                </div>
            </Show>
        </div>
    }
}

#[component]
fn ExplanationView(explanation: ClauseExplanation) -> impl IntoView {
    let plain = markdown::to_html(&explanation.plain_language);
    let detail = markdown::to_html(&explanation.explanation);

    view! {
        <div class="space-y-4">
            <div class="p-4 rounded-lg bg-amber-500/10 border border-amber-500/30">
                <h5 class="text-xs uppercase tracking-wider text-amber-300 mb-2">"In plain language"</h5>
                <div class="prose prose-invert prose-sm max-w-none" inner_html=plain></div>
            </div>
            <div class="prose prose-invert prose-sm max-w-none" inner_html=detail></div>
            <BulletList title="Key points" tone="text-emerald-300" items=explanation.key_points />
            <BulletList title="Risks" tone="text-red-300" items=explanation.risks />
        </div>
    }
}

#[component]
fn BulletList(title: &'static str, tone: &'static str, items: Vec<String>) -> impl IntoView {
    (!items.is_empty()).then(|| {
        view! {
            <div>
                <h5 class=format!("text-xs uppercase tracking-wider mb-2 {}", tone)>{title}</h5>
                <ul class="list-disc list-inside space-y-1 text-sm text-slate-300">
                    {items.into_iter().map(|item| view! { <li>{item}</li> }).collect::<Vec<_>>()}
                </ul>
            </div>
        }
    })
}
