//! Analysis page - metadata, summary and clauses of the active document

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::actions;
use crate::api::ApiClient;
use crate::components::{ClauseCard, ConfidenceBadge, MetadataCard, Progress, Task};
use crate::fetch::FetchState;
use crate::markdown;
use crate::session::View;
use crate::state::AppState;
use crate::types::Analysis;

/// Title of the clause list.
pub fn clause_heading(count: usize) -> String {
    format!("Document Clauses ({})", count)
}

#[component]
pub fn AnalysisPage() -> impl IntoView {
    let state = expect_context::<AppState>();

    // The analysis is fixed for a session; the page is remounted when the
    // session changes.
    let analysis = state.with_store_untracked(|s| s.session().map(|session| session.analysis.clone()));

    match analysis {
        Some(analysis) => view! { <AnalysisView analysis=analysis /> }.into_any(),
        None => view! {
            <div class="flex-1 flex flex-col items-center justify-center gap-4 py-24">
                <p class="text-slate-400">"No document loaded yet."</p>
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
fn AnalysisView(analysis: Analysis) -> impl IntoView {
    let state = expect_context::<AppState>();
    let confidence = analysis.confidence_percent();
    let document_name = analysis.document_name.clone();
    let meta = analysis.metadata.clone();
    let optional = |v: &Option<String>| v.iter().cloned().collect::<Vec<_>>();
    let processed = analysis
        .processing_timestamp
        .map(|t| format!("Processed {}", t.format("%b %d, %Y %H:%M UTC")));
    let clauses = analysis.clauses;

    view! {
        <div class="max-w-5xl w-full mx-auto px-4 py-10 space-y-10">
            <section class="flex flex-wrap items-start justify-between gap-4">
                <div>
                    <h2 class="text-3xl font-bold">{document_name}</h2>
                    <p class="text-sm text-slate-500 mt-1">{processed}</p>
                </div>
                <div class="flex items-center gap-3">
                    <ConfidenceBadge percent=confidence />
                    <button
                        on:click=move |_| state.set_view(View::Chat)
                        class="px-4 py-2 bg-amber-600 hover:bg-amber-700 rounded-lg text-sm font-medium"
                    >
                        "Ask about this document"
                    </button>
                </div>
            </section>

            <section class="grid sm:grid-cols-2 lg:grid-cols-3 gap-4">
                <MetadataCard label="Document type" icon="📑" values=vec![meta.document_type.clone()] />
                <MetadataCard label="Parties" icon="🤝" values=meta.parties.clone() />
                <MetadataCard label="Key dates" icon="📅" values=meta.dates.clone() />
                <MetadataCard label="Contract value" icon="💰" values=optional(&meta.contract_value) />
                <MetadataCard label="Jurisdiction" icon="🏛" values=optional(&meta.jurisdiction) />
                <MetadataCard label="Governing law" icon="⚖" values=optional(&meta.governing_law) />
            </section>

            <SummarySection />

            <section class="space-y-4">
                <h3 class="text-xl font-semibold">{clause_heading(clauses.len())}</h3>
                {if clauses.is_empty() {
                    view! {
                        <div class="p-4 rounded-xl bg-amber-500/10 border border-amber-500/40 text-sm text-amber-200">
                            "No clauses were identified in this document. It may be scanned, very short, or not a contract. "
                            "You can still ask questions about it in the chat."
                        </div>
                    }.into_any()
                } else {
                    view! {
                        <div class="space-y-3">
                            {clauses.into_iter().map(|clause| view! {
                                <ClauseCard clause=clause />
                            }).collect::<Vec<_>>()}
                        </div>
                    }.into_any()
                }}
            </section>
        </div>
    }
}

/// On-demand document summary
#[component]
fn SummarySection() -> impl IntoView {
    let state = expect_context::<AppState>();
    let client = expect_context::<ApiClient>();
    let error = RwSignal::new(Option::<String>::None);

    let summary = move || state.with_store(|s| s.summary().clone());
    let is_pending = move || state.with_store(|s| s.summary().is_pending());

    let request_summary = move |_| {
        error.set(None);
        let client = client.clone();
        spawn_local(async move {
            if let Err(e) = actions::summarize(&client, &state).await {
                error.set(Some(e.to_string()));
            }
        });
    };

    view! {
        <section class="p-6 bg-slate-800/60 border border-slate-700 rounded-2xl space-y-4">
            <div class="flex items-center justify-between gap-4">
                <h3 class="text-xl font-semibold">"Summary"</h3>
                <button
                    on:click=request_summary
                    disabled=is_pending
                    class="px-4 py-2 bg-slate-700 hover:bg-slate-600 rounded-lg text-sm disabled:opacity-50 disabled:cursor-wait"
                >
                    {move || match summary() {
                        FetchState::Pending => "Summarizing...",
                        FetchState::Ready(_) => "Regenerate summary",
                        _ => "Generate summary",
                    }}
                </button>
            </div>

            {move || error.get().map(|msg| view! {
                <div class="p-3 rounded-lg bg-red-500/10 border border-red-500/40 text-sm text-red-300">{msg}</div>
            })}

            {move || match summary() {
                FetchState::Pending => view! { <Progress task=Task::Summary /> }.into_any(),
                FetchState::Ready(text) => {
                    let html = markdown::to_html(&text);
                    view! { <div class="prose prose-invert max-w-none" inner_html=html></div> }.into_any()
                }
                _ => view! {
                    <p class="text-sm text-slate-500">
                        "Generate a plain-language overview of the whole document."
                    </p>
                }.into_any(),
            }}
        </section>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clause_heading_shows_count() {
        assert_eq!(clause_heading(0), "Document Clauses (0)");
        assert_eq!(clause_heading(12), "Document Clauses (12)");
    }
}
