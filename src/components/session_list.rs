//! Previously created sessions

use chrono::{DateTime, Utc};
use leptos::prelude::*;

use crate::types::SessionSummary;

/// Format a backend timestamp for the list, or a dash when missing.
pub fn format_timestamp(ts: Option<DateTime<Utc>>) -> String {
    ts.map(|t| t.format("%b %d, %Y %H:%M").to_string())
        .unwrap_or_else(|| "—".to_string())
}

/// List of sessions with view and delete actions
#[component]
pub fn SessionList<V, D>(
    /// Sessions to show
    #[prop(into)]
    sessions: Signal<Vec<SessionSummary>>,
    /// Session currently being opened or deleted, if any
    #[prop(into)]
    busy: Signal<Option<String>>,
    on_view: V,
    on_delete: D,
) -> impl IntoView
where
    V: Fn(String) + Clone + Send + Sync + 'static,
    D: Fn(String) + Clone + Send + Sync + 'static,
{
    move || {
        let sessions = sessions.get();
        if sessions.is_empty() {
            return view! {
                <p class="text-sm text-slate-500 italic">"No previous sessions yet."</p>
            }.into_any();
        }

        let items = sessions.into_iter().map(|session| {
            let id_for_view = session.session_id.clone();
            let id_for_delete = session.session_id.clone();
            let id_for_busy = session.session_id.clone();
            let on_view = on_view.clone();
            let on_delete = on_delete.clone();
            let is_busy = move || busy.get().as_deref() == Some(id_for_busy.as_str());
            let clauses = session
                .clauses_count
                .map(|n| format!(" • {} clauses", n))
                .unwrap_or_default();

            view! {
                <li class="p-4 bg-slate-800/60 border border-slate-700 rounded-xl flex items-center justify-between gap-4">
                    <div class="min-w-0">
                        <p class="font-medium text-slate-100 truncate">{session.document_name.clone()}</p>
                        <p class="text-xs text-slate-500">
                            {format!("Created {}", format_timestamp(session.created_at))}
                            " • "
                            {format!("Last used {}", format_timestamp(session.last_accessed))}
                        </p>
                        <p class="text-xs text-slate-500">
                            {format!("{} messages{}", session.message_count, clauses)}
                        </p>
                    </div>
                    <div class="flex items-center gap-2 shrink-0">
                        <button
                            on:click=move |_| on_view(id_for_view.clone())
                            disabled=is_busy.clone()
                            class="px-3 py-1.5 rounded-lg bg-amber-600 hover:bg-amber-700 text-sm disabled:opacity-50"
                        >
                            "View"
                        </button>
                        <button
                            on:click=move |_| on_delete(id_for_delete.clone())
                            disabled=is_busy
                            class="px-3 py-1.5 rounded-lg bg-slate-700 hover:bg-red-700 text-sm disabled:opacity-50"
                        >
                            "Delete"
                        </button>
                    </div>
                </li>
            }
        }).collect::<Vec<_>>();

        view! { <ul class="space-y-3">{items}</ul> }.into_any()
    }
}
