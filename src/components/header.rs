//! Header component

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::actions;
use crate::api::ApiClient;
use crate::session::View;
use crate::state::AppState;

/// Backend probe result shown as a badge
#[derive(Debug, Clone, PartialEq)]
enum Health {
    Checking,
    Online(String),
    Offline,
}

/// Main application header with view tabs
#[component]
pub fn Header() -> impl IntoView {
    let state = expect_context::<AppState>();
    let client = expect_context::<ApiClient>();
    let health = RwSignal::new(Health::Checking);

    // Probe the backend once on mount
    Effect::new(move |_| {
        let client = client.clone();
        spawn_local(async move {
            match actions::check_health(&client).await {
                Ok(status) => health.set(Health::Online(status.version)),
                Err(_) => health.set(Health::Offline),
            }
        });
    });

    let document_name = move || {
        state.with_store(|s| s.session().map(|session| session.document_name.clone()))
    };

    view! {
        <header class="header h-16 sticky top-0 z-40 border-b border-slate-800 bg-slate-900/80 backdrop-blur">
            <div class="h-full max-w-7xl mx-auto px-4 flex items-center justify-between gap-4">
                <button
                    on:click=move |_| state.set_view(View::Upload)
                    class="flex items-center gap-3 hover:opacity-80 transition-opacity"
                >
                    <div class="w-9 h-9 rounded-lg bg-gradient-to-br from-amber-500 to-orange-600 flex items-center justify-center text-lg">
                        "⚖"
                    </div>
                    <div class="text-left">
                        <h1 class="text-xl font-bold">"Lexly"</h1>
                        <p class="text-xs text-slate-500 -mt-0.5">
                            {move || document_name().unwrap_or_else(|| "Legal document assistant".to_string())}
                        </p>
                    </div>
                </button>

                <nav class="flex items-center gap-1">
                    <ViewTab target=View::Upload />
                    <ViewTab target=View::Analysis />
                    <ViewTab target=View::Chat />
                </nav>

                <div class="flex items-center gap-2 text-xs text-slate-400">
                    {move || match health.get() {
                        Health::Checking => view! {
                            <span class="w-2 h-2 rounded-full bg-slate-500 animate-pulse"></span>
                            <span>"Connecting..."</span>
                        }.into_any(),
                        Health::Online(version) => view! {
                            <span class="w-2 h-2 rounded-full bg-emerald-500"></span>
                            <span>{format!("API v{}", version)}</span>
                        }.into_any(),
                        Health::Offline => view! {
                            <span class="w-2 h-2 rounded-full bg-red-500"></span>
                            <span>"API offline"</span>
                        }.into_any(),
                    }}
                </div>
            </div>
        </header>
    }
}

/// Tab switching the coordinator view
#[component]
fn ViewTab(target: View) -> impl IntoView {
    let state = expect_context::<AppState>();
    let is_active = move || state.view() == target;
    let is_disabled = move || target.requires_session() && !state.has_session();

    view! {
        <button
            on:click=move |_| state.set_view(target)
            disabled=is_disabled
            class=move || format!(
                "px-3 py-1.5 rounded-lg text-sm transition-colors disabled:opacity-40 disabled:cursor-not-allowed {}",
                if is_active() { "bg-slate-800 text-white" } else { "text-slate-400 hover:text-white" }
            )
        >
            {target.label()}
        </button>
    }
}
