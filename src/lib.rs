//! Lexly - Leptos frontend for legal document analysis
//!
//! Upload a contract, browse the clauses the backend extracted, and ask the
//! assistant questions about it. All analysis happens server side; this
//! crate only renders state and calls the REST API.

pub mod actions;
pub mod api;
pub mod components;
pub mod config;
pub mod error;
pub mod fetch;
pub mod markdown;
pub mod pages;
pub mod session;
pub mod state;
pub mod types;

use leptos::prelude::*;
use leptos_meta::{provide_meta_context, Title};

use api::ApiClient;
use components::Header;
use config::Config;
use pages::{analysis::AnalysisPage, chat::ChatPage, upload::UploadPage};
use session::View;
use state::AppState;

/// Main application component
#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    let config = Config::load();
    tracing::info!(api_base = %config.api_base, "starting Lexly UI");
    let client = ApiClient::new(&config.api_base);
    let app_state = AppState::new();
    provide_context(config);
    provide_context(client);
    provide_context(app_state);

    // Remount pages only when the view or the session changes, not on every
    // store update.
    let page = Memo::new(move |_| app_state.with_store(|s| (s.view(), s.generation())));

    let title = move || {
        app_state.with_store(|s| match s.session() {
            Some(session) => format!("{} | Lexly", session.document_name),
            None => "Lexly".to_string(),
        })
    };

    view! {
        <Title text=title />
        <main class="min-h-screen flex flex-col bg-slate-900 text-slate-100">
            <Header />
            <div class="flex-1 flex flex-col">
                {move || match page.get().0 {
                    View::Upload => view! { <UploadPage /> }.into_any(),
                    View::Analysis => view! { <AnalysisPage /> }.into_any(),
                    View::Chat => view! { <ChatPage /> }.into_any(),
                }}
            </div>
        </main>
    }
}
