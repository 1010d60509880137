//! Global application state

use leptos::prelude::*;

use crate::actions::StoreHandle;
use crate::session::{SessionStore, View};
use crate::types::SessionSummary;

/// Global application state, provided as context by `App`.
///
/// The session store is private: views read it through [`AppState::with_store`]
/// and change it only through the methods below or the routines in
/// `actions`.
#[derive(Clone, Copy)]
pub struct AppState {
    store: RwSignal<SessionStore>,
    sessions: RwSignal<Vec<SessionSummary>>,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            store: RwSignal::new(SessionStore::new()),
            sessions: RwSignal::new(vec![]),
        }
    }

    /// Tracked read of the session store.
    pub fn with_store<R>(&self, f: impl FnOnce(&SessionStore) -> R) -> R {
        self.store.with(f)
    }

    /// Untracked read, for values a page only needs once when it mounts.
    pub fn with_store_untracked<R>(&self, f: impl FnOnce(&SessionStore) -> R) -> R {
        self.store.with_untracked(f)
    }

    pub fn view(&self) -> View {
        self.store.with(|s| s.view())
    }

    pub fn has_session(&self) -> bool {
        self.store.with(|s| s.session().is_some())
    }

    pub fn is_sending(&self) -> bool {
        self.store.with(|s| s.is_sending())
    }

    pub fn set_view(&self, view: View) {
        self.store.update(|s| {
            s.set_view(view);
        });
    }

    /// Empty the local conversation without contacting the backend.
    pub fn clear_history(&self) {
        self.store.update(|s| {
            s.clear_history();
        });
    }

    pub fn sessions(&self) -> Vec<SessionSummary> {
        self.sessions.get()
    }

    pub fn set_sessions(&self, sessions: Vec<SessionSummary>) {
        self.sessions.set(sessions);
    }

    /// Drop a deleted session from the list.
    pub fn forget_session(&self, session_id: &str) {
        self.sessions
            .update(|list| list.retain(|s| s.session_id != session_id));
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl StoreHandle for AppState {
    fn read_store<R>(&self, f: impl FnOnce(&SessionStore) -> R) -> Option<R> {
        self.store.try_with_untracked(f)
    }

    fn update_store<R>(&self, f: impl FnOnce(&mut SessionStore) -> R) -> Option<R> {
        self.store.try_update(f)
    }
}
