//! Coordinator routines: API calls applied to the session store.
//!
//! Each routine issues at most one request and applies its outcome through a
//! [`StoreHandle`]. Errors are logged here and returned for the caller to
//! show inline; the store is never left half-updated.

use std::cell::RefCell;

use crate::api::{ApiClient, Transport};
use crate::error::{ApiError, Result};
use crate::session::{Session, SessionStore, TurnRefused};
use crate::types::{HealthStatus, SessionSummary};

/// Access to the session store.
///
/// `None` means the store is gone (its owner was disposed while a request
/// was in flight); the result is then discarded.
pub trait StoreHandle {
    fn read_store<R>(&self, f: impl FnOnce(&SessionStore) -> R) -> Option<R>;
    fn update_store<R>(&self, f: impl FnOnce(&mut SessionStore) -> R) -> Option<R>;
}

impl StoreHandle for RefCell<SessionStore> {
    fn read_store<R>(&self, f: impl FnOnce(&SessionStore) -> R) -> Option<R> {
        Some(f(&self.borrow()))
    }

    fn update_store<R>(&self, f: impl FnOnce(&mut SessionStore) -> R) -> Option<R> {
        Some(f(&mut self.borrow_mut()))
    }
}

fn active_session_id<S: StoreHandle>(store: &S) -> String {
    store
        .read_store(|s| s.session_id().map(|id| id.to_string()))
        .flatten()
        .unwrap_or_default()
}

/// Upload a document and make it the active session.
pub async fn upload_document<T, S>(
    client: &ApiClient<T>,
    store: &S,
    file_name: &str,
    file: T::Upload,
) -> Result<()>
where
    T: Transport,
    S: StoreHandle,
{
    match client.upload_document(file_name, file).await {
        Ok(doc) => {
            tracing::info!(session_id = %doc.session_id, document = %doc.document_name, "document uploaded");
            store.update_store(|s| s.install(Session::from(doc)));
            Ok(())
        }
        Err(e) if e.is_local() => {
            tracing::debug!(document = %file_name, "upload rejected: {}", e);
            Err(e)
        }
        Err(e) => {
            tracing::error!(document = %file_name, "upload failed: {}", e);
            Err(e)
        }
    }
}

/// Load a stored session from the backend and make it active.
pub async fn load_session<T, S>(client: &ApiClient<T>, store: &S, session_id: &str) -> Result<()>
where
    T: Transport,
    S: StoreHandle,
{
    match client.get_session(session_id).await {
        Ok(session) => {
            tracing::info!(session_id = %session.id, messages = session.history.len(), "session loaded");
            store.update_store(|s| s.install(session));
            Ok(())
        }
        Err(e) => {
            tracing::error!(session_id = %session_id, "failed to load session: {}", e);
            Err(e)
        }
    }
}

/// Send a chat message with an optimistic user turn.
///
/// Returns `Ok(false)` when nothing was sent (blank input or a turn already
/// in flight). On failure the history is rolled back to its pre-send state.
pub async fn send_message<T, S>(client: &ApiClient<T>, store: &S, content: &str) -> Result<bool>
where
    T: Transport,
    S: StoreHandle,
{
    let turn = match store.update_store(|s| s.begin_turn(content)) {
        Some(Ok(turn)) => turn,
        Some(Err(TurnRefused::NoSession)) => return Err(ApiError::MissingSession),
        Some(Err(TurnRefused::Blank | TurnRefused::Busy)) | None => return Ok(false),
    };

    match client.send_chat(turn.session_id().as_str(), turn.content()).await {
        Ok(reply) => {
            store.update_store(|s| s.complete_turn(&turn, reply));
            Ok(true)
        }
        Err(e) => {
            tracing::warn!(session_id = %turn.session_id(), status = ?e.status(), "chat failed: {}", e);
            store.update_store(|s| s.fail_turn(&turn));
            Err(e)
        }
    }
}

/// Fetch the explanation for a clause unless it is cached or in flight.
///
/// Returns whether a request was issued.
pub async fn explain_clause<T, S>(client: &ApiClient<T>, store: &S, clause_id: &str) -> Result<bool>
where
    T: Transport,
    S: StoreHandle,
{
    let Some(ticket) = store.update_store(|s| s.begin_explanation(clause_id)).flatten() else {
        return Ok(false);
    };

    let result = client
        .explain_clause(ticket.session_id().as_str(), ticket.clause_id())
        .await;
    if let Err(e) = &result {
        tracing::warn!(clause_id = %clause_id, "explanation failed: {}", e);
    }
    let outcome = result.as_ref().map(|_| true).map_err(|e| e.clone());
    store.update_store(|s| s.settle_explanation(&ticket, result));
    outcome
}

/// Request a fresh document summary.
pub async fn summarize<T, S>(client: &ApiClient<T>, store: &S) -> Result<bool>
where
    T: Transport,
    S: StoreHandle,
{
    let ticket = match store.update_store(|s| s.begin_summary()) {
        Some(Some(ticket)) => ticket,
        Some(None) if active_session_id(store).is_empty() => return Err(ApiError::MissingSession),
        _ => return Ok(false),
    };

    let result = client.summarize_document(ticket.session_id().as_str()).await;
    if let Err(e) = &result {
        tracing::warn!(session_id = %ticket.session_id(), "summary failed: {}", e);
    }
    let outcome = result.as_ref().map(|_| true).map_err(|e| e.clone());
    store.update_store(|s| s.settle_summary(&ticket, result));
    outcome
}

/// Probe the backend once; the header shows the result as a badge.
pub async fn check_health<T: Transport>(client: &ApiClient<T>) -> Result<HealthStatus> {
    let status = client.health().await.inspect_err(|e| {
        tracing::warn!("health check failed: {}", e);
    })?;
    tracing::debug!(version = %status.version, "backend reachable");
    Ok(status)
}

/// Fetch the sessions list.
pub async fn list_sessions<T: Transport>(client: &ApiClient<T>) -> Result<Vec<SessionSummary>> {
    client.list_sessions().await.inspect_err(|e| {
        tracing::error!("failed to list sessions: {}", e);
    })
}

/// Delete a session; the store is reset if it was the active one.
pub async fn delete_session<T, S>(client: &ApiClient<T>, store: &S, session_id: &str) -> Result<()>
where
    T: Transport,
    S: StoreHandle,
{
    client.delete_session(session_id).await.inspect_err(|e| {
        tracing::error!(session_id = %session_id, "failed to delete session: {}", e);
    })?;

    if active_session_id(store) == session_id.trim() {
        store.update_store(SessionStore::reset);
    }
    Ok(())
}
