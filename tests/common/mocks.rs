//! Mock transport for testing.
//!
//! This module provides a scripted [`Transport`] that can be shared by the
//! integration tests without duplication.

#![allow(dead_code)]

use async_trait::async_trait;
use lexly_ui::api::{ApiClient, ApiRequest, RawResponse, Transport};
use lexly_ui::error::{ApiError, Result};
use lexly_ui::session::Session;
use lexly_ui::types::{Analysis, Clause, SessionId};
use serde_json::Value;
use std::cell::RefCell;
use std::collections::VecDeque;

pub const BASE_URL: &str = "http://localhost:8000";

/// Transport that replays queued responses and records every request.
///
/// Responses are handed out in the order they were queued. When the queue
/// runs dry the transport answers with a network error, so a test that
/// issues an unexpected request fails loudly instead of hanging.
///
/// # Examples
///
/// ```
/// use tests::common::mocks::MockTransport;
///
/// // A transport that answers the first request with a chat reply
/// let transport = MockTransport::new().with_json(200, json!({"response": "Hi"}));
///
/// // A transport that simulates the backend being down
/// let transport = MockTransport::new().with_error(ApiError::Network("refused".into()));
/// ```
#[derive(Default)]
pub struct MockTransport {
    responses: RefCell<VecDeque<Result<RawResponse>>>,
    requests: RefCell<Vec<(String, ApiRequest<Vec<u8>>)>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a response with a JSON body.
    pub fn with_json(self, status: u16, body: Value) -> Self {
        self.push(Ok(RawResponse::new(status, body.to_string())));
        self
    }

    /// Queue a response with a raw text body.
    pub fn with_text(self, status: u16, body: &str) -> Self {
        self.push(Ok(RawResponse::new(status, body)));
        self
    }

    /// Queue a transport failure.
    pub fn with_error(self, error: ApiError) -> Self {
        self.push(Err(error));
        self
    }

    pub fn push(&self, response: Result<RawResponse>) {
        self.responses.borrow_mut().push_back(response);
    }

    /// Number of requests that reached the transport.
    pub fn request_count(&self) -> usize {
        self.requests.borrow().len()
    }

    /// Recorded `(url, request)` pairs, oldest first.
    pub fn requests(&self) -> Vec<(String, ApiRequest<Vec<u8>>)> {
        self.requests.borrow().clone()
    }

    /// URL of the most recent request.
    pub fn last_url(&self) -> Option<String> {
        self.requests.borrow().last().map(|(url, _)| url.clone())
    }
}

#[async_trait(?Send)]
impl Transport for MockTransport {
    type Upload = Vec<u8>;

    async fn send(&self, url: &str, request: ApiRequest<Vec<u8>>) -> Result<RawResponse> {
        self.requests.borrow_mut().push((url.to_string(), request));
        self.responses
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Err(ApiError::Network("no response queued".to_string())))
    }
}

/// Client pointed at the default backend address.
pub fn client(transport: MockTransport) -> ApiClient<MockTransport> {
    ApiClient::with_transport(BASE_URL, transport)
}

pub fn clause(id: &str, title: &str) -> Clause {
    Clause {
        id: id.to_string(),
        title: title.to_string(),
        text: format!("{} text", title),
        clause_type: "termination".to_string(),
        metadata: Default::default(),
        start_page: 1,
        end_page: 1,
    }
}

/// Session with the given clauses and an empty conversation.
pub fn session(id: &str, clause_ids: &[&str]) -> Session {
    Session {
        id: SessionId::parse(id).unwrap(),
        document_name: "Lease.pdf".to_string(),
        analysis: Analysis {
            document_name: "Lease.pdf".to_string(),
            clauses: clause_ids.iter().map(|c| clause(c, c)).collect(),
            confidence_score: 0.9,
            ..Default::default()
        },
        history: Vec::new(),
    }
}

/// Analysis JSON as the backend sends it.
pub fn analysis_json(clause_ids: &[&str]) -> Value {
    let clauses: Vec<Value> = clause_ids
        .iter()
        .enumerate()
        .map(|(i, id)| {
            serde_json::json!({
                "id": id,
                "title": format!("Clause {}", i + 1),
                "text": "The tenant shall pay rent monthly.",
                "clause_type": "payment",
                "metadata": {},
                "start_page": 1,
                "end_page": 2
            })
        })
        .collect();

    serde_json::json!({
        "document_id": "doc-1",
        "document_name": "Lease.pdf",
        "metadata": {
            "document_type": "Lease Agreement",
            "parties": ["Acme Corp", "Jane Doe"],
            "dates": ["2024-01-01"],
            "contract_value": "$24,000",
            "jurisdiction": null,
            "governing_law": "California"
        },
        "clauses": clauses,
        "summary": null,
        "processing_timestamp": "2024-03-01T09:05:00",
        "confidence_score": 0.82
    })
}
