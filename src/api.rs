//! API client for communicating with the Lexly backend
//!
//! Every operation builds one [`ApiRequest`], hands it to a [`Transport`] and
//! normalizes the [`RawResponse`]. Session-scoped operations validate their
//! ids before anything reaches the transport.

use async_trait::async_trait;
use chrono::Utc;
use gloo_net::http::Request;
use serde::de::DeserializeOwned;

use crate::error::{ApiError, Result};
use crate::session::Session;
use crate::types::*;

/// HTTP method used by the backend contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Delete,
}

/// Request payload.
#[derive(Debug, Clone, PartialEq)]
pub enum Body<U> {
    Empty,
    Json(serde_json::Value),
    /// Multipart form with a single file field.
    File {
        field: &'static str,
        file_name: String,
        file: U,
    },
}

/// A transport-neutral request.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest<U> {
    pub method: Method,
    pub path: String,
    pub body: Body<U>,
}

impl<U> ApiRequest<U> {
    fn new(method: Method, path: String) -> Self {
        Self {
            method,
            path,
            body: Body::Empty,
        }
    }

    fn with_body(mut self, body: Body<U>) -> Self {
        self.body = body;
        self
    }
}

/// Status and body text of a completed request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Sends requests over the wire.
#[async_trait(?Send)]
pub trait Transport {
    /// File handle accepted for uploads.
    type Upload;

    async fn send(&self, url: &str, request: ApiRequest<Self::Upload>) -> Result<RawResponse>;
}

/// Browser transport backed by `fetch` through gloo-net.
#[derive(Debug, Clone, Copy, Default)]
pub struct GlooTransport;

#[async_trait(?Send)]
impl Transport for GlooTransport {
    type Upload = web_sys::File;

    async fn send(&self, url: &str, request: ApiRequest<web_sys::File>) -> Result<RawResponse> {
        let builder = match request.method {
            Method::Get => Request::get(url),
            Method::Post => Request::post(url),
            Method::Delete => Request::delete(url),
        };

        let req = match request.body {
            Body::Empty => builder.build(),
            Body::Json(value) => builder.json(&value),
            Body::File {
                field,
                file_name,
                file,
            } => {
                let form = web_sys::FormData::new()
                    .map_err(|e| ApiError::Network(format!("Failed to build form: {:?}", e)))?;
                form.append_with_blob_and_filename(field, &file, &file_name)
                    .map_err(|e| ApiError::Network(format!("Failed to attach file: {:?}", e)))?;
                builder.body(form)
            }
        }
        .map_err(|e| ApiError::Network(format!("Failed to build request: {}", e)))?;

        let resp = req
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|e| ApiError::Network(format!("Failed to read response: {}", e)))?;

        Ok(RawResponse { status, body })
    }
}

/// Whether the backend accepts this file name.
pub fn is_supported_document(file_name: &str) -> bool {
    let lower = file_name.to_ascii_lowercase();
    lower.ends_with(".pdf") || lower.ends_with(".docx")
}

/// Typed client for the backend REST API.
#[derive(Debug, Clone)]
pub struct ApiClient<T = GlooTransport> {
    base_url: String,
    transport: T,
}

impl ApiClient<GlooTransport> {
    pub fn new(base_url: &str) -> Self {
        Self::with_transport(base_url, GlooTransport)
    }
}

impl<T: Transport> ApiClient<T> {
    pub fn with_transport(base_url: &str, transport: T) -> Self {
        Self {
            base_url: base_url.trim().trim_end_matches('/').to_string(),
            transport,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    async fn dispatch(&self, request: ApiRequest<T::Upload>) -> Result<RawResponse> {
        let url = format!("{}{}", self.base_url, request.path);
        tracing::debug!(method = ?request.method, path = %request.path, "dispatching request");
        self.transport.send(&url, request).await
    }

    /// Upload a PDF or DOCX document for analysis
    pub async fn upload_document(&self, file_name: &str, file: T::Upload) -> Result<UploadedDocument> {
        if !is_supported_document(file_name) {
            return Err(ApiError::UnsupportedFile(file_name.to_string()));
        }

        let request = ApiRequest::new(Method::Post, "/upload".to_string()).with_body(Body::File {
            field: "file",
            file_name: file_name.to_string(),
            file,
        });
        let resp: UploadResponse = decode(self.dispatch(request).await?)?;

        let session_id = resp
            .session_id
            .as_deref()
            .and_then(|id| SessionId::parse(id).ok())
            .ok_or_else(|| ApiError::InvalidResponse("missing session id".to_string()))?;
        let analysis = resp
            .analysis
            .ok_or_else(|| ApiError::InvalidResponse("missing analysis".to_string()))?
            .normalized()?;
        let document_name = resp
            .document_name
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| file_name.to_string());

        Ok(UploadedDocument {
            session_id,
            document_name,
            analysis,
            message: resp.message.unwrap_or_default(),
        })
    }

    /// Get a plain language explanation for a clause
    pub async fn explain_clause(&self, session_id: &str, clause_id: &str) -> Result<ClauseExplanation> {
        let session_id = SessionId::parse(session_id)?;
        if clause_id.trim().is_empty() {
            return Err(ApiError::MissingClause);
        }
        let path = format!(
            "/explain/{}/{}",
            segment(session_id.as_str()),
            segment(clause_id)
        );
        decode(self.dispatch(ApiRequest::new(Method::Post, path)).await?)
    }

    /// Summarize the whole document
    pub async fn summarize_document(&self, session_id: &str) -> Result<String> {
        let session_id = SessionId::parse(session_id)?;
        let path = format!("/summarize/{}", segment(session_id.as_str()));
        let resp: SummaryResponse = decode(self.dispatch(ApiRequest::new(Method::Post, path)).await?)?;
        Ok(resp.summary)
    }

    /// Send a chat message and return the assistant reply
    pub async fn send_chat(&self, session_id: &str, content: &str) -> Result<ChatMessage> {
        let session_id = SessionId::parse(session_id)?;
        let path = format!("/chat/{}", segment(session_id.as_str()));
        let body = serde_json::to_value(ChatRequest { content })
            .map_err(|e| ApiError::InvalidResponse(format!("Failed to serialize request: {}", e)))?;

        let raw = self
            .dispatch(ApiRequest::new(Method::Post, path).with_body(Body::Json(body)))
            .await?;
        if raw.status == 404 {
            return Err(ApiError::SessionNotFound);
        }

        let resp: ChatResponse = decode(raw)?;
        Ok(ChatMessage::assistant(
            resp.response,
            resp.timestamp.unwrap_or_else(Utc::now),
        ))
    }

    /// Load a stored session with its conversation history
    pub async fn get_session(&self, session_id: &str) -> Result<Session> {
        let id = SessionId::parse(session_id)?;
        let path = format!("/sessions/{}", segment(id.as_str()));
        let envelope: SessionEnvelope = decode(self.dispatch(ApiRequest::new(Method::Get, path)).await?)?;

        if envelope.session_id != id.as_str() {
            return Err(ApiError::InvalidResponse(format!(
                "expected session '{}', got '{}'",
                id, envelope.session_id
            )));
        }

        let analysis = envelope.data.analysis.normalized()?;
        let document_name = if analysis.document_name.is_empty() {
            "Unknown".to_string()
        } else {
            analysis.document_name.clone()
        };

        Ok(Session {
            id,
            document_name,
            analysis,
            history: envelope
                .data
                .conversation_history
                .into_iter()
                .map(ChatMessage::from)
                .collect(),
        })
    }

    /// List sessions known to the backend
    pub async fn list_sessions(&self) -> Result<Vec<SessionSummary>> {
        let resp: SessionsListResponse = decode(
            self.dispatch(ApiRequest::new(Method::Get, "/sessions".to_string()))
                .await?,
        )?;
        Ok(resp.sessions)
    }

    /// Delete a session on the backend
    pub async fn delete_session(&self, session_id: &str) -> Result<String> {
        let session_id = SessionId::parse(session_id)?;
        let path = format!("/sessions/{}", segment(session_id.as_str()));
        let resp: MessageResponse = decode(self.dispatch(ApiRequest::new(Method::Delete, path)).await?)?;
        Ok(resp.message)
    }

    /// Health probe
    pub async fn health(&self) -> Result<HealthStatus> {
        decode(self.dispatch(ApiRequest::new(Method::Get, "/".to_string())).await?)
    }
}

fn segment(raw: &str) -> String {
    urlencoding::encode(raw).into_owned()
}

/// Map error statuses and deserialize success bodies.
fn decode<R: DeserializeOwned>(resp: RawResponse) -> Result<R> {
    if !resp.is_success() {
        let message = serde_json::from_str::<ErrorBody>(&resp.body)
            .ok()
            .and_then(ErrorBody::into_message)
            .unwrap_or_else(|| format!("Request failed with status {}", resp.status));
        return Err(ApiError::Http {
            status: resp.status,
            message,
        });
    }

    serde_json::from_str(&resp.body)
        .map_err(|e| ApiError::InvalidResponse(format!("Failed to parse response: {}", e)))
}
