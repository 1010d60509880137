//! API types matching the Lexly backend

use std::collections::HashSet;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;

/// Opaque backend session identifier, never empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SessionId(String);

impl SessionId {
    /// Validate a raw id. Blank ids are rejected with `ApiError::MissingSession`.
    pub fn parse(raw: &str) -> Result<Self, ApiError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ApiError::MissingSession);
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for SessionId {
    type Error = ApiError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<SessionId> for String {
    fn from(id: SessionId) -> Self {
        id.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Metadata extracted from the document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    #[serde(default)]
    pub document_type: String,
    #[serde(default)]
    pub parties: Vec<String>,
    #[serde(default)]
    pub dates: Vec<String>,
    #[serde(default)]
    pub contract_value: Option<String>,
    #[serde(default)]
    pub jurisdiction: Option<String>,
    #[serde(default)]
    pub governing_law: Option<String>,
}

/// A delimited excerpt of the document with a type classification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Clause {
    pub id: String,
    pub title: String,
    pub text: String,
    pub clause_type: String,
    #[serde(default)]
    pub metadata: serde_json::Map<String, serde_json::Value>,
    #[serde(default)]
    pub start_page: u32,
    #[serde(default)]
    pub end_page: u32,
}

impl Clause {
    /// Human readable page span, e.g. "Page 2" or "Pages 2-4".
    pub fn page_span(&self) -> String {
        if self.end_page <= self.start_page {
            format!("Page {}", self.start_page)
        } else {
            format!("Pages {}-{}", self.start_page, self.end_page)
        }
    }

    /// Clause type with underscores turned into spaces.
    pub fn type_label(&self) -> String {
        self.clause_type.replace('_', " ")
    }
}

/// Complete analysis of a legal document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Analysis {
    #[serde(default)]
    pub document_id: String,
    #[serde(default)]
    pub document_name: String,
    #[serde(default)]
    pub metadata: DocumentMetadata,
    #[serde(default)]
    pub clauses: Vec<Clause>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default, with = "timestamp::optional")]
    pub processing_timestamp: Option<DateTime<Utc>>,
    #[serde(default)]
    pub confidence_score: f64,
}

impl Analysis {
    /// Clamp the confidence score and check clause id uniqueness.
    pub fn normalized(mut self) -> Result<Self, ApiError> {
        self.confidence_score = if self.confidence_score.is_nan() {
            0.0
        } else {
            self.confidence_score.clamp(0.0, 1.0)
        };

        let mut seen = HashSet::with_capacity(self.clauses.len());
        for clause in &self.clauses {
            if !seen.insert(clause.id.as_str()) {
                return Err(ApiError::InvalidResponse(format!(
                    "duplicate clause id '{}'",
                    clause.id
                )));
            }
        }
        Ok(self)
    }

    pub fn clause(&self, id: &str) -> Option<&Clause> {
        self.clauses.iter().find(|c| c.id == id)
    }

    /// Confidence as a whole percentage.
    pub fn confidence_percent(&self) -> u8 {
        (self.confidence_score * 100.0).round() as u8
    }
}

/// AI-generated explanation of a clause
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClauseExplanation {
    pub clause_id: String,
    #[serde(default)]
    pub original_text: String,
    pub explanation: String,
    #[serde(default)]
    pub key_points: Vec<String>,
    #[serde(default)]
    pub risks: Vec<String>,
    #[serde(default)]
    pub plain_language: String,
}

/// Message role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// Message in a conversation
#[derive(Debug, Clone, PartialEq)]
pub struct ChatMessage {
    /// Local id used for keyed rendering; never sent to the backend.
    pub id: String,
    pub role: Role,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content.into(), Utc::now())
    }

    pub fn assistant(content: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self::new(Role::Assistant, content.into(), timestamp)
    }

    fn new(role: Role, content: String, timestamp: DateTime<Utc>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            role,
            content,
            timestamp,
        }
    }
}

/// Session entry shown in the sessions list
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SessionSummary {
    pub session_id: String,
    #[serde(default = "unknown_document")]
    pub document_name: String,
    #[serde(default, with = "timestamp::optional")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, with = "timestamp::optional")]
    pub last_accessed: Option<DateTime<Utc>>,
    #[serde(default)]
    pub message_count: usize,
    #[serde(default)]
    pub clauses_count: Option<usize>,
}

fn unknown_document() -> String {
    "Unknown".to_string()
}

/// Response of the health probe
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct HealthStatus {
    pub message: String,
    #[serde(default)]
    pub version: String,
}

/// A freshly uploaded and analysed document
#[derive(Debug, Clone, PartialEq)]
pub struct UploadedDocument {
    pub session_id: SessionId,
    pub document_name: String,
    pub analysis: Analysis,
    pub message: String,
}

// ============= Wire-only types =============

/// Chat request
#[derive(Debug, Clone, Serialize)]
pub(crate) struct ChatRequest<'a> {
    pub content: &'a str,
}

/// Upload response; every field optional so shape problems can be reported.
#[derive(Debug, Deserialize)]
pub(crate) struct UploadResponse {
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub document_name: Option<String>,
    #[serde(default)]
    pub analysis: Option<Analysis>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChatResponse {
    pub response: String,
    #[serde(default, with = "timestamp::optional")]
    pub timestamp: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SummaryResponse {
    pub summary: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SessionEnvelope {
    pub session_id: String,
    pub data: SessionData,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SessionData {
    pub analysis: Analysis,
    #[serde(default)]
    pub conversation_history: Vec<ConversationEntry>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ConversationEntry {
    pub role: Role,
    pub content: String,
    #[serde(default, with = "timestamp::optional")]
    pub timestamp: Option<DateTime<Utc>>,
}

impl From<ConversationEntry> for ChatMessage {
    fn from(entry: ConversationEntry) -> Self {
        ChatMessage::new(
            entry.role,
            entry.content,
            entry.timestamp.unwrap_or_else(Utc::now),
        )
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct SessionsListResponse {
    #[serde(default)]
    pub sessions: Vec<SessionSummary>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct MessageResponse {
    #[serde(default)]
    pub message: String,
}

/// Error body; FastAPI uses `detail`, which may be a string or a list.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub detail: Option<serde_json::Value>,
    #[serde(default)]
    pub error: Option<String>,
}

impl ErrorBody {
    pub fn into_message(self) -> Option<String> {
        match self.detail {
            Some(serde_json::Value::String(s)) if !s.is_empty() => Some(s),
            Some(serde_json::Value::Null) | None => self.error.filter(|e| !e.is_empty()),
            Some(other) => Some(other.to_string()),
        }
    }
}

/// Backend timestamps are ISO-8601, with or without an offset.
pub mod timestamp {
    use chrono::{DateTime, NaiveDateTime, Utc};

    /// Parse RFC 3339, falling back to a naive timestamp taken as UTC.
    pub fn parse(raw: &str) -> Option<DateTime<Utc>> {
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Some(dt.with_timezone(&Utc));
        }
        raw.parse::<NaiveDateTime>().ok().map(|n| n.and_utc())
    }

    pub mod optional {
        use chrono::{DateTime, Utc};
        use serde::{Deserialize, Deserializer, Serializer};

        pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
        where
            D: Deserializer<'de>,
        {
            let raw: Option<String> = Option::deserialize(deserializer)?;
            Ok(raw.as_deref().and_then(super::parse))
        }

        pub fn serialize<S>(value: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
        where
            S: Serializer,
        {
            match value {
                Some(dt) => serializer.serialize_some(&dt.to_rfc3339()),
                None => serializer.serialize_none(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};
    use serde_json::json;

    fn clause(id: &str) -> Clause {
        Clause {
            id: id.to_string(),
            title: "Termination".to_string(),
            text: "Either party may terminate.".to_string(),
            clause_type: "termination_clause".to_string(),
            metadata: Default::default(),
            start_page: 2,
            end_page: 2,
        }
    }

    #[test]
    fn session_id_rejects_blank() {
        assert_eq!(SessionId::parse(""), Err(ApiError::MissingSession));
        assert_eq!(SessionId::parse("   "), Err(ApiError::MissingSession));
        assert_eq!(SessionId::parse(" s1 ").unwrap().as_str(), "s1");
    }

    #[test]
    fn naive_timestamps_are_utc() {
        let dt = timestamp::parse("2024-03-01T10:15:30.123456").unwrap();
        assert_eq!((dt.year(), dt.month(), dt.day()), (2024, 3, 1));
        assert_eq!((dt.hour(), dt.minute(), dt.second()), (10, 15, 30));

        let offset = timestamp::parse("2024-03-01T12:15:30+02:00").unwrap();
        assert_eq!(offset.hour(), 10);

        assert!(timestamp::parse("yesterday").is_none());
    }

    #[test]
    fn analysis_parses_backend_payload() {
        let analysis: Analysis = serde_json::from_value(json!({
            "document_id": "d1",
            "document_name": "Lease.pdf",
            "metadata": {
                "document_type": "Lease Agreement",
                "parties": ["Landlord LLC", "Tenant Inc"],
                "dates": ["2024-01-01"],
                "contract_value": "$24,000",
                "jurisdiction": null
            },
            "clauses": [{
                "id": "clause_1",
                "title": "Rent",
                "text": "Tenant shall pay rent monthly.",
                "clause_type": "payment",
                "metadata": {"confidence": 0.9},
                "start_page": 1,
                "end_page": 3
            }],
            "summary": null,
            "processing_timestamp": "2024-03-01T10:15:30",
            "confidence_score": 0.87
        }))
        .unwrap();

        assert_eq!(analysis.metadata.parties.len(), 2);
        assert_eq!(analysis.clauses[0].page_span(), "Pages 1-3");
        assert!(analysis.processing_timestamp.is_some());
        assert_eq!(analysis.confidence_percent(), 87);
    }

    #[test]
    fn normalized_clamps_confidence() {
        let analysis = Analysis {
            confidence_score: 1.7,
            ..Default::default()
        };
        assert_eq!(analysis.normalized().unwrap().confidence_score, 1.0);

        let analysis = Analysis {
            confidence_score: f64::NAN,
            ..Default::default()
        };
        assert_eq!(analysis.normalized().unwrap().confidence_score, 0.0);
    }

    #[test]
    fn normalized_rejects_duplicate_clause_ids() {
        let analysis = Analysis {
            clauses: vec![clause("c1"), clause("c2"), clause("c1")],
            ..Default::default()
        };
        let err = analysis.normalized().unwrap_err();
        assert!(matches!(err, ApiError::InvalidResponse(msg) if msg.contains("c1")));
    }

    #[test]
    fn single_page_span() {
        assert_eq!(clause("c1").page_span(), "Page 2");
        assert_eq!(clause("c1").type_label(), "termination clause");
    }

    #[test]
    fn error_body_prefers_detail() {
        let body: ErrorBody = serde_json::from_value(json!({"detail": "Session not found"})).unwrap();
        assert_eq!(body.into_message().as_deref(), Some("Session not found"));

        let body: ErrorBody = serde_json::from_value(json!({"error": "bad"})).unwrap();
        assert_eq!(body.into_message().as_deref(), Some("bad"));

        let body: ErrorBody =
            serde_json::from_value(json!({"detail": [{"msg": "field required"}]})).unwrap();
        assert!(body.into_message().unwrap().contains("field required"));
    }

    #[test]
    fn session_summary_tolerates_missing_fields() {
        let summary: SessionSummary = serde_json::from_value(json!({
            "session_id": "s1",
            "created_at": "2024-03-01T10:15:30",
            "last_accessed": null,
            "message_count": 4
        }))
        .unwrap();
        assert_eq!(summary.document_name, "Unknown");
        assert_eq!(summary.clauses_count, None);
        assert!(summary.created_at.is_some());
        assert!(summary.last_accessed.is_none());
    }
}
