//! Session state machine.
//!
//! `SessionStore` is the single owner of the active session. It is plain data
//! so it can be driven from tests; `AppState` wraps it in a signal and only
//! exposes the operations defined here.

use crate::fetch::{FetchState, KeyedFetch};
use crate::types::{Analysis, ChatMessage, ClauseExplanation, SessionId, UploadedDocument};

/// Which page the coordinator shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    #[default]
    Upload,
    Analysis,
    Chat,
}

impl View {
    pub fn label(self) -> &'static str {
        match self {
            View::Upload => "Upload",
            View::Analysis => "Analysis",
            View::Chat => "Chat",
        }
    }

    pub fn requires_session(self) -> bool {
        !matches!(self, View::Upload)
    }
}

/// One uploaded document, its analysis and the conversation about it.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub id: SessionId,
    pub document_name: String,
    pub analysis: Analysis,
    pub history: Vec<ChatMessage>,
}

impl From<UploadedDocument> for Session {
    fn from(doc: UploadedDocument) -> Self {
        Self {
            id: doc.session_id,
            document_name: doc.document_name,
            analysis: doc.analysis,
            history: Vec::new(),
        }
    }
}

/// Identifies the session an async request was started for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket {
    session_id: SessionId,
    generation: u64,
}

impl Ticket {
    pub fn session_id(&self) -> &SessionId {
        &self.session_id
    }
}

/// An optimistic chat turn waiting for the assistant reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingTurn {
    ticket: Ticket,
    history_len: usize,
    content: String,
}

impl PendingTurn {
    pub fn session_id(&self) -> &SessionId {
        self.ticket.session_id()
    }

    pub fn content(&self) -> &str {
        &self.content
    }
}

/// An explanation request for one clause.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExplainTicket {
    ticket: Ticket,
    clause_id: String,
}

impl ExplainTicket {
    pub fn session_id(&self) -> &SessionId {
        self.ticket.session_id()
    }

    pub fn clause_id(&self) -> &str {
        &self.clause_id
    }
}

/// Why a chat turn could not start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnRefused {
    NoSession,
    Blank,
    Busy,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionStore {
    session: Option<Session>,
    view: View,
    generation: u64,
    turn_in_flight: bool,
    explanations: KeyedFetch<String, ClauseExplanation>,
    summary: FetchState<String>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn session_id(&self) -> Option<&SessionId> {
        self.session.as_ref().map(|s| &s.id)
    }

    pub fn history(&self) -> &[ChatMessage] {
        self.session
            .as_ref()
            .map(|s| s.history.as_slice())
            .unwrap_or_default()
    }

    pub fn view(&self) -> View {
        self.view
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_sending(&self) -> bool {
        self.turn_in_flight
    }

    pub fn explanations(&self) -> &KeyedFetch<String, ClauseExplanation> {
        &self.explanations
    }

    pub fn summary(&self) -> &FetchState<String> {
        &self.summary
    }

    /// Make `session` the active one and show its analysis.
    ///
    /// Any request still in flight for the previous session is orphaned by
    /// the generation bump.
    pub fn install(&mut self, session: Session) {
        self.generation += 1;
        self.turn_in_flight = false;
        self.explanations.clear();
        self.summary = match &session.analysis.summary {
            Some(summary) if !summary.trim().is_empty() => FetchState::Ready(summary.clone()),
            _ => FetchState::Absent,
        };
        self.session = Some(session);
        self.view = View::Analysis;
    }

    /// Drop the active session and go back to the upload page.
    pub fn reset(&mut self) {
        self.generation += 1;
        self.turn_in_flight = false;
        self.explanations.clear();
        self.summary = FetchState::Absent;
        self.session = None;
        self.view = View::Upload;
    }

    /// Switch pages. Analysis and chat need a session.
    pub fn set_view(&mut self, view: View) -> bool {
        if view.requires_session() && self.session.is_none() {
            return false;
        }
        self.view = view;
        true
    }

    fn ticket(&self) -> Option<Ticket> {
        self.session.as_ref().map(|s| Ticket {
            session_id: s.id.clone(),
            generation: self.generation,
        })
    }

    fn is_current(&self, ticket: &Ticket) -> bool {
        ticket.generation == self.generation
            && self.session_id() == Some(&ticket.session_id)
    }

    /// Append the user's message optimistically and hand back the turn.
    pub fn begin_turn(&mut self, content: &str) -> Result<PendingTurn, TurnRefused> {
        let content = content.trim();
        let ticket = self.ticket().ok_or(TurnRefused::NoSession)?;
        if content.is_empty() {
            return Err(TurnRefused::Blank);
        }
        if self.turn_in_flight {
            return Err(TurnRefused::Busy);
        }
        let Some(session) = self.session.as_mut() else {
            return Err(TurnRefused::NoSession);
        };

        let history_len = session.history.len();
        session.history.push(ChatMessage::user(content));
        self.turn_in_flight = true;

        Ok(PendingTurn {
            ticket,
            history_len,
            content: content.to_string(),
        })
    }

    /// Append the assistant reply for `turn`. Stale turns are dropped.
    pub fn complete_turn(&mut self, turn: &PendingTurn, reply: ChatMessage) -> bool {
        if !self.is_current(&turn.ticket) {
            return false;
        }
        self.turn_in_flight = false;
        match self.session.as_mut() {
            Some(session) => {
                session.history.push(reply);
                true
            }
            None => false,
        }
    }

    /// Roll the history back to what it was before `turn` started.
    pub fn fail_turn(&mut self, turn: &PendingTurn) -> bool {
        if !self.is_current(&turn.ticket) {
            return false;
        }
        self.turn_in_flight = false;
        match self.session.as_mut() {
            Some(session) => {
                session.history.truncate(turn.history_len);
                true
            }
            None => false,
        }
    }

    /// Empty the local conversation. Refused while a turn is outstanding.
    pub fn clear_history(&mut self) -> bool {
        if self.turn_in_flight {
            return false;
        }
        match self.session.as_mut() {
            Some(session) => {
                session.history.clear();
                true
            }
            None => false,
        }
    }

    /// Mark the clause explanation as pending if it needs fetching.
    ///
    /// Returns `None` for unknown clauses, cached explanations and fetches
    /// already in flight.
    pub fn begin_explanation(&mut self, clause_id: &str) -> Option<ExplainTicket> {
        let ticket = self.ticket()?;
        let known = self
            .session
            .as_ref()
            .is_some_and(|s| s.analysis.clause(clause_id).is_some());
        if !known {
            return None;
        }
        let key = clause_id.to_string();
        if !self.explanations.begin(&key) {
            return None;
        }
        Some(ExplainTicket {
            ticket,
            clause_id: key,
        })
    }

    pub fn settle_explanation<E: ToString>(
        &mut self,
        ticket: &ExplainTicket,
        result: Result<ClauseExplanation, E>,
    ) -> bool {
        if !self.is_current(&ticket.ticket) {
            return false;
        }
        self.explanations.settle(&ticket.clause_id, result)
    }

    /// Start a summary request unless one is already pending.
    pub fn begin_summary(&mut self) -> Option<Ticket> {
        let ticket = self.ticket()?;
        if !self.summary.begin() {
            return None;
        }
        Some(ticket)
    }

    /// Store the summary result; a success is also attached to the analysis.
    ///
    /// A failed refresh keeps showing the summary the analysis already has;
    /// the error is only reported to the caller.
    pub fn settle_summary<E: ToString>(&mut self, ticket: &Ticket, result: Result<String, E>) -> bool {
        if !self.is_current(ticket) {
            return false;
        }
        let previous = self
            .session
            .as_ref()
            .and_then(|s| s.analysis.summary.clone())
            .filter(|s| !s.trim().is_empty());
        match (result, previous) {
            (Ok(summary), _) => {
                self.attach_summary(summary.clone());
                self.summary.settle(Ok::<_, E>(summary))
            }
            (Err(_), Some(previous)) => self.summary.settle(Ok::<_, E>(previous)),
            (Err(err), None) => self.summary.settle(Err::<String, _>(err)),
        }
    }

    /// Record `summary` on the active analysis.
    pub fn attach_summary(&mut self, summary: String) {
        if let Some(session) = self.session.as_mut() {
            session.analysis.summary = Some(summary);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Clause, Role};
    use chrono::Utc;

    fn session(id: &str, clause_ids: &[&str]) -> Session {
        Session {
            id: SessionId::parse(id).unwrap(),
            document_name: "Lease.pdf".to_string(),
            analysis: Analysis {
                document_name: "Lease.pdf".to_string(),
                clauses: clause_ids
                    .iter()
                    .map(|cid| Clause {
                        id: cid.to_string(),
                        title: format!("Clause {cid}"),
                        text: "text".to_string(),
                        clause_type: "general".to_string(),
                        metadata: Default::default(),
                        start_page: 1,
                        end_page: 1,
                    })
                    .collect(),
                ..Default::default()
            },
            history: Vec::new(),
        }
    }

    fn explanation(clause_id: &str) -> ClauseExplanation {
        ClauseExplanation {
            clause_id: clause_id.to_string(),
            original_text: "text".to_string(),
            explanation: "It means...".to_string(),
            key_points: vec![],
            risks: vec![],
            plain_language: "Plainly".to_string(),
        }
    }

    #[test]
    fn starts_without_session_on_upload_view() {
        let mut store = SessionStore::new();
        assert!(store.session().is_none());
        assert_eq!(store.view(), View::Upload);
        assert!(!store.set_view(View::Chat));
        assert_eq!(store.view(), View::Upload);
    }

    #[test]
    fn install_moves_to_analysis() {
        let mut store = SessionStore::new();
        store.install(session("s1", &[]));
        assert_eq!(store.view(), View::Analysis);
        assert_eq!(store.session_id().map(SessionId::as_str), Some("s1"));
        assert!(store.set_view(View::Chat));
    }

    #[test]
    fn successful_turn_appends_user_then_assistant() {
        let mut store = SessionStore::new();
        store.install(session("s1", &[]));

        let turn = store.begin_turn("  What is the rent?  ").unwrap();
        assert_eq!(turn.content(), "What is the rent?");
        assert_eq!(store.history().len(), 1);
        assert!(store.is_sending());

        assert!(store.complete_turn(&turn, ChatMessage::assistant("$2,000", Utc::now())));
        let roles: Vec<Role> = store.history().iter().map(|m| m.role).collect();
        assert_eq!(roles, vec![Role::User, Role::Assistant]);
        assert!(!store.is_sending());
    }

    #[test]
    fn failed_turn_rolls_back_to_snapshot() {
        let mut store = SessionStore::new();
        store.install(session("s1", &[]));
        let first = store.begin_turn("one").unwrap();
        store.complete_turn(&first, ChatMessage::assistant("reply", Utc::now()));

        let turn = store.begin_turn("two").unwrap();
        assert_eq!(store.history().len(), 3);
        assert!(store.fail_turn(&turn));
        assert_eq!(store.history().len(), 2);
        assert_eq!(store.history()[0].content, "one");
        assert!(!store.is_sending());
    }

    #[test]
    fn turns_are_refused_when_busy_blank_or_sessionless() {
        let mut store = SessionStore::new();
        assert_eq!(store.begin_turn("hi"), Err(TurnRefused::NoSession));

        store.install(session("s1", &[]));
        assert_eq!(store.begin_turn("   "), Err(TurnRefused::Blank));

        let _turn = store.begin_turn("hi").unwrap();
        assert_eq!(store.begin_turn("again"), Err(TurnRefused::Busy));
        assert_eq!(store.history().len(), 1);
    }

    #[test]
    fn stale_turn_does_not_touch_new_session() {
        let mut store = SessionStore::new();
        store.install(session("s1", &[]));
        let turn = store.begin_turn("hello").unwrap();

        store.install(session("s2", &[]));
        assert!(!store.complete_turn(&turn, ChatMessage::assistant("late", Utc::now())));
        assert!(!store.fail_turn(&turn));
        assert!(store.history().is_empty());
    }

    #[test]
    fn reinstalling_same_session_id_still_orphans_old_turns() {
        let mut store = SessionStore::new();
        store.install(session("s1", &[]));
        let turn = store.begin_turn("hello").unwrap();
        store.install(session("s1", &[]));
        assert!(!store.complete_turn(&turn, ChatMessage::assistant("late", Utc::now())));
    }

    #[test]
    fn clear_history_empties_locally() {
        let mut store = SessionStore::new();
        store.install(session("s1", &[]));
        let turn = store.begin_turn("hello").unwrap();
        assert!(!store.clear_history());
        store.complete_turn(&turn, ChatMessage::assistant("hi", Utc::now()));
        assert!(store.clear_history());
        assert!(store.history().is_empty());
    }

    #[test]
    fn explanation_is_fetched_once_per_clause() {
        let mut store = SessionStore::new();
        store.install(session("s1", &["c1", "c2"]));

        let ticket = store.begin_explanation("c1").unwrap();
        assert!(store.begin_explanation("c1").is_none());
        assert!(store.begin_explanation("c2").is_some());
        assert!(store.begin_explanation("missing").is_none());

        assert!(store.settle_explanation::<String>(&ticket, Ok(explanation("c1"))));
        assert!(store.begin_explanation("c1").is_none());
        assert!(store.explanations().get(&"c1".to_string()).is_some());
    }

    #[test]
    fn failed_explanation_can_be_retried() {
        let mut store = SessionStore::new();
        store.install(session("s1", &["c1"]));
        let ticket = store.begin_explanation("c1").unwrap();
        store.settle_explanation(&ticket, Err("timeout"));
        assert!(!store.explanations().is_pending(&"c1".to_string()));
        assert!(store.begin_explanation("c1").is_some());
    }

    #[test]
    fn new_session_drops_explanation_cache() {
        let mut store = SessionStore::new();
        store.install(session("s1", &["c1"]));
        let ticket = store.begin_explanation("c1").unwrap();
        store.settle_explanation::<String>(&ticket, Ok(explanation("c1")));

        store.install(session("s2", &["c1"]));
        assert!(store.explanations().get(&"c1".to_string()).is_none());
        assert!(store.begin_explanation("c1").is_some());
    }

    #[test]
    fn summary_is_attached_to_analysis() {
        let mut store = SessionStore::new();
        store.install(session("s1", &[]));
        let ticket = store.begin_summary().unwrap();
        assert!(store.begin_summary().is_none());
        assert!(store.settle_summary::<String>(&ticket, Ok("Short lease.".into())));
        assert_eq!(
            store.session().and_then(|s| s.analysis.summary.as_deref()),
            Some("Short lease.")
        );
        assert!(store.begin_summary().is_some());
    }

    #[test]
    fn installed_summary_is_ready() {
        let mut store = SessionStore::new();
        let mut s = session("s1", &[]);
        s.analysis.summary = Some("Existing".into());
        store.install(s);
        assert_eq!(store.summary().ready().map(String::as_str), Some("Existing"));
    }

    #[test]
    fn failed_refresh_keeps_previous_summary() {
        let mut store = SessionStore::new();
        store.install(session("s1", &[]));
        let first = store.begin_summary().unwrap();
        store.settle_summary::<String>(&first, Ok("First summary.".into()));

        let second = store.begin_summary().unwrap();
        assert!(store.settle_summary(&second, Err("quota")));
        assert_eq!(store.summary(), &FetchState::Ready("First summary.".to_string()));
        assert_eq!(
            store.session().and_then(|s| s.analysis.summary.as_deref()),
            Some("First summary.")
        );
    }

    #[test]
    fn failed_first_summary_is_reported() {
        let mut store = SessionStore::new();
        store.install(session("s1", &[]));
        let ticket = store.begin_summary().unwrap();
        store.settle_summary(&ticket, Err("quota"));
        assert_eq!(store.summary().error(), Some("quota"));
    }

    #[test]
    fn stale_explanation_does_not_touch_new_session() {
        let mut store = SessionStore::new();
        store.install(session("s1", &["c1"]));
        let ticket = store.begin_explanation("c1").unwrap();

        store.install(session("s2", &["c1"]));
        let fresh = store.begin_explanation("c1").unwrap();
        assert!(!store.settle_explanation::<String>(&ticket, Ok(explanation("c1"))));
        assert!(store.explanations().is_pending(&"c1".to_string()));
        assert!(store.explanations().get(&"c1".to_string()).is_none());

        assert!(store.settle_explanation::<String>(&fresh, Ok(explanation("c1"))));
        assert!(store.explanations().get(&"c1".to_string()).is_some());
    }

    #[test]
    fn stale_summary_does_not_touch_new_session() {
        let mut store = SessionStore::new();
        store.install(session("s1", &[]));
        let ticket = store.begin_summary().unwrap();

        store.install(session("s2", &[]));
        assert!(!store.settle_summary::<String>(&ticket, Ok("Old document.".into())));
        assert_eq!(store.summary(), &FetchState::Absent);
        assert!(store.session().and_then(|s| s.analysis.summary.clone()).is_none());

        assert!(!store.settle_summary(&ticket, Err("late failure")));
        assert_eq!(store.summary(), &FetchState::Absent);
    }

    #[test]
    fn reset_returns_to_upload() {
        let mut store = SessionStore::new();
        store.install(session("s1", &[]));
        store.reset();
        assert!(store.session().is_none());
        assert_eq!(store.view(), View::Upload);
    }
}
