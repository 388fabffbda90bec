//! Chat transcript and session state for interactive shells.
//!
//! The transcript is an append-only log of [`ChatTurn`]s, kept in memory for the life of the
//! session. A [`ChatSession`] owns one transcript and one [`Analyzer`], and allows a single
//! outstanding submission at a time.

use crate::constants::APOLOGY_TEXT;
use crate::{ServiceResult, SymptomService};
use chrono::{DateTime, Utc};
use mediquery_types::{AnalysisResponse, SymptomAnalysis};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};
use tracing::warn;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// One message in the transcript. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub id: Uuid,
    pub role: Role,
    pub text: String,
    pub timestamp: DateTime<Utc>,
    /// Present on assistant turns that carry a successful analysis.
    pub analysis: Option<SymptomAnalysis>,
}

impl ChatTurn {
    pub fn user(text: impl Into<String>) -> Self {
        Self::new(Role::User, text.into(), None)
    }

    pub fn assistant(response: AnalysisResponse) -> Self {
        Self::new(
            Role::Assistant,
            response.human_readable,
            Some(response.analysis),
        )
    }

    /// Assistant turn shown when no analysis could be obtained.
    pub fn apology() -> Self {
        Self::new(Role::Assistant, APOLOGY_TEXT.to_string(), None)
    }

    fn new(role: Role, text: String, analysis: Option<SymptomAnalysis>) -> Self {
        Self {
            id: Uuid::new_v4(),
            role,
            text,
            timestamp: Utc::now(),
            analysis,
        }
    }
}

/// An analysis together with the symptom text it answered.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportSource {
    pub analysis: SymptomAnalysis,
    pub symptoms: String,
}

/// Append-only, insertion-ordered log of turns.
#[derive(Debug, Default)]
pub struct Transcript {
    turns: Mutex<Vec<ChatTurn>>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&self, turn: ChatTurn) {
        self.lock().push(turn);
    }

    /// Copy of every turn so far, in insertion order.
    pub fn snapshot(&self) -> Vec<ChatTurn> {
        self.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// The analysis on the given assistant turn and the nearest user turn before it.
    ///
    /// Returns `None` if the turn is unknown, has no analysis, or has no preceding user turn.
    pub fn report_source(&self, turn_id: Uuid) -> Option<ReportSource> {
        let turns = self.lock();
        let index = turns.iter().position(|t| t.id == turn_id)?;
        source_at(&turns, index)
    }

    /// Report source for the most recent assistant turn that carries an analysis.
    pub fn latest_report_source(&self) -> Option<ReportSource> {
        let turns = self.lock();
        let index = turns.iter().rposition(|t| t.analysis.is_some())?;
        source_at(&turns, index)
    }

    fn lock(&self) -> MutexGuard<'_, Vec<ChatTurn>> {
        // A poisoned lock only means a panic elsewhere; the vector itself is still consistent.
        self.turns.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

fn source_at(turns: &[ChatTurn], index: usize) -> Option<ReportSource> {
    let analysis = turns.get(index)?.analysis.clone()?;
    let symptoms = turns[..index]
        .iter()
        .rev()
        .find(|t| t.role == Role::User)?
        .text
        .clone();
    Some(ReportSource { analysis, symptoms })
}

/// Anything that can turn symptom text into an analysis: the in-process service, or a remote
/// MediQuery server.
#[async_trait::async_trait]
pub trait Analyzer: Send + Sync {
    async fn analyze(&self, symptoms: &str) -> ServiceResult<AnalysisResponse>;
}

#[async_trait::async_trait]
impl Analyzer for SymptomService {
    async fn analyze(&self, symptoms: &str) -> ServiceResult<AnalysisResponse> {
        SymptomService::analyze(self, symptoms).await
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("symptom description is empty")]
    EmptyInput,
    #[error("an analysis is already in progress")]
    Busy,
}

/// A chat session: one transcript, one analyzer, one submission in flight at most.
pub struct ChatSession<A> {
    analyzer: A,
    transcript: Transcript,
    in_flight: AtomicBool,
}

impl<A: Analyzer> ChatSession<A> {
    pub fn new(analyzer: A) -> Self {
        Self {
            analyzer,
            transcript: Transcript::new(),
            in_flight: AtomicBool::new(false),
        }
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// Submit one symptom description.
    ///
    /// Appends the user turn immediately, then the assistant turn once the analyzer settles. A
    /// failed analysis produces an apology turn rather than an error. Returns the assistant turn.
    ///
    /// # Errors
    ///
    /// - `SessionError::EmptyInput` for blank input; nothing is appended
    /// - `SessionError::Busy` while another submission is outstanding; nothing is appended
    pub async fn submit(&self, input: &str) -> Result<ChatTurn, SessionError> {
        let symptoms = input.trim();
        if symptoms.is_empty() {
            return Err(SessionError::EmptyInput);
        }
        let _guard = InFlightGuard::acquire(&self.in_flight).ok_or(SessionError::Busy)?;

        self.transcript.append(ChatTurn::user(symptoms));

        let reply = match self.analyzer.analyze(symptoms).await {
            Ok(response) => ChatTurn::assistant(response),
            Err(e) => {
                warn!("Analysis failed: {}", e);
                ChatTurn::apology()
            }
        };
        self.transcript.append(reply.clone());
        Ok(reply)
    }
}

/// Clears the in-flight flag when the submission finishes, including on early return.
struct InFlightGuard<'a>(&'a AtomicBool);

impl<'a> InFlightGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}
