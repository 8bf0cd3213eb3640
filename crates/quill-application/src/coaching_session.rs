//! Coaching session use case.
//!
//! Drives a [`LearnerSession`] from an interactive front end: draft edits,
//! delayed structural analysis, and coaching turns against an external
//! responder. The session lock is only held for the synchronous halves of
//! each operation, never across a delay or a responder call.

use std::sync::Arc;
use std::time::Duration;

use quill_core::analysis::{self, AnalysisResult};
use quill_core::config::CoachSettings;
use quill_core::responder::{CoachingRequest, CoachingResponder, ResponderError};
use quill_core::session::{FailureKind, LearnerSession, SessionSnapshot, TurnOutcome};
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;

/// Outcome of [`CoachingSession::analyze`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisReport {
    pub result: AnalysisResult,
    /// Mastery after the result was applied.
    pub mastery: u8,
}

/// Outcome of [`CoachingSession::send_message`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendOutcome {
    /// Blank input, or another reply is still pending. Nothing changed.
    Dropped,
    /// The coach replied; mastery was credited.
    Replied { reply: String, mastery: u8 },
    /// The responder failed; a system notice was appended.
    Failed { kind: FailureKind, notice: String },
}

/// Shared handle to one learner's coaching session.
///
/// Cloning is cheap and every clone drives the same session.
#[derive(Clone)]
pub struct CoachingSession {
    session: Arc<Mutex<LearnerSession>>,
    responder: Arc<dyn CoachingResponder>,
    settings: CoachSettings,
}

impl CoachingSession {
    pub fn new(
        session: LearnerSession,
        responder: Arc<dyn CoachingResponder>,
        settings: CoachSettings,
    ) -> Self {
        tracing::info!(
            session_id = %session.id(),
            model = %settings.model,
            "[CoachingSession] Session started"
        );
        Self {
            session: Arc::new(Mutex::new(session)),
            responder,
            settings,
        }
    }

    pub fn settings(&self) -> &CoachSettings {
        &self.settings
    }

    pub async fn snapshot(&self) -> SessionSnapshot {
        self.session.lock().await.snapshot()
    }

    // ============================================================================
    // Draft editing
    // ============================================================================

    pub async fn update_draft(&self, text: impl Into<String>) {
        let mut session = self.session.lock().await;
        session.edit_draft(text);
        tracing::debug!(chars = session.draft().chars().count(), "[CoachingSession] Draft replaced");
    }

    pub async fn append_draft(&self, line: &str) {
        let mut session = self.session.lock().await;
        session.append_to_draft(line);
        tracing::debug!(chars = session.draft().chars().count(), "[CoachingSession] Draft appended");
    }

    pub async fn clear_draft(&self) {
        self.session.lock().await.clear_draft();
        tracing::debug!("[CoachingSession] Draft cleared");
    }

    // ============================================================================
    // Structural analysis
    // ============================================================================

    /// Analyzes the draft as it is right now.
    ///
    /// The draft is captured immediately; the result is applied after the
    /// configured analysis delay. Returns `None` if `cancel` fires first, in
    /// which case nothing changes.
    pub async fn analyze(&self, cancel: CancellationToken) -> Option<AnalysisReport> {
        let draft = self.session.lock().await.draft().to_string();
        tracing::info!(
            chars = draft.chars().count(),
            "[CoachingSession] Structure analysis requested"
        );

        if !pause(self.settings.analysis_delay(), &cancel).await {
            tracing::debug!("[CoachingSession] Structure analysis cancelled");
            return None;
        }

        let result = analysis::analyze(&draft);
        let mastery = self.session.lock().await.apply_analysis(result.clone());
        tracing::info!(
            verdict = result.verdict.summary(),
            delta = result.mastery_delta,
            mastery,
            "[CoachingSession] Structure analysis applied"
        );

        Some(AnalysisReport { result, mastery })
    }

    // ============================================================================
    // Coaching dialogue
    // ============================================================================

    /// Sends a learner message to the coach.
    ///
    /// Only one message can be in flight: while a reply is pending further
    /// sends are dropped. A responder call that outlives the configured
    /// timeout, or is cancelled through `cancel`, ends as a transient failure
    /// so the conversation always returns to idle.
    pub async fn send_message(&self, text: &str, cancel: CancellationToken) -> SendOutcome {
        let request = self.session.lock().await.begin_chat(text);
        let Some(request) = request else {
            tracing::debug!("[CoachingSession] Message dropped (blank or reply pending)");
            return SendOutcome::Dropped;
        };
        tracing::info!(
            chars = request.message.chars().count(),
            history = request.history.len(),
            "[CoachingSession] Chat message sent"
        );

        let result = if pause(self.settings.reply_delay(), &cancel).await {
            self.call_responder(&request, &cancel).await
        } else {
            Err(ResponderError::transient("Request cancelled"))
        };

        if let Err(err) = &result {
            tracing::warn!(error = %err, "[CoachingSession] Coaching responder failed");
        }

        let mut session = self.session.lock().await;
        match session.finish_chat(result) {
            TurnOutcome::Replied => {
                let reply = last_message_content(&session);
                let mastery = session.mastery().mastery;
                tracing::info!(mastery, "[CoachingSession] Coaching reply received");
                SendOutcome::Replied { reply, mastery }
            }
            TurnOutcome::Failed(kind) => SendOutcome::Failed {
                kind,
                notice: last_message_content(&session),
            },
            TurnOutcome::Stale => {
                tracing::debug!("[CoachingSession] Completion arrived with no open turn");
                SendOutcome::Dropped
            }
        }
    }

    async fn call_responder(
        &self,
        request: &CoachingRequest,
        cancel: &CancellationToken,
    ) -> Result<String, ResponderError> {
        let call = self.responder.respond(request);
        let timeout = self.settings.request_timeout();

        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(ResponderError::transient("Request cancelled")),
            outcome = tokio::time::timeout(timeout, call) => match outcome {
                Ok(result) => result,
                Err(_) => Err(ResponderError::transient(format!(
                    "No reply within {}s",
                    timeout.as_secs()
                ))),
            },
        }
    }
}

/// Waits for `delay` unless `cancel` fires first. Returns `true` when the
/// full delay elapsed.
async fn pause(delay: Duration, cancel: &CancellationToken) -> bool {
    if delay.is_zero() {
        return !cancel.is_cancelled();
    }
    tokio::select! {
        biased;
        _ = cancel.cancelled() => false,
        _ = tokio::time::sleep(delay) => true,
    }
}

fn last_message_content(session: &LearnerSession) -> String {
    session
        .conversation()
        .messages()
        .last()
        .map(|m| m.content.clone())
        .unwrap_or_default()
}
