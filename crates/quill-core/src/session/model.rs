//! Learner session domain model.
//!
//! A `LearnerSession` is the explicit context every coaching operation works
//! on: the draft, the mastery model, the conversation and the latest
//! analysis. Nothing lives in globals; callers own the session and pass it
//! around (or wrap it in a lock) as they see fit.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::conversation::{Conversation, ConversationStatus, TurnOutcome};
use super::message::{ChatMessage, MessageTag};
use crate::analysis::{self, AnalysisResult};
use crate::mastery::{MasteryModel, MasteryState};
use crate::responder::{CoachingRequest, ResponderError};
use crate::task::{GREETING, WritingTask};

#[derive(Debug, Clone)]
pub struct LearnerSession {
    id: String,
    created_at: DateTime<Utc>,
    task: WritingTask,
    draft: String,
    mastery: MasteryModel,
    conversation: Conversation,
    latest_analysis: Option<AnalysisResult>,
}

/// Read-only view of a session, for rendering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub task: WritingTask,
    pub draft: String,
    pub mastery: MasteryState,
    pub messages: Vec<ChatMessage>,
    pub status: ConversationStatus,
    pub latest_analysis: Option<AnalysisResult>,
}

impl Default for LearnerSession {
    fn default() -> Self {
        Self::new(WritingTask::default())
    }
}

impl LearnerSession {
    /// Starts a session for `task` with the coach's greeting in the history.
    pub fn new(task: WritingTask) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            created_at: Utc::now(),
            task,
            draft: String::new(),
            mastery: MasteryModel::new(),
            conversation: Conversation::with_greeting(ChatMessage::agent(
                GREETING,
                MessageTag::Encouragement,
            )),
            latest_analysis: None,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn task(&self) -> &WritingTask {
        &self.task
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn mastery(&self) -> MasteryState {
        self.mastery.state()
    }

    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    pub fn latest_analysis(&self) -> Option<&AnalysisResult> {
        self.latest_analysis.as_ref()
    }

    // ============================================================================
    // Draft editing
    // ============================================================================

    /// Replaces the draft. Any edit marks the learner as engaged.
    pub fn edit_draft(&mut self, text: impl Into<String>) {
        self.draft = text.into();
        self.mastery.mark_engagement_active();
    }

    /// Appends a line to the draft.
    pub fn append_to_draft(&mut self, line: &str) {
        if !self.draft.is_empty() {
            self.draft.push('\n');
        }
        self.draft.push_str(line);
        self.mastery.mark_engagement_active();
    }

    pub fn clear_draft(&mut self) {
        self.edit_draft(String::new());
    }

    // ============================================================================
    // Structural analysis
    // ============================================================================

    /// Analyzes the current draft and applies the result.
    pub fn analyze(&mut self) -> AnalysisResult {
        let result = analysis::analyze(&self.draft);
        self.apply_analysis(result.clone());
        result
    }

    /// Applies a result computed elsewhere (e.g. from an earlier snapshot of
    /// the draft) and keeps it as the latest analysis.
    ///
    /// Returns the mastery after the update.
    pub fn apply_analysis(&mut self, result: AnalysisResult) -> u8 {
        let mastery = self.mastery.apply_analysis(&result);
        self.latest_analysis = Some(result);
        mastery
    }

    // ============================================================================
    // Coaching dialogue
    // ============================================================================

    /// Opens a coaching turn against the current draft.
    ///
    /// See [`Conversation::begin_turn`] for when this is a no-op.
    pub fn begin_chat(&mut self, text: &str) -> Option<CoachingRequest> {
        self.conversation.begin_turn(&self.draft, text)
    }

    /// Closes the open coaching turn. A reply credits mastery; failures leave
    /// it untouched.
    pub fn finish_chat(&mut self, result: Result<String, ResponderError>) -> TurnOutcome {
        let outcome = self.conversation.complete_turn(result);
        if outcome == TurnOutcome::Replied {
            self.mastery.apply_coaching_success();
        }
        outcome
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            id: self.id.clone(),
            created_at: self.created_at,
            task: self.task.clone(),
            draft: self.draft.clone(),
            mastery: self.mastery.state(),
            messages: self.conversation.messages().to_vec(),
            status: self.conversation.status(),
            latest_analysis: self.latest_analysis.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::Verdict;
    use crate::mastery::{CognitiveLoad, Engagement};
    use crate::session::{ChatRole, FailureKind};

    fn draft_of(seed: &str, len: usize) -> String {
        let mut text = seed.to_string();
        while text.chars().count() < len {
            text.push('的');
        }
        text
    }

    #[test]
    fn test_new_session_starts_with_greeting() {
        let session = LearnerSession::default();
        assert_eq!(session.mastery().mastery, 30);
        assert_eq!(session.conversation().len(), 1);
        let greeting = &session.conversation().messages()[0];
        assert_eq!(greeting.role, ChatRole::Agent);
        assert_eq!(greeting.tag, Some(MessageTag::Encouragement));
        assert!(session.latest_analysis().is_none());
    }

    #[test]
    fn test_editing_marks_engagement_active() {
        let mut session = LearnerSession::default();
        assert_eq!(session.mastery().engagement, Engagement::Passive);
        session.edit_draft("我");
        assert_eq!(session.mastery().engagement, Engagement::Active);
    }

    #[test]
    fn test_append_joins_lines() {
        let mut session = LearnerSession::default();
        session.append_to_draft("第一句");
        session.append_to_draft("第二句");
        assert_eq!(session.draft(), "第一句\n第二句");
        session.clear_draft();
        assert_eq!(session.draft(), "");
    }

    #[test]
    fn test_empty_draft_analysis_raises_to_forty() {
        let mut session = LearnerSession::default();
        let result = session.analyze();
        assert_eq!(result.verdict, Verdict::InsufficientLength);
        assert_eq!(session.mastery().mastery, 40);
        assert_eq!(session.latest_analysis(), Some(&result));
    }

    #[test]
    fn test_sixty_chars_without_keywords() {
        let mut session = LearnerSession::default();
        session.edit_draft(draft_of("", 60));
        let result = session.analyze();
        assert_eq!(result.verdict, Verdict::MissingStance);
        assert_eq!(session.mastery().mastery, 42);
    }

    #[test]
    fn test_complete_long_draft() {
        let mut session = LearnerSession::default();
        session.edit_draft(draft_of("我認為AI不能取代老師，例如陪伴，因此", 120));
        let result = session.analyze();
        assert_eq!(result.verdict, Verdict::CompleteStructure);
        assert_eq!(session.mastery().mastery, 70);
        assert_eq!(session.mastery().cognitive_load, CognitiveLoad::Optimal);
    }

    #[test]
    fn test_repeated_analysis_is_idempotent() {
        let mut session = LearnerSession::default();
        session.edit_draft(draft_of("我覺得根據", 70));
        let first = session.analyze();
        let after_first = session.mastery().mastery;
        let second = session.analyze();
        assert_eq!(first.diagnostic_text, second.diagnostic_text);
        assert_eq!(session.mastery().mastery, after_first);
    }

    #[test]
    fn test_chat_success_credits_mastery() {
        let mut session = LearnerSession::default();
        session.edit_draft("草稿");
        let request = session.begin_chat("where do I start?").unwrap();
        assert_eq!(request.draft, "草稿");
        assert_eq!(request.history.len(), 1);

        let outcome = session.finish_chat(Ok("Start with your claim.".to_string()));
        assert_eq!(outcome, TurnOutcome::Replied);
        assert_eq!(session.mastery().mastery, 35);
    }

    #[test]
    fn test_config_failure_leaves_mastery() {
        let mut session = LearnerSession::default();
        session.begin_chat("hello").unwrap();
        let outcome = session.finish_chat(Err(ResponderError::config("API key missing")));
        assert_eq!(outcome, TurnOutcome::Failed(FailureKind::Config));
        assert_eq!(session.mastery().mastery, 30);
        assert_eq!(session.conversation().status(), ConversationStatus::Idle);
        assert_eq!(
            session.conversation().messages().last().unwrap().role,
            ChatRole::System
        );
    }

    #[test]
    fn test_snapshot_reflects_state() {
        let mut session = LearnerSession::default();
        session.edit_draft("abc");
        session.begin_chat("q").unwrap();
        let snapshot = session.snapshot();
        assert_eq!(snapshot.id, session.id());
        assert_eq!(snapshot.draft, "abc");
        assert_eq!(snapshot.messages.len(), 2);
        assert_eq!(snapshot.status, ConversationStatus::AwaitingResponse);
    }
}
