use std::sync::Arc;
use std::sync::Mutex as StdMutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use quill_application::{CoachingSession, SendOutcome};
use quill_core::analysis::Verdict;
use quill_core::config::CoachSettings;
use quill_core::mastery::{CognitiveLoad, Engagement};
use quill_core::responder::{CoachingRequest, CoachingResponder, ResponderError};
use quill_core::session::{
    CONFIG_FAILURE_NOTICE, ChatRole, ConversationStatus, FailureKind, LearnerSession, MessageTag,
    TRANSIENT_FAILURE_NOTICE,
};
use tokio::sync::Notify;
use tokio_util::sync::CancellationToken;

/// Replies with a fixed result and records every request it sees.
struct ScriptedResponder {
    result: Result<String, ResponderError>,
    requests: StdMutex<Vec<CoachingRequest>>,
}

impl ScriptedResponder {
    fn replying(text: &str) -> Arc<Self> {
        Self::with_result(Ok(text.to_string()))
    }

    fn with_result(result: Result<String, ResponderError>) -> Arc<Self> {
        Arc::new(Self {
            result,
            requests: StdMutex::new(Vec::new()),
        })
    }

    fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    fn last_request(&self) -> CoachingRequest {
        self.requests.lock().unwrap().last().cloned().unwrap()
    }
}

#[async_trait::async_trait]
impl CoachingResponder for ScriptedResponder {
    async fn respond(&self, request: &CoachingRequest) -> Result<String, ResponderError> {
        self.requests.lock().unwrap().push(request.clone());
        self.result.clone()
    }
}

/// Holds every call until the gate is opened.
struct GatedResponder {
    gate: Notify,
    calls: AtomicUsize,
}

#[async_trait::async_trait]
impl CoachingResponder for GatedResponder {
    async fn respond(&self, _request: &CoachingRequest) -> Result<String, ResponderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.gate.notified().await;
        Ok("Think about a counter-example.".to_string())
    }
}

/// Never answers.
struct HungResponder;

#[async_trait::async_trait]
impl CoachingResponder for HungResponder {
    async fn respond(&self, _request: &CoachingRequest) -> Result<String, ResponderError> {
        std::future::pending().await
    }
}

fn instant_settings() -> CoachSettings {
    CoachSettings {
        analysis_delay_ms: 0,
        reply_delay_ms: 0,
        ..CoachSettings::default()
    }
}

fn coach_with(responder: Arc<dyn CoachingResponder>) -> CoachingSession {
    CoachingSession::new(LearnerSession::default(), responder, instant_settings())
}

fn padded(seed: &str, len: usize) -> String {
    let mut text = seed.to_string();
    while text.chars().count() < len {
        text.push('文');
    }
    text
}

// ============================================================================
// Structural analysis
// ============================================================================

#[tokio::test]
async fn test_empty_draft_analysis() {
    let coach = coach_with(ScriptedResponder::replying("ok"));

    let report = coach.analyze(CancellationToken::new()).await.unwrap();
    assert_eq!(report.result.verdict, Verdict::InsufficientLength);
    assert!(report.result.diagnostic_text.contains("字數不足"));
    assert_eq!(report.mastery, 40);
}

#[tokio::test]
async fn test_sixty_char_draft_without_keywords() {
    let coach = coach_with(ScriptedResponder::replying("ok"));
    coach.update_draft(padded("", 60)).await;

    let report = coach.analyze(CancellationToken::new()).await.unwrap();
    assert_eq!(report.result.verdict, Verdict::MissingStance);
    assert_eq!(report.mastery, 42);
}

#[tokio::test]
async fn test_complete_draft_of_120_chars() {
    let coach = coach_with(ScriptedResponder::replying("ok"));
    coach
        .update_draft(padded("我認為人類教師無法被取代，例如情感陪伴，因此", 120))
        .await;

    let report = coach.analyze(CancellationToken::new()).await.unwrap();
    assert_eq!(report.result.verdict, Verdict::CompleteStructure);
    assert_eq!(report.mastery, 70);

    let snapshot = coach.snapshot().await;
    assert_eq!(snapshot.mastery.cognitive_load, CognitiveLoad::Optimal);
    assert_eq!(snapshot.mastery.engagement, Engagement::Active);
    assert_eq!(snapshot.latest_analysis, Some(report.result));
}

#[tokio::test]
async fn test_cancelled_analysis_changes_nothing() {
    let coach = CoachingSession::new(
        LearnerSession::default(),
        ScriptedResponder::replying("ok"),
        CoachSettings {
            analysis_delay_ms: 60_000,
            ..CoachSettings::default()
        },
    );
    let cancel = CancellationToken::new();
    cancel.cancel();

    assert!(coach.analyze(cancel).await.is_none());
    let snapshot = coach.snapshot().await;
    assert_eq!(snapshot.mastery.mastery, 30);
    assert!(snapshot.latest_analysis.is_none());
}

#[tokio::test]
async fn test_analysis_uses_draft_at_request_time() {
    let coach = CoachingSession::new(
        LearnerSession::default(),
        ScriptedResponder::replying("ok"),
        CoachSettings {
            analysis_delay_ms: 50,
            ..CoachSettings::default()
        },
    );

    let runner = coach.clone();
    let handle = tokio::spawn(async move { runner.analyze(CancellationToken::new()).await });
    tokio::task::yield_now().await;
    // Edited after the request; the pending run still sees the empty draft.
    coach.update_draft(padded("我認為例如因此", 120)).await;

    let report = handle.await.unwrap().unwrap();
    assert_eq!(report.result.verdict, Verdict::InsufficientLength);
    assert_eq!(report.result.char_count, 0);
}

// ============================================================================
// Coaching dialogue
// ============================================================================

#[tokio::test]
async fn test_blank_message_is_dropped() {
    let responder = ScriptedResponder::replying("ok");
    let coach = coach_with(responder.clone());

    let outcome = coach.send_message("", CancellationToken::new()).await;
    assert_eq!(outcome, SendOutcome::Dropped);

    let snapshot = coach.snapshot().await;
    assert_eq!(snapshot.messages.len(), 1);
    assert_eq!(snapshot.status, ConversationStatus::Idle);
    assert_eq!(responder.calls(), 0);
}

#[tokio::test]
async fn test_reply_appends_hint_and_credits_mastery() {
    let responder = ScriptedResponder::replying("你的主張是什麼？");
    let coach = coach_with(responder.clone());
    coach.update_draft("AI 很厲害").await;

    let outcome = coach.send_message("我該怎麼開始？", CancellationToken::new()).await;
    assert_eq!(
        outcome,
        SendOutcome::Replied {
            reply: "你的主張是什麼？".to_string(),
            mastery: 35,
        }
    );

    let request = responder.last_request();
    assert_eq!(request.draft, "AI 很厲害");
    assert_eq!(request.message, "我該怎麼開始？");
    assert_eq!(request.history.len(), 1);
    assert_eq!(request.history[0].tag, Some(MessageTag::Encouragement));

    let snapshot = coach.snapshot().await;
    let roles: Vec<ChatRole> = snapshot.messages.iter().map(|m| m.role).collect();
    assert_eq!(roles, vec![ChatRole::Agent, ChatRole::User, ChatRole::Agent]);
    assert_eq!(snapshot.messages[2].tag, Some(MessageTag::Hint));
}

#[tokio::test]
async fn test_history_window_slides() {
    let responder = ScriptedResponder::replying("hint");
    let coach = coach_with(responder.clone());

    for question in ["q1", "q2", "q3"] {
        coach.send_message(question, CancellationToken::new()).await;
    }

    let history: Vec<String> = responder
        .last_request()
        .history
        .into_iter()
        .map(|m| m.content)
        .collect();
    // greeting, q1, hint, q2, hint | q3
    assert_eq!(history, vec!["hint", "q2", "hint"]);
}

#[tokio::test]
async fn test_send_while_awaiting_is_dropped() {
    let responder = Arc::new(GatedResponder {
        gate: Notify::new(),
        calls: AtomicUsize::new(0),
    });
    let coach = coach_with(responder.clone());

    let first = coach.clone();
    let handle =
        tokio::spawn(async move { first.send_message("first", CancellationToken::new()).await });

    while coach.snapshot().await.status != ConversationStatus::AwaitingResponse {
        tokio::task::yield_now().await;
    }

    let outcome = coach.send_message("why?", CancellationToken::new()).await;
    assert_eq!(outcome, SendOutcome::Dropped);
    assert_eq!(coach.snapshot().await.messages.len(), 2);

    responder.gate.notify_one();
    let outcome = handle.await.unwrap();
    assert!(matches!(outcome, SendOutcome::Replied { mastery: 35, .. }));
    assert_eq!(responder.calls.load(Ordering::SeqCst), 1);
    assert_eq!(coach.snapshot().await.status, ConversationStatus::Idle);
}

#[tokio::test]
async fn test_config_failure_reports_and_keeps_mastery() {
    let coach = coach_with(ScriptedResponder::with_result(Err(ResponderError::config(
        "API key missing",
    ))));

    let outcome = coach.send_message("hello", CancellationToken::new()).await;
    assert_eq!(
        outcome,
        SendOutcome::Failed {
            kind: FailureKind::Config,
            notice: CONFIG_FAILURE_NOTICE.to_string(),
        }
    );

    let snapshot = coach.snapshot().await;
    assert_eq!(snapshot.mastery.mastery, 30);
    assert_eq!(snapshot.status, ConversationStatus::Idle);
    assert_eq!(snapshot.messages.last().unwrap().role, ChatRole::System);
}

#[tokio::test]
async fn test_transient_failure_keeps_conversation_usable() {
    let failing = coach_with(ScriptedResponder::with_result(Err(
        ResponderError::transient("connection reset"),
    )));

    let outcome = failing.send_message("hello", CancellationToken::new()).await;
    assert_eq!(
        outcome,
        SendOutcome::Failed {
            kind: FailureKind::Transient,
            notice: TRANSIENT_FAILURE_NOTICE.to_string(),
        }
    );

    // A second attempt goes through to the responder again.
    let outcome = failing.send_message("again", CancellationToken::new()).await;
    assert!(matches!(outcome, SendOutcome::Failed { .. }));
    assert_eq!(failing.snapshot().await.messages.len(), 5);
}

#[tokio::test]
async fn test_hung_responder_times_out_as_transient() {
    let coach = CoachingSession::new(
        LearnerSession::default(),
        Arc::new(HungResponder),
        CoachSettings {
            analysis_delay_ms: 0,
            reply_delay_ms: 0,
            request_timeout_secs: 1,
            ..CoachSettings::default()
        },
    );

    let outcome = coach.send_message("hello?", CancellationToken::new()).await;
    assert!(matches!(
        outcome,
        SendOutcome::Failed {
            kind: FailureKind::Transient,
            ..
        }
    ));
    assert_eq!(coach.snapshot().await.status, ConversationStatus::Idle);
}

#[tokio::test]
async fn test_cancelled_send_returns_to_idle() {
    let coach = coach_with(Arc::new(HungResponder));
    let cancel = CancellationToken::new();

    let sender = coach.clone();
    let token = cancel.clone();
    let handle = tokio::spawn(async move { sender.send_message("hello", token).await });

    while coach.snapshot().await.status != ConversationStatus::AwaitingResponse {
        tokio::task::yield_now().await;
    }
    cancel.cancel();

    let outcome = handle.await.unwrap();
    assert!(matches!(
        outcome,
        SendOutcome::Failed {
            kind: FailureKind::Transient,
            ..
        }
    ));
    let snapshot = coach.snapshot().await;
    assert_eq!(snapshot.status, ConversationStatus::Idle);
    assert_eq!(snapshot.mastery.mastery, 30);
}

#[tokio::test]
async fn test_mastery_never_decreases_across_mixed_operations() {
    let coach = coach_with(ScriptedResponder::replying("hint"));
    let mut previous = coach.snapshot().await.mastery.mastery;

    let drafts = [
        padded("我認為例如因此", 120),
        String::new(),
        padded("我覺得", 60),
        padded("", 80),
    ];
    for draft in drafts {
        coach.update_draft(draft).await;
        coach.analyze(CancellationToken::new()).await;
        let current = coach.snapshot().await.mastery.mastery;
        assert!(current >= previous);
        previous = current;

        coach.send_message("next?", CancellationToken::new()).await;
        let current = coach.snapshot().await.mastery.mastery;
        assert!(current >= previous);
        previous = current;
    }
}
