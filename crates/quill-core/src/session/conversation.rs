//! Conversation coordinator.
//!
//! Owns the ordered chat history and enforces a single outstanding responder
//! request. A coaching turn is split into two synchronous halves around the
//! (asynchronous) responder call:
//!
//! 1. [`Conversation::begin_turn`] appends the learner message and hands back
//!    the [`CoachingRequest`] to send.
//! 2. [`Conversation::complete_turn`] folds the responder's answer back in.
//!
//! While a turn is open the conversation is `AwaitingResponse` and further
//! turns are dropped, not queued.

use serde::{Deserialize, Serialize};

use super::message::{ChatMessage, MessageTag};
use crate::responder::{CoachingRequest, ResponderError};

/// Number of earlier messages forwarded to the responder as context.
pub const HISTORY_WINDOW: usize = 3;

/// Shown when the responder reports a configuration problem.
pub const CONFIG_FAILURE_NOTICE: &str = "系統錯誤：API Key 未設定或無效。請聯絡管理員。";
/// Shown when the responder call fails for any other reason.
pub const TRANSIENT_FAILURE_NOTICE: &str = "連線發生錯誤，請檢查網路狀態。";

/// Request state of a conversation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConversationStatus {
    /// No request outstanding.
    #[default]
    Idle,
    /// Exactly one responder request is in flight.
    AwaitingResponse,
}

/// Which kind of failure ended a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    Config,
    Transient,
}

/// Result of closing a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnOutcome {
    /// An agent reply was appended.
    Replied,
    /// A system notice was appended.
    Failed(FailureKind),
    /// No turn was open; nothing changed.
    Stale,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Conversation {
    messages: Vec<ChatMessage>,
    status: ConversationStatus,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a conversation with an opening message already in place.
    pub fn with_greeting(greeting: ChatMessage) -> Self {
        Self {
            messages: vec![greeting],
            status: ConversationStatus::Idle,
        }
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn status(&self) -> ConversationStatus {
        self.status
    }

    pub fn is_awaiting(&self) -> bool {
        self.status == ConversationStatus::AwaitingResponse
    }

    /// Opens a coaching turn.
    ///
    /// Returns `None` (and changes nothing) when `text` is blank or a turn is
    /// already open. Otherwise the learner message is appended and the
    /// request to send is returned. The request's history is the trailing
    /// window of messages that preceded this one.
    pub fn begin_turn(&mut self, draft: &str, text: &str) -> Option<CoachingRequest> {
        if text.trim().is_empty() || self.is_awaiting() {
            return None;
        }

        let history = self.trailing_window(HISTORY_WINDOW);
        self.messages.push(ChatMessage::user(text));
        self.status = ConversationStatus::AwaitingResponse;

        Some(CoachingRequest {
            draft: draft.to_string(),
            message: text.to_string(),
            history,
        })
    }

    /// Closes the open turn with the responder's answer.
    pub fn complete_turn(&mut self, result: Result<String, ResponderError>) -> TurnOutcome {
        if !self.is_awaiting() {
            return TurnOutcome::Stale;
        }
        self.status = ConversationStatus::Idle;

        match result {
            Ok(reply) => {
                self.messages.push(ChatMessage::agent(reply, MessageTag::Hint));
                TurnOutcome::Replied
            }
            Err(ResponderError::Config { .. }) => {
                self.messages.push(ChatMessage::system(CONFIG_FAILURE_NOTICE));
                TurnOutcome::Failed(FailureKind::Config)
            }
            Err(ResponderError::Transient { .. }) => {
                self.messages.push(ChatMessage::system(TRANSIENT_FAILURE_NOTICE));
                TurnOutcome::Failed(FailureKind::Transient)
            }
        }
    }

    /// The last `n` messages, oldest first.
    pub fn trailing_window(&self, n: usize) -> Vec<ChatMessage> {
        let start = self.messages.len().saturating_sub(n);
        self.messages[start..].to_vec()
    }
}
