//! Session domain module.
//!
//! # Module Structure
//!
//! - `message`: Chat message types (`ChatRole`, `ChatMessage`, `MessageTag`)
//! - `conversation`: Conversation coordinator (`Conversation`, `ConversationStatus`)
//! - `model`: Learner session context (`LearnerSession`, `SessionSnapshot`)

mod conversation;
mod message;
mod model;

pub use conversation::{
    CONFIG_FAILURE_NOTICE, Conversation, ConversationStatus, FailureKind, HISTORY_WINDOW,
    TRANSIENT_FAILURE_NOTICE, TurnOutcome,
};
pub use message::{ChatMessage, ChatRole, MessageTag};
pub use model::{LearnerSession, SessionSnapshot};
