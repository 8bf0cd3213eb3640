//! Coaching responder port.
//!
//! Defines the interface to the external generative service that produces
//! free-form coaching replies. Implementations live outside the core.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::session::ChatMessage;

/// Everything a responder gets for a single coaching turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoachingRequest {
    /// Snapshot of the learner's draft at send time. May be empty.
    pub draft: String,
    /// The learner's latest message. Never blank.
    pub message: String,
    /// Trailing window of earlier messages, oldest first.
    pub history: Vec<ChatMessage>,
}

/// Typed failure of a responder call.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResponderError {
    /// Missing or rejected credentials, unknown model, and similar setup
    /// problems. Retrying will not help.
    #[error("Responder configuration error: {message}")]
    Config { message: String },

    /// Network failure, timeout, rate limiting or a server-side error.
    #[error("Responder transient error: {message}")]
    Transient {
        status_code: Option<u16>,
        message: String,
    },
}

impl ResponderError {
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    pub fn transient(message: impl Into<String>) -> Self {
        Self::Transient {
            status_code: None,
            message: message.into(),
        }
    }

    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config { .. })
    }
}

/// External service that turns a [`CoachingRequest`] into a coaching reply.
#[async_trait::async_trait]
pub trait CoachingResponder: Send + Sync {
    /// Produces a reply for the learner.
    ///
    /// # Returns
    ///
    /// - `Ok(String)`: reply text
    /// - `Err(ResponderError)`: typed failure; never contains secrets
    async fn respond(&self, request: &CoachingRequest) -> Result<String, ResponderError>;
}
