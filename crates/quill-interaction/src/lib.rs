//! Coaching responder implementations.

pub mod gemini_coach_agent;
pub mod prompt;

use async_trait::async_trait;
use quill_core::config::{CoachSettings, SecretConfig};
use quill_core::responder::{CoachingRequest, CoachingResponder, ResponderError};
use quill_core::task::WritingTask;
use std::sync::Arc;

pub use gemini_coach_agent::{EMPTY_REPLY_FALLBACK, GeminiCoachAgent};

/// Responder used when no API key is configured. Every call fails with a
/// configuration error so the learner is told to contact an administrator.
#[derive(Debug, Clone, Default)]
pub struct UnconfiguredResponder;

#[async_trait]
impl CoachingResponder for UnconfiguredResponder {
    async fn respond(&self, _request: &CoachingRequest) -> Result<String, ResponderError> {
        Err(ResponderError::config(
            "Gemini API key is not set (secret.json or GEMINI_API_KEY)",
        ))
    }
}

/// Picks the responder for the given secrets: Gemini when a key is present,
/// otherwise [`UnconfiguredResponder`].
pub fn responder_from_secrets(
    secrets: &SecretConfig,
    settings: &CoachSettings,
    task: &WritingTask,
) -> Arc<dyn CoachingResponder> {
    match secrets.gemini_api_key() {
        Some(key) => Arc::new(GeminiCoachAgent::new(key, task).with_settings(settings)),
        None => {
            tracing::warn!("No Gemini API key configured; coaching replies are disabled");
            Arc::new(UnconfiguredResponder)
        }
    }
}
