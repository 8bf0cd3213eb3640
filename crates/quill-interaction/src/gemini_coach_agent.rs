//! GeminiCoachAgent - Direct REST API implementation of the coaching responder.
//!
//! Calls the Gemini `generateContent` endpoint and maps HTTP failures onto
//! [`ResponderError`]: credential and model problems become `Config`,
//! everything else becomes `Transient`.

use async_trait::async_trait;
use quill_core::config::{CoachSettings, DEFAULT_GEMINI_MODEL};
use quill_core::responder::{CoachingRequest, CoachingResponder, ResponderError};
use quill_core::task::WritingTask;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};

use crate::prompt;

const BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";
const DEFAULT_TEMPERATURE: f32 = 0.6;

/// Reply used when Gemini answers without any text.
pub const EMPTY_REPLY_FALLBACK: &str = "抱歉，我目前無法分析您的內容，請稍後再試。";

/// Coaching responder that talks to the Gemini HTTP API.
#[derive(Clone)]
pub struct GeminiCoachAgent {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
    temperature: f32,
    system_instruction: String,
}

impl GeminiCoachAgent {
    /// Creates a new agent for `task` with the default model.
    pub fn new(api_key: impl Into<String>, task: &WritingTask) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            model: DEFAULT_GEMINI_MODEL.to_string(),
            base_url: BASE_URL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            system_instruction: prompt::system_instruction(task),
        }
    }

    /// Applies model and temperature from the coach settings.
    pub fn with_settings(self, settings: &CoachSettings) -> Self {
        self.with_model(settings.model.clone())
            .with_temperature(settings.temperature)
    }

    /// Overrides the model after construction.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Points the agent at a different API root (proxies, gateways).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn build_request(&self, request: &CoachingRequest) -> GenerateContentRequest {
        GenerateContentRequest {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![Part {
                    text: prompt::user_prompt(request),
                }],
            }],
            system_instruction: Some(Content {
                role: None,
                parts: vec![Part {
                    text: self.system_instruction.clone(),
                }],
            }),
            generation_config: GenerationConfig {
                temperature: self.temperature,
            },
        }
    }

    async fn send_request(&self, body: &GenerateContentRequest) -> Result<String, ResponderError> {
        let url = format!(
            "{}/{model}:generateContent",
            self.base_url.trim_end_matches('/'),
            model = self.model,
        );

        let response = self
            .client
            .post(url)
            .query(&[("key", self.api_key.as_str())])
            .json(body)
            .send()
            .await
            .map_err(|err| ResponderError::Transient {
                status_code: err.status().map(|s| s.as_u16()),
                // Strip the URL: it carries the API key as a query parameter.
                message: format!("Gemini API request failed: {}", err.without_url()),
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read Gemini error body".to_string());
            return Err(map_http_error(status, &body_text));
        }

        let parsed: GenerateContentResponse =
            response.json().await.map_err(|err| ResponderError::Transient {
                status_code: None,
                message: format!("Failed to parse Gemini response: {}", err.without_url()),
            })?;

        Ok(extract_text_response(parsed).unwrap_or_else(|| EMPTY_REPLY_FALLBACK.to_string()))
    }
}

#[async_trait]
impl CoachingResponder for GeminiCoachAgent {
    async fn respond(&self, request: &CoachingRequest) -> Result<String, ResponderError> {
        let body = self.build_request(request);
        tracing::debug!(
            model = %self.model,
            history = request.history.len(),
            draft_chars = request.draft.chars().count(),
            "Sending coaching request to Gemini"
        );
        self.send_request(&body).await
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content>,
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    parts: Vec<Part>,
}

#[derive(Serialize)]
struct Part {
    text: String,
}

#[derive(Serialize)]
struct GenerationConfig {
    temperature: f32,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    candidates: Option<Vec<Candidate>>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<ContentResponse>,
}

#[derive(Deserialize)]
struct ContentResponse {
    #[serde(default)]
    parts: Vec<PartResponse>,
}

#[derive(Deserialize)]
struct PartResponse {
    text: Option<String>,
}

#[derive(Deserialize)]
struct ErrorWrapper {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
    status: Option<String>,
    #[serde(default)]
    details: Vec<ErrorDetail>,
}

#[derive(Deserialize)]
struct ErrorDetail {
    reason: Option<String>,
}

/// Concatenates the text parts of the first candidate. `None` when there is
/// no non-blank text.
fn extract_text_response(response: GenerateContentResponse) -> Option<String> {
    let content = response
        .candidates?
        .into_iter()
        .next()
        .and_then(|candidate| candidate.content)?;

    let text: String = content
        .parts
        .into_iter()
        .filter_map(|part| part.text)
        .collect();

    if text.trim().is_empty() { None } else { Some(text) }
}

fn map_http_error(status: StatusCode, body: &str) -> ResponderError {
    let parsed = serde_json::from_str::<ErrorWrapper>(body).ok();

    let message = parsed
        .as_ref()
        .map(|wrapper| {
            let status_text = wrapper.error.status.clone().unwrap_or_default();
            let msg = wrapper
                .error
                .message
                .clone()
                .unwrap_or_else(|| body.to_string());
            if status_text.is_empty() {
                msg
            } else {
                format!("{status_text}: {msg}")
            }
        })
        .unwrap_or_else(|| body.to_string());

    let api_key_rejected = parsed.as_ref().is_some_and(|wrapper| {
        wrapper
            .error
            .details
            .iter()
            .any(|d| d.reason.as_deref() == Some("API_KEY_INVALID"))
    });

    let is_config = api_key_rejected
        || matches!(
            status,
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN | StatusCode::NOT_FOUND
        );

    if is_config {
        ResponderError::Config { message }
    } else {
        ResponderError::Transient {
            status_code: Some(status.as_u16()),
            message,
        }
    }
}
