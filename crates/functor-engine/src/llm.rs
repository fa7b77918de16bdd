//! Language model backend abstraction and implementations.
//!
//! Defines an enum-based dispatch for backends, avoiding the
//! dyn-compatibility issues with async trait methods. Concrete
//! implementations exist for the Gemini `generateContent` API,
//! OpenAI-compatible chat completions, and the Anthropic Messages API. All
//! backends talk HTTP via `reqwest`.
//!
//! Transport and envelope failures surface as
//! [`EngineError::ServiceUnavailable`]; interpreting the returned text is
//! left to the parse module.

use crate::config::{BackendType, LlmBackendConfig};
use crate::error::EngineError;
use crate::prompt::RenderedPrompt;

/// Upper bound on generated tokens; world specifications can be long.
const MAX_OUTPUT_TOKENS: u32 = 2048;

// ---------------------------------------------------------------------------
// Unified backend enum (dyn-compatible alternative to async trait)
// ---------------------------------------------------------------------------

/// A language model backend that turns a prompt into response text.
pub enum LlmBackend {
    /// Google Gemini `generateContent` API.
    Gemini(HttpBackend),
    /// OpenAI-compatible chat completions API.
    OpenAi(HttpBackend),
    /// Anthropic Messages API.
    Anthropic(HttpBackend),
}

impl LlmBackend {
    /// Send a prompt and return the response text.
    pub async fn complete(&self, prompt: &RenderedPrompt) -> Result<String, EngineError> {
        match self {
            Self::Gemini(backend) => backend.complete_gemini(prompt).await,
            Self::OpenAi(backend) => backend.complete_openai(prompt).await,
            Self::Anthropic(backend) => backend.complete_anthropic(prompt).await,
        }
    }

    /// Human-readable name for logging.
    pub const fn name(&self) -> &str {
        match self {
            Self::Gemini(_) => "gemini",
            Self::OpenAi(_) => "openai-compatible",
            Self::Anthropic(_) => "anthropic",
        }
    }

    /// The configured model identifier.
    pub fn model(&self) -> &str {
        match self {
            Self::Gemini(b) | Self::OpenAi(b) | Self::Anthropic(b) => &b.model,
        }
    }
}

// ---------------------------------------------------------------------------
// Shared HTTP plumbing
// ---------------------------------------------------------------------------

/// Connection settings shared by every dialect.
pub struct HttpBackend {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
    model: String,
    temperature: f64,
}

impl HttpBackend {
    /// Create a backend from resolved configuration.
    pub fn new(config: &LlmBackendConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_url: config.api_url.clone(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            temperature: config.temperature,
        }
    }

    async fn complete_gemini(&self, prompt: &RenderedPrompt) -> Result<String, EngineError> {
        let url = format!("{}/models/{}:generateContent", self.api_url, self.model);

        let mut generation = serde_json::json!({
            "temperature": self.temperature,
            "maxOutputTokens": MAX_OUTPUT_TOKENS,
        });
        if prompt.json_response {
            generation["responseMimeType"] = serde_json::json!("application/json");
        }
        let body = serde_json::json!({
            "systemInstruction": {"parts": [{"text": prompt.system}]},
            "contents": [{"role": "user", "parts": [{"text": prompt.user}]}],
            "generationConfig": generation,
        });

        let request = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body);
        let json = send("Gemini", request).await?;
        extract_gemini_content(&json)
    }

    async fn complete_openai(&self, prompt: &RenderedPrompt) -> Result<String, EngineError> {
        let url = format!("{}/chat/completions", self.api_url);

        let mut body = serde_json::json!({
            "model": self.model,
            "messages": [
                {"role": "system", "content": prompt.system},
                {"role": "user", "content": prompt.user}
            ],
            "temperature": self.temperature,
            "max_tokens": MAX_OUTPUT_TOKENS,
        });
        if prompt.json_response {
            body["response_format"] = serde_json::json!({"type": "json_object"});
        }

        let request = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&body);
        let json = send("OpenAI", request).await?;
        extract_openai_content(&json)
    }

    async fn complete_anthropic(&self, prompt: &RenderedPrompt) -> Result<String, EngineError> {
        let url = format!("{}/messages", self.api_url);

        let body = serde_json::json!({
            "model": self.model,
            "max_tokens": MAX_OUTPUT_TOKENS,
            "temperature": self.temperature,
            "system": prompt.system,
            "messages": [
                {"role": "user", "content": prompt.user}
            ]
        });

        let request = self
            .client
            .post(&url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", "2023-06-01")
            .json(&body);
        let json = send("Anthropic", request).await?;
        extract_anthropic_content(&json)
    }
}

/// Send a request and decode a successful JSON body.
async fn send(
    provider: &str,
    request: reqwest::RequestBuilder,
) -> Result<serde_json::Value, EngineError> {
    let response = request.send().await.map_err(|e| {
        EngineError::ServiceUnavailable(format!("{provider} request failed: {e}"))
    })?;

    let status = response.status();
    if !status.is_success() {
        let error_body = response
            .text()
            .await
            .unwrap_or_else(|_| "unable to read error body".to_owned());
        return Err(EngineError::ServiceUnavailable(format!(
            "{provider} returned {status}: {error_body}"
        )));
    }

    response.json().await.map_err(|e| {
        EngineError::ServiceUnavailable(format!("{provider} response parse failed: {e}"))
    })
}

// ---------------------------------------------------------------------------
// Response envelopes
// ---------------------------------------------------------------------------

/// Extract the text of a Gemini response, joining all parts of the first
/// candidate.
fn extract_gemini_content(json: &serde_json::Value) -> Result<String, EngineError> {
    let parts = json
        .get("candidates")
        .and_then(|c| c.get(0))
        .and_then(|c| c.get("content"))
        .and_then(|c| c.get("parts"))
        .and_then(serde_json::Value::as_array)
        .ok_or_else(|| {
            EngineError::ServiceUnavailable(
                "Gemini response missing candidates[0].content.parts".to_owned(),
            )
        })?;

    let text: String = parts
        .iter()
        .filter_map(|p| p.get("text").and_then(serde_json::Value::as_str))
        .collect();
    if text.is_empty() {
        return Err(EngineError::ServiceUnavailable(
            "Gemini response contained no text parts".to_owned(),
        ));
    }
    Ok(text)
}

/// Extract the text content from an `OpenAI` chat completions response.
fn extract_openai_content(json: &serde_json::Value) -> Result<String, EngineError> {
    json.get("choices")
        .and_then(|c| c.get(0))
        .and_then(|c| c.get("message"))
        .and_then(|m| m.get("content"))
        .and_then(serde_json::Value::as_str)
        .map(ToOwned::to_owned)
        .ok_or_else(|| {
            EngineError::ServiceUnavailable(
                "OpenAI response missing choices[0].message.content".to_owned(),
            )
        })
}

/// Extract the text content from an Anthropic Messages API response.
fn extract_anthropic_content(json: &serde_json::Value) -> Result<String, EngineError> {
    json.get("content")
        .and_then(|c| c.get(0))
        .and_then(|b| b.get("text"))
        .and_then(serde_json::Value::as_str)
        .map(ToOwned::to_owned)
        .ok_or_else(|| {
            EngineError::ServiceUnavailable("Anthropic response missing content[0].text".to_owned())
        })
}

// ---------------------------------------------------------------------------
// Factory
// ---------------------------------------------------------------------------

/// Create a backend from resolved configuration.
pub fn create_backend(config: &LlmBackendConfig) -> LlmBackend {
    let http = HttpBackend::new(config);
    match config.backend_type {
        BackendType::Gemini => LlmBackend::Gemini(http),
        BackendType::OpenAi => LlmBackend::OpenAi(http),
        BackendType::Anthropic => LlmBackend::Anthropic(http),
    }
}
