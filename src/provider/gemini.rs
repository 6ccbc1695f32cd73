//! Gemini REST client for schema-constrained JSON generation.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use tracing::debug;

use super::{GenerativeModel, ProviderError};

/// Gemini v1beta REST API base.
const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Model used when none is configured.
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";

/// Header carrying the API key, kept out of URLs and error text.
const API_KEY_HEADER: &str = "x-goog-api-key";

/// Upper bound for a single generation request.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

// == Client ==
/// Calls Gemini's `generateContent` with a JSON response schema.
pub struct GeminiClient {
    api_key: String,
    model: String,
    base_url: String,
    client: Client,
}

impl std::fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiClient")
            .field("api_key", &"[REDACTED]")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl GeminiClient {
    /// Builds a client for `model` authenticated with `api_key`.
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| ProviderError::Transport(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            api_key: api_key.into(),
            model: model.into(),
            base_url: GEMINI_API_BASE.to_string(),
            client,
        })
    }

    /// Points the client at a different API root (proxies, test servers).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn api_url(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }

    /// Builds the `generateContent` body for one prompt and schema.
    pub fn build_request_body(prompt: &str, schema: &Value) -> Value {
        json!({
            "contents": [{
                "role": "user",
                "parts": [{ "text": prompt }]
            }],
            "generationConfig": {
                "responseMimeType": "application/json",
                "responseSchema": schema
            }
        })
    }

    /// Extracts the answer text from a `generateContent` response.
    ///
    /// Parts tagged `"thought": true` are reasoning traces and are skipped.
    pub fn extract_text(response: &Value) -> Option<String> {
        let parts = response["candidates"][0]["content"]["parts"].as_array()?;
        let text: String = parts
            .iter()
            .filter(|p| !p["thought"].as_bool().unwrap_or(false))
            .filter_map(|p| p["text"].as_str())
            .collect();

        if text.trim().is_empty() {
            None
        } else {
            Some(text)
        }
    }

    /// Parses the model's answer text as JSON.
    ///
    /// Tolerates a Markdown code fence around the document.
    pub fn parse_document(text: &str) -> Result<Value, ProviderError> {
        let trimmed = text.trim();
        let unfenced = trimmed
            .strip_prefix("```json")
            .or_else(|| trimmed.strip_prefix("```"))
            .and_then(|rest| rest.strip_suffix("```"))
            .unwrap_or(trimmed)
            .trim();

        serde_json::from_str(unfenced).map_err(|e| ProviderError::MalformedResponse(e.to_string()))
    }
}

#[async_trait]
impl GenerativeModel for GeminiClient {
    async fn generate(&self, prompt: &str, schema: &Value) -> Result<Value, ProviderError> {
        let body = Self::build_request_body(prompt, schema);
        debug!("Gemini request to model {}", self.model);

        let response = self
            .client
            .post(self.api_url())
            .header(API_KEY_HEADER, self.api_key.as_str())
            .json(&body)
            .send()
            .await
            .map_err(|e| ProviderError::Transport(e.without_url().to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            // Prefer the structured message, keep the raw body otherwise
            let message = serde_json::from_str::<Value>(&error_text)
                .ok()
                .and_then(|v| {
                    let msg = v["error"]["message"].as_str()?;
                    let code = v["error"]["status"].as_str().unwrap_or_default();
                    Some(format!("{} {}", code, msg).trim().to_string())
                })
                .unwrap_or(error_text);
            return Err(ProviderError::Http {
                status: status.as_u16(),
                message,
            });
        }

        let json: Value = response
            .json()
            .await
            .map_err(|e| ProviderError::MalformedResponse(e.without_url().to_string()))?;
        let text = Self::extract_text(&json).ok_or(ProviderError::EmptyResponse)?;
        Self::parse_document(&text)
    }

    fn name(&self) -> &str {
        "gemini"
    }
}

// == Unit Tests ==
