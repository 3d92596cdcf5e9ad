pub mod prompts;
pub mod slots;

use log::{debug, error, info};
use reqwest::Client;
use serde::Serialize;
use serde_json::{json, Value};
use std::time::Duration;

use crate::error::RelayError;
use crate::web::models::{Message, Role};
use prompts::SYSTEM_PROMPT;

pub use slots::ModelSlot;

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    role: &'static str,
    parts: [Part<'a>; 1],
}

impl<'a> Content<'a> {
    fn new(role: &'static str, text: &'a str) -> Self {
        Self {
            role,
            parts: [Part { text }],
        }
    }
}

// Gemini only knows "user" and "model".
fn gemini_role(role: Role) -> &'static str {
    match role {
        Role::User => "user",
        _ => "model",
    }
}

// A thin wrapper around the Gemini generateContent endpoint
pub struct GeminiClient {
    api_base: String,
    client: Client,
}

impl GeminiClient {
    pub fn new(api_base: &str, timeout: Duration) -> Result<Self, RelayError> {
        info!("Using Gemini API at: {}", api_base);

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| RelayError::Internal(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            api_base: api_base.trim_end_matches('/').to_string(),
            client,
        })
    }

    /// Sends the conversation to `model_id` and returns the raw response document.
    ///
    /// The system prompt is always sent as the first turn. The returned document is
    /// guaranteed to carry a non-empty `candidates` array.
    pub async fn generate(
        &self,
        api_key: &str,
        model_id: &str,
        messages: &[Message],
    ) -> Result<Value, RelayError> {
        let url = format!("{}/models/{}:generateContent", self.api_base, model_id);

        let mut contents = Vec::with_capacity(messages.len() + 1);
        contents.push(Content::new("user", SYSTEM_PROMPT));
        contents.extend(
            messages
                .iter()
                .map(|msg| Content::new(gemini_role(msg.role), &msg.content)),
        );

        let payload = json!({
            "contents": contents,
            "generationConfig": {
                "temperature": 0.9,
                "maxOutputTokens": 10243,
                "topP": 0.95,
                "topK": 40
            }
        });

        info!("Sending {} turns to Gemini model {}", messages.len(), model_id);
        debug!("Payload: {}", payload);

        let response = self
            .client
            .post(&url)
            .query(&[("key", api_key)])
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            error!("Gemini API error ({}): {}", status, body);
            return Err(RelayError::UpstreamRejected {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().await?;
        let response_json: Value = serde_json::from_str(&body).map_err(|e| {
            error!("Gemini API returned a non-JSON body: {}", body);
            RelayError::UpstreamFormat(format!("response is not JSON: {}", e))
        })?;
        debug!("Response JSON: {}", response_json);

        let has_candidates = response_json
            .get("candidates")
            .and_then(Value::as_array)
            .is_some_and(|candidates| !candidates.is_empty());
        if !has_candidates {
            error!("Unexpected response format from Gemini API: {}", response_json);
            return Err(RelayError::UpstreamFormat(
                "no candidates in response".to_string(),
            ));
        }

        Ok(response_json)
    }
}
