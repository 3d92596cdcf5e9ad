use log::{info, warn};
use serde_json::Value;
use uuid::Uuid;

use crate::api_key::ApiKeyStore;
use crate::config::Config;
use crate::error::{RelayError, API_KEY_MISSING};
use crate::model::prompts::{CODE_REFINEMENT_PROMPT, FALLBACK_CONTENT, VERIFICATION_MESSAGE};
use crate::model::{GeminiClient, ModelSlot};
use crate::web::models::{
    ApiKeyResponse, ApiKeyStatus, ChatRequest, ChatResponse, Message, TokenUsage,
};

/// Relays chat requests to Gemini and owns the process-wide API key.
pub struct RelayService {
    client: GeminiClient,
    api_key: ApiKeyStore,
}

impl RelayService {
    pub fn new(config: &Config) -> Result<Self, RelayError> {
        Ok(Self {
            client: GeminiClient::new(&config.api_base, config.request_timeout)?,
            api_key: ApiKeyStore::new(config.api_key.as_str()),
        })
    }

    pub fn api_key_status(&self) -> ApiKeyStatus {
        let is_set = self.api_key.is_set();
        let message = if is_set {
            "API key is set and ready to use."
        } else {
            API_KEY_MISSING
        };
        ApiKeyStatus {
            is_set,
            message: message.to_string(),
        }
    }

    /// Stores `key` and verifies it with a live call. A key that fails verification is
    /// cleared again unless another caller has replaced it in the meantime.
    pub async fn set_api_key(&self, key: &str) -> ApiKeyResponse {
        self.api_key.set(key);

        match self.verify_key(key).await {
            Ok(()) => {
                info!("API key set and verified");
                ApiKeyResponse {
                    success: true,
                    message: "API key set successfully and verified.".to_string(),
                }
            }
            Err(e) => {
                warn!("API key verification failed: {}", e);
                self.api_key.clear_if(key);
                ApiKeyResponse {
                    success: false,
                    message: format!("Failed to set API key: {}", e),
                }
            }
        }
    }

    async fn verify_key(&self, key: &str) -> Result<(), RelayError> {
        if key.is_empty() {
            return Err(RelayError::Unauthenticated);
        }
        let probe = [Message::user(VERIFICATION_MESSAGE)];
        self.client
            .generate(key, ModelSlot::First.external_id(), &probe)
            .await
            .map(|_| ())
    }

    pub async fn query(
        &self,
        slot: ModelSlot,
        request: ChatRequest,
    ) -> Result<ChatResponse, RelayError> {
        let request_id = Uuid::new_v4();
        let api_key = self.api_key.get().ok_or(RelayError::Unauthenticated)?;

        let messages = build_messages(slot, request);
        let model_id = slot.external_id();
        info!(
            "[{}] {} query with {} turns",
            request_id,
            slot,
            messages.len()
        );

        let content = match self.client.generate(&api_key, model_id, &messages).await {
            Ok(response) => match extract_content(&response) {
                Some(text) => text.to_string(),
                None => {
                    warn!("[{}] No text in first candidate, using fallback", request_id);
                    FALLBACK_CONTENT.to_string()
                }
            },
            Err(RelayError::UpstreamFormat(reason)) => {
                warn!("[{}] {}, using fallback", request_id, reason);
                FALLBACK_CONTENT.to_string()
            }
            Err(e) => return Err(e),
        };

        let prompt_text = messages
            .iter()
            .map(|msg| msg.content.as_str())
            .collect::<Vec<_>>()
            .join(" ");
        let usage = estimate_usage(&prompt_text, &content);
        info!(
            "[{}] Response length: {} characters, ~{} tokens",
            request_id,
            content.len(),
            usage.total_tokens
        );

        Ok(ChatResponse {
            content,
            model_id: model_id.to_string(),
            usage: Some(usage),
        })
    }
}

/// History in its original order, followed by the augmented prompt as a user turn.
pub fn build_messages(slot: ModelSlot, request: ChatRequest) -> Vec<Message> {
    let prompt = augment_prompt(slot, &request);
    let mut messages = request.messages.unwrap_or_default();
    messages.push(Message::user(prompt));
    messages
}

/// Refinement prefix first, then the additional-input suffix.
pub fn augment_prompt(slot: ModelSlot, request: &ChatRequest) -> String {
    let mut prompt = request.prompt.clone();

    if slot.supports_refinement() && request.use_refinement.unwrap_or(false) {
        prompt = format!(
            "{}\n\nHere is the code to review and improve:\n\n{}",
            CODE_REFINEMENT_PROMPT, prompt
        );
    }

    if let Some(extra) = request.additional_input.as_deref().filter(|s| !s.is_empty()) {
        prompt = format!("{}\n\nAdditional context/instructions: {}", prompt, extra);
    }

    prompt
}

/// Text of the first part of the first candidate, if present.
pub fn extract_content(response: &Value) -> Option<&str> {
    response
        .get("candidates")
        .and_then(|candidates| candidates.get(0))
        .and_then(|candidate| candidate.get("content"))
        .and_then(|content| content.get("parts"))
        .and_then(|parts| parts.get(0))
        .and_then(|part| part.get("text"))
        .and_then(Value::as_str)
}

/// floor(words * 1.3); Gemini does not report usage on this endpoint.
pub fn estimate_tokens(text: &str) -> u64 {
    text.split_whitespace().count() as u64 * 13 / 10
}

pub fn estimate_usage(prompt_text: &str, completion: &str) -> TokenUsage {
    let prompt_tokens = estimate_tokens(prompt_text);
    let completion_tokens = estimate_tokens(completion);
    TokenUsage {
        prompt_tokens,
        completion_tokens,
        total_tokens: prompt_tokens + completion_tokens,
    }
}
