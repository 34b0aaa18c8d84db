use std::time::Duration;

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::PromptServiceConfig;
use crate::error::{AutodrawError, Result};
use crate::events::EventEmitter;
use crate::retry::RetryPolicy;

/// Synthesized prompts are clipped to this many characters before they reach
/// the image service.
const MAX_PROMPT_CHARS: usize = 100;

const STATUS_PROMPT_FAILED: &str = "❌ Ошибка создания промпта";
const STATUS_CONNECTION_FAILED: &str = "❌ Ошибка соединения с Ollama";
const STATUS_PROMPT_EMPTY: &str = "❌ Не удалось создать промпт";

const MSG_PROMPT_FAILED: &str = "❌ Не удалось создать промпт для генерации изображения.";
const MSG_PROMPT_EMPTY: &str = "❌ Не удалось создать промпт для генерации.";

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: Option<String>,
}

fn build_instruction(user_message: &str) -> String {
    format!(
        "Rephrase the following text into a short image generation prompt \
         for FLUX model (80 token max). Include visual details, style, \
         lighting, and composition: {user_message}\n\n\
         Return ONLY the prompt, nothing else."
    )
}

/// Turns the synthesis error into the string shown in the conversation.
pub fn failure_message(err: &AutodrawError) -> String {
    match err {
        AutodrawError::Status { .. } => MSG_PROMPT_FAILED.to_string(),
        AutodrawError::Malformed(_) => MSG_PROMPT_EMPTY.to_string(),
        other => format!("❌ Ошибка соединения с Ollama: {other}"),
    }
}

fn failure_status(err: &AutodrawError) -> &'static str {
    match err {
        AutodrawError::Status { .. } => STATUS_PROMPT_FAILED,
        AutodrawError::Malformed(_) => STATUS_PROMPT_EMPTY,
        _ => STATUS_CONNECTION_FAILED,
    }
}

/// Client for the text-completion service that rewrites the raw user message
/// into a short image prompt.
pub struct PromptSynthesizer {
    client: reqwest::Client,
    url: String,
    model: String,
    timeout_secs: u64,
    retry: RetryPolicy,
}

impl PromptSynthesizer {
    pub fn new(config: &PromptServiceConfig, retry: RetryPolicy) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AutodrawError::Config(format!("prompt client init failed: {e}")))?;
        Ok(Self {
            client,
            url: config.url.clone(),
            model: config.model.clone(),
            timeout_secs: config.timeout_secs,
            retry,
        })
    }

    /// Rephrases `user_message` into a bounded image prompt. Failures are
    /// reported on the emitter before the error is returned.
    pub async fn synthesize(&self, emitter: &EventEmitter, user_message: &str) -> Result<String> {
        let instruction = build_instruction(user_message);
        match self
            .retry
            .run(|attempt| self.attempt(&instruction, attempt))
            .await
        {
            Ok(prompt) => {
                debug!(chars = prompt.chars().count(), "synthesized image prompt");
                Ok(prompt)
            }
            Err(err) => {
                warn!(error = %err, "prompt synthesis failed");
                emitter.status(failure_status(&err), true).await;
                Err(err)
            }
        }
    }

    async fn attempt(&self, instruction: &str, attempt: u32) -> Result<String> {
        debug!(attempt, model = %self.model, "requesting prompt synthesis");
        let request = GenerateRequest {
            model: &self.model,
            prompt: instruction,
            stream: false,
        };

        let response = self
            .client
            .post(&self.url)
            .json(&request)
            .send()
            .await
            .map_err(|e| AutodrawError::from_reqwest(e, self.timeout_secs))?;

        let status = response.status();
        if status != StatusCode::OK {
            let detail = response.text().await.unwrap_or_default();
            return Err(AutodrawError::Status {
                status: status.as_u16(),
                detail,
            });
        }

        let body: GenerateResponse = response
            .json()
            .await
            .map_err(|e| AutodrawError::Malformed(format!("prompt response decode failed: {e}")))?;
        let text = body
            .response
            .ok_or_else(|| {
                AutodrawError::Malformed("prompt response is missing `response`".to_string())
            })?
            .trim()
            .to_string();
        if text.is_empty() {
            return Err(AutodrawError::Malformed(
                "prompt service returned an empty prompt".to_string(),
            ));
        }

        Ok(text.chars().take(MAX_PROMPT_CHARS).collect())
    }
}
