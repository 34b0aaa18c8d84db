use std::time::Duration;

use base64::{engine::general_purpose, Engine as _};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::ImageServiceConfig;
use crate::error::{AutodrawError, Result};
use crate::events::EventEmitter;
use crate::retry::RetryPolicy;

const STATUS_IMAGE_READY: &str = "✅ Изображение готово!";
const STATUS_TIMEOUT: &str = "⏱️ Превышен таймаут";
const STATUS_CONNECTION_FAILED: &str = "❌ Ошибка подключения";
const STATUS_GENERATION_FAILED: &str = "❌ Ошибка генерации изображения";
const STATUS_REQUEST_FAILED: &str = "❌ Ошибка при генерации";

const MSG_CONNECTION_FAILED: &str = "❌ Не удалось подключиться к FLUX.";
const FALLBACK_DETAIL: &str = "Unknown error";

#[derive(Debug, Serialize)]
struct ImagePayload<'a> {
    prompt: &'a str,
    height: u32,
    width: u32,
    num_inference_steps: u32,
    guidance_scale: f32,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: Option<String>,
}

/// Turns the generation error into the string shown in the conversation.
pub fn failure_message(err: &AutodrawError) -> String {
    match err {
        AutodrawError::Timeout(secs) => format!("❌ Таймаут после {secs} секунд."),
        AutodrawError::Connect(_) => MSG_CONNECTION_FAILED.to_string(),
        AutodrawError::Status { detail, .. } => {
            format!("❌ Не удалось сгенерировать изображение: {detail}")
        }
        other => format!("❌ Ошибка: {other}"),
    }
}

fn failure_status(err: &AutodrawError) -> &'static str {
    match err {
        AutodrawError::Timeout(_) => STATUS_TIMEOUT,
        AutodrawError::Connect(_) => STATUS_CONNECTION_FAILED,
        AutodrawError::Status { .. } => STATUS_GENERATION_FAILED,
        _ => STATUS_REQUEST_FAILED,
    }
}

/// Client for the image-generation service. A successful render is delivered
/// entirely over the event channel as a Markdown-embedded data URI.
pub struct ImageClient {
    client: reqwest::Client,
    config: ImageServiceConfig,
    retry: RetryPolicy,
}

impl ImageClient {
    pub fn new(config: &ImageServiceConfig, retry: RetryPolicy) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AutodrawError::Config(format!("image client init failed: {e}")))?;
        Ok(Self {
            client,
            config: config.clone(),
            retry,
        })
    }

    /// Renders `prompt` and emits the finished image. Failures are reported
    /// on the emitter before the error is returned.
    pub async fn generate(&self, emitter: &EventEmitter, prompt: &str) -> Result<()> {
        match self.retry.run(|attempt| self.attempt(prompt, attempt)).await {
            Ok(bytes) => {
                debug!(bytes = bytes.len(), "image generated");
                let encoded = general_purpose::STANDARD.encode(&bytes);
                emitter.status(STATUS_IMAGE_READY, true).await;
                emitter
                    .message(format!(
                        "![Generated Image](data:image/png;base64,{encoded})"
                    ))
                    .await;
                Ok(())
            }
            Err(err) => {
                warn!(error = %err, "image generation failed");
                emitter.status(failure_status(&err), true).await;
                Err(err)
            }
        }
    }

    async fn attempt(&self, prompt: &str, attempt: u32) -> Result<Vec<u8>> {
        debug!(
            attempt,
            height = self.config.height,
            width = self.config.width,
            "requesting image generation"
        );
        let payload = ImagePayload {
            prompt,
            height: self.config.height,
            width: self.config.width,
            num_inference_steps: self.config.num_inference_steps,
            guidance_scale: self.config.guidance_scale,
        };

        let response = self
            .client
            .post(&self.config.url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| AutodrawError::from_reqwest(e, self.config.timeout_secs))?;

        let status = response.status();
        if status != StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            let detail = serde_json::from_str::<ErrorBody>(&body)
                .ok()
                .and_then(|parsed| parsed.detail)
                .unwrap_or_else(|| FALLBACK_DETAIL.to_string());
            return Err(AutodrawError::Status {
                status: status.as_u16(),
                detail,
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| AutodrawError::from_reqwest(e, self.config.timeout_secs))?;
        Ok(bytes.to_vec())
    }
}
