use serde::{Deserialize, Serialize};

use crate::error::{AutodrawError, Result};

fn default_prompt_timeout() -> u64 {
    10
}

fn default_image_timeout() -> u64 {
    30
}

fn default_image_size() -> u32 {
    512
}

fn default_inference_steps() -> u32 {
    3
}

fn default_max_attempts() -> u32 {
    2
}

fn default_base_delay_ms() -> u64 {
    1_000
}

fn default_timeout_delay_ms() -> u64 {
    2_000
}

/// Text-completion service used to rephrase the user message into an image
/// prompt.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PromptServiceConfig {
    pub url: String,
    pub model: String,
    #[serde(default = "default_prompt_timeout")]
    pub timeout_secs: u64,
}

/// Image-generation service plus the fixed render parameters sent with every
/// request.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ImageServiceConfig {
    pub url: String,
    #[serde(default = "default_image_timeout")]
    pub timeout_secs: u64,
    #[serde(default = "default_image_size")]
    pub height: u32,
    #[serde(default = "default_image_size")]
    pub width: u32,
    #[serde(default = "default_inference_steps")]
    pub num_inference_steps: u32,
    #[serde(default)]
    pub guidance_scale: f32,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RetryConfig {
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    #[serde(default = "default_base_delay_ms")]
    pub base_delay_ms: u64,
    /// Timeouts back off longer than other failures before the next attempt.
    #[serde(default = "default_timeout_delay_ms")]
    pub timeout_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            base_delay_ms: default_base_delay_ms(),
            timeout_delay_ms: default_timeout_delay_ms(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct TriggerConfig {
    /// Regex patterns matched in addition to the built-in trigger phrases.
    #[serde(default)]
    pub extra_patterns: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FilterConfig {
    pub prompt: PromptServiceConfig,
    pub image: ImageServiceConfig,
    #[serde(default)]
    pub retry: RetryConfig,
    #[serde(default)]
    pub triggers: TriggerConfig,
}

impl FilterConfig {
    pub fn new(
        prompt_url: impl Into<String>,
        model: impl Into<String>,
        image_url: impl Into<String>,
    ) -> Self {
        Self {
            prompt: PromptServiceConfig {
                url: prompt_url.into(),
                model: model.into(),
                timeout_secs: default_prompt_timeout(),
            },
            image: ImageServiceConfig {
                url: image_url.into(),
                timeout_secs: default_image_timeout(),
                height: default_image_size(),
                width: default_image_size(),
                num_inference_steps: default_inference_steps(),
                guidance_scale: 0.0,
            },
            retry: RetryConfig::default(),
            triggers: TriggerConfig::default(),
        }
    }

    /// Rejects configurations that could only fail at request time. Runs once
    /// at filter construction.
    pub fn validate(&self) -> Result<()> {
        if self.prompt.url.trim().is_empty() {
            return Err(AutodrawError::Config(
                "prompt service url is not set".to_string(),
            ));
        }
        if self.prompt.model.trim().is_empty() {
            return Err(AutodrawError::Config(
                "prompt service model is not set".to_string(),
            ));
        }
        if self.image.url.trim().is_empty() {
            return Err(AutodrawError::Config(
                "image service url is not set".to_string(),
            ));
        }
        if self.retry.max_attempts == 0 {
            return Err(AutodrawError::Config(
                "retry.max_attempts must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
