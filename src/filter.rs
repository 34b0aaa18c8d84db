use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, info};

use crate::config::FilterConfig;
use crate::error::Result;
use crate::events::EventEmitter;
use crate::interfaces::events::EventSink;
use crate::interfaces::filter::MessageFilter;
use crate::message::RequestBody;
use crate::providers::image::{self, ImageClient};
use crate::providers::prompt::{self, PromptSynthesizer};
use crate::retry::RetryPolicy;
use crate::triggers::TriggerDetector;

const FILTER_NAME: &str = "Auto Image Generator";
const FILTER_DESCRIPTION: &str = "Automatically generates images when user requests them";

const STATUS_REQUEST_RECEIVED: &str = "☝️ Запрос на генерацию изображения...";
const STATUS_GENERATING: &str = "🎨 Генерация изображения";

/// What one invocation did to the conversation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The message carried no image-generation intent; the body is untouched.
    NotTriggered,
    /// The pipeline gave up; the string is appended for the user to see.
    Failed(String),
    /// The image was delivered over the event channel; an empty assistant
    /// message marks the success in the history.
    Succeeded,
}

/// The interceptor: gates on the trigger detector, then drives prompt
/// synthesis and image generation, reporting progress along the way.
pub struct AutoImageFilter {
    detector: TriggerDetector,
    prompt: PromptSynthesizer,
    image: ImageClient,
}

impl AutoImageFilter {
    pub fn new(config: FilterConfig) -> Result<Self> {
        config.validate()?;
        let retry = RetryPolicy::new(&config.retry);
        Ok(Self {
            detector: TriggerDetector::new(&config.triggers.extra_patterns)?,
            prompt: PromptSynthesizer::new(&config.prompt, retry)?,
            image: ImageClient::new(&config.image, retry)?,
        })
    }

    pub fn name(&self) -> &'static str {
        FILTER_NAME
    }

    pub fn description(&self) -> &'static str {
        FILTER_DESCRIPTION
    }

    /// Runs the pipeline for the newest message without mutating the body.
    pub async fn generate(&self, body: &RequestBody, emitter: &EventEmitter) -> Outcome {
        let user_message = body.last_content();
        if !self.detector.matches(user_message) {
            return Outcome::NotTriggered;
        }

        info!("image generation trigger detected");
        emitter.status(STATUS_REQUEST_RECEIVED, false).await;

        let prompt = match self.prompt.synthesize(emitter, user_message).await {
            Ok(prompt) => prompt,
            Err(err) => return Outcome::Failed(prompt::failure_message(&err)),
        };

        emitter.status(STATUS_GENERATING, false).await;

        match self.image.generate(emitter, &prompt).await {
            Ok(()) => Outcome::Succeeded,
            Err(err) => Outcome::Failed(image::failure_message(&err)),
        }
    }

    fn apply(outcome: Outcome, body: &mut RequestBody) {
        match outcome {
            Outcome::NotTriggered => {}
            Outcome::Succeeded => body.push_assistant(""),
            Outcome::Failed(message) => body.push_assistant(message),
        }
    }
}

#[async_trait]
impl MessageFilter for AutoImageFilter {
    async fn inlet(
        &self,
        body: &mut RequestBody,
        _user: Option<&Value>,
        sink: Option<Arc<dyn EventSink>>,
    ) {
        let emitter = EventEmitter::new(sink);
        let outcome = self.generate(body, &emitter).await;
        debug!(?outcome, "inlet finished");
        Self::apply(outcome, body);
    }
}
