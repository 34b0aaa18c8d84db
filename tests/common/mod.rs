#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use autodraw::config::{
    FilterConfig, ImageServiceConfig, PromptServiceConfig, RetryConfig, TriggerConfig,
};
use autodraw::events::Event;
use autodraw::interfaces::events::EventSink;
use autodraw::message::{Message, RequestBody};

/// Captures every event the filter emits so tests can assert on the exact
/// sequence the host UI would see.
#[derive(Default)]
pub struct RecordingSink {
    events: Mutex<Vec<Event>>,
}

impl RecordingSink {
    pub fn arc() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn events(&self) -> Vec<Event> {
        self.events.lock().unwrap().clone()
    }

    pub fn messages(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                Event::Message { content } => Some(content),
                Event::Status { .. } => None,
            })
            .collect()
    }
}

#[async_trait]
impl EventSink for RecordingSink {
    async fn notify(&self, event: Event) {
        self.events.lock().unwrap().push(event);
    }
}

/// Config pointed at the mock servers, with retry pauses removed so failing
/// attempts run back to back.
pub fn test_config(prompt_url: String, image_url: String) -> FilterConfig {
    FilterConfig {
        prompt: PromptServiceConfig {
            url: prompt_url,
            model: "llama3".to_string(),
            timeout_secs: 2,
        },
        image: ImageServiceConfig {
            url: image_url,
            timeout_secs: 2,
            height: 512,
            width: 512,
            num_inference_steps: 3,
            guidance_scale: 0.0,
        },
        retry: RetryConfig {
            max_attempts: 2,
            base_delay_ms: 0,
            timeout_delay_ms: 0,
        },
        triggers: TriggerConfig::default(),
    }
}

pub fn body_with(content: &str) -> RequestBody {
    let mut body = RequestBody::default();
    body.messages.push(Message::user(content));
    body.extra
        .insert("stream".to_string(), serde_json::json!(true));
    body
}
