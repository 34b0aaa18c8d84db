use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::interfaces::events::EventSink;

/// Progress or result notification for the host UI, distinct from the
/// conversation message list. Wire shape is `{"type": ..., "data": {...}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "lowercase")]
pub enum Event {
    Status { description: String, done: bool },
    Message { content: String },
}

impl Event {
    pub fn status(description: impl Into<String>, done: bool) -> Self {
        Self::Status {
            description: description.into(),
            done,
        }
    }

    pub fn message(content: impl Into<String>) -> Self {
        Self::Message {
            content: content.into(),
        }
    }
}

/// Forwards events to the host-supplied sink. Without a sink every emission
/// is a no-op, so the pipeline never fails on reporting.
#[derive(Clone, Default)]
pub struct EventEmitter {
    sink: Option<Arc<dyn EventSink>>,
}

impl EventEmitter {
    pub fn new(sink: Option<Arc<dyn EventSink>>) -> Self {
        Self { sink }
    }

    pub async fn status(&self, description: &str, done: bool) {
        self.notify(Event::status(description, done)).await;
    }

    pub async fn message(&self, content: impl Into<String>) {
        self.notify(Event::message(content)).await;
    }

    async fn notify(&self, event: Event) {
        if let Some(sink) = &self.sink {
            sink.notify(event).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn serializes_to_the_host_wire_shape() {
        let event = Event::status("🎨 Генерация изображения", false);
        assert_eq!(
            serde_json::to_value(&event).unwrap(),
            json!({
                "type": "status",
                "data": {"description": "🎨 Генерация изображения", "done": false}
            })
        );

        let event = Event::message("![Generated Image](data:image/png;base64,AAAA)");
        assert_eq!(
            serde_json::to_value(&event).unwrap(),
            json!({
                "type": "message",
                "data": {"content": "![Generated Image](data:image/png;base64,AAAA)"}
            })
        );
    }

    #[tokio::test]
    async fn missing_sink_is_a_no_op() {
        let emitter = EventEmitter::default();
        emitter.status("☝️ Запрос на генерацию изображения...", false).await;
        emitter.message("ignored").await;
    }
}
