use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::interfaces::events::EventSink;
use crate::message::RequestBody;

/// Host integration surface: the pre-model and post-model hooks of the chat
/// runtime. Implementations mutate the body in place; nothing here is
/// allowed to fail the host's message flow.
#[async_trait]
pub trait MessageFilter: Send + Sync {
    /// Runs before the message list reaches the model.
    async fn inlet(
        &self,
        body: &mut RequestBody,
        user: Option<&Value>,
        sink: Option<Arc<dyn EventSink>>,
    );

    /// Runs on the model's own response. Identity unless overridden.
    async fn outlet(
        &self,
        _body: &mut RequestBody,
        _user: Option<&Value>,
        _sink: Option<Arc<dyn EventSink>>,
    ) {
    }
}
