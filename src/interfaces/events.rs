use async_trait::async_trait;

use crate::events::Event;

/// Capability the host hands in for surfacing progress to its UI.
#[async_trait]
pub trait EventSink: Send + Sync {
    async fn notify(&self, event: Event);
}

/// Sink that drops everything. Stands in when the host passes no emitter.
pub struct NoopSink;

#[async_trait]
impl EventSink for NoopSink {
    async fn notify(&self, _event: Event) {}
}
