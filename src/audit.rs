use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::{
    error::StoreError,
    models::{AuditEntry, EventId, EventType},
};

/// AuditSink
///
/// Append-only log of security-relevant events. This crate only appends; storage,
/// retention and querying belong to whoever implements the sink.
#[async_trait]
pub trait AuditSink: Send + Sync {
    async fn append(
        &self,
        event_type: EventType,
        event_id: EventId,
        message: &str,
    ) -> Result<(), StoreError>;
}

/// AuditState
///
/// Shared handle to the configured sink.
pub type AuditState = Arc<dyn AuditSink>;

/// TracingAuditSink
///
/// Emits each entry as a structured `tracing` event on the `audit` target, leaving
/// collection to the subscriber (JSON in production). Never fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingAuditSink;

#[async_trait]
impl AuditSink for TracingAuditSink {
    async fn append(
        &self,
        event_type: EventType,
        event_id: EventId,
        message: &str,
    ) -> Result<(), StoreError> {
        tracing::info!(
            target: "audit",
            event_type = %event_type,
            event_id = event_id.code(),
            "{}",
            message
        );
        Ok(())
    }
}

/// MemoryAuditSink
///
/// Keeps every appended entry in memory. Used by tests to assert on audit output.
#[derive(Default)]
pub struct MemoryAuditSink {
    entries: Mutex<Vec<AuditEntry>>,
}

impl MemoryAuditSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything appended so far, oldest first.
    pub async fn entries(&self) -> Vec<AuditEntry> {
        self.entries.lock().await.clone()
    }
}

#[async_trait]
impl AuditSink for MemoryAuditSink {
    async fn append(
        &self,
        event_type: EventType,
        event_id: EventId,
        message: &str,
    ) -> Result<(), StoreError> {
        self.entries.lock().await.push(AuditEntry {
            event_type,
            event_id,
            message: message.to_string(),
            recorded_at: Utc::now(),
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn memory_sink_keeps_order() {
        let sink = MemoryAuditSink::new();
        sink.append(EventType::Content, EventId::MenuCreated, "first")
            .await
            .unwrap();
        sink.append(EventType::Content, EventId::MenuUpdated, "second")
            .await
            .unwrap();

        let entries = sink.entries().await;
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].message, "first");
        assert_eq!(entries[1].event_id, EventId::MenuUpdated);
    }

    #[tokio::test]
    async fn tracing_sink_never_fails() {
        let sink = TracingAuditSink;
        assert!(
            sink.append(EventType::Settings, EventId::SettingsAccountCreated, "x")
                .await
                .is_ok()
        );
    }
}
