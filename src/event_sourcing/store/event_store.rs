use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::marker::PhantomData;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::event_sourcing::core::{deserialize_event, serialize_event, DomainEvent, EventEnvelope};

// ============================================================================
// Event Store Port
// ============================================================================
//
// Responsibilities of any implementation:
// 1. Append events to a per-aggregate stream (append-only)
// 2. Load the stream back oldest first
// 3. Reject appends computed against a stale version
//
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum EventStoreError {
    #[error("Concurrency conflict on {aggregate_id}: expected version {expected}, but current is {actual}")]
    ConcurrencyConflict {
        aggregate_id: Uuid,
        expected: i64,
        actual: i64,
    },

    #[error("Cannot append empty event list to {aggregate_id}")]
    EmptyAppend { aggregate_id: Uuid },

    #[error("Event serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[async_trait]
pub trait EventStore<E: DomainEvent + 'static>: Send + Sync {
    /// Append events to an aggregate's stream.
    /// Returns the new version number after appending.
    async fn append_events(
        &self,
        aggregate_id: Uuid,
        expected_version: i64,
        events: Vec<EventEnvelope<E>>,
    ) -> Result<i64, EventStoreError>;

    /// Load all events for an aggregate, ordered by sequence number
    async fn load_events(&self, aggregate_id: Uuid) -> Result<Vec<EventEnvelope<E>>, EventStoreError>;

    /// Current version of an aggregate; 0 when the stream does not exist
    async fn get_current_version(&self, aggregate_id: Uuid) -> Result<i64, EventStoreError>;

    async fn aggregate_exists(&self, aggregate_id: Uuid) -> Result<bool, EventStoreError> {
        Ok(self.get_current_version(aggregate_id).await? > 0)
    }
}

// ============================================================================
// In-Memory Event Store
// ============================================================================

/// One row of a stream, payload kept as JSON like a real table would.
#[derive(Debug, Clone)]
struct StoredEvent {
    event_id: Uuid,
    sequence_number: i64,
    event_type: String,
    event_version: i32,
    event_data: String,
    causation_id: Option<Uuid>,
    correlation_id: Uuid,
    user_id: Option<Uuid>,
    timestamp: DateTime<Utc>,
    metadata: HashMap<String, String>,
}

/// Event store backed by a map of streams. Clones share the same streams.
pub struct InMemoryEventStore<E: DomainEvent> {
    streams: Arc<RwLock<HashMap<Uuid, Vec<StoredEvent>>>>,
    aggregate_type_name: String,
    _phantom: PhantomData<E>,
}

impl<E: DomainEvent> InMemoryEventStore<E> {
    pub fn new(aggregate_type_name: &str) -> Self {
        Self {
            streams: Arc::new(RwLock::new(HashMap::new())),
            aggregate_type_name: aggregate_type_name.to_string(),
            _phantom: PhantomData,
        }
    }

    pub fn aggregate_type_name(&self) -> &str {
        &self.aggregate_type_name
    }

    /// Number of streams currently held
    pub async fn stream_count(&self) -> usize {
        self.streams.read().await.len()
    }
}

impl<E: DomainEvent> Clone for InMemoryEventStore<E> {
    fn clone(&self) -> Self {
        Self {
            streams: Arc::clone(&self.streams),
            aggregate_type_name: self.aggregate_type_name.clone(),
            _phantom: PhantomData,
        }
    }
}

#[async_trait]
impl<E: DomainEvent + 'static> EventStore<E> for InMemoryEventStore<E> {
    async fn append_events(
        &self,
        aggregate_id: Uuid,
        expected_version: i64,
        events: Vec<EventEnvelope<E>>,
    ) -> Result<i64, EventStoreError> {
        if events.is_empty() {
            return Err(EventStoreError::EmptyAppend { aggregate_id });
        }

        // Serialize everything first so a failing payload appends nothing
        let mut rows = Vec::with_capacity(events.len());
        for envelope in &events {
            rows.push(StoredEvent {
                event_id: envelope.event_id,
                sequence_number: 0,
                event_type: envelope.event_type.clone(),
                event_version: envelope.event_version,
                event_data: serialize_event(&envelope.event_data)?,
                causation_id: envelope.causation_id,
                correlation_id: envelope.correlation_id,
                user_id: envelope.user_id,
                timestamp: envelope.timestamp,
                metadata: envelope.metadata.clone(),
            });
        }

        let mut streams = self.streams.write().await;
        let current_version = streams.get(&aggregate_id).map_or(0, |stream| stream.len() as i64);
        if current_version != expected_version {
            return Err(EventStoreError::ConcurrencyConflict {
                aggregate_id,
                expected: expected_version,
                actual: current_version,
            });
        }

        let stream = streams.entry(aggregate_id).or_default();
        let mut new_version = expected_version;
        for mut row in rows {
            new_version += 1;
            row.sequence_number = new_version;
            stream.push(row);
        }

        tracing::info!(
            aggregate_id = %aggregate_id,
            aggregate_type = %self.aggregate_type_name,
            new_version = new_version,
            event_count = events.len(),
            "Appended events to event store"
        );

        Ok(new_version)
    }

    async fn load_events(&self, aggregate_id: Uuid) -> Result<Vec<EventEnvelope<E>>, EventStoreError> {
        let streams = self.streams.read().await;
        let Some(stream) = streams.get(&aggregate_id) else {
            return Ok(Vec::new());
        };

        let mut events = Vec::with_capacity(stream.len());
        for row in stream {
            events.push(EventEnvelope {
                event_id: row.event_id,
                aggregate_id,
                sequence_number: row.sequence_number,
                event_type: row.event_type.clone(),
                event_version: row.event_version,
                event_data: deserialize_event(&row.event_data)?,
                causation_id: row.causation_id,
                correlation_id: row.correlation_id,
                user_id: row.user_id,
                timestamp: row.timestamp,
                metadata: row.metadata.clone(),
            });
        }

        tracing::debug!("Loaded {} events for aggregate {}", events.len(), aggregate_id);
        Ok(events)
    }

    async fn get_current_version(&self, aggregate_id: Uuid) -> Result<i64, EventStoreError> {
        let streams = self.streams.read().await;
        Ok(streams.get(&aggregate_id).map_or(0, |stream| stream.len() as i64))
    }
}
