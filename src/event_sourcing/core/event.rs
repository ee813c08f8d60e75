use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use std::collections::HashMap;

// ============================================================================
// Event Envelope - Metadata Around a Domain Event
// ============================================================================
//
// Wraps a domain event with the identity, ordering and tracing data an
// event store needs. The payload itself stays a plain immutable value.
//
// ============================================================================

/// Generic Event Envelope - wraps any domain event with metadata
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct EventEnvelope<E> {
    // Event Identity
    pub event_id: Uuid,
    pub aggregate_id: Uuid,
    pub sequence_number: i64,

    // Event Type Information
    pub event_type: String,
    pub event_version: i32,

    // Event Payload
    pub event_data: E,

    // Causation & Correlation
    pub causation_id: Option<Uuid>,
    pub correlation_id: Uuid,

    // Actor Information
    pub user_id: Option<Uuid>,

    pub timestamp: DateTime<Utc>,

    pub metadata: HashMap<String, String>,
}

impl<E: DomainEvent> EventEnvelope<E> {
    /// Wrap `event_data` at position `sequence_number` of the aggregate's stream.
    ///
    /// The event type is taken from the event itself so the envelope can
    /// never disagree with its payload.
    pub fn new(
        aggregate_id: Uuid,
        sequence_number: i64,
        event_data: E,
        correlation_id: Uuid,
    ) -> Self {
        Self {
            event_id: Uuid::now_v7(),
            aggregate_id,
            sequence_number,
            event_type: event_data.name().to_string(),
            event_version: E::event_version(),
            event_data,
            causation_id: None,
            correlation_id,
            user_id: None,
            timestamp: Utc::now(),
            metadata: HashMap::new(),
        }
    }
}

impl<E> EventEnvelope<E> {
    pub fn with_user(mut self, user_id: Uuid) -> Self {
        self.user_id = Some(user_id);
        self
    }

    pub fn with_causation(mut self, causation_id: Uuid) -> Self {
        self.causation_id = Some(causation_id);
        self
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}

// ============================================================================
// Domain Event Trait
// ============================================================================

/// Implemented by the event union of every event-sourced aggregate.
pub trait DomainEvent: Serialize + for<'de> Deserialize<'de> + Clone + Send + Sync {
    /// Stream-level type name, e.g. "CustomerEvent"
    fn event_type() -> &'static str where Self: Sized;

    /// Schema version of the serialized payload
    fn event_version() -> i32 where Self: Sized { 1 }

    /// Name of the concrete fact this value records, e.g. "CustomerRegistered"
    fn name(&self) -> &'static str;

    /// Identity of the aggregate the event belongs to
    fn aggregate_id(&self) -> Uuid;
}

// ============================================================================
// Event Serialization Helpers
// ============================================================================

pub fn serialize_event<E: Serialize>(event: &E) -> serde_json::Result<String> {
    serde_json::to_string(event)
}

pub fn deserialize_event<E: for<'de> Deserialize<'de>>(json: &str) -> serde_json::Result<E> {
    serde_json::from_str(json)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
    struct Pinged {
        target: Uuid,
        note: String,
    }

    impl DomainEvent for Pinged {
        fn event_type() -> &'static str { "PingEvent" }
        fn event_version() -> i32 { 3 }
        fn name(&self) -> &'static str { "Pinged" }
        fn aggregate_id(&self) -> Uuid { self.target }
    }

    #[test]
    fn test_envelope_takes_type_and_version_from_event() {
        let target = Uuid::new_v4();
        let correlation_id = Uuid::new_v4();

        let envelope = EventEnvelope::new(
            target,
            7,
            Pinged { target, note: "hello".to_string() },
            correlation_id,
        );

        assert_eq!(envelope.aggregate_id, target);
        assert_eq!(envelope.sequence_number, 7);
        assert_eq!(envelope.event_type, "Pinged");
        assert_eq!(envelope.event_version, 3);
        assert_eq!(envelope.correlation_id, correlation_id);
        assert!(envelope.causation_id.is_none());
        assert!(envelope.metadata.is_empty());
    }

    #[test]
    fn test_envelope_builders() {
        let target = Uuid::new_v4();
        let user = Uuid::new_v4();
        let cause = Uuid::new_v4();

        let envelope = EventEnvelope::new(target, 1, Pinged { target, note: String::new() }, Uuid::new_v4())
            .with_user(user)
            .with_causation(cause)
            .with_metadata("source", "signup-form");

        assert_eq!(envelope.user_id, Some(user));
        assert_eq!(envelope.causation_id, Some(cause));
        assert_eq!(envelope.metadata.get("source").map(String::as_str), Some("signup-form"));
    }

    #[test]
    fn test_event_json_helpers() {
        let target = Uuid::new_v4();
        let event = Pinged { target, note: "payload".to_string() };

        let json = serialize_event(&event).unwrap();
        assert!(json.contains("payload"));

        let back: Pinged = deserialize_event(&json).unwrap();
        assert_eq!(back, event);
        assert!(deserialize_event::<Pinged>("{\"note\":1}").is_err());
    }
}
