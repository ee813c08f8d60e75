// ============================================================================
// Event Sourcing Core - Generic Infrastructure Abstractions
// ============================================================================
//
// Reusable building blocks that know nothing about customers:
// - Aggregate: fold events into state, decide events from commands
// - EventEnvelope / DomainEvent: event identity and metadata
//
// ============================================================================

pub mod aggregate;
pub mod event;

pub use aggregate::Aggregate;
pub use event::{DomainEvent, EventEnvelope, serialize_event, deserialize_event};
