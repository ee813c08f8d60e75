// ============================================================================
// Event Sourcing Store - Persistence Port
// ============================================================================
//
// The store is an external collaborator. This module defines the port the
// application layer talks to and an in-memory adapter for demos and tests.
//
// ============================================================================

pub mod event_store;

pub use event_store::{EventStore, EventStoreError, InMemoryEventStore};
