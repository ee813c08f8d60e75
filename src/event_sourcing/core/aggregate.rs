use uuid::Uuid;
use super::event::EventEnvelope;

// ============================================================================
// Aggregate Root Pattern - Event Sourcing Core
// ============================================================================
//
// 1. State is derived from events, never stored directly
// 2. Commands are checked against state before any event is produced
// 3. Events are facts; replaying the same stream yields the same state
// 4. Applying an event consumes the old state and returns the next one
//
// ============================================================================

/// Generic Aggregate trait - all event-sourced aggregates implement this
///
/// Type Parameters:
/// - `Event`: The domain event type for this aggregate
/// - `Command`: The command type for this aggregate
/// - `Error`: The error type for business rule violations
pub trait Aggregate: Sized + Send + Sync {
    type Event;
    type Command;
    type Error;

    /// Create the aggregate from the first event of its stream
    fn apply_first_event(event: &Self::Event) -> Result<Self, Self::Error>;

    /// Fold one subsequent event into the state
    fn apply_event(self, event: &Self::Event) -> Result<Self, Self::Error>;

    /// Decide which events a command produces against the current state
    fn handle_command(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error>;

    fn aggregate_id(&self) -> Uuid;

    /// Number of events folded into this state
    fn version(&self) -> i64;

    /// Replay an ordered event sequence (oldest first).
    ///
    /// Returns `Ok(None)` for an empty sequence: there is no aggregate yet.
    fn replay<'a, I>(events: I) -> Result<Option<Self>, Self::Error>
    where
        I: IntoIterator<Item = &'a Self::Event>,
        Self::Event: 'a,
    {
        let mut events = events.into_iter();
        let Some(first) = events.next() else {
            return Ok(None);
        };

        let aggregate = Self::apply_first_event(first)?;
        events
            .try_fold(aggregate, |aggregate, event| aggregate.apply_event(event))
            .map(Some)
    }

    /// Load aggregate from stored envelopes
    fn load_from_events(events: &[EventEnvelope<Self::Event>]) -> Result<Option<Self>, Self::Error> {
        Self::replay(events.iter().map(|envelope| &envelope.event_data))
    }
}
