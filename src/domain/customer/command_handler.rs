use std::sync::Arc;
use std::time::Instant;
use uuid::Uuid;

use crate::event_sourcing::core::{Aggregate, DomainEvent, EventEnvelope};
use crate::event_sourcing::store::{EventStore, EventStoreError};
use crate::metrics::{CommandOutcomeLabel, Metrics};
use crate::utils::{retry_on_transient, IsTransient, RetryConfig};

use super::commands::CustomerCommand;
use super::decisions;
use super::errors::CustomerError;
use super::events::CustomerEvent;
use super::state::CustomerState;
use super::value_objects::CustomerId;

// ============================================================================
// Customer Command Handler
// ============================================================================
//
// Orchestrates: Event Store → Reconstitute → Decide → Event Store
//
// The loaded version is the expected version of the append, so a decision
// computed against a stale history is rejected by the store and recomputed.
//
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum CommandHandlerError {
    #[error(transparent)]
    Customer(#[from] CustomerError),

    #[error(transparent)]
    Store(#[from] EventStoreError),
}

impl IsTransient for CommandHandlerError {
    fn is_transient(&self) -> bool {
        matches!(self, CommandHandlerError::Store(EventStoreError::ConcurrencyConflict { .. }))
    }
}

/// What a successfully handled command did
#[derive(Debug, Clone, PartialEq)]
pub struct CommandOutcome {
    pub customer_id: CustomerId,
    /// Events appended by this command; empty for an idempotent no-op
    pub events: Vec<CustomerEvent>,
    /// Stream version after the command
    pub version: i64,
}

impl CommandOutcome {
    pub fn is_noop(&self) -> bool {
        self.events.is_empty()
    }
}

pub struct CustomerCommandHandler<S> {
    event_store: Arc<S>,
    retry: RetryConfig,
    metrics: Option<Arc<Metrics>>,
}

impl<S: EventStore<CustomerEvent>> CustomerCommandHandler<S> {
    pub fn new(event_store: Arc<S>) -> Self {
        Self {
            event_store,
            retry: RetryConfig::default(),
            metrics: None,
        }
    }

    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_metrics(mut self, metrics: Arc<Metrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Load the customer's current state, if it has been registered
    pub async fn load(&self, customer_id: CustomerId) -> Result<Option<CustomerState>, CommandHandlerError> {
        let history = self.event_store.load_events(customer_id.as_uuid()).await?;
        Ok(CustomerState::load_from_events(&history)?)
    }

    /// Handle a command and persist resulting events
    pub async fn handle(
        &self,
        command: CustomerCommand,
        correlation_id: Uuid,
    ) -> Result<CommandOutcome, CommandHandlerError> {
        let started = Instant::now();
        let operation = command.operation();
        let command = &command;

        let result = retry_on_transient(self.retry.clone(), move |attempt| {
            self.try_handle(command, correlation_id, attempt)
        })
        .await
        .into_result();

        let label = match &result {
            Ok(outcome) if outcome.is_noop() => CommandOutcomeLabel::Noop,
            Ok(_) => CommandOutcomeLabel::Applied,
            Err(error) => {
                tracing::warn!(
                    customer_id = %command.customer_id(),
                    command = operation,
                    error = %error,
                    "Command rejected"
                );
                CommandOutcomeLabel::Rejected
            }
        };

        if let Some(metrics) = &self.metrics {
            metrics.record_command(operation, label, started.elapsed().as_secs_f64());
        }

        result
    }

    async fn try_handle(
        &self,
        command: &CustomerCommand,
        correlation_id: Uuid,
        attempt: u32,
    ) -> Result<CommandOutcome, CommandHandlerError> {
        let customer_id = command.customer_id();
        let operation = command.operation();

        if attempt > 1 {
            if let Some(metrics) = &self.metrics {
                metrics.record_concurrency_retry(operation);
            }
        }

        let history = self.event_store.load_events(customer_id.as_uuid()).await?;
        let expected_version = history.last().map_or(0, |envelope| envelope.sequence_number);
        let state = CustomerState::load_from_events(&history)?;

        let events = match (&state, command) {
            (None, CustomerCommand::Register(register)) => {
                vec![CustomerEvent::Registered(decisions::register(register)?)]
            }
            (None, _) => return Err(CustomerError::AggregateNotFound { operation }.into()),
            (Some(state), command) => state.handle_command(command)?,
        };

        if events.is_empty() {
            tracing::debug!(
                customer_id = %customer_id,
                command = operation,
                version = expected_version,
                "Command produced no events"
            );
            return Ok(CommandOutcome {
                customer_id,
                events,
                version: expected_version,
            });
        }

        let envelopes: Vec<_> = events
            .iter()
            .cloned()
            .zip(expected_version + 1..)
            .map(|(event, sequence_number)| {
                EventEnvelope::new(customer_id.as_uuid(), sequence_number, event, correlation_id)
                    .with_metadata("command", operation)
            })
            .collect();

        let version = self
            .event_store
            .append_events(customer_id.as_uuid(), expected_version, envelopes)
            .await?;

        for event in &events {
            tracing::info!(
                customer_id = %customer_id,
                command = operation,
                event_type = event.name(),
                version = version,
                "Customer event recorded"
            );
            if let Some(metrics) = &self.metrics {
                metrics.record_event_appended(event.name());
            }
        }

        Ok(CommandOutcome {
            customer_id,
            events,
            version,
        })
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
