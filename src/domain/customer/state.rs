use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::event_sourcing::core::{Aggregate, DomainEvent};
use super::commands::CustomerCommand;
use super::decisions;
use super::errors::CustomerError;
use super::events::{CustomerEvent, CustomerRegistered};
use super::value_objects::{ConfirmationHash, CustomerId, EmailAddress, PersonName};

// ============================================================================
// Customer State - Derived From the Event Stream
// ============================================================================
//
// Fields are public for reading. Only the fold, which must start with
// CustomerRegistered, should produce a state.
//
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerState {
    pub customer_id: CustomerId,
    pub name: PersonName,
    pub email_address: EmailAddress,
    /// Hash that validates the pending confirmation of `email_address`
    pub confirmation_hash: ConfirmationHash,
    pub is_email_address_confirmed: bool,
    pub version: i64,
}

impl CustomerState {
    /// Replay a customer's history, oldest event first.
    pub fn reconstitute(events: &[CustomerEvent]) -> Result<Self, CustomerError> {
        Self::current("reconstitute", events)
    }

    /// Replay `events`, reporting an empty history as missing for `operation`.
    pub(crate) fn current(operation: &'static str, events: &[CustomerEvent]) -> Result<Self, CustomerError> {
        Self::replay(events)?.ok_or(CustomerError::AggregateNotFound { operation })
    }

    fn registered(event: &CustomerRegistered, version: i64) -> Self {
        Self {
            customer_id: event.customer_id,
            name: event.name.clone(),
            email_address: event.email_address.clone(),
            confirmation_hash: event.confirmation_hash.clone(),
            is_email_address_confirmed: false,
            version,
        }
    }
}

impl Aggregate for CustomerState {
    type Event = CustomerEvent;
    type Command = CustomerCommand;
    type Error = CustomerError;

    fn apply_first_event(event: &Self::Event) -> Result<Self, Self::Error> {
        match event {
            CustomerEvent::Registered(e) => Ok(Self::registered(e, 1)),
            other => Err(CustomerError::UnexpectedEvent { event_type: other.name() }),
        }
    }

    fn apply_event(self, event: &Self::Event) -> Result<Self, Self::Error> {
        let version = self.version + 1;

        let next = match event {
            CustomerEvent::Registered(e) => Self::registered(e, version),
            CustomerEvent::EmailAddressConfirmed(_) => Self {
                is_email_address_confirmed: true,
                version,
                ..self
            },
            // A failed attempt is a recorded fact, not a state change
            CustomerEvent::EmailAddressConfirmationFailed(_) => Self { version, ..self },
            CustomerEvent::EmailAddressChanged(e) => Self {
                email_address: e.email_address.clone(),
                confirmation_hash: e.confirmation_hash.clone(),
                is_email_address_confirmed: false,
                version,
                ..self
            },
            CustomerEvent::NameChanged(e) => Self {
                name: e.name.clone(),
                version,
                ..self
            },
        };

        Ok(next)
    }

    fn handle_command(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error> {
        let event = match command {
            CustomerCommand::Register(_) => {
                return Err(CustomerError::AlreadyRegistered { customer_id: self.customer_id });
            }
            CustomerCommand::ConfirmEmailAddress(c) => decisions::confirm_email_address(self, c)?,
            CustomerCommand::ChangeEmailAddress(c) => decisions::change_email_address(self, c)?,
            CustomerCommand::ChangeName(c) => decisions::change_name(self, c)?,
        };

        Ok(event.into_iter().collect())
    }

    fn aggregate_id(&self) -> Uuid {
        self.customer_id.as_uuid()
    }

    fn version(&self) -> i64 {
        self.version
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::customer::events::*;

    struct History {
        customer_id: CustomerId,
        events: Vec<CustomerEvent>,
    }

    impl History {
        fn registered() -> Self {
            let customer_id = CustomerId::generate();
            Self {
                customer_id,
                events: vec![CustomerEvent::Registered(CustomerRegistered {
                    customer_id,
                    email_address: EmailAddress::build("john@doe.com"),
                    confirmation_hash: ConfirmationHash::build("h1"),
                    name: PersonName::build("John", "Doe"),
                })],
            }
        }

        fn confirmed(mut self) -> Self {
            self.events.push(CustomerEvent::EmailAddressConfirmed(CustomerEmailAddressConfirmed {
                customer_id: self.customer_id,
            }));
            self
        }

        fn failed(mut self) -> Self {
            self.events.push(CustomerEvent::EmailAddressConfirmationFailed(
                CustomerEmailAddressConfirmationFailed { customer_id: self.customer_id },
            ));
            self
        }

        fn changed(mut self, email: &str, hash: &str) -> Self {
            self.events.push(CustomerEvent::EmailAddressChanged(CustomerEmailAddressChanged {
                customer_id: self.customer_id,
                email_address: EmailAddress::build(email),
                confirmation_hash: ConfirmationHash::build(hash),
            }));
            self
        }

        fn state(&self) -> CustomerState {
            CustomerState::reconstitute(&self.events).unwrap()
        }
    }

    #[test]
    fn test_empty_history_is_not_found() {
        let err = CustomerState::reconstitute(&[]).unwrap_err();
        assert_eq!(err, CustomerError::AggregateNotFound { operation: "reconstitute" });
    }

    #[test]
    fn test_registration_starts_unconfirmed() {
        let history = History::registered();
        let state = history.state();

        assert_eq!(state.customer_id, history.customer_id);
        assert_eq!(state.email_address.as_str(), "john@doe.com");
        assert_eq!(state.confirmation_hash.as_str(), "h1");
        assert_eq!(state.name, PersonName::build("John", "Doe"));
        assert!(!state.is_email_address_confirmed);
        assert_eq!(state.version, 1);
    }

    #[test]
    fn test_confirmation_keeps_hash() {
        let state = History::registered().confirmed().state();
        assert!(state.is_email_address_confirmed);
        assert_eq!(state.confirmation_hash.as_str(), "h1");
    }

    #[test]
    fn test_failed_confirmation_changes_nothing_but_version() {
        let history = History::registered().confirmed().failed();
        let before = CustomerState::reconstitute(&history.events[..2]).unwrap();
        let after = history.state();

        assert_eq!(after, CustomerState { version: before.version + 1, ..before });
    }

    #[test]
    fn test_email_change_resets_confirmation() {
        let state = History::registered()
            .confirmed()
            .changed("john+changed@doe.com", "h2")
            .state();

        assert_eq!(state.email_address.as_str(), "john+changed@doe.com");
        assert_eq!(state.confirmation_hash.as_str(), "h2");
        assert!(!state.is_email_address_confirmed);
        assert_eq!(state.version, 3);
    }

    #[test]
    fn test_confirmed_only_after_latest_change() {
        let state = History::registered()
            .changed("a@doe.com", "h2")
            .confirmed()
            .changed("b@doe.com", "h3")
            .state();
        assert!(!state.is_email_address_confirmed);

        let history = History::registered().changed("a@doe.com", "h2").confirmed();
        assert!(history.state().is_email_address_confirmed);
    }

    #[test]
    fn test_name_change_only_touches_name() {
        let mut history = History::registered().confirmed();
        history.events.push(CustomerEvent::NameChanged(CustomerNameChanged {
            customer_id: history.customer_id,
            name: PersonName::build("Jane", "Doe"),
        }));

        let state = history.state();
        assert_eq!(state.name, PersonName::build("Jane", "Doe"));
        assert!(state.is_email_address_confirmed);
        assert_eq!(state.email_address.as_str(), "john@doe.com");
    }

    #[test]
    fn test_replay_is_deterministic() {
        let history = History::registered().confirmed().failed().changed("x@doe.com", "h9");
        assert_eq!(history.state(), history.state());
    }

    #[test]
    fn test_incremental_fold_matches_full_replay() {
        let history = History::registered()
            .confirmed()
            .changed("x@doe.com", "h2")
            .failed()
            .confirmed();

        let (first, rest) = history.events.split_first().unwrap();
        let incremental = rest
            .iter()
            .try_fold(CustomerState::apply_first_event(first).unwrap(), |state, event| state.apply_event(event))
            .unwrap();

        assert_eq!(incremental, history.state());
    }

    #[test]
    fn test_history_must_start_with_registration() {
        let customer_id = CustomerId::generate();
        let events = vec![CustomerEvent::EmailAddressConfirmed(CustomerEmailAddressConfirmed { customer_id })];

        let err = CustomerState::reconstitute(&events).unwrap_err();
        assert_eq!(
            err,
            CustomerError::UnexpectedEvent { event_type: "CustomerEmailAddressConfirmed" }
        );
    }

    #[test]
    fn test_register_against_existing_state_is_rejected() {
        let state = History::registered().state();
        let command = CustomerCommand::Register(crate::domain::customer::RegisterCustomer::build(
            "john@doe.com",
            "John",
            "Doe",
        ));

        let err = state.handle_command(&command).unwrap_err();
        assert_eq!(err, CustomerError::AlreadyRegistered { customer_id: state.customer_id });
    }

    mod properties {
        use super::*;
        use crate::domain::customer::strategies::history;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn folding_from_any_prefix_matches_full_replay(events in history()) {
                let full = CustomerState::reconstitute(&events).unwrap();
                prop_assert_eq!(full.version, events.len() as i64);

                for split in 1..=events.len() {
                    let prefix = CustomerState::reconstitute(&events[..split]).unwrap();
                    let folded = events[split..]
                        .iter()
                        .try_fold(prefix, |state, event| state.apply_event(event))
                        .unwrap();
                    prop_assert_eq!(&folded, &full);
                }
            }

            #[test]
            fn replay_is_deterministic_for_any_history(events in history()) {
                prop_assert_eq!(
                    CustomerState::reconstitute(&events),
                    CustomerState::reconstitute(&events)
                );
            }
        }
    }
}
