use serde::{Deserialize, Serialize};
use uuid::Uuid;
use crate::event_sourcing::core::DomainEvent;
use super::value_objects::{ConfirmationHash, CustomerId, EmailAddress, PersonName};

// ============================================================================
// Customer Domain Events
// ============================================================================

/// Union type for all customer events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum CustomerEvent {
    Registered(CustomerRegistered),
    EmailAddressConfirmed(CustomerEmailAddressConfirmed),
    EmailAddressConfirmationFailed(CustomerEmailAddressConfirmationFailed),
    EmailAddressChanged(CustomerEmailAddressChanged),
    NameChanged(CustomerNameChanged),
}

impl CustomerEvent {
    pub fn customer_id(&self) -> CustomerId {
        match self {
            CustomerEvent::Registered(e) => e.customer_id,
            CustomerEvent::EmailAddressConfirmed(e) => e.customer_id,
            CustomerEvent::EmailAddressConfirmationFailed(e) => e.customer_id,
            CustomerEvent::EmailAddressChanged(e) => e.customer_id,
            CustomerEvent::NameChanged(e) => e.customer_id,
        }
    }
}

impl DomainEvent for CustomerEvent {
    fn event_type() -> &'static str {
        "CustomerEvent"
    }

    fn name(&self) -> &'static str {
        match self {
            CustomerEvent::Registered(_) => "CustomerRegistered",
            CustomerEvent::EmailAddressConfirmed(_) => "CustomerEmailAddressConfirmed",
            CustomerEvent::EmailAddressConfirmationFailed(_) => "CustomerEmailAddressConfirmationFailed",
            CustomerEvent::EmailAddressChanged(_) => "CustomerEmailAddressChanged",
            CustomerEvent::NameChanged(_) => "CustomerNameChanged",
        }
    }

    fn aggregate_id(&self) -> Uuid {
        self.customer_id().as_uuid()
    }
}

// Individual event types

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerRegistered {
    pub customer_id: CustomerId,
    pub email_address: EmailAddress,
    pub confirmation_hash: ConfirmationHash,
    pub name: PersonName,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerEmailAddressConfirmed {
    pub customer_id: CustomerId,
}

/// Recorded when a confirmation attempt presents the wrong hash.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerEmailAddressConfirmationFailed {
    pub customer_id: CustomerId,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerEmailAddressChanged {
    pub customer_id: CustomerId,
    pub email_address: EmailAddress,
    pub confirmation_hash: ConfirmationHash,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerNameChanged {
    pub customer_id: CustomerId,
    pub name: PersonName,
}

impl From<CustomerRegistered> for CustomerEvent {
    fn from(event: CustomerRegistered) -> Self {
        CustomerEvent::Registered(event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event_sourcing::core::{deserialize_event, serialize_event};

    #[test]
    fn test_event_names_and_ids() {
        let customer_id = CustomerId::generate();
        let event = CustomerEvent::EmailAddressConfirmationFailed(CustomerEmailAddressConfirmationFailed {
            customer_id,
        });

        assert_eq!(event.name(), "CustomerEmailAddressConfirmationFailed");
        assert_eq!(event.customer_id(), customer_id);
        assert_eq!(DomainEvent::aggregate_id(&event), customer_id.as_uuid());
        assert_eq!(CustomerEvent::event_type(), "CustomerEvent");
    }

    #[test]
    fn test_serialized_shape_is_tagged() {
        let customer_id = CustomerId::generate();
        let event = CustomerEvent::EmailAddressChanged(CustomerEmailAddressChanged {
            customer_id,
            email_address: EmailAddress::build("john+changed@doe.com"),
            confirmation_hash: ConfirmationHash::build("h2"),
        });

        let json = serialize_event(&event).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["type"], "EmailAddressChanged");
        assert_eq!(value["data"]["email_address"], "john+changed@doe.com");
        assert_eq!(value["data"]["confirmation_hash"], "h2");

        let back: CustomerEvent = deserialize_event(&json).unwrap();
        assert_eq!(back, event);
    }
}
