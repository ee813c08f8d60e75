//! Generators for arbitrary customer histories.
//!
//! A history is one `CustomerRegistered` followed by any mix of confirmed,
//! failed, email changed and name changed events. Hashes are drawn from
//! `[a-f0-9]`, so [`foreign_hash`] never matches one on record.

use proptest::prelude::*;
use uuid::Uuid;

use super::events::*;
use super::value_objects::{ConfirmationHash, CustomerId, EmailAddress, PersonName};

#[derive(Debug, Clone)]
enum Step {
    Confirm,
    Fail,
    ChangeEmail(String, String),
    Rename(String, String),
}

fn email() -> impl Strategy<Value = String> {
    "[a-z]{1,8}(\\+[a-z]{1,4})?@[a-z]{1,6}\\.com"
}

fn hash() -> impl Strategy<Value = String> {
    "[a-f0-9]{8,16}"
}

fn name_part() -> impl Strategy<Value = String> {
    "[A-Z][a-z]{0,7}"
}

/// Non-empty hash that cannot collide with any hash in a generated history
pub(crate) fn foreign_hash() -> impl Strategy<Value = String> {
    "[g-z]{1,16}"
}

fn step() -> impl Strategy<Value = Step> {
    prop_oneof![
        Just(Step::Confirm),
        Just(Step::Fail),
        (email(), hash()).prop_map(|(email, hash)| Step::ChangeEmail(email, hash)),
        (name_part(), name_part()).prop_map(|(given, family)| Step::Rename(given, family)),
    ]
}

pub(crate) fn history() -> impl Strategy<Value = Vec<CustomerEvent>> {
    (
        any::<u128>(),
        email(),
        hash(),
        (name_part(), name_part()),
        prop::collection::vec(step(), 0..16),
    )
        .prop_map(|(id, email, hash, (given, family), steps)| {
            let customer_id = CustomerId(Uuid::from_u128(id));
            let mut events = vec![CustomerEvent::Registered(CustomerRegistered {
                customer_id,
                email_address: EmailAddress::build(email),
                confirmation_hash: ConfirmationHash::build(hash),
                name: PersonName::build(given, family),
            })];

            events.extend(steps.into_iter().map(|step| match step {
                Step::Confirm => CustomerEvent::EmailAddressConfirmed(CustomerEmailAddressConfirmed {
                    customer_id,
                }),
                Step::Fail => CustomerEvent::EmailAddressConfirmationFailed(
                    CustomerEmailAddressConfirmationFailed { customer_id },
                ),
                Step::ChangeEmail(email, hash) => {
                    CustomerEvent::EmailAddressChanged(CustomerEmailAddressChanged {
                        customer_id,
                        email_address: EmailAddress::build(email),
                        confirmation_hash: ConfirmationHash::build(hash),
                    })
                }
                Step::Rename(given, family) => CustomerEvent::NameChanged(CustomerNameChanged {
                    customer_id,
                    name: PersonName::build(given, family),
                }),
            }));

            events
        })
}
