use super::commands::{
    ChangeCustomerEmailAddress, ChangeCustomerName, ConfirmCustomerEmailAddress, RegisterCustomer,
};
use super::errors::CustomerError;
use super::events::*;
use super::state::CustomerState;
use super::value_objects::CustomerId;

// ============================================================================
// Customer Decision Functions
// ============================================================================
//
// Pure functions from (state, command) to at most one new event. Inputs are
// checked before anything is produced; business outcomes such as a wrong
// confirmation hash or an unchanged address are returned as data.
//
// `state` must be the reconstitution of the addressed customer's own
// history: `command.customer_id == state.customer_id`. Debug builds assert it.
//
// ============================================================================

/// Registration consults no prior state.
pub fn register(command: &RegisterCustomer) -> Result<CustomerRegistered, CustomerError> {
    const OP: &str = "register";
    CustomerError::require(OP, "email_address", command.email_address.is_empty())?;
    CustomerError::require(OP, "confirmation_hash", command.confirmation_hash.is_empty())?;
    CustomerError::require(OP, "given_name", command.name.given_name.is_empty())?;
    CustomerError::require(OP, "family_name", command.name.family_name.is_empty())?;

    Ok(CustomerRegistered {
        customer_id: command.customer_id,
        email_address: command.email_address.clone(),
        confirmation_hash: command.confirmation_hash.clone(),
        name: command.name.clone(),
    })
}

/// A mismatching hash always yields a failure event, even once confirmed.
/// A matching hash on an already confirmed address yields nothing.
pub fn confirm_email_address(
    state: &CustomerState,
    command: &ConfirmCustomerEmailAddress,
) -> Result<Option<CustomerEvent>, CustomerError> {
    debug_assert_own_history(state, command.customer_id);
    CustomerError::require(
        "confirm_email_address",
        "confirmation_hash",
        command.confirmation_hash.is_empty(),
    )?;

    if command.confirmation_hash != state.confirmation_hash {
        return Ok(Some(CustomerEvent::EmailAddressConfirmationFailed(
            CustomerEmailAddressConfirmationFailed { customer_id: command.customer_id },
        )));
    }

    if state.is_email_address_confirmed {
        return Ok(None);
    }

    Ok(Some(CustomerEvent::EmailAddressConfirmed(CustomerEmailAddressConfirmed {
        customer_id: command.customer_id,
    })))
}

/// Setting the address already on record yields nothing; the command's
/// fresh hash is dropped in that case.
pub fn change_email_address(
    state: &CustomerState,
    command: &ChangeCustomerEmailAddress,
) -> Result<Option<CustomerEvent>, CustomerError> {
    const OP: &str = "change_email_address";
    debug_assert_own_history(state, command.customer_id);
    CustomerError::require(OP, "email_address", command.email_address.is_empty())?;
    CustomerError::require(OP, "confirmation_hash", command.confirmation_hash.is_empty())?;

    if command.email_address == state.email_address {
        return Ok(None);
    }

    Ok(Some(CustomerEvent::EmailAddressChanged(CustomerEmailAddressChanged {
        customer_id: command.customer_id,
        email_address: command.email_address.clone(),
        confirmation_hash: command.confirmation_hash.clone(),
    })))
}

pub fn change_name(
    state: &CustomerState,
    command: &ChangeCustomerName,
) -> Result<Option<CustomerEvent>, CustomerError> {
    const OP: &str = "change_name";
    debug_assert_own_history(state, command.customer_id);
    CustomerError::require(OP, "given_name", command.name.given_name.is_empty())?;
    CustomerError::require(OP, "family_name", command.name.family_name.is_empty())?;

    if command.name == state.name {
        return Ok(None);
    }

    Ok(Some(CustomerEvent::NameChanged(CustomerNameChanged {
        customer_id: command.customer_id,
        name: command.name.clone(),
    })))
}

fn debug_assert_own_history(state: &CustomerState, customer_id: CustomerId) {
    debug_assert_eq!(
        state.customer_id, customer_id,
        "decision for customer {} made against another customer's history",
        customer_id
    );
}

// History-based variants: reconstitute first, then decide.

pub fn confirm_email_address_from_history(
    history: &[CustomerEvent],
    command: &ConfirmCustomerEmailAddress,
) -> Result<Option<CustomerEvent>, CustomerError> {
    let state = CustomerState::current("confirm_email_address", history)?;
    confirm_email_address(&state, command)
}

pub fn change_email_address_from_history(
    history: &[CustomerEvent],
    command: &ChangeCustomerEmailAddress,
) -> Result<Option<CustomerEvent>, CustomerError> {
    let state = CustomerState::current("change_email_address", history)?;
    change_email_address(&state, command)
}

pub fn change_name_from_history(
    history: &[CustomerEvent],
    command: &ChangeCustomerName,
) -> Result<Option<CustomerEvent>, CustomerError> {
    let state = CustomerState::current("change_name", history)?;
    change_name(&state, command)
}

// ============================================================================
// Unit Tests
// ============================================================================
