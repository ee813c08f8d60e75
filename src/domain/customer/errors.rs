use super::value_objects::CustomerId;

// ============================================================================
// Customer Errors
// ============================================================================
//
// Only malformed input and missing aggregates are errors. A wrong
// confirmation hash or a no-op command is an ordinary outcome.
//
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CustomerError {
    #[error("{operation}: required field `{field}` is empty")]
    InvalidInput {
        operation: &'static str,
        field: &'static str,
    },

    #[error("{operation}: customer not found")]
    AggregateNotFound { operation: &'static str },

    #[error("Customer {customer_id} is already registered")]
    AlreadyRegistered { customer_id: CustomerId },

    #[error("{event_type} cannot start a customer history")]
    UnexpectedEvent { event_type: &'static str },
}

impl CustomerError {
    /// Fails with `InvalidInput` when `value_is_empty` holds.
    pub(crate) fn require(
        operation: &'static str,
        field: &'static str,
        value_is_empty: bool,
    ) -> Result<(), CustomerError> {
        if value_is_empty {
            return Err(CustomerError::InvalidInput { operation, field });
        }
        Ok(())
    }
}
