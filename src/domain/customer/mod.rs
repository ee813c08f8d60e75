// ============================================================================
// Customer Domain - Business Logic for the Customer Aggregate
// ============================================================================
//
// - Value objects (CustomerId, EmailAddress, ConfirmationHash, PersonName)
// - Commands and events
// - State derived by replaying events
// - Decision functions (register, confirm, change email, change name)
// - Command handler wiring the above to an event store
//
// ============================================================================

pub mod value_objects;
pub mod events;
pub mod commands;
pub mod errors;
pub mod state;
pub mod decisions;
pub mod command_handler;

#[cfg(test)]
pub(crate) mod strategies;

pub use value_objects::*;
pub use events::*;
pub use commands::*;
pub use errors::*;
pub use state::*;
pub use decisions::*;
pub use command_handler::*;
