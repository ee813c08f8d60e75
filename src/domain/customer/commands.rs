use super::value_objects::{ConfirmationHash, CustomerId, EmailAddress, PersonName};

// ============================================================================
// Customer Domain Commands
// ============================================================================

/// Register a new customer. Identity and confirmation hash are minted here.
#[derive(Debug, Clone, PartialEq)]
pub struct RegisterCustomer {
    pub customer_id: CustomerId,
    pub email_address: EmailAddress,
    pub confirmation_hash: ConfirmationHash,
    pub name: PersonName,
}

impl RegisterCustomer {
    pub fn build(
        email_address: impl Into<String>,
        given_name: impl Into<String>,
        family_name: impl Into<String>,
    ) -> Self {
        Self {
            customer_id: CustomerId::generate(),
            email_address: EmailAddress::build(email_address),
            confirmation_hash: ConfirmationHash::generate(),
            name: PersonName::build(given_name, family_name),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConfirmCustomerEmailAddress {
    pub customer_id: CustomerId,
    pub confirmation_hash: ConfirmationHash,
}

impl ConfirmCustomerEmailAddress {
    pub fn build(customer_id: CustomerId, confirmation_hash: impl Into<String>) -> Self {
        Self {
            customer_id,
            confirmation_hash: ConfirmationHash::build(confirmation_hash),
        }
    }
}

/// Replace the email address. A fresh confirmation hash is minted on build.
#[derive(Debug, Clone, PartialEq)]
pub struct ChangeCustomerEmailAddress {
    pub customer_id: CustomerId,
    pub email_address: EmailAddress,
    pub confirmation_hash: ConfirmationHash,
}

impl ChangeCustomerEmailAddress {
    pub fn build(customer_id: CustomerId, email_address: impl Into<String>) -> Self {
        Self {
            customer_id,
            email_address: EmailAddress::build(email_address),
            confirmation_hash: ConfirmationHash::generate(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChangeCustomerName {
    pub customer_id: CustomerId,
    pub name: PersonName,
}

impl ChangeCustomerName {
    pub fn build(
        customer_id: CustomerId,
        given_name: impl Into<String>,
        family_name: impl Into<String>,
    ) -> Self {
        Self {
            customer_id,
            name: PersonName::build(given_name, family_name),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CustomerCommand {
    Register(RegisterCustomer),
    ConfirmEmailAddress(ConfirmCustomerEmailAddress),
    ChangeEmailAddress(ChangeCustomerEmailAddress),
    ChangeName(ChangeCustomerName),
}

impl CustomerCommand {
    pub fn customer_id(&self) -> CustomerId {
        match self {
            CustomerCommand::Register(c) => c.customer_id,
            CustomerCommand::ConfirmEmailAddress(c) => c.customer_id,
            CustomerCommand::ChangeEmailAddress(c) => c.customer_id,
            CustomerCommand::ChangeName(c) => c.customer_id,
        }
    }

    /// Operation name used in errors, logs and metric labels
    pub fn operation(&self) -> &'static str {
        match self {
            CustomerCommand::Register(_) => "register",
            CustomerCommand::ConfirmEmailAddress(_) => "confirm_email_address",
            CustomerCommand::ChangeEmailAddress(_) => "change_email_address",
            CustomerCommand::ChangeName(_) => "change_name",
        }
    }
}

impl From<RegisterCustomer> for CustomerCommand {
    fn from(command: RegisterCustomer) -> Self {
        CustomerCommand::Register(command)
    }
}

impl From<ConfirmCustomerEmailAddress> for CustomerCommand {
    fn from(command: ConfirmCustomerEmailAddress) -> Self {
        CustomerCommand::ConfirmEmailAddress(command)
    }
}

impl From<ChangeCustomerEmailAddress> for CustomerCommand {
    fn from(command: ChangeCustomerEmailAddress) -> Self {
        CustomerCommand::ChangeEmailAddress(command)
    }
}

impl From<ChangeCustomerName> for CustomerCommand {
    fn from(command: ChangeCustomerName) -> Self {
        CustomerCommand::ChangeName(command)
    }
}
