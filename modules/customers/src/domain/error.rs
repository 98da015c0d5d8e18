use thiserror::Error;
use uuid::Uuid;

/// Domain-specific errors using thiserror
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Customer not found: {id}")]
    CustomerNotFound { id: Uuid },

    #[error("Customers not found: requested {requested}, found {found}")]
    CustomersNotFound { requested: usize, found: usize },

    #[error("Invalid argument: {name} must be supplied")]
    InvalidArgument { name: &'static str },

    #[error("Validation failed: {field}: {message}")]
    Validation { field: String, message: String },

    #[error("Batch too large: {len} items (max: {max})")]
    BatchTooLarge { len: usize, max: usize },

    #[error("Database error: {message}")]
    Database { message: String },
}

impl DomainError {
    pub fn customer_not_found(id: Uuid) -> Self {
        Self::CustomerNotFound { id }
    }

    pub fn customers_not_found(requested: usize, found: usize) -> Self {
        Self::CustomersNotFound { requested, found }
    }

    pub fn invalid_argument(name: &'static str) -> Self {
        Self::InvalidArgument { name }
    }

    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn batch_too_large(len: usize, max: usize) -> Self {
        Self::BatchTooLarge { len, max }
    }

    pub fn database(err: anyhow::Error) -> Self {
        Self::Database {
            message: format!("{err:#}"),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::CustomerNotFound { .. } | Self::CustomersNotFound { .. }
        )
    }
}
