//! Field constraints enforced on every customer write.

use crate::contract::Customer;
use crate::domain::error::DomainError;

/// Maximum length (in characters) of `first_name` and `last_name`.
pub const MAX_NAME_LENGTH: usize = 100;

/// A single field constraint violation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldViolation {
    pub field: &'static str,
    pub message: String,
}

fn check_name(field: &'static str, value: &str, out: &mut Vec<FieldViolation>) {
    if value.trim().is_empty() {
        out.push(FieldViolation {
            field,
            message: "is required".to_string(),
        });
        return;
    }
    let len = value.chars().count();
    if len > MAX_NAME_LENGTH {
        out.push(FieldViolation {
            field,
            message: format!("must be at most {MAX_NAME_LENGTH} characters (got {len})"),
        });
    }
}

/// Collect every violation of the name constraints, in field order.
pub fn name_violations(first_name: &str, last_name: &str) -> Vec<FieldViolation> {
    let mut out = Vec::new();
    check_name("first_name", first_name, &mut out);
    check_name("last_name", last_name, &mut out);
    out
}

/// Reject a customer whose fields break the write-time constraints.
pub fn validate_customer(customer: &Customer) -> Result<(), DomainError> {
    match name_violations(&customer.first_name, &customer.last_name)
        .into_iter()
        .next()
    {
        Some(v) => Err(DomainError::validation(v.field, v.message)),
        None => Ok(()),
    }
}
