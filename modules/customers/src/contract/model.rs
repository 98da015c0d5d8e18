use chrono::NaiveDate;
use uuid::Uuid;

/// Persisted customer record (no serde; REST shapes live in `api::rest::dto`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Customer {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: NaiveDate,
}

/// Data for creating a new customer; the id is assigned on add
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCustomer {
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: NaiveDate,
}

/// Whole-record replacement of every field except `id`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomerReplacement {
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: NaiveDate,
}

impl Customer {
    /// Build an unsaved customer carrying the nil id sentinel.
    pub fn unsaved(new_customer: NewCustomer) -> Self {
        Self {
            id: Uuid::nil(),
            first_name: new_customer.first_name,
            last_name: new_customer.last_name,
            date_of_birth: new_customer.date_of_birth,
        }
    }

    /// Overwrite all mutable fields; `id` is left untouched.
    pub fn replace_with(&mut self, replacement: CustomerReplacement) {
        self.first_name = replacement.first_name;
        self.last_name = replacement.last_name;
        self.date_of_birth = replacement.date_of_birth;
    }
}
