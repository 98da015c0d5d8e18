use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{de, de::DeserializeOwned, Deserialize, Deserializer, Serialize};
use serde_json::Value;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::api::rest::problem::ValidationError;
use crate::contract::model::{Customer, CustomerReplacement, NewCustomer};
use crate::domain::validation::name_violations;

/// REST DTO for customer representation (read projection)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CustomerDto {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: NaiveDate,
}

/// REST DTO for creating a new customer
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateCustomerReq {
    pub first_name: String,
    pub last_name: String,
    #[serde(deserialize_with = "date_or_datetime")]
    pub date_of_birth: NaiveDate,
}

/// `POST /customers` accepts a single object or an array of them
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum CreateCustomersReq {
    One(CreateCustomerReq),
    Many(Vec<CreateCustomerReq>),
}

/// REST DTO for replacing a customer; the id comes from the path
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UpdateCustomerReq {
    pub first_name: String,
    pub last_name: String,
    #[serde(deserialize_with = "date_or_datetime")]
    pub date_of_birth: NaiveDate,
}

/// One element of a batch `PUT /customers`
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UpdateCustomerItemReq {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    #[serde(deserialize_with = "date_or_datetime")]
    pub date_of_birth: NaiveDate,
}

/// One element of a batch `DELETE /customers`
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DeleteCustomerReq {
    pub id: Uuid,
}

/// REST DTO for query parameters
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListCustomersQuery {
    /// Substring matched against first or last name
    pub name: Option<String>,
}

// Conversion implementations between REST DTOs and contract models

impl From<Customer> for CustomerDto {
    fn from(c: Customer) -> Self {
        Self {
            id: c.id,
            first_name: c.first_name,
            last_name: c.last_name,
            date_of_birth: c.date_of_birth,
        }
    }
}

impl From<CreateCustomerReq> for NewCustomer {
    fn from(req: CreateCustomerReq) -> Self {
        Self {
            first_name: req.first_name,
            last_name: req.last_name,
            date_of_birth: req.date_of_birth,
        }
    }
}

impl From<UpdateCustomerReq> for CustomerReplacement {
    fn from(req: UpdateCustomerReq) -> Self {
        Self {
            first_name: req.first_name,
            last_name: req.last_name,
            date_of_birth: req.date_of_birth,
        }
    }
}

impl From<UpdateCustomerItemReq> for (Uuid, CustomerReplacement) {
    fn from(req: UpdateCustomerItemReq) -> Self {
        (
            req.id,
            CustomerReplacement {
                first_name: req.first_name,
                last_name: req.last_name,
                date_of_birth: req.date_of_birth,
            },
        )
    }
}

// --- body decoding ---

/// Decode one body object; a serde error becomes a violation at `pointer`.
pub fn decode_item<T: DeserializeOwned>(value: Value, pointer: &str) -> Result<T, ValidationError> {
    serde_json::from_value(value).map_err(|e| ValidationError {
        detail: e.to_string(),
        pointer: pointer.to_string(),
    })
}

/// Decode a JSON array element by element, collecting one violation per bad element.
pub fn decode_items<T: DeserializeOwned>(value: Value) -> Result<Vec<T>, Vec<ValidationError>> {
    let Value::Array(items) = value else {
        return Err(vec![ValidationError {
            detail: "expected a JSON array".to_string(),
            pointer: String::new(),
        }]);
    };
    let mut decoded = Vec::with_capacity(items.len());
    let mut errors = Vec::new();
    for (i, item) in items.into_iter().enumerate() {
        match decode_item(item, &format!("/{i}")) {
            Ok(v) => decoded.push(v),
            Err(e) => errors.push(e),
        }
    }
    if errors.is_empty() {
        Ok(decoded)
    } else {
        Err(errors)
    }
}

impl CreateCustomersReq {
    /// An array body is a batch, anything else a single customer.
    pub fn from_json(value: Value) -> Result<Self, Vec<ValidationError>> {
        if value.is_array() {
            decode_items(value).map(Self::Many)
        } else {
            decode_item(value, "").map(Self::One).map_err(|e| vec![e])
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::One(_) => 1,
            Self::Many(items) => items.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// --- request validation ---

fn push_name_violations(prefix: &str, first: &str, last: &str, out: &mut Vec<ValidationError>) {
    out.extend(
        name_violations(first, last)
            .into_iter()
            .map(|v| ValidationError {
                detail: format!("{} {}", v.field, v.message),
                pointer: format!("{prefix}/{}", v.field),
            }),
    );
}

impl CreateCustomerReq {
    pub fn validate(&self, prefix: &str, out: &mut Vec<ValidationError>) {
        push_name_violations(prefix, &self.first_name, &self.last_name, out);
    }
}

impl UpdateCustomerReq {
    pub fn validate(&self, prefix: &str, out: &mut Vec<ValidationError>) {
        push_name_violations(prefix, &self.first_name, &self.last_name, out);
    }
}

impl UpdateCustomerItemReq {
    pub fn validate(&self, prefix: &str, out: &mut Vec<ValidationError>) {
        push_name_violations(prefix, &self.first_name, &self.last_name, out);
    }
}

/// Accept `YYYY-MM-DD` or a full timestamp, keeping only the date.
fn date_or_datetime<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    let raw = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Ok(date);
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Ok(ts.date_naive());
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|ts| ts.date())
        .map_err(|_| de::Error::custom(format!("invalid date '{raw}', expected YYYY-MM-DD")))
}
