//! Path key for `GET /customers/{key}`: a single id or a `(id1,id2,...)` set.

use std::str::FromStr;

use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CustomerKey {
    One(Uuid),
    Set(Vec<Uuid>),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdSetError {
    #[error("invalid customer id '{0}'")]
    InvalidId(String),
    #[error("id set must be wrapped in parentheses: '{0}'")]
    Unbalanced(String),
}

impl FromStr for CustomerKey {
    type Err = IdSetError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let raw = raw.trim();
        match (raw.strip_prefix('('), raw.ends_with(')')) {
            (Some(rest), true) => {
                let inner = &rest[..rest.len() - 1];
                parse_id_list(inner).map(Self::Set)
            }
            (None, false) => parse_id(raw).map(Self::One),
            _ => Err(IdSetError::Unbalanced(raw.to_string())),
        }
    }
}

/// Comma-separated ids; empty entries are skipped.
pub fn parse_id_list(raw: &str) -> Result<Vec<Uuid>, IdSetError> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(parse_id)
        .collect()
}

fn parse_id(raw: &str) -> Result<Uuid, IdSetError> {
    Uuid::parse_str(raw).map_err(|_| IdSetError::InvalidId(raw.to_string()))
}

/// Render ids as the `(id1,id2,...)` path segment.
pub fn format_id_set(ids: &[Uuid]) -> String {
    let joined = ids
        .iter()
        .map(Uuid::to_string)
        .collect::<Vec<_>>()
        .join(",");
    format!("({joined})")
}
