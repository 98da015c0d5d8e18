use sea_orm::ActiveValue::{NotSet, Set};

use crate::contract::model::Customer;
use crate::infra::storage::entity::{ActiveModel, Model};

impl From<Model> for Customer {
    fn from(m: Model) -> Self {
        Self {
            id: m.id,
            first_name: m.first_name,
            last_name: m.last_name,
            date_of_birth: m.date_of_birth,
        }
    }
}

/// Active model with every column set, for inserts.
pub fn to_insert_model(c: Customer) -> ActiveModel {
    ActiveModel {
        id: Set(c.id),
        first_name: Set(c.first_name),
        last_name: Set(c.last_name),
        date_of_birth: Set(c.date_of_birth),
    }
}

/// Active model for a replace-write: the key stays out of the SET clause.
pub fn to_replace_model(c: Customer) -> ActiveModel {
    ActiveModel {
        id: NotSet,
        first_name: Set(c.first_name),
        last_name: Set(c.last_name),
        date_of_birth: Set(c.date_of_birth),
    }
}
