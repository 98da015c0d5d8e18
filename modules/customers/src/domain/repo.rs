//! Request-scoped unit of work over a [`CustomerStore`].
//!
//! Reads go straight to the store. `add`, `update` and `delete` only stage
//! changes; `commit` is the single point where anything is persisted.
//! Dropping the repository without committing discards whatever was staged.

use std::sync::Arc;

use tracing::debug;
use uuid::Uuid;

use crate::contract::model::Customer;
use crate::domain::error::DomainError;
use crate::domain::store::{CustomerStore, StagedChange};
use crate::domain::validation::validate_customer;

pub struct CustomerRepository {
    store: Arc<dyn CustomerStore>,
    staged: Vec<StagedChange>,
}

impl CustomerRepository {
    pub fn new(store: Arc<dyn CustomerStore>) -> Self {
        Self {
            store,
            staged: Vec::new(),
        }
    }

    pub async fn list(&self, filter: &str) -> Result<Vec<Customer>, DomainError> {
        self.store.list(filter).await.map_err(DomainError::database)
    }

    pub async fn get(&self, id: Uuid) -> Result<Option<Customer>, DomainError> {
        ensure_id(id)?;
        self.store
            .find_by_id(id)
            .await
            .map_err(DomainError::database)
    }

    /// Existing customers among `ids`; missing ids are simply absent from the result.
    pub async fn get_many(&self, ids: &[Uuid]) -> Result<Vec<Customer>, DomainError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        self.store
            .find_by_ids(ids)
            .await
            .map_err(DomainError::database)
    }

    pub async fn exists(&self, id: Uuid) -> Result<bool, DomainError> {
        ensure_id(id)?;
        self.store.exists(id).await.map_err(DomainError::database)
    }

    /// Stage an insert. A nil id is replaced by a fresh one.
    pub fn add(&mut self, mut customer: Customer) -> Result<Customer, DomainError> {
        if customer.id.is_nil() {
            customer.id = Uuid::new_v4();
        }
        validate_customer(&customer)?;
        self.staged.push(StagedChange::Insert(customer.clone()));
        Ok(customer)
    }

    /// Stage a whole-record replace keyed by `customer.id`.
    pub fn update(&mut self, customer: Customer) -> Result<(), DomainError> {
        ensure_id(customer.id).map_err(|_| DomainError::invalid_argument("customer"))?;
        validate_customer(&customer)?;
        self.staged.push(StagedChange::Replace(customer));
        Ok(())
    }

    pub fn delete(&mut self, customer: &Customer) -> Result<(), DomainError> {
        ensure_id(customer.id).map_err(|_| DomainError::invalid_argument("customer"))?;
        self.staged.push(StagedChange::Remove(customer.id));
        Ok(())
    }

    /// Number of changes waiting for `commit`.
    pub fn pending(&self) -> usize {
        self.staged.len()
    }

    /// Apply staged changes; true iff at least one row changed.
    pub async fn commit(&mut self) -> Result<bool, DomainError> {
        let changes = std::mem::take(&mut self.staged);
        if changes.is_empty() {
            return Ok(false);
        }
        let count = changes.len();
        let affected = self
            .store
            .commit(changes)
            .await
            .map_err(DomainError::database)?;
        debug!(staged = count, affected, "Committed customer changes");
        Ok(affected > 0)
    }
}

fn ensure_id(id: Uuid) -> Result<(), DomainError> {
    if id.is_nil() {
        return Err(DomainError::invalid_argument("id"));
    }
    Ok(())
}
