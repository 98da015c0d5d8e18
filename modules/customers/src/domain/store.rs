use crate::contract::model::Customer;
use async_trait::async_trait;
use uuid::Uuid;

/// A mutation staged by the unit of work and applied on commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StagedChange {
    /// Insert a fully-formed customer (id already assigned).
    Insert(Customer),
    /// Replace every non-key field of the row keyed by `customer.id`.
    Replace(Customer),
    /// Remove the row with this id.
    Remove(Uuid),
}

/// Port for the domain layer: the persistence capability customers need.
/// Object-safe and async-friendly via `async_trait`.
#[async_trait]
pub trait CustomerStore: Send + Sync {
    /// Customers whose first or last name contains `filter`; empty matches all.
    async fn list(&self, filter: &str) -> anyhow::Result<Vec<Customer>>;
    /// Load a customer by id.
    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<Customer>>;
    /// Load the subset of `ids` that exist.
    async fn find_by_ids(&self, ids: &[Uuid]) -> anyhow::Result<Vec<Customer>>;
    /// Existence check by id.
    async fn exists(&self, id: Uuid) -> anyhow::Result<bool>;
    /// Apply all changes as one atomic unit.
    ///
    /// Returns the number of rows affected. Nothing is applied on error.
    async fn commit(&self, changes: Vec<StagedChange>) -> anyhow::Result<u64>;
}
