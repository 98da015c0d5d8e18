//! In-memory store, substitutable for the SeaORM one in tests and `--mock` runs.

use std::collections::BTreeMap;

use async_trait::async_trait;
use parking_lot::RwLock;
use uuid::Uuid;

use crate::contract::model::Customer;
use crate::domain::store::{CustomerStore, StagedChange};

#[derive(Default)]
pub struct InMemoryCustomerStore {
    rows: RwLock<BTreeMap<Uuid, Customer>>,
}

impl InMemoryCustomerStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate the store, bypassing the unit of work.
    pub fn with_customers(customers: impl IntoIterator<Item = Customer>) -> Self {
        let rows = customers.into_iter().map(|c| (c.id, c)).collect();
        Self {
            rows: RwLock::new(rows),
        }
    }

    pub fn len(&self) -> usize {
        self.rows.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.read().is_empty()
    }
}

#[async_trait]
impl CustomerStore for InMemoryCustomerStore {
    async fn list(&self, filter: &str) -> anyhow::Result<Vec<Customer>> {
        let mut out: Vec<Customer> = self
            .rows
            .read()
            .values()
            .filter(|c| c.first_name.contains(filter) || c.last_name.contains(filter))
            .cloned()
            .collect();
        out.sort_by(|a, b| {
            (&a.last_name, &a.first_name, a.id).cmp(&(&b.last_name, &b.first_name, b.id))
        });
        Ok(out)
    }

    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<Customer>> {
        Ok(self.rows.read().get(&id).cloned())
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> anyhow::Result<Vec<Customer>> {
        let rows = self.rows.read();
        Ok(rows
            .values()
            .filter(|c| ids.contains(&c.id))
            .cloned()
            .collect())
    }

    async fn exists(&self, id: Uuid) -> anyhow::Result<bool> {
        Ok(self.rows.read().contains_key(&id))
    }

    async fn commit(&self, changes: Vec<StagedChange>) -> anyhow::Result<u64> {
        let mut rows = self.rows.write();
        // Work on a copy so a failing change leaves the store untouched.
        let mut next = rows.clone();
        let mut affected = 0u64;
        for change in changes {
            match change {
                StagedChange::Insert(c) => {
                    if next.contains_key(&c.id) {
                        anyhow::bail!("insert failed: duplicate key {}", c.id);
                    }
                    next.insert(c.id, c);
                    affected += 1;
                }
                StagedChange::Replace(c) => {
                    if let Some(existing) = next.get_mut(&c.id) {
                        *existing = c;
                        affected += 1;
                    }
                }
                StagedChange::Remove(id) => {
                    if next.remove(&id).is_some() {
                        affected += 1;
                    }
                }
            }
        }
        *rows = next;
        Ok(affected)
    }
}
