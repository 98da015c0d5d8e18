use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::contract::model::{Customer, CustomerReplacement, NewCustomer};
use crate::domain::error::DomainError;
use crate::domain::repo::CustomerRepository;
use crate::domain::store::CustomerStore;

/// Domain service orchestrating one unit of work per operation.
/// Depends only on the store port, not on infra types.
#[derive(Clone)]
pub struct Service {
    store: Arc<dyn CustomerStore>,
    config: ServiceConfig,
}

/// Configuration for the domain service
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub max_batch_size: usize,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            max_batch_size: 1000,
        }
    }
}

impl Service {
    pub fn new(store: Arc<dyn CustomerStore>, config: ServiceConfig) -> Self {
        Self { store, config }
    }

    fn unit_of_work(&self) -> CustomerRepository {
        CustomerRepository::new(self.store.clone())
    }

    #[instrument(name = "customers.service.list_customers", skip(self))]
    pub async fn list_customers(&self, name: &str) -> Result<Vec<Customer>, DomainError> {
        debug!("Listing customers");
        let customers = self.unit_of_work().list(name).await?;
        info!("Retrieved {} customers", customers.len());
        Ok(customers)
    }

    #[instrument(name = "customers.service.get_customer", skip(self), fields(customer_id = %id))]
    pub async fn get_customer(&self, id: Uuid) -> Result<Customer, DomainError> {
        debug!("Getting customer by id");
        let customer = self
            .unit_of_work()
            .get(id)
            .await?
            .ok_or_else(|| DomainError::customer_not_found(id))?;
        info!("Retrieved customer {}", customer.id);
        Ok(customer)
    }

    /// Fetch a set of customers; fails unless every requested id exists.
    /// The result follows the order of `ids`.
    #[instrument(name = "customers.service.get_customers", skip(self, ids), fields(requested = ids.len()))]
    pub async fn get_customers(&self, ids: &[Uuid]) -> Result<Vec<Customer>, DomainError> {
        let ids = distinct(ids);
        let found = self.unit_of_work().get_many(&ids).await?;
        if found.len() != ids.len() {
            return Err(DomainError::customers_not_found(ids.len(), found.len()));
        }
        Ok(in_request_order(&ids, found))
    }

    #[instrument(name = "customers.service.create_customer", skip(self, new_customer))]
    pub async fn create_customer(&self, new_customer: NewCustomer) -> Result<Customer, DomainError> {
        let mut uow = self.unit_of_work();
        let customer = uow.add(Customer::unsaved(new_customer))?;
        uow.commit().await?;
        info!("Created customer {}", customer.id);
        Ok(customer)
    }

    #[instrument(name = "customers.service.create_customers", skip(self, new_customers), fields(count = new_customers.len()))]
    pub async fn create_customers(
        &self,
        new_customers: Vec<NewCustomer>,
    ) -> Result<Vec<Customer>, DomainError> {
        self.check_batch(new_customers.len())?;
        let mut uow = self.unit_of_work();
        let created = new_customers
            .into_iter()
            .map(|n| uow.add(Customer::unsaved(n)))
            .collect::<Result<Vec<_>, _>>()?;
        uow.commit().await?;
        info!("Created {} customers", created.len());
        Ok(created)
    }

    #[instrument(name = "customers.service.update_customer", skip(self, replacement), fields(customer_id = %id))]
    pub async fn update_customer(
        &self,
        id: Uuid,
        replacement: CustomerReplacement,
    ) -> Result<(), DomainError> {
        let mut uow = self.unit_of_work();
        let mut current = uow
            .get(id)
            .await?
            .ok_or_else(|| DomainError::customer_not_found(id))?;
        current.replace_with(replacement);
        uow.update(current)?;
        if !uow.commit().await? {
            return Err(DomainError::customer_not_found(id));
        }
        info!("Updated customer {}", id);
        Ok(())
    }

    /// All-or-nothing: every id is resolved before anything is staged.
    #[instrument(name = "customers.service.update_customers", skip(self, items), fields(count = items.len()))]
    pub async fn update_customers(
        &self,
        items: Vec<(Uuid, CustomerReplacement)>,
    ) -> Result<(), DomainError> {
        self.check_batch(items.len())?;
        let mut uow = self.unit_of_work();
        let ids: Vec<Uuid> = items.iter().map(|(id, _)| *id).collect();
        let mut current = resolve_all(&uow, &ids).await?;
        for (id, replacement) in items {
            // resolve_all guarantees presence
            let Some(customer) = current.get_mut(&id) else {
                return Err(DomainError::customer_not_found(id));
            };
            customer.replace_with(replacement);
            uow.update(customer.clone())?;
        }
        uow.commit().await?;
        info!("Updated {} customers", ids.len());
        Ok(())
    }

    #[instrument(name = "customers.service.delete_customer", skip(self), fields(customer_id = %id))]
    pub async fn delete_customer(&self, id: Uuid) -> Result<(), DomainError> {
        let mut uow = self.unit_of_work();
        let customer = uow
            .get(id)
            .await?
            .ok_or_else(|| DomainError::customer_not_found(id))?;
        uow.delete(&customer)?;
        if !uow.commit().await? {
            return Err(DomainError::customer_not_found(id));
        }
        info!("Deleted customer {}", id);
        Ok(())
    }

    /// All-or-nothing: every id is resolved before anything is staged.
    #[instrument(name = "customers.service.delete_customers", skip(self, ids), fields(count = ids.len()))]
    pub async fn delete_customers(&self, ids: Vec<Uuid>) -> Result<(), DomainError> {
        self.check_batch(ids.len())?;
        let mut uow = self.unit_of_work();
        let ids = distinct(&ids);
        let current = resolve_all(&uow, &ids).await?;
        for id in &ids {
            if let Some(customer) = current.get(id) {
                uow.delete(customer)?;
            }
        }
        uow.commit().await?;
        info!("Deleted {} customers", current.len());
        Ok(())
    }

    fn check_batch(&self, len: usize) -> Result<(), DomainError> {
        if len > self.config.max_batch_size {
            return Err(DomainError::batch_too_large(len, self.config.max_batch_size));
        }
        Ok(())
    }
}

/// Load every id, failing with the first missing one in input order.
async fn resolve_all(
    uow: &CustomerRepository,
    ids: &[Uuid],
) -> Result<HashMap<Uuid, Customer>, DomainError> {
    if let Some(nil) = ids.iter().find(|id| id.is_nil()) {
        debug!("Rejecting batch containing nil id {}", nil);
        return Err(DomainError::invalid_argument("id"));
    }
    let found: HashMap<Uuid, Customer> = uow
        .get_many(ids)
        .await?
        .into_iter()
        .map(|c| (c.id, c))
        .collect();
    if let Some(missing) = ids.iter().find(|id| !found.contains_key(id)) {
        return Err(DomainError::customer_not_found(*missing));
    }
    Ok(found)
}

/// Drop repeated ids, keeping the first occurrence.
fn distinct(ids: &[Uuid]) -> Vec<Uuid> {
    let mut seen = std::collections::HashSet::with_capacity(ids.len());
    ids.iter().copied().filter(|id| seen.insert(*id)).collect()
}

fn in_request_order(ids: &[Uuid], found: Vec<Customer>) -> Vec<Customer> {
    let mut by_id: HashMap<Uuid, Customer> = found.into_iter().map(|c| (c.id, c)).collect();
    ids.iter().filter_map(|id| by_id.remove(id)).collect()
}
