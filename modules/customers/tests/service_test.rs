//! Domain service tests on top of the in-memory store.

use std::sync::Arc;

use anyhow::Result;
use chrono::NaiveDate;
use uuid::Uuid;

use customers::contract::model::{Customer, CustomerReplacement, NewCustomer};
use customers::domain::error::DomainError;
use customers::domain::service::{Service, ServiceConfig};
use customers::infra::memory::InMemoryCustomerStore;

fn dob() -> NaiveDate {
    NaiveDate::from_ymd_opt(1990, 5, 17).unwrap()
}

fn new_customer(first: &str, last: &str) -> NewCustomer {
    NewCustomer {
        first_name: first.to_string(),
        last_name: last.to_string(),
        date_of_birth: dob(),
    }
}

fn replacement(first: &str, last: &str) -> CustomerReplacement {
    CustomerReplacement {
        first_name: first.to_string(),
        last_name: last.to_string(),
        date_of_birth: dob(),
    }
}

fn create_test_service() -> (Arc<InMemoryCustomerStore>, Service) {
    let store = Arc::new(InMemoryCustomerStore::new());
    let service = Service::new(store.clone(), ServiceConfig::default());
    (store, service)
}

#[tokio::test]
async fn test_crud_round_trip() -> Result<()> {
    let (_, service) = create_test_service();

    let created = service.create_customer(new_customer("Irfan", "Khan")).await?;
    assert_eq!(service.get_customer(created.id).await?, created);

    service
        .update_customer(created.id, replacement("Irfan", "Qureshi"))
        .await?;
    let updated = service.get_customer(created.id).await?;
    assert_eq!(updated.id, created.id);
    assert_eq!(updated.last_name, "Qureshi");

    service.delete_customer(created.id).await?;
    let err = service.get_customer(created.id).await.unwrap_err();
    assert!(err.is_not_found());

    Ok(())
}

#[tokio::test]
async fn test_second_delete_is_not_found() -> Result<()> {
    let (_, service) = create_test_service();
    let created = service.create_customer(new_customer("Once", "Only")).await?;

    service.delete_customer(created.id).await?;
    let err = service.delete_customer(created.id).await.unwrap_err();
    assert!(matches!(err, DomainError::CustomerNotFound { id } if id == created.id));

    Ok(())
}

#[tokio::test]
async fn test_nil_id_is_invalid_argument() {
    let (_, service) = create_test_service();
    let err = service.get_customer(Uuid::nil()).await.unwrap_err();
    assert!(matches!(err, DomainError::InvalidArgument { .. }));

    let err = service.delete_customers(vec![Uuid::nil()]).await.unwrap_err();
    assert!(matches!(err, DomainError::InvalidArgument { .. }));
}

#[tokio::test]
async fn test_list_filter_is_substring_on_either_name() -> Result<()> {
    let (_, service) = create_test_service();
    service.create_customer(new_customer("Irfan", "B")).await?;
    service.create_customer(new_customer("Zoe", "Irfanson")).await?;
    service.create_customer(new_customer("Zoe", "A")).await?;

    assert_eq!(service.list_customers("Irfan").await?.len(), 2);
    assert_eq!(service.list_customers("").await?.len(), 3);
    assert!(service.list_customers("nobody").await?.is_empty());

    Ok(())
}

#[tokio::test]
async fn test_get_customers_dedupes_and_keeps_order() -> Result<()> {
    let (_, service) = create_test_service();
    let a = service.create_customer(new_customer("A", "A")).await?;
    let b = service.create_customer(new_customer("B", "B")).await?;

    let found = service.get_customers(&[b.id, a.id, b.id]).await?;
    assert_eq!(found, vec![b.clone(), a]);

    let err = service
        .get_customers(&[b.id, Uuid::new_v4()])
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        DomainError::CustomersNotFound {
            requested: 2,
            found: 1
        }
    ));

    Ok(())
}

#[tokio::test]
async fn test_batch_create_rejects_whole_batch_on_invalid_item() {
    let (store, service) = create_test_service();
    let err = service
        .create_customers(vec![new_customer("Good", "One"), new_customer("", "Bad")])
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Validation { .. }));
    assert!(store.is_empty());
}

#[tokio::test]
async fn test_batch_update_reports_first_missing_id() -> Result<()> {
    let (_, service) = create_test_service();
    let existing = service.create_customer(new_customer("Keep", "Name")).await?;
    let first_missing = Uuid::new_v4();

    let err = service
        .update_customers(vec![
            (existing.id, replacement("Changed", "Name")),
            (first_missing, replacement("X", "Y")),
            (Uuid::new_v4(), replacement("X", "Y")),
        ])
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::CustomerNotFound { id } if id == first_missing));
    assert_eq!(service.get_customer(existing.id).await?.first_name, "Keep");

    Ok(())
}

#[tokio::test]
async fn test_batch_delete_removes_all() -> Result<()> {
    let (store, service) = create_test_service();
    let created = service
        .create_customers(vec![new_customer("A", "A"), new_customer("B", "B")])
        .await?;
    let ids = created.iter().map(|c| c.id).collect();

    service.delete_customers(ids).await?;
    assert!(store.is_empty());

    Ok(())
}

#[tokio::test]
async fn test_batch_limit() {
    let store = Arc::new(InMemoryCustomerStore::with_customers([Customer {
        id: Uuid::new_v4(),
        first_name: "Pre".to_string(),
        last_name: "Loaded".to_string(),
        date_of_birth: dob(),
    }]));
    let service = Service::new(store, ServiceConfig { max_batch_size: 1 });

    let err = service
        .create_customers(vec![new_customer("A", "A"), new_customer("B", "B")])
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::BatchTooLarge { len: 2, max: 1 }));
}
