use std::sync::Arc;

use axum::Router;
use sea_orm::DatabaseConnection;
use sea_orm_migration::MigratorTrait;
use tracing::{debug, info};

use crate::api::rest::routes;
use crate::config::CustomersConfig;
use crate::domain::service::{Service, ServiceConfig};
use crate::domain::store::CustomerStore;
use crate::infra::storage::migrations::Migrator;
use crate::infra::storage::sea_orm_store::SeaOrmCustomerStore;

/// Customers module: wires a store into the domain service and exposes REST routes.
#[derive(Clone)]
pub struct Customers {
    service: Arc<Service>,
    config: CustomersConfig,
}

impl Customers {
    /// Build the module on top of a SeaORM connection.
    pub fn init(db: DatabaseConnection, cfg: CustomersConfig) -> Self {
        info!("Initializing customers module");
        Self::with_store(Arc::new(SeaOrmCustomerStore::new(db)), cfg)
    }

    /// Build the module on top of any store implementation.
    pub fn with_store(store: Arc<dyn CustomerStore>, cfg: CustomersConfig) -> Self {
        debug!(
            "Loaded customers config: base_path={}, max_batch_size={}",
            cfg.base_path, cfg.max_batch_size
        );
        let service = Service::new(
            store,
            ServiceConfig {
                max_batch_size: cfg.max_batch_size,
            },
        );
        Self {
            service: Arc::new(service),
            config: cfg,
        }
    }

    /// Run the module's database migrations.
    pub async fn migrate(db: &DatabaseConnection) -> anyhow::Result<()> {
        info!("Running customers database migrations");
        Migrator::up(db, None).await?;
        info!("Customers database migrations completed successfully");
        Ok(())
    }

    /// Mount the customer routes under the configured base path.
    pub fn register_rest(&self, router: Router) -> Router {
        info!("Registering customers REST routes");
        let api = routes::register_routes(Router::new(), self.service.clone());
        let base = self.config.base_path.trim_matches('/');
        let router = if base.is_empty() {
            router.merge(api)
        } else {
            router.nest(&format!("/{base}"), api)
        };
        info!("Customers REST routes registered successfully");
        router
    }
}
