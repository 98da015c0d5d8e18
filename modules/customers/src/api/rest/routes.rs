use std::sync::Arc;

use axum::{routing::get, Extension, Router};

use crate::api::rest::handlers;
use crate::domain::service::Service;

pub fn register_routes(router: Router, service: Arc<Service>) -> Router {
    router
        // GET /customers - List customers filtered by name
        // POST /customers - Create one customer or a batch
        // PUT /customers - Replace a batch of customers
        // DELETE /customers - Delete a batch of customers
        .route(
            "/customers",
            get(handlers::list_customers)
                .post(handlers::create_customers)
                .put(handlers::update_customers)
                .delete(handlers::delete_customers),
        )
        // GET /customers/{id} - Get one customer, or a `(id1,id2)` set
        // PUT /customers/{id} - Replace a customer
        // DELETE /customers/{id} - Delete a customer
        .route(
            "/customers/{id}",
            get(handlers::get_customer)
                .put(handlers::update_customer)
                .delete(handlers::delete_customer),
        )
        .layer(Extension(service))
}
