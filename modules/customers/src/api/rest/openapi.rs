use utoipa::openapi::{server::Server, OpenApi as OpenApiDoc};
use utoipa::OpenApi;

use crate::api::rest::dto::{
    CreateCustomerReq, CreateCustomersReq, CustomerDto, DeleteCustomerReq, UpdateCustomerItemReq,
    UpdateCustomerReq,
};
use crate::api::rest::handlers;
use crate::api::rest::problem::{Problem, ValidationError};

#[derive(OpenApi)]
#[openapi(
    info(title = "Customers API", description = "CRUD over customer records"),
    paths(
        handlers::list_customers,
        handlers::get_customer,
        handlers::create_customers,
        handlers::update_customer,
        handlers::update_customers,
        handlers::delete_customer,
        handlers::delete_customers,
    ),
    components(schemas(
        CustomerDto,
        CreateCustomerReq,
        CreateCustomersReq,
        UpdateCustomerReq,
        UpdateCustomerItemReq,
        DeleteCustomerReq,
        Problem,
        ValidationError,
    )),
    tags((name = "customers", description = "Customer records"))
)]
pub struct CustomersApiDoc;

/// OpenAPI document with the customer paths served under `base_path`.
pub fn openapi_for(base_path: &str) -> OpenApiDoc {
    let mut doc = CustomersApiDoc::openapi();
    let base = base_path.trim_end_matches('/');
    if !base.is_empty() {
        doc.servers = Some(vec![Server::new(base)]);
    }
    doc
}
