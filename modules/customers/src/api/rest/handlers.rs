use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        OriginalUri, Path, Query,
    },
    http::{header, StatusCode},
    response::{IntoResponse, Json, Response},
    Extension,
};
use tracing::{error, info};
use serde_json::Value;
use uuid::Uuid;

use crate::api::rest::dto::{
    decode_item, decode_items, CreateCustomerReq, CreateCustomersReq, CustomerDto,
    DeleteCustomerReq, ListCustomersQuery, UpdateCustomerItemReq, UpdateCustomerReq,
};
use crate::api::rest::error::{
    id_set_problem, json_rejection_problem, map_domain_error, path_rejection_problem,
    validation_problem,
};
use crate::api::rest::ids::{format_id_set, CustomerKey};
use crate::api::rest::problem::{Problem, ProblemResponse, ValidationError};
use crate::domain::service::Service;

fn collection_path(uri: &OriginalUri) -> &str {
    uri.path().trim_end_matches('/')
}

fn json_value(
    body: Result<Json<Value>, JsonRejection>,
    uri: &OriginalUri,
) -> Result<Value, ProblemResponse> {
    body.map(|Json(v)| v)
        .map_err(|e| json_rejection_problem(&e, uri.path()))
}

fn path_id(
    id: Result<Path<Uuid>, PathRejection>,
    uri: &OriginalUri,
) -> Result<Uuid, ProblemResponse> {
    id.map(|Path(id)| id)
        .map_err(|e| path_rejection_problem(&e, uri.path()))
}

/// List customers, optionally filtered by name substring
#[utoipa::path(
    get,
    path = "/customers",
    tag = "customers",
    operation_id = "customers.list_customers",
    params(ListCustomersQuery),
    responses(
        (status = 200, description = "List of customers", body = Vec<CustomerDto>),
        (status = 500, description = "Internal Server Error", body = Problem, content_type = "application/problem+json")
    )
)]
pub async fn list_customers(
    Extension(svc): Extension<Arc<Service>>,
    Query(query): Query<ListCustomersQuery>,
    uri: OriginalUri,
) -> Result<Json<Vec<CustomerDto>>, ProblemResponse> {
    info!("Listing customers with query: {:?}", query);
    let name = query.name.unwrap_or_default();
    match svc.list_customers(&name).await {
        Ok(customers) => Ok(Json(customers.into_iter().map(CustomerDto::from).collect())),
        Err(e) => {
            error!("Failed to list customers: {}", e);
            Err(map_domain_error(&e, uri.path()))
        }
    }
}

/// Get one customer by id, or a `(id1,id2,...)` set of customers
#[utoipa::path(
    get,
    path = "/customers/{id}",
    tag = "customers",
    operation_id = "customers.get_customer",
    params(("id" = String, Path, description = "Customer UUID, or a parenthesised comma-joined list of UUIDs")),
    responses(
        (status = 200, description = "Customer found (a list when an id set was requested)", body = CustomerDto),
        (status = 400, description = "Bad Request", body = Problem, content_type = "application/problem+json"),
        (status = 404, description = "Not Found", body = Problem, content_type = "application/problem+json"),
        (status = 500, description = "Internal Server Error", body = Problem, content_type = "application/problem+json")
    )
)]
pub async fn get_customer(
    Extension(svc): Extension<Arc<Service>>,
    Path(key): Path<String>,
    uri: OriginalUri,
) -> Result<Response, ProblemResponse> {
    let key: CustomerKey = key
        .parse()
        .map_err(|e| id_set_problem(&e, uri.path()))?;

    match key {
        CustomerKey::One(id) => {
            info!("Getting customer with id: {}", id);
            match svc.get_customer(id).await {
                Ok(customer) => Ok(Json(CustomerDto::from(customer)).into_response()),
                Err(e) => {
                    error!("Failed to get customer {}: {}", id, e);
                    Err(map_domain_error(&e, uri.path()))
                }
            }
        }
        CustomerKey::Set(ids) => {
            info!("Getting {} customers by id set", ids.len());
            match svc.get_customers(&ids).await {
                Ok(customers) => {
                    let dtos: Vec<CustomerDto> =
                        customers.into_iter().map(CustomerDto::from).collect();
                    Ok(Json(dtos).into_response())
                }
                Err(e) => {
                    error!("Failed to get customer set: {}", e);
                    Err(map_domain_error(&e, uri.path()))
                }
            }
        }
    }
}

/// Create one customer or a batch of customers
#[utoipa::path(
    post,
    path = "/customers",
    tag = "customers",
    operation_id = "customers.create_customers",
    request_body = CreateCustomersReq,
    responses(
        (status = 201, description = "Created customer (a list when an array was posted)", body = CustomerDto,
            headers(("Location" = String, description = "URI of the created resource(s)"))),
        (status = 400, description = "Bad Request", body = Problem, content_type = "application/problem+json"),
        (status = 500, description = "Internal Server Error", body = Problem, content_type = "application/problem+json")
    )
)]
pub async fn create_customers(
    uri: OriginalUri,
    Extension(svc): Extension<Arc<Service>>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Response, ProblemResponse> {
    let base = collection_path(&uri);
    let req_body = CreateCustomersReq::from_json(json_value(body, &uri)?)
        .map_err(|errors| validation_problem(errors, uri.path()))?;
    if req_body.is_empty() {
        let errors = vec![ValidationError {
            detail: "at least one customer is required".to_string(),
            pointer: String::new(),
        }];
        return Err(validation_problem(errors, uri.path()));
    }

    match req_body {
        CreateCustomersReq::One(req) => {
            info!("Creating customer: {:?}", req);
            let mut errors = Vec::new();
            req.validate("", &mut errors);
            if !errors.is_empty() {
                return Err(validation_problem(errors, uri.path()));
            }
            match svc.create_customer(req.into()).await {
                Ok(customer) => {
                    let location = format!("{base}/{}", customer.id);
                    Ok((
                        StatusCode::CREATED,
                        [(header::LOCATION, location)],
                        Json(CustomerDto::from(customer)),
                    )
                        .into_response())
                }
                Err(e) => {
                    error!("Failed to create customer: {}", e);
                    Err(map_domain_error(&e, uri.path()))
                }
            }
        }
        CreateCustomersReq::Many(reqs) => {
            info!("Creating {} customers", reqs.len());
            let mut errors = Vec::new();
            for (i, req) in reqs.iter().enumerate() {
                req.validate(&format!("/{i}"), &mut errors);
            }
            if !errors.is_empty() {
                return Err(validation_problem(errors, uri.path()));
            }
            let new_customers = reqs.into_iter().map(CreateCustomerReq::into).collect();
            match svc.create_customers(new_customers).await {
                Ok(customers) => {
                    let ids: Vec<Uuid> = customers.iter().map(|c| c.id).collect();
                    let location = format!("{base}/{}", format_id_set(&ids));
                    let dtos: Vec<CustomerDto> =
                        customers.into_iter().map(CustomerDto::from).collect();
                    Ok((StatusCode::CREATED, [(header::LOCATION, location)], Json(dtos))
                        .into_response())
                }
                Err(e) => {
                    error!("Failed to create customers: {}", e);
                    Err(map_domain_error(&e, uri.path()))
                }
            }
        }
    }
}

/// Replace every field of an existing customer except its id
#[utoipa::path(
    put,
    path = "/customers/{id}",
    tag = "customers",
    operation_id = "customers.update_customer",
    params(("id" = Uuid, Path, description = "Customer UUID")),
    request_body = UpdateCustomerReq,
    responses(
        (status = 204, description = "Customer updated"),
        (status = 400, description = "Bad Request", body = Problem, content_type = "application/problem+json"),
        (status = 404, description = "Not Found", body = Problem, content_type = "application/problem+json"),
        (status = 500, description = "Internal Server Error", body = Problem, content_type = "application/problem+json")
    )
)]
pub async fn update_customer(
    uri: OriginalUri,
    Extension(svc): Extension<Arc<Service>>,
    id: Result<Path<Uuid>, PathRejection>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<StatusCode, ProblemResponse> {
    let id = path_id(id, &uri)?;
    let req_body: UpdateCustomerReq = decode_item(json_value(body, &uri)?, "")
        .map_err(|e| validation_problem(vec![e], uri.path()))?;
    info!("Updating customer {} with: {:?}", id, req_body);
    let mut errors = Vec::new();
    req_body.validate("", &mut errors);
    if !errors.is_empty() {
        return Err(validation_problem(errors, uri.path()));
    }
    match svc.update_customer(id, req_body.into()).await {
        Ok(()) => Ok(StatusCode::NO_CONTENT),
        Err(e) => {
            error!("Failed to update customer {}: {}", id, e);
            Err(map_domain_error(&e, uri.path()))
        }
    }
}

/// Replace a batch of customers; nothing is applied if any id is unknown
#[utoipa::path(
    put,
    path = "/customers",
    tag = "customers",
    operation_id = "customers.update_customers",
    request_body = Vec<UpdateCustomerItemReq>,
    responses(
        (status = 204, description = "Customers updated"),
        (status = 400, description = "Bad Request", body = Problem, content_type = "application/problem+json"),
        (status = 404, description = "Not Found", body = Problem, content_type = "application/problem+json"),
        (status = 500, description = "Internal Server Error", body = Problem, content_type = "application/problem+json")
    )
)]
pub async fn update_customers(
    uri: OriginalUri,
    Extension(svc): Extension<Arc<Service>>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<StatusCode, ProblemResponse> {
    let items: Vec<UpdateCustomerItemReq> = decode_items(json_value(body, &uri)?)
        .map_err(|errors| validation_problem(errors, uri.path()))?;
    info!("Updating {} customers", items.len());
    let mut errors = Vec::new();
    for (i, item) in items.iter().enumerate() {
        item.validate(&format!("/{i}"), &mut errors);
    }
    if !errors.is_empty() {
        return Err(validation_problem(errors, uri.path()));
    }
    let items = items.into_iter().map(Into::into).collect();
    match svc.update_customers(items).await {
        Ok(()) => Ok(StatusCode::NO_CONTENT),
        Err(e) => {
            error!("Failed to update customers: {}", e);
            Err(map_domain_error(&e, uri.path()))
        }
    }
}

/// Delete a customer by id
#[utoipa::path(
    delete,
    path = "/customers/{id}",
    tag = "customers",
    operation_id = "customers.delete_customer",
    params(("id" = Uuid, Path, description = "Customer UUID")),
    responses(
        (status = 204, description = "Customer deleted"),
        (status = 400, description = "Bad Request", body = Problem, content_type = "application/problem+json"),
        (status = 404, description = "Not Found", body = Problem, content_type = "application/problem+json"),
        (status = 500, description = "Internal Server Error", body = Problem, content_type = "application/problem+json")
    )
)]
pub async fn delete_customer(
    Extension(svc): Extension<Arc<Service>>,
    id: Result<Path<Uuid>, PathRejection>,
    uri: OriginalUri,
) -> Result<StatusCode, ProblemResponse> {
    let id = path_id(id, &uri)?;
    info!("Deleting customer: {}", id);
    match svc.delete_customer(id).await {
        Ok(()) => Ok(StatusCode::NO_CONTENT),
        Err(e) => {
            error!("Failed to delete customer {}: {}", id, e);
            Err(map_domain_error(&e, uri.path()))
        }
    }
}

/// Delete a batch of customers; nothing is removed if any id is unknown
#[utoipa::path(
    delete,
    path = "/customers",
    tag = "customers",
    operation_id = "customers.delete_customers",
    request_body = Vec<DeleteCustomerReq>,
    responses(
        (status = 204, description = "Customers deleted"),
        (status = 400, description = "Bad Request", body = Problem, content_type = "application/problem+json"),
        (status = 404, description = "Not Found", body = Problem, content_type = "application/problem+json"),
        (status = 500, description = "Internal Server Error", body = Problem, content_type = "application/problem+json")
    )
)]
pub async fn delete_customers(
    uri: OriginalUri,
    Extension(svc): Extension<Arc<Service>>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<StatusCode, ProblemResponse> {
    let items: Vec<DeleteCustomerReq> = decode_items(json_value(body, &uri)?)
        .map_err(|errors| validation_problem(errors, uri.path()))?;
    info!("Deleting {} customers", items.len());
    let ids = items.into_iter().map(|d| d.id).collect();
    match svc.delete_customers(ids).await {
        Ok(()) => Ok(StatusCode::NO_CONTENT),
        Err(e) => {
            error!("Failed to delete customers: {}", e);
            Err(map_domain_error(&e, uri.path()))
        }
    }
}
