use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::http::StatusCode;

use crate::api::rest::ids::IdSetError;
use crate::api::rest::problem::{Problem, ProblemResponse, ValidationError};
use crate::domain::error::DomainError;

/// Helper to create a ProblemResponse with less boilerplate
pub fn from_parts(
    status: StatusCode,
    code: &str,
    title: &str,
    detail: impl Into<String>,
    instance: &str,
) -> ProblemResponse {
    let problem = Problem::new(status, title, detail)
        .with_type(format!("https://errors.example.com/{}", code))
        .with_code(code)
        .with_instance(instance);

    ProblemResponse(problem)
}

/// Map domain error to RFC9457 ProblemResponse
pub fn map_domain_error(e: &DomainError, instance: &str) -> ProblemResponse {
    match e {
        DomainError::CustomerNotFound { .. } | DomainError::CustomersNotFound { .. } => {
            from_parts(
                StatusCode::NOT_FOUND,
                "CUSTOMERS_NOT_FOUND",
                "Customer not found",
                e.to_string(),
                instance,
            )
        }
        DomainError::InvalidArgument { .. } => from_parts(
            StatusCode::BAD_REQUEST,
            "CUSTOMERS_INVALID_ARGUMENT",
            "Invalid argument",
            e.to_string(),
            instance,
        ),
        DomainError::Validation { field, message } => {
            let mut resp = from_parts(
                StatusCode::BAD_REQUEST,
                "CUSTOMERS_VALIDATION",
                "Validation error",
                e.to_string(),
                instance,
            );
            resp.0 = resp.0.with_errors(vec![ValidationError {
                detail: message.clone(),
                pointer: format!("/{field}"),
            }]);
            resp
        }
        DomainError::BatchTooLarge { .. } => from_parts(
            StatusCode::BAD_REQUEST,
            "CUSTOMERS_VALIDATION",
            "Validation error",
            e.to_string(),
            instance,
        ),
        DomainError::Database { .. } => {
            // Log the internal error details but don't expose them to the client
            tracing::error!(error = ?e, "Database error occurred");
            from_parts(
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_DB",
                "Internal error",
                "An internal database error occurred",
                instance,
            )
        }
    }
}

/// 400 carrying every field violation found in the request body.
pub fn validation_problem(errors: Vec<ValidationError>, instance: &str) -> ProblemResponse {
    let detail = format!("Request body has {} invalid field(s)", errors.len());
    let mut resp = from_parts(
        StatusCode::BAD_REQUEST,
        "CUSTOMERS_VALIDATION",
        "Validation error",
        detail,
        instance,
    );
    resp.0 = resp.0.with_errors(errors);
    resp
}

pub fn id_set_problem(e: &IdSetError, instance: &str) -> ProblemResponse {
    from_parts(
        StatusCode::BAD_REQUEST,
        "CUSTOMERS_INVALID_ID",
        "Invalid customer id",
        e.to_string(),
        instance,
    )
}

/// Body that is not readable JSON. Syntax and shape errors are validation failures;
/// transport problems (content type, size) keep the rejection's own status.
pub fn json_rejection_problem(rejection: &JsonRejection, instance: &str) -> ProblemResponse {
    match rejection {
        JsonRejection::JsonDataError(_) | JsonRejection::JsonSyntaxError(_) => {
            let errors = vec![ValidationError {
                detail: rejection.body_text(),
                pointer: String::new(),
            }];
            validation_problem(errors, instance)
        }
        _ => from_parts(
            rejection.status(),
            "CUSTOMERS_UNREADABLE_BODY",
            "Unreadable request body",
            rejection.body_text(),
            instance,
        ),
    }
}

pub fn path_rejection_problem(rejection: &PathRejection, instance: &str) -> ProblemResponse {
    from_parts(
        StatusCode::BAD_REQUEST,
        "CUSTOMERS_INVALID_ID",
        "Invalid customer id",
        rejection.body_text(),
        instance,
    )
}
