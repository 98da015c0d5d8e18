pub mod dto;
pub mod error;
pub mod handlers;
pub mod ids;
pub mod openapi;
pub mod problem;
pub mod routes;
