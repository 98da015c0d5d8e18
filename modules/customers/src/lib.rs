// === PUBLIC CONTRACT ===
// Plain domain models shared by every layer of the module
pub mod contract;

pub use contract::model;

// === MODULE WIRING ===
pub mod config;
pub mod module;
pub use config::CustomersConfig;
pub use module::Customers;

// === INTERNAL MODULES ===
// Exposed for the server binary and for comprehensive testing.
pub mod api;
pub mod domain;
pub mod infra;
