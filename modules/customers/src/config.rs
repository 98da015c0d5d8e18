use serde::{Deserialize, Serialize};

/// Configuration for the customers module
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CustomersConfig {
    /// Prefix under which `/customers` routes are mounted.
    #[serde(default = "default_base_path")]
    pub base_path: String,
    /// Upper bound on items accepted by a single batch request.
    #[serde(default = "default_max_batch_size")]
    pub max_batch_size: usize,
}

impl Default for CustomersConfig {
    fn default() -> Self {
        Self {
            base_path: default_base_path(),
            max_batch_size: default_max_batch_size(),
        }
    }
}

fn default_base_path() -> String {
    "/api".to_string()
}

fn default_max_batch_size() -> usize {
    1000
}
