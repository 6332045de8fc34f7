use std::time::Duration;

use crate::constants::{BASE_URL, NAMESPACE, TIMEOUT_SECS};

/// Where and how the account service is reached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    /// Target namespace of the service, also the prefix of every SOAP action
    pub namespace: String,
    pub endpoint: String,
    pub timeout: Duration,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        ServiceConfig {
            namespace: NAMESPACE.to_string(),
            endpoint: BASE_URL.to_string(),
            timeout: Duration::from_secs(TIMEOUT_SECS),
        }
    }
}

impl ServiceConfig {
    pub fn with_endpoint(mut self, endpoint: &str) -> Self {
        self.endpoint = endpoint.to_string();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}
