use std::time::Duration;

use compte_api::client::config::ServiceConfig;
use serde::{Deserialize, Serialize};

/// User overrides of the service location. Unset fields keep the built-in defaults.
#[derive(Serialize, Deserialize, Default, Debug, Clone, PartialEq)]
pub struct Settings {
    #[serde(rename = "endpoint")]
    pub endpoint: Option<String>,
    #[serde(rename = "timeoutSecs")]
    pub timeout_secs: Option<u64>,
}

impl Settings {
    pub fn service_config(&self) -> ServiceConfig {
        let mut config = ServiceConfig::default();
        if let Some(endpoint) = self.endpoint.as_deref() {
            config = config.with_endpoint(endpoint);
        }
        if let Some(timeout_secs) = self.timeout_secs {
            config = config.with_timeout(Duration::from_secs(timeout_secs));
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_settings_use_defaults() {
        assert_eq!(Settings::default().service_config(), ServiceConfig::default());
    }

    #[test]
    fn test_overlay_only_set_fields() {
        let settings = Settings {
            endpoint: Some("http://192.168.1.20:8080/services/ws".to_string()),
            timeout_secs: None,
        };
        let config = settings.service_config();
        assert_eq!(config.endpoint, "http://192.168.1.20:8080/services/ws");
        assert_eq!(config.timeout, ServiceConfig::default().timeout);
        assert_eq!(config.namespace, ServiceConfig::default().namespace);

        let settings = Settings {
            endpoint: None,
            timeout_secs: Some(3),
        };
        let config = settings.service_config();
        assert_eq!(config.endpoint, ServiceConfig::default().endpoint);
        assert_eq!(config.timeout, Duration::from_secs(3));
    }

    #[test]
    fn test_deserialize_partial_file() {
        let settings: Settings = serde_json::from_str(r#"{"timeoutSecs": 10}"#).unwrap();
        assert_eq!(settings.endpoint, None);
        assert_eq!(settings.timeout_secs, Some(10));
    }
}
