use crate::constants::broker::{DEFAULT_BROKER_NAME, DEFAULT_ORIGIN};
use crate::constants::network::{
    DEFAULT_HOST, DEFAULT_PORT, JOLOKIA_PATH, TIMEOUT_JOLOKIA_REQUEST_MS,
};
use crate::errors::ToolError;
use crate::jolokia::mbean::broker_object_name;
use crate::services::validation::Validation;
use serde_json::Value;
use url::Url;

pub const ENV_HOST: &str = "AMQ_HOST";
pub const ENV_PORT: &str = "AMQ_PORT";
pub const ENV_BROKER_NAME: &str = "AMQ_BROKER_NAME";
pub const ENV_ORIGIN: &str = "AMQ_ORIGIN";
pub const ENV_TIMEOUT_MS: &str = "AMQ_TIMEOUT_MS";

/// Broker identity, resolved once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrokerConfig {
    pub host: String,
    pub port: u16,
    pub broker_name: String,
    pub origin: String,
    pub request_timeout_ms: u64,
}

#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub broker_name: Option<String>,
    pub origin: Option<String>,
    pub request_timeout_ms: Option<u64>,
}

impl Default for BrokerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            broker_name: DEFAULT_BROKER_NAME.to_string(),
            origin: DEFAULT_ORIGIN.to_string(),
            request_timeout_ms: TIMEOUT_JOLOKIA_REQUEST_MS,
        }
    }
}

impl BrokerConfig {
    pub fn from_env() -> Result<Self, ToolError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ToolError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let validation = Validation::new();
        let defaults = Self::default();
        let read = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let host = match read(ENV_HOST) {
            Some(raw) => validation.ensure_identifier(&raw, ENV_HOST)?,
            None => defaults.host,
        };
        let port = validation.ensure_port(
            read(ENV_PORT).map(Value::String).as_ref(),
            Some(defaults.port),
        )?;
        let broker_name = match read(ENV_BROKER_NAME) {
            Some(raw) => validation.ensure_identifier(&raw, ENV_BROKER_NAME)?,
            None => defaults.broker_name,
        };
        let origin = read(ENV_ORIGIN).unwrap_or(defaults.origin);
        let request_timeout_ms = validation.ensure_positive_int(
            read(ENV_TIMEOUT_MS).map(Value::String).as_ref(),
            ENV_TIMEOUT_MS,
            defaults.request_timeout_ms,
        )?;

        let config = Self {
            host,
            port,
            broker_name,
            origin,
            request_timeout_ms,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn with_overrides(mut self, overrides: ConfigOverrides) -> Result<Self, ToolError> {
        if let Some(host) = overrides.host {
            self.host = host;
        }
        if let Some(port) = overrides.port {
            self.port = port;
        }
        if let Some(broker_name) = overrides.broker_name {
            self.broker_name = broker_name;
        }
        if let Some(origin) = overrides.origin {
            self.origin = origin;
        }
        if let Some(timeout) = overrides.request_timeout_ms {
            self.request_timeout_ms = timeout;
        }
        self.validate()?;
        Ok(self)
    }

    fn validate(&self) -> Result<(), ToolError> {
        let validation = Validation::new();
        validation.ensure_identifier(&self.host, "host")?;
        validation.ensure_identifier(&self.broker_name, "broker_name")?;
        broker_object_name(&self.broker_name)?;
        if self.port == 0 {
            return Err(ToolError::invalid_params("Port must be non-zero"));
        }
        if self.request_timeout_ms == 0 {
            return Err(ToolError::invalid_params("request timeout must be positive"));
        }
        Url::parse(&self.base_url()).map_err(|err| {
            ToolError::invalid_params(format!("Invalid broker URL: {}", err))
                .with_details(serde_json::json!({ "host": self.host, "port": self.port }))
        })?;
        Ok(())
    }

    pub fn base_url(&self) -> String {
        format!("http://{}:{}{}", self.host, self.port, JOLOKIA_PATH)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_environment_is_empty() {
        let config = BrokerConfig::from_lookup(lookup(&[])).expect("config");
        assert_eq!(config, BrokerConfig::default());
        assert_eq!(config.base_url(), "http://localhost:8161/console/jolokia");
        assert_eq!(config.request_timeout_ms, 30_000);
    }

    #[test]
    fn environment_values_are_read() {
        let config = BrokerConfig::from_lookup(lookup(&[
            (ENV_HOST, "broker.internal"),
            (ENV_PORT, "8443"),
            (ENV_BROKER_NAME, "edge"),
            (ENV_ORIGIN, "console.example.com"),
            (ENV_TIMEOUT_MS, "1500"),
        ]))
        .expect("config");
        assert_eq!(config.base_url(), "http://broker.internal:8443/console/jolokia");
        assert_eq!(config.broker_name, "edge");
        assert_eq!(config.origin, "console.example.com");
        assert_eq!(config.request_timeout_ms, 1500);
    }

    #[test]
    fn invalid_port_fails_startup() {
        let err = BrokerConfig::from_lookup(lookup(&[(ENV_PORT, "99999")])).expect_err("port");
        assert!(err.message.contains("Port"));
    }

    #[test]
    fn overrides_win_over_environment() {
        let config = BrokerConfig::from_lookup(lookup(&[(ENV_HOST, "env-host")]))
            .and_then(|c| {
                c.with_overrides(ConfigOverrides {
                    host: Some("cli-host".to_string()),
                    ..Default::default()
                })
            })
            .expect("config");
        assert_eq!(config.host, "cli-host");
    }

    #[test]
    fn broker_name_with_bang_is_rejected() {
        assert!(BrokerConfig::from_lookup(lookup(&[(ENV_BROKER_NAME, "a!b")])).is_err());
    }

    #[test]
    fn broker_name_with_path_delimiter_is_rejected() {
        for name in ["a/b", "a?b", "a#b"] {
            let err = BrokerConfig::from_lookup(lookup(&[(ENV_BROKER_NAME, name)]))
                .expect_err("must reject");
            assert!(err.message.contains("broker_name"));
        }
    }
}
