use std::net::SocketAddr;

use thiserror::Error;

pub const DEFAULT_TABLE_NAME: &str = "todos";
pub const DEFAULT_REGION: &str = "us-east-1";
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    DynamoDb,
    Memory,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid BIND_ADDR {0:?}")]
    BindAddr(String),
    #[error("unknown STORE_BACKEND {0:?} (expected dynamodb or memory)")]
    Backend(String),
}

/// Runtime configuration read from the environment.
///
/// - `TODOS_TABLE_NAME` (default `todos`)
/// - `AWS_REGION` (default `us-east-1`)
/// - `DYNAMODB_ENDPOINT_URL` (unset: regional AWS endpoint)
/// - `STORE_BACKEND` (`dynamodb` | `memory`, default `dynamodb`)
/// - `BIND_ADDR` (default `0.0.0.0:3000`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub table_name: String,
    pub region: String,
    pub endpoint_url: Option<String>,
    pub backend: StoreBackend,
    pub bind_addr: SocketAddr,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let backend = match non_empty("STORE_BACKEND").as_deref().map(str::to_ascii_lowercase).as_deref() {
            None | Some("dynamodb") => StoreBackend::DynamoDb,
            Some("memory") => StoreBackend::Memory,
            Some(other) => return Err(ConfigError::Backend(other.to_string())),
        };
        let bind = non_empty("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind.parse().map_err(|_| ConfigError::BindAddr(bind.clone()))?;

        Ok(Self {
            table_name: non_empty("TODOS_TABLE_NAME").unwrap_or_else(|| DEFAULT_TABLE_NAME.to_string()),
            region: non_empty("AWS_REGION").unwrap_or_else(|| DEFAULT_REGION.to_string()),
            endpoint_url: non_empty("DYNAMODB_ENDPOINT_URL"),
            backend,
            bind_addr,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> =
            pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.table_name, "todos");
        assert_eq!(config.region, "us-east-1");
        assert_eq!(config.endpoint_url, None);
        assert_eq!(config.backend, StoreBackend::DynamoDb);
        assert_eq!(config.bind_addr, "0.0.0.0:3000".parse().unwrap());
    }

    #[test]
    fn overrides_are_honoured() {
        let config = config_from(&[
            ("TODOS_TABLE_NAME", "tasks-dev"),
            ("AWS_REGION", "eu-west-1"),
            ("DYNAMODB_ENDPOINT_URL", "http://localhost:8000"),
            ("STORE_BACKEND", "Memory"),
            ("BIND_ADDR", "127.0.0.1:8080"),
        ])
        .unwrap();
        assert_eq!(config.table_name, "tasks-dev");
        assert_eq!(config.region, "eu-west-1");
        assert_eq!(config.endpoint_url.as_deref(), Some("http://localhost:8000"));
        assert_eq!(config.backend, StoreBackend::Memory);
        assert_eq!(config.bind_addr.port(), 8080);
    }

    #[test]
    fn blank_values_fall_back_to_defaults() {
        let config = config_from(&[("TODOS_TABLE_NAME", "  "), ("DYNAMODB_ENDPOINT_URL", "")]).unwrap();
        assert_eq!(config.table_name, "todos");
        assert_eq!(config.endpoint_url, None);
    }

    #[test]
    fn invalid_values_are_rejected() {
        assert_eq!(config_from(&[("BIND_ADDR", "nowhere")]), Err(ConfigError::BindAddr("nowhere".into())));
        assert_eq!(config_from(&[("STORE_BACKEND", "sqlite")]), Err(ConfigError::Backend("sqlite".into())));
    }
}
