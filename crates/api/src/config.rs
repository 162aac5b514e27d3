//! Process configuration read from the environment.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use axum::http::HeaderValue;
use thiserror::Error;

use skuflow_infra::ServiceConfig;

pub const DEFAULT_HOST: IpAddr = IpAddr::V4(Ipv4Addr::UNSPECIFIED);
pub const DEFAULT_PORT: u16 = 3000;
pub const ANY_ORIGIN: &str = "*";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var} is not a valid {expected}: {value:?}")]
    Invalid {
        var: &'static str,
        expected: &'static str,
        value: String,
    },
}

impl ConfigError {
    fn invalid(var: &'static str, expected: &'static str, value: impl Into<String>) -> Self {
        ConfigError::Invalid {
            var,
            expected,
            value: value.into(),
        }
    }
}

/// Everything the binary needs to start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    pub host: IpAddr,
    pub port: u16,
    /// Postgres connection string; `None` selects the in-memory store.
    pub database_url: Option<String>,
    /// Let `POST /skus` pick any initial status.
    pub allow_initial_status: bool,
    /// Insert the demo catalog on startup.
    pub seed_demo: bool,
    /// `*` or a single origin.
    pub cors_allow_origin: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST,
            port: DEFAULT_PORT,
            database_url: None,
            allow_initial_status: false,
            seed_demo: false,
            cors_allow_origin: ANY_ORIGIN.to_string(),
        }
    }
}

impl ApiConfig {
    /// Read from the process environment. Call `dotenvy::dotenv()` first to
    /// pick up a `.env` file.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read through an arbitrary lookup (blank values count as unset).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let host = match get("HOST") {
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::invalid("HOST", "IP address", raw))?,
            None => DEFAULT_HOST,
        };

        let port = match get("PORT") {
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::invalid("PORT", "port number", raw))?,
            None => DEFAULT_PORT,
        };

        let allow_initial_status =
            parse_flag("SKU_ALLOW_INITIAL_STATUS", get("SKU_ALLOW_INITIAL_STATUS"))?;
        let seed_demo = parse_flag("SKU_SEED_DEMO", get("SKU_SEED_DEMO"))?;

        let cors_allow_origin = get("CORS_ALLOW_ORIGIN")
            .map(|v| v.trim().to_string())
            .unwrap_or_else(|| ANY_ORIGIN.to_string());
        if cors_allow_origin != ANY_ORIGIN && HeaderValue::from_str(&cors_allow_origin).is_err() {
            return Err(ConfigError::invalid("CORS_ALLOW_ORIGIN", "origin", cors_allow_origin));
        }

        Ok(Self {
            host,
            port,
            database_url: get("DATABASE_URL"),
            allow_initial_status,
            seed_demo,
            cors_allow_origin,
        })
    }

    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    pub fn service_config(&self) -> ServiceConfig {
        ServiceConfig::from_flag(self.allow_initial_status)
    }
}

fn parse_flag(var: &'static str, raw: Option<String>) -> Result<bool, ConfigError> {
    let Some(raw) = raw else {
        return Ok(false);
    };
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::invalid(var, "boolean", raw)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(pairs: &[(&str, &str)]) -> Result<ApiConfig, ConfigError> {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ApiConfig::from_lookup(|key| env.get(key).cloned())
    }

    #[test]
    fn empty_environment_uses_defaults() {
        let config = load(&[]).unwrap();
        assert_eq!(config, ApiConfig::default());
        assert_eq!(config.bind_addr().to_string(), "0.0.0.0:3000");
        assert_eq!(config.service_config(), ServiceConfig::default());
    }

    #[test]
    fn reads_every_variable() {
        let config = load(&[
            ("HOST", "127.0.0.1"),
            ("PORT", "8081"),
            ("DATABASE_URL", "postgres://localhost/skus"),
            ("SKU_ALLOW_INITIAL_STATUS", "true"),
            ("SKU_SEED_DEMO", "1"),
            ("CORS_ALLOW_ORIGIN", "http://localhost:5173"),
        ])
        .unwrap();

        assert_eq!(config.bind_addr().to_string(), "127.0.0.1:8081");
        assert_eq!(config.database_url.as_deref(), Some("postgres://localhost/skus"));
        assert!(config.allow_initial_status);
        assert!(config.seed_demo);
        assert_eq!(config.cors_allow_origin, "http://localhost:5173");
        assert_eq!(config.service_config(), ServiceConfig::allowing_initial_status());
    }

    #[test]
    fn blank_values_count_as_unset() {
        let config = load(&[("DATABASE_URL", "  "), ("PORT", "")]).unwrap();
        assert_eq!(config.database_url, None);
        assert_eq!(config.port, DEFAULT_PORT);
    }

    #[test]
    fn invalid_values_are_rejected() {
        assert!(matches!(
            load(&[("PORT", "http")]),
            Err(ConfigError::Invalid { var: "PORT", .. })
        ));
        assert!(matches!(
            load(&[("HOST", "not-an-ip")]),
            Err(ConfigError::Invalid { var: "HOST", .. })
        ));
        assert!(matches!(
            load(&[("SKU_SEED_DEMO", "maybe")]),
            Err(ConfigError::Invalid { var: "SKU_SEED_DEMO", .. })
        ));
        assert!(matches!(
            load(&[("CORS_ALLOW_ORIGIN", "bad\norigin")]),
            Err(ConfigError::Invalid { var: "CORS_ALLOW_ORIGIN", .. })
        ));
    }
}
