//! Layered application configuration.

use std::net::SocketAddr;
use std::path::Path;

use anyhow::{Context, Result};
use api_gateway::ApiGatewayConfig;
use calculator::CalculatorConfig;
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Yaml};
use serde::{Deserialize, Serialize};

/// Environment variables with this prefix override file values,
/// `__` separating nested keys (`APP__SERVER__BIND_ADDR`).
pub const ENV_PREFIX: &str = "APP__";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub gateway: ApiGatewayConfig,
    pub calculator: CalculatorConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct ServerConfig {
    pub bind_addr: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:3000".to_owned(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct LoggingConfig {
    /// `EnvFilter` directive, e.g. `info` or `calculator=debug,tower_http=info`.
    pub level: String,
    /// Emit JSON lines instead of human-readable output.
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_owned(),
            json: false,
        }
    }
}

impl AppConfig {
    /// Defaults, then the YAML file (if any), then `APP__*` environment variables.
    ///
    /// # Errors
    /// Returns an error on unreadable or malformed sources and on unknown keys.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));
        if let Some(path) = path {
            figment = figment.merge(Yaml::file(path));
        }
        figment
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .context("invalid configuration")
    }

    /// Replaces the port of `server.bind_addr`.
    ///
    /// # Errors
    /// Returns an error if the configured address does not parse.
    pub fn apply_port_override(&mut self, port: u16) -> Result<()> {
        let mut addr = self.bind_addr()?;
        addr.set_port(port);
        self.server.bind_addr = addr.to_string();
        Ok(())
    }

    /// # Errors
    /// Returns an error if `server.bind_addr` is not `host:port`.
    pub fn bind_addr(&self) -> Result<SocketAddr> {
        self.server
            .bind_addr
            .parse()
            .with_context(|| format!("invalid bind address '{}'", self.server.bind_addr))
    }

    /// Pretty JSON rendering used by `--print-config` and `check`.
    ///
    /// # Errors
    /// Returns an error if serialization fails.
    pub fn to_pretty_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("failed to render configuration")
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use std::time::Duration;

    fn write_yaml(contents: &str) -> tempfile::NamedTempFile {
        let file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        std::fs::write(file.path(), contents).unwrap();
        file
    }

    #[test]
    fn test_defaults_without_sources() {
        temp_env::with_vars_unset(
            ["APP__SERVER__BIND_ADDR", "APP__LOGGING__LEVEL"],
            || {
                let cfg = AppConfig::load(None).unwrap();
                assert_eq!(cfg, AppConfig::default());
                assert_eq!(cfg.server.bind_addr, "127.0.0.1:3000");
                assert!(cfg.calculator.seed);
            },
        );
    }

    #[test]
    fn test_yaml_file_overrides_defaults() {
        let file = write_yaml(
            "server:\n  bind_addr: 0.0.0.0:8080\n\
             gateway:\n  request_timeout: 5s\n  validate_responses: false\n\
             calculator:\n  seed: false\n",
        );

        let cfg = AppConfig::load(Some(file.path())).unwrap();
        assert_eq!(cfg.server.bind_addr, "0.0.0.0:8080");
        assert_eq!(cfg.gateway.request_timeout, Duration::from_secs(5));
        assert!(!cfg.gateway.validate_responses);
        assert!(cfg.gateway.validate_requests);
        assert!(!cfg.calculator.seed);
    }

    #[test]
    fn test_env_overrides_file() {
        let file = write_yaml("logging:\n  level: warn\n");

        temp_env::with_vars(
            [
                ("APP__LOGGING__LEVEL", Some("debug")),
                ("APP__GATEWAY__BODY_LIMIT_BYTES", Some("2048")),
            ],
            || {
                let cfg = AppConfig::load(Some(file.path())).unwrap();
                assert_eq!(cfg.logging.level, "debug");
                assert_eq!(cfg.gateway.body_limit_bytes, 2048);
            },
        );
    }

    #[test]
    fn test_unknown_keys_are_rejected() {
        let file = write_yaml("server:\n  bind_adr: 0.0.0.0:1\n");
        assert!(AppConfig::load(Some(file.path())).is_err());
    }

    #[test]
    fn test_port_override_keeps_host() {
        let mut cfg = AppConfig::default();
        cfg.apply_port_override(9999).unwrap();
        assert_eq!(cfg.server.bind_addr, "127.0.0.1:9999");

        cfg.server.bind_addr = "localhost".to_owned();
        assert!(cfg.apply_port_override(1).is_err());
    }

    #[test]
    fn test_pretty_json_uses_humantime() {
        let rendered = AppConfig::default().to_pretty_json().unwrap();
        assert!(rendered.contains("\"request_timeout\": \"30s\""));
    }
}
