use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

fn default_exempt_paths() -> Vec<String> {
    vec!["/openapi.json".to_owned(), "/api-docs".to_owned()]
}

/// Gateway configuration (`gateway` section).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields, default)]
pub struct ApiGatewayConfig {
    /// Maximum accepted request body size.
    pub body_limit_bytes: usize,

    /// Per-request deadline, e.g. `"30s"` or `"1m 30s"`.
    #[serde(with = "humantime_duration")]
    pub request_timeout: Duration,

    /// Reject requests that do not match the contract with 400/405.
    pub validate_requests: bool,

    /// Turn responses that do not match the contract into 500s.
    pub validate_responses: bool,

    /// Path prefixes that bypass contract validation.
    pub exempt_paths: Vec<String>,

    /// JSON OpenAPI document to validate against instead of the generated one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contract_path: Option<PathBuf>,
}

impl Default for ApiGatewayConfig {
    fn default() -> Self {
        Self {
            body_limit_bytes: 1024 * 1024,
            request_timeout: Duration::from_secs(30),
            validate_requests: true,
            validate_responses: true,
            exempt_paths: default_exempt_paths(),
            contract_path: None,
        }
    }
}

impl ApiGatewayConfig {
    /// Whether `path` equals an exempt entry or lies beneath it.
    #[must_use]
    pub fn is_exempt(&self, path: &str) -> bool {
        self.exempt_paths.iter().any(|prefix| {
            path.strip_prefix(prefix.as_str())
                .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
        })
    }
}

mod humantime_duration {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&humantime::format_duration(*value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let raw = String::deserialize(deserializer)?;
        humantime::parse_duration(&raw).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = ApiGatewayConfig::default();
        assert_eq!(cfg.body_limit_bytes, 1_048_576);
        assert_eq!(cfg.request_timeout, Duration::from_secs(30));
        assert!(cfg.validate_requests);
        assert!(cfg.validate_responses);
        assert!(cfg.contract_path.is_none());
    }

    #[test]
    fn test_exempt_matches_whole_segments() {
        let cfg = ApiGatewayConfig::default();
        assert!(cfg.is_exempt("/openapi.json"));
        assert!(cfg.is_exempt("/api-docs"));
        assert!(cfg.is_exempt("/api-docs/index.html"));
        assert!(!cfg.is_exempt("/api-docsx"));
        assert!(!cfg.is_exempt("/calculator"));
    }

    #[test]
    fn test_timeout_round_trips_as_humantime() {
        let cfg: ApiGatewayConfig =
            serde_json::from_value(serde_json::json!({ "request_timeout": "1m 30s" })).unwrap();
        assert_eq!(cfg.request_timeout, Duration::from_secs(90));

        let value = serde_json::to_value(&cfg).unwrap();
        assert_eq!(value["request_timeout"], "1m 30s");
    }

    #[test]
    fn test_unknown_keys_are_rejected() {
        let err = serde_json::from_value::<ApiGatewayConfig>(serde_json::json!({ "bogus": 1 }));
        assert!(err.is_err());
    }
}
