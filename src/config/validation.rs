//! Configuration validation.
//!
//! Semantic checks only; serde handles syntax. Every problem is reported,
//! not just the first one.

use std::fmt;
use std::net::SocketAddr;

use crate::config::schema::GatewayConfig;

/// A single semantic problem with the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validate a loaded configuration.
///
/// A missing server secret is not an error: the gateway then rejects every
/// request, which the caller is expected to warn about.
pub fn validate_config(config: &GatewayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.opencloud.api_key.trim().is_empty() {
        errors.push(ValidationError::new(
            "opencloud.api_key",
            "must be set (ROBLOX_API_KEY)",
        ));
    }

    let group_id = config.opencloud.group_id.trim();
    if group_id.is_empty() {
        errors.push(ValidationError::new(
            "opencloud.group_id",
            "must be set (ROBLOX_GROUP_ID)",
        ));
    } else if !group_id.bytes().all(|b| b.is_ascii_digit()) {
        errors.push(ValidationError::new(
            "opencloud.group_id",
            format!("'{}' is not a numeric group id", group_id),
        ));
    }

    if let Err(e) = url::Url::parse(&config.opencloud.base_url) {
        errors.push(ValidationError::new(
            "opencloud.base_url",
            format!("invalid URL '{}': {}", config.opencloud.base_url, e),
        ));
    }

    if config.opencloud.timeout_secs == 0 {
        errors.push(ValidationError::new("opencloud.timeout_secs", "must be > 0"));
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::new("timeouts.request_secs", "must be > 0"));
    }

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::new(
            "listener.bind_address",
            format!("'{}' is not a socket address", config.listener.bind_address),
        ));
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::new(
            "observability.metrics_address",
            format!(
                "'{}' is not a socket address",
                config.observability.metrics_address
            ),
        ));
    }

    if matches!(config.auth.server_secret.as_deref(), Some(s) if s.is_empty()) {
        errors.push(ValidationError::new(
            "auth.server_secret",
            "must not be empty when present",
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
