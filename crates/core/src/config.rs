//! Collaborator configuration.
//!
//! Configuration is resolved once at process startup and then passed into the collaborator.
//! The parsing helpers take `Option<String>` rather than reading the environment themselves so
//! that binaries own the environment and tests never touch process-wide state.

use crate::constants::{DEFAULT_API_URL, DEFAULT_REQUEST_TIMEOUT_SECS};
use crate::{BlueprintError, BlueprintResult};
use blueprint_types::NonEmptyText;
use std::time::Duration;

/// Settings for reaching the data collaborator.
#[derive(Clone, Debug)]
pub struct ClientConfig {
    base_url: String,
    request_timeout: Duration,
}

impl ClientConfig {
    /// Create a new `ClientConfig`.
    ///
    /// The base URL must use `http` or `https`. A trailing slash is stripped so endpoint paths
    /// can be appended directly.
    ///
    /// # Errors
    ///
    /// Returns [`BlueprintError::InvalidConfig`] if the URL scheme is unsupported or the timeout
    /// is zero.
    pub fn new(base_url: NonEmptyText, request_timeout: Duration) -> BlueprintResult<Self> {
        let url = base_url.as_str().trim_end_matches('/');
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(BlueprintError::InvalidConfig(format!(
                "base URL must start with http:// or https://, got '{url}'"
            )));
        }
        if request_timeout.is_zero() {
            return Err(BlueprintError::InvalidConfig(
                "request timeout must be greater than zero".into(),
            ));
        }

        Ok(Self {
            base_url: url.to_string(),
            request_timeout,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    /// Join an endpoint path (starting with `/`) onto the base URL.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

/// Parse the API base URL from an optional string value.
///
/// If `value` is `None` or empty/whitespace, returns [`DEFAULT_API_URL`].
pub fn base_url_from_env_value(value: Option<String>) -> BlueprintResult<NonEmptyText> {
    let value = value.filter(|v| !v.trim().is_empty());
    match value {
        Some(v) => Ok(NonEmptyText::new(v)?),
        None => Ok(NonEmptyText::new(DEFAULT_API_URL)?),
    }
}

/// Parse the request timeout (whole seconds) from an optional string value.
///
/// If `value` is `None` or empty/whitespace, returns the default timeout.
pub fn request_timeout_from_env_value(value: Option<String>) -> BlueprintResult<Duration> {
    let value = value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty());

    let secs = match value {
        Some(v) => v.parse::<u64>().map_err(|e| {
            BlueprintError::InvalidConfig(format!("invalid request timeout '{v}': {e}"))
        })?,
        None => DEFAULT_REQUEST_TIMEOUT_SECS,
    };

    Ok(Duration::from_secs(secs))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_when_unset_or_blank() {
        let url = base_url_from_env_value(None).expect("default url");
        assert_eq!(url.as_str(), DEFAULT_API_URL);

        let url = base_url_from_env_value(Some("   ".into())).expect("blank url");
        assert_eq!(url.as_str(), DEFAULT_API_URL);

        let timeout = request_timeout_from_env_value(Some(String::new())).expect("timeout");
        assert_eq!(timeout, Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS));
    }

    #[test]
    fn rejects_non_numeric_timeout() {
        let err = request_timeout_from_env_value(Some("soon".into())).expect_err("bad timeout");
        assert!(matches!(err, BlueprintError::InvalidConfig(msg) if msg.contains("soon")));
    }

    #[test]
    fn config_strips_trailing_slash_and_joins_endpoints() {
        let cfg = ClientConfig::new(
            NonEmptyText::new("https://health.example/api/").unwrap(),
            Duration::from_secs(5),
        )
        .expect("valid config");

        assert_eq!(cfg.base_url(), "https://health.example/api");
        assert_eq!(
            cfg.endpoint("/blueprint"),
            "https://health.example/api/blueprint"
        );
    }

    #[test]
    fn config_rejects_unsupported_scheme_and_zero_timeout() {
        let err = ClientConfig::new(
            NonEmptyText::new("ftp://health.example").unwrap(),
            Duration::from_secs(5),
        )
        .expect_err("ftp scheme");
        assert!(matches!(err, BlueprintError::InvalidConfig(_)));

        let err = ClientConfig::new(
            NonEmptyText::new("http://localhost:3000").unwrap(),
            Duration::ZERO,
        )
        .expect_err("zero timeout");
        assert!(matches!(err, BlueprintError::InvalidConfig(_)));
    }
}
