//! Configuration for talking to the checker service.
//!
//! The configuration is built once and handed to [`crate::Validator`]; the
//! resolver and submitter only ever read it.

use std::time::Duration;

use url::Url;

use crate::error::ValidatorError;

/// Public Nu HTML Checker endpoint, asking for JSON output from the HTML5 parser.
pub const DEFAULT_ENDPOINT: &str = "https://validator.w3.org/nu/?out=json&parser=html5";

/// Client identification sent with every request.
pub const DEFAULT_USER_AGENT: &str = "Validator.nu/LV http://validator.w3.org/services";

/// Content type sent with every request.
pub const DEFAULT_CONTENT_TYPE: &str = "text/html; charset=utf-8";

/// Immutable settings shared by the fetch and submit stages.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct ValidatorConfig {
    /// Checker endpoint that receives the markup as a POST body.
    pub endpoint: Url,
    /// `User-Agent` header for both the page fetch and the submission.
    pub user_agent: String,
    /// `Content-Type` header for both the page fetch and the submission.
    pub content_type: String,
    /// Request timeout. `None` keeps the HTTP client's default.
    pub timeout: Option<Duration>,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            user_agent: DEFAULT_USER_AGENT.to_owned(),
            content_type: DEFAULT_CONTENT_TYPE.to_owned(),
            timeout: None,
        }
    }
}

impl ValidatorConfig {
    /// Replace the checker endpoint, e.g. to use a self-hosted Nu instance.
    ///
    /// # Errors
    ///
    /// Returns [`ValidatorError::InvalidEndpoint`] if `endpoint` does not parse
    /// as an absolute URL or has no host.
    pub fn with_endpoint(mut self, endpoint: &str) -> Result<Self, ValidatorError> {
        let parsed = Url::parse(endpoint).map_err(|e| ValidatorError::InvalidEndpoint {
            endpoint: endpoint.to_owned(),
            reason: e.to_string(),
        })?;
        if !parsed.has_host() {
            return Err(ValidatorError::InvalidEndpoint {
                endpoint: endpoint.to_owned(),
                reason: "endpoint has no host".to_owned(),
            });
        }
        self.endpoint = parsed;
        Ok(self)
    }

    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

#[allow(clippy::expect_used)]
fn default_endpoint() -> Url {
    Url::parse(DEFAULT_ENDPOINT).expect("DEFAULT_ENDPOINT is a valid URL")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_targets_w3c_json_output() {
        let config = ValidatorConfig::default();
        assert_eq!(config.endpoint.host_str(), Some("validator.w3.org"));
        assert_eq!(config.endpoint.path(), "/nu/");
        assert_eq!(config.endpoint.query(), Some("out=json&parser=html5"));
        assert_eq!(config.content_type, "text/html; charset=utf-8");
        assert!(config.timeout.is_none());
    }

    #[test]
    fn test_with_endpoint_accepts_local_checker() {
        let config = ValidatorConfig::default()
            .with_endpoint("http://127.0.0.1:8888/?out=json")
            .unwrap();
        assert_eq!(config.endpoint.port(), Some(8888));
    }

    #[test]
    fn test_with_endpoint_rejects_relative() {
        let result = ValidatorConfig::default().with_endpoint("/nu/?out=json");
        assert!(matches!(
            result,
            Err(ValidatorError::InvalidEndpoint { .. })
        ));
    }

    #[test]
    fn test_with_endpoint_rejects_hostless() {
        let result = ValidatorConfig::default().with_endpoint("mailto:someone@example.com");
        assert!(matches!(
            result,
            Err(ValidatorError::InvalidEndpoint { .. })
        ));
    }
}
