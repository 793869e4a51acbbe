//! # html-validator
//!
//! Validate HTML with the Nu HTML Checker web service.
//!
//! A source string is classified as a remote URL, a local file, or literal
//! markup; the markup is obtained accordingly and POSTed to the checker,
//! whose JSON verdict is returned as a [`ValidationResult`]. No conformance
//! checking happens locally.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! # async fn run() -> Result<(), html_validator::ValidatorError> {
//! use html_validator::{Validator, ValidatorConfig};
//!
//! let validator = Validator::new(ValidatorConfig::default())?;
//!
//! let page = validator.validate("https://www.w3.org").await?;
//! let file = validator.validate("docs/index.html").await?;
//! let text = validator
//!     .validate("<!doctype html><html><head><title>x</title></head></html>")
//!     .await?;
//!
//! println!("page errors: {}", page.error_count());
//! println!("file valid:  {}", file.is_valid());
//! println!("messages:    {}", text.messages.len());
//! # Ok(())
//! # }
//! ```

mod config;
mod error;
mod normalize;
pub mod output;
mod resolve;
mod result;
mod source;
mod submit;

use std::borrow::Cow;

use reqwest::Client;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue, USER_AGENT};

pub use config::{DEFAULT_CONTENT_TYPE, DEFAULT_ENDPOINT, DEFAULT_USER_AGENT, ValidatorConfig};
pub use error::ValidatorError;
pub use normalize::normalize;
pub use resolve::decode_ascii;
pub use result::{Message, MessageType, ValidationResult};
pub use source::{Source, classify};

/// Validate `source` with the default configuration.
///
/// Builds a fresh [`Validator`] per call; hold on to a [`Validator`] when
/// checking many documents.
///
/// # Errors
///
/// See [`Validator::validate`].
pub async fn validate(source: &str) -> Result<ValidationResult, ValidatorError> {
    Validator::new(ValidatorConfig::default())?
        .validate(source)
        .await
}

/// Configured entry point. Holds the configuration and one HTTP client;
/// invocations share nothing else and may run concurrently.
#[derive(Debug, Clone)]
pub struct Validator {
    config: ValidatorConfig,
    client: Client,
}

impl Validator {
    /// Build the HTTP client for `config`.
    ///
    /// # Errors
    ///
    /// Returns [`ValidatorError::InvalidHeader`] if a header value from the
    /// configuration is not a legal HTTP header, and
    /// [`ValidatorError::ClientBuild`] if the client cannot be constructed.
    pub fn new(config: ValidatorConfig) -> Result<Self, ValidatorError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, header_value("Content-Type", &config.content_type)?);
        headers.insert(USER_AGENT, header_value("User-Agent", &config.user_agent)?);

        let mut builder = Client::builder().default_headers(headers);
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(ValidatorError::ClientBuild)?;

        Ok(Self { config, client })
    }

    #[must_use]
    pub fn config(&self) -> &ValidatorConfig {
        &self.config
    }

    /// Classify, resolve and submit `source`, in that order.
    ///
    /// # Errors
    ///
    /// The first failing stage aborts the run:
    /// - [`ValidatorError::Network`] / [`ValidatorError::Status`] from the page
    ///   fetch or the submission,
    /// - [`ValidatorError::FileRead`] from reading a local file,
    /// - [`ValidatorError::Parse`] if the checker reply is not a JSON object.
    pub async fn validate(&self, source: &str) -> Result<ValidationResult, ValidatorError> {
        let source = Self::classify(source);
        tracing::debug!(kind = source.kind(), "validating source");
        let markup = self.resolve(&source).await?;
        self.submit(&markup).await
    }

    /// See [`classify`].
    #[must_use]
    pub fn classify(source: &str) -> Source<'_> {
        crate::source::classify(source)
    }

    /// Obtain the markup for an already classified source.
    ///
    /// # Errors
    ///
    /// [`ValidatorError::Network`], [`ValidatorError::Status`] or
    /// [`ValidatorError::FileRead`] depending on the source kind.
    pub async fn resolve<'a>(
        &self,
        source: &Source<'a>,
    ) -> Result<Cow<'a, str>, ValidatorError> {
        crate::resolve::resolve(&self.client, source).await
    }

    /// Submit markup to the configured checker endpoint.
    ///
    /// # Errors
    ///
    /// [`ValidatorError::Network`], [`ValidatorError::Status`] or
    /// [`ValidatorError::Parse`].
    pub async fn submit(&self, markup: &str) -> Result<ValidationResult, ValidatorError> {
        crate::submit::submit(&self.client, &self.config.endpoint, markup).await
    }
}

fn header_value(name: &'static str, value: &str) -> Result<HeaderValue, ValidatorError> {
    HeaderValue::from_str(value).map_err(|e| ValidatorError::InvalidHeader {
        name,
        value: value.to_owned(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_with_defaults() {
        let validator = Validator::new(ValidatorConfig::default());
        assert!(validator.is_ok());
    }

    #[test]
    fn test_new_rejects_bad_header() {
        let config = ValidatorConfig::default().with_user_agent("bad\nagent");
        let err = Validator::new(config).err();
        assert!(
            matches!(err, Some(ValidatorError::InvalidHeader { name: "User-Agent", .. })),
            "got: {err:?}"
        );
    }
}
