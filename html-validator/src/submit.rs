//! Submission of markup to the checker service.

use reqwest::Client;
use url::Url;

use crate::error::ValidatorError;
use crate::result::ValidationResult;

/// POST `markup` as the raw request body to `endpoint` and decode the JSON reply.
///
/// The body is the UTF-8 bytes of the document, not form-encoded. Headers
/// come from the client's defaults.
///
/// # Errors
///
/// - [`ValidatorError::Network`] on transport failure or if the body cannot be read.
/// - [`ValidatorError::Status`] on a non-2xx response.
/// - [`ValidatorError::Parse`] if the body is not a JSON object.
pub async fn submit(
    client: &Client,
    endpoint: &Url,
    markup: &str,
) -> Result<ValidationResult, ValidatorError> {
    let body = markup.as_bytes().to_vec();
    tracing::debug!(endpoint = %endpoint, bytes = body.len(), "submitting markup");

    let response = client
        .post(endpoint.clone())
        .body(body)
        .send()
        .await
        .map_err(|source| network_error(endpoint, source))?;

    let status = response.status();
    tracing::debug!(status = status.as_u16(), "validator responded");
    if !status.is_success() {
        return Err(ValidatorError::Status {
            url: endpoint.to_string(),
            status: status.as_u16(),
        });
    }

    let bytes = response
        .bytes()
        .await
        .map_err(|source| network_error(endpoint, source))?;

    let result: ValidationResult =
        serde_json::from_slice(&bytes).map_err(|source| ValidatorError::Parse {
            url: endpoint.to_string(),
            source,
        })?;
    tracing::debug!(
        messages = result.messages.len(),
        errors = result.error_count(),
        "validation result decoded"
    );
    Ok(result)
}

fn network_error(endpoint: &Url, source: reqwest::Error) -> ValidatorError {
    ValidatorError::Network {
        url: endpoint.to_string(),
        source,
    }
}
