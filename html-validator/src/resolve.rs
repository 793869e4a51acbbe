//! Source resolution: turn a classified [`Source`] into markup text.
//!
//! Each variant is resolved in full or fails; partial bodies are never
//! returned.

use std::borrow::Cow;
use std::path::Path;

use reqwest::Client;
use url::Url;

use crate::error::ValidatorError;
use crate::normalize::normalize;
use crate::source::Source;

/// Resolve `source` to the markup that will be submitted.
///
/// # Errors
///
/// - [`ValidatorError::Network`] / [`ValidatorError::Status`] if a remote page
///   cannot be fetched.
/// - [`ValidatorError::FileRead`] if a local file cannot be read.
pub async fn resolve<'a>(
    client: &Client,
    source: &Source<'a>,
) -> Result<Cow<'a, str>, ValidatorError> {
    match source {
        Source::Remote(url) => fetch_remote(client, url).await.map(Cow::Owned),
        Source::LocalFile(path) => read_local_file(path).await.map(Cow::Owned),
        Source::RawText(text) => Ok(Cow::Borrowed(*text)),
    }
}

/// Fetch the page at `url` (normalized first) and return its body as text.
///
/// The client's default headers (content type and user agent) are sent.
///
/// # Errors
///
/// Returns [`ValidatorError::Network`] on transport failure and
/// [`ValidatorError::Status`] on a non-2xx response.
pub async fn fetch_remote(client: &Client, url: &Url) -> Result<String, ValidatorError> {
    let target = normalize(url.clone());
    tracing::debug!(original = %url, normalized = %target, "fetching remote page");

    let response = client
        .get(target.clone())
        .send()
        .await
        .map_err(|source| ValidatorError::Network {
            url: target.to_string(),
            source,
        })?;

    let status = response.status();
    tracing::debug!(url = %target, status = status.as_u16(), "remote page responded");
    if !status.is_success() {
        return Err(ValidatorError::Status {
            url: target.to_string(),
            status: status.as_u16(),
        });
    }

    let body = response
        .text()
        .await
        .map_err(|source| ValidatorError::Network {
            url: target.to_string(),
            source,
        })?;
    tracing::trace!(bytes = body.len(), "remote page body read");
    Ok(body)
}

/// Read a local file as 7-bit ASCII text.
///
/// # Errors
///
/// Returns [`ValidatorError::FileRead`] on any I/O failure.
pub async fn read_local_file(path: &Path) -> Result<String, ValidatorError> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|source| ValidatorError::FileRead {
            path: path.to_owned(),
            source,
        })?;
    tracing::debug!(path = %path.display(), bytes = bytes.len(), "local file read");
    Ok(decode_ascii(&bytes))
}

/// Decode bytes as ASCII. The high bit of every byte is dropped, so the
/// output always has exactly one char per input byte.
#[must_use]
pub fn decode_ascii(bytes: &[u8]) -> String {
    bytes.iter().map(|b| char::from(b & 0x7f)).collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_decode_ascii_passes_plain_text() {
        let html = b"<!doctype html>\n<title>ok</title>";
        assert_eq!(decode_ascii(html), "<!doctype html>\n<title>ok</title>");
    }

    #[test]
    fn test_decode_ascii_masks_high_bit() {
        // UTF-8 for U+00E9 is C3 A9; masked to 0x43 ('C') and 0x29 (')').
        assert_eq!(decode_ascii(&[b'a', 0xC3, 0xA9, b'b']), "aC)b");
        assert_eq!(decode_ascii(&[0xFF]).len(), 1);
    }

    #[tokio::test]
    async fn test_read_local_file_contents() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("page.html");
        std::fs::write(&file, "<p>hello</p>").unwrap();

        let text = read_local_file(&file).await.unwrap();
        assert_eq!(text, "<p>hello</p>");
    }

    #[tokio::test]
    async fn test_read_local_file_missing_is_file_read_error() {
        let tmp = TempDir::new().unwrap();
        let missing = tmp.path().join("gone.html");

        let err = read_local_file(&missing).await.unwrap_err();
        assert!(
            matches!(err, ValidatorError::FileRead { ref path, .. } if path == &missing),
            "got: {err:?}"
        );
    }

    #[tokio::test]
    async fn test_raw_text_is_identity() {
        let client = Client::new();
        let markup = "<!doctype html><title>t</title>";
        let resolved = resolve(&client, &Source::RawText(markup)).await.unwrap();
        assert!(matches!(resolved, Cow::Borrowed(s) if s == markup));
    }
}
