//! Input classification.
//!
//! A caller hands over one string; whether it names a page on the web, a file
//! on disk, or is itself the markup is inferred here and nowhere else.

use std::path::Path;

use url::Url;

/// What a caller-supplied source string turned out to be.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source<'a> {
    /// An absolute URL with a scheme and a host; the page is fetched.
    Remote(Url),
    /// An existing regular file; its contents are read.
    LocalFile(&'a Path),
    /// Anything else; the string is the markup.
    RawText(&'a str),
}

impl Source<'_> {
    /// Short label for logs and diagnostics.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Remote(_) => "remote",
            Self::LocalFile(_) => "local-file",
            Self::RawText(_) => "raw-text",
        }
    }
}

/// Decide how `source` should be resolved.
///
/// Order matters: a URL wins over a file of the same name, and a file wins
/// over literal text. An existing directory is not a file and therefore ends
/// up as literal text.
#[must_use]
pub fn classify(source: &str) -> Source<'_> {
    if let Some(url) = as_remote(source) {
        tracing::debug!(%url, "source classified as remote");
        return Source::Remote(url);
    }

    let path = Path::new(source);
    match std::fs::metadata(path) {
        Ok(meta) if meta.is_file() => {
            tracing::debug!(path = %path.display(), "source classified as local file");
            Source::LocalFile(path)
        }
        Ok(meta) => {
            tracing::debug!(
                is_dir = meta.is_dir(),
                "path exists but is not a regular file; treating as raw text"
            );
            Source::RawText(source)
        }
        Err(_) => {
            tracing::trace!(len = source.len(), "source classified as raw text");
            Source::RawText(source)
        }
    }
}

/// A string is remote only when it parses with both a scheme and a host.
fn as_remote(source: &str) -> Option<Url> {
    let url = Url::parse(source).ok()?;
    if url.host_str().is_some_and(|h| !h.is_empty()) {
        Some(url)
    } else {
        None
    }
}
