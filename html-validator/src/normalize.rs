//! URL normalization applied before fetching a remote page.
//!
//! The rules follow the conventional "normalize-url" defaults so that
//! equivalent spellings of one address fetch the same document:
//! - scheme and host are lowercased, default ports dropped (by `url` itself)
//! - userinfo is removed, a trailing dot on the host is removed
//! - a leading `www.` is removed when what remains is still a full domain
//! - repeated slashes in the path collapse, trailing slashes are removed
//! - `utm_*` tracking parameters are removed and the rest sorted by key;
//!   the remaining parameters keep their original encoding

use url::{Host, Url};

/// Normalize a remote source URL into the URL that will be fetched.
#[must_use]
pub fn normalize(mut url: Url) -> Url {
    normalize_parsed(&mut url);
    url
}

fn normalize_parsed(url: &mut Url) {
    if url.cannot_be_a_base() {
        return;
    }

    // Both setters only fail for cannot-be-a-base URLs, excluded above.
    let _ = url.set_username("");
    let _ = url.set_password(None);

    let bare_host = match url.host() {
        Some(Host::Domain(domain)) => {
            let trimmed = domain.trim_end_matches('.');
            let bare = strip_www(trimmed).unwrap_or(trimmed);
            (bare != domain).then(|| bare.to_owned())
        }
        _ => None,
    };
    if let Some(bare) = bare_host
        && url.set_host(Some(&bare)).is_err()
    {
        tracing::trace!(host = %bare, "keeping original host");
    }

    let path = normalize_path(url.path());
    url.set_path(&path);

    if let Some(query) = url.query() {
        let sorted = normalize_query(query);
        url.set_query(sorted.as_deref());
    }
}

/// Drop tracking parameters and sort the rest by key, without decoding or
/// re-encoding anything. Returns `None` when no parameter is left.
fn normalize_query(query: &str) -> Option<String> {
    let mut segments: Vec<&str> = query
        .split('&')
        .filter(|segment| !segment.is_empty())
        .filter(|segment| !is_tracking_param(raw_key(segment)))
        .collect();
    if segments.is_empty() {
        return None;
    }
    segments.sort_by(|a, b| raw_key(a).cmp(raw_key(b)));
    Some(segments.join("&"))
}

fn raw_key(segment: &str) -> &str {
    segment.split_once('=').map_or(segment, |(key, _)| key)
}

/// `www.example.com` → `example.com`, but never `www.com` → `com` and never
/// `www.www.example.com` → `www.example.com`.
fn strip_www(host: &str) -> Option<&str> {
    let rest = host.strip_prefix("www.")?;
    if rest.starts_with("www.") {
        return None;
    }
    let (label, tld) = rest.split_once('.')?;
    let label_ok = (1..=63).contains(&label.len())
        && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-');
    let tld_ok = (2..=63).contains(&tld.len())
        && tld
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '.'));
    (label_ok && tld_ok).then_some(rest)
}

fn normalize_path(path: &str) -> String {
    let mut out = String::with_capacity(path.len());
    let mut prev_slash = false;
    for c in path.chars() {
        if c == '/' && prev_slash {
            continue;
        }
        prev_slash = c == '/';
        out.push(c);
    }
    let trimmed = out.trim_end_matches('/');
    if trimmed.is_empty() {
        "/".to_owned()
    } else {
        trimmed.to_owned()
    }
}

fn is_tracking_param(key: &str) -> bool {
    key.len() > 4 && key.get(..4).is_some_and(|p| p.eq_ignore_ascii_case("utm_"))
}
