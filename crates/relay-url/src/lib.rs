//! Shared relay URL normalization utility.
//!
//! Canonicalizes the many spellings users type for a relay
//! (`RELAY.EXAMPLE.COM`, `wss://relay.example.com//feed`,
//! `https://relay.example.com`) into a single `wss://host[:port]/path`
//! form so relay lists can be deduplicated by string equality.

use thiserror::Error;
use url::Url;

/// Errors produced by [`normalize_relay_url`].
#[derive(Debug, Error)]
pub enum RelayUrlError {
    /// The input was empty or whitespace-only.
    #[error("relay URL is empty")]
    Empty,

    /// The input did not parse as a URL.
    #[error("invalid relay URL: {0}")]
    Invalid(#[from] url::ParseError),

    /// The input carried a scheme other than `ws`/`wss` (or the
    /// `http`/`https` forms coerced to them).
    #[error("unsupported relay scheme: {0}")]
    UnsupportedScheme(String),

    /// The URL parsed but has no host (e.g. `wss:///`).
    #[error("relay URL has no host")]
    MissingHost,
}

/// Normalize a relay URL into canonical `wss://host[:port]/…` form.
///
/// - surrounding whitespace is trimmed; empty input is an error;
/// - a bare authority (`relay.example.com`) gets the default `wss://`
///   scheme; `http`/`https` are coerced to `ws`/`wss`;
/// - the host is lowercased, duplicate slashes in the path are
///   collapsed, and a URL with no path gets a single trailing slash;
/// - query and fragment are preserved.
///
/// ```
/// use nql_toolchain_relay_url::normalize_relay_url;
/// let url = normalize_relay_url("RELAY.EXAMPLE.COM").unwrap();
/// assert_eq!(url, "wss://relay.example.com/");
/// ```
pub fn normalize_relay_url(input: &str) -> Result<String, RelayUrlError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(RelayUrlError::Empty);
    }

    let with_scheme = if let Some(rest) = strip_scheme(trimmed, "https") {
        format!("wss://{rest}")
    } else if let Some(rest) = strip_scheme(trimmed, "http") {
        format!("ws://{rest}")
    } else if trimmed.contains("://") {
        trimmed.to_string()
    } else {
        format!("wss://{trimmed}")
    };

    let mut url = Url::parse(&with_scheme)?;
    match url.scheme() {
        "ws" | "wss" => {}
        other => return Err(RelayUrlError::UnsupportedScheme(other.to_string())),
    }
    if url.host_str().is_none() {
        return Err(RelayUrlError::MissingHost);
    }

    let collapsed = collapse_slashes(url.path());
    url.set_path(&collapsed);

    Ok(url.to_string())
}

/// Case-insensitive `<scheme>://` prefix strip.
fn strip_scheme<'a>(input: &'a str, scheme: &str) -> Option<&'a str> {
    let prefix_len = scheme.len() + "://".len();
    let head = input.get(..scheme.len())?;
    let sep = input.get(scheme.len()..prefix_len)?;
    if head.eq_ignore_ascii_case(scheme) && sep == "://" {
        input.get(prefix_len..)
    } else {
        None
    }
}

fn collapse_slashes(path: &str) -> String {
    let mut out = String::with_capacity(path.len());
    let mut prev_slash = false;
    for c in path.chars() {
        if c == '/' {
            if !prev_slash {
                out.push(c);
            }
            prev_slash = true;
        } else {
            out.push(c);
            prev_slash = false;
        }
    }
    out
}
