use crate::{UrlError, UrlResult};
use url::Url;

/// Canonicalizes a URL so that the same page always maps to the same key
///
/// # Canonicalization Steps
///
/// 1. Parse the URL; reject if malformed or relative
/// 2. Require an `http` or `https` scheme
/// 3. Require a host
/// 4. Remove the fragment (everything after #)
///
/// Lowercasing of the scheme and host, default-port removal, dot-segment
/// removal and the root `/` path come from the WHATWG parser itself.
///
/// # Examples
///
/// ```
/// use webscraper::url::canonicalize_url;
///
/// let url = canonicalize_url("HTTP://Example.COM:80/a/../page#top").unwrap();
/// assert_eq!(url.as_str(), "http://example.com/page");
/// ```
pub fn canonicalize_url(url_str: &str) -> UrlResult<Url> {
    let url = Url::parse(url_str.trim()).map_err(|e| UrlError::Parse(e.to_string()))?;
    canonicalize(url)
}

/// Canonicalizes an already-parsed URL, see [`canonicalize_url`]
pub fn canonicalize(mut url: Url) -> UrlResult<Url> {
    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(url.scheme().to_string()));
    }

    match url.host_str() {
        Some(host) if !host.is_empty() => {}
        _ => return Err(UrlError::MissingHost),
    }

    url.set_fragment(None);
    Ok(url)
}
