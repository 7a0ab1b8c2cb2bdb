use url::Url;

/// Extracts the host from a URL
///
/// The WHATWG parser already lowercases domain hosts, so the returned string
/// can be compared directly. The port is not part of the host.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use webscraper::url::extract_host;
///
/// let url = Url::parse("https://EXAMPLE.COM:8080/path").unwrap();
/// assert_eq!(extract_host(&url), Some("example.com"));
/// ```
pub fn extract_host(url: &Url) -> Option<&str> {
    url.host_str()
}

/// Returns true if both URLs have exactly the same host
///
/// No subdomain or wildcard matching: `blog.example.com` and `example.com`
/// are different hosts.
pub fn same_host(a: &Url, b: &Url) -> bool {
    match (extract_host(a), extract_host(b)) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}
