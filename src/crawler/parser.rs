//! HTML link extraction
//!
//! The document is parsed once, up front, and the raw `href` targets are
//! collected in document order. Resolution against the page URL happens
//! lazily as the returned iterator is consumed.

use crate::url::canonicalize;
use crate::{UrlError, UrlResult};
use scraper::{Html, Selector};
use url::Url;

/// Elements whose `href` is followed
const LINK_SELECTOR: &str = "a[href], area[href]";

/// Collects the raw `href` values of every hyperlink in document order
///
/// Duplicates are kept.
pub fn extract_hrefs(html: &str) -> Vec<String> {
    let document = Html::parse_document(html);

    let Ok(selector) = Selector::parse(LINK_SELECTOR) else {
        return Vec::new();
    };

    document
        .select(&selector)
        .filter_map(|element| element.value().attr("href"))
        .map(str::to_string)
        .collect()
}

/// Extracts every hyperlink of `html` as an absolute, canonical URL
///
/// Relative targets are resolved against `page_url`. Targets that fail to
/// resolve or do not resolve to `http`/`https` are skipped and logged at
/// debug level.
///
/// # Example
///
/// ```
/// use url::Url;
/// use webscraper::crawler::extract_links;
///
/// let page = Url::parse("https://example.com/blog/").unwrap();
/// let html = r#"<a href="post">Post</a><a href="/about#team">About</a>"#;
/// let links: Vec<String> = extract_links(html, &page).map(String::from).collect();
/// assert_eq!(links, ["https://example.com/blog/post", "https://example.com/about"]);
/// ```
pub fn extract_links(html: &str, page_url: &Url) -> Links {
    Links {
        hrefs: extract_hrefs(html).into_iter(),
        page_url: page_url.clone(),
    }
}

/// Single-pass iterator over the resolved links of one page
#[derive(Debug)]
pub struct Links {
    hrefs: std::vec::IntoIter<String>,
    page_url: Url,
}

impl Iterator for Links {
    type Item = Url;

    fn next(&mut self) -> Option<Url> {
        for href in self.hrefs.by_ref() {
            match resolve_link(&href, &self.page_url) {
                Ok(url) => return Some(url),
                Err(e) => {
                    tracing::debug!(href = %href, page = %self.page_url, "Skipping link: {}", e);
                }
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, self.hrefs.size_hint().1)
    }
}

/// Resolves a link href against the page it was found on
fn resolve_link(href: &str, page_url: &Url) -> UrlResult<Url> {
    let absolute = page_url
        .join(href.trim())
        .map_err(|e| UrlError::Parse(e.to_string()))?;
    canonicalize(absolute)
}
