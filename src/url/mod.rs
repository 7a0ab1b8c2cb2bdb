//! URL handling module
//!
//! This module provides URL canonicalization and host comparison, the two
//! URL operations the crawl scope depends on.

mod domain;
mod normalize;

// Re-export main functions
pub use domain::{extract_host, same_host};
pub use normalize::{canonicalize, canonicalize_url};
