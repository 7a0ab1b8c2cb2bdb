//! Output module for crawl results
//!
//! This module handles:
//! - Writing the JSON results file
//! - Printing a human-readable summary of a crawl

mod json;
mod summary;

pub use json::{read_results, write_results};
pub use summary::{format_summary, print_summary};
