/// Status definitions for tracking crawl outcomes
///
/// Every URL a crawl touches is recorded with exactly one of these states.
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Outcome of a URL within a single crawl
///
/// The declaration order is the order used for result buckets.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    /// Admitted to the frontier, fetch not yet resolved
    InProgress,

    /// Network error, or the final response was not a success
    Failed,

    /// Fetched with a successful response
    Success,

    /// No record exists; never stored, only returned by lookups
    Missing,

    /// Rejected by the validation policy (malformed, off-host, too deep)
    Ignored,
}

impl Status {
    /// Every status, in bucket order
    pub const ALL: [Status; 5] = [
        Status::InProgress,
        Status::Failed,
        Status::Success,
        Status::Missing,
        Status::Ignored,
    ];

    /// Returns true if the URL was admitted and is awaiting its fetch
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::InProgress)
    }

    /// Stable token used in persisted results
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InProgress => "inprogress",
            Self::Failed => "failed",
            Self::Success => "success",
            Self::Missing => "missing",
            Self::Ignored => "ignored",
        }
    }
}

impl FromStr for Status {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Status::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| format!("unknown status token '{}'", s))
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
