//! Priority classification and non-functional taxonomy bucketing.

pub mod taxonomy;

use serde::{Deserialize, Serialize};
use std::fmt;

pub use taxonomy::{Category, NfrBuckets, Taxonomy};

/// Requirement priority: mandatory / recommended / optional.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Level {
    Must,
    Should,
    Could,
}

impl Level {
    /// Priority order; also the order classification tokens are tried in.
    pub const ALL: [Level; 3] = [Level::Must, Level::Should, Level::Could];

    pub fn as_str(self) -> &'static str {
        match self {
            Level::Must => "MUST",
            Level::Should => "SHOULD",
            Level::Could => "COULD",
        }
    }

    /// Case-insensitive parse of an explicit level label.
    pub fn parse(label: &str) -> Option<Level> {
        let label = label.trim();
        Level::ALL
            .into_iter()
            .find(|level| level.as_str().eq_ignore_ascii_case(label))
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify a free-text statement by the first MUST/SHOULD/COULD token it
/// contains (case-insensitive substring). Defaults to SHOULD.
pub fn classify_level(text: &str) -> Level {
    let upper = text.to_uppercase();
    Level::ALL
        .into_iter()
        .find(|level| upper.contains(level.as_str()))
        .unwrap_or(Level::Should)
}
