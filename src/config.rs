//! Configuration data: taxonomy keyword tables and collaborator endpoint.

use crate::classify::Level;
use crate::error::{Error, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Keyword table and default placeholder for one non-functional category.
///
/// Keywords match case-insensitively at the start of a word, so `scal`
/// covers "scale", "scalable" and "scaling".
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct CategoryRule {
    pub keywords: Vec<String>,
    pub default_statement: String,
    #[serde(default = "default_level")]
    pub default_level: Level,
}

fn default_level() -> Level {
    Level::Should
}

impl CategoryRule {
    fn builtin(keywords: &[&str], default_statement: &str, default_level: Level) -> Self {
        Self {
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
            default_statement: default_statement.to_string(),
            default_level,
        }
    }
}

/// The five category tables. A JSON override may name any subset; the
/// rest keep their built-in values.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct TaxonomyConfig {
    pub reliability: CategoryRule,
    pub performance: CategoryRule,
    pub maintainability: CategoryRule,
    pub compliance: CategoryRule,
    pub verification: CategoryRule,
}

impl Default for TaxonomyConfig {
    fn default() -> Self {
        Self {
            reliability: CategoryRule::builtin(
                &[
                    "reliab", "availab", "uptime", "downtime", "failover", "fault", "resilien",
                    "redundan", "backup", "recover", "disaster", "durab", "retry", "retries",
                    "graceful", "crash", "outage",
                ],
                "The system MUST remain available and recover gracefully from component failures without data loss.",
                Level::Must,
            ),
            performance: CategoryRule::builtin(
                &[
                    "perform", "latenc", "response time", "respond within", "throughput", "fast",
                    "speed", "load time", "concurren", "scal", "millisecond", "ms", "per second",
                    "capacity", "efficien",
                ],
                "The system SHOULD respond to typical user interactions within 2 seconds under expected load.",
                Level::Should,
            ),
            maintainability: CategoryRule::builtin(
                &[
                    "maintain", "modular", "document", "readab", "refactor", "extensib", "upgrad",
                    "configur", "logging", "monitor", "observab", "coding standard", "portab",
                    "versioned",
                ],
                "The codebase SHOULD be modular, documented and covered by conventions that keep it easy to change.",
                Level::Should,
            ),
            compliance: CategoryRule::builtin(
                &[
                    "complian", "comply", "regulat", "gdpr", "hipaa", "pci", "soc 2", "soc2",
                    "iso 27001", "iso 9001", "iso/iec", "legal", "privacy", "data protection", "audit", "accessib", "wcag",
                    "licens",
                ],
                "The system SHOULD comply with applicable data-protection, privacy and accessibility regulations.",
                Level::Should,
            ),
            verification: CategoryRule::builtin(
                &[
                    "test", "verif", "validat", "qa", "acceptance", "coverage", "inspect",
                    "code review", "demonstrat",
                ],
                "Each requirement SHOULD be verified by automated or manual acceptance tests before release.",
                Level::Should,
            ),
        }
    }
}

impl TaxonomyConfig {
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(|e| Error::Config(format!("invalid taxonomy: {}", e)))
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("failed to read taxonomy {}: {}", path.display(), e))
        })?;
        Self::from_json(&text)
    }
}

/// Where the generation/export collaborator lives.
#[derive(Debug, Clone, PartialEq)]
pub struct BackendConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl BackendConfig {
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout: Self::DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}
