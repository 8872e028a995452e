//! Five-category taxonomy for non-functional statements.
//!
//! Categories are tried in a fixed order (compliance, verification,
//! performance, reliability, maintainability); the first whose keyword
//! table matches wins. Statements matching none are left out of the
//! bucketed view but stay in the stored sequence.

use crate::classify::{classify_level, Level};
use crate::config::{CategoryRule, TaxonomyConfig};
use crate::error::{Error, Result};
use crate::model::LevelGroups;
use regex::Regex;
use serde::Serialize;
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Reliability,
    Performance,
    Maintainability,
    Compliance,
    Verification,
}

impl Category {
    /// Presentation order.
    pub const ALL: [Category; 5] = [
        Category::Reliability,
        Category::Performance,
        Category::Maintainability,
        Category::Compliance,
        Category::Verification,
    ];

    /// Classification order; first match wins.
    pub const CHECK_ORDER: [Category; 5] = [
        Category::Compliance,
        Category::Verification,
        Category::Performance,
        Category::Reliability,
        Category::Maintainability,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Reliability => "reliability",
            Category::Performance => "performance",
            Category::Maintainability => "maintainability",
            Category::Compliance => "compliance",
            Category::Verification => "verification",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Category::Reliability => "Reliability",
            Category::Performance => "Performance",
            Category::Maintainability => "Maintainability",
            Category::Compliance => "Compliance",
            Category::Verification => "Verification",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim();
        Category::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| Error::UnknownCategory(s.to_string()))
    }
}

/// Non-functional statements per category, each split by level.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NfrBuckets {
    pub reliability: LevelGroups<String>,
    pub performance: LevelGroups<String>,
    pub maintainability: LevelGroups<String>,
    pub compliance: LevelGroups<String>,
    pub verification: LevelGroups<String>,
}

impl NfrBuckets {
    pub fn get(&self, category: Category) -> &LevelGroups<String> {
        match category {
            Category::Reliability => &self.reliability,
            Category::Performance => &self.performance,
            Category::Maintainability => &self.maintainability,
            Category::Compliance => &self.compliance,
            Category::Verification => &self.verification,
        }
    }

    pub fn get_mut(&mut self, category: Category) -> &mut LevelGroups<String> {
        match category {
            Category::Reliability => &mut self.reliability,
            Category::Performance => &mut self.performance,
            Category::Maintainability => &mut self.maintainability,
            Category::Compliance => &mut self.compliance,
            Category::Verification => &mut self.verification,
        }
    }
}

#[derive(Debug, Clone)]
struct CompiledRule {
    category: Category,
    /// None when the keyword table is empty.
    pattern: Option<Regex>,
    default_statement: String,
    default_level: Level,
}

impl CompiledRule {
    fn compile(category: Category, rule: &CategoryRule) -> Result<Self> {
        // the placeholder must render in a MUST or SHOULD subsection
        let default_statement = rule.default_statement.trim();
        if default_statement.is_empty() {
            return Err(Error::Config(format!(
                "{}: default_statement must not be blank",
                category
            )));
        }
        if rule.default_level == Level::Could {
            return Err(Error::Config(format!(
                "{}: default_level must be MUST or SHOULD",
                category
            )));
        }

        let alternatives: Vec<String> = rule
            .keywords
            .iter()
            .map(|k| k.trim())
            .filter(|k| !k.is_empty())
            .map(regex::escape)
            .collect();
        let pattern = if alternatives.is_empty() {
            None
        } else {
            let source = format!(r"(?i)\b(?:{})", alternatives.join("|"));
            Some(Regex::new(&source).map_err(|e| {
                Error::Config(format!("bad keyword table for {}: {}", category, e))
            })?)
        };
        Ok(Self {
            category,
            pattern,
            default_statement: default_statement.to_string(),
            default_level: rule.default_level,
        })
    }

    fn matches(&self, statement: &str) -> bool {
        self.pattern
            .as_ref()
            .is_some_and(|re| re.is_match(statement))
    }
}

/// Compiled keyword tables, held in classification order.
#[derive(Debug, Clone)]
pub struct Taxonomy {
    rules: Vec<CompiledRule>,
}

impl Default for Taxonomy {
    fn default() -> Self {
        Self::new(&TaxonomyConfig::default()).expect("built-in keyword tables compile")
    }
}

impl Taxonomy {
    pub fn new(config: &TaxonomyConfig) -> Result<Self> {
        let rules = Category::CHECK_ORDER
            .into_iter()
            .map(|category| {
                let rule = match category {
                    Category::Reliability => &config.reliability,
                    Category::Performance => &config.performance,
                    Category::Maintainability => &config.maintainability,
                    Category::Compliance => &config.compliance,
                    Category::Verification => &config.verification,
                };
                CompiledRule::compile(category, rule)
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { rules })
    }

    /// Built-in tables, or the override at `path` merged over them.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::new(&TaxonomyConfig::load(path)?),
            None => Ok(Self::default()),
        }
    }

    /// First matching category in check order.
    pub fn categorize(&self, statement: &str) -> Option<Category> {
        self.rules
            .iter()
            .find(|rule| rule.matches(statement))
            .map(|rule| rule.category)
    }

    /// Bucket statements by category and level, without default injection.
    pub fn bucket_raw(&self, statements: &[String]) -> NfrBuckets {
        let mut buckets = NfrBuckets::default();
        for statement in statements {
            match self.categorize(statement) {
                Some(category) => buckets
                    .get_mut(category)
                    .push(classify_level(statement), statement.clone()),
                None => debug!(statement = %statement, "non-functional statement matches no category"),
            }
        }
        buckets
    }

    /// Bucket statements, then give every category with neither MUST nor
    /// SHOULD content its placeholder statement.
    pub fn bucket(&self, statements: &[String]) -> NfrBuckets {
        let mut buckets = self.bucket_raw(statements);
        for rule in &self.rules {
            let groups = buckets.get_mut(rule.category);
            if !groups.has_must_or_should() {
                groups.push(rule.default_level, rule.default_statement.clone());
            }
        }
        buckets
    }

    /// Stored statements that bucket into `category`, at any level.
    pub fn statements_in<'a>(&self, statements: &'a [String], category: Category) -> Vec<&'a str> {
        statements
            .iter()
            .filter(|s| self.categorize(s) == Some(category))
            .map(String::as_str)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn empty_input_gets_defaults_everywhere() {
        let buckets = Taxonomy::default().bucket(&[]);
        for category in Category::ALL {
            assert!(
                buckets.get(category).has_must_or_should(),
                "{} has no default",
                category
            );
        }
        assert_eq!(buckets.reliability.must.len(), 1);
        assert!(buckets.reliability.should.is_empty());
        assert_eq!(buckets.performance.should.len(), 1);
    }

    #[test]
    fn uptime_goes_to_reliability_must_without_default() {
        let buckets = Taxonomy::default().bucket(&strings(&["Must support 99.9% uptime"]));
        assert_eq!(buckets.reliability.must, strings(&["Must support 99.9% uptime"]));
        assert!(buckets.reliability.should.is_empty());
    }

    #[test]
    fn compliance_checked_before_performance() {
        let taxonomy = Taxonomy::default();
        assert_eq!(
            taxonomy.categorize("Audit logs must be written fast"),
            Some(Category::Compliance)
        );
        assert_eq!(
            taxonomy.categorize("Load tests should cover peak throughput"),
            Some(Category::Verification)
        );
    }

    #[test]
    fn keywords_match_word_prefixes_only() {
        let taxonomy = Taxonomy::default();
        assert_eq!(taxonomy.categorize("Pages should load fast"), Some(Category::Performance));
        assert_eq!(taxonomy.categorize("Contest entries"), None);
    }

    #[test]
    fn unmatched_statements_are_dropped_from_view() {
        let buckets = Taxonomy::default().bucket_raw(&strings(&["Use a blue logo"]));
        for category in Category::ALL {
            assert!(buckets.get(category).is_empty());
        }
    }

    #[test]
    fn could_only_category_still_gets_default() {
        let buckets =
            Taxonomy::default().bucket(&strings(&["The UI could be tested by beta users"]));
        assert_eq!(buckets.verification.could.len(), 1);
        assert_eq!(buckets.verification.should.len(), 1);
    }

    #[test]
    fn override_changes_matching() {
        let cfg = TaxonomyConfig::from_json(
            r#"{"performance": {"keywords": ["snappy"], "default_statement": "Be snappy."}}"#,
        )
        .unwrap();
        let taxonomy = Taxonomy::new(&cfg).unwrap();
        assert_eq!(taxonomy.categorize("Feels snappy"), Some(Category::Performance));
        assert_eq!(taxonomy.categorize("Pages load fast"), None);
    }

    #[test]
    fn override_with_could_default_is_rejected() {
        let cfg = TaxonomyConfig::from_json(
            r#"{"performance": {"keywords": ["snappy"], "default_statement": "Be snappy.", "default_level": "COULD"}}"#,
        )
        .unwrap();
        let err = Taxonomy::new(&cfg).unwrap_err();
        assert!(matches!(err, Error::Config(ref msg) if msg.contains("performance")));
    }

    #[test]
    fn override_with_blank_default_is_rejected() {
        let cfg = TaxonomyConfig::from_json(
            r#"{"verification": {"keywords": ["check"], "default_statement": "   "}}"#,
        )
        .unwrap();
        assert!(matches!(Taxonomy::new(&cfg), Err(Error::Config(_))));
    }

    #[test]
    fn accepted_override_still_fills_every_category() {
        let cfg = TaxonomyConfig::from_json(
            r#"{"reliability": {"keywords": ["uptime"], "default_statement": "  Stay up.  ", "default_level": "MUST"}}"#,
        )
        .unwrap();
        let buckets = Taxonomy::new(&cfg).unwrap().bucket(&[]);
        for category in Category::ALL {
            assert!(buckets.get(category).has_must_or_should(), "{} is empty", category);
        }
        assert_eq!(buckets.reliability.must, strings(&["Stay up."]));
    }

    #[test]
    fn category_parses_case_insensitively() {
        assert_eq!("Performance".parse::<Category>().unwrap(), Category::Performance);
        assert!(matches!(
            "security".parse::<Category>(),
            Err(Error::UnknownCategory(_))
        ));
    }
}
