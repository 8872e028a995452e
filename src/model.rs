//! Data model for requirements documents — format-agnostic.

use crate::classify::taxonomy::NfrBuckets;
use crate::classify::{classify_level, Level};
use serde::Serialize;

/// Canonical, storage-of-record requirements document.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentModel {
    pub title: String,
    pub summary: String,
    /// Authoring order; also the tie-break for highlight selection.
    pub functional: Vec<Requirement>,
    /// Untyped statements. Category and level are derived, never stored.
    pub non_functional: Vec<String>,
    pub constraints: Vec<String>,
    pub out_of_scope: Vec<String>,
    pub open_questions: Vec<String>,
    pub use_cases: Vec<String>,
    pub risks: Vec<Risk>,
}

/// A functional entry: either a bare statement or a structured requirement.
///
/// Serialized untagged: a bare string, or an object with a `statement`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Requirement {
    Structured(FunctionalRequirement),
    Plain(String),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FunctionalRequirement {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<Level>,
    pub statement: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub bullets: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rationale: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub standards: Vec<String>,
}

impl Requirement {
    pub fn statement(&self) -> &str {
        match self {
            Requirement::Plain(text) => text,
            Requirement::Structured(req) => &req.statement,
        }
    }

    /// Non-blank id, if the entry carries one.
    pub fn id(&self) -> Option<&str> {
        match self {
            Requirement::Plain(_) => None,
            Requirement::Structured(req) => req.id.as_deref().filter(|id| !id.trim().is_empty()),
        }
    }

    /// Explicit level when present, otherwise the classifier's verdict.
    pub fn level(&self) -> Level {
        match self {
            Requirement::Structured(FunctionalRequirement {
                level: Some(level), ..
            }) => *level,
            other => classify_level(other.statement()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Risk {
    pub risk: String,
    pub mitigation: String,
}

/// Items partitioned by priority level, each list in source order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LevelGroups<T> {
    #[serde(rename = "MUST")]
    pub must: Vec<T>,
    #[serde(rename = "SHOULD")]
    pub should: Vec<T>,
    #[serde(rename = "COULD")]
    pub could: Vec<T>,
}

impl<T> Default for LevelGroups<T> {
    fn default() -> Self {
        Self {
            must: Vec::new(),
            should: Vec::new(),
            could: Vec::new(),
        }
    }
}

impl<T> LevelGroups<T> {
    pub fn get(&self, level: Level) -> &[T] {
        match level {
            Level::Must => &self.must,
            Level::Should => &self.should,
            Level::Could => &self.could,
        }
    }

    pub fn push(&mut self, level: Level, item: T) {
        match level {
            Level::Must => self.must.push(item),
            Level::Should => self.should.push(item),
            Level::Could => self.could.push(item),
        }
    }

    /// True when a rendered section would have something to show.
    pub fn has_must_or_should(&self) -> bool {
        !self.must.is_empty() || !self.should.is_empty()
    }

    pub fn len(&self) -> usize {
        self.must.len() + self.should.len() + self.could.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All items in MUST, SHOULD, COULD order.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.must.iter().chain(&self.should).chain(&self.could)
    }

    pub fn retain(&mut self, mut keep: impl FnMut(&T) -> bool) {
        self.must.retain(&mut keep);
        self.should.retain(&mut keep);
        self.could.retain(&mut keep);
    }
}

/// Render-ready projection of a [`DocumentModel`]. Recomputed on every read.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DerivedSections {
    pub title: String,
    pub summary: String,
    pub functionality: LevelGroups<Requirement>,
    #[serde(flatten)]
    pub nfr: NfrBuckets,
    pub use_cases: Vec<String>,
    pub constraints: Vec<String>,
    pub out_of_scope: Vec<String>,
    pub open_questions: Vec<String>,
    pub risks: Vec<Risk>,
}

/// What the store holds after intake.
#[derive(Debug, Clone, PartialEq)]
pub enum Content {
    Structured(DocumentModel),
    /// Raw model output that could not be read as a document.
    Opaque(String),
}

impl Content {
    pub fn model(&self) -> Option<&DocumentModel> {
        match self {
            Content::Structured(model) => Some(model),
            Content::Opaque(_) => None,
        }
    }
}
