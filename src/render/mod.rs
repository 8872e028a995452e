//! Renderer module — trait-based format dispatch.
//!
//! Every renderer consumes the same [`RenderView`] and walks the same
//! section list, so the formats stay structurally parallel: title, intro
//! excerpt, highlights, six category sections, use cases, auxiliary
//! lists, closing excerpt.

pub mod html;
pub mod json;
pub mod markdown;

use crate::classify::{Category, Taxonomy};
use crate::derive::derive;
use crate::error::{Error, Result};
use crate::model::{
    Content, DerivedSections, DocumentModel, FunctionalRequirement, LevelGroups, Requirement,
};
use crate::select::{remove_selected, select_highlights};
use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;

/// Title used when the document has none.
pub const DEFAULT_TITLE: &str = "Requirements Document";

/// Sentences shown under the title.
pub const INTRO_SENTENCES: usize = 3;
/// Sentences shown in the closing summary.
pub const OUTRO_SENTENCES: usize = 4;

static RE_SENTENCE_END: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[.!?]\s+").unwrap());

/// Trait for rendering a document view into a specific output format.
pub trait Renderer {
    fn render(&self, view: &RenderView) -> String;
    /// Output for raw text that never became a document.
    fn render_opaque(&self, text: &str) -> String;
    fn file_extension(&self) -> &str;
}

/// Create a renderer for the given format name.
pub fn create_renderer(format: &str) -> Result<Box<dyn Renderer>> {
    match format {
        "markdown" | "md" => Ok(Box::new(markdown::MarkdownRenderer)),
        "html" => Ok(Box::new(html::HtmlRenderer)),
        "json" => Ok(Box::new(json::JsonRenderer)),
        _ => Err(Error::UnknownFormat(format.to_string())),
    }
}

/// Render whatever the store holds.
pub fn render_content(renderer: &dyn Renderer, content: &Content, taxonomy: &Taxonomy) -> String {
    match content {
        Content::Structured(model) => renderer.render(&RenderView::build(model, taxonomy)),
        Content::Opaque(text) => renderer.render_opaque(text),
    }
}

/// Derived sections plus the highlight split, recomputed per render.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderView {
    #[serde(flatten)]
    pub sections: DerivedSections,
    pub highlights: Vec<Requirement>,
    /// Functional groups with highlighted entries removed.
    pub remaining: LevelGroups<Requirement>,
}

impl RenderView {
    pub fn build(model: &DocumentModel, taxonomy: &Taxonomy) -> Self {
        let sections = derive(model, taxonomy);
        let highlights = select_highlights(&sections.functionality);
        let remaining = remove_selected(&sections.functionality, &highlights);
        Self {
            sections,
            highlights,
            remaining,
        }
    }

    pub fn title(&self) -> &str {
        let title = self.sections.title.trim();
        if title.is_empty() {
            DEFAULT_TITLE
        } else {
            title
        }
    }

    pub fn intro(&self) -> String {
        excerpt(&self.sections.summary, INTRO_SENTENCES)
    }

    pub fn outro(&self) -> String {
        excerpt(&self.sections.summary, OUTRO_SENTENCES)
    }

    /// Category sections with MUST or SHOULD content, in display order.
    pub fn category_sections(&self) -> Vec<CategorySection<'_>> {
        let mut sections = Vec::new();
        if self.remaining.has_must_or_should() {
            sections.push(CategorySection {
                title: "Functional Requirements",
                must: self.remaining.must.iter().map(Entry::from).collect(),
                should: self.remaining.should.iter().map(Entry::from).collect(),
            });
        }
        for category in Category::ALL {
            let groups = self.sections.nfr.get(category);
            if groups.has_must_or_should() {
                sections.push(CategorySection {
                    title: category.title(),
                    must: groups.must.iter().map(|s| Entry::Text(s)).collect(),
                    should: groups.should.iter().map(|s| Entry::Text(s)).collect(),
                });
            }
        }
        sections
    }

    /// Use cases and the auxiliary plain lists, non-empty ones only.
    pub fn list_sections(&self) -> Vec<(&'static str, &[String])> {
        [
            ("Use Cases", self.sections.use_cases.as_slice()),
            ("Constraints", self.sections.constraints.as_slice()),
            ("Out of Scope", self.sections.out_of_scope.as_slice()),
            ("Open Questions", self.sections.open_questions.as_slice()),
        ]
        .into_iter()
        .filter(|(_, items)| !items.is_empty())
        .collect()
    }
}

/// One rendered category with its MUST and SHOULD subsections.
#[derive(Debug)]
pub struct CategorySection<'a> {
    pub title: &'static str,
    pub must: Vec<Entry<'a>>,
    pub should: Vec<Entry<'a>>,
}

impl<'a> CategorySection<'a> {
    /// Non-empty subsections, labelled.
    pub fn subsections(&self) -> Vec<(&'static str, &[Entry<'a>])> {
        [("MUST", self.must.as_slice()), ("SHOULD", self.should.as_slice())]
            .into_iter()
            .filter(|(_, entries)| !entries.is_empty())
            .collect()
    }
}

/// A list entry as the renderers see it.
#[derive(Debug, Clone, Copy)]
pub enum Entry<'a> {
    Text(&'a str),
    Structured(&'a FunctionalRequirement),
}

impl<'a> From<&'a Requirement> for Entry<'a> {
    fn from(item: &'a Requirement) -> Self {
        match item {
            Requirement::Plain(text) => Entry::Text(text),
            Requirement::Structured(req) => Entry::Structured(req),
        }
    }
}

/// First `count` sentences of `text`, whitespace-normalized, joined by a
/// single space.
pub fn excerpt(text: &str, count: usize) -> String {
    let normalized = text.split_whitespace().collect::<Vec<_>>().join(" ");
    let mut sentences = Vec::new();
    let mut start = 0;
    for m in RE_SENTENCE_END.find_iter(&normalized) {
        // keep the punctuation, drop the whitespace
        sentences.push(&normalized[start..m.start() + 1]);
        start = m.end();
    }
    if start < normalized.len() {
        sentences.push(&normalized[start..]);
    }
    sentences
        .into_iter()
        .filter(|s| !s.is_empty())
        .take(count)
        .collect::<Vec<_>>()
        .join(" ")
}
