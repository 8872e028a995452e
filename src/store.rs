//! Single-owner holder of the current document.
//!
//! Transitions compute a new model first and swap it in only on success,
//! so a failed edit or export leaves the held content as it was.

use crate::classify::{Category, Taxonomy};
use crate::error::{Error, Result};
use crate::export::{text_download, Artifact, ExportPayload};
use crate::intake;
use crate::merge::{merge_functional_edit, merge_nfr_edit};
use crate::model::{Content, DocumentModel};
use crate::render::{render_content, RenderView, Renderer};
use serde_json::Value;
use tracing::info;

#[derive(Debug, Default)]
pub struct DocumentStore {
    taxonomy: Taxonomy,
    content: Option<Content>,
}

impl DocumentStore {
    pub fn new(taxonomy: Taxonomy) -> Self {
        Self {
            taxonomy,
            content: None,
        }
    }

    pub fn taxonomy(&self) -> &Taxonomy {
        &self.taxonomy
    }

    /// Normalize raw model output and hold the result.
    pub fn load_raw(&mut self, raw: &Value) -> &Content {
        self.content.insert(intake::load(raw))
    }

    pub fn load_model(&mut self, model: DocumentModel) {
        self.content = Some(Content::Structured(model));
    }

    pub fn content(&self) -> Option<&Content> {
        self.content.as_ref()
    }

    pub fn model(&self) -> Option<&DocumentModel> {
        self.content.as_ref().and_then(Content::model)
    }

    fn require_model(&self) -> Result<&DocumentModel> {
        self.model().ok_or(Error::NoDocument)
    }

    fn require_content(&self) -> Result<&Content> {
        self.content.as_ref().ok_or(Error::NoDocument)
    }

    /// Fresh view of the held document.
    pub fn view(&self) -> Result<RenderView> {
        Ok(RenderView::build(self.require_model()?, &self.taxonomy))
    }

    pub fn render(&self, renderer: &dyn Renderer) -> Result<String> {
        Ok(render_content(renderer, self.require_content()?, &self.taxonomy))
    }

    pub fn apply_functional_edit(&mut self, lines: &[String]) -> Result<&DocumentModel> {
        let merged = merge_functional_edit(self.require_model()?, lines);
        info!(functional = merged.functional.len(), "applied functional edit");
        self.content = Some(Content::Structured(merged));
        self.require_model()
    }

    pub fn apply_nfr_edit(&mut self, category: Category, lines: &[String]) -> Result<&DocumentModel> {
        let merged = merge_nfr_edit(self.require_model()?, &self.taxonomy, category, lines);
        info!(%category, non_functional = merged.non_functional.len(), "applied non-functional edit");
        self.content = Some(Content::Structured(merged));
        self.require_model()
    }

    pub fn export_payload(&self) -> Result<ExportPayload> {
        Ok(ExportPayload::for_content(self.require_content()?))
    }

    pub fn text_download(&self) -> Result<Artifact> {
        Ok(text_download(self.require_content()?, &self.taxonomy))
    }
}
