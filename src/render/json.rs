//! JSON renderer — structured output for tooling integration.
//!
//! Serializes the render view: derived sections, highlights and the
//! de-duplicated functional groups.

use crate::export::ExportPayload;
use crate::render::{RenderView, Renderer};
use serde::Serialize;

pub struct JsonRenderer;

impl Renderer for JsonRenderer {
    fn render(&self, view: &RenderView) -> String {
        to_pretty(view)
    }

    /// Same shape the structured-export collaborator accepts for raw text.
    fn render_opaque(&self, text: &str) -> String {
        to_pretty(&ExportPayload::opaque(text))
    }

    fn file_extension(&self) -> &str {
        "json"
    }
}

fn to_pretty<T: Serialize>(value: &T) -> String {
    // plain data with string keys; serialization cannot fail
    let mut out = serde_json::to_string_pretty(value).unwrap_or_default();
    out.push('\n');
    out
}
