//! Export artifacts: file naming, download bodies and collaborator payloads.

use crate::classify::Taxonomy;
use crate::error::Result;
use crate::model::{Content, DocumentModel};
use crate::render::markdown::MarkdownRenderer;
use crate::render::{render_content, DEFAULT_TITLE};
use serde::Serialize;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

/// File stem used when the document has no usable title.
pub const FALLBACK_NAME: &str = "requirements";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    Pdf,
    Docx,
    Markdown,
    Text,
}

impl ArtifactKind {
    pub fn extension(self) -> &'static str {
        match self {
            ArtifactKind::Pdf => "pdf",
            ArtifactKind::Docx => "docx",
            ArtifactKind::Markdown => "md",
            ArtifactKind::Text => "txt",
        }
    }
}

/// File stem for `title`: every char outside `[A-Za-z0-9_-]` becomes `_`.
pub fn artifact_stem(title: &str) -> String {
    let title = title.trim();
    if title.is_empty() {
        return FALLBACK_NAME.to_string();
    }
    title
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

pub fn artifact_file_name(title: &str, kind: ArtifactKind) -> String {
    format!("{}.{}", artifact_stem(title), kind.extension())
}

/// A downloadable artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// Markdown for a structured document, raw text otherwise. No collaborator.
pub fn text_download(content: &Content, taxonomy: &Taxonomy) -> Artifact {
    match content {
        Content::Structured(model) => Artifact {
            file_name: artifact_file_name(&model.title, ArtifactKind::Markdown),
            bytes: render_content(&MarkdownRenderer, content, taxonomy).into_bytes(),
        },
        Content::Opaque(text) => Artifact {
            file_name: artifact_file_name("", ArtifactKind::Text),
            bytes: text.clone().into_bytes(),
        },
    }
}

/// Replace `path` with `bytes` via a sibling temp file and a rename.
///
/// Readers see either the previous content or the new one, never a prefix.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut file = NamedTempFile::new_in(dir)?;
    file.write_all(bytes)?;
    file.as_file().sync_all()?;
    file.persist(path).map_err(|e| e.error)?;
    Ok(())
}

/// Body for the structured-export collaborator.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ExportPayload {
    Json { json: DocumentModel },
    Markdown { markdown: String, title: String },
}

impl ExportPayload {
    /// Prefer the document; fall back to the raw text.
    pub fn for_content(content: &Content) -> Self {
        match content {
            Content::Structured(model) => ExportPayload::Json {
                json: model.clone(),
            },
            Content::Opaque(text) => Self::opaque(text),
        }
    }

    pub fn opaque(text: &str) -> Self {
        ExportPayload::Markdown {
            markdown: text.to_string(),
            title: DEFAULT_TITLE.to_string(),
        }
    }

    /// Title used to name the returned artifact.
    pub fn title(&self) -> &str {
        match self {
            ExportPayload::Json { json } => &json.title,
            ExportPayload::Markdown { .. } => "",
        }
    }
}
