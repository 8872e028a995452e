//! Error types for reqdoc.

use std::fmt;
use thiserror::Error;

/// Collaborator call that a transport failure belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Generate,
    ExportPdf,
    ExportDocx,
}

impl Operation {
    pub fn as_str(self) -> &'static str {
        match self {
            Operation::Generate => "generate",
            Operation::ExportPdf => "export-pdf",
            Operation::ExportDocx => "export-docx",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug)]
pub enum Error {
    /// User input rejected before any collaborator call.
    #[error("{0}")]
    InputValidation(String),

    #[error("{operation} failed: {detail}")]
    Transport { operation: Operation, detail: String },

    /// An edit or export needed a structured document but none is held.
    #[error("no structured document is loaded")]
    NoDocument,

    #[error("unknown category: {0}. Use reliability, performance, maintainability, compliance, or verification")]
    UnknownCategory(String),

    #[error("unknown format: {0}. Use markdown, html, or json")]
    UnknownFormat(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub(crate) fn transport(operation: Operation, detail: impl Into<String>) -> Self {
        Error::Transport {
            operation,
            detail: detail.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

/// Intake failures. Recovered inside [`crate::intake::load`] by falling back
/// to opaque text; never surfaced to callers of the store.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IntakeError {
    #[error("model output is not parseable as a JSON object")]
    Unparseable,

    #[error("parsed object has no usable `functional` sequence")]
    ShapeMismatch,
}
