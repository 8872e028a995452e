//! Collaborator transport: generation and the two export services.
//!
//! Blocking, one request per user action, no retry. Any failure surfaces
//! as [`Error::Transport`] naming the operation.

use crate::config::BackendConfig;
use crate::error::{Error, Operation, Result};
use crate::export::ExportPayload;
use serde::Deserialize;
use serde_json::{json, Value};
use std::io::Read;
use tracing::{debug, info};

/// Largest binary artifact accepted from an export service.
const MAX_ARTIFACT_BYTES: u64 = 64 * 1024 * 1024;

/// External services the pipeline talks to.
pub trait Backend {
    /// Raw model output for `prompt`.
    fn generate(&self, prompt: &str) -> Result<Value>;
    /// Print-ready document for a complete HTML page.
    fn export_pdf(&self, html: &str) -> Result<Vec<u8>>;
    fn export_docx(&self, payload: &ExportPayload) -> Result<Vec<u8>>;
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    requirements: Value,
}

/// [`Backend`] over HTTP.
pub struct HttpBackend {
    agent: ureq::Agent,
    config: BackendConfig,
}

impl HttpBackend {
    pub fn new(config: BackendConfig) -> Self {
        let agent = ureq::AgentBuilder::new().timeout(config.timeout).build();
        Self { agent, config }
    }

    fn post(&self, operation: Operation, path: &str, body: &Value) -> Result<ureq::Response> {
        let url = self.config.endpoint(path);
        debug!(%operation, %url, "sending request");
        match self.agent.post(&url).send_json(body) {
            Ok(response) => {
                info!(%operation, status = response.status(), "request succeeded");
                Ok(response)
            }
            Err(ureq::Error::Status(code, response)) => {
                let body = response.into_string().unwrap_or_default();
                let body = body.trim();
                let detail = if body.is_empty() {
                    format!("status {}", code)
                } else {
                    format!("status {}: {}", code, truncate(body, 200))
                };
                Err(Error::transport(operation, detail))
            }
            Err(ureq::Error::Transport(err)) => Err(Error::transport(operation, err.to_string())),
        }
    }

    fn read_bytes(operation: Operation, response: ureq::Response) -> Result<Vec<u8>> {
        read_capped(operation, response.into_reader(), MAX_ARTIFACT_BYTES)
    }
}

/// Read the whole body, failing rather than truncating past `limit`.
fn read_capped(operation: Operation, reader: impl Read, limit: u64) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    reader
        .take(limit + 1)
        .read_to_end(&mut bytes)
        .map_err(|e| Error::transport(operation, format!("failed to read body: {}", e)))?;
    if bytes.len() as u64 > limit {
        return Err(Error::transport(
            operation,
            format!("artifact exceeds {} bytes", limit),
        ));
    }
    Ok(bytes)
}

impl Backend for HttpBackend {
    fn generate(&self, prompt: &str) -> Result<Value> {
        let response = self.post(Operation::Generate, "generate", &json!({ "idea": prompt }))?;
        let parsed: GenerateResponse = response.into_json().map_err(|e| {
            Error::transport(Operation::Generate, format!("invalid response body: {}", e))
        })?;
        Ok(parsed.requirements)
    }

    fn export_pdf(&self, html: &str) -> Result<Vec<u8>> {
        let response = self.post(Operation::ExportPdf, "export/pdf", &json!({ "html": html }))?;
        Self::read_bytes(Operation::ExportPdf, response)
    }

    fn export_docx(&self, payload: &ExportPayload) -> Result<Vec<u8>> {
        let body = serde_json::to_value(payload)?;
        let response = self.post(Operation::ExportDocx, "export/docx", &body)?;
        Self::read_bytes(Operation::ExportDocx, response)
    }
}

fn truncate(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
