//! Idea intake ahead of the generation collaborator.

use crate::backend::Backend;
use crate::error::{Error, Result};
use crate::intake;
use crate::model::Content;
use tracing::info;

pub const GREETING: &str = "Hi! Describe the product or feature you have in mind and I'll draft a requirements document for it.";

pub const EMPTY_IDEA_PROMPT: &str =
    "Please describe your idea first, even a sentence or two is enough to get started.";

const GREETINGS: &[&str] = &["hi", "hello", "hey"];

/// What to do with a user's idea.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Generation {
    /// Answer locally; no collaborator call.
    Greeting(String),
    /// Send this prompt to the generation collaborator.
    Request(String),
}

/// Validate `idea` and decide whether it needs the collaborator at all.
pub fn prepare_generation(idea: &str) -> Result<Generation> {
    let idea = idea.trim();
    if idea.is_empty() {
        return Err(Error::InputValidation(EMPTY_IDEA_PROMPT.to_string()));
    }
    let bare = idea.trim_end_matches(|c: char| c.is_ascii_punctuation());
    if GREETINGS.iter().any(|g| g.eq_ignore_ascii_case(bare)) {
        return Ok(Generation::Greeting(GREETING.to_string()));
    }
    Ok(Generation::Request(idea.to_string()))
}

/// Outcome of a generation round.
#[derive(Debug, Clone, PartialEq)]
pub enum Generated {
    Greeting(String),
    Content(Content),
}

/// Validate, call the collaborator when needed, and normalize its output.
pub fn generate(backend: &dyn Backend, idea: &str) -> Result<Generated> {
    match prepare_generation(idea)? {
        Generation::Greeting(text) => {
            info!("greeting detected; skipping generation");
            Ok(Generated::Greeting(text))
        }
        Generation::Request(prompt) => {
            let raw = backend.generate(&prompt)?;
            Ok(Generated::Content(intake::load(&raw)))
        }
    }
}
