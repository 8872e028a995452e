//! reqdoc — turn LLM-generated requirements into a canonical document.
//!
//! Pipeline, leaf-first:
//!
//! 1. **Intake** ([`intake`]) — coerce raw model output into a [`DocumentModel`]
//!    or fall back to opaque text
//! 2. **Classify** ([`classify`]) — MUST/SHOULD/COULD levels and the five-way
//!    non-functional taxonomy
//! 3. **Derive** ([`derive`]) — recompute [`DerivedSections`] on every read
//! 4. **Select** ([`select`]) — bounded highlights, removed from the rest
//! 5. **Render** ([`render`]) — markdown, HTML and JSON from one view
//! 6. **Merge** ([`merge`]) — fold flat text edits back into the model
//!
//! [`DocumentStore`] holds the single current document; [`backend`] talks
//! to the generation and export services.

pub mod backend;
pub mod classify;
pub mod config;
pub mod derive;
pub mod error;
pub mod export;
pub mod generate;
pub mod intake;
pub mod merge;
pub mod model;
pub mod render;
pub mod select;
pub mod store;

pub use classify::{classify_level, Category, Level, Taxonomy};
pub use error::{Error, Operation, Result};
pub use model::{Content, DerivedSections, DocumentModel, FunctionalRequirement, Requirement};
pub use store::DocumentStore;
