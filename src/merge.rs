//! Edit merge: fold flat text edits for one view back into the model.
//!
//! Both merges are pure: they return a new model and leave the input alone,
//! so a caller can swap it in whole or discard it.

use crate::classify::{Category, Taxonomy};
use crate::derive::partition_functional;
use crate::model::{DocumentModel, Requirement};
use crate::select::select_highlights;
use std::collections::HashSet;
use tracing::debug;

/// Replace the non-highlighted functional tail with `lines`.
///
/// Highlights are recomputed from the current model and kept verbatim.
pub fn merge_functional_edit(model: &DocumentModel, lines: &[String]) -> DocumentModel {
    let highlights = select_highlights(&partition_functional(&model.functional));
    let edited = clean_lines(lines);
    debug!(
        kept = highlights.len(),
        replaced = model.functional.len().saturating_sub(highlights.len()),
        added = edited.len(),
        "merging functional edit"
    );

    let mut merged = model.clone();
    merged.functional = highlights
        .into_iter()
        .chain(edited.into_iter().map(Requirement::Plain))
        .collect();
    merged
}

/// Replace the statements that bucket into `category` with `lines`.
///
/// Statements of other categories, and unmatched ones, are untouched.
/// Placeholder defaults live only in the derived view and are never saved.
pub fn merge_nfr_edit(
    model: &DocumentModel,
    taxonomy: &Taxonomy,
    category: Category,
    lines: &[String],
) -> DocumentModel {
    let existing: HashSet<&str> = taxonomy
        .statements_in(&model.non_functional, category)
        .into_iter()
        .collect();
    let edited = clean_lines(lines);
    debug!(
        %category,
        removed = existing.len(),
        added = edited.len(),
        "merging non-functional edit"
    );

    let mut merged = model.clone();
    merged.non_functional = model
        .non_functional
        .iter()
        .filter(|s| !existing.contains(s.as_str()))
        .cloned()
        .chain(edited)
        .collect();
    merged
}

/// Trimmed, non-blank lines.
fn clean_lines(lines: &[String]) -> Vec<String> {
    lines
        .iter()
        .map(|l| l.trim())
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect()
}
