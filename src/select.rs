//! Highlight selection and de-duplication of the remaining groups.

use crate::model::{LevelGroups, Requirement};
use std::collections::HashSet;

/// Upper bound on highlighted requirements.
pub const HIGHLIGHT_LIMIT: usize = 4;

/// Key used to match an entry against the highlights.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Identity {
    Id(String),
    /// Lower-cased, whitespace-collapsed statement.
    Text(String),
}

impl Identity {
    /// Every key of `item`: its id when present, and always its text.
    pub fn keys(item: &Requirement) -> Vec<Identity> {
        let mut keys = Vec::with_capacity(2);
        if let Some(id) = item.id() {
            keys.push(Identity::Id(id.trim().to_string()));
        }
        keys.push(Identity::Text(normalize_statement(item.statement())));
        keys
    }
}

/// Keys of the entries already taken as highlights.
#[derive(Debug, Default)]
struct Taken(HashSet<Identity>);

impl Taken {
    fn insert(&mut self, item: &Requirement) {
        self.0.extend(Identity::keys(item));
    }

    /// An entry matches when any of its keys was taken.
    fn contains(&self, item: &Requirement) -> bool {
        Identity::keys(item).iter().any(|key| self.0.contains(key))
    }
}

pub fn normalize_statement(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// MUST items, then SHOULD items, capped at [`HIGHLIGHT_LIMIT`]. An entry
/// matching one already picked is skipped.
pub fn select_highlights(groups: &LevelGroups<Requirement>) -> Vec<Requirement> {
    let mut taken = Taken::default();
    let mut picked = Vec::with_capacity(HIGHLIGHT_LIMIT);
    for item in groups.must.iter().chain(&groups.should) {
        if picked.len() == HIGHLIGHT_LIMIT {
            break;
        }
        if taken.contains(item) {
            continue;
        }
        taken.insert(item);
        picked.push(item.clone());
    }
    picked
}

/// Copy of `groups` without any entry sharing an id or normalized text
/// with a selected one.
pub fn remove_selected(
    groups: &LevelGroups<Requirement>,
    selected: &[Requirement],
) -> LevelGroups<Requirement> {
    let mut taken = Taken::default();
    for item in selected {
        taken.insert(item);
    }
    let mut remaining = groups.clone();
    remaining.retain(|item| !taken.contains(item));
    remaining
}
