//! Document deriver: DocumentModel → DerivedSections.
//!
//! Pure and deterministic; called on every render instead of caching.

use crate::classify::Taxonomy;
use crate::model::{DerivedSections, DocumentModel, LevelGroups, Requirement};
use regex::Regex;
use std::sync::LazyLock;

/// How many functional statements seed the use-case fallback.
pub const USE_CASE_FALLBACK_COUNT: usize = 5;

static RE_SYSTEM_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^\s*the system\s+(?:must|should|could)\s+").unwrap());

pub fn derive(model: &DocumentModel, taxonomy: &Taxonomy) -> DerivedSections {
    DerivedSections {
        title: model.title.clone(),
        summary: model.summary.clone(),
        functionality: partition_functional(&model.functional),
        nfr: taxonomy.bucket(&model.non_functional),
        use_cases: derive_use_cases(model),
        constraints: model.constraints.clone(),
        out_of_scope: model.out_of_scope.clone(),
        open_questions: model.open_questions.clone(),
        risks: model.risks.clone(),
    }
}

/// Group functional entries by explicit level, else classified level.
pub fn partition_functional(items: &[Requirement]) -> LevelGroups<Requirement> {
    let mut groups = LevelGroups::default();
    for item in items {
        groups.push(item.level(), item.clone());
    }
    groups
}

/// Explicit use cases, or the first few functional statements with their
/// "The system MUST/SHOULD/COULD" lead-in removed.
pub fn derive_use_cases(model: &DocumentModel) -> Vec<String> {
    if !model.use_cases.is_empty() {
        return model.use_cases.clone();
    }
    model
        .functional
        .iter()
        .take(USE_CASE_FALLBACK_COUNT)
        .map(|item| strip_system_prefix(item.statement()))
        .filter(|s| !s.is_empty())
        .collect()
}

fn strip_system_prefix(statement: &str) -> String {
    RE_SYSTEM_PREFIX.replace(statement, "").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::Level;
    use crate::model::FunctionalRequirement;

    fn plain(s: &str) -> Requirement {
        Requirement::Plain(s.to_string())
    }

    fn sample() -> DocumentModel {
        DocumentModel {
            title: "Shop".to_string(),
            functional: vec![
                plain("The system MUST let users sign in"),
                plain("The system SHOULD send receipts"),
                Requirement::Structured(FunctionalRequirement {
                    id: Some("FR3".to_string()),
                    level: Some(Level::Could),
                    statement: "The system MUST offer gift cards".to_string(),
                    ..Default::default()
                }),
                plain("Keep order history"),
                plain("the system could show recommendations"),
                plain("The system MUST support refunds"),
            ],
            non_functional: vec!["Must support 99.9% uptime".to_string()],
            ..Default::default()
        }
    }

    #[test]
    fn derivation_is_idempotent() {
        let taxonomy = Taxonomy::default();
        let model = sample();
        let first = serde_json::to_string(&derive(&model, &taxonomy)).unwrap();
        let second = serde_json::to_string(&derive(&model, &taxonomy)).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn explicit_level_drives_partition() {
        let groups = partition_functional(&sample().functional);
        assert_eq!(groups.must.len(), 2);
        assert_eq!(groups.should.len(), 2);
        assert_eq!(groups.could.len(), 2);
        assert_eq!(groups.could[0].id(), Some("FR3"));
    }

    #[test]
    fn use_cases_fall_back_to_first_five_statements() {
        let cases = derive_use_cases(&sample());
        assert_eq!(
            cases,
            vec![
                "let users sign in",
                "send receipts",
                "offer gift cards",
                "Keep order history",
                "show recommendations",
            ]
        );
    }

    #[test]
    fn explicit_use_cases_win() {
        let mut model = sample();
        model.use_cases = vec!["Buy a thing".to_string()];
        assert_eq!(derive_use_cases(&model), vec!["Buy a thing"]);
    }

    #[test]
    fn derive_does_not_touch_stored_nfrs() {
        let model = sample();
        let derived = derive(&model, &Taxonomy::default());
        assert_eq!(derived.nfr.reliability.must, vec!["Must support 99.9% uptime"]);
        assert!(derived.nfr.performance.has_must_or_should());
        assert_eq!(model.non_functional.len(), 1);
    }
}
