//! Intake normalizer: coerce raw model output into a document.
//!
//! Model output arrives either as an object or as text that may wrap one
//! JSON object in prose or markdown fences. Attempts run in order and the
//! first success wins:
//!
//! 1. an object is taken as-is
//! 2. text is trimmed and one surrounding code fence removed
//! 3. the cleaned text is parsed as strict JSON
//! 4. the span from the first `{` to the last `}` is parsed
//!
//! No repair beyond that. Anything else is [`IntakeError::Unparseable`],
//! and [`load`] falls back to [`Content::Opaque`].

use crate::classify::{classify_level, Level};
use crate::error::IntakeError;
use crate::model::{Content, DocumentModel, FunctionalRequirement, Requirement, Risk};
use regex::Regex;
use serde_json::{Map, Value};
use std::sync::LazyLock;
use tracing::{debug, warn};

/// Opening fence with optional info string, e.g. "```json".
static RE_OPEN_FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^```[A-Za-z0-9_+-]*[ \t]*\r?\n?").unwrap());

static RE_CLOSE_FENCE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\r?\n?```\s*$").unwrap());

pub type JsonObject = Map<String, Value>;

/// Coerce raw output to a JSON object.
pub fn normalize(raw: &Value) -> Result<JsonObject, IntakeError> {
    match raw {
        Value::Object(obj) => Ok(obj.clone()),
        Value::Null => Err(IntakeError::Unparseable),
        Value::String(text) => normalize_text(text),
        other => normalize_text(&other.to_string()),
    }
}

/// Text variant of [`normalize`].
pub fn normalize_text(text: &str) -> Result<JsonObject, IntakeError> {
    let cleaned = strip_fences(text.trim());

    if let Some(obj) = parse_object(cleaned) {
        debug!("intake: strict parse succeeded");
        return Ok(obj);
    }

    if let (Some(start), Some(end)) = (cleaned.find('{'), cleaned.rfind('}')) {
        if end > start {
            if let Some(obj) = parse_object(&cleaned[start..=end]) {
                debug!(start, end, "intake: brace-span parse succeeded");
                return Ok(obj);
            }
        }
    }

    debug!("intake: no JSON object found");
    Err(IntakeError::Unparseable)
}

/// Remove one opening fence (optionally tagged) and a trailing fence.
fn strip_fences(text: &str) -> &str {
    if !text.starts_with("```") {
        return text;
    }
    let open_len = RE_OPEN_FENCE.find(text).map_or(3, |m| m.end());
    let body = &text[open_len..];
    let body = match RE_CLOSE_FENCE.find(body) {
        Some(m) => &body[..m.start()],
        None => body,
    };
    body.trim()
}

fn parse_object(text: &str) -> Option<JsonObject> {
    match serde_json::from_str::<Value>(text) {
        Ok(Value::Object(obj)) => Some(obj),
        _ => None,
    }
}

/// Build a [`DocumentModel`] from a normalized object.
///
/// Requires a `functional` array. Every structured entry leaves with its
/// level set, explicit or classified.
pub fn document_from_object(obj: &JsonObject) -> Result<DocumentModel, IntakeError> {
    let functional = field(obj, &["functional"])
        .and_then(Value::as_array)
        .ok_or(IntakeError::ShapeMismatch)?;

    Ok(DocumentModel {
        title: text_field(obj, "title"),
        summary: text_field(obj, "summary"),
        functional: functional.iter().filter_map(requirement_from_value).collect(),
        non_functional: text_list(obj, &["nonFunctional", "non_functional"]),
        constraints: text_list(obj, &["constraints"]),
        out_of_scope: text_list(obj, &["outOfScope", "out_of_scope"]),
        open_questions: text_list(obj, &["openQuestions", "open_questions"]),
        use_cases: text_list(obj, &["useCases", "use_cases"]),
        risks: field(obj, &["risks"])
            .and_then(Value::as_array)
            .map(|items| items.iter().filter_map(risk_from_value).collect())
            .unwrap_or_default(),
    })
}

/// Never fails: unusable input becomes opaque text.
pub fn load(raw: &Value) -> Content {
    let outcome = normalize(raw).and_then(|obj| document_from_object(&obj));
    match outcome {
        Ok(model) => Content::Structured(model),
        Err(err) => {
            warn!("falling back to opaque text: {}", err);
            Content::Opaque(opaque_text(raw))
        }
    }
}

pub fn load_text(text: &str) -> Content {
    load(&Value::String(text.to_string()))
}

fn opaque_text(raw: &Value) -> String {
    match raw {
        Value::String(text) => text.clone(),
        Value::Null => String::new(),
        other => serde_json::to_string_pretty(other).unwrap_or_else(|_| other.to_string()),
    }
}

fn field<'a>(obj: &'a JsonObject, keys: &[&str]) -> Option<&'a Value> {
    keys.iter().find_map(|k| obj.get(*k))
}

fn text_field(obj: &JsonObject, key: &str) -> String {
    obj.get(key).and_then(scalar_text).unwrap_or_default()
}

/// Strings pass through; other scalars are stringified.
fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Text of a list entry: a scalar, or an object carrying the text under
/// `statement`, `text` or `description`.
fn item_text(value: &Value) -> Option<String> {
    let text = match value {
        Value::Object(obj) => ["statement", "text", "description"]
            .iter()
            .find_map(|k| obj.get(*k).and_then(scalar_text)),
        other => scalar_text(other),
    }?;
    (!text.is_empty()).then_some(text)
}

fn text_list(obj: &JsonObject, keys: &[&str]) -> Vec<String> {
    field(obj, keys)
        .and_then(Value::as_array)
        .map(|items| items.iter().filter_map(item_text).collect())
        .unwrap_or_default()
}

fn string_list(value: Option<&Value>) -> Vec<String> {
    value
        .and_then(Value::as_array)
        .map(|items| items.iter().filter_map(item_text).collect())
        .unwrap_or_default()
}

fn requirement_from_value(value: &Value) -> Option<Requirement> {
    match value {
        Value::Object(obj) => {
            let Some(statement) = obj.get("statement").and_then(scalar_text) else {
                warn!(entry = %value, "skipping functional entry without a statement");
                return None;
            };
            let level = obj
                .get("level")
                .and_then(Value::as_str)
                .and_then(Level::parse)
                .unwrap_or_else(|| classify_level(&statement));
            Some(Requirement::Structured(FunctionalRequirement {
                id: obj.get("id").and_then(scalar_text).filter(|id| !id.is_empty()),
                level: Some(level),
                statement,
                bullets: string_list(obj.get("bullets")),
                rationale: obj
                    .get("rationale")
                    .and_then(scalar_text)
                    .filter(|r| !r.is_empty()),
                standards: string_list(obj.get("standards")),
            }))
        }
        other => item_text(other).map(Requirement::Plain),
    }
}

fn risk_from_value(value: &Value) -> Option<Risk> {
    match value {
        Value::Object(obj) => {
            let risk = obj.get("risk").and_then(scalar_text).filter(|r| !r.is_empty())?;
            let mitigation = obj
                .get("mitigation")
                .and_then(scalar_text)
                .unwrap_or_default();
            Some(Risk { risk, mitigation })
        }
        other => item_text(other).map(|risk| Risk {
            risk,
            mitigation: String::new(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn object_input_is_returned_unchanged() {
        let raw = json!({"title": "T", "functional": []});
        let obj = normalize(&raw).unwrap();
        assert_eq!(Value::Object(obj), raw);
    }

    #[test]
    fn fenced_json_is_stripped_and_parsed() {
        let raw = "```json\n{\"title\":\"T\",\"functional\":[{\"id\":\"FR001\",\"statement\":\"Do X\"}]}\n```";
        let content = load_text(raw);
        let model = content.model().expect("structured");
        assert_eq!(model.title, "T");
        match &model.functional[0] {
            Requirement::Structured(req) => {
                assert_eq!(req.id.as_deref(), Some("FR001"));
                assert_eq!(req.level, Some(Level::Should));
            }
            other => panic!("expected structured, got {:?}", other),
        }
    }

    #[test]
    fn untagged_fence_is_stripped() {
        let obj = normalize_text("```\n{\"a\": 1}\n```").unwrap();
        assert_eq!(obj.get("a"), Some(&json!(1)));
    }

    #[test]
    fn prose_around_object_is_ignored() {
        let obj = normalize_text("Sure! Here it is:\n{\"a\": {\"b\": 2}}\nHope that helps.").unwrap();
        assert_eq!(obj.get("a"), Some(&json!({"b": 2})));
    }

    #[test]
    fn malformed_json_inside_braces_is_unparseable() {
        assert_eq!(
            normalize_text("here: {\"a\": 1,,} done"),
            Err(IntakeError::Unparseable)
        );
    }

    #[test]
    fn closing_brace_before_opening_is_unparseable() {
        assert_eq!(normalize_text("} nothing {"), Err(IntakeError::Unparseable));
    }

    #[test]
    fn non_object_json_is_unparseable() {
        assert_eq!(normalize_text("[1, 2, 3]"), Err(IntakeError::Unparseable));
        assert_eq!(normalize(&Value::Null), Err(IntakeError::Unparseable));
    }

    #[test]
    fn missing_functional_is_shape_mismatch() {
        let obj = normalize_text("{\"title\": \"T\"}").unwrap();
        assert_eq!(document_from_object(&obj), Err(IntakeError::ShapeMismatch));
    }

    #[test]
    fn unusable_input_falls_back_to_opaque_text() {
        assert_eq!(load_text("# Just markdown"), Content::Opaque("# Just markdown".to_string()));
        match load(&json!({"title": "T"})) {
            Content::Opaque(text) => assert!(text.contains("\"title\"")),
            other => panic!("expected opaque, got {:?}", other),
        }
    }

    #[test]
    fn mixed_entries_are_tolerated() {
        let raw = json!({
            "functional": [
                "The system MUST log in users",
                {"id": "FR2", "statement": "Export CSV", "level": "could", "bullets": ["UTF-8"]},
                {"id": "FR3"},
                42
            ],
            "nonFunctional": ["Fast pages", {"statement": "GDPR compliant"}, ""],
            "risks": [{"risk": "Vendor lock-in", "mitigation": "Abstract storage"}, "Scope creep"]
        });
        let model = load(&raw).model().cloned().expect("structured");
        assert_eq!(model.functional.len(), 3);
        assert_eq!(model.functional[0], Requirement::Plain("The system MUST log in users".into()));
        assert_eq!(model.functional[1].level(), Level::Could);
        assert_eq!(model.functional[2], Requirement::Plain("42".into()));
        assert_eq!(model.non_functional, vec!["Fast pages", "GDPR compliant"]);
        assert_eq!(model.risks[1].risk, "Scope creep");
        assert!(model.risks[1].mitigation.is_empty());
    }

    #[test]
    fn snake_case_keys_are_accepted() {
        let model = load(&json!({"functional": [], "non_functional": ["Fast"], "out_of_scope": ["Mobile"]}))
            .model()
            .cloned()
            .unwrap();
        assert_eq!(model.non_functional, vec!["Fast"]);
        assert_eq!(model.out_of_scope, vec!["Mobile"]);
    }
}
