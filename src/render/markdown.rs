//! Lightweight-markup renderer (GitHub-flavored markdown).

use crate::model::Risk;
use crate::render::{CategorySection, Entry, RenderView, Renderer};

pub struct MarkdownRenderer;

impl Renderer for MarkdownRenderer {
    fn render(&self, view: &RenderView) -> String {
        let mut lines: Vec<String> = Vec::new();

        lines.push(format!("# {}\n", view.title()));

        let intro = view.intro();
        if !intro.is_empty() {
            lines.push(intro);
            lines.push(String::new());
        }

        if !view.highlights.is_empty() {
            lines.push("## Highlights\n".to_string());
            for item in &view.highlights {
                lines.push(render_entry(Entry::from(item)));
            }
            lines.push(String::new());
        }

        for section in view.category_sections() {
            render_category(&mut lines, &section);
        }

        for (title, items) in view.list_sections() {
            lines.push(format!("## {}\n", title));
            for item in items {
                lines.push(format!("- {}", item));
            }
            lines.push(String::new());
        }

        if !view.sections.risks.is_empty() {
            lines.push("## Risks\n".to_string());
            for risk in &view.sections.risks {
                lines.push(render_risk(risk));
            }
            lines.push(String::new());
        }

        let outro = view.outro();
        if !outro.is_empty() {
            lines.push("## Summary\n".to_string());
            lines.push(outro);
            lines.push(String::new());
        }

        lines.join("\n")
    }

    fn render_opaque(&self, text: &str) -> String {
        let mut out = text.to_string();
        if !out.ends_with('\n') {
            out.push('\n');
        }
        out
    }

    fn file_extension(&self) -> &str {
        "md"
    }
}

fn render_category(lines: &mut Vec<String>, section: &CategorySection<'_>) {
    lines.push(format!("## {}\n", section.title));
    for (label, entries) in section.subsections() {
        lines.push(format!("### {}\n", label));
        for entry in entries {
            lines.push(render_entry(*entry));
        }
        lines.push(String::new());
    }
}

/// A list item; structured requirements carry nested detail lines.
fn render_entry(entry: Entry<'_>) -> String {
    match entry {
        Entry::Text(text) => format!("- {}", text),
        Entry::Structured(req) => {
            let mut out = match req.id.as_deref() {
                Some(id) => format!("- **{}** {}", id, req.statement),
                None => format!("- {}", req.statement),
            };
            for bullet in &req.bullets {
                out.push_str(&format!("\n  - {}", bullet));
            }
            if let Some(ref rationale) = req.rationale {
                out.push_str(&format!("\n  - _Rationale:_ {}", rationale));
            }
            if !req.standards.is_empty() {
                out.push_str(&format!("\n  - _Standards:_ {}", req.standards.join(", ")));
            }
            out
        }
    }
}

fn render_risk(risk: &Risk) -> String {
    if risk.mitigation.is_empty() {
        format!("- **{}**", risk.risk)
    } else {
        format!("- **{}**: {}", risk.risk, risk.mitigation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::{Level, Taxonomy};
    use crate::model::{DocumentModel, FunctionalRequirement, Requirement};

    #[test]
    fn renders_full_layout_in_order() {
        let model = DocumentModel {
            title: "Clinic".to_string(),
            summary: "Book visits. Pay online. Get reminders. Rate doctors. Extra.".to_string(),
            functional: vec![
                Requirement::Structured(FunctionalRequirement {
                    id: Some("FR1".to_string()),
                    level: Some(Level::Must),
                    statement: "Patients book visits".to_string(),
                    bullets: vec!["Pick a slot".to_string()],
                    rationale: Some("Core flow".to_string()),
                    standards: vec!["HL7".to_string()],
                }),
                Requirement::Plain("Doctors COULD rate patients".to_string()),
            ],
            non_functional: vec!["Pages should load fast".to_string()],
            constraints: vec!["Budget 10k".to_string()],
            risks: vec![Risk {
                risk: "Low adoption".to_string(),
                mitigation: "Pilot first".to_string(),
            }],
            ..Default::default()
        };
        let out = MarkdownRenderer.render(&RenderView::build(&model, &Taxonomy::default()));

        assert!(out.starts_with("# Clinic\n\nBook visits. Pay online. Get reminders.\n"));
        assert!(out.contains(
            "## Highlights\n\n- **FR1** Patients book visits\n  - Pick a slot\n  - _Rationale:_ Core flow\n  - _Standards:_ HL7\n"
        ));
        assert!(out.contains("## Performance\n\n### SHOULD\n\n- Pages should load fast\n"));
        assert!(out.contains("## Use Cases\n\n- Patients book visits\n- Doctors COULD rate patients\n"));
        assert!(out.contains("## Constraints\n\n- Budget 10k\n"));
        assert!(out.contains("## Risks\n\n- **Low adoption**: Pilot first\n"));
        assert!(out.ends_with("## Summary\n\nBook visits. Pay online. Get reminders. Rate doctors.\n"));
        // only COULD entries remain, so no functional section
        assert!(!out.contains("## Functional Requirements"));

        let order: Vec<usize> = ["## Highlights", "## Reliability", "## Verification", "## Use Cases", "## Summary"]
            .iter()
            .map(|h| out.find(h).unwrap())
            .collect();
        assert!(order.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn opaque_text_passes_through() {
        assert_eq!(MarkdownRenderer.render_opaque("# Raw"), "# Raw\n");
    }
}
