//! HTML renderer — standalone page ready for print/PDF conversion.

use crate::model::Risk;
use crate::render::{CategorySection, Entry, RenderView, Renderer, DEFAULT_TITLE};

pub struct HtmlRenderer;

impl Renderer for HtmlRenderer {
    fn render(&self, view: &RenderView) -> String {
        let mut out = String::new();
        let title = html_escape(view.title());

        push_head(&mut out, &title);
        out.push_str(&format!("<h1>{}</h1>\n", title));

        let intro = view.intro();
        if !intro.is_empty() {
            out.push_str(&format!("<p class=\"intro\">{}</p>\n", html_escape(&intro)));
        }

        if !view.highlights.is_empty() {
            out.push_str("<section class=\"highlights\">\n<h2>Highlights</h2>\n<ul>\n");
            for item in &view.highlights {
                out.push_str(&render_entry(Entry::from(item)));
            }
            out.push_str("</ul>\n</section>\n");
        }

        for section in view.category_sections() {
            out.push_str(&render_category(&section));
        }

        for (heading, items) in view.list_sections() {
            out.push_str(&format!(
                "<section>\n<h2>{}</h2>\n<ul>\n",
                html_escape(heading)
            ));
            for item in items {
                out.push_str(&format!("  <li>{}</li>\n", html_escape(item)));
            }
            out.push_str("</ul>\n</section>\n");
        }

        if !view.sections.risks.is_empty() {
            out.push_str("<section>\n<h2>Risks</h2>\n<dl>\n");
            for risk in &view.sections.risks {
                out.push_str(&render_risk(risk));
            }
            out.push_str("</dl>\n</section>\n");
        }

        let outro = view.outro();
        if !outro.is_empty() {
            out.push_str(&format!(
                "<section>\n<h2>Summary</h2>\n<p class=\"summary\">{}</p>\n</section>\n",
                html_escape(&outro)
            ));
        }

        out.push_str("</body>\n</html>\n");
        out
    }

    fn render_opaque(&self, text: &str) -> String {
        let mut out = String::new();
        push_head(&mut out, DEFAULT_TITLE);
        out.push_str(&format!("<pre>{}</pre>\n", html_escape(text)));
        out.push_str("</body>\n</html>\n");
        out
    }

    fn file_extension(&self) -> &str {
        "html"
    }
}

/// Doctype, head with inline print styles, and the opening body tag.
/// `title` must already be escaped.
fn push_head(out: &mut String, title: &str) {
    out.push_str("<!DOCTYPE html>\n<html>\n<head>\n");
    out.push_str("<meta charset=\"utf-8\">\n");
    out.push_str(&format!("<title>{}</title>\n", title));
    out.push_str("<style>\n");
    out.push_str("body { font-family: system-ui, sans-serif; max-width: 48em; margin: 2em auto; padding: 0 1em; }\n");
    out.push_str("h2 { border-bottom: 1px solid #ddd; padding-bottom: 0.2em; }\n");
    out.push_str("h3 { font-size: 0.9em; letter-spacing: 0.05em; color: #555; }\n");
    out.push_str(".highlights { background: #f4f4f4; padding: 0.5em 1em; border-radius: 5px; }\n");
    out.push_str(".req-id { font-family: monospace; margin-right: 0.4em; }\n");
    out.push_str(".rationale { font-style: italic; }\n");
    out.push_str("dt { font-weight: bold; margin-top: 0.5em; }\n");
    out.push_str("dd { margin-left: 1.5em; }\n");
    out.push_str("</style>\n");
    out.push_str("</head>\n<body>\n");
}

fn render_category(section: &CategorySection<'_>) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "<section class=\"category\">\n<h2>{}</h2>\n",
        html_escape(section.title)
    ));
    for (label, entries) in section.subsections() {
        out.push_str(&format!("<h3>{}</h3>\n<ul>\n", label));
        for entry in entries {
            out.push_str(&render_entry(*entry));
        }
        out.push_str("</ul>\n");
    }
    out.push_str("</section>\n");
    out
}

fn render_entry(entry: Entry<'_>) -> String {
    match entry {
        Entry::Text(text) => format!("  <li>{}</li>\n", html_escape(text)),
        Entry::Structured(req) => {
            let mut out = String::from("  <li>");
            if let Some(ref id) = req.id {
                out.push_str(&format!("<span class=\"req-id\">{}</span>", html_escape(id)));
            }
            out.push_str(&html_escape(&req.statement));
            if !req.bullets.is_empty() {
                out.push_str("\n    <ul>\n");
                for bullet in &req.bullets {
                    out.push_str(&format!("      <li>{}</li>\n", html_escape(bullet)));
                }
                out.push_str("    </ul>");
            }
            if let Some(ref rationale) = req.rationale {
                out.push_str(&format!(
                    "\n    <p class=\"rationale\">Rationale: {}</p>",
                    html_escape(rationale)
                ));
            }
            if !req.standards.is_empty() {
                out.push_str(&format!(
                    "\n    <p class=\"standards\">Standards: {}</p>",
                    html_escape(&req.standards.join(", "))
                ));
            }
            out.push_str("</li>\n");
            out
        }
    }
}

fn render_risk(risk: &Risk) -> String {
    let mut out = format!("  <dt>{}</dt>\n", html_escape(&risk.risk));
    if !risk.mitigation.is_empty() {
        out.push_str(&format!("  <dd>{}</dd>\n", html_escape(&risk.mitigation)));
    }
    out
}

/// Escape the five markup metacharacters.
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
