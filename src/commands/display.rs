//! Terminal and JSON rendering of a decomposed reply.

use crate::error::{AladinError, Result};
use crate::pipeline::Decomposition;
use crate::reply::{ParsedSections, SectionName};
use std::fmt::Write;

const MISSING: &str = "(missing)";

/// Human-readable report: meta fields grouped, then the body, then the
/// word-count line.
pub fn render_text(decomposition: &Decomposition) -> String {
    let sections = &decomposition.sections;
    let mut out = String::new();

    let _ = writeln!(out, "SEO");
    let _ = writeln!(out, "  Title:       {}", field(sections, SectionName::SeoTitle));
    let _ = writeln!(
        out,
        "  Description: {}",
        field(sections, SectionName::SeoDescription)
    );
    let _ = writeln!(out);

    let _ = writeln!(out, "Emotional");
    let _ = writeln!(
        out,
        "  Title:       {}",
        field(sections, SectionName::EmotionalTitle)
    );
    let _ = writeln!(
        out,
        "  Description: {}",
        field(sections, SectionName::EmotionalDescription)
    );
    let _ = writeln!(out);

    let _ = writeln!(
        out,
        "{}: {}",
        SectionName::UrlSlug.label(),
        field(sections, SectionName::UrlSlug)
    );
    let _ = writeln!(out);

    let heading = SectionName::BlogContent.label();
    let _ = writeln!(out, "{}", heading);
    let _ = writeln!(out, "{}", "-".repeat(heading.len()));
    let _ = writeln!(out, "{}", field(sections, SectionName::BlogContent));
    let _ = writeln!(out);

    let verdict = &decomposition.word_count;
    if verdict.within_tolerance {
        let _ = writeln!(out, "{}", verdict.summary());
    } else {
        let _ = writeln!(out, "Warning: {}", verdict.summary());
    }

    out
}

/// `{"sections": {...}, "word_count": {...}}`, pretty-printed.
pub fn render_json(decomposition: &Decomposition) -> Result<String> {
    serde_json::to_string_pretty(decomposition)
        .map_err(|e| AladinError::UserError(format!("failed to serialize sections: {}", e)))
}

fn field(sections: &ParsedSections, name: SectionName) -> &str {
    let text = sections.get(name);
    if text.is_empty() { MISSING } else { text }
}
