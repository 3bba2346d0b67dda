//! Plain-text report renderer.

use super::{DocumentRenderer, ReportDocument, ReportLine};

/// Renders reports as UTF-8 text with underlined headings.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextRenderer;

fn underline(out: &mut String, heading: &str, mark: char) {
    out.push_str(heading);
    out.push('\n');
    out.extend(std::iter::repeat(mark).take(heading.chars().count()));
    out.push('\n');
}

impl DocumentRenderer for TextRenderer {
    fn extension(&self) -> &'static str {
        "txt"
    }

    fn render(&self, document: &ReportDocument) -> Vec<u8> {
        let mut out = String::new();
        underline(&mut out, &document.title, '=');
        out.push('\n');

        for section in &document.sections {
            underline(&mut out, &section.heading, '-');
            for line in &section.lines {
                out.push_str(&format!("{}: {}\n", line.label, line.value));
            }
            out.push('\n');
        }

        out.push_str(&document.footer());
        out.push('\n');
        out.into_bytes()
    }
}
