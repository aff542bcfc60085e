use tracing::debug;

use crate::document::Document;

/// Render a document back to bytes.
///
/// Files that use a single terminator style come back unchanged. When more than
/// one style is present, every terminated line is written with the dominant one.
pub fn render(document: &Document) -> Vec<u8> {
    let stats = document.line_ending_stats();
    let normalized = if stats.distinct() > 1 { stats.dominant() } else { None };
    if let Some(ending) = normalized {
        debug!(ending = ?ending, "normalizing mixed line endings");
    }

    let mut out = String::new();
    if document.has_bom() {
        out.push('\u{FEFF}');
    }
    for line in document.lines() {
        line.render_into(&mut out);
        if let Some(ending) = line.ending {
            out.push_str(normalized.unwrap_or(ending).as_str());
        }
    }
    out.into_bytes()
}
