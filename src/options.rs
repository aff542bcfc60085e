use tracing::warn;

use crate::line_ending::LineEnding;

const DEFAULT_SEPARATOR: &str = ": ";

/// Formatting and persistence options for a [`Config`](crate::Config).
#[derive(Debug, Clone)]
pub struct Options {
    /// Separator for entries added to a file that has no entries yet.
    /// Once the file has entries, new ones copy the last entry's separator.
    pub separator: String,

    /// Terminator for new lines when the file has no terminated line yet.
    pub line_ending: LineEnding,

    /// Persist to disk after every write and delete instead of waiting for
    /// an explicit `save`.
    pub auto_save: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            separator: DEFAULT_SEPARATOR.to_string(),
            line_ending: LineEnding::Lf,
            auto_save: false,
        }
    }
}

impl Options {
    /// Replace a separator that would not parse back as one with the default.
    pub(crate) fn validated(mut self) -> Self {
        if !is_separator(&self.separator) {
            warn!(
                separator = ?self.separator,
                using = DEFAULT_SEPARATOR,
                "invalid separator, using default"
            );
            self.separator = DEFAULT_SEPARATOR.to_string();
        }
        self
    }
}

/// A separator is blanks with at most one `=` or `:` among them.
fn is_separator(text: &str) -> bool {
    let blanks = |s: &str| s.bytes().all(|b| b == b' ' || b == b'\t');
    match text.find(['=', ':']) {
        Some(mark) => blanks(&text[..mark]) && blanks(&text[mark + 1..]),
        None => !text.is_empty() && blanks(text),
    }
}
