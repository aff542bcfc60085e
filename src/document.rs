use crate::escape;
use crate::line_ending::{LineEnding, LineEndingStats};

/// Classification of a document line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Blank,
    Comment,
    Entry,
    Unparsed,
}

/// A key/value line split into the pieces needed to rewrite it in place.
///
/// Rendering is always `prefix + raw_key + separator + raw_value + suffix`, so a
/// line whose value was never written comes back byte-for-byte.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    /// Leading indentation.
    pub prefix: String,
    /// Key text as written, escapes included.
    pub raw_key: String,
    /// Decoded key used for lookup.
    pub key: String,
    /// Exact token between key and value, surrounding whitespace included.
    pub separator: String,
    /// Value text as written, escapes included.
    pub raw_value: String,
    /// Decoded value.
    pub value: String,
    /// Inline comment together with the whitespace in front of it.
    pub suffix: String,
}

impl Entry {
    /// Build an entry for a newly added key, formatted like `template`.
    pub fn following(
        template: Option<&Entry>,
        key: &str,
        value: &str,
        default_separator: &str,
    ) -> Self {
        let raw_key = escape::encode_key(key);
        let (prefix, separator) = match template {
            Some(t) if !t.separator.is_empty() => (t.prefix.clone(), t.aligned_separator(&raw_key)),
            _ => (String::new(), default_separator.to_string()),
        };
        Self {
            prefix,
            raw_key,
            key: key.to_string(),
            separator,
            raw_value: escape::encode_value(value),
            value: value.to_string(),
            suffix: String::new(),
        }
    }

    /// Copy of this entry carrying another value, used for extra occurrences
    /// of a multi-valued key. A bare-key template gets `fallback_separator`
    /// so the copy still parses back as the same key.
    pub fn with_value(&self, value: &str, fallback_separator: &str) -> Self {
        let mut entry = Self {
            prefix: self.prefix.clone(),
            raw_key: self.raw_key.clone(),
            key: self.key.clone(),
            separator: self.separator.clone(),
            raw_value: String::new(),
            value: String::new(),
            suffix: String::new(),
        };
        entry.set_value(value, fallback_separator);
        entry
    }

    /// Replace the value, keeping prefix, key, separator and suffix.
    ///
    /// A bare-key line has no separator; it gets `fallback_separator` once it
    /// carries a value.
    pub fn set_value(&mut self, value: &str, fallback_separator: &str) {
        if self.separator.is_empty() && !value.is_empty() {
            self.separator = fallback_separator.to_string();
        }
        self.raw_value = escape::encode_value(value);
        self.value = value.to_string();
    }

    pub fn render_into(&self, out: &mut String) {
        out.push_str(&self.prefix);
        out.push_str(&self.raw_key);
        out.push_str(&self.separator);
        out.push_str(&self.raw_value);
        out.push_str(&self.suffix);
    }

    /// Separator for a key of a different width. When this entry pads its key
    /// with spaces to line values up in a column, the padding is recomputed so
    /// the new value starts in the same column.
    fn aligned_separator(&self, raw_key: &str) -> String {
        let sep = self.separator.as_str();
        let lead_len = sep.len() - sep.trim_start_matches([' ', '\t']).len();
        let (lead, rest) = sep.split_at(lead_len);
        let mark = rest.chars().next().filter(|c| matches!(c, '=' | ':'));
        let trail = if mark.is_some() { &rest[1..] } else { rest };

        let template_width = self.raw_key.chars().count();
        let key_width = raw_key.chars().count();
        let all_spaces = |run: &str| !run.is_empty() && run.bytes().all(|b| b == b' ');

        if all_spaces(lead) && lead.len() > 1 {
            let spaces = (template_width + lead.len()).saturating_sub(key_width).max(1);
            return format!("{}{}", " ".repeat(spaces), rest);
        }
        if let Some(mark) = mark {
            if lead.is_empty() && all_spaces(trail) && trail.len() > 1 {
                let spaces = (template_width + trail.len()).saturating_sub(key_width).max(1);
                return format!("{}{}", mark, " ".repeat(spaces));
            }
        }
        sep.to_string()
    }
}

/// Content of one line, without its terminator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineContent {
    Blank(String),
    Comment(String),
    Entry(Entry),
    Unparsed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    pub content: LineContent,
    /// `None` only for a final line without a terminator.
    pub ending: Option<LineEnding>,
}

impl Line {
    pub fn new(content: LineContent, ending: Option<LineEnding>) -> Self {
        Self { content, ending }
    }

    pub fn kind(&self) -> LineKind {
        match self.content {
            LineContent::Blank(_) => LineKind::Blank,
            LineContent::Comment(_) => LineKind::Comment,
            LineContent::Entry(_) => LineKind::Entry,
            LineContent::Unparsed(_) => LineKind::Unparsed,
        }
    }

    pub fn entry(&self) -> Option<&Entry> {
        match &self.content {
            LineContent::Entry(entry) => Some(entry),
            _ => None,
        }
    }

    pub fn entry_mut(&mut self) -> Option<&mut Entry> {
        match &mut self.content {
            LineContent::Entry(entry) => Some(entry),
            _ => None,
        }
    }

    /// Append the line text (terminator excluded) to `out`.
    pub fn render_into(&self, out: &mut String) {
        match &self.content {
            LineContent::Blank(text) | LineContent::Comment(text) | LineContent::Unparsed(text) => {
                out.push_str(text)
            }
            LineContent::Entry(entry) => entry.render_into(out),
        }
    }
}

/// Ordered arena of lines. Positions are plain indices; only insertion and
/// removal shift them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    lines: Vec<Line>,
    bom: bool,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_lines(lines: Vec<Line>, bom: bool) -> Self {
        Self { lines, bom }
    }

    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    pub fn line(&self, index: usize) -> Option<&Line> {
        self.lines.get(index)
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Whether the source started with a UTF-8 byte-order mark.
    pub fn has_bom(&self) -> bool {
        self.bom
    }

    pub fn entry(&self, index: usize) -> Option<&Entry> {
        self.lines.get(index).and_then(Line::entry)
    }

    pub fn entry_mut(&mut self, index: usize) -> Option<&mut Entry> {
        self.lines.get_mut(index).and_then(Line::entry_mut)
    }

    pub fn last_entry(&self) -> Option<&Entry> {
        self.lines.iter().rev().find_map(Line::entry)
    }

    pub fn line_ending_stats(&self) -> LineEndingStats {
        let mut stats = LineEndingStats::default();
        for ending in self.lines.iter().filter_map(|l| l.ending) {
            stats.record(ending);
        }
        stats
    }

    /// Terminator for new lines: the dominant style, or `fallback` when no line
    /// is terminated yet.
    pub fn newline(&self, fallback: LineEnding) -> LineEnding {
        self.line_ending_stats().dominant().unwrap_or(fallback)
    }

    /// Returns the index of the pushed line.
    pub fn push(&mut self, line: Line) -> usize {
        self.lines.push(line);
        self.lines.len() - 1
    }

    pub fn insert(&mut self, index: usize, line: Line) {
        self.lines.insert(index, line);
    }

    pub fn remove(&mut self, index: usize) -> Line {
        self.lines.remove(index)
    }

    /// Give the line at `index` a terminator if it has none.
    pub fn terminate(&mut self, index: usize, ending: LineEnding) {
        if let Some(line) = self.lines.get_mut(index) {
            line.ending.get_or_insert(ending);
        }
    }

    pub fn terminate_last(&mut self, ending: LineEnding) {
        if let Some(last) = self.lines.len().checked_sub(1) {
            self.terminate(last, ending);
        }
    }

    pub fn ends_with_comment(&self) -> bool {
        self.lines.last().is_some_and(|l| l.kind() == LineKind::Comment)
    }

    /// Whether a blank line separates a comment block from the entries that
    /// follow it somewhere in the document.
    pub fn separates_groups(&self) -> bool {
        self.lines.windows(3).any(|w| {
            w[0].kind() == LineKind::Comment
                && w[1].kind() == LineKind::Blank
                && w[2].kind() == LineKind::Entry
        })
    }
}
