use crate::document::{Document, Entry, Line, LineContent};
use crate::error::ConfigError;
use crate::escape;
use crate::line_ending::LineEnding;

const BOM: &[u8] = b"\xEF\xBB\xBF";

/// Parse raw file bytes into a document.
///
/// Every line keeps its own terminator; text after the last terminator
/// becomes a final unterminated line only when it is non-empty.
pub fn parse(bytes: &[u8]) -> Result<Document, ConfigError> {
    let (bom, body) = match bytes.strip_prefix(BOM) {
        Some(rest) => (true, rest),
        None => (false, bytes),
    };
    let text = std::str::from_utf8(body)
        .map_err(|e| ConfigError::Encoding(format!("config is not valid UTF-8: {}", e)))?;

    let raw = text.as_bytes();
    let mut lines = Vec::new();
    let mut start = 0;
    let mut i = 0;
    while i < raw.len() {
        match LineEnding::detect(&raw[i..]) {
            Some(ending) => {
                lines.push(Line::new(parse_line(&text[start..i]), Some(ending)));
                i += ending.byte_len();
                start = i;
            }
            None => i += 1,
        }
    }
    if start < raw.len() {
        lines.push(Line::new(parse_line(&text[start..]), None));
    }

    Ok(Document::from_lines(lines, bom))
}

/// Classify a single line (terminator already removed).
pub fn parse_line(line: &str) -> LineContent {
    let body = line.trim_start_matches(is_blank);
    if body.is_empty() {
        return LineContent::Blank(line.to_string());
    }
    if body.starts_with('#') {
        return LineContent::Comment(line.to_string());
    }

    let prefix = &line[..line.len() - body.len()];
    let key_end = key_end(body);
    let raw_key = &body[..key_end];
    let key = escape::decode(raw_key);
    if key.trim().is_empty() {
        return LineContent::Unparsed(line.to_string());
    }

    let rest = &body[key_end..];
    let after_lead = rest.trim_start_matches(is_blank);
    let after_mark = after_lead.strip_prefix(['=', ':']).unwrap_or(after_lead);
    let after_sep = after_mark.trim_start_matches(is_blank);
    let sep_len = rest.len() - after_sep.len();

    let value_end = match inline_comment(rest, sep_len) {
        Some(hash) => {
            let before = &rest[sep_len..hash];
            sep_len + before.trim_end_matches(is_blank).len()
        }
        None => rest.len(),
    };

    let raw_value = &rest[sep_len..value_end];
    LineContent::Entry(Entry {
        prefix: prefix.to_string(),
        raw_key: raw_key.to_string(),
        key: key.trim().to_string(),
        separator: rest[..sep_len].to_string(),
        raw_value: raw_value.to_string(),
        value: escape::decode(raw_value),
        suffix: rest[value_end..].to_string(),
    })
}

fn is_blank(c: char) -> bool {
    c == ' ' || c == '\t'
}

/// Byte offset where the key token ends: the first unescaped blank, `=` or `:`.
fn key_end(body: &str) -> usize {
    let mut escaped = false;
    for (i, c) in body.char_indices() {
        if escaped {
            escaped = false;
        } else if c == '\\' {
            escaped = true;
        } else if is_blank(c) || c == '=' || c == ':' {
            return i;
        }
    }
    body.len()
}

/// Offset in `rest` of an inline comment: an unescaped `#` right after a blank.
fn inline_comment(rest: &str, value_start: usize) -> Option<usize> {
    let bytes = rest.as_bytes();
    let mut escaped = false;
    for (offset, c) in rest[value_start..].char_indices() {
        let i = value_start + offset;
        if escaped {
            escaped = false;
        } else if c == '\\' {
            escaped = true;
        } else if c == '#' && i > 0 && matches!(bytes[i - 1], b' ' | b'\t') {
            return Some(i);
        }
    }
    None
}
