//! Backslash escaping for keys and values.
//!
//! ```text
//! \\  backslash        \0  NUL          \b  backspace
//! \t  tab              \n  line feed    \r  carriage return
//! \_  space            \#  '#'          \=  '='
//! \:  ':'              \uXXXX  any BMP code point
//! ```
//!
//! Unknown escapes decode to themselves (backslash included) so hand-edited
//! files never lose text.

/// Decode escapes in raw key or value text.
pub fn decode(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        let Some(next) = chars.next() else {
            out.push('\\');
            break;
        };
        match next {
            '\\' => out.push('\\'),
            '0' => out.push('\0'),
            'b' => out.push('\u{8}'),
            't' => out.push('\t'),
            'n' => out.push('\n'),
            'r' => out.push('\r'),
            '_' => out.push(' '),
            '#' | '=' | ':' => out.push(next),
            'u' => {
                let hex: String = chars.clone().take(4).collect();
                let valid = hex.len() == 4 && hex.chars().all(|h| h.is_ascii_hexdigit());
                match u32::from_str_radix(&hex, 16).ok().and_then(char::from_u32) {
                    Some(decoded) if valid => {
                        out.push(decoded);
                        chars.nth(3);
                    }
                    _ => {
                        out.push('\\');
                        out.push('u');
                    }
                }
            }
            other => {
                out.push('\\');
                out.push(other);
            }
        }
    }
    out
}

/// Encode a value so that parsing the written line yields `value` again.
pub fn encode_value(value: &str) -> String {
    encode(value, false)
}

/// Encode a key. Whitespace, `=` and `:` would end the key token, so they are
/// escaped as well.
pub fn encode_key(key: &str) -> String {
    encode(key, true)
}

fn encode(text: &str, is_key: bool) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    let first_solid = text.find(|c| c != ' ').unwrap_or(text.len());
    let last_solid = text.rfind(|c| c != ' ').map_or(0, |i| i + 1);

    for (i, c) in text.char_indices() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\0' => out.push_str("\\0"),
            '\u{8}' => out.push_str("\\b"),
            '\t' => out.push_str("\\t"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '#' => out.push_str("\\#"),
            ' ' if is_key || i < first_solid || i >= last_solid => out.push_str("\\_"),
            '=' | ':' if is_key || i == 0 => {
                out.push('\\');
                out.push(c);
            }
            c if c.is_control() => out.push_str(&format!("\\u{:04X}", c as u32)),
            c => out.push(c),
        }
    }
    out
}
