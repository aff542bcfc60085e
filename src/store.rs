use std::collections::{HashMap, HashSet};

use crate::document::{Document, Entry, Line, LineContent};
use crate::error::ConfigError;
use crate::line_ending::LineEnding;
use crate::options::Options;
use crate::parser;
use crate::serializer;
use crate::traits::ConfigSource;

/// Trim a caller-supplied key, rejecting keys that are empty afterwards.
pub(crate) fn normalize_key(key: &str) -> Result<&str, ConfigError> {
    let key = key.trim();
    if key.is_empty() {
        return Err(ConfigError::EmptyKey);
    }
    Ok(key)
}

/// Store couples a document with an index from key to the positions of its
/// entry lines, in file order.
///
/// Writes go to the last occurrence of a key; earlier duplicates stay in place
/// until the key is deleted or rewritten with `set_all`.
#[derive(Debug, Clone)]
pub struct Store {
    document: Document,
    index: HashMap<String, Vec<usize>>,
    options: Options,
}

impl Store {
    /// Create an empty store.
    pub fn new(options: Options) -> Self {
        Self::from_document(Document::new(), options)
    }

    /// Parse file bytes into a store.
    pub fn parse(bytes: &[u8], options: Options) -> Result<Self, ConfigError> {
        Ok(Self::from_document(parser::parse(bytes)?, options))
    }

    pub fn from_document(document: Document, options: Options) -> Self {
        let mut store = Self {
            document,
            index: HashMap::new(),
            options: options.validated(),
        };
        store.reindex();
        store
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Render the document to file bytes.
    pub fn to_bytes(&self) -> Vec<u8> {
        serializer::render(&self.document)
    }

    /// Set `key` to a single value: the last occurrence is rewritten in place,
    /// or a new entry is appended when the key is absent.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let key = normalize_key(key)?;
        match self.last_position(key) {
            Some(pos) => {
                if let Some(entry) = self.document.entry_mut(pos) {
                    entry.set_value(value, &self.options.separator);
                }
            }
            None => self.append(key, value),
        }
        Ok(())
    }

    /// Make `values` the exact list of values of `key`.
    ///
    /// Existing occurrences are rewritten in file order, extra values are
    /// inserted right after the last occurrence and surplus occurrences are
    /// removed. An empty list removes the key.
    pub fn set_all<I, S>(&mut self, key: &str, values: I) -> Result<(), ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let key = normalize_key(key)?;
        let values: Vec<S> = values.into_iter().collect();
        let positions = self.index.get(key).cloned().unwrap_or_default();

        let Some(&anchor) = positions.last() else {
            for value in &values {
                self.append(key, value.as_ref());
            }
            return Ok(());
        };

        for (&pos, value) in positions.iter().zip(&values) {
            if let Some(entry) = self.document.entry_mut(pos) {
                entry.set_value(value.as_ref(), &self.options.separator);
            }
        }

        if values.len() > positions.len() {
            let ending = self.newline();
            self.document.terminate(anchor, ending);
            if let Some(template) = self.document.entry(anchor).cloned() {
                let separator = &self.options.separator;
                for (offset, value) in values[positions.len()..].iter().enumerate() {
                    let entry = template.with_value(value.as_ref(), separator);
                    let line = Line::new(LineContent::Entry(entry), Some(ending));
                    self.document.insert(anchor + 1 + offset, line);
                }
            }
        } else {
            for &pos in positions[values.len()..].iter().rev() {
                self.document.remove(pos);
            }
        }

        self.reindex();
        Ok(())
    }

    /// Remove every line holding `key`. Returns the number of lines removed.
    pub fn remove(&mut self, key: &str) -> Result<usize, ConfigError> {
        let key = normalize_key(key)?;
        let Some(positions) = self.index.remove(key) else {
            return Ok(0);
        };
        for &pos in positions.iter().rev() {
            self.document.remove(pos);
        }
        self.reindex();
        Ok(positions.len())
    }

    fn last_position(&self, key: &str) -> Option<usize> {
        self.index.get(key).and_then(|p| p.last()).copied()
    }

    fn newline(&self) -> LineEnding {
        self.document.newline(self.options.line_ending)
    }

    /// Append a new entry at the end of the document, formatted like the last
    /// existing entry.
    fn append(&mut self, key: &str, value: &str) {
        let ending = self.newline();
        self.document.terminate_last(ending);
        if self.document.ends_with_comment() && self.document.separates_groups() {
            self.document.push(Line::new(LineContent::Blank(String::new()), Some(ending)));
        }

        let template = self.document.last_entry();
        let entry = Entry::following(template, key, value, &self.options.separator);
        let pos = self.document.push(Line::new(LineContent::Entry(entry), Some(ending)));
        self.index.entry(key.to_string()).or_default().push(pos);
    }

    fn reindex(&mut self) {
        self.index.clear();
        for (pos, line) in self.document.lines().iter().enumerate() {
            if let Some(entry) = line.entry() {
                self.index.entry(entry.key.clone()).or_default().push(pos);
            }
        }
    }
}

impl ConfigSource for Store {
    fn last(&self, key: &str) -> Option<&str> {
        let pos = self.last_position(key.trim())?;
        self.document.entry(pos).map(|e| e.value.as_str())
    }

    fn values(&self, key: &str) -> Values<'_> {
        let positions = self.index.get(key.trim()).map(Vec::as_slice).unwrap_or(&[]);
        Values::new(&self.document, positions)
    }

    fn keys(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.document
            .lines()
            .iter()
            .filter_map(|l| l.entry())
            .map(|e| e.key.as_str())
            .filter(|k| seen.insert(*k))
            .collect()
    }
}

/// Lazy iterator over the values of one key. Clone it to iterate again.
#[derive(Debug, Clone)]
pub struct Values<'a> {
    document: &'a Document,
    positions: std::slice::Iter<'a, usize>,
}

impl<'a> Values<'a> {
    fn new(document: &'a Document, positions: &'a [usize]) -> Self {
        Self {
            document,
            positions: positions.iter(),
        }
    }
}

impl<'a> Iterator for Values<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        let document = self.document;
        self.positions
            .by_ref()
            .find_map(|&pos| document.entry(pos))
            .map(|e| e.value.as_str())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.positions.len()))
    }
}
