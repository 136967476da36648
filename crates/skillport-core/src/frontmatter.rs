//! Minimal frontmatter extractor for `SKILL.md`.
//!
//! A SKILL.md file opens with a metadata block delimited by `---` lines:
//!
//! ```text
//! ---
//! name: db-helper
//! description: Query and migrate PostgreSQL databases.
//! allowed-tools:
//!   - Read
//!   - Bash
//! ---
//!
//! # DB Helper
//! ...
//! ```
//!
//! The grammar is deliberately tiny and is not YAML: a line with a colon
//! starts a key (text before the first colon) whose value is the trimmed text
//! after it. An empty value turns the key into a list, and following `- item`
//! lines are appended until the next key line. No quoting, escaping, nesting,
//! or multi-line scalars. The validator relies on exactly this grammar.

use serde::{Serialize, Serializer};

/// The block delimiter. Must sit alone on its line.
pub const DELIMITER: &str = "---";

/// A frontmatter value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Scalar(String),
    List(Vec<String>),
}

impl FieldValue {
    pub fn as_scalar(&self) -> Option<&str> {
        match self {
            Self::Scalar(s) => Some(s),
            Self::List(_) => None,
        }
    }
}

/// Key/value pairs of a metadata block in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Frontmatter {
    fields: Vec<(String, FieldValue)>,
}

impl Serialize for Frontmatter {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.fields.iter().map(|(k, v)| (k, v)))
    }
}

impl Frontmatter {
    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.fields.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Scalar value of `key`, if present and not a list.
    pub fn scalar(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(FieldValue::as_scalar)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Later duplicates of a key replace the earlier value in place.
    fn set(&mut self, key: String, value: FieldValue) {
        if let Some(slot) = self.fields.iter_mut().find(|(k, _)| *k == key) {
            slot.1 = value;
        } else {
            self.fields.push((key, value));
        }
    }

    fn push_item(&mut self, key: &str, item: String) {
        if let Some((_, FieldValue::List(items))) = self.fields.iter_mut().find(|(k, _)| k == key)
        {
            items.push(item);
        }
    }
}

/// Split a document into its metadata block and the body that follows.
///
/// The opening delimiter must be the first line of the document. Returns
/// `None` when there is no block or it is never closed.
pub fn split(content: &str) -> Option<(&str, &str)> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let rest = strip_delimiter_line(content)?;

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end_matches(['\r', '\n']) == DELIMITER {
            let block = &rest[..offset];
            let body = &rest[offset + line.len()..];
            return Some((block, body));
        }
        offset += line.len();
    }
    None
}

/// Whether `content` opens with a closed metadata block.
pub fn has_block(content: &str) -> bool {
    split(content).is_some()
}

/// Extract the metadata block of `content`.
///
/// Returns an empty map when there is no block; callers decide whether that
/// is fatal.
pub fn extract(content: &str) -> Frontmatter {
    split(content)
        .map(|(block, _)| parse_block(block))
        .unwrap_or_default()
}

/// The document body after the metadata block, or the whole document when
/// there is none.
pub fn body(content: &str) -> &str {
    split(content).map_or(content, |(_, body)| body)
}

fn strip_delimiter_line(content: &str) -> Option<&str> {
    let rest = content.strip_prefix(DELIMITER)?;
    if rest.is_empty() {
        return Some(rest);
    }
    rest.strip_prefix("\r\n").or_else(|| rest.strip_prefix('\n'))
}

// ---------------------------------------------------------------------------
// Line state machine
// ---------------------------------------------------------------------------

enum State {
    SeekingKey,
    InArray { key: String },
}

/// Parse the inside of a metadata block.
pub fn parse_block(block: &str) -> Frontmatter {
    let mut fields = Frontmatter::default();
    let mut state = State::SeekingKey;

    for line in block.lines() {
        let trimmed = line.trim();

        if let State::InArray { key } = &state
            && let Some(item) = trimmed.strip_prefix('-')
        {
            fields.push_item(key, item.trim().to_owned());
            continue;
        }

        let Some((key, value)) = trimmed.split_once(':') else {
            continue;
        };
        let key = key.trim().to_owned();
        let value = value.trim();

        if value.is_empty() {
            fields.set(key.clone(), FieldValue::List(Vec::new()));
            state = State::InArray { key };
        } else {
            fields.set(key, FieldValue::Scalar(value.to_owned()));
            state = State::SeekingKey;
        }
    }

    fields
}

/// Read a list-valued field that may have been written as bullets, as an
/// inline `[a, b]` scalar, or as a comma-separated scalar.
pub fn list_field(frontmatter: &Frontmatter, key: &str) -> Option<Vec<String>> {
    match frontmatter.get(key)? {
        FieldValue::List(items) => Some(items.iter().map(|s| unquote(s).to_owned()).collect()),
        FieldValue::Scalar(s) => {
            let inner = s.trim();
            let inner = inner
                .strip_prefix('[')
                .and_then(|s| s.strip_suffix(']'))
                .unwrap_or(inner);
            Some(
                inner
                    .split(',')
                    .map(|item| unquote(item.trim()).to_owned())
                    .filter(|item| !item.is_empty())
                    .collect(),
            )
        }
    }
}

/// Remove one pair of matching surrounding quotes.
pub fn unquote(s: &str) -> &str {
    let s = s.trim();
    for quote in ['"', '\''] {
        if s.len() >= 2 && s.starts_with(quote) && s.ends_with(quote) {
            return &s[1..s.len() - 1];
        }
    }
    s
}

/// Whether `value` spans more than one line and so cannot be a scalar.
pub fn is_multiline(value: &str) -> bool {
    value.contains(['\n', '\r'])
}

/// Collapse all whitespace runs (line breaks included) into single spaces.
pub fn single_line(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Render a metadata block (with delimiters) from ordered fields.
///
/// Multi-line values are folded onto one line; the grammar has no
/// multi-line scalars.
pub fn render(fields: &[(&str, FieldValue)]) -> String {
    let mut out = String::from(DELIMITER);
    out.push('\n');
    for (key, value) in fields {
        match value {
            FieldValue::Scalar(s) => {
                out.push_str(&format!("{key}: {}\n", single_line(s)));
            }
            FieldValue::List(items) => {
                out.push_str(&format!("{key}:\n"));
                for item in items {
                    out.push_str(&format!("  - {}\n", single_line(item)));
                }
            }
        }
    }
    out.push_str(DELIMITER);
    out.push('\n');
    out
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
