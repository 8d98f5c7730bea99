//! Dotenv rendering: key normalization, value quoting and file assembly.
//!
//! Everything here is pure. [`render`] turns a [`ConfigMapping`] into a
//! [`RenderedEnv`] whose body is a list of `KEY=VALUE` lines; the writer adds
//! the final newline.

use std::collections::HashMap;

use crate::value::ConfigMapping;

/// Maps an arbitrary config key to a dotenv identifier.
///
/// The result is uppercase and contains only `[A-Z0-9_]`. Any run of other
/// characters (underscores included) collapses to a single `_`, and leading
/// or trailing underscores are stripped. An empty result means the entry
/// has no usable name and must be skipped.
///
/// # Examples
///
/// ```rust
/// use genv::normalize_key;
///
/// assert_eq!(normalize_key("  my-key!! "), "MY_KEY");
/// assert_eq!(normalize_key("api.baseUrl"), "API_BASEURL");
/// assert_eq!(normalize_key("???"), "");
/// ```
pub fn normalize_key(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut pending_sep = false;
    for c in raw.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_sep && !out.is_empty() {
                out.push('_');
            }
            pending_sep = false;
            out.push(c.to_ascii_uppercase());
        } else {
            pending_sep = true;
        }
    }
    out
}

/// Returns `true` if a value must be double-quoted to survive a dotenv parser.
fn needs_quoting(value: &str) -> bool {
    value
        .chars()
        .any(|c| c.is_whitespace() || matches!(c, '#' | '\'' | '"' | '\\'))
}

/// Quotes and escapes a stringified value for the right-hand side of `KEY=`.
///
/// Empty strings become `""`. Values containing whitespace, `#`, quotes or a
/// backslash are wrapped in double quotes with `\`, CR, LF and `"` escaped.
/// Anything else passes through verbatim.
///
/// # Examples
///
/// ```rust
/// use genv::escape_value;
///
/// assert_eq!(escape_value(""), r#""""#);
/// assert_eq!(escape_value("plain"), "plain");
/// assert_eq!(escape_value("abc 123"), r#""abc 123""#);
/// assert_eq!(escape_value("a\nb"), r#""a\nb""#);
/// ```
pub fn escape_value(value: &str) -> String {
    if value.is_empty() {
        return "\"\"".to_string();
    }
    if !needs_quoting(value) {
        return value.to_string();
    }
    let mut result = String::with_capacity(value.len() + 2);
    result.push('"');
    for c in value.chars() {
        match c {
            '\\' => result.push_str("\\\\"),
            '\r' => result.push_str("\\r"),
            '\n' => result.push_str("\\n"),
            '"' => result.push_str("\\\""),
            _ => result.push(c),
        }
    }
    result.push('"');
    result
}

/// Reverses [`escape_value`].
///
/// Quoted input is unwrapped and its `\\`, `\r`, `\n` and `\"` sequences
/// decoded; unknown escapes are kept as written. Unquoted input is returned
/// unchanged.
pub fn unescape_value(escaped: &str) -> String {
    let Some(inner) = escaped
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
    else {
        return escaped.to_string();
    };
    let mut result = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            result.push(c);
            continue;
        }
        match chars.next() {
            Some('\\') => result.push('\\'),
            Some('r') => result.push('\r'),
            Some('n') => result.push('\n'),
            Some('"') => result.push('"'),
            Some(other) => {
                result.push('\\');
                result.push(other);
            }
            None => result.push('\\'),
        }
    }
    result
}

/// Two raw keys that normalized to the same identifier.
///
/// The later entry's value replaces the earlier one; the line stays where
/// the first entry put it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyCollision {
    /// The shared normalized identifier.
    pub key: String,
    /// Raw key whose value was replaced.
    pub replaced: String,
    /// Raw key whose value won.
    pub winner: String,
}

/// A rendered dotenv body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedEnv {
    body: String,
    collisions: Vec<KeyCollision>,
    skipped: Vec<String>,
}

impl RenderedEnv {
    /// The `KEY=VALUE` lines joined by `\n`, without a trailing newline.
    pub fn body(&self) -> &str {
        &self.body
    }

    /// The full file content: the body plus exactly one trailing newline.
    /// An empty body stays empty.
    pub fn file_contents(&self) -> String {
        if self.body.is_empty() {
            String::new()
        } else {
            format!("{}\n", self.body)
        }
    }

    /// Normalized-key collisions, in the order they were met.
    pub fn collisions(&self) -> &[KeyCollision] {
        &self.collisions
    }

    /// Raw keys dropped because they normalize to an empty identifier.
    pub fn skipped_keys(&self) -> &[String] {
        &self.skipped
    }

    /// Number of `KEY=VALUE` lines.
    pub fn line_count(&self) -> usize {
        if self.body.is_empty() {
            0
        } else {
            self.body.lines().count()
        }
    }
}

/// Renders a mapping as dotenv lines in insertion order.
///
/// # Examples
///
/// ```rust
/// use genv::{render, ConfigMapping};
///
/// let mut vars = ConfigMapping::new();
/// vars.insert("API KEY", "abc 123");
/// vars.insert("count", 2);
/// assert_eq!(render(&vars).body(), "API_KEY=\"abc 123\"\nCOUNT=2");
/// ```
pub fn render(mapping: &ConfigMapping) -> RenderedEnv {
    let mut lines: Vec<(String, String, String)> = Vec::with_capacity(mapping.len());
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut collisions = Vec::new();
    let mut skipped = Vec::new();

    for (raw_key, value) in mapping.iter() {
        let key = normalize_key(raw_key);
        if key.is_empty() {
            skipped.push(raw_key.to_string());
            continue;
        }
        let escaped = escape_value(&value.to_env_string());
        if let Some(&pos) = index.get(&key) {
            let line = &mut lines[pos];
            collisions.push(KeyCollision {
                key: key.clone(),
                replaced: std::mem::replace(&mut line.1, raw_key.to_string()),
                winner: raw_key.to_string(),
            });
            line.2 = escaped;
        } else {
            index.insert(key.clone(), lines.len());
            lines.push((key, raw_key.to_string(), escaped));
        }
    }

    let body = lines
        .iter()
        .map(|(key, _, value)| format!("{}={}", key, value))
        .collect::<Vec<_>>()
        .join("\n");

    RenderedEnv {
        body,
        collisions,
        skipped,
    }
}
