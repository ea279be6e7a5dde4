//! `key=value` splitting and formatting for map parameters.
//!
//! A map parameter with prefix `P` accepts the forms `P<key>=<value>`,
//! `P<key>` (no value), `P=<value>` (empty key) and a bare `P` (empty key, no
//! value). The separator is the first `=` that is not preceded by a
//! backslash; an `=` immediately after the prefix always separates. A literal
//! `=` inside the key is written `\=`. The value is taken verbatim.

use serde::Serialize;

/// A parsed map entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeyValue {
    /// The un-escaped key.
    pub key: String,
    /// The value, or `None` when the token carried no separator.
    pub value: Option<String>,
}

impl KeyValue {
    /// Creates an entry.
    #[must_use]
    pub fn new(key: impl Into<String>, value: Option<String>) -> Self {
        Self {
            key: key.into(),
            value,
        }
    }
}

/// Splits `argument` after `prefix`.
///
/// Returns `None` when `argument` does not start with `prefix`.
///
/// # Example
///
/// ```
/// use argot_runtime::keyvalue::split_key_value;
///
/// let entry = split_key_value("-D", "-Dfoo=bar").expect("prefix matches");
/// assert_eq!(entry.key, "foo");
/// assert_eq!(entry.value.as_deref(), Some("bar"));
/// ```
#[must_use]
pub fn split_key_value(prefix: &str, argument: &str) -> Option<KeyValue> {
    argument.strip_prefix(prefix).map(split_entry)
}

/// Splits the part of a map token that follows the prefix.
#[must_use]
pub fn split_entry(entry: &str) -> KeyValue {
    match first_unescaped_equals(entry).and_then(|index| entry.split_at_checked(index)) {
        Some((key, separated)) => KeyValue {
            key: unescape_key(key),
            value: separated.strip_prefix('=').map(str::to_owned),
        },
        None => KeyValue {
            key: unescape_key(entry),
            value: None,
        },
    }
}

/// Formats an entry so that [`split_key_value`] recovers it.
///
/// Every `=` in the key is escaped as `\=`. A `None` value omits the
/// separator.
///
/// Keys ending in `\` cannot be represented: the trailing backslash escapes
/// the separator, so `format_key_value("-D", "a\\", Some("v"))` yields
/// `-Da\=v`, which splits back to key `a=v` with no value.
#[must_use]
pub fn format_key_value(prefix: &str, key: &str, value: Option<&str>) -> String {
    let mut formatted = String::with_capacity(prefix.len() + key.len() + 1);
    formatted.push_str(prefix);
    formatted.push_str(&key.replace('=', "\\="));
    if let Some(text) = value {
        formatted.push('=');
        formatted.push_str(text);
    }
    formatted
}

fn first_unescaped_equals(entry: &str) -> Option<usize> {
    let mut previous = None;
    for (index, byte) in entry.bytes().enumerate() {
        if byte == b'=' && (index == 0 || previous != Some(b'\\')) {
            return Some(index);
        }
        previous = Some(byte);
    }
    None
}

fn unescape_key(key: &str) -> String {
    key.replace("\\=", "=")
}
