//! Tests for map-parameter key/value splitting and formatting.

use rstest::rstest;

use crate::keyvalue::{format_key_value, split_entry, split_key_value};

#[rstest]
#[case::key_and_value("a=b", "a", Some("b"))]
#[case::empty_value("a=", "a", Some(""))]
#[case::empty_key("=b", "", Some("b"))]
#[case::both_empty("=", "", Some(""))]
#[case::key_only("a", "a", None)]
#[case::nothing("", "", None)]
#[case::quoted_key("\"a\"=b", "\"a\"", Some("b"))]
#[case::quoted_value("a=\"b\"", "a", Some("\"b\""))]
#[case::escaped_equals_only("\\=", "=", None)]
#[case::leading_separator_then_equals("==", "", Some("="))]
#[case::escaped_key_empty_value("\\==", "=", Some(""))]
#[case::two_escapes("\\=\\=", "==", None)]
#[case::two_escapes_then_value("\\=\\===", "==", Some("="))]
#[case::value_kept_verbatim("\\=\\===\\=", "==", Some("=\\="))]
fn splits_entries(#[case] entry: &str, #[case] key: &str, #[case] value: Option<&str>) {
    let parsed = split_entry(entry);
    assert_eq!(parsed.key, key);
    assert_eq!(parsed.value.as_deref(), value);
}

#[test]
fn bare_prefix_is_empty_key_without_value() {
    let parsed = split_key_value("-D", "-D").expect("prefix matches");
    assert_eq!(parsed.key, "");
    assert_eq!(parsed.value, None);
}

#[test]
fn mismatched_prefix_is_rejected() {
    assert_eq!(split_key_value("-D", "-Xfoo=bar"), None);
}

#[test]
fn formatting_escapes_equals_in_key() {
    assert_eq!(format_key_value("-K", "a=b", Some("value")), "-Ka\\=b=value");
    let parsed = split_key_value("-K", "-Ka\\=b=value").expect("prefix matches");
    assert_eq!(parsed.key, "a=b");
    assert_eq!(parsed.value.as_deref(), Some("value"));
}

#[test]
fn formatting_omits_separator_without_value() {
    assert_eq!(format_key_value("-K", "key", None), "-Kkey");
}

#[rstest]
#[case::plain("-D", "name", Some("value"))]
#[case::no_value("-D", "name", None)]
#[case::empty_key("--define:", "", Some("x=y"))]
#[case::empty_everything("-P", "", None)]
#[case::unicode("-Ü", "schlüssel", Some("wert=1"))]
fn formatted_entries_split_back(
    #[case] prefix: &str,
    #[case] key: &str,
    #[case] value: Option<&str>,
) {
    let formatted = format_key_value(prefix, key, value);
    let parsed = split_key_value(prefix, &formatted).expect("prefix matches");
    assert_eq!(parsed.key, key);
    assert_eq!(parsed.value.as_deref(), value);
}

#[rstest]
#[case::escaped_key("\\=\\===\\=")]
#[case::leading_equals("==")]
#[case::quoted("\"a\"=\"b\"")]
fn reformatting_is_stable(#[case] entry: &str) {
    let parsed = split_entry(entry);
    let reformatted = format_key_value("-K", &parsed.key, parsed.value.as_deref());
    let reparsed = split_key_value("-K", &reformatted).expect("prefix matches");
    assert_eq!(reparsed, parsed);
}

#[test]
fn trailing_backslash_in_key_swallows_the_separator() {
    let formatted = format_key_value("-D", "a\\", Some("v"));
    assert_eq!(formatted, "-Da\\=v");
    let parsed = split_key_value("-D", &formatted).expect("prefix matches");
    assert_eq!(parsed.key, "a=v");
    assert_eq!(parsed.value, None);
}
