//! Tests for the argument error type.

use std::error::Error;
use std::io;

use rstest::rstest;

use crate::{ArgumentError, ArgumentErrorKind};

#[rstest]
#[case::missing(ArgumentError::missing("-o", "Missing argument"), ArgumentErrorKind::Missing)]
#[case::format(ArgumentError::invalid_format("-o", "bad"), ArgumentErrorKind::InvalidFormat)]
#[case::value(ArgumentError::invalid_value("-o", "bad"), ArgumentErrorKind::InvalidValue)]
#[case::unrecognized(ArgumentError::unrecognized("-o"), ArgumentErrorKind::Unrecognized)]
#[case::resolution(ArgumentError::resolution("-o", "gone"), ArgumentErrorKind::Resolution)]
fn constructors_set_kind(#[case] error: ArgumentError, #[case] kind: ArgumentErrorKind) {
    assert_eq!(error.kind(), kind);
    assert_eq!(error.parameter(), "-o");
}

#[test]
fn display_includes_parameter_and_message() {
    let error = ArgumentError::missing("-o", "Missing argument");
    assert_eq!(error.to_string(), "missing argument: -o: Missing argument");
}

#[test]
fn display_without_message() {
    let error = ArgumentError::new(ArgumentErrorKind::Unrecognized, "--bogus");
    assert_eq!(error.to_string(), "unrecognized argument: --bogus");
}

#[test]
fn interpretation_preserves_cause() {
    let cause = io::Error::other("disk on fire");
    let error = ArgumentError::interpretation("token", Box::new(cause));
    assert_eq!(error.kind(), ArgumentErrorKind::Interpretation);
    let source = error.source().expect("cause is kept");
    assert_eq!(source.to_string(), "disk on fire");
}

#[test]
fn errors_without_a_cause_have_no_source() {
    let error = ArgumentError::invalid_value("-o", "bad");
    assert!(error.source().is_none());
    assert_eq!(error.to_string(), "invalid argument value: -o: bad");
}

#[test]
fn suppressed_errors_accumulate() {
    let mut error = ArgumentError::unrecognized("x")
        .with_suppressed(ArgumentError::resolution("@a", "Failed to delete command file"));
    error.add_suppressed(ArgumentError::resolution("@b", "Failed to delete command file"));
    let suppressed: Vec<&str> = error.suppressed().iter().map(ArgumentError::parameter).collect();
    assert_eq!(suppressed, vec!["@a", "@b"]);
}
