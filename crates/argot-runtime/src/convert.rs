//! Built-in value converters.
//!
//! Every built-in consumes exactly one token following the parameter name.
//! The `parameter` argument names the parameter being parsed and is reported
//! in any error.

use std::fmt;
use std::str::FromStr;

use crate::error::ArgumentError;
use crate::tokens::TokenSource;
use crate::value::Value;

/// The scalar kinds with a built-in converter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    /// `true` (any case) or `false` (exact).
    Bool,
    /// `i8`.
    Byte,
    /// `i16`.
    Short,
    /// `i32`.
    Int,
    /// `i64`.
    Long,
    /// `f32`.
    Float,
    /// `f64`.
    Double,
    /// Exactly one character.
    Char,
    /// The raw token.
    String,
}

impl ScalarKind {
    /// Consumes one token and converts it to a [`Value`] of this kind.
    ///
    /// # Errors
    ///
    /// Returns a missing-argument error when no token follows, or an
    /// invalid-format error when the token does not parse.
    pub fn parse(
        self,
        parameter: &str,
        tokens: &mut dyn TokenSource,
    ) -> Result<Value, ArgumentError> {
        Ok(match self {
            Self::Bool => Value::Bool(parse_bool(parameter, tokens)?),
            Self::Byte => Value::Byte(parse_byte(parameter, tokens)?),
            Self::Short => Value::Short(parse_short(parameter, tokens)?),
            Self::Int => Value::Int(parse_int(parameter, tokens)?),
            Self::Long => Value::Long(parse_long(parameter, tokens)?),
            Self::Float => Value::Float(parse_float(parameter, tokens)?),
            Self::Double => Value::Double(parse_double(parameter, tokens)?),
            Self::Char => Value::Char(parse_char(parameter, tokens)?),
            Self::String => Value::Str(parse_string(parameter, tokens)?),
        })
    }

    /// Returns the display-format hint for this kind, e.g. `<int>`.
    #[must_use]
    pub const fn format_hint(self) -> &'static str {
        match self {
            Self::Bool => "<boolean>",
            Self::Byte => "<byte>",
            Self::Short => "<short>",
            Self::Int => "<int>",
            Self::Long => "<long>",
            Self::Float => "<float>",
            Self::Double => "<double>",
            Self::Char => "<char>",
            Self::String => "<string>",
        }
    }
}

impl fmt::Display for ScalarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Bool => "boolean",
            Self::Byte => "byte",
            Self::Short => "short",
            Self::Int => "int",
            Self::Long => "long",
            Self::Float => "float",
            Self::Double => "double",
            Self::Char => "character",
            Self::String => "string",
        };
        f.write_str(name)
    }
}

fn parse_number<T>(
    parameter: &str,
    tokens: &mut dyn TokenSource,
    kind: ScalarKind,
) -> Result<T, ArgumentError>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let token = tokens.require_next(parameter)?;
    token.parse::<T>().map_err(|err| {
        ArgumentError::invalid_format(
            parameter,
            format!("Invalid input number for {kind}: {token}"),
        )
        .with_source(err)
    })
}

/// Parses an `i8`.
///
/// # Errors
///
/// Fails when no token follows or the token is not a valid `i8`.
pub fn parse_byte(parameter: &str, tokens: &mut dyn TokenSource) -> Result<i8, ArgumentError> {
    parse_number(parameter, tokens, ScalarKind::Byte)
}

/// Parses an `i16`.
///
/// # Errors
///
/// Fails when no token follows or the token is not a valid `i16`.
pub fn parse_short(parameter: &str, tokens: &mut dyn TokenSource) -> Result<i16, ArgumentError> {
    parse_number(parameter, tokens, ScalarKind::Short)
}

/// Parses an `i32`.
///
/// # Errors
///
/// Fails when no token follows or the token is not a valid `i32`.
pub fn parse_int(parameter: &str, tokens: &mut dyn TokenSource) -> Result<i32, ArgumentError> {
    parse_number(parameter, tokens, ScalarKind::Int)
}

/// Parses an `i64`.
///
/// # Errors
///
/// Fails when no token follows or the token is not a valid `i64`.
pub fn parse_long(parameter: &str, tokens: &mut dyn TokenSource) -> Result<i64, ArgumentError> {
    parse_number(parameter, tokens, ScalarKind::Long)
}

/// Parses an `f32`.
///
/// # Errors
///
/// Fails when no token follows or the token is not numeric.
pub fn parse_float(parameter: &str, tokens: &mut dyn TokenSource) -> Result<f32, ArgumentError> {
    parse_number(parameter, tokens, ScalarKind::Float)
}

/// Parses an `f64`.
///
/// # Errors
///
/// Fails when no token follows or the token is not numeric.
pub fn parse_double(parameter: &str, tokens: &mut dyn TokenSource) -> Result<f64, ArgumentError> {
    parse_number(parameter, tokens, ScalarKind::Double)
}

/// Parses a boolean: `true` in any case, or exactly `false`.
///
/// # Errors
///
/// Fails when no token follows or the token is neither form.
pub fn parse_bool(parameter: &str, tokens: &mut dyn TokenSource) -> Result<bool, ArgumentError> {
    let token = tokens.require_next(parameter)?;
    if token.eq_ignore_ascii_case("true") {
        return Ok(true);
    }
    if token == "false" {
        return Ok(false);
    }
    Err(ArgumentError::invalid_format(
        parameter,
        "Expected true or false for boolean argument.",
    ))
}

/// Parses a token consisting of exactly one character.
///
/// # Errors
///
/// Fails when no token follows or the token is not a single character.
pub fn parse_char(parameter: &str, tokens: &mut dyn TokenSource) -> Result<char, ArgumentError> {
    let token = tokens.require_next(parameter)?;
    let mut chars = token.chars();
    match (chars.next(), chars.next()) {
        (Some(only), None) => Ok(only),
        _ => Err(ArgumentError::invalid_format(
            parameter,
            format!("Invalid input value for character: {token}"),
        )),
    }
}

/// Returns the next token unchanged.
///
/// # Errors
///
/// Fails when no token follows.
pub fn parse_string(parameter: &str, tokens: &mut dyn TokenSource) -> Result<String, ArgumentError> {
    tokens.require_next(parameter)
}

/// Reports whether every constant is already upper-case, which enables
/// case-insensitive lookup.
#[must_use]
pub fn is_upper_case_enum<S: AsRef<str>>(constants: &[S]) -> bool {
    constants.iter().all(|constant| {
        let name = constant.as_ref();
        name == name.to_ascii_uppercase()
    })
}

/// Parses the name of an enum constant.
///
/// With `case_insensitive` set, the token is upper-cased (ASCII) before the
/// lookup; otherwise it must match a constant exactly.
///
/// # Errors
///
/// Fails when no token follows, or with an invalid-value error listing the
/// accepted constants when the token matches none of them.
pub fn parse_enum<S: AsRef<str>>(
    parameter: &str,
    tokens: &mut dyn TokenSource,
    type_name: &str,
    constants: &[S],
    case_insensitive: bool,
) -> Result<String, ArgumentError> {
    let token = tokens.require_next(parameter)?;
    let wanted = if case_insensitive {
        token.to_ascii_uppercase()
    } else {
        token.clone()
    };
    if let Some(constant) = constants.iter().find(|constant| constant.as_ref() == wanted) {
        return Ok(constant.as_ref().to_owned());
    }
    let expected = constants
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<&str>>()
        .join(", ");
    let qualifier = if case_insensitive {
        " (case-insensitive)"
    } else {
        ""
    };
    Err(ArgumentError::invalid_value(
        parameter,
        format!(
            "Unrecognized enum value: {token} for type: {type_name} Expected any of{qualifier}: {expected}"
        ),
    ))
}
