//! Converters every schema may reference without registering code.

use argot::{ArgumentError, Bindings, ConversionFailure, TokenSource, Value};

/// Scope under which the stock converters are bound.
pub const STOCK_SCOPE: &str = "argot";

/// Returns the stock converter bindings.
///
/// - `presence` consumes nothing and yields `true`.
/// - `path` consumes one token and rejects an empty path.
#[must_use]
pub fn stock_bindings() -> Bindings {
    Bindings::new()
        .converter(STOCK_SCOPE, "presence", |_token, _tokens| {
            Ok(Value::Bool(true))
        })
        .converter_with_format(STOCK_SCOPE, "path", "<path>", convert_path)
}

fn convert_path(token: &str, tokens: &mut dyn TokenSource) -> Result<Value, ConversionFailure> {
    let path = tokens.require_next(token)?;
    if path.is_empty() {
        return Err(ArgumentError::invalid_value(token, "path must not be empty").into());
    }
    Ok(Value::Str(path))
}
