//! Runtime support for argot command-line parsers.
//!
//! This crate holds the pieces a parser needs while it is consuming tokens:
//!
//! - [`TokenSource`] and its two implementations, [`PlainTokens`] and
//!   [`CommandFileTokens`] (which splices `@file` references into the stream)
//! - the built-in scalar and enum converters in [`convert`]
//! - `key=value` splitting and formatting for map parameters in [`keyvalue`]
//! - [`Value`] and [`Record`], the dynamic result objects populated by a parse
//! - [`ArgumentError`], the parse-time error taxonomy
//!
//! # Example
//!
//! ```
//! use argot_runtime::{TokenSource, convert, tokens};
//!
//! let mut source = tokens::plain(vec!["-n".to_owned(), "42".to_owned()]);
//! let name = source.next_token()?.unwrap_or_default();
//! let count = convert::parse_int(&name, &mut source)?;
//! assert_eq!(count, 42);
//! # Ok::<(), argot_runtime::ArgumentError>(())
//! ```

pub mod convert;
mod error;
pub mod keyvalue;
mod record;
pub mod tokens;
mod value;

pub use convert::ScalarKind;
pub use error::{ArgumentError, ArgumentErrorKind, BoxError};
pub use keyvalue::KeyValue;
pub use record::{Field, Record};
pub use tokens::{CommandFileTokens, PlainTokens, TokenSource};
pub use value::{CustomData, CustomValue, Value};

#[cfg(test)]
mod tests;
