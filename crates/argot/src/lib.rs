//! argot: declarative command-line parsing.
//!
//! This facade crate re-exports the declaration and model types from
//! [`argot_model`] and the runtime pieces from [`argot_runtime`], and adds
//! the parts that run against a resolved model:
//!
//! - [`Parser`] consumes tokens level by level and yields an [`Outcome`]
//! - [`RequiredSet`] tracks required parameters per command level
//! - [`Invocation`] holds the populated records and fires lifecycle hooks
//!
//! # Example
//!
//! ```
//! use argot::{
//!     Bindings, CommandDecl, Outcome, ParameterDecl, Parser, Schema, TypeRef, resolve,
//! };
//!
//! let root = CommandDecl::new("Main")
//!     .parameter(ParameterDecl::new("verbose", TypeRef::Bool).name("-v").flag())
//!     .parameter(ParameterDecl::new("name", TypeRef::String).positional(-1).required());
//! let model = resolve(&Schema::new(root), &Bindings::new())?;
//! let Outcome::Run(invocation) = Parser::new(&model).parse(["-v", "bob"])? else {
//!     unreachable!("no help commands are declared");
//! };
//! let name = invocation.record().and_then(|record| record.get(&["name"]));
//! assert_eq!(name.and_then(|value| value.as_str()), Some("bob"));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod invocation;
mod parser;
mod required;

pub use argot_model::{
    Bindings, Command, CommandDecl, CommandId, CommandModel, CommonConverterDecl,
    ConversionFailure, Converter, ConverterRef, ConverterSetDecl, EnumDecl, GroupDecl, HookPhase,
    ModelError, Parameter, ParameterDecl, ParserSettings, Schema, SubCommand, TypeDecl, TypeRef,
    resolve,
};
pub use argot_runtime::{ArgumentError, ArgumentErrorKind, BoxError, Record, TokenSource, Value};

pub use invocation::{DispatchError, Invocation, Level};
pub use parser::{HelpRequest, Outcome, Parser};
pub use required::RequiredSet;

#[cfg(test)]
mod tests;
