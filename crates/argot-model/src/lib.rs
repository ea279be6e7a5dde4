//! Declarative command models for argot.
//!
//! A command-line interface is described as data: a [`Schema`] holding a tree
//! of [`CommandDecl`] values with their parameters, parameter groups,
//! sub-commands, common converters and lifecycle hooks. Behaviour that needs
//! code (custom converters and hooks) is attached through [`Bindings`], keyed
//! by `(scope, method)`.
//!
//! [`resolve`] validates a schema against its bindings and produces an
//! immutable [`CommandModel`]. The model is built once and can be shared
//! across threads; every structural defect is reported as a [`ModelError`]
//! before any parsing happens.
//!
//! # Example
//!
//! ```
//! use argot_model::{Bindings, CommandDecl, ParameterDecl, Schema, TypeRef, resolve};
//!
//! let schema = Schema::new(
//!     CommandDecl::new("Main")
//!         .parameter(ParameterDecl::new("name", TypeRef::String).positional(0).required()),
//! );
//! let model = resolve(&schema, &Bindings::new())?;
//! assert_eq!(model.usage(model.root()), "name [@command-file]");
//! # Ok::<(), argot_model::ModelError>(())
//! ```

mod bindings;
pub mod decl;
mod error;
mod hooks;
mod model;
mod resolve;
mod substitution;
mod usage;

pub use bindings::{Bindings, ConversionFailure, ConverterBinding, ConverterFn, HookFn};
pub use decl::{
    CommandDecl, CommonConverterDecl, ConverterRef, ConverterSetDecl, EnumDecl, FlagDecl,
    GroupDecl, HookDecl, HookPhase, MapFormatDecl, ParameterDecl, ParserSettings, Schema,
    SubCommandDecl, SubstitutionDecl, TypeDecl, TypeRef,
};
pub use error::ModelError;
pub use model::{
    Command, CommandHooks, CommandId, CommandModel, Converter, Parameter, ResolvedHook,
    SubCommand,
};
pub use resolve::resolve;

#[cfg(test)]
mod tests;
