//! Code attached to declarations.
//!
//! Declarations refer to converters and hooks by `(scope, method)` pairs.
//! [`Bindings`] maps those pairs to callables. Hooks are registered under the
//! type name of the command that declares them.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use argot_runtime::{ArgumentError, BoxError, Record, TokenSource, Value};
use thiserror::Error;

/// A custom converter.
///
/// Receives the current token (the parameter name, or the positional
/// parameter's name) and the token source, from which it may consume any
/// number of tokens.
pub type ConverterFn = Arc<
    dyn Fn(&str, &mut dyn TokenSource) -> Result<Value, ConversionFailure> + Send + Sync,
>;

/// A lifecycle hook.
///
/// Receives the record of the command declaring the hook and the ancestor
/// records selected by its formals, in formal order.
pub type HookFn = Arc<dyn Fn(&mut Record, &[&Record]) -> Result<(), BoxError> + Send + Sync>;

/// A failure raised by a custom converter.
#[derive(Debug, Error)]
pub enum ConversionFailure {
    /// An argument error, propagated unchanged.
    #[error(transparent)]
    Argument(#[from] ArgumentError),
    /// Any other failure. The parser wraps it into an interpretation error
    /// carrying the current token.
    #[error("{0}")]
    Other(#[source] BoxError),
}

impl ConversionFailure {
    /// Wraps an arbitrary failure.
    #[must_use]
    pub fn other(error: impl Into<BoxError>) -> Self {
        Self::Other(error.into())
    }
}

/// A converter callable with its optional display-format hint.
#[derive(Clone)]
pub struct ConverterBinding {
    callable: ConverterFn,
    format: Option<String>,
}

impl ConverterBinding {
    /// Returns the callable.
    #[must_use]
    pub const fn callable(&self) -> &ConverterFn {
        &self.callable
    }

    /// Returns the display-format hint registered with the converter.
    #[must_use]
    pub fn format(&self) -> Option<&str> {
        self.format.as_deref()
    }
}

impl fmt::Debug for ConverterBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConverterBinding")
            .field("format", &self.format)
            .finish_non_exhaustive()
    }
}

type Key = (String, String);

fn key(scope: &str, method: &str) -> Key {
    (scope.to_owned(), method.to_owned())
}

/// Callables referenced by a schema.
///
/// # Example
///
/// ```
/// use argot_model::Bindings;
/// use argot_runtime::Value;
///
/// let bindings = Bindings::new()
///     .converter("app", "upper", |name, tokens| {
///         Ok(Value::Str(tokens.require_next(name)?.to_uppercase()))
///     })
///     .hook("Main", "call", |_record, _ancestors| Ok(()));
/// assert!(bindings.has_converter("app", "upper"));
/// ```
#[derive(Clone, Default)]
pub struct Bindings {
    converters: HashMap<Key, ConverterBinding>,
    hooks: HashMap<Key, HookFn>,
}

impl Bindings {
    /// Creates empty bindings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a converter.
    #[must_use]
    pub fn converter<F>(mut self, scope: &str, method: &str, callable: F) -> Self
    where
        F: Fn(&str, &mut dyn TokenSource) -> Result<Value, ConversionFailure>
            + Send
            + Sync
            + 'static,
    {
        self.insert_converter(scope, method, None, callable);
        self
    }

    /// Registers a converter together with its display-format hint.
    #[must_use]
    pub fn converter_with_format<F>(
        mut self,
        scope: &str,
        method: &str,
        format: &str,
        callable: F,
    ) -> Self
    where
        F: Fn(&str, &mut dyn TokenSource) -> Result<Value, ConversionFailure>
            + Send
            + Sync
            + 'static,
    {
        self.insert_converter(scope, method, Some(format.to_owned()), callable);
        self
    }

    /// Registers a hook under the declaring command's type name.
    #[must_use]
    pub fn hook<F>(mut self, type_name: &str, method: &str, callable: F) -> Self
    where
        F: Fn(&mut Record, &[&Record]) -> Result<(), BoxError> + Send + Sync + 'static,
    {
        self.hooks.insert(key(type_name, method), Arc::new(callable));
        self
    }

    /// Adds every binding of `other`, replacing entries with equal keys.
    #[must_use]
    pub fn merge(mut self, other: Self) -> Self {
        self.converters.extend(other.converters);
        self.hooks.extend(other.hooks);
        self
    }

    /// Reports whether a converter is bound.
    #[must_use]
    pub fn has_converter(&self, scope: &str, method: &str) -> bool {
        self.converters.contains_key(&key(scope, method))
    }

    pub(crate) fn lookup_converter(&self, scope: &str, method: &str) -> Option<&ConverterBinding> {
        self.converters.get(&key(scope, method))
    }

    pub(crate) fn lookup_hook(&self, type_name: &str, method: &str) -> Option<&HookFn> {
        self.hooks.get(&key(type_name, method))
    }

    fn insert_converter<F>(&mut self, scope: &str, method: &str, format: Option<String>, callable: F)
    where
        F: Fn(&str, &mut dyn TokenSource) -> Result<Value, ConversionFailure>
            + Send
            + Sync
            + 'static,
    {
        self.converters.insert(
            key(scope, method),
            ConverterBinding {
                callable: Arc::new(callable),
                format,
            },
        );
    }
}

impl fmt::Debug for Bindings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut converters: Vec<_> = self.converters.keys().collect();
        converters.sort();
        let mut hooks: Vec<_> = self.hooks.keys().collect();
        hooks.sort();
        f.debug_struct("Bindings")
            .field("converters", &converters)
            .field("hooks", &hooks)
            .finish()
    }
}
