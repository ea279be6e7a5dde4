//! Model resolution errors.
//!
//! A [`ModelError`] describes a defect in the declarations themselves. It is
//! raised once, while a schema is resolved, and never during parsing.

use thiserror::Error;

use crate::decl::HookPhase;

/// Errors raised while resolving a schema into a command model.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ModelError {
    /// Two parameters of one command, two sibling sub-commands, or a
    /// parameter and a sibling sub-command share a name.
    #[error("name {name} is defined multiple times in {command}")]
    DuplicateName {
        /// The command declaring the clashing names.
        command: String,
        /// The clashing name.
        name: String,
    },

    /// Two map parameters of one command share a prefix.
    #[error("multiple map parameters defined with prefix {prefix} in {command}")]
    DuplicateMapPrefix {
        /// The command declaring the parameters.
        command: String,
        /// The clashing prefix.
        prefix: String,
    },

    /// Two parameters or groups write to the same field.
    #[error("field {field} is declared multiple times in {command}")]
    DuplicateField {
        /// The command declaring the fields.
        command: String,
        /// The clashing access path, dot separated.
        field: String,
    },

    /// A parameter or map prefix name is empty.
    #[error("parameter {parameter} in {command} has an empty name")]
    EmptyName {
        /// The command declaring the parameter.
        command: String,
        /// The parameter field.
        parameter: String,
    },

    /// A command declares more than one default sub-command.
    #[error("multiple default sub-commands in {command}: {first} and {second}")]
    MultipleDefaults {
        /// The command declaring the sub-commands.
        command: String,
        /// The first default sub-command.
        first: String,
        /// The second default sub-command.
        second: String,
    },

    /// A sub-command declares no invocation names.
    #[error("no names specified for sub-command {subcommand} of {command}")]
    UnnamedSubcommand {
        /// The parent command.
        command: String,
        /// The sub-command type.
        subcommand: String,
    },

    /// A command has both trailing positional parameters and a default
    /// sub-command.
    #[error("cannot have default command and end positional parameters in {command}")]
    DefaultWithTrailingPositionals {
        /// The offending command.
        command: String,
    },

    /// A required positional parameter follows an optional one.
    #[error(
        "required positional parameters must occur before not required ones in {command}: {parameter}"
    )]
    PositionalOrder {
        /// The command declaring the parameters.
        command: String,
        /// The misplaced required parameter.
        parameter: String,
    },

    /// A positional parameter declares more than one name.
    #[error("cannot specify multiple names for positional parameter {parameter} in {command}")]
    PositionalNames {
        /// The command declaring the parameter.
        command: String,
        /// The parameter field.
        parameter: String,
    },

    /// A flag parameter does not have a boolean type.
    #[error("flag parameter {parameter} in {command} must be boolean")]
    FlagNotBoolean {
        /// The command declaring the parameter.
        command: String,
        /// The parameter field.
        parameter: String,
    },

    /// A modifier combination is not allowed on a parameter.
    #[error("parameter {parameter} in {command} cannot be both {first} and {second}")]
    ConflictingModifiers {
        /// The command declaring the parameter.
        command: String,
        /// The parameter field.
        parameter: String,
        /// The first modifier.
        first: &'static str,
        /// The second modifier.
        second: &'static str,
    },

    /// An explicit format hint spans multiple lines.
    #[error("format of parameter {parameter} in {command} must be a single line")]
    MultilineFormat {
        /// The command declaring the parameter.
        command: String,
        /// The parameter field.
        parameter: String,
    },

    /// A map parameter declares an explicit format hint.
    #[error("format cannot be defined for map parameter {parameter} in {command}")]
    MapFormat {
        /// The command declaring the parameter.
        command: String,
        /// The parameter field.
        parameter: String,
    },

    /// A type reference names an enum or named type the schema does not
    /// declare.
    #[error("unknown type {name} referenced from {command}")]
    UnknownType {
        /// The command holding the reference.
        command: String,
        /// The unknown type name.
        name: String,
    },

    /// A command includes a converter set the schema does not declare.
    #[error("unknown converter set {name} included by {command}")]
    UnknownConverterSet {
        /// The including command.
        command: String,
        /// The unknown set name.
        name: String,
    },

    /// No converter could be found for a parameter's type.
    #[error("no converter found for parameter {parameter} of type {type_name} in {command}")]
    UnresolvedConverter {
        /// The command declaring the parameter.
        command: String,
        /// The parameter field.
        parameter: String,
        /// The parameter's type.
        type_name: String,
    },

    /// A converter reference has no callable in the bindings.
    #[error("converter {scope}::{method} is not bound")]
    UnboundConverter {
        /// The declaring scope.
        scope: String,
        /// The method name.
        method: String,
    },

    /// A hook declaration has no callable in the bindings.
    #[error("{phase} hook {method} of {command} is not bound")]
    UnboundHook {
        /// The command declaring the hook.
        command: String,
        /// The hook phase.
        phase: HookPhase,
        /// The method name.
        method: String,
    },

    /// Two hook candidates match the same number of ancestors.
    #[error("ambiguous {phase} hooks in {command}: {first} and {second}")]
    AmbiguousHook {
        /// The command declaring the hooks.
        command: String,
        /// The hook phase.
        phase: HookPhase,
        /// The first candidate.
        first: String,
        /// The second candidate.
        second: String,
    },

    /// A name-substitution pattern is not a valid regular expression.
    #[error("invalid name substitution pattern {pattern}")]
    InvalidSubstitution {
        /// The offending pattern.
        pattern: String,
        /// The underlying regex error.
        #[source]
        source: Box<regex::Error>,
    },

    /// A name-substitution replacement refers to a group its pattern lacks.
    #[error("name substitution {replacement} refers to unknown group {group:?} of {pattern}")]
    UnknownSubstitutionGroup {
        /// The substitution pattern.
        pattern: String,
        /// The offending replacement.
        replacement: String,
        /// The referenced group, empty for a bare `$`.
        group: String,
    },
}

impl ModelError {
    /// Creates a duplicate-name error.
    #[must_use]
    pub fn duplicate_name(command: impl Into<String>, name: impl Into<String>) -> Self {
        Self::DuplicateName {
            command: command.into(),
            name: name.into(),
        }
    }

    /// Creates a conflicting-modifiers error.
    #[must_use]
    pub fn conflicting(
        command: impl Into<String>,
        parameter: impl Into<String>,
        first: &'static str,
        second: &'static str,
    ) -> Self {
        Self::ConflictingModifiers {
            command: command.into(),
            parameter: parameter.into(),
            first,
            second,
        }
    }

    /// Creates an unresolved-converter error.
    #[must_use]
    pub fn unresolved_converter(
        command: impl Into<String>,
        parameter: impl Into<String>,
        type_name: impl Into<String>,
    ) -> Self {
        Self::UnresolvedConverter {
            command: command.into(),
            parameter: parameter.into(),
            type_name: type_name.into(),
        }
    }

    /// Creates an unbound-converter error.
    #[must_use]
    pub fn unbound_converter(scope: impl Into<String>, method: impl Into<String>) -> Self {
        Self::UnboundConverter {
            scope: scope.into(),
            method: method.into(),
        }
    }

    /// Creates an ambiguous-hook error.
    #[must_use]
    pub fn ambiguous_hook(
        command: impl Into<String>,
        phase: HookPhase,
        first: impl Into<String>,
        second: impl Into<String>,
    ) -> Self {
        Self::AmbiguousHook {
            command: command.into(),
            phase,
            first: first.into(),
            second: second.into(),
        }
    }
}
