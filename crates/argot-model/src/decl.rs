//! Raw, unresolved declarations.
//!
//! Declarations describe a command-line interface as plain data. They can be
//! assembled with the builder methods or deserialized from JSON:
//!
//! ```json
//! {
//!   "root": {
//!     "type_name": "Main",
//!     "parameters": [
//!       { "field": "verbose", "names": ["-v"], "type": "bool", "flag": {} },
//!       { "field": "name", "type": "string", "positional": 0, "required": true }
//!     ]
//!   }
//! }
//! ```
//!
//! Nothing is validated here; [`resolve`](crate::resolve()) does that.

use std::fmt;

use argot_runtime::ScalarKind;
use serde::{Deserialize, Serialize};

/// A complete interface description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Schema {
    /// The root command.
    pub root: CommandDecl,
    /// Enum types referenced by parameters.
    #[serde(default)]
    pub enums: Vec<EnumDecl>,
    /// Named custom types referenced by parameters.
    #[serde(default)]
    pub types: Vec<TypeDecl>,
    /// Reusable sets of common converters.
    #[serde(default)]
    pub converter_sets: Vec<ConverterSetDecl>,
    /// Parser behaviour settings.
    #[serde(default)]
    pub settings: ParserSettings,
}

impl Schema {
    /// Creates a schema around a root command with default settings.
    #[must_use]
    pub fn new(root: CommandDecl) -> Self {
        Self {
            root,
            enums: Vec::new(),
            types: Vec::new(),
            converter_sets: Vec::new(),
            settings: ParserSettings::default(),
        }
    }

    /// Declares an enum type.
    #[must_use]
    pub fn with_enum<I, S>(mut self, name: impl Into<String>, constants: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.enums.push(EnumDecl {
            name: name.into(),
            constants: constants.into_iter().map(Into::into).collect(),
        });
        self
    }

    /// Declares a named custom type.
    #[must_use]
    pub fn with_type(mut self, declaration: TypeDecl) -> Self {
        self.types.push(declaration);
        self
    }

    /// Declares a reusable converter set.
    #[must_use]
    pub fn with_converter_set(mut self, set: ConverterSetDecl) -> Self {
        self.converter_sets.push(set);
        self
    }

    /// Replaces the parser settings.
    #[must_use]
    pub fn with_settings(mut self, settings: ParserSettings) -> Self {
        self.settings = settings;
        self
    }
}

/// Parser behaviour settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ParserSettings {
    /// Expand `@file` tokens. Enabled by default.
    pub command_files: bool,
    /// Root-level tokens that request help instead of running a command.
    pub help_commands: Vec<String>,
}

impl Default for ParserSettings {
    fn default() -> Self {
        Self {
            command_files: true,
            help_commands: Vec::new(),
        }
    }
}

/// A command or sub-command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CommandDecl {
    /// Type identity used for hook matching and result records.
    pub type_name: String,
    /// Documentation text.
    #[serde(default)]
    pub doc: Option<String>,
    /// Whether the command is deprecated.
    #[serde(default)]
    pub deprecated: bool,
    /// Additional type names this command is assignable to.
    #[serde(default)]
    pub supertypes: Vec<String>,
    /// Parameters in declaration order.
    #[serde(default)]
    pub parameters: Vec<ParameterDecl>,
    /// Nested parameter groups, after the direct parameters.
    #[serde(default)]
    pub groups: Vec<GroupDecl>,
    /// Sub-commands.
    #[serde(default)]
    pub subcommands: Vec<SubCommandDecl>,
    /// Converters inherited by this command and its descendants.
    #[serde(default)]
    pub common_converters: Vec<CommonConverterDecl>,
    /// Names of converter sets whose common converters are included.
    #[serde(default)]
    pub include_common_converters: Vec<String>,
    /// Lifecycle hooks.
    #[serde(default)]
    pub hooks: Vec<HookDecl>,
}

impl CommandDecl {
    /// Creates an empty command declaration.
    #[must_use]
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            doc: None,
            deprecated: false,
            supertypes: Vec::new(),
            parameters: Vec::new(),
            groups: Vec::new(),
            subcommands: Vec::new(),
            common_converters: Vec::new(),
            include_common_converters: Vec::new(),
            hooks: Vec::new(),
        }
    }

    /// Sets the documentation text.
    #[must_use]
    pub fn doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }

    /// Marks the command deprecated.
    #[must_use]
    pub const fn deprecated(mut self) -> Self {
        self.deprecated = true;
        self
    }

    /// Adds a supertype.
    #[must_use]
    pub fn supertype(mut self, name: impl Into<String>) -> Self {
        self.supertypes.push(name.into());
        self
    }

    /// Adds a parameter.
    #[must_use]
    pub fn parameter(mut self, parameter: ParameterDecl) -> Self {
        self.parameters.push(parameter);
        self
    }

    /// Adds a parameter group.
    #[must_use]
    pub fn group(mut self, group: GroupDecl) -> Self {
        self.groups.push(group);
        self
    }

    /// Adds a sub-command reachable under `names`.
    #[must_use]
    pub fn subcommand<I, S>(mut self, names: I, command: Self) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.subcommands.push(SubCommandDecl {
            names: names.into_iter().map(Into::into).collect(),
            default: false,
            command,
        });
        self
    }

    /// Adds the default sub-command reachable under `names`.
    #[must_use]
    pub fn default_subcommand<I, S>(mut self, names: I, command: Self) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.subcommands.push(SubCommandDecl {
            names: names.into_iter().map(Into::into).collect(),
            default: true,
            command,
        });
        self
    }

    /// Registers a common converter for `target`.
    #[must_use]
    pub fn common_converter(mut self, target: TypeRef, converter: ConverterRef) -> Self {
        self.common_converters
            .push(CommonConverterDecl { target, converter });
        self
    }

    /// Includes the common converters of a converter set.
    #[must_use]
    pub fn include_converters(mut self, set: impl Into<String>) -> Self {
        self.include_common_converters.push(set.into());
        self
    }

    /// Declares a hook.
    #[must_use]
    pub fn hook<I, S>(mut self, phase: HookPhase, method: impl Into<String>, formals: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.hooks.push(HookDecl {
            phase,
            method: method.into(),
            formals: formals.into_iter().map(Into::into).collect(),
        });
        self
    }
}

/// A group of parameters stored under one field of the result record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GroupDecl {
    /// The field holding the group.
    pub field: String,
    /// Name substitutions applied to every parameter name inside the group.
    #[serde(default)]
    pub substitutions: Vec<SubstitutionDecl>,
    /// Parameters of the group.
    #[serde(default)]
    pub parameters: Vec<ParameterDecl>,
    /// Nested groups.
    #[serde(default)]
    pub groups: Vec<Self>,
}

impl GroupDecl {
    /// Creates an empty group.
    #[must_use]
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            substitutions: Vec::new(),
            parameters: Vec::new(),
            groups: Vec::new(),
        }
    }

    /// Adds a name substitution.
    #[must_use]
    pub fn substitute(mut self, pattern: impl Into<String>, replacement: impl Into<String>) -> Self {
        self.substitutions.push(SubstitutionDecl {
            pattern: pattern.into(),
            replacement: replacement.into(),
        });
        self
    }

    /// Adds a parameter.
    #[must_use]
    pub fn parameter(mut self, parameter: ParameterDecl) -> Self {
        self.parameters.push(parameter);
        self
    }

    /// Adds a nested group.
    #[must_use]
    pub fn group(mut self, group: Self) -> Self {
        self.groups.push(group);
        self
    }
}

/// Rewrites names that fully match `pattern` to `replacement`.
///
/// The replacement may reference capture groups as `$1` or `${name}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SubstitutionDecl {
    /// Regular expression that must match the whole name.
    pub pattern: String,
    /// Replacement text.
    pub replacement: String,
}

/// A parameter declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ParameterDecl {
    /// The field written in the result record.
    pub field: String,
    /// Invocation names, or map prefixes for map parameters. Defaults to
    /// `-<field>`, or `<field>` for positional parameters.
    #[serde(default)]
    pub names: Vec<String>,
    /// Whether the parameter must appear.
    #[serde(default)]
    pub required: bool,
    /// Whether the parameter is deprecated.
    #[serde(default)]
    pub deprecated: bool,
    /// Presence-only boolean mode.
    #[serde(default)]
    pub flag: Option<FlagDecl>,
    /// Positional slot. Non-negative slots lead, negative slots trail.
    #[serde(default)]
    pub positional: Option<i32>,
    /// Accepts `key=value` tokens under each name as a prefix.
    #[serde(default)]
    pub map: bool,
    /// Accepts repeated values, appended in order.
    #[serde(default)]
    pub multi: bool,
    /// Target type, or element type for multi parameters.
    #[serde(rename = "type", default)]
    pub value_type: TypeRef,
    /// Explicit converter.
    #[serde(default)]
    pub converter: Option<ConverterRef>,
    /// Documentation text.
    #[serde(default)]
    pub doc: Option<String>,
    /// Explicit display-format hint.
    #[serde(default)]
    pub format: Option<String>,
    /// Key and value display names for map parameters.
    #[serde(default)]
    pub map_format: Option<MapFormatDecl>,
    /// Meta names shown by help renderers.
    #[serde(default)]
    pub help_meta: Vec<String>,
}

impl ParameterDecl {
    /// Creates an optional, named parameter writing to `field`.
    #[must_use]
    pub fn new(field: impl Into<String>, value_type: TypeRef) -> Self {
        Self {
            field: field.into(),
            names: Vec::new(),
            required: false,
            deprecated: false,
            flag: None,
            positional: None,
            map: false,
            multi: false,
            value_type,
            converter: None,
            doc: None,
            format: None,
            map_format: None,
            help_meta: Vec::new(),
        }
    }

    /// Adds an invocation name.
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.names.push(name.into());
        self
    }

    /// Marks the parameter required.
    #[must_use]
    pub const fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Marks the parameter deprecated.
    #[must_use]
    pub const fn deprecated(mut self) -> Self {
        self.deprecated = true;
        self
    }

    /// Makes the parameter a presence flag assigning `true`.
    #[must_use]
    pub const fn flag(mut self) -> Self {
        self.flag = Some(FlagDecl { negate: false });
        self
    }

    /// Makes the parameter a presence flag assigning `false`.
    #[must_use]
    pub const fn negated_flag(mut self) -> Self {
        self.flag = Some(FlagDecl { negate: true });
        self
    }

    /// Places the parameter in a positional slot.
    #[must_use]
    pub const fn positional(mut self, slot: i32) -> Self {
        self.positional = Some(slot);
        self
    }

    /// Makes the parameter a map parameter.
    #[must_use]
    pub const fn map(mut self) -> Self {
        self.map = true;
        self
    }

    /// Makes the parameter multi-valued.
    #[must_use]
    pub const fn multi(mut self) -> Self {
        self.multi = true;
        self
    }

    /// Sets an explicit converter.
    #[must_use]
    pub fn converter(mut self, converter: ConverterRef) -> Self {
        self.converter = Some(converter);
        self
    }

    /// Sets the documentation text.
    #[must_use]
    pub fn doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }

    /// Sets an explicit display-format hint.
    #[must_use]
    pub fn format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }
}

/// Flag-mode settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FlagDecl {
    /// Assign `false` instead of `true` when present.
    #[serde(default)]
    pub negate: bool,
}

/// Display names for the key and value of a map parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MapFormatDecl {
    /// Key display name.
    pub key: String,
    /// Value display name.
    pub value: String,
}

impl Default for MapFormatDecl {
    fn default() -> Self {
        Self {
            key: "key".to_owned(),
            value: "value".to_owned(),
        }
    }
}

/// A sub-command declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SubCommandDecl {
    /// Invocation names. Must not be empty.
    pub names: Vec<String>,
    /// Whether this is the parent's default sub-command.
    #[serde(default)]
    pub default: bool,
    /// The nested command.
    pub command: CommandDecl,
}

/// A `(scope, method)` reference to a converter in the bindings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConverterRef {
    /// The declaring scope.
    pub scope: String,
    /// The method name.
    pub method: String,
}

impl ConverterRef {
    /// Creates a converter reference.
    #[must_use]
    pub fn new(scope: impl Into<String>, method: impl Into<String>) -> Self {
        Self {
            scope: scope.into(),
            method: method.into(),
        }
    }
}

impl fmt::Display for ConverterRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}", self.scope, self.method)
    }
}

/// A converter registered for every parameter of a target type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CommonConverterDecl {
    /// The exact target type.
    pub target: TypeRef,
    /// The converter.
    pub converter: ConverterRef,
}

/// A named, includable set of common converters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConverterSetDecl {
    /// The set name.
    pub name: String,
    /// The converters of the set.
    #[serde(default)]
    pub common_converters: Vec<CommonConverterDecl>,
    /// Further sets included by this one.
    #[serde(default)]
    pub include: Vec<String>,
}

/// An enum type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EnumDecl {
    /// The type name.
    pub name: String,
    /// Constant names in declaration order.
    pub constants: Vec<String>,
}

/// A named custom type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TypeDecl {
    /// The type name.
    pub name: String,
    /// The converter declared on the type itself.
    #[serde(default)]
    pub converter: Option<ConverterRef>,
}

impl TypeDecl {
    /// Declares a type with its own converter.
    #[must_use]
    pub fn with_converter(name: impl Into<String>, converter: ConverterRef) -> Self {
        Self {
            name: name.into(),
            converter: Some(converter),
        }
    }
}

/// The phase a hook fires in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HookPhase {
    /// Fires root to deepest before the call.
    Init,
    /// Fires on the deepest command.
    Call,
    /// Fires deepest to root after the call.
    Close,
}

impl fmt::Display for HookPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Init => "init",
            Self::Call => "call",
            Self::Close => "close",
        })
    }
}

/// A lifecycle hook declaration.
///
/// `formals` lists the type names of the ancestor records the hook receives,
/// in order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HookDecl {
    /// The firing phase.
    pub phase: HookPhase,
    /// The bound method name, looked up under the command's type name.
    pub method: String,
    /// Formal parameter types.
    #[serde(default)]
    pub formals: Vec<String>,
}

/// A parameter's target type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeRef {
    /// `bool`.
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
    /// `char`.
    Char,
    /// `String`.
    #[default]
    String,
    /// A declared enum.
    Enum(String),
    /// A declared custom type.
    Named(String),
}

impl TypeRef {
    /// Returns the scalar kind for built-in types.
    #[must_use]
    pub const fn scalar(&self) -> Option<ScalarKind> {
        match self {
            Self::Bool => Some(ScalarKind::Bool),
            Self::Byte => Some(ScalarKind::Byte),
            Self::Short => Some(ScalarKind::Short),
            Self::Int => Some(ScalarKind::Int),
            Self::Long => Some(ScalarKind::Long),
            Self::Float => Some(ScalarKind::Float),
            Self::Double => Some(ScalarKind::Double),
            Self::Char => Some(ScalarKind::Char),
            Self::String => Some(ScalarKind::String),
            Self::Enum(_) | Self::Named(_) => None,
        }
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool => f.write_str("bool"),
            Self::Byte => f.write_str("byte"),
            Self::Short => f.write_str("short"),
            Self::Int => f.write_str("int"),
            Self::Long => f.write_str("long"),
            Self::Float => f.write_str("float"),
            Self::Double => f.write_str("double"),
            Self::Char => f.write_str("char"),
            Self::String => f.write_str("string"),
            Self::Enum(name) | Self::Named(name) => f.write_str(name),
        }
    }
}
