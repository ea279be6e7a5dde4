//! The resolved, immutable command model.
//!
//! Commands are stored in an arena owned by [`CommandModel`] and addressed
//! by [`CommandId`]. Parameters keep their declaration order; positional,
//! map and named lookups are index tables built during resolution.

use std::collections::HashMap;
use std::fmt;

use argot_runtime::ScalarKind;

use crate::bindings::{ConverterFn, HookFn};
use crate::decl::{ConverterRef, HookPhase, MapFormatDecl, ParserSettings, TypeRef};

/// Identifies a command inside its [`CommandModel`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CommandId(pub(crate) usize);

impl CommandId {
    /// Returns the arena index.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

/// A validated command tree.
#[derive(Debug)]
pub struct CommandModel {
    pub(crate) commands: Vec<Command>,
    pub(crate) settings: ParserSettings,
    pub(crate) help_commands: Vec<String>,
}

impl CommandModel {
    /// Returns the root command's id.
    #[must_use]
    pub const fn root(&self) -> CommandId {
        CommandId(0)
    }

    /// Returns a command by id.
    ///
    /// # Panics
    ///
    /// Panics if `id` was minted by a different model.
    #[must_use]
    #[expect(
        clippy::indexing_slicing,
        reason = "ids are only minted by the model that owns the arena"
    )]
    pub fn command(&self, id: CommandId) -> &Command {
        &self.commands[id.0]
    }

    /// Iterates every command in depth-first declaration order.
    pub fn commands(&self) -> impl Iterator<Item = (CommandId, &Command)> {
        self.commands
            .iter()
            .enumerate()
            .map(|(index, command)| (CommandId(index), command))
    }

    /// Returns the parser settings.
    #[must_use]
    pub const fn settings(&self) -> &ParserSettings {
        &self.settings
    }

    /// Returns the effective root help-command names.
    ///
    /// Names that collide with root sub-command names are excluded.
    #[must_use]
    pub fn help_commands(&self) -> &[String] {
        &self.help_commands
    }

    /// Returns the chain of ids from the root down to `id`.
    #[must_use]
    pub fn lineage(&self, id: CommandId) -> Vec<CommandId> {
        let mut chain = vec![id];
        let mut current = id;
        while let Some(parent) = self.command(current).parent {
            chain.push(parent);
            current = parent;
        }
        chain.reverse();
        chain
    }

    /// Returns the usage string of a command.
    #[must_use]
    pub fn usage(&self, id: CommandId) -> String {
        crate::usage::usage(self, id)
    }
}

/// A resolved command.
#[derive(Debug)]
pub struct Command {
    pub(crate) parent: Option<CommandId>,
    pub(crate) type_name: String,
    pub(crate) supertypes: Vec<String>,
    pub(crate) names: Vec<String>,
    pub(crate) doc: Option<String>,
    pub(crate) deprecated: bool,
    pub(crate) parameters: Vec<Parameter>,
    pub(crate) positionals: Vec<usize>,
    pub(crate) map_prefixes: Vec<(String, usize)>,
    pub(crate) named: HashMap<String, usize>,
    pub(crate) subcommands: Vec<SubCommand>,
    pub(crate) default_subcommand: Option<CommandId>,
    pub(crate) required: Vec<usize>,
    pub(crate) hooks: CommandHooks,
    pub(crate) declares_call: bool,
}

impl Command {
    /// Returns the parent command, `None` for the root.
    #[must_use]
    pub const fn parent(&self) -> Option<CommandId> {
        self.parent
    }

    /// Returns the type identity.
    #[must_use]
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Reports whether a record of this command can be passed where
    /// `formal` is expected.
    #[must_use]
    pub fn is_assignable_to(&self, formal: &str) -> bool {
        self.type_name == formal || self.supertypes.iter().any(|name| name == formal)
    }

    /// Returns the invocation names; empty for the root.
    #[must_use]
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Returns the documentation text.
    #[must_use]
    pub fn doc(&self) -> Option<&str> {
        self.doc.as_deref()
    }

    /// Reports whether the command is deprecated.
    #[must_use]
    pub const fn is_deprecated(&self) -> bool {
        self.deprecated
    }

    /// Returns every parameter in declaration order.
    #[must_use]
    pub fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }

    /// Returns positional parameters in parsing order: non-negative slots
    /// ascending, then negative slots descending.
    pub fn positionals(&self) -> impl Iterator<Item = &Parameter> {
        self.positionals
            .iter()
            .filter_map(|index| self.parameters.get(*index))
    }

    /// Returns the leading (non-negative slot) positional parameters.
    pub fn leading_positionals(&self) -> impl Iterator<Item = &Parameter> {
        self.positionals()
            .filter(|parameter| parameter.positional.is_some_and(|slot| slot >= 0))
    }

    /// Returns the trailing (negative slot) positional parameters.
    pub fn trailing_positionals(&self) -> impl Iterator<Item = &Parameter> {
        self.positionals()
            .filter(|parameter| parameter.positional.is_some_and(|slot| slot < 0))
    }

    /// Reports whether the command has trailing positional parameters.
    #[must_use]
    pub fn has_trailing_positionals(&self) -> bool {
        self.trailing_positionals().next().is_some()
    }

    /// Returns the map parameter whose prefix starts `token`, trying more
    /// specific prefixes first.
    #[must_use]
    pub fn find_map_parameter(&self, token: &str) -> Option<(&str, &Parameter)> {
        self.map_prefixes.iter().find_map(|(prefix, index)| {
            if token.starts_with(prefix.as_str()) {
                self.parameters
                    .get(*index)
                    .map(|parameter| (prefix.as_str(), parameter))
            } else {
                None
            }
        })
    }

    /// Returns the non-positional, non-map parameter named `name`.
    #[must_use]
    pub fn find_parameter(&self, name: &str) -> Option<&Parameter> {
        self.named
            .get(name)
            .and_then(|index| self.parameters.get(*index))
    }

    /// Returns the sub-commands.
    #[must_use]
    pub fn subcommands(&self) -> &[SubCommand] {
        &self.subcommands
    }

    /// Returns the sub-command invoked as `name`.
    #[must_use]
    pub fn find_subcommand(&self, name: &str) -> Option<&SubCommand> {
        self.subcommands
            .iter()
            .find(|subcommand| subcommand.names.iter().any(|candidate| candidate == name))
    }

    /// Returns the default sub-command.
    #[must_use]
    pub const fn default_subcommand(&self) -> Option<CommandId> {
        self.default_subcommand
    }

    /// Returns the number of required parameters.
    #[must_use]
    pub fn required_count(&self) -> usize {
        self.required.len()
    }

    /// Returns the required parameter with the given ordinal.
    #[must_use]
    pub fn required_parameter(&self, ordinal: usize) -> Option<&Parameter> {
        self.required
            .get(ordinal)
            .and_then(|index| self.parameters.get(*index))
    }

    /// Returns the resolved lifecycle hooks.
    #[must_use]
    pub const fn hooks(&self) -> &CommandHooks {
        &self.hooks
    }

    /// Reports whether the command declares any `call` hook.
    #[must_use]
    pub const fn declares_call(&self) -> bool {
        self.declares_call
    }
}

/// A named sub-command edge.
#[derive(Debug, Clone)]
pub struct SubCommand {
    pub(crate) names: Vec<String>,
    pub(crate) command: CommandId,
    pub(crate) is_default: bool,
}

impl SubCommand {
    /// Returns the invocation names.
    #[must_use]
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Returns the target command.
    #[must_use]
    pub const fn command(&self) -> CommandId {
        self.command
    }

    /// Reports whether this is the parent's default sub-command.
    #[must_use]
    pub const fn is_default(&self) -> bool {
        self.is_default
    }
}

/// A resolved parameter.
#[derive(Debug)]
pub struct Parameter {
    pub(crate) path: Vec<String>,
    pub(crate) names: Vec<String>,
    pub(crate) required_ordinal: Option<usize>,
    pub(crate) deprecated: bool,
    pub(crate) positional: Option<i32>,
    pub(crate) map: bool,
    pub(crate) multi: bool,
    pub(crate) value_type: TypeRef,
    pub(crate) converter: Converter,
    pub(crate) format_hint: Option<String>,
    pub(crate) map_format: Option<MapFormatDecl>,
    pub(crate) doc: Option<String>,
    pub(crate) help_meta: Vec<String>,
}

impl Parameter {
    /// Returns the access path into the result record.
    #[must_use]
    pub fn path(&self) -> &[String] {
        &self.path
    }

    /// Returns the invocation names (map prefixes for map parameters).
    #[must_use]
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Returns the first name, used in messages and usage strings.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.names.first().map_or("", String::as_str)
    }

    /// Returns the dense required ordinal, `None` when optional.
    #[must_use]
    pub const fn required_ordinal(&self) -> Option<usize> {
        self.required_ordinal
    }

    /// Reports whether the parameter is required.
    #[must_use]
    pub const fn is_required(&self) -> bool {
        self.required_ordinal.is_some()
    }

    /// Reports whether the parameter is deprecated.
    #[must_use]
    pub const fn is_deprecated(&self) -> bool {
        self.deprecated
    }

    /// Returns the positional slot.
    #[must_use]
    pub const fn positional(&self) -> Option<i32> {
        self.positional
    }

    /// Reports whether the parameter is a map parameter.
    #[must_use]
    pub const fn is_map(&self) -> bool {
        self.map
    }

    /// Reports whether the parameter is multi-valued.
    #[must_use]
    pub const fn is_multi(&self) -> bool {
        self.multi
    }

    /// Returns the target (or element) type.
    #[must_use]
    pub const fn value_type(&self) -> &TypeRef {
        &self.value_type
    }

    /// Returns the resolved converter.
    #[must_use]
    pub const fn converter(&self) -> &Converter {
        &self.converter
    }

    /// Returns the display-format hint.
    #[must_use]
    pub fn format_hint(&self) -> Option<&str> {
        self.format_hint.as_deref()
    }

    /// Returns the key and value display names of a map parameter.
    #[must_use]
    pub const fn map_format(&self) -> Option<&MapFormatDecl> {
        self.map_format.as_ref()
    }

    /// Returns the documentation text.
    #[must_use]
    pub fn doc(&self) -> Option<&str> {
        self.doc.as_deref()
    }

    /// Returns help meta names.
    #[must_use]
    pub fn help_meta(&self) -> &[String] {
        &self.help_meta
    }
}

/// How a parameter's value is produced.
#[derive(Clone)]
pub enum Converter {
    /// Presence assigns the literal; no token is consumed.
    Flag(bool),
    /// The matched token is split into a map entry.
    KeyValue,
    /// A built-in scalar converter.
    Builtin(ScalarKind),
    /// The built-in enum converter.
    Enum {
        /// The enum type name.
        type_name: String,
        /// Accepted constants.
        constants: Vec<String>,
        /// Whether lookup upper-cases the token first.
        case_insensitive: bool,
    },
    /// A bound custom converter.
    Custom {
        /// The declaration it was resolved from.
        reference: ConverterRef,
        /// The callable.
        callable: ConverterFn,
    },
}

impl fmt::Debug for Converter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Flag(literal) => f.debug_tuple("Flag").field(literal).finish(),
            Self::KeyValue => f.write_str("KeyValue"),
            Self::Builtin(kind) => f.debug_tuple("Builtin").field(kind).finish(),
            Self::Enum {
                type_name,
                constants,
                case_insensitive,
            } => f
                .debug_struct("Enum")
                .field("type_name", type_name)
                .field("constants", constants)
                .field("case_insensitive", case_insensitive)
                .finish(),
            Self::Custom { reference, .. } => f.debug_tuple("Custom").field(reference).finish(),
        }
    }
}

/// Hooks resolved for one command.
#[derive(Debug, Default)]
pub struct CommandHooks {
    pub(crate) init: Option<ResolvedHook>,
    pub(crate) call: Option<ResolvedHook>,
    pub(crate) close: Option<ResolvedHook>,
}

impl CommandHooks {
    /// Returns the hook for `phase`.
    #[must_use]
    pub const fn get(&self, phase: HookPhase) -> Option<&ResolvedHook> {
        match phase {
            HookPhase::Init => self.init.as_ref(),
            HookPhase::Call => self.call.as_ref(),
            HookPhase::Close => self.close.as_ref(),
        }
    }
}

/// A hook bound to the ancestors it receives.
#[derive(Clone)]
pub struct ResolvedHook {
    pub(crate) method: String,
    pub(crate) arguments: Vec<usize>,
    pub(crate) callable: HookFn,
}

impl ResolvedHook {
    /// Returns the bound method name.
    #[must_use]
    pub fn method(&self) -> &str {
        &self.method
    }

    /// Returns the ancestor indices (0 = root) passed as arguments, in
    /// formal order.
    #[must_use]
    pub fn arguments(&self) -> &[usize] {
        &self.arguments
    }

    /// Returns the callable.
    #[must_use]
    pub const fn callable(&self) -> &HookFn {
        &self.callable
    }
}

impl fmt::Debug for ResolvedHook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolvedHook")
            .field("method", &self.method)
            .field("arguments", &self.arguments)
            .finish_non_exhaustive()
    }
}
