//! Schema resolution.
//!
//! Resolution runs in two passes. The first builds the command arena
//! depth-first (the root is always index 0), collects parameters from
//! groups and enforces the structural rules. The second resolves converters,
//! format hints and hooks, all of which need the finished ancestor chain.

use std::collections::{HashMap, HashSet};

use argot_runtime::convert::is_upper_case_enum;
use tracing::debug;

use crate::bindings::Bindings;
use crate::decl::{
    CommandDecl, CommonConverterDecl, ConverterRef, GroupDecl, HookPhase, ParameterDecl, Schema,
    TypeRef,
};
use crate::error::ModelError;
use crate::hooks;
use crate::model::{
    Command, CommandHooks, CommandId, CommandModel, Converter, Parameter, ResolvedHook, SubCommand,
};
use crate::substitution::{NameSubstitution, substitute};

const RESOLVE_TARGET: &str = "argot_model::resolve";

/// Resolves and validates `schema` against `bindings`.
///
/// # Errors
///
/// Returns a [`ModelError`] describing the first defect found in the
/// declarations.
///
/// # Example
///
/// ```
/// use argot_model::{Bindings, CommandDecl, ParameterDecl, Schema, TypeRef, resolve};
///
/// let root = CommandDecl::new("Main")
///     .parameter(ParameterDecl::new("count", TypeRef::Int).name("-n"));
/// let model = resolve(&Schema::new(root), &Bindings::new())?;
/// assert_eq!(model.usage(model.root()), "[parameters] [@command-file]");
/// # Ok::<(), argot_model::ModelError>(())
/// ```
pub fn resolve(schema: &Schema, bindings: &Bindings) -> Result<CommandModel, ModelError> {
    let mut resolver = Resolver {
        schema,
        bindings,
        commands: Vec::new(),
        sources: Vec::new(),
    };
    resolver.build(&schema.root, None, Vec::new())?;
    resolver.finish()
}

/// A parameter after collection, before its converter is known.
struct Draft<'s> {
    declaration: &'s ParameterDecl,
    path: Vec<String>,
    names: Vec<String>,
    required_ordinal: Option<usize>,
}

impl<'s> Draft<'s> {
    fn new(declaration: &'s ParameterDecl, prefix: &[String]) -> Self {
        let mut path = prefix.to_vec();
        path.push(declaration.field.clone());
        let names = if declaration.names.is_empty() {
            vec![default_name(declaration)]
        } else {
            declaration.names.clone()
        };
        Self {
            declaration,
            path,
            names,
            required_ordinal: None,
        }
    }

    fn field(&self) -> String {
        self.path.join(".")
    }

    fn display_name(&self) -> &str {
        self.names.first().map_or("", String::as_str)
    }
}

fn default_name(declaration: &ParameterDecl) -> String {
    if declaration.positional.is_some() {
        declaration.field.clone()
    } else {
        format!("-{}", declaration.field)
    }
}

/// Per-command inputs kept for the second pass.
struct Source<'s> {
    declaration: &'s CommandDecl,
    drafts: Vec<Draft<'s>>,
    common: Vec<&'s CommonConverterDecl>,
}

struct Resolver<'s> {
    schema: &'s Schema,
    bindings: &'s Bindings,
    commands: Vec<Command>,
    sources: Vec<Source<'s>>,
}

impl<'s> Resolver<'s> {
    fn build(
        &mut self,
        declaration: &'s CommandDecl,
        parent: Option<CommandId>,
        names: Vec<String>,
    ) -> Result<CommandId, ModelError> {
        let command_name = declaration.type_name.as_str();
        let mut drafts = collect_parameters(declaration)?;

        let mut fields = HashSet::new();
        let mut named = HashMap::new();
        let mut map_prefixes: Vec<(String, usize)> = Vec::new();
        let mut required = Vec::new();
        for (index, draft) in drafts.iter_mut().enumerate() {
            self.validate_parameter(command_name, draft)?;
            if !fields.insert(draft.field()) {
                return Err(ModelError::DuplicateField {
                    command: command_name.to_owned(),
                    field: draft.field(),
                });
            }
            let parameter = draft.declaration;
            if parameter.map {
                for prefix in &draft.names {
                    if map_prefixes.iter().any(|(existing, _)| existing == prefix) {
                        return Err(ModelError::DuplicateMapPrefix {
                            command: command_name.to_owned(),
                            prefix: prefix.clone(),
                        });
                    }
                    map_prefixes.push((prefix.clone(), index));
                }
            } else if parameter.positional.is_none() {
                for name in &draft.names {
                    if named.insert(name.clone(), index).is_some() {
                        return Err(ModelError::duplicate_name(command_name, name.as_str()));
                    }
                }
            }
            if parameter.required {
                draft.required_ordinal = Some(required.len());
                required.push(index);
            }
        }
        // Most specific prefix first.
        map_prefixes.sort_by(|left, right| right.0.cmp(&left.0));
        let positionals = order_positionals(command_name, &drafts)?;
        let has_trailing = drafts
            .iter()
            .any(|draft| draft.declaration.positional.is_some_and(|slot| slot < 0));

        let id = CommandId(self.commands.len());
        self.commands.push(Command {
            parent,
            type_name: declaration.type_name.clone(),
            supertypes: declaration.supertypes.clone(),
            names,
            doc: declaration.doc.clone(),
            deprecated: declaration.deprecated,
            parameters: Vec::new(),
            positionals,
            map_prefixes,
            named,
            subcommands: Vec::new(),
            default_subcommand: None,
            required,
            hooks: CommandHooks::default(),
            declares_call: declaration
                .hooks
                .iter()
                .any(|hook| hook.phase == HookPhase::Call),
        });
        let common = self.common_converters(declaration)?;
        self.sources.push(Source {
            declaration,
            drafts,
            common,
        });

        let (subcommands, default_subcommand) = self.build_subcommands(declaration, id)?;
        if default_subcommand.is_some() && has_trailing {
            return Err(ModelError::DefaultWithTrailingPositionals {
                command: command_name.to_owned(),
            });
        }
        if let Some(command) = self.commands.get_mut(id.0) {
            command.subcommands = subcommands;
            command.default_subcommand = default_subcommand;
        }
        debug!(
            target: RESOLVE_TARGET,
            command = command_name,
            id = id.0,
            "collected command"
        );
        Ok(id)
    }

    fn build_subcommands(
        &mut self,
        declaration: &'s CommandDecl,
        id: CommandId,
    ) -> Result<(Vec<SubCommand>, Option<CommandId>), ModelError> {
        let command_name = declaration.type_name.as_str();
        let mut seen = HashSet::new();
        let mut subcommands = Vec::with_capacity(declaration.subcommands.len());
        let mut default: Option<(&str, CommandId)> = None;
        for subcommand in &declaration.subcommands {
            let child_name = subcommand.command.type_name.as_str();
            if subcommand.names.is_empty() || subcommand.names.iter().any(String::is_empty) {
                return Err(ModelError::UnnamedSubcommand {
                    command: command_name.to_owned(),
                    subcommand: child_name.to_owned(),
                });
            }
            let clashes_with_parameter = |name: &String| {
                self.commands
                    .get(id.0)
                    .is_some_and(|command| command.named.contains_key(name))
            };
            for name in &subcommand.names {
                if clashes_with_parameter(name) || !seen.insert(name.clone()) {
                    return Err(ModelError::duplicate_name(command_name, name.as_str()));
                }
            }
            if subcommand.default
                && let Some((first, _)) = default
            {
                return Err(ModelError::MultipleDefaults {
                    command: command_name.to_owned(),
                    first: first.to_owned(),
                    second: child_name.to_owned(),
                });
            }
            let child = self.build(&subcommand.command, Some(id), subcommand.names.clone())?;
            if subcommand.default {
                default = Some((child_name, child));
            }
            subcommands.push(SubCommand {
                names: subcommand.names.clone(),
                command: child,
                is_default: subcommand.default,
            });
        }
        Ok((subcommands, default.map(|(_, child)| child)))
    }

    fn validate_parameter(&self, command: &str, draft: &Draft<'_>) -> Result<(), ModelError> {
        let parameter = draft.declaration;
        let field = draft.field();
        if draft.names.iter().any(String::is_empty) {
            return Err(ModelError::EmptyName {
                command: command.to_owned(),
                parameter: field,
            });
        }
        if parameter.flag.is_some() && parameter.value_type != TypeRef::Bool {
            return Err(ModelError::FlagNotBoolean {
                command: command.to_owned(),
                parameter: field,
            });
        }
        let positional = parameter.positional.is_some();
        let flag = parameter.flag.is_some();
        let conflicts = [
            (flag && parameter.required, "flag", "required"),
            (parameter.deprecated && parameter.required, "deprecated", "required"),
            (parameter.deprecated && positional, "deprecated", "positional"),
            (parameter.map && positional, "map", "positional"),
            (parameter.map && flag, "map", "flag"),
            (parameter.map && parameter.multi, "map", "multi"),
            (parameter.multi && positional, "multi", "positional"),
            (parameter.multi && flag, "multi", "flag"),
        ];
        if let Some(&(_, first, second)) = conflicts.iter().find(|(conflict, _, _)| *conflict) {
            return Err(ModelError::conflicting(command, field, first, second));
        }
        if positional && draft.names.len() != 1 {
            return Err(ModelError::PositionalNames {
                command: command.to_owned(),
                parameter: field,
            });
        }
        if let Some(format) = &parameter.format {
            if parameter.map {
                return Err(ModelError::MapFormat {
                    command: command.to_owned(),
                    parameter: field,
                });
            }
            if format.contains(['\n', '\r']) {
                return Err(ModelError::MultilineFormat {
                    command: command.to_owned(),
                    parameter: field,
                });
            }
        }
        if let TypeRef::Enum(name) = &parameter.value_type
            && !self.schema.enums.iter().any(|declared| &declared.name == name)
        {
            return Err(ModelError::UnknownType {
                command: command.to_owned(),
                name: name.clone(),
            });
        }
        Ok(())
    }

    /// Returns the command's own common converters followed by those of
    /// its included sets, expanded transitively in declaration order.
    fn common_converters(
        &self,
        declaration: &'s CommandDecl,
    ) -> Result<Vec<&'s CommonConverterDecl>, ModelError> {
        let mut result: Vec<&'s CommonConverterDecl> =
            declaration.common_converters.iter().collect();
        let mut visited = HashSet::new();
        for set in &declaration.include_common_converters {
            self.include_set(&declaration.type_name, set, &mut visited, &mut result)?;
        }
        Ok(result)
    }

    fn include_set(
        &self,
        command: &str,
        name: &str,
        visited: &mut HashSet<&'s str>,
        result: &mut Vec<&'s CommonConverterDecl>,
    ) -> Result<(), ModelError> {
        let schema: &'s Schema = self.schema;
        let set = schema
            .converter_sets
            .iter()
            .find(|set| set.name == name)
            .ok_or_else(|| ModelError::UnknownConverterSet {
                command: command.to_owned(),
                name: name.to_owned(),
            })?;
        if !visited.insert(set.name.as_str()) {
            return Ok(());
        }
        result.extend(set.common_converters.iter());
        for nested in &set.include {
            self.include_set(command, nested, visited, result)?;
        }
        Ok(())
    }

    fn finish(mut self) -> Result<CommandModel, ModelError> {
        let mut resolved = Vec::with_capacity(self.commands.len());
        for (index, (command, source)) in self.commands.iter().zip(&self.sources).enumerate() {
            let parameters = source
                .drafts
                .iter()
                .map(|draft| self.resolve_parameter(CommandId(index), draft))
                .collect::<Result<Vec<_>, _>>()?;
            let hooks = self.resolve_hooks(command, source)?;
            resolved.push((parameters, hooks));
        }
        for (command, (parameters, hooks)) in self.commands.iter_mut().zip(resolved) {
            command.parameters = parameters;
            command.hooks = hooks;
        }

        let help_commands = self
            .schema
            .settings
            .help_commands
            .iter()
            .filter(|name| {
                self.commands
                    .first()
                    .is_none_or(|root| root.find_subcommand(name).is_none())
            })
            .cloned()
            .collect();
        debug!(
            target: RESOLVE_TARGET,
            commands = self.commands.len(),
            "resolved command model"
        );
        Ok(CommandModel {
            commands: self.commands,
            settings: self.schema.settings.clone(),
            help_commands,
        })
    }

    fn resolve_parameter(&self, id: CommandId, draft: &Draft<'s>) -> Result<Parameter, ModelError> {
        let declaration = draft.declaration;
        let (converter, bound_format) = self.resolve_converter(id, draft)?;
        let explicit_format = declaration
            .format
            .as_deref()
            .map(str::trim)
            .filter(|format| !format.is_empty());
        let format_hint = match (explicit_format, &converter) {
            (Some(format), _) => Some(format.to_owned()),
            (None, Converter::Flag(_) | Converter::KeyValue) => None,
            (None, Converter::Custom { .. }) => bound_format,
            (None, Converter::Builtin(kind)) => Some(kind.format_hint().to_owned()),
            (None, Converter::Enum { .. }) => Some("<enum>".to_owned()),
        };
        Ok(Parameter {
            path: draft.path.clone(),
            names: draft.names.clone(),
            required_ordinal: draft.required_ordinal,
            deprecated: declaration.deprecated,
            positional: declaration.positional,
            map: declaration.map,
            multi: declaration.multi,
            value_type: declaration.value_type.clone(),
            converter,
            format_hint,
            map_format: declaration
                .map
                .then(|| declaration.map_format.clone().unwrap_or_default()),
            doc: declaration.doc.clone(),
            help_meta: declaration.help_meta.clone(),
        })
    }

    fn resolve_converter(
        &self,
        id: CommandId,
        draft: &Draft<'s>,
    ) -> Result<(Converter, Option<String>), ModelError> {
        let declaration = draft.declaration;
        if let Some(flag) = declaration.flag {
            return Ok((Converter::Flag(!flag.negate), None));
        }
        if declaration.map {
            return Ok((Converter::KeyValue, None));
        }
        if let Some(reference) = &declaration.converter {
            return self.bind_converter(reference);
        }
        let target = &declaration.value_type;
        if let Some(reference) = self.nearest_common_converter(id, target) {
            return self.bind_converter(reference);
        }
        if let TypeRef::Named(name) = target
            && let Some(reference) = self
                .schema
                .types
                .iter()
                .find(|declared| &declared.name == name)
                .and_then(|declared| declared.converter.as_ref())
        {
            return self.bind_converter(reference);
        }
        if let Some(kind) = target.scalar() {
            return Ok((Converter::Builtin(kind), None));
        }
        if let TypeRef::Enum(name) = target
            && let Some(declared) = self.schema.enums.iter().find(|e| &e.name == name)
        {
            return Ok((
                Converter::Enum {
                    type_name: name.clone(),
                    constants: declared.constants.clone(),
                    case_insensitive: is_upper_case_enum(&declared.constants),
                },
                None,
            ));
        }
        let command = self
            .commands
            .get(id.0)
            .map_or("", |command| command.type_name.as_str());
        Err(ModelError::unresolved_converter(
            command,
            draft.field(),
            target.to_string(),
        ))
    }

    /// Searches the command and then its ancestors for a common converter
    /// registered for exactly `target`.
    fn nearest_common_converter(&self, id: CommandId, target: &TypeRef) -> Option<&'s ConverterRef> {
        let mut current = Some(id);
        while let Some(CommandId(index)) = current {
            let found = self.sources.get(index).and_then(|source| {
                source
                    .common
                    .iter()
                    .copied()
                    .find(|common| &common.target == target)
                    .map(|common| &common.converter)
            });
            if found.is_some() {
                return found;
            }
            current = self.commands.get(index).and_then(|command| command.parent);
        }
        None
    }

    fn bind_converter(
        &self,
        reference: &ConverterRef,
    ) -> Result<(Converter, Option<String>), ModelError> {
        let binding = self
            .bindings
            .lookup_converter(&reference.scope, &reference.method)
            .ok_or_else(|| {
                ModelError::unbound_converter(reference.scope.as_str(), reference.method.as_str())
            })?;
        Ok((
            Converter::Custom {
                reference: reference.clone(),
                callable: binding.callable().clone(),
            },
            binding.format().map(str::to_owned),
        ))
    }

    fn resolve_hooks(
        &self,
        command: &Command,
        source: &Source<'s>,
    ) -> Result<CommandHooks, ModelError> {
        let declarations = &source.declaration.hooks;
        let type_name = command.type_name();
        if let Some(unbound) = declarations
            .iter()
            .find(|hook| self.bindings.lookup_hook(type_name, &hook.method).is_none())
        {
            return Err(ModelError::UnboundHook {
                command: type_name.to_owned(),
                phase: unbound.phase,
                method: unbound.method.clone(),
            });
        }

        let ancestors = self.ancestors(command);
        let mut resolved = CommandHooks::default();
        for phase in [HookPhase::Init, HookPhase::Call, HookPhase::Close] {
            let Some((declaration, arguments)) =
                hooks::select(command, phase, declarations, &ancestors)?
            else {
                continue;
            };
            let Some(callable) = self.bindings.lookup_hook(type_name, &declaration.method) else {
                continue;
            };
            let hook = Some(ResolvedHook {
                method: declaration.method.clone(),
                arguments,
                callable: callable.clone(),
            });
            match phase {
                HookPhase::Init => resolved.init = hook,
                HookPhase::Call => resolved.call = hook,
                HookPhase::Close => resolved.close = hook,
            }
        }
        Ok(resolved)
    }

    /// Returns the ancestors of `command`, root first.
    fn ancestors(&self, command: &Command) -> Vec<&Command> {
        let mut chain = Vec::new();
        let mut current = command.parent;
        while let Some(CommandId(index)) = current {
            let Some(ancestor) = self.commands.get(index) else {
                break;
            };
            chain.push(ancestor);
            current = ancestor.parent;
        }
        chain.reverse();
        chain
    }
}

/// Collects the direct parameters followed by those of every group.
fn collect_parameters(declaration: &CommandDecl) -> Result<Vec<Draft<'_>>, ModelError> {
    let mut drafts: Vec<Draft<'_>> = declaration
        .parameters
        .iter()
        .map(|parameter| Draft::new(parameter, &[]))
        .collect();
    for group in &declaration.groups {
        collect_group(group, &[], &mut drafts)?;
    }
    Ok(drafts)
}

/// Inner substitutions apply before those of enclosing groups.
fn collect_group<'s>(
    group: &'s GroupDecl,
    prefix: &[String],
    drafts: &mut Vec<Draft<'s>>,
) -> Result<(), ModelError> {
    let substitutions = group
        .substitutions
        .iter()
        .map(NameSubstitution::compile)
        .collect::<Result<Vec<_>, _>>()?;
    let mut path = prefix.to_vec();
    path.push(group.field.clone());

    let start = drafts.len();
    drafts.extend(
        group
            .parameters
            .iter()
            .map(|parameter| Draft::new(parameter, &path)),
    );
    for nested in &group.groups {
        collect_group(nested, &path, drafts)?;
    }
    if substitutions.is_empty() {
        return Ok(());
    }
    for draft in drafts.iter_mut().skip(start) {
        let mut renamed: Vec<String> = Vec::with_capacity(draft.names.len());
        for name in &draft.names {
            let substituted = substitute(name, &substitutions);
            if !renamed.contains(&substituted) {
                renamed.push(substituted);
            }
        }
        draft.names = renamed;
    }
    Ok(())
}

/// Sorts positional parameters (non-negative slots ascending, then negative
/// slots descending, required first within a slot) and checks that no
/// required parameter follows an optional one within either group.
fn order_positionals(command: &str, drafts: &[Draft<'_>]) -> Result<Vec<usize>, ModelError> {
    let mut ordered: Vec<(usize, i32, bool)> = drafts
        .iter()
        .enumerate()
        .filter_map(|(index, draft)| {
            draft
                .declaration
                .positional
                .map(|slot| (index, slot, draft.declaration.required))
        })
        .collect();
    ordered.sort_by_key(|&(_, slot, required)| (slot < 0, i64::from(slot).abs(), !required));

    let mut optional_seen = [false, false];
    for &(index, slot, required) in &ordered {
        let Some(optional_before) = optional_seen.get_mut(usize::from(slot < 0)) else {
            continue;
        };
        if required && *optional_before {
            let name = drafts.get(index).map_or("", Draft::display_name);
            return Err(ModelError::PositionalOrder {
                command: command.to_owned(),
                parameter: name.to_owned(),
            });
        }
        if !required {
            *optional_before = true;
        }
    }
    Ok(ordered.into_iter().map(|(index, _, _)| index).collect())
}
