//! Usage-string assembly for help renderers.

use crate::model::{CommandId, CommandModel};

const COMMAND_FILE_PLACEHOLDER: &str = "[@command-file]";

pub(crate) fn usage(model: &CommandModel, id: CommandId) -> String {
    let command = model.command(id);
    let mut parts: Vec<String> = model
        .lineage(id)
        .into_iter()
        .skip(1)
        .filter_map(|ancestor| model.command(ancestor).names().first().cloned())
        .collect();

    let command_files = model.settings().command_files;
    if !command.parameters().is_empty() || command_files {
        parts.extend(command.leading_positionals().map(positional_part));
        if command
            .parameters()
            .iter()
            .any(|parameter| parameter.positional().is_none())
        {
            parts.push("[parameters]".to_owned());
        }
        if command_files {
            parts.push(COMMAND_FILE_PLACEHOLDER.to_owned());
        }
        parts.extend(command.trailing_positionals().map(positional_part));
    }
    if !command.subcommands().is_empty() {
        let part = if command.declares_call() {
            "[subcommand?] ..."
        } else {
            "[subcommand] ..."
        };
        parts.push(part.to_owned());
    }
    parts.join(" ")
}

fn positional_part(parameter: &crate::model::Parameter) -> String {
    if parameter.is_required() {
        parameter.display_name().to_owned()
    } else {
        format!("{}?", parameter.display_name())
    }
}
