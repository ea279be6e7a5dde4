//! Tests for deserializing declarations.

use crate::decl::{HookPhase, ParserSettings, Schema, TypeRef};

#[test]
fn schema_deserializes_with_defaults() {
    let schema: Schema = serde_json::from_str(
        r#"{
            "root": {
                "type_name": "Main",
                "parameters": [
                    { "field": "verbose", "names": ["-v"], "type": "bool", "flag": {} },
                    { "field": "level", "type": { "enum": "Level" } },
                    { "field": "name", "positional": 0, "required": true }
                ],
                "hooks": [ { "phase": "call", "method": "run", "formals": [] } ]
            },
            "enums": [ { "name": "Level", "constants": ["LOW", "HIGH"] } ]
        }"#,
    )
    .expect("schema parses");

    assert_eq!(schema.settings, ParserSettings::default());
    assert!(schema.settings.command_files);
    let parameters = &schema.root.parameters;
    assert_eq!(parameters.len(), 3);
    assert!(parameters.first().is_some_and(|p| p.flag.is_some()));
    assert_eq!(
        parameters.get(1).map(|p| &p.value_type),
        Some(&TypeRef::Enum("Level".to_owned()))
    );
    assert_eq!(
        parameters.get(2).map(|p| &p.value_type),
        Some(&TypeRef::String)
    );
    assert_eq!(
        schema.root.hooks.first().map(|hook| hook.phase),
        Some(HookPhase::Call)
    );
}

#[test]
fn unknown_fields_are_rejected() {
    let result = serde_json::from_str::<Schema>(
        r#"{ "root": { "type_name": "Main", "paramters": [] } }"#,
    );
    assert!(result.is_err());
}

#[test]
fn settings_can_disable_command_files() {
    let settings: ParserSettings =
        serde_json::from_str(r#"{ "command_files": false, "help_commands": ["help"] }"#)
            .expect("settings parse");
    assert!(!settings.command_files);
    assert_eq!(settings.help_commands, vec!["help".to_owned()]);
}
