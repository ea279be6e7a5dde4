//! Unit tests for `argot-cli`.


use std::io::Write as _;

use tempfile::NamedTempFile;

/// A schema exercising flags, stock converters, sub-commands and help.
pub(super) const SCHEMA: &str = r#"{
    "root": {
        "type_name": "Main",
        "parameters": [
            { "field": "verbose", "names": ["-v"], "type": "bool", "flag": {} },
            { "field": "output", "names": ["-o"], "converter": { "scope": "argot", "method": "path" } }
        ],
        "subcommands": [
            {
                "names": ["build"],
                "command": {
                    "type_name": "Build",
                    "parameters": [ { "field": "target", "positional": 0, "required": true } ]
                }
            }
        ]
    },
    "settings": { "help_commands": ["help"] }
}"#;

pub(super) fn schema_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("create schema file");
    file.write_all(contents.as_bytes()).expect("write schema");
    file
}
