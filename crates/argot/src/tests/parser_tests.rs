//! Tests for the parser.

use std::collections::BTreeMap;
use std::fs;

use argot_runtime::tokens::{self, PlainTokens};
use rstest::rstest;

use super::{model, run};
use crate::{
    ArgumentError, ArgumentErrorKind, Bindings, CommandDecl, CommandModel, ConversionFailure,
    ConverterRef, GroupDecl, Outcome, ParameterDecl, Parser, ParserSettings, Schema, TokenSource,
    TypeRef, Value, resolve,
};

fn presence() -> Bindings {
    Bindings::new().converter("app", "presence", |_token, _tokens| Ok(Value::Bool(true)))
}

/// A required `-v` that consumes nothing plus a required trailing `name`.
fn verbose_and_name() -> CommandDecl {
    CommandDecl::new("Main")
        .parameter(
            ParameterDecl::new("v", TypeRef::Bool)
                .name("-v")
                .required()
                .converter(ConverterRef::new("app", "presence")),
        )
        .parameter(ParameterDecl::new("name", TypeRef::String).positional(-1).required())
}

fn parse_error(model: &CommandModel, args: &[&str]) -> ArgumentError {
    Parser::new(model)
        .parse(args.iter().copied())
        .expect_err("parse must fail")
}

fn without_command_files(root: CommandDecl) -> Schema {
    Schema::new(root).with_settings(ParserSettings {
        command_files: false,
        help_commands: Vec::new(),
    })
}

#[test]
fn required_flag_and_positional_parse() {
    let model = model(verbose_and_name(), &presence());
    let invocation = run(&model, &["-v", "bob"]);
    let record = invocation.record().expect("root record");
    assert_eq!(record.get(&["v"]), Some(&Value::Bool(true)));
    assert_eq!(record.get(&["name"]).and_then(Value::as_str), Some("bob"));
}

#[test]
fn leading_positionals_take_the_first_token() {
    let root = CommandDecl::new("Main")
        .parameter(ParameterDecl::new("v", TypeRef::Bool).name("-v").flag())
        .parameter(ParameterDecl::new("name", TypeRef::String).positional(0));
    let model = model(root, &Bindings::new());
    let error = parse_error(&model, &["-v", "bob"]);
    assert_eq!(error.kind(), ArgumentErrorKind::Unrecognized);
    assert_eq!(error.parameter(), "bob");
}

#[test]
fn missing_required_parameter_is_named() {
    let model = model(verbose_and_name(), &presence());
    let error = parse_error(&model, &["bob"]);
    assert_eq!(error.kind(), ArgumentErrorKind::Missing);
    assert_eq!(error.parameter(), "-v");
}

#[rstest]
#[case::key_and_value("-Dkey=val", "key", Some("val"))]
#[case::empty_key("-D=val", "", Some("val"))]
#[case::key_only("-Dkey", "key", None)]
#[case::bare_prefix("-D", "", None)]
#[case::escaped_key(r"-Da\=b=c", "a=b", Some("c"))]
fn map_parameters_collect_entries(
    #[case] token: &str,
    #[case] key: &str,
    #[case] value: Option<&str>,
) {
    let root = CommandDecl::new("Main")
        .parameter(ParameterDecl::new("defines", TypeRef::String).name("-D").map());
    let model = model(root, &Bindings::new());
    let invocation = run(&model, &[token]);
    let expected = BTreeMap::from([(key.to_owned(), value.map(str::to_owned))]);
    assert_eq!(
        invocation
            .record()
            .and_then(|record| record.get(&["defines"]))
            .and_then(Value::as_map),
        Some(&expected)
    );
}

#[test]
fn bare_map_prefix_leaves_the_next_token_alone() {
    let root = CommandDecl::new("Main")
        .parameter(ParameterDecl::new("defines", TypeRef::String).name("-D").map());
    let model = model(root, &Bindings::new());
    let error = parse_error(&model, &["-D", "a=b"]);
    assert_eq!(error.kind(), ArgumentErrorKind::Unrecognized);
    assert_eq!(error.parameter(), "a=b");
}

#[test]
fn repeated_map_entries_accumulate() {
    let root = CommandDecl::new("Main")
        .parameter(ParameterDecl::new("defines", TypeRef::String).name("-D").map());
    let model = model(root, &Bindings::new());
    let invocation = run(&model, &["-Da=1", "-Db=2", "-Da=3"]);
    let entries = invocation
        .record()
        .and_then(|record| record.get(&["defines"]))
        .and_then(Value::as_map)
        .expect("map populated");
    assert_eq!(entries.get("a"), Some(&Some("3".to_owned())));
    assert_eq!(entries.get("b"), Some(&Some("2".to_owned())));
}

#[test]
fn subcommands_receive_their_own_tokens() {
    let run_decl = CommandDecl::new("Run")
        .parameter(ParameterDecl::new("target", TypeRef::String).positional(0).required());
    let root = CommandDecl::new("Main")
        .parameter(ParameterDecl::new("global", TypeRef::Bool).name("-g").flag())
        .subcommand(["run", "r"], run_decl);
    let model = model(root, &Bindings::new());
    let invocation = run(&model, &["-g", "r", "x"]);

    let levels = invocation.levels();
    assert_eq!(levels.len(), 2);
    let types: Vec<&str> = levels
        .iter()
        .map(|level| model.command(level.command()).type_name())
        .collect();
    assert_eq!(types, ["Main", "Run"]);
    assert_eq!(
        levels.first().and_then(|level| level.record().get(&["global"])),
        Some(&Value::Bool(true))
    );
    assert_eq!(
        invocation
            .record()
            .and_then(|record| record.get(&["target"]))
            .and_then(Value::as_str),
        Some("x")
    );
}

#[rstest]
#[case::implicit(&["-p", "80"])]
#[case::named(&["serve", "-p", "80"])]
fn default_subcommand_takes_unmatched_tokens(#[case] args: &[&str]) {
    let serve = CommandDecl::new("Serve").parameter(ParameterDecl::new("port", TypeRef::Int).name("-p"));
    let root = CommandDecl::new("Main").default_subcommand(["serve"], serve);
    let model = model(root, &Bindings::new());
    let invocation = run(&model, args);
    assert_eq!(
        model.command(invocation.target()).type_name(),
        "Serve"
    );
    assert_eq!(
        invocation.record().and_then(|record| record.get(&["port"])),
        Some(&Value::Int(80))
    );
}

#[test]
fn default_subcommand_is_entered_when_tokens_run_out() {
    let root = CommandDecl::new("Main").default_subcommand(["serve"], CommandDecl::new("Serve"));
    let model = model(root, &Bindings::new());
    let invocation = run(&model, &[]);
    assert_eq!(model.command(invocation.target()).type_name(), "Serve");
}

#[test]
fn required_parameters_are_checked_before_descending() {
    let root = CommandDecl::new("Main")
        .parameter(ParameterDecl::new("config", TypeRef::String).name("-c").required())
        .subcommand(["run"], CommandDecl::new("Run"));
    let model = model(root, &Bindings::new());
    let error = parse_error(&model, &["run"]);
    assert_eq!(error.kind(), ArgumentErrorKind::Missing);
    assert_eq!(error.parameter(), "-c");
    assert_eq!(error.message(), Some("Required parameters missing."));
}

fn copy_command() -> CommandDecl {
    CommandDecl::new("Copy")
        .parameter(ParameterDecl::new("force", TypeRef::Bool).name("-f").flag())
        .parameter(
            ParameterDecl::new("source", TypeRef::String)
                .positional(-1)
                .required(),
        )
        .parameter(ParameterDecl::new("destination", TypeRef::String).positional(-2))
}

#[test]
fn trailing_positionals_follow_named_parameters() {
    let model = model(copy_command(), &Bindings::new());
    let invocation = run(&model, &["-f", "a", "b"]);
    let record = invocation.record().expect("root record");
    assert_eq!(record.get(&["force"]), Some(&Value::Bool(true)));
    assert_eq!(record.get(&["source"]).and_then(Value::as_str), Some("a"));
    assert_eq!(record.get(&["destination"]).and_then(Value::as_str), Some("b"));
}

#[test]
fn optional_trailing_positionals_may_be_absent() {
    let model = model(copy_command(), &Bindings::new());
    let invocation = run(&model, &["a"]);
    let record = invocation.record().expect("root record");
    assert_eq!(record.get(&["source"]).and_then(Value::as_str), Some("a"));
    assert_eq!(record.get(&["destination"]), None);
}

#[test]
fn leftover_tokens_are_unrecognized() {
    let model = model(copy_command(), &Bindings::new());
    let error = parse_error(&model, &["a", "b", "c"]);
    assert_eq!(error.kind(), ArgumentErrorKind::Unrecognized);
    assert_eq!(error.parameter(), "c");
}

#[test]
fn unknown_tokens_are_unrecognized() {
    let model = model(CommandDecl::new("Main"), &Bindings::new());
    let error = parse_error(&model, &["--nope"]);
    assert_eq!(error.kind(), ArgumentErrorKind::Unrecognized);
    assert_eq!(error.parameter(), "--nope");
    assert_eq!(error.message(), Some("Unrecognized argument"));
}

#[test]
fn multi_parameters_append_in_order() {
    let root = CommandDecl::new("Main")
        .parameter(ParameterDecl::new("include", TypeRef::Int).name("-i").multi());
    let model = model(root, &Bindings::new());
    let invocation = run(&model, &["-i", "1", "-i", "2"]);
    assert_eq!(
        invocation
            .record()
            .and_then(|record| record.get(&["include"]))
            .and_then(Value::as_list),
        Some([Value::Int(1), Value::Int(2)].as_slice())
    );
}

#[test]
fn named_parameters_need_their_value() {
    let root = CommandDecl::new("Main").parameter(ParameterDecl::new("count", TypeRef::Int).name("-n"));
    let model = model(root, &Bindings::new());
    let error = parse_error(&model, &["-n"]);
    assert_eq!(error.kind(), ArgumentErrorKind::Missing);
    assert_eq!(error.parameter(), "-n");
    assert_eq!(error.message(), Some("Missing argument"));
}

#[test]
fn enum_values_are_normalised() {
    let schema = Schema::new(
        CommandDecl::new("Main")
            .parameter(ParameterDecl::new("kind", TypeRef::Enum("Kind".to_owned()))),
    )
    .with_enum("Kind", ["CLASS", "FIELD"]);
    let model = resolve(&schema, &Bindings::new()).expect("schema resolves");
    let invocation = run(&model, &["-kind", "ClAsS"]);
    assert_eq!(
        invocation.record().and_then(|record| record.get(&["kind"])),
        Some(&Value::Enum("CLASS".to_owned()))
    );
}

#[test]
fn custom_converters_see_the_current_token() {
    let bindings = Bindings::new().converter("app", "tagged", |token, tokens| {
        let next = tokens.require_next(token)?;
        Ok(Value::Str(format!("{token}={next}")))
    });
    let root = CommandDecl::new("Main")
        .parameter(
            ParameterDecl::new("named", TypeRef::String)
                .name("--named")
                .converter(ConverterRef::new("app", "tagged")),
        )
        .parameter(
            ParameterDecl::new("slot", TypeRef::String)
                .positional(0)
                .converter(ConverterRef::new("app", "tagged")),
        );
    let model = model(root, &bindings);
    let invocation = run(&model, &["first", "--named", "second"]);
    let record = invocation.record().expect("root record");
    assert_eq!(record.get(&["slot"]).and_then(Value::as_str), Some("slot=first"));
    assert_eq!(
        record.get(&["named"]).and_then(Value::as_str),
        Some("--named=second")
    );
}

#[test]
fn converter_failures_are_wrapped_with_the_token() {
    let bindings = Bindings::new().converter("app", "broken", |_token, _tokens| {
        Err(ConversionFailure::other("no luck"))
    });
    let root = CommandDecl::new("Main").parameter(
        ParameterDecl::new("date", TypeRef::Named("Date".to_owned()))
            .name("-d")
            .converter(ConverterRef::new("app", "broken")),
    );
    let model = model(root, &bindings);
    let error = parse_error(&model, &["-d"]);
    assert_eq!(error.kind(), ArgumentErrorKind::Interpretation);
    assert_eq!(error.parameter(), "-d");
    assert_eq!(
        std::error::Error::source(&error).map(ToString::to_string),
        Some("no luck".to_owned())
    );
}

#[test]
fn converter_argument_errors_pass_through() {
    let bindings = Bindings::new().converter("app", "strict", |token, _tokens| {
        Err(ArgumentError::invalid_value(token, "rejected").into())
    });
    let root = CommandDecl::new("Main").parameter(
        ParameterDecl::new("mode", TypeRef::String)
            .name("-m")
            .converter(ConverterRef::new("app", "strict")),
    );
    let model = model(root, &bindings);
    let error = parse_error(&model, &["-m"]);
    assert_eq!(error.kind(), ArgumentErrorKind::InvalidValue);
    assert_eq!(error.message(), Some("rejected"));
}

#[test]
fn group_parameters_write_nested_fields() {
    let root = CommandDecl::new("Main").group(
        GroupDecl::new("network")
            .substitute("-(.*)", "--net-$1")
            .parameter(ParameterDecl::new("port", TypeRef::Int)),
    );
    let model = model(root, &Bindings::new());
    let invocation = run(&model, &["--net-port", "8080"]);
    assert_eq!(
        invocation
            .record()
            .and_then(|record| record.get(&["network", "port"])),
        Some(&Value::Int(8080))
    );
}

#[test]
fn help_commands_walk_subcommands() {
    let root = CommandDecl::new("Main").subcommand(
        ["remote"],
        CommandDecl::new("Remote").subcommand(["add"], CommandDecl::new("Add")),
    );
    let schema = Schema::new(root).with_settings(ParserSettings {
        command_files: false,
        help_commands: vec!["help".to_owned()],
    });
    let model = resolve(&schema, &Bindings::new()).expect("schema resolves");
    let outcome = Parser::new(&model)
        .parse(["help", "remote", "bogus", "ignored"])
        .expect("help parses");
    let Outcome::Help(help) = outcome else {
        panic!("expected a help request");
    };
    assert_eq!(help.path(), ["remote".to_owned()]);
    assert_eq!(help.unrecognized(), Some("bogus"));
    assert_eq!(help.usage(), "remote [subcommand] ...");
    assert_eq!(model.command(help.command()).type_name(), "Remote");
}

#[test]
fn command_files_expand_when_enabled() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("args.txt");
    fs::write(&path, "-v\nbob\n").expect("write command file");
    let marker = format!("@{}", path.display());

    let model = model(verbose_and_name(), &presence());
    let invocation = run(&model, &[marker.as_str()]);
    assert_eq!(
        invocation
            .record()
            .and_then(|record| record.get(&["name"]))
            .and_then(Value::as_str),
        Some("bob")
    );
}

#[test]
fn command_files_stay_literal_when_disabled() {
    let schema = without_command_files(
        CommandDecl::new("Main").parameter(ParameterDecl::new("name", TypeRef::String).positional(0)),
    );
    let model = resolve(&schema, &Bindings::new()).expect("schema resolves");
    let invocation = run(&model, &["@missing.txt"]);
    assert_eq!(
        invocation
            .record()
            .and_then(|record| record.get(&["name"]))
            .and_then(Value::as_str),
        Some("@missing.txt")
    );
}

/// Plain tokens whose `close` always fails.
struct FailingClose(PlainTokens<std::vec::IntoIter<String>>);

impl TokenSource for FailingClose {
    fn peek(&mut self) -> Result<Option<&str>, ArgumentError> {
        self.0.peek()
    }

    fn next_token(&mut self) -> Result<Option<String>, ArgumentError> {
        self.0.next_token()
    }

    fn close(&mut self) -> Result<(), ArgumentError> {
        Err(ArgumentError::resolution("cleanup", "close failed"))
    }
}

fn failing(args: &[&str]) -> FailingClose {
    FailingClose(tokens::plain(
        args.iter().map(|arg| (*arg).to_owned()).collect::<Vec<_>>(),
    ))
}

#[test]
fn close_failures_surface_after_success() {
    let model = model(CommandDecl::new("Main"), &Bindings::new());
    let error = Parser::new(&model)
        .parse_tokens(&mut failing(&[]))
        .expect_err("close fails");
    assert_eq!(error.kind(), ArgumentErrorKind::Resolution);
    assert_eq!(error.parameter(), "cleanup");
}

#[test]
fn close_failures_are_suppressed_onto_parse_errors() {
    let model = model(CommandDecl::new("Main"), &Bindings::new());
    let error = Parser::new(&model)
        .parse_tokens(&mut failing(&["--nope"]))
        .expect_err("parse fails");
    assert_eq!(error.kind(), ArgumentErrorKind::Unrecognized);
    let suppressed: Vec<&str> = error
        .suppressed()
        .iter()
        .map(ArgumentError::parameter)
        .collect();
    assert_eq!(suppressed, ["cleanup"]);
}
