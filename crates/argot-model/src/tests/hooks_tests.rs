//! Tests for hook selection.

use rstest::rstest;

use super::{noop_hooks, resolve_root};
use crate::hooks::match_formals;
use crate::{Command, CommandDecl, CommandModel, HookPhase, ModelError};

const NO_FORMALS: [&str; 0] = [];

/// `Main > Mid (also Base) > Leaf`, with `leaf` supplying Leaf's hooks.
fn chain(leaf: CommandDecl) -> CommandDecl {
    CommandDecl::new("Main").subcommand(
        ["mid"],
        CommandDecl::new("Mid")
            .supertype("Base")
            .subcommand(["leaf"], leaf),
    )
}

fn leaf(model: &CommandModel) -> &Command {
    model
        .commands()
        .find(|(_, command)| command.type_name() == "Leaf")
        .map(|(_, command)| command)
        .expect("leaf exists")
}

#[rstest]
#[case::empty(&[], Some(vec![]))]
#[case::exact(&["Main", "Mid"], Some(vec![0, 1]))]
#[case::supertype(&["Base"], Some(vec![1]))]
#[case::skips_unmatched(&["Mid"], Some(vec![1]))]
#[case::no_reuse(&["Main", "Main"], None)]
#[case::order_preserving(&["Base", "Main"], None)]
#[case::unknown(&["Other"], None)]
fn formals_match_greedily(#[case] formals: &[&str], #[case] expected: Option<Vec<usize>>) {
    let model = resolve_root(chain(CommandDecl::new("Leaf")), &crate::Bindings::new())
        .expect("schema resolves");
    let ancestors: Vec<&Command> = model
        .commands()
        .filter(|(_, command)| command.type_name() != "Leaf")
        .map(|(_, command)| command)
        .collect();
    assert_eq!(match_formals(formals, &ancestors), expected);
}

#[test]
fn most_specific_hook_wins() {
    let leaf_decl = CommandDecl::new("Leaf")
        .hook(HookPhase::Call, "run_plain", NO_FORMALS)
        .hook(HookPhase::Call, "run_full", ["Main", "Base"])
        .hook(HookPhase::Call, "run_mid", ["Mid"]);
    let bindings = noop_hooks("Leaf", &["run_plain", "run_full", "run_mid"]);
    let model = resolve_root(chain(leaf_decl), &bindings).expect("schema resolves");
    let call = leaf(&model)
        .hooks()
        .get(HookPhase::Call)
        .expect("call hook selected");
    assert_eq!(call.method(), "run_full");
    assert_eq!(call.arguments(), [0, 1]);
}

#[test]
fn unmatchable_hooks_fall_back_to_fewer_formals() {
    let leaf_decl = CommandDecl::new("Leaf")
        .hook(HookPhase::Init, "twice", ["Main", "Main"])
        .hook(HookPhase::Init, "plain", NO_FORMALS);
    let bindings = noop_hooks("Leaf", &["twice", "plain"]);
    let model = resolve_root(chain(leaf_decl), &bindings).expect("schema resolves");
    let init = leaf(&model).hooks().get(HookPhase::Init);
    assert_eq!(init.map(|hook| hook.method()), Some("plain"));
    assert!(leaf(&model).hooks().get(HookPhase::Call).is_none());
}

#[test]
fn hooks_with_no_candidate_are_absent() {
    let leaf_decl = CommandDecl::new("Leaf").hook(HookPhase::Close, "done", ["Other"]);
    let model = resolve_root(chain(leaf_decl), &noop_hooks("Leaf", &["done"]))
        .expect("schema resolves");
    assert!(leaf(&model).hooks().get(HookPhase::Close).is_none());
}

#[test]
fn equally_specific_call_hooks_are_ambiguous() {
    let leaf_decl = CommandDecl::new("Leaf")
        .hook(HookPhase::Call, "first", ["Main"])
        .hook(HookPhase::Call, "second", ["Base"]);
    let bindings = noop_hooks("Leaf", &["first", "second"]);
    let error = resolve_root(chain(leaf_decl), &bindings).expect_err("hooks are ambiguous");
    assert!(
        matches!(
            &error,
            ModelError::AmbiguousHook { phase: HookPhase::Call, first, second, .. }
                if first == "first(Main)" && second == "second(Base)"
        ),
        "unexpected error: {error}"
    );
}

#[test]
fn a_more_specific_hook_clears_an_earlier_tie() {
    let leaf_decl = CommandDecl::new("Leaf")
        .hook(HookPhase::Call, "first", ["Main"])
        .hook(HookPhase::Call, "second", ["Base"])
        .hook(HookPhase::Call, "third", ["Main", "Mid"]);
    let bindings = noop_hooks("Leaf", &["first", "second", "third"]);
    let model = resolve_root(chain(leaf_decl), &bindings).expect("schema resolves");
    let call = leaf(&model).hooks().get(HookPhase::Call);
    assert_eq!(call.map(|hook| hook.method()), Some("third"));
}

#[test]
fn call_declaration_is_recorded() {
    let root = CommandDecl::new("Main").hook(HookPhase::Call, "run", NO_FORMALS);
    let model = resolve_root(root, &noop_hooks("Main", &["run"])).expect("schema resolves");
    assert!(model.command(model.root()).declares_call());
}
