//! Tests for lifecycle hook dispatch.

use std::sync::{Arc, Mutex};

use rstest::{fixture, rstest};

use super::{model, run};
use crate::{Bindings, CommandDecl, DispatchError, HookPhase, ParameterDecl, TypeRef, Value};

const NO_FORMALS: [&str; 0] = [];

/// Shared log of fired hooks.
#[derive(Clone, Default)]
struct Journal(Arc<Mutex<Vec<String>>>);

impl Journal {
    fn push(&self, entry: &str) {
        self.0.lock().expect("journal lock").push(entry.to_owned());
    }

    fn entries(&self) -> Vec<String> {
        self.0.lock().expect("journal lock").clone()
    }

    /// Registers a hook that logs `entry`, failing when `fail` is set.
    fn hook(&self, bindings: Bindings, type_name: &str, method: &str, fail: bool) -> Bindings {
        let journal = self.clone();
        let entry = format!("{type_name}.{method}");
        bindings.hook(type_name, method, move |_record, _ancestors| {
            journal.push(&entry);
            if fail {
                Err(format!("{entry} failed").into())
            } else {
                Ok(())
            }
        })
    }
}

#[fixture]
fn journal() -> Journal {
    Journal::default()
}

fn lifecycle_tree() -> CommandDecl {
    CommandDecl::new("Main")
        .hook(HookPhase::Init, "init", NO_FORMALS)
        .hook(HookPhase::Close, "close", NO_FORMALS)
        .subcommand(
            ["sub"],
            CommandDecl::new("Sub")
                .hook(HookPhase::Init, "init", NO_FORMALS)
                .hook(HookPhase::Call, "call", NO_FORMALS)
                .hook(HookPhase::Close, "close", NO_FORMALS),
        )
}

/// Binds every lifecycle hook, failing the ones listed in `failing`.
fn lifecycle_bindings(journal: &Journal, failing: &[&str]) -> Bindings {
    let hooks = [
        ("Main", "init"),
        ("Main", "close"),
        ("Sub", "init"),
        ("Sub", "call"),
        ("Sub", "close"),
    ];
    hooks
        .iter()
        .fold(Bindings::new(), |bindings, (type_name, method)| {
            let fail = failing.contains(&format!("{type_name}.{method}").as_str());
            journal.hook(bindings, type_name, method, fail)
        })
}

#[rstest]
fn hooks_fire_init_call_close(journal: Journal) {
    let model = model(lifecycle_tree(), &lifecycle_bindings(&journal, &[]));
    run(&model, &["sub"]).call().expect("hooks succeed");
    assert_eq!(
        journal.entries(),
        ["Main.init", "Sub.init", "Sub.call", "Sub.close", "Main.close"]
    );
}

#[rstest]
fn close_hooks_run_after_a_failed_call(journal: Journal) {
    let model = model(
        lifecycle_tree(),
        &lifecycle_bindings(&journal, &["Sub.call", "Main.close"]),
    );
    let error = run(&model, &["sub"]).call().expect_err("call fails");
    assert!(
        matches!(
            &error,
            DispatchError::Hook { phase: HookPhase::Call, type_name, .. } if type_name == "Sub"
        ),
        "unexpected error: {error}"
    );
    assert_eq!(error.suppressed().len(), 1);
    assert_eq!(
        journal.entries(),
        ["Main.init", "Sub.init", "Sub.call", "Sub.close", "Main.close"]
    );
}

#[rstest]
fn failed_init_skips_its_own_close(journal: Journal) {
    let model = model(lifecycle_tree(), &lifecycle_bindings(&journal, &["Sub.init"]));
    let error = run(&model, &["sub"]).call().expect_err("init fails");
    assert!(matches!(
        error,
        DispatchError::Hook {
            phase: HookPhase::Init,
            ..
        }
    ));
    assert_eq!(journal.entries(), ["Main.init", "Sub.init", "Main.close"]);
}

#[rstest]
fn missing_call_hook_fires_nothing(journal: Journal) {
    let model = model(lifecycle_tree(), &lifecycle_bindings(&journal, &[]));
    let error = run(&model, &[]).call().expect_err("root has no call hook");
    assert!(
        matches!(&error, DispatchError::NoCallHook { type_name } if type_name == "Main"),
        "unexpected error: {error}"
    );
    assert!(journal.entries().is_empty());
}

#[test]
fn call_hooks_receive_selected_ancestors() {
    let leaf = CommandDecl::new("Leaf").hook(HookPhase::Call, "call", ["Main"]);
    let root = CommandDecl::new("Main")
        .parameter(ParameterDecl::new("user", TypeRef::String).name("-u"))
        .subcommand(["leaf"], leaf);
    let bindings = Bindings::new().hook("Leaf", "call", |record, ancestors| {
        let user = ancestors
            .first()
            .and_then(|root| root.get(&["user"]))
            .cloned()
            .ok_or("root record missing")?;
        record.assign(&["greeted"], user);
        Ok(())
    });
    let model = model(root, &bindings);
    let mut invocation = run(&model, &["-u", "ada", "leaf"]);
    invocation.call().expect("call succeeds");
    assert_eq!(
        invocation
            .record()
            .and_then(|record| record.get(&["greeted"]))
            .and_then(Value::as_str),
        Some("ada")
    );
}
