//! Unit tests for `argot_model`.

mod decl_tests;
mod hooks_tests;

use crate::{Bindings, CommandDecl, CommandModel, ModelError, Schema, resolve};

/// Resolves a schema around `root` with the given bindings.
pub(super) fn resolve_root(root: CommandDecl, bindings: &Bindings) -> Result<CommandModel, ModelError> {
    resolve(&Schema::new(root), bindings)
}

/// Hook bindings that do nothing, registered under `type_name`.
pub(super) fn noop_hooks(type_name: &str, methods: &[&str]) -> Bindings {
    methods.iter().fold(Bindings::new(), |bindings, method| {
        bindings.hook(type_name, method, |_record, _ancestors| Ok(()))
    })
}
