//! Unit tests for `argot`.

mod invocation_tests;
mod parser_tests;

use crate::{Bindings, CommandDecl, CommandModel, Invocation, Outcome, Parser, Schema, resolve};

pub(super) fn model(root: CommandDecl, bindings: &Bindings) -> CommandModel {
    resolve(&Schema::new(root), bindings).expect("schema resolves")
}

/// Parses `args` and expects a runnable invocation.
pub(super) fn run<'m>(model: &'m CommandModel, args: &[&str]) -> Invocation<'m> {
    match Parser::new(model).parse(args.iter().copied()) {
        Ok(Outcome::Run(invocation)) => invocation,
        Ok(Outcome::Help(help)) => panic!("unexpected help request: {help:?}"),
        Err(error) => panic!("parse failed: {error}"),
    }
}
