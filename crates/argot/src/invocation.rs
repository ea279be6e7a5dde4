//! Populated record chains and lifecycle hook dispatch.

use argot_model::{CommandId, CommandModel, HookPhase};
use argot_runtime::{BoxError, Record};
use thiserror::Error;
use tracing::debug;

const DISPATCH_TARGET: &str = "argot::invocation";

/// Errors raised while firing lifecycle hooks.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum DispatchError {
    /// The deepest command declares no `call` hook.
    #[error("no call hook is declared for {type_name}")]
    NoCallHook {
        /// The deepest command's type.
        type_name: String,
    },

    /// A hook returned an error.
    #[error("{phase} hook {method} of {type_name} failed")]
    Hook {
        /// The type of the command whose hook failed.
        type_name: String,
        /// The bound method name.
        method: String,
        /// The phase that failed.
        phase: HookPhase,
        /// The hook's error.
        #[source]
        source: BoxError,
        /// Failures of hooks that still ran afterwards.
        suppressed: Vec<Self>,
    },
}

impl DispatchError {
    /// Returns failures attached to this one.
    #[must_use]
    pub fn suppressed(&self) -> &[Self] {
        match self {
            Self::Hook { suppressed, .. } => suppressed,
            Self::NoCallHook { .. } => &[],
        }
    }

    fn add_suppressed(&mut self, error: Self) {
        if let Self::Hook { suppressed, .. } = self {
            suppressed.push(error);
        }
    }
}

/// One parsed command level.
#[derive(Debug, Clone, PartialEq)]
pub struct Level {
    command: CommandId,
    record: Record,
}

impl Level {
    pub(crate) const fn new(command: CommandId, record: Record) -> Self {
        Self { command, record }
    }

    /// Returns the command parsed at this level.
    #[must_use]
    pub const fn command(&self) -> CommandId {
        self.command
    }

    /// Returns the populated record.
    #[must_use]
    pub const fn record(&self) -> &Record {
        &self.record
    }
}

/// A successful parse: one record per level, root first.
#[derive(Debug)]
pub struct Invocation<'m> {
    model: &'m CommandModel,
    levels: Vec<Level>,
}

impl<'m> Invocation<'m> {
    pub(crate) const fn new(model: &'m CommandModel, levels: Vec<Level>) -> Self {
        Self { model, levels }
    }

    /// Returns the parsed levels, root first.
    #[must_use]
    pub fn levels(&self) -> &[Level] {
        &self.levels
    }

    /// Returns the deepest command, the call target.
    #[must_use]
    pub fn target(&self) -> CommandId {
        self.levels
            .last()
            .map_or(self.model.root(), |level| level.command)
    }

    /// Returns the deepest record.
    #[must_use]
    pub fn record(&self) -> Option<&Record> {
        self.levels.last().map(|level| &level.record)
    }

    /// Consumes the invocation and returns the records, root first.
    #[must_use]
    pub fn into_records(self) -> Vec<Record> {
        self.levels.into_iter().map(|level| level.record).collect()
    }

    /// Fires the lifecycle hooks.
    ///
    /// `init` hooks fire root to deepest, then the deepest `call` hook, then
    /// `close` hooks deepest to root. A level's `close` hook runs whenever
    /// its `init` hook succeeded (or it had none), even if a later hook
    /// failed. The first failure is returned with later ones suppressed.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::NoCallHook`] before firing anything when the
    /// deepest command has no `call` hook, or the first hook failure.
    pub fn call(&mut self) -> Result<(), DispatchError> {
        let target = self.model.command(self.target());
        if target.hooks().get(HookPhase::Call).is_none() {
            return Err(DispatchError::NoCallHook {
                type_name: target.type_name().to_owned(),
            });
        }

        let mut failure = None;
        let mut entered = 0;
        for index in 0..self.levels.len() {
            if let Err(error) = self.fire(index, HookPhase::Init) {
                failure = Some(error);
                break;
            }
            entered = index + 1;
        }
        if failure.is_none()
            && let Err(error) = self.fire(self.levels.len().saturating_sub(1), HookPhase::Call)
        {
            failure = Some(error);
        }
        for index in (0..entered).rev() {
            let Err(error) = self.fire(index, HookPhase::Close) else {
                continue;
            };
            match failure.as_mut() {
                Some(first) => first.add_suppressed(error),
                None => failure = Some(error),
            }
        }
        failure.map_or(Ok(()), Err)
    }

    fn fire(&mut self, index: usize, phase: HookPhase) -> Result<(), DispatchError> {
        let model = self.model;
        let Some((ancestors, rest)) = self.levels.split_at_mut_checked(index) else {
            return Ok(());
        };
        let Some((current, _)) = rest.split_first_mut() else {
            return Ok(());
        };
        let command = model.command(current.command);
        let Some(hook) = command.hooks().get(phase) else {
            return Ok(());
        };
        let arguments: Vec<&Record> = hook
            .arguments()
            .iter()
            .filter_map(|argument| ancestors.get(*argument).map(|level| &level.record))
            .collect();
        debug!(
            target: DISPATCH_TARGET,
            command = command.type_name(),
            %phase,
            method = hook.method(),
            "firing hook"
        );
        (hook.callable())(&mut current.record, &arguments).map_err(|source| DispatchError::Hook {
            type_name: command.type_name().to_owned(),
            method: hook.method().to_owned(),
            phase,
            source,
            suppressed: Vec::new(),
        })
    }
}
