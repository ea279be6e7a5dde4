//! Lifecycle hook selection.
//!
//! A hook's formals are matched against the ancestor chain (root first):
//! each formal takes the next assignable ancestor after the previous match,
//! and a hook whose formals cannot all be matched is not a candidate. Among
//! candidates the one with the most formals wins; a tie at the maximum is
//! ambiguous.

use crate::decl::{HookDecl, HookPhase};
use crate::error::ModelError;
use crate::model::Command;

/// Matches `formals` against `ancestors` and returns the chosen ancestor
/// indices, or `None` when some formal has no assignable ancestor left.
pub(crate) fn match_formals<S: AsRef<str>>(
    formals: &[S],
    ancestors: &[&Command],
) -> Option<Vec<usize>> {
    let mut next = 0;
    let mut indices = Vec::with_capacity(formals.len());
    for formal in formals {
        let remaining = ancestors.get(next..)?;
        let offset = remaining
            .iter()
            .position(|ancestor| ancestor.is_assignable_to(formal.as_ref()))?;
        let index = next + offset;
        indices.push(index);
        next = index + 1;
    }
    Some(indices)
}

/// Picks the best `phase` hook declared on `command` for its ancestors.
pub(crate) fn select<'d>(
    command: &Command,
    phase: HookPhase,
    declarations: &'d [HookDecl],
    ancestors: &[&Command],
) -> Result<Option<(&'d HookDecl, Vec<usize>)>, ModelError> {
    let mut best: Option<(&'d HookDecl, Vec<usize>)> = None;
    let mut ambiguity: Option<&'d HookDecl> = None;
    for declaration in declarations.iter().filter(|hook| hook.phase == phase) {
        let Some(indices) = match_formals(&declaration.formals, ancestors) else {
            continue;
        };
        let best_len = best.as_ref().map(|(_, current)| current.len());
        match best_len {
            Some(len) if indices.len() < len => {}
            Some(len) if indices.len() == len => ambiguity = Some(declaration),
            _ => {
                best = Some((declaration, indices));
                ambiguity = None;
            }
        }
    }
    if let (Some((chosen, _)), Some(other)) = (&best, ambiguity) {
        return Err(ModelError::ambiguous_hook(
            command.type_name(),
            phase,
            describe(chosen),
            describe(other),
        ));
    }
    Ok(best)
}

fn describe(hook: &HookDecl) -> String {
    format!("{}({})", hook.method, hook.formals.join(", "))
}
