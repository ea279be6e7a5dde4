//! Parameter-name substitutions for parameter groups.

use std::iter::Peekable;
use std::str::Chars;

use regex::Regex;

use crate::decl::SubstitutionDecl;
use crate::error::ModelError;

/// A compiled substitution: names fully matching the pattern are rewritten.
#[derive(Debug, Clone)]
pub(crate) struct NameSubstitution {
    full: Regex,
    pattern: Regex,
    replacement: String,
}

impl NameSubstitution {
    pub(crate) fn compile(declaration: &SubstitutionDecl) -> Result<Self, ModelError> {
        let invalid = |source: regex::Error| ModelError::InvalidSubstitution {
            pattern: declaration.pattern.clone(),
            source: Box::new(source),
        };
        let full = Regex::new(&format!("^(?:{})$", declaration.pattern)).map_err(invalid)?;
        let pattern = Regex::new(&declaration.pattern).map_err(invalid)?;
        let replacement = expansion(declaration, &pattern)?;
        Ok(Self {
            full,
            pattern,
            replacement,
        })
    }

    pub(crate) fn apply(&self, name: &str) -> String {
        if self.full.is_match(name) {
            self.pattern
                .replace_all(name, self.replacement.as_str())
                .into_owned()
        } else {
            name.to_owned()
        }
    }
}

/// Rewrites a replacement into the `regex` crate's expansion syntax.
///
/// `$<digits>` takes the longest run of digits that still names an existing
/// group, so `$1x` is group 1 followed by `x`. `${name}` names a group,
/// `\` escapes the next character and any other `$` is rejected.
fn expansion(declaration: &SubstitutionDecl, pattern: &Regex) -> Result<String, ModelError> {
    let unknown = |group: String| ModelError::UnknownSubstitutionGroup {
        pattern: declaration.pattern.clone(),
        replacement: declaration.replacement.clone(),
        group,
    };
    let mut rewritten = String::with_capacity(declaration.replacement.len());
    let mut chars = declaration.replacement.chars().peekable();
    while let Some(current) = chars.next() {
        match current {
            '\\' => match chars.next() {
                Some('$') => rewritten.push_str("$$"),
                Some(escaped) => rewritten.push(escaped),
                None => rewritten.push('\\'),
            },
            '$' => {
                let group = match chars.peek() {
                    Some('{') => {
                        chars.next();
                        named_group(&mut chars, pattern).map_err(unknown)?
                    }
                    Some(digit) if digit.is_ascii_digit() => {
                        numbered_group(&mut chars, pattern.captures_len()).map_err(unknown)?
                    }
                    _ => return Err(unknown(String::new())),
                };
                rewritten.push_str("${");
                rewritten.push_str(&group);
                rewritten.push('}');
            }
            other => rewritten.push(other),
        }
    }
    Ok(rewritten)
}

fn named_group(chars: &mut Peekable<Chars<'_>>, pattern: &Regex) -> Result<String, String> {
    let mut name = String::new();
    let mut closed = false;
    for next in chars.by_ref() {
        if next == '}' {
            closed = true;
            break;
        }
        name.push(next);
    }
    let known = pattern.capture_names().flatten().any(|group| group == name);
    if closed && known { Ok(name) } else { Err(name) }
}

fn numbered_group(chars: &mut Peekable<Chars<'_>>, group_count: usize) -> Result<String, String> {
    let mut digits = String::new();
    let mut group = 0_usize;
    while let Some(&digit) = chars.peek() {
        let Some(value) = digit.to_digit(10) else {
            break;
        };
        let extended = group
            .saturating_mul(10)
            .saturating_add(usize::try_from(value).unwrap_or_default());
        if !digits.is_empty() && extended >= group_count {
            break;
        }
        group = extended;
        digits.push(digit);
        chars.next();
    }
    if group < group_count { Ok(digits) } else { Err(digits) }
}

/// Applies every substitution in order to `name`.
pub(crate) fn substitute(name: &str, substitutions: &[NameSubstitution]) -> String {
    substitutions
        .iter()
        .fold(name.to_owned(), |current, substitution| {
            substitution.apply(&current)
        })
}
