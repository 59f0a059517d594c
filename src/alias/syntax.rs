//! Alias argument syntax: `<required> [optional] <rest...>`.

use crate::alias::variables::VariableContext;
use crate::alias::CommandError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxParam {
    pub name: String,
    pub required: bool,
    /// Takes the remainder of the line, spaces included.
    pub rest: bool,
}

pub fn parse_syntax(syntax: &str) -> Result<Vec<SyntaxParam>, CommandError> {
    let invalid = || CommandError::InvalidSyntax(syntax.to_string());
    let mut params: Vec<SyntaxParam> = Vec::new();

    for token in syntax.split_whitespace() {
        if params.last().is_some_and(|p| p.rest) {
            return Err(invalid());
        }
        let (inner, required) = if let Some(t) = token.strip_prefix('<') {
            (t.strip_suffix('>').ok_or_else(invalid)?, true)
        } else if let Some(t) = token.strip_prefix('[') {
            (t.strip_suffix(']').ok_or_else(invalid)?, false)
        } else {
            return Err(invalid());
        };
        if required && params.iter().any(|p| !p.required) {
            return Err(invalid());
        }
        let (name, rest) = match inner.strip_suffix("...") {
            Some(name) => (name, true),
            None => (inner, false),
        };
        if name.is_empty() {
            return Err(invalid());
        }
        params.push(SyntaxParam {
            name: name.to_string(),
            required,
            rest,
        });
    }
    Ok(params)
}

/// Split `args` according to `params` and store each value in `vars`.
/// Optional parameters that are not supplied are bound to an empty string.
pub fn bind(
    alias: &str,
    params: &[SyntaxParam],
    args: &str,
    vars: &mut VariableContext,
) -> Result<(), CommandError> {
    let mut remaining = args.trim();
    for param in params {
        let value = if param.rest {
            std::mem::take(&mut remaining)
        } else {
            let (word, tail) = remaining
                .split_once(char::is_whitespace)
                .unwrap_or((remaining, ""));
            remaining = tail.trim_start();
            word
        };
        if value.is_empty() {
            if param.required {
                return Err(CommandError::MissingArgument {
                    alias: alias.to_string(),
                    name: param.name.clone(),
                });
            }
        }
        vars.set(&param.name, value);
    }
    if !remaining.is_empty() {
        return Err(CommandError::TooManyArguments {
            alias: alias.to_string(),
        });
    }
    Ok(())
}
