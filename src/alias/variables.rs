//! `${name}` substitution for alias templates.

use crate::alias::CommandError;
use std::collections::HashMap;

pub const VAR_CHANNEL: &str = "channel";
pub const VAR_MYNICK: &str = "nick";
pub const VAR_ARGS: &str = "args";

/// Variables visible to one command invocation.
#[derive(Debug, Clone, Default)]
pub struct VariableContext {
    vars: HashMap<String, String>,
}

impl VariableContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, name: &str, value: impl Into<String>) {
        self.vars.insert(name.to_string(), value.into());
    }

    /// Like [`set`](Self::set), but an absent value leaves the name unset.
    pub fn set_opt(&mut self, name: &str, value: Option<&str>) {
        match value {
            Some(v) => self.set(name, v),
            None => {
                self.vars.remove(name);
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.vars.get(name).map(String::as_str)
    }

    pub fn expand(&self, template: &str) -> Result<String, CommandError> {
        let mut out = String::with_capacity(template.len());
        let mut rest = template;
        while let Some(start) = rest.find("${") {
            out.push_str(&rest[..start]);
            let after = &rest[start + 2..];
            let end = after
                .find('}')
                .ok_or_else(|| CommandError::UnterminatedVariable(template.to_string()))?;
            let name = &after[..end];
            let value = self
                .get(name)
                .ok_or_else(|| CommandError::UnknownVariable(name.to_string()))?;
            out.push_str(value);
            rest = &after[end + 1..];
        }
        out.push_str(rest);
        Ok(out)
    }
}
