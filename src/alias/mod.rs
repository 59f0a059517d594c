//! Slash-command aliases.
//!
//! Every `/command` typed into the composer is looked up in a table of
//! [`CommandAlias`] entries: the built-in defaults below, overridden by
//! user aliases from the config file. The alias template is expanded
//! against a [`VariableContext`] and executed through a [`ChatApi`].

pub mod syntax;
pub mod variables;

pub use variables::{VariableContext, VAR_ARGS, VAR_CHANNEL, VAR_MYNICK};

use crate::irc::api::{ApiError, ChatApi};
use serde::{Deserialize, Serialize};
use syntax::SyntaxParam;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CommandError {
    #[error("/{alias}: missing argument <{name}>")]
    MissingArgument { alias: String, name: String },
    #[error("/{alias}: too many arguments")]
    TooManyArguments { alias: String },
    #[error("unknown variable ${{{0}}}")]
    UnknownVariable(String),
    #[error("unterminated variable in {0:?}")]
    UnterminatedVariable(String),
    #[error("invalid alias syntax {0:?}")]
    InvalidSyntax(String),
    #[error("command contains a line break or NUL")]
    UnsafeCommand,
    #[error(transparent)]
    Send(#[from] ApiError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AliasMode {
    /// The expanded template is sent as a raw protocol line.
    #[default]
    Raw,
    /// The expanded template is sent as a message to `${channel}`.
    Message,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandAlias {
    pub name: String,
    #[serde(default)]
    pub syntax: String,
    #[serde(default)]
    pub mode: AliasMode,
    pub text: String,
}

impl CommandAlias {
    pub fn new(name: &str, syntax: &str, mode: AliasMode, text: &str) -> Self {
        Self {
            name: name.to_string(),
            syntax: syntax.to_string(),
            mode,
            text: text.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandOutcome {
    Executed,
    NotFound,
}

const DEFAULT_ALIASES: &[(&str, &str, AliasMode, &str)] = &[
    ("join", "<channel> [key]", AliasMode::Raw, "JOIN ${channel} ${key}"),
    ("part", "[reason...]", AliasMode::Raw, "PART ${channel} :${reason}"),
    ("msg", "<channel> <text...>", AliasMode::Message, "${text}"),
    ("me", "<text...>", AliasMode::Raw, "PRIVMSG ${channel} :\x01ACTION ${text}\x01"),
    ("nick", "<newnick>", AliasMode::Raw, "NICK ${newnick}"),
    ("topic", "[topic...]", AliasMode::Raw, "TOPIC ${channel} :${topic}"),
    ("kick", "<user> [reason...]", AliasMode::Raw, "KICK ${channel} ${user} :${reason}"),
    ("whois", "<user>", AliasMode::Raw, "WHOIS ${user}"),
    ("notice", "<target> <text...>", AliasMode::Raw, "NOTICE ${target} :${text}"),
    ("op", "<user>", AliasMode::Raw, "MODE ${channel} +o ${user}"),
    ("deop", "<user>", AliasMode::Raw, "MODE ${channel} -o ${user}"),
    ("voice", "<user>", AliasMode::Raw, "MODE ${channel} +v ${user}"),
    ("devoice", "<user>", AliasMode::Raw, "MODE ${channel} -v ${user}"),
    ("away", "[message...]", AliasMode::Raw, "AWAY :${message}"),
    ("quote", "<command...>", AliasMode::Raw, "${command}"),
    ("raw", "<command...>", AliasMode::Raw, "${command}"),
    ("quit", "[message...]", AliasMode::Raw, "QUIT :${message}"),
];

struct RegisteredAlias {
    alias: CommandAlias,
    params: Vec<SyntaxParam>,
}

pub struct CommandAliasManager {
    aliases: Vec<RegisteredAlias>,
}

impl CommandAliasManager {
    /// Build the alias table. User aliases replace defaults of the same name;
    /// user aliases with a malformed syntax string are skipped.
    pub fn new(user_aliases: &[CommandAlias]) -> Self {
        let mut aliases: Vec<RegisteredAlias> = Vec::new();
        for alias in Self::default_aliases().into_iter().chain(user_aliases.iter().cloned()) {
            let params = match syntax::parse_syntax(&alias.syntax) {
                Ok(params) => params,
                Err(e) => {
                    tracing::warn!(alias = %alias.name, error = %e, "ignoring alias");
                    continue;
                }
            };
            aliases.retain(|a| !a.alias.name.eq_ignore_ascii_case(&alias.name));
            aliases.push(RegisteredAlias { alias, params });
        }
        Self { aliases }
    }

    pub fn default_aliases() -> Vec<CommandAlias> {
        DEFAULT_ALIASES
            .iter()
            .map(|(name, syntax, mode, text)| CommandAlias::new(name, syntax, *mode, text))
            .collect()
    }

    fn find(&self, name: &str) -> Option<&RegisteredAlias> {
        self.aliases
            .iter()
            .find(|a| a.alias.name.eq_ignore_ascii_case(name))
    }

    /// Alias names in registration order, used for command completion.
    pub fn alias_names(&self) -> Vec<&str> {
        self.aliases.iter().map(|a| a.alias.name.as_str()).collect()
    }

    /// Run `command` (the typed line without its leading `/`).
    pub fn process_command(
        &self,
        api: &dyn ChatApi,
        command: &str,
        vars: &VariableContext,
    ) -> Result<CommandOutcome, CommandError> {
        let command = command.trim_start();
        let (name, args) = command
            .split_once(char::is_whitespace)
            .unwrap_or((command, ""));
        let Some(entry) = self.find(name) else {
            return Ok(CommandOutcome::NotFound);
        };
        let alias_name = entry.alias.name.as_str();

        let mut vars = vars.clone();
        vars.set(VAR_ARGS, args.trim());
        syntax::bind(alias_name, &entry.params, args, &mut vars)?;

        let expanded = vars.expand(&entry.alias.text)?;
        let expanded = expanded.strip_suffix(" :").unwrap_or(&expanded).trim_end();
        if expanded.contains(['\r', '\n', '\0']) {
            return Err(CommandError::UnsafeCommand);
        }

        match entry.alias.mode {
            AliasMode::Raw => api.send_command_raw(expanded)?,
            AliasMode::Message => {
                let target = vars.get(VAR_CHANNEL).ok_or_else(|| CommandError::MissingArgument {
                    alias: alias_name.to_string(),
                    name: VAR_CHANNEL.to_string(),
                })?;
                api.send_message(target, expanded)?;
            }
        }
        tracing::debug!(alias = alias_name, "alias executed");
        Ok(CommandOutcome::Executed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::irc::api::testing::{RecordingApi, SentCall};

    fn vars(channel: Option<&str>) -> VariableContext {
        let mut vars = VariableContext::new();
        vars.set_opt(VAR_CHANNEL, channel);
        vars.set(VAR_MYNICK, "ferris");
        vars
    }

    fn run(command: &str, channel: Option<&str>) -> (Result<CommandOutcome, CommandError>, Vec<SentCall>) {
        let api = RecordingApi::new();
        let manager = CommandAliasManager::new(&[]);
        let result = manager.process_command(api.as_ref(), command, &vars(channel));
        (result, api.calls())
    }

    #[test]
    fn test_default_aliases_expand() {
        let (result, calls) = run("join #tokio", Some("#rust"));
        assert!(matches!(result, Ok(CommandOutcome::Executed)));
        assert_eq!(calls, vec![SentCall::Raw("JOIN #tokio".into())]);

        let (_, calls) = run("part", Some("#rust"));
        assert_eq!(calls, vec![SentCall::Raw("PART #rust".into())]);

        let (_, calls) = run("kick troll be nice", Some("#rust"));
        assert_eq!(calls, vec![SentCall::Raw("KICK #rust troll :be nice".into())]);

        let (_, calls) = run("ME waves", Some("#rust"));
        assert_eq!(
            calls,
            vec![SentCall::Raw("PRIVMSG #rust :\x01ACTION waves\x01".into())]
        );
    }

    #[test]
    fn test_message_mode_sends_to_bound_channel() {
        let (_, calls) = run("msg alice hi there", Some("#rust"));
        assert_eq!(
            calls,
            vec![SentCall::Message {
                channel: "alice".into(),
                text: "hi there".into()
            }]
        );
    }

    #[test]
    fn test_unknown_alias_is_not_found() {
        let (result, calls) = run("nonexistentcmd arg", Some("#rust"));
        assert!(matches!(result, Ok(CommandOutcome::NotFound)));
        assert!(calls.is_empty());
    }

    #[test]
    fn test_errors_send_nothing() {
        let (result, calls) = run("join", Some("#rust"));
        assert!(matches!(result, Err(CommandError::MissingArgument { .. })));
        assert!(calls.is_empty());

        // No current channel on the status page.
        let (result, _) = run("part bye", None);
        assert!(matches!(result, Err(CommandError::UnknownVariable(name)) if name == "channel"));
    }

    #[test]
    fn test_user_alias_overrides_default() {
        let api = RecordingApi::new();
        let manager = CommandAliasManager::new(&[
            CommandAlias::new("JOIN", "<channel>", AliasMode::Raw, "JOIN ${channel} secret"),
            CommandAlias::new("hello", "", AliasMode::Message, "hello from ${nick}"),
            CommandAlias::new("broken", "<a", AliasMode::Raw, "X"),
        ]);
        assert_eq!(
            manager.alias_names().iter().filter(|n| n.eq_ignore_ascii_case("join")).count(),
            1
        );
        assert!(!manager.alias_names().contains(&"broken"));

        manager.process_command(api.as_ref(), "join #a", &vars(Some("#rust"))).unwrap();
        manager.process_command(api.as_ref(), "hello", &vars(Some("#rust"))).unwrap();
        assert_eq!(
            api.calls(),
            vec![
                SentCall::Raw("JOIN #a secret".into()),
                SentCall::Message {
                    channel: "#rust".into(),
                    text: "hello from ferris".into()
                },
            ]
        );
    }

    #[test]
    fn test_unsafe_command_rejected() {
        let api = RecordingApi::new();
        let manager = CommandAliasManager::new(&[]);
        let mut vars = vars(Some("#rust"));
        vars.set(VAR_CHANNEL, "#rust\r\nQUIT");
        let result = manager.process_command(api.as_ref(), "part", &vars);
        assert!(matches!(result, Err(CommandError::UnsafeCommand)));
        assert!(api.calls().is_empty());
    }
}
