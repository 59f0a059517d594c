//! Applying inbound protocol messages to connection state.

use crate::chat::format::strip_formatting;
use crate::config::nickname::is_nick_char;
use crate::irc::session::{
    ChatMessage, ConnectionData, ConnectionStatus, MessageKind, NickWithPrefix,
    ServerConnectionInfo,
};
use irc::client::prelude::{ChannelMode, Command, Message, Mode, Response};

/// Follow-up work collected while the state lock is held and performed
/// after it is released.
#[derive(Default)]
struct Effects {
    channels_changed: bool,
    unread: Option<(String, bool)>,
    forget: Vec<String>,
    renamed: Option<(String, String)>,
}

impl ServerConnectionInfo {
    pub fn handle_message(&self, message: &Message) {
        let source = message.source_nickname().unwrap_or("").to_string();
        let mut effects = Effects::default();
        {
            let mut data = self.write();
            apply(&mut data, &source, &message.command, &mut effects);
        }

        for channel in &effects.forget {
            self.notification_manager().forget(channel);
        }
        if let Some((old, new)) = &effects.renamed {
            self.notification_manager().rename(old, new);
        }
        if effects.channels_changed {
            self.fire_channel_list_changed();
        }
        if let Some((page, mention)) = effects.unread {
            self.notification_manager().on_message(&page, mention);
        }
    }
}

fn is_me(data: &ConnectionData, nick: &str) -> bool {
    data.nick.eq_ignore_ascii_case(nick)
}

fn apply(data: &mut ConnectionData, source: &str, command: &Command, fx: &mut Effects) {
    match command {
        Command::Response(Response::RPL_WELCOME, args) => {
            if let Some(nick) = args.first() {
                data.nick = nick.clone();
            }
            data.status = ConnectionStatus::Connected;
            let text = args.last().cloned().unwrap_or_default();
            data.push_message(None, ChatMessage::now("***", &text, MessageKind::System));
        }
        Command::Response(Response::RPL_ISUPPORT, args) => apply_isupport(data, args),
        Command::Response(Response::RPL_NAMREPLY, args) => {
            // <me> <symbol> <channel> :<names>
            if let (Some(channel), Some(names)) = (args.get(2), args.get(3)) {
                let prefixes = data.member_prefixes.clone();
                let members = data.members.entry(channel.to_lowercase()).or_default();
                for raw in names.split_whitespace() {
                    let member = NickWithPrefix::parse(raw, &prefixes);
                    match members.iter_mut().find(|m| m.nick == member.nick) {
                        Some(existing) => existing.prefix = member.prefix,
                        None => members.push(member),
                    }
                }
            }
        }
        Command::Response(Response::RPL_TOPIC, args) => {
            if let (Some(channel), Some(topic)) = (args.get(1), args.get(2)) {
                let text = format!("Topic: {}", topic);
                data.push_message(Some(channel.as_str()), ChatMessage::now("***", &text, MessageKind::System));
            }
        }
        Command::JOIN(chanlist, _, _) => {
            for channel in chanlist.split(',') {
                if is_me(data, source) {
                    if data.channel_index(channel).is_none() {
                        data.channels.push(channel.to_string());
                        fx.channels_changed = true;
                    }
                    data.members.insert(channel.to_lowercase(), Vec::new());
                } else if let Some(members) = data.members.get_mut(&channel.to_lowercase()) {
                    if !members.iter().any(|m| m.nick == source) {
                        members.push(NickWithPrefix::new(source, None));
                    }
                }
                let text = format!("{} has joined {}", source, channel);
                data.push_message(Some(channel), ChatMessage::now("-->", &text, MessageKind::Join));
            }
        }
        Command::PART(chanlist, reason) => {
            for channel in chanlist.split(',') {
                if is_me(data, source) {
                    leave_channel(data, channel, fx);
                } else {
                    remove_member(data, channel, source);
                    let text = match reason {
                        Some(r) => format!("{} has left ({})", source, r),
                        None => format!("{} has left", source),
                    };
                    data.push_message(Some(channel), ChatMessage::now("<--", &text, MessageKind::Part));
                }
            }
        }
        Command::KICK(channel, user, reason) => {
            if is_me(data, user) {
                leave_channel(data, channel, fx);
                let text = format!(
                    "Kicked from {} by {}: {}",
                    channel,
                    source,
                    reason.as_deref().unwrap_or("")
                );
                data.push_message(None, ChatMessage::now("!!!", &text, MessageKind::Error));
            } else {
                remove_member(data, channel, user);
                let text = format!("{} was kicked by {}", user, source);
                data.push_message(Some(channel.as_str()), ChatMessage::now("<--", &text, MessageKind::Part));
            }
        }
        Command::QUIT(reason) => {
            let text = format!("{} has quit ({})", source, reason.as_deref().unwrap_or(""));
            let channels = data.channels.clone();
            for channel in channels {
                let key = channel.to_lowercase();
                let was_member = data
                    .members
                    .get(&key)
                    .is_some_and(|m| m.iter().any(|n| n.nick == source));
                if was_member {
                    remove_member(data, &channel, source);
                    data.push_message(Some(channel.as_str()), ChatMessage::now("<--", &text, MessageKind::Quit));
                }
            }
        }
        Command::NICK(new_nick) => {
            if is_me(data, source) {
                data.nick = new_nick.clone();
                let text = format!("You are now known as {}", new_nick);
                data.push_message(None, ChatMessage::now("***", &text, MessageKind::System));
            }
            for members in data.members.values_mut() {
                for member in members.iter_mut().filter(|m| m.nick == source) {
                    member.nick = new_nick.clone();
                }
            }
            rename_query(data, source, new_nick, fx);
        }
        Command::ChannelMODE(channel, modes) => {
            apply_member_modes(data, channel, modes);
            if data.channel_index(channel).is_some() {
                let flags: Vec<String> = modes.iter().map(ToString::to_string).collect();
                let text = format!("{} sets mode {}", source, flags.join(" "));
                data.push_message(Some(channel.as_str()), ChatMessage::now("***", &text, MessageKind::System));
            }
        }
        Command::PRIVMSG(target, text) => {
            let (kind, body) = match text
                .strip_prefix("\x01ACTION ")
                .map(|rest| rest.trim_end_matches('\x01'))
            {
                Some(action) => (MessageKind::Action, action.to_string()),
                // Other CTCP requests are not shown
                None if text.starts_with('\x01') => return,
                None => (MessageKind::Normal, text.clone()),
            };
            let page = if data.is_channel_name(target) {
                target.clone()
            } else {
                // A private message opens a query page named after the sender.
                if data.channel_index(source).is_none() {
                    data.channels.push(source.to_string());
                    fx.channels_changed = true;
                }
                source.to_string()
            };
            let mention = !data.is_channel_name(target) || mentions_nick(&body, &data.nick);
            data.push_message(Some(page.as_str()), ChatMessage::now(source, &body, kind));
            fx.unread = Some((page, mention));
        }
        Command::NOTICE(target, text) => {
            let msg = ChatMessage::now(source, text, MessageKind::Notice);
            if data.is_channel_name(target) && data.channel_index(target).is_some() {
                data.push_message(Some(target.as_str()), msg);
                fx.unread = Some((target.clone(), false));
            } else {
                data.push_message(None, msg);
            }
        }
        Command::ERROR(text) => {
            data.push_message(None, ChatMessage::now("!!!", text, MessageKind::Error));
        }
        _ => {}
    }
}

fn apply_isupport(data: &mut ConnectionData, args: &[String]) {
    for token in args.iter().skip(1) {
        if let Some(types) = token.strip_prefix("CHANTYPES=") {
            if !types.is_empty() {
                data.channel_types = types.chars().collect();
            }
        } else if let Some(prefix) = token.strip_prefix("PREFIX=") {
            // PREFIX=(qaohv)~&@%+
            let parsed = prefix.strip_prefix('(').and_then(|p| p.split_once(')'));
            if let Some((modes, symbols)) = parsed {
                if !symbols.is_empty() && modes.chars().count() == symbols.chars().count() {
                    data.member_prefix_modes = modes.to_string();
                    data.member_prefixes = symbols.to_string();
                }
            }
        }
    }
}

/// Whether `text` names `nick` as a whole word, formatting codes ignored.
fn mentions_nick(text: &str, nick: &str) -> bool {
    !nick.is_empty()
        && strip_formatting(text)
            .split(|c: char| !is_nick_char(c))
            .any(|word| word.eq_ignore_ascii_case(nick))
}

/// Apply `+o`, `-v` and the other member modes advertised in `PREFIX`.
/// A member keeps only their highest prefix.
fn apply_member_modes(data: &mut ConnectionData, channel: &str, modes: &[Mode<ChannelMode>]) {
    let key = channel.to_lowercase();
    for mode in modes {
        let (adding, flag, nick) = match mode {
            Mode::Plus(flag, Some(nick)) => (true, flag, nick),
            Mode::Minus(flag, Some(nick)) => (false, flag, nick),
            _ => continue,
        };
        let Some(symbol) = flag
            .to_string()
            .chars()
            .next()
            .and_then(|c| data.prefix_for_mode(c))
        else {
            continue;
        };
        let current = match data
            .members
            .get(&key)
            .and_then(|members| members.iter().find(|m| m.nick.eq_ignore_ascii_case(nick)))
        {
            Some(member) => member.prefix,
            None => continue,
        };
        let updated = match (adding, current) {
            (true, Some(p)) if data.prefix_rank(p) <= data.prefix_rank(symbol) => Some(p),
            (true, _) => Some(symbol),
            (false, Some(p)) if p == symbol => None,
            (false, other) => other,
        };
        if let Some(member) = data
            .members
            .get_mut(&key)
            .and_then(|members| members.iter_mut().find(|m| m.nick.eq_ignore_ascii_case(nick)))
        {
            member.prefix = updated;
        }
    }
}

/// Follow a query partner's nick change so their page keeps its history.
fn rename_query(data: &mut ConnectionData, old: &str, new: &str, fx: &mut Effects) {
    let Some(idx) = data.channel_index(old) else {
        return;
    };
    if data.channel_index(new).is_some_and(|other| other != idx) {
        return;
    }
    data.channels[idx] = new.to_string();
    if let Some(log) = data.channel_logs.remove(&old.to_lowercase()) {
        data.channel_logs.insert(new.to_lowercase(), log);
    }
    let text = format!("{} is now known as {}", old, new);
    data.push_message(Some(new), ChatMessage::now("***", &text, MessageKind::System));
    fx.channels_changed = true;
    fx.renamed = Some((old.to_string(), new.to_string()));
}

fn leave_channel(data: &mut ConnectionData, channel: &str, fx: &mut Effects) {
    if let Some(idx) = data.channel_index(channel) {
        data.channels.remove(idx);
        data.members.remove(&channel.to_lowercase());
        fx.channels_changed = true;
        fx.forget.push(channel.to_string());
    }
}

fn remove_member(data: &mut ConnectionData, channel: &str, nick: &str) {
    if let Some(members) = data.members.get_mut(&channel.to_lowercase()) {
        members.retain(|m| m.nick != nick);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::irc::api::testing::RecordingApi;
    use std::sync::{Arc, Mutex};

    fn info() -> ServerConnectionInfo {
        info_as("me")
    }

    fn info_as(nick: &str) -> ServerConnectionInfo {
        ServerConnectionInfo::new(0, "test", ConnectionData::shared(nick, 100), RecordingApi::new())
    }

    fn prefix_of(info: &ServerConnectionInfo, channel: &str, nick: &str) -> Option<char> {
        info.channel_members(channel)
            .and_then(|members| members.into_iter().find(|m| m.nick == nick))
            .and_then(|m| m.prefix)
    }

    fn msg(prefix: &str, command: &str, args: Vec<&str>) -> Message {
        Message::new(Some(prefix), command, args).expect("valid message")
    }

    #[test]
    fn test_self_join_adds_channel_and_notifies() {
        let info = info();
        let changes = Arc::new(Mutex::new(0));
        let sink = Arc::clone(&changes);
        info.add_on_channel_list_change_listener(move |_| *sink.lock().unwrap() += 1);

        info.handle_message(&msg("me!m@host", "JOIN", vec!["#rust"]));
        info.handle_message(&msg("alice!a@host", "JOIN", vec!["#rust"]));

        assert_eq!(info.channels(), vec!["#rust".to_string()]);
        assert_eq!(*changes.lock().unwrap(), 1);
        assert_eq!(
            info.channel_members("#rust"),
            Some(vec![NickWithPrefix::new("alice", None)])
        );
    }

    #[test]
    fn test_names_reply_and_part() {
        let info = info();
        info.handle_message(&msg("me!m@host", "JOIN", vec!["#rust"]));
        info.handle_message(&msg("server", "353", vec!["me", "=", "#rust", "@alice +bob me"]));
        let members = info.channel_members("#rust").unwrap();
        assert_eq!(members.len(), 3);
        assert_eq!(members[0], NickWithPrefix::new("alice", Some('@')));

        info.handle_message(&msg("bob!b@host", "PART", vec!["#rust"]));
        assert_eq!(info.channel_members("#rust").unwrap().len(), 2);

        info.handle_message(&msg("me!m@host", "PART", vec!["#rust"]));
        assert!(info.channels().is_empty());
        assert!(info.channel_members("#rust").is_none());
    }

    #[test]
    fn test_privmsg_counts_unread_and_opens_query() {
        let info = info();
        info.handle_message(&msg("me!m@host", "JOIN", vec!["#rust"]));
        info.handle_message(&msg("alice!a@host", "PRIVMSG", vec!["#rust", "hello me"]));
        info.handle_message(&msg("bob!b@host", "PRIVMSG", vec!["me", "psst"]));

        let notifications = info.notification_manager();
        assert_eq!(notifications.unread_count("#rust"), 1);
        assert!(notifications.has_mention("#rust"));
        assert_eq!(info.channels(), vec!["#rust".to_string(), "bob".to_string()]);
        assert_eq!(info.messages(Some("bob"))[0].text, "psst");
    }

    #[test]
    fn test_channel_mode_updates_member_prefix() {
        let info = info_as("ann");
        info.handle_message(&msg("ann!a@host", "JOIN", vec!["#rust"]));
        info.handle_message(&msg("server", "353", vec!["ann", "=", "#rust", "alice ann"]));

        info.handle_message(&msg("op!o@host", "MODE", vec!["#rust", "+o", "alice"]));
        assert_eq!(prefix_of(&info, "#rust", "alice"), Some('@'));

        // A lower mode does not replace a higher one.
        info.handle_message(&msg("op!o@host", "MODE", vec!["#rust", "+v", "alice"]));
        assert_eq!(prefix_of(&info, "#rust", "alice"), Some('@'));

        info.handle_message(&msg("op!o@host", "MODE", vec!["#rust", "-o+v", "alice", "ann"]));
        assert_eq!(prefix_of(&info, "#rust", "alice"), None);
        assert_eq!(prefix_of(&info, "#rust", "ann"), Some('+'));

        // Non-member modes leave members alone.
        info.handle_message(&msg("op!o@host", "MODE", vec!["#rust", "+m"]));
        assert_eq!(prefix_of(&info, "#rust", "ann"), Some('+'));
        let last = info.messages(Some("#rust")).pop().map(|m| m.text);
        assert_eq!(last.as_deref(), Some("op sets mode +m"));
    }

    #[test]
    fn test_mode_follows_advertised_prefixes() {
        let info = info_as("ann");
        info.handle_message(&msg("server", "005", vec!["ann", "PREFIX=(qov)!@+", "are supported"]));
        info.handle_message(&msg("ann!a@host", "JOIN", vec!["#rust"]));
        info.handle_message(&msg("server", "353", vec!["ann", "=", "#rust", "alice !bob"]));
        assert_eq!(prefix_of(&info, "#rust", "bob"), Some('!'));

        info.handle_message(&msg("op!o@host", "MODE", vec!["#rust", "+q", "alice"]));
        assert_eq!(prefix_of(&info, "#rust", "alice"), Some('!'));

        // Halfop is not advertised here.
        info.handle_message(&msg("op!o@host", "MODE", vec!["#rust", "+h", "bob"]));
        assert_eq!(prefix_of(&info, "#rust", "bob"), Some('!'));
    }

    #[test]
    fn test_names_reply_refreshes_prefixes() {
        let info = info();
        info.handle_message(&msg("me!m@host", "JOIN", vec!["#rust"]));
        info.handle_message(&msg("server", "353", vec!["me", "=", "#rust", "@alice bob"]));
        info.handle_message(&msg("server", "353", vec!["me", "=", "#rust", "alice +bob"]));

        let members = info.channel_members("#rust").unwrap();
        assert_eq!(members.len(), 2);
        assert_eq!(prefix_of(&info, "#rust", "alice"), None);
        assert_eq!(prefix_of(&info, "#rust", "bob"), Some('+'));
    }

    #[test]
    fn test_mention_needs_whole_nick() {
        let info = info_as("ann");
        info.handle_message(&msg("ann!a@host", "JOIN", vec!["#rust"]));
        info.handle_message(&msg("alice!a@host", "PRIVMSG", vec!["#rust", "nice banner"]));
        assert!(!info.notification_manager().has_mention("#rust"));

        info.handle_message(&msg("alice!a@host", "PRIVMSG", vec!["#rust", "\x02Ann\x02: ping"]));
        assert!(info.notification_manager().has_mention("#rust"));
    }

    #[test]
    fn test_query_follows_nick_change() {
        let info = info();
        let changes = Arc::new(Mutex::new(0));
        let sink = Arc::clone(&changes);
        info.add_on_channel_list_change_listener(move |_| *sink.lock().unwrap() += 1);

        info.handle_message(&msg("bob!b@host", "PRIVMSG", vec!["me", "psst"]));
        info.handle_message(&msg("bob!b@host", "NICK", vec!["bobby"]));
        info.handle_message(&msg("bobby!b@host", "PRIVMSG", vec!["me", "still here"]));

        assert_eq!(info.channels(), vec!["bobby".to_string()]);
        assert_eq!(*changes.lock().unwrap(), 2);
        let texts: Vec<String> = info.messages(Some("bobby")).into_iter().map(|m| m.text).collect();
        assert_eq!(texts, vec!["psst", "bob is now known as bobby", "still here"]);
        assert_eq!(info.notification_manager().unread_count("bobby"), 2);
        assert_eq!(info.notification_manager().unread_count("bob"), 0);
    }

    #[test]
    fn test_isupport_updates_channel_types() {
        let info = info();
        info.handle_message(&msg(
            "server",
            "005",
            vec!["me", "CHANTYPES=#!", "PREFIX=(ov)@+", "are supported by this server"],
        ));
        assert_eq!(info.channel_types(), vec!['#', '!']);
    }

    #[test]
    fn test_own_nick_change() {
        let info = info();
        info.handle_message(&msg("me!m@host", "NICK", vec!["me_"]));
        assert_eq!(info.user_nick(), "me_");
    }
}
