use crate::format::incoming;
use crate::session::Session;

/// Mode prefixes a server puts in front of nicks in a names reply.
const NICK_MODE_PREFIXES: &[char] = &['@', '+', '%', '~', '&'];

/// Something the messaging backend observed on the connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientEvent {
    Message {
        from: String,
        target: String,
        text: String,
        action: bool,
    },
    Joined { nick: String, channel: String },
    Parted { nick: String, channel: String },
    Quit { nick: String, reason: Option<String> },
    NickChanged { old: String, new: String },
    Names { channel: String, nicks: Vec<String> },
    Notice(String),
    Disconnected(String),
}

pub(crate) fn apply(session: &mut Session, event: ClientEvent) {
    let own = session.own_nick().map(str::to_string);
    let is_own = |nick: &str| own.as_deref() == Some(nick);

    match event {
        ClientEvent::Message { from, target, text, action } => {
            session.completion.nicks.insert(&from);
            // Private messages are shown under whoever sent them.
            let shown_under = if is_own(&target) { &from } else { &target };
            let line = incoming(&from, shown_under, &text, action);
            session.message(&line);
        }
        ClientEvent::Joined { nick, channel } => {
            if is_own(&nick) {
                session.completion.channels.insert(&channel);
            } else {
                session.completion.nicks.insert(&nick);
            }
            if session.status_events {
                session.message(&format!("{nick} has joined {channel}"));
            }
        }
        ClientEvent::Parted { nick, channel } => {
            if is_own(&nick) {
                session.completion.channels.remove(&channel);
            }
            if session.status_events {
                session.message(&format!("{nick} has left {channel}"));
            }
        }
        ClientEvent::Quit { nick, reason } => {
            session.completion.nicks.remove(&nick);
            if session.status_events {
                match reason {
                    Some(reason) => session.message(&format!("{nick} has quit ({reason})")),
                    None => session.message(&format!("{nick} has quit")),
                }
            }
        }
        ClientEvent::NickChanged { old, new } => {
            session.completion.nicks.rename(&old, &new);
            if session.status_events || is_own(&old) || is_own(&new) {
                session.message(&format!("{old} is now known as {new}"));
            }
        }
        ClientEvent::Names { channel, nicks } => {
            let names: Vec<&str> = nicks
                .iter()
                .map(|n| n.trim_start_matches(NICK_MODE_PREFIXES))
                .filter(|n| !n.is_empty())
                .collect();
            for name in &names {
                session.completion.nicks.insert(name);
            }
            session.message(&format!("{channel}: {}", names.join(" ")));
        }
        ClientEvent::Notice(text) => session.message(&text),
        ClientEvent::Disconnected(reason) => {
            tracing::info!("backend disconnected: {}", reason);
            session.backend = None;
            session.warn(&format!("Disconnected: {reason}"));
        }
    }
}
