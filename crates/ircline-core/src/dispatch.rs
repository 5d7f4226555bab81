use crate::backend::ConnectParams;
use crate::format::incoming;
use crate::registry::{self, CommandKind};
use crate::session::{Session, NO_TARGET};
use crate::tokenize::Fields;

pub(crate) const BLOCKED: &str = "Command blocked by configuration.";

/// Run one submitted command line. Every failure is reported through the
/// session's output; nothing is returned.
pub fn dispatch(session: &mut Session, line: &str) {
    let fields = Fields::split(line);
    let Some(name) = fields.get(0) else {
        return;
    };

    if session.blocked.is_blocked(name) {
        tracing::debug!("blocked command {}", name);
        session.info(BLOCKED);
        return;
    }

    let Some(cmd) = registry::lookup(name) else {
        session.warn(&format!("Unknown command: {name}"));
        return;
    };
    tracing::debug!("dispatching {} with {} args", name, fields.len() - 1);

    match cmd.kind {
        CommandKind::None => {}
        CommandKind::Away => away(session, &fields),
        CommandKind::Help => help(session),
        CommandKind::TlsConnect => connect(session, &fields, true),
        CommandKind::Connect => connect(session, &fields, false),
        CommandKind::Quit => quit(session, &fields),
        CommandKind::Query => query(session, &fields),
        CommandKind::Join => join(session, &fields),
        CommandKind::Part => part(session, &fields),
        CommandKind::Whois => whois(session, &fields),
        CommandKind::Me => me(session, &fields),
        CommandKind::Msg => msg(session, &fields),
        CommandKind::Nick => nick(session, &fields),
        CommandKind::Names => names(session),
        CommandKind::Status => status(session),
    }
}

// ─── Session commands ───────────────────────────────────────────────────────

fn help(session: &mut Session) {
    for entry in registry::describe_all() {
        if !entry.name.is_empty() {
            session.message(&entry.render());
        }
    }
}

fn status(session: &mut Session) {
    session.status_events = !session.status_events;
    if session.status_events {
        session.info("Showing quits, joins, et cetera.");
    } else {
        session.info("Not showing quits, joins, et cetera.");
    }
}

fn connect(session: &mut Session, fields: &Fields, tls: bool) {
    if fields.len() < 3 {
        let name = if tls { "/tlsconnect" } else { "/connect" };
        session.warn(&format!("Use {name} server:port nick [server-pass]"));
        return;
    }

    let params = ConnectParams {
        server: fields.get(1).unwrap_or_default().to_string(),
        nick: fields.get(2).unwrap_or_default().to_string(),
        password: if fields.len() == 4 {
            fields.get(3).map(str::to_string)
        } else {
            None
        },
        tls,
    };

    if let Some(mut old) = session.backend.take() {
        if let Err(e) = old.disconnect(None) {
            tracing::warn!("failed to close previous connection: {}", e);
        }
    }

    match session.connector.connect(&params) {
        Ok(backend) => {
            tracing::info!(server = %params.server, nick = %params.nick, tls, "connected");
            session.backend = Some(backend);
            session.info(&format!("Connected to {} as {}.", params.server, params.nick));
        }
        Err(e) => {
            tracing::warn!(server = %params.server, "connect failed: {}", e);
            session.error(&format!("Couldn't connect to {}: {e}", params.server));
        }
    }
}

fn quit(session: &mut Session, fields: &Fields) {
    session.info("Quitting.");
    if let Some(mut backend) = session.backend.take() {
        if let Err(e) = backend.disconnect(fields.rest_from(1)) {
            tracing::warn!("disconnect failed: {}", e);
        }
    }
    tracing::info!("quit requested");
    session.quit_requested = true;
}

// ─── Backend commands ───────────────────────────────────────────────────────

fn away(session: &mut Session, fields: &Fields) {
    if !session.require_backend() {
        return;
    }

    match fields.rest_from(1) {
        Some(text) => {
            if session.backend_call(|b| b.set_away(Some(text))).is_some() {
                session.info("You have been marked as being away.");
            }
        }
        None => {
            if session.backend_call(|b| b.set_away(None)).is_some() {
                session.info("You are no longer marked as being away.");
            }
        }
    }
}

fn query(session: &mut Session, fields: &Fields) {
    if !session.require_backend() {
        return;
    }
    let (2, Some(target)) = (fields.len(), fields.get(1)) else {
        session.warn("Use /query <nick/channel>");
        return;
    };

    session.current_target = Some(target.to_string());
}

fn join(session: &mut Session, fields: &Fields) {
    if !session.require_backend() {
        return;
    }
    let (2, Some(channel)) = (fields.len(), fields.get(1)) else {
        session.warn("Use /join #channel");
        return;
    };

    if session.backend_call(|b| b.join(channel)).is_some() {
        session.current_target = Some(channel.to_string());
        session.completion.channels.insert(channel);
    }
}

fn part(session: &mut Session, fields: &Fields) {
    if !session.require_backend() {
        return;
    }
    let (2, Some(channel)) = (fields.len(), fields.get(1)) else {
        session.warn("Use /part #channel");
        return;
    };

    if session.backend_call(|b| b.part(channel)).is_some() {
        session.current_target = None;
        session.completion.channels.remove(channel);
    }
}

fn whois(session: &mut Session, fields: &Fields) {
    if !session.require_backend() {
        return;
    }
    let (2, Some(nick)) = (fields.len(), fields.get(1)) else {
        session.warn("Use /whois <nick>");
        return;
    };

    session.backend_call(|b| b.whois(nick));
}

fn me(session: &mut Session, fields: &Fields) {
    if !session.require_backend() {
        return;
    }
    let Some(text) = fields.rest_from(1) else {
        session.warn("Use /me action text");
        return;
    };
    let Some(target) = session.current_target.clone() else {
        session.warn(NO_TARGET);
        return;
    };

    if let Some(own) = session.backend_call(|b| {
        b.send_action(&target, text)?;
        Ok(b.nick().to_string())
    }) {
        session.message(&incoming(&own, &target, text, true));
    }
}

fn msg(session: &mut Session, fields: &Fields) {
    if !session.require_backend() {
        return;
    }
    let (Some(target), Some(text)) = (fields.get(1), fields.rest_from(2)) else {
        session.warn("Use /msg target message text");
        return;
    };

    if let Some(own) = session.backend_call(|b| {
        b.send_privmsg(target, text)?;
        Ok(b.nick().to_string())
    }) {
        session.message(&incoming(&own, target, text, false));
    }
}

fn nick(session: &mut Session, fields: &Fields) {
    if !session.require_backend() {
        return;
    }
    let (2, Some(new_nick)) = (fields.len(), fields.get(1)) else {
        session.warn("Use /nick newnick");
        return;
    };

    session.backend_call(|b| b.set_nick(new_nick));
}

fn names(session: &mut Session) {
    if !session.require_backend() {
        return;
    }
    let Some(target) = session.current_target.clone() else {
        session.warn(NO_TARGET);
        return;
    };

    session.backend_call(|b| b.send_raw(&format!("NAMES {target}")));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::NOT_CONNECTED;
    use crate::testing::{connected_session, session, session_with_blocked, texts, Call};

    #[test]
    fn test_join_adds_channel_and_part_removes_it() {
        let (mut session, recorder, _) = connected_session();
        assert!(!session.completion_state().channels.contains("#go"));

        session.handle_line("/join #go");
        assert!(session.completion_state().channels.contains("#go"));
        assert_eq!(session.current_target(), Some("#go"));

        session.handle_line("/part #go");
        assert!(!session.completion_state().channels.contains("#go"));
        assert_eq!(session.current_target(), None);

        assert_eq!(
            recorder.calls(),
            vec![Call::Join("#go".into()), Call::Part("#go".into())]
        );
    }

    #[test]
    fn test_msg_forwards_text_verbatim() {
        let (mut session, recorder, captured) = connected_session();
        session.handle_line("/msg bob hello   there");
        assert_eq!(
            recorder.calls(),
            vec![Call::Privmsg("bob".into(), "hello   there".into())]
        );
        assert_eq!(texts(&captured), vec!["bob <me> hello there"]);
    }

    #[test]
    fn test_msg_needs_text() {
        let (mut session, recorder, captured) = connected_session();
        session.handle_line("/msg bob");
        assert_eq!(texts(&captured), vec!["Use /msg target message text"]);
        assert!(recorder.calls().is_empty());
    }

    #[test]
    fn test_blocked_command_never_reaches_backend() {
        let (mut session, recorder, captured) = session_with_blocked(&["/connect", "/msg"]);
        session.handle_line("/connect irc.example.org:6667 me");
        assert_eq!(texts(&captured), vec![BLOCKED]);
        assert!(recorder.calls().is_empty());
        assert!(!session.is_connected());

        captured.clear();
        session.handle_line("/msg");
        assert_eq!(texts(&captured), vec![BLOCKED]);
    }

    #[test]
    fn test_quit_with_message() {
        let (mut session, recorder, captured) = connected_session();
        session.handle_line("/quit bye");
        assert!(session.quit_requested());
        assert!(!session.is_connected());
        assert_eq!(recorder.calls(), vec![Call::Disconnect(Some("bye".into()))]);
        assert_eq!(texts(&captured), vec!["Quitting."]);
    }

    #[test]
    fn test_quit_without_connection() {
        let (mut session, recorder, _) = session();
        session.handle_line("/quit");
        assert!(session.quit_requested());
        assert!(recorder.calls().is_empty());
    }

    #[test]
    fn test_quit_keeps_departure_spacing() {
        let (mut session, recorder, _) = connected_session();
        session.handle_line("/quit see  you later");
        assert_eq!(
            recorder.calls(),
            vec![Call::Disconnect(Some("see  you later".into()))]
        );
    }

    #[test]
    fn test_unknown_command() {
        let (mut session, _, captured) = session();
        session.handle_line("/frobnicate now");
        assert_eq!(texts(&captured), vec!["Unknown command: /frobnicate"]);

        captured.clear();
        session.handle_line("/JOIN #go");
        assert_eq!(texts(&captured), vec!["Unknown command: /JOIN"]);
    }

    #[test]
    fn test_commands_need_connection() {
        for line in [
            "/away", "/query bob", "/x bob", "/join #go", "/part #go", "/whois bob",
            "/me waves", "/msg bob hi", "/nick new", "/names",
        ] {
            let (mut session, recorder, captured) = session();
            session.handle_line(line);
            assert_eq!(texts(&captured), vec![NOT_CONNECTED], "{line}");
            assert!(recorder.calls().is_empty(), "{line}");
        }
    }

    #[test]
    fn test_usage_on_wrong_arity() {
        let cases = [
            ("/join", "Use /join #channel"),
            ("/join #a #b", "Use /join #channel"),
            ("/part", "Use /part #channel"),
            ("/whois", "Use /whois <nick>"),
            ("/query", "Use /query <nick/channel>"),
            ("/x a b", "Use /query <nick/channel>"),
            ("/me", "Use /me action text"),
            ("/nick", "Use /nick newnick"),
            ("/connect host:6667", "Use /connect server:port nick [server-pass]"),
            ("/tlsconnect", "Use /tlsconnect server:port nick [server-pass]"),
        ];
        for (line, usage) in cases {
            let (mut session, recorder, captured) = connected_session();
            session.handle_line(line);
            assert_eq!(texts(&captured), vec![usage], "{line}");
            assert!(recorder.calls().is_empty(), "{line}");
            assert_eq!(session.current_target(), None, "{line}");
        }
    }

    #[test]
    fn test_connect_with_password_and_tls() {
        let (mut session, recorder, captured) = session();
        session.handle_line("/tlsconnect irc.example.org:6697 me secret");
        assert_eq!(
            recorder.calls(),
            vec![Call::Connect(ConnectParams {
                server: "irc.example.org:6697".into(),
                nick: "me".into(),
                password: Some("secret".into()),
                tls: true,
            })]
        );
        assert_eq!(texts(&captured), vec!["Connected to irc.example.org:6697 as me."]);
        assert_eq!(session.own_nick(), Some("me"));
    }

    #[test]
    fn test_connect_ignores_password_with_extra_fields() {
        let (mut session, recorder, _) = session();
        session.handle_line("/connect host:6667 me pw extra");
        let Call::Connect(params) = &recorder.calls()[0] else {
            panic!("expected connect");
        };
        assert_eq!(params.password, None);
        assert!(!params.tls);
    }

    #[test]
    fn test_reconnect_closes_previous_backend() {
        let (mut session, recorder, _) = connected_session();
        session.handle_line("/connect other:6667 me2");
        let calls = recorder.calls();
        assert_eq!(calls[0], Call::Disconnect(None));
        assert!(matches!(calls[1], Call::Connect(_)));
        assert_eq!(session.own_nick(), Some("me2"));
    }

    #[test]
    fn test_connect_failure_reported() {
        let (mut session, recorder, captured) = session();
        recorder.refuse_connect();
        session.handle_line("/connect host:6667 me");
        assert!(!session.is_connected());
        assert_eq!(
            texts(&captured),
            vec!["error: Couldn't connect to host:6667: connection refused"]
        );
    }

    #[test]
    fn test_query_alias_sets_target() {
        let (mut session, recorder, _) = connected_session();
        session.handle_line("/x alice");
        assert_eq!(session.current_target(), Some("alice"));
        session.handle_line("/query #rust");
        assert_eq!(session.current_target(), Some("#rust"));
        assert!(recorder.calls().is_empty());
    }

    #[test]
    fn test_me_sends_action_to_target() {
        let (mut session, recorder, captured) = connected_session();
        session.handle_line("/me waves");
        assert_eq!(texts(&captured), vec![NO_TARGET]);

        session.handle_line("/join #rust");
        captured.clear();
        session.handle_line("/me  slaps  quite");
        assert_eq!(
            recorder.calls()[1],
            Call::Action("#rust".into(), "slaps  quite".into())
        );
        assert_eq!(texts(&captured), vec!["#rust [me slaps quite]"]);
    }

    #[test]
    fn test_names_uses_current_target() {
        let (mut session, recorder, _) = connected_session();
        session.handle_line("/join #rust");
        session.handle_line("/names");
        assert_eq!(recorder.calls()[1], Call::Raw("NAMES #rust".into()));
    }

    #[test]
    fn test_away_and_back() {
        let (mut session, recorder, captured) = connected_session();
        session.handle_line("/away gone  fishing");
        session.handle_line("/away");
        assert_eq!(
            recorder.calls(),
            vec![Call::Away(Some("gone  fishing".into())), Call::Away(None)]
        );
        assert_eq!(
            texts(&captured),
            vec![
                "You have been marked as being away.",
                "You are no longer marked as being away."
            ]
        );
    }

    #[test]
    fn test_whois_and_nick() {
        let (mut session, recorder, _) = connected_session();
        session.handle_line("/whois bob");
        session.handle_line("/nick newme");
        assert_eq!(
            recorder.calls(),
            vec![Call::Whois("bob".into()), Call::Nick("newme".into())]
        );
        assert_eq!(session.own_nick(), Some("newme"));
    }

    #[test]
    fn test_status_toggles() {
        let (mut session, _, captured) = session();
        session.handle_line("/status");
        assert!(!session.status_events());
        session.handle_line("/status");
        assert!(session.status_events());
        assert_eq!(
            texts(&captured),
            vec!["Not showing quits, joins, et cetera.", "Showing quits, joins, et cetera."]
        );
    }

    #[test]
    fn test_help_lists_every_command() {
        let (mut session, _, captured) = session();
        session.handle_line("/help");
        let lines = texts(&captured);
        // Long entries wrap onto indented continuation lines.
        let entries = lines.iter().filter(|l| !l.starts_with(' ')).count();
        assert_eq!(entries, registry::COMMANDS.len() - 1);
        assert_eq!(lines[0], "/away <text> - Toggle presence.");
        assert!(lines.contains(&"/msg <target> <message> - Send a message to a specific target.".to_string()));
    }

    #[test]
    fn test_failed_join_leaves_state_alone() {
        let (mut session, recorder, captured) = connected_session();
        recorder.fail_next();
        session.handle_line("/join #go");
        assert!(!session.completion_state().channels.contains("#go"));
        assert_eq!(session.current_target(), None);
        assert_eq!(texts(&captured), vec!["error: server said no"]);
    }
}
