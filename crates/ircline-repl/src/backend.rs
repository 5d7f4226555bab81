//! Offline backend: answers the way a server would, without a network.

use std::collections::BTreeSet;
use std::sync::mpsc::Sender;

use ircline_core::{BackendError, ClientEvent, ConnectParams, Connector, MessagingBackend};

const NAMES_COMMAND: &str = "NAMES";

pub(crate) struct LoopbackConnector {
    events: Sender<ClientEvent>,
}

impl LoopbackConnector {
    pub(crate) fn new(events: Sender<ClientEvent>) -> Self {
        Self { events }
    }
}

impl Connector for LoopbackConnector {
    fn connect(&mut self, params: &ConnectParams) -> Result<Box<dyn MessagingBackend>, BackendError> {
        let port = params.server.rsplit_once(':').map(|(_, port)| port);
        if port.and_then(|p| p.parse::<u16>().ok()).is_none() {
            return Err(BackendError::Rejected("expected host:port".to_string()));
        }
        tracing::info!(server = %params.server, nick = %params.nick, tls = params.tls, "loopback connect");
        Ok(Box::new(LoopbackBackend {
            nick: params.nick.clone(),
            events: self.events.clone(),
            channels: BTreeSet::new(),
        }))
    }
}

struct LoopbackBackend {
    nick: String,
    events: Sender<ClientEvent>,
    channels: BTreeSet<String>,
}

impl LoopbackBackend {
    fn emit(&self, event: ClientEvent) {
        // The receiver is gone only while the client shuts down.
        let _ = self.events.send(event);
    }

    fn names(&self, channel: &str) {
        if self.channels.contains(channel) {
            self.emit(ClientEvent::Names {
                channel: channel.to_string(),
                nicks: vec![self.nick.clone()],
            });
        } else {
            self.emit(ClientEvent::Notice(format!("{channel}: not on that channel")));
        }
    }
}

impl MessagingBackend for LoopbackBackend {
    fn nick(&self) -> &str {
        &self.nick
    }

    fn set_away(&mut self, text: Option<&str>) -> Result<(), BackendError> {
        tracing::debug!(?text, "away");
        Ok(())
    }

    fn join(&mut self, channel: &str) -> Result<(), BackendError> {
        self.channels.insert(channel.to_string());
        self.emit(ClientEvent::Joined {
            nick: self.nick.clone(),
            channel: channel.to_string(),
        });
        self.names(channel);
        Ok(())
    }

    fn part(&mut self, channel: &str) -> Result<(), BackendError> {
        self.channels.remove(channel);
        self.emit(ClientEvent::Parted {
            nick: self.nick.clone(),
            channel: channel.to_string(),
        });
        Ok(())
    }

    fn send_action(&mut self, target: &str, text: &str) -> Result<(), BackendError> {
        tracing::debug!(%target, len = text.len(), "action");
        Ok(())
    }

    fn send_privmsg(&mut self, target: &str, text: &str) -> Result<(), BackendError> {
        tracing::debug!(%target, len = text.len(), "privmsg");
        Ok(())
    }

    fn set_nick(&mut self, nick: &str) -> Result<(), BackendError> {
        let old = std::mem::replace(&mut self.nick, nick.to_string());
        self.emit(ClientEvent::NickChanged {
            old,
            new: nick.to_string(),
        });
        Ok(())
    }

    fn send_raw(&mut self, line: &str) -> Result<(), BackendError> {
        match line.split_once(' ') {
            Some((NAMES_COMMAND, channel)) => self.names(channel.trim()),
            _ => tracing::debug!(%line, "raw line ignored"),
        }
        Ok(())
    }

    fn whois(&mut self, nick: &str) -> Result<(), BackendError> {
        if nick == self.nick {
            self.emit(ClientEvent::Notice(format!("{nick} is you")));
        } else {
            self.emit(ClientEvent::Notice(format!("{nick}: no such nick")));
        }
        Ok(())
    }

    fn disconnect(&mut self, message: Option<&str>) -> Result<(), BackendError> {
        tracing::info!(?message, "loopback disconnect");
        self.channels.clear();
        Ok(())
    }
}
