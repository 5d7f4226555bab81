//! Recording backend and session fixtures for unit tests.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::backend::{ConnectParams, Connector, MessagingBackend};
use crate::config::BlockList;
use crate::error::BackendError;
use crate::output::{Captured, OutputMode, OutputSink};
use crate::session::Session;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Call {
    Connect(ConnectParams),
    Away(Option<String>),
    Join(String),
    Part(String),
    Action(String, String),
    Privmsg(String, String),
    Nick(String),
    Raw(String),
    Whois(String),
    Disconnect(Option<String>),
}

#[derive(Clone, Default)]
pub(crate) struct Recorder {
    calls: Rc<RefCell<Vec<Call>>>,
    fail_next: Rc<Cell<bool>>,
    refuse_connect: Rc<Cell<bool>>,
}

impl Recorder {
    pub(crate) fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    pub(crate) fn clear(&self) {
        self.calls.borrow_mut().clear();
    }

    /// Make the next backend operation fail.
    pub(crate) fn fail_next(&self) {
        self.fail_next.set(true);
    }

    pub(crate) fn refuse_connect(&self) {
        self.refuse_connect.set(true);
    }

    fn record(&self, call: Call) -> Result<(), BackendError> {
        if self.fail_next.replace(false) {
            return Err(BackendError::Rejected("server said no".to_string()));
        }
        self.calls.borrow_mut().push(call);
        Ok(())
    }
}

pub(crate) struct MockConnector {
    recorder: Recorder,
}

impl Connector for MockConnector {
    fn connect(&mut self, params: &ConnectParams) -> Result<Box<dyn MessagingBackend>, BackendError> {
        if self.recorder.refuse_connect.get() {
            return Err(BackendError::Rejected("connection refused".to_string()));
        }
        self.recorder.calls.borrow_mut().push(Call::Connect(params.clone()));
        Ok(Box::new(MockBackend {
            recorder: self.recorder.clone(),
            nick: params.nick.clone(),
        }))
    }
}

pub(crate) struct MockBackend {
    recorder: Recorder,
    nick: String,
}

impl MessagingBackend for MockBackend {
    fn nick(&self) -> &str {
        &self.nick
    }

    fn set_away(&mut self, text: Option<&str>) -> Result<(), BackendError> {
        self.recorder.record(Call::Away(text.map(str::to_string)))
    }

    fn join(&mut self, channel: &str) -> Result<(), BackendError> {
        self.recorder.record(Call::Join(channel.to_string()))
    }

    fn part(&mut self, channel: &str) -> Result<(), BackendError> {
        self.recorder.record(Call::Part(channel.to_string()))
    }

    fn send_action(&mut self, target: &str, text: &str) -> Result<(), BackendError> {
        self.recorder.record(Call::Action(target.to_string(), text.to_string()))
    }

    fn send_privmsg(&mut self, target: &str, text: &str) -> Result<(), BackendError> {
        self.recorder.record(Call::Privmsg(target.to_string(), text.to_string()))
    }

    fn set_nick(&mut self, nick: &str) -> Result<(), BackendError> {
        self.recorder.record(Call::Nick(nick.to_string()))?;
        self.nick = nick.to_string();
        Ok(())
    }

    fn send_raw(&mut self, line: &str) -> Result<(), BackendError> {
        self.recorder.record(Call::Raw(line.to_string()))
    }

    fn whois(&mut self, nick: &str) -> Result<(), BackendError> {
        self.recorder.record(Call::Whois(nick.to_string()))
    }

    fn disconnect(&mut self, message: Option<&str>) -> Result<(), BackendError> {
        self.recorder.record(Call::Disconnect(message.map(str::to_string)))
    }
}

pub(crate) fn session_with_blocked(blocked: &[&str]) -> (Session, Recorder, Captured) {
    let recorder = Recorder::default();
    let (sink, captured) = OutputSink::capture(OutputMode::Stdio);
    let connector = MockConnector {
        recorder: recorder.clone(),
    };
    let blocked = BlockList::new(blocked.iter().map(|c| c.to_string()));
    (Session::new(sink, Box::new(connector), blocked), recorder, captured)
}

pub(crate) fn session() -> (Session, Recorder, Captured) {
    session_with_blocked(&[])
}

/// A session connected as `me`, with the connect call and output cleared.
pub(crate) fn connected_session() -> (Session, Recorder, Captured) {
    let (mut session, recorder, captured) = session();
    session.handle_line("/connect irc.example.org:6667 me");
    assert!(session.is_connected());
    recorder.clear();
    captured.clear();
    (session, recorder, captured)
}

/// Printed lines with the leading `HH:MM ` timestamp removed.
pub(crate) fn texts(captured: &Captured) -> Vec<String> {
    captured
        .lines()
        .into_iter()
        .map(|line| {
            let bytes = line.as_bytes();
            if bytes.len() >= 6 && bytes[2] == b':' && bytes[5] == b' ' {
                line[6..].to_string()
            } else {
                line
            }
        })
        .collect()
}
