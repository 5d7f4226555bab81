//! Seams to the messaging backend. The wire protocol lives behind these traits.

use crate::error::BackendError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectParams {
    /// `host:port`
    pub server: String,
    pub nick: String,
    pub password: Option<String>,
    pub tls: bool,
}

/// An established session with a chat server.
pub trait MessagingBackend {
    /// Own nickname as the server knows it.
    fn nick(&self) -> &str;

    /// Mark as away with `text`, or back when `None`.
    fn set_away(&mut self, text: Option<&str>) -> Result<(), BackendError>;

    fn join(&mut self, channel: &str) -> Result<(), BackendError>;

    fn part(&mut self, channel: &str) -> Result<(), BackendError>;

    fn send_action(&mut self, target: &str, text: &str) -> Result<(), BackendError>;

    fn send_privmsg(&mut self, target: &str, text: &str) -> Result<(), BackendError>;

    fn set_nick(&mut self, nick: &str) -> Result<(), BackendError>;

    /// Send a protocol line as-is.
    fn send_raw(&mut self, line: &str) -> Result<(), BackendError>;

    fn whois(&mut self, nick: &str) -> Result<(), BackendError>;

    fn disconnect(&mut self, message: Option<&str>) -> Result<(), BackendError>;
}

/// Opens backends on `/connect` and `/tlsconnect`.
pub trait Connector {
    fn connect(&mut self, params: &ConnectParams) -> Result<Box<dyn MessagingBackend>, BackendError>;
}
