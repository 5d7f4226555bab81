use chrono::Local;

use crate::backend::{Connector, MessagingBackend};
use crate::completion::{self, CompletionState};
use crate::config::BlockList;
use crate::dispatch;
use crate::error::BackendError;
use crate::events::{self, ClientEvent};
use crate::format::{format_message, incoming, WRAP_COLUMN};
use crate::output::OutputSink;
use crate::registry::COMMAND_PREFIX;

pub(crate) const NOT_CONNECTED: &str = "Not connected. Use /connect or /tlsconnect first.";
pub(crate) const NO_TARGET: &str = "No target. Use /join or /query first.";

/// Everything one interactive session needs: where output goes, what the
/// completer knows, the active backend and the session flags.
pub struct Session {
    pub(crate) output: OutputSink,
    pub(crate) completion: CompletionState,
    pub(crate) blocked: BlockList,
    pub(crate) connector: Box<dyn Connector>,
    pub(crate) backend: Option<Box<dyn MessagingBackend>>,
    pub(crate) current_target: Option<String>,
    pub(crate) quit_requested: bool,
    pub(crate) status_events: bool,
    wrap_column: usize,
}

impl Session {
    pub fn new(output: OutputSink, connector: Box<dyn Connector>, blocked: BlockList) -> Self {
        Self {
            output,
            completion: CompletionState::new(),
            blocked,
            connector,
            backend: None,
            current_target: None,
            quit_requested: false,
            status_events: true,
            wrap_column: WRAP_COLUMN,
        }
    }

    pub fn with_wrap_column(mut self, col: usize) -> Self {
        self.wrap_column = col;
        self
    }

    // ─── Accessors ──────────────────────────────────────────────────────────

    pub fn quit_requested(&self) -> bool {
        self.quit_requested
    }

    pub fn status_events(&self) -> bool {
        self.status_events
    }

    pub fn current_target(&self) -> Option<&str> {
        self.current_target.as_deref()
    }

    pub fn is_connected(&self) -> bool {
        self.backend.is_some()
    }

    pub fn own_nick(&self) -> Option<&str> {
        self.backend.as_ref().map(|b| b.nick())
    }

    pub fn completion_state(&self) -> &CompletionState {
        &self.completion
    }

    pub fn completion_state_mut(&mut self) -> &mut CompletionState {
        &mut self.completion
    }

    /// Prompt shown by the line editor: the current target, if any.
    pub fn prompt(&self) -> String {
        format!("{}> ", self.current_target.as_deref().unwrap_or(""))
    }

    // ─── Input ──────────────────────────────────────────────────────────────

    /// Route one submitted line: commands to the dispatcher, anything else to
    /// the current target. Lines arriving after a quit are dropped.
    pub fn handle_line(&mut self, line: &str) {
        if self.quit_requested {
            tracing::debug!("ignoring input after quit");
            return;
        }
        let line = line.trim_end();
        if line.trim_start().is_empty() {
            return;
        }

        if line.starts_with(COMMAND_PREFIX) {
            dispatch::dispatch(self, line);
        } else {
            self.send_to_target(line);
        }
    }

    /// Tab completion for the line being edited. `cursor` counts chars.
    pub fn complete(&mut self, line: &str, cursor: usize) -> Vec<String> {
        completion::complete(line, cursor, &mut self.completion)
    }

    pub fn handle_event(&mut self, event: ClientEvent) {
        events::apply(self, event);
    }

    fn send_to_target(&mut self, text: &str) {
        let Some(target) = self.current_target.clone() else {
            self.warn(NO_TARGET);
            return;
        };
        if !self.require_backend() {
            return;
        }
        if let Some(nick) = self.backend_call(|b| {
            b.send_privmsg(&target, text)?;
            Ok(b.nick().to_string())
        }) {
            self.message(&incoming(&nick, &target, text, false));
        }
    }

    // ─── Backend helpers ────────────────────────────────────────────────────

    /// Report and return false when there is no backend.
    pub(crate) fn require_backend(&mut self) -> bool {
        if self.backend.is_some() {
            true
        } else {
            self.warn(NOT_CONNECTED);
            false
        }
    }

    /// Run `f` against the backend, reporting any failure to the user.
    pub(crate) fn backend_call<T, F>(&mut self, f: F) -> Option<T>
    where
        F: FnOnce(&mut dyn MessagingBackend) -> Result<T, BackendError>,
    {
        let result = match self.backend.as_deref_mut() {
            Some(backend) => f(backend),
            None => Err(BackendError::NotConnected),
        };
        match result {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!("backend call failed: {}", e);
                self.error(&e.to_string());
                None
            }
        }
    }

    // ─── Output ─────────────────────────────────────────────────────────────

    /// Sanitize, timestamp, wrap and print.
    pub fn message(&mut self, msg: &str) {
        let formatted = format_message(msg, Local::now().time(), self.wrap_column);
        self.output.write_line(&formatted);
    }

    pub fn info(&mut self, msg: &str) {
        tracing::debug!("info: {}", msg);
        self.message(msg);
    }

    pub fn warn(&mut self, msg: &str) {
        tracing::debug!("warn: {}", msg);
        self.message(msg);
    }

    pub fn error(&mut self, msg: &str) {
        tracing::debug!("error: {}", msg);
        self.message(&format!("error: {msg}"));
    }
}
