//! Destination for everything the user gets to read.

use parking_lot::Mutex;
use std::io::{self, Write};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Plain line-by-line stream, used when running as a subprocess.
    Stdio,
    /// The terminal is in raw mode and owned by the line editor.
    LineEditor,
}

pub struct OutputSink {
    mode: OutputMode,
    writer: Box<dyn Write + Send>,
}

impl OutputSink {
    pub fn new(mode: OutputMode, writer: Box<dyn Write + Send>) -> Self {
        Self { mode, writer }
    }

    pub fn stdout(mode: OutputMode) -> Self {
        Self::new(mode, Box::new(io::stdout()))
    }

    /// Sink backed by an in-memory buffer, returned alongside a handle to read it.
    pub fn capture(mode: OutputMode) -> (Self, Captured) {
        let captured = Captured::default();
        let sink = Self::new(mode, Box::new(captured.clone()));
        (sink, captured)
    }

    pub fn mode(&self) -> OutputMode {
        self.mode
    }

    /// Write one (possibly multi-line) message followed by a line break.
    pub fn write_line(&mut self, text: &str) {
        let result = match self.mode {
            OutputMode::Stdio => writeln!(self.writer, "{text}"),
            OutputMode::LineEditor => {
                let mut out = String::with_capacity(text.len() + 2);
                for line in text.split('\n') {
                    out.push_str(line);
                    out.push_str("\r\n");
                }
                self.writer.write_all(out.as_bytes())
            }
        };
        if let Err(e) = result.and_then(|_| self.writer.flush()) {
            tracing::warn!("output write failed: {}", e);
        }
    }
}

/// Shared in-memory writer.
#[derive(Clone, Default)]
pub struct Captured {
    buf: Arc<Mutex<Vec<u8>>>,
}

impl Captured {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.buf.lock()).into_owned()
    }

    /// Lines written so far, without their terminators.
    pub fn lines(&self) -> Vec<String> {
        self.contents()
            .lines()
            .map(|l| l.trim_end_matches('\r').to_string())
            .collect()
    }

    pub fn clear(&self) {
        self.buf.lock().clear();
    }
}

impl Write for Captured {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        self.buf.lock().extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
