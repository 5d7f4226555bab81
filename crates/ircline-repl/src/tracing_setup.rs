use std::fs::OpenOptions;
use std::sync::Mutex;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const LOG_FILE_VAR: &str = "IRCLINE_LOG_FILE";

/// Log to the file named by `IRCLINE_LOG_FILE`, filtered by `RUST_LOG`.
/// The terminal belongs to the chat, so without the variable nothing is logged.
pub(crate) fn init_tracing() {
    let Ok(log_path) = std::env::var(LOG_FILE_VAR) else {
        return;
    };

    let file = match OpenOptions::new().create(true).append(true).open(&log_path) {
        Ok(file) => file,
        Err(e) => {
            eprintln!("Couldn't open log file {log_path}: {e}");
            return;
        }
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let file_layer = fmt::layer()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true);

    tracing_subscriber::registry().with(filter).with(file_layer).init();
}
