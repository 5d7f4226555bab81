pub mod backend;
pub mod completion;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod events;
pub mod format;
pub mod output;
pub mod registry;
pub mod session;
pub mod tokenize;

#[cfg(test)]
pub(crate) mod testing;

// Re-export the types the driver needs at crate root for convenience
pub use backend::{ConnectParams, Connector, MessagingBackend};
pub use config::{BlockList, ClientConfig};
pub use error::{BackendError, ConfigError};
pub use events::ClientEvent;
pub use output::{OutputMode, OutputSink};
pub use session::Session;
