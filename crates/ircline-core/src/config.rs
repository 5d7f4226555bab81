use serde::Deserialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::error::ConfigError;
use crate::format::WRAP_COLUMN;

const APP_DIR: &str = "ircline";
const CONFIG_FILE: &str = "config.json";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ClientConfig {
    /// Commands (with their leading `/`) the user may not run.
    pub blocked_commands: HashSet<String>,
    pub wrap_column: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            blocked_commands: HashSet::new(),
            wrap_column: WRAP_COLUMN,
        }
    }
}

impl ClientConfig {
    /// `<config dir>/ircline/config.json`, or a relative path when the
    /// platform has no config dir.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .map(|d| d.join(APP_DIR))
            .unwrap_or_else(|| PathBuf::from(APP_DIR))
            .join(CONFIG_FILE)
    }

    /// Load from `path`. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("no config at {}, using defaults", path.display());
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn block_list(&self) -> BlockList {
        BlockList::new(self.blocked_commands.iter().cloned())
    }
}

/// Commands disallowed by configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlockList {
    commands: HashSet<String>,
}

impl BlockList {
    pub fn new<I: IntoIterator<Item = String>>(commands: I) -> Self {
        Self {
            commands: commands.into_iter().collect(),
        }
    }

    pub fn is_blocked(&self, command: &str) -> bool {
        self.commands.contains(command)
    }
}
