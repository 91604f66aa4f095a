//! Shell configuration (`gplot.toml`).
//!
//! ```toml
//! [shell]
//! prompt = "gplot> "
//! echo = true
//! startup = ["grid = full", "plot sin(x)"]
//!
//! [log]
//! filter = "gplot=debug"
//! ```
//!
//! Every key is optional.

use std::path::Path;

use serde::Deserialize;

use crate::error::ConfigError;

/// Name looked up in the working directory when no path is given.
pub const DEFAULT_FILE: &str = "gplot.toml";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SessionConfig {
    #[serde(default)]
    pub shell: ShellSection,

    #[serde(default)]
    pub log: LogSection,
}

/// The `[shell]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct ShellSection {
    /// Interactive prompt (default: `"gplot> "`).
    #[serde(default = "default_prompt")]
    pub prompt: String,

    /// Print each command before its output (default: `false`).
    #[serde(default)]
    pub echo: bool,

    /// Commands run before the first input line.
    #[serde(default)]
    pub startup: Vec<String>,
}

/// The `[log]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct LogSection {
    /// `tracing` filter directive, overridden by `RUST_LOG` (default: `"warn"`).
    #[serde(default = "default_filter")]
    pub filter: String,
}

fn default_prompt() -> String {
    "gplot> ".to_string()
}

fn default_filter() -> String {
    "warn".to_string()
}

impl Default for ShellSection {
    fn default() -> Self {
        Self {
            prompt: default_prompt(),
            echo: false,
            startup: Vec::new(),
        }
    }
}

impl Default for LogSection {
    fn default() -> Self {
        Self {
            filter: default_filter(),
        }
    }
}

impl SessionConfig {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_owned(),
            source: e,
        })?;
        Self::parse(&content, path)
    }

    /// Parse `content`; `path` is only used in error messages.
    pub fn parse(content: &str, path: &Path) -> Result<Self, ConfigError> {
        let config: SessionConfig = toml::from_str(content).map_err(|e| ConfigError::Parse {
            path: path.to_owned(),
            source: e,
        })?;
        config.validate(path)?;
        Ok(config)
    }

    /// Load `path`, or [`DEFAULT_FILE`] if it exists, or fall back to
    /// defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::from_file(path),
            None => {
                let fallback = Path::new(DEFAULT_FILE);
                if fallback.is_file() {
                    Self::from_file(fallback)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    fn validate(&self, path: &Path) -> Result<(), ConfigError> {
        if self.log.filter.trim().is_empty() {
            return Err(ConfigError::Invalid {
                path: path.to_owned(),
                field: "log.filter",
            });
        }
        Ok(())
    }
}
