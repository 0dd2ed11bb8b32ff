//! Client configuration.
//!
//! Values are layered: built-in defaults, then an optional JSON file, then
//! `CHATSYNC_*` environment variables, then whatever the caller sets with the
//! builder methods (the CLI applies its flags last).

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{ChatError, ChatResult};

/// Default server address
pub const DEFAULT_BASE_URL: &str = "http://localhost:5000";

const CONFIG_DIR_NAME: &str = "chatsync";
const CONFIG_FILE_NAME: &str = "config.json";

pub const ENV_BASE_URL: &str = "CHATSYNC_BASE_URL";
pub const ENV_API_BASE: &str = "CHATSYNC_API_BASE";
pub const ENV_STREAM: &str = "CHATSYNC_STREAM";
pub const ENV_IDLE_TIMEOUT_SECS: &str = "CHATSYNC_IDLE_TIMEOUT_SECS";

/// Configuration for the conversation client and dispatcher.
///
/// # Example
///
/// ```ignore
/// use chatsync::config::ClientConfig;
///
/// let config = ClientConfig::default()
///     .with_base_url("http://localhost:8080")
///     .with_streaming(false);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ClientConfig {
    /// Server origin; the streaming endpoint lives under `{base_url}/api`
    pub base_url: String,
    /// Base of the non-streaming endpoint (default: `{base_url}/api`)
    pub api_base: Option<String>,
    /// Stream replies token by token (default: true)
    pub use_streaming: bool,
    /// Give up on a stream after this many seconds without data (default: never)
    pub idle_timeout_secs: Option<u64>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_base: None,
            use_streaming: true,
            idle_timeout_secs: None,
        }
    }
}

impl ClientConfig {
    /// Create a new ClientConfig with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the server origin.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the non-streaming API base.
    pub fn with_api_base(mut self, url: impl Into<String>) -> Self {
        self.api_base = Some(url.into());
        self
    }

    /// Set whether replies are streamed.
    pub fn with_streaming(mut self, use_streaming: bool) -> Self {
        self.use_streaming = use_streaming;
        self
    }

    /// Set the stream idle timeout in seconds.
    pub fn with_idle_timeout(mut self, secs: u64) -> Self {
        self.idle_timeout_secs = Some(secs);
        self
    }

    /// Server origin without a trailing slash
    pub fn base_url(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }

    /// Effective base of the non-streaming endpoint
    pub fn api_base(&self) -> String {
        match &self.api_base {
            Some(api_base) => api_base.trim_end_matches('/').to_string(),
            None => format!("{}/api", self.base_url()),
        }
    }

    /// Per-chunk idle timeout. `0` from any source means no timeout.
    pub fn idle_timeout(&self) -> Option<Duration> {
        self.idle_timeout_secs
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
    }

    /// `$CONFIG_DIR/chatsync/config.json`, if the platform has a config dir
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
    }

    /// Read a config file. Missing keys keep their defaults.
    pub fn from_file(path: &Path) -> ChatResult<Self> {
        let json = std::fs::read_to_string(path).map_err(|e| {
            ChatError::Config(format!("failed to read {}: {}", path.display(), e))
        })?;
        serde_json::from_str(&json)
            .map_err(|e| ChatError::Config(format!("invalid config in {}: {}", path.display(), e)))
    }

    /// Defaults, then the config file, then the environment.
    ///
    /// An explicit `path` must exist. The default path is optional.
    pub fn load(path: Option<&Path>) -> ChatResult<Self> {
        let config = match path {
            Some(path) => Self::from_file(path)?,
            None => match Self::default_path() {
                Some(path) if path.exists() => Self::from_file(&path)?,
                _ => Self::default(),
            },
        };
        config.apply_env()
    }

    /// Overlay `CHATSYNC_*` environment variables.
    pub fn apply_env(self) -> ChatResult<Self> {
        self.apply_env_from(|key| std::env::var(key).ok())
    }

    /// Overlay variables from an arbitrary lookup.
    pub fn apply_env_from(mut self, lookup: impl Fn(&str) -> Option<String>) -> ChatResult<Self> {
        if let Some(url) = lookup(ENV_BASE_URL) {
            self.base_url = url;
        }
        if let Some(url) = lookup(ENV_API_BASE) {
            self.api_base = Some(url);
        }
        if let Some(value) = lookup(ENV_STREAM) {
            self.use_streaming = parse_bool(&value).ok_or_else(|| {
                ChatError::Config(format!("{} must be true or false, got '{}'", ENV_STREAM, value))
            })?;
        }
        if let Some(value) = lookup(ENV_IDLE_TIMEOUT_SECS) {
            let secs = value.trim().parse::<u64>().map_err(|_| {
                ChatError::Config(format!(
                    "{} must be a number of seconds, got '{}'",
                    ENV_IDLE_TIMEOUT_SECS, value
                ))
            })?;
            // 0 turns the timeout off
            self.idle_timeout_secs = (secs > 0).then_some(secs);
        }
        Ok(self)
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
