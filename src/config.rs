use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{ConfigError, ConnectError};

/// Port used when the config file does not name one.
pub const DEFAULT_PORT: u16 = 21;

/// Environment variable that overrides the scratch directory (sandboxed hosts).
pub const SCRATCH_DIR_ENV: &str = "FTP_TMP_DIR";

/// Credentials for one control connection. Built from user input at connect
/// time and never persisted by the session.
#[derive(Clone, PartialEq, Eq)]
pub struct ConnectionParams {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
}

impl ConnectionParams {
    pub fn new(host: &str, port: u16, username: &str, password: &str) -> Self {
        ConnectionParams {
            host: host.to_string(),
            port,
            username: username.to_string(),
            password: password.to_string(),
        }
    }

    /// Build params from raw form text, where the port is still a string.
    pub fn parse(host: &str, port: &str, username: &str, password: &str) -> Result<Self, ConnectError> {
        let port = port
            .trim()
            .parse::<u16>()
            .map_err(|_| ConnectError::InvalidPort(port.to_string()))?;
        let params = Self::new(host.trim(), port, username, password);
        params.validate()?;
        Ok(params)
    }

    pub fn validate(&self) -> Result<(), ConnectError> {
        if self.host.trim().is_empty() {
            return Err(ConnectError::MissingField("host"));
        }
        if self.port == 0 {
            return Err(ConnectError::InvalidPort(self.port.to_string()));
        }
        if self.username.is_empty() {
            return Err(ConnectError::MissingField("username"));
        }
        if self.password.is_empty() {
            return Err(ConnectError::MissingField("password"));
        }
        Ok(())
    }

    pub fn address(&self) -> (String, u16) {
        (self.host.clone(), self.port)
    }
}

impl fmt::Debug for ConnectionParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionParams")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

/// Format of the generated description file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ContentFormat {
    /// Rich text, uploaded as `.html`.
    #[default]
    #[serde(rename = "html")]
    Html,
    #[serde(rename = "text")]
    PlainText,
}

impl ContentFormat {
    /// File extension without the leading dot.
    pub fn extension(self) -> &'static str {
        match self {
            ContentFormat::Html => "html",
            ContentFormat::PlainText => "txt",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadSettings {
    pub content_format: ContentFormat,
    /// Where the temporary content file is written before upload.
    pub scratch_dir: PathBuf,
}

impl Default for UploadSettings {
    fn default() -> Self {
        UploadSettings {
            content_format: ContentFormat::default(),
            scratch_dir: std::env::temp_dir(),
        }
    }
}

/// On-disk JSON configuration for the command-line front-end.
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server_address: String,
    #[serde(default = "default_port")]
    pub port: u16,
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub content_format: ContentFormat,
    #[serde(default)]
    pub scratch_dir: Option<PathBuf>,
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

impl AppConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path)?;
        Self::from_json(&raw)
    }

    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = serde_json::from_str(raw)?;
        config
            .connection_params()
            .validate()
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;
        Ok(config)
    }

    pub fn connection_params(&self) -> ConnectionParams {
        ConnectionParams::new(&self.server_address, self.port, &self.username, &self.password)
    }

    /// Settings with the scratch directory resolved against `FTP_TMP_DIR`.
    pub fn upload_settings(&self) -> UploadSettings {
        UploadSettings {
            content_format: self.content_format,
            scratch_dir: resolve_scratch_dir(std::env::var(SCRATCH_DIR_ENV).ok(), self.scratch_dir.as_deref()),
        }
    }
}

/// Environment override first, then the configured directory, then the OS temp dir.
pub fn resolve_scratch_dir(env_value: Option<String>, configured: Option<&Path>) -> PathBuf {
    match env_value {
        Some(dir) if !dir.trim().is_empty() => PathBuf::from(dir),
        _ => configured
            .map(Path::to_path_buf)
            .unwrap_or_else(std::env::temp_dir),
    }
}
