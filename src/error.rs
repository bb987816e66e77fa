use thiserror::Error;

/// Failure to open or authenticate the control connection.
#[derive(Error, Debug)]
pub enum ConnectError {
    #[error("Missing connection field: {0}")]
    MissingField(&'static str),

    #[error("Invalid port: {0}")]
    InvalidPort(String),

    #[error("Connection failed: {0}")]
    Connection(String),

    #[error("Login failed: {0}")]
    Login(String),
}

#[derive(Error, Debug)]
pub enum UploadError {
    #[error("Not connected to an FTP server")]
    NotConnected,

    #[error("No file selected for upload")]
    NoFileSelected,

    #[error("Title is empty")]
    MissingTitle,

    #[error("Content is empty")]
    MissingContent,

    #[error("Upload failed: {0}")]
    TransferFailed(String),
}

/// Error raised by an [`FtpTransport`](crate::transport::FtpTransport).
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("FTP error: {0}")]
    Ftp(#[from] ftp::FtpError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Invalid(String),
}
