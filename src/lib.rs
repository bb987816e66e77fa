//!
//! FTP publisher - upload a file together with a titled description.
//!
//! The core is [`UploadSession`]: connect with [`ConnectionParams`], select a
//! local file, set a title and content, then submit. Each upload stores the
//! selected file as `{title}_{timestamp}{ext}` and a generated description as
//! `{title}_{timestamp}_content.{html|txt}`.
//!
//! The session is synchronous and single-threaded; every call blocks until
//! the server answers.
//!

pub mod config;
pub mod content;
pub mod error;
pub mod naming;
pub mod session;
pub mod transport;

pub use config::{AppConfig, ConnectionParams, ContentFormat, UploadSettings};
pub use error::{ConfigError, ConnectError, TransportError, UploadError};
pub use naming::DerivedArtifacts;
pub use session::{SessionState, UploadReceipt, UploadRequest, UploadSession};
pub use transport::{Connector, FtpConnector, FtpTransport};

/// Initialize logging from `RUST_LOG`. Safe to call more than once.
pub fn init_logging() {
    let _ = env_logger::try_init();
}
