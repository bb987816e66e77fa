use chrono::Local;
use log::{debug, error, info, warn};
use serde::Serialize;
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use crate::config::{ConnectionParams, UploadSettings};
use crate::content;
use crate::error::{ConnectError, UploadError};
use crate::naming::{self, DerivedArtifacts};
use crate::transport::{Connector, FtpConnector, FtpTransport};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Disconnected,
    Connected,
}

/// What the user wants published: a local file plus a titled description.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadRequest {
    pub local_file: Option<PathBuf>,
    pub title: String,
    pub content: String,
}

impl UploadRequest {
    pub fn new(local_file: impl Into<PathBuf>, title: &str, content: &str) -> Self {
        UploadRequest {
            local_file: Some(local_file.into()),
            title: title.to_string(),
            content: content.to_string(),
        }
    }
}

/// Remote names stored by a successful upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UploadReceipt {
    pub remote_file: String,
    pub remote_content: String,
}

/// One user's connection to an FTP server and the upload being drafted.
pub struct UploadSession<C: Connector = FtpConnector> {
    connector: C,
    transport: Option<C::Transport>,
    settings: UploadSettings,
    draft: UploadRequest,
}

impl UploadSession<FtpConnector> {
    pub fn with_settings(settings: UploadSettings) -> Self {
        Self::new(FtpConnector, settings)
    }
}

impl<C: Connector> UploadSession<C> {
    pub fn new(connector: C, settings: UploadSettings) -> Self {
        UploadSession {
            connector,
            transport: None,
            settings,
            draft: UploadRequest::default(),
        }
    }

    pub fn state(&self) -> SessionState {
        if self.transport.is_some() {
            SessionState::Connected
        } else {
            SessionState::Disconnected
        }
    }

    pub fn settings(&self) -> &UploadSettings {
        &self.settings
    }

    /// Open and authenticate a control connection. Invalid params are rejected
    /// without touching the current connection. Otherwise any existing
    /// connection is closed first, so a network or login failure leaves the
    /// session disconnected.
    pub fn connect(&mut self, params: &ConnectionParams) -> Result<(), ConnectError> {
        params.validate()?;

        if self.transport.is_some() {
            debug!("Replacing existing connection");
            self.disconnect();
        }

        info!("Connecting to {}:{}", params.host, params.port);
        let transport = self.connector.open(params).map_err(|e| {
            error!("{}", e);
            e
        })?;
        self.transport = Some(transport);
        Ok(())
    }

    /// Best-effort QUIT. Always ends disconnected.
    pub fn disconnect(&mut self) {
        if let Some(mut transport) = self.transport.take() {
            match transport.quit() {
                Ok(()) => info!("Disconnected"),
                Err(e) => debug!("Ignoring error while disconnecting: {}", e),
            }
        }
    }

    pub fn select_file(&mut self, path: impl Into<PathBuf>) {
        self.draft.local_file = Some(path.into());
    }

    pub fn set_title(&mut self, title: &str) {
        self.draft.title = title.to_string();
    }

    pub fn set_content(&mut self, content: &str) {
        self.draft.content = content.to_string();
    }

    pub fn draft(&self) -> &UploadRequest {
        &self.draft
    }

    /// Upload the drafted request.
    pub fn submit(&mut self) -> Result<UploadReceipt, UploadError> {
        let request = self.draft.clone();
        self.upload(request)
    }

    /// Upload the selected file and its description. On success the draft is
    /// cleared; on failure it is left untouched so the user can retry.
    pub fn upload(&mut self, request: UploadRequest) -> Result<UploadReceipt, UploadError> {
        let transport = self.transport.as_mut().ok_or(UploadError::NotConnected)?;
        let local_file = request.local_file.as_deref().ok_or(UploadError::NoFileSelected)?;
        let title = request.title.as_str();
        if title.trim().is_empty() {
            return Err(UploadError::MissingTitle);
        }
        if request.content.trim().is_empty() {
            return Err(UploadError::MissingContent);
        }

        let timestamp = naming::format_timestamp(Local::now().naive_local());
        let names = DerivedArtifacts::derive(title, local_file, &timestamp, self.settings.content_format);
        let body = content::render(self.settings.content_format, title, &request.content);

        let receipt = transfer(transport, &self.settings.scratch_dir, local_file, &names, &body).map_err(|e| {
            error!("Upload of {} failed: {}", local_file.display(), e);
            e
        })?;

        info!("Uploaded {} and {}", receipt.remote_file, receipt.remote_content);
        self.draft = UploadRequest::default();
        Ok(receipt)
    }
}

impl<C: Connector> Drop for UploadSession<C> {
    fn drop(&mut self) {
        self.disconnect();
    }
}

fn transfer<T: FtpTransport>(
    transport: &mut T,
    scratch_dir: &Path,
    local_file: &Path,
    names: &DerivedArtifacts,
    body: &str,
) -> Result<UploadReceipt, UploadError> {
    let scratch = ScratchFile::create(scratch_dir, &names.local_content, body)
        .map_err(|e| UploadError::TransferFailed(format!("cannot write {}: {}", names.local_content, e)))?;

    let mut file = File::open(local_file)
        .map_err(|e| UploadError::TransferFailed(format!("cannot open {}: {}", local_file.display(), e)))?;
    transport
        .store(&names.remote_file, &mut file)
        .map_err(|e| UploadError::TransferFailed(format!("{}: {}", names.remote_file, e)))?;

    let mut description = File::open(scratch.path())
        .map_err(|e| UploadError::TransferFailed(format!("cannot open {}: {}", scratch.path().display(), e)))?;
    transport
        .store(&names.remote_content, &mut description)
        .map_err(|e| UploadError::TransferFailed(format!("{}: {}", names.remote_content, e)))?;

    Ok(UploadReceipt {
        remote_file: names.remote_file.clone(),
        remote_content: names.remote_content.clone(),
    })
}

/// Temporary content file inside a private directory of its own; both are
/// removed when dropped.
struct ScratchFile {
    dir: Option<TempDir>,
    path: PathBuf,
}

impl ScratchFile {
    fn create(scratch_dir: &Path, name: &str, body: &str) -> io::Result<Self> {
        let dir = tempfile::Builder::new().prefix("ftp_publisher").tempdir_in(scratch_dir)?;
        let scratch = ScratchFile {
            path: dir.path().join(name),
            dir: Some(dir),
        };
        let mut file = OpenOptions::new().write(true).create_new(true).open(&scratch.path)?;
        file.write_all(body.as_bytes())?;
        debug!("Wrote {}", scratch.path.display());
        Ok(scratch)
    }

    fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for ScratchFile {
    fn drop(&mut self) {
        if let Some(dir) = self.dir.take() {
            match dir.close() {
                Ok(()) => debug!("Removed {}", self.path.display()),
                Err(e) => warn!("Failed to remove {}: {}", self.path.display(), e),
            }
        }
    }
}
