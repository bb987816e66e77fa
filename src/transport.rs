//! The FTP seam.
//!
//! `UploadSession` only talks to these traits; `FtpConnector` backs them with
//! a blocking `ftp::FtpStream`.

use ftp::types::FileType;
use ftp::FtpStream;
use log::{debug, info, warn};
use std::io::Read;

use crate::config::ConnectionParams;
use crate::error::{ConnectError, TransportError};

/// An authenticated control connection.
pub trait FtpTransport {
    /// Upload everything `reader` yields under `remote_name` (binary STOR).
    fn store(&mut self, remote_name: &str, reader: &mut dyn Read) -> Result<(), TransportError>;

    fn quit(&mut self) -> Result<(), TransportError>;
}

/// Opens transports from connection params.
pub trait Connector {
    type Transport: FtpTransport;

    fn open(&self, params: &ConnectionParams) -> Result<Self::Transport, ConnectError>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FtpConnector;

impl Connector for FtpConnector {
    type Transport = FtpStream;

    fn open(&self, params: &ConnectionParams) -> Result<FtpStream, ConnectError> {
        let mut ftp = FtpStream::connect(params.address())
            .map_err(|e| ConnectError::Connection(e.to_string()))?;
        debug!("Control connection open to {}:{}", params.host, params.port);

        if let Err(e) = ftp.login(&params.username, &params.password) {
            warn!("Login rejected for {}@{}: {}", params.username, params.host, e);
            ftp.quit().ok();
            return Err(ConnectError::Login(e.to_string()));
        }

        info!("Logged in to {}:{} as {}", params.host, params.port, params.username);
        Ok(ftp)
    }
}

impl FtpTransport for FtpStream {
    fn store(&mut self, remote_name: &str, mut reader: &mut dyn Read) -> Result<(), TransportError> {
        self.transfer_type(FileType::Binary)?;
        debug!("STOR {}", remote_name);
        self.put(remote_name, &mut reader)?;
        Ok(())
    }

    fn quit(&mut self) -> Result<(), TransportError> {
        FtpStream::quit(self)?;
        Ok(())
    }
}
