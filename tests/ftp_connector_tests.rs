use std::io::{BufRead, BufReader, Read, Write};
use std::net::TcpListener;
use std::thread;

use ftp_publisher::{
    ConnectError, ConnectionParams, ContentFormat, SessionState, UploadRequest, UploadSession, UploadSettings,
};
use tempfile::TempDir;

/// What a scripted server saw over one control connection.
struct Transcript {
    commands: Vec<String>,
    stored: Vec<(String, Vec<u8>)>,
}

/// Accept one control connection speaking just enough FTP for a login and
/// passive-mode STORs.
fn spawn_accepting_server() -> (u16, thread::JoinHandle<Transcript>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    let data_listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let data_port = data_listener.local_addr().unwrap().port();

    let handle = thread::spawn(move || {
        let (stream, _) = listener.accept().unwrap();
        let mut writer = stream.try_clone().unwrap();
        let mut reader = BufReader::new(stream);
        let mut transcript = Transcript {
            commands: Vec::new(),
            stored: Vec::new(),
        };

        writer.write_all(b"220 test server ready\r\n").unwrap();
        loop {
            let mut line = String::new();
            if reader.read_line(&mut line).unwrap_or(0) == 0 {
                break;
            }
            let command = line.trim_end().to_string();
            transcript.commands.push(command.clone());

            if command.starts_with("USER") {
                writer.write_all(b"331 Password required.\r\n").unwrap();
            } else if command.starts_with("PASS") {
                writer.write_all(b"230 Logged in.\r\n").unwrap();
            } else if command.starts_with("TYPE") {
                writer.write_all(b"200 Type set.\r\n").unwrap();
            } else if command.starts_with("PASV") {
                let reply = format!(
                    "227 Entering Passive Mode (127,0,0,1,{},{})\r\n",
                    data_port / 256,
                    data_port % 256
                );
                writer.write_all(reply.as_bytes()).unwrap();
            } else if let Some(name) = command.strip_prefix("STOR ") {
                writer.write_all(b"150 Ok to send data.\r\n").unwrap();
                let (mut data, _) = data_listener.accept().unwrap();
                let mut bytes = Vec::new();
                data.read_to_end(&mut bytes).unwrap();
                transcript.stored.push((name.to_string(), bytes));
                writer.write_all(b"226 Transfer complete.\r\n").unwrap();
            } else if command.starts_with("QUIT") {
                writer.write_all(b"221 Goodbye.\r\n").unwrap();
                break;
            } else {
                writer.write_all(b"502 Command not implemented.\r\n").unwrap();
            }
        }
        transcript
    });

    (port, handle)
}

/// Accept one control connection, greet, and reject the login.
fn spawn_rejecting_server() -> (u16, thread::JoinHandle<Vec<String>>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();

    let handle = thread::spawn(move || {
        let (stream, _) = listener.accept().unwrap();
        let mut writer = stream.try_clone().unwrap();
        let mut reader = BufReader::new(stream);
        let mut commands = Vec::new();

        writer.write_all(b"220 test server ready\r\n").unwrap();
        loop {
            let mut line = String::new();
            if reader.read_line(&mut line).unwrap_or(0) == 0 {
                break;
            }
            let command = line.trim_end().to_string();
            commands.push(command.clone());
            if command.starts_with("USER") {
                writer.write_all(b"530 Login incorrect.\r\n").unwrap();
            } else if command.starts_with("QUIT") {
                writer.write_all(b"221 Goodbye.\r\n").unwrap();
                break;
            } else {
                writer.write_all(b"502 Command not implemented.\r\n").unwrap();
            }
        }
        commands
    });

    (port, handle)
}

#[test]
fn test_refused_connection_is_connect_error() {
    let port = {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };

    let mut session = UploadSession::with_settings(UploadSettings::default());
    let err = session
        .connect(&ConnectionParams::new("127.0.0.1", port, "admin", "1234"))
        .unwrap_err();

    assert!(matches!(err, ConnectError::Connection(_)));
    assert_eq!(session.state(), SessionState::Disconnected);
}

#[test]
fn test_rejected_login_is_connect_error() {
    let (port, server) = spawn_rejecting_server();

    let mut session = UploadSession::with_settings(UploadSettings::default());
    let err = session
        .connect(&ConnectionParams::new("127.0.0.1", port, "admin", "wrong"))
        .unwrap_err();

    assert!(matches!(err, ConnectError::Login(_)));
    assert_eq!(session.state(), SessionState::Disconnected);

    let commands = server.join().unwrap();
    assert_eq!(commands, vec!["USER admin".to_string(), "QUIT".to_string()]);
}

#[test]
fn test_upload_over_the_wire() {
    let (port, server) = spawn_accepting_server();
    let scratch = TempDir::new().unwrap();
    let files = TempDir::new().unwrap();
    let local = files.path().join("q4.pdf");
    let payload = b"%PDF-1.4\r\n\x00\xffbinary".to_vec();
    std::fs::write(&local, &payload).unwrap();

    let mut session = UploadSession::with_settings(UploadSettings {
        content_format: ContentFormat::Html,
        scratch_dir: scratch.path().to_path_buf(),
    });
    session
        .connect(&ConnectionParams::new("127.0.0.1", port, "admin", "1234"))
        .unwrap();
    let receipt = session
        .upload(UploadRequest::new(&local, "Report", "<p>Quarterly numbers</p>"))
        .unwrap();
    session.disconnect();

    let transcript = server.join().unwrap();
    assert_eq!(&transcript.commands[..2], &["USER admin".to_string(), "PASS 1234".to_string()]);
    assert!(transcript.commands.contains(&"TYPE I".to_string()));
    assert!(transcript.commands.contains(&format!("STOR {}", receipt.remote_file)));
    assert!(transcript.commands.contains(&format!("STOR {}", receipt.remote_content)));
    assert_eq!(transcript.commands.last().map(String::as_str), Some("QUIT"));

    assert!(receipt.remote_file.starts_with("Report_") && receipt.remote_file.ends_with(".pdf"));
    assert!(receipt.remote_content.ends_with("_content.html"));
    assert_eq!(transcript.stored.len(), 2);
    assert_eq!(transcript.stored[0], (receipt.remote_file.clone(), payload));
    assert_eq!(transcript.stored[1].0, receipt.remote_content);
    assert_eq!(transcript.stored[1].1, b"<h1>Report</h1>\n\n<p>Quarterly numbers</p>".to_vec());
    assert!(std::fs::read_dir(scratch.path()).unwrap().next().is_none());
}
