use colored::*;
use serde::Serialize;
use std::fs;
use std::io::Read;
use std::path::Path;

use ftp_publisher::{AppConfig, UploadReceipt, UploadSession};

#[derive(Debug, Serialize)]
struct PublishResult {
    pub success: bool,
    pub message: String,
    pub remote_file: Option<String>,
    pub remote_content: Option<String>,
    pub timestamp: u64,
}

fn write_result(result_file: Option<&str>, outcome: &Result<UploadReceipt, String>) -> Result<(), Box<dyn std::error::Error>> {
    let Some(result_file) = result_file else {
        return Ok(());
    };

    let (success, message, receipt) = match outcome {
        Ok(receipt) => (true, "File and content uploaded".to_string(), Some(receipt)),
        Err(message) => (false, message.clone(), None),
    };
    let result = PublishResult {
        success,
        message,
        remote_file: receipt.map(|r| r.remote_file.clone()),
        remote_content: receipt.map(|r| r.remote_content.clone()),
        timestamp: std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)?
            .as_secs(),
    };

    fs::write(result_file, serde_json::to_string(&result)?)?;
    Ok(())
}

fn read_content(source: &str) -> std::io::Result<String> {
    if source == "-" {
        let mut content = String::new();
        std::io::stdin().read_to_string(&mut content)?;
        Ok(content)
    } else {
        fs::read_to_string(source)
    }
}

fn publish(config: &AppConfig, local_file: &str, title: &str, content: &str) -> Result<UploadReceipt, String> {
    let params = config.connection_params();
    let mut session = UploadSession::with_settings(config.upload_settings());

    println!("{} Connecting to {}:{}...", "🔌".blue(), params.host, params.port);
    session.connect(&params).map_err(|e| e.to_string())?;
    println!("{} Connected", "✅".green());

    session.select_file(local_file);
    session.set_title(title);
    session.set_content(content);

    let outcome = session.submit().map_err(|e| e.to_string());
    session.disconnect();
    outcome
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    ftp_publisher::init_logging();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 5 {
        eprintln!(
            "{} Usage: {} <config_file> <local_file> <title> <content_file|-> [result_file]",
            "❌".red(),
            args.first().map(String::as_str).unwrap_or("ftp_publisher")
        );
        std::process::exit(1);
    }

    let result_file = args.get(5).map(String::as_str);
    let config = match AppConfig::load(Path::new(&args[1])) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{} {}", "❌".red(), e);
            write_result(result_file, &Err(e.to_string()))?;
            std::process::exit(1);
        }
    };
    let content = match read_content(&args[4]) {
        Ok(content) => content,
        Err(e) => {
            let message = format!("cannot read content from {}: {}", args[4], e);
            eprintln!("{} {}", "❌".red(), message);
            write_result(result_file, &Err(message))?;
            std::process::exit(1);
        }
    };

    let outcome = publish(&config, &args[2], &args[3], &content);
    write_result(result_file, &outcome)?;

    match outcome {
        Ok(receipt) => {
            println!("{} Uploaded {}", "✅".green(), receipt.remote_file.cyan());
            println!("{} Uploaded {}", "✅".green(), receipt.remote_content.cyan());
            Ok(())
        }
        Err(message) => {
            eprintln!("{} {}", "❌".red(), message);
            std::process::exit(1);
        }
    }
}
