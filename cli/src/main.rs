//! Command-line client: send one SMS through the gateway and print the
//! resulting status and body.
//!
//! The operation log goes to `sms_client.log` in the working directory; the
//! `RUST_LOG` environment variable overrides the default `info` filter.

mod config;

use std::fs::OpenOptions;
use std::path::PathBuf;

use clap::Parser;
use sms_core::{SmsClient, SmsMessage};

const LOG_FILE: &str = "sms_client.log";

#[derive(Parser, Debug)]
#[command(name = "sms-cli", version, about = "Send an SMS through the gateway HTTP API")]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(long)]
    config: PathBuf,

    /// Sender number
    #[arg(long)]
    sender: String,

    /// Recipient number
    #[arg(long)]
    recipient: String,

    /// Message text
    #[arg(long)]
    message: String,
}

fn init_logging() -> std::io::Result<()> {
    let file = OpenOptions::new().create(true).append(true).open(LOG_FILE)?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
    Ok(())
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = init_logging() {
        eprintln!("Failed to open {LOG_FILE}: {e}");
    }

    let config = match config::load(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            println!("Failed to load configuration: {e}");
            log::error!("failed to load configuration: {e}");
            return;
        }
    };
    log::info!("configuration loaded from {}", cli.config.display());

    let client = SmsClient::new(config.service_target(), config.credentials());
    let message = SmsMessage {
        sender: cli.sender,
        recipient: cli.recipient,
        message: cli.message,
    };

    let outcome = client.send(&message);
    println!("Status: {}", outcome.status);
    println!("Body: {}", outcome.body);
}
