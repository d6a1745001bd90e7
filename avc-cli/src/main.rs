#![deny(missing_docs)]
//! A command-line client for requesting and verifying AppVerify Code one-time passcodes.

use avc_core::config::ClientConfig;
use avc_core::console::{prompt_channel, prompt_operation};
use avc_core::handshake::{Orchestrator, Outcome};
use avc_core::request::{ChannelIdentity, OperationKind, VerificationRequest};
use avc_core::service::HttpVerificationService;
use clap::{Parser, Subcommand};
use log::{error, info};
use std::num::NonZeroU32;
use std::process::ExitCode;
use std::time::Duration;

mod console;

use console::StdConsole;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(
    after_help = "ENVIRONMENT:\n  AVC_AUTHKEY             Auth key issued at registration (required)\n  AVC_BASE_URL            Verification service location\n  AVC_HTTP_TIMEOUT_SECS   Request timeout\n  AVC_MAX_ATTEMPTS        Codes accepted before giving up (0 = unlimited)\n  AVC_INPUT_TIMEOUT_SECS  Wait limit for each line of input\n\nEXAMPLES:\n  \n# Pick the method interactively\navc-cli\n\n# Show what the service knows about your auth key\navc-cli query\n\n# Send a code to a chat and verify it\navc-cli issue --chat-id 123456789"
)]
struct Cli {
    /// Base URL of the verification service. Overrides AVC_BASE_URL.
    #[arg(long, global = true, value_name = "URL")]
    base_url: Option<String>,

    /// Seconds to wait for the verification service. Overrides AVC_HTTP_TIMEOUT_SECS.
    #[arg(long, global = true, value_name = "SECS")]
    timeout: Option<u64>,

    /// Number of codes to accept before giving up, 0 for unlimited. Overrides AVC_MAX_ATTEMPTS.
    #[arg(long, global = true, value_name = "COUNT")]
    max_attempts: Option<u32>,

    /// Seconds to wait for each line of input. Overrides AVC_INPUT_TIMEOUT_SECS.
    #[arg(long, global = true, value_name = "SECS")]
    input_timeout: Option<u64>,

    /// The operation to run. If omitted, it is asked for interactively.
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the status of the auth key (GET)
    Query,
    /// Send a code to a chat and verify it (POST)
    Issue {
        /// The chat id reported by the bot's /start command. Asked for if omitted.
        #[arg(long, value_name = "CHAT_ID")]
        chat_id: Option<String>,
    },
}

impl Cli {
    fn apply_overrides(&self, config: &mut ClientConfig) {
        if let Some(base_url) = &self.base_url {
            config.base_url = base_url.trim_end_matches('/').to_string();
        }
        if let Some(secs) = self.timeout {
            config.http_timeout = Duration::from_secs(secs);
        }
        if let Some(count) = self.max_attempts {
            config.max_attempts = NonZeroU32::new(count);
        }
        if let Some(secs) = self.input_timeout {
            config.input_timeout = Some(Duration::from_secs(secs));
        }
    }
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> avc_core::Result<()> {
    let mut config = ClientConfig::from_env()?;
    cli.apply_overrides(&mut config);

    let service = HttpVerificationService::new(&config.base_url, config.http_timeout)?;
    let orchestrator = Orchestrator::new(service).with_max_attempts(config.max_attempts);
    let mut console = StdConsole::new(config.input_timeout);

    let (kind, chat_id) = match &cli.command {
        Some(Commands::Query) => (OperationKind::Query, None),
        Some(Commands::Issue { chat_id }) => (OperationKind::Issue, chat_id.as_deref()),
        None => (prompt_operation(&mut console)?, None),
    };

    let request = match kind {
        OperationKind::Query => VerificationRequest::query(&config.auth_key),
        OperationKind::Issue => {
            let channel = match chat_id {
                Some(raw) => ChannelIdentity::new(raw)?,
                None => prompt_channel(&mut console)?,
            };
            VerificationRequest::issue(&config.auth_key, channel)
        }
    };

    info!("Sending {kind} request to {}", orchestrator.service().endpoint());
    match orchestrator.run(&request, &mut console)? {
        Outcome::Rendered(lines) => info!("Rendered {} field line(s)", lines.len()),
        Outcome::Accepted { attempts } => info!("Handshake completed after {attempts} attempt(s)"),
    }
    Ok(())
}
