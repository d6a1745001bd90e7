#![deny(missing_docs)]
//! The AppVerify Code Telegram bot, which tells users the chat id to enter into the CLI.

use avc_bot::Bot;
use avc_bot::telegram::TelegramApi;
use avc_core::channel::InfoLinks;
use avc_core::config::BotConfig;
use log::{error, info};
use std::process::ExitCode;
use std::sync::Arc;

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::init();

    let config = match BotConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("{e}");
            return ExitCode::FAILURE;
        }
    };
    let api = match TelegramApi::new(&config) {
        Ok(api) => api,
        Err(e) => {
            error!("Failed to set up the Telegram client: {e}");
            return ExitCode::FAILURE;
        }
    };

    let links = InfoLinks {
        register_url: config.register_url,
        docs_url: config.docs_url,
    };
    let bot = Bot::new(Arc::new(api), links);

    tokio::select! {
        delivered = bot.run() => info!("Bot stopped after {delivered} replies"),
        result = tokio::signal::ctrl_c() => match result {
            Ok(()) => info!("Received Ctrl-C, shutting down"),
            Err(e) => error!("Failed to listen for Ctrl-C: {e}"),
        },
    }
    ExitCode::SUCCESS
}
