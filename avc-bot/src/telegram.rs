//! A minimal Telegram Bot API client: `getUpdates` and `sendMessage`.

use crate::error::BotError;
use crate::transport::ChatTransport;
use async_trait::async_trait;
use avc_core::channel::{LinkButton, Reply, PARSE_MODE};
use avc_core::config::BotConfig;
use log::debug;
use reqwest::Client;
use secrecy::{ExposeSecret, Secret};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const SEND_TIMEOUT: Duration = Duration::from_secs(10);
const POLL_GRACE: Duration = Duration::from_secs(10);

/// One entry of a `getUpdates` result.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct Update {
    /// Monotonic id used to acknowledge updates.
    pub update_id: i64,
    /// Present when the update is a new message.
    #[serde(default)]
    pub message: Option<Message>,
}

/// An inbound message.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct Message {
    /// The chat the message was sent in.
    pub chat: Chat,
    /// The message text, absent for stickers, photos and the like.
    #[serde(default)]
    pub text: Option<String>,
}

/// The chat a message belongs to.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct Chat {
    /// Telegram's identifier for the chat.
    pub id: i64,
}

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    ok: bool,
    result: Option<T>,
    #[serde(default)]
    description: Option<String>,
}

#[derive(Debug, Serialize)]
struct GetUpdates {
    #[serde(skip_serializing_if = "Option::is_none")]
    offset: Option<i64>,
    timeout: u64,
    allowed_updates: [&'static str; 1],
}

#[derive(Debug, Serialize)]
struct SendMessage<'a> {
    chat_id: &'a str,
    text: &'a str,
    parse_mode: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    reply_markup: Option<InlineKeyboard<'a>>,
}

#[derive(Debug, Serialize)]
struct InlineKeyboard<'a> {
    inline_keyboard: Vec<[Button<'a>; 1]>,
}

#[derive(Debug, Serialize)]
struct Button<'a> {
    text: &'a str,
    url: &'a str,
}

impl<'a> From<&'a LinkButton> for Button<'a> {
    fn from(button: &'a LinkButton) -> Self {
        Self {
            text: &button.text,
            url: &button.url,
        }
    }
}

/// Talks to the Telegram Bot API over HTTPS.
pub struct TelegramApi {
    client: Client,
    bot_url: Secret<String>,
    poll_timeout: Duration,
}

impl std::fmt::Debug for TelegramApi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramApi")
            .field("poll_timeout", &self.poll_timeout)
            .finish_non_exhaustive()
    }
}

impl TelegramApi {
    /// Creates a client for the bot described by `config`.
    ///
    /// # Errors
    ///
    /// Returns `BotError::Transport` if the HTTP client cannot be built.
    pub fn new(config: &BotConfig) -> Result<Self, BotError> {
        let client = Client::builder()
            .build()
            .map_err(|e| BotError::Transport(e.to_string()))?;
        Ok(Self {
            client,
            bot_url: Secret::new(format!("{}/bot{}", config.api_url, config.token.expose_secret())),
            poll_timeout: config.poll_timeout,
        })
    }

    async fn call<B, T>(&self, method: &str, body: &B, timeout: Duration) -> Result<T, BotError>
    where
        B: Serialize + Sync,
        T: DeserializeOwned,
    {
        let url = format!("{}/{method}", self.bot_url.expose_secret());
        let response = self
            .client
            .post(url)
            .timeout(timeout)
            .json(body)
            .send()
            .await
            .map_err(|e| BotError::Transport(e.without_url().to_string()))?;

        let status = response.status().as_u16();
        let envelope: Envelope<T> = response
            .json()
            .await
            .map_err(|e| BotError::Decode(e.without_url().to_string()))?;

        if !envelope.ok {
            return Err(BotError::Api {
                status,
                description: envelope.description.unwrap_or_default(),
            });
        }
        envelope
            .result
            .ok_or_else(|| BotError::Decode(format!("'{method}' returned no result")))
    }
}

#[async_trait]
impl ChatTransport for TelegramApi {
    async fn poll(&self, offset: Option<i64>) -> Result<Vec<Update>, BotError> {
        let request = GetUpdates {
            offset,
            timeout: self.poll_timeout.as_secs(),
            allowed_updates: ["message"],
        };
        let updates: Vec<Update> = self
            .call("getUpdates", &request, self.poll_timeout + POLL_GRACE)
            .await?;
        debug!("Received {} update(s)", updates.len());
        Ok(updates)
    }

    async fn send(&self, reply: &Reply) -> Result<(), BotError> {
        let reply_markup = (!reply.buttons.is_empty()).then(|| InlineKeyboard {
            inline_keyboard: reply.buttons.iter().map(|b| [Button::from(b)]).collect(),
        });
        let request = SendMessage {
            chat_id: reply.chat.as_str(),
            text: &reply.text,
            parse_mode: PARSE_MODE,
            reply_markup,
        };
        let _sent: serde_json::Value = self.call("sendMessage", &request, SEND_TIMEOUT).await?;
        Ok(())
    }
}
