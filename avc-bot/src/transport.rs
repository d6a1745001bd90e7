use crate::error::BotError;
use crate::telegram::Update;
use async_trait::async_trait;
use avc_core::channel::Reply;

/// A chat platform the bot listens on and replies through.
#[async_trait]
pub trait ChatTransport: Send + Sync {
    /// Waits for updates newer than `offset`.
    ///
    /// # Errors
    ///
    /// Returns a `BotError` if the platform could not be polled.
    async fn poll(&self, offset: Option<i64>) -> Result<Vec<Update>, BotError>;

    /// Sends one reply.
    ///
    /// # Errors
    ///
    /// Returns a `BotError` if the platform did not accept the message.
    async fn send(&self, reply: &Reply) -> Result<(), BotError>;
}
