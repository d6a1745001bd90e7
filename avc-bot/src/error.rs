use thiserror::Error;

/// Failures of the chat transport.
#[derive(Debug, Error)]
pub enum BotError {
    /// The Bot API could not be reached.
    #[error("Failed to reach the Bot API: {0}")]
    Transport(String),

    /// The Bot API refused the call.
    #[error("Bot API error {status}: {description}")]
    Api {
        /// HTTP status of the refusal.
        status: u16,
        /// The reason given by the API.
        description: String,
    },

    /// The Bot API answered with something that is not a valid envelope.
    #[error("Failed to decode Bot API response: {0}")]
    Decode(String),
}
