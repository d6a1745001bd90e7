// File:    error.rs
// Author:  apezoo
// Date:    2026-10-14
//
// Description: The error taxonomy of the verification handshake.
//
// License:
// This project is licensed under the terms of the GNU AGPLv3 license.
// See the LICENSE.md file in the project root for full license information.

use thiserror::Error;

/// A specialized `Result` type for handshake operations.
pub type Result<T, E = VerifyError> = std::result::Result<T, E>;

/// Every way a handshake can fail.
///
/// A code mismatch is not represented here: it is an expected condition of
/// the comparison loop and never terminates the handshake on its own.
#[derive(Debug, Error)]
pub enum VerifyError {
    /// The operator asked for a method other than `GET` or `POST`.
    #[error("Unsupported method '{0}'")]
    UnsupportedMethod(String),

    /// The Verification Service answered with a status other than 200.
    #[error("Error: {status}")]
    Service {
        /// The HTTP status code returned by the service.
        status: u16,
    },

    /// The Verification Service could not be reached.
    #[error("Failed to reach the verification service: {0}")]
    Transport(String),

    /// The response body could not be parsed into the expected structure.
    #[error("Malformed response from the verification service: {0}")]
    MalformedResponse(String),

    /// An ISSUE response did not carry the issued code.
    #[error("Error: '{0}' not found in the response.")]
    MissingField(&'static str),

    /// The operator entered an empty chat id.
    #[error("Invalid chat id '{0}'")]
    InvalidChatId(String),

    /// The operator entered a value that is not a number.
    #[error("Invalid verification code format: '{0}'")]
    InvalidInputFormat(String),

    /// The operator used up every allowed attempt.
    #[error("Verification failed after {attempts} attempt(s)")]
    Exhausted {
        /// How many codes were entered before giving up.
        attempts: u32,
    },

    /// Operator input ended before the handshake completed.
    #[error("Operator input closed before the handshake completed")]
    InputClosed,

    /// No operator input arrived within the configured timeout.
    #[error("Timed out waiting for operator input")]
    InputTimedOut,

    /// The process configuration is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// An I/O error on the operator console.
    #[error("Console I/O error: {0}")]
    Io(#[from] std::io::Error),
}
