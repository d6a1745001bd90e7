use crate::config::AuthKey;
use crate::error::{Result, VerifyError};
use std::fmt;
use std::str::FromStr;

/// The path of the verification endpoint, relative to the service base URL.
pub const ENDPOINT_PATH: &str = "/api/otpVerification";

/// The two operations the Verification Service offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationKind {
    /// Read-only status lookup for the auth key (`GET`).
    Query,
    /// Issue a new code and deliver it to a channel identity (`POST`).
    Issue,
}

impl OperationKind {
    /// The HTTP method that carries this operation.
    #[must_use]
    pub const fn method(self) -> &'static str {
        match self {
            Self::Query => "GET",
            Self::Issue => "POST",
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.method())
    }
}

impl FromStr for OperationKind {
    type Err = VerifyError;

    /// Accepts exactly `GET` or `POST`.
    fn from_str(s: &str) -> Result<Self> {
        match s {
            "GET" => Ok(Self::Query),
            "POST" => Ok(Self::Issue),
            other => Err(VerifyError::UnsupportedMethod(other.to_string())),
        }
    }
}

/// Where an issued code should be delivered.
///
/// The value is opaque; in practice it is a Telegram chat id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelIdentity(String);

impl ChannelIdentity {
    /// Wraps an identifier, ignoring surrounding whitespace.
    ///
    /// # Errors
    ///
    /// Returns `VerifyError::InvalidChatId` if nothing is left after trimming.
    pub fn new(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(VerifyError::InvalidChatId(raw.to_string()));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// The identifier as sent on the wire.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<i64> for ChannelIdentity {
    fn from(chat_id: i64) -> Self {
        Self(chat_id.to_string())
    }
}

impl fmt::Display for ChannelIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One call to the Verification Service.
///
/// A channel identity is present exactly when the operation is an ISSUE.
#[derive(Debug)]
pub struct VerificationRequest<'a> {
    auth_key: &'a AuthKey,
    channel: Option<ChannelIdentity>,
}

impl<'a> VerificationRequest<'a> {
    /// A status query for `auth_key`.
    #[must_use]
    pub const fn query(auth_key: &'a AuthKey) -> Self {
        Self {
            auth_key,
            channel: None,
        }
    }

    /// A request to issue a code and deliver it to `channel`.
    #[must_use]
    pub const fn issue(auth_key: &'a AuthKey, channel: ChannelIdentity) -> Self {
        Self {
            auth_key,
            channel: Some(channel),
        }
    }

    /// Which operation this request performs.
    #[must_use]
    pub const fn kind(&self) -> OperationKind {
        if self.channel.is_some() {
            OperationKind::Issue
        } else {
            OperationKind::Query
        }
    }

    /// The delivery target of an ISSUE request.
    #[must_use]
    pub const fn channel(&self) -> Option<&ChannelIdentity> {
        self.channel.as_ref()
    }

    /// The query-string parameters of the request.
    #[must_use]
    pub fn query_pairs(&self) -> Vec<(&'static str, &str)> {
        let mut pairs = vec![("avc_authkey", self.auth_key.expose())];
        if let Some(channel) = &self.channel {
            pairs.push(("chat_id", channel.as_str()));
        }
        pairs
    }
}
