//! Process configuration.
//!
//! Both binaries read their secrets once at startup and hand the resulting
//! structs to the components that need them. Nothing below reads the
//! environment behind the caller's back: `from_lookup` takes the key source
//! explicitly, and `from_env` is a thin wrapper that plugs in `std::env`.

use crate::error::{Result, VerifyError};
use secrecy::{ExposeSecret, Secret};
use std::fmt;
use std::num::NonZeroU32;
use std::time::Duration;

/// Default location of the Verification Service.
pub const DEFAULT_BASE_URL: &str = "https://appverifycode.onrender.com";
/// Default location of the Telegram Bot API.
pub const DEFAULT_TELEGRAM_API_URL: &str = "https://api.telegram.org";
/// Default registration page advertised by the bot.
pub const DEFAULT_REGISTER_URL: &str = "https://appverifycode.glide.page";
/// Default documentation page advertised by the bot.
pub const DEFAULT_DOCS_URL: &str = "https://hitech-corporation.gitbook.io/appverifycode-api/";

const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;
const DEFAULT_MAX_ATTEMPTS: u32 = 5;
const DEFAULT_POLL_TIMEOUT_SECS: u64 = 30;

/// The secret that identifies the caller to the Verification Service.
pub struct AuthKey(Secret<String>);

impl AuthKey {
    /// Wraps a raw key.
    ///
    /// # Errors
    ///
    /// Returns `VerifyError::Config` if the key is empty or only whitespace.
    pub fn new(raw: impl Into<String>) -> Result<Self> {
        let raw = raw.into();
        if raw.trim().is_empty() {
            return Err(VerifyError::Config("the auth key must not be empty".into()));
        }
        Ok(Self(Secret::new(raw)))
    }

    /// Returns the raw key for placing it on the wire.
    #[must_use]
    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }
}

impl fmt::Debug for AuthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AuthKey([REDACTED])")
    }
}

/// Configuration of the operator-facing verification client.
#[derive(Debug)]
pub struct ClientConfig {
    /// Secret sent as `avc_authkey` on every request.
    pub auth_key: AuthKey,
    /// Base URL of the Verification Service, without a trailing slash.
    pub base_url: String,
    /// Upper bound on a single HTTP exchange.
    pub http_timeout: Duration,
    /// Maximum number of codes the operator may enter. `None` means unbounded.
    pub max_attempts: Option<NonZeroU32>,
    /// How long to wait for one line of operator input. `None` waits forever.
    pub input_timeout: Option<Duration>,
}

impl ClientConfig {
    /// Loads a `.env` file if present, then reads the process environment.
    ///
    /// # Errors
    ///
    /// Returns `VerifyError::Config` if `AVC_AUTHKEY` is missing or a value
    /// cannot be parsed.
    pub fn from_env() -> Result<Self> {
        load_dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key source.
    ///
    /// # Errors
    ///
    /// Returns `VerifyError::Config` if `AVC_AUTHKEY` is missing or a value
    /// cannot be parsed.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let auth_key = lookup("AVC_AUTHKEY")
            .ok_or_else(|| VerifyError::Config("AVC_AUTHKEY is not set".into()))
            .and_then(AuthKey::new)?;
        let base_url = normalize_url(lookup("AVC_BASE_URL").as_deref().unwrap_or(DEFAULT_BASE_URL));
        let http_timeout = Duration::from_secs(
            parse_number(&lookup, "AVC_HTTP_TIMEOUT_SECS")?.unwrap_or(DEFAULT_HTTP_TIMEOUT_SECS),
        );
        let max_attempts = parse_number::<u32, _>(&lookup, "AVC_MAX_ATTEMPTS")?
            .map_or(NonZeroU32::new(DEFAULT_MAX_ATTEMPTS), NonZeroU32::new);
        let input_timeout = parse_number(&lookup, "AVC_INPUT_TIMEOUT_SECS")?.map(Duration::from_secs);

        Ok(Self {
            auth_key,
            base_url,
            http_timeout,
            max_attempts,
            input_timeout,
        })
    }
}

/// Configuration of the Telegram channel identity bot.
#[derive(Debug)]
pub struct BotConfig {
    /// Bot API credential.
    pub token: Secret<String>,
    /// Base URL of the Telegram Bot API, without a trailing slash.
    pub api_url: String,
    /// Link behind the "Register" button of the info reply.
    pub register_url: String,
    /// Link behind the "Document" button of the info reply.
    pub docs_url: String,
    /// Long-poll timeout handed to `getUpdates`.
    pub poll_timeout: Duration,
}

impl BotConfig {
    /// Loads a `.env` file if present, then reads the process environment.
    ///
    /// # Errors
    ///
    /// Returns `VerifyError::Config` if `TELEGRAM_BOT_TOKEN` is missing or a
    /// value cannot be parsed.
    pub fn from_env() -> Result<Self> {
        load_dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key source.
    ///
    /// # Errors
    ///
    /// Returns `VerifyError::Config` if `TELEGRAM_BOT_TOKEN` is missing or a
    /// value cannot be parsed.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let token = lookup("TELEGRAM_BOT_TOKEN")
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| VerifyError::Config("TELEGRAM_BOT_TOKEN is not set".into()))?;
        let poll_timeout = Duration::from_secs(
            parse_number(&lookup, "TELEGRAM_POLL_TIMEOUT_SECS")?.unwrap_or(DEFAULT_POLL_TIMEOUT_SECS),
        );

        Ok(Self {
            token: Secret::new(token),
            api_url: normalize_url(
                lookup("TELEGRAM_API_URL").as_deref().unwrap_or(DEFAULT_TELEGRAM_API_URL),
            ),
            register_url: lookup("AVC_REGISTER_URL").unwrap_or_else(|| DEFAULT_REGISTER_URL.into()),
            docs_url: lookup("AVC_DOCS_URL").unwrap_or_else(|| DEFAULT_DOCS_URL.into()),
            poll_timeout,
        })
    }
}

fn load_dotenv() {
    match dotenvy::dotenv() {
        Ok(path) => log::debug!("Loaded environment from '{}'", path.display()),
        Err(e) if e.not_found() => {}
        Err(e) => log::warn!("Ignoring unreadable .env file: {e}"),
    }
}

fn normalize_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}

fn parse_number<T, F>(lookup: &F, key: &str) -> Result<Option<T>>
where
    T: std::str::FromStr,
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|raw| {
            raw.trim()
                .parse()
                .map_err(|_| VerifyError::Config(format!("{key} must be a non-negative integer, got '{raw}'")))
        })
        .transpose()
}
