// File:    handshake.rs
// Author:  apezoo
// Date:    2026-10-14
//
// Description: Drives one issue-then-verify handshake, including the comparison loop over operator input.
//
// License:
// This project is licensed under the terms of the GNU AGPLv3 license.
// See the LICENSE.md file in the project root for full license information.

//! The verification orchestrator.
//!
//! A handshake is strictly sequential: one call to the Verification Service,
//! then (for an ISSUE) a loop that reads operator input until the entered
//! code matches the issued one or the attempt limit is reached.

use crate::console::{Console, CODE_PROMPT};
use crate::error::{Result, VerifyError};
use crate::render::render_query;
use crate::request::{OperationKind, VerificationRequest};
use crate::service::VerificationService;
use log::{debug, info, warn};
use serde_json::Value;
use std::num::NonZeroU32;

/// Name of the response field holding the issued code.
pub const CODE_FIELD: &str = "verificationCode";

const ACCEPTED_NOTICE: &str = "Verification Code correct";
const MISMATCH_NOTICE: &str = "Verification Code incorrect. Try again";
const INVALID_NOTICE: &str = "Verification Code must be a number. Try again";
const EXHAUSTED_NOTICE: &str = "Too many incorrect attempts";

/// An issued one-time passcode.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct OtpValue(u64);

impl OtpValue {
    /// Wraps a numeric code.
    #[must_use]
    pub const fn new(code: u64) -> Self {
        Self(code)
    }
}

impl std::fmt::Debug for OtpValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("OtpValue(***)")
    }
}

/// Converts operator input into a code.
///
/// Surrounding whitespace is ignored; everything else must be digits.
///
/// # Errors
///
/// Returns `VerifyError::InvalidInputFormat` if the input is not a number.
pub fn parse_code(raw: &str) -> Result<OtpValue> {
    raw.trim()
        .parse()
        .map(OtpValue)
        .map_err(|_| VerifyError::InvalidInputFormat(raw.to_string()))
}

/// Pulls the issued code out of an ISSUE response.
///
/// # Errors
///
/// Returns `VerifyError::MissingField` if the field is absent or null, and
/// `VerifyError::MalformedResponse` if it is not a non-negative integer.
pub fn extract_code(data: &Value) -> Result<OtpValue> {
    let fields = data
        .as_object()
        .ok_or_else(|| VerifyError::MalformedResponse("expected a JSON object".into()))?;
    match fields.get(CODE_FIELD) {
        None | Some(Value::Null) => Err(VerifyError::MissingField(CODE_FIELD)),
        Some(value) => value.as_u64().map(OtpValue).ok_or_else(|| {
            VerifyError::MalformedResponse(format!("'{CODE_FIELD}' is not a non-negative integer"))
        }),
    }
}

/// Where the comparison loop stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandshakeState {
    /// Waiting for the operator to enter a code.
    AwaitingInput,
    /// An entered code is being compared.
    Comparing,
    /// The entered code matched. Terminal.
    Accepted,
    /// Every allowed attempt was used without a match. Terminal.
    Exhausted,
}

/// What a single submitted code led to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attempt {
    /// The code matched the issued one.
    Accepted,
    /// The code was a number but did not match.
    Mismatch,
    /// The input was not a number. Counts as an attempt.
    InvalidFormat,
    /// The attempt limit has been reached.
    Exhausted,
}

/// The comparison state machine for one issued code.
#[derive(Debug)]
pub struct CodeCheck {
    issued: OtpValue,
    attempts: u32,
    limit: Option<NonZeroU32>,
    state: HandshakeState,
}

impl CodeCheck {
    /// Starts a comparison for `issued`, allowing at most `limit` attempts.
    #[must_use]
    pub const fn new(issued: OtpValue, limit: Option<NonZeroU32>) -> Self {
        Self {
            issued,
            attempts: 0,
            limit,
            state: HandshakeState::AwaitingInput,
        }
    }

    /// The current state.
    #[must_use]
    pub const fn state(&self) -> HandshakeState {
        self.state
    }

    /// How many codes have been submitted so far.
    #[must_use]
    pub const fn attempts(&self) -> u32 {
        self.attempts
    }

    /// Compares one line of operator input against the issued code.
    ///
    /// Once the check is terminal, further input is ignored and the terminal
    /// outcome is reported again.
    pub fn submit(&mut self, raw: &str) -> Attempt {
        match self.state {
            HandshakeState::Accepted => return Attempt::Accepted,
            HandshakeState::Exhausted => return Attempt::Exhausted,
            HandshakeState::AwaitingInput | HandshakeState::Comparing => {}
        }

        self.state = HandshakeState::Comparing;
        self.attempts = self.attempts.saturating_add(1);
        let entered = parse_code(raw);

        if matches!(entered, Ok(code) if code == self.issued) {
            self.state = HandshakeState::Accepted;
            return Attempt::Accepted;
        }
        if self.limit.is_some_and(|limit| self.attempts >= limit.get()) {
            self.state = HandshakeState::Exhausted;
            return Attempt::Exhausted;
        }

        self.state = HandshakeState::AwaitingInput;
        if entered.is_err() {
            Attempt::InvalidFormat
        } else {
            Attempt::Mismatch
        }
    }
}

/// How a handshake ended successfully.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// A status query, with the lines shown to the operator.
    Rendered(Vec<String>),
    /// The operator entered the issued code.
    Accepted {
        /// Number of codes entered, including the correct one.
        attempts: u32,
    },
}

/// Runs handshakes against a Verification Service.
#[derive(Debug)]
pub struct Orchestrator<S> {
    service: S,
    max_attempts: Option<NonZeroU32>,
}

impl<S: VerificationService> Orchestrator<S> {
    /// Creates an orchestrator with no attempt limit.
    pub const fn new(service: S) -> Self {
        Self {
            service,
            max_attempts: None,
        }
    }

    /// Limits how many codes the operator may enter per handshake.
    #[must_use]
    pub fn with_max_attempts(mut self, limit: Option<NonZeroU32>) -> Self {
        self.max_attempts = limit;
        self
    }

    /// The underlying service.
    pub const fn service(&self) -> &S {
        &self.service
    }

    /// Runs one complete handshake.
    ///
    /// # Errors
    ///
    /// Any service, transport or parsing failure ends the handshake
    /// immediately; so does running out of attempts or operator input.
    pub fn run(&self, request: &VerificationRequest<'_>, console: &mut dyn Console) -> Result<Outcome> {
        let kind = request.kind();
        let reply = self.service.send(request)?;
        if reply.status != 200 {
            warn!("{kind} request rejected with status {}", reply.status);
            return Err(VerifyError::Service { status: reply.status });
        }

        let data: Value = serde_json::from_str(&reply.body)
            .map_err(|e| VerifyError::MalformedResponse(e.to_string()))?;

        match kind {
            OperationKind::Query => {
                let lines = render_query(&data)?;
                for line in &lines {
                    console.say(line);
                }
                Ok(Outcome::Rendered(lines))
            }
            OperationKind::Issue => {
                let issued = extract_code(&data)?;
                if let Some(channel) = request.channel() {
                    info!("Code issued for chat {channel}");
                }
                self.compare(issued, console)
            }
        }
    }

    fn compare(&self, issued: OtpValue, console: &mut dyn Console) -> Result<Outcome> {
        let mut check = CodeCheck::new(issued, self.max_attempts);
        loop {
            let raw = console.prompt(CODE_PROMPT)?;
            match check.submit(&raw) {
                Attempt::Accepted => {
                    info!("Code accepted after {} attempt(s)", check.attempts());
                    console.say(ACCEPTED_NOTICE);
                    return Ok(Outcome::Accepted {
                        attempts: check.attempts(),
                    });
                }
                Attempt::Mismatch => {
                    debug!("Attempt {} did not match", check.attempts());
                    console.say(MISMATCH_NOTICE);
                }
                Attempt::InvalidFormat => {
                    debug!("Attempt {} was not a number", check.attempts());
                    console.say(INVALID_NOTICE);
                }
                Attempt::Exhausted => {
                    warn!("Giving up after {} attempt(s)", check.attempts());
                    console.say(EXHAUSTED_NOTICE);
                    return Err(VerifyError::Exhausted {
                        attempts: check.attempts(),
                    });
                }
            }
        }
    }
}
