// File:    lib.rs
// Author:  apezoo
// Date:    2026-10-14
//
// Description: The main library crate for avc-core, orchestrating the OTP issuance and verification handshake.
//
// License:
// This project is licensed under the terms of the GNU AGPLv3 license.
// See the LICENSE.md file in the project root for full license information.

//! # AppVerify Code Core Library
//!
//! This library provides the core of the one-time passcode handshake: building
//! requests for the Verification Service, driving the code comparison loop,
//! rendering status queries, and formatting the replies the Telegram bot sends.

/// Formatting of the replies sent by the channel identity bot.
pub mod channel;
/// Process configuration for the CLI and the bot.
pub mod config;
/// Operator-facing prompts and the console abstraction.
pub mod console;
/// Error types shared by every part of the handshake.
pub mod error;
/// The verification orchestrator and its comparison state machine.
pub mod handshake;
/// Rendering of status query responses.
pub mod render;
/// Requests sent to the Verification Service.
pub mod request;
/// The Verification Service port and its HTTP adapter.
pub mod service;

pub use error::{Result, VerifyError};
