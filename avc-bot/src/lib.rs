// File:    lib.rs
// Author:  apezoo
// Date:    2026-10-14
//
// Description: The channel identity bot: long-polls Telegram and answers /start and /create.
//
// License:
// This project is licensed under the terms of the GNU AGPLv3 license.
// See the LICENSE.md file in the project root for full license information.

//! # AppVerify Code Bot
//!
//! Inbound messages are fetched by a single poller task and queued; a single
//! dispatcher task answers them in arrival order.

/// The poller and dispatcher loops.
pub mod dispatcher;
/// Errors raised while talking to the chat platform.
pub mod error;
/// The Telegram Bot API client and its wire types.
pub mod telegram;
/// The chat transport port.
pub mod transport;

pub use dispatcher::Bot;
pub use error::BotError;
