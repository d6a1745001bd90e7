//! Replies sent by the channel identity bot.
//!
//! All text is written in Telegram's MarkdownV2 dialect. Anything
//! interpolated into a reply goes through [`escape_markdown_v2`] first.

use crate::request::ChannelIdentity;

/// The `parse_mode` every reply is sent with.
pub const PARSE_MODE: &str = "MarkdownV2";

const MARKDOWN_V2_RESERVED: &[char] = &[
    '\\', '.', '-', '_', '*', '[', ']', '(', ')', '~', '`', '>', '#', '+', '=', '|', '{', '}', '!',
];

const WELCOME_TEXT: &str = "Welcome to *AppVerify Code*\\, a *free* OTP verification code sending service for *individuals and businesses*\\.\n\
Instead of having to pay to use OTP verification services\\, you just need to register to use *AppVerify Code*'s service \
with a little understanding of API and you can use it\\.";

/// Escapes every character MarkdownV2 treats as markup.
#[must_use]
pub fn escape_markdown_v2(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if MARKDOWN_V2_RESERVED.contains(&c) {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// The commands the bot answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// `/start`: reveal the sender's chat id.
    Register,
    /// `/create`: describe the service and link to registration.
    Info,
}

impl Command {
    /// Recognises a command at the start of a message.
    ///
    /// A `@botname` suffix and trailing arguments are accepted.
    #[must_use]
    pub fn parse(text: &str) -> Option<Self> {
        let token = text.split_whitespace().next()?;
        let name = token.strip_prefix('/')?;
        let name = name.split_once('@').map_or(name, |(name, _)| name);
        match name {
            "start" => Some(Self::Register),
            "create" => Some(Self::Info),
            _ => None,
        }
    }
}

/// A link button attached below a reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkButton {
    /// Button caption.
    pub text: String,
    /// Target URL.
    pub url: String,
}

/// One message to send, already formatted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    /// Destination chat.
    pub chat: ChannelIdentity,
    /// MarkdownV2 body.
    pub text: String,
    /// Link buttons, one per row.
    pub buttons: Vec<LinkButton>,
}

/// Links advertised by the info reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InfoLinks {
    /// Where operators sign up for an auth key.
    pub register_url: String,
    /// Where the API is documented.
    pub docs_url: String,
}

impl Reply {
    /// Tells the sender which chat id to enter into the app.
    #[must_use]
    pub fn registration(chat: ChannelIdentity) -> Self {
        let text = format!(
            "Your ChatID is *{}*\\. Please enter this ChatID into the app to receive OTP verification code\\.",
            escape_markdown_v2(chat.as_str())
        );
        Self {
            chat,
            text,
            buttons: Vec::new(),
        }
    }

    /// Describes the service.
    #[must_use]
    pub fn info(chat: ChannelIdentity, links: &InfoLinks) -> Self {
        Self {
            chat,
            text: WELCOME_TEXT.to_string(),
            buttons: vec![
                LinkButton {
                    text: "✔ Register".into(),
                    url: links.register_url.clone(),
                },
                LinkButton {
                    text: "📃 Document".into(),
                    url: links.docs_url.clone(),
                },
            ],
        }
    }

    /// Builds the reply to `command` for the chat it came from.
    #[must_use]
    pub fn for_command(command: Command, chat: ChannelIdentity, links: &InfoLinks) -> Self {
        match command {
            Command::Register => Self::registration(chat),
            Command::Info => Self::info(chat, links),
        }
    }
}
