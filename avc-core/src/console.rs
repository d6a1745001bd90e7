use crate::error::{Result, VerifyError};
use crate::request::{ChannelIdentity, OperationKind};
use std::collections::VecDeque;

/// Prompt shown when asking for the operation.
pub const METHOD_PROMPT: &str = "RESTful Method (GET, POST): ";
/// Prompt shown when asking for the delivery chat id.
pub const CHAT_ID_PROMPT: &str = "ChatID: ";
/// Prompt shown when asking for the received code.
pub const CODE_PROMPT: &str = "Verification Code: ";

/// The operator's side of the handshake.
pub trait Console {
    /// Shows `label` and reads one line of input, without its line terminator.
    ///
    /// # Errors
    ///
    /// Returns `VerifyError::InputClosed` when input has ended, or
    /// `VerifyError::InputTimedOut` when the operator took too long.
    fn prompt(&mut self, label: &str) -> Result<String>;

    /// Shows one line of output.
    fn say(&mut self, line: &str);
}

/// Asks for an operation until the operator enters `GET` or `POST`.
///
/// # Errors
///
/// Propagates console failures; unsupported input is never an error here.
pub fn prompt_operation(console: &mut dyn Console) -> Result<OperationKind> {
    loop {
        match console.prompt(METHOD_PROMPT)?.parse::<OperationKind>() {
            Ok(kind) => return Ok(kind),
            Err(VerifyError::UnsupportedMethod(method)) => {
                log::debug!("Rejected method '{method}'");
                console.say("Unsupported");
            }
            Err(e) => return Err(e),
        }
    }
}

/// Asks for a chat id until the operator enters a non-empty one.
///
/// # Errors
///
/// Propagates console failures.
pub fn prompt_channel(console: &mut dyn Console) -> Result<ChannelIdentity> {
    loop {
        if let Ok(channel) = ChannelIdentity::new(&console.prompt(CHAT_ID_PROMPT)?) {
            return Ok(channel);
        }
        console.say("A ChatID is required for POST");
    }
}

/// A console that replays fixed input and records everything shown.
#[derive(Debug, Default)]
pub struct ScriptedConsole {
    input: VecDeque<String>,
    /// Every prompt label shown, in order.
    pub prompts: Vec<String>,
    /// Every output line shown, in order.
    pub output: Vec<String>,
}

impl ScriptedConsole {
    /// Creates a console that answers prompts with `input`, in order.
    pub fn new<I, S>(input: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            input: input.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// How many scripted answers have not been consumed yet.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.input.len()
    }
}

impl Console for ScriptedConsole {
    fn prompt(&mut self, label: &str) -> Result<String> {
        self.prompts.push(label.to_string());
        self.input.pop_front().ok_or(VerifyError::InputClosed)
    }

    fn say(&mut self, line: &str) {
        self.output.push(line.to_string());
    }
}
