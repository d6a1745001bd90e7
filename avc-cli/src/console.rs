// File:    console.rs
// Author:  apezoo
// Date:    2026-10-14
//
// Description: The terminal console used by the CLI, with an optional wait limit on operator input.
//
// License:
// This project is licensed under the terms of the GNU AGPLv3 license.
// See the LICENSE.md file in the project root for full license information.

use avc_core::console::Console;
use avc_core::{Result, VerifyError};
use std::io::{self, BufRead, Write};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread;
use std::time::Duration;

/// Reads operator input from stdin and writes prompts to stdout.
///
/// Stdin is drained on a background thread so that a prompt can give up
/// after `timeout` without leaving a read in flight.
pub(crate) struct StdConsole {
    lines: Receiver<io::Result<String>>,
    timeout: Option<Duration>,
}

impl StdConsole {
    pub(crate) fn new(timeout: Option<Duration>) -> Self {
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            for line in io::stdin().lock().lines() {
                if tx.send(line).is_err() {
                    break;
                }
            }
        });
        Self { lines: rx, timeout }
    }
}

impl Console for StdConsole {
    fn prompt(&mut self, label: &str) -> Result<String> {
        print!("{label}");
        io::stdout().flush()?;

        let line = match self.timeout {
            Some(timeout) => self.lines.recv_timeout(timeout).map_err(|e| match e {
                RecvTimeoutError::Timeout => VerifyError::InputTimedOut,
                RecvTimeoutError::Disconnected => VerifyError::InputClosed,
            })?,
            None => self.lines.recv().map_err(|_| VerifyError::InputClosed)?,
        };
        Ok(line?)
    }

    fn say(&mut self, line: &str) {
        println!("{line}");
    }
}
