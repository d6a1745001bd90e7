// File:    dispatcher.rs
// Author:  apezoo
// Date:    2026-10-14
//
// Description: The poller loop that queues inbound updates and the dispatcher loop that answers them.
//
// License:
// This project is licensed under the terms of the GNU AGPLv3 license.
// See the LICENSE.md file in the project root for full license information.

use crate::telegram::Update;
use crate::transport::ChatTransport;
use avc_core::channel::{Command, InfoLinks, Reply};
use avc_core::request::ChannelIdentity;
use log::{debug, error, info, warn};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

/// How many updates may wait for the dispatcher before the poller pauses.
pub const DEFAULT_QUEUE_DEPTH: usize = 64;
/// Pause after a failed poll before trying again.
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(3);

/// Builds the reply to an update, if it carries a known command.
#[must_use]
pub fn reply_for(update: &Update, links: &InfoLinks) -> Option<Reply> {
    let message = update.message.as_ref()?;
    let command = Command::parse(message.text.as_deref()?)?;
    Some(Reply::for_command(command, ChannelIdentity::from(message.chat.id), links))
}

/// Polls `transport` forever, pushing every update onto `queue`.
///
/// Each batch is acknowledged by asking for the next `update_id`. Returns
/// once the queue has been closed by the dispatcher.
pub async fn run_poller<T>(transport: &T, queue: mpsc::Sender<Update>, retry_delay: Duration)
where
    T: ChatTransport + ?Sized,
{
    let mut offset = None;
    loop {
        match transport.poll(offset).await {
            Ok(updates) => {
                for update in updates {
                    offset = Some(update.update_id + 1);
                    if queue.send(update).await.is_err() {
                        debug!("Dispatcher queue closed; stopping poller");
                        return;
                    }
                }
            }
            Err(e) => {
                warn!("Polling failed: {e}. Retrying in {}s", retry_delay.as_secs_f32());
                tokio::time::sleep(retry_delay).await;
            }
        }
    }
}

/// Answers queued updates one at a time until the queue is closed.
///
/// Returns the number of replies that were delivered.
pub async fn run_dispatcher<T>(transport: &T, mut queue: mpsc::Receiver<Update>, links: &InfoLinks) -> u64
where
    T: ChatTransport + ?Sized,
{
    let mut delivered = 0;
    while let Some(update) = queue.recv().await {
        let Some(reply) = reply_for(&update, links) else {
            debug!("Ignoring update {}", update.update_id);
            continue;
        };
        match transport.send(&reply).await {
            Ok(()) => {
                delivered += 1;
                info!("Answered chat {}", reply.chat);
            }
            Err(e) => error!("Failed to answer chat {}: {e}", reply.chat),
        }
    }
    delivered
}

/// The channel identity bot: one poller feeding one dispatcher.
pub struct Bot<T> {
    transport: Arc<T>,
    links: InfoLinks,
    queue_depth: usize,
    retry_delay: Duration,
}

impl<T: ChatTransport + 'static> Bot<T> {
    /// Creates a bot answering through `transport`.
    pub const fn new(transport: Arc<T>, links: InfoLinks) -> Self {
        Self {
            transport,
            links,
            queue_depth: DEFAULT_QUEUE_DEPTH,
            retry_delay: DEFAULT_RETRY_DELAY,
        }
    }

    /// Changes the pause after a failed poll.
    #[must_use]
    pub fn with_retry_delay(mut self, retry_delay: Duration) -> Self {
        self.retry_delay = retry_delay;
        self
    }

    /// Runs until the transport stops producing updates for good.
    ///
    /// In practice this only happens when the task is cancelled.
    pub async fn run(self) -> u64 {
        let (tx, rx) = mpsc::channel(self.queue_depth.max(1));
        let poller_transport = Arc::clone(&self.transport);
        let retry_delay = self.retry_delay;
        let poller = tokio::spawn(async move {
            run_poller(poller_transport.as_ref(), tx, retry_delay).await;
        });

        info!("Bot is listening for commands");
        let delivered = run_dispatcher(self.transport.as_ref(), rx, &self.links).await;
        poller.abort();
        delivered
    }
}
