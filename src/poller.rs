//! Repeating refresh tasks with an explicit start/stop lifecycle.
//!
//! A [`Poller`] owns one background tokio task that runs a fetch immediately
//! and then once per interval, forwarding every outcome to its consumer over
//! an `mpsc` channel. A failed fetch is reported and the poller keeps going.
//! The task ends when [`Poller::stop`] is called, when the poller is dropped,
//! or when the receiver goes away.

use std::future::Future;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use crate::constants::POLLER_SHUTDOWN_TIMEOUT;
use crate::domain::ExplorerError;

/// Outcome of one poll.
#[derive(Debug, Clone, PartialEq)]
pub struct PollUpdate<T> {
    /// 1 for the immediate first run.
    pub tick: u64,
    pub result: Result<T, String>,
}

/// Handle to a running refresh task.
#[derive(Debug)]
pub struct Poller {
    name: String,
    cancel: CancellationToken,
    handle: Option<JoinHandle<()>>,
}

impl Poller {
    /// Spawn a refresh task on the current tokio runtime.
    ///
    /// `task` receives a cancellation token that fires when the poller is
    /// stopped, so an in-flight fetch can be abandoned.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for a zero interval.
    pub fn start<T, F, Fut>(
        name: impl Into<String>,
        interval: Duration,
        sender: mpsc::Sender<PollUpdate<T>>,
        mut task: F,
    ) -> Result<Self, ExplorerError>
    where
        T: Send + 'static,
        F: FnMut(CancellationToken) -> Fut + Send + 'static,
        Fut: Future<Output = Result<T, ExplorerError>> + Send + 'static,
    {
        if interval.is_zero() {
            return Err(ExplorerError::invalid_input(
                "refresh interval must be greater than zero",
            ));
        }

        let name = name.into();
        let cancel = CancellationToken::new();
        let token = cancel.clone();
        let task_name = name.clone();

        tracing::info!("Starting poller '{name}' every {interval:?}");

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            let mut tick = 0u64;

            loop {
                tokio::select! {
                    biased;
                    () = token.cancelled() => break,
                    _ = ticker.tick() => {}
                }

                let result = tokio::select! {
                    biased;
                    () = token.cancelled() => break,
                    result = task(token.child_token()) => result,
                };

                tick += 1;
                if let Err(e) = &result {
                    tracing::debug!("Poller '{task_name}' tick {tick} failed: {e}");
                }

                let update = PollUpdate {
                    tick,
                    result: result.map_err(|e| e.to_string()),
                };
                let sent = tokio::select! {
                    biased;
                    () = token.cancelled() => break,
                    sent = sender.send(update) => sent,
                };
                if sent.is_err() {
                    tracing::debug!("Poller '{task_name}' receiver dropped");
                    break;
                }
            }

            tracing::info!("Poller '{task_name}' stopped after {tick} ticks");
        });

        Ok(Self {
            name,
            cancel,
            handle: Some(handle),
        })
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Cancel the task and wait for it to finish.
    pub async fn stop(mut self) {
        self.cancel.cancel();
        if let Some(handle) = self.handle.take() {
            match tokio::time::timeout(POLLER_SHUTDOWN_TIMEOUT, handle).await {
                Ok(Ok(())) => {}
                Ok(Err(e)) => tracing::warn!("Poller '{}' task failed: {e}", self.name),
                Err(_) => tracing::warn!("Poller '{}' did not stop in time", self.name),
            }
        }
    }
}

impl Drop for Poller {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

// ============================================================================
// Tests
// ============================================================================
