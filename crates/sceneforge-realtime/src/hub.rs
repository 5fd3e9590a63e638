//! Status hub — keyed pub/sub registry for per-job status events.
//!
//! Each job id maps to a list of subscriber senders. Events published for
//! a job are fanned out to every live subscriber in publish order; an
//! unbounded channel per subscriber preserves ordering without ever
//! blocking the publishing pipeline. Delivery is fire-and-forget: there
//! is no persistence and no replay for late subscribers.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;
use tokio::sync::mpsc;
use tracing::debug;

use crate::message::StatusEvent;

/// Subscriber senders for one job, tagged so each subscription can
/// remove exactly its own sender on drop.
type SenderList = Vec<(u64, mpsc::UnboundedSender<StatusEvent>)>;

/// Registry of per-job status subscribers.
#[derive(Debug, Default)]
pub struct StatusHub {
    /// Job id → subscriber senders.
    channels: Arc<DashMap<String, SenderList>>,
    /// Token source for subscription identity.
    next_token: AtomicU64,
}

/// A live subscription to one job's status stream.
///
/// Dropping the subscription unregisters its sender immediately, and the
/// job's registry entry is removed once its last subscriber is gone. A
/// subscription to a job id that never publishes therefore cannot leave
/// anything behind.
#[derive(Debug)]
pub struct StatusSubscription {
    rx: mpsc::UnboundedReceiver<StatusEvent>,
    job_id: String,
    token: u64,
    channels: Arc<DashMap<String, SenderList>>,
}

impl StatusSubscription {
    /// Receive the next event, or `None` once the job's channel is closed.
    pub async fn recv(&mut self) -> Option<StatusEvent> {
        self.rx.recv().await
    }

    /// Drain any events already delivered without waiting.
    pub fn drain(&mut self) -> Vec<StatusEvent> {
        let mut events = Vec::new();
        while let Ok(event) = self.rx.try_recv() {
            events.push(event);
        }
        events
    }
}

impl Drop for StatusSubscription {
    fn drop(&mut self) {
        if let Some(mut senders) = self.channels.get_mut(&self.job_id) {
            senders.retain(|(token, _)| *token != self.token);
        }
        // remove_if re-checks emptiness under the shard lock, so a
        // concurrent subscribe cannot be discarded.
        self.channels
            .remove_if(&self.job_id, |_, senders| senders.is_empty());
    }
}

impl StatusHub {
    /// Creates an empty hub.
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribes to the status stream of a job id.
    pub fn subscribe(&self, job_id: &str) -> StatusSubscription {
        let (tx, rx) = mpsc::unbounded_channel();
        let token = self.next_token.fetch_add(1, Ordering::Relaxed);
        self.channels
            .entry(job_id.to_string())
            .or_default()
            .push((token, tx));

        debug!(job_id = %job_id, "Status subscriber registered");
        StatusSubscription {
            rx,
            job_id: job_id.to_string(),
            token,
            channels: Arc::clone(&self.channels),
        }
    }

    /// Publishes one status event to all subscribers of `job_id`.
    ///
    /// An absent or empty job id is a valid no-op: conversion proceeds,
    /// nothing is delivered or recorded. Closed subscribers are pruned.
    pub fn publish(&self, job_id: Option<&str>, message: impl Into<String>, progress: Option<u8>) {
        let job_id = match job_id {
            Some(id) if !id.is_empty() => id,
            _ => return,
        };

        let event = StatusEvent::status(message, progress);

        if let Some(mut senders) = self.channels.get_mut(job_id) {
            senders.retain(|(_, tx)| tx.send(event.clone()).is_ok());
        }
    }

    /// Closes a job's channel, waking subscribers with end-of-stream.
    ///
    /// Called once by the pipeline when a job's handling routine returns.
    pub fn close(&self, job_id: Option<&str>) {
        if let Some(id) = job_id {
            if !id.is_empty() {
                self.channels.remove(id);
            }
        }
    }

    /// Number of jobs with at least one registered subscriber list.
    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    /// Number of subscribers currently registered for a job id.
    pub fn subscriber_count(&self, job_id: &str) -> usize {
        self.channels.get(job_id).map(|s| s.len()).unwrap_or(0)
    }
}
