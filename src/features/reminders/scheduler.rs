//! # Reminder Scheduler
//!
//! Drives the reminder store: recovers reminders missed while the bot was
//! offline, then polls for due reminders on a fixed interval and hands each
//! to a [`ReminderSender`]. Transient failures are requeued, permanent ones
//! dropped.
//!
//! - **Version**: 2.0.0
//! - **Since**: 0.1.0
//!
//! ## Changelog
//! - 2.0.0: JSON store with downtime-aware missed reminder recovery
//! - 1.0.0: Database-backed scheduler

use async_trait::async_trait;
use chrono::Duration;
use log::{debug, info};
use std::sync::Arc;

use super::clock::Clock;
use super::store::{Reminder, SharedReminderStore};

/// Default poll interval for due reminders
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 30;
/// Default delay before retrying a transient delivery failure
pub const DEFAULT_RETRY_DELAY_SECS: i64 = 5 * 60;

/// Outcome of a single delivery attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryStatus {
    /// Delivered; nothing left to do
    Sent,
    /// Recipient is permanently unreachable; discard the reminder
    Drop,
    /// Transient failure; requeue for a later attempt
    Retry,
}

/// Delivers reminders to their recipients
#[async_trait]
pub trait ReminderSender: Send + Sync {
    /// Attempt delivery. `missed` marks reminders that came due while the bot
    /// was offline; `downtime` is how long it was offline, when known.
    async fn deliver(
        &self,
        reminder: &Reminder,
        missed: bool,
        downtime: Option<Duration>,
    ) -> DeliveryStatus;
}

/// Tally of one delivery batch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeliveryReport {
    pub sent: usize,
    pub dropped: usize,
    pub requeued: usize,
}

impl DeliveryReport {
    pub fn total(&self) -> usize {
        self.sent + self.dropped + self.requeued
    }
}

pub struct ReminderScheduler<S: ReminderSender> {
    store: SharedReminderStore,
    sender: Arc<S>,
    clock: Arc<dyn Clock>,
    poll_interval: std::time::Duration,
    retry_delay: Duration,
}

impl<S: ReminderSender> ReminderScheduler<S> {
    pub fn new(store: SharedReminderStore, sender: Arc<S>, clock: Arc<dyn Clock>) -> Self {
        Self {
            store,
            sender,
            clock,
            poll_interval: std::time::Duration::from_secs(DEFAULT_POLL_INTERVAL_SECS),
            retry_delay: Duration::seconds(DEFAULT_RETRY_DELAY_SECS),
        }
    }

    pub fn with_poll_interval(mut self, poll_interval: std::time::Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    pub fn with_retry_delay(mut self, retry_delay: Duration) -> Self {
        self.retry_delay = retry_delay;
        self
    }

    /// Recover missed reminders, then poll forever
    pub async fn run(self) {
        info!(
            "⏰ Reminder scheduler started (poll every {}s, retry after {}s)",
            self.poll_interval.as_secs(),
            self.retry_delay.num_seconds()
        );

        self.recover_missed().await;

        let mut interval = tokio::time::interval(self.poll_interval);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        // The first tick completes immediately; recovery already covered it.
        interval.tick().await;

        loop {
            interval.tick().await;
            self.poll_once().await;
        }
    }

    /// Deliver reminders that came due while the bot was offline.
    ///
    /// Consumes the shutdown marker so every missed reminder reports the same downtime.
    pub async fn recover_missed(&self) -> DeliveryReport {
        let (downtime, missed) = {
            let mut store = self.store.lock().await;
            let downtime = store.get_downtime();
            let missed = store.pop_due(self.clock.now());
            (downtime, missed)
        };

        match downtime {
            Some(d) => info!("Bot was offline for {}s", d.num_seconds()),
            None => debug!("No shutdown marker found, downtime unknown"),
        }

        if missed.is_empty() {
            return DeliveryReport::default();
        }

        info!("Found {} missed reminders", missed.len());
        let report = self.deliver_batch(missed, true, downtime).await;
        if report.requeued > 0 {
            info!("Requeued {} missed reminders for retry", report.requeued);
        }
        report
    }

    /// Deliver everything currently due, persisting once if anything was due
    pub async fn poll_once(&self) -> DeliveryReport {
        let due = {
            let mut store = self.store.lock().await;
            store.pop_due(self.clock.now())
        };

        if due.is_empty() {
            return DeliveryReport::default();
        }

        debug!("Delivering {} due reminders", due.len());
        let report = self.deliver_batch(due, false, None).await;
        if report.requeued > 0 {
            info!(
                "Requeued {} reminders due to transient errors",
                report.requeued
            );
        }
        report
    }

    async fn deliver_batch(
        &self,
        reminders: Vec<Reminder>,
        missed: bool,
        downtime: Option<Duration>,
    ) -> DeliveryReport {
        let mut report = DeliveryReport::default();
        let mut settled = Vec::new();
        let mut retries = Vec::new();

        for reminder in reminders {
            // Drop and Retry outcomes are logged by the sender
            match self.sender.deliver(&reminder, missed, downtime).await {
                DeliveryStatus::Sent => {
                    report.sent += 1;
                    settled.push(reminder);
                }
                DeliveryStatus::Drop => {
                    report.dropped += 1;
                    settled.push(reminder);
                }
                DeliveryStatus::Retry => {
                    report.requeued += 1;
                    retries.push(reminder);
                }
            }
        }

        let mut store = self.store.lock().await;
        for reminder in &settled {
            store.settle(reminder);
        }
        for reminder in retries {
            store.requeue(reminder, self.retry_delay);
        }
        store.persist();

        debug!(
            "Settled batch of {}: {} sent, {} dropped, {} requeued",
            report.total(),
            report.sent,
            report.dropped,
            report.requeued
        );
        report
    }
}

/// Graceful shutdown: record the shutdown instant, then flush pending reminders.
///
/// Reminders still being delivered are written too and come back as missed on restart.
pub async fn shutdown(store: &SharedReminderStore) {
    let store = store.lock().await;
    info!(
        "Saving {} pending reminders ({} mid-delivery) before shutdown",
        store.len(),
        store.in_flight().len()
    );
    store.save_shutdown_marker();
    store.persist();
    info!("Reminder shutdown sequence complete");
}
