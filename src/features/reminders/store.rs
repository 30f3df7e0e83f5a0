//! # Reminder Store
//!
//! Owns the pending reminder list, persists it as JSON, and tracks the
//! graceful-shutdown marker used to detect reminders missed while offline.
//!
//! All operations are synchronous. Mutations must be serialized by the caller,
//! which is what [`SharedReminderStore`] is for: command handlers and the
//! scheduler share one store behind an async mutex.
//!
//! Reminders handed out by [`ReminderStore::pop_due`] stay in an in-flight
//! list until they are settled or requeued, and are written with every
//! persist, so a shutdown in the middle of delivery does not lose them.
//!
//! File I/O never fails the process. Load and persist errors are logged and the
//! store keeps working from memory.
//!
//! - **Version**: 1.2.0
//! - **Since**: 1.0.0
//!
//! ## Changelog
//! - 1.2.0: Track in-flight reminders until delivery settles
//! - 1.1.0: Atomic reminder file writes, per-owner listing
//! - 1.0.0: Initial JSON-backed store with shutdown marker

use anyhow::{Context, Result};
use chrono::{Duration, NaiveDateTime};
use log::{debug, error, info, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Mutex;

use super::clock::Clock;

/// Handle shared between command handlers and the reminder scheduler
pub type SharedReminderStore = Arc<Mutex<ReminderStore>>;

/// A single pending reminder
///
/// Field names on disk match the reminder files written by earlier releases.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reminder {
    /// Discord user id of the recipient
    #[serde(rename = "user_id")]
    pub owner_id: u64,
    pub message: String,
    /// Local wall-clock instant the reminder becomes deliverable
    #[serde(rename = "remind_time")]
    pub due_at: NaiveDateTime,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Serialize, Deserialize)]
struct ShutdownMarker {
    shutdown_time: NaiveDateTime,
}

pub struct ReminderStore {
    pending: Vec<Reminder>,
    /// Popped as due but not yet settled or requeued
    in_flight: Vec<Reminder>,
    reminders_path: PathBuf,
    shutdown_path: PathBuf,
    clock: Arc<dyn Clock>,
}

impl ReminderStore {
    /// Create an empty store. Call [`ReminderStore::load`] to restore persisted reminders.
    pub fn new(
        reminders_path: impl Into<PathBuf>,
        shutdown_path: impl Into<PathBuf>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            pending: Vec::new(),
            in_flight: Vec::new(),
            reminders_path: reminders_path.into(),
            shutdown_path: shutdown_path.into(),
            clock,
        }
    }

    /// Wrap the store in the shared handle used across tasks
    pub fn into_shared(self) -> SharedReminderStore {
        Arc::new(Mutex::new(self))
    }

    /// Pending reminders, ascending by due time
    pub fn pending(&self) -> &[Reminder] {
        &self.pending
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Pending reminders belonging to one user, ascending by due time
    pub fn pending_for(&self, owner_id: u64) -> Vec<&Reminder> {
        self.pending
            .iter()
            .filter(|r| r.owner_id == owner_id)
            .collect()
    }

    /// Add a reminder and persist immediately.
    ///
    /// The caller is responsible for `due_at` being in the future.
    pub fn add(&mut self, owner_id: u64, message: impl Into<String>, due_at: NaiveDateTime) -> Reminder {
        let reminder = Reminder {
            owner_id,
            message: message.into(),
            due_at,
            created_at: self.clock.now(),
        };
        self.pending.push(reminder.clone());
        self.sort_pending();
        self.persist();
        reminder
    }

    /// Remove and return every reminder due at or before `now`.
    ///
    /// Returned reminders leave `pending` but are still written by [`persist`](Self::persist)
    /// until each one is passed to [`settle`](Self::settle) or [`requeue`](Self::requeue).
    /// Does not persist; the caller persists once after handling the batch.
    pub fn pop_due(&mut self, now: NaiveDateTime) -> Vec<Reminder> {
        let (due, remaining): (Vec<Reminder>, Vec<Reminder>) = std::mem::take(&mut self.pending)
            .into_iter()
            .partition(|r| r.due_at <= now);
        self.pending = remaining;
        self.in_flight.extend(due.iter().cloned());
        due
    }

    /// Reminders popped as due whose delivery has not been settled
    pub fn in_flight(&self) -> &[Reminder] {
        &self.in_flight
    }

    /// Forget a popped reminder once it was delivered or dropped
    pub fn settle(&mut self, reminder: &Reminder) {
        self.take_in_flight(reminder);
    }

    /// Re-insert a reminder after a transient delivery failure, due `retry_delay` from now
    pub fn requeue(&mut self, reminder: Reminder, retry_delay: Duration) -> NaiveDateTime {
        self.take_in_flight(&reminder);
        let due_at = self.clock.now() + retry_delay;
        self.pending.push(Reminder { due_at, ..reminder });
        self.sort_pending();
        due_at
    }

    /// Record the current instant as the last graceful shutdown
    pub fn save_shutdown_marker(&self) {
        let marker = ShutdownMarker {
            shutdown_time: self.clock.now(),
        };
        let result = serde_json::to_string(&marker)
            .context("serializing shutdown marker")
            .and_then(|json| write_atomically(&self.shutdown_path, &json));
        match result {
            Ok(()) => debug!("Saved shutdown marker to {}", self.shutdown_path.display()),
            Err(e) => error!(
                "Error saving shutdown marker to {}: {e:#}",
                self.shutdown_path.display()
            ),
        }
    }

    /// Time since the last graceful shutdown, consuming the marker.
    ///
    /// Returns `None` when no marker exists (first run or unclean shutdown),
    /// and on every call after the first until a new marker is saved.
    pub fn get_downtime(&self) -> Option<Duration> {
        let marker = match self.read_shutdown_marker() {
            Ok(Some(marker)) => Some(marker),
            Ok(None) => return None,
            Err(e) => {
                error!(
                    "Error reading shutdown marker {}: {e:#}",
                    self.shutdown_path.display()
                );
                None
            }
        };

        if let Err(e) = fs::remove_file(&self.shutdown_path) {
            warn!(
                "Failed to remove shutdown marker {}: {e}",
                self.shutdown_path.display()
            );
        }

        marker.map(|m| self.clock.now() - m.shutdown_time)
    }

    /// Replace pending reminders with the persisted list.
    ///
    /// A missing file means no reminders. Malformed entries are skipped one by one.
    pub fn load(&mut self) {
        match self.read_reminders() {
            Ok(loaded) => {
                self.in_flight.clear();
                self.pending = loaded;
                self.sort_pending();
                info!(
                    "Loaded {} reminders from {}",
                    self.pending.len(),
                    self.reminders_path.display()
                );
            }
            Err(e) => {
                error!(
                    "Error loading reminders from {}: {e:#}",
                    self.reminders_path.display()
                );
                self.pending.clear();
                self.in_flight.clear();
            }
        }
    }

    /// Write pending and in-flight reminders to disk, logging instead of failing
    pub fn persist(&self) {
        match self.write_reminders() {
            Ok(()) => debug!(
                "Persisted {} reminders ({} in flight) to {}",
                self.pending.len() + self.in_flight.len(),
                self.in_flight.len(),
                self.reminders_path.display()
            ),
            Err(e) => error!(
                "Error saving reminders to {}: {e:#}",
                self.reminders_path.display()
            ),
        }
    }

    fn sort_pending(&mut self) {
        self.pending.sort_by_key(|r| r.due_at);
    }

    fn take_in_flight(&mut self, reminder: &Reminder) {
        if let Some(index) = self.in_flight.iter().position(|r| r == reminder) {
            self.in_flight.remove(index);
        }
    }

    fn read_reminders(&self) -> Result<Vec<Reminder>> {
        if !self.reminders_path.exists() {
            debug!(
                "No reminder file at {}, starting empty",
                self.reminders_path.display()
            );
            return Ok(Vec::new());
        }

        let contents = fs::read_to_string(&self.reminders_path)
            .with_context(|| format!("reading {}", self.reminders_path.display()))?;
        let entries: Vec<serde_json::Value> =
            serde_json::from_str(&contents).context("reminder file is not a JSON list")?;

        let mut loaded = Vec::with_capacity(entries.len());
        for entry in entries {
            match serde_json::from_value::<Reminder>(entry.clone()) {
                Ok(reminder) => loaded.push(reminder),
                Err(e) => warn!("Skipping malformed reminder {entry}: {e}"),
            }
        }
        Ok(loaded)
    }

    fn write_reminders(&self) -> Result<()> {
        let mut all: Vec<&Reminder> = self.in_flight.iter().chain(&self.pending).collect();
        all.sort_by_key(|r| r.due_at);
        let json = serde_json::to_string_pretty(&all).context("serializing reminders")?;
        write_atomically(&self.reminders_path, &json)
    }

    fn read_shutdown_marker(&self) -> Result<Option<ShutdownMarker>> {
        if !self.shutdown_path.exists() {
            return Ok(None);
        }
        let contents = fs::read_to_string(&self.shutdown_path)
            .with_context(|| format!("reading {}", self.shutdown_path.display()))?;
        let marker = serde_json::from_str(&contents).context("malformed shutdown marker")?;
        Ok(Some(marker))
    }
}

/// Write through a sibling temp file and rename, so readers never see a partial file
fn write_atomically(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating directory {}", parent.display()))?;
    }

    let mut tmp_name = path.as_os_str().to_owned();
    tmp_name.push(".tmp");
    let tmp_path = PathBuf::from(tmp_name);

    fs::write(&tmp_path, contents)
        .with_context(|| format!("writing {}", tmp_path.display()))?;
    fs::rename(&tmp_path, path)
        .with_context(|| format!("renaming {} to {}", tmp_path.display(), path.display()))?;
    Ok(())
}
