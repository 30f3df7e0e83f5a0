//! Shared context for command handlers
//!
//! - **Version**: 2.0.1
//! - **Since**: 3.38.0
//!
//! ## Changelog
//! - 2.0.1: Start time is always taken at construction
//! - 2.0.0: Reminder store and clock replace the chat services
//! - 1.0.0: Initial implementation with core shared state

use std::sync::Arc;
use std::time::Instant;

use crate::features::reminders::{Clock, SharedReminderStore};

/// Shared context for all command handlers
///
/// Holds the reminder store shared with the scheduler, the clock used to
/// resolve reminder times, and the bot start time for uptime reporting.
#[derive(Clone)]
pub struct CommandContext {
    pub store: SharedReminderStore,
    pub clock: Arc<dyn Clock>,
    pub start_time: Instant,
}

impl CommandContext {
    pub fn new(store: SharedReminderStore, clock: Arc<dyn Clock>) -> Self {
        Self {
            store,
            clock,
            start_time: Instant::now(),
        }
    }
}
