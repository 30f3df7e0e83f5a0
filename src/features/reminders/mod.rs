//! # Reminders Feature
//!
//! Personal reminders set with free-text times and delivered by DM, including
//! reminders that came due while the bot was offline.
//!
//! - **Version**: 2.0.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 2.0.0: Natural-language time parser, JSON store with shutdown marker, missed reminder recovery
//! - 1.0.0: Initial scheduler

pub mod clock;
pub mod delivery;
pub mod format;
pub mod scheduler;
pub mod store;
pub mod time_parser;

pub use clock::{Clock, SystemClock};
pub use delivery::DiscordSender;
pub use scheduler::{shutdown, DeliveryReport, DeliveryStatus, ReminderScheduler, ReminderSender};
pub use store::{Reminder, ReminderStore, SharedReminderStore};
pub use time_parser::{parse_reminder_time, ParseError, TimePattern};
