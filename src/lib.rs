// Core layer - configuration, embeds, Discord limits
pub mod core;

// Features layer - reminders
pub mod features;

// Application layer
pub mod command_handler;
pub mod commands;

pub use core::Config;

pub use features::reminders::{
    parse_reminder_time, shutdown, Clock, DeliveryStatus, DiscordSender, ParseError, Reminder,
    ReminderScheduler, ReminderSender, ReminderStore, SharedReminderStore, SystemClock,
};
