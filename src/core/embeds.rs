//! Reminder embed builders for Discord DMs
//!
//! - **Version**: 2.1.0
//! - **Since**: 1.0.0
//!
//! ## Changelog
//! - 2.1.0: Embed timestamp set to the delivery time
//! - 2.0.0: Reminder and missed-reminder embeds
//! - 1.0.0: Shared embed construction

use crate::core::truncate_for_embed;
use crate::features::reminders::format::{format_duration, format_short_time};
use crate::features::reminders::Reminder;
use chrono::{Duration, Local, NaiveDateTime};
use serenity::builder::CreateEmbed;
use serenity::model::Timestamp;

/// Accent for reminders delivered on time
pub const REMINDER_COLOR: u32 = 0xFFA500;
/// Accent for reminders that came due while the bot was offline
pub const MISSED_REMINDER_COLOR: u32 = 0xFF6B6B;

const FOOTER_TEXT: &str = "Reminder from PeterBot";

/// Build the DM embed for a reminder.
///
/// Missed reminders explain the delay: how long the bot was down (when known),
/// how overdue the reminder is at `now`, and when it was originally due.
pub fn reminder_embed(
    reminder: &Reminder,
    missed: bool,
    downtime: Option<Duration>,
    now: NaiveDateTime,
) -> CreateEmbed {
    let mut embed = CreateEmbed::default();

    if missed {
        let overdue = now - reminder.due_at;
        embed
            .title("Missed Reminder")
            .color(MISSED_REMINDER_COLOR)
            .description(truncate_for_embed(&format!(
                "I was offline when this reminder was due.\n\n**Original reminder:** {}",
                reminder.message
            )));

        let downtime_text = match downtime {
            Some(d) => format_duration(d),
            None => "Offline duration unavailable".to_string(),
        };
        embed.field("Bot downtime", downtime_text, false);
        embed.field("How late", format!("{} overdue", format_duration(overdue)), false);
        embed.field("Original time", format_short_time(reminder.due_at), false);
    } else {
        embed
            .title("Reminder")
            .color(REMINDER_COLOR)
            .description(truncate_for_embed(&reminder.message));
    }

    embed.footer(|f| f.text(FOOTER_TEXT));
    if let Some(sent_at) = local_timestamp(now) {
        embed.timestamp(sent_at);
    }
    embed
}

/// Discord timestamp for a local wall-clock instant; `None` inside a DST gap
fn local_timestamp(instant: NaiveDateTime) -> Option<Timestamp> {
    let local = instant.and_local_timezone(Local).earliest()?;
    Timestamp::from_unix_timestamp(local.timestamp()).ok()
}
