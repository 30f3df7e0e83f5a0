//! Reminder command handlers
//!
//! Handles: remindme, reminders
//!
//! - **Version**: 2.0.0
//! - **Since**: 3.38.0
//!
//! ## Changelog
//! - 2.0.0: Free-text reminder times, JSON reminder store, ephemeral replies
//! - 1.0.0: Extracted from command_handler.rs

use anyhow::Result;
use async_trait::async_trait;
use log::{debug, error, info};
use serenity::model::application::interaction::application_command::ApplicationCommandInteraction;
use serenity::model::application::interaction::InteractionResponseType;
use serenity::prelude::Context;
use std::sync::Arc;

use crate::commands::context::CommandContext;
use crate::commands::handler::SlashCommandHandler;
use crate::commands::slash::get_string_option;
use crate::core::truncate_for_message;
use crate::features::reminders::format::{format_due_time, format_duration};
use crate::features::reminders::{parse_reminder_time, ParseError};

const INVALID_TIME_REPLY: &str = "❌ Invalid time format. Supported examples:\n\n\
    • `10/08/2025 14:30`\n\
    • `10/08/25 2:30 PM`\n\
    • `2025-10-08 14:30`\n\
    • `10/08` or `10/08 14:30`\n\
    • `14:30` or `2:30 PM`\n\
    • `tomorrow` or `tomorrow at 9:00 AM`\n\
    • `in 45 minutes`";

const NON_POSITIVE_REPLY: &str =
    "❌ The amount must be positive, e.g. `in 45 minutes` or `in 2 hours`.";

const PAST_TIME_REPLY: &str = "❌ Please set a reminder for a future time!";

const INTERNAL_ERROR_REPLY: &str = "❌ I couldn't set that reminder due to an internal error.";

const NO_REMINDERS_REPLY: &str =
    "📋 You don't have any pending reminders.\n\nUse `/remindme` to create one!";

/// Handler for reminder-related commands
pub struct RemindHandler;

#[async_trait]
impl SlashCommandHandler for RemindHandler {
    fn command_names(&self) -> &'static [&'static str] {
        &["remindme", "reminders"]
    }

    async fn handle(
        &self,
        ctx: Arc<CommandContext>,
        serenity_ctx: &Context,
        command: &ApplicationCommandInteraction,
    ) -> Result<()> {
        let reply = match command.data.name.as_str() {
            "remindme" => self.handle_remindme(&ctx, command).await,
            "reminders" => list_reminders(&ctx, command.user.id.0).await,
            _ => return Ok(()),
        };

        command
            .create_interaction_response(&serenity_ctx.http, |response| {
                response
                    .kind(InteractionResponseType::ChannelMessageWithSource)
                    .interaction_response_data(|msg| msg.content(reply).ephemeral(true))
            })
            .await?;

        Ok(())
    }
}

impl RemindHandler {
    /// Handle /remindme - parse the time and store a new reminder
    async fn handle_remindme(
        &self,
        ctx: &CommandContext,
        command: &ApplicationCommandInteraction,
    ) -> String {
        let message = get_string_option(&command.data.options, "message");
        let time_text = get_string_option(&command.data.options, "time");

        match (message, time_text) {
            (Some(message), Some(time_text)) => {
                create_reminder(ctx, command.user.id.0, &message, &time_text).await
            }
            _ => {
                error!(
                    "Missing remindme options from user {}: {:?}",
                    command.user.id, command.data.options
                );
                INTERNAL_ERROR_REPLY.to_string()
            }
        }
    }
}

/// Resolve `time_text`, store the reminder, and return the reply for the user
pub async fn create_reminder(
    ctx: &CommandContext,
    owner_id: u64,
    message: &str,
    time_text: &str,
) -> String {
    let now = ctx.clock.now();

    let due_at = match parse_reminder_time(time_text, now) {
        Ok(due_at) => due_at,
        Err(ParseError::Unparseable) => {
            debug!("Unparseable reminder time from user {owner_id}: {time_text:?}");
            return INVALID_TIME_REPLY.to_string();
        }
        Err(ParseError::NonPositiveAmount) => return NON_POSITIVE_REPLY.to_string(),
    };

    if due_at <= now {
        debug!("Rejected past reminder time {due_at} from user {owner_id}");
        return PAST_TIME_REPLY.to_string();
    }

    ctx.store.lock().await.add(owner_id, message, due_at);
    info!(
        "Created reminder for user {owner_id} due {due_at} (in {})",
        format_duration(due_at - now)
    );

    truncate_for_message(&format!(
        "✅ Reminder set. I'll remind you about **{message}** on {}.",
        format_due_time(due_at)
    ))
}

/// Reply listing `owner_id`'s pending reminders, soonest first
pub async fn list_reminders(ctx: &CommandContext, owner_id: u64) -> String {
    let now = ctx.clock.now();
    let store = ctx.store.lock().await;
    let reminders = store.pending_for(owner_id);

    if reminders.is_empty() {
        return NO_REMINDERS_REPLY.to_string();
    }

    let mut reply = String::from("📋 **Your Pending Reminders:**\n\n");
    for (index, reminder) in reminders.iter().enumerate() {
        let remaining = reminder.due_at - now;
        let when = if remaining.num_seconds() > 0 {
            format!("in {}", format_duration(remaining))
        } else {
            "any moment now".to_string()
        };
        reply.push_str(&format!(
            "**{}.** {} ({when})\n> {}\n\n",
            index + 1,
            format_due_time(reminder.due_at),
            reminder.message
        ));
    }

    truncate_for_message(reply.trim_end())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::reminders::clock::ManualClock;
    use crate::features::reminders::ReminderStore;
    use chrono::{NaiveDate, NaiveDateTime};
    use tempfile::TempDir;

    fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, mo, d)
            .unwrap()
            .and_hms_opt(h, mi, 0)
            .unwrap()
    }

    fn context(now: NaiveDateTime) -> (TempDir, Arc<ManualClock>, CommandContext) {
        let dir = TempDir::new().unwrap();
        let clock = Arc::new(ManualClock::new(now));
        let store = ReminderStore::new(
            dir.path().join("reminders.json"),
            dir.path().join("bot_shutdown.json"),
            clock.clone(),
        )
        .into_shared();
        let ctx = CommandContext::new(store, clock.clone());
        (dir, clock, ctx)
    }

    #[tokio::test]
    async fn test_create_reminder_success() {
        let (dir, _clock, ctx) = context(at(2025, 3, 10, 9, 0));

        let reply = create_reminder(&ctx, 42, "stand-up", "2:30 PM").await;
        assert_eq!(
            reply,
            "✅ Reminder set. I'll remind you about **stand-up** on Monday, Mar 10, 2025 at 02:30 PM."
        );

        let store = ctx.store.lock().await;
        assert_eq!(store.len(), 1);
        assert_eq!(store.pending()[0].owner_id, 42);
        assert_eq!(store.pending()[0].due_at, at(2025, 3, 10, 14, 30));
        assert!(dir.path().join("reminders.json").exists());
    }

    #[tokio::test]
    async fn test_create_reminder_unparseable_lists_examples() {
        let (_dir, _clock, ctx) = context(at(2025, 3, 10, 9, 0));

        let reply = create_reminder(&ctx, 42, "stand-up", "next blue moon").await;
        assert!(reply.starts_with("❌ Invalid time format"));
        assert!(reply.contains("`in 45 minutes`"));
        assert!(ctx.store.lock().await.is_empty());
    }

    #[tokio::test]
    async fn test_create_reminder_non_positive_amount() {
        let (_dir, _clock, ctx) = context(at(2025, 3, 10, 9, 0));

        let reply = create_reminder(&ctx, 42, "stand-up", "in 0 minutes").await;
        assert_eq!(reply, NON_POSITIVE_REPLY);
        assert!(ctx.store.lock().await.is_empty());
    }

    #[tokio::test]
    async fn test_create_reminder_rejects_past_explicit_year() {
        let (_dir, _clock, ctx) = context(at(2025, 3, 10, 9, 0));

        let reply = create_reminder(&ctx, 42, "too late", "01/01/2020 10:00").await;
        assert_eq!(reply, PAST_TIME_REPLY);
        assert!(ctx.store.lock().await.is_empty());
    }

    #[tokio::test]
    async fn test_list_reminders_empty() {
        let (_dir, _clock, ctx) = context(at(2025, 3, 10, 9, 0));
        assert_eq!(list_reminders(&ctx, 42).await, NO_REMINDERS_REPLY);
    }

    #[tokio::test]
    async fn test_list_reminders_only_shows_owner() {
        let (_dir, clock, ctx) = context(at(2025, 3, 10, 9, 0));
        create_reminder(&ctx, 42, "later", "in 2 hours").await;
        create_reminder(&ctx, 42, "sooner", "in 30 minutes").await;
        create_reminder(&ctx, 7, "someone else", "in 10 minutes").await;

        clock.set(at(2025, 3, 10, 9, 10));
        let reply = list_reminders(&ctx, 42).await;

        assert!(reply.starts_with("📋 **Your Pending Reminders:**"));
        assert!(!reply.contains("someone else"));
        let sooner = reply.find("sooner").unwrap();
        let later = reply.find("later").unwrap();
        assert!(sooner < later);
        assert!(reply.contains("(in 20 minutes)"));
        assert!(reply.contains("(in 1 hour)"));
    }
}
