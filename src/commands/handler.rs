//! # Reminder command handlers
//!
//! Seam between the dispatcher and the `/remindme` and `/reminders`
//! implementations. A handler claims its command names up front, then gets
//! each interaction together with the [`CommandContext`] carrying the
//! reminder store it shares with the delivery scheduler and the clock used
//! to resolve free-text times. Replies are sent by the handler itself, so
//! user errors such as an unparseable time never reach the dispatcher.
//!
//! - **Version**: 2.0.0
//! - **Since**: 3.38.0
//!
//! ## Changelog
//! - 2.0.0: Handlers receive the reminder store and clock through the context
//! - 1.0.0: Initial implementation for modular command handling

use anyhow::Result;
use async_trait::async_trait;
use serenity::model::application::interaction::application_command::ApplicationCommandInteraction;
use serenity::prelude::Context;
use std::sync::Arc;

use super::context::CommandContext;

/// A handler for one or more reminder slash commands
///
/// Registered in a [`CommandRegistry`](super::registry::CommandRegistry) under
/// every name it returns. Returning `Err` is reserved for Discord failures;
/// the dispatcher logs it and tells the user the command failed.
///
/// # Example
///
/// ```ignore
/// pub struct RemindHandler;
///
/// #[async_trait]
/// impl SlashCommandHandler for RemindHandler {
///     fn command_names(&self) -> &'static [&'static str] {
///         &["remindme", "reminders"]
///     }
///
///     async fn handle(
///         &self,
///         ctx: Arc<CommandContext>,
///         serenity_ctx: &Context,
///         command: &ApplicationCommandInteraction,
///     ) -> Result<()> {
///         Ok(())
///     }
/// }
/// ```
#[async_trait]
pub trait SlashCommandHandler: Send + Sync {
    /// Command name(s) this handler processes
    fn command_names(&self) -> &'static [&'static str];

    /// Handle the slash command
    ///
    /// * `ctx` - Shared command context with the reminder store and clock
    /// * `serenity_ctx` - Serenity context for Discord API calls
    /// * `command` - The slash command interaction to handle
    async fn handle(
        &self,
        ctx: Arc<CommandContext>,
        serenity_ctx: &Context,
        command: &ApplicationCommandInteraction,
    ) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    // Object safety: handlers are stored as Arc<dyn SlashCommandHandler>
    fn _assert_object_safe(_: &dyn SlashCommandHandler) {}

    #[test]
    fn test_reminder_handler_claims_both_commands() {
        let handler: Arc<dyn SlashCommandHandler> =
            Arc::new(crate::commands::handlers::remind::RemindHandler);
        assert_eq!(handler.command_names(), &["remindme", "reminders"]);
    }
}
