//! # Command Dispatcher
//!
//! Routes slash command interactions to their registered handler and logs
//! each request under a correlation id.
//!
//! - **Version**: 2.0.0
//! - **Since**: 0.1.0
//!
//! ## Changelog
//! - 2.0.0: Registry-only dispatch for reminder commands
//! - 1.0.0: Monolithic command handler

use anyhow::Result;
use log::{debug, error, info, warn};
use serenity::model::application::interaction::application_command::ApplicationCommandInteraction;
use serenity::model::application::interaction::InteractionResponseType;
use serenity::prelude::Context;
use std::sync::Arc;
use std::time::Instant;
use uuid::Uuid;

use crate::commands::context::CommandContext;
use crate::commands::handlers::create_all_handlers;
use crate::commands::registry::CommandRegistry;

const UNKNOWN_COMMAND_REPLY: &str = "❓ I don't know that command.";
const HANDLER_FAILED_REPLY: &str = "❌ Something went wrong handling that command.";

#[derive(Clone)]
pub struct CommandHandler {
    registry: CommandRegistry,
    context: Arc<CommandContext>,
}

impl CommandHandler {
    pub fn new(context: CommandContext) -> Self {
        Self {
            registry: CommandRegistry::from_handlers(create_all_handlers()),
            context: Arc::new(context),
        }
    }

    pub fn context(&self) -> &Arc<CommandContext> {
        &self.context
    }

    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    pub async fn handle_slash_command(
        &self,
        ctx: &Context,
        command: &ApplicationCommandInteraction,
    ) -> Result<()> {
        let request_id = Uuid::new_v4();
        let guild_id = command
            .guild_id
            .map(|id| id.to_string())
            .unwrap_or_else(|| "DM".to_string());

        info!(
            "[{request_id}] 📥 Slash command received | Command: {} | User: {} | Channel: {} | Guild: {guild_id}",
            command.data.name, command.user.id, command.channel_id
        );

        let Some(handler) = self.registry.get(&command.data.name) else {
            warn!("[{request_id}] Unknown slash command: {}", command.data.name);
            reply_ephemeral(ctx, command, UNKNOWN_COMMAND_REPLY).await?;
            return Ok(());
        };

        let started = Instant::now();
        match handler.handle(Arc::clone(&self.context), ctx, command).await {
            Ok(()) => {
                debug!(
                    "[{request_id}] ✅ {} handled in {:?}",
                    command.data.name,
                    started.elapsed()
                );
                Ok(())
            }
            Err(e) => {
                error!("[{request_id}] ❌ {} failed: {e:#}", command.data.name);
                // The handler may already have responded; a second response is rejected by Discord
                if let Err(reply_err) = reply_ephemeral(ctx, command, HANDLER_FAILED_REPLY).await {
                    debug!("[{request_id}] Could not send failure reply: {reply_err}");
                }
                Err(e)
            }
        }
    }
}

async fn reply_ephemeral(
    ctx: &Context,
    command: &ApplicationCommandInteraction,
    content: &str,
) -> Result<()> {
    command
        .create_interaction_response(&ctx.http, |response| {
            response
                .kind(InteractionResponseType::ChannelMessageWithSource)
                .interaction_response_data(|msg| msg.content(content).ephemeral(true))
        })
        .await?;
    Ok(())
}
