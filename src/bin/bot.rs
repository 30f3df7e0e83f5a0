use anyhow::Result;
use dotenvy::dotenv;
use log::{error, info, warn};
use serenity::async_trait;
use serenity::model::application::interaction::Interaction;
use serenity::model::gateway::Ready;
use serenity::model::id::GuildId;
use serenity::prelude::*;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use peterbot::commands::{
    register_global_commands, register_guild_commands, CommandContext, CommandHandler,
};
use peterbot::core::Config;
use peterbot::features::reminders::{
    shutdown, Clock, DiscordSender, ReminderScheduler, ReminderStore, SharedReminderStore,
    SystemClock,
};
use peterbot::features::{get_bot_version, get_features};

struct Handler {
    command_handler: Arc<CommandHandler>,
    guild_id: Option<GuildId>,
    store: SharedReminderStore,
    clock: Arc<dyn Clock>,
    poll_interval: std::time::Duration,
    retry_delay: chrono::Duration,
    // Ready fires again on every gateway reconnect
    started: AtomicBool,
}

impl Handler {
    fn new(
        command_handler: CommandHandler,
        guild_id: Option<GuildId>,
        store: SharedReminderStore,
        clock: Arc<dyn Clock>,
        config: &Config,
    ) -> Self {
        Handler {
            command_handler: Arc::new(command_handler),
            guild_id,
            store,
            clock,
            poll_interval: config.reminder_poll_interval,
            retry_delay: config.reminder_retry_delay,
            started: AtomicBool::new(false),
        }
    }

    async fn register_commands(&self, ctx: &Context) {
        let result = match self.guild_id {
            Some(guild_id) => {
                info!("Registering slash commands for development guild {guild_id}");
                register_guild_commands(ctx, guild_id).await
            }
            None => {
                info!("Registering global slash commands (may take up to an hour to appear)");
                register_global_commands(ctx).await
            }
        };

        if let Err(e) = result {
            error!("Failed to register slash commands: {e:#}");
        }
    }

    fn spawn_scheduler(&self, ctx: &Context) {
        let sender = Arc::new(DiscordSender::new(ctx.http.clone(), self.clock.clone()));
        let scheduler = ReminderScheduler::new(self.store.clone(), sender, self.clock.clone())
            .with_poll_interval(self.poll_interval)
            .with_retry_delay(self.retry_delay);

        tokio::spawn(scheduler.run());
    }
}

#[async_trait]
impl EventHandler for Handler {
    async fn ready(&self, ctx: Context, ready: Ready) {
        info!("🎉 {} is connected and ready!", ready.user.name);
        info!("📡 Connected to {} guilds", ready.guilds.len());
        info!("🤖 Bot ID: {}", ready.user.id);

        if let Some(shard) = ready.shard {
            info!("⚡ Shard: {}/{}", shard[0] + 1, shard[1]);
        }

        if self.started.swap(true, Ordering::SeqCst) {
            info!("Gateway session resumed; scheduler already running");
            return;
        }

        info!(
            "Startup took {:?}",
            self.command_handler.context().start_time.elapsed()
        );
        info!(
            "Handling commands: {}",
            self.command_handler.registry().command_names().join(", ")
        );
        self.register_commands(&ctx).await;
        self.spawn_scheduler(&ctx);
    }

    async fn interaction_create(&self, ctx: Context, interaction: Interaction) {
        if let Interaction::ApplicationCommand(command) = interaction {
            if let Err(e) = self
                .command_handler
                .handle_slash_command(&ctx, &command)
                .await
            {
                error!(
                    "Error handling slash command '{}': {e:#}",
                    command.data.name
                );
            }
        }
    }
}

/// Resolve when the process is asked to stop (Ctrl+C, or SIGTERM on Unix)
async fn wait_for_shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => info!("Received Ctrl+C"),
                    _ = sigterm.recv() => info!("Received SIGTERM"),
                }
                return;
            }
            Err(e) => warn!("Could not install SIGTERM handler: {e}"),
        }
    }

    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Could not listen for Ctrl+C: {e}");
        std::future::pending::<()>().await;
    }
    info!("Received Ctrl+C");
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv().ok();

    let config = Config::from_env()?;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&config.log_level))
        .init();

    info!("Starting PeterBot v{}...", get_bot_version());
    for feature in get_features() {
        info!("   - {} v{}", feature.name, feature.version);
    }

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let mut store = ReminderStore::new(
        config.reminders_path.clone(),
        config.shutdown_marker_path.clone(),
        clock.clone(),
    );
    store.load();
    let store = store.into_shared();

    let command_handler = CommandHandler::new(CommandContext::new(store.clone(), clock.clone()));
    let guild_id = config.discord_guild_id.map(GuildId);
    let handler = Handler::new(command_handler, guild_id, store.clone(), clock, &config);

    let intents = GatewayIntents::GUILDS | GatewayIntents::DIRECT_MESSAGES;

    let mut client = Client::builder(&config.discord_token, intents)
        .event_handler(handler)
        .await
        .map_err(|e| {
            error!("Failed to create Discord client: {e}");
            error!("This could indicate:");
            error!("  - Invalid bot token format");
            error!("  - Network issues reaching Discord API");
            anyhow::anyhow!("Client creation failed: {}", e)
        })?;

    let shard_manager = client.shard_manager.clone();
    tokio::spawn(async move {
        wait_for_shutdown_signal().await;
        info!("Shutting down gateway connection...");
        shard_manager.lock().await.shutdown_all().await;
    });

    info!("Bot configured successfully. Connecting to Discord gateway...");
    let result = client.start().await;

    // Runs however the gateway stopped so missed reminders can be detected next start
    shutdown(&store).await;

    if let Err(why) = result {
        error!("Gateway connection failed: {why:?}");
        error!("This could be due to:");
        error!("  - Invalid bot token");
        error!("  - Network connectivity issues");
        error!("  - Discord API outage");
        return Err(anyhow::anyhow!(
            "Failed to establish gateway connection: {}",
            why
        ));
    }

    info!("PeterBot stopped cleanly");
    Ok(())
}
