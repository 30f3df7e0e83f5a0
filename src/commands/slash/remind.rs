//! # Reminder Commands
//!
//! `/remindme` and `/reminders` definitions.
//!
//! - **Version**: 2.0.0
//! - **Since**: 1.2.0
//!
//! ## Changelog
//! - 2.0.0: Free-text `time` option replaces the fixed duration choices
//! - 1.0.0: Initial implementation

use serenity::builder::CreateApplicationCommand;
use serenity::model::application::command::CommandOptionType;

pub fn create_commands() -> Vec<CreateApplicationCommand> {
    vec![create_remindme_command(), create_reminders_command()]
}

fn create_remindme_command() -> CreateApplicationCommand {
    let mut command = CreateApplicationCommand::default();
    command
        .name("remindme")
        .description("Set a reminder for yourself")
        .create_option(|option| {
            option
                .name("message")
                .description("What you want to be reminded about")
                .kind(CommandOptionType::String)
                .required(true)
                .min_length(1)
                .max_length(1500)
        })
        .create_option(|option| {
            option
                .name("time")
                .description("When to remind you, e.g. '10/08/2025 14:30', '2:30 PM', 'tomorrow', 'in 30 minutes'")
                .kind(CommandOptionType::String)
                .required(true)
                .min_length(1)
                .max_length(100)
        });
    command
}

fn create_reminders_command() -> CreateApplicationCommand {
    let mut command = CreateApplicationCommand::default();
    command
        .name("reminders")
        .description("List your pending reminders");
    command
}
