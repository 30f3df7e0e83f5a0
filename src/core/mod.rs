//! # Core Module
//!
//! Configuration, reminder embeds and Discord length limits.
//!
//! - **Version**: 2.0.0
//! - **Since**: 0.7.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 2.0.0: Reminder embeds, reminder storage settings in config
//! - 1.1.0: Add response module with Discord message limits
//! - 1.0.0: Initial creation with config module

pub mod config;
pub mod embeds;
pub mod response;

pub use config::Config;
pub use response::{truncate_for_embed, truncate_for_message, EMBED_LIMIT, MESSAGE_LIMIT};
