//! # Features
//!
//! Feature modules and the version manifest logged at startup.
//!
//! - **Version**: 2.0.0
//! - **Since**: 0.7.0
//!
//! ## Changelog
//! - 2.0.0: Reminder-only feature set
//! - 1.0.0: Initial feature manifest

pub mod reminders;

pub use reminders::{ReminderScheduler, ReminderStore};

/// Name and version of a feature module
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureInfo {
    pub name: &'static str,
    pub version: &'static str,
    pub toggleable: bool,
}

/// Bot version from Cargo.toml
pub fn get_bot_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

/// All feature modules compiled into the bot
pub fn get_features() -> Vec<FeatureInfo> {
    vec![FeatureInfo {
        name: "Reminders",
        version: "2.0.0",
        toggleable: false,
    }]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bot_version_is_set() {
        assert!(!get_bot_version().is_empty());
    }

    #[test]
    fn test_features_listed() {
        let features = get_features();
        assert!(features.iter().any(|f| f.name == "Reminders"));
    }
}
