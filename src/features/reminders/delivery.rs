//! Discord DM delivery for reminders.
//!
//! Errors are split into permanent failures (unknown user, DMs closed),
//! which drop the reminder, and everything else, which is retried later.

use async_trait::async_trait;
use chrono::Duration;
use log::{debug, info, warn};
use serenity::http::{Http, HttpError};
use serenity::model::id::UserId;
use std::sync::Arc;

use super::clock::Clock;
use super::scheduler::{DeliveryStatus, ReminderSender};
use super::store::Reminder;
use crate::core::embeds::reminder_embed;

/// Sends reminders as direct-message embeds
pub struct DiscordSender {
    http: Arc<Http>,
    clock: Arc<dyn Clock>,
}

impl DiscordSender {
    pub fn new(http: Arc<Http>, clock: Arc<dyn Clock>) -> Self {
        Self { http, clock }
    }
}

#[async_trait]
impl ReminderSender for DiscordSender {
    async fn deliver(
        &self,
        reminder: &Reminder,
        missed: bool,
        downtime: Option<Duration>,
    ) -> DeliveryStatus {
        let user_id = UserId(reminder.owner_id);

        if let Err(e) = user_id.to_user(&*self.http).await {
            let status = classify_error(&e);
            match status {
                DeliveryStatus::Drop => info!(
                    "User {} not found; dropping reminder",
                    reminder.owner_id
                ),
                _ => warn!("Failed to fetch user {}: {e}", reminder.owner_id),
            }
            return status;
        }

        let embed = reminder_embed(reminder, missed, downtime, self.clock.now());
        let sent = match user_id.create_dm_channel(&*self.http).await {
            Ok(dm) => dm.send_message(&*self.http, |m| m.set_embed(embed)).await,
            Err(e) => Err(e),
        };

        match sent {
            Ok(_) => {
                debug!("Delivered reminder to user {}", reminder.owner_id);
                DeliveryStatus::Sent
            }
            Err(e) => {
                let status = classify_error(&e);
                match status {
                    DeliveryStatus::Drop => info!(
                        "Cannot DM user {}; dropping reminder",
                        reminder.owner_id
                    ),
                    _ => warn!(
                        "Transient Discord error sending reminder to user {}: {e}",
                        reminder.owner_id
                    ),
                }
                status
            }
        }
    }
}

/// Map a Discord API error onto a delivery outcome
fn classify_error(error: &serenity::Error) -> DeliveryStatus {
    match error {
        serenity::Error::Http(http_error) => match http_error.as_ref() {
            HttpError::UnsuccessfulRequest(response) => {
                classify_status(response.status_code.as_u16())
            }
            _ => DeliveryStatus::Retry,
        },
        _ => DeliveryStatus::Retry,
    }
}

/// 403 (DMs closed, blocked) and 404 (unknown user) will not improve on retry
fn classify_status(status: u16) -> DeliveryStatus {
    match status {
        403 | 404 => DeliveryStatus::Drop,
        _ => DeliveryStatus::Retry,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_status_permanent() {
        assert_eq!(classify_status(403), DeliveryStatus::Drop);
        assert_eq!(classify_status(404), DeliveryStatus::Drop);
    }

    #[test]
    fn test_classify_status_transient() {
        for status in [400, 401, 429, 500, 502, 503] {
            assert_eq!(classify_status(status), DeliveryStatus::Retry, "status {status}");
        }
    }

    #[test]
    fn test_non_http_errors_retry() {
        let error = serenity::Error::Other("gateway hiccup");
        assert_eq!(classify_error(&error), DeliveryStatus::Retry);
    }
}
