// ==========================================
// Salesbook - outbound notifications
// ==========================================
// Channel boundary for customer messaging. The import pipeline only
// prepares and logs messages; actual delivery transport is pluggable.
// ==========================================

use crate::repository::error::RepoResult;
use crate::repository::sales_store::SalesStore;
use async_trait::async_trait;
use tracing::info;

/// Delivery transport. Returns whether the message was handed off.
#[async_trait]
pub trait NotificationChannel: Send + Sync {
    async fn send(&self, phone: &str, message: &str) -> bool;
}

/// Default channel: no external transport, delivery is recorded in the
/// application log only.
pub struct LoggedChannel;

#[async_trait]
impl NotificationChannel for LoggedChannel {
    async fn send(&self, phone: &str, message: &str) -> bool {
        info!("outbound message to {}: {}", phone, message);
        true
    }
}

/// Normalize a phone number for messaging: strip non-digits, prefix
/// bare 10-digit Indian numbers with +91. Returns None when there is
/// nothing dialable.
pub fn clean_phone_number(raw: &str) -> Option<String> {
    let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
    match digits.len() {
        10 => Some(format!("+91{}", digits)),
        11.. => Some(format!("+{}", digits)),
        _ => None,
    }
}

pub fn welcome_message(customer_name: &str) -> String {
    format!(
        "Welcome {}! Thank you for joining us. We look forward to serving you.",
        customer_name
    )
}

/// Send through the channel and append the outcome to the message log.
pub async fn send_and_log<S: SalesStore, C: NotificationChannel>(
    store: &S,
    channel: &C,
    customer_id: i64,
    raw_phone: &str,
    message: &str,
) -> RepoResult<bool> {
    let phone = match clean_phone_number(raw_phone) {
        Some(p) => p,
        None => {
            store
                .insert_message_log(customer_id, raw_phone, message, "invalid_phone")
                .await?;
            return Ok(false);
        }
    };
    let sent = channel.send(&phone, message).await;
    let status = if sent { "sent" } else { "failed" };
    store
        .insert_message_log(customer_id, &phone, message, status)
        .await?;
    Ok(sent)
}
