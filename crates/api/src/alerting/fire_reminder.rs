use super::dispatcher::send_notifications;
use chrono::{DateTime, Utc};
use memora_domain::Reminder;
use memora_infra::Context;

/// Fires a reminder: dispatch to every contact, then record the
/// acknowledgement cursor. Both the scheduling loop and the webhook
/// trigger go through here so the two execution modes cannot drift apart.
///
/// The cursor is written after dispatch and regardless of per-contact
/// failures. Duplicate alerts are bounded by the cursor, not by retries.
pub async fn fire_reminder(
    reminder: &Reminder,
    now: DateTime<Utc>,
    ctx: &Context,
) -> anyhow::Result<()> {
    send_notifications(reminder, &reminder.contacts, ctx).await;
    ctx.repos
        .reminders
        .set_last_alert_time(&reminder.id, now)
        .await
}
