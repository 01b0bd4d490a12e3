use super::create_reminder::CreateReminderUseCase;
use super::update_reminder::UpdateReminderUseCase;
use crate::shared::usecase::Subscriber;
use memora_domain::Reminder;
use memora_infra::Context;
use serde_json::json;
use tracing::{error, info};

/// Registers delayed-queue callbacks for a reminder when running in event
/// mode. In polling mode the scheduling loop picks reminders up by itself
/// and nothing happens here.
///
/// One-time reminders get one one-shot callback per alert; alerts whose
/// instant already passed are not scheduled. Recurring reminders get a
/// single cron schedule for their recurrence; the webhook flow dispatches
/// on every callback. Callbacks for reminders that are deleted or retired
/// in the meantime are absorbed by the webhook's skip responses.
async fn schedule_alert_callbacks(reminder: &Reminder, ctx: &Context) {
    if ctx.config.use_polling {
        return;
    }
    let webhook_base_url = match &ctx.config.webhook_base_url {
        Some(url) => url,
        None => {
            error!(
                "WEBHOOK_BASE_URL is not configured, unable to schedule callbacks for reminder {}",
                reminder.id
            );
            return;
        }
    };
    let url = format!("{}/webhooks/reminder-alert", webhook_base_url);

    if reminder.is_recurring {
        let cron = match &reminder.recurrence {
            Some(cron) => cron,
            None => return,
        };
        let body = json!({ "reminderId": reminder.id, "isRecurring": true });
        match ctx.queue.publish_cron(&url, cron, body).await {
            Ok(schedule_id) => info!(
                "Installed alert schedule {} for recurring reminder {}",
                schedule_id, reminder.id
            ),
            Err(e) => error!(
                "Unable to install alert schedule for reminder {}: {:?}",
                reminder.id, e
            ),
        }
        return;
    }

    let now = ctx.sys.now();
    for alert in &reminder.alerts {
        let alert_instant = reminder.date - chrono::Duration::milliseconds(alert.offset_ms);
        let delay_secs = (alert_instant - now).num_seconds();
        if delay_secs < 0 {
            continue;
        }
        let body = json!({
            "reminderId": reminder.id,
            "alertTime": alert_instant,
            "isRecurring": false,
        });
        if let Err(e) = ctx.queue.publish_one_shot(&url, body, delay_secs).await {
            error!(
                "Unable to schedule alert callback for reminder {}: {:?}",
                reminder.id, e
            );
        }
    }
}

pub struct ScheduleAlertsOnReminderCreated;

#[async_trait::async_trait(?Send)]
impl Subscriber<CreateReminderUseCase> for ScheduleAlertsOnReminderCreated {
    async fn notify(&self, reminder: &Reminder, ctx: &Context) {
        schedule_alert_callbacks(reminder, ctx).await;
    }
}

pub struct ScheduleAlertsOnReminderUpdated;

#[async_trait::async_trait(?Send)]
impl Subscriber<UpdateReminderUseCase> for ScheduleAlertsOnReminderUpdated {
    async fn notify(&self, reminder: &Reminder, ctx: &Context) {
        schedule_alert_callbacks(reminder, ctx).await;
    }
}
