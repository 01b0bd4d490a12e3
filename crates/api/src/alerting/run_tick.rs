use super::fire_reminder::fire_reminder;
use super::lifecycle::{evaluate_lifecycle, LifecycleOutcome};
use crate::shared::usecase::UseCase;
use chrono::{DateTime, Utc};
use memora_domain::scheduling::alert_to_fire;
use memora_domain::Reminder;
use memora_infra::Context;
use tracing::error;

/// One tick of the scheduling loop: walk the active reminders, retire the
/// ones whose lifecycle is over and fire the alerts that are due in this
/// tick's window.
#[derive(Debug)]
pub struct RunTickUseCase;

#[derive(Debug, Default, PartialEq)]
pub struct TickReport {
    pub checked: usize,
    pub fired: usize,
    pub deactivated: usize,
}

#[derive(Debug)]
pub enum UseCaseError {
    StorageError,
}

enum ReminderOutcome {
    Fired,
    Deactivated,
    Skipped,
}

#[async_trait::async_trait(?Send)]
impl UseCase for RunTickUseCase {
    type Response = TickReport;
    type Error = UseCaseError;

    const NAME: &'static str = "RunTick";

    async fn execute(&mut self, ctx: &Context) -> Result<Self::Response, Self::Error> {
        let reminders = ctx.repos.reminders.find_active().await.map_err(|e| {
            error!("Unable to load active reminders: {:?}", e);
            UseCaseError::StorageError
        })?;
        let now = ctx.sys.now();

        let mut report = TickReport::default();
        for reminder in reminders {
            report.checked += 1;
            match process_reminder(&reminder, now, ctx).await {
                ReminderOutcome::Fired => report.fired += 1,
                ReminderOutcome::Deactivated => report.deactivated += 1,
                ReminderOutcome::Skipped => {}
            }
        }
        Ok(report)
    }
}

async fn process_reminder(reminder: &Reminder, now: DateTime<Utc>, ctx: &Context) -> ReminderOutcome {
    if reminder.alerts.is_empty() {
        return ReminderOutcome::Skipped;
    }

    let event_time = match evaluate_lifecycle(reminder, now, ctx).await {
        LifecycleOutcome::Keep(event_time) => event_time,
        LifecycleOutcome::Deactivated => return ReminderOutcome::Deactivated,
        LifecycleOutcome::Skip => return ReminderOutcome::Skipped,
    };

    if alert_to_fire(reminder, event_time, now, ctx.config.tick_interval_ms).is_none() {
        return ReminderOutcome::Skipped;
    }

    // The notifications went out, so this counts as fired even if the
    // cursor write fails.
    if let Err(e) = fire_reminder(reminder, now, ctx).await {
        error!(
            "Unable to record acknowledgement for fired reminder {}: {:?}",
            reminder.id, e
        );
    }
    ReminderOutcome::Fired
}
