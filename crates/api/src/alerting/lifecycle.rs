use chrono::{DateTime, Utc};
use memora_domain::scheduling::{should_deactivate_one_time, should_deactivate_recurring};
use memora_domain::{next_occurrence, Reminder};
use memora_infra::Context;
use tracing::{error, info, warn};

pub(crate) enum LifecycleOutcome {
    /// The reminder stays active; carries its event time for this evaluation
    Keep(DateTime<Utc>),
    Deactivated,
    /// The reminder could not be evaluated and is left untouched
    Skip,
}

/// Applies the deactivation policy to one reminder and resolves its event
/// time: the stored instant for one-time reminders, the next cron
/// occurrence strictly after `now` for recurring ones.
///
/// A recurrence rule that fails to parse only skips the reminder for this
/// evaluation, it never deactivates. A failed deactivation write is logged
/// and the reminder is skipped; the next pass retries.
pub(crate) async fn evaluate_lifecycle(
    reminder: &Reminder,
    now: DateTime<Utc>,
    ctx: &Context,
) -> LifecycleOutcome {
    let (event_time, decision) = if reminder.is_recurring {
        let expr = match &reminder.recurrence {
            Some(expr) => expr,
            None => {
                warn!(
                    "Recurring reminder {} has no recurrence rule, skipping",
                    reminder.id
                );
                return LifecycleOutcome::Skip;
            }
        };
        let next = match next_occurrence(expr, now) {
            Some(next) => next,
            None => {
                warn!(
                    "Unable to parse recurrence rule `{}` of reminder {}, skipping",
                    expr, reminder.id
                );
                return LifecycleOutcome::Skip;
            }
        };
        (next, should_deactivate_recurring(reminder, next))
    } else {
        (
            reminder.date,
            should_deactivate_one_time(reminder, now, ctx.config.stale_threshold_ms),
        )
    };

    if decision.should_deactivate {
        if let Err(e) = ctx.repos.reminders.deactivate(&reminder.id).await {
            error!("Unable to deactivate reminder {}: {:?}", reminder.id, e);
            return LifecycleOutcome::Skip;
        }
        if let Some(reason) = decision.reason {
            info!("Deactivated reminder {}: {}", reminder.id, reason);
        }
        return LifecycleOutcome::Deactivated;
    }

    LifecycleOutcome::Keep(event_time)
}
