use crate::Reminder;
use chrono::{DateTime, Duration, Utc};
use std::fmt::Display;

/// Why a reminder's lifecycle ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeactivationReason {
    /// One-time reminder that has already fired its alert
    AlreadyAlerted,
    /// One-time reminder whose event time passed the stale threshold
    /// without an acknowledgement
    StaleMissed,
    /// Recurring reminder whose next occurrence falls after `end_date`
    PastEndDate,
}

impl Display for DeactivationReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let reason = match self {
            Self::AlreadyAlerted => "already alerted",
            Self::StaleMissed => "stale/missed",
            Self::PastEndDate => "past end_date",
        };
        write!(f, "{}", reason)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeactivationDecision {
    pub should_deactivate: bool,
    pub reason: Option<DeactivationReason>,
}

impl DeactivationDecision {
    fn keep() -> Self {
        Self {
            should_deactivate: false,
            reason: None,
        }
    }

    fn deactivate(reason: DeactivationReason) -> Self {
        Self {
            should_deactivate: true,
            reason: Some(reason),
        }
    }
}

/// A one-time reminder retires once it has fired, so it can never fire
/// again, or once its event time is more than `stale_threshold_ms` in the
/// past without a fire, at which point it is assumed unserviceable.
pub fn should_deactivate_one_time(
    reminder: &Reminder,
    now: DateTime<Utc>,
    stale_threshold_ms: i64,
) -> DeactivationDecision {
    if reminder.last_alert_time.is_some() {
        return DeactivationDecision::deactivate(DeactivationReason::AlreadyAlerted);
    }
    if reminder.date < now - Duration::milliseconds(stale_threshold_ms) {
        return DeactivationDecision::deactivate(DeactivationReason::StaleMissed);
    }
    DeactivationDecision::keep()
}

/// A recurring reminder retires once its recurrence stream leaves the
/// configured window.
pub fn should_deactivate_recurring(
    reminder: &Reminder,
    next_event_time: DateTime<Utc>,
) -> DeactivationDecision {
    match reminder.end_date {
        Some(end_date) if next_event_time > end_date => {
            DeactivationDecision::deactivate(DeactivationReason::PastEndDate)
        }
        _ => DeactivationDecision::keep(),
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use chrono::TimeZone;

    const STALE_THRESHOLD_MS: i64 = 1000 * 60 * 60;

    fn one_time_reminder(date: DateTime<Utc>) -> Reminder {
        Reminder {
            id: Default::default(),
            title: "Dentist".into(),
            description: "Remember the appointment".into(),
            date,
            location: None,
            contacts: Vec::new(),
            alerts: Vec::new(),
            is_recurring: false,
            recurrence: None,
            start_date: None,
            end_date: None,
            last_alert_time: None,
            is_active: true,
        }
    }

    #[test]
    fn one_time_reminder_that_fired_is_retired() {
        let date = Utc.with_ymd_and_hms(2025, 6, 1, 10, 0, 0).unwrap();
        let mut reminder = one_time_reminder(date);
        reminder.last_alert_time = Some(Utc.with_ymd_and_hms(2025, 6, 1, 9, 59, 0).unwrap());

        let decision = should_deactivate_one_time(&reminder, date, STALE_THRESHOLD_MS);
        assert!(decision.should_deactivate);
        assert_eq!(decision.reason, Some(DeactivationReason::AlreadyAlerted));
    }

    #[test]
    fn stale_one_time_reminder_is_retired() {
        let reminder = one_time_reminder(Utc.with_ymd_and_hms(2025, 6, 1, 8, 0, 0).unwrap());
        let now = Utc.with_ymd_and_hms(2025, 6, 1, 10, 0, 1).unwrap();

        let decision = should_deactivate_one_time(&reminder, now, STALE_THRESHOLD_MS);
        assert!(decision.should_deactivate);
        assert_eq!(decision.reason, Some(DeactivationReason::StaleMissed));
    }

    #[test]
    fn one_time_reminder_within_the_stale_window_is_kept() {
        let reminder = one_time_reminder(Utc.with_ymd_and_hms(2025, 6, 1, 10, 0, 0).unwrap());

        // Upcoming
        let now = Utc.with_ymd_and_hms(2025, 6, 1, 9, 0, 0).unwrap();
        assert!(!should_deactivate_one_time(&reminder, now, STALE_THRESHOLD_MS).should_deactivate);

        // Missed, but not past the threshold yet
        let now = Utc.with_ymd_and_hms(2025, 6, 1, 10, 59, 59).unwrap();
        assert!(!should_deactivate_one_time(&reminder, now, STALE_THRESHOLD_MS).should_deactivate);
    }

    #[test]
    fn recurring_reminder_past_end_date_is_retired() {
        let mut reminder = one_time_reminder(Utc.with_ymd_and_hms(2025, 5, 1, 9, 0, 0).unwrap());
        reminder.is_recurring = true;
        reminder.recurrence = Some("0 9 * * *".into());
        reminder.end_date = Some(Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap());

        let next_event_time = Utc.with_ymd_and_hms(2025, 6, 2, 9, 0, 0).unwrap();
        let decision = should_deactivate_recurring(&reminder, next_event_time);
        assert!(decision.should_deactivate);
        assert_eq!(decision.reason, Some(DeactivationReason::PastEndDate));
    }

    #[test]
    fn recurring_reminder_without_end_date_is_kept() {
        let mut reminder = one_time_reminder(Utc.with_ymd_and_hms(2025, 5, 1, 9, 0, 0).unwrap());
        reminder.is_recurring = true;
        reminder.recurrence = Some("0 9 * * *".into());

        let next_event_time = Utc.with_ymd_and_hms(2100, 1, 1, 9, 0, 0).unwrap();
        assert!(!should_deactivate_recurring(&reminder, next_event_time).should_deactivate);
    }

    #[test]
    fn recurring_reminder_inside_its_window_is_kept() {
        let mut reminder = one_time_reminder(Utc.with_ymd_and_hms(2025, 5, 1, 9, 0, 0).unwrap());
        reminder.is_recurring = true;
        reminder.recurrence = Some("0 9 * * *".into());
        reminder.end_date = Some(Utc.with_ymd_and_hms(2025, 6, 2, 9, 0, 0).unwrap());

        // Next occurrence exactly on end_date is still inside the window
        let next_event_time = Utc.with_ymd_and_hms(2025, 6, 2, 9, 0, 0).unwrap();
        assert!(!should_deactivate_recurring(&reminder, next_event_time).should_deactivate);
    }
}
