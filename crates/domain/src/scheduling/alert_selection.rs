use crate::{Alert, Reminder};
use chrono::{DateTime, Duration, Utc};

/// Selects the alert of `reminder` that must fire in the tick starting at
/// `now`, if any.
///
/// An alert is due when `now` has reached its alert instant
/// (`event_time - offset_ms`) but not yet left the half-open window
/// `[0, tick_interval_ms)`. For recurring reminders an alert whose instant
/// is already covered by the acknowledgement cursor has fired for this
/// occurrence and is skipped. The first due alert in insertion order wins,
/// so at most one alert fires per reminder per tick; any further due alert
/// is picked up by a later tick.
pub fn alert_to_fire<'a>(
    reminder: &'a Reminder,
    event_time: DateTime<Utc>,
    now: DateTime<Utc>,
    tick_interval_ms: i64,
) -> Option<&'a Alert> {
    reminder.alerts.iter().find(|alert| {
        let alert_instant = event_time - Duration::milliseconds(alert.offset_ms);
        let diff = (now - alert_instant).num_milliseconds();
        if diff < 0 || diff >= tick_interval_ms {
            return false;
        }
        if reminder.is_recurring {
            if let Some(last_alert_time) = reminder.last_alert_time {
                if last_alert_time >= alert_instant {
                    return false;
                }
            }
        }
        true
    })
}

#[cfg(test)]
mod test {
    use super::*;
    use chrono::TimeZone;

    const TICK_INTERVAL_MS: i64 = 3000;

    fn reminder_with_alerts(date: DateTime<Utc>, alerts: Vec<Alert>) -> Reminder {
        Reminder {
            id: Default::default(),
            title: "Standup".into(),
            description: "Daily standup".into(),
            date,
            location: None,
            contacts: Vec::new(),
            alerts,
            is_recurring: false,
            recurrence: None,
            start_date: None,
            end_date: None,
            last_alert_time: None,
            is_active: true,
        }
    }

    #[test]
    fn selects_alert_inside_the_window() {
        let event_time = Utc.with_ymd_and_hms(2025, 6, 1, 10, 0, 0).unwrap();
        let reminder = reminder_with_alerts(
            event_time,
            vec![Alert {
                id: 1,
                offset_ms: 60_000,
            }],
        );

        // 500 ms into the window
        let now = Utc.with_ymd_and_hms(2025, 6, 1, 9, 59, 0).unwrap()
            + Duration::milliseconds(500);
        let alert = alert_to_fire(&reminder, event_time, now, TICK_INTERVAL_MS);
        assert_eq!(alert.map(|a| a.id), Some(1));
    }

    #[test]
    fn window_is_half_open() {
        let event_time = Utc.with_ymd_and_hms(2025, 6, 1, 10, 0, 0).unwrap();
        let reminder = reminder_with_alerts(
            event_time,
            vec![Alert {
                id: 1,
                offset_ms: 60_000,
            }],
        );
        let alert_instant = Utc.with_ymd_and_hms(2025, 6, 1, 9, 59, 0).unwrap();

        // diff == 0 is due
        assert!(alert_to_fire(&reminder, event_time, alert_instant, TICK_INTERVAL_MS).is_some());
        // diff == tick interval is no longer due
        let now = alert_instant + Duration::milliseconds(TICK_INTERVAL_MS);
        assert!(alert_to_fire(&reminder, event_time, now, TICK_INTERVAL_MS).is_none());
        // not due yet
        let now = alert_instant - Duration::milliseconds(1);
        assert!(alert_to_fire(&reminder, event_time, now, TICK_INTERVAL_MS).is_none());
    }

    #[test]
    fn at_most_one_alert_per_tick_first_in_order_wins() {
        let event_time = Utc.with_ymd_and_hms(2025, 6, 1, 10, 0, 0).unwrap();
        let reminder = reminder_with_alerts(
            event_time,
            vec![
                Alert {
                    id: 1,
                    offset_ms: 60_000,
                },
                Alert {
                    id: 2,
                    offset_ms: 61_000,
                },
            ],
        );

        // Both alert instants fall inside the same window
        let now = Utc.with_ymd_and_hms(2025, 6, 1, 9, 59, 1).unwrap();
        let alert = alert_to_fire(&reminder, event_time, now, TICK_INTERVAL_MS);
        assert_eq!(alert.map(|a| a.id), Some(1));
    }

    #[test]
    fn acknowledged_occurrence_of_recurring_reminder_is_skipped() {
        let event_time = Utc.with_ymd_and_hms(2025, 6, 1, 10, 5, 0).unwrap();
        let mut reminder = reminder_with_alerts(
            event_time,
            vec![Alert {
                id: 1,
                offset_ms: 0,
            }],
        );
        reminder.is_recurring = true;
        reminder.recurrence = Some("*/5 * * * *".into());

        // Cursor sits exactly on the alert instant: acknowledged
        reminder.last_alert_time = Some(event_time);
        assert!(alert_to_fire(&reminder, event_time, event_time, TICK_INTERVAL_MS).is_none());

        // Cursor from an earlier occurrence does not suppress this one
        reminder.last_alert_time = Some(Utc.with_ymd_and_hms(2025, 6, 1, 10, 0, 0).unwrap());
        assert!(alert_to_fire(&reminder, event_time, event_time, TICK_INTERVAL_MS).is_some());
    }

    #[test]
    fn cursor_does_not_suppress_one_time_reminders() {
        // The deactivation policy owns the one-time case; selection alone
        // still reports the alert as due.
        let event_time = Utc.with_ymd_and_hms(2025, 6, 1, 10, 0, 0).unwrap();
        let mut reminder = reminder_with_alerts(
            event_time,
            vec![Alert {
                id: 1,
                offset_ms: 3000,
            }],
        );
        reminder.last_alert_time = Some(event_time);

        let now = event_time - Duration::milliseconds(3000);
        assert!(alert_to_fire(&reminder, event_time, now, TICK_INTERVAL_MS).is_some());
    }

    #[test]
    fn alert_before_its_window_is_not_selected() {
        let event_time = Utc.with_ymd_and_hms(2025, 6, 1, 10, 5, 0).unwrap();
        let reminder = reminder_with_alerts(
            event_time,
            vec![Alert {
                id: 1,
                offset_ms: 0,
            }],
        );

        // 500 ms before the alert instant
        let now = event_time - Duration::milliseconds(500);
        assert!(alert_to_fire(&reminder, event_time, now, TICK_INTERVAL_MS).is_none());
    }

    #[test]
    fn reminder_without_alerts_never_fires() {
        let event_time = Utc.with_ymd_and_hms(2025, 6, 1, 10, 0, 0).unwrap();
        let reminder = reminder_with_alerts(event_time, Vec::new());
        assert!(alert_to_fire(&reminder, event_time, event_time, TICK_INTERVAL_MS).is_none());
    }
}
