use crate::shared::entity::{Entity, ID};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Smallest allowed alert offset. An alert closer to the event time than
/// one tick cannot be scheduled reliably.
pub const MIN_ALERT_OFFSET_MS: i64 = 3000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContactMode {
    Email,
    Sms,
    Push,
    Ical,
}

/// Somebody to notify when an alert of a `Reminder` fires. Only the email
/// mode has a delivery implementation, the other modes are accepted and
/// skipped by the dispatcher.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    pub id: i64,
    pub mode: ContactMode,
    pub address: String,
}

/// A single alert of a `Reminder`, due `offset_ms` before the event time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Alert {
    pub id: i64,
    pub offset_ms: i64,
}

impl Alert {
    pub fn is_valid(&self) -> bool {
        self.offset_ms >= MIN_ALERT_OFFSET_MS
    }
}

/// A `Reminder` is the aggregate root of this service: a titled event at
/// an absolute instant, the contacts to notify and the alerts deciding
/// when the notifications go out.
///
/// One-time reminders fire around their stored `date` and are then
/// retired. Recurring reminders carry a cron expression and stay active
/// until the recurrence stream passes `end_date`.
#[derive(Debug, Clone)]
pub struct Reminder {
    pub id: ID,
    pub title: String,
    pub description: String,
    /// One-time fire instant, or the anchor of the recurrence
    pub date: DateTime<Utc>,
    pub location: Option<String>,
    pub contacts: Vec<Contact>,
    /// A reminder with no alerts never fires and is skipped by the engine
    pub alerts: Vec<Alert>,
    pub is_recurring: bool,
    /// Standard 5-field cron expression, interpreted in UTC.
    /// Required when `is_recurring` is set.
    pub recurrence: Option<String>,
    pub start_date: Option<DateTime<Utc>>,
    /// End of the recurrence window. The reminder retires once the next
    /// occurrence falls after it.
    pub end_date: Option<DateTime<Utc>>,
    /// Acknowledgement cursor, written whenever an alert fires. Never
    /// decreases over the life of the reminder.
    pub last_alert_time: Option<DateTime<Utc>>,
    pub is_active: bool,
}

impl Entity for Reminder {
    fn id(&self) -> ID {
        self.id
    }
}
