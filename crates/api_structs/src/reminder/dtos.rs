use chrono::{DateTime, Utc};
use memora_domain::{Alert, Contact, Reminder, ID};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReminderDTO {
    pub id: ID,
    pub title: String,
    pub description: String,
    pub date: DateTime<Utc>,
    pub location: Option<String>,
    pub contacts: Vec<Contact>,
    pub alerts: Vec<Alert>,
    pub is_recurring: bool,
    pub recurrence: Option<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub last_alert_time: Option<DateTime<Utc>>,
    pub is_active: bool,
}

impl ReminderDTO {
    pub fn new(reminder: Reminder) -> Self {
        Self {
            id: reminder.id,
            title: reminder.title,
            description: reminder.description,
            date: reminder.date,
            location: reminder.location,
            contacts: reminder.contacts,
            alerts: reminder.alerts,
            is_recurring: reminder.is_recurring,
            recurrence: reminder.recurrence,
            start_date: reminder.start_date,
            end_date: reminder.end_date,
            last_alert_time: reminder.last_alert_time,
            is_active: reminder.is_active,
        }
    }
}
