use crate::dtos::ReminderDTO;
use chrono::{DateTime, Utc};
use memora_domain::{Alert, Contact, Reminder, ID};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReminderResponse {
    pub reminder: ReminderDTO,
}

impl ReminderResponse {
    pub fn new(reminder: Reminder) -> Self {
        Self {
            reminder: ReminderDTO::new(reminder),
        }
    }
}

pub mod create_reminder {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct RequestBody {
        pub title: String,
        pub description: String,
        pub date: DateTime<Utc>,
        #[serde(default)]
        pub location: Option<String>,
        #[serde(default)]
        pub contacts: Vec<Contact>,
        #[serde(default)]
        pub alerts: Vec<Alert>,
        #[serde(default)]
        pub is_recurring: bool,
        #[serde(default)]
        pub recurrence: Option<String>,
        #[serde(default)]
        pub start_date: Option<DateTime<Utc>>,
        #[serde(default)]
        pub end_date: Option<DateTime<Utc>>,
    }

    pub type APIResponse = ReminderResponse;
}

pub mod get_reminder {
    use super::*;

    #[derive(Debug, Deserialize)]
    pub struct PathParams {
        pub reminder_id: ID,
    }

    pub type APIResponse = ReminderResponse;
}

pub mod get_reminders {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct QueryParams {
        #[serde(default)]
        pub active: Option<bool>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct APIResponse {
        pub reminders: Vec<ReminderDTO>,
    }

    impl APIResponse {
        pub fn new(reminders: Vec<Reminder>) -> Self {
            Self {
                reminders: reminders.into_iter().map(ReminderDTO::new).collect(),
            }
        }
    }
}

pub mod update_reminder {
    use super::*;

    #[derive(Debug, Deserialize)]
    pub struct PathParams {
        pub reminder_id: ID,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct RequestBody {
        #[serde(default)]
        pub title: Option<String>,
        #[serde(default)]
        pub description: Option<String>,
        #[serde(default)]
        pub date: Option<DateTime<Utc>>,
        #[serde(default)]
        pub location: Option<String>,
        #[serde(default)]
        pub contacts: Option<Vec<Contact>>,
        #[serde(default)]
        pub alerts: Option<Vec<Alert>>,
        #[serde(default)]
        pub is_recurring: Option<bool>,
        #[serde(default)]
        pub recurrence: Option<String>,
        #[serde(default)]
        pub start_date: Option<DateTime<Utc>>,
        #[serde(default)]
        pub end_date: Option<DateTime<Utc>>,
    }

    pub type APIResponse = ReminderResponse;
}

pub mod delete_reminder {
    use super::*;

    #[derive(Debug, Deserialize)]
    pub struct PathParams {
        pub reminder_id: ID,
    }

    pub type APIResponse = ReminderResponse;
}

pub mod delete_many_reminders {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct RequestBody {
        pub reminder_ids: Vec<ID>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct APIResponse {
        pub deleted_count: i64,
    }
}
