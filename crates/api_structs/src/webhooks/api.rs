pub mod reminder_alert {
    use chrono::{DateTime, Utc};
    use memora_domain::ID;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct RequestBody {
        pub reminder_id: ID,
        #[serde(default)]
        pub alert_time: Option<DateTime<Utc>>,
        #[serde(default)]
        pub is_recurring: Option<bool>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct APIResponse {
        pub status: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub reminder_title: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub reason: Option<String>,
    }

    impl APIResponse {
        pub fn ok(reminder_title: String) -> Self {
            Self {
                status: "ok".into(),
                reminder_title: Some(reminder_title),
                reason: None,
            }
        }

        pub fn skipped(reason: &str) -> Self {
            Self {
                status: "skipped".into(),
                reminder_title: None,
                reason: Some(reason.into()),
            }
        }
    }
}

pub mod cleanup {
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct APIResponse {
        pub checked: usize,
        pub deactivated: usize,
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn trigger_response_contracts() {
        let ok = serde_json::to_value(reminder_alert::APIResponse::ok("Standup".into())).unwrap();
        assert_eq!(
            ok,
            serde_json::json!({ "status": "ok", "reminderTitle": "Standup" })
        );

        let skipped =
            serde_json::to_value(reminder_alert::APIResponse::skipped("inactive")).unwrap();
        assert_eq!(
            skipped,
            serde_json::json!({ "status": "skipped", "reason": "inactive" })
        );
    }
}
