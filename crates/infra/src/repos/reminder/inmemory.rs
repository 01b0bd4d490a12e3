use super::IReminderRepo;
use crate::repos::shared::inmemory_repo::{
    delete, delete_by, find, find_by, insert, save, update_one,
};
use crate::repos::shared::repo::DeleteResult;
use chrono::{DateTime, Utc};
use memora_domain::{Reminder, ID};
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Mutex;

pub struct InMemoryReminderRepo {
    reminders: Mutex<Vec<Reminder>>,
    next_id: AtomicI64,
}

impl InMemoryReminderRepo {
    pub fn new() -> Self {
        Self {
            reminders: Mutex::new(Vec::new()),
            next_id: AtomicI64::new(1),
        }
    }
}

impl Default for InMemoryReminderRepo {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl IReminderRepo for InMemoryReminderRepo {
    async fn insert(&self, reminder: &Reminder) -> anyhow::Result<ID> {
        let mut reminder = reminder.clone();
        reminder.id = ID::new(self.next_id.fetch_add(1, Ordering::SeqCst));
        insert(&reminder, &self.reminders);
        Ok(reminder.id)
    }

    async fn save(&self, reminder: &Reminder) -> anyhow::Result<bool> {
        Ok(save(reminder, &self.reminders))
    }

    async fn find(&self, reminder_id: &ID) -> anyhow::Result<Option<Reminder>> {
        Ok(find(reminder_id, &self.reminders))
    }

    async fn find_all(&self) -> anyhow::Result<Vec<Reminder>> {
        Ok(find_by(&self.reminders, |_| true))
    }

    async fn find_active(&self) -> anyhow::Result<Vec<Reminder>> {
        Ok(find_by(&self.reminders, |r| r.is_active))
    }

    async fn delete(&self, reminder_id: &ID) -> anyhow::Result<bool> {
        Ok(delete(reminder_id, &self.reminders).is_some())
    }

    async fn delete_many(&self, reminder_ids: &[ID]) -> anyhow::Result<DeleteResult> {
        Ok(delete_by(&self.reminders, |r| {
            reminder_ids.contains(&r.id)
        }))
    }

    async fn deactivate(&self, reminder_id: &ID) -> anyhow::Result<()> {
        update_one(reminder_id, &self.reminders, |r| r.is_active = false);
        Ok(())
    }

    async fn set_last_alert_time(
        &self,
        reminder_id: &ID,
        last_alert_time: DateTime<Utc>,
    ) -> anyhow::Result<()> {
        update_one(reminder_id, &self.reminders, |r| {
            r.last_alert_time = Some(last_alert_time)
        });
        Ok(())
    }
}
