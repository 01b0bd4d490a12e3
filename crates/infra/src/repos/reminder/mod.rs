mod inmemory;
mod sqlite;

pub use inmemory::InMemoryReminderRepo;
pub(crate) use sqlite::run_migrations;
pub use sqlite::SqliteReminderRepo;

use crate::repos::shared::repo::DeleteResult;
use chrono::{DateTime, Utc};
use memora_domain::{Reminder, ID};

#[async_trait::async_trait]
pub trait IReminderRepo: Send + Sync {
    /// Inserts a new reminder and assigns its id
    async fn insert(&self, reminder: &Reminder) -> anyhow::Result<ID>;
    /// Replaces a stored reminder, returns whether it existed
    async fn save(&self, reminder: &Reminder) -> anyhow::Result<bool>;
    async fn find(&self, reminder_id: &ID) -> anyhow::Result<Option<Reminder>>;
    async fn find_all(&self) -> anyhow::Result<Vec<Reminder>>;
    async fn find_active(&self) -> anyhow::Result<Vec<Reminder>>;
    async fn delete(&self, reminder_id: &ID) -> anyhow::Result<bool>;
    async fn delete_many(&self, reminder_ids: &[ID]) -> anyhow::Result<DeleteResult>;
    /// Idempotent, unknown ids are a no-op
    async fn deactivate(&self, reminder_id: &ID) -> anyhow::Result<()>;
    async fn set_last_alert_time(
        &self,
        reminder_id: &ID,
        last_alert_time: DateTime<Utc>,
    ) -> anyhow::Result<()>;
}
