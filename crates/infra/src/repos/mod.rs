mod reminder;
mod shared;

pub use reminder::{IReminderRepo, InMemoryReminderRepo, SqliteReminderRepo};
pub use shared::repo::DeleteResult;

use sqlx::sqlite::SqlitePoolOptions;
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
pub struct Repos {
    pub reminders: Arc<dyn IReminderRepo>,
}

impl Repos {
    pub async fn create_sqlite(connection_string: &str) -> anyhow::Result<Self> {
        // A single connection so that writes serialise at the pool level
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect(connection_string)
            .await?;

        info!("DB CHECKING CONNECTION ...");
        reminder::run_migrations(&pool).await?;
        info!("DB CHECKING CONNECTION ... [done]");

        Ok(Self {
            reminders: Arc::new(SqliteReminderRepo::new(pool)),
        })
    }

    pub fn create_inmemory() -> Self {
        Self {
            reminders: Arc::new(InMemoryReminderRepo::new()),
        }
    }
}
