use super::IReminderRepo;
use crate::repos::shared::repo::DeleteResult;
use chrono::{DateTime, SecondsFormat, Utc};
use memora_domain::{Alert, Contact, Reminder, ID};
use sqlx::{FromRow, SqlitePool};

pub struct SqliteReminderRepo {
    pool: SqlitePool,
}

impl SqliteReminderRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

pub(crate) async fn run_migrations(pool: &SqlitePool) -> anyhow::Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS reminders (
            reminder_id INTEGER PRIMARY KEY AUTOINCREMENT,
            title TEXT NOT NULL,
            description TEXT NOT NULL,
            date TEXT NOT NULL,
            location TEXT,
            contacts TEXT NOT NULL,
            alerts TEXT NOT NULL,
            is_recurring INTEGER NOT NULL DEFAULT 0,
            recurrence TEXT,
            start_date TEXT,
            end_date TEXT,
            last_alert_time TEXT,
            is_active INTEGER NOT NULL DEFAULT 1
        )
        "#,
    )
    .execute(pool)
    .await?;
    Ok(())
}

/// Storage row as it sits in sqlite: contacts and alerts as JSON text,
/// booleans as 0/1 and instants as ISO-8601 strings with a trailing `Z`.
/// Rows are converted into domain reminders before any engine logic runs.
#[derive(Debug, FromRow)]
struct ReminderRaw {
    reminder_id: i64,
    title: String,
    description: String,
    date: String,
    location: Option<String>,
    contacts: String,
    alerts: String,
    is_recurring: i64,
    recurrence: Option<String>,
    start_date: Option<String>,
    end_date: Option<String>,
    last_alert_time: Option<String>,
    is_active: i64,
}

fn encode_instant(instant: &DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn decode_instant(raw: &str) -> anyhow::Result<DateTime<Utc>> {
    Ok(DateTime::parse_from_rfc3339(raw)
        .map_err(|e| anyhow::anyhow!("Malformed instant in storage: {}: {}", raw, e))?
        .with_timezone(&Utc))
}

impl TryFrom<ReminderRaw> for Reminder {
    type Error = anyhow::Error;

    fn try_from(raw: ReminderRaw) -> Result<Self, Self::Error> {
        let contacts: Vec<Contact> = serde_json::from_str(&raw.contacts)?;
        let alerts: Vec<Alert> = serde_json::from_str(&raw.alerts)?;
        Ok(Reminder {
            id: ID::new(raw.reminder_id),
            title: raw.title,
            description: raw.description,
            date: decode_instant(&raw.date)?,
            location: raw.location,
            contacts,
            alerts,
            is_recurring: raw.is_recurring != 0,
            recurrence: raw.recurrence,
            start_date: raw.start_date.as_deref().map(decode_instant).transpose()?,
            end_date: raw.end_date.as_deref().map(decode_instant).transpose()?,
            last_alert_time: raw
                .last_alert_time
                .as_deref()
                .map(decode_instant)
                .transpose()?,
            is_active: raw.is_active != 0,
        })
    }
}

#[async_trait::async_trait]
impl IReminderRepo for SqliteReminderRepo {
    async fn insert(&self, reminder: &Reminder) -> anyhow::Result<ID> {
        let res = sqlx::query(
            r#"
            INSERT INTO reminders
            (title, description, date, location, contacts, alerts, is_recurring, recurrence, start_date, end_date, last_alert_time, is_active)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)
            "#,
        )
        .bind(&reminder.title)
        .bind(&reminder.description)
        .bind(encode_instant(&reminder.date))
        .bind(&reminder.location)
        .bind(serde_json::to_string(&reminder.contacts)?)
        .bind(serde_json::to_string(&reminder.alerts)?)
        .bind(reminder.is_recurring as i64)
        .bind(&reminder.recurrence)
        .bind(reminder.start_date.as_ref().map(encode_instant))
        .bind(reminder.end_date.as_ref().map(encode_instant))
        .bind(reminder.last_alert_time.as_ref().map(encode_instant))
        .bind(reminder.is_active as i64)
        .execute(&self.pool)
        .await?;
        Ok(ID::new(res.last_insert_rowid()))
    }

    async fn save(&self, reminder: &Reminder) -> anyhow::Result<bool> {
        let res = sqlx::query(
            r#"
            UPDATE reminders
            SET title = ?1,
                description = ?2,
                date = ?3,
                location = ?4,
                contacts = ?5,
                alerts = ?6,
                is_recurring = ?7,
                recurrence = ?8,
                start_date = ?9,
                end_date = ?10,
                last_alert_time = ?11,
                is_active = ?12
            WHERE reminder_id = ?13
            "#,
        )
        .bind(&reminder.title)
        .bind(&reminder.description)
        .bind(encode_instant(&reminder.date))
        .bind(&reminder.location)
        .bind(serde_json::to_string(&reminder.contacts)?)
        .bind(serde_json::to_string(&reminder.alerts)?)
        .bind(reminder.is_recurring as i64)
        .bind(&reminder.recurrence)
        .bind(reminder.start_date.as_ref().map(encode_instant))
        .bind(reminder.end_date.as_ref().map(encode_instant))
        .bind(reminder.last_alert_time.as_ref().map(encode_instant))
        .bind(reminder.is_active as i64)
        .bind(reminder.id.inner())
        .execute(&self.pool)
        .await?;
        Ok(res.rows_affected() > 0)
    }

    async fn find(&self, reminder_id: &ID) -> anyhow::Result<Option<Reminder>> {
        let raw = sqlx::query_as::<_, ReminderRaw>(
            r#"
            SELECT * FROM reminders
            WHERE reminder_id = ?1
            "#,
        )
        .bind(reminder_id.inner())
        .fetch_optional(&self.pool)
        .await?;
        raw.map(Reminder::try_from).transpose()
    }

    async fn find_all(&self) -> anyhow::Result<Vec<Reminder>> {
        let raws = sqlx::query_as::<_, ReminderRaw>("SELECT * FROM reminders")
            .fetch_all(&self.pool)
            .await?;
        raws.into_iter().map(Reminder::try_from).collect()
    }

    async fn find_active(&self) -> anyhow::Result<Vec<Reminder>> {
        let raws = sqlx::query_as::<_, ReminderRaw>(
            r#"
            SELECT * FROM reminders
            WHERE is_active = 1
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        raws.into_iter().map(Reminder::try_from).collect()
    }

    async fn delete(&self, reminder_id: &ID) -> anyhow::Result<bool> {
        let res = sqlx::query(
            r#"
            DELETE FROM reminders
            WHERE reminder_id = ?1
            "#,
        )
        .bind(reminder_id.inner())
        .execute(&self.pool)
        .await?;
        Ok(res.rows_affected() > 0)
    }

    async fn delete_many(&self, reminder_ids: &[ID]) -> anyhow::Result<DeleteResult> {
        if reminder_ids.is_empty() {
            return Ok(DeleteResult { deleted_count: 0 });
        }
        // Sqlite has no array binding, expand one placeholder per id
        let placeholders = reminder_ids
            .iter()
            .map(|_| "?")
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!(
            "DELETE FROM reminders WHERE reminder_id IN ({})",
            placeholders
        );
        let mut query = sqlx::query(&sql);
        for reminder_id in reminder_ids {
            query = query.bind(reminder_id.inner());
        }
        let res = query.execute(&self.pool).await?;
        Ok(DeleteResult {
            deleted_count: res.rows_affected() as i64,
        })
    }

    async fn deactivate(&self, reminder_id: &ID) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            UPDATE reminders
            SET is_active = 0
            WHERE reminder_id = ?1
            "#,
        )
        .bind(reminder_id.inner())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn set_last_alert_time(
        &self,
        reminder_id: &ID,
        last_alert_time: DateTime<Utc>,
    ) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            UPDATE reminders
            SET last_alert_time = ?1
            WHERE reminder_id = ?2
            "#,
        )
        .bind(encode_instant(&last_alert_time))
        .bind(reminder_id.inner())
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}
