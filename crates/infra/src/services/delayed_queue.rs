use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Mutex;

/// How many delivery attempts the queue makes per callback
const RETRIES: u32 = 3;

/// Client for the external delayed-callback queue used in event mode. The
/// queue POSTs `body` back to `url`, either once after a delay or on a
/// cron schedule.
#[async_trait::async_trait]
pub trait IDelayedQueue: Send + Sync {
    /// Schedules a single callback after `delay_secs`, returns its message id
    async fn publish_one_shot(
        &self,
        url: &str,
        body: Value,
        delay_secs: i64,
    ) -> anyhow::Result<String>;
    /// Installs a recurring callback on `cron`, returns the schedule id
    async fn publish_cron(&self, url: &str, cron: &str, body: Value) -> anyhow::Result<String>;
    /// Cancels a pending one-shot message or a cron schedule
    async fn cancel(&self, id: &str) -> anyhow::Result<()>;
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PublishRequest<'a> {
    url: &'a str,
    body: &'a Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    delay_seconds: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    cron: Option<&'a str>,
    retries: u32,
}

#[derive(Debug, Deserialize)]
struct PublishResponse {
    id: String,
}

pub struct HttpDelayedQueue {
    client: reqwest::Client,
    queue_url: String,
    api_key: String,
}

impl HttpDelayedQueue {
    pub fn new(queue_url: String, api_key: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            queue_url,
            api_key,
        }
    }

    async fn publish(&self, request: &PublishRequest<'_>) -> anyhow::Result<String> {
        let res: PublishResponse = self
            .client
            .post(format!("{}/publish", self.queue_url))
            .header("x-api-key", &self.api_key)
            .json(request)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(res.id)
    }
}

#[async_trait::async_trait]
impl IDelayedQueue for HttpDelayedQueue {
    async fn publish_one_shot(
        &self,
        url: &str,
        body: Value,
        delay_secs: i64,
    ) -> anyhow::Result<String> {
        self.publish(&PublishRequest {
            url,
            body: &body,
            delay_seconds: Some(delay_secs),
            cron: None,
            retries: RETRIES,
        })
        .await
    }

    async fn publish_cron(&self, url: &str, cron: &str, body: Value) -> anyhow::Result<String> {
        self.publish(&PublishRequest {
            url,
            body: &body,
            delay_seconds: None,
            cron: Some(cron),
            retries: RETRIES,
        })
        .await
    }

    async fn cancel(&self, id: &str) -> anyhow::Result<()> {
        self.client
            .delete(format!("{}/messages/{}", self.queue_url, id))
            .header("x-api-key", &self.api_key)
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PublishedMessage {
    pub id: String,
    pub url: String,
    pub body: Value,
    pub delay_secs: Option<i64>,
    pub cron: Option<String>,
}

/// Queue double recording published messages. Used in tests and when no
/// queue is configured.
pub struct InMemoryDelayedQueue {
    pub published: Mutex<Vec<PublishedMessage>>,
    next_id: AtomicI64,
}

impl InMemoryDelayedQueue {
    pub fn new() -> Self {
        Self {
            published: Mutex::new(Vec::new()),
            next_id: AtomicI64::new(1),
        }
    }

    fn next_id(&self) -> String {
        format!("msg-{}", self.next_id.fetch_add(1, Ordering::SeqCst))
    }
}

impl Default for InMemoryDelayedQueue {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl IDelayedQueue for InMemoryDelayedQueue {
    async fn publish_one_shot(
        &self,
        url: &str,
        body: Value,
        delay_secs: i64,
    ) -> anyhow::Result<String> {
        let id = self.next_id();
        self.published.lock().unwrap().push(PublishedMessage {
            id: id.clone(),
            url: url.into(),
            body,
            delay_secs: Some(delay_secs),
            cron: None,
        });
        Ok(id)
    }

    async fn publish_cron(&self, url: &str, cron: &str, body: Value) -> anyhow::Result<String> {
        let id = self.next_id();
        self.published.lock().unwrap().push(PublishedMessage {
            id: id.clone(),
            url: url.into(),
            body,
            delay_secs: None,
            cron: Some(cron.into()),
        });
        Ok(id)
    }

    async fn cancel(&self, id: &str) -> anyhow::Result<()> {
        self.published.lock().unwrap().retain(|msg| msg.id != id);
        Ok(())
    }
}
