use serde::Serialize;
use std::sync::Mutex;

/// Outbound notification transport. The engine is transport-agnostic and
/// only ever hands over an address, a subject and a body.
#[async_trait::async_trait]
pub trait IMailSender: Send + Sync {
    async fn send(&self, address: &str, subject: &str, body: &str) -> anyhow::Result<()>;
}

#[derive(Debug, Serialize)]
struct MailRequest<'a> {
    to: &'a str,
    subject: &'a str,
    body: &'a str,
}

/// Delivers mail through an HTTP mail provider API.
pub struct HttpMailSender {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
}

impl HttpMailSender {
    pub fn new(api_url: String, api_key: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_url,
            api_key,
        }
    }
}

#[async_trait::async_trait]
impl IMailSender for HttpMailSender {
    async fn send(&self, address: &str, subject: &str, body: &str) -> anyhow::Result<()> {
        self.client
            .post(&self.api_url)
            .header("x-api-key", &self.api_key)
            .json(&MailRequest {
                to: address,
                subject,
                body,
            })
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SentEmail {
    pub address: String,
    pub subject: String,
    pub body: String,
}

/// Records sent mail instead of delivering it. Used in tests and when no
/// mail provider is configured.
pub struct InMemoryMailSender {
    pub sent: Mutex<Vec<SentEmail>>,
}

impl InMemoryMailSender {
    pub fn new() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
        }
    }

    pub fn sent_count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }
}

impl Default for InMemoryMailSender {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl IMailSender for InMemoryMailSender {
    async fn send(&self, address: &str, subject: &str, body: &str) -> anyhow::Result<()> {
        self.sent.lock().unwrap().push(SentEmail {
            address: address.into(),
            subject: subject.into(),
            body: body.into(),
        });
        Ok(())
    }
}
