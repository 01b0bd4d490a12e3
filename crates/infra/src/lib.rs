mod config;
mod repos;
mod services;
mod system;

pub use config::{Config, SigningKeys, MIN_TICK_INTERVAL_MS};
pub use repos::{DeleteResult, IReminderRepo, InMemoryReminderRepo, Repos, SqliteReminderRepo};
pub use services::{
    HttpDelayedQueue, HttpMailSender, IDelayedQueue, IMailSender, InMemoryDelayedQueue,
    InMemoryMailSender, PublishedMessage, SentEmail,
};
pub use system::{ISys, RealSys};

use std::sync::Arc;
use tracing::{info, warn};

#[derive(Clone)]
pub struct Context {
    pub repos: Repos,
    pub config: Config,
    pub sys: Arc<dyn ISys>,
    pub mailer: Arc<dyn IMailSender>,
    pub queue: Arc<dyn IDelayedQueue>,
}

impl Context {
    pub fn create_inmemory() -> Self {
        Self {
            repos: Repos::create_inmemory(),
            config: Config::new(),
            sys: Arc::new(RealSys {}),
            mailer: Arc::new(InMemoryMailSender::new()),
            queue: Arc::new(InMemoryDelayedQueue::new()),
        }
    }

    async fn create_sqlite(connection_string: &str) -> Self {
        let config = Config::new();
        let repos = Repos::create_sqlite(connection_string)
            .await
            .expect("Sqlite connection string must be valid and the database reachable");

        let mailer: Arc<dyn IMailSender> = match (&config.mail_api_url, &config.mail_api_key) {
            (Some(api_url), Some(api_key)) => {
                Arc::new(HttpMailSender::new(api_url.clone(), api_key.clone()))
            }
            _ => {
                warn!("MAIL_API_URL / MAIL_API_KEY env vars were not provided. Emails are only recorded in memory. This should only be used during testing!");
                Arc::new(InMemoryMailSender::new())
            }
        };

        let queue: Arc<dyn IDelayedQueue> = match (&config.queue_url, &config.queue_api_key) {
            (Some(queue_url), Some(api_key)) => {
                Arc::new(HttpDelayedQueue::new(queue_url.clone(), api_key.clone()))
            }
            _ => {
                warn!("QUEUE_URL / QUEUE_API_KEY env vars were not provided. Delayed callbacks are only recorded in memory. This should only be used during testing!");
                Arc::new(InMemoryDelayedQueue::new())
            }
        };

        Self {
            repos,
            config,
            sys: Arc::new(RealSys {}),
            mailer,
            queue,
        }
    }
}

/// Will setup the correct Infra Context given the environment
pub async fn setup_context() -> Context {
    const SQLITE_CONNECTION_STRING: &str = "SQLITE_CONNECTION_STRING";

    match std::env::var(SQLITE_CONNECTION_STRING) {
        Ok(connection_string) => {
            info!(
                "{} env var was provided. Going to use sqlite.",
                SQLITE_CONNECTION_STRING
            );
            Context::create_sqlite(&connection_string).await
        }
        Err(_) => {
            warn!(
                "{} env var was not provided. Going to use inmemory infra. This should only be used during testing!",
                SQLITE_CONNECTION_STRING
            );
            Context::create_inmemory()
        }
    }
}
