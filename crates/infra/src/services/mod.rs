mod delayed_queue;
mod mail;

pub use delayed_queue::{
    HttpDelayedQueue, IDelayedQueue, InMemoryDelayedQueue, PublishedMessage,
};
pub use mail::{HttpMailSender, IMailSender, InMemoryMailSender, SentEmail};
