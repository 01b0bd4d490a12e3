mod recurrence;
mod reminder;
pub mod scheduling;
mod shared;

pub use recurrence::{is_valid_cron, next_occurrence};
pub use reminder::{Alert, Contact, ContactMode, Reminder, MIN_ALERT_OFFSET_MS};
pub use shared::entity::{Entity, ID};
