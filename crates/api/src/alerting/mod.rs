mod cleanup;
mod dispatcher;
mod fire_reminder;
mod lifecycle;
mod run_tick;

pub use cleanup::{CleanupReport, CleanupSweepUseCase};
pub use dispatcher::send_notifications;
pub use fire_reminder::fire_reminder;
pub use run_tick::{RunTickUseCase, TickReport};
