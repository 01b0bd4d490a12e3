use super::lifecycle::{evaluate_lifecycle, LifecycleOutcome};
use crate::shared::usecase::UseCase;
use memora_infra::Context;
use tracing::error;

/// Batch variant of the scheduling loop that only applies the deactivation
/// policy. It never dispatches notifications; its job is to reap reminders
/// the live loop never saw, e.g. ones that went stale while the engine was
/// asleep. In event mode this sweep is the only reaper.
#[derive(Debug)]
pub struct CleanupSweepUseCase;

#[derive(Debug, Default, PartialEq)]
pub struct CleanupReport {
    pub checked: usize,
    pub deactivated: usize,
}

#[derive(Debug)]
pub enum UseCaseError {
    StorageError,
}

#[async_trait::async_trait(?Send)]
impl UseCase for CleanupSweepUseCase {
    type Response = CleanupReport;
    type Error = UseCaseError;

    const NAME: &'static str = "CleanupSweep";

    async fn execute(&mut self, ctx: &Context) -> Result<Self::Response, Self::Error> {
        let reminders = ctx.repos.reminders.find_active().await.map_err(|e| {
            error!("Unable to load active reminders: {:?}", e);
            UseCaseError::StorageError
        })?;
        let now = ctx.sys.now();

        let mut report = CleanupReport::default();
        for reminder in reminders {
            if reminder.alerts.is_empty() {
                continue;
            }
            report.checked += 1;
            if let LifecycleOutcome::Deactivated = evaluate_lifecycle(&reminder, now, ctx).await {
                report.deactivated += 1;
            }
        }
        Ok(report)
    }
}
