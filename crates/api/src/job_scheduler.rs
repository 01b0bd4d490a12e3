use crate::alerting::{CleanupSweepUseCase, RunTickUseCase};
use crate::shared::usecase::execute;
use memora_infra::Context;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{error, info};

const CLEANUP_INTERVAL: Duration = Duration::from_secs(60 * 60 * 24);

/// Tracks how many consecutive ticks have failed, for health reporting.
#[derive(Clone, Default)]
pub struct SchedulerHealth {
    consecutive_errors: Arc<AtomicU32>,
}

impl SchedulerHealth {
    pub fn consecutive_errors(&self) -> u32 {
        self.consecutive_errors.load(Ordering::Relaxed)
    }

    fn record_success(&self) {
        self.consecutive_errors.store(0, Ordering::Relaxed);
    }

    fn record_error(&self) {
        self.consecutive_errors.fetch_add(1, Ordering::Relaxed);
    }
}

/// Owns the polling-mode background loops.
///
/// One logical worker: each loop awaits its use case before the next tick
/// can start, and a tick overrunning the interval makes the missed ticks
/// get skipped instead of queued.
pub struct JobScheduler {
    shutdown: watch::Sender<bool>,
}

impl JobScheduler {
    pub fn start(ctx: Context, health: SchedulerHealth) -> Self {
        let (shutdown, _) = watch::channel(false);

        let tick_ctx = ctx.clone();
        let tick_shutdown = shutdown.subscribe();
        actix_web::rt::spawn(async move {
            alerting_loop(tick_ctx, tick_shutdown, health).await;
        });

        let cleanup_shutdown = shutdown.subscribe();
        actix_web::rt::spawn(async move {
            cleanup_loop(ctx, cleanup_shutdown).await;
        });

        Self { shutdown }
    }

    /// Signals the loops to stop. An in-progress tick finishes first, no
    /// new tick starts afterwards.
    pub fn stop(&self) {
        let _ = self.shutdown.send(true);
    }
}

async fn alerting_loop(ctx: Context, mut shutdown: watch::Receiver<bool>, health: SchedulerHealth) {
    let mut tick = interval(Duration::from_millis(ctx.config.tick_interval_ms as u64));
    tick.set_missed_tick_behavior(MissedTickBehavior::Skip);
    info!(
        "Starting the reminder alerting loop with a {} ms tick",
        ctx.config.tick_interval_ms
    );
    loop {
        tokio::select! {
            _ = tick.tick() => {
                match execute(RunTickUseCase, &ctx).await {
                    Ok(report) => {
                        health.record_success();
                        if report.fired > 0 || report.deactivated > 0 {
                            info!(
                                "Reminder tick fired {} alert(s) and deactivated {} reminder(s)",
                                report.fired, report.deactivated
                            );
                        }
                    }
                    Err(e) => {
                        health.record_error();
                        error!("Reminder tick failed: {:?}", e);
                    }
                }
            }
            _ = shutdown.changed() => {
                info!("Reminder alerting loop shutting down");
                break;
            }
        }
    }
}

async fn cleanup_loop(ctx: Context, mut shutdown: watch::Receiver<bool>) {
    let mut tick = interval(CLEANUP_INTERVAL);
    tick.set_missed_tick_behavior(MissedTickBehavior::Skip);
    loop {
        tokio::select! {
            _ = tick.tick() => {
                match execute(CleanupSweepUseCase, &ctx).await {
                    Ok(report) => info!(
                        "Cleanup sweep checked {} reminder(s) and deactivated {}",
                        report.checked, report.deactivated
                    ),
                    Err(e) => error!("Cleanup sweep failed: {:?}", e),
                }
            }
            _ = shutdown.changed() => {
                info!("Cleanup loop shutting down");
                break;
            }
        }
    }
}
