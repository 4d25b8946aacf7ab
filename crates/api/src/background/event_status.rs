//! Periodic persistence of derived event statuses.
//!
//! Handlers always project the current status at read time. This job keeps
//! the stored column in step so that filters and reports on `status` see
//! the same values. Stored `Completed` rows are never touched.

use std::time::Duration;

use chrono::Utc;
use sqlx::PgPool;
use tokio_util::sync::CancellationToken;
use unievent_db::repositories::EventRepo;

/// Run the reconciliation loop every `period` until `cancel` fires.
///
/// The first pass runs immediately on start.
pub async fn run(pool: PgPool, period: Duration, cancel: CancellationToken) {
    tracing::info!(
        interval_secs = period.as_secs(),
        "Event status reconciler started"
    );

    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Event status reconciler stopping");
                break;
            }
            _ = interval.tick() => {
                let today = Utc::now().date_naive();
                match EventRepo::reconcile_statuses(&pool, today).await {
                    Ok(0) => tracing::debug!("Event statuses already current"),
                    Ok(updated) => {
                        tracing::info!(updated, %today, "Event statuses reconciled");
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "Event status reconciliation failed");
                    }
                }
            }
        }
    }
}
