//! Cron-driven dispatch scheduling.

use std::sync::Arc;

use tokio_cron_scheduler::{Job, JobScheduler};
use uuid::Uuid;

use crate::dispatcher::VerificationDispatcher;
use crate::error::MailError;

/// Owns the running cron scheduler and the dispatch job registered on it.
pub struct DispatchScheduler {
    scheduler: JobScheduler,
    job_id: Uuid,
}

impl DispatchScheduler {
    /// Register the dispatch job on `cron` and start ticking.
    pub async fn start(
        dispatcher: Arc<VerificationDispatcher>,
        cron: &str,
    ) -> Result<Self, MailError> {
        let scheduler = JobScheduler::new().await?;

        let job = Job::new_async(cron, move |_uuid, _lock| {
            let dispatcher = dispatcher.clone();

            Box::pin(async move {
                match dispatcher.run_once().await {
                    Ok(report) if report.skipped => {}
                    Ok(report) => {
                        tracing::debug!(?report, "Dispatch run finished");
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "Dispatch run failed");
                    }
                }
            })
        })?;

        let job_id = scheduler.add(job).await?;
        scheduler.start().await?;

        tracing::info!(cron = %cron, "Verification dispatch scheduler started");
        Ok(Self { scheduler, job_id })
    }

    pub fn job_id(&self) -> Uuid {
        self.job_id
    }

    /// Stop scheduling. A run already in flight finishes on its own.
    pub async fn shutdown(mut self) -> Result<(), MailError> {
        self.scheduler.remove(&self.job_id).await?;
        self.scheduler.shutdown().await?;
        tracing::info!("Verification dispatch scheduler stopped");
        Ok(())
    }
}
