//! Scheduled report runs using tokio-cron-scheduler.
//!
//! A single recurring job fires the pipeline on the configured cron
//! schedule. Overlap protection lives in [`Pipeline::run_guarded`], so a
//! slow run makes the next firing a no-op instead of a second writer.

use std::sync::Arc;

use anyhow::Result;
use tokio_cron_scheduler::{Job, JobScheduler};

use crate::pipeline::Pipeline;

/// Start the weekly report job.
pub async fn start_scheduler(pipeline: Arc<Pipeline>, schedule: &str) -> Result<JobScheduler> {
    let scheduler = JobScheduler::new().await?;

    let job_pipeline = pipeline.clone();
    let report_job = Job::new_async(schedule, move |_uuid, _lock| {
        let pipeline = job_pipeline.clone();
        Box::pin(async move {
            pipeline.run_guarded().await;
        })
    })?;

    scheduler.add(report_job).await?;
    scheduler.start().await?;

    tracing::info!(schedule = %schedule, "report scheduler started");
    Ok(scheduler)
}
