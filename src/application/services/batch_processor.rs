use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{error, info, warn};

use crate::application::services::pipeline_service::{
    PipelineError, PipelineOutput, PipelineService,
};
use crate::domain::{AudioAsset, JobId, Language};

#[derive(Debug, Clone)]
pub struct BatchJob {
    pub id: JobId,
    pub asset: AudioAsset,
    pub topic: Option<String>,
    pub language: Language,
}

impl BatchJob {
    pub fn new(asset: AudioAsset, topic: Option<String>, language: Language) -> Self {
        Self {
            id: JobId::new(),
            asset,
            topic,
            language,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum BatchJobError {
    #[error("job timed out after {0:?}")]
    TimedOut(Duration),
    #[error(transparent)]
    Pipeline(#[from] PipelineError),
    #[error("job task aborted: {0}")]
    Aborted(String),
}

#[derive(Debug)]
pub struct BatchOutcome {
    pub job_id: JobId,
    pub result: Result<PipelineOutput, BatchJobError>,
}

/// Runs many pipeline jobs with bounded concurrency and a per-job timeout.
/// One job failing or timing out never touches its siblings, and outcomes
/// come back in submission order.
pub struct BatchProcessor {
    pipeline: Arc<PipelineService>,
    workers: usize,
    job_timeout: Duration,
}

impl BatchProcessor {
    pub fn new(pipeline: Arc<PipelineService>, workers: usize, job_timeout: Duration) -> Self {
        Self {
            pipeline,
            workers: workers.max(1),
            job_timeout,
        }
    }

    pub async fn run(&self, jobs: Vec<BatchJob>) -> Vec<BatchOutcome> {
        info!(jobs = jobs.len(), workers = self.workers, "Starting batch run");
        let semaphore = Arc::new(Semaphore::new(self.workers));
        let job_ids: Vec<JobId> = jobs.iter().map(|job| job.id).collect();
        let mut slots: Vec<Option<BatchOutcome>> = (0..jobs.len()).map(|_| None).collect();

        let mut set = JoinSet::new();
        for (index, job) in jobs.into_iter().enumerate() {
            let pipeline = Arc::clone(&self.pipeline);
            let semaphore = Arc::clone(&semaphore);
            let timeout = self.job_timeout;
            set.spawn(async move {
                let _permit = semaphore.acquire_owned().await.ok();
                let job_id = job.id;
                let result = match tokio::time::timeout(
                    timeout,
                    pipeline.process(&job.asset, job.topic.as_deref(), &job.language),
                )
                .await
                {
                    Ok(Ok(output)) => Ok(output),
                    Ok(Err(pipeline_error)) => {
                        warn!(job_id = %job_id, error = %pipeline_error, "Batch job failed");
                        Err(BatchJobError::Pipeline(pipeline_error))
                    }
                    Err(_) => {
                        warn!(job_id = %job_id, timeout = ?timeout, "Batch job timed out");
                        Err(BatchJobError::TimedOut(timeout))
                    }
                };
                (index, BatchOutcome { job_id, result })
            });
        }

        while let Some(joined) = set.join_next().await {
            match joined {
                Ok((index, outcome)) => slots[index] = Some(outcome),
                Err(join_error) => {
                    error!(error = %join_error, "Batch job task panicked");
                }
            }
        }

        let outcomes: Vec<BatchOutcome> = slots
            .into_iter()
            .enumerate()
            .map(|(index, slot)| {
                slot.unwrap_or_else(|| BatchOutcome {
                    job_id: job_ids[index],
                    result: Err(BatchJobError::Aborted("job task panicked".to_string())),
                })
            })
            .collect();

        let failed = outcomes.iter().filter(|o| o.result.is_err()).count();
        info!(
            jobs = outcomes.len(),
            failed,
            "Batch run completed"
        );
        outcomes
    }
}
