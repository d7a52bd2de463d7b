//! Background job worker
//!
//! Runs remote requests and overlay compositing off the UI thread. The UI
//! submits `Job`s and polls `JobResult`s once per frame; every job carries
//! the request id the view recorded, so results that arrive after a newer
//! request was issued can be recognized and dropped.

use std::sync::Arc;

use anyhow::Result;
use crossbeam_channel::{unbounded, Receiver, Sender};
use tracing::{debug, error, info};
use uuid::Uuid;

use super::client::ImageService;
use super::protocol::AspectRatio;
use crate::error::{AppError, AppResult};
use crate::render::{apply_overlay, FontBook, ImageArtifact, TextOverlaySpec};

/// Work submitted by the UI
#[derive(Debug, Clone)]
pub enum Job {
    Generate {
        id: Uuid,
        prompt: String,
        aspect_ratio: AspectRatio,
    },
    Edit {
        id: Uuid,
        base64: String,
        mime_type: String,
        instruction: String,
    },
    Overlay {
        id: Uuid,
        base: ImageArtifact,
        spec: TextOverlaySpec,
    },
}

/// Which kind of job produced a result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobKind {
    Generate,
    Edit,
    Overlay,
}

impl Job {
    pub fn id(&self) -> Uuid {
        match self {
            Job::Generate { id, .. } | Job::Edit { id, .. } | Job::Overlay { id, .. } => *id,
        }
    }

    pub fn kind(&self) -> JobKind {
        match self {
            Job::Generate { .. } => JobKind::Generate,
            Job::Edit { .. } => JobKind::Edit,
            Job::Overlay { .. } => JobKind::Overlay,
        }
    }
}

/// Finished job
#[derive(Debug)]
pub struct JobResult {
    pub id: Uuid,
    pub kind: JobKind,
    pub outcome: AppResult<ImageArtifact>,
}

/// UI-side handle to the worker
pub struct WorkerHandle {
    jobs: Sender<Job>,
    results: Receiver<JobResult>,
}

impl WorkerHandle {
    /// Queue a job; false if the worker has stopped
    pub fn submit(&self, job: Job) -> bool {
        debug!("Submitting {:?} job {}", job.kind(), job.id());
        self.jobs.send(job).is_ok()
    }

    /// Try to receive a finished job without blocking
    pub fn try_recv(&self) -> Option<JobResult> {
        self.results.try_recv().ok()
    }
}

async fn run_job<S: ImageService>(service: &S, fonts: Arc<FontBook>, job: Job) -> AppResult<ImageArtifact> {
    match job {
        Job::Generate { prompt, aspect_ratio, .. } => service.generate_image(&prompt, aspect_ratio).await,
        Job::Edit {
            base64,
            mime_type,
            instruction,
            ..
        } => service.edit_image(&base64, &mime_type, &instruction).await,
        Job::Overlay { base, spec, .. } => {
            tokio::task::spawn_blocking(move || apply_overlay(&base, &spec, &fonts))
                .await
                .map_err(|e| AppError::Render(format!("Overlay task failed: {}", e)))?
        }
    }
}

/// Start the worker thread
///
/// `repaint` is poked after every result so an idle UI wakes up to show it.
pub fn start_worker<S: ImageService>(
    service: S,
    fonts: Arc<FontBook>,
    repaint: Option<egui::Context>,
) -> Result<WorkerHandle> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .thread_name("imagine-worker")
        .enable_all()
        .build()?;

    let (job_tx, job_rx) = unbounded::<Job>();
    let (result_tx, result_rx) = unbounded::<JobResult>();
    let service = Arc::new(service);

    std::thread::Builder::new()
        .name("imagine-dispatch".to_string())
        .spawn(move || {
            info!("Worker started");

            while let Ok(job) = job_rx.recv() {
                let service = Arc::clone(&service);
                let fonts = Arc::clone(&fonts);
                let result_tx = result_tx.clone();
                let repaint = repaint.clone();

                runtime.spawn(async move {
                    let id = job.id();
                    let kind = job.kind();
                    let outcome = run_job(service.as_ref(), fonts, job).await;

                    match &outcome {
                        Ok(artifact) => debug!("{:?} job {} finished ({} bytes)", kind, id, artifact.len()),
                        Err(e) => error!("{:?} job {} failed ({}): {}", kind, id, e.kind(), e),
                    }

                    if result_tx.send(JobResult { id, kind, outcome }).is_err() {
                        debug!("UI gone, dropping result for {}", id);
                        return;
                    }
                    if let Some(ctx) = repaint {
                        ctx.request_repaint();
                    }
                });
            }

            runtime.shutdown_background();
            info!("Worker stopped");
        })?;

    Ok(WorkerHandle {
        jobs: job_tx,
        results: result_rx,
    })
}
