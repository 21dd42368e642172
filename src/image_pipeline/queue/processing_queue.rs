use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::{channel, Sender};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::{self, JoinHandle};

use tracing::{debug, info, warn};

use crate::image_pipeline::common::{PipelineError, Result};
use crate::image_pipeline::config::ProcessingParameters;
use crate::image_pipeline::conversions::{PipelineOrchestrator, RawDeveloper, StillProcessor};
use crate::image_pipeline::queue::types::{JobId, JobRequest, ProcessingResult, QueueConfig, QueueSnapshot};
use crate::image_pipeline::queue::worker::{worker_loop, QueuedJob, Shared};

/// Fixed worker pool over an unbounded FIFO of still-processing jobs.
///
/// Encoded stills go through the [`StillProcessor`]. RAW frames are
/// developed first and then finished by the same processor.
///
/// With more than one worker, completion order is not submission order.
pub struct ProcessingQueue {
    sender: Mutex<Option<Sender<QueuedJob>>>,
    workers: Mutex<Vec<JoinHandle<()>>>,
    shared: Arc<Shared>,
    next_id: AtomicU64,
}

impl ProcessingQueue {
    pub fn new(config: QueueConfig) -> Result<Self> {
        let processor = StillProcessor::new().with_jpeg_quality(config.jpeg_quality);
        Self::with_processor(config, processor)
    }

    /// Starts `config.workers` threads sharing `processor`. RAW jobs use a
    /// default-parameter [`PipelineOrchestrator`].
    pub fn with_processor(config: QueueConfig, processor: StillProcessor) -> Result<Self> {
        let developer = PipelineOrchestrator::new(ProcessingParameters::default());
        Self::with_pipeline(config, processor, Arc::new(developer))
    }

    pub fn with_pipeline(
        config: QueueConfig,
        processor: StillProcessor,
        developer: Arc<dyn RawDeveloper>,
    ) -> Result<Self> {
        let (sender, receiver) = channel::<QueuedJob>();
        let receiver = Arc::new(Mutex::new(receiver));
        let shared = Arc::new(Shared::new(processor, developer));
        let count = config.workers.max(1);

        let mut workers = Vec::with_capacity(count);
        for index in 0..count {
            let receiver = Arc::clone(&receiver);
            let shared = Arc::clone(&shared);
            let handle = thread::Builder::new()
                .name(format!("darkroom-worker-{}", index))
                .spawn(move || worker_loop(index, receiver, shared))?;
            workers.push(handle);
        }
        info!(workers = count, "Processing queue started");

        Ok(Self {
            sender: Mutex::new(Some(sender)),
            workers: Mutex::new(workers),
            shared,
            next_id: AtomicU64::new(1),
        })
    }

    /// Enqueues a job and returns its id without waiting for processing.
    ///
    /// `on_complete` runs once on a worker thread. Fails only after
    /// [`shutdown`](Self::shutdown), in which case the callback is dropped
    /// unfired.
    pub fn submit<F>(&self, request: JobRequest, on_complete: F) -> Result<JobId>
    where
        F: FnOnce(ProcessingResult) + Send + 'static,
    {
        // cloned so observers fired below may submit without deadlocking
        let sender = self
            .sender
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
            .ok_or_else(|| PipelineError::StageError {
                stage: "queue",
                message: "queue is shut down".to_string(),
            })?;

        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.shared.transition(|c| c.pending += 1);

        let job = QueuedJob {
            id,
            request,
            callback: Box::new(on_complete),
        };
        if sender.send(job).is_err() {
            // every worker is gone; nothing will ever pick this job up
            self.shared.transition(|c| c.pending -= 1);
            return Err(PipelineError::StageError {
                stage: "queue",
                message: "no worker is running".to_string(),
            });
        }
        debug!(id, "Job submitted");
        Ok(id)
    }

    pub fn snapshot(&self) -> QueueSnapshot {
        self.shared.snapshot()
    }

    /// Registers an observer called with fresh counts after every job
    /// transition, on whichever thread caused it.
    pub fn subscribe<F>(&self, observer: F)
    where
        F: Fn(QueueSnapshot) + Send + Sync + 'static,
    {
        self.shared.add_observer(Arc::new(observer));
    }

    /// Stops accepting jobs and joins the workers.
    ///
    /// Jobs already running finish normally. Jobs still queued complete as
    /// failed with their original payload. Idempotent.
    pub fn shutdown(&self) {
        let sender = self.sender.lock().unwrap_or_else(PoisonError::into_inner).take();
        if sender.is_none() {
            return;
        }
        self.shared.shutting_down.store(true, Ordering::SeqCst);
        drop(sender);

        let workers = std::mem::take(&mut *self.workers.lock().unwrap_or_else(PoisonError::into_inner));
        for handle in workers {
            if handle.join().is_err() {
                warn!("Worker thread panicked");
            }
        }
        info!(snapshot = ?self.snapshot(), "Processing queue stopped");
    }
}

impl Drop for ProcessingQueue {
    fn drop(&mut self) {
        self.shutdown();
    }
}
