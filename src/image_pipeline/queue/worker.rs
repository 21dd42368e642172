use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Receiver;
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use tracing::{debug, error, info_span, warn};

use crate::image_pipeline::common::Result;
use crate::image_pipeline::conversions::{RawDeveloper, StillEdit, StillOutcome, StillProcessor};
use crate::image_pipeline::queue::types::{
    JobId, JobOutcome, JobPayload, JobRequest, ProcessingResult, QueueSnapshot,
};

pub(super) type Callback = Box<dyn FnOnce(ProcessingResult) + Send>;
pub(super) type Observer = Arc<dyn Fn(QueueSnapshot) + Send + Sync>;

pub(super) struct QueuedJob {
    pub id: JobId,
    pub request: JobRequest,
    pub callback: Callback,
}

/// State shared by the queue handle and every worker.
pub(super) struct Shared {
    pub processor: StillProcessor,
    pub developer: Arc<dyn RawDeveloper>,
    pub counts: Mutex<QueueSnapshot>,
    pub observers: RwLock<Vec<Observer>>,
    pub shutting_down: AtomicBool,
}

impl Shared {
    pub fn new(processor: StillProcessor, developer: Arc<dyn RawDeveloper>) -> Self {
        Self {
            processor,
            developer,
            counts: Mutex::new(QueueSnapshot::default()),
            observers: RwLock::new(Vec::new()),
            shutting_down: AtomicBool::new(false),
        }
    }

    pub fn add_observer(&self, observer: Observer) {
        self.observers.write().unwrap_or_else(PoisonError::into_inner).push(observer);
    }

    /// Runs the payload through the RAW pipeline or the still processor.
    fn process(&self, payload: &JobPayload, edit: &StillEdit) -> Result<StillOutcome> {
        match payload {
            JobPayload::Encoded(bytes) => self.processor.process(bytes, edit),
            JobPayload::Raw(frame) => {
                let developed = self.developer.develop(frame)?;
                let image = developed.to_rgb_image()?;
                self.processor.finish(image, edit).map(StillOutcome::Processed)
            }
        }
    }

    pub fn snapshot(&self) -> QueueSnapshot {
        *self.counts.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Applies `change` to the counts and publishes the result.
    pub fn transition(&self, change: impl FnOnce(&mut QueueSnapshot)) {
        let snapshot = {
            let mut counts = self.counts.lock().unwrap_or_else(PoisonError::into_inner);
            change(&mut counts);
            *counts
        };
        // observers may subscribe or read counts, so none runs under a lock
        let observers = self.observers.read().unwrap_or_else(PoisonError::into_inner).clone();
        for observer in &observers {
            if catch_unwind(AssertUnwindSafe(|| observer(snapshot))).is_err() {
                warn!("Queue observer panicked");
            }
        }
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        format!("panic: {}", s)
    } else if let Some(s) = payload.downcast_ref::<String>() {
        format!("panic: {}", s)
    } else {
        "panic during processing".to_string()
    }
}

pub(super) fn worker_loop(index: usize, receiver: Arc<Mutex<Receiver<QueuedJob>>>, shared: Arc<Shared>) {
    debug!(worker = index, "Worker started");
    loop {
        // the lock is held only while waiting for the next job
        let job = {
            let receiver = receiver.lock().unwrap_or_else(PoisonError::into_inner);
            receiver.recv()
        };
        match job {
            Ok(job) => run_job(&shared, job),
            Err(_) => break,
        }
    }
    debug!(worker = index, "Worker stopped");
}

fn run_job(shared: &Shared, job: QueuedJob) {
    let QueuedJob { id, request, callback } = job;
    let _span = info_span!("job", id).entered();

    shared.transition(|c| {
        c.pending -= 1;
        c.processing += 1;
    });

    let outcome = if shared.shutting_down.load(Ordering::SeqCst) {
        Err("queue shut down before the job started".to_string())
    } else {
        match catch_unwind(AssertUnwindSafe(|| shared.process(&request.payload, &request.edit))) {
            Ok(Ok(outcome)) => Ok(outcome),
            Ok(Err(e)) => Err(e.to_string()),
            Err(payload) => Err(panic_message(payload)),
        }
    };

    let JobRequest { payload, orientation, .. } = request;
    let (payload, outcome) = match outcome {
        Ok(StillOutcome::Processed(processed)) => (JobPayload::Encoded(processed), JobOutcome::Processed),
        Ok(StillOutcome::Unchanged) => (payload, JobOutcome::Skipped),
        Err(error) => {
            warn!(id, %error, "Job failed, returning original payload");
            (payload, JobOutcome::Failed { error })
        }
    };
    let failed = matches!(outcome, JobOutcome::Failed { .. });
    debug!(id, ?outcome, "Job finished");

    shared.transition(|c| {
        c.processing -= 1;
        c.completed += 1;
        if failed {
            c.failed += 1;
        }
    });

    let result = ProcessingResult {
        id,
        payload,
        orientation,
        outcome,
    };
    if catch_unwind(AssertUnwindSafe(move || callback(result))).is_err() {
        error!(id, "Completion callback panicked");
    }
}
