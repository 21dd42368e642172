//! Job, result and configuration types for the processing queue

use serde::{Deserialize, Serialize};

use crate::image_pipeline::common::DEFAULT_JPEG_QUALITY;
use crate::image_pipeline::conversions::StillEdit;
use crate::image_pipeline::raw::RawFrame;

pub type JobId = u64;

/// Captured photo data, either already encoded or straight off the sensor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobPayload {
    Encoded(Vec<u8>),
    Raw(RawFrame),
}

impl JobPayload {
    /// Encoded bytes, or the packed sensor payload of a RAW frame.
    pub fn bytes(&self) -> &[u8] {
        match self {
            JobPayload::Encoded(bytes) => bytes,
            JobPayload::Raw(frame) => &frame.data,
        }
    }
}

/// What a caller hands to [`ProcessingQueue::submit`](super::ProcessingQueue::submit).
#[derive(Debug, Clone)]
pub struct JobRequest {
    pub payload: JobPayload,
    /// Applied after decoding, or after development for RAW frames
    pub edit: StillEdit,
    /// EXIF-style orientation code, passed through untouched
    pub orientation: u32,
}

impl JobRequest {
    pub fn new(bytes: Vec<u8>, edit: StillEdit) -> Self {
        Self {
            payload: JobPayload::Encoded(bytes),
            edit,
            orientation: 1,
        }
    }

    /// RAW frame developed by the queue's pipeline before `edit` applies.
    pub fn raw(frame: RawFrame, edit: StillEdit) -> Self {
        Self {
            payload: JobPayload::Raw(frame),
            edit,
            orientation: 1,
        }
    }

    pub fn with_orientation(mut self, orientation: u32) -> Self {
        self.orientation = orientation;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobOutcome {
    Processed,
    /// No effects requested; `payload` is the original
    Skipped,
    /// `payload` is the original
    Failed { error: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessingResult {
    pub id: JobId,
    /// JPEG bytes when processed, the submitted payload otherwise
    pub payload: JobPayload,
    pub orientation: u32,
    pub outcome: JobOutcome,
}

impl ProcessingResult {
    pub fn bytes(&self) -> &[u8] {
        self.payload.bytes()
    }

    pub fn success(&self) -> bool {
        !matches!(self.outcome, JobOutcome::Failed { .. })
    }

    pub fn error_message(&self) -> Option<&str> {
        match &self.outcome {
            JobOutcome::Failed { error } => Some(error),
            _ => None,
        }
    }
}

/// Job counts. `completed` includes failed jobs; `failed` is the subset
/// that returned their original bytes because of an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct QueueSnapshot {
    pub pending: usize,
    pub processing: usize,
    pub completed: usize,
    pub failed: usize,
}

impl QueueSnapshot {
    pub fn is_idle(&self) -> bool {
        self.pending == 0 && self.processing == 0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueueConfig {
    /// Worker threads draining the queue
    pub workers: usize,
    pub jpeg_quality: u8,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            workers: 2,
            jpeg_quality: DEFAULT_JPEG_QUALITY,
        }
    }
}

impl QueueConfig {
    pub fn builder() -> QueueConfigBuilder {
        QueueConfigBuilder::default()
    }
}

/// Builder for QueueConfig
#[derive(Default)]
pub struct QueueConfigBuilder {
    workers: Option<usize>,
    jpeg_quality: Option<u8>,
}

impl QueueConfigBuilder {
    pub fn workers(mut self, workers: usize) -> Self {
        self.workers = Some(workers);
        self
    }

    pub fn jpeg_quality(mut self, quality: u8) -> Self {
        self.jpeg_quality = Some(quality);
        self
    }

    pub fn build(self) -> QueueConfig {
        let default = QueueConfig::default();
        QueueConfig {
            workers: self.workers.unwrap_or(default.workers).max(1),
            jpeg_quality: self.jpeg_quality.unwrap_or(default.jpeg_quality),
        }
    }
}
