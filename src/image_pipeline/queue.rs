//! Background processing queue
//!
//! An unbounded FIFO drained by a fixed pool of worker threads. Submitting
//! never waits for processing. Every submitted job's callback fires
//! exactly once, with the processed bytes or with the original bytes and
//! an error.

mod processing_queue;
pub mod types;
mod worker;

#[cfg(test)]
mod tests;

pub use processing_queue::ProcessingQueue;
pub use types::{
    JobId, JobOutcome, JobPayload, JobRequest, ProcessingResult, QueueConfig, QueueConfigBuilder, QueueSnapshot,
};
