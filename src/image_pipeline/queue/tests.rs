use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{channel, Receiver};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use image::RgbImage;

use super::*;
use crate::image_pipeline::common::{encode_jpeg, Result};
use crate::image_pipeline::conversions::{ColorPalette, StillEdit, StillProcessor, Watermark, WatermarkPosition};

const WAIT: Duration = Duration::from_secs(10);

fn sample_jpeg() -> Vec<u8> {
    let mut image = RgbImage::new(16, 16);
    for (x, y, px) in image.enumerate_pixels_mut() {
        *px = image::Rgb([(x * 15) as u8, (y * 15) as u8, 60]);
    }
    encode_jpeg(&image, 90).unwrap()
}

fn brighten() -> StillEdit {
    StillEdit {
        palette: ColorPalette {
            brightness: 0.1,
            ..Default::default()
        },
        ..Default::default()
    }
}

fn collect(rx: &Receiver<ProcessingResult>, n: usize) -> Vec<ProcessingResult> {
    (0..n).map(|_| rx.recv_timeout(WAIT).unwrap()).collect()
}

struct SlowWatermark(Duration);

impl Watermark for SlowWatermark {
    fn apply(&self, image: RgbImage, _position: WatermarkPosition) -> Result<RgbImage> {
        std::thread::sleep(self.0);
        Ok(image)
    }
}

struct PanickingWatermark;

impl Watermark for PanickingWatermark {
    fn apply(&self, _image: RgbImage, _position: WatermarkPosition) -> Result<RgbImage> {
        panic!("watermark exploded");
    }
}

fn run_batch(workers: usize, jobs: usize) {
    let queue = ProcessingQueue::new(QueueConfig::builder().workers(workers).build()).unwrap();
    let (tx, rx) = channel();
    let jpeg = sample_jpeg();

    let mut ids = HashSet::new();
    for _ in 0..jobs {
        let tx = tx.clone();
        let id = queue
            .submit(JobRequest::new(jpeg.clone(), brighten()), move |r| tx.send(r).unwrap())
            .unwrap();
        assert!(ids.insert(id));
    }

    let results = collect(&rx, jobs);
    let seen: HashSet<_> = results.iter().map(|r| r.id).collect();
    assert_eq!(seen, ids);
    assert!(results.iter().all(|r| r.outcome == JobOutcome::Processed));
    assert!(results.iter().all(|r| r.bytes() != &jpeg[..]));

    queue.shutdown();
    assert!(rx.try_recv().is_err());
    let snapshot = queue.snapshot();
    assert_eq!(snapshot.completed, jobs);
    assert_eq!(snapshot.failed, 0);
    assert!(snapshot.is_idle());
}

#[test]
fn test_single_worker_completes_every_job_once() {
    run_batch(1, 6);
}

#[test]
fn test_worker_pool_completes_every_job_once() {
    run_batch(4, 12);
}

#[test]
fn test_failure_returns_original_bytes() {
    let queue = ProcessingQueue::new(QueueConfig::default()).unwrap();
    let (tx, rx) = channel();
    let garbage = b"not a jpeg".to_vec();
    queue
        .submit(JobRequest::new(garbage.clone(), brighten()), move |r| tx.send(r).unwrap())
        .unwrap();

    let result = rx.recv_timeout(WAIT).unwrap();
    assert!(!result.success());
    assert!(result.error_message().is_some());
    assert_eq!(result.bytes(), &garbage[..]);

    queue.shutdown();
    assert_eq!(queue.snapshot().failed, 1);
}

#[test]
fn test_panic_in_processing_is_contained() {
    let processor = StillProcessor::new().with_watermark(Arc::new(PanickingWatermark));
    let queue = ProcessingQueue::with_processor(QueueConfig::builder().workers(1).build(), processor).unwrap();
    let (tx, rx) = channel();
    let jpeg = sample_jpeg();
    let edit = StillEdit {
        watermark: Some(WatermarkPosition::Center),
        ..Default::default()
    };

    for _ in 0..2 {
        let tx = tx.clone();
        queue
            .submit(JobRequest::new(jpeg.clone(), edit.clone()), move |r| tx.send(r).unwrap())
            .unwrap();
    }
    // the single worker survives the first panic and handles the second job
    for result in collect(&rx, 2) {
        assert!(result.error_message().unwrap().contains("watermark exploded"));
        assert_eq!(result.bytes(), &jpeg[..]);
    }
}

#[test]
fn test_no_effects_skips_with_original_bytes() {
    let queue = ProcessingQueue::new(QueueConfig::default()).unwrap();
    let (tx, rx) = channel();
    let jpeg = sample_jpeg();
    queue
        .submit(JobRequest::new(jpeg.clone(), StillEdit::default()), move |r| tx.send(r).unwrap())
        .unwrap();

    let result = rx.recv_timeout(WAIT).unwrap();
    assert_eq!(result.outcome, JobOutcome::Skipped);
    assert!(result.success());
    assert_eq!(result.bytes(), &jpeg[..]);
}

#[test]
fn test_orientation_passes_through() {
    let queue = ProcessingQueue::new(QueueConfig::default()).unwrap();
    let (tx, rx) = channel();
    queue
        .submit(
            JobRequest::new(sample_jpeg(), brighten()).with_orientation(6),
            move |r| tx.send(r).unwrap(),
        )
        .unwrap();
    assert_eq!(rx.recv_timeout(WAIT).unwrap().orientation, 6);
}

#[test]
fn test_shutdown_fails_queued_jobs() {
    let processor = StillProcessor::new().with_watermark(Arc::new(SlowWatermark(Duration::from_millis(200))));
    let queue = ProcessingQueue::with_processor(QueueConfig::builder().workers(1).build(), processor).unwrap();
    let (tx, rx) = channel();
    let jpeg = sample_jpeg();
    let edit = StillEdit {
        watermark: Some(WatermarkPosition::TopLeft),
        ..Default::default()
    };

    for _ in 0..4 {
        let tx = tx.clone();
        queue
            .submit(JobRequest::new(jpeg.clone(), edit.clone()), move |r| tx.send(r).unwrap())
            .unwrap();
    }
    queue.shutdown();

    let results = collect(&rx, 4);
    let failed: Vec<_> = results.iter().filter(|r| !r.success()).collect();
    assert!(failed.len() >= 3);
    assert!(failed.iter().all(|r| r.bytes() == &jpeg[..]));

    let snapshot = queue.snapshot();
    assert_eq!(snapshot.completed, 4);
    assert!(snapshot.is_idle());

    assert!(queue.submit(JobRequest::new(jpeg, edit), |_| {}).is_err());
    queue.shutdown();
}

#[test]
fn test_observers_see_every_transition() {
    let queue = ProcessingQueue::new(QueueConfig::builder().workers(2).build()).unwrap();
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    queue.subscribe(move |snapshot| sink.lock().unwrap().push(snapshot));

    let (tx, rx) = channel();
    for _ in 0..3 {
        let tx = tx.clone();
        queue
            .submit(JobRequest::new(sample_jpeg(), brighten()), move |r| tx.send(r).unwrap())
            .unwrap();
    }
    collect(&rx, 3);
    queue.shutdown();

    let seen = seen.lock().unwrap();
    // submit, start and finish for each job
    assert_eq!(seen.len(), 9);
    assert!(seen.iter().all(|s| s.pending + s.processing + s.completed <= 3));
    let last = seen.iter().max_by_key(|s| s.completed).unwrap();
    assert_eq!(last.completed, 3);
}

#[test]
fn test_observer_may_reenter_the_queue() {
    let queue = Arc::new(ProcessingQueue::new(QueueConfig::builder().workers(2).build()).unwrap());
    let late = Arc::new(Mutex::new(Vec::new()));
    let registered = Arc::new(AtomicBool::new(false));
    let handle = Arc::downgrade(&queue);
    let (sink, flag) = (late.clone(), registered.clone());
    queue.subscribe(move |_| {
        let Some(queue) = handle.upgrade() else { return };
        let _ = queue.snapshot();
        if !flag.swap(true, Ordering::SeqCst) {
            let sink = sink.clone();
            queue.subscribe(move |s| sink.lock().unwrap().push(s));
        }
    });

    let (tx, rx) = channel();
    for _ in 0..3 {
        let tx = tx.clone();
        queue
            .submit(JobRequest::new(sample_jpeg(), brighten()), move |r| tx.send(r).unwrap())
            .unwrap();
    }
    assert_eq!(collect(&rx, 3).len(), 3);
    queue.shutdown();
    assert_eq!(queue.snapshot().completed, 3);
    assert!(registered.load(Ordering::SeqCst));
    // registered during the first submit, so it sees the remaining eight transitions
    assert_eq!(late.lock().unwrap().len(), 8);
}

#[test]
fn test_config_builder_forces_one_worker() {
    let config = QueueConfig::builder().workers(0).jpeg_quality(80).build();
    assert_eq!(config.workers, 1);
    assert_eq!(config.jpeg_quality, 80);
}
