use std::collections::HashMap;
use std::sync::mpsc::channel;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use darkroom_rs::image_pipeline::common::encode_jpeg;
use darkroom_rs::image_pipeline::{
    BayerPattern, ColorLookupTable, ColorPalette, InMemoryLutProvider, JobOutcome, JobPayload, JobRequest,
    LookParameters, LutCache, ProcessingQueue, QueueConfig, QueueSnapshot, RawFrame, StillEdit, StillProcessor,
};

fn still(seed: u8) -> Vec<u8> {
    let image = image::RgbImage::from_fn(20, 12, |x, y| {
        image::Rgb([seed.wrapping_add((x * 9) as u8), (y * 20) as u8, 100])
    });
    encode_jpeg(&image, 90).unwrap()
}

fn gradient_frame(width: usize, height: usize) -> RawFrame {
    let data = (0..width * height)
        .flat_map(|i| ((i % width) as u16 * 3000 + 4000).to_le_bytes())
        .collect();
    RawFrame {
        data,
        width,
        height,
        pattern: BayerPattern::Rggb,
        bit_depth: 16,
        black_levels: [1024; 4],
        white_level: 65535,
    }
}

#[test]
fn test_mixed_batch_reports_each_job_once() {
    let identity = ColorLookupTable::identity(4);
    let provider = InMemoryLutProvider::new().with_table("neutral", identity);
    let processor = StillProcessor::new().with_lut_cache(Arc::new(LutCache::new(Arc::new(provider))));
    let queue = ProcessingQueue::with_processor(QueueConfig::builder().workers(3).build(), processor).unwrap();

    let snapshots: Arc<Mutex<Vec<QueueSnapshot>>> = Arc::new(Mutex::new(Vec::new()));
    let sink = snapshots.clone();
    queue.subscribe(move |s| sink.lock().unwrap().push(s));

    let looked = StillEdit {
        look: LookParameters {
            lut_id: Some("neutral".to_string()),
            intensity: 0.5,
        },
        ..Default::default()
    };
    let graded = StillEdit {
        palette: ColorPalette {
            saturation: 1.5,
            ..Default::default()
        },
        ..Default::default()
    };
    let missing_look = StillEdit {
        look: LookParameters {
            lut_id: Some("missing".to_string()),
            intensity: 1.0,
        },
        ..Default::default()
    };

    let requests = vec![
        (JobRequest::new(still(0), looked), JobOutcome::Processed),
        (JobRequest::new(still(40), graded), JobOutcome::Processed),
        (JobRequest::new(still(80), StillEdit::default()), JobOutcome::Skipped),
        (
            JobRequest::new(still(120), missing_look),
            JobOutcome::Failed {
                error: String::new(),
            },
        ),
    ];

    let (tx, rx) = channel();
    let mut expected = HashMap::new();
    for (request, outcome) in requests {
        let original = request.payload.clone();
        let tx = tx.clone();
        let id = queue.submit(request, move |r| tx.send(r).unwrap()).unwrap();
        expected.insert(id, (original, outcome));
    }
    drop(tx);

    let results: Vec<_> = (0..expected.len())
        .map(|_| rx.recv_timeout(Duration::from_secs(10)).unwrap())
        .collect();
    queue.shutdown();
    assert!(rx.try_recv().is_err());

    for result in results {
        let (original, outcome) = expected.remove(&result.id).unwrap();
        match outcome {
            JobOutcome::Processed => {
                assert_eq!(result.outcome, JobOutcome::Processed);
                assert_ne!(result.payload, original);
            }
            JobOutcome::Skipped => {
                assert_eq!(result.outcome, JobOutcome::Skipped);
                assert_eq!(result.payload, original);
            }
            JobOutcome::Failed { .. } => {
                assert!(!result.success());
                assert_eq!(result.payload, original);
            }
        }
    }
    assert!(expected.is_empty());

    let snapshot = queue.snapshot();
    assert_eq!(
        snapshot,
        QueueSnapshot {
            pending: 0,
            processing: 0,
            completed: 4,
            failed: 1,
        }
    );
    assert_eq!(snapshots.lock().unwrap().len(), 12);
}

fn run_raw_batch(workers: usize) {
    let queue = ProcessingQueue::new(QueueConfig::builder().workers(workers).build()).unwrap();
    let (tx, rx) = channel();
    let mut truncated = gradient_frame(8, 8);
    truncated.data.truncate(10);

    let mut expected = HashMap::new();
    for frame in [gradient_frame(8, 8), gradient_frame(12, 8), truncated.clone(), gradient_frame(8, 6)] {
        let tx = tx.clone();
        let request = JobRequest::raw(frame.clone(), StillEdit::default());
        let id = queue.submit(request, move |r| tx.send(r).unwrap()).unwrap();
        assert!(expected.insert(id, frame).is_none());
    }
    drop(tx);

    let results: Vec<_> = (0..expected.len())
        .map(|_| rx.recv_timeout(Duration::from_secs(10)).unwrap())
        .collect();
    queue.shutdown();
    assert!(rx.try_recv().is_err());

    for result in results {
        let frame = expected.remove(&result.id).unwrap();
        if frame == truncated {
            assert!(!result.success());
            assert_eq!(result.payload, JobPayload::Raw(frame));
        } else {
            assert_eq!(result.outcome, JobOutcome::Processed);
            let JobPayload::Encoded(jpeg) = &result.payload else {
                panic!("job {} kept its RAW payload", result.id);
            };
            assert_eq!(&jpeg[..2], &[0xFF, 0xD8]);
            let decoded = image::load_from_memory(jpeg).unwrap();
            assert_eq!(decoded.width() as usize, frame.width);
            assert_eq!(decoded.height() as usize, frame.height);
        }
    }
    assert!(expected.is_empty());

    let snapshot = queue.snapshot();
    assert_eq!(snapshot.completed, 4);
    assert_eq!(snapshot.failed, 1);
    assert!(snapshot.is_idle());
}

#[test]
fn test_raw_jobs_on_single_worker() {
    run_raw_batch(1);
}

#[test]
fn test_raw_jobs_on_worker_pool() {
    run_raw_batch(3);
}
