use std::io::Write;
use std::sync::Arc;

use approx::assert_abs_diff_eq;
use darkroom_rs::image_pipeline::{
    BayerPattern, CubeDirectoryProvider, DemosaicMethod, FlatProfileGenerator, LinearImageBuffer, LutCache,
    OutputPaths, PipelineError, PipelineOrchestrator, ProcessingParameters, RawFrame, RawFrameReader, Result,
    StandardTiffWriter, ToneEncoder,
};

fn uniform_frame(width: usize, height: usize, value: u16, black: u16) -> RawFrame {
    let data = std::iter::repeat_n(value.to_le_bytes(), width * height).flatten().collect();
    RawFrame {
        data,
        width,
        height,
        pattern: BayerPattern::Rggb,
        bit_depth: 16,
        black_levels: [black; 4],
        white_level: 65535,
    }
}

struct FixedReader(RawFrame);

impl RawFrameReader for FixedReader {
    fn read_raw(&self, _data: &[u8]) -> Result<RawFrame> {
        Ok(self.0.clone())
    }
}

#[test]
fn test_black_frame_stays_black() {
    let pipeline = PipelineOrchestrator::new(ProcessingParameters::default());
    let output = pipeline.process(&uniform_frame(16, 16, 1024, 1024)).unwrap();

    assert!(output.image.data().iter().all(|&v| v == 0.0));
    assert!(output.quality.exposure.is_underexposed);
    assert_abs_diff_eq!(output.quality.exposure.mean_brightness, 0.0, epsilon = 1e-6);
    assert_abs_diff_eq!(output.quality.exposure.underexposed_percent, 100.0, epsilon = 1e-3);
}

#[test]
fn test_smallest_mosaic_for_every_method() {
    for method in [DemosaicMethod::Bilinear, DemosaicMethod::Vng, DemosaicMethod::Ahd] {
        let params = ProcessingParameters::builder().demosaic(method).build();
        let pipeline = PipelineOrchestrator::new(params);
        let mut frame = uniform_frame(2, 2, 0, 0);
        frame.data = [20000u16, 30000, 30000, 10000]
            .iter()
            .flat_map(|v| v.to_le_bytes())
            .collect();

        let output = pipeline.process(&frame).unwrap();
        assert_eq!(output.image.pixel_count(), 4, "{:?}", method);
        assert!(output.image.data().iter().all(|v| (0.0..=1.0).contains(v)));
    }
}

#[test]
fn test_tone_curve_anchors() {
    let tone = ToneEncoder::new();
    assert_abs_diff_eq!(tone.apply(0.18), 0.42, epsilon = 1e-4);
    assert!(tone.apply(1.0) <= 0.95 + 1e-6);
    let mut last = 0.0;
    for i in 0..=200 {
        let y = tone.apply(i as f32 / 200.0);
        assert!(y >= last);
        last = y;
    }
}

#[test]
fn test_flat_profile_is_not_idempotent() {
    let flat = FlatProfileGenerator::new();
    let input = LinearImageBuffer::filled(2, 2, [0.8, 0.3, 0.1]);
    let once = flat.apply(&input);
    let twice = flat.apply(&once);
    assert_ne!(once, twice);
}

#[test]
fn test_file_outputs_with_cube_look() {
    let dir = tempfile::tempdir().unwrap();
    let mut cube = std::fs::File::create(dir.path().join("warm.cube")).unwrap();
    writeln!(cube, "TITLE \"warm\"\nLUT_3D_SIZE 2").unwrap();
    for b in 0..2 {
        for g in 0..2 {
            for r in 0..2 {
                writeln!(cube, "{} {} {}", (r as f32 * 0.9 + 0.1), g as f32, b as f32 * 0.8).unwrap();
            }
        }
    }
    drop(cube);

    let input = dir.path().join("capture.dng");
    std::fs::write(&input, b"container").unwrap();

    let mut frame = uniform_frame(24, 16, 0, 0);
    frame.data = (0..24 * 16)
        .flat_map(|i| (((i % 24) * 2000 + 2000) as u16).to_le_bytes())
        .collect();

    let params = ProcessingParameters::builder()
        .look("warm", 0.7)
        .produce_flat_master(true)
        .build();
    let pipeline = PipelineOrchestrator::with_custom(FixedReader(frame), StandardTiffWriter, params)
        .with_lut_cache(Arc::new(LutCache::new(Arc::new(CubeDirectoryProvider::new(dir.path())))));

    let paths = OutputPaths {
        image: dir.path().join("out.jpg"),
        master: Some(dir.path().join("master.tiff")),
        flat: Some(dir.path().join("flat.jpg")),
    };
    let output = pipeline.convert_file(&input, &paths).unwrap();

    assert!(output.flat.is_some());
    assert!(output.timings.get_step("look").is_some());
    let image = image::open(&paths.image).unwrap();
    assert_eq!((image.width(), image.height()), (24, 16));
    let tiff = std::fs::read(dir.path().join("master.tiff")).unwrap();
    assert!(tiff.starts_with(b"II*\0") || tiff.starts_with(b"MM\0*"));
    assert!(dir.path().join("flat.jpg").exists());
}

#[test]
fn test_missing_look_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let params = ProcessingParameters::builder().look("absent", 1.0).build();
    let pipeline = PipelineOrchestrator::new(params)
        .with_lut_cache(Arc::new(LutCache::new(Arc::new(CubeDirectoryProvider::new(dir.path())))));
    let result = pipeline.process(&uniform_frame(8, 8, 5000, 0));
    assert!(matches!(
        result,
        Err(PipelineError::InputReadError(_)) | Err(PipelineError::LutError(_))
    ));
}
