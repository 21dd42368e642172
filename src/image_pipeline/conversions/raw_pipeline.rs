use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{info, info_span, instrument};

use crate::image_pipeline::color::{ColorEngine, WhiteBalanceGains};
use crate::image_pipeline::common::{
    encode_jpeg, DecodeWarning, LinearImageBuffer, PipelineError, PipelineTimings, Result, Timer,
    DEFAULT_JPEG_QUALITY,
};
use crate::image_pipeline::config::ProcessingParameters;
use crate::image_pipeline::detail::DetailEngine;
use crate::image_pipeline::dynamic_range::DynamicRangeEngine;
use crate::image_pipeline::lut::{LutCache, LutEngine};
use crate::image_pipeline::quality::{QualityAnalyzer, QualityReport};
use crate::image_pipeline::raw::{DecodeOutput, RawDecoder, RawFrame, RawFrameReader, RawLoaderReader};
use crate::image_pipeline::tiff::{StandardTiffWriter, TiffConfig, TiffWriter};
use crate::image_pipeline::tone::{FlatProfileGenerator, ToneEncoder};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PipelineStage {
    Decode,
    HdrMerge,
    Detail,
    DynamicRange,
    Color,
    Look,
    FlatMaster,
    Quality,
}

impl PipelineStage {
    pub fn name(self) -> &'static str {
        match self {
            PipelineStage::Decode => "decode",
            PipelineStage::HdrMerge => "hdr_merge",
            PipelineStage::Detail => "detail",
            PipelineStage::DynamicRange => "dynamic_range",
            PipelineStage::Color => "color",
            PipelineStage::Look => "look",
            PipelineStage::FlatMaster => "flat_master",
            PipelineStage::Quality => "quality",
        }
    }
}

/// Emitted right before a stage starts. `index` counts from 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageProgress {
    pub stage: PipelineStage,
    pub index: usize,
    pub total: usize,
}

#[derive(Debug, Clone)]
pub struct PipelineOutput {
    /// Display-encoded, graded image
    pub image: LinearImageBuffer,
    /// Demosaiced scene-linear image, source of the 16-bit master
    pub master: LinearImageBuffer,
    /// Log-encoded low-contrast grading master
    pub flat: Option<LinearImageBuffer>,
    pub quality: QualityReport,
    pub warnings: Vec<DecodeWarning>,
    pub repaired_pixels: usize,
    pub white_balance: WhiteBalanceGains,
    pub estimated_temperature: f32,
    pub timings: PipelineTimings,
}

/// Where [`PipelineOrchestrator::convert_file`] writes its results.
#[derive(Debug, Clone, Default)]
pub struct OutputPaths {
    pub image: PathBuf,
    /// 16-bit TIFF of the demosaiced image
    pub master: Option<PathBuf>,
    /// JPEG of the flat profile; ignored unless the flat master is enabled
    pub flat: Option<PathBuf>,
}

impl OutputPaths {
    pub fn new(image: impl Into<PathBuf>) -> Self {
        Self {
            image: image.into(),
            ..Default::default()
        }
    }
}

struct StageRunner<'a, F: FnMut(StageProgress)> {
    progress: &'a mut F,
    timings: PipelineTimings,
    index: usize,
    total: usize,
}

impl<F: FnMut(StageProgress)> StageRunner<'_, F> {
    fn run<T>(&mut self, stage: PipelineStage, f: impl FnOnce() -> Result<T>) -> Result<T> {
        (self.progress)(StageProgress {
            stage,
            index: self.index,
            total: self.total,
        });
        self.index += 1;

        let _span = info_span!("stage", name = stage.name()).entered();
        let timer = Timer::start(stage.name());
        let out = f()?;
        self.timings.add_step(timer.stop());
        Ok(out)
    }
}

/// Sequences decode, detail, dynamic range, color, look, flat master and
/// quality scoring for RAW frames.
pub struct PipelineOrchestrator<R: RawFrameReader, W: TiffWriter> {
    reader: R,
    writer: W,
    parameters: ProcessingParameters,
    tiff_config: TiffConfig,
    jpeg_quality: u8,
    luts: Option<Arc<LutCache>>,
    detail: DetailEngine,
    dynamic_range: DynamicRangeEngine,
    color: ColorEngine,
    tone: ToneEncoder,
    flat: FlatProfileGenerator,
    lut_engine: LutEngine,
    quality: QualityAnalyzer,
}

impl PipelineOrchestrator<RawLoaderReader, StandardTiffWriter> {
    pub fn new(parameters: ProcessingParameters) -> Self {
        Self::with_custom(RawLoaderReader, StandardTiffWriter, parameters)
    }
}

impl<R: RawFrameReader, W: TiffWriter> PipelineOrchestrator<R, W> {
    pub fn with_custom(reader: R, writer: W, parameters: ProcessingParameters) -> Self {
        Self {
            reader,
            writer,
            parameters,
            tiff_config: TiffConfig::default(),
            jpeg_quality: DEFAULT_JPEG_QUALITY,
            luts: None,
            detail: DetailEngine::new(),
            dynamic_range: DynamicRangeEngine::new(),
            color: ColorEngine::new(),
            tone: ToneEncoder::new(),
            flat: FlatProfileGenerator::new(),
            lut_engine: LutEngine::new(),
            quality: QualityAnalyzer::new(),
        }
    }

    pub fn with_lut_cache(mut self, luts: Arc<LutCache>) -> Self {
        self.luts = Some(luts);
        self
    }

    pub fn with_tiff_config(mut self, config: TiffConfig) -> Self {
        self.tiff_config = config;
        self
    }

    pub fn with_jpeg_quality(mut self, quality: u8) -> Self {
        self.jpeg_quality = quality;
        self
    }

    pub fn with_color_engine(mut self, color: ColorEngine) -> Self {
        self.color = color;
        self
    }

    pub fn parameters(&self) -> &ProcessingParameters {
        &self.parameters
    }

    pub fn set_parameters(&mut self, parameters: ProcessingParameters) {
        self.parameters = parameters;
    }

    fn plan(&self, bracket: bool) -> Vec<PipelineStage> {
        let mut stages = vec![PipelineStage::Decode];
        if bracket {
            stages.push(PipelineStage::HdrMerge);
        }
        stages.extend([PipelineStage::Detail, PipelineStage::DynamicRange, PipelineStage::Color]);
        if self.parameters.look.lut_id.is_some() {
            stages.push(PipelineStage::Look);
        }
        if self.parameters.produce_flat_master {
            stages.push(PipelineStage::FlatMaster);
        }
        stages.push(PipelineStage::Quality);
        stages
    }

    fn decoder(&self) -> RawDecoder {
        RawDecoder::new(self.parameters.demosaic)
    }

    pub fn process(&self, frame: &RawFrame) -> Result<PipelineOutput> {
        self.process_with_progress(frame, |_| {})
    }

    #[instrument(skip(self, frame, progress), fields(width = frame.width, height = frame.height))]
    pub fn process_with_progress<F>(&self, frame: &RawFrame, mut progress: F) -> Result<PipelineOutput>
    where
        F: FnMut(StageProgress),
    {
        let plan = self.plan(false);
        let mut runner = StageRunner {
            progress: &mut progress,
            timings: PipelineTimings::new(),
            index: 0,
            total: plan.len(),
        };

        let decoded = runner.run(PipelineStage::Decode, || self.decoder().decode(frame))?;

        self.finish(decoded, &mut runner)
    }

    /// Decodes every bracketed frame and merges them before the detail
    /// stage. `exposure_factors[i]` is frame `i`'s exposure relative to the
    /// reference.
    #[instrument(skip_all, fields(frames = frames.len()))]
    pub fn process_bracket<F>(
        &self,
        frames: &[RawFrame],
        exposure_factors: &[f32],
        mut progress: F,
    ) -> Result<PipelineOutput>
    where
        F: FnMut(StageProgress),
    {
        if frames.is_empty() || frames.len() != exposure_factors.len() {
            return Err(PipelineError::StageError {
                stage: PipelineStage::HdrMerge.name(),
                message: format!(
                    "{} frames with {} exposure factors",
                    frames.len(),
                    exposure_factors.len()
                ),
            });
        }

        let plan = self.plan(true);
        let mut runner = StageRunner {
            progress: &mut progress,
            timings: PipelineTimings::new(),
            index: 0,
            total: plan.len(),
        };

        let decoder = self.decoder();
        let outputs = runner.run(PipelineStage::Decode, || {
            frames.iter().map(|f| decoder.decode(f)).collect::<Result<Vec<_>>>()
        })?;

        let mut warnings = Vec::new();
        let mut repaired_pixels = 0;
        let mut images = Vec::with_capacity(outputs.len());
        for out in outputs {
            warnings.extend(out.warnings);
            repaired_pixels += out.repaired_pixels;
            images.push(out.image);
        }

        let merged = runner.run(PipelineStage::HdrMerge, || {
            self.dynamic_range.merge(&images, exposure_factors)
        })?;
        drop(images);

        self.finish(
            DecodeOutput {
                image: merged,
                warnings,
                repaired_pixels,
            },
            &mut runner,
        )
    }

    fn finish<F: FnMut(StageProgress)>(
        &self,
        decoded: DecodeOutput,
        runner: &mut StageRunner<'_, F>,
    ) -> Result<PipelineOutput> {
        let params = &self.parameters;
        let master = decoded.image;

        let detailed = runner.run(PipelineStage::Detail, || Ok(self.detail.process(&master, &params.detail)))?;
        let ranged = runner.run(PipelineStage::DynamicRange, || {
            Ok(self.dynamic_range.process(&detailed, &params.dynamic_range))
        })?;
        drop(detailed);
        let color = runner.run(PipelineStage::Color, || Ok(self.color.process(&ranged, &params.color)))?;
        drop(ranged);

        let mut image = color.encoded;
        if let Some(id) = params.look.lut_id.as_deref() {
            image = runner.run(PipelineStage::Look, || {
                let luts = self
                    .luts
                    .as_ref()
                    .ok_or_else(|| PipelineError::LutError(format!("no LUT source for '{}'", id)))?;
                let table = luts.get(id)?;
                Ok(self.lut_engine.apply(&table, &image, params.look.intensity))
            })?;
        }

        let flat = if params.produce_flat_master {
            Some(runner.run(PipelineStage::FlatMaster, || {
                Ok(self.flat.apply(&self.tone.encode(&color.linear)))
            })?)
        } else {
            None
        };

        let quality = runner.run(PipelineStage::Quality, || Ok(self.quality.analyze(&image)))?;

        info!(
            width = image.width(),
            height = image.height(),
            score = quality.overall_score,
            "Pipeline complete"
        );

        Ok(PipelineOutput {
            image,
            master,
            flat,
            quality,
            warnings: decoded.warnings,
            repaired_pixels: decoded.repaired_pixels,
            white_balance: color.gains,
            estimated_temperature: color.estimated_temperature,
            timings: runner.timings.clone(),
        })
    }

    /// Reads a RAW container with the configured reader and processes it.
    #[instrument(skip(self, input_data), fields(input_size = input_data.len()))]
    pub fn convert(&self, input_data: &[u8]) -> Result<PipelineOutput> {
        let frame = {
            let _span = info_span!("read_raw").entered();
            self.reader.read_raw(input_data)?
        };
        self.process(&frame)
    }

    /// Writes the graded JPEG plus any requested masters.
    pub fn write_outputs(&self, output: &PipelineOutput, paths: &OutputPaths) -> Result<()> {
        {
            let _span = info_span!("encode_jpeg").entered();
            let bytes = encode_jpeg(&output.image.to_rgb_image()?, self.jpeg_quality)?;
            create_output(&paths.image)?.write_all(&bytes)?;
        }

        if let Some(path) = &paths.master {
            let _span = info_span!("encode_tiff").entered();
            let mut file = BufWriter::new(create_output(path)?);
            self.writer.write_rgb16(&output.master, &mut file, &self.tiff_config)?;
            file.flush()?;
        }

        if let (Some(path), Some(flat)) = (&paths.flat, &output.flat) {
            let _span = info_span!("encode_flat").entered();
            let bytes = encode_jpeg(&flat.to_rgb_image()?, self.jpeg_quality)?;
            create_output(path)?.write_all(&bytes)?;
        }
        Ok(())
    }

    #[instrument(skip(self, input_path, paths))]
    pub fn convert_file<P: AsRef<Path>>(&self, input_path: P, paths: &OutputPaths) -> Result<PipelineOutput> {
        let input_path = input_path.as_ref();

        info!(
            input = %input_path.display(),
            output = %paths.image.display(),
            "Converting file"
        );

        let input_data = {
            let _span = info_span!("read_input_file").entered();
            std::fs::read(input_path).map_err(|e| {
                PipelineError::InputReadError(format!("{}: {}", input_path.display(), e))
            })?
        };

        let output = self.convert(&input_data)?;
        self.write_outputs(&output, paths)?;
        output.timings.log_summary();
        Ok(output)
    }
}

/// Develops a RAW frame into a display-encoded image. Implemented by the
/// orchestrator so the processing queue can run RAW jobs.
pub trait RawDeveloper: Send + Sync {
    fn develop(&self, frame: &RawFrame) -> Result<LinearImageBuffer>;
}

impl<R, W> RawDeveloper for PipelineOrchestrator<R, W>
where
    R: RawFrameReader + Send + Sync,
    W: TiffWriter + Send + Sync,
{
    fn develop(&self, frame: &RawFrame) -> Result<LinearImageBuffer> {
        Ok(self.process(frame)?.image)
    }
}

fn create_output(path: &Path) -> Result<File> {
    File::create(path).map_err(|e| PipelineError::OutputWriteError(format!("{}: {}", path.display(), e)))
}
