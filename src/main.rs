use std::path::PathBuf;
use std::sync::Arc;
use std::sync::mpsc::channel;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use tracing::{error, info, warn};

use darkroom_rs::image_pipeline::{
    ColorPalette, CubeDirectoryProvider, JobRequest, LookParameters, LutCache, OutputPaths, PipelineOrchestrator,
    ProcessingParameters, ProcessingQueue, QueueConfig, StillEdit, StillProcessor,
};
use darkroom_rs::logger;

#[derive(Parser)]
#[command(name = "darkroom", version, about = "Develops RAW captures and edits JPEG stills")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run a RAW file through the full development pipeline
    Process {
        input: PathBuf,
        /// Graded JPEG output
        #[arg(short, long)]
        out: PathBuf,
        /// 16-bit TIFF of the demosaiced image
        #[arg(long)]
        master: Option<PathBuf>,
        /// Flat-profile JPEG; implies the flat master
        #[arg(long)]
        flat: Option<PathBuf>,
        /// JSON processing parameters
        #[arg(long)]
        settings: Option<PathBuf>,
        /// Directory holding `<id>.cube` looks
        #[arg(long)]
        lut_dir: Option<PathBuf>,
        /// Print the quality report as JSON
        #[arg(long)]
        report: bool,
    },
    /// Apply palette and look edits to JPEG stills on the background queue
    Still {
        #[arg(required = true)]
        inputs: Vec<PathBuf>,
        #[arg(short, long)]
        out_dir: PathBuf,
        #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
        brightness: f32,
        #[arg(long, default_value_t = 1.0)]
        contrast: f32,
        #[arg(long, default_value_t = 1.0)]
        saturation: f32,
        #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
        warmth: f32,
        /// LUT id looked up in --lut-dir
        #[arg(long, requires = "lut_dir")]
        lut: Option<String>,
        #[arg(long, default_value_t = 1.0)]
        intensity: f32,
        #[arg(long)]
        lut_dir: Option<PathBuf>,
        #[arg(long, default_value_t = 2)]
        workers: usize,
        #[arg(long, default_value_t = 92)]
        quality: u8,
    },
}

fn lut_cache(dir: PathBuf) -> Arc<LutCache> {
    Arc::new(LutCache::new(Arc::new(CubeDirectoryProvider::new(dir))))
}

fn process(
    input: PathBuf,
    paths: OutputPaths,
    settings: Option<PathBuf>,
    lut_dir: Option<PathBuf>,
    report: bool,
) -> Result<()> {
    let mut parameters = match settings {
        Some(path) => ProcessingParameters::from_file(&path)
            .with_context(|| format!("loading settings from {}", path.display()))?,
        None => ProcessingParameters::default(),
    };
    if paths.flat.is_some() {
        parameters.produce_flat_master = true;
    }

    let mut pipeline = PipelineOrchestrator::new(parameters);
    if let Some(dir) = lut_dir {
        pipeline = pipeline.with_lut_cache(lut_cache(dir));
    }

    let output = pipeline
        .convert_file(&input, &paths)
        .with_context(|| format!("processing {}", input.display()))?;

    for warning in &output.warnings {
        warn!("{}", warning);
    }
    info!(
        score = output.quality.overall_score,
        temperature = output.estimated_temperature,
        repaired = output.repaired_pixels,
        "Wrote {}",
        paths.image.display()
    );
    if report {
        println!("{}", serde_json::to_string_pretty(&output.quality)?);
    }
    Ok(())
}

fn still(inputs: Vec<PathBuf>, out_dir: PathBuf, edit: StillEdit, lut_dir: Option<PathBuf>, config: QueueConfig) -> Result<()> {
    std::fs::create_dir_all(&out_dir).with_context(|| format!("creating {}", out_dir.display()))?;

    let mut processor = StillProcessor::new().with_jpeg_quality(config.jpeg_quality);
    if let Some(dir) = lut_dir {
        processor = processor.with_lut_cache(lut_cache(dir));
    }
    let queue = ProcessingQueue::with_processor(config, processor)?;
    queue.subscribe(|snapshot| tracing::debug!(?snapshot, "Queue progress"));

    let (tx, rx) = channel();
    let mut submitted = 0;
    for input in inputs {
        let bytes = std::fs::read(&input).with_context(|| format!("reading {}", input.display()))?;
        let Some(name) = input.file_name() else {
            bail!("{} has no file name", input.display());
        };
        let target = out_dir.join(name);
        let tx = tx.clone();
        queue.submit(JobRequest::new(bytes, edit.clone()), move |result| {
            let _ = tx.send((target, result));
        })?;
        submitted += 1;
    }
    drop(tx);

    let mut failed = 0;
    for (target, result) in rx.iter().take(submitted) {
        if let Some(message) = result.error_message() {
            error!("{}: {}", target.display(), message);
            failed += 1;
        }
        std::fs::write(&target, result.bytes()).with_context(|| format!("writing {}", target.display()))?;
    }
    queue.shutdown();

    let snapshot = queue.snapshot();
    info!(completed = snapshot.completed, failed = snapshot.failed, "Stills done");
    if failed > 0 {
        bail!("{} of {} stills kept their original bytes", failed, submitted);
    }
    Ok(())
}

fn main() -> Result<()> {
    logger::init();
    let cli = Cli::parse();

    match cli.command {
        Command::Process {
            input,
            out,
            master,
            flat,
            settings,
            lut_dir,
            report,
        } => {
            let paths = OutputPaths { image: out, master, flat };
            process(input, paths, settings, lut_dir, report)
        }
        Command::Still {
            inputs,
            out_dir,
            brightness,
            contrast,
            saturation,
            warmth,
            lut,
            intensity,
            lut_dir,
            workers,
            quality,
        } => {
            let edit = StillEdit {
                palette: ColorPalette {
                    brightness,
                    contrast,
                    saturation,
                    warmth,
                },
                look: LookParameters { lut_id: lut, intensity },
                watermark: None,
            };
            let config = QueueConfig::builder().workers(workers).jpeg_quality(quality).build();
            still(inputs, out_dir, edit, lut_dir, config)
        }
    }
}
