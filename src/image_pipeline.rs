//! Image processing pipeline module
//!
//! RAW frames flow through decode, detail, dynamic range, color, look and
//! quality stages, orchestrated by [`PipelineOrchestrator`]. Already
//! encoded stills take the shorter [`StillProcessor`] path, usually via the
//! background [`ProcessingQueue`].

pub mod color;
pub mod common;
pub mod config;
pub mod conversions;
pub mod debayer;
pub mod detail;
pub mod dynamic_range;
pub mod lut;
pub mod quality;
pub mod queue;
pub mod raw;
pub mod tiff;
pub mod tone;

pub use common::{BayerPattern, DecodeWarning, LinearImageBuffer, PipelineError, PipelineTimings, Result};

pub use config::{
    ColorParameters, ColorSpace, DetailParameters, DynamicRangeParameters, LookParameters,
    ProcessingParameters, ProcessingParametersBuilder, WhiteBalanceMode, WhiteBalancePreset,
};

pub use raw::{RawDecoder, RawFrame, RawFrameReader, RawLoaderReader};

pub use debayer::{demosaic, DemosaicMethod};

pub use detail::DetailEngine;

pub use dynamic_range::DynamicRangeEngine;

pub use color::{ColorEngine, WhiteBalanceGains};

pub use tone::{FlatProfileGenerator, ToneEncoder};

pub use lut::{ColorLookupTable, CubeDirectoryProvider, InMemoryLutProvider, LutCache, LutEngine, LutProvider};

pub use quality::{QualityAnalyzer, QualityReport};

pub use tiff::{StandardTiffWriter, TiffCompression, TiffConfig, TiffConfigBuilder, TiffWriter};

pub use conversions::{
    ColorPalette, OutputPaths, PipelineOrchestrator, PipelineOutput, PipelineStage, RawDeveloper, StageProgress,
    StillEdit, StillOutcome, StillProcessor, Watermark, WatermarkPosition,
};

pub use queue::{JobId, JobOutcome, JobPayload, JobRequest, ProcessingQueue, ProcessingResult, QueueConfig, QueueSnapshot};
