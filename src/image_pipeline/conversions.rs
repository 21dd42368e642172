//! Pipeline conversions module
//!
//! Orchestration for RAW frames (full pipeline) and for already encoded
//! stills (palette, look, watermark).

mod palette;
mod raw_pipeline;
mod still_processor;
mod watermark;


pub use palette::ColorPalette;
pub use raw_pipeline::{
    OutputPaths, PipelineOrchestrator, PipelineOutput, PipelineStage, RawDeveloper, StageProgress,
};
pub use still_processor::{StillEdit, StillOutcome, StillProcessor};
pub use watermark::{NoWatermark, Watermark, WatermarkPosition};
