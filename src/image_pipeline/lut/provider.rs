use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::image_pipeline::common::{PipelineError, Result};
use crate::image_pipeline::lut::cube::read_cube;
use crate::image_pipeline::lut::ColorLookupTable;

/// Source of LUT data by id.
pub trait LutProvider: Send + Sync {
    fn load(&self, id: &str) -> Result<ColorLookupTable>;
}

/// Loads `<root>/<id>.cube`.
#[derive(Debug, Clone)]
pub struct CubeDirectoryProvider {
    root: PathBuf,
}

impl CubeDirectoryProvider {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl LutProvider for CubeDirectoryProvider {
    fn load(&self, id: &str) -> Result<ColorLookupTable> {
        if id.is_empty() || id.contains(['/', '\\']) || id.contains("..") {
            return Err(PipelineError::LutError(format!("invalid LUT id: '{}'", id)));
        }
        let path = self.root.join(format!("{}.cube", id));
        debug!(path = %path.display(), "loading cube LUT");
        read_cube(&path)
    }
}

/// Tables held in memory, keyed by id.
#[derive(Debug, Clone, Default)]
pub struct InMemoryLutProvider {
    tables: HashMap<String, ColorLookupTable>,
}

impl InMemoryLutProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_table(mut self, id: impl Into<String>, table: ColorLookupTable) -> Self {
        self.insert(id, table);
        self
    }

    pub fn insert(&mut self, id: impl Into<String>, table: ColorLookupTable) {
        self.tables.insert(id.into(), table);
    }
}

impl LutProvider for InMemoryLutProvider {
    fn load(&self, id: &str) -> Result<ColorLookupTable> {
        self.tables
            .get(id)
            .cloned()
            .ok_or_else(|| PipelineError::LutError(format!("unknown LUT id: '{}'", id)))
    }
}
