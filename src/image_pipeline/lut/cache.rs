use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use tracing::debug;

use crate::image_pipeline::common::Result;
use crate::image_pipeline::lut::{ColorLookupTable, LutProvider};

/// Thread-safe LUT cache keyed by id.
///
/// Population is compute-if-absent: two workers missing the same id at
/// once may both load it, and the first insert wins. Failed loads are not
/// cached.
pub struct LutCache {
    provider: Arc<dyn LutProvider>,
    tables: RwLock<HashMap<String, Arc<ColorLookupTable>>>,
}

impl LutCache {
    pub fn new(provider: Arc<dyn LutProvider>) -> Self {
        Self {
            provider,
            tables: RwLock::new(HashMap::new()),
        }
    }

    pub fn get(&self, id: &str) -> Result<Arc<ColorLookupTable>> {
        // Try read lock first
        {
            let tables = self.tables.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(table) = tables.get(id) {
                return Ok(Arc::clone(table));
            }
        }

        let loaded = Arc::new(self.provider.load(id)?);
        debug!(id, size = loaded.size(), "cached LUT");

        let mut tables = self.tables.write().unwrap_or_else(PoisonError::into_inner);
        let entry = tables.entry(id.to_string()).or_insert(loaded);
        Ok(Arc::clone(entry))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.tables
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.tables.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.tables.write().unwrap_or_else(PoisonError::into_inner).clear();
    }
}

impl std::fmt::Debug for LutCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LutCache").field("cached", &self.len()).finish()
    }
}
