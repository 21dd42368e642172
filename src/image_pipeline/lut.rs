//! 3D LUT "looks"
//!
//! Tables are cubic grids stored red-fastest, sampled trilinearly with the
//! same texel-center convention as the preview shader. Tables come from a
//! [`LutProvider`] and are shared between workers through [`LutCache`].

mod cache;
pub mod cube;
mod provider;
mod sampling;
mod table;


pub use cache::LutCache;
pub use provider::{CubeDirectoryProvider, InMemoryLutProvider, LutProvider};
pub use sampling::LutEngine;
pub use table::{ColorLookupTable, MAX_GRID_SIZE};
