/// Configuration, types, and shared structures for camSCII.
///
/// This crate contains all shared types, pixel math, and configuration logic
/// used across the camSCII workspace.

pub mod config;
pub mod error;
pub mod filter;
pub mod frame;
pub mod pixel;
pub mod ramp;

pub use config::{PipelineConfig, ReducerKind};
pub use error::CoreError;
pub use filter::{ColorMode, FilterSpec};
pub use frame::{CellGrid, GlyphAtlas, RgbaFrame, RgbaView};
pub use pixel::Argb;

/// Re-exports pour accès par chemin sémantique.
pub mod luma {
    pub use crate::pixel::srgb_to_linear;
    pub use crate::ramp::{density_index, density_index_of, map_to_index};
}
