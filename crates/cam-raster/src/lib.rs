/// Rasterization engine for camSCII.
///
/// Reduces RGBA frames to cell grids and composites glyph atlases back into
/// packed pixel buffers.

pub mod color_mode;
pub mod compositor;
pub mod geometry;
pub mod pipeline;
pub mod reduce;

pub use pipeline::FrameRenderer;
pub use reduce::{BlockReducer, CellReducer, ScanReducer};
