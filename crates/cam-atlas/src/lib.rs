/// Glyph atlas construction for camSCII.
///
/// Rasterizes density ramps into flat glyph bitmaps consumed by the
/// compositor.

pub mod builder;

pub use builder::DensityAtlas;
