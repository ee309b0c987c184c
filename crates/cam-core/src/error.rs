use thiserror::Error;

/// Errors originating from the core pipeline types.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Invalid configuration value or structure.
    #[error("Configuration invalide : {0}")]
    Config(String),

    /// Atlas buffer shorter than the declared glyph count requires.
    #[error("Atlas de glyphes trop court : {needed} octets requis, {actual} disponibles")]
    AtlasTooShort {
        /// Bytes required by `density_len × glyph_px²`.
        needed: usize,
        /// Bytes actually provided.
        actual: usize,
    },

    /// Invalid width/height dimensions.
    #[error("Dimensions invalides : {width}×{height}")]
    InvalidDimensions {
        /// Width value.
        width: usize,
        /// Height value.
        height: usize,
    },

    /// Malformed color string (expected `#RRGGBB` or `#AARRGGBB`).
    #[error("Couleur invalide : {0}")]
    InvalidColor(String),
}
