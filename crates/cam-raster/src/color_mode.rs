//! Sélection de la couleur de cellule à partir de la moyenne de bloc.

use cam_core::filter::ColorMode;
use cam_core::pixel::Argb;

/// Point de dispatch unique : applique le mode couleur à la moyenne d'une
/// cellule, au moment de la finalisation.
///
/// # Example
/// ```
/// use cam_core::filter::ColorMode;
/// use cam_core::pixel::Argb;
/// use cam_raster::color_mode::apply_mode;
/// let avg = Argb::pack(255, 90, 60, 30);
/// assert_eq!(apply_mode(avg, ColorMode::TrueColor), avg);
/// ```
#[must_use]
pub fn apply_mode(avg: Argb, mode: ColorMode) -> Argb {
    match mode {
        ColorMode::Fixed { foreground } => foreground,
        ColorMode::TrueColor => avg,
        ColorMode::Threshold { ratio } => threshold(avg, ratio),
    }
}

/// Postérisation par canaux dominants : tout canal strictement sous
/// `max(r, g, b) × ratio` est mis à zéro, les autres et l'alpha moyen sont
/// conservés tels quels.
#[must_use]
pub fn threshold(avg: Argb, ratio: f32) -> Argb {
    let (a, r, g, b) = avg.channels();
    let max = r.max(g).max(b);
    if max == 0 {
        return avg;
    }
    let cut = (f32::from(max) * ratio) as u8;
    let keep = |c: u8| if c < cut { 0 } else { c };
    Argb::pack(a, keep(r), keep(g), keep(b))
}
