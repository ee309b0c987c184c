use crate::pixel::Argb;

/// Rescale linéaire de `value` depuis `[value_low, value_high]` vers
/// `[index_low, index_high)`, tronqué puis borné à `[index_low, index_high - 1]`.
///
/// Croissant en `value`. `value_high > value_low` et `index_high > index_low`
/// par contrat (les appelants du pipeline passent toujours `0.0, 1.0`).
///
/// # Example
/// ```
/// use cam_core::ramp::map_to_index;
/// assert_eq!(map_to_index(0.0, 0.0, 1.0, 0, 6), 0);
/// assert_eq!(map_to_index(1.0, 0.0, 1.0, 0, 6), 5);
/// assert_eq!(map_to_index(0.5, 0.0, 1.0, 0, 6), 3);
/// ```
#[inline]
#[must_use]
pub fn map_to_index(
    value: f32,
    value_low: f32,
    value_high: f32,
    index_low: usize,
    index_high: usize,
) -> usize {
    debug_assert!(value_high > value_low, "plage de valeurs vide");
    debug_assert!(index_high > index_low, "plage d'indices vide");
    let span = (index_high - index_low) as f32;
    // Le cast f32 → usize sature : NaN et valeurs négatives tombent à zéro.
    let offset = ((value - value_low) / (value_high - value_low) * span) as usize;
    (index_low + offset).min(index_high - 1)
}

/// Indice de rampe pour une luminance [0.0, 1.0] : un pixel clair sélectionne
/// l'indice 0, un pixel sombre l'indice `density_len - 1`.
///
/// L'inversion `density_len - i - 1` est un contrat partagé avec l'atlas :
/// le glyphe d'indice 0 est celui affiché pour une cellule claire.
///
/// # Example
/// ```
/// use cam_core::ramp::density_index;
/// assert_eq!(density_index(1.0, 6), 0);
/// assert_eq!(density_index(0.0, 6), 5);
/// ```
#[inline]
#[must_use]
pub fn density_index(luminance: f32, density_len: usize) -> usize {
    density_len - map_to_index(luminance, 0.0, 1.0, 0, density_len) - 1
}

/// Indice de rampe d'un pixel empaqueté, via sa luminance relative.
///
/// # Example
/// ```
/// use cam_core::pixel::Argb;
/// use cam_core::ramp::density_index_of;
/// assert_eq!(density_index_of(Argb::WHITE, 6), 0);
/// assert_eq!(density_index_of(Argb::BLACK, 6), 5);
/// ```
#[inline]
#[must_use]
pub fn density_index_of(color: Argb, density_len: usize) -> usize {
    density_index(color.luminance(), density_len)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn map_covers_endpoints() {
        assert_eq!(map_to_index(0.0, 0.0, 1.0, 0, 10), 0);
        assert_eq!(map_to_index(1.0, 0.0, 1.0, 0, 10), 9);
    }

    #[test]
    fn map_stays_in_range_and_is_monotonic() {
        let mut prev = 0usize;
        for step in 0..=100 {
            let v = step as f32 / 100.0;
            let idx = map_to_index(v, 0.0, 1.0, 0, 7);
            assert!(idx < 7, "indice hors plage à v={v}");
            assert!(idx >= prev, "mapping non croissant à v={v}");
            prev = idx;
        }
    }

    #[test]
    fn map_clamps_out_of_range_values() {
        assert_eq!(map_to_index(-0.5, 0.0, 1.0, 0, 6), 0);
        assert_eq!(map_to_index(1.5, 0.0, 1.0, 0, 6), 5);
    }

    #[test]
    fn map_honors_nonzero_index_low() {
        assert_eq!(map_to_index(0.0, 0.0, 1.0, 2, 8), 2);
        assert_eq!(map_to_index(1.0, 0.0, 1.0, 2, 8), 7);
    }

    #[test]
    fn density_index_inverts_brightness() {
        let mut prev = 6usize;
        for step in 0..=60 {
            let lum = step as f32 / 60.0;
            let idx = density_index(lum, 6);
            assert!(idx < 6);
            assert!(idx <= prev, "indice de densité croissant à lum={lum}");
            prev = idx;
        }
    }

    #[test]
    fn density_index_of_midgray_lands_midramp() {
        // Gris moyen (127,127,127) : luminance relative ≈ 0.212, soit
        // l'indice 1 sur 6 avant inversion, donc 4 après.
        let avg = Argb::pack(191, 127, 127, 127);
        assert_eq!(density_index_of(avg, 6), 4);
    }
}
