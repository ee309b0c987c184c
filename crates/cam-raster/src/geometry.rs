//! Transformations géométriques tampon à tampon (fenêtrage, rotation, miroir).
//!
//! Les variantes `_bytes` travaillent sur le tampon brut RGBA, 4 octets par
//! pixel. Les destinations sont dimensionnées par l'appelant et vérifiées en
//! debug, jamais ajustées.

use cam_core::pixel::Argb;

const BPP: usize = 4;

/// Copie la fenêtre `[x0, x0+w) × [y0, y0+h)` d'un tampon compacté vers une
/// destination dense de `w × h` pixels.
///
/// # Example
/// ```
/// use cam_core::pixel::Argb;
/// use cam_raster::geometry::extract_region;
/// let src: Vec<Argb> = (0..12).map(Argb).collect();
/// let mut dst = vec![Argb(0); 4];
/// extract_region(&src, 4, 1, 1, 2, 2, &mut dst);
/// assert_eq!(dst, [Argb(5), Argb(6), Argb(9), Argb(10)]);
/// ```
pub fn extract_region(
    src: &[Argb],
    src_width: usize,
    x0: usize,
    y0: usize,
    w: usize,
    h: usize,
    dst: &mut [Argb],
) {
    debug_assert_eq!(dst.len(), w * h, "destination mal dimensionnée");
    debug_assert!(x0 + w <= src_width, "fenêtre hors limites horizontales");
    for row in 0..h {
        let s = (y0 + row) * src_width + x0;
        let d = row * w;
        dst[d..d + w].copy_from_slice(&src[s..s + w]);
    }
}

/// Réinsère une fenêtre dense de `w × h` pixels à l'offset `(x0, y0)` d'un
/// tampon compacté. Inverse de [`extract_region`] au même offset.
pub fn insert_region(
    dst: &mut [Argb],
    dst_width: usize,
    x0: usize,
    y0: usize,
    w: usize,
    h: usize,
    src: &[Argb],
) {
    debug_assert_eq!(src.len(), w * h, "source mal dimensionnée");
    debug_assert!(x0 + w <= dst_width, "fenêtre hors limites horizontales");
    for row in 0..h {
        let d = (y0 + row) * dst_width + x0;
        let s = row * w;
        dst[d..d + w].copy_from_slice(&src[s..s + w]);
    }
}

/// Variante brute de [`extract_region`], stride de 4 octets par pixel.
pub fn extract_region_bytes(
    src: &[u8],
    src_width: usize,
    x0: usize,
    y0: usize,
    w: usize,
    h: usize,
    dst: &mut [u8],
) {
    debug_assert_eq!(dst.len(), w * h * BPP, "destination mal dimensionnée");
    debug_assert!(x0 + w <= src_width, "fenêtre hors limites horizontales");
    for row in 0..h {
        let s = ((y0 + row) * src_width + x0) * BPP;
        let d = row * w * BPP;
        dst[d..d + w * BPP].copy_from_slice(&src[s..s + w * BPP]);
    }
}

/// Variante brute de [`insert_region`], stride de 4 octets par pixel.
pub fn insert_region_bytes(
    dst: &mut [u8],
    dst_width: usize,
    x0: usize,
    y0: usize,
    w: usize,
    h: usize,
    src: &[u8],
) {
    debug_assert_eq!(src.len(), w * h * BPP, "source mal dimensionnée");
    debug_assert!(x0 + w <= dst_width, "fenêtre hors limites horizontales");
    for row in 0..h {
        let d = ((y0 + row) * dst_width + x0) * BPP;
        let s = row * w * BPP;
        dst[d..d + w * BPP].copy_from_slice(&src[s..s + w * BPP]);
    }
}

/// Recadre au coin supérieur gauche : copie la fenêtre `dst_width ×
/// dst_height`, les colonnes et lignes au-delà des bornes cibles sont
/// ignorées.
pub fn crop_bytes(
    src: &[u8],
    src_width: usize,
    src_height: usize,
    dst_width: usize,
    dst_height: usize,
    dst: &mut [u8],
) {
    debug_assert!(
        dst_width <= src_width && dst_height <= src_height,
        "cadre cible plus grand que la source"
    );
    debug_assert_eq!(src.len(), src_width * src_height * BPP, "source mal dimensionnée");
    debug_assert_eq!(dst.len(), dst_width * dst_height * BPP, "destination mal dimensionnée");
    let row_len = dst_width * BPP;
    for y in 0..dst_height {
        let s = y * src_width * BPP;
        let d = y * row_len;
        dst[d..d + row_len].copy_from_slice(&src[s..s + row_len]);
    }
}

/// Rotation de 90° horaire : le pixel source `(x, y)` d'un tampon
/// `width × height` atterrit en `(height-1-y, x)` d'une destination de
/// `height` pixels de large sur `width` de haut. Quatre applications
/// successives redonnent l'image de départ.
pub fn rotate90_bytes(src: &[u8], width: usize, height: usize, dst: &mut [u8]) {
    debug_assert_eq!(src.len(), width * height * BPP, "source mal dimensionnée");
    debug_assert_eq!(dst.len(), src.len(), "destination mal dimensionnée");
    let dst_width = height;
    for y in 0..height {
        for x in 0..width {
            let s = (y * width + x) * BPP;
            let d = (x * dst_width + (height - 1 - y)) * BPP;
            dst[d..d + BPP].copy_from_slice(&src[s..s + BPP]);
        }
    }
}

/// Miroir horizontal : `(x, y)` vers `(width-1-x, y)`, dimensions inchangées.
/// Deux applications successives redonnent l'image de départ.
pub fn mirror_bytes(src: &[u8], width: usize, height: usize, dst: &mut [u8]) {
    debug_assert_eq!(src.len(), width * height * BPP, "source mal dimensionnée");
    debug_assert_eq!(dst.len(), src.len(), "destination mal dimensionnée");
    for y in 0..height {
        for x in 0..width {
            let s = (y * width + x) * BPP;
            let d = (y * width + (width - 1 - x)) * BPP;
            dst[d..d + BPP].copy_from_slice(&src[s..s + BPP]);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Tampon brut où chaque pixel vaut `(i, i+1, i+2, i+3)`, i = index × 4.
    fn numbered_bytes(pixels: usize) -> Vec<u8> {
        (0..pixels * BPP).map(|i| (i % 251) as u8).collect()
    }

    #[test]
    fn extract_pulls_expected_window() {
        // Grille 10×6 remplie de 1..=60, fenêtre 2×3 à partir de la colonne 4.
        let src: Vec<Argb> = (1..=60).map(Argb).collect();
        let mut dst = vec![Argb(0); 6];
        extract_region(&src, 10, 4, 0, 2, 3, &mut dst);
        let got: Vec<u32> = dst.iter().map(|p| p.0).collect();
        assert_eq!(got, [5, 6, 15, 16, 25, 26]);
    }

    #[test]
    fn extract_then_insert_is_identity_on_window() {
        let src: Vec<Argb> = (0..48).map(|i| Argb(i * 7 + 3)).collect();
        let mut copy = src.clone();

        let mut window = vec![Argb(0); 3 * 2];
        extract_region(&src, 8, 2, 1, 3, 2, &mut window);
        // Brouille la zone avant réinsertion.
        insert_region(&mut copy, 8, 2, 1, 3, 2, &[Argb(0); 6]);
        assert_ne!(copy, src);
        insert_region(&mut copy, 8, 2, 1, 3, 2, &window);
        assert_eq!(copy, src);
    }

    #[test]
    fn byte_variants_match_packed_layout() {
        let packed: Vec<Argb> = (1..=60).map(Argb).collect();
        let mut raw = vec![0u8; 60 * BPP];
        for (i, p) in packed.iter().enumerate() {
            // Marqueur par pixel : octet rouge = valeur, reste nul.
            raw[i * BPP] = p.0 as u8;
        }

        let mut dst = vec![0u8; 6 * BPP];
        extract_region_bytes(&raw, 10, 4, 0, 2, 3, &mut dst);
        let reds: Vec<u8> = dst.chunks_exact(BPP).map(|px| px[0]).collect();
        assert_eq!(reds, [5, 6, 15, 16, 25, 26]);

        let mut back = raw.clone();
        insert_region_bytes(&mut back, 10, 4, 0, 2, 3, &dst);
        assert_eq!(back, raw);
    }

    #[test]
    fn crop_keeps_top_left_window() {
        let src = numbered_bytes(4 * 3);
        let mut dst = vec![0u8; 2 * 2 * BPP];
        crop_bytes(&src, 4, 3, 2, 2, &mut dst);

        // Ligne 0 : pixels 0 et 1 ; ligne 1 : pixels 4 et 5.
        assert_eq!(&dst[0..8], &src[0..8]);
        assert_eq!(&dst[8..16], &src[16..24]);
    }

    #[test]
    fn rotate_quarter_turn_moves_corners() {
        // A B      C A
        // C D  →   D B
        let mut src = vec![0u8; 4 * BPP];
        for (i, label) in [b'A', b'B', b'C', b'D'].into_iter().enumerate() {
            src[i * BPP] = label;
        }
        let mut dst = vec![0u8; 4 * BPP];
        rotate90_bytes(&src, 2, 2, &mut dst);
        let labels: Vec<u8> = dst.chunks_exact(BPP).map(|px| px[0]).collect();
        assert_eq!(labels, [b'C', b'A', b'D', b'B']);
    }

    #[test]
    fn rotate_four_times_is_identity_on_rectangles() {
        let src = numbered_bytes(3 * 2);
        let mut a = src.clone();
        let mut b = vec![0u8; src.len()];
        let (mut w, mut h) = (3, 2);
        for _ in 0..4 {
            rotate90_bytes(&a, w, h, &mut b);
            std::mem::swap(&mut a, &mut b);
            std::mem::swap(&mut w, &mut h);
        }
        assert_eq!(a, src);
        assert_eq!((w, h), (3, 2));
    }

    #[test]
    fn mirror_reverses_rows_and_is_involutive() {
        let mut src = vec![0u8; 3 * BPP];
        for (i, label) in [b'A', b'B', b'C'].into_iter().enumerate() {
            src[i * BPP] = label;
        }
        let mut once = vec![0u8; src.len()];
        mirror_bytes(&src, 3, 1, &mut once);
        let labels: Vec<u8> = once.chunks_exact(BPP).map(|px| px[0]).collect();
        assert_eq!(labels, [b'C', b'B', b'A']);

        let mut twice = vec![0u8; src.len()];
        mirror_bytes(&once, 3, 1, &mut twice);
        assert_eq!(twice, src);
    }
}
