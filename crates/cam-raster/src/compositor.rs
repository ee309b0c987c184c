//! Composition des glyphes : de la grille de cellules au tampon de sortie.

use cam_core::frame::{CellGrid, GlyphAtlas};
use cam_core::pixel::Argb;
use rayon::prelude::*;

/// Compose la grille avec la couleur propre de chaque cellule.
///
/// # Panics
/// Si `out.len()` ne vaut pas `cells_wide·glyph_px × cells_high·glyph_px`.
///
/// # Example
/// ```
/// use cam_core::frame::{CellGrid, GlyphAtlas};
/// use cam_core::pixel::Argb;
/// use cam_raster::compositor::composite;
///
/// let atlas_bytes = [1u8, 0, 0, 1];
/// let atlas = GlyphAtlas::new(&atlas_bytes, 2, 1);
/// let grid = CellGrid::new(1, 1);
/// let mut out = vec![Argb::TRANSPARENT; 4];
/// composite(&grid, atlas, Argb::BLACK, &mut out);
/// ```
pub fn composite(grid: &CellGrid, atlas: GlyphAtlas<'_>, background: Argb, out: &mut [Argb]) {
    stamp(grid, atlas, background, out, |cell| grid.color[cell]);
}

/// Compose la grille avec une couleur d'encre partagée, sans indirection
/// par cellule.
///
/// # Panics
/// Si `out.len()` ne vaut pas `cells_wide·glyph_px × cells_high·glyph_px`.
pub fn composite_fixed(
    grid: &CellGrid,
    atlas: GlyphAtlas<'_>,
    foreground: Argb,
    background: Argb,
    out: &mut [Argb],
) {
    stamp(grid, atlas, background, out, move |_| foreground);
}

/// Routine de tamponnage commune : octet de glyphe non nul → encre, nul →
/// fond. La sortie est réécrite intégralement, bande de cellules par bande.
fn stamp(
    grid: &CellGrid,
    atlas: GlyphAtlas<'_>,
    background: Argb,
    out: &mut [Argb],
    color_of: impl Fn(usize) -> Argb + Sync,
) {
    let g = atlas.glyph_px();
    let out_width = grid.cells_wide * g;
    let out_height = grid.cells_high * g;
    assert_eq!(
        out.len(),
        out_width * out_height,
        "tampon de sortie mal dimensionné : {} pixels pour {out_width}×{out_height}",
        out.len()
    );
    if out.is_empty() {
        return;
    }

    // Une bande = g lignes de sortie couvrant une ligne de cellules.
    out.par_chunks_exact_mut(out_width * g)
        .enumerate()
        .for_each(|(cy, band)| {
            for (band_y, row) in band.chunks_exact_mut(out_width).enumerate() {
                for (cx, span) in row.chunks_exact_mut(g).enumerate() {
                    let cell = cy * grid.cells_wide + cx;
                    let glyph = atlas.glyph(usize::from(grid.density[cell]));
                    let ink = color_of(cell);
                    let glyph_row = &glyph[band_y * g..band_y * g + g];
                    for (px, &byte) in span.iter_mut().zip(glyph_row) {
                        *px = if byte == 0 { background } else { ink };
                    }
                }
            }
        });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_cell_diagonal_glyph() {
        let atlas_bytes = [1u8, 0, 0, 1];
        let atlas = GlyphAtlas::new(&atlas_bytes, 2, 1);
        let grid = CellGrid::new(1, 1);
        let f = Argb::pack(255, 200, 100, 50);
        let b = Argb::pack(255, 1, 2, 3);

        let mut out = vec![Argb::TRANSPARENT; 4];
        composite_fixed(&grid, atlas, f, b, &mut out);
        assert_eq!(out, [f, b, b, f]);
    }

    #[test]
    fn asymmetric_grid_stamps_each_cells_glyph() {
        // Quatre glyphes 2×2 : vide, deux diagonales, une anti-diagonale.
        let atlas_bytes = [
            0, 0, 0, 0, //
            1, 0, 0, 1, //
            2, 0, 0, 2, //
            0, 3, 3, 0, //
        ];
        let atlas = GlyphAtlas::new(&atlas_bytes, 2, 4);

        let mut grid = CellGrid::new(5, 3);
        let density = [1u16, 2, 3, 2, 1, 3, 2, 1, 2, 3, 1, 2, 3, 2, 1];
        grid.density.copy_from_slice(&density);

        let f = Argb::WHITE;
        let b = Argb::BLACK;
        let mut out = vec![Argb::TRANSPARENT; 60];
        composite_fixed(&grid, atlas, f, b, &mut out);

        let stencil = [
            1, 0, 2, 0, 0, 3, 2, 0, 1, 0, //
            0, 1, 0, 2, 3, 0, 0, 2, 0, 1, //
            0, 3, 2, 0, 1, 0, 2, 0, 0, 3, //
            3, 0, 0, 2, 0, 1, 0, 2, 3, 0, //
            1, 0, 2, 0, 0, 3, 2, 0, 1, 0, //
            0, 1, 0, 2, 3, 0, 0, 2, 0, 1, //
        ];
        let expected: Vec<Argb> = stencil
            .iter()
            .map(|&ink| if ink == 0 { b } else { f })
            .collect();
        assert_eq!(out, expected);
    }

    #[test]
    fn composite_uses_each_cells_own_color() {
        let atlas_bytes = [255u8; 4];
        let atlas = GlyphAtlas::new(&atlas_bytes, 2, 1);
        let mut grid = CellGrid::new(2, 1);
        grid.color[0] = Argb::pack(255, 10, 0, 0);
        grid.color[1] = Argb::pack(255, 0, 20, 0);

        let mut out = vec![Argb::TRANSPARENT; 8];
        composite(&grid, atlas, Argb::BLACK, &mut out);
        for y in 0..2 {
            for x in 0..4 {
                let expect = if x < 2 { grid.color[0] } else { grid.color[1] };
                assert_eq!(out[y * 4 + x], expect, "pixel ({x}, {y})");
            }
        }
    }

    #[test]
    fn output_is_fully_overwritten() {
        let atlas_bytes = [0u8; 4];
        let atlas = GlyphAtlas::new(&atlas_bytes, 2, 1);
        let grid = CellGrid::new(1, 1);

        let mut out = vec![Argb(0xDEAD_BEEF); 4];
        composite(&grid, atlas, Argb::BLACK, &mut out);
        assert!(out.iter().all(|&p| p == Argb::BLACK));
    }

    #[test]
    #[should_panic(expected = "tampon de sortie mal dimensionné")]
    fn wrong_output_size_panics() {
        let atlas_bytes = [1u8, 0, 0, 1];
        let atlas = GlyphAtlas::new(&atlas_bytes, 2, 1);
        let grid = CellGrid::new(1, 1);
        let mut out = vec![Argb::BLACK; 3];
        composite_fixed(&grid, atlas, Argb::WHITE, Argb::BLACK, &mut out);
    }
}
