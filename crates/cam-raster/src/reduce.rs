//! Réduction des blocs de pixels en cellules : moyenne, densité, couleur.

use cam_core::filter::ColorMode;
use cam_core::frame::{CellGrid, RgbaView};
use cam_core::pixel::Argb;
use cam_core::ramp::density_index;
use rayon::prelude::*;

use crate::color_mode::apply_mode;

/// Réduit chaque bloc `cell_px × cell_px` de la source en une cellule de la
/// grille (indice de densité + couleur).
///
/// Implémenté par : `CellReducer`, `ScanReducer`. Les deux stratégies
/// produisent des grilles identiques sur les mêmes entrées.
///
/// # Example
/// ```
/// use cam_core::filter::ColorMode;
/// use cam_core::frame::{CellGrid, RgbaView};
/// use cam_raster::reduce::BlockReducer;
///
/// struct DummyReducer;
/// impl BlockReducer for DummyReducer {
///     fn reduce(&mut self, _src: &RgbaView<'_>, _cell_px: usize,
///               _density_len: usize, _mode: ColorMode, _grid: &mut CellGrid) {}
///     fn name(&self) -> &'static str { "dummy" }
/// }
/// ```
pub trait BlockReducer {
    /// Réduit la source et écrit densité et couleur dans `grid`.
    ///
    /// CONTRAT : la source mesure exactement `cells_wide·cell_px ×
    /// cells_high·cell_px` et la grille est pré-dimensionnée en conséquence.
    fn reduce(
        &mut self,
        src: &RgbaView<'_>,
        cell_px: usize,
        density_len: usize,
        mode: ColorMode,
        grid: &mut CellGrid,
    );

    /// Nom lisible pour le debug.
    fn name(&self) -> &'static str;
}

fn check_geometry(src: &RgbaView<'_>, cell_px: usize, grid: &CellGrid) {
    debug_assert!(cell_px > 0, "côté de cellule nul");
    debug_assert_eq!(src.width % cell_px, 0, "largeur non multiple du côté de cellule");
    debug_assert_eq!(src.height % cell_px, 0, "hauteur non multiple du côté de cellule");
    debug_assert_eq!(grid.cells_wide, src.width / cell_px, "grille incohérente avec la source");
    debug_assert_eq!(grid.cells_high, src.height / cell_px, "grille incohérente avec la source");
}

/// Moyenne des canaux sur le sous-rectangle exact d'une cellule, division
/// entière tronquante par `cell_px²`.
#[inline(always)]
fn average_cell(src: RgbaView<'_>, cell_px: usize, cx: usize, cy: usize) -> Argb {
    let g = cell_px;
    let (mut sum_r, mut sum_g, mut sum_b, mut sum_a) = (0u32, 0u32, 0u32, 0u32);
    let x0 = cx * g;
    for y in cy * g..cy * g + g {
        let row = (y * src.width + x0) * 4;
        for px in src.data[row..row + g * 4].chunks_exact(4) {
            sum_r += u32::from(px[0]);
            sum_g += u32::from(px[1]);
            sum_b += u32::from(px[2]);
            sum_a += u32::from(px[3]);
        }
    }
    let n = (g * g) as u32;
    Argb::pack(
        (sum_a / n) as u8,
        (sum_r / n) as u8,
        (sum_g / n) as u8,
        (sum_b / n) as u8,
    )
}

/// Réducteur indexé par cellule : chaque cellule lit son sous-rectangle
/// source en entier. Les lignes de cellules sont indépendantes et traitées
/// en parallèle.
///
/// # Example
/// ```
/// use cam_core::filter::ColorMode;
/// use cam_core::frame::{CellGrid, RgbaFrame};
/// use cam_raster::reduce::{BlockReducer, CellReducer};
///
/// let frame = RgbaFrame::new(4, 2);
/// let mut grid = CellGrid::new(2, 1);
/// let mut reducer = CellReducer::new();
/// reducer.reduce(&frame.view(), 2, 6, ColorMode::TrueColor, &mut grid);
/// assert_eq!(grid.density, vec![5u16, 5]);
/// ```
#[derive(Debug, Default)]
pub struct CellReducer;

impl CellReducer {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl BlockReducer for CellReducer {
    fn reduce(
        &mut self,
        src: &RgbaView<'_>,
        cell_px: usize,
        density_len: usize,
        mode: ColorMode,
        grid: &mut CellGrid,
    ) {
        check_geometry(src, cell_px, grid);
        if grid.is_empty() {
            return;
        }
        let view = *src;
        let cells_wide = grid.cells_wide;

        grid.density
            .par_chunks_mut(cells_wide)
            .zip(grid.color.par_chunks_mut(cells_wide))
            .enumerate()
            .for_each(|(cy, (density_row, color_row))| {
                for cx in 0..cells_wide {
                    let avg = average_cell(view, cell_px, cx, cy);
                    density_row[cx] = density_index(avg.luminance(), density_len) as u16;
                    color_row[cx] = apply_mode(avg, mode);
                }
            });
    }

    fn name(&self) -> &'static str {
        "cell"
    }
}

/// Réducteur par balayage : une seule passe séquentielle sur la source, un
/// accumulateur par colonne de cellules. Une cellule est finalisée quand son
/// coin bas-droit est atteint.
///
/// Le scratch persiste entre les appels et est remis à zéro explicitement au
/// début de chaque passe. Séquentiel par nature : l'accumulateur transporte
/// l'état à travers le balayage.
#[derive(Debug, Default)]
pub struct ScanReducer {
    /// Accumulateurs par colonne de cellules, 4 canaux (R, G, B, A) chacun.
    acc: Vec<u32>,
}

impl ScanReducer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl BlockReducer for ScanReducer {
    fn reduce(
        &mut self,
        src: &RgbaView<'_>,
        cell_px: usize,
        density_len: usize,
        mode: ColorMode,
        grid: &mut CellGrid,
    ) {
        check_geometry(src, cell_px, grid);
        let g = cell_px;
        let n = (g * g) as u32;

        // Remise à zéro explicite du scratch : jamais de contenu hérité.
        self.acc.clear();
        self.acc.resize(grid.cells_wide * 4, 0);

        for y in 0..src.height {
            let row = y * src.width * 4;
            for x in 0..src.width {
                let p = row + x * 4;
                let slot = (x / g) * 4;
                self.acc[slot] += u32::from(src.data[p]);
                self.acc[slot + 1] += u32::from(src.data[p + 1]);
                self.acc[slot + 2] += u32::from(src.data[p + 2]);
                self.acc[slot + 3] += u32::from(src.data[p + 3]);

                // Coin bas-droit de la cellule : finalisation.
                if (y + 1) % g == 0 && (x + 1) % g == 0 {
                    let avg = Argb::pack(
                        (self.acc[slot + 3] / n) as u8,
                        (self.acc[slot] / n) as u8,
                        (self.acc[slot + 1] / n) as u8,
                        (self.acc[slot + 2] / n) as u8,
                    );
                    let cell = grid.idx(x / g, y / g);
                    grid.density[cell] = density_index(avg.luminance(), density_len) as u16;
                    grid.color[cell] = apply_mode(avg, mode);
                    // Le slot resservira à la bande de cellules suivante.
                    self.acc[slot..slot + 4].fill(0);
                }
            }
        }
    }

    fn name(&self) -> &'static str {
        "scan"
    }
}

#[cfg(test)]
mod tests {
    use cam_core::frame::RgbaFrame;

    use super::*;

    fn frame_of(width: usize, height: usize, quads: &[[u8; 4]]) -> RgbaFrame {
        assert_eq!(quads.len(), width * height);
        let mut data = Vec::with_capacity(width * height * 4);
        for q in quads {
            data.extend_from_slice(q);
        }
        RgbaFrame::from_raw(data, width, height).unwrap()
    }

    fn solid_frame(width: usize, height: usize, q: [u8; 4]) -> RgbaFrame {
        frame_of(width, height, &vec![q; width * height])
    }

    fn run<R: BlockReducer>(
        reducer: &mut R,
        frame: &RgbaFrame,
        cell_px: usize,
        density_len: usize,
        mode: ColorMode,
    ) -> CellGrid {
        let mut grid = CellGrid::new(frame.width / cell_px, frame.height / cell_px);
        reducer.reduce(&frame.view(), cell_px, density_len, mode, &mut grid);
        grid
    }

    #[test]
    fn solid_cells_land_on_expected_densities() {
        // Deux cellules 2×2 : une sombre, une claire.
        let mut quads = vec![[10, 20, 30, 40]; 8];
        for (x, q) in quads.iter_mut().enumerate() {
            if x % 4 >= 2 {
                *q = [200, 150, 100, 50];
            }
        }
        let frame = frame_of(4, 2, &quads);

        for reducer in [
            &mut CellReducer::new() as &mut dyn BlockReducer,
            &mut ScanReducer::new(),
        ] {
            let mut grid = CellGrid::new(2, 1);
            reducer.reduce(&frame.view(), 2, 6, ColorMode::TrueColor, &mut grid);
            assert_eq!(grid.density, vec![5u16, 3], "stratégie {}", reducer.name());
            assert_eq!(grid.color[0], Argb::pack(40, 10, 20, 30));
            assert_eq!(grid.color[1], Argb::pack(50, 200, 150, 100));
        }
    }

    #[test]
    fn black_is_densest_white_is_lightest() {
        let black = solid_frame(4, 4, [0, 0, 0, 255]);
        let white = solid_frame(4, 4, [255, 255, 255, 255]);
        let mut reducer = ScanReducer::new();

        let grid = run(&mut reducer, &black, 2, 6, ColorMode::TrueColor);
        assert!(grid.density.iter().all(|&d| d == 5));

        let grid = run(&mut reducer, &white, 2, 6, ColorMode::TrueColor);
        assert!(grid.density.iter().all(|&d| d == 0));
    }

    #[test]
    fn mixed_cell_averages_with_truncation() {
        // Noir opaque, noir transparent, deux blancs opaques.
        let frame = frame_of(
            2,
            2,
            &[
                [0, 0, 0, 255],
                [0, 0, 0, 0],
                [255, 255, 255, 255],
                [255, 255, 255, 255],
            ],
        );
        let mut reducer = CellReducer::new();
        let grid = run(&mut reducer, &frame, 2, 6, ColorMode::TrueColor);

        assert_eq!(grid.color[0], Argb::pack(191, 127, 127, 127));
        assert_eq!(grid.density, vec![4u16]);
    }

    #[test]
    fn both_strategies_agree_on_gradient() {
        let quads: Vec<[u8; 4]> = (0..48u32)
            .map(|i| [(i * 5) as u8, (i * 11) as u8, (i * 23) as u8, 255])
            .collect();
        let frame = frame_of(8, 6, &quads);

        let mut cell = CellReducer::new();
        let mut scan = ScanReducer::new();
        for mode in [
            ColorMode::TrueColor,
            ColorMode::Fixed {
                foreground: Argb::WHITE,
            },
            ColorMode::Threshold { ratio: 0.875 },
        ] {
            let a = run(&mut cell, &frame, 2, 7, mode);
            let b = run(&mut scan, &frame, 2, 7, mode);
            assert_eq!(a, b);
        }
    }

    #[test]
    fn scan_scratch_does_not_bleed_across_frames() {
        let mut reducer = ScanReducer::new();
        // Première passe large et claire, pour charger le scratch.
        let bright = solid_frame(6, 2, [255, 255, 255, 255]);
        let _ = run(&mut reducer, &bright, 2, 6, ColorMode::TrueColor);

        // Deuxième passe plus étroite et sombre : tout résidu fausserait
        // la moyenne.
        let dim = solid_frame(4, 2, [1, 1, 1, 255]);
        let reused = run(&mut reducer, &dim, 2, 6, ColorMode::TrueColor);
        let fresh = run(&mut ScanReducer::new(), &dim, 2, 6, ColorMode::TrueColor);
        assert_eq!(reused, fresh);
        assert_eq!(reused.color[0], Argb::pack(255, 1, 1, 1));
    }

    #[test]
    fn fixed_mode_paints_every_cell_with_foreground() {
        let fg = Argb::pack(255, 9, 8, 7);
        let frame = solid_frame(4, 2, [200, 60, 20, 255]);
        let mut reducer = CellReducer::new();
        let grid = run(&mut reducer, &frame, 2, 6, ColorMode::Fixed { foreground: fg });
        assert!(grid.color.iter().all(|&c| c == fg));
    }

    #[test]
    fn threshold_mode_applies_at_finalization() {
        let frame = solid_frame(2, 2, [200, 50, 10, 255]);
        let mut reducer = ScanReducer::new();
        let grid = run(&mut reducer, &frame, 2, 6, ColorMode::Threshold { ratio: 0.5 });
        assert_eq!(grid.color[0], Argb::pack(255, 200, 0, 0));
    }

    #[test]
    fn cell_px_one_keeps_every_pixel() {
        let quads = [[10, 0, 0, 255], [0, 20, 0, 255], [0, 0, 30, 255], [40, 40, 40, 255]];
        let frame = frame_of(2, 2, &quads);
        let mut reducer = CellReducer::new();
        let grid = run(&mut reducer, &frame, 1, 6, ColorMode::TrueColor);
        assert_eq!(grid.color[0], Argb::pack(255, 10, 0, 0));
        assert_eq!(grid.color[3], Argb::pack(255, 40, 40, 40));
    }
}
