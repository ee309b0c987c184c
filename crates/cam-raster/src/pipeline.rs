//! Orchestration d'une frame : géométrie de grille, réduction, composition.

use cam_core::config::ReducerKind;
use cam_core::filter::{ColorMode, FilterSpec};
use cam_core::frame::{CellGrid, GlyphAtlas, RgbaView};
use cam_core::pixel::Argb;

use crate::compositor::{composite, composite_fixed};
use crate::reduce::{BlockReducer, CellReducer, ScanReducer};

/// Côté de cellule adaptatif : le plus petit côté qui fait tenir la source
/// dans la grille maximale. La division plafonnante garantit que la grille
/// résultante respecte strictement les bornes demandées.
///
/// # Example
/// ```
/// use cam_raster::pipeline::cell_size_for;
/// assert_eq!(cell_size_for(640, 480, 160, 90), 6);
/// assert_eq!(cell_size_for(100, 50, 160, 90), 1);
/// ```
#[must_use]
pub fn cell_size_for(
    source_w: usize,
    source_h: usize,
    max_cells_wide: usize,
    max_cells_high: usize,
) -> usize {
    debug_assert!(max_cells_wide > 0 && max_cells_high > 0, "grille maximale vide");
    source_w
        .div_ceil(max_cells_wide)
        .max(source_h.div_ceil(max_cells_high))
        .max(1)
}

/// Nombre de cellules entières couvrant une dimension, troncature vers zéro.
#[must_use]
pub fn cells_for(dim: usize, cell_px: usize) -> usize {
    debug_assert!(cell_px > 0, "côté de cellule nul");
    dim / cell_px
}

/// Dimensions du tampon de sortie pour une grille et un côté de glyphe.
#[must_use]
pub fn output_dims(cells_wide: usize, cells_high: usize, glyph_px: usize) -> (usize, usize) {
    (cells_wide * glyph_px, cells_high * glyph_px)
}

/// Moteur de rendu d'une frame : détient les deux réducteurs et la grille
/// de travail réutilisée d'un appel à l'autre.
///
/// Une fois la géométrie stable, `render` n'alloue plus.
///
/// # Example
/// ```
/// use cam_core::config::ReducerKind;
/// use cam_core::filter::FilterSpec;
/// use cam_core::frame::{GlyphAtlas, RgbaFrame};
/// use cam_core::pixel::Argb;
/// use cam_raster::pipeline::FrameRenderer;
///
/// let mut spec = FilterSpec::white_on_black();
/// spec.glyph_px = 2;
/// let atlas_bytes = vec![1u8; 4 * spec.density_len()];
/// let atlas = GlyphAtlas::new(&atlas_bytes, 2, spec.density_len());
///
/// let frame = RgbaFrame::new(4, 2);
/// let mut out = vec![Argb::TRANSPARENT; 4 * 2];
/// let mut renderer = FrameRenderer::new(ReducerKind::Scan);
/// renderer.render(&frame.view(), 2, &spec, atlas, &mut out);
/// ```
pub struct FrameRenderer {
    cell: CellReducer,
    scan: ScanReducer,
    strategy: ReducerKind,
    grid: CellGrid,
}

impl FrameRenderer {
    /// Crée un moteur avec la stratégie de réduction donnée.
    #[must_use]
    pub fn new(strategy: ReducerKind) -> Self {
        Self {
            cell: CellReducer::new(),
            scan: ScanReducer::new(),
            strategy,
            grid: CellGrid::new(0, 0),
        }
    }

    /// Réduit la source puis compose le tampon de sortie.
    ///
    /// CONTRAT : les dimensions de la source sont des multiples de
    /// `cell_px` (l'appelant recadre d'abord), l'atlas est accordé au
    /// filtre et `out` couvre `cells_wide·glyph_px × cells_high·glyph_px`
    /// pixels.
    ///
    /// # Panics
    /// Si `out` est mal dimensionné pour la grille et l'atlas.
    pub fn render(
        &mut self,
        src: &RgbaView<'_>,
        cell_px: usize,
        spec: &FilterSpec,
        atlas: GlyphAtlas<'_>,
        out: &mut [Argb],
    ) {
        debug_assert_eq!(atlas.glyph_px(), spec.glyph_px, "atlas et filtre désaccordés");
        debug_assert_eq!(atlas.density_len(), spec.density_len(), "atlas et rampe désaccordés");

        let cells_wide = cells_for(src.width, cell_px);
        let cells_high = cells_for(src.height, cell_px);
        self.grid.resize(cells_wide, cells_high);

        let Self {
            cell,
            scan,
            strategy,
            grid,
        } = self;
        let reducer: &mut dyn BlockReducer = match strategy {
            ReducerKind::Cell => cell,
            ReducerKind::Scan => scan,
        };
        log::debug!(
            "Réduction {} : grille {cells_wide}×{cells_high}, cellule {cell_px} px",
            reducer.name()
        );
        reducer.reduce(src, cell_px, spec.density_len(), spec.mode, grid);

        match spec.mode {
            ColorMode::Fixed { foreground } => {
                composite_fixed(grid, atlas, foreground, spec.background, out);
            }
            ColorMode::TrueColor | ColorMode::Threshold { .. } => {
                composite(grid, atlas, spec.background, out);
            }
        }
    }
}
