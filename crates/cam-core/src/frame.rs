use crate::error::CoreError;
use crate::pixel::Argb;

/// Buffer de frame possédé, RGBA row-major, 4 octets par pixel.
///
/// Pré-alloué par l'hôte ; le pipeline ne travaille que sur des vues
/// empruntées (`RgbaView`).
///
/// # Example
/// ```
/// use cam_core::frame::RgbaFrame;
/// let frame = RgbaFrame::new(10, 10);
/// assert_eq!(frame.data.len(), 400);
/// ```
pub struct RgbaFrame {
    /// Pixels RGBA, row-major, 4 octets par pixel.
    pub data: Vec<u8>,
    /// Width in pixels.
    pub width: usize,
    /// Height in pixels.
    pub height: usize,
}

impl RgbaFrame {
    /// Crée un buffer zéroisé aux dimensions données.
    #[must_use]
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            data: vec![0u8; width * height * 4],
            width,
            height,
        }
    }

    /// Adopte un buffer existant après vérification de sa taille.
    ///
    /// # Errors
    /// `CoreError::InvalidDimensions` si `data.len() != width × height × 4`.
    ///
    /// # Example
    /// ```
    /// use cam_core::frame::RgbaFrame;
    /// let frame = RgbaFrame::from_raw(vec![0u8; 16], 2, 2).unwrap();
    /// assert_eq!(frame.width, 2);
    /// assert!(RgbaFrame::from_raw(vec![0u8; 15], 2, 2).is_err());
    /// ```
    pub fn from_raw(data: Vec<u8>, width: usize, height: usize) -> Result<Self, CoreError> {
        if data.len() != width * height * 4 {
            return Err(CoreError::InvalidDimensions { width, height });
        }
        Ok(Self {
            data,
            width,
            height,
        })
    }

    /// Accès au pixel (x, y) → (r, g, b, a).
    ///
    /// # Example
    /// ```
    /// use cam_core::frame::RgbaFrame;
    /// let frame = RgbaFrame::new(4, 4);
    /// assert_eq!(frame.pixel(0, 0), (0, 0, 0, 0));
    /// ```
    #[inline(always)]
    #[must_use]
    pub fn pixel(&self, x: usize, y: usize) -> (u8, u8, u8, u8) {
        debug_assert!(x < self.width && y < self.height, "pixel hors limites");
        let idx = (y * self.width + x) * 4;
        (
            self.data[idx],
            self.data[idx + 1],
            self.data[idx + 2],
            self.data[idx + 3],
        )
    }

    /// Vue empruntée sur l'intégralité de la frame.
    #[must_use]
    pub fn view(&self) -> RgbaView<'_> {
        RgbaView::new(&self.data, self.width, self.height)
    }
}

/// Vue empruntée sur un buffer RGBA appartenant à l'appelant.
///
/// Le pipeline ne lit qu'à travers cette vue pendant la durée d'un appel ;
/// aucune allocation, aucun pointeur retenu après retour.
///
/// # Example
/// ```
/// use cam_core::frame::RgbaView;
/// let data = [0u8; 16];
/// let view = RgbaView::new(&data, 2, 2);
/// assert_eq!(view.width, 2);
/// ```
#[derive(Clone, Copy)]
pub struct RgbaView<'a> {
    /// Pixels RGBA, row-major, 4 octets par pixel.
    pub data: &'a [u8],
    /// Width in pixels.
    pub width: usize,
    /// Height in pixels.
    pub height: usize,
}

impl<'a> RgbaView<'a> {
    /// Construit une vue sur un buffer dont l'appelant garantit la taille.
    #[must_use]
    pub fn new(data: &'a [u8], width: usize, height: usize) -> Self {
        debug_assert_eq!(
            data.len(),
            width * height * 4,
            "buffer source mal dimensionné"
        );
        Self {
            data,
            width,
            height,
        }
    }
}

/// Grille de cellules : deux tableaux denses parallèles, row-major.
///
/// `density[i]` est l'indice de rampe de la cellule i, `color[i]` sa couleur
/// empaquetée. Invariant : les deux tableaux ont toujours la même longueur.
///
/// # Example
/// ```
/// use cam_core::frame::CellGrid;
/// let grid = CellGrid::new(8, 6);
/// assert_eq!(grid.density.len(), 48);
/// assert_eq!(grid.color.len(), 48);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CellGrid {
    /// Largeur en cellules.
    pub cells_wide: usize,
    /// Hauteur en cellules.
    pub cells_high: usize,
    /// Indice de rampe par cellule, dans `[0, density_len)`.
    pub density: Vec<u16>,
    /// Couleur empaquetée par cellule.
    pub color: Vec<Argb>,
}

impl CellGrid {
    /// Crée une grille pré-allouée.
    #[must_use]
    pub fn new(cells_wide: usize, cells_high: usize) -> Self {
        let len = cells_wide * cells_high;
        Self {
            cells_wide,
            cells_high,
            density: vec![0; len],
            color: vec![Argb::TRANSPARENT; len],
        }
    }

    /// Indice linéaire de la cellule (cx, cy).
    ///
    /// # Example
    /// ```
    /// use cam_core::frame::CellGrid;
    /// let grid = CellGrid::new(5, 3);
    /// assert_eq!(grid.idx(2, 1), 7);
    /// ```
    #[inline(always)]
    #[must_use]
    pub fn idx(&self, cx: usize, cy: usize) -> usize {
        debug_assert!(cx < self.cells_wide && cy < self.cells_high, "cellule hors grille");
        cx + self.cells_wide * cy
    }

    /// Nombre de cellules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.density.len()
    }

    /// Vrai si la grille ne contient aucune cellule.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.density.is_empty()
    }

    /// Redimensionne la grille sans réallouer quand la géométrie est stable.
    ///
    /// Les contenus ne sont pas remis à zéro : chaque réduction réécrit
    /// toutes les cellules.
    pub fn resize(&mut self, cells_wide: usize, cells_high: usize) {
        let len = cells_wide * cells_high;
        self.cells_wide = cells_wide;
        self.cells_high = cells_high;
        self.density.resize(len, 0);
        self.color.resize(len, Argb::TRANSPARENT);
    }
}

/// Vue validée sur un atlas de glyphes plat.
///
/// `density_len` bitmaps de `glyph_px × glyph_px` octets concaténés en ordre
/// de rampe. Octet nul = fond, non nul = encre. L'indice 0 contient le glyphe
/// affiché pour la cellule la plus claire.
///
/// # Example
/// ```
/// use cam_core::frame::GlyphAtlas;
/// let bytes = [1u8, 0, 0, 1, 0, 0, 0, 0];
/// let atlas = GlyphAtlas::new(&bytes, 2, 2);
/// assert_eq!(atlas.glyph(0), &[1, 0, 0, 1]);
/// ```
#[derive(Clone, Copy)]
pub struct GlyphAtlas<'a> {
    data: &'a [u8],
    glyph_px: usize,
    density_len: usize,
}

impl<'a> GlyphAtlas<'a> {
    /// Construit la vue en vérifiant que le buffer couvre tous les glyphes.
    ///
    /// # Panics
    /// Si `data` est plus court que `density_len × glyph_px²`, pour refuser
    /// bruyamment un atlas qui ferait lire le compositeur hors limites.
    #[must_use]
    pub fn new(data: &'a [u8], glyph_px: usize, density_len: usize) -> Self {
        let needed = density_len * glyph_px * glyph_px;
        assert!(
            data.len() >= needed,
            "Atlas de glyphes trop court : {needed} octets requis, {} disponibles",
            data.len()
        );
        Self {
            data,
            glyph_px,
            density_len,
        }
    }

    /// Bitmap du glyphe à l'indice de rampe donné.
    #[inline(always)]
    #[must_use]
    pub fn glyph(&self, index: usize) -> &'a [u8] {
        debug_assert!(index < self.density_len, "indice de glyphe hors rampe");
        let size = self.glyph_px * self.glyph_px;
        &self.data[index * size..(index + 1) * size]
    }

    /// Côté d'un glyphe en pixels.
    #[inline(always)]
    #[must_use]
    pub fn glyph_px(&self) -> usize {
        self.glyph_px
    }

    /// Nombre de glyphes de la rampe.
    #[inline(always)]
    #[must_use]
    pub fn density_len(&self) -> usize {
        self.density_len
    }
}
