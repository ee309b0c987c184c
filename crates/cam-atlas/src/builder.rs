//! Construction d'atlas de densité : bitmaps de glyphes en ordre de rampe.

use ab_glyph::{Font, FontRef, PxScale, point};
use anyhow::{Context, Result, bail};
use cam_core::error::CoreError;
use cam_core::frame::GlyphAtlas;

/// Atlas de glyphes possédé : `density_len` bitmaps de `glyph_px × glyph_px`
/// octets concaténés en ordre de rampe, octet non nul = encre.
///
/// L'indice 0 correspond au premier caractère de la rampe, donc au glyphe
/// affiché pour la cellule la plus claire. Le compositeur consomme la vue
/// empruntée retournée par [`DensityAtlas::view`].
pub struct DensityAtlas {
    data: Vec<u8>,
    glyph_px: usize,
    density_len: usize,
}

impl DensityAtlas {
    /// Rastérise chaque caractère de la rampe dans une case carrée, boîte
    /// d'encre centrée sur les deux axes.
    ///
    /// Les octets stockés portent la couverture anti-aliasée (0 à 255) ; le
    /// compositeur ne regarde que nul / non nul.
    ///
    /// # Errors
    /// Police illisible, rampe vide, côté nul ou caractère absent de la
    /// police.
    ///
    /// # Example
    /// ```no_run
    /// use cam_atlas::DensityAtlas;
    /// let font = std::fs::read("fonts/DejaVuSansMono.ttf").unwrap();
    /// let atlas = DensityAtlas::from_font(&font, "@BOo:.", 10).unwrap();
    /// assert_eq!(atlas.density_len(), 6);
    /// ```
    pub fn from_font(font_data: &[u8], ramp: &str, glyph_px: usize) -> Result<Self> {
        if ramp.is_empty() {
            bail!("Rampe de densité vide");
        }
        if glyph_px == 0 {
            bail!("Côté de glyphe nul");
        }
        let font = FontRef::try_from_slice(font_data).context("Police illisible")?;
        let scale = PxScale::from(glyph_px as f32);
        let size = glyph_px * glyph_px;

        let density_len = ramp.chars().count();
        let mut data = vec![0u8; density_len * size];

        let ascent_px = font.ascent_unscaled() * scale.y / font.height_unscaled();

        for (slot, ch) in data.chunks_exact_mut(size).zip(ramp.chars()) {
            // glyph_id 0 = .notdef : la rampe ne peut pas être honorée.
            let gid = font.glyph_id(ch);
            if gid.0 == 0 {
                bail!("Glyphe absent de la police : {ch:?}");
            }

            let glyph = gid.with_scale_and_position(scale, point(0.0, ascent_px));
            // Espace ou tracé vide : case laissée à zéro.
            let Some(outline) = font.outline_glyph(glyph) else {
                continue;
            };

            let bounds = outline.px_bounds();
            let ink_w = (bounds.max.x - bounds.min.x).ceil() as i32;
            let ink_h = (bounds.max.y - bounds.min.y).ceil() as i32;
            #[allow(clippy::cast_possible_wrap)]
            let side = glyph_px as i32;
            let ox = (side - ink_w) / 2;
            let oy = (side - ink_h) / 2;

            #[allow(clippy::cast_possible_wrap)]
            outline.draw(|x, y, v| {
                let px = x as i32 + ox;
                let py = y as i32 + oy;
                if (0..side).contains(&px) && (0..side).contains(&py) {
                    slot[py as usize * glyph_px + px as usize] = (v * 255.0).round() as u8;
                }
            });
        }

        log::debug!("Atlas rastérisé : {density_len} glyphes de {glyph_px} px");
        Ok(Self {
            data,
            glyph_px,
            density_len,
        })
    }

    /// Enveloppe un atlas précalculé après vérification de sa taille.
    ///
    /// # Errors
    /// `CoreError::AtlasTooShort` si `data` ne couvre pas
    /// `density_len × glyph_px²` octets.
    ///
    /// # Example
    /// ```
    /// use cam_atlas::DensityAtlas;
    /// let atlas = DensityAtlas::from_raw(vec![1, 0, 0, 1, 0, 0, 0, 0], 2, 2).unwrap();
    /// assert_eq!(atlas.view().glyph(0), &[1, 0, 0, 1]);
    /// ```
    pub fn from_raw(data: Vec<u8>, glyph_px: usize, density_len: usize) -> Result<Self, CoreError> {
        let needed = density_len * glyph_px * glyph_px;
        if data.len() < needed {
            return Err(CoreError::AtlasTooShort {
                needed,
                actual: data.len(),
            });
        }
        Ok(Self {
            data,
            glyph_px,
            density_len,
        })
    }

    /// Vue empruntée pour le compositeur.
    #[must_use]
    pub fn view(&self) -> GlyphAtlas<'_> {
        GlyphAtlas::new(&self.data, self.glyph_px, self.density_len)
    }

    /// Côté d'un glyphe en pixels.
    #[must_use]
    pub fn glyph_px(&self) -> usize {
        self.glyph_px
    }

    /// Nombre de glyphes de la rampe.
    #[must_use]
    pub fn density_len(&self) -> usize {
        self.density_len
    }
}
