use serde::{Deserialize, Serialize};

use crate::pixel::Argb;

/// Ratio de seuillage par défaut du mode ANSI.
pub const ANSI_RATIO: f32 = 7.0 / 8.0;

/// Rampe du filtre blanc sur noir.
pub const RAMP_WHITE_ON_BLACK: &str = "@BOo:.";
/// Rampe du filtre noir sur blanc.
pub const RAMP_BLACK_ON_WHITE: &str = ".:oOB@";
/// Rampe du filtre couleur d'origine.
pub const RAMP_TRUE_COLOR: &str = "Ñ@#";
/// Rampe du filtre ANSI.
pub const RAMP_ANSI: &str = "@BOo.";
/// Rampe par défaut des filtres custom.
pub const RAMP_DEFAULT_CUSTOM: &str = ".,:oOB@";

/// Taille de glyphe par défaut en pixels.
pub const DEFAULT_GLYPH_PX: usize = 10;

/// Source de couleur d'une cellule, décidée à la finalisation de la moyenne.
///
/// Variantes fermées et matchées exhaustivement : pas de drapeau numérique.
///
/// # Example
/// ```
/// use cam_core::filter::ColorMode;
/// use cam_core::pixel::Argb;
/// let mode = ColorMode::Fixed { foreground: Argb::WHITE };
/// assert!(matches!(mode, ColorMode::Fixed { .. }));
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Deserialize, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum ColorMode {
    /// Couleur fixe fournie par l'appelant, identique pour toutes les cellules.
    Fixed {
        /// Couleur de premier plan partagée.
        foreground: Argb,
    },
    /// Couleur moyenne de la cellule, inchangée.
    TrueColor,
    /// Canaux dominants seuls : tout canal sous `max(r,g,b) × ratio` est mis
    /// à zéro. Rendu posterisé haute saturation.
    Threshold {
        /// Constante de réglage dans [0.0, 1.0].
        ratio: f32,
    },
}

/// Spécification complète d'un filtre de rendu : rampe, taille de glyphe,
/// mode couleur et fond.
///
/// La rampe porte la polarité visuelle : son indice 0 est le glyphe affiché
/// pour une cellule claire (`"@BOo:."` pour de l'encre claire sur fond
/// sombre, `".:oOB@"` pour l'inverse).
///
/// # Example
/// ```
/// use cam_core::filter::FilterSpec;
/// let spec = FilterSpec::white_on_black();
/// assert_eq!(spec.ramp, "@BOo:.");
/// assert_eq!(spec.density_len(), 6);
/// ```
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct FilterSpec {
    /// Nom du filtre.
    pub name: String,
    /// Rampe de densité, indice 0 = cellule la plus claire.
    pub ramp: String,
    /// Côté des glyphes de l'atlas en pixels.
    pub glyph_px: usize,
    /// Mode de couleur par cellule.
    pub mode: ColorMode,
    /// Couleur de fond.
    pub background: Argb,
}

impl FilterSpec {
    /// Encre blanche sur fond noir.
    #[must_use]
    pub fn white_on_black() -> Self {
        Self {
            name: "white_on_black".to_string(),
            ramp: RAMP_WHITE_ON_BLACK.to_string(),
            glyph_px: DEFAULT_GLYPH_PX,
            mode: ColorMode::Fixed {
                foreground: Argb::WHITE,
            },
            background: Argb::BLACK,
        }
    }

    /// Encre noire sur fond blanc.
    #[must_use]
    pub fn black_on_white() -> Self {
        Self {
            name: "black_on_white".to_string(),
            ramp: RAMP_BLACK_ON_WHITE.to_string(),
            glyph_px: DEFAULT_GLYPH_PX,
            mode: ColorMode::Fixed {
                foreground: Argb::BLACK,
            },
            background: Argb::WHITE,
        }
    }

    /// Couleur moyenne de chaque cellule sur fond noir.
    #[must_use]
    pub fn true_color() -> Self {
        Self {
            name: "true_color".to_string(),
            ramp: RAMP_TRUE_COLOR.to_string(),
            glyph_px: DEFAULT_GLYPH_PX,
            mode: ColorMode::TrueColor,
            background: Argb::BLACK,
        }
    }

    /// Posterisation des canaux dominants sur fond noir.
    #[must_use]
    pub fn ansi() -> Self {
        Self {
            name: "ansi".to_string(),
            ramp: RAMP_ANSI.to_string(),
            glyph_px: DEFAULT_GLYPH_PX,
            mode: ColorMode::Threshold { ratio: ANSI_RATIO },
            background: Argb::BLACK,
        }
    }

    /// Filtre custom à couleur fixe.
    ///
    /// # Example
    /// ```
    /// use cam_core::filter::FilterSpec;
    /// use cam_core::pixel::Argb;
    /// let spec = FilterSpec::custom("", Argb::WHITE, Argb::BLACK);
    /// assert_eq!(spec.ramp, ".,:oOB@");
    /// ```
    #[must_use]
    pub fn custom(ramp: &str, foreground: Argb, background: Argb) -> Self {
        let ramp = if ramp.is_empty() {
            RAMP_DEFAULT_CUSTOM
        } else {
            ramp
        };
        Self {
            name: "custom".to_string(),
            ramp: ramp.to_string(),
            glyph_px: DEFAULT_GLYPH_PX,
            mode: ColorMode::Fixed { foreground },
            background,
        }
    }

    /// Préset par nom, `None` si inconnu.
    ///
    /// # Example
    /// ```
    /// use cam_core::filter::FilterSpec;
    /// assert!(FilterSpec::by_name("ansi").is_some());
    /// assert!(FilterSpec::by_name("sepia").is_none());
    /// ```
    #[must_use]
    pub fn by_name(name: &str) -> Option<Self> {
        match name {
            "white_on_black" => Some(Self::white_on_black()),
            "black_on_white" => Some(Self::black_on_white()),
            "true_color" => Some(Self::true_color()),
            "ansi" => Some(Self::ansi()),
            "custom" => Some(Self::custom("", Argb::WHITE, Argb::BLACK)),
            _ => None,
        }
    }

    /// Longueur de la rampe en glyphes.
    #[must_use]
    pub fn density_len(&self) -> usize {
        self.ramp.chars().count()
    }
}
