use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::filter::{self, ColorMode, FilterSpec};
use crate::pixel::Argb;

/// Configuration complète du pipeline de rastérisation.
///
/// Sérialisable en TOML. Chaque champ a une valeur par défaut saine.
///
/// # Example
/// ```
/// use cam_core::config::PipelineConfig;
/// let config = PipelineConfig::default();
/// assert_eq!(config.max_cells_wide, 160);
/// assert_eq!(config.cell_px, 0);
/// ```
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct PipelineConfig {
    // === Filtre ===
    /// Nom du filtre : "white_on_black" | "black_on_white" | "true_color"
    /// | "ansi" | "custom".
    pub filter: String,
    /// Rampe de remplacement, vide = celle du filtre.
    pub ramp: String,
    /// Côté des glyphes de l'atlas en pixels.
    pub glyph_px: usize,
    /// Ratio de seuillage du mode Threshold [0.0, 1.0].
    pub ansi_ratio: f32,

    // === Grille ===
    /// Côté de cellule en pixels source. 0 = adaptatif.
    pub cell_px: usize,
    /// Largeur maximale de la grille en cellules (mode adaptatif).
    pub max_cells_wide: usize,
    /// Hauteur maximale de la grille en cellules (mode adaptatif).
    pub max_cells_high: usize,

    // === Couleur (filtre custom) ===
    /// Couleur d'encre du filtre custom.
    pub foreground: Argb,
    /// Couleur de fond du filtre custom.
    pub background: Argb,

    // === Stratégie ===
    /// Réducteur de blocs à employer.
    pub reducer: ReducerKind,
}

/// Stratégie de réduction des blocs de pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReducerKind {
    /// Cellule par cellule, parallélisé par lignes de cellules.
    Cell,
    /// Balayage séquentiel du cadre en une seule passe.
    #[default]
    Scan,
}

impl ReducerKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Cell => "cell",
            Self::Scan => "scan",
        }
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            filter: "white_on_black".to_string(),
            ramp: String::new(),
            glyph_px: filter::DEFAULT_GLYPH_PX,
            ansi_ratio: filter::ANSI_RATIO,
            cell_px: 0,
            max_cells_wide: 160,
            max_cells_high: 90,
            foreground: Argb::WHITE,
            background: Argb::BLACK,
            reducer: ReducerKind::default(),
        }
    }
}

impl PipelineConfig {
    /// Clamp all numeric fields to their valid ranges.
    /// Called after TOML deserialization to prevent out-of-range values.
    pub fn clamp_all(&mut self) {
        self.glyph_px = self.glyph_px.clamp(2, 64);
        self.ansi_ratio = self.ansi_ratio.clamp(0.0, 1.0);
        // cell_px = 0 signifie adaptatif et reste tel quel.
        self.cell_px = self.cell_px.min(512);
        self.max_cells_wide = self.max_cells_wide.clamp(1, 1024);
        self.max_cells_high = self.max_cells_high.clamp(1, 1024);
    }

    /// Résout la spécification de filtre effective.
    ///
    /// Un nom inconnu retombe sur le filtre custom. Les couleurs configurées
    /// ne s'appliquent qu'au filtre custom, les presets portent les leurs.
    /// Une rampe non vide remplace celle du preset et `ansi_ratio` remplace
    /// le ratio du mode Threshold.
    ///
    /// # Example
    /// ```
    /// use cam_core::config::PipelineConfig;
    /// let mut config = PipelineConfig::default();
    /// config.filter = "ansi".to_string();
    /// assert_eq!(config.filter_spec().ramp, "@BOo.");
    /// ```
    #[must_use]
    pub fn filter_spec(&self) -> FilterSpec {
        let mut spec = match self.filter.as_str() {
            "custom" => FilterSpec::custom(&self.ramp, self.foreground, self.background),
            name => FilterSpec::by_name(name).unwrap_or_else(|| {
                log::warn!("Filtre inconnu : {name}, repli sur le filtre custom");
                FilterSpec::custom(&self.ramp, self.foreground, self.background)
            }),
        };
        if spec.name != "custom" && !self.ramp.is_empty() {
            spec.ramp = self.ramp.clone();
        }
        spec.glyph_px = self.glyph_px;
        if let ColorMode::Threshold { ratio } = &mut spec.mode {
            *ratio = self.ansi_ratio;
        }
        spec
    }
}

/// Structure TOML intermédiaire pour désérialisation avec valeurs optionnelles.
#[derive(Deserialize)]
struct ConfigFile {
    render: RenderSection,
    colors: Option<ColorSection>,
}

/// Render section of the TOML config, all fields optional for partial override.
#[derive(Deserialize)]
struct RenderSection {
    filter: Option<String>,
    ramp: Option<String>,
    glyph_px: Option<usize>,
    ansi_ratio: Option<f32>,
    cell_px: Option<usize>,
    max_cells_wide: Option<usize>,
    max_cells_high: Option<usize>,
    reducer: Option<ReducerKind>,
}

/// Colors section of the TOML config, all fields optional.
#[derive(Deserialize)]
struct ColorSection {
    foreground: Option<Argb>,
    background: Option<Argb>,
}

/// Charge un fichier TOML et fusionne avec les valeurs par défaut.
///
/// # Errors
/// Returns an error if the file cannot be read or parsed.
///
/// # Example
/// ```no_run
/// use cam_core::config::load_config;
/// use std::path::Path;
/// let config = load_config(Path::new("config/default.toml")).unwrap();
/// ```
pub fn load_config(path: &Path) -> Result<PipelineConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Impossible de lire {}", path.display()))?;

    let file: ConfigFile = toml::from_str(&content)
        .with_context(|| format!("Erreur de parsing TOML dans {}", path.display()))?;

    let mut config = PipelineConfig::default();

    let r = file.render;
    if let Some(v) = r.filter {
        config.filter = v;
    }
    if let Some(v) = r.ramp {
        config.ramp = v;
    }
    if let Some(v) = r.glyph_px {
        config.glyph_px = v;
    }
    if let Some(v) = r.ansi_ratio {
        config.ansi_ratio = v;
    }
    if let Some(v) = r.cell_px {
        config.cell_px = v;
    }
    if let Some(v) = r.max_cells_wide {
        config.max_cells_wide = v;
    }
    if let Some(v) = r.max_cells_high {
        config.max_cells_high = v;
    }
    if let Some(v) = r.reducer {
        config.reducer = v;
    }

    if let Some(c) = file.colors {
        if let Some(v) = c.foreground {
            config.foreground = v;
        }
        if let Some(v) = c.background {
            config.background = v;
        }
    }

    config.clamp_all();
    Ok(config)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn write_config(dir: &tempfile::TempDir, body: &str) -> std::path::PathBuf {
        let path = dir.path().join("camscii.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(body.as_bytes()).unwrap();
        path
    }

    #[test]
    fn defaults_are_sane() {
        let config = PipelineConfig::default();
        assert_eq!(config.filter, "white_on_black");
        assert_eq!(config.glyph_px, 10);
        assert_eq!(config.cell_px, 0);
        assert_eq!(config.max_cells_wide, 160);
        assert_eq!(config.max_cells_high, 90);
        assert_eq!(config.reducer, ReducerKind::Scan);
        assert!((config.ansi_ratio - 0.875).abs() < f32::EPSILON);
    }

    #[test]
    fn partial_file_overrides_only_named_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(
            &dir,
            "[render]\nfilter = \"ansi\"\ncell_px = 8\nreducer = \"cell\"\n",
        );

        let config = load_config(&path).unwrap();
        assert_eq!(config.filter, "ansi");
        assert_eq!(config.cell_px, 8);
        assert_eq!(config.reducer, ReducerKind::Cell);
        // Non mentionnés : valeurs par défaut.
        assert_eq!(config.max_cells_wide, 160);
        assert_eq!(config.glyph_px, 10);
    }

    #[test]
    fn colors_section_parses_hex() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(
            &dir,
            "[render]\nfilter = \"custom\"\n\n[colors]\nforeground = \"#FF00FF00\"\nbackground = \"#102030\"\n",
        );

        let config = load_config(&path).unwrap();
        assert_eq!(config.foreground, Argb::pack(255, 0, 255, 0));
        assert_eq!(config.background, Argb::pack(255, 0x10, 0x20, 0x30));
    }

    #[test]
    fn load_clamps_out_of_range_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(
            &dir,
            "[render]\nglyph_px = 1000\nansi_ratio = 9.0\nmax_cells_wide = 0\n",
        );

        let config = load_config(&path).unwrap();
        assert_eq!(config.glyph_px, 64);
        assert!((config.ansi_ratio - 1.0).abs() < f32::EPSILON);
        assert_eq!(config.max_cells_wide, 1);
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(load_config(Path::new("/nonexistent/camscii.toml")).is_err());
    }

    #[test]
    fn filter_spec_resolves_presets() {
        let mut config = PipelineConfig::default();
        config.filter = "ansi".to_string();
        config.ansi_ratio = 0.5;
        let spec = config.filter_spec();
        assert_eq!(spec.name, "ansi");
        assert_eq!(spec.mode, ColorMode::Threshold { ratio: 0.5 });
    }

    #[test]
    fn filter_spec_ramp_override_applies_to_presets() {
        let mut config = PipelineConfig::default();
        config.ramp = "@#. ".to_string();
        let spec = config.filter_spec();
        assert_eq!(spec.name, "white_on_black");
        assert_eq!(spec.ramp, "@#. ");
    }

    #[test]
    fn filter_spec_custom_takes_configured_colors() {
        let mut config = PipelineConfig::default();
        config.filter = "custom".to_string();
        config.foreground = Argb::pack(255, 10, 20, 30);
        let spec = config.filter_spec();
        assert_eq!(
            spec.mode,
            ColorMode::Fixed {
                foreground: Argb::pack(255, 10, 20, 30)
            }
        );
        assert_eq!(spec.ramp, filter::RAMP_DEFAULT_CUSTOM);
    }

    #[test]
    fn filter_spec_unknown_name_falls_back_to_custom() {
        let mut config = PipelineConfig::default();
        config.filter = "sepia".to_string();
        assert_eq!(config.filter_spec().name, "custom");
    }
}
