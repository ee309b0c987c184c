use std::path::PathBuf;

use clap::Parser;

/// camSCII — Colorized ASCII-art rasterizer.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Source : chemin vers une image (PNG, JPEG, BMP, GIF).
    #[arg(long)]
    pub image: PathBuf,

    /// Police TrueType ou OpenType pour rastériser la rampe.
    #[arg(long)]
    pub font: PathBuf,

    /// Fichier PNG de sortie.
    #[arg(short, long, default_value = "ascii.png")]
    pub output: PathBuf,

    /// Fichier de configuration TOML. Défaut : config/default.toml.
    #[arg(short, long, default_value = "config/default.toml")]
    pub config: PathBuf,

    /// Filtre : white_on_black, black_on_white, true_color, ansi, custom.
    #[arg(long)]
    pub filter: Option<String>,

    /// Rampe de remplacement, premier glyphe pour la cellule la plus claire.
    #[arg(long)]
    pub ramp: Option<String>,

    /// Côté de cellule en pixels source. 0 = adaptatif.
    #[arg(long)]
    pub cell_px: Option<usize>,

    /// Côté des glyphes de l'atlas en pixels.
    #[arg(long)]
    pub glyph_px: Option<usize>,

    /// Stratégie de réduction : cell ou scan.
    #[arg(long)]
    pub reducer: Option<String>,

    /// Quarts de tour horaires appliqués avant le rendu (0 à 3).
    #[arg(long, default_value_t = 0)]
    pub rotate: u8,

    /// Miroir horizontal appliqué après la rotation.
    #[arg(long, default_value_t = false)]
    pub mirror: bool,

    /// Niveau de log : error, warn, info, debug, trace.
    #[arg(long, default_value = "warn")]
    pub log_level: String,
}

impl Cli {
    /// Validate the argument ranges clap does not express.
    ///
    /// # Errors
    /// Returns an error if `--rotate` exceeds three quarter turns.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.rotate > 3 {
            anyhow::bail!(
                "--rotate accepte 0 à 3 quarts de tour, reçu {}.",
                self.rotate
            );
        }
        Ok(())
    }
}
