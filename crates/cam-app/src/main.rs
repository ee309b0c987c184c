use std::time::Instant;

use anyhow::{Context, Result};
use cam_atlas::DensityAtlas;
use cam_core::config::{PipelineConfig, ReducerKind, load_config};
use cam_core::frame::RgbaView;
use cam_core::pixel::{Argb, packed_to_rgba};
use cam_raster::geometry;
use cam_raster::pipeline::{FrameRenderer, cell_size_for, cells_for, output_dims};
use clap::Parser;

pub mod cli;

fn main() -> Result<()> {
    // 1. Parser CLI
    let cli = cli::Cli::parse();

    // 2. Initialiser le logging
    env_logger::Builder::new()
        .filter_level(cli.log_level.parse().unwrap_or(log::LevelFilter::Warn))
        .init();

    // 3. Valider les arguments
    cli.validate()?;

    // 4. Charger la config
    let mut config = resolve_config(&cli)?;

    // 4b. Appliquer les overrides CLI
    if let Some(ref filter) = cli.filter {
        config.filter.clone_from(filter);
    }
    if let Some(ref ramp) = cli.ramp {
        config.ramp.clone_from(ramp);
    }
    if let Some(cell_px) = cli.cell_px {
        config.cell_px = cell_px;
    }
    if let Some(glyph_px) = cli.glyph_px {
        config.glyph_px = glyph_px;
    }
    if let Some(ref reducer) = cli.reducer {
        config.reducer = match reducer.as_str() {
            "cell" => ReducerKind::Cell,
            "scan" => ReducerKind::Scan,
            _ => {
                log::warn!("Réducteur inconnu '{reducer}', utilisation du défaut.");
                config.reducer
            }
        };
    }
    config.clamp_all();

    // 5. Exécuter le pipeline
    run(&cli, &config)
}

/// Pipeline une image : chargement, géométrie, rendu, export PNG.
fn run(cli: &cli::Cli, config: &PipelineConfig) -> Result<()> {
    let spec = config.filter_spec();

    // === Étape 1/4 : Chargement de l'image ===
    let start = Instant::now();
    log::info!("Étape 1/4 : Chargement de {}", cli.image.display());
    let img = image::open(&cli.image)
        .with_context(|| format!("Impossible de charger {}", cli.image.display()))?;
    let rgba = img.to_rgba8();
    let (w, h) = rgba.dimensions();
    let mut data = rgba.into_raw();
    let mut width = w as usize;
    let mut height = h as usize;
    log::info!(
        "Image {width}×{height} chargée en {:.1} ms",
        start.elapsed().as_secs_f64() * 1000.0
    );

    // === Étape 2/4 : Géométrie ===
    let start = Instant::now();
    log::info!(
        "Étape 2/4 : Géométrie ({} quart(s) de tour, miroir {})",
        cli.rotate,
        cli.mirror
    );
    for _ in 0..cli.rotate {
        let mut rotated = vec![0u8; data.len()];
        geometry::rotate90_bytes(&data, width, height, &mut rotated);
        data = rotated;
        std::mem::swap(&mut width, &mut height);
    }
    if cli.mirror {
        let mut mirrored = vec![0u8; data.len()];
        geometry::mirror_bytes(&data, width, height, &mut mirrored);
        data = mirrored;
    }

    let cell_px = if config.cell_px == 0 {
        cell_size_for(width, height, config.max_cells_wide, config.max_cells_high)
    } else {
        config.cell_px
    };
    let cells_wide = cells_for(width, cell_px);
    let cells_high = cells_for(height, cell_px);
    if cells_wide == 0 || cells_high == 0 {
        anyhow::bail!("Image {width}×{height} trop petite pour des cellules de {cell_px} px.");
    }

    // Recadrage aux multiples entiers de cellule.
    let crop_w = cells_wide * cell_px;
    let crop_h = cells_high * cell_px;
    if crop_w != width || crop_h != height {
        let mut cropped = vec![0u8; crop_w * crop_h * 4];
        geometry::crop_bytes(&data, width, height, crop_w, crop_h, &mut cropped);
        data = cropped;
        width = crop_w;
        height = crop_h;
    }
    log::info!(
        "Grille {cells_wide}×{cells_high}, cellule {cell_px} px, en {:.1} ms",
        start.elapsed().as_secs_f64() * 1000.0
    );

    // === Étape 3/4 : Atlas et rendu ===
    let start = Instant::now();
    log::info!(
        "Étape 3/4 : Rendu (filtre {}, rampe de {} glyphes)",
        spec.name,
        spec.density_len()
    );
    let font_data = std::fs::read(&cli.font)
        .with_context(|| format!("Impossible de lire {}", cli.font.display()))?;
    let atlas = DensityAtlas::from_font(&font_data, &spec.ramp, spec.glyph_px)?;

    let frame = RgbaView::new(&data, width, height);
    let (out_w, out_h) = output_dims(cells_wide, cells_high, spec.glyph_px);
    let mut out = vec![Argb::TRANSPARENT; out_w * out_h];
    let mut renderer = FrameRenderer::new(config.reducer);
    renderer.render(&frame, cell_px, &spec, atlas.view(), &mut out);
    log::info!(
        "Rendu {out_w}×{out_h} en {:.1} ms",
        start.elapsed().as_secs_f64() * 1000.0
    );

    // === Étape 4/4 : Export PNG ===
    let start = Instant::now();
    log::info!("Étape 4/4 : Export vers {}", cli.output.display());
    let mut raw = vec![0u8; out.len() * 4];
    packed_to_rgba(&out, &mut raw);
    image::save_buffer(
        &cli.output,
        &raw,
        out_w as u32,
        out_h as u32,
        image::ExtendedColorType::Rgba8,
    )
    .with_context(|| format!("Impossible d'écrire {}", cli.output.display()))?;
    log::info!(
        "Export réussi en {:.1} ms",
        start.elapsed().as_secs_f64() * 1000.0
    );

    Ok(())
}

/// Resolve config: missing file falls back to defaults with a warning.
fn resolve_config(cli: &cli::Cli) -> Result<PipelineConfig> {
    if cli.config.exists() {
        load_config(&cli.config)
    } else {
        log::warn!(
            "Config introuvable : {}. Utilisation des défauts.",
            cli.config.display()
        );
        Ok(PipelineConfig::default())
    }
}
