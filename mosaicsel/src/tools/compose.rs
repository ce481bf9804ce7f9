use std::path::PathBuf;

use anyhow::{Context, Result};
use mosaicsel_core::error::PipelineError;
use mosaicsel_core::schema::{ImageCatalogEntry, OptimizationParameters, TileRecord, TileStatus};
use mosaicsel_pipeline::{compose, persistence};
use mosaicsel_raster::GdalRasterReader;

const DEFAULT_MAX_DAYS: i64 = mosaicsel_core::constants::DEFAULT_TIME_WINDOW_DAYS;

/// Grows candidate mosaics from accepted tiles (spec §4.3), writing the C3
/// artifact `optimization_parameters.json`.
#[derive(clap::Args, Debug)]
#[command(arg_required_else_help = true, disable_version_flag = true)]
pub struct Subcommand {
	/// directory of per-tile JSON records written by `ingest`
	#[arg(long)]
	tiles_dir: PathBuf,

	/// directory of bundle archives `ingest` read from (re-opened to probe cloud-in-overlap)
	#[arg(long)]
	bundles_dir: PathBuf,

	/// where to write `optimization_parameters.json`
	#[arg(long)]
	out: PathBuf,

	/// maximum day gap between a mosaic's base and a candidate tile
	#[arg(long, default_value_t = DEFAULT_MAX_DAYS)]
	max_days: i64,
}

fn catalog_entry(tile: &TileRecord) -> Option<ImageCatalogEntry> {
	Some(ImageCatalogEntry {
		filename: tile.filename.clone(),
		class: tile.class?,
		date: tile.date.clone(),
		orbit: tile.orbit,
		geographic_coverage: tile.geographic_coverage,
		valid_pixels_percentage: tile.valid_pixels_percentage,
		cloud_coverage: tile.cloud_coverage,
		quality_factor: (1.0 - tile.cloud_coverage) * tile.valid_pixels_percentage,
	})
}

pub fn run(args: &Subcommand) -> Result<()> {
	let tiles = persistence::read_tile_records(&args.tiles_dir)
		.with_context(|| format!("cannot read tile records from {}", args.tiles_dir.display()))?;

	let accepted: Vec<TileRecord> = tiles.into_iter().filter(|t| t.status == TileStatus::Accepted).collect();
	if accepted.is_empty() {
		return Err(PipelineError::BadInput(format!("no accepted tiles found in {}", args.tiles_dir.display())).into());
	}

	let image_catalog: Vec<ImageCatalogEntry> = accepted.iter().filter_map(catalog_entry).collect();

	log::info!("composing mosaics from {} accepted tiles", accepted.len());
	let raster_reader = GdalRasterReader;
	let mosaic_groups = compose::compose_mosaics(&accepted, args.max_days, &args.bundles_dir, &raster_reader);
	log::info!("composed {} candidate mosaics", mosaic_groups.len());

	let params = OptimizationParameters { image_catalog, mosaic_groups };
	persistence::write_optimization_parameters(&args.out, &params)?;
	Ok(())
}

#[cfg(test)]
mod tests {
	use crate::tests::run_command;

	#[test]
	fn missing_tiles_dir_fails() {
		let dir = tempfile::tempdir().unwrap();
		let err = run_command(vec![
			"mosaicsel",
			"compose",
			"--tiles-dir",
			dir.path().join("nope").to_str().unwrap(),
			"--bundles-dir",
			dir.path().to_str().unwrap(),
			"--out",
			dir.path().join("out.json").to_str().unwrap(),
		])
		.unwrap_err();
		assert!(err.to_string().contains("cannot read tile records"));
	}
}
