use std::path::PathBuf;

use anyhow::{Context, Result};
use mosaicsel_core::error::PipelineError;
use mosaicsel_core::schema::TileStatus;
use mosaicsel_geometry::{Crs, load_aoi, reproject_polygon};
use mosaicsel_pipeline::{ingest, persistence};
use mosaicsel_raster::GdalRasterReader;
use rayon::prelude::*;

/// Ingest every bundle in a directory against an AOI (spec §4.2), writing
/// one per-tile JSON record per bundle.
#[derive(clap::Args, Debug)]
#[command(arg_required_else_help = true, disable_version_flag = true)]
pub struct Subcommand {
	/// vector file holding the area-of-interest polygon (any embedded CRS; a missing CRS falls back to WGS84)
	#[arg(long)]
	aoi: PathBuf,

	/// directory of Sentinel-2 L2A bundle archives to ingest
	#[arg(long)]
	bundles_dir: PathBuf,

	/// directory to write one JSON tile record into per bundle
	#[arg(long)]
	tiles_dir: PathBuf,
}

pub fn run(args: &Subcommand) -> Result<()> {
	let aoi_native = load_aoi(&args.aoi, &Crs::wgs84())?;
	let aoi_wgs84 = reproject_polygon(&aoi_native, &Crs::wgs84())?;

	let bundles: Vec<PathBuf> = std::fs::read_dir(&args.bundles_dir)
		.with_context(|| format!("cannot read bundles directory {}", args.bundles_dir.display()))?
		.filter_map(|entry| entry.ok())
		.map(|entry| entry.path())
		.filter(|path| path.is_file())
		.collect();

	if bundles.is_empty() {
		return Err(PipelineError::BadInput(format!("no bundle files found in {}", args.bundles_dir.display())).into());
	}

	log::info!("ingesting {} bundles against {}", bundles.len(), args.aoi.display());

	let raster_reader = GdalRasterReader;
	let records: Vec<_> = bundles.par_iter().map(|path| ingest::ingest_tile(path, &aoi_wgs84, &raster_reader)).collect();

	let (mut accepted, mut rejected, mut errored) = (0usize, 0usize, 0usize);
	for record in &records {
		record.debug_assert_invariants();
		match record.status {
			TileStatus::Accepted => accepted += 1,
			TileStatus::Rejected => rejected += 1,
			TileStatus::Error => errored += 1,
		}
		persistence::write_tile_record(&args.tiles_dir, record)?;
	}

	log::info!("ingested {accepted} accepted, {rejected} rejected, {errored} errored into {}", args.tiles_dir.display());
	Ok(())
}
