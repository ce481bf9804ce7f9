use std::collections::HashMap;
use std::path::PathBuf;

use anyhow::{Context, Result};
use mosaicsel_core::schema::{MilpVariant, Selection, SelectionDiagnostics, TileRecord};
use mosaicsel_geometry::{Crs, GeometryOps, load_aoi};
use mosaicsel_pipeline::{area, persistence, select};

/// Enriches C3's candidate mosaics with precise area/cloud metrics (spec
/// §4.4) and runs the MILP selector over them (spec §4.5), writing the
/// selection output and its diagnostics.
#[derive(clap::Args, Debug)]
#[command(arg_required_else_help = true, disable_version_flag = true)]
pub struct Subcommand {
	/// vector file holding the area-of-interest polygon used for area enrichment
	#[arg(long)]
	aoi: PathBuf,

	/// directory of per-tile JSON records written by `ingest`
	#[arg(long)]
	tiles_dir: PathBuf,

	/// `optimization_parameters.json` written by `compose`
	#[arg(long)]
	params: PathBuf,

	/// where to write the selection output
	#[arg(long)]
	out: PathBuf,

	/// where to write the C4-enriched `*-precalc.json` artifact (defaults next to `--out`)
	#[arg(long)]
	precalc_out: Option<PathBuf>,

	/// where to write solver diagnostics (defaults next to `--out`)
	#[arg(long)]
	diagnostics: Option<PathBuf>,

	/// which MILP formulation to solve (spec §4.5, §9)
	#[arg(long, value_enum, default_value = "linearized-coverage-floor")]
	variant: MilpVariant,
}

fn sibling(path: &std::path::Path, file_name: &str) -> PathBuf {
	path.parent().map(|parent| parent.join(file_name)).unwrap_or_else(|| PathBuf::from(file_name))
}

pub fn run(args: &Subcommand) -> Result<()> {
	let mut params = persistence::read_optimization_parameters(&args.params)
		.with_context(|| format!("cannot read optimization parameters from {}", args.params.display()))?;

	let tile_records = persistence::read_tile_records(&args.tiles_dir)
		.with_context(|| format!("cannot read tile records from {}", args.tiles_dir.display()))?;
	let tiles: HashMap<String, &TileRecord> = tile_records.iter().map(|t| (t.filename.clone(), t)).collect();

	let aoi = load_aoi(&args.aoi, &Crs::wgs84())?;
	let aoi_area = aoi.area();

	log::info!("enriching {} candidate mosaics with area metrics", params.mosaic_groups.len());
	area::enrich_mosaics(&mut params.mosaic_groups, &tiles, &aoi);

	let precalc_out = args.precalc_out.clone().unwrap_or_else(|| sibling(&args.out, "precalc.json"));
	persistence::write_precalc(&precalc_out, &params)?;

	let outcome = select::solve(&params.mosaic_groups, &tiles, args.variant, aoi_area)?;
	if outcome.infeasible {
		log::warn!("mosaic selection model is infeasible; writing an empty selection");
	}

	let selected_mosaics: Vec<_> =
		params.mosaic_groups.iter().filter(|mosaic| outcome.selected.contains(&mosaic.group_id)).cloned().collect();

	let witness = select::validate_selection(&selected_mosaics, &tiles, args.variant.ijk_definition(), aoi_area);

	let selected_count = selected_mosaics.len();
	let selection = Selection { mosaics: selected_mosaics };
	persistence::write_selection(&args.out, &selection)?;

	let diagnostics_path = args.diagnostics.clone().unwrap_or_else(|| sibling(&args.out, "diagnostics.json"));
	let diagnostics = SelectionDiagnostics {
		variant: args.variant,
		objective_value: outcome.objective_value,
		incremental_coverage: witness.incremental_coverage,
		selected_count,
	};
	persistence::write_diagnostics(&diagnostics_path, &diagnostics)?;

	log::info!("selected {selected_count} mosaics, objective {:.6}", outcome.objective_value);
	Ok(())
}
