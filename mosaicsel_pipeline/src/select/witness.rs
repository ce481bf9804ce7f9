//! Incremental coverage validation (spec §4.5 "Incremental coverage
//! validation"), grounded on `original_source/code/3-CPLEX.py`'s
//! post-solve reporting pass. Deterministic: sorts the selected mosaics by
//! `Aⱼ` descending, ties broken by `group_id` ascending (spec §5: "its
//! witness pass in §4.5 uses area-descending order with ties broken by
//! mosaic id ascending").

use std::collections::HashMap;

use mosaicsel_core::schema::{IjkDefinition, MosaicRecord, TileRecord};

use super::variants::{MosaicParams, mosaic_params, pair_intersection};

/// The witness produced by one incremental-coverage pass: the order the
/// selected mosaics were credited in, and the running total `Cᵣ`.
#[derive(Debug, Clone, PartialEq)]
pub struct Witness {
	pub order: Vec<String>,
	pub incremental_coverage: f64,
}

/// Builds the deterministic witness over the mosaics with `yⱼ = 1` (spec
/// §4.5): the first selected mosaic contributes its full `Aⱼ`; each later
/// one contributes only `max(0, Aⱼ − Σ Iⱼₖ)` against every mosaic already
/// credited.
#[must_use]
pub fn validate_selection(
	selected_mosaics: &[MosaicRecord],
	tiles: &HashMap<String, &TileRecord>,
	definition: IjkDefinition,
	aoi_area: f64,
) -> Witness {
	let mut params = mosaic_params(selected_mosaics, tiles);
	params.sort_by(|a, b| b.coverage.partial_cmp(&a.coverage).unwrap_or(std::cmp::Ordering::Equal).then_with(|| a.group_id.cmp(&b.group_id)));

	let mut order = Vec::with_capacity(params.len());
	let mut credited: Vec<MosaicParams> = Vec::with_capacity(params.len());
	let mut incremental_coverage = 0.0;

	for p in params {
		let contribution = if credited.is_empty() {
			p.coverage
		} else {
			let overlap: f64 = credited.iter().map(|already| pair_intersection(&p, already, definition, aoi_area)).sum();
			(p.coverage - overlap).max(0.0)
		};
		incremental_coverage += contribution;
		order.push(p.group_id.clone());
		credited.push(p);
	}

	Witness { order, incremental_coverage }
}
