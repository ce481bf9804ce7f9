//! C4 IEP area engine (spec §4.4): enriches each candidate mosaic with
//! precise pairwise-IEP and real-union coverage, redundancy-pruned images,
//! and no-double-counting cloud aggregation. Grounded end to end on
//! `original_source/code/2.2-calc-area-2a2.py`'s `calculate_coverage_twotwo`.

pub mod cloud;
pub mod coverage;
pub mod footprints;
pub mod prune;

use std::collections::HashMap;

use mosaicsel_core::schema::{AreaMetrics, MosaicRecord, TileRecord};
use mosaicsel_geometry::{Crs, GeometryOps, MultiPolygon};
use rayon::prelude::*;

/// Enriches one mosaic in place: acquires footprints for its `images` list,
/// clips to the AOI, prunes redundant pairs (mosaics with ≥ 3 footprints),
/// replaces `images` with the surviving set, then computes IEP/real
/// coverage and cloud aggregation over the pruned footprints.
pub fn enrich_mosaic(mosaic: &mut MosaicRecord, tiles: &HashMap<String, &TileRecord>, aoi: &MultiPolygon) {
	let aoi_area = aoi.area();

	let raw = footprints::acquire_footprints(&mosaic.images, tiles, &aoi.crs);
	let clipped = footprints::clip_to_aoi(raw, aoi);
	let pruned = prune::prune_redundant(clipped, aoi_area);

	mosaic.images = pruned.iter().map(|f| f.filename.clone()).collect();

	let coverage = coverage::compute_coverage(&pruned, aoi_area);
	let avg_cloud_coverage = cloud::aggregate_cloud_coverage(&pruned);

	mosaic.pairwise_intersections = coverage.pairwise_intersections;
	mosaic.area = Some(AreaMetrics {
		geometric_coverage: coverage.pie_coverage_ratio,
		geometric_coverage_m2: coverage.pie_coverage_area,
		total_individual_area: coverage.total_individual_area,
		total_pairwise_overlap: coverage.total_pairwise_overlap,
		real_coverage_area: coverage.real_coverage_area,
		real_coverage_ratio: coverage.real_coverage_ratio,
		pie_coverage_area: coverage.pie_coverage_area,
		pie_coverage_ratio: coverage.pie_coverage_ratio,
		avg_cloud_coverage,
	});
}

/// Enriches every mosaic in `mosaics`, fanning out across mosaics (spec §5
/// "embarrassingly parallel fan-out... across mosaics in C4").
pub fn enrich_mosaics(mosaics: &mut [MosaicRecord], tiles: &HashMap<String, &TileRecord>, aoi: &MultiPolygon) {
	mosaics.par_iter_mut().for_each(|mosaic| enrich_mosaic(mosaic, tiles, aoi));
}
