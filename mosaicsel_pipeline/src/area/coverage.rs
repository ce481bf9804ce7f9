//! Pairwise-IEP and n-ary-union coverage (spec §4.4 "Coverage computation on
//! the pruned set"), grounded on
//! `original_source/code/2.2-calc-area-2a2.py`'s `calculate_coverage_twotwo`
//! pairwise-2a2 PIE formula and `unary_union` real-coverage computation.

use mosaicsel_core::constants::AREA_EPS;
use mosaicsel_core::schema::OverlapDetail;
use mosaicsel_geometry::{GeometryOps, union_all};

use super::footprints::ClippedFootprint;

/// Area totals produced by the IEP coverage step.
pub struct CoverageResult {
	pub total_individual_area: f64,
	pub total_pairwise_overlap: f64,
	pub pie_coverage_area: f64,
	pub pie_coverage_ratio: f64,
	pub real_coverage_area: f64,
	pub real_coverage_ratio: f64,
	/// One entry per footprint pair with nonempty overlap, recording the
	/// precise overlap area; `other_filename` holds both member names
	/// joined as `"a::b"` since this is a pair record, not a per-tile one.
	pub pairwise_intersections: Vec<OverlapDetail>,
}

/// Computes pairwise-IEP and true-union coverage over the already-pruned
/// `footprints` (spec §4.4: `Σ_single − Σ_pair`, bounded by AOI area, plus
/// `⋃ᵢ gᵢ`).
pub fn compute_coverage(footprints: &[ClippedFootprint], aoi_area: f64) -> CoverageResult {
	let total_individual_area: f64 = footprints.iter().map(|f| f.clipped.area()).sum();

	let mut total_pairwise_overlap = 0.0;
	let mut pairwise_intersections = Vec::new();
	for i in 0..footprints.len() {
		for j in (i + 1)..footprints.len() {
			let overlap_area = footprints[i].clipped.intersection(&footprints[j].clipped).area();
			if overlap_area > AREA_EPS {
				total_pairwise_overlap += overlap_area;
				pairwise_intersections.push(OverlapDetail {
					other_filename: format!("{}::{}", footprints[i].filename, footprints[j].filename),
					added_coverage: 0.0,
					refined_quality: 0.0,
					effectiveness: 0.0,
					orbit_bonus_applied: false,
					overlap_area_m2: Some(overlap_area),
				});
			}
		}
	}

	let pie_coverage_area = (total_individual_area - total_pairwise_overlap).min(aoi_area).max(0.0);
	let pie_coverage_ratio = if aoi_area > AREA_EPS { (pie_coverage_area / aoi_area).min(1.0) } else { 0.0 };

	let polygons: Vec<_> = footprints.iter().map(|f| f.clipped.clone()).collect();
	let real_coverage_area = union_all(&polygons).area();
	let real_coverage_ratio = if aoi_area > AREA_EPS { (real_coverage_area / aoi_area).min(1.0) } else { 0.0 };

	CoverageResult {
		total_individual_area,
		total_pairwise_overlap,
		pie_coverage_area,
		pie_coverage_ratio,
		real_coverage_area,
		real_coverage_ratio,
		pairwise_intersections,
	}
}
