//! No-double-counting cloud aggregation (spec §4.4 "Cloud aggregation with
//! no double counting"), grounded on
//! `original_source/code/2.2-calc-area-2a2.py`'s precise-cloud computation
//! inside `calculate_coverage_twotwo`.

use mosaicsel_core::constants::AREA_EPS;
use mosaicsel_geometry::GeometryOps;

use super::footprints::ClippedFootprint;

/// Aggregates `cloud_coverage` across `footprints` (in the mosaic's
/// `images`-list order) such that no overlapping area is weighted twice:
/// each tile contributes only the part of its footprint not already
/// covered by an earlier tile in the iteration. Falls back to the simple
/// mean when the accumulated union has zero area.
pub fn aggregate_cloud_coverage(footprints: &[ClippedFootprint]) -> f64 {
	if footprints.is_empty() {
		return 0.0;
	}

	let mut accumulated = footprints[0].clipped.clone();
	let mut weighted = footprints[0].clipped.area() * footprints[0].cloud_coverage;

	for footprint in &footprints[1..] {
		let unique = footprint.clipped.difference(&accumulated);
		weighted += unique.area() * footprint.cloud_coverage;
		accumulated = accumulated.union(&footprint.clipped);
	}

	let union_area = accumulated.area();
	let avg = if union_area > AREA_EPS {
		weighted / union_area
	} else {
		footprints.iter().map(|f| f.cloud_coverage).sum::<f64>() / footprints.len() as f64
	};
	avg.clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
	use super::*;
	use mosaicsel_geometry::{Crs, MultiPolygon, polygon::rect};
	use pretty_assertions::assert_eq;

	fn clipped(filename: &str, left: f64, bottom: f64, right: f64, top: f64, cloud: f64) -> ClippedFootprint {
		ClippedFootprint {
			filename: filename.into(),
			clipped: MultiPolygon::from_polygon(rect(left, bottom, right, top), Crs::wgs84()),
			cloud_coverage: cloud,
		}
	}

	#[test]
	fn empty_input_yields_zero() {
		assert_eq!(aggregate_cloud_coverage(&[]), 0.0);
	}

	#[test]
	fn a_single_footprint_reports_its_own_cloud_coverage() {
		let footprints = vec![clipped("A.zip", 0.0, 0.0, 1.0, 1.0, 0.3)];
		assert_eq!(aggregate_cloud_coverage(&footprints), 0.3);
	}

	#[test]
	fn overlapping_area_is_weighted_only_once_by_the_first_tile_seen() {
		let footprints = vec![clipped("A.zip", 0.0, 0.0, 2.0, 1.0, 0.0), clipped("B.zip", 1.0, 0.0, 3.0, 1.0, 1.0)];
		// A contributes its full area at cloud 0.0; B contributes only its
		// unique slice [2,3] at cloud 1.0. Union area is 3, weighted = 0*2 + 1*1 = 1.
		assert_eq!(aggregate_cloud_coverage(&footprints), 1.0 / 3.0);
	}

	#[test]
	fn zero_area_union_falls_back_to_the_simple_mean() {
		let footprints = vec![clipped("A.zip", 0.0, 0.0, 0.0, 0.0, 0.2), clipped("B.zip", 0.0, 0.0, 0.0, 0.0, 0.8)];
		assert_eq!(aggregate_cloud_coverage(&footprints), 0.5);
	}
}
