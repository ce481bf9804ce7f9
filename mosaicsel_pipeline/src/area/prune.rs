//! Pairwise redundancy pruning (spec §4.4 "Pairwise redundancy pruning"),
//! grounded on `original_source/code/2.2-calc-area-2a2.py`'s
//! `filter_high_overlap_images`.

use mosaicsel_core::constants::{AREA_EPS, REDUNDANCY_RATIO, UNIQUE_CONTRIB};
use mosaicsel_geometry::GeometryOps;

use super::footprints::ClippedFootprint;

/// Drops redundant footprints from a mosaic with at least 3 surviving
/// footprints. Below that, pruning is a no-op (spec §4.4 "applies only when
/// the mosaic has ≥ 3 footprints").
pub fn prune_redundant(footprints: Vec<ClippedFootprint>, aoi_area: f64) -> Vec<ClippedFootprint> {
	if footprints.len() < 3 {
		return footprints;
	}

	let mut keep = vec![true; footprints.len()];
	for i in 0..footprints.len() {
		if !keep[i] {
			continue;
		}
		for j in (i + 1)..footprints.len() {
			if !keep[j] {
				continue;
			}

			let area_i = footprints[i].clipped.area();
			let area_j = footprints[j].clipped.area();
			let smaller = area_i.min(area_j);
			if smaller <= AREA_EPS {
				continue;
			}

			let overlap_area = footprints[i].clipped.intersection(&footprints[j].clipped).area();
			if overlap_area / smaller <= REDUNDANCY_RATIO {
				continue;
			}

			let unique_i = footprints[i].clipped.difference(&footprints[j].clipped).area();
			let unique_j = footprints[j].clipped.difference(&footprints[i].clipped).area();
			let (contrib_i, contrib_j) =
				if aoi_area > AREA_EPS { (unique_i / aoi_area, unique_j / aoi_area) } else { (0.0, 0.0) };

			let i_qualifies = contrib_i >= UNIQUE_CONTRIB;
			let j_qualifies = contrib_j >= UNIQUE_CONTRIB;

			if i_qualifies && j_qualifies {
				continue;
			} else if i_qualifies {
				keep[j] = false;
			} else if j_qualifies {
				keep[i] = false;
				break;
			} else if footprints[i].cloud_coverage <= footprints[j].cloud_coverage {
				keep[j] = false;
			} else {
				keep[i] = false;
				break;
			}
		}
	}

	footprints.into_iter().zip(keep).filter_map(|(f, k)| k.then_some(f)).collect()
}

#[cfg(test)]
mod tests {
	use super::*;
	use mosaicsel_geometry::{Crs, MultiPolygon, polygon::rect};

	fn clipped(filename: &str, left: f64, bottom: f64, right: f64, top: f64, cloud: f64) -> ClippedFootprint {
		ClippedFootprint {
			filename: filename.into(),
			clipped: MultiPolygon::from_polygon(rect(left, bottom, right, top), Crs::wgs84()),
			cloud_coverage: cloud,
		}
	}

	#[test]
	fn fewer_than_three_footprints_are_never_pruned() {
		let footprints = vec![clipped("A.zip", 0.0, 0.0, 1.0, 1.0, 0.1), clipped("B.zip", 0.0, 0.0, 1.0, 1.0, 0.9)];
		let result = prune_redundant(footprints, 10.0);
		assert_eq!(result.len(), 2);
	}

	#[test]
	fn a_redundant_pair_with_no_unique_contribution_keeps_the_lower_cloud_tile() {
		let footprints = vec![
			clipped("A.zip", 0.0, 0.0, 1.0, 1.0, 0.1),
			clipped("B.zip", 0.0, 0.0, 1.0, 1.0, 0.5),
			clipped("C.zip", 5.0, 5.0, 6.0, 6.0, 0.2),
		];
		let result = prune_redundant(footprints, 1000.0);
		let names: Vec<&str> = result.iter().map(|f| f.filename.as_str()).collect();
		assert!(names.contains(&"A.zip"));
		assert!(!names.contains(&"B.zip"));
		assert!(names.contains(&"C.zip"));
	}

	#[test]
	fn both_tiles_kept_when_each_contributes_uniquely() {
		let footprints = vec![
			clipped("A.zip", 0.0, 0.0, 1.0, 1.0, 0.1),
			clipped("B.zip", 0.05, 0.0, 1.05, 1.0, 0.1),
			clipped("C.zip", 5.0, 5.0, 6.0, 6.0, 0.2),
		];
		let result = prune_redundant(footprints, 1.0);
		assert_eq!(result.len(), 3);
	}
}
