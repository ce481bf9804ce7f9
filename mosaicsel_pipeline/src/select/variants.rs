//! Per-mosaic parameters and the pairwise intersection scalar `Iⱼₖ` (spec
//! §4.5 "Sets and parameters"), grounded on
//! `original_source/code/3-CPLEX.py`'s per-group metric extraction and its
//! `group_intersections` shared-image-ratio estimate.

use std::collections::{HashMap, HashSet};

use mosaicsel_core::constants::AREA_EPS;
use mosaicsel_core::schema::{IjkDefinition, MosaicRecord, TileRecord};

/// `Aⱼ`, `Qⱼ`, `Nⱼ` and the tile set needed to evaluate `Iⱼₖ` for one
/// candidate mosaic.
#[derive(Debug, Clone)]
pub struct MosaicParams {
	pub group_id: String,
	pub coverage: f64,
	pub quality: f64,
	pub cloud: f64,
	pub coverage_m2: f64,
	pub tile_set: HashSet<String>,
}

/// Builds one [`MosaicParams`] per candidate mosaic. `Nⱼ` is the max
/// `cloud_coverage` over the mosaic's own tiles (spec §4.5: "max over the
/// mosaic's tiles of cloud_coverage" — *not* `area.avg_cloud_coverage`,
/// which is the no-double-counting weighted average C4 computes for a
/// different purpose).
#[must_use]
pub fn mosaic_params(mosaics: &[MosaicRecord], tiles: &HashMap<String, &TileRecord>) -> Vec<MosaicParams> {
	mosaics
		.iter()
		.map(|mosaic| {
			let cloud = mosaic
				.images
				.iter()
				.filter_map(|filename| tiles.get(filename))
				.map(|tile| tile.cloud_coverage)
				.fold(0.0_f64, f64::max);
			let coverage = mosaic.area.map_or(0.0, |area| area.pie_coverage_ratio);
			let coverage_m2 = mosaic.area.map_or(0.0, |area| area.pie_coverage_area);
			MosaicParams {
				group_id: mosaic.group_id.clone(),
				coverage,
				quality: mosaic.quality_factor,
				cloud,
				coverage_m2,
				tile_set: mosaic.images.iter().cloned().collect(),
			}
		})
		.collect()
}

/// Computes `Iⱼₖ` between two mosaics under `definition` (spec §4.5: two
/// admissible definitions). `aoi_area` is only consulted by
/// [`IjkDefinition::SharedImageRatio`].
#[must_use]
pub fn pair_intersection(a: &MosaicParams, b: &MosaicParams, definition: IjkDefinition, aoi_area: f64) -> f64 {
	match definition {
		IjkDefinition::ConservativeMin => a.coverage.min(b.coverage),
		IjkDefinition::SharedImageRatio => {
			let shared = a.tile_set.intersection(&b.tile_set).count();
			let denom = a.tile_set.len().min(b.tile_set.len());
			if denom == 0 || aoi_area <= AREA_EPS {
				return 0.0;
			}
			let shared_ratio = shared as f64 / denom as f64;
			(a.coverage_m2.min(b.coverage_m2) * shared_ratio / aoi_area).max(0.0)
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use mosaicsel_core::schema::AreaMetrics;

	fn mosaic(group_id: &str, images: Vec<&str>, coverage: f64, coverage_m2: f64) -> MosaicRecord {
		MosaicRecord {
			group_id: group_id.into(),
			base_image_id: images[0].into(),
			complementary_image_ids: images[1..].iter().map(|s| s.to_string()).collect(),
			images: images.into_iter().map(String::from).collect(),
			estimated_coverage: coverage,
			quality_factor: 0.9,
			start_date: "2023-06-01t00:00:00z".into(),
			end_date: "2023-06-02t00:00:00z".into(),
			overlap_details: vec![],
			area: Some(AreaMetrics {
				geometric_coverage: coverage,
				geometric_coverage_m2: coverage_m2,
				total_individual_area: coverage_m2,
				total_pairwise_overlap: 0.0,
				real_coverage_area: coverage_m2,
				real_coverage_ratio: coverage,
				pie_coverage_area: coverage_m2,
				pie_coverage_ratio: coverage,
				avg_cloud_coverage: 0.0,
			}),
			pairwise_intersections: vec![],
		}
	}

	#[test]
	fn conservative_min_definition_ignores_shared_images() {
		let a = &mosaic_params(&[mosaic("g1", vec!["A.zip"], 0.6, 600.0)], &HashMap::new())[0];
		let b = &mosaic_params(&[mosaic("g2", vec!["B.zip"], 0.4, 400.0)], &HashMap::new())[0];
		assert_eq!(pair_intersection(a, b, IjkDefinition::ConservativeMin, 1000.0), 0.4);
	}

	#[test]
	fn shared_image_ratio_is_zero_when_no_tiles_overlap() {
		let a = &mosaic_params(&[mosaic("g1", vec!["A.zip"], 0.6, 600.0)], &HashMap::new())[0];
		let b = &mosaic_params(&[mosaic("g2", vec!["B.zip"], 0.4, 400.0)], &HashMap::new())[0];
		assert_eq!(pair_intersection(a, b, IjkDefinition::SharedImageRatio, 1000.0), 0.0);
	}

	#[test]
	fn shared_image_ratio_scales_with_overlap_fraction() {
		let a = &mosaic_params(&[mosaic("g1", vec!["A.zip", "B.zip"], 0.6, 600.0)], &HashMap::new())[0];
		let b = &mosaic_params(&[mosaic("g2", vec!["B.zip"], 0.4, 400.0)], &HashMap::new())[0];
		// shared_ratio = 1/min(2,1) = 1.0; min(600,400) * 1.0 / 1000 = 0.4
		assert_eq!(pair_intersection(a, b, IjkDefinition::SharedImageRatio, 1000.0), 0.4);
	}
}
