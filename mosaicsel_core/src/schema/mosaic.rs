use serde::{Deserialize, Serialize};

use super::{Classification, serialize_round6};

/// One row of the `image_catalog` array in `optimization_parameters.json`
/// (spec §6).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageCatalogEntry {
	pub filename: String,
	pub class: Classification,
	pub date: Option<String>,
	pub orbit: Option<u32>,
	#[serde(serialize_with = "serialize_round6")]
	pub geographic_coverage: f64,
	#[serde(serialize_with = "serialize_round6")]
	pub valid_pixels_percentage: f64,
	#[serde(serialize_with = "serialize_round6")]
	pub cloud_coverage: f64,
	#[serde(serialize_with = "serialize_round6")]
	pub quality_factor: f64,
}

/// A single candidate-extension event recorded while C3 grows a mosaic,
/// later enriched by C4's precise pairwise geometry (spec §4.3 step "store
/// the overlap detail", §4.4 "geometric_coverage" enrichment).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverlapDetail {
	pub other_filename: String,
	#[serde(serialize_with = "serialize_round6")]
	pub added_coverage: f64,
	#[serde(serialize_with = "serialize_round6")]
	pub refined_quality: f64,
	#[serde(serialize_with = "serialize_round6")]
	pub effectiveness: f64,
	pub orbit_bonus_applied: bool,
	/// Precise intersection area in AOI-CRS units between this pair's
	/// footprints, filled in by C4's pruning pass; `None` until then.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub overlap_area_m2: Option<f64>,
}

/// Geometric enrichment fields C4 adds to a mosaic (spec §6 "Pipeline
/// artifact after C4").
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AreaMetrics {
	#[serde(serialize_with = "serialize_round6")]
	pub geometric_coverage: f64,
	pub geometric_coverage_m2: f64,
	pub total_individual_area: f64,
	pub total_pairwise_overlap: f64,
	pub real_coverage_area: f64,
	#[serde(serialize_with = "serialize_round6")]
	pub real_coverage_ratio: f64,
	pub pie_coverage_area: f64,
	#[serde(serialize_with = "serialize_round6")]
	pub pie_coverage_ratio: f64,
	#[serde(serialize_with = "serialize_round6")]
	pub avg_cloud_coverage: f64,
}

/// A candidate mosaic, in the C3 shape or the C4-enriched shape depending on
/// whether `area` is populated (spec §6: "same shape, each mosaic gains
/// ..."). `pairwise_intersections` holds the precise per-pair overlap areas
/// within this mosaic's surviving tile set, computed during C4 pruning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MosaicRecord {
	pub group_id: String,
	pub base_image_id: String,
	pub complementary_image_ids: Vec<String>,
	pub images: Vec<String>,
	#[serde(serialize_with = "serialize_round6")]
	pub estimated_coverage: f64,
	#[serde(serialize_with = "serialize_round6")]
	pub quality_factor: f64,
	pub start_date: String,
	pub end_date: String,
	pub overlap_details: Vec<OverlapDetail>,
	#[serde(flatten, skip_serializing_if = "Option::is_none")]
	pub area: Option<AreaMetrics>,
	#[serde(skip_serializing_if = "Vec::is_empty", default)]
	pub pairwise_intersections: Vec<OverlapDetail>,
}

impl MosaicRecord {
	/// `base_image ∈ images` and `images` is set-unique (spec §3, §8).
	#[must_use]
	pub fn images_well_formed(&self) -> bool {
		let mut seen = std::collections::HashSet::new();
		let all_unique = self.images.iter().all(|id| seen.insert(id));
		all_unique && self.images.contains(&self.base_image_id)
	}
}

/// Pipeline artifact produced by C3 (`optimization_parameters.json`,
/// spec §6).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizationParameters {
	pub image_catalog: Vec<ImageCatalogEntry>,
	pub mosaic_groups: Vec<MosaicRecord>,
}
