//! Compatibility score between a mosaic's current base and a candidate tile
//! (spec §4.3 steps 1-10), grounded on
//! `original_source/code/2-compatibility-greedy.py`'s
//! `calculate_compatibility_mosaics`.

use std::path::Path;

use mosaicsel_core::constants::{
	AREA_EPS, CONTRIBUTION_FACTOR_CENTRAL, CONTRIBUTION_FACTOR_COMPLEMENT, ORBIT_BONUS, OVERLAP_QUALITY_WEIGHT,
};
use mosaicsel_core::schema::{Classification, OverlapDetail, TileRecord};
use mosaicsel_core::time_util::{self, day_difference};
use mosaicsel_geometry::{BBox, Crs, GeometryOps, MultiPolygon, reproject_polygon};
use mosaicsel_raster::{RasterReader, fraction_over_threshold};

use crate::ingest::bundle::extract_bundle;

/// Result of a successful compatibility evaluation (spec §4.3 "return the
/// full record on success").
#[derive(Debug, Clone, PartialEq)]
pub struct CompatibilityOutcome {
	pub overlap_detail: OverlapDetail,
	pub estimated_coverage_after_add: f64,
}

fn tile_footprint_wgs84(tile: &TileRecord) -> Option<MultiPolygon> {
	let bounds = tile.bounds.as_ref()?;
	let crs_str = tile.crs.as_ref()?;
	let bbox = BBox::new(bounds.left, bounds.bottom, bounds.right, bounds.top, Crs::new(crs_str.clone()));
	let polygon = MultiPolygon::from_polygon(bbox.to_polygon(), bbox.crs.clone());
	reproject_polygon(&polygon, &Crs::wgs84()).ok()
}

/// Fraction of cloudy cells within `overlap_wgs84`, re-extracting the
/// bundle's cloud raster from `bundles_dir` (the extraction directories C2
/// used are gone by the time C3 runs; spec §4.3 step 4 "requires
/// reprojecting overlap into the cloud raster's CRS" presumes fresh raster
/// access). `None` on any failure along the way.
fn cloud_fraction_in_overlap(bundles_dir: &Path, tile: &TileRecord, overlap_wgs84: &MultiPolygon, raster_reader: &impl RasterReader) -> Option<f64> {
	let bundle_path = bundles_dir.join(&tile.filename);
	let artifacts = extract_bundle(&bundle_path).ok()?;
	let handle = raster_reader.open_raster(&artifacts.cloud_path).ok()?;
	let overlap_in_cloud_crs = reproject_polygon(overlap_wgs84, &handle.crs).ok()?;
	let masked = raster_reader.read_masked_band(&handle, 1, &overlap_in_cloud_crs).ok()?;
	Some(fraction_over_threshold(&masked, 0.0))
}

fn quality(cloud_coverage: f64, valid_pixels_percentage: f64) -> f64 {
	(1.0 - cloud_coverage) * valid_pixels_percentage
}

/// Evaluates whether `other` is compatible with the current synthetic
/// `base` (spec §4.3 steps 1-10). `base.geographic_coverage` carries the
/// mosaic's accumulated estimate; every other field of `base` is the
/// original seed tile's recorded value.
#[must_use]
pub fn evaluate_compatibility(base: &TileRecord, other: &TileRecord, max_days: i64, bundles_dir: &Path, raster_reader: &impl RasterReader) -> Option<CompatibilityOutcome> {
	let base_date = time_util::parse_candidate(base.date.as_ref()?)?;
	let other_date = time_util::parse_candidate(other.date.as_ref()?)?;
	if day_difference(base_date, other_date) > max_days {
		return None;
	}

	let base_footprint = tile_footprint_wgs84(base)?;
	let other_footprint = tile_footprint_wgs84(other)?;

	let overlap = base_footprint.intersection(&other_footprint);
	let overlap_area = overlap.area();

	#[derive(Clone, Copy, PartialEq)]
	enum Better {
		Base,
		Other,
	}

	let (cloud_overlap_base, cloud_overlap_other, better) = if overlap_area <= AREA_EPS {
		(1.0, 1.0, None)
	} else {
		match (
			cloud_fraction_in_overlap(bundles_dir, base, &overlap, raster_reader),
			cloud_fraction_in_overlap(bundles_dir, other, &overlap, raster_reader),
		) {
			(Some(cb), Some(co)) => (cb, co, Some(if cb <= co { Better::Base } else { Better::Other })),
			_ => (1.0, 1.0, None),
		}
	};

	let quality_base = quality(base.cloud_coverage, base.valid_pixels_percentage);
	let quality_other = quality(other.cloud_coverage, other.valid_pixels_percentage);
	let mean_quality = (quality_base + quality_other) / 2.0;

	let quality_overlap = match better {
		Some(Better::Base) => quality(cloud_overlap_base, base.valid_pixels_percentage),
		Some(Better::Other) => quality(cloud_overlap_other, other.valid_pixels_percentage),
		None => mean_quality,
	};

	let refined_quality = (1.0 - OVERLAP_QUALITY_WEIGHT) * mean_quality + OVERLAP_QUALITY_WEIGHT * quality_overlap;

	let uncovered = (1.0 - base.geographic_coverage).max(0.0);
	let contribution_discount = if other.class == Some(Classification::Central) {
		CONTRIBUTION_FACTOR_CENTRAL
	} else {
		CONTRIBUTION_FACTOR_COMPLEMENT
	};
	let contribution_factor = 1.0 - contribution_discount;
	let added_coverage = uncovered.min(other.geographic_coverage * contribution_factor);
	let estimated_coverage_after_add = (base.geographic_coverage + added_coverage).min(1.0);

	let orbit_match = base.orbit.is_some() && base.orbit == other.orbit;
	let orbit_bonus = if orbit_match { ORBIT_BONUS } else { 0.0 };

	let effectiveness = added_coverage * refined_quality + orbit_bonus;

	Some(CompatibilityOutcome {
		overlap_detail: OverlapDetail {
			other_filename: other.filename.clone(),
			added_coverage,
			refined_quality,
			effectiveness,
			orbit_bonus_applied: orbit_match,
			overlap_area_m2: None,
		},
		estimated_coverage_after_add,
	})
}
