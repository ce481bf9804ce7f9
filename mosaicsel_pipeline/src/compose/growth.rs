//! Two-pass greedy mosaic growth (spec §4.3 "Mosaic growth (two passes)"),
//! grounded on `original_source/code/2-compatibility-greedy.py`'s
//! `heuristica_gulosa`.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::path::Path;

use mosaicsel_core::schema::{Classification, MosaicRecord, TileRecord};
use mosaicsel_core::time_util;
use mosaicsel_raster::RasterReader;

use super::compatibility::evaluate_compatibility;

/// `geographic_coverage * (1 - cloud_coverage)` merit used to rank
/// candidates in both passes.
fn merit(tile: &TileRecord) -> f64 {
	tile.geographic_coverage * (1.0 - tile.cloud_coverage)
}

/// Orders by merit descending, ties broken by filename ascending (spec §9
/// "Greedy nondeterminism due to ordering on equal keys: always break ties
/// by filename ascending").
fn candidate_order(a: &TileRecord, b: &TileRecord) -> Ordering {
	merit(b).partial_cmp(&merit(a)).unwrap_or(Ordering::Equal).then_with(|| a.filename.cmp(&b.filename))
}

/// Grows one mosaic from `seed` against `candidates`, in the iterative
/// pattern shared by both passes (spec §4.3 "Process iterativo guloso"):
/// each accepted candidate becomes the growth's new synthetic base via its
/// updated `geographic_coverage`.
fn grow_mosaic(
	group_id: String,
	seed: &TileRecord,
	mut candidates: Vec<&TileRecord>,
	max_days: i64,
	bundles_dir: &Path,
	raster_reader: &impl RasterReader,
) -> Option<MosaicRecord> {
	candidates.sort_by(|a, b| candidate_order(a, b));

	let mut base = seed.clone();
	let mut complementary_image_ids = Vec::new();
	let mut images = vec![seed.filename.clone()];
	let mut overlap_details = Vec::new();
	let mut estimated_coverage = seed.geographic_coverage;
	let mut quality_factor = (1.0 - seed.cloud_coverage) * seed.valid_pixels_percentage;
	let mut start_date = seed.date.clone();
	let mut end_date = seed.date.clone();

	for candidate in candidates {
		if candidate.filename == seed.filename {
			continue;
		}
		let Some(outcome) = evaluate_compatibility(&base, candidate, max_days, bundles_dir, raster_reader) else {
			continue;
		};

		complementary_image_ids.push(candidate.filename.clone());
		images.push(candidate.filename.clone());
		estimated_coverage = outcome.estimated_coverage_after_add;
		quality_factor = outcome.overlap_detail.refined_quality;
		overlap_details.push(outcome.overlap_detail);

		if let Some(candidate_date) = candidate.date.as_ref() {
			if start_date.as_deref().is_none_or(|s| candidate_date.as_str() < s) {
				start_date = Some(candidate_date.clone());
			}
			if end_date.as_deref().is_none_or(|s| candidate_date.as_str() > s) {
				end_date = Some(candidate_date.clone());
			}
		}

		base.geographic_coverage = outcome.estimated_coverage_after_add;
	}

	if complementary_image_ids.is_empty() {
		return None;
	}

	Some(MosaicRecord {
		group_id,
		base_image_id: seed.filename.clone(),
		complementary_image_ids,
		images,
		estimated_coverage,
		quality_factor,
		start_date: start_date.unwrap_or_default(),
		end_date: end_date.unwrap_or_default(),
		overlap_details,
		area: None,
		pairwise_intersections: vec![],
	})
}

/// Runs both growth passes over `accepted` tiles (spec §4.3 "Pass A" /
/// "Pass B") and returns candidates sorted by `(estimated_coverage,
/// avg_quality_factor)` descending, "for convenience" per spec §4.3.
pub fn compose_mosaics(accepted: &[TileRecord], max_days: i64, bundles_dir: &Path, raster_reader: &impl RasterReader) -> Vec<MosaicRecord> {
	let mut centrals: Vec<&TileRecord> = accepted.iter().filter(|t| t.class == Some(Classification::Central)).collect();
	centrals.sort_by_key(|t| t.filename.clone());
	let complements: Vec<&TileRecord> = accepted.iter().filter(|t| t.class == Some(Classification::Complement)).collect();

	let mut groups = Vec::new();
	let mut next_id = 0usize;

	// Pass A: central-seeded groups.
	for central in &centrals {
		let others: Vec<&TileRecord> = accepted.iter().filter(|t| t.filename != central.filename).collect();
		let group_id = format!("mosaic-{next_id:04}");
		if let Some(mosaic) = grow_mosaic(group_id, central, others, max_days, bundles_dir, raster_reader) {
			groups.push(mosaic);
			next_id += 1;
		}
	}

	// Pass B: complement-only groups, bucketed by calendar date.
	let mut buckets: HashMap<String, Vec<&TileRecord>> = HashMap::new();
	for tile in &complements {
		let Some(date) = tile.date.as_ref() else { continue };
		let Some(parsed) = time_util::parse_candidate(date) else { continue };
		let key = format!("{:04}-{:02}-{:02}", parsed.year(), parsed.month() as u8, parsed.day());
		buckets.entry(key).or_default().push(tile);
	}

	let mut bucket_keys: Vec<&String> = buckets.keys().collect();
	bucket_keys.sort();
	for key in bucket_keys {
		let mut bucket = buckets[key].clone();
		if bucket.len() < 2 {
			continue;
		}
		bucket.sort_by(|a, b| candidate_order(a, b));
		let seed = bucket[0];
		let rest: Vec<&TileRecord> = bucket[1..].to_vec();
		let group_id = format!("mosaic-{next_id:04}");
		if let Some(mosaic) = grow_mosaic(group_id, seed, rest, max_days, bundles_dir, raster_reader) {
			groups.push(mosaic);
			next_id += 1;
		}
	}

	groups.sort_by(|a, b| {
		b.estimated_coverage
			.partial_cmp(&a.estimated_coverage)
			.unwrap_or(std::cmp::Ordering::Equal)
			.then_with(|| b.quality_factor.partial_cmp(&a.quality_factor).unwrap_or(std::cmp::Ordering::Equal))
	});
	groups
}

#[cfg(test)]
mod tests {
	use super::*;
	use mosaicsel_core::error::Result;
	use mosaicsel_core::schema::{Bounds, TileStatus};
	use mosaicsel_geometry::MultiPolygon;
	use mosaicsel_raster::{MaskedBand, RasterHandle};

	struct NeverReads;

	impl RasterReader for NeverReads {
		fn open_raster(&self, _path: &Path) -> Result<RasterHandle> {
			unreachable!()
		}

		fn read_masked_band(&self, _handle: &RasterHandle, _band: usize, _polygon: &MultiPolygon) -> Result<MaskedBand> {
			unreachable!()
		}
	}

	fn tile(filename: &str, date: &str, geo: f64, cloud: f64, class: Classification) -> TileRecord {
		TileRecord {
			filename: filename.into(),
			status: TileStatus::Accepted,
			class: Some(class),
			date: Some(date.into()),
			orbit: Some(22),
			geographic_coverage: geo,
			valid_pixels_percentage: 0.9,
			effective_coverage: geo * 0.9,
			cloud_coverage: cloud,
			bounds: Some(Bounds { left: 0.0, bottom: 0.0, right: 1.0, top: 1.0 }),
			crs: Some("EPSG:4326".into()),
			tci_path: String::new(),
			cloud_mask_path: String::new(),
			reason: None,
		}
	}

	#[test]
	fn a_lone_central_tile_with_no_compatible_complement_is_dropped() {
		let central = tile("A.zip", "2023-06-01t00:00:00z", 0.95, 0.05, Classification::Central);
		let mosaics = compose_mosaics(&[central], 5, Path::new("/tmp"), &NeverReads);
		assert!(mosaics.is_empty());
	}

	#[test]
	fn a_central_and_an_overlapping_complement_form_one_mosaic() {
		let central = tile("A.zip", "2023-06-01t00:00:00z", 0.5, 0.0, Classification::Central);
		let mut complement = tile("B.zip", "2023-06-02t00:00:00z", 0.5, 0.0, Classification::Complement);
		complement.bounds = Some(Bounds { left: 0.5, bottom: 0.0, right: 1.5, top: 1.0 });
		let mosaics = compose_mosaics(&[central, complement], 5, Path::new("/tmp"), &NeverReads);
		assert_eq!(mosaics.len(), 1);
		assert_eq!(mosaics[0].base_image_id, "A.zip");
		assert_eq!(mosaics[0].images, vec!["A.zip".to_string(), "B.zip".to_string()]);
	}

	#[test]
	fn a_complement_only_bucket_of_two_forms_a_pass_b_mosaic() {
		let mut c1 = tile("C1.zip", "2023-06-05t00:00:00z", 0.4, 0.0, Classification::Complement);
		c1.bounds = Some(Bounds { left: 0.0, bottom: 0.0, right: 1.0, top: 1.0 });
		let mut c2 = tile("C2.zip", "2023-06-05t00:00:00z", 0.4, 0.0, Classification::Complement);
		c2.bounds = Some(Bounds { left: 0.9, bottom: 0.0, right: 1.9, top: 1.0 });
		let mosaics = compose_mosaics(&[c1, c2], 5, Path::new("/tmp"), &NeverReads);
		assert_eq!(mosaics.len(), 1);
	}
}
