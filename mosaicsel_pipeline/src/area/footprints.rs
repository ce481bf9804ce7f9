//! Per-tile footprint acquisition for C4 (spec §4.4 "Footprint acquisition"),
//! grounded on `original_source/code/2.2-calc-area-2a2.py`'s
//! `find_and_get_image_geometry` (box-from-bounds, reproject, repair-or-drop).

use std::collections::HashMap;

use mosaicsel_core::schema::TileRecord;
use mosaicsel_geometry::{BBox, Crs, GeometryOps, MultiPolygon, reproject_polygon};

/// One tile's footprint in AOI-CRS, not yet clipped to the AOI.
pub struct Footprint {
	pub filename: String,
	pub polygon: MultiPolygon,
	pub cloud_coverage: f64,
}

/// A footprint after clipping to the AOI, the shape every downstream C4
/// step (pruning, coverage, cloud aggregation) operates on.
pub struct ClippedFootprint {
	pub filename: String,
	pub clipped: MultiPolygon,
	pub cloud_coverage: f64,
}

/// Builds a footprint for each filename in `images`, in order, reprojecting
/// the tile's recorded bounds into `aoi_crs`. Tiles missing metadata, or
/// whose reprojection fails validity/area checks, are dropped and logged
/// (`reproject_polygon` already performs the `buffer(0)`-equivalent repair
/// attempt internally).
pub fn acquire_footprints(images: &[String], tiles: &HashMap<String, &TileRecord>, aoi_crs: &Crs) -> Vec<Footprint> {
	let mut footprints = Vec::with_capacity(images.len());
	for filename in images {
		let Some(tile) = tiles.get(filename) else {
			log::warn!("tile {filename} has no recorded metadata, dropped from area computation");
			continue;
		};
		let (Some(bounds), Some(crs_str)) = (tile.bounds.as_ref(), tile.crs.as_ref()) else {
			log::warn!("tile {filename} has no bounds/crs recorded, dropped from area computation");
			continue;
		};
		let bbox = BBox::new(bounds.left, bounds.bottom, bounds.right, bounds.top, Crs::new(crs_str.clone()));
		let raw = MultiPolygon::from_polygon(bbox.to_polygon(), bbox.crs.clone());
		match reproject_polygon(&raw, aoi_crs) {
			Ok(polygon) => footprints.push(Footprint { filename: filename.clone(), polygon, cloud_coverage: tile.cloud_coverage }),
			Err(e) => log::warn!("tile {filename} footprint invalid or nonpositive-area after reprojection, dropped: {e}"),
		}
	}
	footprints
}

/// Clips every footprint to the AOI (spec §4.4 "`gᵢ = footprintᵢ ∩ AOI`").
pub fn clip_to_aoi(footprints: Vec<Footprint>, aoi: &MultiPolygon) -> Vec<ClippedFootprint> {
	footprints
		.into_iter()
		.map(|f| ClippedFootprint { filename: f.filename, clipped: f.polygon.intersection(aoi), cloud_coverage: f.cloud_coverage })
		.collect()
}

#[cfg(test)]
mod tests {
	use super::*;
	use mosaicsel_core::schema::{Bounds, Classification, TileStatus};

	fn tile(filename: &str, bounds: Bounds, cloud: f64) -> TileRecord {
		TileRecord {
			filename: filename.into(),
			status: TileStatus::Accepted,
			class: Some(Classification::Central),
			date: Some("2023-06-01t00:00:00z".into()),
			orbit: Some(1),
			geographic_coverage: 0.9,
			valid_pixels_percentage: 0.9,
			effective_coverage: 0.81,
			cloud_coverage: cloud,
			bounds: Some(bounds),
			crs: Some("EPSG:4326".into()),
			tci_path: String::new(),
			cloud_mask_path: String::new(),
			reason: None,
		}
	}

	#[test]
	fn missing_metadata_drops_the_tile() {
		let tiles = HashMap::new();
		let out = acquire_footprints(&["A.zip".to_string()], &tiles, &Crs::wgs84());
		assert!(out.is_empty());
	}

	#[test]
	fn a_tile_with_bounds_produces_a_footprint_in_the_target_crs() {
		let a = tile("A.zip", Bounds { left: 0.0, bottom: 0.0, right: 1.0, top: 1.0 }, 0.1);
		let mut tiles = HashMap::new();
		tiles.insert("A.zip".to_string(), &a);
		let out = acquire_footprints(&["A.zip".to_string()], &tiles, &Crs::wgs84());
		assert_eq!(out.len(), 1);
		assert_eq!(out[0].polygon.crs, Crs::wgs84());
	}

	#[test]
	fn clipping_restricts_footprints_to_the_aoi() {
		let a = tile("A.zip", Bounds { left: 0.0, bottom: 0.0, right: 2.0, top: 2.0 }, 0.1);
		let mut tiles = HashMap::new();
		tiles.insert("A.zip".to_string(), &a);
		let footprints = acquire_footprints(&["A.zip".to_string()], &tiles, &Crs::wgs84());
		let aoi = MultiPolygon::from_polygon(mosaicsel_geometry::polygon::rect(0.0, 0.0, 1.0, 1.0), Crs::wgs84());
		let clipped = clip_to_aoi(footprints, &aoi);
		assert_eq!(clipped.len(), 1);
		assert!((clipped[0].clipped.area() - 1.0).abs() < 1e-9);
	}
}
