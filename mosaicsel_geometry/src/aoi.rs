//! Area-of-interest loading from a vector source (spec §6 Input (i): "AOI
//! polygon source: standard vector format with embedded CRS; on missing CRS
//! assume a configured geodetic CRS and log"). Grounded on the
//! `gdal::vector` usage in the building-aggregation examples
//! (`cmd_filter_using_raster.rs`, `cmd_fix_reproject_split.rs`), adapted to
//! this crate's `MultiPolygon`/`Crs` wrappers instead of raw `geo_types`.

use gdal::Dataset;
use gdal::vector::LayerAccess;
use mosaicsel_core::error::{PipelineError, Result};
use std::path::Path;

use crate::crs::Crs;
use crate::ops::{GeometryOps, union_all};
use crate::polygon::MultiPolygon;

/// Opens `path` with GDAL's vector drivers, reads every polygonal feature of
/// its first layer, and unions them into one [`MultiPolygon`]. If the
/// dataset carries no spatial reference, `fallback_crs` is assumed and a
/// warning is logged (spec §6).
pub fn load_aoi(path: &Path, fallback_crs: &Crs) -> Result<MultiPolygon> {
	let dataset = Dataset::open(path)
		.map_err(|e| PipelineError::BadInput(format!("cannot open AOI source {}: {e}", path.display())))?;

	let mut layer = dataset
		.layer(0)
		.map_err(|e| PipelineError::BadInput(format!("AOI source {} has no layer 0: {e}", path.display())))?;

	let crs = match layer.spatial_ref() {
		Some(srs) => srs
			.authority_code()
			.ok()
			.map(|code| Crs::new(format!("EPSG:{code}")))
			.unwrap_or_else(|| fallback_crs.clone()),
		None => {
			log::warn!("AOI source {} has no embedded CRS; assuming {fallback_crs}", path.display());
			fallback_crs.clone()
		}
	};

	let mut polygons = Vec::new();
	for feature in layer.features() {
		let Some(geometry) = feature.geometry() else { continue };
		if geometry.is_empty() {
			continue;
		}
		let geo_geometry: geo::Geometry<f64> = geometry
			.to_geo()
			.map_err(|e| PipelineError::PolygonInvalid(format!("AOI feature geometry unreadable: {e}")))?;
		collect_polygons(geo_geometry, &mut polygons);
	}

	if polygons.is_empty() {
		return Err(PipelineError::BadInput(format!("AOI source {} contains no polygonal features", path.display())));
	}

	let multi_polygons: Vec<MultiPolygon> =
		polygons.into_iter().map(|polygon| MultiPolygon::from_polygon(polygon, crs.clone())).collect();
	let aoi = union_all(&multi_polygons);

	if !aoi.is_valid() {
		let repaired = aoi.repair();
		if !repaired.is_valid() || repaired.area() <= 0.0 {
			return Err(PipelineError::PolygonInvalid(format!("AOI source {} yields an invalid polygon after repair", path.display())));
		}
		return Ok(repaired);
	}
	Ok(aoi)
}

fn collect_polygons(geometry: geo::Geometry<f64>, out: &mut Vec<geo::Polygon<f64>>) {
	match geometry {
		geo::Geometry::Polygon(polygon) => out.push(polygon),
		geo::Geometry::MultiPolygon(multi) => out.extend(multi.0),
		geo::Geometry::GeometryCollection(collection) => {
			for inner in collection {
				collect_polygons(inner, out);
			}
		}
		_ => {}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::polygon::rect;
	use approx::assert_relative_eq;

	#[test]
	fn missing_aoi_source_is_a_bad_input_error() {
		let err = load_aoi(Path::new("/no/such/aoi.geojson"), &Crs::wgs84()).unwrap_err();
		assert!(matches!(err, PipelineError::BadInput(_)));
	}

	#[test]
	fn collect_polygons_flattens_multipolygons_and_collections() {
		let a = rect(0.0, 0.0, 1.0, 1.0);
		let b = rect(2.0, 0.0, 3.0, 1.0);
		let mut out = Vec::new();
		collect_polygons(geo::Geometry::MultiPolygon(geo::MultiPolygon(vec![a.clone(), b.clone()])), &mut out);
		collect_polygons(geo::Geometry::GeometryCollection(geo::GeometryCollection(vec![geo::Geometry::Polygon(a.clone())])), &mut out);
		assert_eq!(out.len(), 3);
	}

	#[test]
	fn loads_a_single_polygon_geojson_aoi() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("aoi.geojson");
		std::fs::write(
			&path,
			r#"{"type":"FeatureCollection","features":[{"type":"Feature","properties":{},"geometry":{"type":"Polygon","coordinates":[[[0,0],[1,0],[1,1],[0,1],[0,0]]]}}]}"#,
		)
		.unwrap();

		let aoi = load_aoi(&path, &Crs::wgs84()).unwrap();
		assert_relative_eq!(aoi.area(), 1.0, epsilon = 1e-6);
		assert_eq!(aoi.crs, Crs::wgs84());
	}
}
