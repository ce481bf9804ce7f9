//! CRS-to-CRS polygon reprojection (spec §4.1 "reproject_polygon").

use gdal::spatial_ref::{AxisMappingStrategy, CoordTransform, SpatialRef};
use geo::{Coord, LineString, Polygon};
use mosaicsel_core::error::{PipelineError, Result};

use crate::crs::Crs;
use crate::ops::GeometryOps;
use crate::polygon::MultiPolygon;

/// Builds a `SpatialRef` with the "always-XY" axis-ordering contract, the
/// same helper the teacher's raster reader uses to open datasets.
fn spatial_ref_for(crs: &Crs) -> Result<SpatialRef> {
	let epsg = crs.epsg_code().ok_or_else(|| PipelineError::ReprojectError(format!("not an EPSG CRS: {crs}")))?;
	let mut srs = SpatialRef::from_epsg(epsg)
		.map_err(|e| PipelineError::ReprojectError(format!("unknown CRS {crs}: {e}")))?;
	srs.set_axis_mapping_strategy(AxisMappingStrategy::TraditionalGisOrder);
	Ok(srs)
}

/// Reprojects every ring coordinate of `polygon` from `source_crs` to
/// `target_crs`, re-closing rings, then repairs and validates the result
/// (spec §4.1: "if the result is invalid, attempt repair via zero-buffer;
/// after repair, if still invalid or of nonpositive area, fail").
pub fn reproject_polygon(polygon: &MultiPolygon, target_crs: &Crs) -> Result<MultiPolygon> {
	if &polygon.crs == target_crs {
		return Ok(polygon.clone());
	}

	let source = spatial_ref_for(&polygon.crs)?;
	let target = spatial_ref_for(target_crs)?;
	let transform = CoordTransform::new(&source, &target)
		.map_err(|e| PipelineError::ReprojectError(format!("cannot build transform {} -> {}: {e}", polygon.crs, target_crs)))?;

	let rings: Result<Vec<Polygon<f64>>> =
		polygon.geometry.0.iter().map(|ring| reproject_ring(ring, &transform)).collect();
	let reprojected = MultiPolygon::new(geo::MultiPolygon(rings?), target_crs.clone());

	let repaired = if reprojected.is_valid() { reprojected } else { reprojected.repair() };
	if !repaired.is_valid() || repaired.area() <= 0.0 {
		return Err(PipelineError::ReprojectError(format!(
			"reprojected polygon invalid or nonpositive area ({} -> {})",
			polygon.crs, target_crs
		)));
	}
	Ok(repaired)
}

fn reproject_ring(polygon: &Polygon<f64>, transform: &CoordTransform) -> Result<Polygon<f64>> {
	let exterior = reproject_line_string(polygon.exterior(), transform)?;
	let interiors: Result<Vec<LineString<f64>>> =
		polygon.interiors().iter().map(|ring| reproject_line_string(ring, transform)).collect();
	Ok(Polygon::new(exterior, interiors?))
}

fn reproject_line_string(line: &LineString<f64>, transform: &CoordTransform) -> Result<LineString<f64>> {
	let mut xs: Vec<f64> = line.0.iter().map(|c| c.x).collect();
	let mut ys: Vec<f64> = line.0.iter().map(|c| c.y).collect();
	let mut zs = vec![0.0; xs.len()];
	transform
		.transform_coords(&mut xs, &mut ys, &mut zs)
		.map_err(|e| PipelineError::ReprojectError(format!("coordinate transform failed: {e}")))?;
	let mut coords: Vec<Coord<f64>> = xs.into_iter().zip(ys).map(|(x, y)| Coord { x, y }).collect();
	if coords.first() != coords.last() {
		coords.push(*coords.first().expect("ring has at least one point"));
	}
	Ok(LineString(coords))
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::polygon::rect;
	use approx::assert_relative_eq;

	#[test]
	fn identity_reprojection_returns_the_same_geometry() {
		let mp = MultiPolygon::from_polygon(rect(0.0, 0.0, 1.0, 1.0), Crs::wgs84());
		let back = reproject_polygon(&mp, &Crs::wgs84()).unwrap();
		assert_relative_eq!(back.area(), mp.area());
	}

	#[test]
	fn non_epsg_source_crs_fails_with_reproject_error() {
		let mp = MultiPolygon::from_polygon(rect(0.0, 0.0, 1.0, 1.0), Crs::new("ESRI:54009"));
		let err = reproject_polygon(&mp, &Crs::wgs84()).unwrap_err();
		assert!(matches!(err, PipelineError::ReprojectError(_)));
	}
}
