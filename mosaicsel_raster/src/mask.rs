//! Masked-band reads restricted to a polygon, and threshold-fraction
//! arithmetic (spec §4.1 `read_masked_band`, `fraction_over_threshold`).

use gdal::Dataset;
use gdal::raster::{RasterizeOptions, rasterize};
use gdal::spatial_ref::SpatialRef;
use gdal::vector::Geometry;
use mosaicsel_core::error::{PipelineError, Result};
use mosaicsel_geometry::MultiPolygon;

use crate::handle::RasterHandle;
use crate::wkt::multipolygon_to_wkt;

/// The band values and validity mask returned by [`read_masked_band`],
/// restricted to the polygon's bounding window (spec §4.1).
#[derive(Debug, Clone, PartialEq)]
pub struct MaskedBand {
	pub values: Vec<f64>,
	pub valid_mask: Vec<bool>,
}

impl MaskedBand {
	/// An empty masked band: no cells in the AOI-restricted window intersect
	/// the raster at all.
	#[must_use]
	pub fn empty() -> Self {
		MaskedBand { values: vec![], valid_mask: vec![] }
	}

	#[must_use]
	pub fn valid_count(&self) -> usize {
		self.valid_mask.iter().filter(|v| **v).count()
	}
}

/// Window in pixel space: `(xoff, yoff, xsize, ysize)`, clipped to the raster.
fn pixel_window(handle: &RasterHandle, polygon: &MultiPolygon) -> Option<(isize, isize, usize, usize)> {
	let [t0, t1, _, t3, _, t5] = handle.transform;
	let bbox = polygon.geometry.0.iter().fold(
		(f64::INFINITY, f64::INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY),
		|(min_x, min_y, max_x, max_y), poly| {
			poly.exterior().0.iter().fold((min_x, min_y, max_x, max_y), |(min_x, min_y, max_x, max_y), c| {
				(min_x.min(c.x), min_y.min(c.y), max_x.max(c.x), max_y.max(c.y))
			})
		},
	);
	let (min_x, min_y, max_x, max_y) = bbox;
	if !min_x.is_finite() || !max_x.is_finite() {
		return None;
	}

	let col_of = |x: f64| (x - t0) / t1;
	let row_of = |y: f64| (y - t3) / t5;
	let (c_a, c_b) = (col_of(min_x), col_of(max_x));
	let (r_a, r_b) = (row_of(min_y), row_of(max_y));
	let col_min = c_a.min(c_b).floor().max(0.0) as isize;
	let col_max = c_a.max(c_b).ceil().min(handle.width as f64) as isize;
	let row_min = r_a.min(r_b).floor().max(0.0) as isize;
	let row_max = r_a.max(r_b).ceil().min(handle.height as f64) as isize;

	if col_max <= col_min || row_max <= row_min {
		return None;
	}
	Some((col_min, row_min, (col_max - col_min) as usize, (row_max - row_min) as usize))
}

fn raster_spatial_ref(handle: &RasterHandle) -> Result<SpatialRef> {
	let epsg = handle.crs.epsg_code().ok_or_else(|| PipelineError::BadRaster {
		path: handle.path.display().to_string(),
		reason: format!("not an EPSG CRS: {}", handle.crs),
	})?;
	SpatialRef::from_epsg(epsg).map_err(|e| PipelineError::BadRaster {
		path: handle.path.display().to_string(),
		reason: format!("cannot rebuild spatial ref for EPSG:{epsg}: {e}"),
	})
}

/// Rasterizes `polygon_in_raster_crs` into a boolean mask the size of the
/// polygon's bounding window within `handle`, reads `band` over the same
/// window, and returns both restricted to that window (spec §4.1). Pixels
/// equal to the band's declared nodata value are additionally excluded from
/// the valid mask, matching `rasterio`'s `masked=True` semantics
/// (`original_source`-supplemented, see `DESIGN.md`).
pub fn read_masked_band(handle: &RasterHandle, band: usize, polygon_in_raster_crs: &MultiPolygon) -> Result<MaskedBand> {
	debug_assert_eq!(
		handle.crs, polygon_in_raster_crs.crs,
		"read_masked_band requires the polygon already reprojected into the raster's CRS"
	);

	let Some((xoff, yoff, xsize, ysize)) = pixel_window(handle, polygon_in_raster_crs) else {
		return Ok(MaskedBand::empty());
	};

	let srs = raster_spatial_ref(handle)?;

	let mut mem = gdal::DriverManager::get_driver_by_name("MEM")
		.and_then(|driver| driver.create_with_band_type::<f64, _>("mask", xsize, ysize, 1))
		.map_err(|e| PipelineError::BadRaster { path: handle.path.display().to_string(), reason: e.to_string() })?;
	let [t0, t1, _, t3, _, t5] = handle.transform;
	mem.set_geo_transform(&[t0 + (xoff as f64) * t1, t1, 0.0, t3 + (yoff as f64) * t5, 0.0, t5])
		.map_err(|e| PipelineError::BadRaster { path: handle.path.display().to_string(), reason: e.to_string() })?;
	mem.set_spatial_ref(&srs)
		.map_err(|e| PipelineError::BadRaster { path: handle.path.display().to_string(), reason: e.to_string() })?;

	let mut geometry = Geometry::from_wkt(&multipolygon_to_wkt(&polygon_in_raster_crs.geometry))
		.map_err(|e| PipelineError::PolygonInvalid(format!("cannot build gdal geometry: {e}")))?;
	geometry.set_spatial_ref(srs);

	rasterize(&mut mem, &[1], &[geometry], &[1.0], Some(RasterizeOptions::default()))
		.map_err(|e| PipelineError::BadRaster { path: handle.path.display().to_string(), reason: format!("rasterize failed: {e}") })?;

	let mask_buf = mem
		.rasterband(1)
		.and_then(|b| b.read_as::<f64>((0, 0), (xsize, ysize), (xsize, ysize), None))
		.map_err(|e| PipelineError::BadRaster { path: handle.path.display().to_string(), reason: e.to_string() })?;

	let dataset = Dataset::open(&handle.path)
		.map_err(|e| PipelineError::BadRaster { path: handle.path.display().to_string(), reason: e.to_string() })?;
	let raster_band = dataset
		.rasterband(band)
		.map_err(|e| PipelineError::BadRaster { path: handle.path.display().to_string(), reason: e.to_string() })?;
	let nodata = raster_band.no_data_value();
	let value_buf = raster_band
		.read_as::<f64>((xoff, yoff), (xsize, ysize), (xsize, ysize), None)
		.map_err(|e| PipelineError::BadRaster { path: handle.path.display().to_string(), reason: e.to_string() })?;

	let values = value_buf.data().to_vec();
	let valid_mask: Vec<bool> = mask_buf
		.data()
		.iter()
		.zip(values.iter())
		.map(|(mask_value, value)| *mask_value > 0.0 && nodata.is_none_or(|nd| (value - nd).abs() > f64::EPSILON))
		.collect();

	Ok(MaskedBand { values, valid_mask })
}

/// Fraction of valid cells whose value is strictly greater than `threshold`
/// (spec §4.1 `fraction_over_threshold`). Returns `1.0` (the conservative
/// "all clouds" fallback, spec §7 `CloudUnknown`) if there are no valid
/// cells.
#[must_use]
pub fn fraction_over_threshold(masked: &MaskedBand, threshold: f64) -> f64 {
	let valid_count = masked.valid_count();
	if valid_count == 0 {
		return 1.0;
	}
	let over = masked
		.values
		.iter()
		.zip(masked.valid_mask.iter())
		.filter(|(_, valid)| **valid)
		.filter(|(value, _)| **value > threshold)
		.count();
	over as f64 / valid_count as f64
}

#[cfg(test)]
mod tests {
	use super::*;
	use approx::assert_relative_eq;

	#[test]
	fn empty_window_yields_conservative_fallback() {
		let masked = MaskedBand::empty();
		assert_relative_eq!(fraction_over_threshold(&masked, 0.0), 1.0);
	}

	#[test]
	fn fraction_counts_only_valid_cells_above_threshold() {
		let masked = MaskedBand { values: vec![0.0, 5.0, 10.0, 0.0], valid_mask: vec![true, true, true, false] };
		assert_relative_eq!(fraction_over_threshold(&masked, 0.0), 2.0 / 3.0);
	}

	#[test]
	fn all_invalid_cells_fall_back_to_one() {
		let masked = MaskedBand { values: vec![1.0, 2.0], valid_mask: vec![false, false] };
		assert_relative_eq!(fraction_over_threshold(&masked, 0.0), 1.0);
	}
}
