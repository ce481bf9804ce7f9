//! Raster handle and the `RasterReader` capability trait (spec §4.1
//! `open_raster`, §9 "make the capability sets explicit").

use gdal::Dataset;
use gdal::spatial_ref::AxisMappingStrategy;
use mosaicsel_core::error::{PipelineError, Result};
use mosaicsel_geometry::{BBox, Crs};
use std::path::{Path, PathBuf};

/// A handle to an opened raster, carrying just the metadata the rest of the
/// pipeline needs (spec §4.1: `{width, height, crs, transform, band_count,
/// bounds}`). The underlying `gdal::Dataset` is not kept open across calls —
/// each read re-opens the file, matching the "single-use within a task,
/// released on any exit path" resource model of spec §5.
#[derive(Debug, Clone, PartialEq)]
pub struct RasterHandle {
	pub path: PathBuf,
	pub width: usize,
	pub height: usize,
	pub crs: Crs,
	/// GDAL's 6-element affine geo-transform `[origin_x, px_w, row_rot,
	/// origin_y, col_rot, px_h]`.
	pub transform: [f64; 6],
	pub band_count: usize,
	pub bounds: BBox,
}

/// The raster-reading capability C2/C3/C4 depend on (spec §9: explicit
/// capability sets instead of duck-typed "has these keys" polymorphism).
/// `mosaicsel_pipeline` depends on this trait, never on `gdal` directly.
pub trait RasterReader {
	fn open_raster(&self, path: &Path) -> Result<RasterHandle>;
	fn read_masked_band(
		&self,
		handle: &RasterHandle,
		band: usize,
		polygon_in_raster_crs: &mosaicsel_geometry::MultiPolygon,
	) -> Result<crate::mask::MaskedBand>;
}

/// The `gdal`-backed implementation of [`RasterReader`] used outside tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct GdalRasterReader;

impl RasterReader for GdalRasterReader {
	fn open_raster(&self, path: &Path) -> Result<RasterHandle> {
		open_raster(path)
	}

	fn read_masked_band(
		&self,
		handle: &RasterHandle,
		band: usize,
		polygon_in_raster_crs: &mosaicsel_geometry::MultiPolygon,
	) -> Result<crate::mask::MaskedBand> {
		crate::mask::read_masked_band(handle, band, polygon_in_raster_crs)
	}
}

/// Opens `path` with GDAL and derives `{width, height, crs, transform,
/// band_count, bounds}` (spec §4.1). An unreadable file or a dataset with no
/// determinable CRS is fatal (`BadRaster`) — the CRS is never guessed.
pub fn open_raster(path: &Path) -> Result<RasterHandle> {
	let dataset = Dataset::open(path).map_err(|e| PipelineError::BadRaster {
		path: path.display().to_string(),
		reason: e.to_string(),
	})?;

	let (width, height) = dataset.raster_size();
	let band_count = dataset.raster_count();

	let transform = dataset.geo_transform().map_err(|e| PipelineError::BadRaster {
		path: path.display().to_string(),
		reason: format!("no geo transform: {e}"),
	})?;
	if transform[2] != 0.0 || transform[4] != 0.0 {
		return Err(PipelineError::BadRaster {
			path: path.display().to_string(),
			reason: "rotated geo transforms are not supported".to_string(),
		});
	}

	let mut spatial_ref = dataset.spatial_ref().map_err(|e| PipelineError::BadRaster {
		path: path.display().to_string(),
		reason: format!("unknown CRS: {e}"),
	})?;
	spatial_ref.set_axis_mapping_strategy(AxisMappingStrategy::TraditionalGisOrder);
	let epsg = spatial_ref.auth_code().map_err(|e| PipelineError::BadRaster {
		path: path.display().to_string(),
		reason: format!("unknown CRS: {e}"),
	})?;
	let crs = Crs::new(format!("EPSG:{epsg}"));

	let left = transform[0];
	let top = transform[3];
	let right = left + transform[1] * width as f64;
	let bottom = top + transform[5] * height as f64;
	let bounds = BBox::new(left.min(right), bottom.min(top), left.max(right), bottom.max(top), crs.clone());

	Ok(RasterHandle { path: path.to_path_buf(), width, height, crs, transform, band_count, bounds })
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn missing_file_is_a_bad_raster_error() {
		let err = open_raster(Path::new("/nonexistent/does-not-exist.tif")).unwrap_err();
		assert!(matches!(err, PipelineError::BadRaster { .. }));
	}
}
