//! Raster access (C1's raster half, spec §4.1): opening rasters, masked-band
//! reads restricted to an AOI polygon, and threshold-fraction arithmetic.
//! Built on `gdal`, the same crate the teacher's `versatiles_pipeline`
//! `from_gdal` operations already use to read GeoTIFF/JP2 rasters.

pub mod handle;
pub mod mask;
mod wkt;

pub use handle::{GdalRasterReader, RasterHandle, RasterReader, open_raster};
pub use mask::{MaskedBand, fraction_over_threshold, read_masked_band};
