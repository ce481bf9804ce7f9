//! C2 tile ingestion orchestration (spec §4.2): ties bundle extraction,
//! raster access, date/orbit extraction and suitability/classification
//! together into one [`TileRecord`] per bundle. Grounded on
//! `original_source/code/greedy_utils/image_processing.py`'s
//! `calculate_coverage_metrics`/`calculate_cloud_coverage`/
//! `check_image_suitability` and `2-compatibility-greedy.py`'s per-bundle
//! ingestion loop.

pub mod bundle;
pub mod classify;
pub mod xml_date;

use std::path::Path;

use mosaicsel_core::constants::AREA_EPS;
use mosaicsel_core::error::Result;
use mosaicsel_core::schema::{Bounds, TileRecord, TileStatus};
use mosaicsel_core::time_util::to_canonical_string;
use mosaicsel_geometry::{GeometryOps, MultiPolygon, reproject_polygon};
use mosaicsel_raster::{RasterHandle, RasterReader, fraction_over_threshold};

use bundle::extract_bundle;
use classify::{classify, reject_reason};
use xml_date::{extract_date, extract_orbit};

const TCI_BAND: usize = 1;
const CLOUD_BAND: usize = 1;

/// Ingests one bundle against `aoi_wgs84` (spec §4.2). Never returns an
/// `Err`: every failure mode becomes a `status: "error"` or `status:
/// "rejected"` record (spec §7: per-item errors are recorded, not
/// propagated — "the pipeline never conflates 'tile error' with 'batch
/// error'").
pub fn ingest_tile<R: RasterReader>(bundle_path: &Path, aoi_wgs84: &MultiPolygon, raster_reader: &R) -> TileRecord {
	let filename =
		bundle_path.file_name().map(|n| n.to_string_lossy().to_string()).unwrap_or_else(|| bundle_path.display().to_string());

	let artifacts = match extract_bundle(bundle_path) {
		Ok(artifacts) => artifacts,
		Err(e) => return error_record(filename, e.to_string()),
	};

	let tci_handle = match raster_reader.open_raster(&artifacts.tci_path) {
		Ok(handle) => handle,
		Err(e) => return error_record(filename, e.to_string()),
	};

	let date = extract_date(&artifacts.xml_path, &filename).map(to_canonical_string);
	let orbit = extract_orbit(&filename);

	let aoi_area_wgs84 = aoi_wgs84.area();
	let (geographic_coverage, valid_pixels_percentage) =
		match coverage_metrics(aoi_wgs84, aoi_area_wgs84, &tci_handle, raster_reader) {
			Ok(metrics) => metrics,
			Err(e) => return error_record(filename, e.to_string()),
		};
	let effective_coverage = geographic_coverage * valid_pixels_percentage;

	let cloud_coverage = cloud_coverage_in_aoi(aoi_wgs84, &artifacts.cloud_path, raster_reader).unwrap_or(1.0);

	let bounds = Some(Bounds {
		left: tci_handle.bounds.left,
		bottom: tci_handle.bounds.bottom,
		right: tci_handle.bounds.right,
		top: tci_handle.bounds.top,
	});
	let crs = Some(tci_handle.crs.as_str().to_string());
	let tci_path = format!("{filename}/{}", artifacts.tci_member);
	let cloud_mask_path = format!("{filename}/{}", artifacts.cloud_member);

	if let Some(reason) = reject_reason(geographic_coverage, valid_pixels_percentage, effective_coverage, cloud_coverage) {
		return TileRecord {
			filename,
			status: TileStatus::Rejected,
			class: None,
			date,
			orbit,
			geographic_coverage,
			valid_pixels_percentage,
			effective_coverage,
			cloud_coverage,
			bounds,
			crs,
			tci_path,
			cloud_mask_path,
			reason: Some(reason.as_str().to_string()),
		};
	}

	TileRecord {
		filename,
		status: TileStatus::Accepted,
		class: Some(classify(effective_coverage)),
		date,
		orbit,
		geographic_coverage,
		valid_pixels_percentage,
		effective_coverage,
		cloud_coverage,
		bounds,
		crs,
		tci_path,
		cloud_mask_path,
		reason: None,
	}
}

fn error_record(filename: String, reason: String) -> TileRecord {
	TileRecord {
		filename,
		status: TileStatus::Error,
		class: None,
		date: None,
		orbit: None,
		geographic_coverage: 0.0,
		valid_pixels_percentage: 0.0,
		effective_coverage: 0.0,
		cloud_coverage: 1.0,
		bounds: None,
		crs: None,
		tci_path: String::new(),
		cloud_mask_path: String::new(),
		reason: Some(reason),
	}
}

/// `geographic_coverage` and `valid_pixels_percentage` (spec §4.2 step 4).
/// `geographic_coverage` intentionally divides a TCI-CRS intersection area
/// by a WGS84 AOI area, matching the source's
/// `min(1.0, intersection_area / aoi_area_wgs84)` exactly rather than
/// "fixing" the unit mismatch.
fn coverage_metrics<R: RasterReader>(
	aoi_wgs84: &MultiPolygon,
	aoi_area_wgs84: f64,
	tci_handle: &RasterHandle,
	raster_reader: &R,
) -> Result<(f64, f64)> {
	let aoi_in_tci_crs = reproject_polygon(aoi_wgs84, &tci_handle.crs)?;
	let bounds_polygon = MultiPolygon::from_polygon(tci_handle.bounds.to_polygon(), tci_handle.crs.clone());
	let intersection_area = aoi_in_tci_crs.intersection(&bounds_polygon).area();

	let geographic_coverage =
		if aoi_area_wgs84 > AREA_EPS { (intersection_area / aoi_area_wgs84).min(1.0).max(0.0) } else { 0.0 };

	let masked = raster_reader.read_masked_band(tci_handle, TCI_BAND, &aoi_in_tci_crs)?;
	let total_in_aoi = masked.valid_mask.iter().filter(|v| **v).count();
	let valid_pixels_percentage = if total_in_aoi > 0 {
		let positive = masked.values.iter().zip(masked.valid_mask.iter()).filter(|(_, valid)| **valid).filter(|(v, _)| **v > 0.0).count();
		positive as f64 / total_in_aoi as f64
	} else {
		0.0
	};

	Ok((geographic_coverage, valid_pixels_percentage))
}

/// `cloud_coverage` (spec §4.2 step 5). Any failure along this path is
/// mapped by the caller to the conservative `CloudUnknown` value `1.0`.
fn cloud_coverage_in_aoi<R: RasterReader>(aoi_wgs84: &MultiPolygon, cloud_path: &Path, raster_reader: &R) -> Result<f64> {
	let cloud_handle = raster_reader.open_raster(cloud_path)?;
	let aoi_in_cloud_crs = reproject_polygon(aoi_wgs84, &cloud_handle.crs)?;
	let masked = raster_reader.read_masked_band(&cloud_handle, CLOUD_BAND, &aoi_in_cloud_crs)?;
	Ok(fraction_over_threshold(&masked, 0.0))
}
