use serde::{Deserialize, Serialize};

use super::serialize_round6;

/// Outcome of C2 ingestion for one bundle (spec §4.2 step 6).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TileStatus {
	Accepted,
	Rejected,
	Error,
}

/// Classification of an accepted tile (spec §4.2 step 7).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Classification {
	Central,
	Complement,
}

/// Axis-aligned bounds in a stated CRS (spec §3 "BBox").
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
	pub left: f64,
	pub bottom: f64,
	pub right: f64,
	pub top: f64,
}

/// Per-tile metadata record, one per accepted/rejected/errored bundle
/// (spec §6 "Per-tile metadata record").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TileRecord {
	pub filename: String,
	pub status: TileStatus,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub class: Option<Classification>,
	/// Canonical lowercase ISO-8601, or `null` if the date could not be
	/// determined from XML or filename (spec §4.2 step 2).
	pub date: Option<String>,
	pub orbit: Option<u32>,
	#[serde(serialize_with = "serialize_round6")]
	pub geographic_coverage: f64,
	#[serde(serialize_with = "serialize_round6")]
	pub valid_pixels_percentage: f64,
	#[serde(serialize_with = "serialize_round6")]
	pub effective_coverage: f64,
	#[serde(serialize_with = "serialize_round6")]
	pub cloud_coverage: f64,
	pub bounds: Option<Bounds>,
	pub crs: Option<String>,
	pub tci_path: String,
	pub cloud_mask_path: String,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub reason: Option<String>,
}

impl TileRecord {
	/// Asserts the invariants of spec §3/§8 that must hold for every record
	/// regardless of status.
	pub fn debug_assert_invariants(&self) {
		debug_assert!((0.0..=1.0).contains(&self.geographic_coverage));
		debug_assert!((0.0..=1.0).contains(&self.valid_pixels_percentage));
		debug_assert!((0.0..=1.0).contains(&self.cloud_coverage));
		debug_assert!(
			(self.effective_coverage - self.geographic_coverage * self.valid_pixels_percentage).abs() < 1e-9
		);
		debug_assert!(self.crs.is_none() || self.bounds.is_some());
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use pretty_assertions::assert_eq;

	fn sample() -> TileRecord {
		TileRecord {
			filename: "T1.zip".into(),
			status: TileStatus::Accepted,
			class: Some(Classification::Central),
			date: Some("2023-06-15t10:30:00z".into()),
			orbit: Some(22),
			geographic_coverage: 0.95,
			valid_pixels_percentage: 0.9,
			effective_coverage: 0.855,
			cloud_coverage: 0.05,
			bounds: Some(Bounds { left: 0.0, bottom: 0.0, right: 1.0, top: 1.0 }),
			crs: Some("EPSG:4326".into()),
			tci_path: "T1/TCI.jp2".into(),
			cloud_mask_path: "T1/CLD.jp2".into(),
			reason: None,
		}
	}

	#[test]
	fn invariants_hold_for_a_well_formed_record() {
		sample().debug_assert_invariants();
	}

	#[test]
	fn round_trips_through_json() {
		let record = sample();
		let text = serde_json::to_string(&record).unwrap();
		let back: TileRecord = serde_json::from_str(&text).unwrap();
		assert_eq!(record, back);
	}

	#[test]
	fn rejected_without_class_omits_the_field() {
		let mut record = sample();
		record.status = TileStatus::Rejected;
		record.class = None;
		record.reason = Some("cloud_coverage_above_threshold".into());
		let value = serde_json::to_value(&record).unwrap();
		assert!(value.get("class").is_none());
		assert_eq!(value["reason"], "cloud_coverage_above_threshold");
	}
}
