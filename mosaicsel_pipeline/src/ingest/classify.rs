//! Suitability decision and central/complement classification (spec §4.2
//! steps 6–7), grounded on `original_source/code/greedy_utils/metadata_utils.py`'s
//! `is_suitable_tile`/`classify_tile`.

use mosaicsel_core::constants::{CENTRAL_THRESHOLD, MAX_CLOUD, MIN_EFFECTIVE_FACTOR, MIN_GEO};
use mosaicsel_core::schema::Classification;

/// Why a tile was rejected (spec §4.2 step 6: "each rejection records a
/// typed reason").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectionReason {
	NoValidPixels,
	InsufficientGeographicCoverage,
	InsufficientEffectiveCoverage,
	ExcessiveCloudCoverage,
}

impl RejectionReason {
	#[must_use]
	pub fn as_str(self) -> &'static str {
		match self {
			RejectionReason::NoValidPixels => "no_valid_pixels",
			RejectionReason::InsufficientGeographicCoverage => "insufficient_geographic_coverage",
			RejectionReason::InsufficientEffectiveCoverage => "insufficient_effective_coverage",
			RejectionReason::ExcessiveCloudCoverage => "excessive_cloud_coverage",
		}
	}
}

/// Applies the four rejection rules of spec §4.2 step 6 in order, returning
/// the first that applies.
#[must_use]
pub fn reject_reason(geographic_coverage: f64, valid_pixels_percentage: f64, effective_coverage: f64, cloud_coverage: f64) -> Option<RejectionReason> {
	if valid_pixels_percentage <= mosaicsel_core::constants::EPS_PROB {
		return Some(RejectionReason::NoValidPixels);
	}
	if geographic_coverage < MIN_GEO {
		return Some(RejectionReason::InsufficientGeographicCoverage);
	}
	if effective_coverage < MIN_EFFECTIVE_FACTOR * MIN_GEO {
		return Some(RejectionReason::InsufficientEffectiveCoverage);
	}
	if cloud_coverage > MAX_CLOUD {
		return Some(RejectionReason::ExcessiveCloudCoverage);
	}
	None
}

/// Central/complement classification for an accepted tile (spec §4.2 step 7).
#[must_use]
pub fn classify(effective_coverage: f64) -> Classification {
	if effective_coverage >= CENTRAL_THRESHOLD { Classification::Central } else { Classification::Complement }
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn accepts_a_clean_well_covered_tile() {
		assert_eq!(reject_reason(0.95, 0.90, 0.855, 0.05), None);
	}

	#[test]
	fn rejects_on_zero_valid_pixels() {
		assert_eq!(reject_reason(0.95, 0.0, 0.0, 0.05), Some(RejectionReason::NoValidPixels));
	}

	#[test]
	fn rejects_below_minimum_geographic_coverage() {
		assert_eq!(reject_reason(0.01, 0.9, 0.009, 0.05), Some(RejectionReason::InsufficientGeographicCoverage));
	}

	#[test]
	fn rejects_below_minimum_effective_coverage() {
		// geographic_coverage passes MIN_GEO but valid_pixels_percentage is so
		// low that effective_coverage falls under 0.5 * MIN_GEO.
		assert_eq!(reject_reason(0.03, 0.1, 0.003, 0.05), Some(RejectionReason::InsufficientEffectiveCoverage));
	}

	#[test]
	fn cloud_coverage_exactly_at_threshold_is_accepted() {
		assert_eq!(reject_reason(0.95, 0.9, 0.855, 0.40), None);
	}

	#[test]
	fn rejects_above_max_cloud() {
		assert_eq!(reject_reason(0.95, 0.9, 0.855, 0.41), Some(RejectionReason::ExcessiveCloudCoverage));
	}

	#[test]
	fn classifies_central_at_exactly_the_threshold() {
		assert_eq!(classify(CENTRAL_THRESHOLD), Classification::Central);
	}

	#[test]
	fn classifies_complement_below_the_threshold() {
		assert_eq!(classify(CENTRAL_THRESHOLD - 0.01), Classification::Complement);
	}
}
