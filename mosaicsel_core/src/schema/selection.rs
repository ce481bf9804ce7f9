use serde::{Deserialize, Serialize};

use super::MosaicRecord;
use super::variant::MilpVariant;

/// Selection output: an array of the selected, C4-enriched mosaic records,
/// preserving all of their fields (spec §6 "Selection output").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Selection {
	pub mosaics: Vec<MosaicRecord>,
}

/// Diagnostics reported alongside a selection (spec §4.5 "Incremental
/// coverage validation"): the solver's objective value and the witness's
/// running incremental coverage `Cᵣ`. Not part of the load-bearing `§6`
/// array shape; written to a sibling diagnostics file by the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SelectionDiagnostics {
	pub variant: MilpVariant,
	pub objective_value: f64,
	pub incremental_coverage: f64,
	pub selected_count: usize,
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn selection_serializes_as_a_bare_json_array() {
		let selection = Selection { mosaics: vec![] };
		let text = serde_json::to_string(&selection).unwrap();
		assert_eq!(text, "[]");
	}
}
