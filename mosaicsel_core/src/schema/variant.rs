use serde::{Deserialize, Serialize};

/// Which of the two incompatible MILP formulations from `original_source`
/// is active (spec §4.5, §9 "two incompatible MILP formulations").
///
/// Default is [`MilpVariant::LinearizedCoverageFloor`] (see `DESIGN.md`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "kebab-case")]
pub enum MilpVariant {
	/// Constraint 4: `yⱼ + yₖ ≤ 1` whenever `Iⱼₖ < THETA_OVERLAP`.
	PairDisjunction,
	/// Alternative constraint 4: linearized coverage floor with linking
	/// variables `ojₖ`, plus the cardinality penalty `ALPHA`.
	#[default]
	LinearizedCoverageFloor,
}

impl MilpVariant {
	/// The `Iⱼₖ` definition paired with this variant (spec §4.5, §9: "two
	/// definitions of Iⱼₖ ... both are preserved; pick and document").
	#[must_use]
	pub fn ijk_definition(self) -> IjkDefinition {
		match self {
			MilpVariant::PairDisjunction => IjkDefinition::ConservativeMin,
			MilpVariant::LinearizedCoverageFloor => IjkDefinition::SharedImageRatio,
		}
	}

	/// Whether the cardinality penalty `ALPHA` is active (spec §9: "default
	/// on for variant (b), off for variant (a)").
	#[must_use]
	pub fn cardinality_penalty_active(self) -> bool {
		matches!(self, MilpVariant::LinearizedCoverageFloor)
	}
}

/// Definition of the pairwise mosaic-intersection scalar `Iⱼₖ` (spec §4.5).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IjkDefinition {
	/// (a) `min(Aⱼ, Aₖ)` — conservative upper bound.
	ConservativeMin,
	/// (b) `min(Aⱼ, Aₖ) × shared_image_ratio`.
	SharedImageRatio,
}
