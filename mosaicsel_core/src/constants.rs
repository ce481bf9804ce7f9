//! Literal thresholds and weights from spec §4. These are the spec's
//! authoritative constants, not the values used by any particular
//! `original_source` script run.

/// Numeric-comparison epsilon for probability-like values (§4.2 step 6).
pub const EPS_PROB: f64 = 1e-6;

/// Area-comparison epsilon against zero (§6 "Numeric semantics").
pub const AREA_EPS: f64 = 1e-9;

/// Minimum `geographic_coverage` for a tile to be accepted (§4.2 step 6).
pub const MIN_GEO: f64 = 0.02;

/// Minimum `effective_coverage` for a tile to be accepted is `0.5 * MIN_GEO`.
pub const MIN_EFFECTIVE_FACTOR: f64 = 0.5;

/// Maximum `cloud_coverage` for a tile to be accepted (§4.2 step 6).
pub const MAX_CLOUD: f64 = 0.40;

/// `effective_coverage` threshold for `central` vs `complement` (§4.2 step 7).
pub const CENTRAL_THRESHOLD: f64 = 0.30;

/// Weight blending mean quality and overlap quality in the compatibility
/// score (§4.3 step 7).
pub const OVERLAP_QUALITY_WEIGHT: f64 = 0.3;

/// Contribution-discount factor for a `central` candidate (§4.3 step 8).
pub const CONTRIBUTION_FACTOR_CENTRAL: f64 = 0.4;

/// Contribution-discount factor for a `complement` candidate (§4.3 step 8).
pub const CONTRIBUTION_FACTOR_COMPLEMENT: f64 = 0.2;

/// Bonus added to `effectiveness` when both tiles share an orbit (§4.3 step 9).
pub const ORBIT_BONUS: f64 = 0.05;

/// Redundancy ratio above which a tile pair is "highly redundant" (§4.4 step 2).
pub const REDUNDANCY_RATIO: f64 = 0.9;

/// Minimum unique-to-AOI contribution fraction to keep both tiles of a
/// redundant pair (§4.4 step 4).
pub const UNIQUE_CONTRIB: f64 = 0.05;

/// Cloud-penalty weight in the MILP objective (§4.5).
pub const GAMMA: f64 = 3.7;

/// Cardinality penalty weight, active only for [`MilpVariant::LinearizedCoverageFloor`]
/// (§4.5, §9).
///
/// [`MilpVariant::LinearizedCoverageFloor`]: crate::schema::MilpVariant::LinearizedCoverageFloor
pub const ALPHA: f64 = 0.4;

/// Overlap-score threshold for the pair-disjunction constraint (§4.5
/// constraint 4).
pub const THETA_OVERLAP: f64 = 0.80;

/// Minimum aggregate coverage floor for the linearized-coverage variant
/// (§4.5, alternative constraint 4).
pub const C_MIN: f64 = 0.85;

/// Maximum number of mosaics the selection may contain (§4.5 constraint 2).
pub const K_MAX: usize = 6;

/// Per-mosaic cloud veto threshold (§4.5 constraint 1). Same literal value
/// as [`MAX_CLOUD`] but named separately since it gates a different
/// quantity (max over a mosaic's tiles, not a single tile).
pub const CLOUD_MAX_MILP: f64 = 0.40;

/// Default greedy-composition time window, in days (§4.3; `original_source`
/// `MOSAIC_TIME_WINDOW_DAYS`).
pub const DEFAULT_TIME_WINDOW_DAYS: i64 = 5;
