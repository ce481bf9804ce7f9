//! Stable JSON schemas shared between pipeline stages (spec §6). Field names
//! are load-bearing and must not be renamed casually.

mod mosaic;
mod selection;
mod tile;
mod variant;

pub use mosaic::{AreaMetrics, ImageCatalogEntry, MosaicRecord, OptimizationParameters, OverlapDetail};
pub use selection::{Selection, SelectionDiagnostics};
pub use tile::{Bounds, Classification, TileRecord, TileStatus};
pub use variant::{IjkDefinition, MilpVariant};

/// Rounds every probability-like field to 6 decimals on the way out, per the
/// canonical serialization form of spec §8. Exposed as a helper for
/// `#[serde(serialize_with = "...")]` attributes on schema fields.
pub(crate) fn serialize_round6<S>(value: &f64, serializer: S) -> Result<S::Ok, S::Error>
where
	S: serde::Serializer,
{
	serializer.serialize_f64(crate::time_util::round6(*value))
}
