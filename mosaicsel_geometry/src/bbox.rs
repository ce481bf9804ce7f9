//! Axis-aligned bounding box in a stated CRS (spec §3 "BBox").

use geo::{LineString, Polygon};
use mosaicsel_core::schema::Bounds;

use crate::crs::Crs;

#[derive(Debug, Clone, PartialEq)]
pub struct BBox {
	pub left: f64,
	pub bottom: f64,
	pub right: f64,
	pub top: f64,
	pub crs: Crs,
}

impl BBox {
	#[must_use]
	pub fn new(left: f64, bottom: f64, right: f64, top: f64, crs: Crs) -> Self {
		BBox { left, bottom, right, top, crs }
	}

	#[must_use]
	pub fn width(&self) -> f64 {
		self.right - self.left
	}

	#[must_use]
	pub fn height(&self) -> f64 {
		self.top - self.bottom
	}

	/// The closed-ring rectangle polygon for this box, in its own CRS.
	#[must_use]
	pub fn to_polygon(&self) -> Polygon<f64> {
		Polygon::new(
			LineString::from(vec![
				(self.left, self.bottom),
				(self.right, self.bottom),
				(self.right, self.top),
				(self.left, self.top),
				(self.left, self.bottom),
			]),
			vec![],
		)
	}

	/// Converts to the plain-data schema type persisted in JSON artifacts
	/// (the CRS is recorded separately as a string in those schemas).
	#[must_use]
	pub fn to_schema_bounds(&self) -> Bounds {
		Bounds { left: self.left, bottom: self.bottom, right: self.right, top: self.top }
	}

	#[must_use]
	pub fn from_schema_bounds(bounds: Bounds, crs: Crs) -> Self {
		BBox { left: bounds.left, bottom: bounds.bottom, right: bounds.right, top: bounds.top, crs }
	}
}
