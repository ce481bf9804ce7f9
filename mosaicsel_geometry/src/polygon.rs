//! A `geo::MultiPolygon` paired with its CRS (spec §3 "Polygon / MultiPolygon").

use geo::{Polygon, coord};

use crate::crs::Crs;

/// 2D multi-polygon geometry with an associated CRS. Wraps `geo::MultiPolygon<f64>`
/// so every operation in `ops::GeometryOps` carries its CRS along for free.
#[derive(Debug, Clone, PartialEq)]
pub struct MultiPolygon {
	pub geometry: geo::MultiPolygon<f64>,
	pub crs: Crs,
}

impl MultiPolygon {
	#[must_use]
	pub fn new(geometry: geo::MultiPolygon<f64>, crs: Crs) -> Self {
		MultiPolygon { geometry, crs }
	}

	#[must_use]
	pub fn from_polygon(polygon: Polygon<f64>, crs: Crs) -> Self {
		MultiPolygon { geometry: geo::MultiPolygon(vec![polygon]), crs }
	}

	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.geometry.0.is_empty() || self.geometry.0.iter().all(|p| p.exterior().0.is_empty())
	}

	/// An empty multi-polygon in the given CRS, the identity for union.
	#[must_use]
	pub fn empty(crs: Crs) -> Self {
		MultiPolygon { geometry: geo::MultiPolygon(vec![]), crs }
	}
}

/// A closed-ring rectangle, used in tests and as the canonical tile-footprint shape.
#[must_use]
pub fn rect(left: f64, bottom: f64, right: f64, top: f64) -> Polygon<f64> {
	Polygon::new(
		geo::LineString(vec![
			coord! { x: left, y: bottom },
			coord! { x: right, y: bottom },
			coord! { x: right, y: top },
			coord! { x: left, y: top },
			coord! { x: left, y: bottom },
		]),
		vec![],
	)
}
