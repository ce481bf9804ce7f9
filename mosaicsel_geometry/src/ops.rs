//! Geometry operations required by spec §3: area, intersects, intersection,
//! union (n-ary), difference, `buffer(0)` repair, validity test.
//!
//! Implemented via `geo`'s `BooleanOps`/`Area` traits; C4 (`mosaicsel_pipeline`)
//! depends only on this trait, never on `geo` directly (spec §9 "make the
//! capability sets explicit").

use geo::{Area, BooleanOps, unary_union};

use crate::polygon::MultiPolygon;

/// The geometry-ops capability C4 depends on (spec §9: explicit capability
/// sets instead of duck-typed "has these keys" polymorphism).
pub trait GeometryOps {
	fn area(&self) -> f64;
	fn intersects(&self, other: &Self) -> bool;
	fn intersection(&self, other: &Self) -> Self;
	fn union(&self, other: &Self) -> Self;
	fn difference(&self, other: &Self) -> Self;
	/// Zero-width-buffer repair (the idiomatic `geo` equivalent of Shapely's
	/// `buffer(0)` — `geo` has no native buffer operator): a self-union,
	/// which normalizes ring orientation and removes self-intersections in
	/// common cases.
	fn repair(&self) -> Self;
	/// Heuristic OGC-simple-features validity test: nonempty, every ring
	/// closed with ≥ 4 points, finite coordinates, nonzero unsigned area.
	fn is_valid(&self) -> bool;
}

impl GeometryOps for MultiPolygon {
	fn area(&self) -> f64 {
		self.geometry.unsigned_area()
	}

	fn intersects(&self, other: &Self) -> bool {
		debug_assert_eq!(self.crs, other.crs, "intersects() requires both geometries in the same CRS");
		!self.geometry.intersection(&other.geometry).0.is_empty()
	}

	fn intersection(&self, other: &Self) -> Self {
		debug_assert_eq!(self.crs, other.crs, "intersection() requires both geometries in the same CRS");
		MultiPolygon::new(self.geometry.intersection(&other.geometry), self.crs.clone())
	}

	fn union(&self, other: &Self) -> Self {
		debug_assert_eq!(self.crs, other.crs, "union() requires both geometries in the same CRS");
		MultiPolygon::new(self.geometry.union(&other.geometry), self.crs.clone())
	}

	fn difference(&self, other: &Self) -> Self {
		debug_assert_eq!(self.crs, other.crs, "difference() requires both geometries in the same CRS");
		MultiPolygon::new(self.geometry.difference(&other.geometry), self.crs.clone())
	}

	fn repair(&self) -> Self {
		MultiPolygon::new(self.geometry.union(&self.geometry), self.crs.clone())
	}

	fn is_valid(&self) -> bool {
		if self.geometry.0.is_empty() {
			return false;
		}
		self.geometry.0.iter().all(|polygon| {
			let ring = polygon.exterior();
			ring.0.len() >= 4
				&& ring.0.first() == ring.0.last()
				&& ring.0.iter().all(|c| c.x.is_finite() && c.y.is_finite())
		}) && self.geometry.unsigned_area() > 0.0
	}
}

/// True n-ary union of many footprints in the same CRS (spec §4.4 "real
/// union"). Returns an empty multi-polygon if `polygons` is empty.
#[must_use]
pub fn union_all(polygons: &[MultiPolygon]) -> MultiPolygon {
	let Some(first) = polygons.first() else {
		return MultiPolygon::empty(crate::crs::Crs::wgs84());
	};
	let rings: Vec<geo::Polygon<f64>> = polygons.iter().flat_map(|mp| mp.geometry.0.clone()).collect();
	MultiPolygon::new(unary_union(&rings), first.crs.clone())
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::crs::Crs;
	use crate::polygon::rect;
	use approx::assert_relative_eq;

	fn square(left: f64, bottom: f64, right: f64, top: f64) -> MultiPolygon {
		MultiPolygon::from_polygon(rect(left, bottom, right, top), Crs::wgs84())
	}

	// ── area ──────────────────────────────────────────────────────────

	#[test]
	fn area_of_unit_square_is_one() {
		assert_relative_eq!(square(0.0, 0.0, 1.0, 1.0).area(), 1.0);
	}

	// ── intersects / intersection ────────────────────────────────────

	#[test]
	fn overlapping_squares_intersect() {
		let a = square(0.0, 0.0, 2.0, 2.0);
		let b = square(1.0, 1.0, 3.0, 3.0);
		assert!(a.intersects(&b));
		assert_relative_eq!(a.intersection(&b).area(), 1.0);
	}

	#[test]
	fn disjoint_squares_do_not_intersect() {
		let a = square(0.0, 0.0, 1.0, 1.0);
		let b = square(2.0, 2.0, 3.0, 3.0);
		assert!(!a.intersects(&b));
		assert_relative_eq!(a.intersection(&b).area(), 0.0);
	}

	// ── union / union_all ────────────────────────────────────────────

	#[test]
	fn union_of_overlapping_squares_avoids_double_counting() {
		let a = square(0.0, 0.0, 2.0, 2.0);
		let b = square(1.0, 0.0, 3.0, 2.0);
		assert_relative_eq!(a.union(&b).area(), 6.0);
	}

	#[test]
	fn union_all_of_three_disjoint_squares_sums_areas() {
		let polys = vec![square(0.0, 0.0, 1.0, 1.0), square(2.0, 0.0, 3.0, 1.0), square(4.0, 0.0, 5.0, 1.0)];
		assert_relative_eq!(union_all(&polys).area(), 3.0);
	}

	#[test]
	fn union_all_of_empty_slice_is_empty() {
		assert!(union_all(&[]).is_empty());
	}

	// ── difference ────────────────────────────────────────────────────

	#[test]
	fn difference_removes_the_overlapping_part() {
		let a = square(0.0, 0.0, 2.0, 1.0);
		let b = square(1.0, 0.0, 2.0, 1.0);
		assert_relative_eq!(a.difference(&b).area(), 1.0);
	}

	// ── repair / is_valid ─────────────────────────────────────────────

	#[test]
	fn well_formed_square_is_valid() {
		assert!(square(0.0, 0.0, 1.0, 1.0).is_valid());
	}

	#[test]
	fn empty_multipolygon_is_invalid() {
		assert!(!MultiPolygon::empty(Crs::wgs84()).is_valid());
	}

	#[test]
	fn repair_of_a_simple_polygon_preserves_its_area() {
		let a = square(0.0, 0.0, 1.0, 1.0);
		assert_relative_eq!(a.repair().area(), a.area());
	}
}
