//! Minimal WKT rendering for handing polygons to `gdal::vector::Geometry`
//! (used by [`crate::mask::read_masked_band`]'s rasterize step). `geo` has no
//! bundled WKT writer without the optional `use-wkt` feature, which the
//! workspace doesn't otherwise need, so this renders just enough OGC WKT for
//! a `MultiPolygon` with no interior rings holes beyond the simple case.

use geo::{LineString, Polygon};
use std::fmt::Write as _;

fn ring_to_wkt(ring: &LineString<f64>, out: &mut String) {
	out.push('(');
	for (i, c) in ring.0.iter().enumerate() {
		if i > 0 {
			out.push(',');
		}
		let _ = write!(out, "{} {}", c.x, c.y);
	}
	out.push(')');
}

fn polygon_to_wkt(polygon: &Polygon<f64>, out: &mut String) {
	out.push('(');
	ring_to_wkt(polygon.exterior(), out);
	for interior in polygon.interiors() {
		out.push(',');
		ring_to_wkt(interior, out);
	}
	out.push(')');
}

/// Renders a `geo::MultiPolygon` as an OGC WKT `MULTIPOLYGON (...)` string.
/// An empty multi-polygon renders as `MULTIPOLYGON EMPTY`.
#[must_use]
pub fn multipolygon_to_wkt(mp: &geo::MultiPolygon<f64>) -> String {
	if mp.0.is_empty() {
		return "MULTIPOLYGON EMPTY".to_string();
	}
	let mut out = String::from("MULTIPOLYGON (");
	for (i, polygon) in mp.0.iter().enumerate() {
		if i > 0 {
			out.push(',');
		}
		polygon_to_wkt(polygon, &mut out);
	}
	out.push(')');
	out
}

#[cfg(test)]
mod tests {
	use super::*;
	use mosaicsel_geometry::polygon::rect;

	#[test]
	fn renders_a_single_square_as_multipolygon_wkt() {
		let mp = geo::MultiPolygon(vec![rect(0.0, 0.0, 1.0, 1.0)]);
		let wkt = multipolygon_to_wkt(&mp);
		assert!(wkt.starts_with("MULTIPOLYGON (((0 0,1 0,1 1,0 1,0 0)))"));
	}

	#[test]
	fn empty_multipolygon_renders_as_empty_keyword() {
		assert_eq!(multipolygon_to_wkt(&geo::MultiPolygon(vec![])), "MULTIPOLYGON EMPTY");
	}
}
