//! Coordinate reference system identifiers (spec §3 "CRS").

use std::fmt;

/// An opaque CRS identifier (authority + code, e.g. `"EPSG:31984"`).
///
/// WGS84 geographic (`"EPSG:4326"`) is the pivot CRS used whenever no
/// natural common CRS exists between two geometries (spec §3).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Crs(String);

impl Crs {
	#[must_use]
	pub fn new(authority_code: impl Into<String>) -> Self {
		Crs(authority_code.into())
	}

	/// The pivot geodetic CRS (spec §3, §4.3 step 3).
	#[must_use]
	pub fn wgs84() -> Self {
		Crs("EPSG:4326".to_string())
	}

	#[must_use]
	pub fn as_str(&self) -> &str {
		&self.0
	}

	/// The EPSG code, if this identifier is of the form `EPSG:<code>`.
	#[must_use]
	pub fn epsg_code(&self) -> Option<u32> {
		self.0.strip_prefix("EPSG:").and_then(|s| s.parse().ok())
	}
}

impl fmt::Display for Crs {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

impl From<String> for Crs {
	fn from(value: String) -> Self {
		Crs(value)
	}
}

impl From<&str> for Crs {
	fn from(value: &str) -> Self {
		Crs(value.to_string())
	}
}
