//! CRS, `BBox`, and `Polygon`/`MultiPolygon` wrappers over `geo`, with
//! `gdal`-backed reprojection and repair (C1's geometry half, spec §4.1/§3).

pub mod aoi;
pub mod bbox;
pub mod crs;
pub mod ops;
pub mod polygon;
pub mod reproject;

pub use aoi::load_aoi;
pub use bbox::BBox;
pub use crs::Crs;
pub use ops::{GeometryOps, union_all};
pub use polygon::MultiPolygon;
pub use reproject::reproject_polygon;
