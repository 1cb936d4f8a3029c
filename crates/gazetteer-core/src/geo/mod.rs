// crates/gazetteer-core/src/geo/mod.rs

//! # Geometry Utilities
//!
//! Pure helpers shared by the store and the nearest-neighbour engine:
//! great-circle distance over [`Point`]s and canonical WKT for [`Polygon`]
//! shapes. Nothing in here holds state.

mod point;
mod wkt;

pub use point::{haversine_distance, Point, EARTH_RADIUS_METERS};
pub(crate) use point::latitude_band;
pub use wkt::Polygon;
