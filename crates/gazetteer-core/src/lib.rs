// crates/gazetteer-core/src/lib.rs

//! # gazetteer-core
//!
//! A gazetteer query engine: polymorphic feature storage (plain features,
//! cities, administrative divisions, countries), nearest-neighbour queries
//! over great-circle distance, and accent-insensitive full-text search with
//! interchangeable name particles (`St` / `Saint` / `Sainte`).
//!
//! ```rust
//! use gazetteer_core::prelude::*;
//!
//! let store = FeatureStore::default();
//! let paris = store
//!     .save(&Feature::city("Paris").with_feature_id(2988507).at(48.85341, 2.3488))
//!     .unwrap();
//! store.index().commit();
//!
//! assert_eq!(store.cities().search_text("PARIS", false).unwrap().len(), 1);
//! assert_eq!(store.get_by_feature_id(2988507).unwrap().unwrap().key(), paris.key());
//! ```

pub mod config;
mod consistency;
pub mod error;
pub mod geo;
pub mod index;
pub mod model;
pub mod nearest;
pub mod persist;
pub mod prelude;
mod search;
pub mod store;
pub mod text;
pub mod traits;

pub use crate::config::EngineConfig;
pub use crate::error::{GazetteerError, Result};
pub use crate::model::{
    AdmAttrs, AlternateName, AlternateNameSource, CityAttrs, CountryAttrs, Feature, FeatureKey,
    FeatureKind, GisFeatureDistance, Subtype, ZipCode,
};
pub use crate::nearest::{MunicipalityFilter, NearestQuery, Origin, Pagination};
pub use crate::store::{FeatureStore, KindView, Snapshot};
pub use crate::traits::{NameMatch, Persistence};
