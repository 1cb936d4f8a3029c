// crates/gazetteer-core/src/model/mod.rs

//! Domain types: the polymorphic [`Feature`], its owned collections, and the
//! [`GisFeatureDistance`] query projection.

mod association;
mod distance;
mod feature;

pub(crate) use association::LoadScope;
pub use association::Association;
pub use distance::GisFeatureDistance;
pub use feature::{
    AdmAttrs, AlternateName, AlternateNameSource, CityAttrs, CountryAttrs, Feature, FeatureKey,
    FeatureKind, Subtype, ZipCode,
};
