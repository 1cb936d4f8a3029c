//! gazetteer-core prelude: the common types and traits in one import.

#![allow(unused_imports)]

pub use crate::config::EngineConfig;
pub use crate::error::{GazetteerError, Result};
pub use crate::geo::{Point, Polygon};
pub use crate::model::{
    AlternateName, AlternateNameSource, Feature, FeatureKey, FeatureKind, GisFeatureDistance,
    Subtype,
};
pub use crate::nearest::{MunicipalityFilter, NearestQuery, Origin, Pagination};
#[cfg(feature = "json")]
pub use crate::persist::load_features_json;
pub use crate::persist::{FeatureRecord, SnapshotFile};
pub use crate::store::FeatureStore;
pub use crate::text::{fold_key, match_key};
pub use crate::traits::{NameMatch, Persistence};
