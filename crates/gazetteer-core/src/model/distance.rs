// crates/gazetteer-core/src/model/distance.rs
use super::{FeatureKey, FeatureKind};
use crate::geo::Point;
use crate::store::BaseRow;
use serde::Serialize;

/// One row of a nearest-neighbour answer. Built per query, never stored.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct GisFeatureDistance {
    pub key: FeatureKey,
    pub feature_id: Option<i64>,
    pub name: String,
    pub kind: FeatureKind,
    pub location: Option<Point>,
    pub feature_class: Option<String>,
    pub feature_code: Option<String>,
    pub country_code: Option<String>,
    pub population: Option<u32>,
    pub municipality: bool,
    /// Meters from the origin; `None` when the query did not ask for it.
    pub distance: Option<f64>,
}

impl GisFeatureDistance {
    pub(crate) fn from_row(
        key: FeatureKey,
        row: &BaseRow,
        municipality: bool,
        distance: Option<f64>,
    ) -> Self {
        Self {
            key,
            feature_id: row.feature_id,
            name: row.name.clone(),
            kind: row.kind,
            location: row.location,
            feature_class: row.feature_class.clone(),
            feature_code: row.feature_code.clone(),
            country_code: row.country_code.clone(),
            population: row.population,
            municipality,
            distance,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn distance(&self) -> Option<f64> {
        self.distance
    }
}
