// crates/gazetteer-core/src/persist/record.rs
use crate::error::{GazetteerError, Result};
use crate::geo::Polygon;
use crate::model::{AlternateName, Feature, FeatureKey, Subtype};
use crate::store::FeatureStore;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, info};

/// One feature in fixture form: flat, self-contained and keyed by external
/// feature id. The admin division is referenced by its feature id.
///
/// ```json
/// { "kind": "city", "feature_id": 2988507, "name": "Paris",
///   "lat": 48.85341, "lng": 2.3488, "municipality": true,
///   "zip_codes": ["75001"], "adm_feature_id": 3012874 }
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FeatureRecord {
    pub feature_id: i64,
    pub name: String,
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lng: Option<f64>,
    #[serde(default)]
    pub feature_class: Option<String>,
    #[serde(default)]
    pub feature_code: Option<String>,
    #[serde(default)]
    pub country_code: Option<String>,
    #[serde(default)]
    pub population: Option<u32>,
    /// `POLYGON((lng lat, ...))`
    #[serde(default)]
    pub shape_wkt: Option<String>,
    #[serde(default)]
    pub alternate_names: Vec<AlternateName>,
    #[serde(default)]
    pub adm_feature_id: Option<i64>,
    #[serde(flatten)]
    pub subtype: Subtype,
}

impl FeatureRecord {
    /// The feature described, without its admin reference.
    pub fn to_feature(&self) -> Result<Feature> {
        let mut feature = Feature::with_subtype(self.name.clone(), self.subtype.clone())
            .with_feature_id(self.feature_id);
        feature.location = match (self.lat, self.lng) {
            (Some(lat), Some(lng)) => Some(crate::geo::Point::new(lat, lng)),
            (None, None) => None,
            _ => {
                return Err(GazetteerError::InvalidData(format!(
                    "feature {} has only one of lat/lng",
                    self.feature_id
                )))
            }
        };
        feature.feature_class = self.feature_class.clone();
        feature.feature_code = self.feature_code.clone();
        feature.country_code = self.country_code.clone();
        feature.population = self.population;
        feature.shape = self.shape_wkt.as_deref().map(Polygon::from_wkt).transpose()?;
        for alternate in &self.alternate_names {
            feature.add_alternate_name(alternate.clone())?;
        }
        Ok(feature)
    }
}

impl FeatureStore {
    /// Save `records`, then link admin references by feature id (the
    /// division may come later in the list, or already be stored). Unknown
    /// admin ids leave the reference unset. Returns the number of records
    /// saved; the text index is staged, not committed.
    pub fn import_records(&self, records: &[FeatureRecord]) -> Result<usize> {
        let mut keys: HashMap<i64, FeatureKey> = HashMap::with_capacity(records.len());
        for record in records {
            let saved = self.save(&record.to_feature()?)?;
            if let Some(key) = saved.key() {
                keys.insert(record.feature_id, key);
            }
        }

        let mut linked = 0usize;
        for record in records {
            let Some(adm_id) = record.adm_feature_id else {
                continue;
            };
            let adm = match keys.get(&adm_id) {
                Some(key) => self.get(*key)?,
                None => self.get_by_feature_id(adm_id)?,
            };
            let (Some(adm), Some(key)) = (adm, keys.get(&record.feature_id)) else {
                debug!(feature_id = record.feature_id, adm_id, "admin division not found");
                continue;
            };
            if let Some(mut feature) = self.get_eager(*key)? {
                feature.set_adm(Some(&adm));
                self.save(&feature)?;
                linked += 1;
            }
        }
        info!(records = records.len(), linked, "records imported");
        Ok(records.len())
    }
}
