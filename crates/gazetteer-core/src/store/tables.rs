// crates/gazetteer-core/src/store/tables.rs
use crate::error::{GazetteerError, Result};
use crate::geo::{Point, Polygon};
use crate::model::{
    AdmAttrs, AlternateName, CityAttrs, CountryAttrs, Feature, FeatureKey, FeatureKind, Subtype,
    ZipCode,
};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// The base record every feature has, whatever its kind. `kind` is the
/// discriminant naming the specialization table that holds the rest.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub(crate) struct BaseRow {
    pub kind: FeatureKind,
    pub feature_id: Option<i64>,
    pub name: String,
    pub location: Option<Point>,
    pub feature_class: Option<String>,
    pub feature_code: Option<String>,
    pub country_code: Option<String>,
    pub population: Option<u32>,
    pub shape: Option<Polygon>,
    pub adm: Option<FeatureKey>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub(crate) struct CityRow {
    pub municipality: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub(crate) struct AlternateNameRow {
    pub owner: FeatureKey,
    pub alternate: AlternateName,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub(crate) struct ZipCodeRow {
    pub owner: FeatureKey,
    pub code: ZipCode,
}

/// All rows of the store.
///
/// Specialization rows share the key of their base row. Alternate names and
/// zip codes live in arenas reachable only through their owner; the owner
/// indexes are derived and rebuilt after deserialization.
#[derive(Debug, Default, Serialize, Deserialize)]
pub(crate) struct Tables {
    next_key: u64,
    next_owned: u64,
    pub base: BTreeMap<FeatureKey, BaseRow>,
    pub cities: BTreeMap<FeatureKey, CityRow>,
    pub adms: BTreeMap<FeatureKey, AdmAttrs>,
    pub countries: BTreeMap<FeatureKey, CountryAttrs>,
    alternate_names: BTreeMap<u64, AlternateNameRow>,
    zip_codes: BTreeMap<u64, ZipCodeRow>,

    #[serde(skip)]
    by_feature_id: HashMap<i64, FeatureKey>,
    #[serde(skip)]
    names_by_owner: HashMap<FeatureKey, BTreeSet<u64>>,
    #[serde(skip)]
    zips_by_owner: HashMap<FeatureKey, BTreeSet<u64>>,
}

impl Tables {
    /// Rebuild the derived indexes and check the polymorphic invariants.
    pub fn reindex(&mut self) -> Result<()> {
        self.by_feature_id.clear();
        self.names_by_owner.clear();
        self.zips_by_owner.clear();

        for (key, row) in &self.base {
            if let Some(fid) = row.feature_id {
                if self.by_feature_id.insert(fid, *key).is_some() {
                    return Err(GazetteerError::DuplicateFeatureId(fid));
                }
            }
            let rows = [
                self.cities.contains_key(key),
                self.adms.contains_key(key),
                self.countries.contains_key(key),
            ];
            let expected = [
                row.kind == FeatureKind::City,
                row.kind == FeatureKind::Adm,
                row.kind == FeatureKind::Country,
            ];
            if rows != expected {
                return Err(GazetteerError::InvalidData(format!(
                    "feature {key} is tagged {} but its specialization rows disagree",
                    row.kind
                )));
            }
        }
        for (id, row) in &self.alternate_names {
            self.names_by_owner.entry(row.owner).or_default().insert(*id);
        }
        for (id, row) in &self.zip_codes {
            self.zips_by_owner.entry(row.owner).or_default().insert(*id);
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.base.len()
    }

    pub fn key_for_feature_id(&self, feature_id: i64) -> Option<FeatureKey> {
        self.by_feature_id.get(&feature_id).copied()
    }

    pub fn max_feature_id(&self) -> Option<i64> {
        self.by_feature_id.keys().copied().max()
    }

    /// Fail when `feature_id` already belongs to a feature other than `key`.
    pub fn check_feature_id(&self, feature_id: Option<i64>, key: Option<FeatureKey>) -> Result<()> {
        match feature_id.and_then(|fid| self.by_feature_id.get(&fid).map(|k| (fid, *k))) {
            Some((fid, owner)) if Some(owner) != key => Err(GazetteerError::DuplicateFeatureId(fid)),
            _ => Ok(()),
        }
    }

    pub fn allocate_key(&mut self) -> FeatureKey {
        self.next_key += 1;
        FeatureKey(self.next_key)
    }

    fn allocate_owned(&mut self) -> u64 {
        self.next_owned += 1;
        self.next_owned
    }

    /// Write base + specialization rows for `feature` under `key`, replacing
    /// whatever was stored there. `alternate_names` is `None` when the caller
    /// never loaded them; existing rows are then left alone.
    pub fn put(&mut self, key: FeatureKey, feature: &Feature, alternate_names: Option<&[AlternateName]>) {
        if let Some(old) = self.base.get(&key) {
            if let Some(fid) = old.feature_id {
                self.by_feature_id.remove(&fid);
            }
        }
        let row = BaseRow {
            kind: feature.kind(),
            feature_id: feature.feature_id,
            name: feature.name.clone(),
            location: feature.location,
            feature_class: feature.feature_class.clone(),
            feature_code: feature.feature_code.clone(),
            country_code: feature.country_code.clone(),
            population: feature.population,
            shape: feature.shape.clone(),
            adm: feature.adm_key(),
        };
        if let Some(fid) = row.feature_id {
            self.by_feature_id.insert(fid, key);
        }
        self.base.insert(key, row);

        // at most one specialization row per key
        self.cities.remove(&key);
        self.adms.remove(&key);
        self.countries.remove(&key);
        self.drop_zip_codes(key);
        match &feature.subtype {
            Subtype::Feature => {}
            Subtype::City(city) => {
                self.cities.insert(
                    key,
                    CityRow {
                        municipality: city.municipality,
                    },
                );
                for code in &city.zip_codes {
                    let id = self.allocate_owned();
                    self.zip_codes.insert(
                        id,
                        ZipCodeRow {
                            owner: key,
                            code: code.clone(),
                        },
                    );
                    self.zips_by_owner.entry(key).or_default().insert(id);
                }
            }
            Subtype::Adm(adm) => {
                self.adms.insert(key, adm.clone());
            }
            Subtype::Country(country) => {
                self.countries.insert(key, country.clone());
            }
        }

        if let Some(names) = alternate_names {
            self.drop_alternate_names(key);
            for alternate in names {
                let id = self.allocate_owned();
                self.alternate_names.insert(
                    id,
                    AlternateNameRow {
                        owner: key,
                        alternate: alternate.clone(),
                    },
                );
                self.names_by_owner.entry(key).or_default().insert(id);
            }
        }
    }

    /// Remove the base row, its specialization row and everything it owns.
    /// Referenced adm/country records are untouched.
    pub fn remove(&mut self, key: FeatureKey) -> Option<FeatureKind> {
        let row = self.base.remove(&key)?;
        if let Some(fid) = row.feature_id {
            self.by_feature_id.remove(&fid);
        }
        match row.kind {
            FeatureKind::Feature => {}
            FeatureKind::City => {
                self.cities.remove(&key);
            }
            FeatureKind::Adm => {
                self.adms.remove(&key);
            }
            FeatureKind::Country => {
                self.countries.remove(&key);
            }
        }
        self.drop_alternate_names(key);
        self.drop_zip_codes(key);
        Some(row.kind)
    }

    fn drop_alternate_names(&mut self, owner: FeatureKey) {
        for id in self.names_by_owner.remove(&owner).unwrap_or_default() {
            self.alternate_names.remove(&id);
        }
    }

    fn drop_zip_codes(&mut self, owner: FeatureKey) {
        for id in self.zips_by_owner.remove(&owner).unwrap_or_default() {
            self.zip_codes.remove(&id);
        }
    }

    pub fn alternate_names_of(&self, owner: FeatureKey) -> Vec<AlternateName> {
        self.names_by_owner
            .get(&owner)
            .into_iter()
            .flatten()
            .filter_map(|id| self.alternate_names.get(id))
            .map(|row| row.alternate.clone())
            .collect()
    }

    pub fn alternate_name_count(&self) -> usize {
        self.alternate_names.len()
    }

    pub fn zip_codes_of(&self, owner: FeatureKey) -> Vec<ZipCode> {
        self.zips_by_owner
            .get(&owner)
            .into_iter()
            .flatten()
            .filter_map(|id| self.zip_codes.get(id))
            .map(|row| row.code.clone())
            .collect()
    }

    pub fn is_municipality(&self, key: FeatureKey) -> bool {
        self.cities.get(&key).is_some_and(|c| c.municipality)
    }

    /// Join the specialization row named by the discriminant.
    pub fn subtype_of(&self, key: FeatureKey, kind: FeatureKind) -> Subtype {
        match kind {
            FeatureKind::Feature => Subtype::Feature,
            FeatureKind::City => Subtype::City(CityAttrs {
                municipality: self.is_municipality(key),
                zip_codes: self.zip_codes_of(key),
            }),
            FeatureKind::Adm => Subtype::Adm(self.adms.get(&key).cloned().unwrap_or_default()),
            FeatureKind::Country => {
                Subtype::Country(self.countries.get(&key).cloned().unwrap_or_default())
            }
        }
    }

    pub fn count_of(&self, kind: FeatureKind) -> usize {
        match kind {
            FeatureKind::Feature => self.base.len(),
            FeatureKind::City => self.cities.len(),
            FeatureKind::Adm => self.adms.len(),
            FeatureKind::Country => self.countries.len(),
        }
    }

    /// Keys of `kind` (is-a semantics) in key order.
    pub fn keys_of(&self, kind: FeatureKind) -> Vec<FeatureKey> {
        match kind {
            FeatureKind::Feature => self.base.keys().copied().collect(),
            FeatureKind::City => self.cities.keys().copied().collect(),
            FeatureKind::Adm => self.adms.keys().copied().collect(),
            FeatureKind::Country => self.countries.keys().copied().collect(),
        }
    }
}
