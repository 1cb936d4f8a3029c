// crates/gazetteer-core/src/store/mod.rs

//! # Feature store
//!
//! [`FeatureStore`] keeps every feature as a base row plus at most one
//! specialization row (city, adm, country) under the same key, and owns the
//! alternate names and zip codes hanging off each feature.
//!
//! Reads come in two flavours:
//! - [`FeatureStore::get`] resolves the concrete kind and defers the
//!   alternate names and the admin record until first touched,
//! - [`FeatureStore::get_eager`] loads everything up front, so the feature
//!   stays fully readable after [`FeatureStore::flush_and_clear`].

mod tables;
mod view;

pub(crate) use tables::BaseRow;
use tables::Tables;
pub use view::KindView;

use crate::config::EngineConfig;
use crate::error::{GazetteerError, Result};
use crate::index::{IndexDoc, TextIndex};
use crate::model::{Association, Feature, FeatureKey, FeatureKind, LoadScope};
use crate::text::Normalizer;
use crate::traits::Persistence;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info};

const SNAPSHOT_FORMAT: u32 = 1;

/// A point-in-time copy of every row, as handed to [`Persistence`].
#[derive(Debug, Serialize, Deserialize)]
pub struct Snapshot {
    format: u32,
    tables: Tables,
}

impl Snapshot {
    pub fn feature_count(&self) -> usize {
        self.tables.len()
    }
}

/// The storage engine. All methods take `&self`; share it across threads
/// behind an `Arc`.
pub struct FeatureStore {
    tables: Arc<RwLock<Tables>>,
    scope: Arc<LoadScope>,
    index: TextIndex,
    config: EngineConfig,
    persistence: Option<Box<dyn Persistence>>,
}

impl fmt::Debug for FeatureStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FeatureStore")
            .field("features", &self.count())
            .field("index", &self.index.stats())
            .field("persistent", &self.persistence.is_some())
            .finish()
    }
}

impl Default for FeatureStore {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl FeatureStore {
    /// An empty, memory-only store.
    pub fn new(config: EngineConfig) -> Self {
        let normalizer = Normalizer::with_extra(&config.search.extra_synonyms);
        Self {
            tables: Arc::new(RwLock::new(Tables::default())),
            scope: Arc::new(LoadScope::default()),
            index: TextIndex::new(normalizer),
            config,
            persistence: None,
        }
    }

    /// A store backed by `persistence`: the last snapshot (if any) is
    /// restored and the text index rebuilt and committed from it.
    pub fn open(config: EngineConfig, persistence: impl Persistence + 'static) -> Result<Self> {
        let mut store = Self::new(config);
        if let Some(snapshot) = persistence.load()? {
            if snapshot.format != SNAPSHOT_FORMAT {
                return Err(GazetteerError::InvalidData(format!(
                    "unsupported snapshot format {}",
                    snapshot.format
                )));
            }
            let mut tables = snapshot.tables;
            tables.reindex()?;
            store.tables = Arc::new(RwLock::new(tables));
            store.rebuild_index();
        }
        store.persistence = Some(Box::new(persistence));
        info!(features = store.count(), "feature store opened");
        Ok(store)
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The full-text index, for explicit `commit` / `optimize`.
    pub fn index(&self) -> &TextIndex {
        &self.index
    }

    // -------------------------------------------------------------------------
    // WRITES
    // -------------------------------------------------------------------------

    /// Insert (no key yet) or update (key present) `feature` with its
    /// specialization row and owned collections. Returns the persisted,
    /// fully loaded feature.
    ///
    /// Alternate names are rewritten only when the given feature has them
    /// loaded; a feature read with [`FeatureStore::get`] whose alternate
    /// names were never touched leaves the stored ones alone.
    pub fn save<'a>(&self, feature: impl Into<Option<&'a Feature>>) -> Result<Feature> {
        let feature = feature
            .into()
            .ok_or(GazetteerError::InvalidArgument("feature to save is required"))?;

        let mut tables = self.tables.write();
        if let Some(key) = feature.key {
            if !tables.base.contains_key(&key) {
                return Err(GazetteerError::UnknownFeature(key));
            }
        }
        tables.check_feature_id(feature.feature_id, feature.key)?;
        let key = match feature.key {
            Some(key) => key,
            None => tables.allocate_key(),
        };
        let alternates = feature.alternate_names.peek().map(Vec::as_slice);
        tables.put(key, feature, alternates);

        self.index.stage_upsert(index_doc(&tables, key));
        debug!(%key, kind = %feature.kind(), name = %feature.name, "feature saved");
        resolve(&self.tables, &self.scope, &tables, key, true)
            .ok_or(GazetteerError::UnknownFeature(key))
    }

    /// Save features in order. Stops at the first failure; features saved
    /// before it stay saved.
    pub fn save_all(&self, features: &[Feature]) -> Result<Vec<FeatureKey>> {
        let mut keys = Vec::with_capacity(features.len());
        for feature in features {
            let saved = self.save(feature)?;
            keys.extend(saved.key);
        }
        info!(count = keys.len(), "features saved");
        Ok(keys)
    }

    /// Remove `feature` with its specialization row, alternate names and zip
    /// codes. Referenced adm or country records are kept. Returns whether
    /// anything was removed.
    pub fn remove<'a>(&self, feature: impl Into<Option<&'a Feature>>) -> Result<bool> {
        let feature = feature
            .into()
            .ok_or(GazetteerError::InvalidArgument("feature to remove is required"))?;
        let key = feature
            .key
            .ok_or(GazetteerError::InvalidArgument("feature to remove was never saved"))?;
        Ok(self.remove_key(key))
    }

    pub(crate) fn remove_key(&self, key: FeatureKey) -> bool {
        let removed = self.tables.write().remove(key);
        if let Some(kind) = removed {
            self.index.stage_remove(key);
            debug!(%key, %kind, "feature removed");
        }
        removed.is_some()
    }

    /// Remove the given features in one atomic step. Fails before touching
    /// anything when the list is absent or holds an unsaved feature.
    pub fn delete_all<'a>(&self, features: impl Into<Option<&'a [Feature]>>) -> Result<usize> {
        let features = features
            .into()
            .ok_or(GazetteerError::InvalidArgument("features to delete are required"))?;
        let keys = features
            .iter()
            .map(|f| f.key.ok_or(GazetteerError::InvalidArgument("feature to delete was never saved")))
            .collect::<Result<Vec<_>>>()?;
        Ok(self.delete_keys(keys))
    }

    fn delete_keys(&self, keys: Vec<FeatureKey>) -> usize {
        self.delete_where(|_| keys)
    }

    /// Remove the keys `pick` chooses; both happen under one write lock.
    pub(crate) fn delete_where(&self, pick: impl FnOnce(&Tables) -> Vec<FeatureKey>) -> usize {
        let mut tables = self.tables.write();
        let keys = pick(&*tables);
        let mut removed = 0;
        for key in keys {
            if tables.remove(key).is_some() {
                self.index.stage_remove(key);
                removed += 1;
            }
        }
        info!(removed, "features deleted");
        removed
    }

    // -------------------------------------------------------------------------
    // READS
    // -------------------------------------------------------------------------

    /// The feature stored under `key`, resolved to its concrete kind. Its
    /// alternate names and admin record load on first access.
    pub fn get(&self, key: impl Into<Option<FeatureKey>>) -> Result<Option<Feature>> {
        self.get_with(key.into(), false)
    }

    /// Like [`FeatureStore::get`] with every association loaded.
    pub fn get_eager(&self, key: impl Into<Option<FeatureKey>>) -> Result<Option<Feature>> {
        self.get_with(key.into(), true)
    }

    fn get_with(&self, key: Option<FeatureKey>, eager: bool) -> Result<Option<Feature>> {
        let key = key.ok_or(GazetteerError::InvalidArgument("feature key is required"))?;
        let tables = self.tables.read();
        Ok(resolve(&self.tables, &self.scope, &tables, key, eager))
    }

    pub fn exists(&self, key: impl Into<Option<FeatureKey>>) -> Result<bool> {
        let key = key
            .into()
            .ok_or(GazetteerError::InvalidArgument("feature key is required"))?;
        Ok(self.tables.read().base.contains_key(&key))
    }

    pub fn get_by_feature_id(&self, feature_id: impl Into<Option<i64>>) -> Result<Option<Feature>> {
        let feature_id = feature_id
            .into()
            .ok_or(GazetteerError::InvalidArgument("feature id is required"))?;
        let tables = self.tables.read();
        Ok(tables
            .key_for_feature_id(feature_id)
            .and_then(|key| resolve(&self.tables, &self.scope, &tables, key, false)))
    }

    /// Features with the given ids, in the order asked for; unknown ids are
    /// skipped. An absent list yields nothing.
    pub fn list_by_feature_ids<'a>(&self, feature_ids: impl Into<Option<&'a [i64]>>) -> Vec<Feature> {
        let Some(ids) = feature_ids.into() else {
            return Vec::new();
        };
        let tables = self.tables.read();
        ids.iter()
            .filter_map(|id| tables.key_for_feature_id(*id))
            .filter_map(|key| resolve(&self.tables, &self.scope, &tables, key, false))
            .collect()
    }

    /// Features whose name equals `name` exactly.
    pub fn list_by_name<'a>(&self, name: impl Into<Option<&'a str>>) -> Result<Vec<Feature>> {
        let name = name
            .into()
            .ok_or(GazetteerError::InvalidArgument("name is required"))?;
        let tables = self.tables.read();
        Ok(tables
            .base
            .iter()
            .filter(|(_, row)| row.name == name)
            .filter_map(|(key, _)| resolve(&self.tables, &self.scope, &tables, *key, false))
            .collect())
    }

    pub fn count(&self) -> usize {
        self.tables.read().len()
    }

    /// Every feature, in key order.
    pub fn get_all(&self) -> Vec<Feature> {
        self.all_of(FeatureKind::Feature)
    }

    pub(crate) fn all_of(&self, kind: FeatureKind) -> Vec<Feature> {
        self.select(|tables| tables.keys_of(kind))
    }

    /// Resolve the keys `pick` chooses, under the same read lock.
    pub(crate) fn select(&self, pick: impl FnOnce(&Tables) -> Vec<FeatureKey>) -> Vec<Feature> {
        let tables = self.tables.read();
        pick(&*tables)
            .into_iter()
            .filter_map(|key| resolve(&self.tables, &self.scope, &tables, key, false))
            .collect()
    }

    pub(crate) fn count_of(&self, kind: FeatureKind) -> usize {
        self.tables.read().count_of(kind)
    }

    /// Page `page_number` (1-based; 0 reads as 1) of `page_size` features in
    /// key order. A page size of 0 means "everything".
    pub fn get_all_paginate(&self, page_number: usize, page_size: usize) -> Vec<Feature> {
        let tables = self.tables.read();
        let skip = page_number.saturating_sub(1).saturating_mul(page_size);
        let take = if page_size == 0 { usize::MAX } else { page_size };
        tables
            .base
            .keys()
            .skip(skip)
            .take(take)
            .filter_map(|key| resolve(&self.tables, &self.scope, &tables, *key, false))
            .collect()
    }

    /// The largest external feature id, `None` on an empty store.
    pub fn get_max_feature_id(&self) -> Option<i64> {
        self.tables.read().max_feature_id()
    }

    /// The shape of the feature with `feature_id` as WKT, `None` when the
    /// feature is unknown, has no shape, or no id was given.
    pub fn shape_as_wkt(&self, feature_id: impl Into<Option<i64>>) -> Option<String> {
        let feature_id = feature_id.into()?;
        let tables = self.tables.read();
        tables
            .key_for_feature_id(feature_id)
            .and_then(|key| tables.base.get(&key))
            .and_then(|row| row.shape.as_ref())
            .map(|shape| shape.to_wkt(self.config.geometry.wkt_precision))
    }

    // -------------------------------------------------------------------------
    // TYPED VIEWS
    // -------------------------------------------------------------------------

    /// All features, whatever their kind.
    pub fn features(&self) -> KindView<'_> {
        KindView::new(self, FeatureKind::Feature)
    }

    pub fn cities(&self) -> KindView<'_> {
        KindView::new(self, FeatureKind::City)
    }

    pub fn adms(&self) -> KindView<'_> {
        KindView::new(self, FeatureKind::Adm)
    }

    pub fn countries(&self) -> KindView<'_> {
        KindView::new(self, FeatureKind::Country)
    }

    // -------------------------------------------------------------------------
    // SCOPE & PERSISTENCE
    // -------------------------------------------------------------------------

    /// Write pending state to the persistence backend (if any) and close the
    /// current load scope: deferred associations never read so far become
    /// unreadable, which surfaces as [`GazetteerError::DetachedAccess`].
    pub fn flush_and_clear(&self) -> Result<()> {
        if let Some(persistence) = &self.persistence {
            let tables = self.tables.read();
            persistence.store(&Snapshot {
                format: SNAPSHOT_FORMAT,
                tables: clone_tables(&tables)?,
            })?;
            info!(features = tables.len(), "snapshot flushed");
        }
        self.scope.close();
        Ok(())
    }

    /// A snapshot of the current rows, e.g. to hand to another backend.
    pub fn snapshot(&self) -> Result<Snapshot> {
        Ok(Snapshot {
            format: SNAPSHOT_FORMAT,
            tables: clone_tables(&self.tables.read())?,
        })
    }

    fn rebuild_index(&self) {
        self.index.clear();
        let tables = self.tables.read();
        for key in tables.base.keys() {
            self.index.stage_upsert(index_doc(&tables, *key));
        }
        self.index.commit();
    }

    pub(crate) fn with_tables<R>(&self, f: impl FnOnce(&Tables) -> R) -> R {
        f(&self.tables.read())
    }
}

/// Round-trip through bincode: the snapshot is exactly what would be read
/// back, derived indexes included only after `reindex`.
fn clone_tables(tables: &Tables) -> Result<Tables> {
    let bytes = bincode::serialize(tables)?;
    let mut copy: Tables = bincode::deserialize(&bytes)?;
    copy.reindex()?;
    Ok(copy)
}

fn index_doc(tables: &Tables, key: FeatureKey) -> IndexDoc {
    let (kind, name) = tables
        .base
        .get(&key)
        .map(|row| (row.kind, row.name.clone()))
        .unwrap_or((FeatureKind::Feature, String::new()));
    IndexDoc {
        key,
        kind,
        name,
        alternate_names: tables
            .alternate_names_of(key)
            .into_iter()
            .map(|a| a.name)
            .collect(),
        zip_codes: tables.zip_codes_of(key).into_iter().map(|z| z.0).collect(),
    }
}

/// Build the [`Feature`] stored under `key` from its rows.
fn resolve(
    shared: &Arc<RwLock<Tables>>,
    scope: &Arc<LoadScope>,
    tables: &Tables,
    key: FeatureKey,
    eager: bool,
) -> Option<Feature> {
    let row = tables.base.get(&key)?;
    let mut feature = Feature::with_subtype(row.name.clone(), tables.subtype_of(key, row.kind));
    feature.key = Some(key);
    feature.feature_id = row.feature_id;
    feature.location = row.location;
    feature.feature_class = row.feature_class.clone();
    feature.feature_code = row.feature_code.clone();
    feature.country_code = row.country_code.clone();
    feature.population = row.population;
    feature.shape = row.shape.clone();
    feature.adm_key = row.adm;

    if eager {
        feature.alternate_names = Association::loaded(tables.alternate_names_of(key));
        // the referenced division itself comes back lazily
        feature.adm = Association::loaded(
            row.adm
                .and_then(|adm| resolve(shared, scope, tables, adm, false))
                .map(Box::new),
        );
    } else {
        let names_from = Arc::clone(shared);
        feature.alternate_names = Association::deferred(
            scope.ticket(),
            Arc::new(move || names_from.read().alternate_names_of(key)),
        );
        let adm_from = Arc::clone(shared);
        let adm_scope = Arc::clone(scope);
        let adm_key = row.adm;
        feature.adm = Association::deferred(
            scope.ticket(),
            Arc::new(move || {
                let tables = adm_from.read();
                adm_key
                    .and_then(|adm| resolve(&adm_from, &adm_scope, &tables, adm, false))
                    .map(Box::new)
            }),
        );
    }
    Some(feature)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AlternateName, AlternateNameSource};
    use pretty_assertions::assert_eq;

    #[test]
    fn save_assigns_keys_and_updates_in_place() {
        let store = FeatureStore::default();
        let saved = store.save(&Feature::city("Paris").with_feature_id(1)).unwrap();
        let key = saved.key().unwrap();

        let mut renamed = saved.clone();
        renamed.name = "Paris Centre".into();
        let again = store.save(&renamed).unwrap();
        assert_eq!(again.key(), Some(key));
        assert_eq!(store.count(), 1);
        assert_eq!(store.get(key).unwrap().unwrap().name, "Paris Centre");
    }

    #[test]
    fn save_rejects_foreign_keys_and_duplicate_ids() {
        let store = FeatureStore::default();
        store.save(&Feature::new("a").with_feature_id(7)).unwrap();
        let err = store.save(&Feature::new("b").with_feature_id(7)).unwrap_err();
        assert!(matches!(err, GazetteerError::DuplicateFeatureId(7)));

        let mut ghost = Feature::new("ghost");
        ghost.key = Some(FeatureKey(99));
        assert!(matches!(
            store.save(&ghost),
            Err(GazetteerError::UnknownFeature(FeatureKey(99)))
        ));
        assert!(store.save(None).unwrap_err().is_invalid_argument());
        assert_eq!(store.count(), 1);
    }

    #[test]
    fn deferred_alternates_are_kept_when_untouched() {
        let store = FeatureStore::default();
        let saved = store
            .save(&Feature::new("Lutece").with_alternate_name(AlternateName::new(
                "Paris",
                AlternateNameSource::Personal,
            )).unwrap())
            .unwrap();
        let lazy = store.get(saved.key()).unwrap().unwrap();
        assert!(!lazy.alternate_names_loaded());
        store.save(&lazy).unwrap();
        let eager = store.get_eager(saved.key()).unwrap().unwrap();
        assert_eq!(eager.alternate_names().unwrap().len(), 1);
    }

    #[test]
    fn pagination_is_one_based() {
        let store = FeatureStore::default();
        for i in 0..5 {
            store.save(&Feature::new(format!("f{i}"))).unwrap();
        }
        let names = |v: Vec<Feature>| v.into_iter().map(|f| f.name).collect::<Vec<_>>();
        assert_eq!(names(store.get_all_paginate(1, 2)), ["f0", "f1"]);
        assert_eq!(names(store.get_all_paginate(0, 2)), ["f0", "f1"]);
        assert_eq!(names(store.get_all_paginate(3, 2)), ["f4"]);
        assert_eq!(store.get_all_paginate(2, 0).len(), 5);
    }
}
