// crates/gazetteer-core/src/store/view.rs
use super::FeatureStore;
use crate::error::Result;
use crate::model::{Feature, FeatureKey, FeatureKind};

/// The store seen through one kind.
///
/// Counting, listing and lookups follow the type hierarchy (the `features()`
/// view sees cities too); text search is restricted to the exact kind.
#[derive(Clone, Copy, Debug)]
pub struct KindView<'a> {
    store: &'a FeatureStore,
    kind: FeatureKind,
}

impl<'a> KindView<'a> {
    pub(super) fn new(store: &'a FeatureStore, kind: FeatureKind) -> Self {
        Self { store, kind }
    }

    pub fn kind(&self) -> FeatureKind {
        self.kind
    }

    pub fn count(&self) -> usize {
        self.store.count_of(self.kind)
    }

    pub fn get_all(&self) -> Vec<Feature> {
        self.store.all_of(self.kind)
    }

    /// The feature under `key` if it is of this view's kind.
    pub fn get(&self, key: impl Into<Option<FeatureKey>>) -> Result<Option<Feature>> {
        Ok(self.store.get(key)?.filter(|f| self.kind.includes(f.kind())))
    }

    pub fn get_eager(&self, key: impl Into<Option<FeatureKey>>) -> Result<Option<Feature>> {
        Ok(self.store.get_eager(key)?.filter(|f| self.kind.includes(f.kind())))
    }

    /// Remove every feature of this kind, cascading to owned rows. Returns
    /// the number removed.
    pub fn delete_all(&self) -> usize {
        let kind = self.kind;
        self.store.delete_where(|tables| tables.keys_of(kind))
    }

    /// Committed features of exactly this kind whose text matches `query`.
    pub fn search_text<'q>(
        &self,
        query: impl Into<Option<&'q str>>,
        include_alternates: bool,
    ) -> Result<Vec<Feature>> {
        self.store.search_text(query, include_alternates, self.kind)
    }
}
