// crates/gazetteer-core/src/search.rs
use crate::error::{GazetteerError, Result};
use crate::model::{Feature, FeatureKind};
use crate::store::FeatureStore;

impl FeatureStore {
    /// Full-text search over names (and, with `include_alternates`, alternate
    /// names and zip codes) of features of exactly `kind`.
    ///
    /// Matching is accent-, case- and punctuation-insensitive, and name
    /// particles are interchangeable (`St-André` finds `Saint-André`). Only
    /// committed index state is searched; hits are read back from the store,
    /// so features removed or retyped since the last commit never show up.
    ///
    /// ```rust
    /// use gazetteer_core::{Feature, FeatureKind, FeatureStore};
    ///
    /// let store = FeatureStore::default();
    /// store.save(&Feature::city("Saint-André")).unwrap();
    /// store.index().commit();
    ///
    /// let hits = store.search_text("st andre", false, FeatureKind::City).unwrap();
    /// assert_eq!(hits.len(), 1);
    /// assert!(store.search_text("st andre", false, FeatureKind::Adm).unwrap().is_empty());
    /// ```
    pub fn search_text<'q>(
        &self,
        query: impl Into<Option<&'q str>>,
        include_alternates: bool,
        kind: FeatureKind,
    ) -> Result<Vec<Feature>> {
        let query = query
            .into()
            .ok_or(GazetteerError::InvalidArgument("search text is required"))?;
        let keys = self.index().search(query, include_alternates, kind);
        let mut out = Vec::with_capacity(keys.len());
        for key in keys {
            // stale hit: removed or retyped after the last commit
            match self.get(key)? {
                Some(feature) if feature.kind() == kind => out.push(feature),
                _ => {}
            }
        }
        Ok(out)
    }
}
