// crates/gazetteer-core/src/index/mod.rs

//! # Full-text name index
//!
//! An inverted index from normalized tokens to `(feature, field)` postings,
//! partitioned by concrete kind. Writers only *stage* operations; searches
//! see the committed state, so a save becomes searchable after [`TextIndex::commit`].
//!
//! A feature matches a query when every query token occurs in one and the
//! same field: its name, one alternate name, or one zip code.

use crate::model::{FeatureKey, FeatureKind};
use crate::text::Normalizer;
use parking_lot::RwLock;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use tracing::{debug, info};

/// The searchable text of one feature.
#[derive(Clone, Debug, PartialEq)]
pub struct IndexDoc {
    pub key: FeatureKey,
    pub kind: FeatureKind,
    pub name: String,
    pub alternate_names: Vec<String>,
    pub zip_codes: Vec<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
enum Field {
    Name,
    Alternate(u32),
    ZipCode(u32),
}

impl Field {
    #[inline]
    fn is_name(self) -> bool {
        matches!(self, Field::Name)
    }
}

type Posting = (FeatureKey, Field);

#[derive(Debug, Default)]
struct Partition {
    postings: BTreeMap<String, BTreeSet<Posting>>,
}

#[derive(Debug)]
enum Staged {
    Upsert(IndexDoc),
    Remove(FeatureKey),
}

#[derive(Debug, Default)]
struct IndexState {
    partitions: HashMap<FeatureKind, Partition>,
    /// What each indexed key contributed, so it can be taken out again.
    terms: HashMap<FeatureKey, (FeatureKind, Vec<(String, Field)>)>,
    staged: Vec<Staged>,
}

/// Index statistics, as reported by `stats`-style commands.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct IndexStats {
    pub documents: usize,
    pub terms: usize,
    pub pending: usize,
}

#[derive(Debug, Default)]
pub struct TextIndex {
    normalizer: Normalizer,
    state: RwLock<IndexState>,
}

impl TextIndex {
    pub fn new(normalizer: Normalizer) -> Self {
        Self {
            normalizer,
            state: RwLock::new(IndexState::default()),
        }
    }

    pub fn normalizer(&self) -> &Normalizer {
        &self.normalizer
    }

    pub fn stage_upsert(&self, doc: IndexDoc) {
        self.state.write().staged.push(Staged::Upsert(doc));
    }

    pub fn stage_remove(&self, key: FeatureKey) {
        self.state.write().staged.push(Staged::Remove(key));
    }

    /// Number of staged, not yet committed operations.
    pub fn pending(&self) -> usize {
        self.state.read().staged.len()
    }

    /// Apply staged operations in order. Returns how many were applied.
    pub fn commit(&self) -> usize {
        let mut state = self.state.write();
        let staged = std::mem::take(&mut state.staged);
        let applied = staged.len();
        for op in staged {
            match op {
                Staged::Upsert(doc) => {
                    state.unindex(doc.key);
                    let terms = self.terms_of(&doc);
                    state.index(doc.key, doc.kind, terms);
                }
                Staged::Remove(key) => state.unindex(key),
            }
        }
        if applied > 0 {
            info!(applied, documents = state.terms.len(), "text index committed");
        }
        applied
    }

    /// Compact the committed structures: drop empty posting lists and
    /// partitions. Staged operations are untouched.
    pub fn optimize(&self) {
        let mut state = self.state.write();
        let mut dropped = 0usize;
        for partition in state.partitions.values_mut() {
            let before = partition.postings.len();
            partition.postings.retain(|_, p| !p.is_empty());
            dropped += before - partition.postings.len();
        }
        state.partitions.retain(|_, p| !p.postings.is_empty());
        state.terms.shrink_to_fit();
        info!(dropped_terms = dropped, "text index optimized");
    }

    /// Drop committed and staged state alike.
    pub fn clear(&self) {
        *self.state.write() = IndexState::default();
    }

    pub fn stats(&self) -> IndexStats {
        let state = self.state.read();
        IndexStats {
            documents: state.terms.len(),
            terms: state.partitions.values().map(|p| p.postings.len()).sum(),
            pending: state.staged.len(),
        }
    }

    /// Keys of committed features of exactly `kind` matching `query`, in key
    /// order. Alternate names and zip codes count only with
    /// `include_alternates`. A query without tokens matches nothing.
    pub fn search(&self, query: &str, include_alternates: bool, kind: FeatureKind) -> Vec<FeatureKey> {
        let tokens: BTreeSet<String> = self.normalizer.tokens(query).into_iter().collect();
        if tokens.is_empty() {
            return Vec::new();
        }
        let state = self.state.read();
        let Some(partition) = state.partitions.get(&kind) else {
            return Vec::new();
        };

        let mut hits: Option<BTreeSet<Posting>> = None;
        for token in &tokens {
            let Some(postings) = partition.postings.get(token) else {
                return Vec::new();
            };
            let allowed = postings
                .iter()
                .copied()
                .filter(|(_, field)| include_alternates || field.is_name());
            hits = Some(match hits {
                None => allowed.collect(),
                Some(prev) => allowed.filter(|p| prev.contains(p)).collect(),
            });
        }

        let keys: BTreeSet<FeatureKey> = hits.unwrap_or_default().into_iter().map(|(k, _)| k).collect();
        debug!(query, %kind, include_alternates, hits = keys.len(), "text search");
        keys.into_iter().collect()
    }

    fn terms_of(&self, doc: &IndexDoc) -> Vec<(String, Field)> {
        let mut terms = Vec::new();
        let mut push = |text: &str, field: Field| {
            for token in self.normalizer.tokens(text) {
                terms.push((token, field));
            }
        };
        push(&doc.name, Field::Name);
        for (i, alt) in doc.alternate_names.iter().enumerate() {
            push(alt, Field::Alternate(i as u32));
        }
        for (i, zip) in doc.zip_codes.iter().enumerate() {
            push(zip, Field::ZipCode(i as u32));
        }
        terms
    }
}

impl IndexState {
    fn index(&mut self, key: FeatureKey, kind: FeatureKind, terms: Vec<(String, Field)>) {
        let partition = self.partitions.entry(kind).or_default();
        for (token, field) in &terms {
            partition
                .postings
                .entry(token.clone())
                .or_default()
                .insert((key, *field));
        }
        self.terms.insert(key, (kind, terms));
    }

    fn unindex(&mut self, key: FeatureKey) {
        let Some((kind, terms)) = self.terms.remove(&key) else {
            return;
        };
        if let Some(partition) = self.partitions.get_mut(&kind) {
            for (token, field) in terms {
                if let Some(postings) = partition.postings.get_mut(&token) {
                    postings.remove(&(key, field));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn doc(key: u64, kind: FeatureKind, name: &str, alternates: &[&str], zips: &[&str]) -> IndexDoc {
        IndexDoc {
            key: FeatureKey(key),
            kind,
            name: name.to_string(),
            alternate_names: alternates.iter().map(|s| s.to_string()).collect(),
            zip_codes: zips.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn index() -> TextIndex {
        let idx = TextIndex::default();
        idx.stage_upsert(doc(1, FeatureKind::City, "Saint-André", &[], &[]));
        idx.stage_upsert(doc(2, FeatureKind::City, "mytown", &["Saint-André"], &["59000"]));
        idx.stage_upsert(doc(3, FeatureKind::Adm, "Saint-André", &[], &[]));
        idx.commit();
        idx
    }

    #[test]
    fn staged_ops_are_invisible_until_commit() {
        let idx = TextIndex::default();
        idx.stage_upsert(doc(1, FeatureKind::City, "Paris", &[], &[]));
        assert_eq!(idx.pending(), 1);
        assert!(idx.search("paris", false, FeatureKind::City).is_empty());
        assert_eq!(idx.commit(), 1);
        assert_eq!(idx.pending(), 0);
        assert_eq!(idx.search("paris", false, FeatureKind::City), vec![FeatureKey(1)]);
    }

    #[test]
    fn alternates_only_match_when_requested() {
        let idx = index();
        assert_eq!(idx.search("St André", false, FeatureKind::City), vec![FeatureKey(1)]);
        assert_eq!(
            idx.search("saint andre", true, FeatureKind::City),
            vec![FeatureKey(1), FeatureKey(2)]
        );
        assert_eq!(idx.search("59000", false, FeatureKind::City), vec![]);
        assert_eq!(idx.search("59000", true, FeatureKind::City), vec![FeatureKey(2)]);
    }

    #[test]
    fn partitions_keep_kinds_apart() {
        let idx = index();
        assert_eq!(idx.search("saint andre", false, FeatureKind::Adm), vec![FeatureKey(3)]);
        assert!(idx.search("saint andre", false, FeatureKind::Feature).is_empty());
    }

    #[test]
    fn tokens_must_share_one_field() {
        let idx = TextIndex::default();
        idx.stage_upsert(doc(1, FeatureKind::City, "Andre", &["Saint Jean"], &[]));
        idx.commit();
        assert!(idx.search("saint andre", true, FeatureKind::City).is_empty());
    }

    #[test]
    fn removal_and_reupsert() {
        let idx = index();
        idx.stage_remove(FeatureKey(1));
        idx.stage_upsert(doc(2, FeatureKind::City, "othertown", &[], &[]));
        idx.commit();
        assert!(idx.search("saint andre", true, FeatureKind::City).is_empty());
        idx.optimize();
        assert_eq!(idx.stats().documents, 2);
    }

    #[test]
    fn blank_query_matches_nothing() {
        let idx = index();
        assert!(idx.search("  - ", true, FeatureKind::City).is_empty());
    }
}
