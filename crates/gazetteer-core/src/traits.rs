// crates/gazetteer-core/src/traits.rs
use crate::error::Result;
use crate::store::Snapshot;
use crate::text::match_key;

/// Particle-aware name comparison for types with a canonical display name.
///
/// # Examples
/// ```rust
/// use gazetteer_core::traits::NameMatch;
///
/// struct Place(&'static str);
/// impl NameMatch for Place {
///     fn name_str(&self) -> &str { self.0 }
/// }
///
/// assert!(Place("Saint-André").is_synonym_of("St Andre"));
/// assert!(!Place("Saint-André").is_synonym_of("Andre"));
/// ```
pub trait NameMatch {
    fn name_str(&self) -> &str;

    /// Equality of [`match_key`]s, so `St-André` and `Saint André` agree.
    #[inline]
    fn is_synonym_of(&self, q: &str) -> bool {
        match_key(self.name_str()) == match_key(q)
    }
}

/// The durable storage the store flushes to and restores from.
///
/// Implementations decide the physical layout; the store only hands over and
/// receives whole [`Snapshot`]s.
pub trait Persistence: Send + Sync {
    /// The last stored snapshot, `None` when nothing was stored yet.
    fn load(&self) -> Result<Option<Snapshot>>;

    /// Replace the stored snapshot.
    fn store(&self, snapshot: &Snapshot) -> Result<()>;
}
