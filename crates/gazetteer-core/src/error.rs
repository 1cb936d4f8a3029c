// crates/gazetteer-core/src/error.rs
use crate::model::FeatureKey;
use thiserror::Error;

/// Every failure the engine reports.
///
/// "Nothing matched" is never an error: lookups return `Ok(None)` or an
/// empty `Vec` instead.
#[derive(Debug, Error)]
pub enum GazetteerError {
    /// A required input was absent. Raised before any mutation.
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),

    /// A lazily deferred association was read after its load scope closed.
    /// Re-fetch the feature with `get_eager`.
    #[error("detached access to `{association}` of feature {owner}: the load scope is closed")]
    DetachedAccess {
        association: &'static str,
        owner: FeatureKey,
    },

    #[error("feature id {0} is already used by another feature")]
    DuplicateFeatureId(i64),

    #[error("feature {0} is not stored")]
    UnknownFeature(FeatureKey),

    #[error("invalid data: {0}")]
    InvalidData(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("snapshot encoding failed: {0}")]
    Bincode(#[from] bincode::Error),

    #[cfg(feature = "json")]
    #[error("json decoding failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),
}

pub type Result<T> = std::result::Result<T, GazetteerError>;

impl GazetteerError {
    #[inline]
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, GazetteerError::InvalidArgument(_))
    }

    #[inline]
    pub fn is_detached_access(&self) -> bool {
        matches!(self, GazetteerError::DetachedAccess { .. })
    }
}
