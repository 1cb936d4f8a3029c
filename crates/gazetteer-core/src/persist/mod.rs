// crates/gazetteer-core/src/persist/mod.rs

//! # Persistence
//!
//! The physical layer under [`FeatureStore`](crate::FeatureStore): a
//! bincode snapshot file ([`SnapshotFile`]), the [`FeatureRecord`] fixture
//! format and, with the `json` feature, a JSON fixture reader.

pub(crate) mod common_io;
mod record;

#[cfg(feature = "json")]
mod json;

#[cfg(feature = "json")]
pub use json::load_features_json;
pub use record::FeatureRecord;

use crate::error::Result;
use crate::store::Snapshot;
use crate::traits::Persistence;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Default snapshot file name: gzip-compressed when `compact` is enabled.
pub fn default_snapshot_filename() -> &'static str {
    if cfg!(feature = "compact") {
        "gazetteer.bin.gz"
    } else {
        "gazetteer.bin"
    }
}

/// A bincode snapshot on disk. Paths ending in `.gz` are gzip-compressed.
#[derive(Debug, Clone)]
pub struct SnapshotFile {
    path: PathBuf,
}

impl SnapshotFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Persistence for SnapshotFile {
    /// `None` when the file does not exist yet. A file that cannot be
    /// decoded is logged and ignored; the next flush overwrites it.
    fn load(&self) -> Result<Option<Snapshot>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let mut stream = common_io::open_stream(&self.path)?;
        let mut data = Vec::new();
        if let Err(e) = stream.read_to_end(&mut data) {
            warn!(path = %self.path.display(), error = %e, "snapshot unreadable, ignoring it");
            return Ok(None);
        }
        match bincode::deserialize::<Snapshot>(&data) {
            Ok(snapshot) => {
                info!(
                    path = %self.path.display(),
                    features = snapshot.feature_count(),
                    "snapshot loaded"
                );
                Ok(Some(snapshot))
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "snapshot unreadable, ignoring it");
                Ok(None)
            }
        }
    }

    fn store(&self, snapshot: &Snapshot) -> Result<()> {
        let bytes = bincode::serialize(snapshot)?;
        common_io::write_atomically(&self.path, &bytes)?;
        info!(
            path = %self.path.display(),
            features = snapshot.feature_count(),
            bytes = bytes.len(),
            "snapshot written"
        );
        Ok(())
    }
}
