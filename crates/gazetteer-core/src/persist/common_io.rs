// crates/gazetteer-core/src/persist/common_io.rs
use crate::error::{GazetteerError, Result};
use std::fs::{self, File};
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

#[cfg(feature = "compact")]
use flate2::{read::GzDecoder, write::GzEncoder, Compression};

pub(crate) fn is_gzip(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("gz"))
}

/// Open `path` for reading, decompressing `.gz` files when `compact` is on.
pub(crate) fn open_stream(path: &Path) -> Result<Box<dyn Read>> {
    let file = File::open(path).map_err(|e| {
        GazetteerError::NotFound(format!("{} could not be opened: {e}", path.display()))
    })?;
    let reader = BufReader::new(file);

    if is_gzip(path) {
        #[cfg(feature = "compact")]
        return Ok(Box::new(GzDecoder::new(reader)));
        #[cfg(not(feature = "compact"))]
        return Err(GazetteerError::InvalidData(format!(
            "{} is gzip-compressed; enable the `compact` feature",
            path.display()
        )));
    }
    Ok(Box::new(reader))
}

/// Write `bytes` to `path` (gzip-compressed for `.gz` paths), going through
/// a sibling temp file so readers never see a half-written file.
pub(crate) fn write_atomically(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let payload = encode(path, bytes)?;
    let tmp = temp_path(path);
    fs::write(&tmp, payload)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

#[cfg(feature = "compact")]
fn encode(path: &Path, bytes: &[u8]) -> Result<Vec<u8>> {
    use std::io::Write;

    if !is_gzip(path) {
        return Ok(bytes.to_vec());
    }
    let mut encoder = GzEncoder::new(Vec::with_capacity(bytes.len() / 2), Compression::default());
    encoder.write_all(bytes)?;
    Ok(encoder.finish()?)
}

#[cfg(not(feature = "compact"))]
fn encode(path: &Path, bytes: &[u8]) -> Result<Vec<u8>> {
    if is_gzip(path) {
        return Err(GazetteerError::InvalidData(format!(
            "{} asks for gzip; enable the `compact` feature",
            path.display()
        )));
    }
    Ok(bytes.to_vec())
}

fn temp_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "snapshot".to_string());
    path.with_file_name(format!(".{name}.tmp"))
}
