// crates/gazetteer-core/src/config.rs

//! Engine configuration.
//!
//! [`EngineConfig::load`] layers an optional TOML file and `GAZETTEER_*`
//! environment variables over the embedded defaults.
//! [`EngineConfig::default`] returns the same defaults without touching the
//! filesystem (useful in tests).

use crate::error::Result;
use crate::geo::EARTH_RADIUS_METERS;
use serde::Deserialize;
use std::path::Path;

const DEFAULT_CONFIG: &str = r#"
[classification]
default_feature_class = "UNK"
default_feature_code  = "UNK"

[geometry]
wkt_precision       = 7
earth_radius_meters = 6371008.8

[search]
extra_synonyms = []
"#;

/// Top-level engine configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub classification: ClassificationConfig,
    #[serde(default)]
    pub geometry: GeometryConfig,
    #[serde(default)]
    pub search: SearchConfig,
}

/// `[classification]`: the placeholder pair written by importers that could
/// not classify a record. Features carrying it are reported as dirty.
#[derive(Debug, Clone, Deserialize)]
pub struct ClassificationConfig {
    #[serde(default = "default_feature_class")]
    pub default_feature_class: String,
    #[serde(default = "default_feature_code")]
    pub default_feature_code: String,
}

fn default_feature_class() -> String {
    "UNK".to_string()
}

fn default_feature_code() -> String {
    "UNK".to_string()
}

impl Default for ClassificationConfig {
    fn default() -> Self {
        Self {
            default_feature_class: default_feature_class(),
            default_feature_code: default_feature_code(),
        }
    }
}

/// `[geometry]`
#[derive(Debug, Clone, Deserialize)]
pub struct GeometryConfig {
    /// Decimal digits kept when writing WKT.
    #[serde(default = "default_wkt_precision")]
    pub wkt_precision: usize,
    #[serde(default = "default_earth_radius")]
    pub earth_radius_meters: f64,
}

fn default_wkt_precision() -> usize {
    7
}

fn default_earth_radius() -> f64 {
    EARTH_RADIUS_METERS
}

impl Default for GeometryConfig {
    fn default() -> Self {
        Self {
            wkt_precision: default_wkt_precision(),
            earth_radius_meters: default_earth_radius(),
        }
    }
}

/// `[search]`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchConfig {
    /// Additional particle classes; the first word of each class is the
    /// canonical form the others fold to.
    #[serde(default)]
    pub extra_synonyms: Vec<Vec<String>>,
}

impl EngineConfig {
    /// Load `path` (if it exists) and `GAZETTEER_<SECTION>__<KEY>` variables
    /// on top of the built-in defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = config::Config::builder().add_source(config::File::from_str(
            DEFAULT_CONFIG,
            config::FileFormat::Toml,
        ));
        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path).required(false));
        }
        let cfg = builder
            .add_source(config::Environment::with_prefix("GAZETTEER")
                .separator("__")
                .try_parsing(true))
            .build()?
            .try_deserialize()?;
        Ok(cfg)
    }

    /// Parse a TOML document layered over the defaults.
    pub fn from_toml_str(toml: &str) -> Result<Self> {
        let cfg = config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Toml))
            .add_source(config::File::from_str(toml, config::FileFormat::Toml))
            .build()?
            .try_deserialize()?;
        Ok(cfg)
    }
}
