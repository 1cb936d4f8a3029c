use clap::{Args, Parser, Subcommand};
use gazetteer_core::FeatureKind;
use std::path::PathBuf;

/// CLI arguments for gazetteer-cli
#[derive(Debug, Parser)]
#[command(
    name = "gazetteer-cli",
    version,
    about = "CLI for querying and maintaining a gazetteer snapshot"
)]
pub struct CliArgs {
    /// Snapshot file (default: gazetteer.bin.gz in the working directory)
    #[arg(short = 's', long = "snapshot", global = true)]
    pub snapshot: Option<PathBuf>,

    /// Engine configuration file (TOML)
    #[arg(short = 'c', long = "config", global = true)]
    pub config: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Show a summary of the snapshot contents
    Stats,

    /// Import a JSON fixture (array of feature records) into the snapshot
    Build {
        /// Path to a .json or .json.gz file
        input: PathBuf,
    },

    /// Features nearest to a point
    Near {
        lat: f64,
        lng: f64,
        #[command(flatten)]
        opts: NearOpts,
    },

    /// Features nearest to a stored feature (the feature itself is excluded)
    NearFeature {
        /// External feature id of the origin
        feature_id: i64,
        #[command(flatten)]
        opts: NearOpts,
    },

    /// Full-text search on names
    Search {
        text: String,
        /// Also search alternate names and zip codes
        #[arg(short = 'a', long)]
        alternates: bool,
        /// feature, city, adm or country
        #[arg(short = 'k', long, default_value = "city")]
        kind: FeatureKind,
    },

    /// List features that need reclassification
    Dirties,

    /// Print the shape of a feature as WKT
    Wkt { feature_id: i64 },

    /// Delete everything except admin divisions and countries
    Purge,
}

#[derive(Debug, Args)]
pub struct NearOpts {
    /// Search radius in meters
    #[arg(short = 'r', long, default_value_t = 10_000.0)]
    pub radius: f64,
    /// Results to skip
    #[arg(long, default_value_t = 0)]
    pub offset: usize,
    /// Maximum results (0 = no cap)
    #[arg(short = 'l', long, default_value_t = 10)]
    pub limit: usize,
    /// feature (any kind), city, adm or country
    #[arg(short = 'k', long, default_value = "feature")]
    pub kind: FeatureKind,
    /// Leave distances out of the output
    #[arg(long)]
    pub no_distance: bool,
    /// Drop cities flagged as municipality
    #[arg(long, conflicts_with = "only_municipalities")]
    pub exclude_municipalities: bool,
    /// Keep only cities flagged as municipality
    #[arg(long)]
    pub only_municipalities: bool,
}
