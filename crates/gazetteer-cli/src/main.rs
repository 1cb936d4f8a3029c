//! gazetteer-cli: command-line interface for gazetteer-core
//!
//! Builds a snapshot from JSON fixtures and runs the engine's queries
//! against it.
//!
//! Usage examples
//! --------------
//!
//! - Import a fixture and show what is in the snapshot
//!   $ gazetteer-cli build fixtures/fr.json
//!   $ gazetteer-cli stats
//!
//! - Nearest cities to a point, 25 km around, municipalities excluded
//!   $ gazetteer-cli near 48.8566 2.3522 -r 25000 -k city --exclude-municipalities
//!
//! - Nearest features to a stored feature, second page of five
//!   $ gazetteer-cli near-feature 2988507 -r 500000 --offset 5 --limit 5
//!
//! - Accent and particle insensitive search
//!   $ gazetteer-cli search "st andre" --alternates --kind city
//!
//! Logging goes to stderr and is controlled with `RUST_LOG`
//! (default `warn`).
mod args;

use crate::args::{CliArgs, Commands, NearOpts};
use anyhow::{bail, Context};
use clap::Parser;
use gazetteer_core::persist::default_snapshot_filename;
use gazetteer_core::prelude::*;
use serde_json::json;
use std::path::PathBuf;

fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();
    init_tracing();

    let config = EngineConfig::load(args.config.as_deref()).context("loading configuration")?;
    let path = args
        .snapshot
        .clone()
        .unwrap_or_else(|| PathBuf::from(default_snapshot_filename()));
    let store = FeatureStore::open(config, SnapshotFile::new(&path))
        .with_context(|| format!("opening snapshot {}", path.display()))?;

    match args.command {
        Commands::Stats => {
            let index = store.index().stats();
            if args.json {
                print_json(&json!({
                    "features": store.count(),
                    "cities": store.cities().count(),
                    "adms": store.adms().count(),
                    "countries": store.countries().count(),
                    "max_feature_id": store.get_max_feature_id(),
                    "indexed": index.documents,
                    "terms": index.terms,
                }))?;
            } else {
                println!("Snapshot {}:", path.display());
                println!("  Features:  {}", store.count());
                println!("  Cities:    {}", store.cities().count());
                println!("  Adms:      {}", store.adms().count());
                println!("  Countries: {}", store.countries().count());
                match store.get_max_feature_id() {
                    Some(id) => println!("  Max feature id: {id}"),
                    None => println!("  Max feature id: -"),
                }
                println!("  Index: {} documents, {} terms", index.documents, index.terms);
            }
        }

        Commands::Build { input } => build(&store, input)?,

        Commands::Near { lat, lng, opts } => {
            let hits = store.nearest_from(Point::new(lat, lng), &near_query(&opts))?;
            print_hits(&hits, args.json)?;
        }

        Commands::NearFeature { feature_id, opts } => {
            let Some(origin) = store.get_by_feature_id(feature_id)? else {
                bail!("no feature with id {feature_id}");
            };
            let hits = store.nearest_from(&origin, &near_query(&opts))?;
            print_hits(&hits, args.json)?;
        }

        Commands::Search {
            text,
            alternates,
            kind,
        } => {
            let hits = store.search_text(text.as_str(), alternates, kind)?;
            if hits.is_empty() && !args.json {
                println!("No {kind} matching: {text}");
            }
            print_features(&hits, args.json)?;
        }

        Commands::Dirties => print_features(&store.get_dirties(), args.json)?,

        Commands::Wkt { feature_id } => match store.shape_as_wkt(feature_id) {
            Some(wkt) => println!("{wkt}"),
            None => eprintln!("No shape for feature {feature_id}"),
        },

        Commands::Purge => {
            let removed = store.delete_all_except_adms_and_countries();
            store.index().commit();
            store.flush_and_clear()?;
            println!("Removed {removed} features, {} left", store.count());
        }
    }

    Ok(())
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_env("RUST_LOG")
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();
}

#[cfg(feature = "json")]
fn build(store: &FeatureStore, input: PathBuf) -> anyhow::Result<()> {
    let records = load_features_json(&input)
        .with_context(|| format!("reading fixture {}", input.display()))?;
    let imported = store.import_records(&records)?;
    store.index().commit();
    store.flush_and_clear()?;
    tracing::info!(imported, "build finished");
    println!("Imported {imported} features, {} in snapshot", store.count());
    Ok(())
}

#[cfg(not(feature = "json"))]
fn build(_store: &FeatureStore, _input: PathBuf) -> anyhow::Result<()> {
    bail!("`build` needs the `json` feature")
}

fn near_query(opts: &NearOpts) -> NearestQuery {
    let municipalities = if opts.only_municipalities {
        MunicipalityFilter::OnlyMunicipalities
    } else {
        MunicipalityFilter::from(opts.exclude_municipalities)
    };
    NearestQuery::within(opts.radius)
        .kind(opts.kind)
        .paginate(Pagination::offset(opts.offset, opts.limit))
        .include_distance(!opts.no_distance)
        .municipalities(municipalities)
}

fn print_json(value: &serde_json::Value) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_hits(hits: &[GisFeatureDistance], as_json: bool) -> anyhow::Result<()> {
    if as_json {
        println!("{}", serde_json::to_string_pretty(hits)?);
        return Ok(());
    }
    for hit in hits {
        let distance = hit
            .distance()
            .map(|d| format!("{:>10.1} km", d / 1000.0))
            .unwrap_or_default();
        println!(
            "{distance} {} ({}, id {})",
            hit.name(),
            hit.kind,
            hit.feature_id.map_or_else(|| "-".to_string(), |id| id.to_string())
        );
    }
    Ok(())
}

fn print_features(features: &[Feature], as_json: bool) -> anyhow::Result<()> {
    if as_json {
        let rows: Vec<_> = features
            .iter()
            .map(|f| {
                json!({
                    "feature_id": f.feature_id,
                    "name": f.name(),
                    "kind": f.kind(),
                    "location": f.location,
                    "feature_class": f.feature_class,
                    "feature_code": f.feature_code,
                    "country_code": f.country_code,
                })
            })
            .collect();
        return print_json(&serde_json::Value::Array(rows));
    }
    for f in features {
        let class = f
            .classification()
            .map(|(class, code)| format!("{class}.{code}"))
            .unwrap_or_else(|| "unclassified".to_string());
        println!(
            "{} ({}, {class}, id {})",
            f.name(),
            f.kind(),
            f.feature_id.map_or_else(|| "-".to_string(), |id| id.to_string())
        );
    }
    Ok(())
}
