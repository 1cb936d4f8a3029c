//! gazetteer-cli
//! =============
//!
//! Command-line interface for the `gazetteer-core` query engine.
//!
//! This crate primarily provides a binary (`gazetteer-cli`). The library
//! target only exists so that docs.rs renders this overview.
//!
//! Basic usage:
//!
//! ```text
//! gazetteer-cli --snapshot fr.bin.gz build fixtures/fr.json
//! gazetteer-cli --snapshot fr.bin.gz stats
//! gazetteer-cli --snapshot fr.bin.gz near 48.8566 2.3522 --radius 25000 --kind city
//! gazetteer-cli --snapshot fr.bin.gz search "st andre" --alternates
//! ```
//!
//! For programmatic access use the `gazetteer-core` crate directly.
#![cfg_attr(docsrs, feature(doc_cfg))]
