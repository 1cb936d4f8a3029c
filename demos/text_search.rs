//! Text search example for gazetteer-rs
//!
//! This example demonstrates how to:
//! - Index names, alternate names and zip codes
//! - Search independently of accents, case and `St`/`Saint` spelling
//! - Restrict a search to one kind
//! - Extend the particle table through configuration

use gazetteer_core::prelude::*;

fn main() -> Result<()> {
    println!("=== Gazetteer Text Search Example ===\n");

    let config = EngineConfig::from_toml_str(
        r#"
        [search]
        extra_synonyms = [["notre", "nd"]]
        "#,
    )?;
    let store = FeatureStore::new(config);

    store.save(&Feature::city("Saint-André-lez-Lille").with_zip_code("59350"))?;
    store.save(&Feature::city("Sainte-Foy-lès-Lyon").with_zip_code("69110"))?;
    store.save(
        &Feature::city("Lyon")
            .with_zip_code("69001")
            .with_alternate_name(AlternateName::new("Lugdunum", AlternateNameSource::Personal).with_language("la"))?,
    )?;
    store.save(&Feature::administrative("Saint-André", 3))?;
    store.save(&Feature::new("Notre-Dame-de-la-Garde"))?;

    println!("Staged index operations: {}", store.index().pending());
    store.index().commit();
    println!("✓ Index committed\n");

    for (query, alternates) in [
        ("st andre lez lille", false),
        ("ST FOY", false),
        ("lugdunum", false),
        ("lugdunum", true),
        ("69110", true),
    ] {
        let hits = store.cities().search_text(query, alternates)?;
        let names: Vec<_> = hits.iter().map(|f| f.name()).collect();
        println!("cities \"{query}\" (alternates: {alternates}): {names:?}");
    }
    println!();

    // Same tokens, different partitions
    let adms = store.adms().search_text("St André", false)?;
    println!("adms \"St André\": {:?}", adms.iter().map(|f| f.name()).collect::<Vec<_>>());
    let plain = store.features().search_text("ND de la Garde", false)?;
    println!("features \"ND de la Garde\": {:?}", plain.iter().map(|f| f.name()).collect::<Vec<_>>());

    println!("\nmatch key of \"Ste-Foy\": {}", match_key("Ste-Foy"));
    Ok(())
}
