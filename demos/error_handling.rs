//! Error handling example for gazetteer-rs
//!
//! This example demonstrates the engine's error cases and the difference
//! between "absent" (Ok(None) / empty) and real failures.

use gazetteer_core::prelude::*;

fn main() -> Result<()> {
    println!("=== Gazetteer Error Handling Example ===\n");

    let store = FeatureStore::default();
    let paris = store.save(
        &Feature::city("Paris")
            .with_feature_id(2988507)
            .at(48.86667, 2.3333)
            .with_alternate_name(AlternateName::new("Lutèce", AlternateNameSource::Personal))?,
    )?;

    // Example 1: absent inputs
    println!("--- Example 1: Absent inputs are invalid arguments ---");
    match store.get(None) {
        Ok(_) => println!("  unexpected success"),
        Err(e) => println!("  get(None): {e}"),
    }
    match store.nearest_from(None::<Origin>, &NearestQuery::within(1_000.0)) {
        Ok(_) => println!("  unexpected success"),
        Err(e) => println!("  nearest_from(None): {e}"),
    }
    println!();

    // Example 2: not found is not an error
    println!("--- Example 2: Unknown ids ---");
    println!("  get_by_feature_id(1) = {:?}", store.get_by_feature_id(1)?.map(|f| f.name));
    println!("  shape_as_wkt(1) = {:?}", store.shape_as_wkt(1));
    println!();

    // Example 3: duplicate external ids
    println!("--- Example 3: Duplicate feature id ---");
    if let Err(e) = store.save(&Feature::city("Paris again").with_feature_id(2988507)) {
        println!("  {e}");
    }
    println!();

    // Example 4: reading a lazy association after the load scope closed
    println!("--- Example 4: Detached access ---");
    let lazy = store.get(paris.key())?.expect("paris is stored");
    let eager = store.get_eager(paris.key())?.expect("paris is stored");
    store.flush_and_clear()?;
    match lazy.alternate_names() {
        Ok(names) => println!("  lazy: {} names", names.len()),
        Err(e) if e.is_detached_access() => println!("  lazy: {e}"),
        Err(e) => return Err(e),
    }
    println!("  eager: {} names", eager.alternate_names()?.len());
    println!();

    // Example 5: malformed WKT
    println!("--- Example 5: Malformed WKT ---");
    match Polygon::from_wkt("POLYGON((1 2, 3 4))") {
        Ok(p) => println!("  parsed {} points", p.exterior.len()),
        Err(e) => println!("  {e}"),
    }

    Ok(())
}
