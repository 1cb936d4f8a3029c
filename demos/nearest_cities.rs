//! Nearest-neighbour example for gazetteer-rs
//!
//! This example demonstrates how to:
//! - Save cities, an admin division and a country
//! - Query the nearest features from a point and from a stored feature
//! - Filter by kind and municipality flag, and page through the results

use gazetteer_core::prelude::*;

fn main() -> Result<()> {
    println!("=== Gazetteer Nearest Cities Example ===\n");

    let store = FeatureStore::default();
    let idf = store.save(
        &Feature::administrative("Ile-de-France", 1)
            .with_feature_id(3012874)
            .at(48.5, 2.5)
            .classified("A", "ADM1"),
    )?;
    let paris = store.save(
        &Feature::city("Paris")
            .with_feature_id(2988507)
            .at(48.86667, 2.3333)
            .classified("P", "PPLC")
            .municipality(true)
            .with_adm(&idf),
    )?;
    for (id, name, lat, lng, municipality) in [
        (3031582, "Bordeaux", 44.83333, -0.56667, true),
        (3015419, "Goussainville", 49.01667, 2.46667, false),
        (2990969, "Nanterre", 48.89198, 2.20675, true),
        (3023763, "Courbevoie", 48.89672, 2.25666, false),
    ] {
        store.save(
            &Feature::city(name)
                .with_feature_id(id)
                .at(lat, lng)
                .classified("P", "PPL")
                .municipality(municipality),
        )?;
    }
    println!("✓ {} features saved\n", store.count());

    // Example 1: everything around a point
    println!("--- Example 1: Within 50 km of Notre-Dame ---");
    let hits = store.nearest_from(Point::new(48.853, 2.3499), &NearestQuery::within(50_000.0))?;
    print_hits(&hits);

    // Example 2: cities around Paris, Paris itself excluded
    println!("--- Example 2: Cities within 600 km of Paris ---");
    let query = NearestQuery::within(600_000.0).kind(FeatureKind::City);
    print_hits(&store.nearest_from(&paris, &query)?);

    // Example 3: the same, municipalities excluded
    println!("--- Example 3: ... without municipalities ---");
    print_hits(&store.nearest_from(&paris, &query.clone().municipalities(true))?);

    // Example 4: pages of two, distances left out
    println!("--- Example 4: Paging by two ---");
    for page in 0..3 {
        let paged = query
            .clone()
            .paginate(Pagination::offset(page * 2, 2))
            .include_distance(false);
        let hits = store.nearest_from(&paris, &paged)?;
        let names: Vec<_> = hits.iter().map(|h| h.name()).collect();
        println!("  page {}: {names:?}", page + 1);
    }

    Ok(())
}

fn print_hits(hits: &[GisFeatureDistance]) {
    for hit in hits {
        match hit.distance() {
            Some(d) => println!("  {:>8.1} km  {} ({})", d / 1000.0, hit.name(), hit.kind),
            None => println!("  {} ({})", hit.name(), hit.kind),
        }
    }
    println!();
}
