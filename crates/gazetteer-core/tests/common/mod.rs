#![allow(dead_code)]
//! Shared fixtures: a small French gazetteer.
//!
//! | feature        | kind    | feature id | location             | municipality |
//! |----------------|---------|------------|----------------------|--------------|
//! | France         | country | 3017382    | 46.0, 2.0            |              |
//! | Ile-de-France  | adm 1   | 3012874    | 48.5, 2.5            |              |
//! | Paris          | city    | 2988507    | 48.86667, 2.3333     | yes          |
//! | Bordeaux       | city    | 3031582    | 44.83333, -0.56667   | yes          |
//! | Goussainville  | city    | 3015419    | 49.01667, 2.46667    | no           |

use gazetteer_core::prelude::*;
use rstest::fixture;

pub struct World {
    pub store: FeatureStore,
    pub france: Feature,
    pub idf: Feature,
    pub paris: Feature,
    pub bordeaux: Feature,
    pub goussainville: Feature,
}

impl World {
    pub fn names(hits: &[GisFeatureDistance]) -> Vec<&str> {
        hits.iter().map(|h| h.name()).collect()
    }
}

pub fn names_of(features: &[Feature]) -> Vec<&str> {
    features.iter().map(|f| f.name()).collect()
}

#[fixture]
pub fn world() -> World {
    let store = FeatureStore::default();

    let france = store
        .save(
            &Feature::country("France", "FR")
                .with_feature_id(3017382)
                .at(46.0, 2.0)
                .classified("A", "PCLI"),
        )
        .unwrap();
    let idf = store
        .save(
            &Feature::administrative("Ile-de-France", 1)
                .with_feature_id(3012874)
                .at(48.5, 2.5)
                .classified("A", "ADM1")
                .in_country("FR"),
        )
        .unwrap();
    let paris = store
        .save(
            &Feature::city("Paris")
                .with_feature_id(2988507)
                .at(48.86667, 2.3333)
                .classified("P", "PPLC")
                .in_country("FR")
                .with_population(2_138_551)
                .municipality(true)
                .with_zip_code("75001")
                .with_alternate_name(
                    AlternateName::new("Lutèce", AlternateNameSource::Personal).with_language("fr"),
                )
                .unwrap()
                .with_adm(&idf),
        )
        .unwrap();
    let bordeaux = store
        .save(
            &Feature::city("Bordeaux")
                .with_feature_id(3031582)
                .at(44.83333, -0.56667)
                .classified("P", "PPLA")
                .in_country("FR")
                .municipality(true)
                .with_zip_code("33000"),
        )
        .unwrap();
    let goussainville = store
        .save(
            &Feature::city("Goussainville")
                .with_feature_id(3015419)
                .at(49.01667, 2.46667)
                .classified("P", "PPL")
                .in_country("FR")
                .with_zip_code("95190")
                .with_adm(&idf),
        )
        .unwrap();
    store.index().commit();

    World {
        store,
        france,
        idf,
        paris,
        bordeaux,
        goussainville,
    }
}
