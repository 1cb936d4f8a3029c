//! Feature store integration tests: polymorphic reads, lazy associations,
//! cascading removal and the typed views.

mod common;

use common::{names_of, world, World};
use gazetteer_core::prelude::*;
use gazetteer_core::Subtype;
use pretty_assertions::assert_eq;
use rstest::rstest;

#[rstest]
#[case::country(3017382, FeatureKind::Country)]
#[case::adm(3012874, FeatureKind::Adm)]
#[case::city(2988507, FeatureKind::City)]
fn reads_resolve_the_concrete_kind(world: World, #[case] feature_id: i64, #[case] kind: FeatureKind) {
    let by_id = world.store.get_by_feature_id(feature_id).unwrap().unwrap();
    assert_eq!(by_id.kind(), kind);

    let by_key = world.store.get(by_id.key()).unwrap().unwrap();
    assert_eq!(by_key.kind(), kind);
    assert_eq!(by_key.feature_id, Some(feature_id));
}

#[rstest]
fn specialized_attributes_survive_the_round_trip(world: World) {
    let paris = world.store.get(world.paris.key()).unwrap().unwrap();
    let city = paris.as_city().expect("paris is a city");
    assert!(city.municipality);
    assert_eq!(paris.zip_codes()[0].as_str(), "75001");
    assert_eq!(paris.population, Some(2_138_551));

    let idf = world.store.get(world.idf.key()).unwrap().unwrap();
    assert_eq!(idf.as_adm().map(|a| a.level), Some(1));

    let france = world.store.get(world.france.key()).unwrap().unwrap();
    assert_eq!(france.as_country().map(|c| c.iso_alpha2.as_str()), Some("FR"));
}

#[rstest]
fn absent_inputs_are_invalid_arguments(world: World) {
    let store = &world.store;
    assert!(store.get(None).unwrap_err().is_invalid_argument());
    assert!(store.get_eager(None).unwrap_err().is_invalid_argument());
    assert!(store.exists(None).unwrap_err().is_invalid_argument());
    assert!(store.get_by_feature_id(None).unwrap_err().is_invalid_argument());
    assert!(store.list_by_name(None).unwrap_err().is_invalid_argument());
    assert!(store.remove(None).unwrap_err().is_invalid_argument());
    assert!(store.delete_all(None).unwrap_err().is_invalid_argument());
    assert!(store.list_by_feature_ids(None).is_empty());
    assert_eq!(store.shape_as_wkt(None), None);
}

#[rstest]
fn unknown_ids_are_absent_not_errors(world: World) {
    assert!(world.store.get(FeatureKey(4242)).unwrap().is_none());
    assert!(world.store.get_by_feature_id(1).unwrap().is_none());
    assert!(!world.store.exists(FeatureKey(4242)).unwrap());
    assert!(world.store.exists(world.paris.key()).unwrap());
}

#[rstest]
fn list_lookups(world: World) {
    let ids = [3031582, 1, 2988507];
    assert_eq!(
        names_of(&world.store.list_by_feature_ids(&ids[..])),
        ["Bordeaux", "Paris"]
    );
    assert_eq!(names_of(&world.store.list_by_name("Paris").unwrap()), ["Paris"]);
    assert!(world.store.list_by_name("paris").unwrap().is_empty());
}

#[rstest]
fn counts_follow_the_type_hierarchy(world: World) {
    let store = &world.store;
    assert_eq!(store.count(), 5);
    assert_eq!(store.features().count(), 5);
    assert_eq!(store.cities().count(), 3);
    assert_eq!(store.adms().count(), 1);
    assert_eq!(store.countries().count(), 1);
    assert_eq!(names_of(&store.cities().get_all()), ["Paris", "Bordeaux", "Goussainville"]);
    assert_eq!(store.get_all().len(), 5);
    assert_eq!(store.get_max_feature_id(), Some(3031582));

    assert!(store.adms().get(world.paris.key()).unwrap().is_none());
    assert!(store.features().get(world.paris.key()).unwrap().is_some());
}

#[rstest]
fn max_feature_id_of_an_empty_store() {
    assert_eq!(FeatureStore::default().get_max_feature_id(), None);
}

#[rstest]
fn deferred_associations_detach_when_the_scope_closes(world: World) {
    let lazy = world.store.get(world.paris.key()).unwrap().unwrap();
    let touched = world.store.get(world.goussainville.key()).unwrap().unwrap();
    assert_eq!(touched.adm().unwrap().map(Feature::name), Some("Ile-de-France"));
    let eager = world.store.get_eager(world.paris.key()).unwrap().unwrap();

    world.store.flush_and_clear().unwrap();

    let err = lazy.alternate_names().unwrap_err();
    assert!(err.is_detached_access());
    assert!(lazy.adm().unwrap_err().is_detached_access());
    // the key is part of the base row
    assert_eq!(lazy.adm_key(), world.idf.key());

    assert_eq!(touched.adm().unwrap().map(Feature::name), Some("Ile-de-France"));
    assert_eq!(eager.alternate_names().unwrap()[0].name, "Lutèce");
    assert_eq!(eager.adm().unwrap().map(Feature::name), Some("Ile-de-France"));

    // a fresh read opens a fresh scope
    let again = world.store.get(world.paris.key()).unwrap().unwrap();
    assert_eq!(again.alternate_names().unwrap().len(), 1);
}

#[rstest]
fn adding_a_name_to_a_detached_feature_fails(world: World) {
    let lazy = world.store.get(world.paris.key()).unwrap().unwrap();
    let eager = world.store.get_eager(world.paris.key()).unwrap().unwrap();
    world.store.flush_and_clear().unwrap();

    let extra = AlternateName::new("Paname", AlternateNameSource::Personal);
    let err = lazy.with_alternate_name(extra.clone()).unwrap_err();
    assert!(err.is_detached_access());

    let named = eager.with_alternate_name(extra).unwrap();
    assert_eq!(named.alternate_names().unwrap().len(), 2);
}

#[rstest]
fn removing_a_city_cascades_to_owned_rows_only(world: World) {
    let store = &world.store;
    assert!(store.remove(&world.paris).unwrap());
    store.index().commit();

    assert!(store.get(world.paris.key()).unwrap().is_none());
    assert!(store.get_by_feature_id(2988507).unwrap().is_none());
    assert!(store.cities().search_text("Lutece", true).unwrap().is_empty());
    assert!(store.cities().search_text("75001", true).unwrap().is_empty());

    // the referenced division is an independent record
    assert!(store.exists(world.idf.key()).unwrap());
    assert_eq!(store.count(), 4);
    assert!(!store.remove(&world.paris).unwrap());
}

#[rstest]
fn removing_through_the_base_handle_clears_both_views(world: World) {
    let as_feature = world.store.features().get(world.bordeaux.key()).unwrap().unwrap();
    assert_eq!(as_feature.kind(), FeatureKind::City);
    world.store.remove(&as_feature).unwrap();

    assert!(world.store.features().get(world.bordeaux.key()).unwrap().is_none());
    assert!(world.store.cities().get(world.bordeaux.key()).unwrap().is_none());
}

#[rstest]
fn empty_id_lists_give_empty_results(world: World) {
    let none: &[i64] = &[];
    assert!(world.store.list_by_feature_ids(none).is_empty());
}

#[rstest]
fn delete_all_is_all_or_nothing(world: World) {
    let store = &world.store;
    let unsaved = Feature::city("Nowhere");
    let batch = vec![world.bordeaux.clone(), unsaved];
    assert!(store.delete_all(&batch[..]).unwrap_err().is_invalid_argument());
    assert_eq!(store.count(), 5);

    let batch = vec![world.bordeaux.clone(), world.goussainville.clone()];
    assert_eq!(store.delete_all(&batch[..]).unwrap(), 2);
    assert_eq!(store.cities().count(), 1);
}

#[rstest]
fn view_delete_all_counts_only_its_kind(world: World) {
    assert_eq!(world.store.cities().delete_all(), 3);
    assert_eq!(world.store.count(), 2);
    assert_eq!(world.store.cities().delete_all(), 0);
}

#[rstest]
fn changing_the_subtype_replaces_the_specialization(world: World) {
    let paris = world.store.get_eager(world.paris.key()).unwrap().unwrap();
    let retyped = world
        .store
        .save(&paris.into_subtype(Subtype::Feature))
        .unwrap();

    assert_eq!(retyped.kind(), FeatureKind::Feature);
    assert_eq!(world.store.cities().count(), 2);
    assert_eq!(world.store.count(), 5);
    let read = world.store.get(world.paris.key()).unwrap().unwrap();
    assert_eq!(read.kind(), FeatureKind::Feature);
    assert!(read.zip_codes().is_empty());
    assert_eq!(read.alternate_names().unwrap().len(), 1);
}

#[rstest]
fn duplicate_feature_ids_are_rejected(world: World) {
    let clash = Feature::city("Paris bis").with_feature_id(2988507);
    let err = world.store.save(&clash).unwrap_err();
    assert!(matches!(err, GazetteerError::DuplicateFeatureId(2988507)));
    assert_eq!(world.store.count(), 5);
}

#[rstest]
fn shapes_come_back_as_wkt(world: World) {
    let square = Polygon::new(vec![
        Point::new(48.0, 2.0),
        Point::new(48.0, 3.0),
        Point::new(49.0, 3.0),
        Point::new(49.0, 2.0),
        Point::new(48.0, 2.0),
    ]);
    let mut idf = world.store.get_eager(world.idf.key()).unwrap().unwrap();
    idf.shape = Some(square);
    world.store.save(&idf).unwrap();

    assert_eq!(
        world.store.shape_as_wkt(3012874).as_deref(),
        Some("POLYGON((2 48,3 48,3 49,2 49,2 48))")
    );
    assert_eq!(world.store.shape_as_wkt(2988507), None);
    assert_eq!(world.store.shape_as_wkt(1), None);
}
