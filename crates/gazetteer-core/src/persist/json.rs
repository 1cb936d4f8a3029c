// crates/gazetteer-core/src/persist/json.rs
use super::{common_io, FeatureRecord};
use crate::error::Result;
use std::path::Path;
use tracing::info;

/// Read a JSON array of [`FeatureRecord`]s (`.json`, or `.json.gz` with
/// the `compact` feature).
pub fn load_features_json(path: impl AsRef<Path>) -> Result<Vec<FeatureRecord>> {
    let path = path.as_ref();
    let reader = common_io::open_stream(path)?;
    let records: Vec<FeatureRecord> = serde_json::from_reader(reader)?;
    info!(path = %path.display(), records = records.len(), "fixture file read");
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{FeatureKind, Subtype};
    use std::io::Write;

    #[test]
    fn reads_tagged_records() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(
            file,
            r#"[
              {{"kind": "adm", "level": 1, "feature_id": 10, "name": "Ile-de-France"}},
              {{"kind": "city", "feature_id": 1, "name": "Paris", "lat": 48.86667, "lng": 2.3333,
                "municipality": true, "zip_codes": ["75001"], "adm_feature_id": 10}},
              {{"kind": "feature", "feature_id": 2, "name": "Seine"}}
            ]"#
        )
        .unwrap();

        let records = load_features_json(file.path()).unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].subtype.kind(), FeatureKind::Adm);
        match &records[1].subtype {
            Subtype::City(city) => {
                assert!(city.municipality);
                assert_eq!(city.zip_codes.len(), 1);
            }
            other => panic!("expected a city, got {other:?}"),
        }
        assert_eq!(records[1].adm_feature_id, Some(10));
    }

    #[test]
    fn missing_file_is_not_found() {
        let err = load_features_json("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, crate::GazetteerError::NotFound(_)));
    }
}
