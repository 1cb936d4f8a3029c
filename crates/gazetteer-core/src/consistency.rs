// crates/gazetteer-core/src/consistency.rs
use crate::config::ClassificationConfig;
use crate::model::{Feature, FeatureKey, FeatureKind};
use crate::store::{BaseRow, FeatureStore};
use std::collections::BTreeSet;
use tracing::info;

/// Whether a base row needs reclassification: classification missing,
/// placeholder classification (admin divisions and countries excepted) or
/// location at the (0,0) sentinel.
fn is_dirty(row: &BaseRow, placeholder: &ClassificationConfig) -> bool {
    let (Some(class), Some(code)) = (&row.feature_class, &row.feature_code) else {
        return true;
    };
    if row.location.is_some_and(|p| p.is_null_island()) {
        return true;
    }
    let tiered = matches!(row.kind, FeatureKind::Adm | FeatureKind::Country);
    !tiered
        && (*class == placeholder.default_feature_class
            || *code == placeholder.default_feature_code)
}

impl FeatureStore {
    /// Features that need reclassification, in key order.
    pub fn get_dirties(&self) -> Vec<Feature> {
        let placeholder = &self.config().classification;
        self.select(|tables| {
            tables
                .base
                .iter()
                .filter(|(_, row)| is_dirty(row, placeholder))
                .map(|(key, _)| *key)
                .collect()
        })
    }

    /// Remove every feature that is neither an admin division nor a
    /// country, sparing features those reference. Returns how many were
    /// removed. The selection and the removal happen under one write lock.
    pub fn delete_all_except_adms_and_countries(&self) -> usize {
        let removed = self.delete_where(|tables| {
            let kept: BTreeSet<FeatureKey> = tables
                .adms
                .keys()
                .chain(tables.countries.keys())
                .flat_map(|key| [Some(*key), tables.base.get(key).and_then(|r| r.adm)])
                .flatten()
                .collect();
            tables
                .base
                .keys()
                .filter(|key| !kept.contains(key))
                .copied()
                .collect()
        });
        info!(removed, "purged everything but admin divisions and countries");
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::Point;

    fn row(kind: FeatureKind, class: Option<&str>, code: Option<&str>, at: Option<Point>) -> BaseRow {
        BaseRow {
            kind,
            feature_id: None,
            name: "x".into(),
            location: at,
            feature_class: class.map(Into::into),
            feature_code: code.map(Into::into),
            country_code: None,
            population: None,
            shape: None,
            adm: None,
        }
    }

    #[test]
    fn dirty_rules() {
        let cfg = ClassificationConfig::default();
        let here = Some(Point::new(45.0, 3.0));
        let zero = Some(Point::new(0.0, 0.0));

        assert!(!is_dirty(&row(FeatureKind::City, Some("P"), Some("PPL"), here), &cfg));
        assert!(is_dirty(&row(FeatureKind::City, None, Some("PPL"), here), &cfg));
        assert!(is_dirty(&row(FeatureKind::City, Some("UNK"), Some("UNK"), here), &cfg));
        assert!(is_dirty(&row(FeatureKind::City, Some("P"), Some("PPL"), zero), &cfg));

        // placeholder exemption only
        assert!(!is_dirty(&row(FeatureKind::Adm, Some("UNK"), Some("UNK"), here), &cfg));
        assert!(is_dirty(&row(FeatureKind::Country, None, None, here), &cfg));
        assert!(is_dirty(&row(FeatureKind::Adm, Some("A"), Some("ADM1"), zero), &cfg));
    }

    #[test]
    fn a_missing_location_is_not_the_sentinel() {
        let cfg = ClassificationConfig::default();
        assert!(!is_dirty(&row(FeatureKind::Feature, Some("H"), Some("LK"), None), &cfg));
    }
}
