// crates/gazetteer-core/src/nearest.rs

//! # Nearest-neighbour queries
//!
//! [`FeatureStore::nearest_from`] ranks stored features by great-circle
//! distance from a point or from another feature.
//!
//! ```rust
//! use gazetteer_core::prelude::*;
//!
//! let store = FeatureStore::default();
//! let paris = store.save(&Feature::city("Paris").at(48.86667, 2.3333)).unwrap();
//! store.save(&Feature::city("Bordeaux").at(44.83333, -0.56667)).unwrap();
//! store.save(&Feature::city("Goussainville").at(49.01667, 2.46667)).unwrap();
//!
//! let query = NearestQuery::within(1_000_000.0).kind(FeatureKind::City);
//! let hits = store.nearest_from(&paris, &query).unwrap();
//! let names: Vec<_> = hits.iter().map(|h| h.name()).collect();
//! assert_eq!(names, ["Goussainville", "Bordeaux"]);
//! ```

use crate::error::{GazetteerError, Result};
use crate::geo::{haversine_distance, latitude_band, Point};
use crate::model::{Feature, FeatureKey, FeatureKind, GisFeatureDistance};
use crate::store::FeatureStore;
use std::cmp::Ordering;
use tracing::debug;

/// Where distances are measured from.
#[derive(Clone, Copy, Debug)]
pub enum Origin<'a> {
    Point(Point),
    /// A feature; it is left out of its own results.
    Feature(&'a Feature),
}

impl From<Point> for Origin<'_> {
    fn from(p: Point) -> Self {
        Origin::Point(p)
    }
}

impl<'a> From<&'a Feature> for Origin<'a> {
    fn from(f: &'a Feature) -> Self {
        Origin::Feature(f)
    }
}

impl From<Point> for Option<Origin<'_>> {
    fn from(p: Point) -> Self {
        Some(Origin::Point(p))
    }
}

impl<'a> From<&'a Feature> for Option<Origin<'a>> {
    fn from(f: &'a Feature) -> Self {
        Some(Origin::Feature(f))
    }
}

/// Which cities survive the municipality flag.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MunicipalityFilter {
    /// The flag has no effect.
    #[default]
    Any,
    /// Drop cities flagged as municipality.
    ExcludeMunicipalities,
    /// Keep only cities flagged as municipality.
    OnlyMunicipalities,
}

impl MunicipalityFilter {
    #[inline]
    fn keeps(self, municipality: bool) -> bool {
        match self {
            MunicipalityFilter::Any => true,
            MunicipalityFilter::ExcludeMunicipalities => !municipality,
            MunicipalityFilter::OnlyMunicipalities => municipality,
        }
    }
}

impl From<bool> for MunicipalityFilter {
    /// `true` excludes municipalities, `false` keeps everything.
    fn from(exclude: bool) -> Self {
        if exclude {
            MunicipalityFilter::ExcludeMunicipalities
        } else {
            MunicipalityFilter::Any
        }
    }
}

/// Window over the ordered results. A `limit` of 0 means no cap.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Pagination {
    pub offset: usize,
    pub limit: usize,
}

impl Pagination {
    /// Skip `offset` results (0-based), then return at most `limit`.
    pub const fn offset(offset: usize, limit: usize) -> Self {
        Self { offset, limit }
    }

    /// Start at the `first`-th result (1-based; 0 and 1 both mean the
    /// start), return at most `max`.
    pub const fn first_result(first: usize, max: usize) -> Self {
        Self {
            offset: first.saturating_sub(1),
            limit: max,
        }
    }

    pub const fn all() -> Self {
        Self { offset: 0, limit: 0 }
    }

    pub(crate) fn apply<T>(self, items: Vec<T>) -> Vec<T> {
        let take = if self.limit == 0 { usize::MAX } else { self.limit };
        items.into_iter().skip(self.offset).take(take).collect()
    }
}

/// Parameters of a nearest-neighbour query.
#[derive(Clone, Debug, PartialEq)]
pub struct NearestQuery {
    pub radius_meters: f64,
    pub pagination: Pagination,
    pub include_distance: bool,
    /// `FeatureKind::Feature` matches every kind.
    pub kind: FeatureKind,
    pub municipalities: MunicipalityFilter,
}

impl NearestQuery {
    /// Everything within `radius_meters`, distances included.
    pub fn within(radius_meters: f64) -> Self {
        Self {
            radius_meters,
            pagination: Pagination::all(),
            include_distance: true,
            kind: FeatureKind::Feature,
            municipalities: MunicipalityFilter::Any,
        }
    }

    pub fn paginate(mut self, pagination: Pagination) -> Self {
        self.pagination = pagination;
        self
    }

    pub fn include_distance(mut self, include: bool) -> Self {
        self.include_distance = include;
        self
    }

    pub fn kind(mut self, kind: FeatureKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn municipalities(mut self, filter: impl Into<MunicipalityFilter>) -> Self {
        self.municipalities = filter.into();
        self
    }
}

impl FeatureStore {
    /// Features within `query.radius_meters` of `origin`, nearest first.
    ///
    /// Ties on distance are broken by key, so equal inputs give equal
    /// outputs. Filters (kind, municipality, origin exclusion) run before
    /// pagination; features without a location never match.
    pub fn nearest_from<'a>(
        &self,
        origin: impl Into<Option<Origin<'a>>>,
        query: &NearestQuery,
    ) -> Result<Vec<GisFeatureDistance>> {
        let origin = origin
            .into()
            .ok_or(GazetteerError::InvalidArgument("origin is required"))?;
        if query.radius_meters.is_nan() || query.radius_meters < 0.0 {
            return Err(GazetteerError::InvalidArgument("radius must be a non-negative number"));
        }
        let (center, excluded) = match origin {
            Origin::Point(p) => (p, Excluded::Nothing),
            Origin::Feature(f) => {
                let center = f
                    .location
                    .ok_or(GazetteerError::InvalidArgument("origin feature has no location"))?;
                let excluded = match (f.key(), f.feature_id) {
                    (Some(key), _) => Excluded::Key(key),
                    (None, Some(id)) => Excluded::FeatureId(id),
                    (None, None) => Excluded::Nothing,
                };
                (center, excluded)
            }
        };

        let earth = self.config().geometry.earth_radius_meters;
        let (min_lat, max_lat) = latitude_band(&center, query.radius_meters, earth);

        let mut hits = self.with_tables(|tables| {
            let mut hits = Vec::new();
            for (key, row) in &tables.base {
                if !query.kind.includes(row.kind) || excluded.matches(*key, row.feature_id) {
                    continue;
                }
                let Some(location) = row.location else {
                    continue;
                };
                if location.lat < min_lat || location.lat > max_lat {
                    continue;
                }
                let distance = haversine_distance(&center, &location, earth);
                if distance > query.radius_meters {
                    continue;
                }
                let municipality = tables.is_municipality(*key);
                if !query.municipalities.keeps(municipality) {
                    continue;
                }
                hits.push(GisFeatureDistance::from_row(*key, row, municipality, Some(distance)));
            }
            hits
        });

        hits.sort_by(by_distance_then_key);
        let total = hits.len();
        let mut page = query.pagination.apply(hits);
        if !query.include_distance {
            for hit in &mut page {
                hit.distance = None;
            }
        }
        debug!(
            lat = center.lat,
            lng = center.lng,
            radius = query.radius_meters,
            kind = %query.kind,
            candidates = total,
            returned = page.len(),
            "nearest query"
        );
        Ok(page)
    }
}

#[derive(Clone, Copy)]
enum Excluded {
    Nothing,
    Key(FeatureKey),
    FeatureId(i64),
}

impl Excluded {
    #[inline]
    fn matches(self, key: FeatureKey, feature_id: Option<i64>) -> bool {
        match self {
            Excluded::Nothing => false,
            Excluded::Key(k) => k == key,
            Excluded::FeatureId(id) => feature_id == Some(id),
        }
    }
}

fn by_distance_then_key(a: &GisFeatureDistance, b: &GisFeatureDistance) -> Ordering {
    let da = a.distance.unwrap_or(f64::INFINITY);
    let db = b.distance.unwrap_or(f64::INFINITY);
    da.total_cmp(&db).then(a.key.cmp(&b.key))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn pagination_windows() {
        let items: Vec<u32> = (0..10).collect();
        assert_eq!(Pagination::offset(0, 0).apply(items.clone()).len(), 10);
        assert_eq!(Pagination::offset(8, 5).apply(items.clone()), vec![8, 9]);
        assert_eq!(Pagination::first_result(0, 2).apply(items.clone()), vec![0, 1]);
        assert_eq!(Pagination::first_result(1, 2).apply(items.clone()), vec![0, 1]);
        assert_eq!(Pagination::first_result(2, 2).apply(items), vec![1, 2]);
    }

    #[test]
    fn municipality_filter_from_flag() {
        assert_eq!(MunicipalityFilter::from(true), MunicipalityFilter::ExcludeMunicipalities);
        assert_eq!(MunicipalityFilter::from(false), MunicipalityFilter::Any);
        assert!(!MunicipalityFilter::ExcludeMunicipalities.keeps(true));
        assert!(MunicipalityFilter::OnlyMunicipalities.keeps(true));
        assert!(!MunicipalityFilter::OnlyMunicipalities.keeps(false));
    }

    #[test]
    fn rejects_missing_origin_and_bad_radius() {
        let store = FeatureStore::default();
        let q = NearestQuery::within(10.0);
        assert!(store.nearest_from(None::<Origin>, &q).unwrap_err().is_invalid_argument());
        let bad = NearestQuery::within(f64::NAN);
        assert!(store
            .nearest_from(Point::new(0.0, 0.0), &bad)
            .unwrap_err()
            .is_invalid_argument());
        let nowhere = Feature::new("nowhere");
        assert!(store.nearest_from(&nowhere, &q).unwrap_err().is_invalid_argument());
    }
}
