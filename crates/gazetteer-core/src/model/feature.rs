// crates/gazetteer-core/src/model/feature.rs
use super::association::Association;
use crate::error::Result;
use crate::geo::{Point, Polygon};
use crate::traits::NameMatch;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Internal identifier issued by the store. Stable and never reused.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct FeatureKey(pub u64);

impl fmt::Display for FeatureKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Concrete kind of a stored feature. Doubles as the discriminant of the
/// base row, telling which specialization table (if any) holds the rest.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum FeatureKind {
    /// A plain feature with no specialization.
    Feature,
    City,
    Adm,
    Country,
}

impl FeatureKind {
    pub const ALL: [FeatureKind; 4] = [
        FeatureKind::Feature,
        FeatureKind::City,
        FeatureKind::Adm,
        FeatureKind::Country,
    ];

    /// Type-hierarchy check: every kind is a `Feature`, otherwise kinds only
    /// include themselves.
    #[inline]
    pub fn includes(self, other: FeatureKind) -> bool {
        self == FeatureKind::Feature || self == other
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FeatureKind::Feature => "feature",
            FeatureKind::City => "city",
            FeatureKind::Adm => "adm",
            FeatureKind::Country => "country",
        }
    }
}

impl fmt::Display for FeatureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for FeatureKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        FeatureKind::ALL
            .into_iter()
            .find(|k| k.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown feature kind `{s}` (feature, city, adm, country)"))
    }
}

/// Where an alternate name came from.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AlternateNameSource {
    /// The alternate-names dump.
    #[default]
    AlternateNamesFile,
    /// The alternate-names column embedded in the main dump.
    Embedded,
    /// Added by hand.
    Personal,
}

/// An alternate (translated, historical, abbreviated) name of one feature.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlternateName {
    pub name: String,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub source: AlternateNameSource,
}

impl AlternateName {
    pub fn new(name: impl Into<String>, source: AlternateNameSource) -> Self {
        Self {
            name: name.into(),
            language: None,
            source,
        }
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }
}

/// A postal code owned by a city.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ZipCode(pub String);

impl ZipCode {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CityAttrs {
    /// Official administrative municipality, as opposed to a populated place.
    #[serde(default)]
    pub municipality: bool,
    #[serde(default)]
    pub zip_codes: Vec<ZipCode>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AdmAttrs {
    /// 1..=4, the administrative depth.
    pub level: u8,
    #[serde(default)]
    pub adm1_code: Option<String>,
    #[serde(default)]
    pub adm2_code: Option<String>,
    #[serde(default)]
    pub adm3_code: Option<String>,
    #[serde(default)]
    pub adm4_code: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CountryAttrs {
    pub iso_alpha2: String,
    #[serde(default)]
    pub iso_alpha3: Option<String>,
}

/// The specialization layered over the base record.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Subtype {
    #[default]
    Feature,
    City(CityAttrs),
    Adm(AdmAttrs),
    Country(CountryAttrs),
}

impl Subtype {
    pub fn kind(&self) -> FeatureKind {
        match self {
            Subtype::Feature => FeatureKind::Feature,
            Subtype::City(_) => FeatureKind::City,
            Subtype::Adm(_) => FeatureKind::Adm,
            Subtype::Country(_) => FeatureKind::Country,
        }
    }
}

/// A named geographic entity, resolved to its concrete kind.
///
/// Build new features with the constructors and `with_*` methods, persist
/// them with `FeatureStore::save`, and read them back with `get` (deferred
/// alternate names and admin reference) or `get_eager` (everything loaded).
#[derive(Clone, Debug)]
pub struct Feature {
    pub(crate) key: Option<FeatureKey>,
    pub feature_id: Option<i64>,
    pub name: String,
    pub location: Option<Point>,
    pub feature_class: Option<String>,
    pub feature_code: Option<String>,
    pub country_code: Option<String>,
    pub population: Option<u32>,
    pub shape: Option<Polygon>,
    pub subtype: Subtype,
    pub(crate) adm_key: Option<FeatureKey>,
    pub(crate) adm: Association<Option<Box<Feature>>>,
    pub(crate) alternate_names: Association<Vec<AlternateName>>,
}

impl Feature {
    /// A plain feature.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_subtype(name, Subtype::Feature)
    }

    pub fn city(name: impl Into<String>) -> Self {
        Self::with_subtype(name, Subtype::City(CityAttrs::default()))
    }

    pub fn administrative(name: impl Into<String>, level: u8) -> Self {
        Self::with_subtype(
            name,
            Subtype::Adm(AdmAttrs {
                level,
                ..AdmAttrs::default()
            }),
        )
    }

    pub fn country(name: impl Into<String>, iso_alpha2: impl Into<String>) -> Self {
        let iso_alpha2 = iso_alpha2.into();
        let mut f = Self::with_subtype(
            name,
            Subtype::Country(CountryAttrs {
                iso_alpha2: iso_alpha2.clone(),
                iso_alpha3: None,
            }),
        );
        f.country_code = Some(iso_alpha2);
        f
    }

    pub fn with_subtype(name: impl Into<String>, subtype: Subtype) -> Self {
        Self {
            key: None,
            feature_id: None,
            name: name.into(),
            location: None,
            feature_class: None,
            feature_code: None,
            country_code: None,
            population: None,
            shape: None,
            subtype,
            adm_key: None,
            adm: Association::default(),
            alternate_names: Association::default(),
        }
    }

    /// Re-type this feature, keeping the base record. The store replaces the
    /// old specialization row on the next save.
    pub fn into_subtype(mut self, subtype: Subtype) -> Self {
        self.subtype = subtype;
        self
    }

    // --- builder ---------------------------------------------------------

    pub fn with_feature_id(mut self, feature_id: i64) -> Self {
        self.feature_id = Some(feature_id);
        self
    }

    pub fn at(mut self, lat: f64, lng: f64) -> Self {
        self.location = Some(Point::new(lat, lng));
        self
    }

    pub fn classified(mut self, class: impl Into<String>, code: impl Into<String>) -> Self {
        self.feature_class = Some(class.into());
        self.feature_code = Some(code.into());
        self
    }

    pub fn in_country(mut self, code: impl Into<String>) -> Self {
        self.country_code = Some(code.into());
        self
    }

    pub fn with_population(mut self, population: u32) -> Self {
        self.population = Some(population);
        self
    }

    pub fn with_shape(mut self, shape: Polygon) -> Self {
        self.shape = Some(shape);
        self
    }

    /// Adds an alternate name. Fails with
    /// [`GazetteerError::DetachedAccess`](crate::GazetteerError::DetachedAccess)
    /// when the names of a feature read lazily can no longer be loaded.
    pub fn with_alternate_name(mut self, alternate: AlternateName) -> Result<Self> {
        self.add_alternate_name(alternate)?;
        Ok(self)
    }

    /// Flags a city as municipality. No effect on other kinds.
    pub fn municipality(mut self, municipality: bool) -> Self {
        if let Subtype::City(city) = &mut self.subtype {
            city.municipality = municipality;
        }
        self
    }

    /// Adds a zip code to a city. No effect on other kinds.
    pub fn with_zip_code(mut self, code: impl Into<String>) -> Self {
        if let Subtype::City(city) = &mut self.subtype {
            city.zip_codes.push(ZipCode::new(code));
        }
        self
    }

    pub fn with_adm(mut self, adm: &Feature) -> Self {
        self.set_adm(Some(adm));
        self
    }

    // --- accessors -------------------------------------------------------

    /// Internal id, `None` until saved.
    #[inline]
    pub fn key(&self) -> Option<FeatureKey> {
        self.key
    }

    #[inline]
    pub fn kind(&self) -> FeatureKind {
        self.subtype.kind()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn as_city(&self) -> Option<&CityAttrs> {
        match &self.subtype {
            Subtype::City(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_adm(&self) -> Option<&AdmAttrs> {
        match &self.subtype {
            Subtype::Adm(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_country(&self) -> Option<&CountryAttrs> {
        match &self.subtype {
            Subtype::Country(c) => Some(c),
            _ => None,
        }
    }

    pub fn is_municipality(&self) -> bool {
        self.as_city().is_some_and(|c| c.municipality)
    }

    pub fn zip_codes(&self) -> &[ZipCode] {
        self.as_city().map(|c| c.zip_codes.as_slice()).unwrap_or(&[])
    }

    /// Classification pair, only when both halves are set.
    pub fn classification(&self) -> Option<(&str, &str)> {
        match (&self.feature_class, &self.feature_code) {
            (Some(class), Some(code)) => Some((class, code)),
            _ => None,
        }
    }

    /// Key of the administrative division this feature belongs to. Always
    /// readable; only the division record itself is deferred.
    #[inline]
    pub fn adm_key(&self) -> Option<FeatureKey> {
        self.adm_key
    }

    /// The administrative division record.
    ///
    /// Fails with `DetachedAccess` when this feature came from a non-eager
    /// read and its load scope has been closed since.
    pub fn adm(&self) -> Result<Option<&Feature>> {
        Ok(self.adm.get("adm", self.key)?.as_deref())
    }

    pub fn set_adm(&mut self, adm: Option<&Feature>) {
        self.adm_key = adm.and_then(Feature::key);
        self.adm = Association::loaded(adm.map(|a| Box::new(a.clone())));
    }

    /// Owned alternate names; deferred like [`Feature::adm`].
    pub fn alternate_names(&self) -> Result<&[AlternateName]> {
        Ok(self
            .alternate_names
            .get("alternate_names", self.key)?
            .as_slice())
    }

    pub fn add_alternate_name(&mut self, alternate: AlternateName) -> Result<()> {
        self.alternate_names
            .get_mut("alternate_names", self.key)?
            .push(alternate);
        Ok(())
    }

    pub fn alternate_names_loaded(&self) -> bool {
        self.alternate_names.is_loaded()
    }
}

impl NameMatch for Feature {
    fn name_str(&self) -> &str {
        &self.name
    }
}

impl NameMatch for AlternateName {
    fn name_str(&self) -> &str {
        &self.name
    }
}
