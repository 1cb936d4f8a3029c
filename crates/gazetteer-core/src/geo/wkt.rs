// crates/gazetteer-core/src/geo/wkt.rs
use super::Point;
use crate::error::{GazetteerError, Result};
use serde::{Deserialize, Serialize};
use std::fmt::Write;
use std::str::FromStr;

/// A polygon shape: one exterior ring plus optional holes.
///
/// Rings are stored as written, closed (first point repeated last).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Polygon {
    pub exterior: Vec<Point>,
    #[serde(default)]
    pub interiors: Vec<Vec<Point>>,
}

impl Polygon {
    pub fn new(exterior: Vec<Point>) -> Self {
        Self {
            exterior,
            interiors: Vec::new(),
        }
    }

    pub fn with_interior(mut self, ring: Vec<Point>) -> Self {
        self.interiors.push(ring);
        self
    }

    fn rings(&self) -> impl Iterator<Item = &[Point]> {
        std::iter::once(self.exterior.as_slice()).chain(self.interiors.iter().map(Vec::as_slice))
    }

    /// Canonical WKT, longitude first, coordinates rounded to `precision`
    /// decimals with trailing zeros trimmed.
    ///
    /// ```rust
    /// use gazetteer_core::geo::{Point, Polygon};
    ///
    /// let square = Polygon::new(vec![
    ///     Point::new(47.5, 5.25),
    ///     Point::new(47.5, 5.5),
    ///     Point::new(47.75, 5.5),
    ///     Point::new(47.5, 5.25),
    /// ]);
    /// assert_eq!(
    ///     square.to_wkt(7),
    ///     "POLYGON((5.25 47.5,5.5 47.5,5.5 47.75,5.25 47.5))"
    /// );
    /// ```
    pub fn to_wkt(&self, precision: usize) -> String {
        let mut out = String::from("POLYGON(");
        for (i, ring) in self.rings().enumerate() {
            if i > 0 {
                out.push(',');
            }
            out.push('(');
            for (j, p) in ring.iter().enumerate() {
                if j > 0 {
                    out.push(',');
                }
                let _ = write!(
                    out,
                    "{} {}",
                    format_coord(p.lng, precision),
                    format_coord(p.lat, precision)
                );
            }
            out.push(')');
        }
        out.push(')');
        out
    }

    /// Parse `POLYGON((x y, ...), (x y, ...))` text. Other geometry types,
    /// `POLYGON EMPTY` and rings shorter than four points are rejected.
    pub fn from_wkt(text: &str) -> Result<Self> {
        let text = text.trim();
        let parsed = wkt::Wkt::<f64>::from_str(text)
            .map_err(|e| invalid(format!("malformed WKT `{text}`: {e}")))?;
        let geometry: geo_types::Geometry<f64> = parsed
            .try_into()
            .map_err(|e: wkt::conversion::Error| invalid(format!("unsupported WKT: {e:?}")))?;
        match geometry {
            geo_types::Geometry::Polygon(polygon) => Self::try_from(polygon),
            _ => Err(invalid(format!("not a POLYGON: {text}"))),
        }
    }
}

impl TryFrom<geo_types::Polygon<f64>> for Polygon {
    type Error = GazetteerError;

    fn try_from(polygon: geo_types::Polygon<f64>) -> Result<Self> {
        let (exterior, interiors) = polygon.into_inner();
        Ok(Self {
            exterior: ring(&exterior)?,
            interiors: interiors.iter().map(ring).collect::<Result<_>>()?,
        })
    }
}

/// WKT coordinates are `x y`, that is longitude first.
fn ring(line: &geo_types::LineString<f64>) -> Result<Vec<Point>> {
    let points: Vec<Point> = line.coords().map(|c| Point::new(c.y, c.x)).collect();
    if points.len() < 4 {
        return Err(invalid(format!(
            "ring needs at least 4 points, got {}",
            points.len()
        )));
    }
    Ok(points)
}

fn invalid(msg: String) -> GazetteerError {
    GazetteerError::InvalidData(msg)
}

/// Fixed-precision decimal without trailing zeros (`5.2480000` -> `5.248`).
pub(crate) fn format_coord(v: f64, precision: usize) -> String {
    let mut s = format!("{v:.precision$}");
    if s.contains('.') {
        let keep = s.trim_end_matches('0').trim_end_matches('.').len();
        s.truncate(keep);
    }
    if s == "-0" {
        s = "0".to_string();
    }
    s
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ring() -> Vec<Point> {
        vec![
            Point::new(47.5573912, 5.2492876),
            Point::new(47.556832, 5.2487588),
            Point::new(47.5567717, 5.2488413),
            Point::new(47.5573912, 5.2492876),
        ]
    }

    #[test]
    fn writes_fixed_precision_trimmed() {
        let wkt = Polygon::new(ring()).to_wkt(7);
        assert_eq!(
            wkt,
            "POLYGON((5.2492876 47.5573912,5.2487588 47.556832,5.2488413 47.5567717,5.2492876 47.5573912))"
        );
    }

    #[test]
    fn rounds_to_precision() {
        assert_eq!(format_coord(1.123456789, 3), "1.123");
        assert_eq!(format_coord(2.0, 7), "2");
        assert_eq!(format_coord(-0.00000001, 3), "0");
    }

    #[test]
    fn reads_back_what_it_writes() {
        let poly = Polygon::new(ring()).with_interior(vec![
            Point::new(47.557, 5.2489),
            Point::new(47.5569, 5.2489),
            Point::new(47.5569, 5.249),
            Point::new(47.557, 5.2489),
        ]);
        let parsed = Polygon::from_wkt(&poly.to_wkt(7)).expect("valid wkt");
        assert_eq!(parsed, poly);
    }

    #[test]
    fn accepts_loose_spacing_and_case() {
        let parsed = Polygon::from_wkt("polygon (( 1 2, 3 4 ,5 6, 1 2 ))").expect("valid wkt");
        assert_eq!(parsed.exterior[1], Point::new(4.0, 3.0));
    }

    #[test]
    fn rejects_other_geometries() {
        assert!(Polygon::from_wkt("POINT(1 2)").is_err());
        assert!(Polygon::from_wkt("POLYGON((1 2,3 4))").is_err());
        assert!(Polygon::from_wkt("POLYGON((1 2,3 4,5 6,1 2)").is_err());
        assert!(Polygon::from_wkt("POLYGON EMPTY").is_err());
        assert!(Polygon::from_wkt("not wkt at all").is_err());
    }

    #[test]
    fn open_rings_are_closed() {
        let parsed = Polygon::from_wkt("POLYGON((0 0,1 0,1 1,0 1))").expect("valid wkt");
        assert_eq!(parsed.exterior.len(), 5);
        assert_eq!(parsed.exterior.first(), parsed.exterior.last());
    }
}
