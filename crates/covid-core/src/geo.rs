// File: crates/covid-core/src/geo.rs
// Summary: GeoJSON country boundaries and the Natural Earth I projection to screen space.

use std::path::Path;

use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::{info, warn};

use crate::error::{ChartError, Result};
use crate::geometry::{point_in_ring, RectF};

type Position = Vec<f64>;

#[derive(Debug, Deserialize)]
struct FeatureCollection {
    features: Vec<Feature>,
}

#[derive(Debug, Deserialize)]
struct Feature {
    #[serde(default)]
    id: Option<Value>,
    #[serde(default)]
    properties: Option<Map<String, Value>>,
    #[serde(default)]
    geometry: Option<Geometry>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
enum Geometry {
    Polygon { coordinates: Vec<Vec<Position>> },
    MultiPolygon { coordinates: Vec<Vec<Vec<Position>>> },
    #[serde(other)]
    Unsupported,
}

/// Ring of (longitude, latitude) degrees.
pub type Ring = Vec<(f64, f64)>;

/// One boundary feature keyed by ISO code.
#[derive(Clone, Debug, PartialEq)]
pub struct Country {
    pub iso: String,
    pub name: String,
    /// Polygons, each an outer ring followed by holes.
    pub polygons: Vec<Vec<Ring>>,
}

impl Country {
    /// Display name, falling back to the code.
    pub fn label(&self) -> &str {
        if self.name.is_empty() { &self.iso } else { &self.name }
    }
}

fn value_to_code(v: &Value) -> Option<String> {
    match v {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn ring_from(positions: Vec<Position>) -> Ring {
    positions
        .into_iter()
        .filter_map(|p| match p.as_slice() {
            [lon, lat, ..] if lon.is_finite() && lat.is_finite() => Some((*lon, *lat)),
            _ => None,
        })
        .collect()
}

/// Parse a GeoJSON FeatureCollection. Features without a usable id or
/// with non-areal geometry are skipped.
pub fn parse_countries(json: &str) -> Result<Vec<Country>> {
    let fc: FeatureCollection = serde_json::from_str(json)?;
    let mut out = Vec::with_capacity(fc.features.len());
    let mut skipped = 0usize;
    for f in fc.features {
        let props = f.properties.unwrap_or_default();
        let iso = f
            .id
            .as_ref()
            .and_then(value_to_code)
            .or_else(|| props.get("iso_a3").or_else(|| props.get("ISO_A3")).and_then(value_to_code));
        let polygons = match f.geometry {
            Some(Geometry::Polygon { coordinates }) => {
                vec![coordinates.into_iter().map(ring_from).collect()]
            }
            Some(Geometry::MultiPolygon { coordinates }) => coordinates
                .into_iter()
                .map(|poly| poly.into_iter().map(ring_from).collect())
                .collect(),
            Some(Geometry::Unsupported) | None => Vec::new(),
        };
        match iso {
            Some(iso) if !polygons.is_empty() => {
                let name = props
                    .get("name")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_owned();
                out.push(Country { iso, name, polygons });
            }
            _ => skipped += 1,
        }
    }
    if skipped > 0 {
        warn!(skipped, "features without id or polygon geometry were skipped");
    }
    Ok(out)
}

/// Read and parse a GeoJSON file.
pub fn load_countries(path: impl AsRef<Path>) -> Result<Vec<Country>> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|source| ChartError::DataLoad {
        path: path.to_path_buf(),
        source,
    })?;
    let countries = parse_countries(&text)?;
    info!(path = %path.display(), features = countries.len(), "loaded boundaries");
    Ok(countries)
}

/// Natural Earth I pseudo-cylindrical projection with scale and translation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NaturalEarth {
    pub scale: f64,
    pub translate: (f64, f64),
}

impl NaturalEarth {
    pub fn new(scale: f64, translate: (f64, f64)) -> Self {
        Self { scale, translate }
    }

    /// Centered on a `width` x `height` surface.
    pub fn centered(scale: f64, width: i32, height: i32) -> Self {
        Self::new(scale, (width as f64 / 2.0, height as f64 / 2.0))
    }

    /// Unit projection of radians (polynomial approximation by Šavrič et al.).
    pub fn raw(lambda: f64, phi: f64) -> (f64, f64) {
        let phi2 = phi * phi;
        let phi4 = phi2 * phi2;
        let x = lambda
            * (0.8707 - 0.131979 * phi2
                + phi4 * (-0.013791 + phi4 * (0.003971 * phi2 - 0.001529 * phi4)));
        let y = phi
            * (1.007226 + phi2 * (0.015085 + phi4 * (-0.044475 + 0.028874 * phi2 - 0.005916 * phi4)));
        (x, y)
    }

    /// Longitude/latitude degrees to screen pixels (y grows downwards).
    pub fn project(&self, lon: f64, lat: f64) -> (f32, f32) {
        let (x, y) = Self::raw(lon.to_radians(), lat.clamp(-90.0, 90.0).to_radians());
        (
            (self.translate.0 + x * self.scale) as f32,
            (self.translate.1 - y * self.scale) as f32,
        )
    }
}

/// A country's rings in screen space.
#[derive(Clone, Debug)]
pub struct ProjectedCountry {
    pub iso: String,
    pub name: String,
    pub rings: Vec<Vec<(f32, f32)>>,
    pub bounds: Option<RectF>,
}

impl ProjectedCountry {
    pub fn project(country: &Country, projection: &NaturalEarth) -> Self {
        let rings = country
            .polygons
            .iter()
            .flatten()
            .map(|ring| ring.iter().map(|&(lon, lat)| projection.project(lon, lat)).collect::<Vec<_>>())
            .filter(|r| r.len() >= 3)
            .collect::<Vec<_>>();
        let bounds = RectF::bounding(rings.iter().flatten().copied());
        Self { iso: country.iso.clone(), name: country.label().to_owned(), rings, bounds }
    }

    /// Even-odd containment across all rings, so holes are excluded.
    pub fn contains(&self, x: f32, y: f32) -> bool {
        match self.bounds {
            Some(b) if b.contains_closed(x, y) => {
                self.rings.iter().filter(|r| point_in_ring(x, y, r)).count() % 2 == 1
            }
            _ => false,
        }
    }
}
