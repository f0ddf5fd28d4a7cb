//! Outline geometry drawn on top of the grid.
//!
//! Accepts GeoJSON `Polygon`/`MultiPolygon` geometries, either bare or
//! wrapped in a `Feature` or `FeatureCollection`. Holes are carried as
//! additional rings of their polygon.

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::bbox::GeoBounds;
use crate::error::{VizError, VizResult};

/// A closed ring of `[lon, lat]` positions.
pub type Ring = Vec<[f64; 2]>;

/// A polygon: the exterior ring followed by any holes.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Polygon {
    pub rings: Vec<Ring>,
}

/// Boundary geometry normalised to a list of polygons.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Boundary {
    pub polygons: Vec<Polygon>,
}

/// Raw GeoJSON position; may carry an altitude we ignore.
type Position = Vec<f64>;

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum PolygonCoords {
    Rings(Vec<Vec<Position>>),
    /// Exterior ring written without the enclosing array
    BareRing(Vec<Position>),
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
enum Geometry {
    Polygon { coordinates: PolygonCoords },
    MultiPolygon { coordinates: Vec<PolygonCoords> },
}

#[derive(Debug, Deserialize)]
struct Feature {
    geometry: Option<Geometry>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
enum GeoJson {
    FeatureCollection { features: Vec<Feature> },
    Feature { geometry: Option<Geometry> },
    Polygon { coordinates: PolygonCoords },
    MultiPolygon { coordinates: Vec<PolygonCoords> },
}

impl Boundary {
    pub fn new(polygons: Vec<Polygon>) -> Self {
        Self { polygons }
    }

    /// A boundary made of one exterior ring.
    pub fn from_ring(ring: Ring) -> Self {
        Self::new(vec![Polygon { rings: vec![ring] }])
    }

    /// Parse a GeoJSON document.
    pub fn from_geojson_str(json: &str) -> VizResult<Self> {
        let doc: GeoJson =
            serde_json::from_str(json).map_err(|e| VizError::Boundary(e.to_string()))?;
        let geometries: Vec<Geometry> = match doc {
            GeoJson::FeatureCollection { features } => {
                features.into_iter().filter_map(|f| f.geometry).collect()
            }
            GeoJson::Feature { geometry } => geometry.into_iter().collect(),
            GeoJson::Polygon { coordinates } => vec![Geometry::Polygon { coordinates }],
            GeoJson::MultiPolygon { coordinates } => vec![Geometry::MultiPolygon { coordinates }],
        };

        let mut polygons = Vec::new();
        for geometry in geometries {
            match geometry {
                Geometry::Polygon { coordinates } => polygons.push(convert_polygon(coordinates)?),
                Geometry::MultiPolygon { coordinates } => {
                    for coords in coordinates {
                        polygons.push(convert_polygon(coords)?);
                    }
                }
            }
        }
        Ok(Self { polygons })
    }

    /// Serialise as a GeoJSON `MultiPolygon` geometry.
    pub fn to_geojson(&self) -> serde_json::Value {
        json!({
            "type": "MultiPolygon",
            "coordinates": self
                .polygons
                .iter()
                .map(|p| &p.rings)
                .collect::<Vec<_>>(),
        })
    }

    pub fn is_empty(&self) -> bool {
        self.polygons.iter().all(|p| p.rings.is_empty())
    }

    /// Every ring of every polygon, exteriors and holes alike.
    pub fn rings(&self) -> impl Iterator<Item = &Ring> {
        self.polygons.iter().flat_map(|p| p.rings.iter())
    }

    /// Extent of all rings.
    pub fn bounds(&self) -> Option<GeoBounds> {
        let (lons, lats): (Vec<f64>, Vec<f64>) =
            self.rings().flatten().map(|[lon, lat]| (*lon, *lat)).unzip();
        GeoBounds::from_coords(&lats, &lons)
    }

    /// Even-odd point-in-polygon test over all rings, so holes are outside.
    pub fn contains(&self, lon: f64, lat: f64) -> bool {
        let mut inside = false;
        for ring in self.rings() {
            if ring.len() < 3 {
                continue;
            }
            let mut j = ring.len() - 1;
            for i in 0..ring.len() {
                let [xi, yi] = ring[i];
                let [xj, yj] = ring[j];
                if (yi > lat) != (yj > lat) && lon < (xj - xi) * (lat - yi) / (yj - yi) + xi {
                    inside = !inside;
                }
                j = i;
            }
        }
        inside
    }
}

fn convert_polygon(coords: PolygonCoords) -> VizResult<Polygon> {
    let raw_rings = match coords {
        PolygonCoords::Rings(rings) => rings,
        PolygonCoords::BareRing(ring) => vec![ring],
    };
    let rings = raw_rings
        .into_iter()
        .map(convert_ring)
        .collect::<VizResult<Vec<_>>>()?;
    Ok(Polygon { rings })
}

fn convert_ring(positions: Vec<Position>) -> VizResult<Ring> {
    positions
        .into_iter()
        .map(|p| match p.as_slice() {
            [lon, lat, ..] if lon.is_finite() && lat.is_finite() => Ok([*lon, *lat]),
            _ => Err(VizError::Boundary(format!("invalid position {:?}", p))),
        })
        .collect()
}
