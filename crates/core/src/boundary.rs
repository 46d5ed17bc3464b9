//! Region outline drawn under the fire markers.

use geojson::{GeoJson, Geometry, Value};

use crate::error::BoundaryError;

/// Longitude/latitude box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min_lon: f64,
    pub min_lat: f64,
    pub max_lon: f64,
    pub max_lat: f64,
}

impl Bounds {
    /// Smallest box around the points, `None` for an empty iterator.
    pub fn around<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = (f64, f64)>,
    {
        points.into_iter().fold(None, |bounds, (lon, lat)| {
            Some(match bounds {
                None => Self {
                    min_lon: lon,
                    min_lat: lat,
                    max_lon: lon,
                    max_lat: lat,
                },
                Some(b) => Self {
                    min_lon: b.min_lon.min(lon),
                    min_lat: b.min_lat.min(lat),
                    max_lon: b.max_lon.max(lon),
                    max_lat: b.max_lat.max(lat),
                },
            })
        })
    }

    /// A box of `span` degrees on each side of a centre point.
    pub fn centred(lon: f64, lat: f64, span: f64) -> Self {
        Self {
            min_lon: lon - span,
            min_lat: lat - span,
            max_lon: lon + span,
            max_lat: lat + span,
        }
    }

    #[must_use]
    pub fn padded(self, degrees: f64) -> Self {
        Self {
            min_lon: self.min_lon - degrees,
            min_lat: self.min_lat - degrees,
            max_lon: self.max_lon + degrees,
            max_lat: self.max_lat + degrees,
        }
    }

    pub fn contains(&self, lon: f64, lat: f64) -> bool {
        (self.min_lon..=self.max_lon).contains(&lon) && (self.min_lat..=self.max_lat).contains(&lat)
    }
}

/// Polyline rings in `(lon, lat)` order, parsed once from GeoJSON.
#[derive(Debug, Clone, PartialEq)]
pub struct Boundary {
    rings: Vec<Vec<(f64, f64)>>,
    bounds: Bounds,
}

impl Boundary {
    pub fn from_geojson_str(text: &str) -> Result<Self, BoundaryError> {
        let geojson: GeoJson = text.parse()?;
        let mut rings = Vec::new();
        collect_rings(&geojson, &mut rings);
        rings.retain(|ring| ring.len() >= 2);

        let bounds = Bounds::around(rings.iter().flatten().copied()).ok_or(BoundaryError::Empty)?;
        Ok(Self { rings, bounds })
    }

    pub fn rings(&self) -> &[Vec<(f64, f64)>] {
        &self.rings
    }

    pub const fn bounds(&self) -> Bounds {
        self.bounds
    }

    /// Consecutive point pairs of every ring.
    pub fn segments(&self) -> impl Iterator<Item = ((f64, f64), (f64, f64))> + '_ {
        self.rings
            .iter()
            .flat_map(|ring| ring.windows(2).map(|pair| (pair[0], pair[1])))
    }
}

fn collect_rings(geojson: &GeoJson, rings: &mut Vec<Vec<(f64, f64)>>) {
    match geojson {
        GeoJson::FeatureCollection(collection) => {
            for feature in &collection.features {
                if let Some(geometry) = &feature.geometry {
                    collect_geometry(geometry, rings);
                }
            }
        }
        GeoJson::Feature(feature) => {
            if let Some(geometry) = &feature.geometry {
                collect_geometry(geometry, rings);
            }
        }
        GeoJson::Geometry(geometry) => collect_geometry(geometry, rings),
    }
}

fn collect_geometry(geometry: &Geometry, rings: &mut Vec<Vec<(f64, f64)>>) {
    match &geometry.value {
        Value::LineString(line) => rings.push(to_ring(line)),
        Value::MultiLineString(lines) => rings.extend(lines.iter().map(|line| to_ring(line))),
        Value::Polygon(polygon) => rings.extend(polygon.iter().map(|ring| to_ring(ring))),
        Value::MultiPolygon(polygons) => {
            for polygon in polygons {
                rings.extend(polygon.iter().map(|ring| to_ring(ring)));
            }
        }
        Value::GeometryCollection(geometries) => {
            for inner in geometries {
                collect_geometry(inner, rings);
            }
        }
        Value::Point(_) | Value::MultiPoint(_) => {}
    }
}

fn to_ring(positions: &[Vec<f64>]) -> Vec<(f64, f64)> {
    positions
        .iter()
        .filter_map(|position| Some((*position.first()?, *position.get(1)?)))
        .collect()
}
