//! Coastline geometry: a coarse built-in world outline or GeoJSON.
//!
//! Land polygons double as the land mask of the background, so a GeoJSON
//! file made only of line strings draws coastlines over an all-ocean
//! background.

use std::fs;
use std::path::Path;

use serde_json::Value;
use tracing::{debug, info};

use crate::error::{RenderError, RenderResult};

type Ring = &'static [(f64, f64)];

const NORTH_AMERICA: Ring = &[
    (-168.0, 66.0), (-162.0, 70.0), (-156.0, 71.3), (-140.0, 69.6), (-128.0, 70.0),
    (-115.0, 68.5), (-95.0, 68.0), (-85.0, 69.5), (-82.0, 66.0), (-88.0, 64.0),
    (-94.0, 59.0), (-92.0, 57.0), (-82.0, 55.0), (-79.0, 51.5), (-77.0, 60.0),
    (-78.0, 62.5), (-73.0, 62.0), (-65.0, 60.0), (-61.0, 56.0), (-56.0, 52.0),
    (-60.0, 47.0), (-66.0, 45.0), (-70.0, 43.5), (-70.0, 41.5), (-74.0, 40.5),
    (-76.0, 37.0), (-75.5, 35.0), (-81.0, 31.5), (-80.0, 27.0), (-80.5, 25.2),
    (-82.7, 28.0), (-84.0, 30.0), (-89.0, 30.3), (-94.0, 29.6), (-97.4, 27.5),
    (-97.7, 22.0), (-95.0, 18.6), (-91.0, 19.0), (-90.3, 21.0), (-87.0, 21.5),
    (-88.2, 16.0), (-83.3, 15.0), (-83.5, 11.0), (-79.5, 9.0), (-77.4, 8.5),
    (-80.0, 7.3), (-85.7, 10.0), (-87.5, 13.0), (-92.0, 14.5), (-96.5, 15.7),
    (-101.0, 17.5), (-105.5, 20.0), (-105.0, 23.0), (-109.0, 25.5), (-112.7, 31.5),
    (-114.7, 30.0), (-109.9, 22.9), (-112.0, 24.8), (-115.7, 30.0), (-117.1, 32.5),
    (-120.6, 34.5), (-122.5, 37.5), (-124.3, 40.3), (-124.0, 46.0), (-124.7, 48.4),
    (-127.5, 50.5), (-130.5, 54.5), (-135.0, 58.0), (-140.0, 59.7), (-146.0, 60.5),
    (-152.0, 59.0), (-158.0, 57.0), (-164.0, 54.8), (-158.0, 58.5), (-162.0, 60.0),
    (-165.2, 62.5), (-164.5, 64.5),
];

const SOUTH_AMERICA: Ring = &[
    (-77.4, 8.5), (-72.0, 12.0), (-67.0, 10.7), (-61.5, 10.5), (-57.0, 6.0),
    (-52.0, 4.5), (-50.0, 1.8), (-48.5, -1.0), (-44.0, -2.5), (-38.5, -4.0),
    (-35.0, -5.5), (-35.0, -9.0), (-39.0, -14.0), (-39.0, -18.0), (-41.0, -22.0),
    (-45.0, -23.5), (-48.5, -26.0), (-48.7, -28.5), (-52.0, -32.0), (-54.0, -34.8),
    (-58.0, -34.5), (-57.0, -37.0), (-62.0, -39.0), (-65.0, -41.0), (-63.5, -42.5),
    (-65.0, -45.0), (-67.5, -46.5), (-65.7, -47.5), (-69.0, -51.0), (-68.5, -52.5),
    (-71.0, -54.0), (-74.5, -52.0), (-75.5, -48.0), (-74.0, -43.0), (-73.7, -37.0),
    (-71.5, -32.0), (-71.3, -25.0), (-70.3, -18.5), (-75.0, -15.5), (-77.0, -12.0),
    (-79.5, -7.0), (-81.3, -5.0), (-80.0, -2.0), (-80.5, 1.0), (-78.5, 2.0),
    (-77.5, 7.0),
];

const EURASIA: Ring = &[
    (-5.6, 36.0), (-9.0, 37.0), (-9.5, 39.0), (-8.8, 42.5), (-8.0, 43.7),
    (-1.5, 43.4), (-1.2, 46.0), (-4.5, 47.8), (-1.5, 48.7), (1.5, 50.0),
    (4.0, 51.4), (5.0, 53.2), (8.6, 53.9), (8.3, 55.5), (8.6, 57.1),
    (10.5, 57.7), (10.7, 56.0), (12.5, 54.4), (14.3, 53.9), (18.5, 54.8),
    (21.0, 56.8), (23.5, 59.3), (29.8, 60.0), (23.0, 60.5), (21.3, 63.0),
    (25.3, 65.0), (22.0, 65.8), (17.5, 62.5), (18.8, 60.0), (16.5, 56.5),
    (13.0, 55.4), (11.0, 59.0), (8.0, 58.0), (5.5, 59.0), (5.0, 62.0),
    (10.0, 64.0), (14.5, 67.8), (19.0, 70.0), (25.8, 71.1), (31.0, 70.3),
    (41.0, 66.9), (33.0, 66.5), (40.0, 64.6), (44.0, 68.5), (53.0, 68.2),
    (58.0, 68.8), (68.5, 68.2), (73.0, 71.5), (80.0, 72.6), (87.0, 74.5),
    (100.0, 76.4), (113.0, 73.6), (128.0, 72.9), (140.0, 72.5), (150.0, 71.5),
    (160.0, 70.7), (170.0, 69.9), (180.0, 68.9), (180.0, 65.0), (177.0, 62.5),
    (170.0, 60.0), (163.5, 59.8), (162.0, 57.8), (156.7, 51.0), (156.0, 57.0),
    (155.0, 59.2), (151.0, 59.1), (143.0, 59.3), (137.0, 54.0), (141.4, 52.2),
    (140.3, 48.3), (135.0, 43.4), (130.7, 42.3), (129.4, 37.0), (126.5, 34.5),
    (126.1, 37.7), (124.7, 39.6), (121.6, 40.9), (122.3, 39.0), (117.7, 38.4),
    (119.2, 34.8), (121.9, 31.0), (121.5, 28.0), (119.5, 25.5), (114.2, 22.3),
    (110.5, 21.2), (109.7, 18.2), (108.7, 21.6), (106.7, 20.7), (105.7, 18.8),
    (108.9, 15.0), (109.3, 11.5), (105.0, 8.6), (104.8, 10.5), (100.9, 12.7),
    (100.3, 9.0), (103.4, 4.0), (104.2, 1.4), (101.3, 2.9), (98.3, 8.0),
    (98.7, 10.5), (97.7, 16.5), (94.3, 16.0), (94.3, 18.5), (92.3, 21.0),
    (90.0, 22.0), (86.9, 21.5), (85.0, 19.5), (80.3, 15.8), (80.3, 13.0),
    (79.9, 10.3), (77.5, 8.0), (76.5, 8.9), (74.9, 12.8), (72.8, 19.0),
    (72.6, 21.4), (70.5, 20.9), (68.8, 22.5), (66.7, 25.4), (61.6, 25.2),
    (57.4, 25.7), (56.4, 27.1), (52.0, 27.8), (50.1, 30.1), (48.0, 30.0),
    (48.8, 27.6), (50.8, 24.8), (51.6, 24.2), (54.0, 24.1), (56.4, 26.4),
    (56.5, 24.5), (59.8, 22.5), (57.8, 19.0), (55.3, 17.2), (52.2, 15.6),
    (45.0, 12.9), (43.5, 12.6), (42.6, 16.5), (39.2, 21.5), (38.5, 23.6),
    (35.0, 28.1), (34.2, 31.3), (35.5, 33.9), (36.0, 36.0), (32.5, 36.1),
    (29.7, 36.1), (27.0, 37.5), (26.3, 39.4), (26.0, 40.8), (23.0, 40.3),
    (22.6, 38.0), (21.0, 37.0), (21.1, 38.8), (19.4, 41.8), (18.5, 42.5),
    (15.2, 44.2), (13.7, 45.6), (12.3, 45.2), (13.6, 43.5), (16.0, 41.4),
    (18.5, 40.1), (16.5, 38.5), (15.7, 38.0), (15.9, 40.0), (12.5, 41.8),
    (10.5, 42.9), (8.8, 44.4), (6.5, 43.1), (3.2, 43.2), (3.1, 41.9),
    (0.9, 41.0), (-0.3, 39.4), (0.2, 38.7), (-2.1, 36.7),
];

const AFRICA: Ring = &[
    (32.3, 31.3), (29.0, 30.9), (25.0, 31.6), (20.0, 31.0), (19.5, 30.3),
    (15.5, 31.5), (11.5, 33.1), (10.1, 34.3), (11.0, 36.9), (9.5, 37.3),
    (3.0, 36.8), (-1.0, 35.5), (-5.9, 35.8), (-9.8, 32.5), (-9.7, 30.0),
    (-13.0, 27.7), (-16.3, 22.0), (-17.0, 20.9), (-16.5, 16.0), (-17.4, 14.7),
    (-16.7, 12.4), (-15.0, 10.8), (-13.2, 8.9), (-11.4, 6.8), (-7.6, 4.4),
    (-3.0, 5.1), (1.3, 6.1), (4.3, 6.3), (6.0, 4.3), (8.5, 4.5),
    (9.7, 3.0), (9.4, 0.5), (8.8, -1.0), (11.8, -3.7), (12.3, -6.1),
    (13.3, -9.0), (13.7, -12.0), (11.8, -16.7), (12.8, -19.6), (14.5, -22.9),
    (15.2, -27.1), (16.5, -28.6), (18.2, -31.7), (18.4, -34.1), (20.0, -34.8),
    (25.8, -34.0), (30.1, -31.1), (32.6, -26.7), (32.9, -25.9), (35.4, -24.1),
    (35.3, -21.3), (34.7, -19.8), (36.9, -17.3), (40.5, -15.3), (40.5, -10.5),
    (39.3, -8.0), (39.3, -4.7), (41.6, -1.7), (43.6, 1.6), (47.8, 4.3),
    (51.0, 10.4), (51.3, 11.8), (48.7, 11.3), (44.5, 10.4), (43.2, 11.9),
    (42.5, 12.8), (39.3, 15.9), (37.5, 18.6), (37.0, 21.0), (35.6, 23.9),
    (34.0, 26.3), (32.6, 29.9),
];

const AUSTRALIA: Ring = &[
    (113.6, -22.0), (114.1, -26.3), (115.0, -30.0), (115.0, -33.6), (117.9, -35.1),
    (122.0, -33.9), (126.0, -32.3), (131.3, -31.5), (134.3, -32.6), (137.8, -35.7),
    (139.6, -37.4), (140.6, -38.0), (144.0, -38.4), (146.3, -39.0), (150.0, -37.5),
    (153.1, -30.9), (153.1, -25.2), (150.9, -22.3), (146.4, -19.0), (145.4, -15.0),
    (142.5, -10.7), (141.7, -13.5), (140.9, -17.4), (139.3, -17.4), (135.5, -15.0),
    (136.9, -12.2), (132.5, -11.6), (130.2, -13.1), (127.8, -14.3), (125.7, -14.2),
    (122.2, -17.2), (121.2, -19.5), (117.4, -20.7),
];

const GREENLAND: Ring = &[
    (-73.0, 78.5), (-66.0, 80.3), (-59.0, 82.1), (-44.0, 83.2), (-25.0, 83.3),
    (-18.0, 81.5), (-12.0, 81.5), (-20.0, 78.0), (-18.5, 76.0), (-22.0, 72.5),
    (-22.5, 70.2), (-26.0, 68.5), (-32.7, 68.2), (-40.0, 65.0), (-43.3, 60.0),
    (-48.0, 60.8), (-51.5, 64.0), (-53.5, 66.3), (-54.2, 69.3), (-51.0, 70.5),
    (-55.5, 71.8), (-58.5, 75.5), (-66.4, 76.0),
];

/// Closed through the south pole so the ring contains the pole itself.
const ANTARCTICA: Ring = &[
    (-180.0, -78.0), (-160.0, -77.0), (-150.0, -76.0), (-135.0, -74.0), (-120.0, -73.5),
    (-100.0, -73.0), (-80.0, -73.0), (-70.0, -70.0), (-60.0, -64.0), (-57.0, -63.5),
    (-62.0, -70.0), (-60.0, -75.0), (-45.0, -78.0), (-30.0, -77.0), (-20.0, -73.0),
    (-10.0, -71.0), (0.0, -70.0), (20.0, -70.0), (40.0, -69.0), (55.0, -66.5),
    (70.0, -68.0), (75.0, -69.5), (85.0, -66.5), (100.0, -66.0), (120.0, -66.5),
    (140.0, -66.5), (160.0, -70.0), (170.0, -71.5), (180.0, -78.0), (180.0, -90.0),
    (-180.0, -90.0),
];

const GREAT_BRITAIN: Ring = &[
    (-5.7, 50.0), (1.4, 51.2), (1.7, 52.7), (0.2, 53.5), (-1.6, 55.6),
    (-2.0, 57.7), (-3.3, 58.6), (-5.0, 58.6), (-6.2, 56.8), (-5.0, 55.0),
    (-3.0, 54.2), (-4.5, 53.3), (-4.5, 52.3), (-5.2, 51.7), (-3.0, 51.4),
];

const IRELAND: Ring = &[
    (-6.0, 52.2), (-6.2, 53.9), (-5.6, 54.7), (-7.3, 55.3), (-8.4, 54.6),
    (-10.0, 53.6), (-9.9, 52.0), (-8.2, 51.6),
];

const ICELAND: Ring = &[
    (-22.0, 63.9), (-18.7, 63.4), (-14.5, 64.4), (-13.6, 65.1), (-14.9, 66.4),
    (-17.8, 66.0), (-21.0, 65.7), (-24.3, 65.6), (-22.0, 64.5),
];

const JAPAN: Ring = &[
    (130.2, 31.3), (131.6, 31.5), (132.0, 33.8), (135.1, 33.8), (136.9, 34.5),
    (138.8, 34.6), (140.9, 35.7), (141.0, 38.3), (141.9, 39.8), (141.5, 41.4),
    (143.3, 42.0), (145.5, 43.3), (141.6, 45.4), (140.0, 43.5), (140.0, 41.4),
    (139.9, 40.0), (139.2, 38.0), (136.8, 37.1), (135.4, 35.6), (132.6, 35.4),
    (130.9, 34.0), (129.6, 33.3),
];

const MADAGASCAR: Ring = &[
    (49.3, -12.0), (50.5, -15.4), (49.4, -17.7), (47.1, -24.9), (45.2, -25.5),
    (43.7, -22.6), (44.4, -16.7), (46.3, -15.7), (48.0, -13.6),
];

const BORNEO: Ring = &[
    (109.0, 1.5), (110.5, -2.9), (114.6, -3.6), (116.1, -4.0), (116.5, -1.2),
    (117.9, 1.1), (119.0, 5.0), (117.1, 6.9), (115.4, 5.2), (113.9, 4.2),
    (111.0, 1.9),
];

const SUMATRA: Ring = &[
    (95.3, 5.6), (97.5, 5.2), (100.4, 2.2), (103.7, -1.0), (106.0, -3.0),
    (105.9, -5.8), (104.5, -5.9), (102.3, -4.0), (100.1, -0.5), (98.6, 1.8),
];

const NEW_ZEALAND_NORTH: Ring = &[
    (172.7, -34.4), (174.5, -35.8), (175.9, -37.6), (178.5, -37.7), (177.9, -39.2),
    (176.8, -40.3), (175.2, -41.6), (174.7, -41.3), (174.7, -39.8), (173.8, -39.2),
    (174.6, -37.0),
];

const NEW_ZEALAND_SOUTH: Ring = &[
    (172.8, -40.5), (174.3, -41.7), (173.0, -43.8), (171.2, -44.5), (170.6, -45.9),
    (169.3, -46.6), (166.5, -46.0), (166.7, -45.3), (168.3, -44.1), (171.5, -41.8),
];

const BUILTIN_LAND: [Ring; 16] = [
    NORTH_AMERICA,
    SOUTH_AMERICA,
    EURASIA,
    AFRICA,
    AUSTRALIA,
    GREENLAND,
    ANTARCTICA,
    GREAT_BRITAIN,
    IRELAND,
    ICELAND,
    JAPAN,
    MADAGASCAR,
    BORNEO,
    SUMATRA,
    NEW_ZEALAND_NORTH,
    NEW_ZEALAND_SOUTH,
];

/// A land polygon with its bounding box for quick rejection.
#[derive(Debug, Clone)]
struct LandPolygon {
    ring: Vec<(f64, f64)>,
    bbox: (f64, f64, f64, f64),
}

impl LandPolygon {
    fn new(ring: Vec<(f64, f64)>) -> Option<Self> {
        if ring.len() < 3 {
            return None;
        }
        let bbox = ring.iter().fold(
            (f64::INFINITY, f64::NEG_INFINITY, f64::INFINITY, f64::NEG_INFINITY),
            |(x0, x1, y0, y1), &(x, y)| (x0.min(x), x1.max(x), y0.min(y), y1.max(y)),
        );
        Some(Self { ring, bbox })
    }

    fn contains(&self, lon: f64, lat: f64) -> bool {
        let (x0, x1, y0, y1) = self.bbox;
        lon >= x0 && lon <= x1 && lat >= y0 && lat <= y1 && point_in_polygon(&self.ring, lon, lat)
    }
}

/// Coastline polylines and land polygons in geographic degrees.
#[derive(Debug, Clone)]
pub struct Coastlines {
    lines: Vec<Vec<(f64, f64)>>,
    land: Vec<LandPolygon>,
}

impl Default for Coastlines {
    fn default() -> Self {
        Self::builtin()
    }
}

impl Coastlines {
    /// The coarse outline compiled into the binary.
    pub fn builtin() -> Self {
        let mut lines = Vec::new();
        let mut land = Vec::new();
        for ring in BUILTIN_LAND {
            lines.extend(outline_of(ring));
            land.extend(LandPolygon::new(ring.to_vec()));
        }
        Self { lines, land }
    }

    /// Parse a GeoJSON FeatureCollection, Feature or bare geometry.
    ///
    /// LineString and MultiLineString become coastlines; the outer rings of
    /// Polygon and MultiPolygon become both coastlines and land.
    pub fn from_geojson(text: &str) -> RenderResult<Self> {
        let root: Value = serde_json::from_str(text)?;
        let mut coast = Self {
            lines: Vec::new(),
            land: Vec::new(),
        };
        coast.add_object(&root)?;
        if coast.lines.is_empty() {
            return Err(RenderError::InvalidGeoJson(
                "no line or polygon geometry found".to_string(),
            ));
        }
        debug!(
            lines = coast.lines.len(),
            land = coast.land.len(),
            "Parsed GeoJSON coastlines"
        );
        Ok(coast)
    }

    /// Load GeoJSON coastlines from a file.
    pub fn load(path: &Path) -> RenderResult<Self> {
        info!(path = %path.display(), "Loading coastlines");
        let text = fs::read_to_string(path)?;
        Self::from_geojson(&text)
    }

    pub fn lines(&self) -> &[Vec<(f64, f64)>] {
        &self.lines
    }

    pub fn land_count(&self) -> usize {
        self.land.len()
    }

    /// Whether a point lies on land.
    pub fn is_land(&self, lon: f64, lat: f64) -> bool {
        self.land.iter().any(|poly| poly.contains(lon, lat))
    }

    fn add_object(&mut self, value: &Value) -> RenderResult<()> {
        let kind = value
            .get("type")
            .and_then(Value::as_str)
            .ok_or_else(|| RenderError::InvalidGeoJson("object without \"type\"".to_string()))?;
        match kind {
            "FeatureCollection" => {
                let features = value
                    .get("features")
                    .and_then(Value::as_array)
                    .ok_or_else(|| RenderError::InvalidGeoJson("missing \"features\"".to_string()))?;
                for feature in features {
                    self.add_object(feature)?;
                }
            }
            "Feature" => {
                // Null geometry is allowed by GeoJSON
                if let Some(geometry) = value.get("geometry").filter(|g| !g.is_null()) {
                    self.add_object(geometry)?;
                }
            }
            "GeometryCollection" => {
                if let Some(geometries) = value.get("geometries").and_then(Value::as_array) {
                    for geometry in geometries {
                        self.add_object(geometry)?;
                    }
                }
            }
            "LineString" => self.lines.push(positions(coordinates(value)?)?),
            "MultiLineString" => {
                for line in as_array(coordinates(value)?)? {
                    self.lines.push(positions(line)?);
                }
            }
            "Polygon" => self.add_polygon(coordinates(value)?)?,
            "MultiPolygon" => {
                for polygon in as_array(coordinates(value)?)? {
                    self.add_polygon(polygon)?;
                }
            }
            // Points carry no outline
            "Point" | "MultiPoint" => {}
            other => {
                return Err(RenderError::InvalidGeoJson(format!(
                    "unsupported type \"{}\"",
                    other
                )))
            }
        }
        Ok(())
    }

    fn add_polygon(&mut self, rings: &Value) -> RenderResult<()> {
        let rings = as_array(rings)?;
        for (i, ring) in rings.iter().enumerate() {
            let ring = positions(ring)?;
            self.lines.push(ring.clone());
            if i == 0 {
                self.land.extend(LandPolygon::new(ring));
            }
        }
        Ok(())
    }
}

/// Coastline parts of a built-in ring, leaving out the edges that only
/// close it along the map border (antimeridian and pole).
fn outline_of(ring: &[(f64, f64)]) -> Vec<Vec<(f64, f64)>> {
    let on_border = |a: (f64, f64), b: (f64, f64)| {
        (a.0.abs() == 180.0 && b.0.abs() == 180.0) || (a.1 == -90.0 && b.1 == -90.0)
    };
    let mut parts = Vec::new();
    let mut current: Vec<(f64, f64)> = Vec::new();
    for i in 0..ring.len() {
        let a = ring[i];
        let b = ring[(i + 1) % ring.len()];
        if on_border(a, b) {
            if current.len() >= 2 {
                parts.push(std::mem::take(&mut current));
            }
            current.clear();
            continue;
        }
        if current.is_empty() {
            current.push(a);
        }
        current.push(b);
    }
    if current.len() >= 2 {
        parts.push(current);
    }
    parts
}

fn coordinates(value: &Value) -> RenderResult<&Value> {
    value
        .get("coordinates")
        .ok_or_else(|| RenderError::InvalidGeoJson("geometry without \"coordinates\"".to_string()))
}

fn as_array(value: &Value) -> RenderResult<&Vec<Value>> {
    value
        .as_array()
        .ok_or_else(|| RenderError::InvalidGeoJson("expected an array".to_string()))
}

fn positions(value: &Value) -> RenderResult<Vec<(f64, f64)>> {
    as_array(value)?
        .iter()
        .map(|pos| {
            let lon = pos.get(0).and_then(Value::as_f64);
            let lat = pos.get(1).and_then(Value::as_f64);
            match (lon, lat) {
                (Some(lon), Some(lat)) => Ok((lon, lat)),
                _ => Err(RenderError::InvalidGeoJson(format!("bad position {}", pos))),
            }
        })
        .collect()
}

/// Even-odd ray casting in lon/lat.
pub fn point_in_polygon(ring: &[(f64, f64)], x: f64, y: f64) -> bool {
    let mut inside = false;
    let n = ring.len();
    let mut j = n.wrapping_sub(1);
    for i in 0..n {
        let (xi, yi) = ring[i];
        let (xj, yj) = ring[j];
        if (yi > y) != (yj > y) && x < (xj - xi) * (y - yi) / (yj - yi) + xi {
            inside = !inside;
        }
        j = i;
    }
    inside
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_land_and_sea() {
        let coast = Coastlines::builtin();
        assert!(coast.is_land(20.0, 0.0)); // Congo
        assert!(coast.is_land(-100.0, 45.0)); // Great Plains
        assert!(coast.is_land(100.0, 50.0)); // Siberia
        assert!(coast.is_land(0.0, -85.0)); // Antarctica
        assert!(!coast.is_land(-30.0, 0.0)); // Atlantic
        assert!(!coast.is_land(-150.0, 0.0)); // Pacific
    }

    #[test]
    fn test_antarctica_outline_skips_border() {
        let parts = outline_of(ANTARCTICA);
        assert_eq!(parts.len(), 1);
        assert!(parts[0].iter().all(|&(_, lat)| lat > -90.0));
    }

    #[test]
    fn test_geojson_feature_collection() {
        let text = r#"{
            "type": "FeatureCollection",
            "features": [
                {"type": "Feature", "properties": {},
                 "geometry": {"type": "LineString", "coordinates": [[0, 0], [10, 10]]}},
                {"type": "Feature", "properties": {},
                 "geometry": {"type": "Polygon",
                              "coordinates": [[[0, 0], [4, 0], [4, 4], [0, 4], [0, 0]]]}},
                {"type": "Feature", "properties": {}, "geometry": null}
            ]
        }"#;
        let coast = Coastlines::from_geojson(text).unwrap();
        assert_eq!(coast.lines().len(), 2);
        assert_eq!(coast.land_count(), 1);
        assert!(coast.is_land(2.0, 2.0));
        assert!(!coast.is_land(6.0, 2.0));
    }

    #[test]
    fn test_geojson_rejects_garbage() {
        assert!(Coastlines::from_geojson("{\"type\": \"Circle\"}").is_err());
        assert!(Coastlines::from_geojson("not json").is_err());
        assert!(Coastlines::from_geojson("{\"type\": \"FeatureCollection\", \"features\": []}").is_err());
    }
}
