use chrono::{DateTime, Utc};
use chrono_tz::Europe::Brussels;
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Envelope of a GeoJSON response. Features stay untyped so that one odd
/// feature cannot reject the whole page.
#[derive(Debug, Deserialize)]
pub(crate) struct FeatureCollection {
    pub(crate) features: Vec<Value>,
}

/// A `(longitude, latitude)` pair in WGS84.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Position {
    pub longitude: f64,
    pub latitude: f64,
}

impl Position {
    pub fn new(longitude: f64, latitude: f64) -> Self {
        Self {
            longitude,
            latitude,
        }
    }

    fn from_value(value: &Value) -> Option<Self> {
        match value.as_array()?.as_slice() {
            [lon, lat, ..] => Some(Self::new(lon.as_f64()?, lat.as_f64()?)),
            _ => None,
        }
    }
}

/// Location of a parking entry.
///
/// Older layers publish a single point, newer ones the outline of the space.
/// Polygons are reduced to their outer ring.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "coordinates")]
pub enum Coordinates {
    Point(Position),
    Ring(Vec<Position>),
}

impl Coordinates {
    fn from_value(value: &Value) -> Option<Self> {
        let items = value.as_array()?;
        match items.first()? {
            Value::Number(_) => Position::from_value(value).map(Coordinates::Point),
            Value::Array(inner) if inner.first().is_some_and(Value::is_array) => {
                Self::ring(inner).map(Coordinates::Ring)
            }
            Value::Array(_) => Self::ring(items).map(Coordinates::Ring),
            _ => None,
        }
    }

    fn ring(items: &[Value]) -> Option<Vec<Position>> {
        items.iter().map(Position::from_value).collect()
    }

    /// All positions, in order. A point yields one position.
    pub fn positions(&self) -> &[Position] {
        match self {
            Coordinates::Point(p) => std::slice::from_ref(p),
            Coordinates::Ring(ring) => ring,
        }
    }
}

/// Object representing a disabled parking entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisabledParking {
    pub entry_id: Option<i64>,
    /// Number of spaces at this entry.
    pub number: Option<i64>,
    pub orientation: Option<String>,
    pub destiny: Option<String>,
    /// Free-form description of time-window restrictions.
    pub window_time: Option<String>,
    pub lined: bool,
    pub status: Option<String>,
    pub gis_id: Option<String>,
    pub created_at: Option<DateTime<Tz>>,
    pub coordinates: Option<Coordinates>,
}

impl DisabledParking {
    /// Builds a record from one GeoJSON feature.
    ///
    /// Missing or malformed attributes become `None`; this never fails.
    pub fn from_feature(feature: &Value) -> Self {
        let properties = feature.get("properties").and_then(Value::as_object);
        let coordinates = feature.pointer("/geometry/coordinates");
        Self::from_parts(properties, coordinates)
    }

    fn from_parts(properties: Option<&Map<String, Value>>, coordinates: Option<&Value>) -> Self {
        let attr = |key: &str| properties.and_then(|p| p.get(key));
        let text = |key: &str| attr(key).and_then(Value::as_str).map(str::to_owned);

        Self {
            entry_id: attr("OBJECTID").and_then(integer),
            number: attr("Capaciteit").and_then(integer),
            orientation: text("Orientatie"),
            destiny: text("Bestemming"),
            window_time: text("VENSTERTIJD_BESCHR"),
            lined: attr("GELIJND").and_then(Value::as_str) == Some("Ja"),
            status: text("STATUS"),
            gis_id: text("GISID"),
            created_at: attr("EBDD").and_then(from_epoch_millis),
            coordinates: coordinates.and_then(Coordinates::from_value),
        }
    }
}

// Integral floats (`2.0`) are accepted, anything else is treated as missing.
fn integer(value: &Value) -> Option<i64> {
    value.as_i64().or_else(|| {
        let f = value.as_f64()?;
        (f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64).then_some(f as i64)
    })
}

/// Converts epoch milliseconds to Brussels local time.
///
/// Returns `None` for non-numeric or out-of-range values.
pub(crate) fn from_epoch_millis(value: &Value) -> Option<DateTime<Tz>> {
    let ms = match value.as_i64() {
        Some(ms) => ms,
        None => {
            let ms = value.as_f64()?;
            if !ms.is_finite() || ms < i64::MIN as f64 || ms >= i64::MAX as f64 {
                return None;
            }
            ms as i64
        }
    };
    let utc: DateTime<Utc> = DateTime::from_timestamp_millis(ms)?;
    Some(utc.with_timezone(&Brussels))
}
