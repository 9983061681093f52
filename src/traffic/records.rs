//! Upstream record shapes
//!
//! These structs mirror the fields the traffic API publishes per
//! category. Payloads pass through largely unchanged; decoding here is
//! shape validation, not interpretation. Geometry coordinates stay an
//! opaque JSON value because their nesting varies by geometry type.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::UpstreamError;

/// Outcome of one category fetch: the records, or the failure that kept
/// them from loading.
pub type CategoryResult<T> = std::result::Result<Vec<T>, UpstreamError>;

/// Descriptor tying a record type to its upstream resource.
///
/// The three categories are structurally identical fetches that differ
/// only in path segment and wrapper field; this trait is what lets one
/// parameterized fetcher serve all of them.
pub trait CategoryRecord: DeserializeOwned + Serialize + Send + Sync + 'static {
    /// Path segment under `{highway}/services/` for this category
    const SERVICE: &'static str;
    /// Field of the upstream wrapper object holding the record array
    const FIELD: &'static str;
    /// Label used in logs and overview failure notes
    const LABEL: &'static str;
}

/// A geographic point.
///
/// The live API serves lat/long sometimes as JSON numbers and sometimes
/// as decimal strings; both are accepted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    /// Latitude in degrees
    #[serde(deserialize_with = "f64_from_number_or_string")]
    pub lat: f64,
    /// Longitude in degrees
    #[serde(deserialize_with = "f64_from_number_or_string")]
    pub long: f64,
}

/// Geometry attached to a record (line strings for stretches of road,
/// points for stations)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Geometry {
    /// Geometry type, e.g. "LineString" or "Point"
    #[serde(rename = "type")]
    pub kind: String,
    /// Coordinate payload, passed through untouched
    pub coordinates: Value,
}

/// A current traffic warning on one autobahn
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrafficWarning {
    /// Upstream record identifier
    pub identifier: String,
    /// Icon name assigned by the upstream service
    pub icon: String,
    /// Short headline
    pub title: String,
    /// Location description
    pub subtitle: String,
    /// Free-text detail lines
    pub description: Vec<String>,
    /// Reference point of the warning
    pub coordinate: Coordinate,
    /// When the condition started, if reported
    #[serde(default)]
    pub start_timestamp: Option<String>,
    /// Expected delay in minutes, if reported
    #[serde(default)]
    pub delay_time_value: Option<String>,
    /// Kind of abnormal traffic (congestion, stationary, ...)
    #[serde(default)]
    pub abnormal_traffic_type: Option<String>,
    /// Average speed through the stretch in km/h, if reported
    #[serde(default)]
    pub average_speed: Option<String>,
    /// Affected stretch of road
    #[serde(default)]
    pub geometry: Option<Geometry>,
}

impl CategoryRecord for TrafficWarning {
    const SERVICE: &'static str = "warning";
    const FIELD: &'static str = "warning";
    const LABEL: &'static str = "warnings";
}

/// A current road closure on one autobahn
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoadClosure {
    /// Upstream record identifier
    pub identifier: String,
    /// Icon name assigned by the upstream service
    pub icon: String,
    /// Short headline
    pub title: String,
    /// Location description
    pub subtitle: String,
    /// Free-text detail lines
    pub description: Vec<String>,
    /// Reference point of the closure
    pub coordinate: Coordinate,
    /// When the closure started, if reported
    #[serde(default)]
    pub start_timestamp: Option<String>,
    /// Expected delay in minutes, if reported
    #[serde(default)]
    pub delay_time_value: Option<String>,
    /// Affected stretch of road
    #[serde(default)]
    pub geometry: Option<Geometry>,
}

impl CategoryRecord for RoadClosure {
    const SERVICE: &'static str = "closure";
    const FIELD: &'static str = "closure";
    const LABEL: &'static str = "closures";
}

/// An electric charging station along one autobahn
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChargingStation {
    /// Upstream record identifier
    pub identifier: String,
    /// Icon name assigned by the upstream service
    pub icon: String,
    /// Station name
    pub title: String,
    /// Location description
    pub subtitle: String,
    /// Free-text detail lines (operator, plug types, ...)
    pub description: Vec<String>,
    /// Station position
    pub coordinate: Coordinate,
    /// Station point geometry
    #[serde(default)]
    pub geometry: Option<Geometry>,
}

impl CategoryRecord for ChargingStation {
    const SERVICE: &'static str = "electric_charging_station";
    const FIELD: &'static str = "electric_charging_station";
    const LABEL: &'static str = "charging_stations";
}

/// Accepts a float either as a JSON number or as a decimal string
fn f64_from_number_or_string<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Number(n) => n
            .as_f64()
            .ok_or_else(|| serde::de::Error::custom("coordinate out of f64 range")),
        Value::String(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|e| serde::de::Error::custom(format!("invalid coordinate '{}': {}", s, e))),
        other => Err(serde::de::Error::custom(format!(
            "expected number or string, got {}",
            other
        ))),
    }
}
