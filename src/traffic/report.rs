//! Tool-facing report shapes
//!
//! The raw upstream records carry more than an MCP client acts on; these
//! projections flatten each record to the interesting fields and attach
//! units to delay and speed values. The overview report additionally
//! carries the completeness flag and one failure note per category that
//! could not be loaded.

use serde::Serialize;

use crate::catalog::HighwayId;
use crate::traffic::records::{
    CategoryResult, ChargingStation, Coordinate, RoadClosure, TrafficWarning,
};

/// One traffic warning, projected for tool output
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WarningEntry {
    /// Short headline
    pub title: String,
    /// Location description
    pub subtitle: String,
    /// Free-text detail lines
    pub description: Vec<String>,
    /// Reference point of the warning
    pub location: Coordinate,
    /// Kind of abnormal traffic, when reported
    pub traffic_type: Option<String>,
    /// Average speed with unit, e.g. "25 km/h"
    pub average_speed: Option<String>,
    /// Expected delay with unit, e.g. "12 minutes"
    pub delay: Option<String>,
    /// When the condition started
    pub timestamp: Option<String>,
}

impl From<&TrafficWarning> for WarningEntry {
    fn from(warning: &TrafficWarning) -> Self {
        Self {
            title: warning.title.clone(),
            subtitle: warning.subtitle.clone(),
            description: warning.description.clone(),
            location: warning.coordinate,
            traffic_type: warning.abnormal_traffic_type.clone(),
            average_speed: warning.average_speed.as_ref().map(|v| format!("{} km/h", v)),
            delay: warning
                .delay_time_value
                .as_ref()
                .map(|v| format!("{} minutes", v)),
            timestamp: warning.start_timestamp.clone(),
        }
    }
}

/// One road closure, projected for tool output
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClosureEntry {
    /// Short headline
    pub title: String,
    /// Location description
    pub subtitle: String,
    /// Free-text detail lines
    pub description: Vec<String>,
    /// Reference point of the closure
    pub location: Coordinate,
    /// Expected delay with unit, e.g. "12 minutes"
    pub delay: Option<String>,
    /// When the closure started
    pub timestamp: Option<String>,
}

impl From<&RoadClosure> for ClosureEntry {
    fn from(closure: &RoadClosure) -> Self {
        Self {
            title: closure.title.clone(),
            subtitle: closure.subtitle.clone(),
            description: closure.description.clone(),
            location: closure.coordinate,
            delay: closure
                .delay_time_value
                .as_ref()
                .map(|v| format!("{} minutes", v)),
            timestamp: closure.start_timestamp.clone(),
        }
    }
}

/// One charging station, projected for tool output
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StationEntry {
    /// Station name
    pub title: String,
    /// Location description
    pub subtitle: String,
    /// Free-text detail lines
    pub description: Vec<String>,
    /// Station position
    pub location: Coordinate,
}

impl From<&ChargingStation> for StationEntry {
    fn from(station: &ChargingStation) -> Self {
        Self {
            title: station.title.clone(),
            subtitle: station.subtitle.clone(),
            description: station.description.clone(),
            location: station.coordinate,
        }
    }
}

/// Reply shape of the `get_traffic_warnings` tool
#[derive(Debug, Clone, Serialize)]
pub struct WarningsReport {
    /// Canonical highway identifier
    pub autobahn: String,
    /// Number of current warnings
    pub warnings_count: usize,
    /// The warnings themselves
    pub warnings: Vec<WarningEntry>,
}

impl WarningsReport {
    /// Project fetched records into the tool reply
    pub fn new(autobahn: &HighwayId, records: &[TrafficWarning]) -> Self {
        let warnings: Vec<WarningEntry> = records.iter().map(WarningEntry::from).collect();
        Self {
            autobahn: autobahn.as_str().to_string(),
            warnings_count: warnings.len(),
            warnings,
        }
    }
}

/// Reply shape of the `get_road_closures` tool
#[derive(Debug, Clone, Serialize)]
pub struct ClosuresReport {
    /// Canonical highway identifier
    pub autobahn: String,
    /// Number of current closures
    pub closures_count: usize,
    /// The closures themselves
    pub closures: Vec<ClosureEntry>,
}

impl ClosuresReport {
    /// Project fetched records into the tool reply
    pub fn new(autobahn: &HighwayId, records: &[RoadClosure]) -> Self {
        let closures: Vec<ClosureEntry> = records.iter().map(ClosureEntry::from).collect();
        Self {
            autobahn: autobahn.as_str().to_string(),
            closures_count: closures.len(),
            closures,
        }
    }
}

/// Reply shape of the `get_charging_stations` tool
#[derive(Debug, Clone, Serialize)]
pub struct ChargingStationsReport {
    /// Canonical highway identifier
    pub autobahn: String,
    /// Number of stations along the highway
    pub stations_count: usize,
    /// The stations themselves
    pub charging_stations: Vec<StationEntry>,
}

impl ChargingStationsReport {
    /// Project fetched records into the tool reply
    pub fn new(autobahn: &HighwayId, records: &[ChargingStation]) -> Self {
        let charging_stations: Vec<StationEntry> =
            records.iter().map(StationEntry::from).collect();
        Self {
            autobahn: autobahn.as_str().to_string(),
            stations_count: charging_stations.len(),
            charging_stations,
        }
    }
}

/// Per-category record counts in an overview
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OverviewSummary {
    /// Number of current warnings
    pub warnings: usize,
    /// Number of current closures
    pub closures: usize,
    /// Number of charging stations
    pub charging_stations: usize,
}

/// Note about one category that could not be loaded
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryFailure {
    /// Which category failed ("warnings", "closures", "charging_stations")
    pub category: String,
    /// Machine-readable failure tag
    pub kind: String,
    /// Human-readable failure description
    pub message: String,
}

/// Reply shape of the `get_autobahn_overview` tool.
///
/// Failed categories appear as empty sequences with a matching entry in
/// `failures`; the slots themselves are never absent.
#[derive(Debug, Clone, Serialize)]
pub struct OverviewReport {
    /// Canonical highway identifier
    pub autobahn: String,
    /// True iff all three categories loaded successfully
    pub complete: bool,
    /// Record counts per category
    pub summary: OverviewSummary,
    /// Current warnings (empty when that category failed)
    pub warnings: Vec<WarningEntry>,
    /// Current closures (empty when that category failed)
    pub closures: Vec<ClosureEntry>,
    /// Charging stations (empty when that category failed)
    pub charging_stations: Vec<StationEntry>,
    /// One note per failed category
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub failures: Vec<CategoryFailure>,
}

impl OverviewReport {
    /// Merge the three settled category outcomes into one report
    pub fn new(
        autobahn: &HighwayId,
        warnings: CategoryResult<TrafficWarning>,
        closures: CategoryResult<RoadClosure>,
        stations: CategoryResult<ChargingStation>,
    ) -> Self {
        let mut failures = Vec::new();
        let warnings = settle("warnings", warnings, &mut failures);
        let closures = settle("closures", closures, &mut failures);
        let stations = settle("charging_stations", stations, &mut failures);

        let warnings: Vec<WarningEntry> = warnings.iter().map(WarningEntry::from).collect();
        let closures: Vec<ClosureEntry> = closures.iter().map(ClosureEntry::from).collect();
        let charging_stations: Vec<StationEntry> = stations.iter().map(StationEntry::from).collect();

        Self {
            autobahn: autobahn.as_str().to_string(),
            complete: failures.is_empty(),
            summary: OverviewSummary {
                warnings: warnings.len(),
                closures: closures.len(),
                charging_stations: charging_stations.len(),
            },
            warnings,
            closures,
            charging_stations,
            failures,
        }
    }
}

/// Unwrap one category outcome, recording a failure note on error
fn settle<T>(
    category: &str,
    outcome: CategoryResult<T>,
    failures: &mut Vec<CategoryFailure>,
) -> Vec<T> {
    match outcome {
        Ok(records) => records,
        Err(e) => {
            failures.push(CategoryFailure {
                category: category.to_string(),
                kind: e.kind().to_string(),
                message: e.to_string(),
            });
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn sample_warning() -> TrafficWarning {
        serde_json::from_value(json!({
            "identifier": "abc",
            "icon": "101",
            "title": "A1 | Bremen Richtung Hamburg",
            "subtitle": "Stau",
            "description": ["5 km Stau"],
            "coordinate": {"lat": 53.47, "long": 9.99},
            "startTimestamp": "2024-05-02T11:45:00.000+0200",
            "delayTimeValue": "12",
            "abnormalTrafficType": "CONGESTION",
            "averageSpeed": "25"
        }))
        .unwrap()
    }

    #[test]
    fn test_warning_entry_attaches_units() {
        let entry = WarningEntry::from(&sample_warning());
        assert_eq!(entry.delay.as_deref(), Some("12 minutes"));
        assert_eq!(entry.average_speed.as_deref(), Some("25 km/h"));
        assert_eq!(entry.traffic_type.as_deref(), Some("CONGESTION"));
    }

    #[test]
    fn test_warning_entry_keeps_missing_values_null() {
        let mut warning = sample_warning();
        warning.delay_time_value = None;
        warning.average_speed = None;

        let entry = WarningEntry::from(&warning);
        assert_eq!(entry.delay, None);
        assert_eq!(entry.average_speed, None);

        // Serialized shape keeps the keys, as null
        let value = serde_json::to_value(&entry).unwrap();
        assert!(value.get("delay").unwrap().is_null());
    }
}
