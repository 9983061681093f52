//! Traffic data module
//!
//! Typed projections over the upstream categories (warnings, closures,
//! charging stations), the tool-facing report shapes, and the service
//! that validates identifiers and composes the per-highway overview.

pub mod records;
pub mod report;
pub mod service;

pub use records::{
    CategoryRecord, CategoryResult, ChargingStation, Coordinate, Geometry, RoadClosure,
    TrafficWarning,
};
pub use report::{
    CategoryFailure, ChargingStationsReport, ClosureEntry, ClosuresReport, OverviewReport,
    OverviewSummary, StationEntry, WarningEntry, WarningsReport,
};
pub use service::{ServiceConfig, TrafficService};
