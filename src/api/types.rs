//! API response and query types.
//!
//! Telemetry field names follow the CSV export columns.

use serde::{Deserialize, Serialize};

use crate::sim::kpi::RunSummary;
use crate::sim::types::{SystemStatus, TickResult};

/// Final status snapshot plus the run summary.
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: SystemStatus,
    pub summary: RunSummary,
}

/// Single telemetry record using the CSV column names.
///
/// Maps internal `TickResult` fields to the public API contract:
/// - `source_watts` → `source_w`
/// - `delivered_watts` → `delivered_w`
/// - `power_shortfall` → `shortfall`
/// - `mean_unit_temp_c` → `unit_temp_c`
#[derive(Debug, Serialize)]
pub struct TelemetryRecord {
    pub tick: usize,
    pub time_s: f64,
    pub time_of_day: f64,
    pub drive_rate: f64,
    pub source_w: f64,
    pub delivered_w: f64,
    pub stored_w: f64,
    pub cooled: bool,
    pub shortfall: bool,
    pub temp_drop_c: f64,
    pub temp_gain_c: f64,
    pub env_temp_c: f64,
    pub unit_temp_c: f64,
    pub battery_wh: f64,
}

impl From<&TickResult> for TelemetryRecord {
    fn from(r: &TickResult) -> Self {
        Self {
            tick: r.tick,
            time_s: r.time_s,
            time_of_day: r.time_of_day,
            drive_rate: r.drive_rate,
            source_w: r.source_watts,
            delivered_w: r.delivered_watts,
            stored_w: r.stored_watts,
            cooled: r.cooled,
            shortfall: r.power_shortfall,
            temp_drop_c: r.temp_drop_c,
            temp_gain_c: r.temp_gain_c,
            env_temp_c: r.env_temp_c,
            unit_temp_c: r.mean_unit_temp_c,
            battery_wh: r.battery_level_wh,
        }
    }
}

/// Optional range query parameters for the telemetry endpoint.
#[derive(Debug, Deserialize)]
pub struct TelemetryQuery {
    /// First tick (inclusive).
    pub from: Option<usize>,
    /// Last tick (inclusive).
    pub to: Option<usize>,
}

/// Error response body for 400-class errors.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}
