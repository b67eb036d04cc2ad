//! Derived data produced by the aggregation pipeline.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

/// Coarse three-tier operational status of a plant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationalStatus {
    Optimal,
    Attention,
    Critical,
}

impl OperationalStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            OperationalStatus::Optimal => "optimal",
            OperationalStatus::Attention => "attention",
            OperationalStatus::Critical => "critical",
        }
    }
}

impl fmt::Display for OperationalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-plant metrics. Recomputed from scratch on every snapshot; rates are
/// whole percentages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlantMetrics {
    pub plant_id: String,
    pub plant_name: Option<String>,

    pub active_incidents: usize,
    pub total_incidents: usize,
    pub resolved_incidents: usize,
    pub resolution_rate: u8,

    pub pending_maintenance: usize,
    pub overdue_maintenance: usize,
    pub total_maintenance: usize,
    pub preventive_count: usize,
    pub corrective_count: usize,
    pub completed_maintenance: usize,
    pub preventive_ratio: u8,
    pub corrective_ratio: u8,
    pub compliance_rate: u8,

    pub report_count: usize,
    pub status: OperationalStatus,
    pub activity_level: u8,
}

impl PlantMetrics {
    pub fn with_plant_name(mut self, name: &str) -> Self {
        self.plant_name = Some(name.to_string());
        self
    }
}

/// Incidents of the last seven days, bucketed by weekday (Monday first)
/// and state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyHistogram {
    pub labels: [&'static str; 7],
    pub pending: [usize; 7],
    pub in_progress: [usize; 7],
    pub resolved: [usize; 7],
    /// Incidents inside the window, whatever their state.
    pub total: usize,
}

/// Number of plants in each status tier.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StatusBreakdown {
    pub optimal: usize,
    pub attention: usize,
    pub critical: usize,
}

impl StatusBreakdown {
    pub fn record(&mut self, status: OperationalStatus) {
        match status {
            OperationalStatus::Optimal => self.optimal += 1,
            OperationalStatus::Attention => self.attention += 1,
            OperationalStatus::Critical => self.critical += 1,
        }
    }
}

/// Totals summed over the per-plant rows.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemTotals {
    pub plants: usize,
    pub incidents: usize,
    pub active_incidents: usize,
    pub resolved_incidents: usize,
    pub maintenance: usize,
    pub completed_maintenance: usize,
    pub overdue_maintenance: usize,
    pub reports: usize,
    pub resolution_rate: u8,
    pub compliance_rate: u8,
}

/// Complete dashboard payload, written as JSON for the presentation layer.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub schema_version: u8,
    pub algorithm_version: u8,
    pub generated_at: DateTime<Utc>,
    pub totals: SystemTotals,
    pub status_breakdown: StatusBreakdown,
    pub plants: Vec<PlantMetrics>,
    pub weekly: WeeklyHistogram,
}

/// Data-quality findings for a snapshot. Nothing here stops aggregation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotAudit {
    pub incidents_without_timestamp: usize,
    pub maintenance_without_timestamp: usize,
    pub unrecognized_incident_states: usize,
    pub unrecognized_maintenance_types: usize,
    pub orphan_incidents: usize,
    pub orphan_maintenance: usize,
    pub orphan_reports: usize,
    pub duplicate_plant_ids: Vec<String>,
}

impl SnapshotAudit {
    pub fn is_clean(&self) -> bool {
        *self == SnapshotAudit::default()
    }
}
