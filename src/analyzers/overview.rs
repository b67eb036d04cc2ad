use crate::analyzers::plant::compute_metrics;
use crate::analyzers::types::{DashboardSummary, PlantMetrics, StatusBreakdown, SystemTotals};
use crate::analyzers::utility::rate_or_full;
use crate::analyzers::weekly::bucket_last_week;
use crate::model::Snapshot;
use chrono::{DateTime, Utc};
use std::collections::HashSet;

pub const SCHEMA_VERSION: u8 = 1;
pub const ALGORITHM_VERSION: u8 = 1;

/// Builds the system-wide dashboard view of a snapshot.
///
/// One metrics row per known plant id, in snapshot order; a repeated id keeps
/// its first entry. Totals are summed
/// over those rows, so records pointing at an unknown plant do not count.
/// The weekly histogram covers every incident in the snapshot.
pub fn summarize(snapshot: &Snapshot, now: DateTime<Utc>) -> DashboardSummary {
    let mut totals = SystemTotals::default();
    let mut status_breakdown = StatusBreakdown::default();
    let mut plants = Vec::with_capacity(snapshot.plants.len());
    let mut seen = HashSet::with_capacity(snapshot.plants.len());

    for plant in &snapshot.plants {
        if !seen.insert(plant.id.as_str()) {
            continue;
        }
        let metrics = compute_metrics(
            &plant.id,
            &snapshot.incidents,
            &snapshot.maintenance,
            &snapshot.reports,
            now,
        )
        .with_plant_name(&plant.name);

        totals.plants += 1;
        totals.incidents += metrics.total_incidents;
        totals.active_incidents += metrics.active_incidents;
        totals.resolved_incidents += metrics.resolved_incidents;
        totals.maintenance += metrics.total_maintenance;
        totals.completed_maintenance += metrics.completed_maintenance;
        totals.overdue_maintenance += metrics.overdue_maintenance;
        totals.reports += metrics.report_count;
        status_breakdown.record(metrics.status);

        plants.push(metrics);
    }

    totals.resolution_rate = rate_or_full(totals.resolved_incidents, totals.incidents);
    totals.compliance_rate = rate_or_full(totals.completed_maintenance, totals.maintenance);

    DashboardSummary {
        schema_version: SCHEMA_VERSION,
        algorithm_version: ALGORITHM_VERSION,
        generated_at: now,
        totals,
        status_breakdown,
        plants,
        weekly: bucket_last_week(&snapshot.incidents, now),
    }
}

/// Metrics of a single known plant, named. `None` when no plant in the
/// snapshot has `plant_id`.
pub fn metrics_for_plant(
    snapshot: &Snapshot,
    plant_id: &str,
    now: DateTime<Utc>,
) -> Option<PlantMetrics> {
    let plant = snapshot.plant(plant_id)?;
    let metrics = compute_metrics(
        &plant.id,
        &snapshot.incidents,
        &snapshot.maintenance,
        &snapshot.reports,
        now,
    );
    Some(metrics.with_plant_name(&plant.name))
}
