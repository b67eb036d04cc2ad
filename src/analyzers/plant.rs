use crate::analyzers::status::classify_status;
use crate::analyzers::types::PlantMetrics;
use crate::analyzers::utility::{rate_or_full, ratio_or_zero};
use crate::model::{Incident, IncidentState, MaintenanceRecord, MaintenanceType, Report};
use chrono::{DateTime, Utc};

/// Number of events (incidents, maintenance tasks, reports) at which a
/// plant's activity level saturates at 100.
const ACTIVITY_SATURATION: usize = 10;

/// Computes the derived metrics of one plant from unfiltered collections.
///
/// Records belonging to other plants are ignored. Empty inputs are not an
/// error: resolution and compliance default to 100, ratios to 0. Overdue
/// detection compares `scheduled_at` against `now`; records without a usable
/// timestamp still count in every date-independent total.
pub fn compute_metrics(
    plant_id: &str,
    incidents: &[Incident],
    maintenance: &[MaintenanceRecord],
    reports: &[Report],
    now: DateTime<Utc>,
) -> PlantMetrics {
    let mut total_incidents = 0;
    let mut resolved_incidents = 0;
    for incident in incidents.iter().filter(|i| i.plant_id == plant_id) {
        total_incidents += 1;
        if incident.state == IncidentState::Resolved {
            resolved_incidents += 1;
        }
    }
    let active_incidents = total_incidents - resolved_incidents;

    let mut total_maintenance = 0;
    let mut preventive_count = 0;
    let mut completed_maintenance = 0;
    let mut overdue_maintenance = 0;
    for record in maintenance.iter().filter(|m| m.plant_id == plant_id) {
        total_maintenance += 1;
        if record.kind == MaintenanceType::Preventive {
            preventive_count += 1;
        }
        if record.is_completed() {
            completed_maintenance += 1;
        }
        if record.is_overdue(now) {
            overdue_maintenance += 1;
        }
    }
    // Anything not preventive is corrective, so the two always sum to the total.
    let corrective_count = total_maintenance - preventive_count;
    let pending_maintenance = total_maintenance - completed_maintenance;

    let report_count = reports.iter().filter(|r| r.plant_id == plant_id).count();

    let events = total_incidents + total_maintenance + report_count;
    let activity_level = (100 * events / ACTIVITY_SATURATION).min(100) as u8;

    PlantMetrics {
        plant_id: plant_id.to_string(),
        plant_name: None,
        active_incidents,
        total_incidents,
        resolved_incidents,
        resolution_rate: rate_or_full(resolved_incidents, total_incidents),
        pending_maintenance,
        overdue_maintenance,
        total_maintenance,
        preventive_count,
        corrective_count,
        completed_maintenance,
        preventive_ratio: ratio_or_zero(preventive_count, total_maintenance),
        corrective_ratio: ratio_or_zero(corrective_count, total_maintenance),
        compliance_rate: rate_or_full(completed_maintenance, total_maintenance),
        report_count,
        status: classify_status(active_incidents, overdue_maintenance),
        activity_level,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzers::types::OperationalStatus;
    use crate::model::MaintenanceState;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 10, 12, 0, 0).unwrap()
    }

    fn incident(plant_id: &str, state: IncidentState) -> Incident {
        Incident {
            id: format!("i-{plant_id}"),
            plant_id: plant_id.to_string(),
            state,
            reported_at: Some(now() - Duration::days(1)),
        }
    }

    fn maintenance(
        plant_id: &str,
        kind: MaintenanceType,
        state: MaintenanceState,
        scheduled_at: Option<DateTime<Utc>>,
    ) -> MaintenanceRecord {
        MaintenanceRecord {
            id: format!("m-{plant_id}"),
            plant_id: plant_id.to_string(),
            kind,
            state,
            scheduled_at,
        }
    }

    fn report(plant_id: &str) -> Report {
        Report {
            id: format!("r-{plant_id}"),
            plant_id: plant_id.to_string(),
        }
    }

    #[test]
    fn test_empty_plant() {
        let m = compute_metrics("p1", &[], &[], &[], now());

        assert_eq!(m.total_incidents, 0);
        assert_eq!(m.total_maintenance, 0);
        assert_eq!(m.resolution_rate, 100);
        assert_eq!(m.compliance_rate, 100);
        assert_eq!(m.preventive_ratio, 0);
        assert_eq!(m.corrective_ratio, 0);
        assert_eq!(m.status, OperationalStatus::Optimal);
        assert_eq!(m.activity_level, 0);
    }

    #[test]
    fn test_two_pending_one_resolved_is_attention() {
        let incidents = vec![
            incident("p1", IncidentState::Pending),
            incident("p1", IncidentState::Pending),
            incident("p1", IncidentState::Resolved),
        ];
        let m = compute_metrics("p1", &incidents, &[], &[], now());

        assert_eq!(m.active_incidents, 2);
        assert_eq!(m.resolved_incidents, 1);
        assert_eq!(m.resolution_rate, 33);
        assert_eq!(m.status, OperationalStatus::Attention);
    }

    #[test]
    fn test_three_active_incidents_is_critical() {
        let incidents = vec![
            incident("p1", IncidentState::Pending),
            incident("p1", IncidentState::InProgress),
            incident("p1", IncidentState::Unrecognized),
        ];
        let m = compute_metrics("p1", &incidents, &[], &[], now());

        assert_eq!(m.active_incidents, 3);
        assert_eq!(m.resolution_rate, 0);
        assert_eq!(m.status, OperationalStatus::Critical);
    }

    #[test]
    fn test_preventive_and_corrective_ratios() {
        let mut records = Vec::new();
        for _ in 0..4 {
            records.push(maintenance(
                "p1",
                MaintenanceType::Preventive,
                MaintenanceState::Completed,
                None,
            ));
        }
        for _ in 0..6 {
            records.push(maintenance(
                "p1",
                MaintenanceType::Corrective,
                MaintenanceState::Completed,
                None,
            ));
        }
        let m = compute_metrics("p1", &[], &records, &[], now());

        assert_eq!(m.total_maintenance, 10);
        assert_eq!(m.preventive_count, 4);
        assert_eq!(m.corrective_count, 6);
        assert_eq!(m.preventive_ratio, 40);
        assert_eq!(m.corrective_ratio, 60);
        assert_eq!(m.compliance_rate, 100);
        assert_eq!(m.activity_level, 100);
    }

    #[test]
    fn test_unrecognized_type_counts_as_corrective() {
        let records = vec![
            maintenance("p1", MaintenanceType::Preventive, MaintenanceState::Completed, None),
            maintenance("p1", MaintenanceType::Unrecognized, MaintenanceState::Completed, None),
        ];
        let m = compute_metrics("p1", &[], &records, &[], now());

        assert_eq!(m.preventive_count, 1);
        assert_eq!(m.corrective_count, 1);
        assert_eq!(m.preventive_count + m.corrective_count, m.total_maintenance);
    }

    #[test]
    fn test_overdue_maintenance_escalates_status() {
        let past = Some(now() - Duration::days(2));
        let future = Some(now() + Duration::days(2));

        let one_overdue = vec![
            maintenance("p1", MaintenanceType::Preventive, MaintenanceState::Outstanding, past),
            maintenance("p1", MaintenanceType::Preventive, MaintenanceState::Outstanding, future),
        ];
        let m = compute_metrics("p1", &[], &one_overdue, &[], now());
        assert_eq!(m.overdue_maintenance, 1);
        assert_eq!(m.pending_maintenance, 2);
        assert_eq!(m.compliance_rate, 0);
        assert_eq!(m.status, OperationalStatus::Attention);

        let two_overdue = vec![
            maintenance("p1", MaintenanceType::Corrective, MaintenanceState::Outstanding, past),
            maintenance("p1", MaintenanceType::Corrective, MaintenanceState::Outstanding, past),
            maintenance("p1", MaintenanceType::Corrective, MaintenanceState::Completed, past),
        ];
        let m = compute_metrics("p1", &[], &two_overdue, &[], now());
        assert_eq!(m.overdue_maintenance, 2);
        assert_eq!(m.compliance_rate, 33);
        assert_eq!(m.status, OperationalStatus::Critical);
    }

    #[test]
    fn test_missing_schedule_counts_in_totals_but_not_overdue() {
        let records = vec![maintenance(
            "p1",
            MaintenanceType::Corrective,
            MaintenanceState::Outstanding,
            None,
        )];
        let m = compute_metrics("p1", &[], &records, &[], now());

        assert_eq!(m.total_maintenance, 1);
        assert_eq!(m.pending_maintenance, 1);
        assert_eq!(m.overdue_maintenance, 0);
        assert_eq!(m.status, OperationalStatus::Optimal);
    }

    #[test]
    fn test_other_plants_are_ignored() {
        let incidents = vec![
            incident("p1", IncidentState::Resolved),
            incident("p2", IncidentState::Pending),
        ];
        let records = vec![maintenance(
            "p2",
            MaintenanceType::Preventive,
            MaintenanceState::Outstanding,
            Some(now() - Duration::days(1)),
        )];
        let reports = vec![report("p1"), report("p2"), report("p2")];
        let m = compute_metrics("p1", &incidents, &records, &reports, now());

        assert_eq!(m.total_incidents, 1);
        assert_eq!(m.total_maintenance, 0);
        assert_eq!(m.report_count, 1);
        assert_eq!(m.activity_level, 20);
        assert_eq!(m.status, OperationalStatus::Optimal);
    }

    #[test]
    fn test_rates_stay_in_range() {
        let states = [
            IncidentState::Pending,
            IncidentState::InProgress,
            IncidentState::Resolved,
            IncidentState::Unrecognized,
        ];
        let mut incidents = Vec::new();
        for n in 0..12 {
            incidents.push(incident("p1", states[n % states.len()]));
            let m = compute_metrics("p1", &incidents, &[], &[], now());
            assert!(m.resolution_rate <= 100);
            assert!(m.activity_level <= 100);
            assert_eq!(m.active_incidents + m.resolved_incidents, m.total_incidents);
        }
    }
}
