use crate::analyzers::types::SnapshotAudit;
use crate::model::{IncidentState, MaintenanceType, Snapshot};
use std::collections::HashSet;

/// Counts data-quality problems in a snapshot without rejecting anything.
///
/// Aggregation tolerates every issue reported here; the audit only exists so
/// callers can surface them.
pub fn audit_snapshot(snapshot: &Snapshot) -> SnapshotAudit {
    let mut audit = SnapshotAudit::default();

    let mut known = HashSet::with_capacity(snapshot.plants.len());
    for plant in &snapshot.plants {
        if !known.insert(plant.id.as_str()) && !audit.duplicate_plant_ids.contains(&plant.id) {
            audit.duplicate_plant_ids.push(plant.id.clone());
        }
    }

    for incident in &snapshot.incidents {
        if incident.reported_at.is_none() {
            audit.incidents_without_timestamp += 1;
        }
        if incident.state == IncidentState::Unrecognized {
            audit.unrecognized_incident_states += 1;
        }
        if !known.contains(incident.plant_id.as_str()) {
            audit.orphan_incidents += 1;
        }
    }

    for record in &snapshot.maintenance {
        if record.scheduled_at.is_none() {
            audit.maintenance_without_timestamp += 1;
        }
        if record.kind == MaintenanceType::Unrecognized {
            audit.unrecognized_maintenance_types += 1;
        }
        if !known.contains(record.plant_id.as_str()) {
            audit.orphan_maintenance += 1;
        }
    }

    audit.orphan_reports = snapshot
        .reports
        .iter()
        .filter(|r| !known.contains(r.plant_id.as_str()))
        .count();

    audit
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_snapshot() {
        let snapshot = Snapshot::from_json_slice(
            br#"{
                "plants": [{"id": 1, "name": "North"}],
                "incidents": [{"id": 1, "plantId": 1, "state": "pending", "reportedAt": "2024-03-05T10:00:00Z"}],
                "maintenance": [{"id": 1, "plantId": 1, "type": "preventive", "state": "completed", "scheduledAt": "2024-03-01"}],
                "reports": [{"id": 1, "plantId": 1}]
            }"#,
        )
        .unwrap();

        assert!(audit_snapshot(&snapshot).is_clean());
    }

    #[test]
    fn test_reports_every_issue() {
        let snapshot = Snapshot::from_json_slice(
            br#"{
                "plants": [{"id": 1}, {"id": 1}, {"id": 2}],
                "incidents": [
                    {"id": 1, "plantId": 1, "state": "escalated", "reportedAt": "bogus"},
                    {"id": 2, "plantId": 9, "state": "pending", "reportedAt": "2024-03-05"}
                ],
                "maintenance": [
                    {"id": 1, "plantId": 2, "type": "predictive", "state": "scheduled"},
                    {"id": 2, "plantId": 8, "type": "corrective", "state": "completed", "scheduledAt": "2024-03-05"}
                ],
                "reports": [{"id": 1, "plantId": 7}]
            }"#,
        )
        .unwrap();

        let audit = audit_snapshot(&snapshot);
        assert!(!audit.is_clean());
        assert_eq!(audit.duplicate_plant_ids, vec!["1".to_string()]);
        assert_eq!(audit.incidents_without_timestamp, 1);
        assert_eq!(audit.unrecognized_incident_states, 1);
        assert_eq!(audit.orphan_incidents, 1);
        assert_eq!(audit.maintenance_without_timestamp, 1);
        assert_eq!(audit.unrecognized_maintenance_types, 1);
        assert_eq!(audit.orphan_maintenance, 1);
        assert_eq!(audit.orphan_reports, 1);
    }
}
