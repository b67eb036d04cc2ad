use crate::analyzers::audit::audit_snapshot;
use crate::analyzers::overview::summarize;
use crate::analyzers::types::{DashboardSummary, SnapshotAudit};
use crate::analyzers::writetos3::{upload_report, write_json_to_s3};
use crate::model::Snapshot;
use crate::output::{append_record, export_csv, metrics_csv_bytes, write_json};
use crate::services::maintenance_api::MaintenanceApi;
use anyhow::Result;
use chrono::{DateTime, Utc};
use tracing::{info, warn};

/// Where a dashboard run writes its results. Every destination is optional.
#[derive(Debug, Clone, Default)]
pub struct DashboardOutputs {
    pub json_path: Option<String>,
    pub csv_path: Option<String>,
    /// CSV that accumulates every run's rows; the header is written once.
    pub history_path: Option<String>,
    pub s3_bucket: Option<String>,
    pub gzip: bool,
}

/// Fetches one snapshot, audits it, aggregates it at `now` and writes the
/// configured outputs.
#[tracing::instrument(skip(api, outputs))]
pub async fn analyze<A>(
    api: &A,
    outputs: &DashboardOutputs,
    now: DateTime<Utc>,
) -> Result<DashboardSummary>
where
    A: MaintenanceApi + ?Sized,
{
    let snapshot = api.load_snapshot().await?;
    info!(
        plants = snapshot.plants.len(),
        incidents = snapshot.incidents.len(),
        maintenance = snapshot.maintenance.len(),
        reports = snapshot.reports.len(),
        "Snapshot loaded"
    );

    let summary = summarize_and_report(&snapshot, now);

    if let Some(path) = &outputs.json_path {
        write_json(path, &summary)?;
        info!(path = %path, "Dashboard JSON written");
    }

    if let Some(path) = &outputs.csv_path {
        export_csv(path, &summary.plants)?;
        info!(path = %path, rows = summary.plants.len(), "Metrics report exported");
    }

    if let Some(path) = &outputs.history_path {
        for metrics in &summary.plants {
            append_record(path, metrics)?;
        }
        info!(path = %path, rows = summary.plants.len(), "Metrics history appended");
    }

    if let Some(bucket) = &outputs.s3_bucket {
        publish_to_s3(bucket, &summary, outputs.gzip).await?;
    }

    Ok(summary)
}

/// Audits and summarises an in-memory snapshot, logging data-quality issues.
pub fn summarize_and_report(snapshot: &Snapshot, now: DateTime<Utc>) -> DashboardSummary {
    log_audit(&audit_snapshot(snapshot));

    let summary = summarize(snapshot, now);
    info!(
        plants = summary.totals.plants,
        optimal = summary.status_breakdown.optimal,
        attention = summary.status_breakdown.attention,
        critical = summary.status_breakdown.critical,
        resolution_rate = summary.totals.resolution_rate,
        compliance_rate = summary.totals.compliance_rate,
        weekly_incidents = summary.weekly.total,
        "Dashboard aggregated"
    );
    summary
}

/// Logs each kind of data-quality issue found in a snapshot at `warn`.
pub fn log_audit(audit: &SnapshotAudit) {
    if audit.is_clean() {
        return;
    }

    if audit.incidents_without_timestamp > 0 || audit.maintenance_without_timestamp > 0 {
        warn!(
            incidents = audit.incidents_without_timestamp,
            maintenance = audit.maintenance_without_timestamp,
            "Records without a usable timestamp excluded from date-based metrics"
        );
    }
    if audit.unrecognized_incident_states > 0 {
        warn!(
            count = audit.unrecognized_incident_states,
            "Incidents with unrecognized state left out of the weekly buckets"
        );
    }
    if audit.unrecognized_maintenance_types > 0 {
        warn!(
            count = audit.unrecognized_maintenance_types,
            "Maintenance records with unrecognized type counted as corrective"
        );
    }
    if audit.orphan_incidents + audit.orphan_maintenance + audit.orphan_reports > 0 {
        warn!(
            incidents = audit.orphan_incidents,
            maintenance = audit.orphan_maintenance,
            reports = audit.orphan_reports,
            "Records reference unknown plants"
        );
    }
    if !audit.duplicate_plant_ids.is_empty() {
        warn!(ids = ?audit.duplicate_plant_ids, "Duplicate plant ids");
    }
}

/// Uploads the dashboard JSON and the CSV report, keyed by generation date.
#[tracing::instrument(skip(summary), fields(bucket = %bucket, gzip))]
async fn publish_to_s3(bucket: &str, summary: &DashboardSummary, gzip: bool) -> Result<()> {
    let config = aws_config::load_from_env().await;
    let s3 = aws_sdk_s3::Client::new(&config);

    let date = summary.generated_at.format("%Y-%m-%d").to_string();

    write_json_to_s3(&s3, bucket, "dashboard/latest.json", summary).await?;
    write_json_to_s3(&s3, bucket, &format!("dashboard/date={date}.json"), summary).await?;

    let csv = metrics_csv_bytes(&summary.plants)?;
    let key = upload_report(&s3, bucket, &format!("reports/date={date}.csv"), csv, gzip).await?;

    info!(key = %key, "Dashboard published to S3");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::fixture::FixtureSource;
    use chrono::TimeZone;
    use std::env;
    use std::fs;

    const SNAPSHOT: &[u8] = br#"{
        "plants": [{"id": 1, "name": "North"}, {"id": 2, "name": "South"}],
        "incidents": [
            {"id": 1, "plantId": 1, "state": "pending", "reportedAt": "2024-03-09T08:00:00Z"},
            {"id": 2, "plantId": 2, "state": "resolved", "reportedAt": "2024-03-08T08:00:00Z"}
        ],
        "maintenance": [],
        "reports": []
    }"#;

    #[tokio::test]
    async fn test_analyze_writes_requested_outputs() {
        let dir = env::temp_dir();
        let json_path = format!("{}/plant_metrics_test_analyze.json", dir.display());
        let csv_path = format!("{}/plant_metrics_test_analyze.csv", dir.display());

        let source = FixtureSource::new(Snapshot::from_json_slice(SNAPSHOT).unwrap());
        let outputs = DashboardOutputs {
            json_path: Some(json_path.clone()),
            csv_path: Some(csv_path.clone()),
            ..Default::default()
        };
        let now = Utc.with_ymd_and_hms(2024, 3, 10, 12, 0, 0).unwrap();

        let summary = analyze(&source, &outputs, now).await.unwrap();
        assert_eq!(summary.totals.plants, 2);
        assert_eq!(summary.status_breakdown.attention, 1);
        assert_eq!(summary.weekly.total, 2);

        let json: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&json_path).unwrap()).unwrap();
        assert_eq!(json["totals"]["incidents"], 2);
        assert_eq!(fs::read_to_string(&csv_path).unwrap().lines().count(), 3);

        fs::remove_file(&json_path).unwrap();
        fs::remove_file(&csv_path).unwrap();
    }

    #[tokio::test]
    async fn test_analyze_appends_history_across_runs() {
        let path = format!("{}/plant_metrics_test_history.csv", env::temp_dir().display());
        let _ = fs::remove_file(&path);

        let source = FixtureSource::new(Snapshot::from_json_slice(SNAPSHOT).unwrap());
        let outputs = DashboardOutputs {
            history_path: Some(path.clone()),
            ..Default::default()
        };
        let now = Utc.with_ymd_and_hms(2024, 3, 10, 12, 0, 0).unwrap();

        analyze(&source, &outputs, now).await.unwrap();
        analyze(&source, &outputs, now).await.unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<_> = content.lines().collect();
        assert_eq!(lines.len(), 5);
        assert!(lines[0].starts_with("plantId,"));
        assert_eq!(lines.iter().filter(|l| l.starts_with("plantId,")).count(), 1);
        assert!(lines[1].starts_with("1,North,"));
        assert!(lines[3].starts_with("1,North,"));

        fs::remove_file(&path).unwrap();
    }

    #[tokio::test]
    async fn test_analyze_without_outputs() {
        let source = FixtureSource::new(Snapshot::default());
        let summary = analyze(&source, &DashboardOutputs::default(), Utc::now())
            .await
            .unwrap();
        assert!(summary.plants.is_empty());
    }
}
