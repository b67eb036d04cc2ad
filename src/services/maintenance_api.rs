//! Trait for the REST backend that owns plants, incidents, maintenance and reports.

use crate::model::{Incident, MaintenanceRecord, Plant, Report, Snapshot};
use anyhow::Result;

/// Abstraction over a source of dashboard entities (REST backend, fixture file).
#[async_trait::async_trait]
pub trait MaintenanceApi: Send + Sync {
    async fn list_plants(&self) -> Result<Vec<Plant>>;

    async fn list_incidents(&self) -> Result<Vec<Incident>>;

    async fn list_maintenance(&self) -> Result<Vec<MaintenanceRecord>>;

    async fn list_reports(&self) -> Result<Vec<Report>>;

    /// Fetches all four collections concurrently. Fails if any one of them fails.
    async fn load_snapshot(&self) -> Result<Snapshot> {
        let (plants, incidents, maintenance, reports) = tokio::try_join!(
            self.list_plants(),
            self.list_incidents(),
            self.list_maintenance(),
            self.list_reports(),
        )?;

        Ok(Snapshot {
            plants,
            incidents,
            maintenance,
            reports,
        })
    }
}
