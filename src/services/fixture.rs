use crate::model::{Incident, MaintenanceRecord, Plant, Report, Snapshot};
use crate::services::maintenance_api::MaintenanceApi;
use anyhow::Result;
use std::path::Path;

/// Serves a snapshot that is already in memory, typically loaded from a
/// JSON file for offline runs and tests.
pub struct FixtureSource {
    snapshot: Snapshot,
}

impl FixtureSource {
    pub fn new(snapshot: Snapshot) -> Self {
        Self { snapshot }
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self::new(Snapshot::from_json_file(path)?))
    }
}

#[async_trait::async_trait]
impl MaintenanceApi for FixtureSource {
    async fn list_plants(&self) -> Result<Vec<Plant>> {
        Ok(self.snapshot.plants.clone())
    }

    async fn list_incidents(&self) -> Result<Vec<Incident>> {
        Ok(self.snapshot.incidents.clone())
    }

    async fn list_maintenance(&self) -> Result<Vec<MaintenanceRecord>> {
        Ok(self.snapshot.maintenance.clone())
    }

    async fn list_reports(&self) -> Result<Vec<Report>> {
        Ok(self.snapshot.reports.clone())
    }

    async fn load_snapshot(&self) -> Result<Snapshot> {
        Ok(self.snapshot.clone())
    }
}
