use anyhow::Result;
use async_trait::async_trait;
use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::fetch::{HttpClient, fetch_json};
use crate::model::{Incident, MaintenanceRecord, Plant, Report};
use crate::services::maintenance_api::MaintenanceApi;

/// List endpoints either return a bare array or wrap it under `data`.
#[derive(Deserialize)]
#[serde(untagged)]
enum Listing<T> {
    Bare(Vec<T>),
    Wrapped { data: Vec<T> },
}

impl<T> Listing<T> {
    fn into_vec(self) -> Vec<T> {
        match self {
            Listing::Bare(items) | Listing::Wrapped { data: items } => items,
        }
    }
}

/// Reads dashboard entities from the maintenance REST backend.
///
/// Authentication is the job of the wrapped [`HttpClient`] (see
/// [`crate::fetch::auth`]).
pub struct RestBackendClient<C> {
    base_url: String,
    http: C,
}

impl<C: HttpClient> RestBackendClient<C> {
    pub fn new(base_url: &str, http: C) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        }
    }

    pub fn endpoint(&self, resource: &str) -> String {
        format!("{}/{}", self.base_url, resource)
    }

    #[tracing::instrument(skip(self), fields(base_url = %self.base_url))]
    async fn list<T: DeserializeOwned>(&self, resource: &str) -> Result<Vec<T>> {
        let url = self.endpoint(resource);
        let listing: Listing<T> = fetch_json(&self.http, &url).await?;
        let items = listing.into_vec();
        tracing::debug!(count = items.len(), "Listing fetched");
        Ok(items)
    }
}

#[async_trait]
impl<C: HttpClient> MaintenanceApi for RestBackendClient<C> {
    async fn list_plants(&self) -> Result<Vec<Plant>> {
        self.list("plants").await
    }

    async fn list_incidents(&self) -> Result<Vec<Incident>> {
        self.list("incidents").await
    }

    async fn list_maintenance(&self) -> Result<Vec<MaintenanceRecord>> {
        self.list("maintenance").await
    }

    async fn list_reports(&self) -> Result<Vec<Report>> {
        self.list("reports").await
    }
}
