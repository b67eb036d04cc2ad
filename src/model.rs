//! Entities read from the maintenance backend.
//!
//! The backend is loose about its JSON: ids arrive as strings or integers,
//! keys are camelCase or snake_case, and timestamps come in several shapes.
//! Deserialization here normalises all of that and never fails on a bad
//! timestamp or an unknown state; those records stay in the snapshot and
//! are simply left out of date-dependent computations.

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::path::Path;

/// A managed facility (water treatment, electrical, HVAC, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Plant {
    #[serde(default, deserialize_with = "lenient_id")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_optional_text")]
    pub location: Option<String>,
}

/// Lifecycle state of an incident.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IncidentState {
    Pending,
    #[serde(alias = "in-progress", alias = "inProgress")]
    InProgress,
    Resolved,
    #[default]
    #[serde(other)]
    Unrecognized,
}

/// A reported operational issue tied to one plant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Incident {
    #[serde(default, deserialize_with = "lenient_id")]
    pub id: String,
    #[serde(default, alias = "plant_id", deserialize_with = "lenient_id")]
    pub plant_id: String,
    #[serde(default, deserialize_with = "lenient_variant")]
    pub state: IncidentState,
    #[serde(default, alias = "reported_at", deserialize_with = "lenient_timestamp")]
    pub reported_at: Option<DateTime<Utc>>,
}

/// Whether a maintenance task is planned upkeep or a repair.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaintenanceType {
    Preventive,
    Corrective,
    #[default]
    #[serde(other)]
    Unrecognized,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaintenanceState {
    #[serde(alias = "complete", alias = "done")]
    Completed,
    /// Anything not completed: scheduled, in progress, cancelled, unknown.
    #[default]
    #[serde(other)]
    Outstanding,
}

/// A scheduled or completed upkeep task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaintenanceRecord {
    #[serde(default, deserialize_with = "lenient_id")]
    pub id: String,
    #[serde(default, alias = "plant_id", deserialize_with = "lenient_id")]
    pub plant_id: String,
    #[serde(default, rename = "type", alias = "kind", deserialize_with = "lenient_variant")]
    pub kind: MaintenanceType,
    #[serde(default, deserialize_with = "lenient_variant")]
    pub state: MaintenanceState,
    #[serde(default, alias = "scheduled_at", deserialize_with = "lenient_timestamp")]
    pub scheduled_at: Option<DateTime<Utc>>,
}

impl MaintenanceRecord {
    pub fn is_completed(&self) -> bool {
        self.state == MaintenanceState::Completed
    }

    /// Not completed and scheduled strictly before `now`. Records without a
    /// usable `scheduled_at` are never overdue.
    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        !self.is_completed() && self.scheduled_at.is_some_and(|at| at < now)
    }
}

/// A generated report. Only counted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    #[serde(default, deserialize_with = "lenient_id")]
    pub id: String,
    #[serde(default, alias = "plant_id", deserialize_with = "lenient_id")]
    pub plant_id: String,
}

/// Everything the aggregator needs, fetched in one refresh cycle.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub plants: Vec<Plant>,
    #[serde(default)]
    pub incidents: Vec<Incident>,
    #[serde(default, alias = "maintenances")]
    pub maintenance: Vec<MaintenanceRecord>,
    #[serde(default)]
    pub reports: Vec<Report>,
}

impl Snapshot {
    pub fn from_json_slice(bytes: &[u8]) -> Result<Self> {
        Ok(serde_json::from_slice(bytes)?)
    }

    /// Loads a snapshot fixture from a JSON file on disk.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)
            .with_context(|| format!("failed to read snapshot {}", path.display()))?;
        Self::from_json_slice(&bytes)
            .with_context(|| format!("failed to parse snapshot {}", path.display()))
    }

    pub fn plant(&self, plant_id: &str) -> Option<&Plant> {
        self.plants.iter().find(|p| p.id == plant_id)
    }
}

/// Accepts string or integer ids; `null` becomes an empty id.
fn lenient_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        Value::Null => Ok(String::new()),
        other => Err(serde::de::Error::custom(format!(
            "expected a string or integer id, got {other}"
        ))),
    }
}

/// Free-form text; numbers are stringified, `null` and anything else become
/// an empty string.
fn lenient_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        _ => String::new(),
    })
}

fn lenient_optional_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

/// State and type enums. A string goes through the enum's own names and its
/// `#[serde(other)]` fallback; `null`, numbers and objects get the default
/// variant.
fn lenient_variant<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    Ok(match Value::deserialize(deserializer)? {
        value @ Value::String(_) => serde_json::from_value(value).unwrap_or_default(),
        _ => T::default(),
    })
}

fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::String(s) => parse_timestamp(&s),
        // Epoch milliseconds.
        Value::Number(n) => n
            .as_i64()
            .and_then(|ms| Utc.timestamp_millis_opt(ms).single()),
        _ => None,
    })
}

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
];

/// Parses the timestamp shapes the backend is known to emit, as UTC.
/// Returns `None` for anything else.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }

    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}
