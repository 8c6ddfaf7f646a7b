//! Where events, department catalogs and availability records come from:
//! local JSON files, or the events API.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;

use booking_engine::model::{AvailabilityRecord, Department, Event, LocationAvailability};

use crate::client::ApiClient;

pub enum Source {
    Files {
        events: PathBuf,
        departments: Option<PathBuf>,
        records: Option<PathBuf>,
    },
    Api(ApiClient),
}

/// Files may hold the bare array or the API's `{ "data": [...] }` envelope.
#[derive(Deserialize)]
#[serde(untagged)]
enum Listing<T> {
    Enveloped { data: Vec<T> },
    Bare(Vec<T>),
}

fn read_listing<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read file: {}", path.display()))?;
    let listing: Listing<T> = serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse JSON in {}", path.display()))?;
    Ok(match listing {
        Listing::Enveloped { data } => data,
        Listing::Bare(items) => items,
    })
}

impl Source {
    pub fn events(&self) -> Result<Vec<Event>> {
        match self {
            Source::Files { events, .. } => read_listing(events),
            Source::Api(client) => client.events(),
        }
    }

    pub fn departments(&self) -> Result<Vec<Department>> {
        match self {
            Source::Files {
                departments: Some(path),
                ..
            } => read_listing(path),
            Source::Files { departments: None, .. } => {
                anyhow::bail!("--departments <FILE> is required when reading events from a file")
            }
            Source::Api(client) => client.visible_departments(),
        }
    }

    /// The department whose name or id equals `key`.
    pub fn department(&self, key: &str) -> Result<Department> {
        self.departments()?
            .into_iter()
            .find(|d| d.name == key || d.id == key)
            .with_context(|| format!("Unknown department: {}", key))
    }

    /// Availability records of `department` for `date`. Missing records are not
    /// an error for file input; catalog totals apply instead.
    pub fn records(&self, department: &Department, date: NaiveDate) -> Result<Vec<AvailabilityRecord>> {
        match self {
            Source::Files { records: Some(path), .. } => read_listing(path),
            Source::Files { records: None, .. } => {
                debug!(department = %department.name, "no availability records file; using catalog totals");
                Ok(Vec::new())
            }
            Source::Api(client) => client.department_availability(&department.id, date, date),
        }
    }

    pub fn locations(&self) -> Result<Vec<LocationAvailability>> {
        match self {
            Source::Files { .. } => {
                anyhow::bail!("location availability is only served by the events API")
            }
            Source::Api(client) => client.location_availability(),
        }
    }
}
