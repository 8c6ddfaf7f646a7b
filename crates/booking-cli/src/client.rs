//! Blocking client for the events REST API.
//!
//! Every endpoint wraps its payload as `{ "data": ... }`. A failed request is
//! returned as an error: callers must not treat it as "no conflicts".

use anyhow::{Context, Result};
use chrono::NaiveDate;
use reqwest::blocking::Client;
use serde::de::DeserializeOwned;
use tracing::{debug, info};

use booking_engine::model::{ApiEnvelope, AvailabilityRecord, Department, Event, LocationAvailability};

use crate::config::Config;

pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(config: &Config) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self {
            client,
            base_url: config.api_url.clone(),
        })
    }

    fn get<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);
        debug!(%url, "GET");

        let envelope: ApiEnvelope<T> = self
            .client
            .get(&url)
            .query(query)
            .send()
            .with_context(|| format!("Request to {} failed", url))?
            .error_for_status()
            .with_context(|| format!("{} returned an error status", url))?
            .json()
            .with_context(|| format!("Unexpected response body from {}", url))?;

        Ok(envelope.data)
    }

    /// The full, unfiltered event collection.
    pub fn events(&self) -> Result<Vec<Event>> {
        let events: Vec<Event> = self.get("/events", &[]).context("Failed to fetch events")?;
        info!(count = events.len(), "fetched events");
        Ok(events)
    }

    pub fn visible_departments(&self) -> Result<Vec<Department>> {
        self.get("/departments/visible", &[])
            .context("Failed to fetch departments")
    }

    /// Per-date availability records a department declared for `[start, end]`.
    pub fn department_availability(
        &self,
        department_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<AvailabilityRecord>> {
        let path = format!("/resource-availability/department/{}/availability", department_id);
        let query = [
            ("startDate", start.format("%Y-%m-%d").to_string()),
            ("endDate", end.format("%Y-%m-%d").to_string()),
        ];
        self.get(&path, &query)
            .with_context(|| format!("Failed to fetch availability for department {}", department_id))
    }

    pub fn location_availability(&self) -> Result<Vec<LocationAvailability>> {
        self.get("/location-availability", &[])
            .context("Failed to fetch location availability")
    }
}
