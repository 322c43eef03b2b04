//! Hashes.com API client
//!
//! All endpoints live under `{url}/en/api/`. Read endpoints take the key as
//! a `key` query parameter; the founds upload sends it as a form field.

use std::path::Path;

use anyhow::Context;
use chrono::{Duration, NaiveDateTime};
use hashmaster_core::{ApiError, get_text, post_form};
use reqwest::multipart::{Form, Part};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::models::{CurrencyTotals, Job, JobList, Profit, Upload, UploadList};

/// Service name used in errors and logs
pub const SERVICE: &str = "Hashes.com";

pub const DEFAULT_URL: &str = "https://hashes.com";

/// File name the founds upload is sent under
const FOUNDS_FILENAME: &str = "founds.txt";

/// Hashes.com account connection.
#[derive(Debug, Clone)]
pub struct Client {
    base_url: String,
    api_key: String,
}

impl Client {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }

    fn endpoint(&self, name: &str) -> String {
        format!("{}/en/api/{name}", self.base_url)
    }

    fn get<T: DeserializeOwned>(&self, name: &str) -> Result<T, ApiError> {
        let url = format!("{}?key={}", self.endpoint(name), self.api_key);
        let body = get_text(&url, &[])?;
        let value = check_success(&body)?;
        Ok(serde_json::from_value(value)?)
    }

    /// Open jobs for `algorithm_id`, optionally created at or after
    /// `created_after` and paying at least `min_price_usd` per hash
    pub fn jobs(
        &self,
        algorithm_id: u32,
        created_after: Option<NaiveDateTime>,
        min_price_usd: Option<f64>,
    ) -> Result<Vec<Job>, ApiError> {
        let list: JobList = self.get("jobs")?;
        let total = list.list.len();
        let jobs = filter_jobs(list.list, algorithm_id, created_after, min_price_usd);
        log::debug!("{SERVICE}: {} of {total} jobs match algorithm {algorithm_id}", jobs.len());
        Ok(jobs)
    }

    /// Upload a founds file (`hash:plain` lines) for `algorithm_id`.
    ///
    /// Returns the service's response text verbatim.
    pub fn submit_founds(&self, path: &Path, algorithm_id: u32) -> anyhow::Result<String> {
        let contents = std::fs::read(path)
            .with_context(|| format!("Failed to read founds file: {}", path.display()))?;
        log::info!(
            "Submitting {} ({} bytes) to {SERVICE} for algorithm {algorithm_id}",
            path.display(),
            contents.len()
        );
        let form = Form::new()
            .text("key", self.api_key.clone())
            .text("algo", algorithm_id.to_string())
            .part("userfile", Part::bytes(contents).file_name(FOUNDS_FILENAME));
        let response = post_form(&self.endpoint("founds"), form)
            .with_context(|| format!("{SERVICE} founds upload failed"))?;
        Ok(response)
    }

    /// Every founds upload on the account
    pub fn upload_history(&self) -> Result<Vec<Upload>, ApiError> {
        let list: UploadList = self.get("uploads")?;
        Ok(list.list)
    }

    /// Lifetime earnings per currency
    pub fn profit(&self) -> Result<CurrencyTotals, ApiError> {
        let profit: Profit = self.get("profit")?;
        Ok(profit.currency)
    }
}

/// Require `"success": true`; otherwise surface the `error` field
fn check_success(body: &str) -> Result<Value, ApiError> {
    let value: Value = serde_json::from_str(body)?;
    if value.get("success").and_then(Value::as_bool) == Some(true) {
        return Ok(value);
    }
    let message = value
        .get("error")
        .and_then(Value::as_str)
        .unwrap_or("request failed without an error message");
    Err(ApiError::rejected(SERVICE, message))
}

/// Jobs for `algorithm_id`, optionally no older than `created_after` and no
/// cheaper than `min_price_usd`. Jobs with an unparseable date are dropped
/// when a date filter is given.
pub fn filter_jobs(
    jobs: Vec<Job>,
    algorithm_id: u32,
    created_after: Option<NaiveDateTime>,
    min_price_usd: Option<f64>,
) -> Vec<Job> {
    jobs.into_iter()
        .filter(|job| job.algorithm_id == algorithm_id)
        .filter(|job| match created_after {
            Some(after) => job.created().is_some_and(|created| created >= after),
            None => true,
        })
        .filter(|job| min_price_usd.map_or(true, |min| job.price_per_hash_usd >= min))
        .collect()
}

/// Uploads made within `days` days of `now`; `days == 0` keeps everything
pub fn filter_last_days(uploads: Vec<Upload>, days: u32, now: NaiveDateTime) -> Vec<Upload> {
    if days == 0 {
        return uploads;
    }
    let cutoff = now - Duration::days(i64::from(days));
    uploads
        .into_iter()
        .filter(|u| u.uploaded().is_some_and(|date| date >= cutoff))
        .collect()
}
