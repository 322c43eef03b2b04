//! Hashtopolis user-API client

use std::path::{Path, PathBuf};

use hashmaster_core::{ApiError, post_json};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::request::{Request, redacted};

/// Service name used in errors and logs
pub const SERVICE: &str = "Hashtopolis";

/// Connection to one Hashtopolis server.
#[derive(Debug, Clone)]
pub struct Client {
    base_url: String,
    access_key: String,
    error_log_dir: Option<PathBuf>,
}

impl Client {
    /// `base_url` is the server root, e.g. `http://10.100.100.200:80`
    pub fn new(base_url: impl Into<String>, access_key: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            access_key: access_key.into(),
            error_log_dir: None,
        }
    }

    /// Write a log file for every failed request into `dir`
    pub fn with_error_log_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.error_log_dir = Some(dir.into());
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn api_url(&self) -> String {
        format!("{}/api/user.php", self.base_url)
    }

    /// Send a request and return the full response object.
    ///
    /// Succeeds only on HTTP 200 with `"response": "OK"` in the body.
    pub fn submit(&self, request: Request) -> Result<Value, ApiError> {
        let label = format!("{}/{}", request.section(), request.name());
        let payload = request.into_payload(&self.access_key);
        log::debug!("{SERVICE} {label}");

        let result = post_json(&self.api_url(), &payload, &[]).and_then(|body| check_response(&body));
        if let Err(e) = &result {
            log::error!("{SERVICE} {label} failed: {e}");
            if let Some(dir) = &self.error_log_dir {
                match write_error_log(dir, e, &payload) {
                    Ok(path) => log::error!("  error log: {}", path.display()),
                    Err(io) => log::warn!("could not write error log: {io}"),
                }
            }
        }
        result
    }

    /// Send a request and decode the response into `T`
    pub fn submit_as<T: DeserializeOwned>(&self, request: Request) -> Result<T, ApiError> {
        let value = self.submit(request)?;
        Ok(serde_json::from_value(value)?)
    }
}

/// Validate a user-API response body.
pub(crate) fn check_response(body: &str) -> Result<Value, ApiError> {
    let value: Value = serde_json::from_str(body)
        .map_err(|e| ApiError::Decode(format!("{e} in body: {}", truncate(body, 200))))?;
    match value.get("response").and_then(Value::as_str) {
        Some("OK") => Ok(value),
        _ => {
            let message = value
                .get("message")
                .and_then(Value::as_str)
                .map_or_else(|| body.to_string(), str::to_string);
            Err(ApiError::rejected(SERVICE, message))
        }
    }
}

fn truncate(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

/// Dump a failed exchange to `hashtopolis_submit_request_error_log_<epoch>.txt`
fn write_error_log(dir: &Path, error: &ApiError, payload: &Value) -> std::io::Result<PathBuf> {
    let now = chrono::Utc::now();
    let path = dir.join(format!(
        "hashtopolis_submit_request_error_log_{}.{:06}.txt",
        now.timestamp(),
        now.timestamp_subsec_micros()
    ));
    let status = error
        .status()
        .map_or_else(|| "n/a".to_string(), |s| s.to_string());
    let text = match error {
        ApiError::Http { message, .. } | ApiError::Rejected { message, .. } => message.clone(),
        other => other.to_string(),
    };
    let contents = format!(
        "Status: {status}\nText: {text}\nJSONData: {}\n",
        redacted(payload)
    );
    std::fs::write(&path, contents)?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_trailing_slash_trimmed() {
        let client = Client::new("http://10.100.100.200:80/", "key");
        assert_eq!(client.api_url(), "http://10.100.100.200:80/api/user.php");
    }

    #[test]
    fn ok_response_passes_through() {
        let body = r#"{"section":"hashlist","request":"createHashlist","response":"OK","hashlistId":198}"#;
        let value = check_response(body).unwrap();
        assert_eq!(value["hashlistId"], 198);
    }

    #[test]
    fn error_response_carries_message() {
        let body = r#"{"section":"hashlist","request":"createHashlist","response":"ERROR","message":"Invalid hashlist format!"}"#;
        match check_response(body) {
            Err(ApiError::Rejected { service, message }) => {
                assert_eq!(service, "Hashtopolis");
                assert_eq!(message, "Invalid hashlist format!");
            }
            other => panic!("expected rejection, got {other:?}"),
        }
    }

    #[test]
    fn missing_response_field_is_rejected() {
        assert!(matches!(
            check_response(r#"{"foo":1}"#),
            Err(ApiError::Rejected { .. })
        ));
    }

    #[test]
    fn non_json_is_decode_error() {
        assert!(matches!(
            check_response("<html>502 Bad Gateway</html>"),
            Err(ApiError::Decode(_))
        ));
    }

    #[test]
    fn error_log_is_written_without_key() {
        let dir = tempfile::tempdir().unwrap();
        let payload = Request::new("hashlist", "getCracked")
            .with("hashlistId", 1)
            .into_payload("topsecret");
        let err = ApiError::Http {
            status: Some(500),
            message: "boom".to_string(),
        };
        let path = write_error_log(dir.path(), &err, &payload).unwrap();
        let contents = std::fs::read_to_string(path).unwrap();
        assert!(contents.starts_with("Status: 500\nText: boom\nJSONData: "));
        assert!(!contents.contains("topsecret"));
    }
}
