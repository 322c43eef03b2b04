//! Blocking HTTP helpers over a shared async client.
//!
//! Uses async reqwest internally on a shared tokio runtime, but presents a
//! sync interface: every service call is a single request/response and the
//! CLI runs them one after another.

use std::sync::{LazyLock, OnceLock};
use std::time::Duration;

use crate::error::ApiError;

/// Timeouts applied to the shared client.
#[derive(Debug, Clone, Copy)]
pub struct HttpConfig {
    /// Whole-request timeout (a bulk-import chunk can take minutes server-side)
    pub timeout: Duration,
    /// TCP/TLS connect timeout
    pub connect_timeout: Duration,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(300),
            connect_timeout: Duration::from_secs(30),
        }
    }
}

static HTTP_CONFIG: OnceLock<HttpConfig> = OnceLock::new();

/// Install the HTTP settings. Must be called before the first request;
/// later calls are ignored.
pub fn set_http_config(config: HttpConfig) {
    if HTTP_CONFIG.set(config).is_err() {
        log::debug!("HTTP config already initialized, ignoring override");
    }
}

/// Current HTTP settings (defaults if never set).
pub fn http_config() -> HttpConfig {
    *HTTP_CONFIG.get_or_init(HttpConfig::default)
}

/// Shared async HTTP client with connection pooling.
static SHARED_CLIENT: LazyLock<reqwest::Client> = LazyLock::new(|| {
    let config = http_config();
    reqwest::Client::builder()
        .connect_timeout(config.connect_timeout)
        .timeout(config.timeout)
        .user_agent(concat!("hashmaster/", env!("CARGO_PKG_VERSION")))
        .build()
        .expect("failed to build HTTP client")
});

/// Get shared HTTP client.
pub fn http_client() -> &'static reqwest::Client {
    &SHARED_CLIENT
}

/// Shared tokio runtime for HTTP operations.
pub static SHARED_RUNTIME: LazyLock<tokio::runtime::Runtime> = LazyLock::new(|| {
    tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()
        .expect("failed to build tokio runtime")
});

/// Send a prepared request and return the body text of a 2xx response.
///
/// Non-2xx responses become [`ApiError::Http`] carrying the body, which is
/// where all three services put their error description.
fn send(request: reqwest::RequestBuilder) -> Result<String, ApiError> {
    SHARED_RUNTIME.handle().block_on(async {
        let response = request.send().await.map_err(ApiError::from_reqwest)?;
        let status = response.status();
        let body = response.text().await.map_err(ApiError::from_reqwest)?;
        if status.is_success() {
            Ok(body)
        } else {
            Err(ApiError::Http {
                status: Some(status.as_u16()),
                message: body,
            })
        }
    })
}

fn with_headers(
    mut request: reqwest::RequestBuilder,
    headers: &[(&str, &str)],
) -> reqwest::RequestBuilder {
    for (name, value) in headers {
        request = request.header(*name, *value);
    }
    request
}

/// HTTP GET returning the response body as text
pub fn get_text(url: &str, headers: &[(&str, &str)]) -> Result<String, ApiError> {
    log::debug!("GET {}", redact_query(url));
    send(with_headers(http_client().get(url), headers))
}

/// HTTP POST of a JSON body (`Content-Type: application/json`)
pub fn post_json(
    url: &str,
    body: &serde_json::Value,
    headers: &[(&str, &str)],
) -> Result<String, ApiError> {
    log::debug!("POST {}", redact_query(url));
    send(with_headers(http_client().post(url).json(body), headers))
}

/// HTTP POST of a multipart form
pub fn post_form(url: &str, form: reqwest::multipart::Form) -> Result<String, ApiError> {
    log::debug!("POST (multipart) {}", redact_query(url));
    send(http_client().post(url).multipart(form))
}

/// Drop the query string so keys passed as `?key=` never reach the logs
fn redact_query(url: &str) -> &str {
    url.split_once('?').map_or(url, |(base, _)| base)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_timeouts() {
        let config = HttpConfig::default();
        assert_eq!(config.timeout, Duration::from_secs(300));
        assert_eq!(config.connect_timeout, Duration::from_secs(30));
    }

    #[test]
    fn redact_query_strips_key() {
        assert_eq!(
            redact_query("https://hashes.com/en/api/jobs?key=secret"),
            "https://hashes.com/en/api/jobs"
        );
    }

    #[test]
    fn redact_query_without_query() {
        assert_eq!(
            redact_query("http://10.0.0.1/api/user.php"),
            "http://10.0.0.1/api/user.php"
        );
    }
}
