//! Common error type for service API calls

/// Error from a single request/response exchange with one of the services.
///
/// Wraps transport and status failures ([`ApiError::Http`]), error payloads
/// the service returned with a 200 status ([`ApiError::Rejected`]), and
/// responses whose shape did not match what we expected.
#[derive(Debug)]
pub enum ApiError {
    /// HTTP error with optional status code (`None` = transport failure)
    Http {
        status: Option<u16>,
        message: String,
    },
    /// Service answered but reported an error in its payload
    Rejected {
        service: &'static str,
        message: String,
    },
    /// Response body could not be decoded into the expected shape
    Decode(String),
    /// Local I/O error (reading an upload, writing an error log)
    Io(std::io::Error),
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Http {
                status: Some(s),
                message,
            } => write!(f, "HTTP {s}: {message}"),
            Self::Http {
                status: None,
                message,
            } => write!(f, "HTTP error: {message}"),
            Self::Rejected { service, message } => write!(f, "{service} rejected request: {message}"),
            Self::Decode(msg) => write!(f, "unexpected response: {msg}"),
            Self::Io(e) => write!(f, "IO: {e}"),
        }
    }
}

impl std::error::Error for ApiError {}

impl ApiError {
    /// Create HTTP error from reqwest error.
    ///
    /// The URL is stripped because Hashes.com carries the API key as a query parameter.
    pub fn from_reqwest(e: reqwest::Error) -> Self {
        Self::Http {
            status: e.status().map(|s| s.as_u16()),
            message: e.without_url().to_string(),
        }
    }

    pub fn rejected(service: &'static str, message: impl Into<String>) -> Self {
        Self::Rejected {
            service,
            message: message.into(),
        }
    }

    /// HTTP status code, if the error came from a response
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => *status,
            _ => None,
        }
    }
}

impl From<std::io::Error> for ApiError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(e: serde_json::Error) -> Self {
        Self::Decode(e.to_string())
    }
}
