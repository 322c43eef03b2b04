//! User-API request payloads
//!
//! Every call to the Hashtopolis user API is a JSON object with a
//! `section`, a `request` name, the access key, and request-specific fields.

use serde_json::{Map, Value};

/// Field name the server reads the access key from
pub const ACCESS_KEY_FIELD: &str = "accessKey";

/// A user-API request before the access key is attached.
#[derive(Debug, Clone)]
pub struct Request {
    section: &'static str,
    request: &'static str,
    fields: Map<String, Value>,
}

impl Request {
    pub fn new(section: &'static str, request: &'static str) -> Self {
        Self {
            section,
            request,
            fields: Map::new(),
        }
    }

    /// Add a request-specific field
    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.fields.insert(key.to_string(), value.into());
        self
    }

    pub fn section(&self) -> &'static str {
        self.section
    }

    pub fn name(&self) -> &'static str {
        self.request
    }

    /// Look up a field (tests and error logs)
    pub fn field(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Final JSON body sent to `/api/user.php`
    pub fn into_payload(self, access_key: &str) -> Value {
        let mut body = self.fields;
        body.insert("section".to_string(), Value::from(self.section));
        body.insert("request".to_string(), Value::from(self.request));
        body.insert(ACCESS_KEY_FIELD.to_string(), Value::from(access_key));
        Value::Object(body)
    }
}

/// Copy of a payload with the access key masked, for error logs.
pub fn redacted(payload: &Value) -> Value {
    let mut copy = payload.clone();
    if let Some(key) = copy.get_mut(ACCESS_KEY_FIELD) {
        *key = Value::from("***");
    }
    copy
}
