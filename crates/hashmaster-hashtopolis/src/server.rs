//! Server configuration and cracker binaries

use hashmaster_core::ApiError;
use serde_json::Value;

use crate::client::{Client, SERVICE};
use crate::models::{ConfigItem, CrackerInfo, de};
use crate::request::Request;

/// Cracker type id of hashcat on a default installation
pub const HASHCAT_CRACKER_TYPE: u64 = 1;

impl Client {
    /// `config/getConfig`: type and value of one config item
    pub fn get_server_config(&self, item: &str) -> Result<ConfigItem, ApiError> {
        self.submit_as(Request::new("config", "getConfig").with("configItem", item))
    }

    /// Numeric config item (`maxHashlistSize`, `chunktime`, `statustimer`, ...)
    pub fn server_config_u64(&self, item: &str) -> Result<u64, ApiError> {
        let config = self.get_server_config(item)?;
        de::as_u64(&config.value).ok_or_else(|| {
            ApiError::Decode(format!("{SERVICE} config {item} is not numeric: {}", config.value))
        })
    }

    /// Checkbox config item (`hashcatBrainEnable`, ...)
    pub fn server_config_flag(&self, item: &str) -> Result<bool, ApiError> {
        Ok(de::truthy(&self.get_server_config(item)?.value))
    }

    /// `config/listConfig`: every config item with its type
    pub fn list_server_config(&self) -> Result<Value, ApiError> {
        self.submit(Request::new("config", "listConfig"))
    }

    /// `cracker/getCracker`: all available hashcat versions
    pub fn get_cracker(&self) -> Result<CrackerInfo, ApiError> {
        self.submit_as(
            Request::new("cracker", "getCracker").with("crackerTypeId", HASHCAT_CRACKER_TYPE),
        )
    }
}
