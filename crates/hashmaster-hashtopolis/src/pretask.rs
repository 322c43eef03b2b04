//! Preconfigured tasks and task-definition import

use std::path::Path;

use anyhow::{Context, Result};
use hashmaster_core::ApiError;
use serde::Deserialize;
use serde_json::Value;

use crate::client::Client;
use crate::models::de;
use crate::request::Request;
use crate::task::{BenchmarkType, NewTask};

/// File reference inside an exported task definition
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskFile {
    pub file_id: u64,
    #[serde(default)]
    pub filename: String,
}

/// Task definition as exported by the Hashtopolis UI (`getTask` shape)
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskDefinition {
    pub name: String,
    pub attack: String,
    #[serde(default, deserialize_with = "de::u64_lenient")]
    pub chunksize: u64,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub benchmark_type: String,
    #[serde(default)]
    pub priority: i64,
    #[serde(default, deserialize_with = "de::u64_lenient")]
    pub max_agents: u64,
    #[serde(default, deserialize_with = "de::bool_lenient")]
    pub is_cpu_only: bool,
    #[serde(default, deserialize_with = "de::bool_lenient")]
    pub is_small: bool,
    #[serde(default)]
    pub static_chunking: Value,
    #[serde(default)]
    pub files: Vec<TaskFile>,
    #[serde(default, deserialize_with = "de::u64_lenient")]
    pub preprocessor_id: u64,
    #[serde(default)]
    pub preprocessor_command: String,
}

impl TaskDefinition {
    /// Parse an exported definition (UTF-16 with BOM, or UTF-8)
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let text = decode_text(bytes)?;
        serde_json::from_str(text.trim_start_matches('\u{feff}'))
            .context("Invalid task definition JSON")
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path)
            .with_context(|| format!("Failed to read task definition: {}", path.display()))?;
        Self::from_bytes(&bytes)
            .with_context(|| format!("Failed to parse task definition: {}", path.display()))
    }

    /// Static chunking mode: missing, empty, non-numeric or outside 0..=2 → 0
    pub fn static_chunking_mode(&self) -> u8 {
        match de::as_u64(&self.static_chunking) {
            Some(mode @ 0..=2) => mode as u8,
            _ => 0,
        }
    }

    /// New task for `hashlist_id`, named `{hashlist_id}_{name}`
    pub fn to_new_task(&self, hashlist_id: u64, cracker_version_id: u64) -> NewTask {
        let mut task = NewTask::new(
            format!("{hashlist_id}_{}", self.name),
            hashlist_id,
            self.attack.as_str(),
            cracker_version_id,
        );
        task.files = self.files.iter().map(|f| f.file_id).collect();
        task.cpu_only = self.is_cpu_only;
        task.small = self.is_small;
        task.priority = self.priority;
        task.max_agents = self.max_agents;
        task.chunk_size = self.chunksize;
        task.static_chunking = self.static_chunking_mode();
        task.benchmark = BenchmarkType::from_name(&self.benchmark_type);
        task.preprocessor_id = self.preprocessor_id;
        task.preprocessor_command = self.preprocessor_command.clone();
        task.color = self.color.clone();
        task
    }
}

/// Decode exported text: UTF-16 LE/BE by BOM, UTF-8 otherwise.
///
/// BOM-less input that is not valid UTF-8 is tried as UTF-16 LE.
pub fn decode_text(bytes: &[u8]) -> Result<String> {
    match bytes {
        [0xFF, 0xFE, rest @ ..] => decode_utf16(rest, u16::from_le_bytes),
        [0xFE, 0xFF, rest @ ..] => decode_utf16(rest, u16::from_be_bytes),
        _ => match std::str::from_utf8(bytes) {
            Ok(s) => Ok(s.to_string()),
            Err(_) => decode_utf16(bytes, u16::from_le_bytes),
        },
    }
}

fn decode_utf16(bytes: &[u8], unit: fn([u8; 2]) -> u16) -> Result<String> {
    anyhow::ensure!(bytes.len() % 2 == 0, "UTF-16 text has an odd number of bytes");
    let units: Vec<u16> = bytes
        .chunks_exact(2)
        .map(|pair| unit([pair[0], pair[1]]))
        .collect();
    String::from_utf16(&units).context("Invalid UTF-16 text")
}

impl Client {
    /// Create a task on `hashlist_id` from an exported task definition file
    pub fn import_task_definition(
        &self,
        path: &Path,
        hashlist_id: u64,
        cracker_version_id: u64,
    ) -> Result<u64> {
        let definition = TaskDefinition::from_file(path)?;
        let task = definition.to_new_task(hashlist_id, cracker_version_id);
        let task_id = self
            .create_task(&task)
            .with_context(|| format!("Failed to create task '{}'", task.name))?;
        Ok(task_id)
    }

    /// `pretask/setPretaskCpuOnly`
    pub fn set_pretask_cpu_only(&self, pretask_id: u64, cpu_only: bool) -> Result<(), ApiError> {
        self.submit(
            Request::new("pretask", "setPretaskCpuOnly")
                .with("pretaskId", pretask_id)
                .with("isCpuOnly", cpu_only),
        )?;
        Ok(())
    }

    /// `pretask/deletePretask`
    pub fn delete_pretask(&self, pretask_id: u64) -> Result<(), ApiError> {
        self.submit(Request::new("pretask", "deletePretask").with("pretaskId", pretask_id))?;
        Ok(())
    }
}
