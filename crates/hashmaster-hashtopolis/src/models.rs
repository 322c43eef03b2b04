//! Typed views of user-API responses
//!
//! Hashtopolis is inconsistent about numbers: some counters arrive as JSON
//! numbers, others as numeric strings. The `de` helpers accept both.

use serde::{Deserialize, Serialize};
use serde_json::Value;

pub(crate) mod de {
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    /// Interpret a config value or flag the way PHP does: non-zero, "1", "true"
    pub fn truthy(value: &Value) -> bool {
        match value {
            Value::Bool(b) => *b,
            Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
            Value::String(s) => matches!(s.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"),
            _ => false,
        }
    }

    pub fn as_u64(value: &Value) -> Option<u64> {
        match value {
            Value::Number(n) => n.as_u64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    pub fn u64_lenient<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
        let value = Value::deserialize(deserializer)?;
        match value {
            Value::Null => Ok(0),
            other => as_u64(&other)
                .ok_or_else(|| serde::de::Error::custom(format!("expected integer, got {other}"))),
        }
    }

    pub fn bool_lenient<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
        Ok(truthy(&Value::deserialize(deserializer)?))
    }
}

/// Entry of `listHashlists` / `listSuperhashlists`
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HashlistSummary {
    pub hashlist_id: u64,
    pub hashtype_id: u32,
    pub name: String,
    #[serde(default)]
    pub format: u32,
    #[serde(default, deserialize_with = "de::u64_lenient")]
    pub hash_count: u64,
}

#[derive(Debug, Deserialize)]
pub(crate) struct HashlistList {
    #[serde(default)]
    pub hashlists: Vec<HashlistSummary>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SuperhashlistList {
    #[serde(default)]
    pub superhashlists: Vec<HashlistSummary>,
}

/// One cracked hash from `getCracked`
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CrackedHash {
    pub hash: String,
    #[serde(default)]
    pub plain: String,
    #[serde(default, deserialize_with = "de::u64_lenient")]
    pub crackpos: u64,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CrackedList {
    #[serde(default)]
    pub cracked: Vec<CrackedHash>,
}

/// Task kind reported by `listTasks`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskKind {
    Task,
    Supertask,
}

/// Entry of `listTasks`; normal tasks carry `taskId`, supertasks `supertaskId`
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskSummary {
    pub task_id: Option<u64>,
    pub supertask_id: Option<u64>,
    pub name: String,
    #[serde(rename = "type", default)]
    pub kind_code: u8,
    #[serde(default)]
    pub hashlist_id: u64,
    #[serde(default)]
    pub priority: i64,
}

impl TaskSummary {
    pub fn kind(&self) -> TaskKind {
        if self.kind_code == 1 {
            TaskKind::Supertask
        } else {
            TaskKind::Task
        }
    }

    /// Task id for tasks, taskwrapper id for supertasks
    pub fn id(&self) -> u64 {
        self.task_id.or(self.supertask_id).unwrap_or_default()
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct TaskList {
    #[serde(default)]
    pub tasks: Vec<TaskSummary>,
}

/// Entry of `listSupertasks`
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SupertaskSummary {
    pub supertask_id: u64,
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SupertaskList {
    #[serde(default)]
    pub supertasks: Vec<SupertaskSummary>,
}

/// Entry of `listFiles`
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileSummary {
    pub file_id: u64,
    #[serde(default)]
    pub file_type: u8,
    pub filename: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct FileList {
    #[serde(default)]
    pub files: Vec<FileSummary>,
}

/// Response of `getFile`
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileDetails {
    pub file_id: u64,
    #[serde(default)]
    pub file_type: u8,
    pub filename: String,
    #[serde(default, deserialize_with = "de::bool_lenient")]
    pub is_secret: bool,
    #[serde(default, deserialize_with = "de::u64_lenient")]
    pub size: u64,
    /// Download path relative to the server root, e.g. `getFile.php?file=1&apiKey=…`
    pub url: String,
}

/// Entry of `listAgents`
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentSummary {
    pub agent_id: u64,
    pub name: String,
    #[serde(default)]
    pub devices: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AgentList {
    #[serde(default)]
    pub agents: Vec<AgentSummary>,
}

/// Response of `getConfig`
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigItem {
    pub item: String,
    #[serde(default)]
    pub config_type: String,
    pub value: Value,
}

/// One installed cracker version from `getCracker`
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CrackerVersion {
    pub version_id: u64,
    pub version: String,
    #[serde(default)]
    pub download_url: String,
    #[serde(default)]
    pub binary_basename: String,
}

/// Response of `getCracker`
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CrackerInfo {
    pub cracker_type_id: u64,
    pub cracker_type_name: String,
    #[serde(default)]
    pub cracker_versions: Vec<CrackerVersion>,
}

/// Response of `exportLeft` / `generateWordlist`: the server-side file created
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedFile {
    pub file_id: u64,
    #[serde(default)]
    pub filename: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn truthy_variants() {
        assert!(de::truthy(&json!(true)));
        assert!(de::truthy(&json!(1)));
        assert!(de::truthy(&json!("1")));
        assert!(de::truthy(&json!("true")));
        assert!(!de::truthy(&json!("0")));
        assert!(!de::truthy(&json!(0)));
        assert!(!de::truthy(&json!("")));
        assert!(!de::truthy(&Value::Null));
    }

    #[test]
    fn hashlist_list_parses() {
        let body = json!({
            "section": "hashlist",
            "request": "listHashlists",
            "response": "OK",
            "hashlists": [
                {"hashlistId": 1, "hashtypeId": 0, "name": "Hashcat Example", "format": 0, "hashCount": 6494},
                {"hashlistId": 4, "hashtypeId": 6242, "name": "truecrypt test", "format": 2, "hashCount": "1"}
            ]
        });
        let list: HashlistList = serde_json::from_value(body).unwrap();
        assert_eq!(list.hashlists.len(), 2);
        assert_eq!(list.hashlists[1].hash_count, 1);
        assert_eq!(list.hashlists[1].format, 2);
    }

    #[test]
    fn cracked_crackpos_as_string() {
        let body = json!({"cracked": [
            {"hash": "098f6bcd4621d373cade4e832627b4f6", "plain": "test", "crackpos": "634721"}
        ]});
        let list: CrackedList = serde_json::from_value(body).unwrap();
        assert_eq!(list.cracked[0].plain, "test");
        assert_eq!(list.cracked[0].crackpos, 634_721);
    }

    #[test]
    fn task_summary_ids() {
        let body = json!({"tasks": [
            {"taskId": 7587, "name": "test 2", "type": 0, "hashlistId": 1, "priority": 5},
            {"supertaskId": 33, "name": "Increment ?a", "type": 1, "hashlistId": 1, "priority": 3}
        ]});
        let list: TaskList = serde_json::from_value(body).unwrap();
        assert_eq!(list.tasks[0].id(), 7587);
        assert_eq!(list.tasks[0].kind(), TaskKind::Task);
        assert_eq!(list.tasks[1].id(), 33);
        assert_eq!(list.tasks[1].kind(), TaskKind::Supertask);
    }

    #[test]
    fn file_details_parse() {
        let body = json!({
            "fileId": 1, "fileType": 0, "filename": "example.dict",
            "isSecret": true, "size": 1080240, "url": "getFile.php?file=1&apiKey=mykey"
        });
        let file: FileDetails = serde_json::from_value(body).unwrap();
        assert!(file.is_secret);
        assert_eq!(file.size, 1_080_240);
    }

    #[test]
    fn cracker_info_parse() {
        let body = json!({
            "crackerTypeId": 1,
            "crackerTypeName": "hashcat",
            "crackerVersions": [
                {"versionId": 1, "version": "4.1.0", "downloadUrl": "https://hashcat.net/files/hashcat-4.1.0.7z", "binaryBasename": "hashcat"}
            ]
        });
        let info: CrackerInfo = serde_json::from_value(body).unwrap();
        assert_eq!(info.cracker_versions[0].version, "4.1.0");
    }
}
