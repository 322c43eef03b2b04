//! Server-side files (wordlists, rules) and agents

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use hashmaster_core::{ApiError, get_text};
use serde_json::Value;

use crate::client::Client;
use crate::hashlist::DEFAULT_ACCESS_GROUP;
use crate::models::{AgentList, AgentSummary, FileDetails, FileList, FileSummary};
use crate::request::Request;

impl Client {
    /// `file/listFiles`
    pub fn list_files(&self) -> Result<Vec<FileSummary>, ApiError> {
        let list: FileList = self.submit_as(Request::new("file", "listFiles"))?;
        Ok(list.files)
    }

    /// `file/getFile`: metadata and a download path
    pub fn get_file(&self, file_id: u64) -> Result<FileDetails, ApiError> {
        self.submit_as(Request::new("file", "getFile").with("fileId", file_id))
    }

    /// Fetch a file's contents through the download path from `getFile`
    pub fn download_file(&self, file_id: u64) -> Result<String, ApiError> {
        let details = self.get_file(file_id)?;
        let url = format!("{}/{}", self.base_url(), details.url.trim_start_matches('/'));
        log::info!("Downloading {} ({} bytes)", details.filename, details.size);
        get_text(&url, &[])
    }

    /// `file/addFile` with inline (base64) content as a wordlist (`fileType` 0)
    pub fn upload_file(&self, filename: &str, contents: &[u8]) -> Result<(), ApiError> {
        self.submit(
            Request::new("file", "addFile")
                .with("filename", filename)
                .with("fileType", 0)
                .with("source", "inline")
                .with("accessGroupId", DEFAULT_ACCESS_GROUP)
                .with("data", STANDARD.encode(contents)),
        )?;
        Ok(())
    }

    /// `file/deleteFile`
    pub fn delete_file(&self, file_id: u64) -> Result<(), ApiError> {
        self.submit(Request::new("file", "deleteFile").with("fileId", file_id))?;
        Ok(())
    }

    /// `file/setSecret` false on every file; returns how many were updated
    pub fn set_all_files_not_secret(&self) -> Result<usize, ApiError> {
        let files = self.list_files()?;
        for file in &files {
            self.submit(
                Request::new("file", "setSecret")
                    .with("fileId", file.file_id)
                    .with("isSecret", false),
            )?;
            log::debug!("{} is no longer secret", file.filename);
        }
        Ok(files.len())
    }

    /// `agent/listAgents`
    pub fn list_agents(&self) -> Result<Vec<AgentSummary>, ApiError> {
        let list: AgentList = self.submit_as(Request::new("agent", "listAgents"))?;
        Ok(list.agents)
    }

    /// `agent/get`: full agent settings
    pub fn get_agent(&self, agent_id: u64) -> Result<Value, ApiError> {
        self.submit(Request::new("agent", "get").with("agentId", agent_id))
    }

    /// `agent/setExtraParams`: extra command line passed to the cracker
    pub fn set_agent_extra_params(&self, agent_id: u64, params: &str) -> Result<(), ApiError> {
        self.submit(
            Request::new("agent", "setExtraParams")
                .with("extraParameters", params)
                .with("agentId", agent_id),
        )?;
        Ok(())
    }

    /// `agent/setActive`
    pub fn set_agent_active(&self, agent_id: u64, active: bool) -> Result<(), ApiError> {
        self.submit(
            Request::new("agent", "setActive")
                .with("active", active)
                .with("agentId", agent_id),
        )?;
        Ok(())
    }
}
