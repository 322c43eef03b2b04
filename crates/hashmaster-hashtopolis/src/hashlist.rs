//! Hashlists and superhashlists

use std::collections::BTreeSet;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use hashmaster_core::ApiError;
use serde_json::Value;

use crate::algorithms;
use crate::client::{Client, SERVICE};
use crate::models::{CrackedHash, CrackedList, CreatedFile, HashlistList, HashlistSummary, SuperhashlistList};
use crate::request::Request;

/// Access group every created object is assigned to
pub const DEFAULT_ACCESS_GROUP: u64 = 1;

/// Brain features: 3 = send hashed passwords and attack positions
pub const BRAIN_FEATURES: u8 = 3;

/// Parameters of a new hashlist.
#[derive(Debug, Clone)]
pub struct NewHashlist {
    pub name: String,
    /// Hashcat mode
    pub hash_type: u32,
    /// Raw hashlist text, one hash per line
    pub data: String,
    pub is_secret: bool,
    pub is_salted: bool,
    pub is_hex_salt: bool,
    pub separator: String,
    /// 0 = text, 1 = hccapx, 2 = binary
    pub format: u8,
}

impl NewHashlist {
    pub fn new(name: impl Into<String>, hash_type: u32, data: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            hash_type,
            data: data.into(),
            is_secret: false,
            is_salted: false,
            is_hex_salt: false,
            separator: ":".to_string(),
            format: 0,
        }
    }

    /// Line count as the server measures it (newline characters)
    pub fn line_count(&self) -> usize {
        self.data.bytes().filter(|&b| b == b'\n').count()
    }

    pub(crate) fn to_request(&self, use_brain: bool) -> Request {
        Request::new("hashlist", "createHashlist")
            .with("name", self.name.as_str())
            .with("isSalted", self.is_salted)
            .with("isSecret", self.is_secret)
            .with("isHexSalt", self.is_hex_salt)
            .with("separator", self.separator.as_str())
            .with("format", self.format)
            .with("hashtypeId", self.hash_type)
            .with("accessGroupId", DEFAULT_ACCESS_GROUP)
            .with("data", STANDARD.encode(self.data.as_bytes()))
            .with("useBrain", use_brain)
            .with("brainFeatures", BRAIN_FEATURES)
    }
}

/// Brain only makes sense when the server has it on and the mode is slow
pub(crate) fn wants_brain(brain_enabled: bool, hash_type: u32) -> bool {
    brain_enabled && algorithms::is_slow(hash_type)
}

impl Client {
    /// `hashlist/createHashlist`, returning the new hashlist id.
    ///
    /// Refuses lists longer than the server's `maxHashlistSize` before uploading.
    pub fn create_hashlist(&self, hashlist: &NewHashlist) -> Result<u64, ApiError> {
        let max_lines = self.server_config_u64("maxHashlistSize")?;
        let lines = hashlist.line_count() as u64;
        if lines > max_lines {
            return Err(ApiError::rejected(
                SERVICE,
                format!("hashlist has {lines} lines, the maximum size is {max_lines} lines"),
            ));
        }

        let use_brain = wants_brain(
            self.server_config_flag("hashcatBrainEnable")?,
            hashlist.hash_type,
        );
        log::info!(
            "Creating hashlist '{}' (mode {}, {lines} lines, brain: {use_brain})",
            hashlist.name,
            hashlist.hash_type
        );
        let response = self.submit(hashlist.to_request(use_brain))?;
        response
            .get("hashlistId")
            .and_then(Value::as_u64)
            .ok_or_else(|| ApiError::Decode("createHashlist response without hashlistId".into()))
    }

    /// `hashlist/listHashlists`: active hashlists (superhashlists excluded)
    pub fn list_hashlists(&self) -> Result<Vec<HashlistSummary>, ApiError> {
        let list: HashlistList = self.submit_as(Request::new("hashlist", "listHashlists"))?;
        Ok(list.hashlists)
    }

    /// `hashlist/listHashlists` with `isArchived`
    pub fn list_archived_hashlists(&self) -> Result<Vec<HashlistSummary>, ApiError> {
        let list: HashlistList = self.submit_as(
            Request::new("hashlist", "listHashlists").with("isArchived", "true"),
        )?;
        Ok(list.hashlists)
    }

    /// Active and archived hashlists together
    pub fn all_hashlists(&self) -> Result<Vec<HashlistSummary>, ApiError> {
        let mut hashlists = self.list_hashlists()?;
        hashlists.extend(self.list_archived_hashlists()?);
        Ok(hashlists)
    }

    /// `hashlist/getCracked`
    pub fn cracked_hashes(&self, hashlist_id: u64) -> Result<Vec<CrackedHash>, ApiError> {
        let list: CrackedList = self.submit_as(
            Request::new("hashlist", "getCracked").with("hashlistId", hashlist_id),
        )?;
        Ok(list.cracked)
    }

    /// `hashlist/exportLeft`: server writes the uncracked hashes to a new file
    pub fn export_left(&self, hashlist_id: u64) -> Result<CreatedFile, ApiError> {
        self.submit_as(Request::new("hashlist", "exportLeft").with("hashlistId", hashlist_id))
    }

    /// `hashlist/generateWordlist`: server writes the cracked plains to a new file
    pub fn generate_wordlist(&self, hashlist_id: u64) -> Result<CreatedFile, ApiError> {
        self.submit_as(
            Request::new("hashlist", "generateWordlist").with("hashlistId", hashlist_id),
        )
    }

    /// `hashlist/deleteHashlist`
    pub fn delete_hashlist(&self, hashlist_id: u64) -> Result<(), ApiError> {
        self.submit(Request::new("hashlist", "deleteHashlist").with("hashlistId", hashlist_id))?;
        Ok(())
    }

    /// Every distinct non-empty plaintext cracked on the server, sorted
    pub fn known_plaintexts(&self) -> Result<Vec<String>, ApiError> {
        let hashlists = self.all_hashlists()?;
        let mut plains = BTreeSet::new();
        for hashlist in &hashlists {
            let cracked = self.cracked_hashes(hashlist.hashlist_id)?;
            log::debug!("{}: {} cracked", hashlist.name, cracked.len());
            plains.extend(cracked.into_iter().map(|c| c.plain));
        }
        plains.remove("");
        Ok(plains.into_iter().collect())
    }

    /// `superhashlist/createSuperhashlist`
    pub fn create_superhashlist(&self, name: &str, hashlist_ids: &[u64]) -> Result<(), ApiError> {
        self.submit(
            Request::new("superhashlist", "createSuperhashlist")
                .with("name", name)
                .with("hashlists", hashlist_ids.to_vec()),
        )?;
        Ok(())
    }

    /// `superhashlist/listSuperhashlists`
    pub fn list_superhashlists(&self) -> Result<Vec<HashlistSummary>, ApiError> {
        let list: SuperhashlistList =
            self.submit_as(Request::new("superhashlist", "listSuperhashlists"))?;
        Ok(list.superhashlists)
    }

    /// `superhashlist/deleteSuperhashlist`
    pub fn delete_superhashlist(&self, superhashlist_id: u64) -> Result<(), ApiError> {
        self.submit(
            Request::new("superhashlist", "deleteSuperhashlist")
                .with("superhashlistId", superhashlist_id),
        )?;
        Ok(())
    }
}
