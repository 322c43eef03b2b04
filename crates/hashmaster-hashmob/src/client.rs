//! HashMob.net API client
//!
//! The API key travels in an `api-key` header on every request; premium
//! listings and the founds submission require it.

use hashmaster_core::{ApiError, get_text, post_json};
use serde_json::{Value, json};

use crate::models::{Hashlist, HashlistKind};

/// Service name used in errors and logs
pub const SERVICE: &str = "HashMob";

pub const DEFAULT_URL: &str = "https://hashmob.net";

const API_KEY_HEADER: &str = "api-key";

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

    fn headers(&self) -> Vec<(&str, &str)> {
        if self.api_key.is_empty() {
            Vec::new()
        } else {
            vec![(API_KEY_HEADER, self.api_key.as_str())]
        }
    }

    fn get(&self, path: &str) -> Result<String, ApiError> {
        get_text(&format!("{}{path}", self.base_url), &self.headers())
    }

    /// One hashlist listing, each entry tagged with `kind`
    pub fn hashlists(&self, kind: HashlistKind) -> Result<Vec<Hashlist>, ApiError> {
        let body = self.get(kind.path())?;
        let mut lists = parse_listing(&body)?;
        for list in &mut lists {
            list.list_type = kind;
        }
        log::debug!("{SERVICE}: {} {kind} hashlists", lists.len());
        Ok(lists)
    }

    /// Listings of `kinds` concatenated, see [`select_hashlists`]
    pub fn hashlists_of(
        &self,
        kinds: &[HashlistKind],
        hash_type: Option<u32>,
    ) -> Result<Vec<Hashlist>, ApiError> {
        let mut lists = Vec::new();
        for &kind in kinds {
            lists.extend(self.hashlists(kind)?);
        }
        Ok(select_hashlists(lists, hash_type))
    }

    /// User, official and premium hashlists of `hash_type`
    pub fn all_hashlists(&self, hash_type: u32) -> Result<Vec<Hashlist>, ApiError> {
        self.hashlists_of(&HashlistKind::ALL, Some(hash_type))
    }

    /// Uncracked hashes of a hashlist, one per line
    pub fn left_hashes(&self, hashlist_id: u64) -> Result<String, ApiError> {
        self.get(&format!("/api/v2/hashlist/{hashlist_id}/left"))
    }

    /// Cracked `hash:plain` lines of a hashlist for one algorithm
    pub fn found_hashes(&self, hashlist_id: u64, hash_type: u32) -> Result<String, ApiError> {
        self.get(&format!("/api/v2/hashlist/{hashlist_id}/found/{hash_type}"))
    }

    /// Full hashlist record
    pub fn details(&self, hashlist_id: u64) -> Result<Value, ApiError> {
        let body = self.get(&format!("/api/v2/hashlist/{hashlist_id}"))?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Submit `hash:plain` lines for `hash_type`; returns the response text
    pub fn submit_founds(&self, founds: &str, hash_type: u32) -> Result<String, ApiError> {
        if self.api_key.is_empty() {
            return Err(ApiError::rejected(SERVICE, "submitting founds needs an API key"));
        }
        let payload = founds_payload(founds, hash_type);
        log::info!(
            "Submitting {} founds to {SERVICE} for algorithm {hash_type}",
            payload["founds"].as_array().map_or(0, Vec::len)
        );
        post_json(
            &format!("{}/api/v2/submit", self.base_url),
            &payload,
            &self.headers(),
        )
    }
}

/// Listings are arrays that may contain `null` placeholders
fn parse_listing(body: &str) -> Result<Vec<Hashlist>, ApiError> {
    let raw: Vec<Option<Hashlist>> = serde_json::from_str(body)?;
    Ok(raw.into_iter().flatten().collect())
}

/// Hashlists of `hash_type`, with `left_to_crack` filled in
pub fn filter_by_hash_type(lists: Vec<Hashlist>, hash_type: u32) -> Vec<Hashlist> {
    lists
        .into_iter()
        .filter(|list| list.hash_type == hash_type)
        .map(|mut list| {
            list.left_to_crack = list.remaining();
            list
        })
        .collect()
}

/// [`filter_by_hash_type`] when a mode is given, otherwise every list with
/// `left_to_crack` filled in
pub fn select_hashlists(lists: Vec<Hashlist>, hash_type: Option<u32>) -> Vec<Hashlist> {
    match hash_type {
        Some(mode) => filter_by_hash_type(lists, mode),
        None => lists
            .into_iter()
            .map(|mut list| {
                list.left_to_crack = list.remaining();
                list
            })
            .collect(),
    }
}

/// `{"algorithm": hash_type, "founds": [...]}` with one entry per non-blank line
pub fn founds_payload(founds: &str, hash_type: u32) -> Value {
    let lines: Vec<&str> = founds
        .lines()
        .map(|line| line.trim_end_matches('\r'))
        .filter(|line| !line.trim().is_empty())
        .collect();
    json!({
        "algorithm": hash_type,
        "founds": lines,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listing() -> Vec<Hashlist> {
        parse_listing(
            r#"[
                {"id": 1, "hash_type": 1000, "found_hashes": 40, "total_hashes": 100},
                null,
                {"id": 2, "hash_type": 0, "found_hashes": 1, "total_hashes": 2},
                {"id": 3, "hash_type": 1000, "found_hashes": 7, "total_hashes": 7}
            ]"#,
        )
        .unwrap()
    }

    #[test]
    fn nulls_in_listing_skipped() {
        assert_eq!(listing().len(), 3);
    }

    #[test]
    fn filter_computes_left_to_crack() {
        let lists = filter_by_hash_type(listing(), 1000);
        let summary: Vec<(u64, u64)> = lists.iter().map(|l| (l.id, l.left_to_crack)).collect();
        assert_eq!(summary, vec![(1, 60), (3, 0)]);
    }

    #[test]
    fn select_without_mode_keeps_all() {
        let lists = select_hashlists(listing(), None);
        let summary: Vec<(u64, u64)> = lists.iter().map(|l| (l.id, l.left_to_crack)).collect();
        assert_eq!(summary, vec![(1, 60), (2, 1), (3, 0)]);
        assert_eq!(select_hashlists(listing(), Some(0)).len(), 1);
    }

    #[test]
    fn payload_from_lines() {
        let payload = founds_payload(
            "539f58ccb6d2ec23f01a11090101da28:Working.Yeti2\r\n\n396059a932c697260648a193560c41a6:Sitocheader1\n",
            1000,
        );
        assert_eq!(
            payload,
            json!({
                "algorithm": 1000,
                "founds": [
                    "539f58ccb6d2ec23f01a11090101da28:Working.Yeti2",
                    "396059a932c697260648a193560c41a6:Sitocheader1"
                ]
            })
        );
    }

    #[test]
    fn api_key_header_only_when_set() {
        let anon = Client::new("https://hashmob.net/", "");
        assert!(anon.headers().is_empty());
        let keyed = Client::new("https://hashmob.net", "k");
        assert_eq!(keyed.headers(), vec![("api-key", "k")]);
    }

    #[test]
    fn submit_without_key_fails_fast() {
        let anon = Client::new("http://127.0.0.1:1", "");
        assert!(matches!(
            anon.submit_founds("a:b", 0),
            Err(ApiError::Rejected { .. })
        ));
    }
}
