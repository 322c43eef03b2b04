//! HashMob.net hashlist types

use serde::{Deserialize, Deserializer, Serialize};

/// Which hashlist listing an entry came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HashlistKind {
    #[default]
    User,
    Official,
    Premium,
}

impl HashlistKind {
    pub const ALL: [Self; 3] = [Self::User, Self::Official, Self::Premium];

    /// Listing path below the server root
    pub fn path(self) -> &'static str {
        match self {
            Self::User => "/api/v2/hashlist",
            Self::Official => "/api/v2/hashlist/official",
            Self::Premium => "/api/v2/hashlist/premium",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Official => "official",
            Self::Premium => "premium",
        }
    }
}

impl std::fmt::Display for HashlistKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `hash_type` is a number on hashlists but a string inside `algorithms`
fn u32_lenient<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Num(u32),
        Str(String),
    }
    match Raw::deserialize(deserializer)? {
        Raw::Num(n) => Ok(n),
        Raw::Str(s) => s
            .trim()
            .parse()
            .map_err(|_| serde::de::Error::custom(format!("invalid hash type: {s:?}"))),
    }
}

/// Missing or `null` both read as the type's default
fn null_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Per-algorithm breakdown of a hashlist
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HashlistAlgorithm {
    #[serde(default, deserialize_with = "null_default")]
    pub algorithm: String,
    #[serde(deserialize_with = "u32_lenient")]
    pub hash_type: u32,
    #[serde(default, deserialize_with = "null_default")]
    pub found: u64,
}

/// Hashlist as returned by the listing endpoints
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Hashlist {
    pub id: u64,
    #[serde(default, deserialize_with = "null_default")]
    pub name: String,
    #[serde(deserialize_with = "u32_lenient")]
    pub hash_type: u32,
    #[serde(default, deserialize_with = "null_default")]
    pub found_hashes: u64,
    #[serde(default, deserialize_with = "null_default")]
    pub total_hashes: u64,
    #[serde(default, deserialize_with = "null_default")]
    pub progress: f64,
    #[serde(default, deserialize_with = "null_default")]
    pub visibility: u8,
    #[serde(default, deserialize_with = "null_default")]
    pub created_at: String,
    #[serde(default, deserialize_with = "null_default")]
    pub updated_at: String,
    #[serde(default, deserialize_with = "null_default")]
    pub official: u8,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default, deserialize_with = "null_default")]
    pub algorithms: Vec<HashlistAlgorithm>,
    #[serde(default)]
    pub creator_name: Option<String>,
    #[serde(default)]
    pub algorithm: Option<String>,
    /// Listing the entry was fetched from
    #[serde(skip_deserializing)]
    pub list_type: HashlistKind,
    /// Hashes still uncracked (`total_hashes - found_hashes`)
    #[serde(skip_deserializing)]
    pub left_to_crack: u64,
}

impl Hashlist {
    pub fn remaining(&self) -> u64 {
        self.total_hashes.saturating_sub(self.found_hashes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LISTING: &str = r#"[
      {
        "id": 1155,
        "name": "The Ancient Greek villager database",
        "hash_type": 120,
        "found_hashes": 1258900,
        "total_hashes": 3512235,
        "progress": 100,
        "visibility": 2,
        "created_at": "2021-05-11T09:20:16.000000Z",
        "updated_at": "2021-06-04T22:56:41.000000Z",
        "official": 1,
        "notes": "sha1($pepper.$pass.$salt)",
        "algorithms": [
          {"algorithm": "sha1($salt.$pass)", "hash_type": "120", "found": 1258900}
        ],
        "creator_name": "Alexander The Great",
        "algorithm": "sha1($salt.$pass)"
      }
    ]"#;

    #[test]
    fn listing_parses() {
        let lists: Vec<Hashlist> = serde_json::from_str(LISTING).unwrap();
        assert_eq!(lists.len(), 1);
        let list = &lists[0];
        assert_eq!(list.hash_type, 120);
        assert_eq!(list.algorithms[0].hash_type, 120);
        assert_eq!(list.list_type, HashlistKind::User);
        assert_eq!(list.remaining(), 2253335);
    }

    #[test]
    fn remaining_never_underflows() {
        let list: Hashlist = serde_json::from_str(
            r#"{"id": 1, "hash_type": 0, "found_hashes": 10, "total_hashes": 3}"#,
        )
        .unwrap();
        assert_eq!(list.remaining(), 0);
    }

    #[test]
    fn null_counts_read_as_zero() {
        let list: Hashlist = serde_json::from_str(
            r#"{"id": 7, "name": null, "hash_type": "1000", "found_hashes": null,
                "total_hashes": 50, "progress": null, "visibility": null,
                "official": null, "created_at": null, "algorithms": null}"#,
        )
        .unwrap();
        assert_eq!(list.found_hashes, 0);
        assert_eq!(list.total_hashes, 50);
        assert_eq!(list.progress, 0.0);
        assert_eq!(list.official, 0);
        assert!(list.name.is_empty());
        assert!(list.algorithms.is_empty());
        assert_eq!(list.remaining(), 50);
    }

    #[test]
    fn kind_paths() {
        assert_eq!(HashlistKind::User.path(), "/api/v2/hashlist");
        assert_eq!(HashlistKind::Premium.path(), "/api/v2/hashlist/premium");
        assert_eq!(HashlistKind::Official.to_string(), "official");
    }

    #[test]
    fn list_type_serializes_lowercase() {
        let mut lists: Vec<Hashlist> = serde_json::from_str(LISTING).unwrap();
        lists[0].list_type = HashlistKind::Official;
        let json = serde_json::to_value(&lists[0]).unwrap();
        assert_eq!(json["list_type"], serde_json::Value::from("official"));
    }
}
