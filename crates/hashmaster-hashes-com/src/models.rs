//! Hashes.com response types

use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer, Serialize};

/// Timestamp format used throughout the API (server local time)
pub const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Amounts arrive as decimal strings ("0.00595300"), sometimes as numbers
pub(crate) fn f64_lenient<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Num(f64),
        Str(String),
        Null,
    }
    match Raw::deserialize(deserializer)? {
        Raw::Num(n) => Ok(n),
        Raw::Str(s) if s.trim().is_empty() => Ok(0.0),
        Raw::Str(s) => s
            .trim()
            .parse()
            .map_err(|_| serde::de::Error::custom(format!("invalid amount: {s:?}"))),
        Raw::Null => Ok(0.0),
    }
}

fn parse_date(s: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s, DATE_FORMAT).ok()
}

/// Open escrow job
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: u64,
    pub created_at: String,
    #[serde(default)]
    pub last_update: String,
    #[serde(default)]
    pub algorithm_name: String,
    pub algorithm_id: u32,
    #[serde(default)]
    pub total_hashes: u64,
    #[serde(default)]
    pub found_hashes: u64,
    #[serde(default)]
    pub left_hashes: u64,
    #[serde(default)]
    pub currency: String,
    #[serde(default, deserialize_with = "f64_lenient")]
    pub price_per_hash: f64,
    #[serde(default, deserialize_with = "f64_lenient")]
    pub price_per_hash_usd: f64,
    #[serde(default)]
    pub max_cracks_needed: u64,
    /// Server path of the unfound hashes file
    #[serde(default)]
    pub left_list: String,
}

impl Job {
    pub fn created(&self) -> Option<NaiveDateTime> {
        parse_date(&self.created_at)
    }
}

/// Entry of the founds upload history
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Upload {
    pub id: u64,
    #[serde(default, deserialize_with = "f64_lenient")]
    pub btc: f64,
    #[serde(default, deserialize_with = "f64_lenient")]
    pub xmr: f64,
    #[serde(default, deserialize_with = "f64_lenient")]
    pub ltc: f64,
    pub date: String,
    #[serde(default)]
    pub total_hashes: u64,
    #[serde(default)]
    pub valid_hashes: u64,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub algorithm: String,
    #[serde(default)]
    pub algorithm_id: u32,
}

impl Upload {
    pub fn uploaded(&self) -> Option<NaiveDateTime> {
        parse_date(&self.date)
    }
}

/// Crypto amounts per payout currency
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize, Serialize)]
pub struct CurrencyTotals {
    #[serde(rename = "BTC", default, deserialize_with = "f64_lenient")]
    pub btc: f64,
    #[serde(rename = "XMR", default, deserialize_with = "f64_lenient")]
    pub xmr: f64,
    #[serde(rename = "LTC", default, deserialize_with = "f64_lenient")]
    pub ltc: f64,
}

impl CurrencyTotals {
    /// Sum of the payouts of `uploads`
    pub fn of(uploads: &[Upload]) -> Self {
        uploads.iter().fold(Self::default(), |acc, u| Self {
            btc: acc.btc + u.btc,
            xmr: acc.xmr + u.xmr,
            ltc: acc.ltc + u.ltc,
        })
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct JobList {
    #[serde(default)]
    pub list: Vec<Job>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct UploadList {
    #[serde(default)]
    pub list: Vec<Upload>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Profit {
    pub currency: CurrencyTotals,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn job_from_api_json() {
        let job: Job = serde_json::from_str(
            r#"{
                "id": 5, "createdAt": "2023-01-19 18:06:19", "lastUpdate": "2023-01-19 19:21:10",
                "algorithmName": "MD5", "algorithmId": 0, "totalHashes": 1, "foundHashes": 0,
                "leftHashes": 1, "currency": "XMR", "pricePerHash": "0.00595300",
                "pricePerHashUsd": "1.000", "maxCracksNeeded": 1,
                "leftList": "/unfound/5-1674174070-a97166c4-unfound.txt"
            }"#,
        )
        .unwrap();
        assert_eq!(job.algorithm_id, 0);
        assert!((job.price_per_hash - 0.005953).abs() < 1e-12);
        assert!((job.price_per_hash_usd - 1.0).abs() < 1e-12);
        assert_eq!(
            job.created().unwrap().to_string(),
            "2023-01-19 18:06:19"
        );
    }

    #[test]
    fn amounts_accept_numbers_and_blanks() {
        let u: Upload = serde_json::from_str(
            r#"{"id": 1, "btc": 0.5, "xmr": "", "ltc": null, "date": "2024-09-10 21:49:28"}"#,
        )
        .unwrap();
        assert_eq!(u.btc, 0.5);
        assert_eq!(u.xmr, 0.0);
        assert_eq!(u.ltc, 0.0);
    }

    #[test]
    fn bad_amount_is_an_error() {
        let r: Result<Upload, _> =
            serde_json::from_str(r#"{"id": 1, "btc": "lots", "date": "x"}"#);
        assert!(r.is_err());
    }

    #[test]
    fn totals_sum_uploads() {
        let uploads: Vec<Upload> = serde_json::from_str(
            r#"[
                {"id": 512142, "btc": "0.0000011305", "xmr": "0", "ltc": "0.0000095", "date": "2024-09-10 21:49:28"},
                {"id": 524342, "btc": "0.0000770165", "xmr": "0", "ltc": "0.00022857", "date": "2024-10-03 10:49:58"}
            ]"#,
        )
        .unwrap();
        let totals = CurrencyTotals::of(&uploads);
        assert!((totals.btc - 0.000078147).abs() < 1e-12);
        assert_eq!(totals.xmr, 0.0);
        assert!((totals.ltc - 0.00023807).abs() < 1e-12);
    }
}
