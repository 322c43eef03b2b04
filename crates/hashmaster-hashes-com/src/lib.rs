//! HashMaster Hashes.com - client for the Hashes.com escrow API
//!
//! Lists paid jobs, uploads found hashes, reads the upload history and
//! profit, and converts the crypto payouts to USD through Kraken's public
//! ticker.

pub mod client;
pub mod kraken;
pub mod models;

// Re-exports for convenience
pub use client::{Client, DEFAULT_URL, SERVICE, filter_jobs, filter_last_days};
pub use kraken::{Currency, Kraken, format_usd};
pub use models::{CurrencyTotals, Job, Upload};
