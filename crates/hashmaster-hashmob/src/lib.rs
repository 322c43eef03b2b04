//! HashMaster HashMob - client for the HashMob.net v2 API
//!
//! Lists community hashlists (user, official and premium), downloads their
//! left and found hashes, and submits founds.

pub mod client;
pub mod models;

// Re-exports for convenience
pub use client::{
    Client, DEFAULT_URL, SERVICE, filter_by_hash_type, founds_payload, select_hashlists,
};
pub use models::{Hashlist, HashlistAlgorithm, HashlistKind};
