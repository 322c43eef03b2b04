//! Integration tests for hashmaster-hashmob
//!
//! These tests require network access and are marked #[ignore] by default.
//! Run with: cargo test -p hashmaster-hashmob --test integration -- --ignored

use hashmaster_hashmob::{Client, DEFAULT_URL, HashlistKind};

/// Official listing is public
#[test]
#[ignore]
fn official_hashlists() {
    let client = Client::new(DEFAULT_URL, std::env::var("HASHMOB_API_KEY").unwrap_or_default());
    let lists = client
        .hashlists(HashlistKind::Official)
        .expect("official listing should load");
    assert!(!lists.is_empty(), "no official hashlists");
    assert!(lists.iter().all(|l| l.list_type == HashlistKind::Official));
}

#[test]
#[ignore]
fn details_of_first_official_list() {
    let client = Client::new(DEFAULT_URL, std::env::var("HASHMOB_API_KEY").unwrap_or_default());
    let lists = client.hashlists(HashlistKind::Official).unwrap();
    let details = client.details(lists[0].id).expect("details should load");
    assert_eq!(details["id"].as_u64(), Some(lists[0].id));
}

#[test]
#[ignore]
fn all_ntlm_hashlists() {
    let client = Client::new(DEFAULT_URL, std::env::var("HASHMOB_API_KEY").unwrap_or_default());
    let lists = client.all_hashlists(1000).expect("listings should load");
    assert!(lists.iter().all(|l| l.hash_type == 1000));
    assert!(lists.iter().all(|l| l.left_to_crack == l.remaining()));
}
