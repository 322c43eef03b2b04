//! Integration tests for hashmaster-hashtopolis
//!
//! These tests need a live Hashtopolis server and are marked #[ignore].
//! Point them at a throwaway instance:
//!   HASHTOPOLIS_URL=http://localhost:8080 HASHTOPOLIS_API_KEY=... \
//!     cargo test -p hashmaster-hashtopolis --test integration -- --ignored

use std::io::Write;

use hashmaster_core::ProgressContext;
use hashmaster_hashtopolis::{Client, NewHashlist};

fn client() -> Client {
    let url = std::env::var("HASHTOPOLIS_URL").expect("HASHTOPOLIS_URL not set");
    let key = std::env::var("HASHTOPOLIS_API_KEY").expect("HASHTOPOLIS_API_KEY not set");
    Client::new(url, key)
}

/// Run with: cargo test -p hashmaster-hashtopolis --test integration -- --ignored server_config
#[test]
#[ignore]
fn server_config() {
    let client = client();
    let max = client
        .server_config_u64("maxHashlistSize")
        .expect("maxHashlistSize should be readable");
    assert!(max > 0, "maxHashlistSize should be positive, got {max}");

    let cracker = client.get_cracker().expect("hashcat cracker should exist");
    assert!(!cracker.cracker_versions.is_empty(), "hashcat has no versions");
}

/// Create a hashlist, import one known plain into it, read it back, delete it.
#[test]
#[ignore]
fn hashlist_roundtrip() {
    let client = client();
    // MD5("password")
    let hash = "5f4dcc3b5aa765d61d8327deb882cf99";
    let id = client
        .create_hashlist(&NewHashlist::new("hashmaster-it", 0, format!("{hash}\n")))
        .expect("create should succeed");

    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "{hash}:password").unwrap();
    file.flush().unwrap();

    let progress = ProgressContext::new();
    let summary = client
        .import_cracked_file(id, file.path(), 1, &progress)
        .expect("import should succeed");
    assert_eq!(summary.chunks_submitted, 1);
    assert_eq!(summary.totals.lines_processed, 1);
    assert_eq!(summary.totals.new_cracked, 1);

    let cracked = client.cracked_hashes(id).expect("getCracked should succeed");
    assert_eq!(cracked.len(), 1);
    assert_eq!(cracked[0].plain, "password");

    client.delete_hashlist(id).expect("delete should succeed");
}

#[test]
#[ignore]
fn bad_key_is_rejected() {
    let url = std::env::var("HASHTOPOLIS_URL").expect("HASHTOPOLIS_URL not set");
    let client = Client::new(url, "definitely-not-a-key");
    let err = client.list_hashlists().expect_err("invalid key must fail");
    assert!(
        matches!(err, hashmaster_core::ApiError::Rejected { .. }),
        "expected rejection, got {err:?}"
    );
}
