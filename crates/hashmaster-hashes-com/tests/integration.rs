//! Integration tests for hashmaster-hashes-com
//!
//! These tests require network access and are marked #[ignore] by default.
//! Run with: cargo test -p hashmaster-hashes-com --test integration -- --ignored
//! Account tests additionally need HASHES_COM_API_KEY.

use hashmaster_hashes_com::{Client, Currency, DEFAULT_URL, Kraken};

fn client() -> Client {
    let key = std::env::var("HASHES_COM_API_KEY").expect("HASHES_COM_API_KEY not set");
    Client::new(DEFAULT_URL, key)
}

/// Live BTC price from Kraken
#[test]
#[ignore]
fn kraken_btc_price() {
    let kraken = Kraken::default();
    let price = kraken
        .price(Currency::Btc)
        .expect("ticker request should succeed")
        .expect("BTC has a USD price");
    assert!(price > 1000.0, "implausible BTC price: {price}");
}

#[test]
#[ignore]
fn ntlm_jobs() {
    let jobs = client().jobs(1000, None, None).expect("jobs should load");
    assert!(jobs.iter().all(|j| j.algorithm_id == 1000));
}

#[test]
#[ignore]
fn history_and_profit() {
    let client = client();
    let uploads = client.upload_history().expect("history should load");
    for upload in &uploads {
        assert!(upload.uploaded().is_some(), "bad date: {}", upload.date);
    }
    let profit = client.profit().expect("profit should load");
    assert!(profit.btc >= 0.0);
}
