//! Unit tests for the in-memory credential store.

use crate::store::adapters::memory::InMemoryCredentialStore;
use crate::store::domain::{ConsumerKey, ConsumerRecord, StoreConfig, TokenKind, TokenRecord};
use crate::store::ports::{CredentialStore, StoreError};
use chrono::{TimeDelta, Utc};
use mockable::DefaultClock;
use rstest::{fixture, rstest};

#[fixture]
fn store() -> InMemoryCredentialStore {
    InMemoryCredentialStore::new()
}

fn consumer_key(value: &str) -> ConsumerKey {
    ConsumerKey::new(value).expect("key should validate")
}

fn consumer_record(key: &str) -> ConsumerRecord {
    ConsumerRecord::new(consumer_key(key), "secret", &DefaultClock).expect("record should validate")
}

fn token_record(token: &str, consumer: &str) -> TokenRecord {
    TokenRecord::new(
        token,
        "token-secret",
        consumer_key(consumer),
        TokenKind::Request,
        &DefaultClock,
    )
    .expect("record should validate")
}

// ── Consumer CRUD ──────────────────────────────────────────────────

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn add_and_read_back_a_consumer(store: InMemoryCredentialStore) {
    let record = consumer_record("consumer_a");
    store
        .add_consumer(&record)
        .await
        .expect("add should succeed");

    let found = store
        .consumer(record.key())
        .await
        .expect("lookup should succeed");

    assert_eq!(found, Some(record));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn duplicate_consumer_is_rejected(store: InMemoryCredentialStore) {
    let record = consumer_record("consumer_a");
    store
        .add_consumer(&record)
        .await
        .expect("first add should succeed");

    let duplicate = store.add_consumer(&record).await;
    assert!(matches!(duplicate, Err(StoreError::DuplicateConsumer(_))));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn update_replaces_an_existing_consumer(store: InMemoryCredentialStore) {
    let record = consumer_record("consumer_a");
    store
        .add_consumer(&record)
        .await
        .expect("add should succeed");

    let updated = record
        .clone()
        .with_callback_uri("https://example.test/callback");
    store
        .update_consumer(&updated)
        .await
        .expect("update should succeed");

    let found = store
        .consumer(record.key())
        .await
        .expect("lookup should succeed")
        .expect("consumer should exist");
    assert_eq!(found.callback_uri(), Some("https://example.test/callback"));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn update_of_a_missing_consumer_fails(store: InMemoryCredentialStore) {
    let result = store.update_consumer(&consumer_record("ghost")).await;
    assert!(matches!(result, Err(StoreError::UnknownConsumer(_))));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn removing_a_consumer_drops_its_tokens(store: InMemoryCredentialStore) {
    let record = consumer_record("consumer_a");
    store
        .add_consumer(&record)
        .await
        .expect("add should succeed");
    store
        .add_token(&token_record("tok_1", "consumer_a"))
        .await
        .expect("token add should succeed");

    store
        .remove_consumer(record.key())
        .await
        .expect("remove should succeed");

    assert_eq!(
        store.consumer(record.key()).await.expect("lookup works"),
        None
    );
    assert_eq!(store.token("tok_1").await.expect("lookup works"), None);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn removing_a_missing_consumer_fails(store: InMemoryCredentialStore) {
    let result = store.remove_consumer(&consumer_key("ghost")).await;
    assert!(matches!(result, Err(StoreError::UnknownConsumer(_))));
}

// ── Token lifecycle ────────────────────────────────────────────────

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn add_and_remove_a_token(store: InMemoryCredentialStore) {
    store
        .add_consumer(&consumer_record("consumer_a"))
        .await
        .expect("add should succeed");

    let record = token_record("tok_1", "consumer_a");
    store
        .add_token(&record)
        .await
        .expect("token add should succeed");

    let found = store
        .token("tok_1")
        .await
        .expect("lookup should succeed")
        .expect("token should exist");
    assert_eq!(found.kind(), TokenKind::Request);
    assert_eq!(found.consumer().as_str(), "consumer_a");

    store
        .remove_token("tok_1")
        .await
        .expect("remove should succeed");
    assert_eq!(store.token("tok_1").await.expect("lookup works"), None);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn token_for_an_unregistered_consumer_is_rejected(store: InMemoryCredentialStore) {
    let result = store.add_token(&token_record("tok_1", "ghost")).await;
    assert!(matches!(result, Err(StoreError::UnknownConsumer(_))));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn duplicate_token_is_rejected(store: InMemoryCredentialStore) {
    store
        .add_consumer(&consumer_record("consumer_a"))
        .await
        .expect("add should succeed");
    store
        .add_token(&token_record("tok_1", "consumer_a"))
        .await
        .expect("first token add should succeed");

    let duplicate = store.add_token(&token_record("tok_1", "consumer_a")).await;
    assert!(matches!(duplicate, Err(StoreError::DuplicateToken(_))));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn removing_a_missing_token_fails(store: InMemoryCredentialStore) {
    let result = store.remove_token("ghost").await;
    assert!(matches!(result, Err(StoreError::UnknownToken(_))));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn issued_tokens_are_stored_and_distinct(store: InMemoryCredentialStore) {
    store
        .add_consumer(&consumer_record("consumer_a"))
        .await
        .expect("add should succeed");

    let key = consumer_key("consumer_a");
    let first = store
        .issue_token(&key, TokenKind::Request)
        .expect("issuance should succeed");
    let second = store
        .issue_token(&key, TokenKind::Access)
        .expect("issuance should succeed");

    assert_ne!(first.token(), second.token());

    let found = store
        .token(first.token())
        .await
        .expect("lookup should succeed");
    assert_eq!(found, Some(first));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn issuing_for_an_unregistered_consumer_fails(store: InMemoryCredentialStore) {
    let result = store.issue_token(&consumer_key("ghost"), TokenKind::Request);
    assert!(matches!(result, Err(StoreError::UnknownConsumer(_))));
}

// ── Nonce admission ────────────────────────────────────────────────

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn fresh_nonce_is_admitted_once(store: InMemoryCredentialStore) {
    let key = consumer_key("consumer_a");
    let now = Utc::now();

    store
        .check_nonce(&key, "nonce_1", now)
        .await
        .expect("first presentation should be admitted");

    let replay = store.check_nonce(&key, "nonce_1", now).await;
    assert!(matches!(replay, Err(StoreError::NonceReused { .. })));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn same_nonce_for_different_consumers_is_admitted(store: InMemoryCredentialStore) {
    let now = Utc::now();

    store
        .check_nonce(&consumer_key("consumer_a"), "nonce_1", now)
        .await
        .expect("first consumer should be admitted");
    store
        .check_nonce(&consumer_key("consumer_b"), "nonce_1", now)
        .await
        .expect("second consumer should be admitted");
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn stale_timestamp_is_rejected(store: InMemoryCredentialStore) {
    let key = consumer_key("consumer_a");
    let stale = Utc::now() - TimeDelta::seconds(3600);

    let result = store.check_nonce(&key, "nonce_1", stale).await;
    assert!(matches!(result, Err(StoreError::StaleTimestamp { .. })));
}

// ── Configuration ──────────────────────────────────────────────────

#[rstest]
fn nonce_window_is_configurable() {
    let config = StoreConfig::new().with_option("nonce_window_secs", 60);
    let configured = InMemoryCredentialStore::from_config(&config).expect("config should apply");
    assert_eq!(configured.nonce_window(), TimeDelta::seconds(60));
}

#[rstest]
fn non_integer_nonce_window_is_rejected() {
    let config = StoreConfig::new().with_option("nonce_window_secs", "soon");
    let result = InMemoryCredentialStore::from_config(&config);
    assert!(matches!(result, Err(StoreError::InvalidConfig(_))));
}

#[rstest]
fn unrecognised_options_are_ignored() {
    let config = StoreConfig::new().with_option("dsn", "memory://");
    let result = InMemoryCredentialStore::from_config(&config);
    assert!(result.is_ok());
}
