//! Postgres integration tests.
//!
//! These need a live database: point `LINKCUT_TEST_DATABASE_DSN` at one and
//! run with `cargo test -- --ignored`. Each run uses process-unique URLs so
//! repeated runs against the same database do not collide.

use linkcut_core::{BaseUrl, Storage, StorageError};
use linkcut_storage::PostgresStorage;

struct Fixture {
    storage: PostgresStorage,
    run_id: String,
}

impl Fixture {
    async fn start() -> Self {
        let dsn = std::env::var("LINKCUT_TEST_DATABASE_DSN")
            .expect("LINKCUT_TEST_DATABASE_DSN must point at a test database");
        let base_url = BaseUrl::new("http://localhost:8080/").unwrap();

        let storage = PostgresStorage::connect(base_url, &dsn).await;
        storage.bootstrap().await.expect("schema bootstrap");

        Self {
            storage,
            run_id: format!("{}", std::process::id()),
        }
    }

    fn url(&self, name: &str) -> String {
        format!("https://{}.{}.example", name, self.run_id)
    }
}

#[tokio::test]
#[ignore = "needs a live postgres database"]
async fn add_and_search_round_trip() {
    let fixture = Fixture::start().await;
    let url = fixture.url("round-trip");

    let short = fixture.storage.add_url(&url, "").await.unwrap();
    let id: i64 = short
        .rsplit('/')
        .next()
        .unwrap()
        .parse()
        .expect("short url ends in a decimal id");

    assert_eq!(fixture.storage.search_url(id).await.unwrap(), url);
}

#[tokio::test]
#[ignore = "needs a live postgres database"]
async fn resubmission_returns_existing_short_url() {
    let fixture = Fixture::start().await;
    let url = fixture.url("idempotent");

    let first = fixture.storage.add_url(&url, "").await.unwrap();
    let second = fixture.storage.add_url(&url, "").await.unwrap();

    assert_eq!(first, second);
}

#[tokio::test]
#[ignore = "needs a live postgres database"]
async fn search_unknown_id_is_not_found() {
    let fixture = Fixture::start().await;

    let err = fixture.storage.search_url(1).await.unwrap_err();
    assert!(matches!(err, StorageError::NotFound(1)));
}

#[tokio::test]
#[ignore = "needs a live postgres database"]
async fn urls_for_user_lists_in_creation_order() {
    let fixture = Fixture::start().await;
    let user = format!("u-{}", fixture.run_id);

    let first = fixture.url("user-a");
    let second = fixture.url("user-b");
    fixture.storage.add_url(&first, &user).await.unwrap();
    fixture.storage.add_url(&second, &user).await.unwrap();

    let urls = fixture.storage.urls_for_user(&user).await.unwrap();
    assert_eq!(urls.len(), 2);
    assert_eq!(urls[0].original_url, first);
    assert_eq!(urls[1].original_url, second);
}

#[tokio::test]
#[ignore = "needs a live postgres database"]
async fn urls_for_unknown_user_is_no_content() {
    let fixture = Fixture::start().await;

    let err = fixture
        .storage
        .urls_for_user("nobody-in-particular")
        .await
        .unwrap_err();
    assert!(matches!(err, StorageError::NoContent(_)));
}

#[tokio::test]
#[ignore = "needs a live postgres database"]
async fn ping_round_trips() {
    let fixture = Fixture::start().await;

    fixture.storage.ping().await.unwrap();
}

#[tokio::test]
#[ignore = "needs a live postgres database"]
async fn bootstrap_is_idempotent() {
    let fixture = Fixture::start().await;

    fixture.storage.bootstrap().await.unwrap();
    fixture.storage.ping().await.unwrap();
}
