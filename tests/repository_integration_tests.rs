//! Postgres adapter tests. They need a reachable database:
//! `DATABASE_URL=postgres://... cargo test -- --ignored`

use blog_guard::{
    AccountRepository, PostgresAccountRepository, StoreError, models::LocalAccount,
};
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

// --- Test Context and Setup ---

/// A simple structure to hold the database pool for testing
struct DbTestContext {
    pool: PgPool,
}

impl DbTestContext {
    async fn setup() -> Self {
        dotenv::dotenv().ok();

        let db_url = std::env::var("DATABASE_URL")
            .expect("DATABASE_URL must be set to run integration tests");

        let pool = PgPool::connect(&db_url)
            .await
            .expect("Failed to connect to database for integration tests.");

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .expect("Failed to run database migrations.");

        DbTestContext { pool }
    }

    fn repository(&self) -> PostgresAccountRepository {
        PostgresAccountRepository::new(self.pool.clone())
    }
}

// --- Test Data Helpers ---

/// Unique username per test run so tests do not trip over each other's rows.
fn test_account() -> LocalAccount {
    let id = Uuid::new_v4();
    LocalAccount::new(id, format!("user_{}", id.simple()), "hash".to_string())
}

// --- Tests ---

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn test_add_then_lookup_by_id_and_username() {
    let ctx = DbTestContext::setup().await;
    let repo = ctx.repository();
    let account = test_account();

    repo.add(account.clone()).await.unwrap();

    let by_id = repo.get_by_id(account.id).await.unwrap().unwrap();
    assert_eq!(by_id.username, account.username);
    assert_eq!(by_id.password_hash, "hash");

    let by_name = repo.find_by_username(&account.username).await.unwrap().unwrap();
    assert_eq!(by_name.id, account.id);

    let upper = account.username.to_uppercase();
    assert!(repo.find_by_username(&upper).await.unwrap().is_none());
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn test_duplicate_username_maps_to_store_error() {
    let ctx = DbTestContext::setup().await;
    let repo = ctx.repository();
    let account = test_account();
    repo.add(account.clone()).await.unwrap();

    let mut twin = test_account();
    twin.username = account.username.clone();

    assert!(matches!(repo.add(twin).await, Err(StoreError::Duplicate(_))));
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn test_update_overwrites_login_fields() {
    let ctx = DbTestContext::setup().await;
    let repo = ctx.repository();
    let mut account = test_account();
    repo.add(account.clone()).await.unwrap();

    account.last_login_ip = Some("203.0.113.5".to_string());
    account.last_login_at_utc = Some(Utc::now());
    account.password_hash = "rehashed".to_string();
    repo.update(account.clone()).await.unwrap();

    let stored = repo.get_by_id(account.id).await.unwrap().unwrap();
    assert_eq!(stored.last_login_ip.as_deref(), Some("203.0.113.5"));
    assert!(stored.last_login_at_utc.is_some());
    assert_eq!(stored.password_hash, "rehashed");
    assert!(repo.count().await.unwrap() >= 1);
}
