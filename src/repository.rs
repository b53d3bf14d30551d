use crate::{error::StoreError, models::LocalAccount};
use async_trait::async_trait;
use sqlx::PgPool;
use std::{collections::HashMap, sync::Arc};
use tokio::sync::RwLock;
use uuid::Uuid;

/// AccountRepository Trait
///
/// The abstract contract the account service needs from persistence. Handlers and
/// services only ever see `Arc<dyn AccountRepository>`, so the Postgres store and the
/// in-memory store are interchangeable.
///
/// Unlike a "best effort" repository, every method surfaces store failures as
/// `StoreError`; the caller decides what to do with them.
///
/// **Send + Sync + async_trait** are required for the trait object to cross task boundaries.
#[async_trait]
pub trait AccountRepository: Send + Sync {
    async fn get_by_id(&self, id: Uuid) -> Result<Option<LocalAccount>, StoreError>;

    /// Exact, case-sensitive match on the stored username. No normalization is applied.
    async fn find_by_username(&self, username: &str) -> Result<Option<LocalAccount>, StoreError>;

    async fn add(&self, account: LocalAccount) -> Result<(), StoreError>;

    /// Whole-record overwrite, last writer wins.
    async fn update(&self, account: LocalAccount) -> Result<(), StoreError>;

    async fn count(&self) -> Result<i64, StoreError>;
}

/// RepositoryState
///
/// The shared handle to whichever store was configured at startup.
pub type RepositoryState = Arc<dyn AccountRepository>;

/// PostgresAccountRepository
///
/// `AccountRepository` backed by the `local_account` table (see `migrations/`).
/// Queries are bound at runtime so the crate builds without a live database.
pub struct PostgresAccountRepository {
    pool: PgPool,
}

impl PostgresAccountRepository {
    /// Creates a new repository instance using the initialized connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const SELECT_ACCOUNT: &str = r#"
    SELECT id, username, password_hash, created_at_utc, last_login_ip, last_login_at_utc
    FROM local_account
"#;

#[async_trait]
impl AccountRepository for PostgresAccountRepository {
    async fn get_by_id(&self, id: Uuid) -> Result<Option<LocalAccount>, StoreError> {
        let account = sqlx::query_as::<_, LocalAccount>(&format!("{SELECT_ACCOUNT} WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(account)
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<LocalAccount>, StoreError> {
        let account =
            sqlx::query_as::<_, LocalAccount>(&format!("{SELECT_ACCOUNT} WHERE username = $1"))
                .bind(username)
                .fetch_optional(&self.pool)
                .await?;
        Ok(account)
    }

    /// add
    ///
    /// Inserts a new account. The unique index on `username` is the store-level
    /// duplicate guard; a violation is mapped to `StoreError::Duplicate`.
    async fn add(&self, account: LocalAccount) -> Result<(), StoreError> {
        let result = sqlx::query(
            r#"INSERT INTO local_account
                (id, username, password_hash, created_at_utc, last_login_ip, last_login_at_utc)
               VALUES ($1, $2, $3, $4, $5, $6)"#,
        )
        .bind(account.id)
        .bind(&account.username)
        .bind(&account.password_hash)
        .bind(account.created_at_utc)
        .bind(&account.last_login_ip)
        .bind(account.last_login_at_utc)
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(()),
            Err(sqlx::Error::Database(db)) if db.is_unique_violation() => {
                Err(StoreError::Duplicate(account.username))
            }
            Err(e) => {
                tracing::error!("add account error: {:?}", e);
                Err(e.into())
            }
        }
    }

    async fn update(&self, account: LocalAccount) -> Result<(), StoreError> {
        sqlx::query(
            r#"UPDATE local_account
               SET username = $2, password_hash = $3, last_login_ip = $4, last_login_at_utc = $5
               WHERE id = $1"#,
        )
        .bind(account.id)
        .bind(&account.username)
        .bind(&account.password_hash)
        .bind(&account.last_login_ip)
        .bind(account.last_login_at_utc)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("update account error: {:?}", e);
            StoreError::from(e)
        })?;
        Ok(())
    }

    async fn count(&self) -> Result<i64, StoreError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM local_account")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

/// InMemoryAccountRepository
///
/// Process-local store used by the test suite and by local runs without `DATABASE_URL`.
/// Mirrors the Postgres schema's unique-username constraint.
///
/// `writes` counts successful `add`/`update` calls so tests can assert that an
/// operation did not touch the store.
#[derive(Default)]
pub struct InMemoryAccountRepository {
    accounts: RwLock<HashMap<Uuid, LocalAccount>>,
    writes: std::sync::atomic::AtomicUsize,
    /// When true, every call fails with `StoreError::Unavailable`.
    pub should_fail: bool,
}

impl InMemoryAccountRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn new_failing() -> Self {
        Self {
            should_fail: true,
            ..Self::default()
        }
    }

    pub fn write_count(&self) -> usize {
        self.writes.load(std::sync::atomic::Ordering::SeqCst)
    }

    fn check(&self) -> Result<(), StoreError> {
        if self.should_fail {
            return Err(StoreError::Unavailable(
                "in-memory store configured to fail".to_string(),
            ));
        }
        Ok(())
    }

    fn record_write(&self) {
        self.writes.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
    }
}

#[async_trait]
impl AccountRepository for InMemoryAccountRepository {
    async fn get_by_id(&self, id: Uuid) -> Result<Option<LocalAccount>, StoreError> {
        self.check()?;
        Ok(self.accounts.read().await.get(&id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<LocalAccount>, StoreError> {
        self.check()?;
        let accounts = self.accounts.read().await;
        Ok(accounts.values().find(|a| a.username == username).cloned())
    }

    async fn add(&self, account: LocalAccount) -> Result<(), StoreError> {
        self.check()?;
        let mut accounts = self.accounts.write().await;
        if accounts.values().any(|a| a.username == account.username) {
            return Err(StoreError::Duplicate(account.username));
        }
        accounts.insert(account.id, account);
        self.record_write();
        Ok(())
    }

    async fn update(&self, account: LocalAccount) -> Result<(), StoreError> {
        self.check()?;
        self.accounts.write().await.insert(account.id, account);
        self.record_write();
        Ok(())
    }

    async fn count(&self) -> Result<i64, StoreError> {
        self.check()?;
        Ok(self.accounts.read().await.len() as i64)
    }
}
