use chrono::Utc;
use uuid::Uuid;

use crate::{
    audit::AuditState,
    error::AccountError,
    hasher::HasherState,
    models::{EventId, EventType, LocalAccount},
    repository::RepositoryState,
};

/// LocalAccountService
///
/// Credential handling for local (username/password) accounts: validation, creation,
/// password change and login bookkeeping.
///
/// Failure model, which callers rely on:
/// - malformed input (empty/whitespace arguments) is an `AccountError::InvalidInput`;
/// - `validate` reports an unknown user or a wrong password as `Ok(None)`, never as an error;
/// - `change_password` on an unknown id is `AccountError::NotFound`;
/// - `record_successful_login` on an unknown id is a silent no-op.
///
/// Passwords are trimmed before hashing on every path, so whatever a user can set they
/// can also log in with.
#[derive(Clone)]
pub struct LocalAccountService {
    repo: RepositoryState,
    audit: AuditState,
    hasher: HasherState,
}

fn require(value: &str, field: &'static str) -> Result<(), AccountError> {
    if value.trim().is_empty() {
        return Err(AccountError::invalid(field));
    }
    Ok(())
}

impl LocalAccountService {
    pub fn new(repo: RepositoryState, audit: AuditState, hasher: HasherState) -> Self {
        Self { repo, audit, hasher }
    }

    pub fn hash_scheme(&self) -> &'static str {
        self.hasher.scheme()
    }

    pub async fn count(&self) -> Result<i64, AccountError> {
        Ok(self.repo.count().await?)
    }

    /// validate
    ///
    /// Returns the account id when `input_password` matches the stored hash of the
    /// account whose stored username equals `username` **verbatim**. The username is
    /// not normalized here; callers pass the same lower-cased form `create` stored.
    pub async fn validate(
        &self,
        username: &str,
        input_password: &str,
    ) -> Result<Option<Uuid>, AccountError> {
        require(username, "username")?;
        require(input_password, "input_password")?;

        let Some(account) = self.repo.find_by_username(username).await? else {
            tracing::debug!("login attempt for unknown username");
            return Ok(None);
        };

        if self.hasher.verify(input_password.trim(), &account.password_hash) {
            Ok(Some(account.id))
        } else {
            tracing::debug!(account_id = %account.id, "password mismatch");
            Ok(None)
        }
    }

    /// create
    ///
    /// Persists a new account and appends one `SettingsAccountCreated` audit entry.
    ///
    /// No uniqueness pre-check is made; a duplicate username is rejected by the store
    /// and surfaces as `AccountError::Store`.
    pub async fn create(&self, username: &str, clear_password: &str) -> Result<Uuid, AccountError> {
        require(username, "username")?;
        require(clear_password, "clear_password")?;

        let id = Uuid::new_v4();
        let password_hash = self.hasher.hash(clear_password.trim())?;
        let account = LocalAccount::new(id, username.trim().to_lowercase(), password_hash);

        self.repo.add(account).await?;
        self.audit
            .append(
                EventType::Settings,
                EventId::SettingsAccountCreated,
                &format!("Account '{}' created.", id),
            )
            .await?;

        tracing::info!(account_id = %id, "local account created");
        Ok(id)
    }

    /// change_password
    ///
    /// Overwrites the stored hash. Not audited.
    pub async fn change_password(&self, id: Uuid, clear_password: &str) -> Result<(), AccountError> {
        require(clear_password, "clear_password")?;

        let mut account = self
            .repo
            .get_by_id(id)
            .await?
            .ok_or(AccountError::NotFound(id))?;

        account.password_hash = self.hasher.hash(clear_password.trim())?;
        self.repo.update(account).await?;

        tracing::info!(account_id = %id, "password changed");
        Ok(())
    }

    /// record_successful_login
    ///
    /// Stamps the last login ip/time. An unknown id is ignored without touching the store.
    pub async fn record_successful_login(&self, id: Uuid, ip_address: &str) -> Result<(), AccountError> {
        let Some(mut account) = self.repo.get_by_id(id).await? else {
            tracing::debug!(account_id = %id, "login record skipped, account not found");
            return Ok(());
        };

        account.last_login_ip = Some(ip_address.trim().to_string());
        account.last_login_at_utc = Some(Utc::now());
        self.repo.update(account).await?;
        Ok(())
    }

    /// ensure_default_account
    ///
    /// First-run bootstrap: when the store holds no account at all, creates one with the
    /// given credentials (through `create`, so it is audited). Returns the new id, or
    /// `None` if accounts already exist.
    pub async fn ensure_default_account(
        &self,
        username: &str,
        clear_password: &str,
    ) -> Result<Option<Uuid>, AccountError> {
        if self.count().await? > 0 {
            return Ok(None);
        }

        let id = self.create(username, clear_password).await?;
        tracing::warn!(
            account_id = %id,
            "no local accounts found, bootstrapped default account '{}'",
            username.trim().to_lowercase()
        );
        Ok(Some(id))
    }
}
