// --- Module Structure ---

// Core security components.
pub mod accounts;
pub mod audit;
pub mod hasher;
pub mod link;

// Collaborators, data and ambient concerns.
pub mod config;
pub mod error;
pub mod menu;
pub mod models;
pub mod repository;

// --- Public Re-exports ---

pub use accounts::LocalAccountService;
pub use audit::{AuditSink, AuditState, MemoryAuditSink, TracingAuditSink};
pub use config::AppConfig;
pub use error::{AccountError, HashError, StoreError};
pub use hasher::{Argon2Hasher, CredentialHasher, HashScheme, LegacySha256Hasher};
pub use link::{LinkSterilizer, PrivateNetworkPolicy, REJECTED_LINK, sterilize_link};
pub use repository::{
    AccountRepository, InMemoryAccountRepository, PostgresAccountRepository, RepositoryState,
};

/// AppState
///
/// The single container for everything the rest of the blog needs from this crate:
/// the account service and the link sterilizer, both wired from one `AppConfig`.
/// Cheap to clone; all inner services are behind `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub accounts: LocalAccountService,
    pub links: LinkSterilizer,
    pub config: AppConfig,
}

impl AppState {
    /// Assembles the state from already-initialized collaborators. The hasher and the
    /// link policy come from `config`.
    pub fn new(config: AppConfig, repo: RepositoryState, audit: AuditState) -> Self {
        let accounts = LocalAccountService::new(repo, audit, config.hash_scheme.build());
        let links = LinkSterilizer::new(config.link_policy.clone());
        Self {
            accounts,
            links,
            config,
        }
    }

    /// bootstrap
    ///
    /// Creates the configured default account when the store is empty.
    pub async fn bootstrap(&self) -> Result<Option<uuid::Uuid>, AccountError> {
        self.accounts
            .ensure_default_account(
                &self.config.default_admin_username,
                &self.config.default_admin_password,
            )
            .await
    }
}
