use std::env;

use crate::{hasher::HashScheme, link::PrivateNetworkPolicy};

/// AppConfig
///
/// Holds the entire configuration state. Loaded once at startup and immutable afterwards;
/// components receive the pieces they need explicitly (hash scheme, link policy) rather
/// than reading the environment themselves.
#[derive(Clone, Debug)]
pub struct AppConfig {
    // Runtime environment marker. Controls which settings are mandatory.
    pub env: Env,
    // Postgres connection string. `None` selects the in-memory store (local only).
    pub db_url: Option<String>,
    // Which credential hasher new and existing passwords go through.
    pub hash_scheme: HashScheme,
    // IPv4 ranges navigation links may not point into.
    pub link_policy: PrivateNetworkPolicy,
    // First-run account, created only when the store is empty.
    pub default_admin_username: String,
    pub default_admin_password: String,
}

/// Env
///
/// Runtime context: local development or production.
#[derive(Clone, PartialEq, Debug)]
pub enum Env {
    Local,
    Production,
}

const LOCAL_ADMIN_USERNAME: &str = "admin";
const LOCAL_ADMIN_PASSWORD: &str = "admin123";

impl Default for AppConfig {
    /// default
    ///
    /// Safe, non-panicking values for test setup: local env, in-memory store, legacy
    /// hashing and the RFC 1918 link policy.
    fn default() -> Self {
        Self {
            env: Env::Local,
            db_url: None,
            hash_scheme: HashScheme::Legacy,
            link_policy: PrivateNetworkPolicy::default(),
            default_admin_username: LOCAL_ADMIN_USERNAME.to_string(),
            default_admin_password: LOCAL_ADMIN_PASSWORD.to_string(),
        }
    }
}

impl AppConfig {
    /// load
    ///
    /// Reads every setting from environment variables and implements the **fail-fast**
    /// principle.
    ///
    /// # Panics
    /// Panics if a setting is malformed (`PASSWORD_HASH_SCHEME`, `LINK_PRIVATE_RANGES`) or
    /// if a production-mandatory variable (`DATABASE_URL`, `DEFAULT_ADMIN_PASSWORD`) is
    /// missing, so the process never starts with an incomplete or insecure configuration.
    pub fn load() -> Self {
        let env_str = env::var("APP_ENV").unwrap_or_else(|_| "local".to_string());
        let env = match env_str.as_str() {
            "production" => Env::Production,
            _ => Env::Local,
        };

        let hash_scheme = match env::var("PASSWORD_HASH_SCHEME") {
            Ok(value) => HashScheme::parse(&value).unwrap_or_else(|| {
                panic!("FATAL: PASSWORD_HASH_SCHEME must be 'legacy' or 'argon2', got '{value}'")
            }),
            Err(_) => HashScheme::Legacy,
        };

        let link_policy = match env::var("LINK_PRIVATE_RANGES") {
            Ok(value) => PrivateNetworkPolicy::parse(&value)
                .unwrap_or_else(|e| panic!("FATAL: LINK_PRIVATE_RANGES is invalid: {e}")),
            Err(_) => PrivateNetworkPolicy::default(),
        };

        let default_admin_username = env::var("DEFAULT_ADMIN_USERNAME")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| LOCAL_ADMIN_USERNAME.to_string());

        match env {
            Env::Local => Self {
                env: Env::Local,
                // Without a database the in-memory store is used.
                db_url: env::var("DATABASE_URL").ok(),
                hash_scheme,
                link_policy,
                default_admin_username,
                default_admin_password: env::var("DEFAULT_ADMIN_PASSWORD")
                    .unwrap_or_else(|_| LOCAL_ADMIN_PASSWORD.to_string()),
            },
            Env::Production => Self {
                env: Env::Production,
                db_url: Some(
                    env::var("DATABASE_URL").expect("FATAL: DATABASE_URL required in prod"),
                ),
                hash_scheme,
                link_policy,
                default_admin_username,
                // The well-known local password must never reach production.
                default_admin_password: env::var("DEFAULT_ADMIN_PASSWORD")
                    .expect("FATAL: DEFAULT_ADMIN_PASSWORD required in prod"),
            },
        }
    }
}
