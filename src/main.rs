use blog_guard::{
    AppState, InMemoryAccountRepository, PostgresAccountRepository, RepositoryState,
    TracingAuditSink,
    config::{AppConfig, Env},
};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// main
///
/// Initializes configuration, logging and the account store, then runs the first-run
/// account bootstrap and reports the active security settings.
#[tokio::main]
async fn main() {
    // 1. Configuration (fail-fast)
    dotenv::dotenv().ok();
    let config = AppConfig::load();

    // 2. Logging
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "blog_guard=debug,audit=info,sqlx=warn".into());

    match config.env {
        Env::Local => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().pretty())
                .init();
        }
        Env::Production => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
    }

    tracing::info!("Starting in {:?} mode", config.env);

    // 3. Account store
    let repo: RepositoryState = match &config.db_url {
        Some(db_url) => {
            let pool = PgPoolOptions::new()
                .max_connections(5)
                .connect(db_url)
                .await
                .expect("FATAL: Failed to connect to Postgres. Check DATABASE_URL.");

            sqlx::migrate!("./migrations")
                .run(&pool)
                .await
                .expect("FATAL: Failed to run database migrations.");

            Arc::new(PostgresAccountRepository::new(pool))
        }
        None => {
            tracing::warn!("DATABASE_URL not set, using the in-memory account store");
            Arc::new(InMemoryAccountRepository::new())
        }
    };

    // 4. State assembly
    let state = AppState::new(config, repo, Arc::new(TracingAuditSink));

    match state.bootstrap().await {
        Ok(Some(id)) => tracing::info!(account_id = %id, "default account created"),
        Ok(None) => {}
        Err(e) => {
            tracing::error!("default account bootstrap failed: {}", e);
            std::process::exit(1);
        }
    }

    match state.accounts.count().await {
        Ok(count) => tracing::info!("{} local account(s) present", count),
        Err(e) => tracing::error!("could not count accounts: {}", e),
    }

    tracing::info!(
        hash_scheme = state.accounts.hash_scheme(),
        private_ranges = %state.links.policy(),
        "security core ready"
    );
}
