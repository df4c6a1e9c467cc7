//! Server setup and initialization
//!
//! Provides the application builder and server runner.

use std::sync::Arc;

use axum::Router;
use community_cache::{
    ActivationTokenStore, Publisher, RedisNotificationSink, RedisPool, RedisPoolConfig,
    RefreshTokenStore,
};
use community_common::{AppConfig, AppError, JwtService};
use community_core::SnowflakeGenerator;
use community_db::{
    create_pool, run_migrations, PgAccountRepository, PgContentRepository, PgEventRepository,
    PgGroupRepository, PgMembershipRepository, PgPollRepository,
};
use community_service::ServiceContextBuilder;
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::middleware::apply_middleware_with_config;
use crate::routes::{create_router, health_routes};
use crate::state::AppState;

/// Build the complete Axum application with all routes and middleware.
/// Health checks sit outside the rate limiter.
pub fn create_app(state: AppState) -> Router {
    let config = state.config();
    let api = apply_middleware_with_config(
        create_router(),
        &config.rate_limit,
        &config.cors,
        config.server.request_timeout_secs,
        config.env.is_production(),
    );

    api.merge(health_routes()).with_state(state)
}

/// Connect to PostgreSQL and Redis, apply migrations and wire the services
pub async fn create_app_state(config: AppConfig) -> Result<AppState, AppError> {
    info!("Connecting to PostgreSQL...");
    let db_config = community_db::DatabaseConfig::from(&config.database);
    let pool = create_pool(&db_config)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;
    info!("PostgreSQL connection established");

    run_migrations(&pool, &config.database.migrations_dir)
        .await
        .map_err(|e| AppError::Database(format!("Migration failed: {e}")))?;

    info!("Connecting to Redis...");
    let redis_pool = RedisPool::new(RedisPoolConfig::from(&config.redis))
        .map_err(|e| AppError::Cache(e.to_string()))?;
    info!("Redis pool created");

    let jwt_service = Arc::new(JwtService::new(
        &config.jwt.secret,
        config.jwt.access_token_expiry,
        config.jwt.refresh_token_expiry,
    ));
    let refresh_ttl = u64::try_from(config.jwt.refresh_token_expiry)
        .map_err(|_| AppError::Config("JWT refresh expiry must be positive".to_string()))?;

    let service_context = ServiceContextBuilder::new()
        .account_repo(Arc::new(PgAccountRepository::new(pool.clone())))
        .group_repo(Arc::new(PgGroupRepository::new(pool.clone())))
        .membership_repo(Arc::new(PgMembershipRepository::new(pool.clone())))
        .content_repo(Arc::new(PgContentRepository::new(pool.clone())))
        .poll_repo(Arc::new(PgPollRepository::new(pool.clone())))
        .event_repo(Arc::new(PgEventRepository::new(pool.clone())))
        .activation_tokens(Arc::new(ActivationTokenStore::with_ttl(
            redis_pool.clone(),
            config.accounts.activation_token_expiry,
        )))
        .refresh_sessions(Arc::new(RefreshTokenStore::with_ttl(
            redis_pool.clone(),
            refresh_ttl,
        )))
        .notifications(Arc::new(RedisNotificationSink::new(Publisher::new(
            redis_pool.clone(),
        ))))
        .jwt_service(jwt_service)
        .snowflake_generator(Arc::new(SnowflakeGenerator::new(config.worker_id)))
        .auto_activate(config.accounts.auto_activate)
        .build()
        .map_err(|e| AppError::Config(e.to_string()))?;

    if config.accounts.auto_activate {
        warn!("Accounts are activated on registration (AUTO_ACTIVATE_ACCOUNTS)");
    }

    Ok(AppState::new(service_context, config, pool, redis_pool))
}

/// Serve the application until Ctrl-C
pub async fn run_server(app: Router, addr: &str) -> Result<(), AppError> {
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| AppError::Config(format!("Failed to bind to {addr}: {e}")))?;

    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::Config(format!("Server error: {e}")))?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

/// Run the complete server with configuration
pub async fn run(config: AppConfig) -> Result<(), AppError> {
    let addr = config.server.address();
    let state = create_app_state(config).await?;
    let app = create_app(state);
    run_server(app, &addr).await
}
