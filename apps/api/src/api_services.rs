use std::sync::Arc;

use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use tower_sessions::cookie::SameSite;
use tower_sessions::cookie::time::Duration;
use tower_sessions::{Expiry, SessionManagerLayer};
use tower_sessions_sqlx_store::PostgresStore;

use sweldo_application::{AuthEventService, CompanyContextService, UserService};
use sweldo_core::AppError;
use sweldo_infrastructure::{
    Argon2PasswordHasher, PostgresAccessGrantRepository, PostgresAuthEventRepository,
    PostgresUserRepository,
};

use crate::api_config::AppConfig;
use crate::state::AppState;

pub async fn build_pool(config: &AppConfig) -> Result<PgPool, AppError> {
    PgPoolOptions::new()
        .max_connections(10)
        .connect(&config.database_url)
        .await
        .map_err(|error| AppError::Internal(format!("failed to connect to database: {error}")))
}

pub async fn run_migrations(pool: &PgPool) -> Result<(), AppError> {
    sqlx::migrate!("../../crates/infrastructure/migrations")
        .run(pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to run migrations: {error}")))
}

pub async fn build_session_layer(
    pool: PgPool,
    cookie_secure: bool,
) -> Result<SessionManagerLayer<PostgresStore>, AppError> {
    let session_store = PostgresStore::new(pool)
        .with_table_name("tower_sessions")
        .map_err(|error| {
            AppError::Validation(format!("invalid session table name configuration: {error}"))
        })?;

    session_store.migrate().await.map_err(|error| {
        AppError::Internal(format!("failed to initialize session store: {error}"))
    })?;

    Ok(SessionManagerLayer::new(session_store)
        .with_secure(cookie_secure)
        .with_same_site(SameSite::Lax)
        .with_http_only(true)
        .with_expiry(Expiry::OnInactivity(Duration::minutes(30))))
}

pub fn build_state(pool: PgPool, config: &AppConfig) -> AppState {
    let access_grant_repository = Arc::new(PostgresAccessGrantRepository::new(pool.clone()));
    let company_context_service = CompanyContextService::new(access_grant_repository);

    let auth_event_service =
        AuthEventService::new(Arc::new(PostgresAuthEventRepository::new(pool.clone())));

    let user_service = UserService::new(
        Arc::new(PostgresUserRepository::new(pool)),
        Arc::new(Argon2PasswordHasher::new()),
        auth_event_service.clone(),
    );

    AppState {
        company_context_service,
        user_service,
        auth_event_service,
        app_url: config.app_url.clone(),
    }
}
