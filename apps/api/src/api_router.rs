use axum::Router;
use axum::middleware::{from_fn, from_fn_with_state};
use axum::routing::{get, post};
use tower_http::trace::TraceLayer;
use tower_sessions::SessionManagerLayer;
use tower_sessions_sqlx_store::PostgresStore;

use crate::state::AppState;
use crate::{auth, handlers, middleware};

pub fn build_router(
    app_state: AppState,
    session_layer: SessionManagerLayer<PostgresStore>,
) -> Router {
    let api_routes = Router::new()
        .route("/api/context", get(handlers::context::context_handler))
        .route(
            "/api/companies",
            get(handlers::context::list_companies_handler),
        )
        .route(
            "/api/company/switch",
            post(handlers::context::switch_company_handler),
        )
        .route_layer(from_fn(middleware::require_auth));

    let page_routes = Router::new()
        .route("/", get(handlers::pages::root_page))
        .route(
            "/login",
            get(handlers::pages::login_page).post(auth::login_handler),
        )
        .route("/logout", get(auth::logout_handler))
        .route(
            "/{company_id}/dashboard",
            get(handlers::pages::dashboard_home_page),
        )
        .route(
            "/{company_id}/dashboard/{*section}",
            get(handlers::pages::dashboard_section_page),
        )
        .route(
            "/{company_id}/employee-portal",
            get(handlers::pages::portal_home_page),
        )
        .route(
            "/{company_id}/employee-portal/{*section}",
            get(handlers::pages::portal_section_page),
        );

    Router::new()
        .route("/health", get(handlers::health::health_handler))
        .merge(api_routes)
        .merge(page_routes)
        .layer(from_fn_with_state(app_state.clone(), middleware::route_guard))
        .layer(from_fn_with_state(
            app_state.clone(),
            middleware::require_same_origin_for_mutations,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(session_layer)
        .with_state(app_state)
}
