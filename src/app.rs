use axum::{
    extract::DefaultBodyLimit,
    http::HeaderValue,
    middleware,
    routing::{get, post, put},
    Router,
};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::config::{AppConfig, Environment};
use crate::handlers::{protected, public};
use crate::middleware::session_auth_middleware;
use crate::state::AppState;

pub fn app(state: AppState) -> Router {
    let config = state.config.clone();

    let mut router = Router::new()
        // Public
        .route("/", get(public::system::root))
        .route("/health", get(public::system::health))
        .merge(email_routes())
        .merge(job_post_public_routes())
        // Session-gated
        .merge(job_post_protected_routes(state.clone()))
        // Global middleware
        .layer(DefaultBodyLimit::max(config.api.max_request_size_bytes));

    if config.api.enable_request_logging {
        router = router.layer(TraceLayer::new_for_http());
    }
    if config.security.enable_cors {
        router = router.layer(cors_layer(&config));
    }

    router.with_state(state)
}

fn email_routes() -> Router<AppState> {
    Router::new().route("/emails", post(public::emails::subscribe))
}

fn job_post_public_routes() -> Router<AppState> {
    Router::new()
        .route("/jobposts", get(public::job_posts::list))
        .route("/jobposts/:id", get(public::job_posts::get))
}

fn job_post_protected_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/jobposts", post(protected::job_posts::create))
        .route(
            "/jobposts/:id",
            put(protected::job_posts::update).delete(protected::job_posts::delete),
        )
        .route("/jobposts/restore/:id", post(protected::job_posts::restore))
        .route_layer(middleware::from_fn_with_state(state, session_auth_middleware))
}

fn cors_layer(config: &AppConfig) -> CorsLayer {
    let origins = &config.security.cors_origins;
    if matches!(config.environment, Environment::Development) || origins.is_empty() {
        return CorsLayer::permissive();
    }
    let origins: Vec<HeaderValue> = origins.iter().filter_map(|origin| origin.parse().ok()).collect();
    CorsLayer::permissive().allow_origin(AllowOrigin::list(origins))
}
