//! Application setup and router configuration.

use std::sync::Arc;

use axum::{
    extract::{DefaultBodyLimit, Extension},
    http::{header::CONTENT_TYPE, Method},
    middleware,
    routing::{get, post, put},
    Router,
};
use intake::{IntakePipeline, RecordStore, MAX_FILE_BYTES};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::domains::auth::routes::{check, login, logout, signup};
use crate::domains::auth::{JwtService, UserStore};
use crate::domains::company::routes::{
    create_company_details, get_company_details, update_company_details,
};
use crate::server::middleware::cookie_auth_middleware;
use crate::server::routes::health_handler;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub pipeline: IntakePipeline,
    pub record_store: Arc<dyn RecordStore>,
    pub users: Arc<dyn UserStore>,
    pub jwt: Arc<JwtService>,
}

/// Build the Axum application router
pub fn build_app(state: AppState) -> Router {
    let jwt_for_middleware = state.jwt.clone();

    // CORS configuration - allow any origin for development
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT])
        .allow_headers([CONTENT_TYPE]);

    let auth_routes = Router::new()
        .route("/signup", post(signup))
        .route("/login", post(login))
        .route("/logout", post(logout))
        .route("/check", get(check));

    let company_routes = Router::new()
        .route("/", post(create_company_details).get(get_company_details))
        .route("/:id", put(update_company_details));

    Router::new()
        .nest("/api/auth", auth_routes)
        .nest("/api/company-details", company_routes)
        // Health check (no auth)
        .route("/health", get(health_handler))
        // Seven slots at 10MB each, plus form overhead
        .layer(DefaultBodyLimit::max(8 * MAX_FILE_BYTES))
        // Middleware layers (applied in reverse order - last added runs first)
        .layer(middleware::from_fn(move |req, next| {
            cookie_auth_middleware(jwt_for_middleware.clone(), req, next)
        }))
        .layer(Extension(state))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
