//! Application setup and server configuration.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{DefaultBodyLimit, Extension},
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        Method,
    },
    middleware,
    routing::{delete, get, post, put},
    Router,
};
use sqlx::PgPool;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::domains::auth::JwtService;
use crate::domains::offers::{MediaStore, OfferService};
use crate::server::middleware::jwt_auth_middleware;
use crate::server::routes::{
    delete_offer, health_handler, publish_offer, search_offers, update_offer,
};

/// Uploaded images may exceed axum's 2 MB default body limit.
const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub offers: Arc<OfferService>,
    pub jwt_service: Arc<JwtService>,
}

/// Build the Axum application router
pub fn build_app(
    pool: PgPool,
    media: Arc<dyn MediaStore>,
    jwt_secret: &str,
    jwt_issuer: String,
    upstream_timeout: Duration,
) -> Router {
    let jwt_service = Arc::new(JwtService::new(jwt_secret, jwt_issuer));
    let offers = Arc::new(OfferService::new(pool.clone(), media, upstream_timeout));

    let app_state = AppState {
        db_pool: pool,
        offers,
        jwt_service: jwt_service.clone(),
    };

    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE]);

    // Clone jwt_service for middleware closure
    let jwt_service_for_middleware = jwt_service.clone();

    Router::new()
        .route("/offer/publish", post(publish_offer))
        .route("/offers", get(search_offers))
        .route("/offer/update/:id", put(update_offer))
        .route("/offer/delete/:id", delete(delete_offer))
        .route("/health", get(health_handler))
        // Middleware layers (applied in reverse order - last added runs first)
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(middleware::from_fn(move |req, next| {
            jwt_auth_middleware(jwt_service_for_middleware.clone(), req, next)
        }))
        .layer(Extension(app_state))
        .layer(cors)
        .layer(TimeoutLayer::new(Duration::from_secs(30)))
        .layer(TraceLayer::new_for_http())
}
