use std::sync::Arc;

use axum::{
    http::HeaderValue,
    routing::{get, post, put},
    Extension, Router,
};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    trace::TraceLayer,
};

use crate::config::{AppConfig, Environment, CONFIG};
use crate::handlers;
use crate::services::Tracker;

/// Full HTTP surface over one shared tracker
pub fn app(tracker: Arc<Tracker>) -> Router {
    build(tracker, &CONFIG)
}

pub fn build(tracker: Arc<Tracker>, config: &AppConfig) -> Router {
    let router = Router::new()
        // Public
        .merge(public_routes())
        // Data entry and reporting
        .merge(data_routes())
        // Administrative
        .merge(root_routes())
        // Global middleware
        .layer(Extension(tracker))
        .layer(RequestBodyLimitLayer::new(config.api.max_request_size_bytes))
        .layer(cors_layer(config));

    if config.api.enable_request_logging {
        router.layer(TraceLayer::new_for_http())
    } else {
        router
    }
}

fn public_routes() -> Router {
    use handlers::public::{auth, info};

    Router::new()
        .route("/", get(info::root))
        .route("/health", get(info::health))
        .route("/auth/login", post(auth::login_post))
}

fn data_routes() -> Router {
    use handlers::protected::data;

    Router::new()
        .route("/api/data", get(data::list_get).post(data::data_post))
        .route("/api/data/options", get(data::options_get))
        .route("/api/data/:row", put(data::row_put).delete(data::row_delete))
        .route(
            "/api/records/:id",
            put(data::record_put).delete(data::record_delete),
        )
}

fn root_routes() -> Router {
    use handlers::elevated::root;

    Router::new().route("/api/root/initialize", post(root::initialize_post))
}

fn cors_layer(config: &AppConfig) -> CorsLayer {
    if !config.security.enable_cors {
        return CorsLayer::new();
    }
    if config.environment == Environment::Development {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = config
        .security
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any)
}
