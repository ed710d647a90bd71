pub mod tasks;

use axum::{routing::get, Router};
use axum::http::Method;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub fn app(router: Router) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::HEAD, Method::PUT, Method::PATCH, Method::POST, Method::DELETE])
        .allow_headers(Any);

    Router::new()
        .route("/health", get(|| async { "ok" }))
        .merge(router)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
