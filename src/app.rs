use std::sync::Arc;

use axum::{
    routing::{get, post},
    Extension, Router,
};
use sea_orm::DatabaseConnection;
use tower_http::services::ServeDir;

use crate::api;
use crate::auth::TokenKeys;
use crate::config::AppConfig;

async fn health_check() -> &'static str {
    "OK"
}

/// Assembles the full HTTP surface. Reference-data reads and auth routes
/// are public; everything else sits behind the bearer-token middleware.
pub fn build_router(
    db: DatabaseConnection,
    redis_client: redis::Client,
    config: Arc<AppConfig>,
    keys: TokenKeys,
) -> Router {
    let public_routes = Router::new()
        .route("/auth/register", post(api::auth::register))
        .route("/auth/login", post(api::auth::login))
        .route("/diseases", get(api::disease::get_diseases))
        .route("/diseases/:id", get(api::disease::get_disease))
        .route(
            "/diseases/:id/treatments",
            get(api::treatment::list_disease_treatments),
        )
        .route("/symptoms", get(api::disease::get_symptoms))
        .route("/symptoms/:id", get(api::disease::get_symptom))
        .route("/treatments", get(api::treatment::get_treatments))
        .route("/treatments/:id", get(api::treatment::get_treatment));

    let protected_routes = Router::new()
        .route(
            "/users",
            get(api::user::get_user)
                .put(api::user::update_user)
                .delete(api::user::delete_user),
        )
        .route(
            "/farms",
            get(api::farm::list_farms).post(api::farm::create_farm),
        )
        .route("/farms/units", post(api::farm::create_farm_unit))
        .route(
            "/farms/units/:id",
            axum::routing::put(api::farm::update_farm_unit).delete(api::farm::delete_farm_unit),
        )
        .route(
            "/farms/:id",
            get(api::farm::get_farm)
                .put(api::farm::update_farm)
                .delete(api::farm::delete_farm),
        )
        // Admin-gated reference-data mutations (role enforced in handlers)
        .route("/diseases", post(api::disease::create_disease))
        .route(
            "/diseases/:id",
            axum::routing::put(api::disease::update_disease).delete(api::disease::delete_disease),
        )
        .route(
            "/diseases/:id/treatments",
            post(api::treatment::link_treatment),
        )
        .route(
            "/diseases/:id/treatments/:treatment_id",
            axum::routing::delete(api::treatment::unlink_treatment),
        )
        .route("/symptoms", post(api::disease::create_symptom))
        .route(
            "/symptoms/:id",
            axum::routing::put(api::disease::update_symptom).delete(api::disease::delete_symptom),
        )
        .route("/treatments", post(api::treatment::create_treatment))
        .route(
            "/treatments/:id",
            axum::routing::put(api::treatment::update_treatment)
                .delete(api::treatment::delete_treatment),
        )
        // Diagnosis workflow
        .route("/detection/analyze", post(api::diagnosis::create_diagnosis))
        .route("/detection/history", get(api::diagnosis::get_history))
        .route(
            "/detection/:id",
            get(api::diagnosis::get_diagnosis)
                .put(api::diagnosis::update_diagnosis)
                .delete(api::diagnosis::delete_diagnosis),
        )
        .route("/detection/:id/images", post(api::diagnosis::upload_image))
        .route(
            "/detection/:id/predictions",
            get(api::diagnosis::list_predictions),
        )
        // Notifications & feedback
        .route(
            "/notifications",
            get(api::notification::list_notifications)
                .post(api::notification::create_notification),
        )
        .route(
            "/notifications/:id",
            axum::routing::put(api::notification::update_notification)
                .delete(api::notification::delete_notification),
        )
        .route(
            "/feedback",
            get(api::notification::list_feedback).post(api::notification::create_feedback),
        )
        .route_layer(axum::middleware::from_fn(api::middleware::auth_middleware));

    let cors_origins: Vec<axum::http::HeaderValue> = config
        .cors_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    // Multipart framing needs some headroom over the raw file limit; the
    // handler enforces the exact size.
    let body_limit = config.max_upload_size + 1024 * 1024;

    Router::new()
        .route("/health", get(health_check))
        .merge(public_routes)
        .merge(protected_routes)
        .nest_service("/uploads", ServeDir::new(&config.upload_dir))
        .layer(Extension(db))
        .layer(Extension(redis_client))
        .layer(Extension(config))
        .layer(Extension(keys))
        .layer(
            tower_http::trace::TraceLayer::new_for_http()
                .make_span_with(|request: &axum::http::Request<axum::body::Body>| {
                    let matched_path = request
                        .extensions()
                        .get::<axum::extract::MatchedPath>()
                        .map(|matched| matched.as_str());

                    // Span name: "METHOD /path" (e.g., "POST /auth/login")
                    let span_name = if let Some(path) = matched_path {
                        format!("{} {}", request.method(), path)
                    } else {
                        format!("{} {}", request.method(), request.uri().path())
                    };

                    let user_ip = request
                        .headers()
                        .get("x-forwarded-for")
                        .and_then(|v| v.to_str().ok())
                        .or_else(|| {
                            request
                                .headers()
                                .get("x-real-ip")
                                .and_then(|v| v.to_str().ok())
                        })
                        .unwrap_or("unknown");

                    // Fields the handlers fill in later.
                    tracing::info_span!(
                        "request",
                        "otel.name" = span_name,
                        user_ip = user_ip,
                        method = ?request.method(),
                        uri = ?request.uri(),
                        table = tracing::field::Empty,
                        action = tracing::field::Empty,
                        user_id = tracing::field::Empty,
                        user_email = tracing::field::Empty,
                        diagnosis_id = tracing::field::Empty,
                        error = tracing::field::Empty,
                        status = tracing::field::Empty,
                        latency = tracing::field::Empty,
                    )
                })
                .on_request(
                    |_request: &axum::http::Request<axum::body::Body>, _span: &tracing::Span| {},
                )
                .on_response(
                    |response: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     span: &tracing::Span| {
                        span.record("status", tracing::field::display(response.status()));
                        span.record("latency", tracing::field::debug(latency));
                        tracing::info!("request completed");
                    },
                ),
        )
        .layer(
            tower_http::cors::CorsLayer::new()
                .allow_origin(cors_origins)
                .allow_methods([
                    axum::http::Method::GET,
                    axum::http::Method::POST,
                    axum::http::Method::PUT,
                    axum::http::Method::DELETE,
                ])
                .allow_headers([
                    axum::http::header::CONTENT_TYPE,
                    axum::http::header::AUTHORIZATION,
                ])
                .allow_credentials(true),
        )
        .layer(axum::extract::DefaultBodyLimit::max(body_limit))
}
