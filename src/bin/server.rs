use std::net::SocketAddr;
use std::sync::Arc;

use axum::routing::get;
use farmpulse_server::{app, auth::TokenKeys, config::AppConfig, migrator};
use sea_orm::Database;

#[tokio::main]
async fn main() {
    // Load .env if present (dotenvy)
    dotenvy::dotenv().ok();

    farmpulse_server::telemetry::init_telemetry("farmpulse-server");

    let config = Arc::new(AppConfig::from_env());

    let (prometheus_layer, metric_handle) = axum_prometheus::PrometheusMetricLayer::pair();

    // Database Connection
    let db = Database::connect(&config.database_url)
        .await
        .expect("Failed to connect to database");

    // Redis Connection
    let redis_client =
        redis::Client::open(config.redis_url.clone()).expect("Invalid Redis URL");

    // Run migrations
    use sea_orm_migration::MigratorTrait;
    migrator::Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");

    // Upload directory must exist before the first multipart request.
    tokio::fs::create_dir_all(&config.upload_dir)
        .await
        .expect("Failed to create upload directory");

    // Initialize Metrics
    farmpulse_server::metrics::init_metrics(&db).await;

    let keys = TokenKeys::from_config(&config);

    let router = app::build_router(db, redis_client, config, keys)
        .layer(prometheus_layer)
        .route("/metrics", get(|| async move { metric_handle.render() }));

    let addr = SocketAddr::from(([0, 0, 0, 0], 8000));
    tracing::info!("listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, router).await.unwrap();
}
