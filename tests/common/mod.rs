#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use farmpulse_server::app::build_router;
use farmpulse_server::auth::TokenKeys;
use farmpulse_server::config::AppConfig;
use farmpulse_server::entities::user::{self, UserRole};
use farmpulse_server::migrator::Migrator;
use farmpulse_server::redis;
use farmpulse_server::sea_orm::{
    ColumnTrait, ConnectOptions, Database, DatabaseConnection, EntityTrait, QueryFilter, Set,
};
use http_body_util::BodyExt;
use sea_orm_migration::MigratorTrait;
use serde_json::{json, Value};
use tower::ServiceExt;

pub struct TestApp {
    pub router: Router,
    pub db: DatabaseConnection,
    // Held so the directory outlives the test.
    #[allow(dead_code)]
    pub upload_dir: tempfile::TempDir,
}

/// Builds the real router over an in-memory sqlite database with all
/// migrations applied. Redis points at a closed port; the app treats the
/// queue as best-effort so nothing in these tests needs it.
pub async fn spawn_app() -> TestApp {
    let upload_dir = tempfile::tempdir().expect("tempdir");

    let config = Arc::new(AppConfig {
        database_url: "sqlite::memory:".to_string(),
        redis_url: "redis://127.0.0.1:1".to_string(),
        jwt_secret: "integration-test-secret".to_string(),
        access_token_expire_minutes: 30,
        refresh_token_expire_days: 7,
        classifier_base_url: "http://127.0.0.1:1".to_string(),
        classifier_timeout: Duration::from_secs(1),
        max_upload_size: 10 * 1024 * 1024,
        allowed_image_extensions: vec![
            ".jpg".to_string(),
            ".jpeg".to_string(),
            ".png".to_string(),
            ".gif".to_string(),
        ],
        upload_dir: upload_dir.path().to_str().expect("utf8 path").to_string(),
        cors_origins: vec!["http://localhost:3000".to_string()],
    });

    // A single pooled connection keeps the in-memory database alive and
    // shared for the whole test.
    let mut opts = ConnectOptions::new(config.database_url.clone());
    opts.max_connections(1).min_connections(1);
    let db = Database::connect(opts).await.expect("sqlite connect");
    Migrator::up(&db, None).await.expect("migrations");

    let keys = TokenKeys::from_config(&config);
    let redis_client = redis::Client::open(config.redis_url.clone()).expect("redis url");

    let router = build_router(db.clone(), redis_client, config, keys);

    TestApp {
        router,
        db,
        upload_dir,
    }
}

pub async fn send(
    app: &TestApp,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("Authorization", format!("Bearer {}", token));
    }

    let request = match body {
        Some(v) => builder
            .header("Content-Type", "application/json")
            .body(Body::from(v.to_string()))
            .expect("request"),
        None => builder.body(Body::empty()).expect("request"),
    };

    let response = app
        .router
        .clone()
        .oneshot(request)
        .await
        .expect("router response");

    let status = response.status();
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body")
        .to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };

    (status, value)
}

pub async fn register(app: &TestApp, name: &str, email: &str, password: &str) -> (StatusCode, Value) {
    send(
        app,
        "POST",
        "/auth/register",
        None,
        Some(json!({"name": name, "email": email, "password": password})),
    )
    .await
}

/// Registers a fresh user and returns its access token and id.
pub async fn register_user(app: &TestApp, name: &str, email: &str) -> (String, String) {
    let (status, body) = register(app, name, email, "G00dPassword").await;
    assert_eq!(status, StatusCode::CREATED, "register failed: {}", body);
    let token = body["access_token"].as_str().expect("access_token").to_string();
    let user_id = body["user"]["id"].as_str().expect("user id").to_string();
    (token, user_id)
}

/// Registers a user, promotes it to admin in the database, and logs in
/// again so the returned token carries the admin role.
pub async fn register_admin(app: &TestApp, email: &str) -> String {
    let (status, body) = register(app, "Admin User", email, "G00dPassword").await;
    assert_eq!(status, StatusCode::CREATED, "register failed: {}", body);

    let account = user::Entity::find()
        .filter(user::Column::Email.eq(email))
        .one(&app.db)
        .await
        .expect("db")
        .expect("user row");
    let mut active: user::ActiveModel = account.into();
    active.role = Set(UserRole::Admin);
    user::Entity::update(active)
        .exec(&app.db)
        .await
        .expect("promote admin");

    let (status, body) = send(
        app,
        "POST",
        "/auth/login",
        None,
        Some(json!({"email": email, "password": "G00dPassword"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "admin login failed: {}", body);
    body["access_token"].as_str().expect("access_token").to_string()
}

pub async fn create_farm(app: &TestApp, token: &str, name: &str) -> String {
    let (status, body) = send(
        app,
        "POST",
        "/farms",
        Some(token),
        Some(json!({"farm_name": name, "farm_type": "FISH"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "create farm failed: {}", body);
    body["id"].as_str().expect("farm id").to_string()
}

pub async fn create_symptom(app: &TestApp, admin_token: &str, name: &str) -> String {
    let (status, body) = send(
        app,
        "POST",
        "/symptoms",
        Some(admin_token),
        Some(json!({"symptom_name": name, "target_species": "FISH"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "create symptom failed: {}", body);
    body["id"].as_str().expect("symptom id").to_string()
}

/// Raw multipart body with a single file field.
pub fn multipart_file(
    field: &str,
    filename: &str,
    content_type: &str,
    data: &[u8],
) -> (String, Vec<u8>) {
    let boundary = "farmpulse-test-boundary";
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{boundary}\r\nContent-Disposition: form-data; name=\"{field}\"; \
             filename=\"{filename}\"\r\nContent-Type: {content_type}\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());
    (
        format!("multipart/form-data; boundary={boundary}"),
        body,
    )
}

pub async fn send_multipart(
    app: &TestApp,
    uri: &str,
    token: &str,
    content_type: &str,
    body: Vec<u8>,
) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("Authorization", format!("Bearer {}", token))
        .header("Content-Type", content_type)
        .body(Body::from(body))
        .expect("request");

    let response = app
        .router
        .clone()
        .oneshot(request)
        .await
        .expect("router response");

    let status = response.status();
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body")
        .to_bytes();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

pub fn parse_timestamp(raw: &str) -> chrono::NaiveDateTime {
    chrono::NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f").expect("timestamp")
}
