use std::sync::Arc;

use redis::AsyncCommands;
use sea_orm::{
    ActiveEnum, ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set,
};
use serde_json::Value;
use tracing::Instrument;
use uuid::Uuid;

use crate::classifier::ClassifierClient;
use crate::config::AppConfig;
use crate::entities::{diagnosis, diagnosis_image, disease, prediction};

const PREDICTION_QUEUE: &str = "prediction_queue";
const MAX_ATTEMPTS: i64 = 2;

// Queue Monitoring
pub async fn start_queue_monitor(redis_client: redis::Client) {
    let redis_client = Arc::new(redis_client);

    tokio::spawn(async move {
        tracing::info!("Queue Monitor started");
        loop {
            let mut conn = match redis_client.get_multiplexed_async_connection().await {
                Ok(c) => c,
                Err(e) => {
                    tracing::error!("Queue Monitor: Failed to get redis conn: {}", e);
                    tokio::time::sleep(tokio::time::Duration::from_secs(15)).await;
                    continue;
                }
            };

            let queue_len: redis::RedisResult<u64> = conn.llen(PREDICTION_QUEUE).await;
            match queue_len {
                Ok(len) => metrics::gauge!("farmpulse_queue_depth", "queue" => PREDICTION_QUEUE)
                    .set(len as f64),
                Err(e) => tracing::error!("Failed to get {} len: {}", PREDICTION_QUEUE, e),
            }

            tokio::time::sleep(tokio::time::Duration::from_secs(15)).await;
        }
    });
}

pub async fn start_workers(
    redis_client: redis::Client,
    db: DatabaseConnection,
    config: Arc<AppConfig>,
    concurrency: usize,
) {
    start_queue_monitor(redis_client.clone()).await;

    let db = Arc::new(db);
    let redis_client = Arc::new(redis_client);
    let classifier = Arc::new(ClassifierClient::new(&config));

    for i in 0..concurrency {
        let db = db.clone();
        let redis_client = redis_client.clone();
        let classifier = classifier.clone();
        let config = config.clone();

        tokio::spawn(async move {
            tracing::info!("Prediction worker {} started", i);
            loop {
                let mut conn = match redis_client.get_multiplexed_async_connection().await {
                    Ok(c) => c,
                    Err(e) => {
                        tracing::error!("Worker {}: Failed to get redis conn: {}", i, e);
                        tokio::time::sleep(tokio::time::Duration::from_secs(5)).await;
                        continue;
                    }
                };

                let result: redis::RedisResult<(String, String)> =
                    conn.blpop(PREDICTION_QUEUE, 0.0).await;

                match result {
                    Ok((_key, payload_str)) => {
                        let payload: Value = match serde_json::from_str(&payload_str) {
                            Ok(v) => v,
                            Err(e) => {
                                tracing::error!("Worker {}: Bad payload: {}", i, e);
                                continue;
                            }
                        };

                        let image_id =
                            match Uuid::parse_str(payload["image_id"].as_str().unwrap_or("")) {
                                Ok(id) => id,
                                Err(_) => {
                                    tracing::error!("Worker {}: Invalid image id", i);
                                    continue;
                                }
                            };
                        let attempt = payload["attempt"].as_i64().unwrap_or(0);

                        process_prediction(image_id, attempt, &db, &classifier, &config, &mut conn)
                            .await;
                    }
                    Err(e) => {
                        tracing::error!("Worker {}: Redis error: {}", i, e);
                        tokio::time::sleep(tokio::time::Duration::from_secs(1)).await;
                    }
                }
            }
        });
    }
}

async fn process_prediction(
    image_id: Uuid,
    attempt: i64,
    db: &DatabaseConnection,
    classifier: &ClassifierClient,
    config: &AppConfig,
    redis_conn: &mut redis::aio::MultiplexedConnection,
) {
    let span = tracing::info_span!(
        "process_prediction_job",
        "otel.name" = "process_prediction_job",
        image_id = %image_id
    );

    async move {
        tracing::info!("Dequeued image {} from {}", image_id, PREDICTION_QUEUE);
        let start_time = std::time::Instant::now();

        let image = match diagnosis_image::Entity::find_by_id(image_id).one(db).await {
            Ok(Some(img)) => img,
            Ok(None) => {
                tracing::error!("Image {} not found in DB", image_id);
                return;
            }
            Err(e) => {
                tracing::error!("Failed to load image {}: {}", image_id, e);
                metrics::counter!("farmpulse_prediction_errors_total", "stage" => "db_load")
                    .increment(1);
                return;
            }
        };

        let diag = match diagnosis::Entity::find_by_id(image.diagnosis_id).one(db).await {
            Ok(Some(d)) => d,
            _ => {
                tracing::error!("Diagnosis {} missing for image {}", image.diagnosis_id, image_id);
                return;
            }
        };

        // image_url is "/uploads/<name>"; the file lives under the configured dir.
        let stored_name = image.image_url.trim_start_matches("/uploads/");
        let file_path = std::path::Path::new(&config.upload_dir).join(stored_name);
        let bytes = match tokio::fs::read(&file_path).await {
            Ok(b) => b,
            Err(e) => {
                tracing::error!("Failed to read {}: {}", file_path.display(), e);
                metrics::counter!("farmpulse_prediction_errors_total", "stage" => "fs_read")
                    .increment(1);
                return;
            }
        };

        let species = diag.target_species.to_value();
        match classifier.classify(bytes, stored_name, &species).await {
            Ok(verdict) => {
                tracing::info!(
                    "Classifier verdict for {}: {} ({:.3})",
                    image_id,
                    verdict.disease_label,
                    verdict.confidence
                );

                let label = verdict.disease_label.clone();
                let matched = disease::Entity::find()
                    .filter(disease::Column::DiseaseName.eq(label))
                    .one(db)
                    .await
                    .unwrap_or(None);

                let matched = match matched {
                    Some(d) => d,
                    None => {
                        tracing::warn!(
                            "Classifier label '{}' matches no known disease, dropping",
                            verdict.disease_label
                        );
                        metrics::counter!("farmpulse_prediction_errors_total", "stage" => "unknown_label")
                            .increment(1);
                        return;
                    }
                };

                let new_prediction = prediction::ActiveModel {
                    id: Set(Uuid::new_v4()),
                    diagnosis_id: Set(image.diagnosis_id),
                    diagnosis_image_id: Set(image.id),
                    predicted_disease_id: Set(matched.id),
                    confidence: Set(verdict.confidence),
                    created_at: Set(chrono::Utc::now().naive_utc()),
                };

                match new_prediction.insert(db).await {
                    Ok(p) => {
                        tracing::info!("Stored prediction {} for diagnosis {}", p.id, p.diagnosis_id);
                        metrics::counter!("farmpulse_predictions_total").increment(1);
                    }
                    Err(e) => {
                        tracing::error!("Failed to store prediction: {}", e);
                        metrics::counter!("farmpulse_prediction_errors_total", "stage" => "db_insert")
                            .increment(1);
                    }
                }

                let duration = start_time.elapsed().as_secs_f64();
                metrics::histogram!("farmpulse_prediction_duration_seconds").record(duration);
            }
            Err(e) => {
                tracing::error!("Classification failed for {}: {}", image_id, e);
                metrics::counter!("farmpulse_classifier_api_errors_total").increment(1);

                if attempt < MAX_ATTEMPTS {
                    let payload = serde_json::json!({
                        "image_id": image_id,
                        "diagnosis_id": image.diagnosis_id,
                        "attempt": attempt + 1,
                    })
                    .to_string();
                    let _: () = redis_conn
                        .rpush(PREDICTION_QUEUE, payload)
                        .await
                        .unwrap_or(());
                } else {
                    tracing::error!("Giving up on image {} after {} attempts", image_id, attempt + 1);
                }
            }
        }
    }
    .instrument(span)
    .await;
}
