use std::sync::Arc;

use axum::{
    extract::{Extension, Json, Multipart, Path, Query},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::Utc;
use redis::AsyncCommands;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    IntoActiveModel, ModelTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
    TransactionTrait,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use crate::api::disease::PageParams;
use crate::api::error::ApiError;
use crate::api::middleware::AuthUser;
use crate::config::AppConfig;
use crate::entities::diagnosis::{self, DiagnosisStatus};
use crate::entities::diagnosis_image;
use crate::entities::diagnosis_symptom;
use crate::entities::disease::{self, TargetSpecies};
use crate::entities::farm;
use crate::entities::farm_unit;
use crate::entities::prediction;
use crate::entities::symptom;

/// Which related rows to resolve alongside a diagnosis. Defaults to
/// everything, matching the create/get responses' fully-hydrated shape.
#[derive(Clone, Copy)]
struct Hydration {
    images: bool,
    symptoms: bool,
    final_disease: bool,
}

impl Hydration {
    const ALL: Hydration = Hydration {
        images: true,
        symptoms: true,
        final_disease: true,
    };

    fn parse(raw: Option<&str>) -> Hydration {
        match raw {
            None => Hydration::ALL,
            Some(list) => {
                let mut h = Hydration {
                    images: false,
                    symptoms: false,
                    final_disease: false,
                };
                for part in list.split(',') {
                    match part.trim() {
                        "images" => h.images = true,
                        "symptoms" => h.symptoms = true,
                        "final_disease" => h.final_disease = true,
                        _ => {}
                    }
                }
                h
            }
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct GetParams {
    include: Option<String>,
}

#[derive(Serialize)]
pub struct DiagnosisResponse {
    #[serde(flatten)]
    pub diagnosis: diagnosis::Model,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub images: Option<Vec<diagnosis_image::Model>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub symptoms: Option<Vec<symptom::Model>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub final_disease: Option<disease::Model>,
}

#[derive(Serialize)]
pub struct DiagnosisListResponse {
    pub diagnoses: Vec<DiagnosisResponse>,
    pub total: usize,
}

#[derive(Serialize)]
pub struct ImageUploadResponse {
    pub diagnosis_image_id: Uuid,
    pub image_url: String,
    pub diagnosis_id: Uuid,
    pub captured_at: chrono::NaiveDateTime,
}

async fn hydrate(
    db: &DatabaseConnection,
    d: diagnosis::Model,
    include: Hydration,
) -> Result<DiagnosisResponse, ApiError> {
    let images = if include.images {
        Some(d.find_related(diagnosis_image::Entity).all(db).await?)
    } else {
        None
    };
    let symptoms = if include.symptoms {
        Some(d.find_related(symptom::Entity).all(db).await?)
    } else {
        None
    };
    let final_disease = match (include.final_disease, d.final_disease_id) {
        (true, Some(disease_id)) => disease::Entity::find_by_id(disease_id).one(db).await?,
        _ => None,
    };

    Ok(DiagnosisResponse {
        diagnosis: d,
        images,
        symptoms,
        final_disease,
    })
}

/// Resolves a diagnosis the caller may act on; someone else's diagnosis
/// surfaces as NotFound unless the caller is an admin.
async fn owned_diagnosis(
    db: &DatabaseConnection,
    diagnosis_id: Uuid,
    auth: &AuthUser,
) -> Result<diagnosis::Model, ApiError> {
    match diagnosis::Entity::find_by_id(diagnosis_id).one(db).await? {
        Some(d) if d.user_id == auth.id || auth.is_admin() => Ok(d),
        _ => Err(ApiError::NotFound("Diagnosis")),
    }
}

/// Delete-then-reinsert replacement of the diagnosis's symptom set.
/// Duplicate ids collapse; an unknown id fails the surrounding transaction.
async fn replace_symptoms<C: ConnectionTrait>(
    txn: &C,
    diagnosis_id: Uuid,
    symptom_ids: Vec<Uuid>,
) -> Result<(), ApiError> {
    let mut unique = Vec::new();
    for id in symptom_ids {
        if !unique.contains(&id) {
            unique.push(id);
        }
    }

    let found = symptom::Entity::find()
        .filter(symptom::Column::Id.is_in(unique.clone()))
        .count(txn)
        .await?;
    if found != unique.len() as u64 {
        return Err(ApiError::NotFound("Symptom"));
    }

    diagnosis_symptom::Entity::delete_many()
        .filter(diagnosis_symptom::Column::DiagnosisId.eq(diagnosis_id))
        .exec(txn)
        .await?;

    if !unique.is_empty() {
        let rows: Vec<diagnosis_symptom::ActiveModel> = unique
            .into_iter()
            .map(|symptom_id| diagnosis_symptom::ActiveModel {
                diagnosis_id: Set(diagnosis_id),
                symptom_id: Set(symptom_id),
            })
            .collect();
        diagnosis_symptom::Entity::insert_many(rows)
            .exec(txn)
            .await?;
    }

    Ok(())
}

#[derive(Deserialize)]
pub struct CreateDiagnosisRequest {
    farm_id: Uuid,
    unit_id: Option<Uuid>,
    target_species: TargetSpecies,
    symptoms_text: Option<String>,
    #[serde(default)]
    symptom_ids: Vec<Uuid>,
}

pub async fn create_diagnosis(
    Extension(db): Extension<DatabaseConnection>,
    Extension(auth): Extension<AuthUser>,
    Json(payload): Json<CreateDiagnosisRequest>,
) -> Result<Response, ApiError> {
    // The referenced farm must be the caller's own.
    let f = match farm::Entity::find_by_id(payload.farm_id).one(&db).await? {
        Some(f) if f.owner_id == auth.id || auth.is_admin() => f,
        _ => return Err(ApiError::NotFound("Farm")),
    };

    if let Some(unit_id) = payload.unit_id {
        let unit = farm_unit::Entity::find_by_id(unit_id)
            .one(&db)
            .await?
            .ok_or(ApiError::NotFound("Farm unit"))?;
        if unit.farm_id != f.id {
            return Err(ApiError::NotFound("Farm unit"));
        }
    }

    let txn = db.begin().await?;

    let now = Utc::now().naive_utc();
    let new_diagnosis = diagnosis::ActiveModel {
        id: Set(Uuid::new_v4()),
        user_id: Set(auth.id),
        farm_id: Set(payload.farm_id),
        unit_id: Set(payload.unit_id),
        target_species: Set(payload.target_species),
        status: Set(DiagnosisStatus::Open),
        symptoms_text: Set(payload.symptoms_text),
        final_disease_id: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
    };
    let saved = new_diagnosis.insert(&txn).await.map_err(ApiError::from)?;

    replace_symptoms(&txn, saved.id, payload.symptom_ids).await?;

    txn.commit().await?;

    tracing::Span::current()
        .record("table", "diagnoses")
        .record("action", "create_diagnosis")
        .record("user_id", tracing::field::display(auth.id))
        .record("diagnosis_id", tracing::field::display(saved.id));
    metrics::counter!("farmpulse_diagnoses_created_total").increment(1);
    metrics::gauge!("farmpulse_diagnoses_total").increment(1.0);

    let hydrated = hydrate(&db, saved, Hydration::ALL).await?;
    Ok((StatusCode::CREATED, Json(hydrated)).into_response())
}

pub async fn get_diagnosis(
    Extension(db): Extension<DatabaseConnection>,
    Extension(auth): Extension<AuthUser>,
    Path(diagnosis_id): Path<Uuid>,
    Query(params): Query<GetParams>,
) -> Result<Response, ApiError> {
    let d = owned_diagnosis(&db, diagnosis_id, &auth).await?;
    let hydrated = hydrate(&db, d, Hydration::parse(params.include.as_deref())).await?;

    Ok((StatusCode::OK, Json(hydrated)).into_response())
}

/// History is always scoped to the caller's own subject id, newest first.
pub async fn get_history(
    Extension(db): Extension<DatabaseConnection>,
    Extension(auth): Extension<AuthUser>,
    Query(params): Query<PageParams>,
) -> Result<Response, ApiError> {
    let rows = diagnosis::Entity::find()
        .filter(diagnosis::Column::UserId.eq(auth.id))
        .order_by_desc(diagnosis::Column::CreatedAt)
        .offset(params.skip)
        .limit(params.limit)
        .all(&db)
        .await?;

    let include = Hydration {
        images: true,
        symptoms: false,
        final_disease: true,
    };
    let mut out = Vec::with_capacity(rows.len());
    for d in rows {
        out.push(hydrate(&db, d, include).await?);
    }

    let total = out.len();
    Ok((
        StatusCode::OK,
        Json(DiagnosisListResponse {
            diagnoses: out,
            total,
        }),
    )
        .into_response())
}

#[derive(Deserialize)]
pub struct UpdateDiagnosisRequest {
    status: Option<DiagnosisStatus>,
    symptoms_text: Option<String>,
    final_disease_id: Option<Uuid>,
    symptom_ids: Option<Vec<Uuid>>,
}

pub async fn update_diagnosis(
    Extension(db): Extension<DatabaseConnection>,
    Extension(auth): Extension<AuthUser>,
    Path(diagnosis_id): Path<Uuid>,
    Json(payload): Json<UpdateDiagnosisRequest>,
) -> Result<Response, ApiError> {
    let d = owned_diagnosis(&db, diagnosis_id, &auth).await?;

    if let Some(final_disease_id) = payload.final_disease_id {
        disease::Entity::find_by_id(final_disease_id)
            .one(&db)
            .await?
            .ok_or(ApiError::NotFound("Disease"))?;
    }

    let txn = db.begin().await?;

    // user_id and farm_id stay as created; status moves freely between
    // any two values.
    let mut active = d.into_active_model();
    if let Some(status) = payload.status {
        active.status = Set(status);
    }
    if let Some(symptoms_text) = payload.symptoms_text {
        active.symptoms_text = Set(Some(symptoms_text));
    }
    if let Some(final_disease_id) = payload.final_disease_id {
        active.final_disease_id = Set(Some(final_disease_id));
    }
    // Refreshed no matter which fields changed.
    active.updated_at = Set(Utc::now().naive_utc());
    let updated = active.update(&txn).await.map_err(ApiError::from)?;

    if let Some(symptom_ids) = payload.symptom_ids {
        replace_symptoms(&txn, diagnosis_id, symptom_ids).await?;
    }

    txn.commit().await?;

    let hydrated = hydrate(&db, updated, Hydration::ALL).await?;
    Ok((StatusCode::OK, Json(hydrated)).into_response())
}

pub async fn delete_diagnosis(
    Extension(db): Extension<DatabaseConnection>,
    Extension(auth): Extension<AuthUser>,
    Path(diagnosis_id): Path<Uuid>,
) -> Result<Response, ApiError> {
    let d = owned_diagnosis(&db, diagnosis_id, &auth).await?;
    // FK cascade removes symptom associations, images and predictions.
    d.delete(&db).await?;

    metrics::gauge!("farmpulse_diagnoses_total").decrement(1.0);

    Ok((StatusCode::OK, Json(json!({"message": "Diagnosis deleted"}))).into_response())
}

pub async fn upload_image(
    Extension(db): Extension<DatabaseConnection>,
    Extension(auth): Extension<AuthUser>,
    Extension(config): Extension<Arc<AppConfig>>,
    Extension(redis_client): Extension<redis::Client>,
    Path(diagnosis_id): Path<Uuid>,
    mut multipart: Multipart,
) -> Result<Response, ApiError> {
    let d = owned_diagnosis(&db, diagnosis_id, &auth).await?;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::Validation(e.to_string()))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let file_name = field.file_name().unwrap_or("image.jpg").to_string();
        let ext = std::path::Path::new(&file_name)
            .extension()
            .and_then(|s| s.to_str())
            .unwrap_or("jpg")
            .to_ascii_lowercase();

        if !config.extension_allowed(&ext) {
            return Err(ApiError::Validation(format!(
                "image extension .{} is not allowed",
                ext
            )));
        }

        let data = field
            .bytes()
            .await
            .map_err(|e| ApiError::Validation(e.to_string()))?;

        if data.len() > config.max_upload_size {
            return Ok((
                StatusCode::PAYLOAD_TOO_LARGE,
                Json(json!({"error": "payload_too_large", "message": "file too large"})),
            )
                .into_response());
        }

        let now = Utc::now();
        // Diagnosis id + microsecond timestamp keeps names collision-free.
        let stored_name = format!("{}_{}.{}", d.id, now.timestamp_micros(), ext);

        tokio::fs::create_dir_all(&config.upload_dir)
            .await
            .map_err(|e| ApiError::Internal(format!("upload dir: {}", e)))?;
        let file_path = std::path::Path::new(&config.upload_dir).join(&stored_name);
        tokio::fs::write(&file_path, &data)
            .await
            .map_err(|e| ApiError::Internal(format!("file write: {}", e)))?;

        let image = diagnosis_image::ActiveModel {
            id: Set(Uuid::new_v4()),
            diagnosis_id: Set(d.id),
            image_url: Set(format!("/uploads/{}", stored_name)),
            captured_at: Set(now.naive_utc()),
        };
        let saved = image.insert(&db).await.map_err(ApiError::from)?;

        metrics::counter!("farmpulse_images_uploaded_total").increment(1);
        tracing::Span::current()
            .record("table", "diagnosis_images")
            .record("action", "upload_image")
            .record("diagnosis_id", tracing::field::display(d.id));

        // Classification happens asynchronously; a dead queue must not fail
        // the upload.
        let payload = json!({"image_id": saved.id, "diagnosis_id": d.id}).to_string();
        match redis_client.get_multiplexed_async_connection().await {
            Ok(mut conn) => {
                let pushed: redis::RedisResult<()> = conn.rpush("prediction_queue", payload).await;
                if let Err(e) = pushed {
                    tracing::warn!("failed to enqueue prediction job: {}", e);
                }
            }
            Err(e) => tracing::warn!("redis unavailable, prediction job skipped: {}", e),
        }

        return Ok((
            StatusCode::OK,
            Json(ImageUploadResponse {
                diagnosis_image_id: saved.id,
                image_url: saved.image_url,
                diagnosis_id: saved.diagnosis_id,
                captured_at: saved.captured_at,
            }),
        )
            .into_response());
    }

    Err(ApiError::Validation("no file field found".to_string()))
}

pub async fn list_predictions(
    Extension(db): Extension<DatabaseConnection>,
    Extension(auth): Extension<AuthUser>,
    Path(diagnosis_id): Path<Uuid>,
) -> Result<Response, ApiError> {
    let d = owned_diagnosis(&db, diagnosis_id, &auth).await?;

    let predictions = prediction::Entity::find()
        .filter(prediction::Column::DiagnosisId.eq(d.id))
        .order_by_desc(prediction::Column::CreatedAt)
        .all(&db)
        .await?;

    Ok((StatusCode::OK, Json(predictions)).into_response())
}
