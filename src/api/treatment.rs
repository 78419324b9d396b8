use axum::{
    extract::{Extension, Json, Path, Query},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, QueryFilter,
    QuerySelect, Set,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use crate::api::disease::PageParams;
use crate::api::error::ApiError;
use crate::api::middleware::AuthUser;
use crate::entities::disease;
use crate::entities::disease_treatment;
use crate::entities::treatment::{self, ApplicationMethod};

#[derive(Deserialize)]
pub struct CreateTreatmentRequest {
    treatment_name: String,
    medication_name: Option<String>,
    application_method: ApplicationMethod,
    dosage_text: Option<String>,
    duration_days: Option<i32>,
    precaution: Option<String>,
    alternatives_note: Option<String>,
}

#[derive(Deserialize)]
pub struct UpdateTreatmentRequest {
    treatment_name: Option<String>,
    medication_name: Option<String>,
    application_method: Option<ApplicationMethod>,
    dosage_text: Option<String>,
    duration_days: Option<i32>,
    precaution: Option<String>,
    alternatives_note: Option<String>,
}

#[derive(Serialize)]
pub struct TreatmentListResponse {
    pub treatments: Vec<treatment::Model>,
    pub total: usize,
}

#[derive(Serialize)]
pub struct DiseaseTreatmentResponse {
    pub disease_id: Uuid,
    pub treatment_id: Uuid,
    pub effectiveness_notes: Option<String>,
    pub is_primary_treatment: bool,
    pub treatment: treatment::Model,
}

fn validate_duration(duration_days: Option<i32>) -> Result<(), ApiError> {
    match duration_days {
        Some(days) if days < 1 => Err(ApiError::Validation(
            "duration_days must be at least 1".to_string(),
        )),
        _ => Ok(()),
    }
}

pub async fn get_treatments(
    Extension(db): Extension<DatabaseConnection>,
    Query(params): Query<PageParams>,
) -> Result<Response, ApiError> {
    let treatments = treatment::Entity::find()
        .offset(params.skip)
        .limit(params.limit)
        .all(&db)
        .await?;

    let total = treatments.len();
    Ok((
        StatusCode::OK,
        Json(TreatmentListResponse { treatments, total }),
    )
        .into_response())
}

pub async fn get_treatment(
    Extension(db): Extension<DatabaseConnection>,
    Path(treatment_id): Path<Uuid>,
) -> Result<Response, ApiError> {
    let t = treatment::Entity::find_by_id(treatment_id)
        .one(&db)
        .await?
        .ok_or(ApiError::NotFound("Treatment"))?;

    Ok((StatusCode::OK, Json(t)).into_response())
}

pub async fn create_treatment(
    Extension(db): Extension<DatabaseConnection>,
    Extension(auth): Extension<AuthUser>,
    Json(payload): Json<CreateTreatmentRequest>,
) -> Result<Response, ApiError> {
    auth.require_admin()?;

    if payload.treatment_name.trim().is_empty() {
        return Err(ApiError::Validation(
            "treatment_name must not be empty".to_string(),
        ));
    }
    validate_duration(payload.duration_days)?;

    let new_treatment = treatment::ActiveModel {
        id: Set(Uuid::new_v4()),
        treatment_name: Set(payload.treatment_name),
        medication_name: Set(payload.medication_name),
        application_method: Set(payload.application_method),
        dosage_text: Set(payload.dosage_text),
        duration_days: Set(payload.duration_days),
        precaution: Set(payload.precaution),
        alternatives_note: Set(payload.alternatives_note),
    };

    let saved = new_treatment.insert(&db).await?;

    Ok((StatusCode::CREATED, Json(saved)).into_response())
}

pub async fn update_treatment(
    Extension(db): Extension<DatabaseConnection>,
    Extension(auth): Extension<AuthUser>,
    Path(treatment_id): Path<Uuid>,
    Json(payload): Json<UpdateTreatmentRequest>,
) -> Result<Response, ApiError> {
    auth.require_admin()?;
    validate_duration(payload.duration_days)?;

    let t = treatment::Entity::find_by_id(treatment_id)
        .one(&db)
        .await?
        .ok_or(ApiError::NotFound("Treatment"))?;

    let mut active = t.into_active_model();
    if let Some(treatment_name) = payload.treatment_name {
        active.treatment_name = Set(treatment_name);
    }
    if let Some(medication_name) = payload.medication_name {
        active.medication_name = Set(Some(medication_name));
    }
    if let Some(application_method) = payload.application_method {
        active.application_method = Set(application_method);
    }
    if let Some(dosage_text) = payload.dosage_text {
        active.dosage_text = Set(Some(dosage_text));
    }
    if let Some(duration_days) = payload.duration_days {
        active.duration_days = Set(Some(duration_days));
    }
    if let Some(precaution) = payload.precaution {
        active.precaution = Set(Some(precaution));
    }
    if let Some(alternatives_note) = payload.alternatives_note {
        active.alternatives_note = Set(Some(alternatives_note));
    }

    let updated = active.update(&db).await?;

    Ok((StatusCode::OK, Json(updated)).into_response())
}

pub async fn delete_treatment(
    Extension(db): Extension<DatabaseConnection>,
    Extension(auth): Extension<AuthUser>,
    Path(treatment_id): Path<Uuid>,
) -> Result<Response, ApiError> {
    auth.require_admin()?;

    let res = treatment::Entity::delete_by_id(treatment_id).exec(&db).await?;
    if res.rows_affected == 0 {
        return Err(ApiError::NotFound("Treatment"));
    }

    Ok((StatusCode::OK, Json(json!({"message": "Treatment deleted"}))).into_response())
}

// Disease <-> treatment links

#[derive(Deserialize)]
pub struct LinkTreatmentRequest {
    treatment_id: Uuid,
    effectiveness_notes: Option<String>,
    #[serde(default)]
    is_primary_treatment: bool,
}

pub async fn list_disease_treatments(
    Extension(db): Extension<DatabaseConnection>,
    Path(disease_id): Path<Uuid>,
) -> Result<Response, ApiError> {
    disease::Entity::find_by_id(disease_id)
        .one(&db)
        .await?
        .ok_or(ApiError::NotFound("Disease"))?;

    let links = disease_treatment::Entity::find()
        .filter(disease_treatment::Column::DiseaseId.eq(disease_id))
        .find_also_related(treatment::Entity)
        .all(&db)
        .await?;

    let out: Vec<DiseaseTreatmentResponse> = links
        .into_iter()
        .filter_map(|(link, t)| {
            t.map(|t| DiseaseTreatmentResponse {
                disease_id: link.disease_id,
                treatment_id: link.treatment_id,
                effectiveness_notes: link.effectiveness_notes,
                is_primary_treatment: link.is_primary_treatment,
                treatment: t,
            })
        })
        .collect();

    Ok((StatusCode::OK, Json(out)).into_response())
}

pub async fn link_treatment(
    Extension(db): Extension<DatabaseConnection>,
    Extension(auth): Extension<AuthUser>,
    Path(disease_id): Path<Uuid>,
    Json(payload): Json<LinkTreatmentRequest>,
) -> Result<Response, ApiError> {
    auth.require_admin()?;

    disease::Entity::find_by_id(disease_id)
        .one(&db)
        .await?
        .ok_or(ApiError::NotFound("Disease"))?;
    treatment::Entity::find_by_id(payload.treatment_id)
        .one(&db)
        .await?
        .ok_or(ApiError::NotFound("Treatment"))?;

    let existing = disease_treatment::Entity::find_by_id((disease_id, payload.treatment_id))
        .one(&db)
        .await?;
    if existing.is_some() {
        return Err(ApiError::Conflict(
            "treatment already linked to disease".to_string(),
        ));
    }

    let link = disease_treatment::ActiveModel {
        disease_id: Set(disease_id),
        treatment_id: Set(payload.treatment_id),
        effectiveness_notes: Set(payload.effectiveness_notes),
        is_primary_treatment: Set(payload.is_primary_treatment),
    };
    let saved = link.insert(&db).await.map_err(ApiError::from)?;

    Ok((StatusCode::CREATED, Json(saved)).into_response())
}

pub async fn unlink_treatment(
    Extension(db): Extension<DatabaseConnection>,
    Extension(auth): Extension<AuthUser>,
    Path((disease_id, treatment_id)): Path<(Uuid, Uuid)>,
) -> Result<Response, ApiError> {
    auth.require_admin()?;

    let res = disease_treatment::Entity::delete_by_id((disease_id, treatment_id))
        .exec(&db)
        .await?;
    if res.rows_affected == 0 {
        return Err(ApiError::NotFound("Disease treatment"));
    }

    Ok((
        StatusCode::OK,
        Json(json!({"message": "Treatment unlinked"})),
    )
        .into_response())
}
