use axum::{
    extract::{Extension, Json, Path, Query},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    IntoActiveModel, ModelTrait, PaginatorTrait, QueryFilter, QuerySelect, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use crate::api::error::ApiError;
use crate::api::middleware::AuthUser;
use crate::entities::disease::{self, SeverityLevel, TargetSpecies};
use crate::entities::disease_symptom;
use crate::entities::symptom;

#[derive(Debug, Deserialize)]
pub struct PageParams {
    #[serde(default)]
    pub skip: u64,
    #[serde(default = "default_limit")]
    pub limit: u64,
}

fn default_limit() -> u64 {
    100
}

#[derive(Serialize)]
pub struct DiseaseWithSymptoms {
    #[serde(flatten)]
    pub disease: disease::Model,
    pub symptoms: Vec<symptom::Model>,
}

#[derive(Serialize)]
pub struct DiseaseListResponse {
    pub diseases: Vec<DiseaseWithSymptoms>,
    pub total: usize,
}

/// Collapses duplicates, verifies every id exists, then replaces the
/// disease's association rows with exactly the supplied set. Runs on the
/// caller's transaction so a missing symptom aborts the whole update.
async fn replace_symptoms<C: ConnectionTrait>(
    txn: &C,
    disease_id: Uuid,
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

    disease_symptom::Entity::delete_many()
        .filter(disease_symptom::Column::DiseaseId.eq(disease_id))
        .exec(txn)
        .await?;

    if !unique.is_empty() {
        let rows: Vec<disease_symptom::ActiveModel> = unique
            .into_iter()
            .map(|symptom_id| disease_symptom::ActiveModel {
                disease_id: Set(disease_id),
                symptom_id: Set(symptom_id),
            })
            .collect();
        disease_symptom::Entity::insert_many(rows).exec(txn).await?;
    }

    Ok(())
}

async fn load_disease(
    db: &DatabaseConnection,
    disease_id: Uuid,
) -> Result<DiseaseWithSymptoms, ApiError> {
    let d = disease::Entity::find_by_id(disease_id)
        .one(db)
        .await?
        .ok_or(ApiError::NotFound("Disease"))?;
    let symptoms = d.find_related(symptom::Entity).all(db).await?;
    Ok(DiseaseWithSymptoms {
        disease: d,
        symptoms,
    })
}

pub async fn get_diseases(
    Extension(db): Extension<DatabaseConnection>,
    Query(params): Query<PageParams>,
) -> Result<Response, ApiError> {
    let diseases = disease::Entity::find()
        .offset(params.skip)
        .limit(params.limit)
        .all(&db)
        .await?;

    let mut out = Vec::with_capacity(diseases.len());
    for d in diseases {
        let symptoms = d.find_related(symptom::Entity).all(&db).await?;
        out.push(DiseaseWithSymptoms {
            disease: d,
            symptoms,
        });
    }

    let total = out.len();
    Ok((
        StatusCode::OK,
        Json(DiseaseListResponse {
            diseases: out,
            total,
        }),
    )
        .into_response())
}

pub async fn get_disease(
    Extension(db): Extension<DatabaseConnection>,
    Path(disease_id): Path<Uuid>,
) -> Result<Response, ApiError> {
    let loaded = load_disease(&db, disease_id).await?;
    Ok((StatusCode::OK, Json(loaded)).into_response())
}

#[derive(Deserialize)]
pub struct CreateDiseaseRequest {
    disease_name: String,
    target_species: TargetSpecies,
    description: Option<String>,
    #[serde(default)]
    contagious: bool,
    severity_level: Option<SeverityLevel>,
    #[serde(default)]
    symptom_ids: Vec<Uuid>,
}

pub async fn create_disease(
    Extension(db): Extension<DatabaseConnection>,
    Extension(auth): Extension<AuthUser>,
    Json(payload): Json<CreateDiseaseRequest>,
) -> Result<Response, ApiError> {
    auth.require_admin()?;

    if payload.disease_name.trim().is_empty() {
        return Err(ApiError::Validation(
            "disease_name must not be empty".to_string(),
        ));
    }

    let existing = disease::Entity::find()
        .filter(disease::Column::DiseaseName.eq(payload.disease_name.clone()))
        .one(&db)
        .await?;
    if existing.is_some() {
        return Err(ApiError::Conflict("disease name already exists".to_string()));
    }

    let txn = db.begin().await?;

    let new_disease = disease::ActiveModel {
        id: Set(Uuid::new_v4()),
        disease_name: Set(payload.disease_name),
        target_species: Set(payload.target_species),
        description: Set(payload.description),
        contagious: Set(payload.contagious),
        severity_level: Set(payload.severity_level.unwrap_or(SeverityLevel::Medium)),
    };
    let saved = new_disease.insert(&txn).await.map_err(ApiError::from)?;

    replace_symptoms(&txn, saved.id, payload.symptom_ids).await?;

    txn.commit().await?;

    tracing::Span::current()
        .record("table", "diseases")
        .record("action", "create_disease")
        .record("user_id", tracing::field::display(auth.id));

    let loaded = load_disease(&db, saved.id).await?;
    Ok((StatusCode::CREATED, Json(loaded)).into_response())
}

#[derive(Deserialize)]
pub struct UpdateDiseaseRequest {
    disease_name: Option<String>,
    target_species: Option<TargetSpecies>,
    description: Option<String>,
    contagious: Option<bool>,
    severity_level: Option<SeverityLevel>,
    symptom_ids: Option<Vec<Uuid>>,
}

pub async fn update_disease(
    Extension(db): Extension<DatabaseConnection>,
    Extension(auth): Extension<AuthUser>,
    Path(disease_id): Path<Uuid>,
    Json(payload): Json<UpdateDiseaseRequest>,
) -> Result<Response, ApiError> {
    auth.require_admin()?;

    let d = disease::Entity::find_by_id(disease_id)
        .one(&db)
        .await?
        .ok_or(ApiError::NotFound("Disease"))?;

    let txn = db.begin().await?;

    let mut active = d.into_active_model();
    if let Some(disease_name) = payload.disease_name {
        active.disease_name = Set(disease_name);
    }
    if let Some(target_species) = payload.target_species {
        active.target_species = Set(target_species);
    }
    if let Some(description) = payload.description {
        active.description = Set(Some(description));
    }
    if let Some(contagious) = payload.contagious {
        active.contagious = Set(contagious);
    }
    if let Some(severity_level) = payload.severity_level {
        active.severity_level = Set(severity_level);
    }
    active.update(&txn).await.map_err(ApiError::from)?;

    if let Some(symptom_ids) = payload.symptom_ids {
        replace_symptoms(&txn, disease_id, symptom_ids).await?;
    }

    txn.commit().await?;

    let loaded = load_disease(&db, disease_id).await?;
    Ok((StatusCode::OK, Json(loaded)).into_response())
}

pub async fn delete_disease(
    Extension(db): Extension<DatabaseConnection>,
    Extension(auth): Extension<AuthUser>,
    Path(disease_id): Path<Uuid>,
) -> Result<Response, ApiError> {
    auth.require_admin()?;

    let res = disease::Entity::delete_by_id(disease_id).exec(&db).await?;
    if res.rows_affected == 0 {
        return Err(ApiError::NotFound("Disease"));
    }

    Ok((StatusCode::OK, Json(json!({"message": "Disease deleted"}))).into_response())
}

// Symptoms

#[derive(Deserialize)]
pub struct CreateSymptomRequest {
    symptom_name: String,
    symptom_description: Option<String>,
    target_species: TargetSpecies,
}

#[derive(Deserialize)]
pub struct UpdateSymptomRequest {
    symptom_name: Option<String>,
    symptom_description: Option<String>,
    target_species: Option<TargetSpecies>,
}

pub async fn get_symptoms(
    Extension(db): Extension<DatabaseConnection>,
    Query(params): Query<PageParams>,
) -> Result<Response, ApiError> {
    let symptoms = symptom::Entity::find()
        .offset(params.skip)
        .limit(params.limit)
        .all(&db)
        .await?;

    Ok((StatusCode::OK, Json(symptoms)).into_response())
}

pub async fn get_symptom(
    Extension(db): Extension<DatabaseConnection>,
    Path(symptom_id): Path<Uuid>,
) -> Result<Response, ApiError> {
    let s = symptom::Entity::find_by_id(symptom_id)
        .one(&db)
        .await?
        .ok_or(ApiError::NotFound("Symptom"))?;

    Ok((StatusCode::OK, Json(s)).into_response())
}

pub async fn create_symptom(
    Extension(db): Extension<DatabaseConnection>,
    Extension(auth): Extension<AuthUser>,
    Json(payload): Json<CreateSymptomRequest>,
) -> Result<Response, ApiError> {
    auth.require_admin()?;

    if payload.symptom_name.trim().is_empty() {
        return Err(ApiError::Validation(
            "symptom_name must not be empty".to_string(),
        ));
    }

    let new_symptom = symptom::ActiveModel {
        id: Set(Uuid::new_v4()),
        symptom_name: Set(payload.symptom_name),
        symptom_description: Set(payload.symptom_description),
        target_species: Set(payload.target_species),
    };

    let saved = new_symptom.insert(&db).await?;

    Ok((StatusCode::CREATED, Json(saved)).into_response())
}

pub async fn update_symptom(
    Extension(db): Extension<DatabaseConnection>,
    Extension(auth): Extension<AuthUser>,
    Path(symptom_id): Path<Uuid>,
    Json(payload): Json<UpdateSymptomRequest>,
) -> Result<Response, ApiError> {
    auth.require_admin()?;

    let s = symptom::Entity::find_by_id(symptom_id)
        .one(&db)
        .await?
        .ok_or(ApiError::NotFound("Symptom"))?;

    let mut active = s.into_active_model();
    if let Some(symptom_name) = payload.symptom_name {
        active.symptom_name = Set(symptom_name);
    }
    if let Some(symptom_description) = payload.symptom_description {
        active.symptom_description = Set(Some(symptom_description));
    }
    if let Some(target_species) = payload.target_species {
        active.target_species = Set(target_species);
    }

    let updated = active.update(&db).await?;

    Ok((StatusCode::OK, Json(updated)).into_response())
}

pub async fn delete_symptom(
    Extension(db): Extension<DatabaseConnection>,
    Extension(auth): Extension<AuthUser>,
    Path(symptom_id): Path<Uuid>,
) -> Result<Response, ApiError> {
    auth.require_admin()?;

    let res = symptom::Entity::delete_by_id(symptom_id).exec(&db).await?;
    if res.rows_affected == 0 {
        return Err(ApiError::NotFound("Symptom"));
    }

    Ok((StatusCode::OK, Json(json!({"message": "Symptom deleted"}))).into_response())
}
