use axum::{
    extract::{Extension, Json, Path},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, ModelTrait,
    QueryFilter, Set,
};
use serde::Serialize;
use serde_json::json;
use uuid::Uuid;

use crate::api::error::ApiError;
use crate::api::middleware::AuthUser;
use crate::entities::disease::TargetSpecies;
use crate::entities::farm::{self, FarmStatus, FarmType};
use crate::entities::farm_unit::{self, UnitType};

#[derive(serde::Deserialize)]
pub struct CreateFarmRequest {
    farm_name: String,
    address: Option<String>,
    area_size: Option<f64>,
    farm_type: FarmType,
}

#[derive(serde::Deserialize)]
pub struct UpdateFarmRequest {
    farm_name: Option<String>,
    address: Option<String>,
    area_size: Option<f64>,
    farm_type: Option<FarmType>,
    farm_status: Option<FarmStatus>,
}

#[derive(Serialize)]
pub struct FarmWithUnits {
    #[serde(flatten)]
    pub farm: farm::Model,
    pub units: Vec<farm_unit::Model>,
}

#[derive(Serialize)]
pub struct FarmListResponse {
    pub farms: Vec<FarmWithUnits>,
    pub total: usize,
}

fn validate_area_size(area_size: Option<f64>) -> Result<(), ApiError> {
    match area_size {
        Some(size) if size <= 0.0 => Err(ApiError::Validation(
            "area_size must be greater than zero".to_string(),
        )),
        _ => Ok(()),
    }
}

/// Resolves a farm the caller may act on. A farm owned by someone else
/// surfaces as NotFound (not Forbidden) unless the caller is an admin.
async fn owned_farm(
    db: &DatabaseConnection,
    farm_id: Uuid,
    auth: &AuthUser,
) -> Result<farm::Model, ApiError> {
    match farm::Entity::find_by_id(farm_id).one(db).await? {
        Some(f) if f.owner_id == auth.id || auth.is_admin() => Ok(f),
        _ => Err(ApiError::NotFound("Farm")),
    }
}

pub async fn list_farms(
    Extension(db): Extension<DatabaseConnection>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Response, ApiError> {
    let farms = farm::Entity::find()
        .filter(farm::Column::OwnerId.eq(auth.id))
        .all(&db)
        .await?;

    let mut out = Vec::with_capacity(farms.len());
    for f in farms {
        let units = f.find_related(farm_unit::Entity).all(&db).await?;
        out.push(FarmWithUnits { farm: f, units });
    }

    let total = out.len();
    Ok((StatusCode::OK, Json(FarmListResponse { farms: out, total })).into_response())
}

pub async fn get_farm(
    Extension(db): Extension<DatabaseConnection>,
    Extension(auth): Extension<AuthUser>,
    Path(farm_id): Path<Uuid>,
) -> Result<Response, ApiError> {
    let f = owned_farm(&db, farm_id, &auth).await?;
    let units = f.find_related(farm_unit::Entity).all(&db).await?;

    Ok((StatusCode::OK, Json(FarmWithUnits { farm: f, units })).into_response())
}

pub async fn create_farm(
    Extension(db): Extension<DatabaseConnection>,
    Extension(auth): Extension<AuthUser>,
    Json(payload): Json<CreateFarmRequest>,
) -> Result<Response, ApiError> {
    if payload.farm_name.trim().is_empty() {
        return Err(ApiError::Validation("farm_name must not be empty".to_string()));
    }
    validate_area_size(payload.area_size)?;

    let now = Utc::now().naive_utc();
    let new_farm = farm::ActiveModel {
        id: Set(Uuid::new_v4()),
        owner_id: Set(auth.id),
        farm_name: Set(payload.farm_name),
        address: Set(payload.address),
        area_size: Set(payload.area_size),
        farm_type: Set(payload.farm_type),
        farm_status: Set(FarmStatus::Active),
        created_at: Set(now),
        updated_at: Set(now),
    };

    let saved = new_farm.insert(&db).await?;

    tracing::Span::current()
        .record("table", "farms")
        .record("action", "create_farm")
        .record("user_id", tracing::field::display(auth.id));
    metrics::gauge!("farmpulse_farms_total").increment(1.0);

    Ok((
        StatusCode::CREATED,
        Json(FarmWithUnits {
            farm: saved,
            units: vec![],
        }),
    )
        .into_response())
}

pub async fn update_farm(
    Extension(db): Extension<DatabaseConnection>,
    Extension(auth): Extension<AuthUser>,
    Path(farm_id): Path<Uuid>,
    Json(payload): Json<UpdateFarmRequest>,
) -> Result<Response, ApiError> {
    validate_area_size(payload.area_size)?;

    let f = owned_farm(&db, farm_id, &auth).await?;

    // owner_id is immutable; only the fields present in the payload change.
    let mut active = f.into_active_model();
    if let Some(farm_name) = payload.farm_name {
        active.farm_name = Set(farm_name);
    }
    if let Some(address) = payload.address {
        active.address = Set(Some(address));
    }
    if let Some(area_size) = payload.area_size {
        active.area_size = Set(Some(area_size));
    }
    if let Some(farm_type) = payload.farm_type {
        active.farm_type = Set(farm_type);
    }
    if let Some(farm_status) = payload.farm_status {
        active.farm_status = Set(farm_status);
    }
    active.updated_at = Set(Utc::now().naive_utc());

    let updated = active.update(&db).await?;
    let units = updated.find_related(farm_unit::Entity).all(&db).await?;

    Ok((
        StatusCode::OK,
        Json(FarmWithUnits {
            farm: updated,
            units,
        }),
    )
        .into_response())
}

pub async fn delete_farm(
    Extension(db): Extension<DatabaseConnection>,
    Extension(auth): Extension<AuthUser>,
    Path(farm_id): Path<Uuid>,
) -> Result<Response, ApiError> {
    let f = owned_farm(&db, farm_id, &auth).await?;
    // FK cascade removes units and diagnoses with the farm.
    f.delete(&db).await?;

    metrics::gauge!("farmpulse_farms_total").decrement(1.0);

    Ok((StatusCode::OK, Json(json!({"message": "Farm deleted"}))).into_response())
}

// Farm units

#[derive(serde::Deserialize)]
pub struct CreateFarmUnitRequest {
    farm_id: Uuid,
    unit_type: UnitType,
    unit_name: String,
    target_species: TargetSpecies,
}

#[derive(serde::Deserialize)]
pub struct UpdateFarmUnitRequest {
    unit_type: Option<UnitType>,
    unit_name: Option<String>,
    target_species: Option<TargetSpecies>,
}

async fn owned_unit(
    db: &DatabaseConnection,
    unit_id: Uuid,
    auth: &AuthUser,
) -> Result<farm_unit::Model, ApiError> {
    let unit = farm_unit::Entity::find_by_id(unit_id)
        .one(db)
        .await?
        .ok_or(ApiError::NotFound("Farm unit"))?;
    // Ownership follows the parent farm.
    owned_farm(db, unit.farm_id, auth)
        .await
        .map_err(|_| ApiError::NotFound("Farm unit"))?;
    Ok(unit)
}

pub async fn create_farm_unit(
    Extension(db): Extension<DatabaseConnection>,
    Extension(auth): Extension<AuthUser>,
    Json(payload): Json<CreateFarmUnitRequest>,
) -> Result<Response, ApiError> {
    if payload.unit_name.trim().is_empty() {
        return Err(ApiError::Validation("unit_name must not be empty".to_string()));
    }

    owned_farm(&db, payload.farm_id, &auth).await?;

    let new_unit = farm_unit::ActiveModel {
        id: Set(Uuid::new_v4()),
        farm_id: Set(payload.farm_id),
        unit_type: Set(payload.unit_type),
        unit_name: Set(payload.unit_name),
        target_species: Set(payload.target_species),
        created_at: Set(Utc::now().naive_utc()),
    };

    let saved = new_unit.insert(&db).await?;

    Ok((StatusCode::CREATED, Json(saved)).into_response())
}

pub async fn update_farm_unit(
    Extension(db): Extension<DatabaseConnection>,
    Extension(auth): Extension<AuthUser>,
    Path(unit_id): Path<Uuid>,
    Json(payload): Json<UpdateFarmUnitRequest>,
) -> Result<Response, ApiError> {
    let unit = owned_unit(&db, unit_id, &auth).await?;

    let mut active = unit.into_active_model();
    if let Some(unit_type) = payload.unit_type {
        active.unit_type = Set(unit_type);
    }
    if let Some(unit_name) = payload.unit_name {
        active.unit_name = Set(unit_name);
    }
    if let Some(target_species) = payload.target_species {
        active.target_species = Set(target_species);
    }

    let updated = active.update(&db).await?;

    Ok((StatusCode::OK, Json(updated)).into_response())
}

pub async fn delete_farm_unit(
    Extension(db): Extension<DatabaseConnection>,
    Extension(auth): Extension<AuthUser>,
    Path(unit_id): Path<Uuid>,
) -> Result<Response, ApiError> {
    let unit = owned_unit(&db, unit_id, &auth).await?;
    unit.delete(&db).await?;

    Ok((StatusCode::OK, Json(json!({"message": "Farm unit deleted"}))).into_response())
}
