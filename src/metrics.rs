use crate::entities::{diagnosis, farm, user};
use sea_orm::{DatabaseConnection, EntityTrait, PaginatorTrait};

pub async fn init_metrics(db: &DatabaseConnection) {
    let user_count = user::Entity::find().count(db).await.unwrap_or(0);
    metrics::gauge!("farmpulse_users_total").set(user_count as f64);

    let farm_count = farm::Entity::find().count(db).await.unwrap_or(0);
    metrics::gauge!("farmpulse_farms_total").set(farm_count as f64);

    let diagnosis_count = diagnosis::Entity::find().count(db).await.unwrap_or(0);
    metrics::gauge!("farmpulse_diagnoses_total").set(diagnosis_count as f64);

    tracing::info!(
        "Initialized metrics: Users={}, Farms={}, Diagnoses={}",
        user_count,
        farm_count,
        diagnosis_count
    );
}
