use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

// Written once by the classification worker, never updated.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Deserialize, Serialize)]
#[sea_orm(table_name = "predictions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    #[serde(skip_deserializing)]
    pub id: Uuid,
    pub diagnosis_id: Uuid,
    pub diagnosis_image_id: Uuid,
    pub predicted_disease_id: Uuid,
    pub confidence: f64,
    pub created_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::diagnosis::Entity",
        from = "Column::DiagnosisId",
        to = "super::diagnosis::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Diagnosis,
    #[sea_orm(
        belongs_to = "super::diagnosis_image::Entity",
        from = "Column::DiagnosisImageId",
        to = "super::diagnosis_image::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Image,
    #[sea_orm(
        belongs_to = "super::disease::Entity",
        from = "Column::PredictedDiseaseId",
        to = "super::disease::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    PredictedDisease,
}

impl Related<super::diagnosis::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Diagnosis.def()
    }
}

impl Related<super::disease::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PredictedDisease.def()
    }
}

impl Related<super::diagnosis_image::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Image.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
