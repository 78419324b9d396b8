use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Deserialize, Serialize)]
#[sea_orm(table_name = "diagnosis_images")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    #[serde(skip_deserializing)]
    pub id: Uuid,
    pub diagnosis_id: Uuid,
    pub image_url: String,
    pub captured_at: DateTime,
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
    #[sea_orm(has_many = "super::prediction::Entity")]
    Predictions,
}

impl Related<super::diagnosis::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Diagnosis.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
