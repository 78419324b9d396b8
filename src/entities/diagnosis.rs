use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::disease::TargetSpecies;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DiagnosisStatus {
    #[sea_orm(string_value = "OPEN")]
    Open,
    #[sea_orm(string_value = "IN_REVIEW")]
    InReview,
    #[sea_orm(string_value = "RESOLVED")]
    Resolved,
    #[sea_orm(string_value = "DISMISSED")]
    Dismissed,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Deserialize, Serialize)]
#[sea_orm(table_name = "diagnoses")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    #[serde(skip_deserializing)]
    pub id: Uuid,
    pub user_id: Uuid,
    pub farm_id: Uuid,
    pub unit_id: Option<Uuid>,
    pub target_species: TargetSpecies,
    pub status: DiagnosisStatus,
    #[sea_orm(column_type = "Text", nullable)]
    pub symptoms_text: Option<String>,
    pub final_disease_id: Option<Uuid>,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    User,
    #[sea_orm(
        belongs_to = "super::farm::Entity",
        from = "Column::FarmId",
        to = "super::farm::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Farm,
    #[sea_orm(
        belongs_to = "super::farm_unit::Entity",
        from = "Column::UnitId",
        to = "super::farm_unit::Column::Id",
        on_update = "Cascade",
        on_delete = "SetNull"
    )]
    Unit,
    #[sea_orm(
        belongs_to = "super::disease::Entity",
        from = "Column::FinalDiseaseId",
        to = "super::disease::Column::Id",
        on_update = "Cascade",
        on_delete = "SetNull"
    )]
    FinalDisease,
    #[sea_orm(has_many = "super::diagnosis_image::Entity")]
    Images,
    #[sea_orm(has_many = "super::diagnosis_symptom::Entity")]
    DiagnosisSymptoms,
    #[sea_orm(has_many = "super::prediction::Entity")]
    Predictions,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::farm::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Farm.def()
    }
}

impl Related<super::diagnosis_image::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Images.def()
    }
}

impl Related<super::symptom::Entity> for Entity {
    fn to() -> RelationDef {
        super::diagnosis_symptom::Relation::Symptom.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::diagnosis_symptom::Relation::Diagnosis.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
