use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Deserialize, Serialize)]
#[sea_orm(table_name = "diagnosis_symptoms")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub diagnosis_id: Uuid,
    #[sea_orm(primary_key, auto_increment = false)]
    pub symptom_id: Uuid,
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
        belongs_to = "super::symptom::Entity",
        from = "Column::SymptomId",
        to = "super::symptom::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Symptom,
}

impl Related<super::diagnosis::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Diagnosis.def()
    }
}

impl Related<super::symptom::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Symptom.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
