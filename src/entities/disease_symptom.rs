use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

// Pure join row; replaced wholesale when a disease's symptom list changes.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Deserialize, Serialize)]
#[sea_orm(table_name = "disease_symptoms")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub disease_id: Uuid,
    #[sea_orm(primary_key, auto_increment = false)]
    pub symptom_id: Uuid,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::disease::Entity",
        from = "Column::DiseaseId",
        to = "super::disease::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Disease,
    #[sea_orm(
        belongs_to = "super::symptom::Entity",
        from = "Column::SymptomId",
        to = "super::symptom::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Symptom,
}

impl Related<super::disease::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Disease.def()
    }
}

impl Related<super::symptom::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Symptom.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
