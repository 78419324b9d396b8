use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

// Join row carrying curation notes and the primary-treatment flag.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Deserialize, Serialize)]
#[sea_orm(table_name = "disease_treatments")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub disease_id: Uuid,
    #[sea_orm(primary_key, auto_increment = false)]
    pub treatment_id: Uuid,
    #[sea_orm(column_type = "Text", nullable)]
    pub effectiveness_notes: Option<String>,
    pub is_primary_treatment: bool,
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
        belongs_to = "super::treatment::Entity",
        from = "Column::TreatmentId",
        to = "super::treatment::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Treatment,
}

impl Related<super::disease::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Disease.def()
    }
}

impl Related<super::treatment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Treatment.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
