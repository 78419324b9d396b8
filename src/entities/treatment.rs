use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ApplicationMethod {
    #[sea_orm(string_value = "BATH")]
    Bath,
    #[sea_orm(string_value = "FEED")]
    Feed,
    #[sea_orm(string_value = "INJECTION")]
    Injection,
    #[sea_orm(string_value = "TOPICAL")]
    Topical,
    #[sea_orm(string_value = "WATER")]
    Water,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Deserialize, Serialize)]
#[sea_orm(table_name = "treatments")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    #[serde(skip_deserializing)]
    pub id: Uuid,
    pub treatment_name: String,
    pub medication_name: Option<String>,
    pub application_method: ApplicationMethod,
    #[sea_orm(column_type = "Text", nullable)]
    pub dosage_text: Option<String>,
    pub duration_days: Option<i32>,
    #[sea_orm(column_type = "Text", nullable)]
    pub precaution: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub alternatives_note: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::disease_treatment::Entity")]
    DiseaseTreatments,
}

impl Related<super::disease::Entity> for Entity {
    fn to() -> RelationDef {
        super::disease_treatment::Relation::Disease.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::disease_treatment::Relation::Treatment.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
