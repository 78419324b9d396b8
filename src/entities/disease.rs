use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TargetSpecies {
    #[sea_orm(string_value = "FISH")]
    Fish,
    #[sea_orm(string_value = "POULTRY")]
    Poultry,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SeverityLevel {
    #[sea_orm(string_value = "LOW")]
    Low,
    #[sea_orm(string_value = "MEDIUM")]
    Medium,
    #[sea_orm(string_value = "HIGH")]
    High,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Deserialize, Serialize)]
#[sea_orm(table_name = "diseases")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    #[serde(skip_deserializing)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub disease_name: String,
    pub target_species: TargetSpecies,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    pub contagious: bool,
    pub severity_level: SeverityLevel,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::disease_symptom::Entity")]
    DiseaseSymptoms,
    #[sea_orm(has_many = "super::disease_treatment::Entity")]
    DiseaseTreatments,
}

impl Related<super::symptom::Entity> for Entity {
    fn to() -> RelationDef {
        super::disease_symptom::Relation::Symptom.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::disease_symptom::Relation::Disease.def().rev())
    }
}

impl Related<super::treatment::Entity> for Entity {
    fn to() -> RelationDef {
        super::disease_treatment::Relation::Treatment.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::disease_treatment::Relation::Disease.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
