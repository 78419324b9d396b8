use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::disease::TargetSpecies;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Deserialize, Serialize)]
#[sea_orm(table_name = "symptoms")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    #[serde(skip_deserializing)]
    pub id: Uuid,
    pub symptom_name: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub symptom_description: Option<String>,
    pub target_species: TargetSpecies,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::disease_symptom::Entity")]
    DiseaseSymptoms,
    #[sea_orm(has_many = "super::diagnosis_symptom::Entity")]
    DiagnosisSymptoms,
}

impl Related<super::disease::Entity> for Entity {
    fn to() -> RelationDef {
        super::disease_symptom::Relation::Disease.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::disease_symptom::Relation::Symptom.def().rev())
    }
}

impl Related<super::diagnosis::Entity> for Entity {
    fn to() -> RelationDef {
        super::diagnosis_symptom::Relation::Diagnosis.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::diagnosis_symptom::Relation::Symptom.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
