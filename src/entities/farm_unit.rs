use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::disease::TargetSpecies;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UnitType {
    #[sea_orm(string_value = "POND")]
    Pond,
    #[sea_orm(string_value = "TANK")]
    Tank,
    #[sea_orm(string_value = "COOP")]
    Coop,
    #[sea_orm(string_value = "CAGE")]
    Cage,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Deserialize, Serialize)]
#[sea_orm(table_name = "farm_units")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    #[serde(skip_deserializing)]
    pub id: Uuid,
    pub farm_id: Uuid,
    pub unit_type: UnitType,
    pub unit_name: String,
    pub target_species: TargetSpecies,
    pub created_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::farm::Entity",
        from = "Column::FarmId",
        to = "super::farm::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Farm,
}

impl Related<super::farm::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Farm.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
