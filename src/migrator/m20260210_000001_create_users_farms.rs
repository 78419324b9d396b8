use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Users::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Users::Name).string().not_null())
                    .col(
                        ColumnDef::new(Users::Email)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Users::PasswordHash).string().not_null())
                    .col(ColumnDef::new(Users::Role).string_len(20).not_null())
                    .col(ColumnDef::new(Users::Phone).string().null())
                    .col(ColumnDef::new(Users::Address).string().null())
                    .col(ColumnDef::new(Users::CreatedAt).date_time().not_null())
                    .col(ColumnDef::new(Users::UpdatedAt).date_time().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Farms::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Farms::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Farms::OwnerId).uuid().not_null())
                    .col(ColumnDef::new(Farms::FarmName).string().not_null())
                    .col(ColumnDef::new(Farms::Address).string().null())
                    .col(ColumnDef::new(Farms::AreaSize).double().null())
                    .col(ColumnDef::new(Farms::FarmType).string_len(20).not_null())
                    .col(ColumnDef::new(Farms::FarmStatus).string_len(20).not_null())
                    .col(ColumnDef::new(Farms::CreatedAt).date_time().not_null())
                    .col(ColumnDef::new(Farms::UpdatedAt).date_time().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-farm-owner_id")
                            .from(Farms::Table, Farms::OwnerId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(FarmUnits::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(FarmUnits::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(FarmUnits::FarmId).uuid().not_null())
                    .col(
                        ColumnDef::new(FarmUnits::UnitType)
                            .string_len(20)
                            .not_null(),
                    )
                    .col(ColumnDef::new(FarmUnits::UnitName).string().not_null())
                    .col(
                        ColumnDef::new(FarmUnits::TargetSpecies)
                            .string_len(20)
                            .not_null(),
                    )
                    .col(ColumnDef::new(FarmUnits::CreatedAt).date_time().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-farm_unit-farm_id")
                            .from(FarmUnits::Table, FarmUnits::FarmId)
                            .to(Farms::Table, Farms::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(FarmUnits::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Farms::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
    Name,
    Email,
    PasswordHash,
    Role,
    Phone,
    Address,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Farms {
    Table,
    Id,
    OwnerId,
    FarmName,
    Address,
    AreaSize,
    FarmType,
    FarmStatus,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum FarmUnits {
    Table,
    Id,
    FarmId,
    UnitType,
    UnitName,
    TargetSpecies,
    CreatedAt,
}
