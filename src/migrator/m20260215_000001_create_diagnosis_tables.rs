use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Diagnoses::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Diagnoses::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Diagnoses::UserId).uuid().not_null())
                    .col(ColumnDef::new(Diagnoses::FarmId).uuid().not_null())
                    .col(ColumnDef::new(Diagnoses::UnitId).uuid().null())
                    .col(
                        ColumnDef::new(Diagnoses::TargetSpecies)
                            .string_len(20)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Diagnoses::Status).string_len(20).not_null())
                    .col(ColumnDef::new(Diagnoses::SymptomsText).text().null())
                    .col(ColumnDef::new(Diagnoses::FinalDiseaseId).uuid().null())
                    .col(ColumnDef::new(Diagnoses::CreatedAt).date_time().not_null())
                    .col(ColumnDef::new(Diagnoses::UpdatedAt).date_time().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-diagnosis-user_id")
                            .from(Diagnoses::Table, Diagnoses::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-diagnosis-farm_id")
                            .from(Diagnoses::Table, Diagnoses::FarmId)
                            .to(Farms::Table, Farms::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-diagnosis-unit_id")
                            .from(Diagnoses::Table, Diagnoses::UnitId)
                            .to(FarmUnits::Table, FarmUnits::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-diagnosis-final_disease_id")
                            .from(Diagnoses::Table, Diagnoses::FinalDiseaseId)
                            .to(Diseases::Table, Diseases::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(DiagnosisSymptoms::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(DiagnosisSymptoms::DiagnosisId)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(DiagnosisSymptoms::SymptomId)
                            .uuid()
                            .not_null(),
                    )
                    .primary_key(
                        Index::create()
                            .col(DiagnosisSymptoms::DiagnosisId)
                            .col(DiagnosisSymptoms::SymptomId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-diagnosis_symptom-diagnosis_id")
                            .from(DiagnosisSymptoms::Table, DiagnosisSymptoms::DiagnosisId)
                            .to(Diagnoses::Table, Diagnoses::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-diagnosis_symptom-symptom_id")
                            .from(DiagnosisSymptoms::Table, DiagnosisSymptoms::SymptomId)
                            .to(Symptoms::Table, Symptoms::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(DiagnosisImages::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(DiagnosisImages::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(DiagnosisImages::DiagnosisId)
                            .uuid()
                            .not_null(),
                    )
                    .col(ColumnDef::new(DiagnosisImages::ImageUrl).string().not_null())
                    .col(
                        ColumnDef::new(DiagnosisImages::CapturedAt)
                            .date_time()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-diagnosis_image-diagnosis_id")
                            .from(DiagnosisImages::Table, DiagnosisImages::DiagnosisId)
                            .to(Diagnoses::Table, Diagnoses::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Predictions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Predictions::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Predictions::DiagnosisId).uuid().not_null())
                    .col(
                        ColumnDef::new(Predictions::DiagnosisImageId)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Predictions::PredictedDiseaseId)
                            .uuid()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Predictions::Confidence).double().not_null())
                    .col(
                        ColumnDef::new(Predictions::CreatedAt)
                            .date_time()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-prediction-diagnosis_id")
                            .from(Predictions::Table, Predictions::DiagnosisId)
                            .to(Diagnoses::Table, Diagnoses::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-prediction-diagnosis_image_id")
                            .from(Predictions::Table, Predictions::DiagnosisImageId)
                            .to(DiagnosisImages::Table, DiagnosisImages::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-prediction-predicted_disease_id")
                            .from(Predictions::Table, Predictions::PredictedDiseaseId)
                            .to(Diseases::Table, Diseases::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Predictions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(DiagnosisImages::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(DiagnosisSymptoms::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Diagnoses::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Farms {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum FarmUnits {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Diseases {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Symptoms {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Diagnoses {
    Table,
    Id,
    UserId,
    FarmId,
    UnitId,
    TargetSpecies,
    Status,
    SymptomsText,
    FinalDiseaseId,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum DiagnosisSymptoms {
    Table,
    DiagnosisId,
    SymptomId,
}

#[derive(DeriveIden)]
enum DiagnosisImages {
    Table,
    Id,
    DiagnosisId,
    ImageUrl,
    CapturedAt,
}

#[derive(DeriveIden)]
enum Predictions {
    Table,
    Id,
    DiagnosisId,
    DiagnosisImageId,
    PredictedDiseaseId,
    Confidence,
    CreatedAt,
}
