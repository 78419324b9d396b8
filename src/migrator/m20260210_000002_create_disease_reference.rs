use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Diseases::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Diseases::Id).uuid().not_null().primary_key())
                    .col(
                        ColumnDef::new(Diseases::DiseaseName)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(Diseases::TargetSpecies)
                            .string_len(20)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Diseases::Description).text().null())
                    .col(ColumnDef::new(Diseases::Contagious).boolean().not_null())
                    .col(
                        ColumnDef::new(Diseases::SeverityLevel)
                            .string_len(20)
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Symptoms::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Symptoms::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Symptoms::SymptomName).string().not_null())
                    .col(ColumnDef::new(Symptoms::SymptomDescription).text().null())
                    .col(
                        ColumnDef::new(Symptoms::TargetSpecies)
                            .string_len(20)
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(DiseaseSymptoms::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(DiseaseSymptoms::DiseaseId).uuid().not_null())
                    .col(ColumnDef::new(DiseaseSymptoms::SymptomId).uuid().not_null())
                    .primary_key(
                        Index::create()
                            .col(DiseaseSymptoms::DiseaseId)
                            .col(DiseaseSymptoms::SymptomId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-disease_symptom-disease_id")
                            .from(DiseaseSymptoms::Table, DiseaseSymptoms::DiseaseId)
                            .to(Diseases::Table, Diseases::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-disease_symptom-symptom_id")
                            .from(DiseaseSymptoms::Table, DiseaseSymptoms::SymptomId)
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
                    .table(Treatments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Treatments::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Treatments::TreatmentName).string().not_null())
                    .col(ColumnDef::new(Treatments::MedicationName).string().null())
                    .col(
                        ColumnDef::new(Treatments::ApplicationMethod)
                            .string_len(20)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Treatments::DosageText).text().null())
                    .col(ColumnDef::new(Treatments::DurationDays).integer().null())
                    .col(ColumnDef::new(Treatments::Precaution).text().null())
                    .col(ColumnDef::new(Treatments::AlternativesNote).text().null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(DiseaseTreatments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(DiseaseTreatments::DiseaseId)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(DiseaseTreatments::TreatmentId)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(DiseaseTreatments::EffectivenessNotes)
                            .text()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(DiseaseTreatments::IsPrimaryTreatment)
                            .boolean()
                            .not_null(),
                    )
                    .primary_key(
                        Index::create()
                            .col(DiseaseTreatments::DiseaseId)
                            .col(DiseaseTreatments::TreatmentId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-disease_treatment-disease_id")
                            .from(DiseaseTreatments::Table, DiseaseTreatments::DiseaseId)
                            .to(Diseases::Table, Diseases::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-disease_treatment-treatment_id")
                            .from(DiseaseTreatments::Table, DiseaseTreatments::TreatmentId)
                            .to(Treatments::Table, Treatments::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(DiseaseTreatments::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Treatments::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(DiseaseSymptoms::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Symptoms::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Diseases::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Diseases {
    Table,
    Id,
    DiseaseName,
    TargetSpecies,
    Description,
    Contagious,
    SeverityLevel,
}

#[derive(DeriveIden)]
enum Symptoms {
    Table,
    Id,
    SymptomName,
    SymptomDescription,
    TargetSpecies,
}

#[derive(DeriveIden)]
enum DiseaseSymptoms {
    Table,
    DiseaseId,
    SymptomId,
}

#[derive(DeriveIden)]
enum Treatments {
    Table,
    Id,
    TreatmentName,
    MedicationName,
    ApplicationMethod,
    DosageText,
    DurationDays,
    Precaution,
    AlternativesNote,
}

#[derive(DeriveIden)]
enum DiseaseTreatments {
    Table,
    DiseaseId,
    TreatmentId,
    EffectivenessNotes,
    IsPrimaryTreatment,
}
