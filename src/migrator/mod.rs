use sea_orm_migration::prelude::*;

mod m20260210_000001_create_users_farms;
mod m20260210_000002_create_disease_reference;
mod m20260215_000001_create_diagnosis_tables;
mod m20260220_000001_create_notifications;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260210_000001_create_users_farms::Migration),
            Box::new(m20260210_000002_create_disease_reference::Migration),
            Box::new(m20260215_000001_create_diagnosis_tables::Migration),
            Box::new(m20260220_000001_create_notifications::Migration),
        ]
    }
}
