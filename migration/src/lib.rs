pub use sea_orm_migration::prelude::*;

mod m20250901_090000_create_content_tables;
mod m20250901_091500_create_progress_tables;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250901_090000_create_content_tables::Migration),
            Box::new(m20250901_091500_create_progress_tables::Migration),
        ]
    }
}
