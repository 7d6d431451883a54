use sea_orm_migration::{prelude::*, schema::*};

/// Content tables, one per content kind. Only the columns progress tracking
/// needs are modelled here; authoring data lives upstream.
pub(crate) const CONTENT_TABLES: [&str; 4] = ["program", "lesson", "practice", "shorts"];

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for table in CONTENT_TABLES {
            manager
                .create_table(
                    Table::create()
                        .table(Alias::new(table))
                        .if_not_exists()
                        .col(uuid(Content::Id).primary_key())
                        .col(string(Content::Title))
                        .col(timestamp_with_time_zone(Content::CreatedAt))
                        .to_owned(),
                )
                .await?;
        }

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for table in CONTENT_TABLES.iter().rev() {
            manager
                .drop_table(Table::drop().table(Alias::new(*table)).to_owned())
                .await?;
        }

        Ok(())
    }
}

#[derive(DeriveIden)]
pub(crate) enum Content {
    Id,
    Title,
    CreatedAt,
}
