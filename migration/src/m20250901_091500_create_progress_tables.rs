use crate::m20250901_090000_create_content_tables::Content;
use sea_orm_migration::{prelude::*, schema::*};

/// (progress table, content table it references)
const PROGRESS_TABLES: [(&str, &str); 4] = [
    ("program_user", "program"),
    ("lesson_user", "lesson"),
    ("practice_user", "practice"),
    ("shorts_user", "shorts"),
];

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for (table, content_table) in PROGRESS_TABLES {
            manager
                .create_table(
                    Table::create()
                        .table(Alias::new(table))
                        .if_not_exists()
                        .col(uuid(Progress::Id).primary_key())
                        .col(uuid(Progress::UserId))
                        .col(uuid(Progress::ContentId))
                        .col(string_len(Progress::Status, 16))
                        .col(big_integer_null(Progress::ResumePosition))
                        .col(double_null(Progress::Rating))
                        .col(boolean_null(Progress::Liked))
                        .col(string_len_null(Progress::Comment, 500))
                        .col(timestamp_with_time_zone(Progress::CreatedAt))
                        .col(timestamp_with_time_zone(Progress::UpdatedAt))
                        .foreign_key(
                            ForeignKey::create()
                                .name(format!("fk_{table}_content_id"))
                                .from(Alias::new(table), Progress::ContentId)
                                .to(Alias::new(content_table), Content::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await?;

            // One progress row per (user, content item); concurrent creators
            // lose on this index and retry as an update.
            manager
                .create_index(
                    Index::create()
                        .name(format!("idx_{table}_user_content"))
                        .table(Alias::new(table))
                        .col(Progress::UserId)
                        .col(Progress::ContentId)
                        .unique()
                        .if_not_exists()
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name(format!("idx_{table}_content"))
                        .table(Alias::new(table))
                        .col(Progress::ContentId)
                        .if_not_exists()
                        .to_owned(),
                )
                .await?;
        }
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for (table, _) in PROGRESS_TABLES {
            manager
                .drop_table(Table::drop().table(Alias::new(table)).to_owned())
                .await?;
        }

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Progress {
    Id,
    UserId,
    ContentId,
    Status,
    ResumePosition,
    Rating,
    Liked,
    Comment,
    CreatedAt,
    UpdatedAt,
}
