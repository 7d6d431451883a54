use chrono::{DateTime, Utc};
use sea_orm::sea_query::{Alias, Expr, Order, Query, SelectStatement, SimpleExpr};
use sea_orm::{
    ConnectionTrait, DatabaseConnection, DbErr, DeriveIden, EntityTrait, FromQueryResult, SqlErr,
};
use uuid::Uuid;

use super::{ContentCatalog, ProgressStore, StoreError};
use crate::domain::{ContentKind, ContentProgress, ProgressPatch, ProgressStatus};

/// SeaORM backed store. Progress rows are addressed through the kind's
/// descriptor so one implementation serves all four progress tables.
#[derive(Clone, Debug)]
pub struct SeaOrmStore {
    db: DatabaseConnection,
}

#[derive(DeriveIden, Clone, Copy)]
enum ProgressColumn {
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

const ALL_COLUMNS: [ProgressColumn; 10] = [
    ProgressColumn::Id,
    ProgressColumn::UserId,
    ProgressColumn::ContentId,
    ProgressColumn::Status,
    ProgressColumn::ResumePosition,
    ProgressColumn::Rating,
    ProgressColumn::Liked,
    ProgressColumn::Comment,
    ProgressColumn::CreatedAt,
    ProgressColumn::UpdatedAt,
];

#[derive(Debug, FromQueryResult)]
struct ProgressRow {
    id: Uuid,
    user_id: Uuid,
    content_id: Uuid,
    status: String,
    resume_position: Option<i64>,
    rating: Option<f64>,
    liked: Option<bool>,
    comment: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, FromQueryResult)]
struct RatingRow {
    rating: f64,
}

impl ProgressRow {
    fn into_progress(self, kind: ContentKind) -> Result<ContentProgress, StoreError> {
        let status: ProgressStatus = self.status.parse().map_err(StoreError::Backend)?;
        Ok(ContentProgress {
            id: self.id,
            kind,
            user_id: self.user_id,
            content_id: self.content_id,
            status,
            resume_position: self.resume_position,
            rating: self.rating,
            liked: self.liked,
            comment: self.comment,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

fn map_db_err(err: DbErr) -> StoreError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => StoreError::DuplicateKey,
        _ => StoreError::Backend(err.to_string()),
    }
}

fn progress_table(kind: ContentKind) -> Alias {
    Alias::new(kind.descriptor().progress_table)
}

fn patch_values(patch: &ProgressPatch) -> Vec<(ProgressColumn, SimpleExpr)> {
    match patch {
        ProgressPatch::ResumePosition(position) => {
            vec![(ProgressColumn::ResumePosition, (*position).into())]
        }
        ProgressPatch::Rating { rating, comment } => vec![
            (ProgressColumn::Rating, (*rating).into()),
            (ProgressColumn::Comment, comment.clone().into()),
        ],
        ProgressPatch::Status { to, .. } => vec![(ProgressColumn::Status, to.as_str().into())],
        ProgressPatch::Liked(liked) => vec![(ProgressColumn::Liked, (*liked).into())],
    }
}

impl SeaOrmStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn select_progress(kind: ContentKind) -> SelectStatement {
        Query::select()
            .columns(ALL_COLUMNS)
            .from(progress_table(kind))
            .to_owned()
    }

    async fn fetch_all(
        &self,
        kind: ContentKind,
        stmt: &SelectStatement,
    ) -> Result<Vec<ContentProgress>, StoreError> {
        let backend = self.db.get_database_backend();
        ProgressRow::find_by_statement(backend.build(stmt))
            .all(&self.db)
            .await
            .map_err(map_db_err)?
            .into_iter()
            .map(|row| row.into_progress(kind))
            .collect()
    }
}

#[async_trait::async_trait]
impl ProgressStore for SeaOrmStore {
    #[tracing::instrument(level = "debug", skip(self))]
    async fn find(
        &self,
        kind: ContentKind,
        user_id: Uuid,
        content_id: Uuid,
    ) -> Result<Option<ContentProgress>, StoreError> {
        let stmt = Self::select_progress(kind)
            .and_where(Expr::col(ProgressColumn::UserId).eq(user_id))
            .and_where(Expr::col(ProgressColumn::ContentId).eq(content_id))
            .to_owned();
        let backend = self.db.get_database_backend();
        let row = ProgressRow::find_by_statement(backend.build(&stmt))
            .one(&self.db)
            .await
            .map_err(map_db_err)?;
        row.map(|r| r.into_progress(kind)).transpose()
    }

    #[tracing::instrument(level = "debug", skip(self, record), fields(kind = %record.kind, id = %record.id))]
    async fn insert(&self, record: &ContentProgress) -> Result<(), StoreError> {
        let stmt = Query::insert()
            .into_table(progress_table(record.kind))
            .columns(ALL_COLUMNS)
            .values([
                record.id.into(),
                record.user_id.into(),
                record.content_id.into(),
                record.status.as_str().into(),
                record.resume_position.into(),
                record.rating.into(),
                record.liked.into(),
                record.comment.clone().into(),
                record.created_at.into(),
                record.updated_at.into(),
            ])
            .map_err(|e| StoreError::Backend(e.to_string()))?
            .to_owned();
        let backend = self.db.get_database_backend();
        self.db
            .execute(backend.build(&stmt))
            .await
            .map_err(map_db_err)?;
        Ok(())
    }

    #[tracing::instrument(level = "debug", skip(self, record), fields(kind = %record.kind, id = %record.id))]
    async fn update(
        &self,
        record: &ContentProgress,
        patch: &ProgressPatch,
    ) -> Result<(), StoreError> {
        let mut values = patch_values(patch);
        values.push((ProgressColumn::UpdatedAt, record.updated_at.into()));
        let mut stmt = Query::update();
        stmt.table(progress_table(record.kind))
            .values(values)
            .and_where(Expr::col(ProgressColumn::Id).eq(record.id));
        if let ProgressPatch::Status { from, .. } = patch {
            stmt.and_where(Expr::col(ProgressColumn::Status).eq(from.as_str()));
        }
        let backend = self.db.get_database_backend();
        let res = self
            .db
            .execute(backend.build(&stmt))
            .await
            .map_err(map_db_err)?;
        if res.rows_affected() == 0 {
            return Err(match patch {
                ProgressPatch::Status { .. } => StoreError::Stale,
                _ => StoreError::NotFound,
            });
        }
        Ok(())
    }

    #[tracing::instrument(level = "debug", skip(self))]
    async fn ratings(&self, kind: ContentKind, content_id: Uuid) -> Result<Vec<f64>, StoreError> {
        let stmt = Query::select()
            .column(ProgressColumn::Rating)
            .from(progress_table(kind))
            .and_where(Expr::col(ProgressColumn::ContentId).eq(content_id))
            .and_where(Expr::col(ProgressColumn::Rating).is_not_null())
            .to_owned();
        let backend = self.db.get_database_backend();
        let rows = RatingRow::find_by_statement(backend.build(&stmt))
            .all(&self.db)
            .await
            .map_err(map_db_err)?;
        Ok(rows.into_iter().map(|r| r.rating).collect())
    }

    #[tracing::instrument(level = "debug", skip(self))]
    async fn list_for_user(
        &self,
        kind: ContentKind,
        user_id: Uuid,
    ) -> Result<Vec<ContentProgress>, StoreError> {
        let stmt = Self::select_progress(kind)
            .and_where(Expr::col(ProgressColumn::UserId).eq(user_id))
            .order_by(ProgressColumn::UpdatedAt, Order::Desc)
            .to_owned();
        self.fetch_all(kind, &stmt).await
    }
}

#[async_trait::async_trait]
impl ContentCatalog for SeaOrmStore {
    #[tracing::instrument(level = "debug", skip(self))]
    async fn exists(&self, kind: ContentKind, content_id: Uuid) -> Result<bool, StoreError> {
        use entities::prelude::{Lesson, Practice, Program, Shorts};

        let found = match kind {
            ContentKind::Program => Program::find_by_id(content_id).one(&self.db).await?.is_some(),
            ContentKind::Lesson => Lesson::find_by_id(content_id).one(&self.db).await?.is_some(),
            ContentKind::Practice => Practice::find_by_id(content_id).one(&self.db).await?.is_some(),
            ContentKind::Shorts => Shorts::find_by_id(content_id).one(&self.db).await?.is_some(),
        };
        Ok(found)
    }
}

impl From<DbErr> for StoreError {
    fn from(err: DbErr) -> Self {
        map_db_err(err)
    }
}
