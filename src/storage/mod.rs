// Persistence traits for progress records and the content catalog.
// `sea_orm_store` is the production backend; `memory` backs tests and local runs.

use thiserror::Error;
use uuid::Uuid;

use crate::domain::{ContentKind, ContentProgress, ProgressPatch};

pub mod memory;
pub mod sea_orm_store;

pub use memory::MemoryStore;
pub use sea_orm_store::SeaOrmStore;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StoreError {
    /// A row for the same (user, content item) pair already exists.
    #[error("duplicate key")]
    DuplicateKey,

    #[error("record not found")]
    NotFound,

    /// A conditional write found the row in a different state than expected.
    #[error("record changed concurrently")]
    Stale,

    #[error("storage backend error: {0}")]
    Backend(String),
}

/// One row per (user, content item) and kind. Implementations must reject a
/// second insert for the same pair with [`StoreError::DuplicateKey`].
#[async_trait::async_trait]
pub trait ProgressStore: Send + Sync {
    async fn find(
        &self,
        kind: ContentKind,
        user_id: Uuid,
        content_id: Uuid,
    ) -> Result<Option<ContentProgress>, StoreError>;

    async fn insert(&self, record: &ContentProgress) -> Result<(), StoreError>;

    /// Writes the patched columns and `updated_at` of the record matched by
    /// `record.id`. A status patch only applies while the stored status is
    /// still its `from`, otherwise [`StoreError::Stale`].
    async fn update(
        &self,
        record: &ContentProgress,
        patch: &ProgressPatch,
    ) -> Result<(), StoreError>;

    /// All present ratings for a content item.
    async fn ratings(&self, kind: ContentKind, content_id: Uuid) -> Result<Vec<f64>, StoreError>;

    /// The user's records of one kind, most recently updated first.
    async fn list_for_user(
        &self,
        kind: ContentKind,
        user_id: Uuid,
    ) -> Result<Vec<ContentProgress>, StoreError>;
}

#[async_trait::async_trait]
pub trait ContentCatalog: Send + Sync {
    async fn exists(&self, kind: ContentKind, content_id: Uuid) -> Result<bool, StoreError>;
}
