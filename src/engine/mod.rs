//! The progress engine: find-or-create upserts, the status lifecycle and
//! on-demand rating aggregation for every content kind.

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::domain::{
    ContentKind, ContentProgress, ProgressPatch, ProgressStatus, RatingSummary, TransitionPolicy,
    aggregate_mean, validate_rating,
};
use crate::storage::{ContentCatalog, ProgressStore, StoreError};

mod error;

pub use error::ProgressError;

pub const MAX_COMMENT_CHARS: usize = 500;

/// How many times an upsert is retried after losing the race on the unique
/// (user, content item) key or on a conditional status write.
pub const MAX_UPSERT_ATTEMPTS: usize = 3;

pub struct ProgressEngine {
    store: Arc<dyn ProgressStore>,
    catalog: Arc<dyn ContentCatalog>,
    policy: TransitionPolicy,
}

impl ProgressEngine {
    pub fn new(
        store: Arc<dyn ProgressStore>,
        catalog: Arc<dyn ContentCatalog>,
        policy: TransitionPolicy,
    ) -> Self {
        Self {
            store,
            catalog,
            policy,
        }
    }

    /// Stores the resume position, creating the record on first contact.
    #[tracing::instrument(level = "debug", skip(self))]
    pub async fn record_progress(
        &self,
        kind: ContentKind,
        user_id: Uuid,
        content_id: Uuid,
        resume_position: i64,
    ) -> Result<ContentProgress, ProgressError> {
        if !kind.descriptor().tracks_resume_position {
            return Err(ProgressError::validation(
                "resumePosition",
                format!("{kind} progress has no resume position"),
            ));
        }
        if resume_position < 0 {
            return Err(ProgressError::validation(
                "resumePosition",
                "must not be negative",
            ));
        }

        self.upsert(kind, user_id, content_id, |_| {
            Ok(ProgressPatch::ResumePosition(resume_position))
        })
        .await
    }

    /// Stores the user's rating and comment. The status is left alone.
    #[tracing::instrument(level = "debug", skip(self, comment))]
    pub async fn record_rating(
        &self,
        kind: ContentKind,
        user_id: Uuid,
        content_id: Uuid,
        rating: f64,
        comment: Option<String>,
    ) -> Result<ContentProgress, ProgressError> {
        let rating = validate_rating(rating).map_err(ProgressError::InvalidRating)?;
        if let Some(c) = &comment {
            if c.chars().count() > MAX_COMMENT_CHARS {
                return Err(ProgressError::validation(
                    "comment",
                    format!("must be at most {MAX_COMMENT_CHARS} characters"),
                ));
            }
        }

        self.upsert(kind, user_id, content_id, move |_| {
            Ok(ProgressPatch::Rating {
                rating,
                comment: comment.clone(),
            })
        })
        .await
    }

    /// Requests a status change, checked against the configured policy.
    #[tracing::instrument(level = "debug", skip(self))]
    pub async fn update_status(
        &self,
        kind: ContentKind,
        user_id: Uuid,
        content_id: Uuid,
        status: ProgressStatus,
    ) -> Result<ContentProgress, ProgressError> {
        let descriptor = kind.descriptor();
        if !descriptor.supports(status) {
            return Err(ProgressError::validation(
                "status",
                format!("{status} is not a {kind} status"),
            ));
        }
        let policy = self.policy;

        self.upsert(kind, user_id, content_id, move |record| {
            if !policy.permits(descriptor, record.status, status) {
                return Err(ProgressError::InvalidTransition {
                    kind,
                    from: record.status,
                    to: status,
                });
            }
            Ok(ProgressPatch::Status {
                from: record.status,
                to: status,
            })
        })
        .await
    }

    /// Marks a short as viewed.
    #[tracing::instrument(level = "debug", skip(self))]
    pub async fn record_view(
        &self,
        user_id: Uuid,
        content_id: Uuid,
    ) -> Result<ContentProgress, ProgressError> {
        self.update_status(ContentKind::Shorts, user_id, content_id, ProgressStatus::Viewed)
            .await
    }

    #[tracing::instrument(level = "debug", skip(self))]
    pub async fn record_like(
        &self,
        kind: ContentKind,
        user_id: Uuid,
        content_id: Uuid,
        liked: bool,
    ) -> Result<ContentProgress, ProgressError> {
        if !kind.descriptor().tracks_likes {
            return Err(ProgressError::validation(
                "liked",
                format!("{kind} content cannot be liked"),
            ));
        }

        self.upsert(kind, user_id, content_id, move |_| Ok(ProgressPatch::Liked(liked)))
        .await
    }

    /// Pure lookup, `None` when the user never interacted with the item.
    #[tracing::instrument(level = "debug", skip(self))]
    pub async fn get_or_null(
        &self,
        kind: ContentKind,
        user_id: Uuid,
        content_id: Uuid,
    ) -> Result<Option<ContentProgress>, ProgressError> {
        Ok(self.store.find(kind, user_id, content_id).await?)
    }

    #[tracing::instrument(level = "debug", skip(self))]
    pub async fn list_for_user(
        &self,
        kind: ContentKind,
        user_id: Uuid,
    ) -> Result<Vec<ContentProgress>, ProgressError> {
        Ok(self.store.list_for_user(kind, user_id).await?)
    }

    /// Mean of all present ratings, recomputed on every call.
    #[tracing::instrument(level = "debug", skip(self))]
    pub async fn aggregate_rating(
        &self,
        kind: ContentKind,
        content_id: Uuid,
    ) -> Result<Option<f64>, ProgressError> {
        self.ensure_content(kind, content_id).await?;
        let ratings = self.store.ratings(kind, content_id).await?;
        Ok(aggregate_mean(&ratings))
    }

    #[tracing::instrument(level = "debug", skip(self))]
    pub async fn rating_summary(
        &self,
        kind: ContentKind,
        content_id: Uuid,
    ) -> Result<RatingSummary, ProgressError> {
        self.ensure_content(kind, content_id).await?;
        let ratings = self.store.ratings(kind, content_id).await?;
        Ok(RatingSummary::from_ratings(&ratings))
    }

    async fn ensure_content(&self, kind: ContentKind, content_id: Uuid) -> Result<(), ProgressError> {
        if self.catalog.exists(kind, content_id).await? {
            Ok(())
        } else {
            Err(ProgressError::NotFound { kind, content_id })
        }
    }

    /// Find-or-create, then write the patch that `plan` derives from the
    /// current row. Only the patched columns are written, so concurrent
    /// operations on other fields are kept. A creator that loses the race on
    /// the unique key, or a status write whose `from` no longer holds, re-reads
    /// and plans again.
    async fn upsert<F>(
        &self,
        kind: ContentKind,
        user_id: Uuid,
        content_id: Uuid,
        plan: F,
    ) -> Result<ContentProgress, ProgressError>
    where
        F: Fn(&ContentProgress) -> Result<ProgressPatch, ProgressError> + Send + Sync,
    {
        self.ensure_content(kind, content_id).await?;

        let mut exhausted = ProgressError::DuplicateKey { kind, content_id };
        for attempt in 1..=MAX_UPSERT_ATTEMPTS {
            let now = Utc::now();
            match self.store.find(kind, user_id, content_id).await? {
                Some(mut record) => {
                    let patch = plan(&record)?;
                    record.touch(now);
                    match self.store.update(&record, &patch).await {
                        Ok(()) => {}
                        Err(StoreError::Stale) => {
                            tracing::warn!(%kind, %user_id, %content_id, attempt, "row changed under a status write, retrying");
                            exhausted = ProgressError::ConcurrentUpdate { kind, content_id };
                            continue;
                        }
                        Err(e) => return Err(e.into()),
                    }
                    return self
                        .store
                        .find(kind, user_id, content_id)
                        .await?
                        .ok_or(ProgressError::NotFound { kind, content_id });
                }
                None => {
                    let mut record = ContentProgress::create(kind, user_id, content_id, now);
                    plan(&record)?.apply_to(&mut record);
                    match self.store.insert(&record).await {
                        Ok(()) => {
                            tracing::debug!(%kind, %user_id, %content_id, "created progress record");
                            return Ok(record);
                        }
                        Err(StoreError::DuplicateKey) => {
                            tracing::warn!(%kind, %user_id, %content_id, attempt, "lost creation race, retrying as update");
                            exhausted = ProgressError::DuplicateKey { kind, content_id };
                        }
                        Err(e) => return Err(e.into()),
                    }
                }
            }
        }

        Err(exhausted)
    }
}
