use poem_openapi::payload::Json;
use uuid::Uuid;

use crate::{
    api::models::{
        ErrorDto, LikeRequestDto, ProgressDto, ProgressListResponseDto, ProgressRequestDto,
        ProgressResponseDto, RatingRequestDto, RatingSummaryDto, RatingSummaryResponseDto,
        StatusRequestDto, ValidationErrorDto,
    },
    domain::{ContentKind, ContentProgress},
    engine::{ProgressEngine, ProgressError},
};

/// Maps engine calls onto HTTP response shapes.
pub struct ProgressService<'a> {
    pub engine: &'a ProgressEngine,
}

impl From<ProgressError> for ProgressResponseDto {
    fn from(err: ProgressError) -> Self {
        match err {
            ProgressError::NotFound { .. } => {
                ProgressResponseDto::NotFound(Json(ErrorDto::from(err.to_string())))
            }
            ProgressError::InvalidRating(_) => ProgressResponseDto::BadRequest(Json(
                ValidationErrorDto::field("rating", err.to_string()),
            )),
            ProgressError::ValidationFailed { field, ref message } => ProgressResponseDto::BadRequest(
                Json(ValidationErrorDto::field(field, message.clone())),
            ),
            ProgressError::InvalidTransition { .. }
            | ProgressError::DuplicateKey { .. }
            | ProgressError::ConcurrentUpdate { .. } => {
                ProgressResponseDto::Conflict(Json(ErrorDto::from(err.to_string())))
            }
            other => {
                tracing::error!(error = %format!("{:?}", other), "progress operation failed");
                ProgressResponseDto::InternalError(Json(ErrorDto::from(other.to_string())))
            }
        }
    }
}

fn respond(result: Result<ContentProgress, ProgressError>) -> ProgressResponseDto {
    match result {
        Ok(progress) => ProgressResponseDto::Ok(Json(progress.into())),
        Err(e) => e.into(),
    }
}

impl<'a> ProgressService<'a> {
    pub fn new(engine: &'a ProgressEngine) -> Self {
        Self { engine }
    }

    #[tracing::instrument(level = "debug", skip(self, body))]
    pub async fn put_progress(
        &self,
        kind: ContentKind,
        user_id: Uuid,
        content_id: Uuid,
        body: ProgressRequestDto,
    ) -> ProgressResponseDto {
        if let Err(invalid) = body.validate() {
            return ProgressResponseDto::BadRequest(Json(invalid));
        }
        respond(
            self.engine
                .record_progress(kind, user_id, content_id, body.resume_position)
                .await,
        )
    }

    #[tracing::instrument(level = "debug", skip(self, body))]
    pub async fn put_rating(
        &self,
        kind: ContentKind,
        user_id: Uuid,
        content_id: Uuid,
        body: RatingRequestDto,
    ) -> ProgressResponseDto {
        if let Err(invalid) = body.validate() {
            return ProgressResponseDto::BadRequest(Json(invalid));
        }
        respond(
            self.engine
                .record_rating(kind, user_id, content_id, body.rating, body.comment)
                .await,
        )
    }

    #[tracing::instrument(level = "debug", skip(self, body))]
    pub async fn put_status(
        &self,
        kind: ContentKind,
        user_id: Uuid,
        content_id: Uuid,
        body: StatusRequestDto,
    ) -> ProgressResponseDto {
        respond(
            self.engine
                .update_status(kind, user_id, content_id, body.status.into())
                .await,
        )
    }

    #[tracing::instrument(level = "debug", skip(self))]
    pub async fn put_view(
        &self,
        kind: ContentKind,
        user_id: Uuid,
        content_id: Uuid,
    ) -> ProgressResponseDto {
        if kind != ContentKind::Shorts {
            return ProgressResponseDto::BadRequest(Json(ValidationErrorDto::field(
                "kind",
                "only shorts can be marked as viewed",
            )));
        }
        respond(self.engine.record_view(user_id, content_id).await)
    }

    #[tracing::instrument(level = "debug", skip(self, body))]
    pub async fn put_like(
        &self,
        kind: ContentKind,
        user_id: Uuid,
        content_id: Uuid,
        body: LikeRequestDto,
    ) -> ProgressResponseDto {
        respond(
            self.engine
                .record_like(kind, user_id, content_id, body.liked)
                .await,
        )
    }

    #[tracing::instrument(level = "debug", skip(self))]
    pub async fn get_progress(
        &self,
        kind: ContentKind,
        user_id: Uuid,
        content_id: Uuid,
    ) -> ProgressResponseDto {
        match self.engine.get_or_null(kind, user_id, content_id).await {
            Ok(Some(progress)) => ProgressResponseDto::Ok(Json(progress.into())),
            Ok(None) => ProgressResponseDto::NotFound(Json(ErrorDto::from(format!(
                "{kind} {content_id} not started"
            )))),
            Err(e) => e.into(),
        }
    }

    #[tracing::instrument(level = "debug", skip(self))]
    pub async fn list_progress(&self, kind: ContentKind, user_id: Uuid) -> ProgressListResponseDto {
        match self.engine.list_for_user(kind, user_id).await {
            Ok(rows) => {
                ProgressListResponseDto::Ok(Json(rows.into_iter().map(ProgressDto::from).collect()))
            }
            Err(e) => {
                tracing::error!(error = %format!("{:?}", e), %kind, "failed to list progress");
                ProgressListResponseDto::InternalError(Json(ErrorDto::from(e.to_string())))
            }
        }
    }

    #[tracing::instrument(level = "debug", skip(self))]
    pub async fn rating_summary(&self, kind: ContentKind, content_id: Uuid) -> RatingSummaryResponseDto {
        match self.engine.rating_summary(kind, content_id).await {
            Ok(summary) => {
                RatingSummaryResponseDto::Ok(Json(RatingSummaryDto::new(kind, content_id, summary)))
            }
            Err(e @ ProgressError::NotFound { .. }) => {
                RatingSummaryResponseDto::NotFound(Json(ErrorDto::from(e.to_string())))
            }
            Err(e) => {
                tracing::error!(error = %format!("{:?}", e), %kind, %content_id, "failed to aggregate ratings");
                RatingSummaryResponseDto::InternalError(Json(ErrorDto::from(e.to_string())))
            }
        }
    }
}
