use std::sync::Arc;

use poem_openapi::{
    OpenApi,
    param::Path,
    payload::{Json, PlainText},
};
use uuid::Uuid;

use super::auth::SessionUser;
use super::models::{
    ContentKindDto, LikeRequestDto, ProgressListResponseDto, ProgressRequestDto,
    ProgressResponseDto, RatingRequestDto, RatingSummaryResponseDto, StatusRequestDto,
};
use super::services::{health::HealthService, progress::ProgressService};
use crate::config::Config;
use crate::engine::ProgressEngine;

pub struct ProgressApi {
    pub engine: Arc<ProgressEngine>,
    pub config: Arc<Config>,
}

#[OpenApi]
impl ProgressApi {
    #[oai(path = "/health", method = "get")]
    #[tracing::instrument(level = "debug", skip_all)]
    async fn health(&self) -> PlainText<String> {
        HealthService::new(&self.config).status_text().await
    }

    /// All progress records of the caller for one content kind
    #[oai(path = "/:kind/progress", method = "get")]
    #[tracing::instrument(level = "debug", skip_all)]
    async fn list_progress(
        &self,
        auth: SessionUser,
        kind: Path<ContentKindDto>,
    ) -> ProgressListResponseDto {
        ProgressService::new(&self.engine)
            .list_progress(kind.0.into(), auth.0)
            .await
    }

    /// Current progress of the caller, 404 when not started
    #[oai(path = "/:kind/:content_id/progress", method = "get")]
    #[tracing::instrument(level = "debug", skip_all)]
    async fn get_progress(
        &self,
        auth: SessionUser,
        kind: Path<ContentKindDto>,
        content_id: Path<Uuid>,
    ) -> ProgressResponseDto {
        ProgressService::new(&self.engine)
            .get_progress(kind.0.into(), auth.0, content_id.0)
            .await
    }

    /// Store the resume position
    #[oai(path = "/:kind/:content_id/progress", method = "put")]
    #[tracing::instrument(level = "debug", skip_all)]
    async fn put_progress(
        &self,
        auth: SessionUser,
        kind: Path<ContentKindDto>,
        content_id: Path<Uuid>,
        body: Json<ProgressRequestDto>,
    ) -> ProgressResponseDto {
        ProgressService::new(&self.engine)
            .put_progress(kind.0.into(), auth.0, content_id.0, body.0)
            .await
    }

    /// Rate the content item, optionally with a comment
    #[oai(path = "/:kind/:content_id/rating", method = "put")]
    #[tracing::instrument(level = "debug", skip_all)]
    async fn put_rating(
        &self,
        auth: SessionUser,
        kind: Path<ContentKindDto>,
        content_id: Path<Uuid>,
        body: Json<RatingRequestDto>,
    ) -> ProgressResponseDto {
        ProgressService::new(&self.engine)
            .put_rating(kind.0.into(), auth.0, content_id.0, body.0)
            .await
    }

    /// Mean rating across all users
    #[oai(path = "/:kind/:content_id/rating", method = "get")]
    #[tracing::instrument(level = "debug", skip_all)]
    async fn get_rating(
        &self,
        kind: Path<ContentKindDto>,
        content_id: Path<Uuid>,
    ) -> RatingSummaryResponseDto {
        ProgressService::new(&self.engine)
            .rating_summary(kind.0.into(), content_id.0)
            .await
    }

    /// Request a status change
    #[oai(path = "/:kind/:content_id/status", method = "put")]
    #[tracing::instrument(level = "debug", skip_all)]
    async fn put_status(
        &self,
        auth: SessionUser,
        kind: Path<ContentKindDto>,
        content_id: Path<Uuid>,
        body: Json<StatusRequestDto>,
    ) -> ProgressResponseDto {
        ProgressService::new(&self.engine)
            .put_status(kind.0.into(), auth.0, content_id.0, body.0)
            .await
    }

    /// Mark a short as viewed
    #[oai(path = "/:kind/:content_id/view", method = "put")]
    #[tracing::instrument(level = "debug", skip_all)]
    async fn put_view(
        &self,
        auth: SessionUser,
        kind: Path<ContentKindDto>,
        content_id: Path<Uuid>,
    ) -> ProgressResponseDto {
        ProgressService::new(&self.engine)
            .put_view(kind.0.into(), auth.0, content_id.0)
            .await
    }

    /// Like or unlike a short
    #[oai(path = "/:kind/:content_id/like", method = "put")]
    #[tracing::instrument(level = "debug", skip_all)]
    async fn put_like(
        &self,
        auth: SessionUser,
        kind: Path<ContentKindDto>,
        content_id: Path<Uuid>,
        body: Json<LikeRequestDto>,
    ) -> ProgressResponseDto {
        ProgressService::new(&self.engine)
            .put_like(kind.0.into(), auth.0, content_id.0, body.0)
            .await
    }
}
