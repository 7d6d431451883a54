use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use poem_openapi::{ApiResponse, Enum, Object, payload::Json};
use uuid::Uuid;

use crate::domain::{ContentKind, ContentProgress, ProgressStatus, RatingSummary};
use crate::domain::rating::{MAX_RATING, MIN_RATING};
use crate::engine::MAX_COMMENT_CHARS;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Enum)]
#[oai(rename_all = "lowercase")]
pub enum ContentKindDto {
    Program,
    Lesson,
    Practice,
    Shorts,
}

impl From<ContentKindDto> for ContentKind {
    fn from(kind: ContentKindDto) -> Self {
        match kind {
            ContentKindDto::Program => ContentKind::Program,
            ContentKindDto::Lesson => ContentKind::Lesson,
            ContentKindDto::Practice => ContentKind::Practice,
            ContentKindDto::Shorts => ContentKind::Shorts,
        }
    }
}

impl From<ContentKind> for ContentKindDto {
    fn from(kind: ContentKind) -> Self {
        match kind {
            ContentKind::Program => ContentKindDto::Program,
            ContentKind::Lesson => ContentKindDto::Lesson,
            ContentKind::Practice => ContentKindDto::Practice,
            ContentKind::Shorts => ContentKindDto::Shorts,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Enum)]
#[oai(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProgressStatusDto {
    Started,
    InProgress,
    Completed,
    New,
    Viewed,
}

impl From<ProgressStatusDto> for ProgressStatus {
    fn from(status: ProgressStatusDto) -> Self {
        match status {
            ProgressStatusDto::Started => ProgressStatus::Started,
            ProgressStatusDto::InProgress => ProgressStatus::InProgress,
            ProgressStatusDto::Completed => ProgressStatus::Completed,
            ProgressStatusDto::New => ProgressStatus::New,
            ProgressStatusDto::Viewed => ProgressStatus::Viewed,
        }
    }
}

impl From<ProgressStatus> for ProgressStatusDto {
    fn from(status: ProgressStatus) -> Self {
        match status {
            ProgressStatus::Started => ProgressStatusDto::Started,
            ProgressStatus::InProgress => ProgressStatusDto::InProgress,
            ProgressStatus::Completed => ProgressStatusDto::Completed,
            ProgressStatus::New => ProgressStatusDto::New,
            ProgressStatus::Viewed => ProgressStatusDto::Viewed,
        }
    }
}

/// A user's progress on one content item
#[derive(Debug, Clone, Object)]
#[oai(rename_all = "camelCase")]
pub struct ProgressDto {
    pub id: Uuid,
    pub kind: ContentKindDto,
    pub user_id: Uuid,
    pub content_id: Uuid,
    pub status: ProgressStatusDto,
    /// Resume offset; never present for shorts
    pub resume_position: Option<i64>,
    pub rating: Option<f64>,
    /// Shorts only
    pub liked: Option<bool>,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ContentProgress> for ProgressDto {
    fn from(p: ContentProgress) -> Self {
        ProgressDto {
            id: p.id,
            kind: p.kind.into(),
            user_id: p.user_id,
            content_id: p.content_id,
            status: p.status.into(),
            resume_position: p.resume_position,
            rating: p.rating,
            liked: p.liked,
            comment: p.comment,
            created_at: p.created_at,
            updated_at: p.updated_at,
        }
    }
}

#[derive(Debug, Clone, Object)]
#[oai(rename_all = "camelCase")]
pub struct RatingSummaryDto {
    pub kind: ContentKindDto,
    pub content_id: Uuid,
    /// Absent when nobody rated the item yet
    pub average: Option<f64>,
    pub count: u64,
}

impl RatingSummaryDto {
    pub fn new(kind: ContentKind, content_id: Uuid, summary: RatingSummary) -> Self {
        RatingSummaryDto {
            kind: kind.into(),
            content_id,
            average: summary.average,
            count: summary.count,
        }
    }
}

#[derive(Debug, Clone, Object)]
#[oai(rename_all = "camelCase")]
pub struct ProgressRequestDto {
    pub resume_position: i64,
}

#[derive(Debug, Clone, Object)]
#[oai(rename_all = "camelCase")]
pub struct RatingRequestDto {
    /// 0.0 - 5.0
    pub rating: f64,
    pub comment: Option<String>,
}

#[derive(Debug, Clone, Object)]
#[oai(rename_all = "camelCase")]
pub struct StatusRequestDto {
    pub status: ProgressStatusDto,
}

#[derive(Debug, Clone, Object)]
#[oai(rename_all = "camelCase")]
pub struct LikeRequestDto {
    pub liked: bool,
}

impl ProgressRequestDto {
    pub fn validate(&self) -> Result<(), ValidationErrorDto> {
        let mut fields = BTreeMap::new();
        if self.resume_position < 0 {
            fields.insert("resumePosition".into(), "must not be negative".into());
        }
        ValidationErrorDto::check(fields)
    }
}

impl RatingRequestDto {
    pub fn validate(&self) -> Result<(), ValidationErrorDto> {
        let mut fields = BTreeMap::new();
        if !(MIN_RATING..=MAX_RATING).contains(&self.rating) {
            fields.insert(
                "rating".into(),
                format!("must be between {MIN_RATING} and {MAX_RATING}"),
            );
        }
        if self
            .comment
            .as_ref()
            .is_some_and(|c| c.chars().count() > MAX_COMMENT_CHARS)
        {
            fields.insert(
                "comment".into(),
                format!("must be at most {MAX_COMMENT_CHARS} characters"),
            );
        }
        ValidationErrorDto::check(fields)
    }
}

#[derive(Debug, Clone, Object)]
pub struct ErrorDto {
    /// Human-readable error message
    pub message: String,
}

impl From<String> for ErrorDto {
    fn from(message: String) -> Self {
        ErrorDto { message }
    }
}

/// Request validation failure with one entry per offending field
#[derive(Debug, Clone, Object)]
pub struct ValidationErrorDto {
    pub message: String,
    pub fields: BTreeMap<String, String>,
}

impl ValidationErrorDto {
    pub fn field(field: &str, reason: impl Into<String>) -> Self {
        let mut fields = BTreeMap::new();
        fields.insert(field.to_string(), reason.into());
        ValidationErrorDto {
            message: "validation failed".into(),
            fields,
        }
    }

    pub fn malformed(message: String) -> Self {
        ValidationErrorDto {
            message,
            fields: BTreeMap::new(),
        }
    }

    fn check(fields: BTreeMap<String, String>) -> Result<(), Self> {
        if fields.is_empty() {
            Ok(())
        } else {
            Err(ValidationErrorDto {
                message: "validation failed".into(),
                fields,
            })
        }
    }
}

// Extractor failures (bad path params, malformed JSON, missing identity) land
// in the same error shapes as engine failures.
fn parse_failure(err: &poem::Error) -> Option<ErrorDto> {
    (err.status() == poem::http::StatusCode::UNAUTHORIZED)
        .then(|| ErrorDto::from("missing or invalid X-User-Id".to_string()))
}

#[derive(ApiResponse)]
#[oai(bad_request_handler = "progress_bad_request")]
pub enum ProgressResponseDto {
    /// Progress record after the operation
    #[oai(status = 200)]
    Ok(Json<ProgressDto>),

    #[oai(status = 400)]
    BadRequest(Json<ValidationErrorDto>),

    #[oai(status = 401)]
    Unauthorized(Json<ErrorDto>),

    /// Unknown content item, or no progress yet
    #[oai(status = 404)]
    NotFound(Json<ErrorDto>),

    /// Illegal status transition or unresolved creation race
    #[oai(status = 409)]
    Conflict(Json<ErrorDto>),

    #[oai(status = 500)]
    InternalError(Json<ErrorDto>),
}

fn progress_bad_request(err: poem::Error) -> ProgressResponseDto {
    match parse_failure(&err) {
        Some(dto) => ProgressResponseDto::Unauthorized(Json(dto)),
        None => ProgressResponseDto::BadRequest(Json(ValidationErrorDto::malformed(err.to_string()))),
    }
}

#[derive(ApiResponse)]
#[oai(bad_request_handler = "progress_list_bad_request")]
pub enum ProgressListResponseDto {
    /// Most recently updated first
    #[oai(status = 200)]
    Ok(Json<Vec<ProgressDto>>),

    #[oai(status = 400)]
    BadRequest(Json<ValidationErrorDto>),

    #[oai(status = 401)]
    Unauthorized(Json<ErrorDto>),

    #[oai(status = 500)]
    InternalError(Json<ErrorDto>),
}

fn progress_list_bad_request(err: poem::Error) -> ProgressListResponseDto {
    match parse_failure(&err) {
        Some(dto) => ProgressListResponseDto::Unauthorized(Json(dto)),
        None => ProgressListResponseDto::BadRequest(Json(ValidationErrorDto::malformed(err.to_string()))),
    }
}

#[derive(ApiResponse)]
#[oai(bad_request_handler = "rating_summary_bad_request")]
pub enum RatingSummaryResponseDto {
    #[oai(status = 200)]
    Ok(Json<RatingSummaryDto>),

    #[oai(status = 400)]
    BadRequest(Json<ValidationErrorDto>),

    #[oai(status = 404)]
    NotFound(Json<ErrorDto>),

    #[oai(status = 500)]
    InternalError(Json<ErrorDto>),
}

fn rating_summary_bad_request(err: poem::Error) -> RatingSummaryResponseDto {
    RatingSummaryResponseDto::BadRequest(Json(ValidationErrorDto::malformed(err.to_string())))
}
