use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::kind::ContentKind;
use super::status::ProgressStatus;

/// A user's consumption state against one content item.
///
/// `user_id`, `content_id` and `kind` never change after [`ContentProgress::create`].
#[derive(Debug, Clone, PartialEq)]
pub struct ContentProgress {
    pub id: Uuid,
    pub kind: ContentKind,
    pub user_id: Uuid,
    pub content_id: Uuid,
    pub status: ProgressStatus,
    /// Playback or progress checkpoint; never set for shorts.
    pub resume_position: Option<i64>,
    /// 0.0 - 5.0
    pub rating: Option<f64>,
    /// Shorts only.
    pub liked: Option<bool>,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ContentProgress {
    /// Builds the first record for a (user, content item) pair. The status is
    /// always the kind's initial status.
    pub fn create(kind: ContentKind, user_id: Uuid, content_id: Uuid, now: DateTime<Utc>) -> Self {
        ContentProgress {
            id: Uuid::now_v7(),
            kind,
            user_id,
            content_id,
            status: kind.descriptor().initial_status,
            resume_position: None,
            rating: None,
            liked: None,
            comment: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = now;
    }
}

/// The columns one operation owns. Stores write these and `updated_at`, and
/// nothing else.
#[derive(Debug, Clone, PartialEq)]
pub enum ProgressPatch {
    ResumePosition(i64),
    Rating { rating: f64, comment: Option<String> },
    /// Only applies while the stored status is still `from`.
    Status { from: ProgressStatus, to: ProgressStatus },
    Liked(bool),
}

impl ProgressPatch {
    pub fn apply_to(&self, record: &mut ContentProgress) {
        match self {
            ProgressPatch::ResumePosition(position) => record.resume_position = Some(*position),
            ProgressPatch::Rating { rating, comment } => {
                record.rating = Some(*rating);
                record.comment = comment.clone();
            }
            ProgressPatch::Status { to, .. } => record.status = *to,
            ProgressPatch::Liked(liked) => record.liked = Some(*liked),
        }
    }
}
