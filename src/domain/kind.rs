use std::fmt;
use std::str::FromStr;

use super::status::ProgressStatus;

/// The four kinds of content a user can make progress on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentKind {
    Program,
    Lesson,
    Practice,
    Shorts,
}

/// Everything that differs between content kinds. The engine and the stores
/// only ever branch on this, never on the kind itself.
#[derive(Debug)]
pub struct KindDescriptor {
    pub kind: ContentKind,
    /// Table holding one progress row per (user, content item).
    pub progress_table: &'static str,
    /// Table holding the content items themselves.
    pub content_table: &'static str,
    pub initial_status: ProgressStatus,
    pub statuses: &'static [ProgressStatus],
    pub tracks_resume_position: bool,
    pub tracks_likes: bool,
}

const LINEAR_STATUSES: &[ProgressStatus] = &[
    ProgressStatus::Started,
    ProgressStatus::InProgress,
    ProgressStatus::Completed,
];

const SHORTS_STATUSES: &[ProgressStatus] = &[ProgressStatus::New, ProgressStatus::Viewed];

static PROGRAM: KindDescriptor = KindDescriptor {
    kind: ContentKind::Program,
    progress_table: "program_user",
    content_table: "program",
    initial_status: ProgressStatus::Started,
    statuses: LINEAR_STATUSES,
    tracks_resume_position: true,
    tracks_likes: false,
};

static LESSON: KindDescriptor = KindDescriptor {
    kind: ContentKind::Lesson,
    progress_table: "lesson_user",
    content_table: "lesson",
    initial_status: ProgressStatus::Started,
    statuses: LINEAR_STATUSES,
    tracks_resume_position: true,
    tracks_likes: false,
};

static PRACTICE: KindDescriptor = KindDescriptor {
    kind: ContentKind::Practice,
    progress_table: "practice_user",
    content_table: "practice",
    initial_status: ProgressStatus::Started,
    statuses: LINEAR_STATUSES,
    tracks_resume_position: true,
    tracks_likes: false,
};

static SHORTS: KindDescriptor = KindDescriptor {
    kind: ContentKind::Shorts,
    progress_table: "shorts_user",
    content_table: "shorts",
    initial_status: ProgressStatus::New,
    statuses: SHORTS_STATUSES,
    tracks_resume_position: false,
    tracks_likes: true,
};

impl ContentKind {
    pub const ALL: [ContentKind; 4] = [
        ContentKind::Program,
        ContentKind::Lesson,
        ContentKind::Practice,
        ContentKind::Shorts,
    ];

    pub fn descriptor(self) -> &'static KindDescriptor {
        match self {
            ContentKind::Program => &PROGRAM,
            ContentKind::Lesson => &LESSON,
            ContentKind::Practice => &PRACTICE,
            ContentKind::Shorts => &SHORTS,
        }
    }

    pub fn as_str(self) -> &'static str {
        self.descriptor().content_table
    }
}

impl KindDescriptor {
    pub fn supports(&self, status: ProgressStatus) -> bool {
        self.statuses.contains(&status)
    }
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContentKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ContentKind::ALL
            .into_iter()
            .find(|k| k.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown content kind: {s}"))
    }
}
