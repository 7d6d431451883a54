use std::fmt;
use std::str::FromStr;

use super::kind::{ContentKind, KindDescriptor};

/// Union of the status values used across content kinds. Each kind uses a
/// subset, see [`KindDescriptor::statuses`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProgressStatus {
    Started,
    InProgress,
    Completed,
    New,
    Viewed,
}

impl ProgressStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ProgressStatus::Started => "STARTED",
            ProgressStatus::InProgress => "IN_PROGRESS",
            ProgressStatus::Completed => "COMPLETED",
            ProgressStatus::New => "NEW",
            ProgressStatus::Viewed => "VIEWED",
        }
    }
}

impl fmt::Display for ProgressStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProgressStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "STARTED" => Ok(ProgressStatus::Started),
            "IN_PROGRESS" => Ok(ProgressStatus::InProgress),
            "COMPLETED" => Ok(ProgressStatus::Completed),
            "NEW" => Ok(ProgressStatus::New),
            "VIEWED" => Ok(ProgressStatus::Viewed),
            other => Err(format!("unknown progress status: {other}")),
        }
    }
}

/// Forward edges of the lifecycle, keyed by (kind, from).
///
/// Program, lesson and practice progress is linear towards `COMPLETED`;
/// shorts only move from `NEW` to `VIEWED`. Terminal states have no edges.
pub fn allowed_targets(kind: ContentKind, from: ProgressStatus) -> &'static [ProgressStatus] {
    use ProgressStatus::*;

    match (kind, from) {
        (ContentKind::Shorts, New) => &[Viewed],
        (ContentKind::Shorts, _) => &[],
        (_, Started) => &[InProgress, Completed],
        (_, InProgress) => &[Completed],
        (_, _) => &[],
    }
}

/// How status change requests after creation are checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransitionPolicy {
    /// Any status of the kind's value set is accepted, regressions included.
    #[default]
    Permissive,
    /// Only edges listed by [`allowed_targets`] are accepted.
    Strict,
}

impl TransitionPolicy {
    /// Whether `from -> to` is acceptable for the kind. Both statuses are
    /// expected to belong to the kind's value set; staying put is always fine.
    pub fn permits(
        self,
        descriptor: &KindDescriptor,
        from: ProgressStatus,
        to: ProgressStatus,
    ) -> bool {
        if from == to {
            return true;
        }
        match self {
            TransitionPolicy::Permissive => descriptor.supports(to),
            TransitionPolicy::Strict => allowed_targets(descriptor.kind, from).contains(&to),
        }
    }
}

impl FromStr for TransitionPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "permissive" => Ok(TransitionPolicy::Permissive),
            "strict" => Ok(TransitionPolicy::Strict),
            other => Err(format!("unknown transition policy: {other}")),
        }
    }
}
