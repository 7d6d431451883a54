// Domain model for per-user content progress, independent of storage and HTTP.

pub mod kind;
pub mod progress;
pub mod rating;
pub mod status;

pub use kind::{ContentKind, KindDescriptor};
pub use progress::{ContentProgress, ProgressPatch};
pub use rating::{RatingSummary, aggregate_mean, validate_rating};
pub use status::{ProgressStatus, TransitionPolicy};
