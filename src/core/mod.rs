// Core algorithm exports
pub mod deadline;
pub mod filters;
pub mod matcher;
pub mod normalize;
pub mod region;
pub mod scoring;
pub mod stats;

pub use deadline::{days_until_deadline, urgency_for, DeadlineWindow};
pub use filters::{check_hard_filters, passes_hard_filters, HardFilterFailure, HardFilterReason, ResultFilter};
pub use matcher::{rank, MatchError, MatchOutcome, Matcher};
pub use normalize::{normalize_profile, normalize_records, normalize_values, DataQualityWarning, NormalizedCatalog};
pub use scoring::{calculate_match_score, ScoreCard};
pub use stats::{CatalogStatistics, MatchStatistics};
