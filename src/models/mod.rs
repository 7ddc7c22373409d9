// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    Factor, FactorBreakdown, MatchResult, ProfileForm, Scholarship, ScholarshipRecord,
    ScoringModel, ScoringWeights, StateScope, StudentProfile, Urgency, WeightsError,
};
pub use requests::{
    FindMatchesRequest, IneligibleRequest, ProfileLookupQuery, SearchScholarshipsQuery, TitleLookupQuery,
};
pub use responses::{
    CatalogStatsResponse, ErrorResponse, FindMatchesResponse, HealthResponse, IneligibleResponse,
    ReloadResponse, SearchScholarshipsResponse,
};
