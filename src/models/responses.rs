use serde::{Deserialize, Serialize};
use crate::core::normalize::DataQualityWarning;
use crate::core::stats::{CatalogStatistics, MatchStatistics};
use crate::models::domain::{MatchResult, Scholarship};
use crate::core::filters::HardFilterFailure;

/// Response for find matches endpoint
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FindMatchesResponse<'a> {
    pub matches: Vec<MatchResult<'a>>,
    pub total_results: usize,
    pub total_candidates: usize,
    pub statistics: MatchStatistics,
    pub warnings: &'a [DataQualityWarning],
}

/// Response for the ineligible endpoint
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IneligibleResponse {
    pub failures: Vec<HardFilterFailure>,
    pub total_candidates: usize,
}

/// Response for catalog search
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchScholarshipsResponse<'a> {
    pub scholarships: Vec<&'a Scholarship>,
    pub total_results: usize,
}

/// Response for catalog statistics
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogStatsResponse<'a> {
    pub statistics: CatalogStatistics,
    pub categories: Vec<String>,
    pub warnings: &'a [DataQualityWarning],
}

/// Response after a catalog reload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReloadResponse {
    pub scholarships: usize,
    pub warnings: usize,
    pub loaded_at: chrono::DateTime<chrono::Utc>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub catalog_size: usize,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}
