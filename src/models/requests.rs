use serde::{Deserialize, Serialize};
use validator::Validate;
use crate::core::filters::{CatalogQuery, ResultFilter};
use crate::models::domain::ProfileForm;

/// Request to find matches
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct FindMatchesRequest {
    #[validate(nested)]
    pub profile: ProfileForm,
    #[validate(range(min = 1))]
    #[serde(default)]
    pub limit: Option<u16>,
    #[serde(default)]
    pub filter: ResultFilter,
}

/// Request to list scholarships a profile is ineligible for
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct IneligibleRequest {
    #[validate(nested)]
    pub profile: ProfileForm,
}

/// Query string for catalog search
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchScholarshipsQuery {
    #[serde(default)]
    pub query: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub min_amount: Option<f64>,
    #[serde(default)]
    pub max_amount: Option<f64>,
}

impl From<SearchScholarshipsQuery> for CatalogQuery {
    fn from(value: SearchScholarshipsQuery) -> Self {
        CatalogQuery {
            query: value.query,
            category: value.category,
            min_amount: value.min_amount,
            max_amount: value.max_amount,
        }
    }
}

/// Query string for profile lookup
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ProfileLookupQuery {
    #[validate(email)]
    pub email: String,
}

/// Query string for exact title lookup
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct TitleLookupQuery {
    #[validate(length(min = 1))]
    pub title: String,
}
