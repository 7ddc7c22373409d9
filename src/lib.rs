//! ScholarMatch - Scholarship matching engine
//!
//! Ranks a scholarship catalog against a student profile: hard eligibility
//! filters, a weighted relevance score over seven factors, and deadline-aware
//! ordering. The HTTP service in `routes` is a thin layer over `core`.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use crate::core::{Matcher, MatchError, MatchOutcome, NormalizedCatalog};
pub use crate::models::{MatchResult, ProfileForm, Scholarship, ScoringModel, ScoringWeights, StudentProfile, Urgency};
