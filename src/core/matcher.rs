use chrono::NaiveDate;
use std::cmp::Ordering;
use thiserror::Error;
use validator::ValidationErrors;
use crate::models::{MatchResult, ProfileForm, Scholarship, ScoringModel, ScoringWeights, StudentProfile, WeightsError};
use crate::core::{
    deadline::{days_until_deadline, urgency_for},
    filters::{check_hard_filters, HardFilterFailure},
    normalize::{normalize_profile, DataQualityWarning, NormalizedCatalog},
    scoring::calculate_match_score,
};

/// Default soft relevance cutoff
pub const DEFAULT_MIN_SCORE: u8 = 40;

/// How many hard failures are spelled out in the log summary
const LOGGED_FAILURES: usize = 5;

/// Errors raised before any scoring happens
#[derive(Debug, Error)]
pub enum MatchError {
    #[error("invalid profile: {0}")]
    InvalidProfile(#[from] ValidationErrors),

    #[error("invalid scoring configuration: {0}")]
    InvalidWeights(#[from] WeightsError),
}

/// Result of the matching process
#[derive(Debug, Clone, Default)]
pub struct MatchOutcome<'a> {
    /// Ranked results at or above the cutoff
    pub matches: Vec<MatchResult<'a>>,
    pub total_candidates: usize,
    pub hard_failures: Vec<HardFilterFailure>,
    /// Eligible scholarships dropped by the score cutoff
    pub below_threshold: usize,
    /// Eligible scholarships dropped because the deadline passed
    pub expired: usize,
    /// Catalog records skipped during normalization
    pub warnings: Vec<DataQualityWarning>,
}

/// What happened to one scholarship
#[derive(Debug, Clone, PartialEq)]
pub enum Evaluation<'a> {
    Ineligible(HardFilterFailure),
    BelowThreshold(u8),
    Expired,
    Matched(MatchResult<'a>),
}

/// Main matching orchestrator
///
/// # Pipeline Stages
/// 1. Hard filters (GPA, grade level, location)
/// 2. Weighted scoring
/// 3. Soft cutoff at the minimum score
/// 4. Deadline annotation and ranking
#[derive(Debug, Clone)]
pub struct Matcher {
    model: ScoringModel,
    min_score: u8,
    exclude_expired: bool,
}

impl Matcher {
    pub fn new(model: ScoringModel) -> Self {
        Self {
            model,
            min_score: DEFAULT_MIN_SCORE,
            exclude_expired: false,
        }
    }

    /// Like `new`, but rejects weights that do not sum to 1.0
    pub fn try_new(model: ScoringModel) -> Result<Self, MatchError> {
        model.weights.validate()?;
        Ok(Self::new(model))
    }

    pub fn with_default_weights() -> Self {
        Self::new(ScoringModel {
            weights: ScoringWeights::default(),
            ..ScoringModel::default()
        })
    }

    pub fn with_min_score(mut self, min_score: u8) -> Self {
        self.min_score = min_score.min(100);
        self
    }

    pub fn with_exclude_expired(mut self, exclude_expired: bool) -> Self {
        self.exclude_expired = exclude_expired;
        self
    }

    pub fn model(&self) -> &ScoringModel {
        &self.model
    }

    pub fn min_score(&self) -> u8 {
        self.min_score
    }

    /// Run one scholarship through the pipeline
    pub fn evaluate<'a>(
        &self,
        profile: &StudentProfile,
        scholarship: &'a Scholarship,
        today: NaiveDate,
    ) -> Evaluation<'a> {
        if let Err(reason) = check_hard_filters(profile, scholarship) {
            return Evaluation::Ineligible(HardFilterFailure::new(scholarship, reason));
        }

        let days_until = days_until_deadline(scholarship.deadline, today);
        if self.exclude_expired && days_until < 0 {
            return Evaluation::Expired;
        }

        let card = calculate_match_score(profile, scholarship, &self.model);
        if card.match_score < self.min_score {
            return Evaluation::BelowThreshold(card.match_score);
        }

        Evaluation::Matched(MatchResult {
            scholarship,
            match_score: card.match_score,
            factor_breakdown: card.breakdown,
            days_until_deadline: days_until,
            urgency: urgency_for(days_until),
            shared_interests: card.shared_interests,
            shared_circumstances: card.shared_circumstances,
        })
    }

    /// Find matching scholarships for a validated profile
    ///
    /// The catalog is a read-only snapshot; nothing in it is mutated.
    ///
    /// # Arguments
    /// * `profile` - The student's validated profile
    /// * `catalog` - Normalized scholarships to consider
    /// * `today` - Reference date for deadline annotation
    pub fn find_matches<'a>(
        &self,
        profile: &StudentProfile,
        catalog: &'a [Scholarship],
        today: NaiveDate,
    ) -> MatchOutcome<'a> {
        let mut outcome = MatchOutcome {
            total_candidates: catalog.len(),
            ..MatchOutcome::default()
        };

        let mut matches = Vec::new();
        for scholarship in catalog {
            match self.evaluate(profile, scholarship, today) {
                Evaluation::Matched(result) => matches.push(result),
                Evaluation::Ineligible(failure) => outcome.hard_failures.push(failure),
                Evaluation::BelowThreshold(_) => outcome.below_threshold += 1,
                Evaluation::Expired => outcome.expired += 1,
            }
        }

        outcome.matches = rank(matches);

        if !outcome.hard_failures.is_empty() {
            tracing::debug!(
                "Hard filter stats: {} of {} scholarships excluded",
                outcome.hard_failures.len(),
                outcome.total_candidates
            );
            for failure in outcome.hard_failures.iter().take(LOGGED_FAILURES) {
                tracing::debug!("  {}: {}", failure.title, failure.reason);
            }
        }

        outcome
    }

    /// Match against a normalized catalog, carrying its data-quality warnings
    pub fn match_catalog<'a>(
        &self,
        profile: &StudentProfile,
        catalog: &'a NormalizedCatalog,
        today: NaiveDate,
    ) -> MatchOutcome<'a> {
        let mut outcome = self.find_matches(profile, &catalog.scholarships, today);
        outcome.warnings = catalog.warnings.clone();
        outcome
    }

    /// Validate a submitted form, then match
    ///
    /// An invalid profile fails before any scholarship is scored.
    pub fn match_form<'a>(
        &self,
        form: &ProfileForm,
        catalog: &'a NormalizedCatalog,
        today: NaiveDate,
    ) -> Result<MatchOutcome<'a>, MatchError> {
        let profile = normalize_profile(form)?;
        Ok(self.match_catalog(&profile, catalog, today))
    }

    /// Scholarships the profile is ineligible for, with the failing rule
    pub fn hard_filter_failures(
        &self,
        profile: &StudentProfile,
        catalog: &[Scholarship],
    ) -> Vec<HardFilterFailure> {
        catalog
            .iter()
            .filter_map(|s| {
                check_hard_filters(profile, s)
                    .err()
                    .map(|reason| HardFilterFailure::new(s, reason))
            })
            .collect()
    }
}

impl Default for Matcher {
    fn default() -> Self {
        Self::with_default_weights()
    }
}

/// Order results for display
///
/// Score descending, then soonest deadline, then larger fixed award, then id.
/// The sort is stable.
pub fn rank(mut results: Vec<MatchResult<'_>>) -> Vec<MatchResult<'_>> {
    results.sort_by(compare_results);
    results
}

pub fn compare_results(a: &MatchResult<'_>, b: &MatchResult<'_>) -> Ordering {
    b.match_score
        .cmp(&a.match_score)
        .then_with(|| a.days_until_deadline.cmp(&b.days_until_deadline))
        .then_with(|| {
            let amount_a = a.scholarship.award_amount.unwrap_or(0.0);
            let amount_b = b.scholarship.award_amount.unwrap_or(0.0);
            amount_b.partial_cmp(&amount_a).unwrap_or(Ordering::Equal)
        })
        .then_with(|| a.scholarship.id.cmp(&b.scholarship.id))
}
