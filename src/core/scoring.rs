use crate::models::{Factor, FactorBreakdown, Scholarship, ScoringModel, StudentProfile};
use crate::core::filters::{grade_level_allowed, state_allowed};

/// Weighted score of one eligible scholarship
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreCard {
    /// Integer percentage in [0, 100]
    pub match_score: u8,
    pub breakdown: FactorBreakdown,
    pub shared_interests: Vec<String>,
    pub shared_circumstances: Vec<String>,
}

/// Calculate a match score (0-100) for a scholarship that passed the hard filters
///
/// Scoring formula:
/// score = round((
///     gpa_score * 0.20 +             # met once the hard filter passes
///     major_score * 0.25 +           # open, or major matches a tag
///     grade_level_score * 0.20 +     # met once the hard filter passes
///     location_score * 0.10 +        # nationwide or state match
///     demographic_score * 0.10 +     # ethnicity / gender overlap
///     interest_score * 0.10 +        # share of interest tags covered
///     circumstance_score * 0.05      # share of circumstance tags covered
/// ) * 100)
pub fn calculate_match_score(
    profile: &StudentProfile,
    scholarship: &Scholarship,
    model: &ScoringModel,
) -> ScoreCard {
    let (interest_score, shared_interests) =
        proportional_overlap(&profile.interests, &scholarship.interest_tags);
    let (circumstance_score, shared_circumstances) = proportional_overlap(
        &profile.special_circumstances,
        &scholarship.circumstance_preferences,
    );

    let mut breakdown = FactorBreakdown::new();
    breakdown.insert(Factor::Gpa, gpa_score(profile.gpa, scholarship.min_gpa));
    breakdown.insert(Factor::Major, major_score(&profile.major, &scholarship.major_tags));
    breakdown.insert(
        Factor::GradeLevel,
        if grade_level_allowed(profile, scholarship) { 1.0 } else { 0.0 },
    );
    breakdown.insert(
        Factor::Location,
        if state_allowed(profile, scholarship) { 1.0 } else { 0.0 },
    );
    breakdown.insert(
        Factor::Demographics,
        demographic_score(profile, &scholarship.demographic_preferences, model.demographic_partial_credit),
    );
    breakdown.insert(Factor::Interests, interest_score);
    breakdown.insert(Factor::Circumstances, circumstance_score);

    // Sum in basis points so exact halves like 57.5 survive to the rounding step
    let total_bp: f64 = breakdown
        .iter()
        .map(|(factor, sub_score)| (model.weights.weight(*factor) * 10_000.0).round() * sub_score)
        .sum();

    ScoreCard {
        match_score: to_percentage(total_bp),
        breakdown,
        shared_interests,
        shared_circumstances,
    }
}

/// Basis points (0-10000) to an integer percentage, halves rounding up
#[inline]
fn to_percentage(total_bp: f64) -> u8 {
    let hundredths = (total_bp / 100.0 * 1e9).round() / 1e9;
    hundredths.round().clamp(0.0, 100.0) as u8
}

/// GPA score (0-1)
/// Fully satisfied at or above the minimum; no bonus for the margin
#[inline]
fn gpa_score(gpa: f64, min_gpa: f64) -> f64 {
    if gpa >= min_gpa {
        1.0
    } else {
        0.0
    }
}

/// Major score (0-1)
/// Open when there are no tags, otherwise the major must equal or contain a tag
fn major_score(major: &str, tags: &[String]) -> f64 {
    if tags.is_empty() {
        return 1.0;
    }

    let major = major.trim().to_lowercase();
    if major.is_empty() {
        return 0.0;
    }

    let matched = tags.iter().any(|tag| {
        let tag = tag.to_lowercase();
        major == tag || major.contains(&tag)
    });

    if matched {
        1.0
    } else {
        0.0
    }
}

/// Demographic score (0-1)
/// Ethnicity and gender are two attributes: both matching earns full credit,
/// one earns `partial_credit`
fn demographic_score(profile: &StudentProfile, preferences: &[String], partial_credit: f64) -> f64 {
    if preferences.is_empty() {
        return 1.0;
    }

    let ethnicity_match = profile
        .ethnicity
        .iter()
        .any(|e| contains_tag(preferences, e));
    let gender_match = profile
        .gender
        .as_deref()
        .map(|g| contains_tag(preferences, g))
        .unwrap_or(false);

    match (ethnicity_match, gender_match) {
        (true, true) => 1.0,
        (true, false) | (false, true) => partial_credit.clamp(0.0, 1.0),
        (false, false) => 0.0,
    }
}

/// Share of a scholarship's tags the profile covers, clamped to 1.0
///
/// No tags means no preference, which is full credit. Returns the matched
/// scholarship tags alongside the score.
fn proportional_overlap(profile_tags: &[String], scholarship_tags: &[String]) -> (f64, Vec<String>) {
    if scholarship_tags.is_empty() {
        return (1.0, Vec::new());
    }

    let shared: Vec<String> = scholarship_tags
        .iter()
        .filter(|tag| contains_tag(profile_tags, tag))
        .cloned()
        .collect();

    let score = (shared.len() as f64 / scholarship_tags.len() as f64).min(1.0);
    (score, shared)
}

#[inline]
fn contains_tag(tags: &[String], needle: &str) -> bool {
    let needle = needle.trim();
    tags.iter().any(|t| t.trim().to_lowercase() == needle.to_lowercase())
}
