use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;
use validator::Validate;

/// Sentinel in a scholarship's state list meaning "open nationwide"
pub const ALL_STATES: &str = "All";

/// Major tag meaning "open to any major"
pub const ANY_MAJOR: &str = "Any";

/// Demographic answer that never counts as a match
pub const PREFER_NOT_TO_SAY: &str = "Prefer not to say";

/// Student profile exactly as the form submits it
///
/// Every field is nullable here. `StudentProfile` is the validated value the
/// matcher works with; see `core::normalize::normalize_profile`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ProfileForm {
    #[serde(default)]
    pub name: Option<String>,
    #[validate(email)]
    #[serde(default)]
    pub email: Option<String>,
    #[validate(required, range(min = 0.0, max = 5.0))]
    #[serde(default)]
    pub gpa: Option<f64>,
    #[validate(required, length(min = 1))]
    #[serde(default, alias = "grade_level")]
    pub grade_level: Option<String>,
    #[serde(default)]
    pub major: Option<String>,
    #[validate(required, length(min = 1))]
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default, deserialize_with = "one_or_many")]
    pub ethnicity: Vec<String>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default, deserialize_with = "one_or_many")]
    pub interests: Vec<String>,
    #[serde(default, alias = "special_circumstances", deserialize_with = "one_or_many")]
    pub special_circumstances: Vec<String>,
}

/// Validated, immutable student profile
///
/// `state` is a canonical region code, `gender` is `None` when undisclosed and
/// `ethnicity` never contains "Prefer not to say".
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentProfile {
    pub gpa: f64,
    pub grade_level: String,
    pub major: String,
    pub state: String,
    pub ethnicity: Vec<String>,
    pub gender: Option<String>,
    pub interests: Vec<String>,
    pub special_circumstances: Vec<String>,
}

/// Scholarship record as persisted in the catalog file
///
/// Accepts the camelCase keys and the older snake_case keys
/// (`min_gpa`, `grade_levels`, `majors`, `amount`, `name`, `url`, ...).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScholarshipRecord {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default, alias = "name")]
    pub title: Option<String>,
    #[serde(default, rename = "minGPA", alias = "minGpa", alias = "min_gpa")]
    pub min_gpa: Option<f64>,
    #[serde(default, alias = "grade_levels", alias = "gradeLevels", deserialize_with = "one_or_many")]
    pub allowed_grade_levels: Vec<String>,
    #[serde(default, deserialize_with = "one_or_many")]
    pub states: Vec<String>,
    #[serde(default, alias = "majors", deserialize_with = "one_or_many")]
    pub major_tags: Vec<String>,
    #[serde(default, alias = "demographics", deserialize_with = "one_or_many")]
    pub demographic_preferences: Vec<String>,
    #[serde(default, alias = "interests", deserialize_with = "one_or_many")]
    pub interest_tags: Vec<String>,
    #[serde(
        default,
        alias = "special_circumstances",
        alias = "specialCircumstances",
        deserialize_with = "one_or_many"
    )]
    pub circumstance_preferences: Vec<String>,
    #[serde(default, alias = "amount")]
    pub award_amount: Option<serde_json::Value>,
    #[serde(default)]
    pub deadline: Option<String>,
    #[serde(default, alias = "url")]
    pub apply_url: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// Where a scholarship may be held
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StateScope {
    All,
    /// Canonical region codes
    Only(Vec<String>),
}

impl StateScope {
    pub fn is_all(&self) -> bool {
        matches!(self, StateScope::All)
    }

    pub fn contains(&self, state: &str) -> bool {
        match self {
            StateScope::All => true,
            StateScope::Only(states) => states.iter().any(|s| s == state),
        }
    }

    pub fn codes(&self) -> Vec<String> {
        match self {
            StateScope::All => vec![ALL_STATES.to_string()],
            StateScope::Only(states) => states.clone(),
        }
    }
}

impl Serialize for StateScope {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            StateScope::All => [ALL_STATES].serialize(serializer),
            StateScope::Only(states) => states.serialize(serializer),
        }
    }
}

/// Normalized catalog entry
///
/// Produced once per catalog load; scoring never has to ask whether a field
/// was present.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Scholarship {
    pub id: String,
    pub title: String,
    #[serde(rename = "minGPA")]
    pub min_gpa: f64,
    /// Empty means every grade level is eligible
    pub allowed_grade_levels: Vec<String>,
    pub states: StateScope,
    pub major_tags: Vec<String>,
    pub demographic_preferences: Vec<String>,
    pub interest_tags: Vec<String>,
    pub circumstance_preferences: Vec<String>,
    /// `None` when the award has no fixed amount ("Varies")
    pub award_amount: Option<f64>,
    pub deadline: NaiveDate,
    pub apply_url: Option<String>,
    pub category: String,
    pub description: Option<String>,
}

/// The seven scoring factors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Factor {
    Gpa,
    Major,
    GradeLevel,
    Location,
    Demographics,
    Interests,
    Circumstances,
}

impl Factor {
    pub const ALL: [Factor; 7] = [
        Factor::Gpa,
        Factor::Major,
        Factor::GradeLevel,
        Factor::Location,
        Factor::Demographics,
        Factor::Interests,
        Factor::Circumstances,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Factor::Gpa => "gpa",
            Factor::Major => "major",
            Factor::GradeLevel => "gradeLevel",
            Factor::Location => "location",
            Factor::Demographics => "demographics",
            Factor::Interests => "interests",
            Factor::Circumstances => "circumstances",
        }
    }
}

impl fmt::Display for Factor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Factor name to the 0-1 sub-score achieved
pub type FactorBreakdown = BTreeMap<Factor, f64>;

/// Deadline proximity bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Urgency {
    Critical,
    Urgent,
    Upcoming,
    Normal,
}

/// A scholarship that passed the hard filters and the score cutoff
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchResult<'a> {
    pub scholarship: &'a Scholarship,
    pub match_score: u8,
    pub factor_breakdown: FactorBreakdown,
    pub days_until_deadline: i64,
    pub urgency: Urgency,
    pub shared_interests: Vec<String>,
    pub shared_circumstances: Vec<String>,
}

impl MatchResult<'_> {
    pub fn is_expired(&self) -> bool {
        self.days_until_deadline < 0
    }
}

/// Errors in a configured weight set
#[derive(Debug, Clone, PartialEq, Error)]
pub enum WeightsError {
    #[error("weight for {0} must be between 0 and 1, got {1}")]
    OutOfRange(Factor, f64),

    #[error("scoring weights must sum to 1.0, got {0:.4}")]
    BadSum(f64),
}

/// Scoring weights
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoringWeights {
    pub gpa: f64,
    pub major: f64,
    pub grade_level: f64,
    pub location: f64,
    pub demographics: f64,
    pub interests: f64,
    pub circumstances: f64,
}

impl ScoringWeights {
    pub fn weight(&self, factor: Factor) -> f64 {
        match factor {
            Factor::Gpa => self.gpa,
            Factor::Major => self.major,
            Factor::GradeLevel => self.grade_level,
            Factor::Location => self.location,
            Factor::Demographics => self.demographics,
            Factor::Interests => self.interests,
            Factor::Circumstances => self.circumstances,
        }
    }

    pub fn sum(&self) -> f64 {
        Factor::ALL.iter().map(|f| self.weight(*f)).sum()
    }

    pub fn validate(&self) -> Result<(), WeightsError> {
        for factor in Factor::ALL {
            let w = self.weight(factor);
            if !(0.0..=1.0).contains(&w) {
                return Err(WeightsError::OutOfRange(factor, w));
            }
        }

        let sum = self.sum();
        if (sum - 1.0).abs() > 1e-6 {
            return Err(WeightsError::BadSum(sum));
        }

        Ok(())
    }
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            gpa: 0.20,
            major: 0.25,
            grade_level: 0.20,
            location: 0.10,
            demographics: 0.10,
            interests: 0.10,
            circumstances: 0.05,
        }
    }
}

/// Weights plus the tunable constants of the factor rules
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoringModel {
    pub weights: ScoringWeights,
    /// Demographics sub-score when exactly one of ethnicity/gender matches
    pub demographic_partial_credit: f64,
}

impl Default for ScoringModel {
    fn default() -> Self {
        Self {
            weights: ScoringWeights::default(),
            demographic_partial_credit: 0.5,
        }
    }
}

/// Accepts `"x"`, `["x", "y"]` or `null` for list fields
pub(crate) fn one_or_many<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
    }

    Ok(match Option::<OneOrMany>::deserialize(deserializer)? {
        None => Vec::new(),
        Some(OneOrMany::One(value)) => vec![value],
        Some(OneOrMany::Many(values)) => values,
    })
}
