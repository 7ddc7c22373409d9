use serde::{Serialize, Serializer};
use std::collections::HashSet;
use std::fmt;
use thiserror::Error;
use validator::{Validate, ValidationError, ValidationErrors};
use crate::core::{
    deadline::parse_deadline,
    region::{canonical_state, is_all_states},
};
use crate::models::domain::{
    ProfileForm, Scholarship, ScholarshipRecord, StateScope, StudentProfile, ANY_MAJOR,
    PREFER_NOT_TO_SAY,
};

/// Category used when a record does not name one
pub const DEFAULT_CATEGORY: &str = "General";

/// Why a catalog record was skipped
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DataIssue {
    #[error("missing required field `{0}`")]
    MissingField(&'static str),

    #[error("invalid deadline `{0}`, expected YYYY-MM-DD")]
    InvalidDeadline(String),

    #[error("invalid minimum GPA {0}")]
    InvalidMinGpa(f64),

    #[error("duplicate scholarship id `{0}`")]
    DuplicateId(String),

    #[error("unreadable record: {0}")]
    Unreadable(String),
}

/// A skipped catalog record, reported to the caller instead of failing the run
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DataQualityWarning {
    /// Position of the record in the source file
    pub record_index: usize,
    pub scholarship_id: Option<String>,
    #[serde(rename = "message", serialize_with = "serialize_display")]
    pub issue: DataIssue,
}

impl fmt::Display for DataQualityWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.scholarship_id {
            Some(id) => write!(f, "record #{} ({}): {}", self.record_index, id, self.issue),
            None => write!(f, "record #{}: {}", self.record_index, self.issue),
        }
    }
}

fn serialize_display<T: fmt::Display, S: Serializer>(value: &T, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(value)
}

/// Normalized scholarships plus the records that had to be skipped
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalizedCatalog {
    pub scholarships: Vec<Scholarship>,
    pub warnings: Vec<DataQualityWarning>,
}

impl NormalizedCatalog {
    pub fn len(&self) -> usize {
        self.scholarships.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scholarships.is_empty()
    }
}

/// Validate a submitted profile and fill neutral defaults
///
/// Fails when gpa, grade level or state is missing or blank. Optional fields
/// never fail: an absent major becomes empty and "Prefer not to say" answers
/// are dropped so they cannot match a demographic preference.
pub fn normalize_profile(form: &ProfileForm) -> Result<StudentProfile, ValidationErrors> {
    form.validate()?;

    let grade_level = form.grade_level.as_deref().map(str::trim).unwrap_or_default();
    let state = form.state.as_deref().map(str::trim).unwrap_or_default();

    let mut errors = ValidationErrors::new();
    if grade_level.is_empty() {
        errors.add("grade_level", ValidationError::new("blank"));
    }
    if state.is_empty() {
        errors.add("state", ValidationError::new("blank"));
    }
    if !errors.is_empty() {
        return Err(errors);
    }

    Ok(StudentProfile {
        // `required` has been checked by validate()
        gpa: form.gpa.unwrap_or_default(),
        grade_level: grade_level.to_string(),
        major: form.major.as_deref().map(str::trim).unwrap_or_default().to_string(),
        state: canonical_state(state),
        ethnicity: disclosed(&form.ethnicity),
        gender: form
            .gender
            .as_deref()
            .map(str::trim)
            .filter(|g| !g.is_empty() && !g.eq_ignore_ascii_case(PREFER_NOT_TO_SAY))
            .map(str::to_string),
        interests: clean_tags(&form.interests),
        special_circumstances: clean_tags(&form.special_circumstances),
    })
}

impl TryFrom<&ProfileForm> for StudentProfile {
    type Error = ValidationErrors;

    fn try_from(form: &ProfileForm) -> Result<Self, Self::Error> {
        normalize_profile(form)
    }
}

/// Turn one raw record into a strict `Scholarship`
///
/// Missing id falls back to a slug of the title. Missing title, minimum GPA
/// or deadline make the record unusable.
pub fn normalize_record(record: &ScholarshipRecord) -> Result<Scholarship, DataIssue> {
    let title = non_blank(record.title.as_deref()).ok_or(DataIssue::MissingField("title"))?;

    let min_gpa = record.min_gpa.ok_or(DataIssue::MissingField("minGPA"))?;
    if !min_gpa.is_finite() || min_gpa < 0.0 {
        return Err(DataIssue::InvalidMinGpa(min_gpa));
    }

    let raw_deadline = non_blank(record.deadline.as_deref()).ok_or(DataIssue::MissingField("deadline"))?;
    let deadline = parse_deadline(raw_deadline)
        .ok_or_else(|| DataIssue::InvalidDeadline(raw_deadline.to_string()))?;

    let id = non_blank(record.id.as_deref())
        .map(str::to_string)
        .unwrap_or_else(|| slugify(title));

    let states = clean_tags(&record.states);
    let states = if states.is_empty() || states.iter().any(|s| is_all_states(s)) {
        StateScope::All
    } else {
        let mut codes: Vec<String> = states.iter().map(|s| canonical_state(s)).collect();
        codes.sort();
        codes.dedup();
        StateScope::Only(codes)
    };

    let major_tags = clean_tags(&record.major_tags);
    let major_tags = if major_tags.iter().any(|t| t.eq_ignore_ascii_case(ANY_MAJOR)) {
        Vec::new()
    } else {
        major_tags
    };

    Ok(Scholarship {
        id,
        title: title.to_string(),
        min_gpa,
        allowed_grade_levels: clean_tags(&record.allowed_grade_levels),
        states,
        major_tags,
        demographic_preferences: clean_tags(&record.demographic_preferences),
        interest_tags: clean_tags(&record.interest_tags),
        circumstance_preferences: clean_tags(&record.circumstance_preferences),
        award_amount: record.award_amount.as_ref().and_then(parse_amount),
        deadline,
        apply_url: non_blank(record.apply_url.as_deref()).map(str::to_string),
        category: non_blank(record.category.as_deref())
            .unwrap_or(DEFAULT_CATEGORY)
            .to_string(),
        description: non_blank(record.description.as_deref()).map(str::to_string),
    })
}

/// Normalize typed records, skipping bad ones and later duplicates of an id
pub fn normalize_records(records: &[ScholarshipRecord]) -> NormalizedCatalog {
    collect_catalog(records.iter().cloned().map(Ok).enumerate())
}

/// Normalize raw JSON values, tolerating records of the wrong shape
pub fn normalize_values(values: Vec<serde_json::Value>) -> NormalizedCatalog {
    collect_catalog(values.into_iter().enumerate().map(|(index, value)| {
        let record = serde_json::from_value::<ScholarshipRecord>(value)
            .map_err(|e| DataIssue::Unreadable(e.to_string()));
        (index, record)
    }))
}

fn collect_catalog<I>(records: I) -> NormalizedCatalog
where
    I: Iterator<Item = (usize, Result<ScholarshipRecord, DataIssue>)>,
{
    let mut catalog = NormalizedCatalog::default();
    let mut seen_ids = HashSet::new();

    for (record_index, record) in records {
        let declared_id = record
            .as_ref()
            .ok()
            .and_then(|r| non_blank(r.id.as_deref()))
            .map(str::to_string);

        let outcome = record.and_then(|r| normalize_record(&r)).and_then(|s| {
            if seen_ids.insert(s.id.clone()) {
                Ok(s)
            } else {
                Err(DataIssue::DuplicateId(s.id))
            }
        });

        match outcome {
            Ok(scholarship) => catalog.scholarships.push(scholarship),
            Err(issue) => {
                let warning = DataQualityWarning {
                    record_index,
                    scholarship_id: declared_id,
                    issue,
                };
                tracing::warn!("Skipping catalog {}", warning);
                catalog.warnings.push(warning);
            }
        }
    }

    catalog
}

/// Parse an award amount: a number, or a currency string such as "$5,000"
///
/// Anything else ("Varies", "Full tuition") means no fixed amount.
pub fn parse_amount(value: &serde_json::Value) -> Option<f64> {
    let amount = match value {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => {
            let digits: String = s
                .trim()
                .trim_start_matches('$')
                .chars()
                .filter(|c| *c != ',')
                .collect();
            digits.trim().parse::<f64>().ok()
        }
        _ => None,
    }?;

    (amount.is_finite() && amount >= 0.0).then_some(amount)
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Trim, drop blanks and drop case-insensitive duplicates, keeping first spelling
fn clean_tags(tags: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    tags.iter()
        .map(|t| t.trim())
        .filter(|t| !t.is_empty())
        .filter(|t| seen.insert(t.to_lowercase()))
        .map(str::to_string)
        .collect()
}

fn disclosed(values: &[String]) -> Vec<String> {
    clean_tags(values)
        .into_iter()
        .filter(|v| !v.eq_ignore_ascii_case(PREFER_NOT_TO_SAY))
        .collect()
}

fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    for c in title.chars() {
        if c.is_alphanumeric() {
            slug.extend(c.to_lowercase());
        } else if !slug.ends_with('-') && !slug.is_empty() {
            slug.push('-');
        }
    }
    slug.trim_end_matches('-').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use serde_json::json;

    fn record(id: &str) -> ScholarshipRecord {
        ScholarshipRecord {
            id: Some(id.to_string()),
            title: Some(format!("Scholarship {}", id)),
            min_gpa: Some(3.0),
            deadline: Some("2026-12-01".to_string()),
            ..ScholarshipRecord::default()
        }
    }

    fn form() -> ProfileForm {
        ProfileForm {
            gpa: Some(3.4),
            grade_level: Some("College Junior".to_string()),
            state: Some("California".to_string()),
            ..ProfileForm::default()
        }
    }

    #[test]
    fn test_missing_optional_fields_become_open() {
        let scholarship = normalize_record(&record("a")).unwrap();

        assert_eq!(scholarship.states, StateScope::All);
        assert!(scholarship.allowed_grade_levels.is_empty());
        assert!(scholarship.major_tags.is_empty());
        assert!(scholarship.interest_tags.is_empty());
        assert_eq!(scholarship.category, DEFAULT_CATEGORY);
        assert_eq!(scholarship.award_amount, None);
        assert_eq!(scholarship.deadline, NaiveDate::from_ymd_opt(2026, 12, 1).unwrap());
    }

    #[test]
    fn test_missing_required_fields() {
        let mut no_gpa = record("a");
        no_gpa.min_gpa = None;
        assert_eq!(normalize_record(&no_gpa), Err(DataIssue::MissingField("minGPA")));

        let mut no_deadline = record("a");
        no_deadline.deadline = Some("  ".to_string());
        assert_eq!(normalize_record(&no_deadline), Err(DataIssue::MissingField("deadline")));

        let mut bad_deadline = record("a");
        bad_deadline.deadline = Some("next spring".to_string());
        assert_eq!(
            normalize_record(&bad_deadline),
            Err(DataIssue::InvalidDeadline("next spring".to_string()))
        );
    }

    #[test]
    fn test_id_falls_back_to_title_slug() {
        let mut r = record("a");
        r.id = None;
        r.title = Some("Women in Technology Grant!".to_string());
        assert_eq!(normalize_record(&r).unwrap().id, "women-in-technology-grant");
    }

    #[test]
    fn test_states_and_any_major() {
        let mut r = record("a");
        r.states = vec!["California".into(), "ny".into()];
        r.major_tags = vec!["Any".into()];
        let s = normalize_record(&r).unwrap();
        assert_eq!(s.states, StateScope::Only(vec!["CA".into(), "NY".into()]));
        assert!(s.major_tags.is_empty());

        r.states = vec!["TX".into(), "All".into()];
        assert_eq!(normalize_record(&r).unwrap().states, StateScope::All);
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount(&json!(5000)), Some(5000.0));
        assert_eq!(parse_amount(&json!("$10,000")), Some(10000.0));
        assert_eq!(parse_amount(&json!("Varies")), None);
        assert_eq!(parse_amount(&json!(-1)), None);
        assert_eq!(parse_amount(&json!(null)), None);
    }

    #[test]
    fn test_bad_records_become_warnings() {
        let values = vec![
            json!({"id": "ok", "title": "Fine", "minGPA": 2.5, "deadline": "2026-11-01"}),
            json!({"id": "no-gpa", "title": "Broken", "deadline": "2026-11-01"}),
            json!("not an object"),
            json!({"id": "ok", "title": "Again", "minGPA": 2.0, "deadline": "2026-11-01"}),
        ];

        let catalog = normalize_values(values);

        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.warnings.len(), 3);
        assert_eq!(catalog.warnings[0].record_index, 1);
        assert_eq!(catalog.warnings[0].scholarship_id.as_deref(), Some("no-gpa"));
        assert!(matches!(catalog.warnings[1].issue, DataIssue::Unreadable(_)));
        assert_eq!(catalog.warnings[2].issue, DataIssue::DuplicateId("ok".to_string()));
    }

    #[test]
    fn test_warning_serializes_message() {
        let warning = DataQualityWarning {
            record_index: 4,
            scholarship_id: None,
            issue: DataIssue::MissingField("deadline"),
        };
        let value = serde_json::to_value(&warning).unwrap();
        assert_eq!(value["message"], "missing required field `deadline`");
        assert_eq!(value["recordIndex"], 4);
    }

    #[test]
    fn test_profile_requires_core_fields() {
        assert!(normalize_profile(&form()).is_ok());

        let missing_gpa = ProfileForm { gpa: None, ..form() };
        assert!(normalize_profile(&missing_gpa).is_err());

        let blank_state = ProfileForm {
            state: Some("   ".to_string()),
            ..form()
        };
        let errors = normalize_profile(&blank_state).unwrap_err();
        assert!(errors.field_errors().contains_key("state"));

        let missing_grade = ProfileForm { grade_level: None, ..form() };
        assert!(normalize_profile(&missing_grade).is_err());
    }

    #[test]
    fn test_profile_drops_undisclosed_answers() {
        let f = ProfileForm {
            gender: Some("Prefer not to say".to_string()),
            ethnicity: vec!["Prefer not to say".to_string(), "Asian American".to_string()],
            interests: vec![" coding ".to_string(), "Coding".to_string(), "".to_string()],
            ..form()
        };

        let profile = normalize_profile(&f).unwrap();
        assert_eq!(profile.state, "CA");
        assert_eq!(profile.gender, None);
        assert_eq!(profile.ethnicity, vec!["Asian American"]);
        assert_eq!(profile.interests, vec!["coding"]);
        assert_eq!(profile.major, "");
    }
}
