use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use thiserror::Error;
use crate::core::deadline::DeadlineWindow;
use crate::models::{MatchResult, Scholarship, StudentProfile};

/// The hard eligibility rule a scholarship failed
#[derive(Debug, Clone, PartialEq, Serialize, Error)]
#[serde(tag = "rule", rename_all = "camelCase")]
pub enum HardFilterReason {
    #[error("GPA requirement not met (need {required}, have {actual})")]
    Gpa { required: f64, actual: f64 },

    #[error("grade level not eligible (need one of {}, have {actual})", .required.join(", "))]
    GradeLevel { required: Vec<String>, actual: String },

    #[error("location not eligible (need one of {}, have {actual})", .required.join(", "))]
    Location { required: Vec<String>, actual: String },
}

/// A scholarship excluded by the hard filters, for analytics
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HardFilterFailure {
    pub scholarship_id: String,
    pub title: String,
    pub award_amount: Option<f64>,
    pub category: String,
    pub reason: HardFilterReason,
}

impl HardFilterFailure {
    pub fn new(scholarship: &Scholarship, reason: HardFilterReason) -> Self {
        Self {
            scholarship_id: scholarship.id.clone(),
            title: scholarship.title.clone(),
            award_amount: scholarship.award_amount,
            category: scholarship.category.clone(),
            reason,
        }
    }
}

/// Check the three hard eligibility rules
///
/// This is the binary gate in front of scoring: GPA, then grade level, then
/// location. The first failing rule is returned.
pub fn check_hard_filters(
    profile: &StudentProfile,
    scholarship: &Scholarship,
) -> Result<(), HardFilterReason> {
    if profile.gpa < scholarship.min_gpa {
        return Err(HardFilterReason::Gpa {
            required: scholarship.min_gpa,
            actual: profile.gpa,
        });
    }

    if !grade_level_allowed(profile, scholarship) {
        return Err(HardFilterReason::GradeLevel {
            required: scholarship.allowed_grade_levels.clone(),
            actual: profile.grade_level.clone(),
        });
    }

    if !state_allowed(profile, scholarship) {
        return Err(HardFilterReason::Location {
            required: scholarship.states.codes(),
            actual: profile.state.clone(),
        });
    }

    Ok(())
}

/// Pure eligibility predicate
#[inline]
pub fn passes_hard_filters(profile: &StudentProfile, scholarship: &Scholarship) -> bool {
    check_hard_filters(profile, scholarship).is_ok()
}

/// Empty grade level list means open to everyone
#[inline]
pub fn grade_level_allowed(profile: &StudentProfile, scholarship: &Scholarship) -> bool {
    scholarship.allowed_grade_levels.is_empty()
        || scholarship
            .allowed_grade_levels
            .iter()
            .any(|g| g.eq_ignore_ascii_case(&profile.grade_level))
}

#[inline]
pub fn state_allowed(profile: &StudentProfile, scholarship: &Scholarship) -> bool {
    scholarship.states.contains(&profile.state)
}

/// Post-match narrowing of a ranked result list
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultFilter {
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub min_amount: Option<f64>,
    #[serde(default)]
    pub max_amount: Option<f64>,
    #[serde(default)]
    pub deadline_window: Option<DeadlineWindow>,
}

impl ResultFilter {
    pub fn is_empty(&self) -> bool {
        self == &ResultFilter::default()
    }

    /// Whether a single result survives the filter
    pub fn accepts(&self, result: &MatchResult<'_>) -> bool {
        let scholarship = result.scholarship;

        if let Some(category) = &self.category {
            if !scholarship.category.eq_ignore_ascii_case(category.trim()) {
                return false;
            }
        }

        if !amount_in_range(scholarship.award_amount, self.min_amount, self.max_amount) {
            return false;
        }

        if let Some(window) = self.deadline_window {
            if !window.contains(result.days_until_deadline) {
                return false;
            }
        }

        true
    }

    /// Keep accepted results, preserving rank order
    pub fn apply<'a>(&self, results: Vec<MatchResult<'a>>) -> Vec<MatchResult<'a>> {
        if self.is_empty() {
            return results;
        }
        results.into_iter().filter(|r| self.accepts(r)).collect()
    }
}

/// Keyword/category/amount search over the catalog
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CatalogQuery {
    pub query: Option<String>,
    pub category: Option<String>,
    pub min_amount: Option<f64>,
    pub max_amount: Option<f64>,
}

/// Search the catalog by keyword (title, description, category), category and amount
pub fn search_catalog<'a>(catalog: &'a [Scholarship], query: &CatalogQuery) -> Vec<&'a Scholarship> {
    let keyword = query
        .query
        .as_deref()
        .map(|q| q.trim().to_lowercase())
        .filter(|q| !q.is_empty());

    catalog
        .iter()
        .filter(|s| match &keyword {
            Some(k) => {
                s.title.to_lowercase().contains(k)
                    || s.category.to_lowercase().contains(k)
                    || s.description
                        .as_deref()
                        .map(|d| d.to_lowercase().contains(k))
                        .unwrap_or(false)
            }
            None => true,
        })
        .filter(|s| match &query.category {
            Some(c) => s.category.eq_ignore_ascii_case(c.trim()),
            None => true,
        })
        .filter(|s| amount_in_range(s.award_amount, query.min_amount, query.max_amount))
        .collect()
}

/// Sorted unique categories
pub fn categories(catalog: &[Scholarship]) -> Vec<String> {
    catalog
        .iter()
        .map(|s| s.category.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Case-insensitive exact title lookup
pub fn find_by_title<'a>(catalog: &'a [Scholarship], title: &str) -> Option<&'a Scholarship> {
    let wanted = title.trim().to_lowercase();
    catalog.iter().find(|s| s.title.to_lowercase() == wanted)
}

/// An amount bound excludes awards without a fixed amount
#[inline]
fn amount_in_range(amount: Option<f64>, min: Option<f64>, max: Option<f64>) -> bool {
    if min.is_none() && max.is_none() {
        return true;
    }
    match amount {
        Some(a) => min.map_or(true, |m| a >= m) && max.map_or(true, |m| a <= m),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use crate::models::{StateScope, Urgency};

    fn create_test_profile(gpa: f64, grade_level: &str, state: &str) -> StudentProfile {
        StudentProfile {
            gpa,
            grade_level: grade_level.to_string(),
            major: "Computer Science".to_string(),
            state: state.to_string(),
            ethnicity: vec![],
            gender: None,
            interests: vec![],
            special_circumstances: vec![],
        }
    }

    fn create_test_scholarship(id: &str, category: &str, amount: Option<f64>) -> Scholarship {
        Scholarship {
            id: id.to_string(),
            title: format!("{} Award", id),
            min_gpa: 3.0,
            allowed_grade_levels: vec!["College Sophomore".to_string()],
            states: StateScope::Only(vec!["CA".to_string()]),
            major_tags: vec![],
            demographic_preferences: vec![],
            interest_tags: vec![],
            circumstance_preferences: vec![],
            award_amount: amount,
            deadline: NaiveDate::from_ymd_opt(2026, 12, 1).unwrap(),
            apply_url: None,
            category: category.to_string(),
            description: Some("Supports students in robotics".to_string()),
        }
    }

    fn result_for(scholarship: &Scholarship, days: i64) -> MatchResult<'_> {
        MatchResult {
            scholarship,
            match_score: 80,
            factor_breakdown: Default::default(),
            days_until_deadline: days,
            urgency: Urgency::Normal,
            shared_interests: vec![],
            shared_circumstances: vec![],
        }
    }

    #[test]
    fn test_hard_filters_pass() {
        let profile = create_test_profile(3.0, "College Sophomore", "CA");
        let scholarship = create_test_scholarship("a", "STEM", Some(1000.0));

        assert!(passes_hard_filters(&profile, &scholarship));
    }

    #[test]
    fn test_hard_filter_fail_gpa() {
        let profile = create_test_profile(2.9, "College Sophomore", "CA");
        let scholarship = create_test_scholarship("a", "STEM", None);

        assert_eq!(
            check_hard_filters(&profile, &scholarship),
            Err(HardFilterReason::Gpa { required: 3.0, actual: 2.9 })
        );
    }

    #[test]
    fn test_hard_filter_fail_grade_level() {
        let profile = create_test_profile(3.5, "High School Senior", "CA");
        let scholarship = create_test_scholarship("a", "STEM", None);

        let reason = check_hard_filters(&profile, &scholarship).unwrap_err();
        assert!(matches!(reason, HardFilterReason::GradeLevel { .. }));
        assert_eq!(
            reason.to_string(),
            "grade level not eligible (need one of College Sophomore, have High School Senior)"
        );
    }

    #[test]
    fn test_hard_filter_fail_location() {
        let profile = create_test_profile(3.5, "College Sophomore", "TX");
        let scholarship = create_test_scholarship("a", "STEM", None);

        assert!(matches!(
            check_hard_filters(&profile, &scholarship),
            Err(HardFilterReason::Location { .. })
        ));
    }

    #[test]
    fn test_open_grade_levels_and_states() {
        let profile = create_test_profile(3.5, "Graduate Student", "TX");
        let mut scholarship = create_test_scholarship("a", "STEM", None);
        scholarship.allowed_grade_levels.clear();
        scholarship.states = StateScope::All;

        assert!(passes_hard_filters(&profile, &scholarship));
    }

    #[test]
    fn test_result_filter() {
        let stem = create_test_scholarship("a", "STEM", Some(5000.0));
        let arts = create_test_scholarship("b", "Arts", Some(500.0));
        let varies = create_test_scholarship("c", "STEM", None);

        let filter = ResultFilter {
            category: Some("stem".to_string()),
            min_amount: Some(1000.0),
            deadline_window: Some(DeadlineWindow::Month),
            ..ResultFilter::default()
        };

        let results = vec![result_for(&stem, 20), result_for(&arts, 20), result_for(&varies, 20)];
        let kept = filter.apply(results);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].scholarship.id, "a");

        let too_far = vec![result_for(&stem, 45)];
        assert!(filter.apply(too_far).is_empty());
    }

    #[test]
    fn test_search_catalog() {
        let catalog = vec![
            create_test_scholarship("a", "STEM", Some(5000.0)),
            create_test_scholarship("b", "Arts", Some(500.0)),
        ];

        let by_keyword = search_catalog(&catalog, &CatalogQuery {
            query: Some("ROBOTICS".to_string()),
            ..CatalogQuery::default()
        });
        assert_eq!(by_keyword.len(), 2);

        let by_amount = search_catalog(&catalog, &CatalogQuery {
            max_amount: Some(1000.0),
            ..CatalogQuery::default()
        });
        assert_eq!(by_amount.len(), 1);
        assert_eq!(by_amount[0].id, "b");

        assert_eq!(categories(&catalog), vec!["Arts", "STEM"]);
        assert_eq!(find_by_title(&catalog, "a award").map(|s| s.id.as_str()), Some("a"));
    }
}
