use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use crate::core::deadline::days_until_deadline;
use crate::models::{MatchResult, Scholarship};

/// Deadlines closer than this count as urgent in summaries
const URGENT_DAYS: i64 = 30;

/// Only the best-ranked fixed amounts count toward the potential value
const POTENTIAL_VALUE_TOP_N: usize = 10;

/// Summary of a ranked match list
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchStatistics {
    pub total_matches: usize,
    /// Sum of the first 10 fixed award amounts in rank order
    pub total_potential_value: f64,
    pub average_match_score: u32,
    pub urgent_deadlines: usize,
    pub categories: BTreeMap<String, usize>,
}

impl MatchStatistics {
    pub fn from_matches(matches: &[MatchResult<'_>]) -> Self {
        if matches.is_empty() {
            return Self::default();
        }

        let total_potential_value = sum_amounts(
            matches
                .iter()
                .filter_map(|m| m.scholarship.award_amount)
                .take(POTENTIAL_VALUE_TOP_N),
        );

        let score_sum: u32 = matches.iter().map(|m| u32::from(m.match_score)).sum();

        Self {
            total_matches: matches.len(),
            total_potential_value,
            average_match_score: score_sum / matches.len() as u32,
            urgent_deadlines: matches
                .iter()
                .filter(|m| m.days_until_deadline < URGENT_DAYS)
                .count(),
            categories: count_categories(matches.iter().map(|m| m.scholarship)),
        }
    }
}

/// Summary of the whole catalog
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogStatistics {
    pub total_scholarships: usize,
    pub total_funding: f64,
    /// Mean over awards with a fixed amount, truncated to whole currency units
    pub average_amount: u64,
    pub categories: BTreeMap<String, usize>,
    pub urgent_deadlines: usize,
}

impl CatalogStatistics {
    pub fn from_catalog(catalog: &[Scholarship], today: NaiveDate) -> Self {
        let amounts: Vec<f64> = catalog.iter().filter_map(|s| s.award_amount).collect();
        let total_funding = sum_amounts(amounts.iter().copied());
        let average_amount = if amounts.is_empty() {
            0
        } else {
            (total_funding / amounts.len() as f64) as u64
        };

        Self {
            total_scholarships: catalog.len(),
            total_funding,
            average_amount,
            categories: count_categories(catalog.iter()),
            urgent_deadlines: catalog
                .iter()
                .filter(|s| days_until_deadline(s.deadline, today) < URGENT_DAYS)
                .count(),
        }
    }
}

/// Sum starting from +0.0; an empty `Iterator::sum` of f64 is -0.0
fn sum_amounts(amounts: impl Iterator<Item = f64>) -> f64 {
    amounts.fold(0.0, |total, amount| total + amount)
}

fn count_categories<'a>(scholarships: impl Iterator<Item = &'a Scholarship>) -> BTreeMap<String, usize> {
    let mut categories = BTreeMap::new();
    for s in scholarships {
        *categories.entry(s.category.clone()).or_insert(0) += 1;
    }
    categories
}
