use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use crate::models::Urgency;

/// Deadline format used by the catalog
pub const DEADLINE_FORMAT: &str = "%Y-%m-%d";

/// Current calendar date (UTC)
pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}

/// Whole days from `today` to `deadline`, negative once it has passed
#[inline]
pub fn days_until_deadline(deadline: NaiveDate, today: NaiveDate) -> i64 {
    (deadline - today).num_days()
}

/// Classify deadline proximity
///
/// critical < 7 days, urgent < 30, upcoming < 90, normal otherwise.
/// Past deadlines fall in `Critical`.
#[inline]
pub fn urgency_for(days_until: i64) -> Urgency {
    if days_until < 7 {
        Urgency::Critical
    } else if days_until < 30 {
        Urgency::Urgent
    } else if days_until < 90 {
        Urgency::Upcoming
    } else {
        Urgency::Normal
    }
}

/// Parse a catalog deadline
///
/// Plain `YYYY-MM-DD` is expected; full RFC 3339 timestamps are accepted
/// and truncated to their date.
pub fn parse_deadline(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();

    NaiveDate::parse_from_str(trimmed, DEADLINE_FORMAT)
        .ok()
        .or_else(|| {
            DateTime::parse_from_rfc3339(trimmed)
                .ok()
                .map(|dt| dt.with_timezone(&Utc).date_naive())
        })
}

/// How far ahead a deadline may be for a result to be kept
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeadlineWindow {
    Week,
    Month,
    Quarter,
    Year,
}

impl DeadlineWindow {
    pub fn max_days(&self) -> i64 {
        match self {
            DeadlineWindow::Week => 7,
            DeadlineWindow::Month => 30,
            DeadlineWindow::Quarter => 90,
            DeadlineWindow::Year => 365,
        }
    }

    #[inline]
    pub fn contains(&self, days_until: i64) -> bool {
        days_until <= self.max_days()
    }
}

impl FromStr for DeadlineWindow {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "week" => Ok(DeadlineWindow::Week),
            "month" => Ok(DeadlineWindow::Month),
            "quarter" => Ok(DeadlineWindow::Quarter),
            "year" => Ok(DeadlineWindow::Year),
            other => Err(format!(
                "unknown deadline window `{}` (expected week, month, quarter or year)",
                other
            )),
        }
    }
}
