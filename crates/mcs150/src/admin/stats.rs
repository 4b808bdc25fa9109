//! PDF generation statistics.
//!
//! The backend sends every generation event; filtering and grouping happen
//! here. A filter value of `None` means "all".

use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::api::{Backend, ChartRecord};
use crate::error::{Error, Result};
use crate::notice::Action;
use crate::session;
use crate::storage::Store;

/// Month abbreviations in calendar order.
pub const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// What to count records by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Dimension {
    /// Per user.
    #[default]
    User,
    /// Per day of month.
    Day,
    /// Per USDOT number.
    Usdot,
    /// Per month.
    Month,
    /// Per year.
    Year,
}

impl Dimension {
    /// Every dimension.
    pub const ALL: [Dimension; 5] = [
        Dimension::User,
        Dimension::Day,
        Dimension::Usdot,
        Dimension::Month,
        Dimension::Year,
    ];

    /// Lowercase name.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Day => "day",
            Self::Usdot => "usdot",
            Self::Month => "month",
            Self::Year => "year",
        }
    }

    fn value(self, record: &ChartRecord) -> &str {
        match self {
            Self::User => &record.user,
            Self::Day => &record.day,
            Self::Usdot => &record.usdot,
            Self::Month => &record.month,
            Self::Year => &record.year,
        }
    }
}

impl FromStr for Dimension {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|d| d.key() == wanted)
            .ok_or_else(|| Error::validation(format!("unknown dimension '{s}'")))
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Map the literal `all` (any case) and blanks to `None`.
fn selection(value: &str) -> Option<String> {
    let value = value.trim();
    if value.is_empty() || value.eq_ignore_ascii_case("all") {
        None
    } else {
        Some(value.to_string())
    }
}

/// Distinct values in first-seen order.
fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen = Vec::new();
    for value in values {
        if !seen.iter().any(|s: &String| s == value) {
            seen.push(value.to_string());
        }
    }
    seen
}

/// The five statistics filters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StatsFilter {
    user: Option<String>,
    year: Option<String>,
    month: Option<String>,
    day: Option<String>,
    usdot: Option<String>,
}

impl StatsFilter {
    /// Select a user (`all` clears).
    pub fn set_user(&mut self, user: &str) {
        self.user = selection(user);
    }

    /// Select a year. Month and day go back to `all`.
    pub fn set_year(&mut self, year: &str) {
        self.year = selection(year);
        self.month = None;
        self.day = None;
    }

    /// Select a month. Day goes back to `all`.
    pub fn set_month(&mut self, month: &str) {
        self.month = selection(month);
        self.day = None;
    }

    /// Select a day of month.
    pub fn set_day(&mut self, day: &str) {
        self.day = selection(day);
    }

    /// Select a USDOT number.
    pub fn set_usdot(&mut self, usdot: &str) {
        self.usdot = selection(usdot);
    }

    /// Current year selection.
    #[must_use]
    pub fn year(&self) -> Option<&str> {
        self.year.as_deref()
    }

    /// Current month selection.
    #[must_use]
    pub fn month(&self) -> Option<&str> {
        self.month.as_deref()
    }

    /// Current day selection.
    #[must_use]
    pub fn day(&self) -> Option<&str> {
        self.day.as_deref()
    }

    /// Records passing every active filter.
    #[must_use]
    pub fn apply<'a>(&self, records: &'a [ChartRecord]) -> Vec<&'a ChartRecord> {
        let keep = |want: &Option<String>, have: &str| want.as_deref().map_or(true, |w| w == have);
        records
            .iter()
            .filter(|r| {
                keep(&self.user, &r.user)
                    && keep(&self.year, &r.year)
                    && keep(&self.month, &r.month)
                    && keep(&self.day, &r.day)
                    && keep(&self.usdot, &r.usdot)
            })
            .collect()
    }

    /// Months present in the selected year (every month seen if none).
    #[must_use]
    pub fn available_months(&self, records: &[ChartRecord]) -> Vec<String> {
        distinct(
            records
                .iter()
                .filter(|r| self.year.as_deref().map_or(true, |y| y == r.year))
                .map(|r| r.month.as_str()),
        )
    }

    /// Days present in the selected year and month.
    #[must_use]
    pub fn available_days(&self, records: &[ChartRecord]) -> Vec<String> {
        distinct(
            records
                .iter()
                .filter(|r| self.year.as_deref().map_or(true, |y| y == r.year))
                .filter(|r| self.month.as_deref().map_or(true, |m| m == r.month))
                .map(|r| r.day.as_str()),
        )
    }
}

/// Every user seen.
#[must_use]
pub fn users(records: &[ChartRecord]) -> Vec<String> {
    distinct(records.iter().map(|r| r.user.as_str()))
}

/// Every year seen.
#[must_use]
pub fn years(records: &[ChartRecord]) -> Vec<String> {
    distinct(records.iter().map(|r| r.year.as_str()))
}

/// Every USDOT number seen.
#[must_use]
pub fn usdots(records: &[ChartRecord]) -> Vec<String> {
    distinct(records.iter().map(|r| r.usdot.as_str()))
}

/// Headline numbers for a filtered set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    /// PDF generations.
    pub total: usize,
    /// Distinct USDOT numbers.
    pub unique_usdots: usize,
    /// Distinct users.
    pub unique_users: usize,
}

/// Summarize a filtered set.
#[must_use]
pub fn summarize(records: &[&ChartRecord]) -> Summary {
    Summary {
        total: records.len(),
        unique_usdots: records.iter().map(|r| &r.usdot).collect::<BTreeSet<_>>().len(),
        unique_users: records.iter().map(|r| &r.user).collect::<BTreeSet<_>>().len(),
    }
}

/// Count records per value of `dimension`.
///
/// Days and years sort numerically, months in calendar order, users and
/// USDOT numbers keep first-seen order.
#[must_use]
pub fn group_by(records: &[&ChartRecord], dimension: Dimension) -> Vec<(String, usize)> {
    let mut order: Vec<String> = Vec::new();
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for record in records {
        let key = dimension.value(record);
        let count = counts.entry(key).or_insert(0);
        if *count == 0 {
            order.push(key.to_string());
        }
        *count += 1;
    }

    let mut groups: Vec<(String, usize)> = order
        .into_iter()
        .map(|key| {
            let count = counts.get(key.as_str()).copied().unwrap_or_default();
            (key, count)
        })
        .collect();

    match dimension {
        Dimension::Day | Dimension::Year => {
            groups.sort_by_key(|(key, _)| key.trim().parse::<i64>().unwrap_or(i64::MAX));
        }
        Dimension::Month => {
            groups.sort_by_key(|(key, _)| MONTHS.iter().position(|m| *m == key.as_str()));
        }
        Dimension::User | Dimension::Usdot => {}
    }
    groups
}

/// Fetch every generation event.
///
/// # Errors
///
/// Returns a redirect without an admin session and an
/// [`Action::LoadStatistics`] failure when the backend call fails.
pub async fn load(store: &Store, backend: &dyn Backend) -> Result<Vec<ChartRecord>> {
    session::gate_admin(store)?;
    backend
        .pdf_statistics()
        .await
        .map_err(|e| Error::action_failed(Action::LoadStatistics, e))
}
