use std::cmp::Ordering;

use chrono::{Datelike, Month, NaiveDate};
use serde::{Deserialize, Deserializer};

const MONTH_ABBREVIATIONS: [&str; 12] = [
    "JAN", "FEB", "MAR", "APR", "MAY", "JUN", "JUL", "AUG", "SEP", "OCT", "NOV", "DEC",
];

/// A calendar date for a newsletter issue, written as `YYYY-MM-DD`.
///
/// The original text is kept alongside the parsed date so that search
/// matches against exactly what the index contained.
#[derive(Debug, Clone)]
pub struct IssueDate {
    raw: String,
    date: NaiveDate,
}

impl IssueDate {
    pub fn parse(raw: &str) -> Result<Self, chrono::ParseError> {
        let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d")?;

        Ok(Self {
            raw: raw.to_string(),
            date,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn year(&self) -> i32 {
        self.date.year()
    }

    pub fn month(&self) -> u32 {
        self.date.month()
    }

    /// The four-digit year used as a grouping label.
    pub fn year_label(&self) -> String {
        format!("{:04}", self.year())
    }

    /// The two-digit month used as a grouping key.
    pub fn month_key(&self) -> String {
        format!("{:02}", self.month())
    }

    /// Formats the date for display, e.g. `MAR 1, 2024`.
    pub fn display(&self) -> String {
        let month = MONTH_ABBREVIATIONS[self.date.month0() as usize];

        format!("{month} {}, {}", self.date.day(), self.date.year())
    }
}

/// Returns the English name of a month given its two-digit key (`"03"`).
pub fn month_name(month_key: &str) -> Option<&'static str> {
    let month = month_key.parse::<u8>().ok()?;

    Month::try_from(month).ok().map(|month| month.name())
}

impl PartialEq for IssueDate {
    fn eq(&self, other: &Self) -> bool {
        self.date == other.date
    }
}

impl Eq for IssueDate {}

impl PartialOrd for IssueDate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for IssueDate {
    fn cmp(&self, other: &Self) -> Ordering {
        self.date.cmp(&other.date)
    }
}

impl<'de> Deserialize<'de> for IssueDate {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde::de::Error;

        let raw = String::deserialize(deserializer)?;
        IssueDate::parse(&raw)
            .map_err(|err| D::Error::custom(format!("invalid date {raw:?}: {err}")))
    }
}
