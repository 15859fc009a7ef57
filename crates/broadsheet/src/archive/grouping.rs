use indexmap::IndexMap;

use crate::archive::NewsletterRecord;
use crate::date::month_name;

#[derive(Debug, PartialEq, Eq)]
pub struct YearGroup<'a> {
    /// The four-digit year, e.g. `2024`.
    pub year: String,
    pub records: Vec<&'a NewsletterRecord>,
}

#[derive(Debug, PartialEq, Eq)]
pub struct MonthGroup<'a> {
    /// The two-digit month, e.g. `03`.
    pub month: String,
    pub records: Vec<&'a NewsletterRecord>,
}

impl MonthGroup<'_> {
    pub fn name(&self) -> &'static str {
        month_name(&self.month).unwrap_or("Unknown")
    }
}

/// Groups records by year, newest year first.
///
/// Within a year, records keep the order they had in `records`.
pub fn group_by_year(records: &[NewsletterRecord]) -> Vec<YearGroup<'_>> {
    let mut years: IndexMap<String, Vec<&NewsletterRecord>> = IndexMap::new();
    for record in records {
        years
            .entry(record.date.year_label())
            .or_default()
            .push(record);
    }

    years.sort_by(|a, _, b, _| b.cmp(a));

    years
        .into_iter()
        .map(|(year, records)| YearGroup { year, records })
        .collect()
}

/// Groups one year's records by month, newest month first.
pub fn group_by_month<'a>(records: &[&'a NewsletterRecord]) -> Vec<MonthGroup<'a>> {
    let mut months: IndexMap<String, Vec<&'a NewsletterRecord>> = IndexMap::new();
    for record in records {
        months
            .entry(record.date.month_key())
            .or_default()
            .push(*record);
    }

    months.sort_by(|a, _, b, _| b.cmp(a));

    months
        .into_iter()
        .map(|(month, records)| MonthGroup { month, records })
        .collect()
}
