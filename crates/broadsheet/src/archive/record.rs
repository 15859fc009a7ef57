use serde::Deserialize;

use crate::date::IssueDate;

/// The metadata for a single newsletter issue, as listed in the archive index.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NewsletterRecord {
    pub issue: u32,
    pub date: IssueDate,
    pub title: String,
    pub path: String,
}

impl NewsletterRecord {
    /// The display label for the issue number, e.g. `#12`.
    pub fn label(&self) -> String {
        format!("#{}", self.issue)
    }

    /// Splits the title on the `Main Title: Subtitle` convention.
    ///
    /// Only the first two colon-delimited segments are considered.
    pub fn title_parts(&self) -> (&str, Option<&str>) {
        let mut parts = self.title.split(':');
        let main = parts.next().unwrap_or_default().trim();
        let subtitle = parts
            .next()
            .map(str::trim)
            .filter(|subtitle| !subtitle.is_empty());

        (main, subtitle)
    }
}

/// Sorts records newest first. Records sharing a date keep their relative order.
pub fn sort_by_date_desc(records: &mut [NewsletterRecord]) {
    records.sort_by(|a, b| b.date.cmp(&a.date));
}

#[cfg(test)]
pub(crate) fn record(issue: u32, date: &str, title: &str) -> NewsletterRecord {
    NewsletterRecord {
        issue,
        date: IssueDate::parse(date).unwrap(),
        title: title.to_string(),
        path: format!("/newsletters/{issue}.html"),
    }
}
