use crate::archive::NewsletterRecord;

/// Lowercases and trims a raw search-input value.
pub fn normalize_query(query: &str) -> String {
    query.trim().to_lowercase()
}

/// The text a query is matched against: the lowercased title, the raw
/// date, `issue <n>`, and `#<n>`, separated by spaces.
pub fn searchable_text(record: &NewsletterRecord) -> String {
    [
        record.title.to_lowercase(),
        record.date.as_str().to_string(),
        format!("issue {}", record.issue),
        format!("#{}", record.issue),
    ]
    .join(" ")
}

/// Returns the records matching `query`, in their original order.
///
/// An empty query matches everything.
pub fn filter_records(records: &[NewsletterRecord], query: &str) -> Vec<NewsletterRecord> {
    let query = normalize_query(query);
    if query.is_empty() {
        return records.to_vec();
    }

    records
        .iter()
        .filter(|record| searchable_text(record).contains(&query))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::archive::record::record;

    fn issues(records: &[NewsletterRecord]) -> Vec<u32> {
        records.iter().map(|record| record.issue).collect()
    }

    fn sample() -> Vec<NewsletterRecord> {
        vec![
            record(12, "2024-12-31", "Year in Review: Highlights"),
            record(11, "2024-06-15", "Summer Reading"),
            record(3, "2023-06-01", "Rust Weekly: Ownership"),
            record(1, "2023-01-01", "Hello World"),
        ]
    }

    #[test]
    fn test_searchable_text() {
        assert_eq!(
            searchable_text(&record(7, "2024-03-01", "Big NEWS")),
            "big news 2024-03-01 issue 7 #7"
        );
    }

    #[test]
    fn test_empty_query_returns_everything() {
        let records = sample();

        assert_eq!(filter_records(&records, ""), records);
        assert_eq!(filter_records(&records, "   "), records);
    }

    #[test]
    fn test_matches_title_case_insensitively() {
        assert_eq!(issues(&filter_records(&sample(), "  RUST ")), vec![3]);
    }

    #[test]
    fn test_matches_date_and_issue_number() {
        assert_eq!(issues(&filter_records(&sample(), "2024-")), vec![12, 11]);
        assert_eq!(issues(&filter_records(&sample(), "issue 1")), vec![12, 11, 1]);
        assert_eq!(issues(&filter_records(&sample(), "#3")), vec![3]);
        assert_eq!(issues(&filter_records(&sample(), "06")), vec![11, 3]);
    }

    #[test]
    fn test_no_matches() {
        assert!(filter_records(&sample(), "quantum").is_empty());
    }

    #[test]
    fn test_results_preserve_order_and_are_a_subset() {
        let records = sample();

        for query in ["e", "20", "o", "issue", "#1", "review"] {
            let results = filter_records(&records, query);

            let mut remaining = records.iter();
            for result in &results {
                assert!(
                    remaining.any(|record| record == result),
                    "{query:?} produced an out-of-order or unknown record"
                );
            }
        }
    }

    #[test]
    fn test_filter_is_idempotent() {
        let once = filter_records(&sample(), "summer");
        let twice = filter_records(&once, "summer");

        assert_eq!(once, twice);
    }
}
