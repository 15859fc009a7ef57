/// Formats the result-count indicator.
///
/// When every record is shown this reads `5 ISSUES` (or `1 ISSUE`),
/// otherwise `2 OF 5`.
pub fn count_label(showing: usize, total: usize) -> String {
    if showing == total {
        let noun = if total == 1 { "ISSUE" } else { "ISSUES" };
        format!("{total} {noun}")
    } else {
        format!("{showing} OF {total}")
    }
}
