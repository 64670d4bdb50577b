// src/search/summary.rs
use super::present::DisplayRow;
use crate::utils::{format_count, normalize_state};
use std::collections::BTreeSet;

pub const NO_DATA_SUMMARY: &str = "No data available";

/// Markdown summary shown above the results table
pub fn render_summary(total_matches: usize, rows: &[DisplayRow]) -> String {
    let showing = rows.len();
    let states: BTreeSet<String> = rows.iter().map(|r| normalize_state(&r.state)).collect();
    let years: BTreeSet<&str> = rows.iter().map(|r| r.year.as_str()).collect();

    let years_label = if years.is_empty() {
        "N/A".to_string()
    } else {
        years.into_iter().collect::<Vec<_>>().join(", ")
    };

    let truncated_note = if total_matches > showing {
        " (top matches)"
    } else {
        ""
    };

    format!(
        "## Search Results\n\n\
         **Found {total} unique employers matching your criteria**\n\n\
         - **Displaying:** {showing} of {total} results{note}\n\
         - **States/Territories:** {states} (in displayed results)\n\
         - **Data Year:** {years}\n\
         - **Auto-deduplicated:** Best record kept per employer\n\n\
         These employers can sponsor H-1B visas year-round.\n",
        total = format_count(total_matches),
        showing = format_count(showing),
        note = truncated_note,
        states = states.len(),
        years = years_label,
    )
}

/// Summary for the full, unpaginated result set
pub fn render_full_summary(total_matches: usize) -> String {
    format!(
        "## Complete Results\n\n**All {} unique employers matching your criteria**\n",
        format_count(total_matches)
    )
}
