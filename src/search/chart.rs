// src/search/chart.rs
use super::present::DisplayRow;
use crate::utils::normalize_state;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub const CHART_HEIGHT: u32 = 400;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChartBar {
    pub label: String,
    pub count: usize,
}

/// Horizontal bar chart of employers per state
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChartPayload {
    pub kind: String,
    pub orientation: String,
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub height: u32,
    pub bars: Vec<ChartBar>,
}

pub fn state_distribution(rows: &[DisplayRow], top_n: usize) -> Option<ChartPayload> {
    if rows.is_empty() {
        return None;
    }

    let mut counts: HashMap<String, usize> = HashMap::new();
    for row in rows {
        let state = normalize_state(&row.state);
        if !state.is_empty() {
            *counts.entry(state).or_default() += 1;
        }
    }

    let mut bars: Vec<ChartBar> = counts
        .into_iter()
        .map(|(label, count)| ChartBar { label, count })
        .collect();
    bars.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.label.cmp(&b.label)));
    bars.truncate(top_n);

    Some(ChartPayload {
        kind: "bar".to_string(),
        orientation: "h".to_string(),
        title: format!("Top {} States/Territories ({} employers)", top_n, rows.len()),
        x_label: "Count".to_string(),
        y_label: "State".to_string(),
        height: CHART_HEIGHT,
        bars,
    })
}
