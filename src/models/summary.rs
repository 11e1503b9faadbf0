// Weekly summary read model - produced by the AI boundary, never mutated here

use serde::{Deserialize, Serialize};

/// Aggregated weekly summary as returned by `POST /generate-summary` and
/// embedded in saved reports. Field names are camelCase on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklySummary {
    /// May embed `**bold**` markers; see `views::summary::emphasis_spans`.
    pub executive_summary: String,
    #[serde(default)]
    pub focus_areas: Vec<FocusArea>,
    #[serde(default)]
    pub pulse_stats: PulseStats,
    #[serde(default)]
    pub highlights: Vec<Highlight>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_week_suggestions: Option<Vec<String>>,
}

/// Name/percentage pair. Percentages are displayed as given; the model does
/// not validate that they sum to 100.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FocusArea {
    pub name: String,
    pub percentage: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PulseStats {
    #[serde(default)]
    pub completed: i64,
    #[serde(default)]
    pub completed_change: i64,
    #[serde(default)]
    pub deep_work_hours: f64,
    #[serde(default)]
    pub deep_work_avg: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Highlight {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub timestamp: String,
}

impl WeeklySummary {
    /// Seeded empty state shown before the first generation.
    pub fn placeholder() -> Self {
        Self {
            executive_summary: "No report yet. Capture some logs and tasks, then trigger \
                                **Regenerate Summary** from the review board."
                .to_string(),
            focus_areas: vec![FocusArea {
                name: "Awaiting data".to_string(),
                percentage: 100.0,
            }],
            pulse_stats: PulseStats::default(),
            highlights: Vec::new(),
            next_week_suggestions: None,
        }
    }
}
