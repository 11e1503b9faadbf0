// Summary presentation - deterministic rendering model for a WeeklySummary

use crate::models::WeeklySummary;

/// A run of executive-summary text, plain or emphasized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    pub text: String,
    pub emphasized: bool,
}

/// Split text on literal `**` delimiters; odd-indexed segments are
/// emphasized. The first segment is always plain, alternating thereafter.
/// No nesting, no escaping; an odd delimiter count still renders the last
/// segment rather than erroring. Empty segments are dropped.
pub fn emphasis_spans(text: &str) -> Vec<Span> {
    text.split("**")
        .enumerate()
        .filter(|(_, part)| !part.is_empty())
        .map(|(i, part)| Span {
            text: part.to_string(),
            emphasized: i % 2 == 1,
        })
        .collect()
}

/// Plain-text rendering of a summary for the CLI shell. Emphasized spans are
/// wrapped in brackets; focus-area percentages are shown as given, without
/// normalization.
pub fn render_plain(summary: &WeeklySummary) -> String {
    let mut out = String::new();

    out.push_str("Executive summary\n");
    for span in emphasis_spans(&summary.executive_summary) {
        if span.emphasized {
            out.push('[');
            out.push_str(&span.text);
            out.push(']');
        } else {
            out.push_str(&span.text);
        }
    }
    out.push('\n');

    if !summary.focus_areas.is_empty() {
        out.push_str("\nFocus areas\n");
        for area in &summary.focus_areas {
            out.push_str(&format!("  {:<24} {}%\n", area.name, area.percentage));
        }
    }

    let pulse = &summary.pulse_stats;
    out.push_str(&format!(
        "\nPulse: {} completed ({:+} vs last week), {}h deep work (avg {}h)\n",
        pulse.completed, pulse.completed_change, pulse.deep_work_hours, pulse.deep_work_avg
    ));

    if !summary.highlights.is_empty() {
        out.push_str("\nHighlights\n");
        for h in &summary.highlights {
            out.push_str(&format!("  {} {} - {}\n", h.icon, h.title, h.description));
        }
    }

    if let Some(suggestions) = &summary.next_week_suggestions {
        if !suggestions.is_empty() {
            out.push_str("\nNext week\n");
            for s in suggestions {
                out.push_str(&format!("  - {}\n", s));
            }
        }
    }

    out
}
