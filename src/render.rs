//! Plain-text rendering of analysis results for the CLI binaries.
//!
//! Mirrors the dashboard layout: the generated report first, then metric
//! bars, then the event timeline. Output is plain text so it reads the
//! same piped to a file as on a terminal.

use crate::report::{segment_report, ReportBlock};
use crate::{AnalysisResult, DetectionEvent, Metric};

const METRIC_BAR_WIDTH: usize = 24;

/// Render a full result as the standard three-section layout.
pub fn render_result(result: &AnalysisResult) -> String {
    let mut out = String::new();
    section(&mut out, "AI Generated Report");
    render_report(&mut out, &result.report);
    out.push('\n');
    section(&mut out, "Key Metrics");
    render_metrics(&mut out, &result.metrics);
    out.push('\n');
    section(&mut out, "Event Timeline");
    render_events(&mut out, &result.events);
    out
}

fn section(out: &mut String, title: &str) {
    out.push_str(title);
    out.push('\n');
    out.push_str(&"-".repeat(title.len()));
    out.push('\n');
}

/// Enumerated findings are indented; paragraphs print flush left.
pub fn render_report(out: &mut String, report: &str) {
    for block in segment_report(report) {
        match block {
            ReportBlock::Item(line) => {
                out.push_str("    ");
                out.push_str(&line);
                out.push('\n');
            }
            ReportBlock::Paragraph(line) => {
                out.push_str(&line);
                out.push('\n');
            }
            ReportBlock::Break => out.push('\n'),
        }
    }
}

/// One bar per metric, scaled against a 0-100 range. Out-of-range values
/// saturate the bar but print verbatim.
pub fn render_metrics(out: &mut String, metrics: &[Metric]) {
    let name_width = metrics.iter().map(|m| m.name.len()).max().unwrap_or(0);
    for metric in metrics {
        let filled = bar_fill(metric.value);
        out.push_str(&format!(
            "  {:<name_width$}  [{}{}] {}\n",
            metric.name,
            "#".repeat(filled),
            ".".repeat(METRIC_BAR_WIDTH - filled),
            format_metric_value(metric.value),
        ));
    }
}

fn bar_fill(value: f64) -> usize {
    let fraction = (value / 100.0).clamp(0.0, 1.0);
    let filled = (fraction * METRIC_BAR_WIDTH as f64).round() as usize;
    filled.min(METRIC_BAR_WIDTH)
}

fn format_metric_value(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        format!("{value:.1}")
    }
}

/// Timeline lines in the order the service returned them. Events carrying
/// a detection box get a coordinate suffix.
pub fn render_events(out: &mut String, events: &[DetectionEvent]) {
    for event in events {
        out.push_str(&format!(
            "  {:>5}  {:<7}  {}",
            event.time,
            event.severity.as_str(),
            event.description
        ));
        if let Some(bounds) = &event.bounds {
            out.push_str(&format!(
                "  [box x={:.2} y={:.2} w={:.2} h={:.2}]",
                bounds.x, bounds.y, bounds.width, bounds.height
            ));
        }
        out.push('\n');
    }
}
