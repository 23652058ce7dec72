//! Plain-text rendering for terminal output.

use blueprint_core::monitor::RedFlag;
use blueprint_core::vault::{Comparison, MetricDelta, Photo};
use blueprint_core::{Completion, ListSection, SectionRecord};

/// A section's title followed by its summary lines, or its placeholder when empty.
pub fn section_block(record: &SectionRecord) -> String {
    let schema = record.schema();
    let mut out = format!("{} ({})\n", schema.title, schema.key);
    if record.is_empty() {
        out.push_str(&format!("  {}\n", schema.placeholder));
    } else {
        for line in record.summary_lines() {
            out.push_str(&format!("  {line}\n"));
        }
    }
    out
}

pub fn list_block(list: &ListSection) -> String {
    let mut out = format!("{}\n", list.kind().title());
    if list.is_empty() {
        out.push_str(&format!("  {}\n", list.kind().placeholder()));
    } else {
        for (i, item) in list.items().iter().enumerate() {
            out.push_str(&format!("  {}. {}\n", i + 1, item));
        }
    }
    out
}

pub fn completion_line(completion: Completion) -> String {
    format!(
        "{} of {} sections complete ({}%)",
        completion.complete,
        completion.total,
        completion.percent()
    )
}

fn reading(value: Option<f64>, unit: &str) -> String {
    match (value, unit.is_empty()) {
        (Some(v), true) => format!("{v}"),
        (Some(v), false) => format!("{v} {unit}"),
        (None, _) => "n/a".to_string(),
    }
}

pub fn metric_line(metric: &MetricDelta) -> String {
    format!(
        "{}: {} -> {} ({:+}, {:+.1}%, {})",
        metric.name,
        reading(metric.before, &metric.unit),
        reading(metric.after, &metric.unit),
        metric.delta.change,
        metric.delta.percentage_change,
        metric.delta.trend
    )
}

pub fn comparison_block(comparison: &Comparison, metrics: &[MetricDelta]) -> String {
    let mut out = format!(
        "{} [{}] ({})\n  photos: {} -> {}\n",
        comparison.title,
        comparison.id,
        comparison.category,
        comparison.before_photo_id,
        comparison.after_photo_id
    );
    for metric in metrics {
        out.push_str(&format!("  {}\n", metric_line(metric)));
    }
    out
}

pub fn photo_line(photo: &Photo) -> String {
    let mut line = format!("{} [{}] ({})", photo.title, photo.id, photo.category);
    if !photo.tags.is_empty() {
        line.push_str(&format!(" #{}", photo.tags.join(" #")));
    }
    line
}

pub fn flag_block(flag: &RedFlag) -> String {
    let mut out = format!(
        "[{}] {} ({}, {}, confidence {:.0}%)\n",
        flag.severity.as_str(),
        flag.title,
        flag.category,
        flag.status.as_str(),
        flag.confidence * 100.0
    );
    if !flag.description.is_empty() {
        out.push_str(&format!("  {}\n", flag.description));
    }
    for action in &flag.recommended_actions {
        out.push_str(&format!("  - {action}\n"));
    }
    out
}
