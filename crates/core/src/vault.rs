//! Photo vault entities: photos and before/after comparisons.
//!
//! Metric readings are matched between the before and after side by position, not by name. A
//! comparison whose after list is reordered relative to its before list will therefore pair the
//! wrong readings. [`MetricMatching::ByName`] pairs by name instead and is available for callers
//! that want it.

use crate::trend::{compute_optional_delta, Delta, Polarity};
use crate::view::{Faceted, Searchable};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Who may see a vault entry.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Privacy {
    #[default]
    Private,
    Shared,
    Public,
}

/// A stored photo.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Photo {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub category: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub taken_at: Option<DateTime<Utc>>,
}

/// One metric observation attached to a photo.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricReading {
    pub name: String,
    /// `None` when the reading was missing or not a JSON number.
    #[serde(default, deserialize_with = "lenient_number")]
    pub value: Option<f64>,
    #[serde(default)]
    pub unit: String,
    #[serde(default)]
    pub date: Option<String>,
}

fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = serde_json::Value::deserialize(deserializer)?;
    Ok(raw.as_f64().filter(|n| n.is_finite()))
}

/// A before/after pairing of two photos with their metric readings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comparison {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub category: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub privacy: Privacy,
    pub before_photo_id: String,
    pub after_photo_id: String,
    #[serde(default)]
    pub before_metrics: Vec<MetricReading>,
    #[serde(default)]
    pub after_metrics: Vec<MetricReading>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// How before and after readings are paired.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MetricMatching {
    /// `after[i]` pairs with `before[i]`; unmatched trailing readings are dropped.
    #[default]
    Positional,
    /// Each before reading pairs with the first after reading of the same name.
    ByName,
}

/// The delta for one paired metric.
#[derive(Clone, Debug, PartialEq)]
pub struct MetricDelta {
    pub name: String,
    pub unit: String,
    pub before: Option<f64>,
    pub after: Option<f64>,
    pub delta: Delta,
}

impl Comparison {
    /// Per-metric deltas with positional matching and the default trend convention.
    pub fn metric_deltas(&self) -> Vec<MetricDelta> {
        self.metric_deltas_by(MetricMatching::Positional, |_| Polarity::HigherIsBetter)
    }

    /// Per-metric deltas with explicit matching and a per-metric polarity.
    pub fn metric_deltas_by(
        &self,
        matching: MetricMatching,
        polarity_of: impl Fn(&str) -> Polarity,
    ) -> Vec<MetricDelta> {
        pair_metrics(&self.before_metrics, &self.after_metrics, matching)
            .into_iter()
            .map(|(before, after)| MetricDelta {
                name: before.name.clone(),
                unit: before.unit.clone(),
                before: before.value,
                after: after.value,
                delta: compute_optional_delta(before.value, after.value, polarity_of(&before.name)),
            })
            .collect()
    }
}

/// Pair readings from the two sides according to `matching`.
pub fn pair_metrics<'a>(
    before: &'a [MetricReading],
    after: &'a [MetricReading],
    matching: MetricMatching,
) -> Vec<(&'a MetricReading, &'a MetricReading)> {
    match matching {
        MetricMatching::Positional => before.iter().zip(after.iter()).collect(),
        MetricMatching::ByName => before
            .iter()
            .filter_map(|b| after.iter().find(|a| a.name == b.name).map(|a| (b, a)))
            .collect(),
    }
}

impl Faceted for Photo {
    fn facet(&self) -> &str {
        &self.category
    }
}

impl Searchable for Photo {
    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.title.as_str(), self.description.as_str()];
        fields.extend(self.tags.iter().map(String::as_str));
        fields
    }
}

impl Faceted for Comparison {
    fn facet(&self) -> &str {
        &self.category
    }
}

impl Searchable for Comparison {
    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.title.as_str(), self.description.as_str()];
        fields.extend(self.tags.iter().map(String::as_str));
        fields
    }
}
