//! Red-flag monitor: read-only analytic records with client-local triage.
//!
//! Red flags, alerts and patterns come from the collaborator already computed. The only
//! mutation is a local status toggle (dismiss, snooze, reactivate), which is never persisted.

use crate::view::{Faceted, Searchable, ViewFilter};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Ordered severity, lowest first.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    #[default]
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
            Severity::Critical => "critical",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "low" => Some(Severity::Low),
            "medium" => Some(Severity::Medium),
            "high" => Some(Severity::High),
            "critical" => Some(Severity::Critical),
            _ => None,
        }
    }
}

/// Local triage status.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlagStatus {
    #[default]
    Active,
    Dismissed,
    Snoozed,
}

impl FlagStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            FlagStatus::Active => "active",
            FlagStatus::Dismissed => "dismissed",
            FlagStatus::Snoozed => "snoozed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "active" => Some(FlagStatus::Active),
            "dismissed" => Some(FlagStatus::Dismissed),
            "snoozed" => Some(FlagStatus::Snoozed),
            _ => None,
        }
    }
}

/// A health red flag raised by the backend's analysis.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RedFlag {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub category: String,
    #[serde(default)]
    pub severity: Severity,
    #[serde(default)]
    pub status: FlagStatus,
    /// Model confidence in `0.0..=1.0`.
    #[serde(default)]
    pub confidence: f64,
    #[serde(default)]
    pub triggers: Vec<String>,
    #[serde(default)]
    pub recommended_actions: Vec<String>,
    #[serde(default)]
    pub detected_at: Option<DateTime<Utc>>,
}

/// A time-sensitive notification.
///
/// Library-only: no collaborator endpoint serves alerts yet, so nothing in the CLI loads them.
/// A caller with alerts in hand can triage them with `MonitorBoard<Alert>`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Alert {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub message: String,
    #[serde(rename = "type")]
    pub alert_type: String,
    #[serde(default)]
    pub severity: Severity,
    #[serde(default)]
    pub status: FlagStatus,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// A recurring pattern spotted across entries.
///
/// Library-only, like [`Alert`]: decoded and searched, never fetched by a page.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pattern {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "type")]
    pub pattern_type: String,
    #[serde(default)]
    pub confidence: f64,
    #[serde(default)]
    pub occurrences: u32,
    #[serde(default)]
    pub triggers: Vec<String>,
}

impl Faceted for RedFlag {
    fn facet(&self) -> &str {
        &self.category
    }
}

impl Searchable for RedFlag {
    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.title.as_str(), self.description.as_str()];
        fields.extend(self.triggers.iter().map(String::as_str));
        fields
    }
}

impl Faceted for Alert {
    fn facet(&self) -> &str {
        &self.alert_type
    }
}

impl Searchable for Alert {
    fn search_fields(&self) -> Vec<&str> {
        vec![self.title.as_str(), self.message.as_str()]
    }
}

impl Faceted for Pattern {
    fn facet(&self) -> &str {
        &self.pattern_type
    }
}

impl Searchable for Pattern {
    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.name.as_str(), self.description.as_str()];
        fields.extend(self.triggers.iter().map(String::as_str));
        fields
    }
}

/// Records that can be triaged locally.
pub trait Triaged {
    fn id(&self) -> &str;
    fn severity(&self) -> Severity;
    fn status(&self) -> FlagStatus;
    fn set_status(&mut self, status: FlagStatus);
}

impl Triaged for RedFlag {
    fn id(&self) -> &str {
        &self.id
    }
    fn severity(&self) -> Severity {
        self.severity
    }
    fn status(&self) -> FlagStatus {
        self.status
    }
    fn set_status(&mut self, status: FlagStatus) {
        self.status = status;
    }
}

impl Triaged for Alert {
    fn id(&self) -> &str {
        &self.id
    }
    fn severity(&self) -> Severity {
        self.severity
    }
    fn status(&self) -> FlagStatus {
        self.status
    }
    fn set_status(&mut self, status: FlagStatus) {
        self.status = status;
    }
}

/// Status and severity selection layered over a [`ViewFilter`].
#[derive(Clone, Debug, Default)]
pub struct MonitorFilter {
    pub view: ViewFilter,
    pub status: Option<FlagStatus>,
    pub min_severity: Option<Severity>,
}

impl MonitorFilter {
    pub fn accepts<T: Triaged + Faceted + Searchable>(&self, item: &T) -> bool {
        self.status.is_none_or(|s| item.status() == s)
            && self.min_severity.is_none_or(|min| item.severity() >= min)
            && self.view.accepts(item)
    }
}

/// A page-owned set of triaged records.
#[derive(Clone, Debug)]
pub struct MonitorBoard<T> {
    items: Vec<T>,
}

impl<T> Default for MonitorBoard<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<T: Triaged + Faceted + Searchable> MonitorBoard<T> {
    pub fn new(items: Vec<T>) -> Self {
        Self { items }
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Set the status of the record with `id`. Returns `false` if no such record exists.
    pub fn set_status(&mut self, id: &str, status: FlagStatus) -> bool {
        match self.items.iter_mut().find(|item| item.id() == id) {
            Some(item) => {
                tracing::debug!("triage {} -> {}", id, status.as_str());
                item.set_status(status);
                true
            }
            None => false,
        }
    }

    pub fn dismiss(&mut self, id: &str) -> bool {
        self.set_status(id, FlagStatus::Dismissed)
    }

    pub fn snooze(&mut self, id: &str) -> bool {
        self.set_status(id, FlagStatus::Snoozed)
    }

    pub fn reactivate(&mut self, id: &str) -> bool {
        self.set_status(id, FlagStatus::Active)
    }

    pub fn visible(&self, filter: &MonitorFilter) -> Vec<&T> {
        self.items.iter().filter(|item| filter.accepts(*item)).collect()
    }

    /// Number of active records at or above `severity`.
    pub fn active_at_least(&self, severity: Severity) -> usize {
        self.items
            .iter()
            .filter(|item| item.status() == FlagStatus::Active && item.severity() >= severity)
            .count()
    }
}
