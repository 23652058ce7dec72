//! Before/after delta and trend classification.
//!
//! The default convention classifies any increase as [`Trend::Improving`]. That reads backwards
//! for metrics where lower is better (blood pressure, weight, anxiety scores), so callers that
//! know a metric's direction can pass [`Polarity::LowerIsBetter`] to [`compute_delta_with`].

use serde::Serialize;
use std::fmt;

/// Three-way classification of a delta's sign.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Improving,
    Declining,
    Stable,
}

impl Trend {
    pub fn as_str(self) -> &'static str {
        match self {
            Trend::Improving => "improving",
            Trend::Declining => "declining",
            Trend::Stable => "stable",
        }
    }
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which direction of change counts as improvement for a metric.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Polarity {
    #[default]
    HigherIsBetter,
    LowerIsBetter,
}

/// Difference between a before and an after reading.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Delta {
    pub change: f64,
    pub percentage_change: f64,
    pub trend: Trend,
}

impl Delta {
    /// Result used for malformed or missing readings.
    pub const NEUTRAL: Delta = Delta {
        change: 0.0,
        percentage_change: 0.0,
        trend: Trend::Stable,
    };
}

/// Compute the delta from `before` to `after` with the default sign convention.
pub fn compute_delta(before: f64, after: f64) -> Delta {
    compute_delta_with(before, after, Polarity::HigherIsBetter)
}

/// Compute the delta from `before` to `after`, classifying the trend by `polarity`.
///
/// `percentage_change` is relative to `before` and is `0` when `before` is zero. Non-finite
/// inputs produce [`Delta::NEUTRAL`].
pub fn compute_delta_with(before: f64, after: f64, polarity: Polarity) -> Delta {
    if !before.is_finite() || !after.is_finite() {
        return Delta::NEUTRAL;
    }

    let change = after - before;
    let percentage_change = if before != 0.0 {
        change / before * 100.0
    } else {
        0.0
    };

    let rising = match polarity {
        Polarity::HigherIsBetter => change,
        Polarity::LowerIsBetter => -change,
    };
    let trend = if rising > 0.0 {
        Trend::Improving
    } else if rising < 0.0 {
        Trend::Declining
    } else {
        Trend::Stable
    };

    Delta {
        change,
        percentage_change,
        trend,
    }
}

/// Delta for two optional readings; a missing side yields [`Delta::NEUTRAL`].
pub fn compute_optional_delta(before: Option<f64>, after: Option<f64>, polarity: Polarity) -> Delta {
    match (before, after) {
        (Some(b), Some(a)) => compute_delta_with(b, a, polarity),
        _ => Delta::NEUTRAL,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn increase_is_improving() {
        let delta = compute_delta(100.0, 120.0);
        assert_eq!(delta.change, 20.0);
        assert_eq!(delta.percentage_change, 20.0);
        assert_eq!(delta.trend, Trend::Improving);
    }

    #[test]
    fn decrease_is_declining() {
        let delta = compute_delta(100.0, 80.0);
        assert_eq!(delta.change, -20.0);
        assert_eq!(delta.percentage_change, -20.0);
        assert_eq!(delta.trend, Trend::Declining);
    }

    #[test]
    fn zero_baseline_guards_division() {
        assert_eq!(compute_delta(0.0, 0.0), Delta::NEUTRAL);

        let delta = compute_delta(0.0, 5.0);
        assert_eq!(delta.change, 5.0);
        assert_eq!(delta.percentage_change, 0.0);
        assert_eq!(delta.trend, Trend::Improving);
    }

    #[test]
    fn non_finite_input_is_neutral() {
        assert_eq!(compute_delta(f64::NAN, 10.0), Delta::NEUTRAL);
        assert_eq!(compute_delta(10.0, f64::INFINITY), Delta::NEUTRAL);
    }

    #[test]
    fn lower_is_better_inverts_trend_only() {
        let delta = compute_delta_with(140.0, 120.0, Polarity::LowerIsBetter);
        assert_eq!(delta.change, -20.0);
        assert_eq!(delta.trend, Trend::Improving);

        let delta = compute_delta_with(120.0, 140.0, Polarity::LowerIsBetter);
        assert_eq!(delta.trend, Trend::Declining);
    }

    #[test]
    fn missing_side_is_neutral() {
        assert_eq!(
            compute_optional_delta(Some(1.0), None, Polarity::default()),
            Delta::NEUTRAL
        );
        assert_eq!(
            compute_optional_delta(Some(2.0), Some(3.0), Polarity::default()).trend,
            Trend::Improving
        );
    }
}
