//! Performance report definitions.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A metric value, or a marker that the metric does not apply.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetricValue {
    /// Computed value.
    Value(f64),
    /// Metric is not meaningful for this allocation.
    NotApplicable,
}

impl MetricValue {
    /// The numeric value, if applicable.
    #[must_use]
    pub const fn value(&self) -> Option<f64> {
        match self {
            Self::Value(v) => Some(*v),
            Self::NotApplicable => None,
        }
    }

    /// Whether the metric is marked not applicable.
    #[must_use]
    pub const fn is_not_applicable(&self) -> bool {
        matches!(self, Self::NotApplicable)
    }
}

impl From<f64> for MetricValue {
    fn from(v: f64) -> Self {
        Self::Value(v)
    }
}

impl fmt::Display for MetricValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(v) => fmt::Display::fmt(v, f),
            Self::NotApplicable => f.pad("-"),
        }
    }
}

/// Realized risk/return metrics of a weight vector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceReport {
    /// Mean portfolio return (annualized in the annual variant).
    #[serde(rename = "Return")]
    pub mean_return: f64,
    /// Standard deviation of portfolio returns.
    #[serde(rename = "Volatility")]
    pub volatility: f64,
    /// Return over volatility.
    #[serde(rename = "Sharpe")]
    pub sharpe: f64,
    /// Regression slope against the benchmark.
    #[serde(rename = "Beta")]
    pub beta: f64,
    /// Return over beta.
    #[serde(rename = "Treynor")]
    pub treynor: f64,
    /// Return over downside deviation.
    #[serde(rename = "Sortino")]
    pub sortino: f64,
    /// Sum of gains over sum of losses.
    #[serde(rename = "Omega")]
    pub omega: f64,
    /// Mean of the lower 5% tail of returns.
    #[serde(rename = "CVaR 95%")]
    pub cvar: f64,
    /// Standard deviation of returns in excess of the benchmark.
    #[serde(rename = "Tracking Error")]
    pub tracking_error: MetricValue,
    /// Mean excess return over the benchmark.
    #[serde(rename = "Active Return")]
    pub active_return: MetricValue,
    /// Active return over tracking error.
    #[serde(rename = "Information Ratio")]
    pub information_ratio: MetricValue,
}

impl PerformanceReport {
    /// Metrics as `(name, value)` pairs in display order.
    #[must_use]
    pub fn entries(&self) -> Vec<(&'static str, MetricValue)> {
        vec![
            ("Return", self.mean_return.into()),
            ("Volatility", self.volatility.into()),
            ("Sharpe", self.sharpe.into()),
            ("Beta", self.beta.into()),
            ("Treynor", self.treynor.into()),
            ("Sortino", self.sortino.into()),
            ("Omega", self.omega.into()),
            ("CVaR 95%", self.cvar.into()),
            ("Tracking Error", self.tracking_error),
            ("Active Return", self.active_return),
            ("Information Ratio", self.information_ratio),
        ]
    }

    /// Look up a metric by its display name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<MetricValue> {
        self.entries().into_iter().find(|(n, _)| *n == name).map(|(_, v)| v)
    }
}

impl fmt::Display for PerformanceReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (name, value) in self.entries() {
            writeln!(f, "{name:<20} {value:>12.6}")?;
        }
        Ok(())
    }
}
