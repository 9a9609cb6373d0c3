// file: src/models/summary.rs
// description: structured analysis output records
// reference: internal data structures

use crate::models::dataset::ColumnType;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Per-type summary statistics for one column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ColumnStats {
    Numeric {
        mean: f64,
        median: f64,
        min: f64,
        max: f64,
        std_dev: f64,
    },
    DateTime {
        earliest: Option<NaiveDateTime>,
        latest: Option<NaiveDateTime>,
    },
    Categorical {
        distinct: usize,
        /// Most frequent values with occurrence count and share of non-missing
        /// rows, descending by count.
        top_values: Vec<ValueFrequency>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueFrequency {
    pub value: String,
    pub count: usize,
    pub share: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnDescriptor {
    pub name: String,
    pub column_type: ColumnType,
    pub missing: usize,
    pub stats: ColumnStats,
}

/// Pairwise Pearson correlations over the numeric columns.
///
/// Symmetric with 1.0 on the diagonal; undefined pairs (zero variance) are
/// stored as 0.0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationMatrix {
    pub labels: Vec<String>,
    pub values: Vec<Vec<f64>>,
}

impl CorrelationMatrix {
    pub fn empty() -> Self {
        Self {
            labels: Vec::new(),
            values: Vec::new(),
        }
    }

    pub fn get(&self, a: &str, b: &str) -> Option<f64> {
        let i = self.labels.iter().position(|l| l == a)?;
        let j = self.labels.iter().position(|l| l == b)?;
        Some(self.values[i][j])
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrongCorrelation {
    pub first: String,
    pub second: String,
    pub coefficient: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrendDirection {
    Increasing,
    Decreasing,
    Flat,
}

impl TrendDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            TrendDirection::Increasing => "Increasing",
            TrendDirection::Decreasing => "Decreasing",
            TrendDirection::Flat => "Flat",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Volatility {
    High,
    Low,
}

impl Volatility {
    pub fn as_str(&self) -> &'static str {
        match self {
            Volatility::High => "High",
            Volatility::Low => "Low",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendSummary {
    pub column: String,
    pub direction: TrendDirection,
    pub volatility: Volatility,
}

/// Structured result of the Analyzer, immutable once produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisSummary {
    pub row_count: usize,
    pub column_count: usize,
    pub numeric_count: usize,
    pub categorical_count: usize,
    pub missing_total: usize,
    pub descriptors: Vec<ColumnDescriptor>,
    pub correlations: CorrelationMatrix,
    pub strong_correlations: Vec<StrongCorrelation>,
    pub trends: Vec<TrendSummary>,
    pub narrative: String,
}

impl AnalysisSummary {
    /// Plain-text rendering handed to the insight synthesizer and stored
    /// alongside the report.
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!(
            "Dataset: {} rows, {} columns ({} numeric, {} categorical), {} missing values\n",
            self.row_count,
            self.column_count,
            self.numeric_count,
            self.categorical_count,
            self.missing_total
        ));

        for descriptor in &self.descriptors {
            match &descriptor.stats {
                ColumnStats::Numeric {
                    mean,
                    median,
                    min,
                    max,
                    std_dev,
                } => {
                    out.push_str(&format!(
                        "{} (numeric): mean={:.4} median={:.4} min={:.4} max={:.4} std={:.4} missing={}\n",
                        descriptor.name, mean, median, min, max, std_dev, descriptor.missing
                    ));
                }
                ColumnStats::DateTime { earliest, latest } => {
                    out.push_str(&format!(
                        "{} (datetime): earliest={} latest={} missing={}\n",
                        descriptor.name,
                        earliest.map(|t| t.to_string()).unwrap_or_default(),
                        latest.map(|t| t.to_string()).unwrap_or_default(),
                        descriptor.missing
                    ));
                }
                ColumnStats::Categorical {
                    distinct,
                    top_values,
                } => {
                    let tops: Vec<String> = top_values
                        .iter()
                        .map(|v| format!("{} ({}, {:.0}%)", v.value, v.count, v.share * 100.0))
                        .collect();
                    out.push_str(&format!(
                        "{} (categorical): distinct={} top=[{}] missing={}\n",
                        descriptor.name,
                        distinct,
                        tops.join(", "),
                        descriptor.missing
                    ));
                }
            }
        }

        for pair in &self.strong_correlations {
            out.push_str(&format!(
                "Strong correlation: {} vs {} (r={:.3})\n",
                pair.first, pair.second, pair.coefficient
            ));
        }

        out
    }

    /// Human-readable trend narrative for the synthesizer and report.
    pub fn trend_text(&self) -> String {
        self.trends
            .iter()
            .map(|t| {
                format!(
                    "{}: {} trend, {} volatility",
                    t.column,
                    t.direction.as_str(),
                    t.volatility.as_str()
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn descriptor(&self, name: &str) -> Option<&ColumnDescriptor> {
        self.descriptors.iter().find(|d| d.name == name)
    }

    pub fn trend(&self, name: &str) -> Option<&TrendSummary> {
        self.trends.iter().find(|t| t.column == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_correlation_lookup() {
        let matrix = CorrelationMatrix {
            labels: vec!["a".to_string(), "b".to_string()],
            values: vec![vec![1.0, 0.7], vec![0.7, 1.0]],
        };

        assert_eq!(matrix.get("a", "b"), Some(0.7));
        assert_eq!(matrix.get("b", "b"), Some(1.0));
        assert_eq!(matrix.get("a", "missing"), None);
    }

    #[test]
    fn test_summary_text_mentions_counts() {
        let summary = AnalysisSummary {
            row_count: 5,
            column_count: 2,
            numeric_count: 1,
            categorical_count: 1,
            missing_total: 0,
            descriptors: vec![],
            correlations: CorrelationMatrix::empty(),
            strong_correlations: vec![],
            trends: vec![],
            narrative: String::new(),
        };

        let text = summary.to_text();
        assert!(text.contains("5 rows"));
        assert!(text.contains("2 columns"));
    }
}
