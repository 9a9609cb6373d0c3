// file: src/models/report.rs
// description: chart and report artifact models plus history records
// reference: internal data structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Logical chart identity, also the embedding order in the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ChartKind {
    Distributions,
    Correlation,
    Boxplots,
    ConfusionMatrix,
}

impl ChartKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChartKind::Distributions => "distributions",
            ChartKind::Correlation => "correlation",
            ChartKind::Boxplots => "boxplots",
            ChartKind::ConfusionMatrix => "confusion_matrix",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            ChartKind::Distributions => "Feature Distributions",
            ChartKind::Correlation => "Correlation Analysis",
            ChartKind::Boxplots => "Outlier Analysis",
            ChartKind::ConfusionMatrix => "Confusion Matrix",
        }
    }
}

/// Rendered PNG produced by the visualizer for one pipeline run.
///
/// Lives in the run's scratch directory; the reporter deletes it after
/// embedding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartArtifact {
    pub kind: ChartKind,
    pub path: PathBuf,
}

/// Final rendered document, immutable once written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportArtifact {
    pub path: PathBuf,
    pub generated_at: DateTime<Utc>,
    pub run_id: String,
}

/// Row shape of the report-history store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportRecord {
    pub id: i64,
    pub filename: String,
    pub report_path: String,
    pub report_type: String,
    pub created_at: String,
    pub analysis_results: serde_json::Value,
    pub metadata: serde_json::Value,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chart_kind_ordering_matches_report_order() {
        let mut kinds = vec![
            ChartKind::ConfusionMatrix,
            ChartKind::Boxplots,
            ChartKind::Distributions,
            ChartKind::Correlation,
        ];
        kinds.sort();
        assert_eq!(
            kinds,
            vec![
                ChartKind::Distributions,
                ChartKind::Correlation,
                ChartKind::Boxplots,
                ChartKind::ConfusionMatrix,
            ]
        );
    }

    #[test]
    fn test_chart_kind_names() {
        assert_eq!(ChartKind::Distributions.as_str(), "distributions");
        assert_eq!(ChartKind::ConfusionMatrix.as_str(), "confusion_matrix");
    }
}
