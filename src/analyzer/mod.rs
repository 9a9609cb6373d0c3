// file: src/analyzer/mod.rs
// description: descriptive, correlation, trend, and predictive passes
// reference: exploratory data analysis stage

mod correlation;
mod descriptive;
mod predictor;
mod trends;

pub use correlation::{correlation_matrix, pearson, strong_pairs};
pub use descriptive::{describe, mean, median, std_dev};
pub use predictor::train_predictor;
pub use trends::analyze_trends;

use crate::config::AnalysisConfig;
use crate::error::{PipelineError, Result};
use crate::models::{AnalysisSummary, Dataset, PredictionResult};
use tracing::debug;

pub struct Analyzer {
    config: AnalysisConfig,
}

impl Analyzer {
    pub fn new(config: AnalysisConfig) -> Self {
        Self { config }
    }

    /// Runs the descriptive, correlation, and trend passes over a cleaned
    /// dataset. Pure function of the input: identical datasets yield
    /// identical summaries.
    pub fn analyze(&self, dataset: &Dataset) -> Result<AnalysisSummary> {
        if dataset.row_count() == 0 || dataset.column_count() == 0 {
            return Err(PipelineError::Analysis(
                "cannot analyze an empty dataset".to_string(),
            ));
        }

        let descriptors = describe(dataset, self.config.top_k_values);
        let correlations = correlation_matrix(dataset);
        let strong_correlations =
            strong_pairs(&correlations, self.config.correlation_threshold);
        let trends = analyze_trends(dataset);
        let (numeric_count, categorical_count) = descriptive::type_counts(dataset);

        let mut summary = AnalysisSummary {
            row_count: dataset.row_count(),
            column_count: dataset.column_count(),
            numeric_count,
            categorical_count,
            missing_total: dataset.missing_total(),
            descriptors,
            correlations,
            strong_correlations,
            trends,
            narrative: String::new(),
        };
        summary.narrative = build_narrative(&summary);

        debug!(
            "Analysis complete: {} descriptors, {} strong correlations, {} trends",
            summary.descriptors.len(),
            summary.strong_correlations.len(),
            summary.trends.len()
        );

        Ok(summary)
    }

    /// Predictive pass, only invoked in detailed analysis mode.
    pub fn train_predictor(&self, dataset: &Dataset) -> Result<Option<PredictionResult>> {
        train_predictor(dataset, &self.config)
    }
}

fn build_narrative(summary: &AnalysisSummary) -> String {
    let mut lines = Vec::new();

    for trend in &summary.trends {
        lines.push(format!(
            "{} shows a {} trend with {} volatility.",
            trend.column,
            trend.direction.as_str().to_lowercase(),
            trend.volatility.as_str().to_lowercase()
        ));
    }

    for pair in &summary.strong_correlations {
        let kind = if pair.coefficient > 0.0 {
            "positively"
        } else {
            "negatively"
        };
        lines.push(format!(
            "{} and {} are strongly {} correlated (r = {:.2}).",
            pair.first, pair.second, kind, pair.coefficient
        ));
    }

    if summary.missing_total > 0 {
        lines.push(format!(
            "{} missing values remain after cleaning.",
            summary.missing_total
        ));
    }

    lines.join("\n")
}
