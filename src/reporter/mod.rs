// file: src/reporter/mod.rs
// description: assembles the final PDF report from pipeline outputs
// reference: src/reporter/pdf.rs

mod pdf;

use crate::config::ReportConfig;
use crate::error::Result;
use crate::models::{
    AnalysisSummary, ChartArtifact, ChartKind, Dataset, PredictionResult, ReportArtifact,
    SynthesizedInsights,
};
use chrono::{Local, Utc};
use pdf::PdfBuilder;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::{debug, info, warn};

/// Row and column counts displayed in the report header table.
///
/// Computed from the cleaned dataset so the overview is available even when
/// the analysis stage was skipped in best-effort mode.
#[derive(Debug, Clone, PartialEq)]
pub struct DatasetOverview {
    pub source_filename: String,
    pub row_count: usize,
    pub column_count: usize,
    pub numeric_count: usize,
    pub categorical_count: usize,
    pub missing_total: usize,
}

impl DatasetOverview {
    pub fn from_dataset(source_filename: &str, dataset: &Dataset) -> Self {
        Self {
            source_filename: source_filename.to_string(),
            row_count: dataset.row_count(),
            column_count: dataset.column_count(),
            numeric_count: dataset.numeric_columns().len(),
            categorical_count: dataset.categorical_columns().len(),
            missing_total: dataset.missing_total(),
        }
    }
}

/// Everything one run hands to the reporter. Charts, insights and the
/// prediction are optional; each missing piece is replaced by a short
/// placeholder section.
pub struct ReportInputs<'a> {
    pub run_id: &'a str,
    pub overview: &'a DatasetOverview,
    pub summary: Option<&'a AnalysisSummary>,
    pub insights: Option<&'a SynthesizedInsights>,
    pub prediction: Option<&'a PredictionResult>,
    pub charts: &'a BTreeMap<ChartKind, ChartArtifact>,
}

pub struct Reporter {
    config: ReportConfig,
}

impl Reporter {
    pub fn new(config: ReportConfig) -> Self {
        Self { config }
    }

    /// Writes the report PDF and returns its artifact.
    ///
    /// Section order is fixed: header, dataset overview, narrative sections,
    /// charts, then the prediction section. On success the consumed chart
    /// files are deleted unless `keep_charts` is set; a failed deletion is
    /// logged and never fails the run.
    pub fn build(&self, inputs: &ReportInputs) -> Result<ReportArtifact> {
        fs::create_dir_all(&self.config.output_dir)?;

        let generated_at = Utc::now();
        let filename = format!(
            "report_{}_{}.pdf",
            Local::now().format("%Y%m%d_%H%M%S"),
            &inputs.run_id[..inputs.run_id.len().min(8)]
        );
        let path = self.config.output_dir.join(&filename);

        let mut builder = PdfBuilder::new("Data Analysis Report")?;
        write_header(&mut builder, inputs, &generated_at);
        write_overview(&mut builder, inputs.overview);
        write_narrative(&mut builder, inputs);
        write_statistics(&mut builder, inputs.summary);
        write_charts(&mut builder, inputs.charts);
        write_prediction(&mut builder, inputs.prediction, inputs.charts);
        builder.save(&path)?;

        info!("Report written to {}", path.display());

        if !self.config.keep_charts {
            self.cleanup_charts(inputs.charts);
        }

        Ok(ReportArtifact {
            path,
            generated_at,
            run_id: inputs.run_id.to_string(),
        })
    }

    fn cleanup_charts(&self, charts: &BTreeMap<ChartKind, ChartArtifact>) {
        let mut scratch_dirs: Vec<&Path> = Vec::new();
        for artifact in charts.values() {
            if let Err(e) = fs::remove_file(&artifact.path) {
                warn!(
                    "Could not remove chart file {}: {}",
                    artifact.path.display(),
                    e
                );
            }
            if let Some(parent) = artifact.path.parent() {
                if !scratch_dirs.contains(&parent) {
                    scratch_dirs.push(parent);
                }
            }
        }
        for dir in scratch_dirs {
            // Only succeeds once the directory is empty.
            if fs::remove_dir(dir).is_ok() {
                debug!("Removed chart scratch directory {}", dir.display());
            }
        }
    }
}

fn write_header(builder: &mut PdfBuilder, inputs: &ReportInputs, generated_at: &chrono::DateTime<Utc>) {
    builder.title("Data Analysis Report");
    builder.paragraph(&format!("Source file: {}", inputs.overview.source_filename));
    builder.paragraph(&format!(
        "Generated: {}",
        generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    builder.spacer(4.0);
}

fn write_overview(builder: &mut PdfBuilder, overview: &DatasetOverview) {
    builder.heading("Dataset Overview");
    builder.table(&[
        ("Rows".to_string(), overview.row_count.to_string()),
        ("Columns".to_string(), overview.column_count.to_string()),
        (
            "Numeric columns".to_string(),
            overview.numeric_count.to_string(),
        ),
        (
            "Categorical columns".to_string(),
            overview.categorical_count.to_string(),
        ),
        (
            "Missing values".to_string(),
            overview.missing_total.to_string(),
        ),
    ]);
}

fn write_narrative(builder: &mut PdfBuilder, inputs: &ReportInputs) {
    builder.heading("Executive Summary");
    match inputs.insights {
        Some(insights) if !insights.is_empty() => {
            if !insights.summary.is_empty() {
                builder.paragraph(&insights.summary);
            }
            write_bullet_section(builder, "Key Insights", &insights.insights);
            write_bullet_section(builder, "Risk Factors", &insights.risk_factors);
            write_bullet_section(builder, "Recommendations", &insights.recommendations);
            write_bullet_section(builder, "Statistical Notes", &insights.statistical_notes);
        }
        _ => {
            builder.paragraph("Narrative synthesis was not available for this run.");
        }
    }
}

fn write_bullet_section(builder: &mut PdfBuilder, heading: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }
    builder.heading(heading);
    for item in items {
        builder.bullet(item);
    }
}

fn write_statistics(builder: &mut PdfBuilder, summary: Option<&AnalysisSummary>) {
    builder.heading("Statistical Summary");
    match summary {
        Some(summary) => {
            if !summary.narrative.is_empty() {
                builder.paragraph(&summary.narrative);
            }
            for pair in &summary.strong_correlations {
                builder.bullet(&format!(
                    "{} and {} are strongly correlated (r = {:.3})",
                    pair.first, pair.second, pair.coefficient
                ));
            }
            for trend in &summary.trends {
                builder.bullet(&format!(
                    "{}: {} trend, {} volatility",
                    trend.column,
                    trend.direction.as_str(),
                    trend.volatility.as_str()
                ));
            }
        }
        None => {
            builder.paragraph("Statistical analysis was not available for this run.");
        }
    }
}

fn write_charts(builder: &mut PdfBuilder, charts: &BTreeMap<ChartKind, ChartArtifact>) {
    // BTreeMap iteration already yields the fixed embedding order; the
    // confusion matrix belongs to the prediction section.
    for (kind, artifact) in charts {
        if *kind == ChartKind::ConfusionMatrix {
            continue;
        }
        builder.heading(kind.title());
        builder.image(&artifact.path);
    }
}

fn write_prediction(
    builder: &mut PdfBuilder,
    prediction: Option<&PredictionResult>,
    charts: &BTreeMap<ChartKind, ChartArtifact>,
) {
    let Some(prediction) = prediction else {
        return;
    };

    builder.heading("Predictive Analysis");
    builder.paragraph(&format!(
        "A classifier was trained to predict '{}' from {} numeric features, reaching {:.1}% accuracy on {} held-out rows.",
        prediction.target_column,
        prediction.feature_columns.len(),
        prediction.accuracy * 100.0,
        prediction.test_size()
    ));

    for (class, correct, total) in prediction.class_breakdown() {
        builder.bullet(&format!("{}: {} of {} correct", class, correct, total));
    }

    if let Some(artifact) = charts.get(&ChartKind::ConfusionMatrix) {
        builder.spacer(2.0);
        builder.image(&artifact.path);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CorrelationMatrix;
    use tempfile::tempdir;

    fn overview() -> DatasetOverview {
        DatasetOverview {
            source_filename: "sales.csv".to_string(),
            row_count: 10,
            column_count: 4,
            numeric_count: 3,
            categorical_count: 1,
            missing_total: 2,
        }
    }

    fn summary() -> AnalysisSummary {
        AnalysisSummary {
            row_count: 10,
            column_count: 4,
            numeric_count: 3,
            categorical_count: 1,
            missing_total: 2,
            descriptors: vec![],
            correlations: CorrelationMatrix::empty(),
            strong_correlations: vec![],
            trends: vec![],
            narrative: "Sales shows an Increasing trend.".to_string(),
        }
    }

    fn reporter(dir: &Path, keep_charts: bool) -> Reporter {
        Reporter::new(ReportConfig {
            output_dir: dir.to_path_buf(),
            keep_charts,
        })
    }

    #[test]
    fn test_build_minimal_report() {
        let dir = tempdir().unwrap();
        let overview = overview();
        let summary = summary();
        let charts = BTreeMap::new();

        let artifact = reporter(dir.path(), false)
            .build(&ReportInputs {
                run_id: "0123456789abcdef",
                overview: &overview,
                summary: Some(&summary),
                insights: None,
                prediction: None,
                charts: &charts,
            })
            .unwrap();

        assert!(artifact.path.exists());
        assert!(artifact.path.metadata().unwrap().len() > 0);
        assert_eq!(artifact.run_id, "0123456789abcdef");
        let name = artifact.path.file_name().unwrap().to_string_lossy();
        assert!(name.starts_with("report_"));
        assert!(name.ends_with("_01234567.pdf"));
    }

    #[test]
    fn test_build_without_analysis_uses_placeholders() {
        let dir = tempdir().unwrap();
        let overview = overview();
        let charts = BTreeMap::new();

        let artifact = reporter(dir.path(), false)
            .build(&ReportInputs {
                run_id: "run",
                overview: &overview,
                summary: None,
                insights: None,
                prediction: None,
                charts: &charts,
            })
            .unwrap();

        assert!(artifact.path.exists());
    }

    #[test]
    fn test_charts_deleted_after_build() {
        let dir = tempdir().unwrap();
        let scratch = dir.path().join("scratch");
        fs::create_dir_all(&scratch).unwrap();
        let chart_path = scratch.join("distributions.png");
        fs::write(&chart_path, b"not a real png").unwrap();

        let overview = overview();
        let summary = summary();
        let mut charts = BTreeMap::new();
        charts.insert(
            ChartKind::Distributions,
            ChartArtifact {
                kind: ChartKind::Distributions,
                path: chart_path.clone(),
            },
        );

        reporter(dir.path(), false)
            .build(&ReportInputs {
                run_id: "run",
                overview: &overview,
                summary: Some(&summary),
                insights: None,
                prediction: None,
                charts: &charts,
            })
            .unwrap();

        assert!(!chart_path.exists());
        assert!(!scratch.exists());
    }

    #[test]
    fn test_keep_charts_preserves_files() {
        let dir = tempdir().unwrap();
        let chart_path = dir.path().join("correlation.png");
        fs::write(&chart_path, b"not a real png").unwrap();

        let overview = overview();
        let mut charts = BTreeMap::new();
        charts.insert(
            ChartKind::Correlation,
            ChartArtifact {
                kind: ChartKind::Correlation,
                path: chart_path.clone(),
            },
        );

        reporter(dir.path(), true)
            .build(&ReportInputs {
                run_id: "run",
                overview: &overview,
                summary: None,
                insights: None,
                prediction: None,
                charts: &charts,
            })
            .unwrap();

        assert!(chart_path.exists());
    }

    #[test]
    fn test_prediction_section_included() {
        let dir = tempdir().unwrap();
        let overview = overview();
        let prediction = PredictionResult {
            target_column: "category".to_string(),
            feature_columns: vec!["sales".to_string(), "profit".to_string()],
            classes: vec!["A".to_string(), "B".to_string()],
            predictions: vec![0, 1],
            actual: vec![0, 1],
            accuracy: 1.0,
            confusion_matrix: vec![vec![1, 0], vec![0, 1]],
        };
        let charts = BTreeMap::new();

        let artifact = reporter(dir.path(), false)
            .build(&ReportInputs {
                run_id: "run",
                overview: &overview,
                summary: None,
                insights: None,
                prediction: Some(&prediction),
                charts: &charts,
            })
            .unwrap();

        assert!(artifact.path.exists());
    }
}
