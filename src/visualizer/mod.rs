// file: src/visualizer/mod.rs
// description: chart stage: renders per-run artifacts, tolerating failures
// reference: visualization stage

mod charts;

pub use charts::{
    render_boxplots, render_confusion_matrix, render_correlation, render_distributions,
};

use crate::error::Result;
use crate::models::{AnalysisSummary, ChartArtifact, ChartKind, Dataset, PredictionResult};
use futures::stream::{self, StreamExt};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Charts render independently, so a handful can run at once.
const MAX_PARALLEL_CHARTS: usize = 4;

/// How many numeric columns the distribution and box plots cover.
const NUMERIC_SUBSET: usize = 4;

type ChartJob = Box<dyn FnOnce() -> Result<()> + Send + 'static>;

pub struct Visualizer;

impl Visualizer {
    pub fn new() -> Self {
        Self
    }

    /// Renders every applicable chart into the per-run scratch directory.
    ///
    /// A failed chart is logged and omitted from the returned mapping;
    /// rendering failures are never fatal to the run. The reporter owns
    /// deletion of the returned artifacts.
    pub async fn render(
        &self,
        dataset: &Dataset,
        summary: &AnalysisSummary,
        prediction: Option<&PredictionResult>,
        scratch_dir: &Path,
    ) -> Result<BTreeMap<ChartKind, ChartArtifact>> {
        fs::create_dir_all(scratch_dir)?;

        let numeric_series: Vec<(String, Vec<f64>)> = dataset
            .numeric_columns()
            .iter()
            .take(NUMERIC_SUBSET)
            .map(|c| (c.name.clone(), c.numeric_values()))
            .collect();

        let mut jobs: Vec<(ChartKind, PathBuf, ChartJob)> = Vec::new();

        if !numeric_series.is_empty() {
            let path = chart_path(scratch_dir, ChartKind::Distributions);
            let series = numeric_series.clone();
            let out = path.clone();
            jobs.push((
                ChartKind::Distributions,
                path,
                Box::new(move || render_distributions(&series, &out)),
            ));

            let path = chart_path(scratch_dir, ChartKind::Boxplots);
            let series = numeric_series.clone();
            let out = path.clone();
            jobs.push((
                ChartKind::Boxplots,
                path,
                Box::new(move || render_boxplots(&series, &out)),
            ));
        }

        if summary.correlations.labels.len() >= 2 {
            let path = chart_path(scratch_dir, ChartKind::Correlation);
            let matrix = summary.correlations.clone();
            let out = path.clone();
            jobs.push((
                ChartKind::Correlation,
                path,
                Box::new(move || render_correlation(&matrix, &out)),
            ));
        }

        if let Some(prediction) = prediction {
            let path = chart_path(scratch_dir, ChartKind::ConfusionMatrix);
            let classes = prediction.classes.clone();
            let counts = prediction.confusion_matrix.clone();
            let out = path.clone();
            jobs.push((
                ChartKind::ConfusionMatrix,
                path,
                Box::new(move || render_confusion_matrix(&classes, &counts, &out)),
            ));
        }

        let results = stream::iter(jobs.into_iter().map(|(kind, path, job)| async move {
            let rendered = tokio::task::spawn_blocking(job).await;
            (kind, path, rendered)
        }))
        .buffer_unordered(MAX_PARALLEL_CHARTS)
        .collect::<Vec<_>>()
        .await;

        let mut artifacts = BTreeMap::new();
        for (kind, path, rendered) in results {
            match rendered {
                Ok(Ok(())) => {
                    debug!("Rendered chart {} at {}", kind.as_str(), path.display());
                    artifacts.insert(kind, ChartArtifact { kind, path });
                }
                Ok(Err(e)) => {
                    warn!("Skipping chart {}: {}", kind.as_str(), e);
                }
                Err(e) => {
                    warn!("Chart task for {} panicked: {}", kind.as_str(), e);
                }
            }
        }

        Ok(artifacts)
    }
}

impl Default for Visualizer {
    fn default() -> Self {
        Self::new()
    }
}

fn chart_path(scratch_dir: &Path, kind: ChartKind) -> PathBuf {
    scratch_dir.join(format!("{}.png", kind.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::Analyzer;
    use crate::config::Config;
    use crate::models::{Column, ColumnData};
    use tempfile::tempdir;

    fn numeric_dataset() -> Dataset {
        Dataset::new(vec![
            Column::new(
                "x",
                ColumnData::Numeric((0..20).map(|i| Some(i as f64)).collect()),
            ),
            Column::new(
                "y",
                ColumnData::Numeric((0..20).map(|i| Some((i * 2) as f64)).collect()),
            ),
        ])
        .unwrap()
    }

    #[tokio::test]
    async fn test_render_returns_only_successful_charts() {
        let dataset = numeric_dataset();
        let summary = Analyzer::new(Config::default_config().analysis)
            .analyze(&dataset)
            .unwrap();
        let dir = tempdir().unwrap();

        let artifacts = Visualizer::new()
            .render(&dataset, &summary, None, dir.path())
            .await
            .unwrap();

        // No prediction was supplied, so no confusion matrix either way.
        assert!(!artifacts.contains_key(&ChartKind::ConfusionMatrix));
        for artifact in artifacts.values() {
            assert!(artifact.path.exists());
        }
    }

    #[tokio::test]
    async fn test_no_numeric_columns_yields_empty_mapping() {
        let dataset = Dataset::new(vec![Column::new(
            "c",
            ColumnData::Categorical(vec![Some("a".to_string()), Some("b".to_string())]),
        )])
        .unwrap();
        let summary = Analyzer::new(Config::default_config().analysis)
            .analyze(&dataset)
            .unwrap();
        let dir = tempdir().unwrap();

        let artifacts = Visualizer::new()
            .render(&dataset, &summary, None, dir.path())
            .await
            .unwrap();

        assert!(artifacts.is_empty());
    }

    #[tokio::test]
    async fn test_scratch_dir_is_created() {
        let dataset = numeric_dataset();
        let summary = Analyzer::new(Config::default_config().analysis)
            .analyze(&dataset)
            .unwrap();
        let dir = tempdir().unwrap();
        let scratch = dir.path().join("nested").join("charts");

        Visualizer::new()
            .render(&dataset, &summary, None, &scratch)
            .await
            .unwrap();

        assert!(scratch.exists());
    }
}
