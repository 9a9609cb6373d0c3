// file: src/pipeline/orchestrator.rs
// description: coordinates extraction, cleaning, analysis, charts, synthesis, and reporting
// reference: orchestrates the asynchronous report workflow

use crate::analyzer::Analyzer;
use crate::cleaner::DataCleaner;
use crate::config::{Config, ReportConfig};
use crate::error::{PipelineError, Result};
use crate::extractor::CsvExtractor;
use crate::history::HistoryStore;
use crate::models::{
    AnalysisSummary, ChartArtifact, ChartKind, Dataset, PredictionResult, ReportArtifact,
    SynthesizedInsights,
};
use crate::pipeline::progress::StageProgress;
use crate::reporter::{DatasetOverview, ReportInputs, Reporter};
use crate::synthesizer::InsightSynthesizer;
use crate::visualizer::Visualizer;
use serde_json::{json, Value};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};
use uuid::Uuid;

/// Stage names in execution order, used for progress and error attribution.
pub const STAGES: [&str; 6] = [
    "extracting",
    "cleaning",
    "analyzing",
    "visualizing",
    "synthesizing",
    "reporting",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisMode {
    /// Descriptive statistics, correlations, and trends only.
    Basic,
    /// Adds the predictive pass when a usable target column exists.
    Detailed,
}

impl AnalysisMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnalysisMode::Basic => "basic",
            AnalysisMode::Detailed => "detailed",
        }
    }
}

#[derive(Debug, Clone)]
pub struct RunOptions {
    pub input: PathBuf,
    /// Overrides the configured report output directory when set.
    pub output_dir: Option<PathBuf>,
    pub mode: AnalysisMode,
    /// Degrade instead of aborting when analysis or charts fail.
    pub best_effort: bool,
    /// Skip narrative synthesis even when an API key is configured.
    pub skip_synthesis: bool,
    /// Suppress the terminal progress bar.
    pub quiet: bool,
}

#[derive(Debug)]
pub enum RunOutcome {
    Completed(ReportArtifact),
    Cancelled,
}

/// Cooperative cancellation flag, checked between stages.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

pub struct PipelineOrchestrator {
    config: Config,
}

impl PipelineOrchestrator {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Runs the full pipeline for one input file.
    ///
    /// The cancel token is checked between stages; a cancelled run removes
    /// its scratch directory and returns `RunOutcome::Cancelled` without
    /// writing a report or a history entry.
    pub async fn run(&self, options: &RunOptions, cancel: &CancelToken) -> Result<RunOutcome> {
        let run_id = Uuid::new_v4().simple().to_string();
        let source_filename = options
            .input
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| options.input.display().to_string());

        let output_dir = options
            .output_dir
            .clone()
            .unwrap_or_else(|| self.config.report.output_dir.clone());
        let scratch_dir = output_dir.join(format!(".charts_{}", &run_id[..8]));

        let progress = if options.quiet {
            StageProgress::hidden(STAGES.len())
        } else {
            StageProgress::new(STAGES.len())
        };

        info!(
            "Starting {} analysis run {} for {}",
            options.mode.as_str(),
            &run_id[..8],
            options.input.display()
        );

        // extracting
        if cancel.is_cancelled() {
            return self.abort_run(&scratch_dir);
        }
        progress.begin_stage("extracting");
        let dataset = self.extract(&options.input).await?;
        progress.complete_stage();

        // cleaning
        if cancel.is_cancelled() {
            return self.abort_run(&scratch_dir);
        }
        progress.begin_stage("cleaning");
        let dataset = DataCleaner::new()
            .clean(dataset)
            .map_err(|e| e.at_stage("cleaning"))?;
        progress.complete_stage();

        // analyzing
        if cancel.is_cancelled() {
            return self.abort_run(&scratch_dir);
        }
        progress.begin_stage("analyzing");
        let summary = self.analyze(&dataset, options)?;
        let prediction = match &summary {
            Some(_) if options.mode == AnalysisMode::Detailed => {
                self.train_predictor(&dataset).await
            }
            _ => None,
        };
        progress.complete_stage();

        // visualizing
        if cancel.is_cancelled() {
            return self.abort_run(&scratch_dir);
        }
        let charts = match &summary {
            Some(summary) => {
                progress.begin_stage("visualizing");
                let charts = self
                    .render_charts(&dataset, summary, prediction.as_ref(), &scratch_dir, options)
                    .await?;
                progress.complete_stage();
                charts
            }
            None => {
                progress.skip_stage("visualizing");
                BTreeMap::new()
            }
        };

        // synthesizing
        if cancel.is_cancelled() {
            return self.abort_run(&scratch_dir);
        }
        let insights = match &summary {
            Some(summary) if !options.skip_synthesis => {
                progress.begin_stage("synthesizing");
                let insights = self.synthesize(summary, prediction.as_ref()).await;
                progress.complete_stage();
                insights
            }
            _ => {
                progress.skip_stage("synthesizing");
                None
            }
        };

        // reporting
        if cancel.is_cancelled() {
            return self.abort_run(&scratch_dir);
        }
        progress.begin_stage("reporting");
        let overview = DatasetOverview::from_dataset(&source_filename, &dataset);
        let reporter = Reporter::new(ReportConfig {
            output_dir,
            keep_charts: self.config.report.keep_charts,
        });
        let artifact = reporter
            .build(&ReportInputs {
                run_id: &run_id,
                overview: &overview,
                summary: summary.as_ref(),
                insights: insights.as_ref(),
                prediction: prediction.as_ref(),
                charts: &charts,
            })
            .map_err(|e| e.at_stage("reporting"))?;
        progress.complete_stage();
        progress.finish();

        // The reporter deletes consumed charts; an empty scratch directory
        // from a chartless run is removed here.
        if !self.config.report.keep_charts {
            let _ = fs::remove_dir(&scratch_dir);
        }

        // A history failure never invalidates the report on disk.
        if let Err(e) = self.save_history(
            &artifact,
            &source_filename,
            summary.as_ref(),
            prediction.as_ref(),
            &charts,
            options,
        ) {
            warn!("Could not record report history: {}", e);
        }

        let stats = progress.get_stats();
        info!(
            "Run {} complete in {}s ({} stages, {} skipped): {}",
            &run_id[..8],
            stats.duration_secs,
            stats.stages_completed,
            stats.stages_skipped,
            artifact.path.display()
        );

        Ok(RunOutcome::Completed(artifact))
    }

    async fn extract(&self, input: &Path) -> Result<Dataset> {
        let path = input.to_path_buf();
        tokio::task::spawn_blocking(move || CsvExtractor::new().extract(&path))
            .await
            .map_err(|e| {
                PipelineError::Validation(format!("extraction task failed: {}", e))
                    .at_stage("extracting")
            })?
            .map_err(|e| e.at_stage("extracting"))
    }

    fn analyze(&self, dataset: &Dataset, options: &RunOptions) -> Result<Option<AnalysisSummary>> {
        let analyzer = Analyzer::new(self.config.analysis.clone());
        match analyzer.analyze(dataset) {
            Ok(summary) => Ok(Some(summary)),
            Err(e) if options.best_effort => {
                warn!("Analysis failed, continuing with a placeholder report: {}", e);
                Ok(None)
            }
            Err(e) => Err(e.at_stage("analyzing")),
        }
    }

    /// Trains the optional classifier off the async runtime, bounded by the
    /// configured timeout. Any failure degrades to no prediction section.
    async fn train_predictor(&self, dataset: &Dataset) -> Option<PredictionResult> {
        let analyzer = Analyzer::new(self.config.analysis.clone());
        let dataset = dataset.clone();
        let timeout = Duration::from_secs(self.config.analysis.training_timeout_secs);

        let handle = tokio::task::spawn_blocking(move || analyzer.train_predictor(&dataset));
        match tokio::time::timeout(timeout, handle).await {
            Ok(Ok(Ok(prediction))) => prediction,
            Ok(Ok(Err(e))) => {
                warn!("Predictive pass failed, omitting prediction section: {}", e);
                None
            }
            Ok(Err(e)) => {
                warn!("Training task failed: {}", e);
                None
            }
            Err(_) => {
                warn!(
                    "Training exceeded {}s, omitting prediction section",
                    self.config.analysis.training_timeout_secs
                );
                None
            }
        }
    }

    async fn render_charts(
        &self,
        dataset: &Dataset,
        summary: &AnalysisSummary,
        prediction: Option<&PredictionResult>,
        scratch_dir: &Path,
        options: &RunOptions,
    ) -> Result<BTreeMap<ChartKind, ChartArtifact>> {
        let rendered = Visualizer::new()
            .render(dataset, summary, prediction, scratch_dir)
            .await;
        match rendered {
            Ok(charts) => Ok(charts),
            Err(e) if options.best_effort => {
                warn!("Chart stage failed, continuing without charts: {}", e);
                Ok(BTreeMap::new())
            }
            Err(e) => Err(e.at_stage("visualizing")),
        }
    }

    /// Narrative synthesis is always best-effort: no key, a failed request,
    /// or an unusable response all degrade to a report without it.
    async fn synthesize(
        &self,
        summary: &AnalysisSummary,
        prediction: Option<&PredictionResult>,
    ) -> Option<SynthesizedInsights> {
        let synthesizer = match InsightSynthesizer::from_config(&self.config.synthesis) {
            Ok(Some(synthesizer)) => synthesizer,
            Ok(None) => {
                info!("No synthesis API key configured, skipping narrative synthesis");
                return None;
            }
            Err(e) => {
                warn!("Could not start insight synthesizer: {}", e);
                return None;
            }
        };

        match synthesizer.synthesize(summary, prediction, &[]).await {
            Ok(insights) if !insights.is_empty() => Some(insights),
            Ok(_) => {
                warn!("Insight synthesis returned an empty narrative");
                None
            }
            Err(e) => {
                warn!("Insight synthesis failed: {}", e);
                None
            }
        }
    }

    fn save_history(
        &self,
        artifact: &ReportArtifact,
        source_filename: &str,
        summary: Option<&AnalysisSummary>,
        prediction: Option<&PredictionResult>,
        charts: &BTreeMap<ChartKind, ChartArtifact>,
        options: &RunOptions,
    ) -> Result<i64> {
        let store = HistoryStore::open(&self.config.history.db_path)?;

        let analysis_results = match summary {
            Some(summary) => serde_json::to_value(summary)?,
            None => Value::Null,
        };
        let metadata = json!({
            "run_id": artifact.run_id,
            "mode": options.mode.as_str(),
            "charts": charts.len(),
            "accuracy": prediction.map(|p| p.accuracy),
            "source_sha256": file_fingerprint(&options.input),
        });

        store.save(
            source_filename,
            &artifact.path.to_string_lossy(),
            options.mode.as_str(),
            &analysis_results,
            &metadata,
        )
    }

    fn abort_run(&self, scratch_dir: &Path) -> Result<RunOutcome> {
        info!("Run cancelled, cleaning up");
        if scratch_dir.exists() {
            if let Err(e) = fs::remove_dir_all(scratch_dir) {
                warn!(
                    "Could not remove scratch directory {}: {}",
                    scratch_dir.display(),
                    e
                );
            }
        }
        Ok(RunOutcome::Cancelled)
    }
}

/// Hex SHA-256 of the source file, letting later runs spot identical inputs
/// in the history. Missing or unreadable files yield no fingerprint.
fn file_fingerprint(path: &Path) -> Option<String> {
    let bytes = fs::read(path).ok()?;
    let digest = Sha256::digest(&bytes);
    Some(format!("{:x}", digest))
}
