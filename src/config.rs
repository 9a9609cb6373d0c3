// file: src/config.rs
// description: application configuration management with toml support
// reference: https://docs.rs/config

use crate::error::{PipelineError, Result};
use dotenvy::dotenv;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub analysis: AnalysisConfig,
    pub synthesis: SynthesisConfig,
    pub report: ReportConfig,
    pub history: HistoryConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AnalysisConfig {
    /// Absolute Pearson correlation above which a pair is called out as strong.
    pub correlation_threshold: f64,
    /// How many most-frequent values to report for a categorical column.
    pub top_k_values: usize,
    /// Maximum distinct values for a categorical column to qualify as a
    /// prediction target.
    pub max_target_cardinality: usize,
    pub tree_count: usize,
    pub test_fraction: f64,
    pub random_seed: u64,
    pub training_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SynthesisConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub endpoint: String,
    pub timeout_secs: u64,
    /// How many prior conversation turns to forward with a request.
    pub history_turns: usize,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ReportConfig {
    pub output_dir: PathBuf,
    /// Keep per-run chart files instead of deleting them after embedding.
    pub keep_charts: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HistoryConfig {
    pub db_path: PathBuf,
    pub recent_limit: usize,
}

impl Config {
    pub fn load(path: Option<&Path>) -> Result<Self> {
        dotenv().ok();

        let mut builder = config::Config::builder();

        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path));
        } else {
            builder = builder.add_source(config::File::from(Path::new("config/default.toml")));
        }

        builder = builder.add_source(
            config::Environment::with_prefix("REPORT_ANALYZER")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .map_err(|e| PipelineError::Config(e.to_string()))?;

        let config: Config = settings
            .try_deserialize()
            .map_err(|e| PipelineError::Config(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    pub fn default_config() -> Self {
        Self {
            analysis: AnalysisConfig {
                correlation_threshold: 0.5,
                top_k_values: 5,
                max_target_cardinality: 10,
                tree_count: 100,
                test_fraction: 0.2,
                random_seed: 42,
                training_timeout_secs: 120,
            },
            synthesis: SynthesisConfig {
                api_key: None,
                model: "openai/gpt-oss-120b".to_string(),
                endpoint: "https://api.groq.com/openai/v1/chat/completions".to_string(),
                timeout_secs: 60,
                history_turns: 4,
            },
            report: ReportConfig {
                output_dir: PathBuf::from("./output/reports"),
                keep_charts: false,
            },
            history: HistoryConfig {
                db_path: PathBuf::from("./data/reports.db"),
                recent_limit: 5,
            },
        }
    }

    fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.analysis.correlation_threshold) {
            return Err(PipelineError::Config(
                "correlation_threshold must be within [0, 1]".to_string(),
            ));
        }

        if self.analysis.test_fraction <= 0.0 || self.analysis.test_fraction >= 1.0 {
            return Err(PipelineError::Config(
                "test_fraction must be within (0, 1)".to_string(),
            ));
        }

        if self.analysis.tree_count == 0 {
            return Err(PipelineError::Config(
                "tree_count must be greater than 0".to_string(),
            ));
        }

        if self.analysis.max_target_cardinality < 2 {
            return Err(PipelineError::Config(
                "max_target_cardinality must be at least 2".to_string(),
            ));
        }

        Ok(())
    }
}
