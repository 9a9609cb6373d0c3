// file: src/error.rs
// description: Custom error types and result type aliases
// reference: https://docs.rs/thiserror

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, PipelineError>;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Data format error for {path}: {message}")]
    DataFormat { path: PathBuf, message: String },

    #[error("Empty dataset: {0}")]
    EmptyDataset(String),

    #[error("Analysis failed: {0}")]
    Analysis(String),

    #[error("Chart rendering failed for {chart}: {message}")]
    Visualization { chart: String, message: String },

    #[error("Insight synthesis failed: {0}")]
    Synthesis(String),

    #[error("History store error: {0}")]
    Persistence(#[from] rusqlite::Error),

    #[error("Report assembly failed: {0}")]
    ReportAssembly(String),

    #[error("{stage} stage failed: {source}")]
    Stage {
        stage: &'static str,
        #[source]
        source: Box<PipelineError>,
    },

    #[error("Run cancelled")]
    Cancelled,

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl PipelineError {
    /// Wraps an error with the pipeline stage it originated from.
    pub fn at_stage(self, stage: &'static str) -> Self {
        match self {
            // Already attributed; keep the innermost stage name.
            PipelineError::Stage { .. } | PipelineError::Cancelled => self,
            other => PipelineError::Stage {
                stage,
                source: Box::new(other),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_wrapping() {
        let err = PipelineError::Analysis("bad matrix".to_string()).at_stage("analyzing");
        assert!(err.to_string().contains("analyzing stage failed"));
        assert!(err.to_string().contains("bad matrix"));
    }

    #[test]
    fn test_stage_wrapping_is_not_nested() {
        let err = PipelineError::Analysis("x".to_string())
            .at_stage("analyzing")
            .at_stage("reporting");
        assert!(err.to_string().starts_with("analyzing stage failed"));
    }

    #[test]
    fn test_cancelled_is_never_attributed() {
        let err = PipelineError::Cancelled.at_stage("cleaning");
        assert!(matches!(err, PipelineError::Cancelled));
    }
}
