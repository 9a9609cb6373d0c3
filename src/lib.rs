// file: src/lib.rs
// description: library entry point and public api exports
// reference: rust library patterns
#![doc = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/readme.md"))]

pub mod analyzer;
pub mod cleaner;
pub mod config;
pub mod error;
pub mod extractor;
pub mod history;
pub mod models;
pub mod pipeline;
pub mod reporter;
pub mod synthesizer;
pub mod utils;
pub mod visualizer;

pub use analyzer::Analyzer;
pub use cleaner::DataCleaner;
pub use config::{AnalysisConfig, Config, HistoryConfig, ReportConfig, SynthesisConfig};
pub use error::{PipelineError, Result};
pub use extractor::CsvExtractor;
pub use history::HistoryStore;
pub use models::{
    AnalysisSummary, ChartArtifact, ChartKind, Dataset, PredictionResult, ReportArtifact,
    ReportRecord, SynthesizedInsights,
};
pub use pipeline::{
    AnalysisMode, CancelToken, PipelineOrchestrator, RunOptions, RunOutcome, RunStats,
    StageProgress,
};
pub use reporter::{DatasetOverview, ReportInputs, Reporter};
pub use synthesizer::InsightSynthesizer;
pub use utils::Validator;
pub use visualizer::Visualizer;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_exports() {
        let _config = Config::default_config();
        let _cleaner = DataCleaner::new();
        let _visualizer = Visualizer::new();
    }
}
