// file: src/pipeline/mod.rs
// description: pipeline module exports and public api
// reference: pipeline orchestration

mod orchestrator;
mod progress;

pub use orchestrator::{
    AnalysisMode, CancelToken, PipelineOrchestrator, RunOptions, RunOutcome, STAGES,
};
pub use progress::{RunStats, StageProgress};
