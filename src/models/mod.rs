// file: src/models/mod.rs
// description: data model exports
// reference: internal data structures

mod dataset;
mod insight;
mod prediction;
mod report;
mod summary;

pub use dataset::{Column, ColumnData, ColumnType, Dataset};
pub use insight::SynthesizedInsights;
pub use prediction::PredictionResult;
pub use report::{ChartArtifact, ChartKind, ReportArtifact, ReportRecord};
pub use summary::{
    AnalysisSummary, ColumnDescriptor, ColumnStats, CorrelationMatrix, StrongCorrelation,
    TrendDirection, TrendSummary, ValueFrequency, Volatility,
};
